//! Shared test utilities for the navigation engine.
//!
//! Provides a recording observer and a driver that walks a navigation
//! through its directives to COMMITTED, so unit tests across modules
//! can set up committed sessions in one line.

use std::cell::RefCell;
use std::rc::Rc;

use opal_types::NavError;

use crate::engine::{ChangeOptions, NavDirective, PageTransitionController};
use crate::event::NavObserver;
use crate::history::NavigationEntry;
use crate::page::Page;

/// Observer that records every event as a formatted line.
pub(crate) struct RecordingObserver {
    pub log: Rc<RefCell<Vec<String>>>,
}

impl RecordingObserver {
    pub fn new() -> (Self, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                log: Rc::clone(&log),
            },
            log,
        )
    }
}

impl NavObserver for RecordingObserver {
    fn before_navigate(&mut self, target: &str) -> bool {
        self.log.borrow_mut().push(format!("before {target}"));
        true
    }

    fn committed(&mut self, entry: &NavigationEntry) {
        self.log
            .borrow_mut()
            .push(format!("committed {}", entry.url.pathname()));
    }

    fn failed(&mut self, target: &str, reason: &NavError) {
        self.log.borrow_mut().push(format!("failed {target}: {reason}"));
    }
}

/// Drive a navigation all the way to COMMITTED, answering every load
/// directive with the given page. Panics on fast-fail outcomes so
/// tests read linearly.
pub(crate) fn commit_navigation(
    controller: &mut PageTransitionController,
    target: &str,
    page: Page,
) -> String {
    let directive = controller
        .change_page(target, ChangeOptions::default())
        .expect("change_page failed");
    let seq = match directive {
        NavDirective::Load { seq, .. } => {
            match controller.load_finished(seq, Ok(page)).expect("load_finished") {
                NavDirective::Transition { seq, .. } => seq,
                other => panic!("expected transition directive, got {other:?}"),
            }
        },
        NavDirective::Transition { seq, .. } => seq,
        other => panic!("expected load or transition directive, got {other:?}"),
    };
    match controller
        .transition_finished(seq, Ok(()))
        .expect("transition_finished")
    {
        NavDirective::Committed { location } => location,
        other => panic!("expected committed, got {other:?}"),
    }
}
