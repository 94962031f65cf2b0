//! Navigation events consumed by external collaborators.
//!
//! Collaborators (widget enhancement, transition effects, analytics)
//! register a [`NavObserver`] with the engine; the engine notifies them
//! at the three externally visible points of a navigation. The
//! before-navigate notification is cancellable.

use opal_types::NavError;

use crate::history::NavigationEntry;

/// Observer of navigation lifecycle events.
///
/// All methods have pass-through defaults so implementations override
/// only what they care about.
pub trait NavObserver {
    /// Fired in RESOLVING before any state changes. Return `false` to
    /// cancel the navigation; nothing will have been mutated.
    fn before_navigate(&mut self, _target: &str) -> bool {
        true
    }

    /// Fired once a navigation reaches COMMITTED.
    fn committed(&mut self, _entry: &NavigationEntry) {}

    /// Fired when a navigation fails in LOADING or TRANSITIONING. Not
    /// fired for navigations superseded by a newer request.
    fn failed(&mut self, _target: &str, _reason: &NavError) {}
}

/// Registry of navigation observers, notified in registration order.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Box<dyn NavObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn NavObserver>) {
        self.observers.push(observer);
    }

    /// True iff every observer allows the navigation. All observers
    /// are consulted even after a veto so each sees the attempt.
    pub fn before_navigate(&mut self, target: &str) -> bool {
        let mut allowed = true;
        for observer in &mut self.observers {
            if !observer.before_navigate(target) {
                allowed = false;
            }
        }
        allowed
    }

    pub fn committed(&mut self, entry: &NavigationEntry) {
        for observer in &mut self.observers {
            observer.committed(entry);
        }
    }

    pub fn failed(&mut self, target: &str, reason: &NavError) {
        for observer in &mut self.observers {
            observer.failed(target, reason);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}
