//! The navigation session: all mutable state for one loaded document.
//!
//! The history stack, base-tag state, and browser-visible location are
//! owned here and passed around explicitly -- no ambient globals. A
//! session lives exactly as long as its document; only a full reload
//! resets it.

use opal_types::Result;

use crate::base::BaseTagState;
use crate::config::Capabilities;
use crate::history::{HistoryStack, NavigationEntry};
use crate::path::{self, ParsedUrl};

#[derive(Debug)]
pub struct NavSession {
    /// The hosting document's own URL; never changes in-page.
    document_url: ParsedUrl,
    history: HistoryStack,
    base: BaseTagState,
    /// The URL currently shown in the browser's URL bar.
    location: String,
}

impl NavSession {
    /// Start a session for a freshly loaded document. The document's
    /// root page becomes the first committed entry.
    pub fn new(document_url: &str, caps: Capabilities) -> Result<Self> {
        let document_url = path::parse_url(document_url)?;
        let mut session = Self {
            base: BaseTagState::new(&document_url.directory, caps),
            history: HistoryStack::new(),
            location: format!("{}{}", document_url.pathname(), document_url.search),
            document_url,
        };
        session.seed_root_entry();
        Ok(session)
    }

    fn seed_root_entry(&mut self) {
        self.history.push(NavigationEntry {
            url: self.document_url.clone(),
            hash: None,
            is_internal: true,
            title: String::new(),
            degraded_href: None,
        });
    }

    pub fn document_url(&self) -> &ParsedUrl {
        &self.document_url
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryStack {
        &mut self.history
    }

    pub fn base(&self) -> &BaseTagState {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut BaseTagState {
        &mut self.base
    }

    /// The browser-visible URL.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: String) {
        self.location = location;
    }

    /// The committed active entry. Present from construction onward.
    pub fn active_entry(&self) -> Option<&NavigationEntry> {
        self.history.active()
    }

    /// The active page's URL: the entry's own URL for external pages,
    /// the document URL for internal ones.
    pub fn active_page_url(&self) -> ParsedUrl {
        match self.active_entry() {
            Some(entry) if !entry.is_internal => entry.url.clone(),
            _ => self.document_url.clone(),
        }
    }

    /// The directory relative references resolve against: the active
    /// page's, which diverges from the document's once an external
    /// page in another directory is active.
    pub fn active_directory(&self) -> String {
        self.active_page_url().directory
    }

    /// Full reload: drop history, re-seed the root entry, restore the
    /// base to the document directory.
    pub fn reset(&mut self) {
        self.history.clear();
        self.base.reset();
        self.location = format!("{}{}", self.document_url.pathname(), self.document_url.search);
        self.seed_root_entry();
    }
}
