//! Dynamic base-tag state and degraded link rewriting.
//!
//! Once the active page lives in a different directory than the
//! document, relative references must resolve against the page's
//! directory. Environments that can move the ambient base get that for
//! free on every commit; environments that cannot get a one-time
//! rewrite of each inserted page's relative hrefs instead.

use crate::config::Capabilities;
use crate::page::Page;
use crate::path;

/// Tracks the directory relative references currently resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseTagState {
    /// Policy: may the engine touch the base at all?
    enabled: bool,
    /// Probe result: can the ambient base be moved dynamically?
    supported: bool,
    /// Directory of the last committed entry when `enabled && supported`;
    /// otherwise frozen at the document's own directory.
    current_directory: String,
    /// The document's original directory, for resets.
    document_directory: String,
}

impl BaseTagState {
    pub fn new(document_directory: &str, caps: Capabilities) -> Self {
        Self {
            enabled: caps.dynamic_base_enabled,
            supported: caps.dynamic_base_supported,
            current_directory: document_directory.to_string(),
            document_directory: document_directory.to_string(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn supported(&self) -> bool {
        self.supported
    }

    /// The directory the ambient base points at right now.
    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    /// Follow a committed transition. Moves the ambient base only when
    /// dynamic rewriting is both enabled and supported; otherwise the
    /// base stays frozen at the document directory.
    pub fn commit_directory(&mut self, directory: &str) {
        if self.enabled && self.supported {
            self.current_directory = directory.to_string();
        }
    }

    /// Prepare a freshly inserted page: the degraded path.
    ///
    /// When the ambient base cannot move (`enabled && !supported`),
    /// every relative href in the page is rewritten to its absolute
    /// equivalent against the *page's* directory, exactly once at
    /// insertion time. Absolute and fragment-only hrefs pass through,
    /// so re-running the rewrite is a no-op. With the feature disabled
    /// nothing is touched at all.
    ///
    /// Capability flags are read here, at insertion time; toggling them
    /// later never revisits an already-inserted page.
    pub fn prepare_inserted_page(&self, page: &mut Page, page_directory: &str) {
        if !self.enabled || self.supported {
            return;
        }
        for link in &mut page.links {
            if path::is_relative(&link.href) {
                link.href = path::make_path_absolute(&link.href, page_directory);
            }
        }
        for form in &mut page.forms {
            if let Some(action) = &form.action
                && path::is_relative(action)
            {
                form.action = Some(path::make_path_absolute(action, page_directory));
            }
        }
    }

    /// Reset to the document's own directory. Models a full reload.
    pub fn reset(&mut self) {
        self.current_directory = self.document_directory.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(enabled: bool, supported: bool) -> Capabilities {
        Capabilities {
            dynamic_base_enabled: enabled,
            dynamic_base_supported: supported,
            ..Capabilities::default()
        }
    }

    #[test]
    fn commit_moves_base_when_dynamic() {
        let mut base = BaseTagState::new("/app/", caps(true, true));
        base.commit_directory("/app/base/");
        assert_eq!(base.current_directory(), "/app/base/");
    }

    #[test]
    fn commit_frozen_when_unsupported() {
        let mut base = BaseTagState::new("/app/", caps(true, false));
        base.commit_directory("/app/base/");
        assert_eq!(base.current_directory(), "/app/");
    }

    #[test]
    fn commit_frozen_when_disabled() {
        let mut base = BaseTagState::new("/app/", caps(false, true));
        base.commit_directory("/app/base/");
        assert_eq!(base.current_directory(), "/app/");
    }

    #[test]
    fn degraded_rewrite_makes_relative_links_absolute() {
        let base = BaseTagState::new("/app/", caps(true, false));
        let mut page = crate::page::Page::external("/app/base/page1.html")
            .with_link("foo")
            .with_link("../content/page1.html")
            .with_link("/app/rooted.html")
            .with_link("#fragment")
            .with_link("http://example.com/x.html");

        base.prepare_inserted_page(&mut page, "/app/base/");

        assert_eq!(page.links[0].href, "/app/base/foo");
        assert_eq!(page.links[1].href, "/app/content/page1.html");
        assert_eq!(page.links[2].href, "/app/rooted.html");
        assert_eq!(page.links[3].href, "#fragment");
        assert_eq!(page.links[4].href, "http://example.com/x.html");
    }

    #[test]
    fn degraded_rewrite_is_idempotent() {
        let base = BaseTagState::new("/app/", caps(true, false));
        let mut page = crate::page::Page::external("/app/base/page1.html").with_link("foo");

        base.prepare_inserted_page(&mut page, "/app/base/");
        let first = page.clone();
        base.prepare_inserted_page(&mut page, "/app/base/");
        assert_eq!(page, first);
    }

    #[test]
    fn no_rewrite_when_dynamic_base_works() {
        let base = BaseTagState::new("/app/", caps(true, true));
        let mut page = crate::page::Page::external("/app/base/page1.html").with_link("foo");
        base.prepare_inserted_page(&mut page, "/app/base/");
        assert_eq!(page.links[0].href, "foo");
    }

    #[test]
    fn no_rewrite_when_disabled() {
        let base = BaseTagState::new("/app/", caps(false, false));
        let mut page = crate::page::Page::external("/app/base/page1.html").with_link("foo");
        base.prepare_inserted_page(&mut page, "/app/base/");
        assert_eq!(page.links[0].href, "foo");
    }

    #[test]
    fn rewrites_relative_form_actions() {
        let base = BaseTagState::new("/app/", caps(true, false));
        let mut page = crate::page::Page::external("/app/base/page1.html").with_form(
            crate::page::Form {
                action: Some("submit.html".to_string()),
                fields: vec![],
            },
        );
        base.prepare_inserted_page(&mut page, "/app/base/");
        assert_eq!(page.forms[0].action.as_deref(), Some("/app/base/submit.html"));
    }

    #[test]
    fn reset_returns_to_document_directory() {
        let mut base = BaseTagState::new("/app/", caps(true, true));
        base.commit_directory("/app/base/");
        base.reset();
        assert_eq!(base.current_directory(), "/app/");
    }
}
