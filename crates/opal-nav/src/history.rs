//! The in-memory navigation history stack.
//!
//! One [`NavigationEntry`] per committed navigation plus a cursor,
//! reconciled against the browser's native session history on
//! back/forward signals. Entries are superseded, never mutated in
//! place -- the only in-place write is [`HistoryStack::replace`], which
//! swaps the whole active entry for a new one.

use crate::path::ParsedUrl;

// -----------------------------------------------------------------------
// NavigationEntry
// -----------------------------------------------------------------------

/// One committed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEntry {
    /// The resolved page URL.
    pub url: ParsedUrl,
    /// Fragment identifier (without `#`), if the browser-visible form
    /// carries one.
    pub hash: Option<String>,
    /// True for pages addressed by id within the current document.
    pub is_internal: bool,
    /// Page title.
    pub title: String,
    /// The hash-encoded representation used when push-state is
    /// unavailable, kept for reload re-parsing.
    pub degraded_href: Option<String>,
}

impl NavigationEntry {
    /// The tuple reconciliation matches on.
    fn location_key(&self) -> (&str, &str, &str) {
        let hash = self.hash.as_deref().unwrap_or("");
        (&self.url.directory, &self.url.filename, hash)
    }
}

// -----------------------------------------------------------------------
// HistoryStack
// -----------------------------------------------------------------------

/// Outcome of reconciling a native back/forward signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The observed URL matched a stack entry; the cursor moved there.
    /// `delta` is the signed distance from the previous cursor.
    Moved { index: usize, delta: isize },
    /// No entry matched: an out-of-band navigation (e.g. restored tab
    /// state). The caller treats it as a fresh forward push.
    Missed,
}

/// Ordered record of visited entries plus the active cursor.
///
/// Created empty at session start; only a full document reload resets
/// it. Invariant: `active_index < len()` whenever non-empty.
#[derive(Debug, Default)]
pub struct HistoryStack {
    stack: Vec<NavigationEntry>,
    active_index: usize,
}

impl HistoryStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry as a new forward navigation.
    ///
    /// If the cursor is not at the tail, the invalidated forward
    /// branch past it is truncated first; earlier entries are never
    /// touched.
    pub fn push(&mut self, entry: NavigationEntry) {
        if !self.stack.is_empty() {
            self.stack.truncate(self.active_index + 1);
        }
        self.stack.push(entry);
        self.active_index = self.stack.len() - 1;
    }

    /// Overwrite the active entry (query-string-only updates on the
    /// same page). Falls back to a push on an empty stack.
    pub fn replace(&mut self, entry: NavigationEntry) {
        if self.stack.is_empty() {
            self.push(entry);
        } else {
            self.stack[self.active_index] = entry;
        }
    }

    /// Reconcile a native back/forward signal against the stack.
    ///
    /// Matches on the `(directory, filename, hash)` tuple. When several
    /// entries match (the same page visited twice), the one nearest to
    /// the current cursor wins, ties broken toward the older side --
    /// single-step back traversal is the overwhelmingly common signal.
    pub fn reconcile(&mut self, observed: &ParsedUrl) -> Reconciliation {
        let observed_key = observed.location_key();
        let best = self
            .stack
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.location_key() == observed_key)
            .min_by_key(|(index, _)| {
                let distance = index.abs_diff(self.active_index);
                // Older-side tie-break: back beats forward at equal distance.
                (distance, *index > self.active_index)
            });

        match best {
            Some((index, _)) => {
                let delta = index as isize - self.active_index as isize;
                self.active_index = index;
                Reconciliation::Moved { index, delta }
            },
            None => Reconciliation::Missed,
        }
    }

    /// The committed entry under the cursor.
    pub fn active(&self) -> Option<&NavigationEntry> {
        self.stack.get(self.active_index)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.active_index > 0
    }

    /// Entries in stack order, oldest first.
    pub fn entries(&self) -> &[NavigationEntry] {
        &self.stack
    }

    /// Drop everything. Models a full document reload, nothing else.
    pub fn clear(&mut self) {
        self.stack.clear();
        self.active_index = 0;
    }
}
