//! Target classification and browser-visible URL representation.
//!
//! Pure and deterministic: the same target string and capability flags
//! always classify the same way, with no I/O. Capability branching is
//! folded into a [`RoutingStrategy`] chosen once per navigation rather
//! than scattered boolean checks.

use crate::config::Capabilities;
use crate::history::NavigationEntry;
use crate::path::{self, ParsedUrl};

// -----------------------------------------------------------------------
// Representation & strategy
// -----------------------------------------------------------------------

/// How a navigation is encoded in the URL bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Encoded in the fragment (`#<pageId>` or `#<path>?<query>`).
    Hash,
    /// A real path via the history push-state API.
    Push,
}

/// The URL scheme for one navigation, selected from the capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingStrategy {
    /// History API available: external pages get real paths.
    PushState,
    /// Everything degrades to hash encoding.
    HashOnly,
}

impl RoutingStrategy {
    pub fn select(caps: Capabilities) -> Self {
        if caps.push_state_supported {
            Self::PushState
        } else {
            Self::HashOnly
        }
    }
}

// -----------------------------------------------------------------------
// Classification
// -----------------------------------------------------------------------

/// A classified navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified {
    pub representation: Representation,
    pub is_internal: bool,
}

/// Classify a target reference against the environment capabilities.
///
/// Internal targets (bare page ids) are always hash-represented -- they
/// denote no distinct resource. External targets get a push-state path
/// when the API is available and otherwise degrade to a hash encoding
/// that carries path and query for reload re-parsing.
pub fn classify(target: &str, caps: Capabilities) -> Classified {
    let is_internal = path::is_page_id(target);
    let representation = if is_internal {
        Representation::Hash
    } else {
        match RoutingStrategy::select(caps) {
            RoutingStrategy::PushState => Representation::Push,
            RoutingStrategy::HashOnly => Representation::Hash,
        }
    };
    Classified {
        representation,
        is_internal,
    }
}

// -----------------------------------------------------------------------
// URL representation
// -----------------------------------------------------------------------

/// The browser-visible URL for a committed entry.
///
/// Internal pages always read `<document>#<id>`. External pages read
/// `<path>?<query>` under push-state, and
/// `<document>#<path>?<query>` under hash routing.
pub fn url_for(entry: &NavigationEntry, strategy: RoutingStrategy, document_url: &ParsedUrl) -> String {
    let document_location = format!("{}{}", document_url.pathname(), document_url.search);

    if entry.is_internal {
        return match &entry.hash {
            Some(hash) => format!("{document_location}#{hash}"),
            // The document's original root page.
            None => document_location,
        };
    }

    let external = format!("{}{}", entry.url.pathname(), entry.url.search);
    match strategy {
        RoutingStrategy::PushState => external,
        RoutingStrategy::HashOnly => format!("{document_location}#{external}"),
    }
}
