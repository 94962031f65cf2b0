//! Client-side navigation engine for the OPAL toolkit.
//!
//! This crate decides how a navigation is represented as a URL (hash
//! fragment vs. history-API push), resolves relative references
//! against the correct base directory, keeps an in-memory history
//! stack reconciled with the browser's session history, and drives the
//! state machine that turns a navigation request into a committed page
//! transition via the [`PageTransitionController`].
//!
//! Visual transitions, templating/DOM insertion, and network fetches
//! live in collaborator crates; they talk to the engine through
//! [`NavDirective`]s and [`event::NavObserver`]s.

pub mod base;
pub mod config;
pub mod engine;
pub mod event;
pub mod form;
pub mod history;
pub mod page;
pub mod path;
pub mod router;
pub mod session;

#[cfg(test)]
mod navigation_tests;
#[cfg(test)]
pub(crate) mod test_utils;

// -----------------------------------------------------------------------
// Public re-exports
// -----------------------------------------------------------------------

pub use base::BaseTagState;
pub use config::{Capabilities, NavConfig};
pub use engine::{
    ChangeOptions, LocationChange, NavDirective, PageTarget, PageTransitionController,
    TransitionPhase,
};
pub use event::NavObserver;
pub use history::{HistoryStack, NavigationEntry, Reconciliation};
pub use page::{Form, Link, Page};
pub use path::{ParsedUrl, make_path_absolute, make_url_absolute, parse_url};
pub use router::{Classified, Representation, RoutingStrategy};
pub use session::NavSession;

pub use opal_types::{NavError, Result};
