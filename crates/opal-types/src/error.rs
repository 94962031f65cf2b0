//! Error types for OPAL navigation.

/// Errors produced by the OPAL navigation engine.
///
/// Every variant is recoverable: failures are absorbed at the
/// transition-controller boundary and the session stays usable. A
/// reconciliation miss on a native back/forward signal is deliberately
/// not represented here -- it is ordinary fresh-push handling, not an
/// error.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// The input reference could not be parsed at all. Raised before
    /// any navigation state is touched; the caller treats the
    /// reference as opaque and does not navigate.
    #[error("malformed URL: {0}")]
    MalformedUrl(String),

    /// The reference parsed but could not be classified as an internal
    /// page or an external resource (e.g. a page id missing its `#`
    /// prefix). Raised in the RESOLVING phase.
    #[error("unresolvable navigation target: {0}")]
    UnresolvableTarget(String),

    /// An external page resource failed to load. Raised in the LOADING
    /// phase; the in-flight navigation is abandoned and the committed
    /// entry remains active.
    #[error("failed to load {url}: {reason}")]
    LoadFailure { url: String, reason: String },

    /// Inserting or activating the resolved page failed. Raised in the
    /// TRANSITIONING phase.
    #[error("transition to {url} failed: {reason}")]
    TransitionFailure { url: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NavError>;
