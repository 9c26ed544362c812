//! Tracing targets and span names.
//!
//! cssm reports through the `tracing` crate and never installs a subscriber.
//! Warnings raised under [`MissingReferencePolicy::Warn`] go to
//! [`targets::RESOLVE`], so a host can route them with a directive such as
//! `cssm::resolve=warn`.
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("cssm=debug")
//!     .init();
//! ```
//!
//! [`MissingReferencePolicy::Warn`]: crate::config::MissingReferencePolicy::Warn

/// Span names used for tracing.
pub mod span_names {
    /// Processing of one document.
    pub const PROCESS: &str = "cssm::process";
}

/// Target names for log filtering.
pub mod targets {
    /// Document orchestration.
    pub const PROCESS: &str = "cssm::process";
    /// Cross-file reference resolution.
    pub const RESOLVE: &str = "cssm::resolve";
    /// Selector rewriting.
    pub const REWRITE: &str = "cssm::rewrite";
    /// CSS text parsing.
    pub const PARSER: &str = "cssm::parser";
}
