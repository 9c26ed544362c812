//! Locally scoped CSS class names.
//!
//! This crate rewrites the class selectors of a stylesheet into generated,
//! collision-free names and records a translation table per file, featuring:
//!
//! - **Local by default**: every `.class` is scoped unless wrapped in
//!   `:global` / `:global(...)`
//! - **Cross-file references**: `@use (.a, .b as .c) from './other'` and
//!   `:import` rules with `alias::class` compositions reuse names scoped by
//!   files processed earlier
//! - **Pluggable naming**: a deterministic default or any closure
//! - **Translation export**: tables serialize to JSON for script bindings
//!
//! Files are processed one at a time in dependency order against a
//! [`ModuleStore`](store::ModuleStore) owned by the caller.
//!
//! # Example
//!
//! ```ignore
//! use cssm::prelude::*;
//!
//! let processor = Processor::new(Config::new().camel_case(true));
//! let mut store = ModuleStore::new();
//!
//! processor.process_str("styles/base.css", ".button { color: red; }", &mut store)?;
//! let app = processor.process_str(
//!     "styles/app.css",
//!     "@use .button from './base';\n.button .icon-left { margin: 0; }",
//!     &mut store,
//! )?;
//!
//! println!("{}", app.css);
//! println!("{}", app.translations_json()?);
//! ```

pub mod config;
pub mod directive;
pub mod document;
pub mod logging;
pub mod naming;
pub mod process;
pub mod resolve;
pub mod rewrite;
pub mod store;
pub mod table;

mod error;

pub use error::{Error, Result};
pub use process::{Output, Processor, Session, process};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::config::{Config, DirectiveSyntax, MissingReferencePolicy, Options};
    pub use crate::document::{Document, Node};
    pub use crate::naming::{DefaultNameGenerator, NameGenerator, Seed, SeedMode};
    pub use crate::process::{Output, Processor, Session};
    pub use crate::resolve::{DefaultPathResolver, PathResolver};
    pub use crate::store::ModuleStore;
    pub use crate::table::TranslationTable;
}
