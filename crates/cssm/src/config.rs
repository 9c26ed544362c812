//! Processing options.
//!
//! [`Config`] is the runtime configuration handed to the processor. It can be
//! built in code or from [`Options`], the plain-data form read from a TOML
//! file:
//!
//! ```toml
//! modules = true
//! extension = ".css"
//! missing-reference = "warn"
//! camel-case = true
//! naming = "path"
//! syntax = ["use", "import"]
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::naming::{DefaultNameGenerator, NameGenerator, Seed, SeedMode};
use crate::resolve::{DefaultPathResolver, PathResolver};
use crate::{Error, Result};

/// What to do when a directive references a file that was not processed yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingReferencePolicy {
    /// Abort processing of the document.
    #[default]
    Error,
    /// Log a warning and continue with an empty placeholder table.
    Warn,
    /// Silently continue with an empty placeholder table.
    Ignore,
}

/// Cross-file directive grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DirectiveSyntax {
    /// `@use (.a, .b as .c) from './file'`.
    Use,
    /// `:import { alias: "from './file'" }` with `alias::class` references.
    Import,
}

impl fmt::Display for DirectiveSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Use => write!(f, "@use"),
            Self::Import => write!(f, ":import"),
        }
    }
}

/// Serializable processing options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// Scope class names. When false every selector is global.
    pub modules: bool,
    /// Extension appended to referenced paths that have none.
    pub extension: String,
    /// Policy for references to files not processed yet.
    pub missing_reference: MissingReferencePolicy,
    /// Convert dashed keys of the returned table to camelCase.
    pub camel_case: bool,
    /// Seed used by the built-in name generator.
    pub naming: SeedMode,
    /// Directive grammars to recognize.
    pub syntax: Vec<DirectiveSyntax>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            modules: true,
            extension: ".css".to_string(),
            missing_reference: MissingReferencePolicy::Error,
            camel_case: false,
            naming: SeedMode::Path,
            syntax: vec![DirectiveSyntax::Use],
        }
    }
}

impl Options {
    /// Parse options from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&text)
    }
}

/// Runtime configuration for processing documents.
#[derive(Clone)]
pub struct Config {
    /// Scope class names. When false every selector is global.
    pub modules: bool,
    /// Extension appended to referenced paths that have none.
    pub extension: String,
    /// Policy for references to files not processed yet.
    pub missing_reference: MissingReferencePolicy,
    /// Convert dashed keys of the returned table to camelCase.
    pub camel_case: bool,
    /// Directive grammars to recognize.
    pub syntaxes: Vec<DirectiveSyntax>,
    /// Scoped name generator.
    pub name_generator: Arc<dyn NameGenerator>,
    /// Maps a declared path and the current directory to a store key.
    pub path_resolver: Arc<dyn PathResolver>,
}

impl Config {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from deserialized options.
    pub fn from_options(options: Options) -> Self {
        Self {
            modules: options.modules,
            extension: options.extension,
            missing_reference: options.missing_reference,
            camel_case: options.camel_case,
            syntaxes: options.syntax,
            name_generator: Arc::new(DefaultNameGenerator::new(options.naming)),
            path_resolver: Arc::new(DefaultPathResolver),
        }
    }

    /// Enable or disable scoping.
    pub fn modules(mut self, enabled: bool) -> Self {
        self.modules = enabled;
        self
    }

    /// Set the default extension for referenced paths.
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Set the missing reference policy.
    pub fn missing_reference(mut self, policy: MissingReferencePolicy) -> Self {
        self.missing_reference = policy;
        self
    }

    /// Convert returned keys to camelCase.
    pub fn camel_case(mut self, enabled: bool) -> Self {
        self.camel_case = enabled;
        self
    }

    /// Set the recognized directive grammars.
    pub fn syntaxes(mut self, syntaxes: impl IntoIterator<Item = DirectiveSyntax>) -> Self {
        self.syntaxes = syntaxes.into_iter().collect();
        self
    }

    /// Use a custom name generator.
    pub fn name_generator(mut self, generator: impl NameGenerator + 'static) -> Self {
        self.name_generator = Arc::new(generator);
        self
    }

    /// Use a closure as the name generator.
    pub fn name_fn<F>(self, generate: F) -> Self
    where
        F: Fn(&str, &Seed<'_>) -> String + Send + Sync + 'static,
    {
        self.name_generator(generate)
    }

    /// Use a custom path resolver.
    pub fn path_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.path_resolver = Arc::new(resolver);
        self
    }

    /// Whether a directive grammar is enabled.
    pub fn recognizes(&self, syntax: DirectiveSyntax) -> bool {
        self.syntaxes.contains(&syntax)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_options(Options::default())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("modules", &self.modules)
            .field("extension", &self.extension)
            .field("missing_reference", &self.missing_reference)
            .field("camel_case", &self.camel_case)
            .field("syntaxes", &self.syntaxes)
            .finish_non_exhaustive()
    }
}
