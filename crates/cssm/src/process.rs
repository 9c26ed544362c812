//! Document processing.
//!
//! A [`Processor`] scopes one document at a time against a caller-owned
//! [`ModuleStore`]. Documents must be processed in dependency order: a file
//! referenced by a directive is expected to be processed before the files
//! that reference it.
//!
//! Processing is transactional. The document is registered in the store
//! before its tree is walked, so self references resolve. If the walk fails,
//! the store is restored and the document's tree is left untouched.
//!
//! [`Session`] bundles a processor with a shared store for callers that
//! process files from more than one place.

use std::path::Path;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::document::Document;
use crate::logging::{span_names, targets};
use crate::resolve::{ModuleContext, normalize};
use crate::rewrite::Rewriter;
use crate::store::ModuleStore;
use crate::table::TranslationTable;
use crate::{Error, Result};

/// Rewritten CSS and the translations of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    /// The rewritten stylesheet.
    pub css: String,
    /// Original class names mapped to scoped names.
    pub translations: TranslationTable,
}

impl Output {
    /// The translations as a JSON object.
    pub fn translations_json(&self) -> Result<String> {
        self.translations.to_json()
    }
}

/// Scopes documents according to a [`Config`].
pub struct Processor {
    config: Config,
    rewriter: Rewriter,
}

impl Processor {
    /// Create a processor.
    pub fn new(config: Config) -> Self {
        let rewriter = Rewriter::new(&config);
        Self { config, rewriter }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scope `document` in place and return its translations.
    ///
    /// The table stored for other files always uses the original class
    /// names; camelCase conversion only applies to the returned copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for a malformed directive or scope marker
    /// and [`Error::UnresolvedReference`] for a reference to an unprocessed
    /// file under [`MissingReferencePolicy::Error`]. On error neither the
    /// document nor the store is modified.
    ///
    /// [`MissingReferencePolicy::Error`]: crate::config::MissingReferencePolicy::Error
    pub fn process(
        &self,
        document: &mut Document,
        store: &mut ModuleStore,
    ) -> Result<TranslationTable> {
        let key = normalize(&document.path);
        let _span = tracing::debug_span!(
            target: targets::PROCESS,
            span_names::PROCESS,
            path = %key.display()
        )
        .entered();

        let checkpoint = store.begin(&key, Arc::from(document.source.as_str()));
        let mut nodes = document.nodes.clone();

        let mut cx = ModuleContext::new(&self.config, store, &key, &document.source);
        let walked = self.rewriter.walk(&mut nodes, &mut cx);
        let (table, journal) = cx.finish();

        if let Err(err) = walked {
            tracing::debug!(target: targets::PROCESS, "rolling back: {}", err);
            store.rollback(checkpoint, journal);
            return Err(err);
        }

        tracing::debug!(
            target: targets::PROCESS,
            classes = table.len(),
            placeholders = journal.created.len(),
            "processed"
        );
        store.commit(checkpoint, table.clone());
        document.nodes = nodes;

        if self.config.camel_case {
            Ok(table.to_camel_case())
        } else {
            Ok(table)
        }
    }

    /// Parse, scope and serialize a stylesheet.
    pub fn process_str(
        &self,
        path: impl AsRef<Path>,
        css: &str,
        store: &mut ModuleStore,
    ) -> Result<Output> {
        let mut document = Document::parse(path, css)?;
        let translations = self.process(&mut document, store)?;

        Ok(Output {
            css: document.to_string(),
            translations,
        })
    }

    /// Read a stylesheet from disk and scope it.
    pub fn process_file(&self, path: impl AsRef<Path>, store: &mut ModuleStore) -> Result<Output> {
        let path = path.as_ref();
        let css = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        self.process_str(path, &css, store)
    }
}

/// Scope one document with a one-off [`Processor`].
pub fn process(
    document: &mut Document,
    store: &mut ModuleStore,
    config: &Config,
) -> Result<TranslationTable> {
    Processor::new(config.clone()).process(document, store)
}

/// A processor and the store it fills, shareable across threads.
///
/// The store lock is held for a whole document, so documents processed
/// through clones of one session never interleave.
#[derive(Clone)]
pub struct Session {
    processor: Arc<Processor>,
    store: Arc<Mutex<ModuleStore>>,
}

impl Session {
    /// Create a session with an empty store.
    pub fn new(config: Config) -> Self {
        Self {
            processor: Arc::new(Processor::new(config)),
            store: Arc::new(Mutex::new(ModuleStore::new())),
        }
    }

    /// The session's processor.
    pub fn processor(&self) -> &Processor {
        &self.processor
    }

    /// Scope a parsed document.
    pub fn process(&self, document: &mut Document) -> Result<TranslationTable> {
        let mut store = self.store.lock();
        self.processor.process(document, &mut store)
    }

    /// Parse, scope and serialize a stylesheet.
    pub fn process_str(&self, path: impl AsRef<Path>, css: &str) -> Result<Output> {
        let mut store = self.store.lock();
        self.processor.process_str(path, css, &mut store)
    }

    /// Read a stylesheet from disk and scope it.
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<Output> {
        let mut store = self.store.lock();
        self.processor.process_file(path, &mut store)
    }

    /// The stored table for a file, keyed by its normalized path.
    pub fn translations(&self, path: impl AsRef<Path>) -> Option<TranslationTable> {
        let key = normalize(path.as_ref());
        self.store.lock().table(&key).cloned()
    }

    /// Forget every processed file.
    pub fn reset(&self) {
        self.store.lock().reset();
        tracing::debug!(target: targets::PROCESS, "module store reset");
    }

    /// Lock the store for inspection.
    pub fn store(&self) -> MutexGuard<'_, ModuleStore> {
        self.store.lock()
    }
}
