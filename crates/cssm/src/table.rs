//! Per-document class name translations.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::logging::targets;
use crate::naming::{NameGenerator, Seed};
use crate::Result;

/// Mapping from original class names to scoped names for one document.
///
/// Within one document a class name maps to exactly one scoped name:
/// [`translate`](Self::translate) generates a name on first use and returns
/// the memoized value afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranslationTable {
    names: BTreeMap<String, String>,
}

impl TranslationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the scoped name for `class_name`, generating it on first use.
    pub fn translate(
        &mut self,
        class_name: &str,
        seed: &Seed<'_>,
        generator: &dyn NameGenerator,
    ) -> String {
        if let Some(scoped) = self.names.get(class_name) {
            return scoped.clone();
        }

        let scoped = generator.generate(class_name, seed);
        self.names.insert(class_name.to_string(), scoped.clone());
        scoped
    }

    /// Bind a label to a name that was scoped by another document.
    pub fn bind(&mut self, label: impl Into<String>, scoped: impl Into<String>) {
        self.names.insert(label.into(), scoped.into());
    }

    /// Get the scoped name for a class.
    pub fn get(&self, class_name: &str) -> Option<&str> {
        self.names.get(class_name).map(|s| s.as_str())
    }

    /// Check if a class has been translated.
    pub fn contains(&self, class_name: &str) -> bool {
        self.names.contains_key(class_name)
    }

    /// Get the number of translated classes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over `(class, scoped)` pairs in class name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy the table with dashed keys converted to camelCase.
    ///
    /// Only keys change: `my-class` becomes `myClass`, values are kept.
    pub fn to_camel_case(&self) -> Self {
        let mut names = BTreeMap::new();
        for (key, value) in &self.names {
            let converted = dashes_camel_case(key);
            if let Some(previous) = names.insert(converted.clone(), value.clone()) {
                tracing::warn!(
                    target: targets::PROCESS,
                    "camelCase key '{}' from '{}' replaces '{}'",
                    converted,
                    key,
                    previous
                );
            }
        }
        Self { names }
    }

    /// Serialize the table as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl<'a> IntoIterator for &'a TranslationTable {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl FromIterator<(String, String)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// A run of dashes followed by an ASCII word character.
static DASHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+((?-u:\w))").expect("valid camelCase pattern"));

/// Replace every run of dashes followed by a word character with that
/// character uppercased.
fn dashes_camel_case(name: &str) -> String {
    DASHES
        .replace_all(name, |caps: &Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}
