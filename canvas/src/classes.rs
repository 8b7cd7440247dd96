//! Class-name list used for labels.
//!
//! Boxes store integer class ids only; names are a display concern. Two file
//! shapes are accepted: a YOLO dataset YAML with a `names:` key (either a list
//! or an id→name map), and plain text with one name per line.

#[cfg(test)]
#[path = "classes_test.rs"]
mod classes_test;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClassNamesError {
    #[error("invalid class YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("class YAML has no `names` key")]
    MissingNames,
}

#[derive(Deserialize)]
struct DatasetYaml {
    names: Option<NamesField>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NamesField {
    List(Vec<String>),
    Map(HashMap<u32, String>),
}

/// Ordered mapping from class id to display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassNames {
    names: BTreeMap<u32, String>,
}

impl ClassNames {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a dataset YAML document's `names` entry.
    pub fn from_yaml(text: &str) -> Result<Self, ClassNamesError> {
        let doc: DatasetYaml = serde_yaml::from_str(text)?;
        let names = match doc.names.ok_or(ClassNamesError::MissingNames)? {
            NamesField::List(list) => (0u32..).zip(list).collect(),
            NamesField::Map(map) => map.into_iter().collect(),
        };
        Ok(Self { names })
    }

    /// Parse a plain list, one name per line. Blank lines are skipped but still consume an id.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let names = (0u32..)
            .zip(text.lines())
            .filter_map(|(id, line)| {
                let name = line.trim();
                (!name.is_empty()).then(|| (id, name.to_string()))
            })
            .collect();
        Self { names }
    }

    /// Display name for `id`, falling back to `"Class {id}"`.
    #[must_use]
    pub fn name(&self, id: u32) -> Cow<'_, str> {
        match self.names.get(&id) {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Owned(format!("Class {id}")),
        }
    }

    /// Append a class after the highest existing id and return its id.
    pub fn add(&mut self, name: impl Into<String>) -> u32 {
        let id = self.names.keys().next_back().map_or(0, |max| max + 1);
        self.names.insert(id, name.into());
        id
    }

    /// Serialize as plain text, filling gaps with `class_{id}`.
    #[must_use]
    pub fn to_text(&self) -> String {
        let Some(&max) = self.names.keys().next_back() else {
            return String::new();
        };
        (0..=max)
            .map(|id| match self.names.get(&id) {
                Some(name) => format!("{name}\n"),
                None => format!("class_{id}\n"),
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
