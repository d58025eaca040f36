//! Clinical-trial documents and their sections

mod segmenter;
mod source;

pub use segmenter::{DEFAULT_SECTION_HEADERS, DocumentSegmenter, SectionVocabulary};
pub use source::DocumentSource;

#[cfg(test)]
pub use source::MockDocumentSource;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Raw document text with its identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    id: String,
    text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A named, contiguous body of document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Canonical uppercase header
    pub name: String,
    pub text: String,
}

impl Section {
    /// The name is trimmed and uppercased
    pub fn new(name: impl AsRef<str>, text: impl Into<String>) -> Self {
        Self {
            name: canonical_name(name.as_ref()),
            text: text.into(),
        }
    }
}

fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Ordered mapping of canonical section name to section, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections {
    entries: IndexMap<String, Section>,
}

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append body text to a section, creating it on first sight
    pub(crate) fn append(&mut self, name: &str, body: &str) {
        let key = canonical_name(name);
        let section = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Section::new(&key, String::new()));

        if body.is_empty() {
            return;
        }
        if !section.text.is_empty() {
            section.text.push(' ');
        }
        section.text.push_str(body);
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.entries.get(&canonical_name(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Section> for Sections {
    fn from_iter<T: IntoIterator<Item = Section>>(iter: T) -> Self {
        let mut sections = Sections::new();
        for section in iter {
            sections.append(&section.name, &section.text);
        }
        sections
    }
}
