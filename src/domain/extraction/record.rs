//! Structured extraction record

use serde::{Deserialize, Deserializer, Serialize};

/// Bibliographic metadata of the trial report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyMetadata {
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
}

impl StudyMetadata {
    pub fn is_empty(&self) -> bool {
        self.authors.is_empty() && self.publication_date.is_none() && self.journal.is_none()
    }
}

/// One extracted fact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFeature {
    pub description: String,
    /// Models return numbers and booleans as often as strings
    #[serde(default, deserialize_with = "scalar_as_text")]
    pub value: String,
}

impl ExtractedFeature {
    pub fn new(description: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            value: value.into(),
        }
    }
}

/// Extraction output refined across iterations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedData {
    pub description: String,
    pub metadata: StudyMetadata,
    pub extracted_features: Vec<ExtractedFeature>,
}

impl ExtractedData {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: StudyMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_feature(mut self, description: impl Into<String>, value: impl Into<String>) -> Self {
        self.extracted_features
            .push(ExtractedFeature::new(description, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_empty()
            && self.metadata.is_empty()
            && self.extracted_features.is_empty()
    }

    /// Case-insensitive substring match against any feature description
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.extracted_features
            .iter()
            .any(|f| f.description.to_lowercase().contains(&term))
    }

    /// Value of the first feature whose description contains the question
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        let needle = question.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.extracted_features
            .iter()
            .find(|f| f.description.to_lowercase().contains(&needle))
            .map(|f| f.value.as_str())
    }
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{
            "description": "Randomized trial of Drug A in lupus",
            "metadata": {"authors": ["Smith", "Lee"], "publication_date": "2021-04-01", "journal": "NEJM"},
            "extracted_features": [
                {"description": "Number of participants", "value": 200},
                {"description": "Blinded", "value": true},
                {"description": "Outcomes", "value": "70% improvement"}
            ]
        }"#;

        let data: ExtractedData = serde_json::from_str(json).unwrap();

        assert_eq!(data.metadata.authors, vec!["Smith", "Lee"]);
        assert_eq!(data.extracted_features[0].value, "200");
        assert_eq!(data.extracted_features[1].value, "true");
        assert_eq!(data.extracted_features[2].value, "70% improvement");
    }

    #[test]
    fn test_deserialize_partial_record() {
        let data: ExtractedData =
            serde_json::from_str(r#"{"extracted_features": [{"description": "Journal"}]}"#).unwrap();

        assert!(data.description.is_empty());
        assert!(data.metadata.is_empty());
        assert_eq!(data.extracted_features[0].value, "");
    }

    #[test]
    fn test_mentions_is_case_insensitive() {
        let data = ExtractedData::new("x").with_feature("Primary OUTCOMES", "remission");
        assert!(data.mentions("outcomes"));
        assert!(!data.mentions("adverse events"));
    }

    #[test]
    fn test_answer_for() {
        let data = ExtractedData::new("x")
            .with_feature("What is the study design? Randomized", "RCT");

        assert_eq!(data.answer_for("what is the study design?"), Some("RCT"));
        assert_eq!(data.answer_for("What adverse events were reported?"), None);
        assert_eq!(data.answer_for("  "), None);
    }

    #[test]
    fn test_empty_metadata_fields_are_skipped() {
        let json = serde_json::to_value(ExtractedData::new("summary")).unwrap();
        assert!(json["metadata"].get("journal").is_none());
        assert_eq!(json["metadata"]["authors"], serde_json::json!([]));
    }
}
