//! Structural validation of raw extraction output

use std::fmt::Debug;

use serde::Serialize;
use serde_json::Value;

/// Outcome of validating one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Schema/validation capability
pub trait RecordValidator: Send + Sync + Debug {
    fn validate(&self, record: &Value) -> ValidationReport;
}

/// Checks the extraction record layout
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionSchemaValidator;

impl RecordValidator for ExtractionSchemaValidator {
    fn validate(&self, record: &Value) -> ValidationReport {
        let mut errors = Vec::new();

        let Some(object) = record.as_object() else {
            return ValidationReport::from_errors(vec!["record must be an object".to_string()]);
        };

        if let Some(description) = object.get("description") {
            if !description.is_string() {
                errors.push("description must be a string".to_string());
            }
        }

        if let Some(metadata) = object.get("metadata") {
            validate_metadata(metadata, &mut errors);
        }

        if let Some(features) = object.get("extracted_features") {
            validate_features(features, &mut errors);
        }

        ValidationReport::from_errors(errors)
    }
}

fn validate_metadata(metadata: &Value, errors: &mut Vec<String>) {
    let Some(metadata) = metadata.as_object() else {
        errors.push("metadata must be an object".to_string());
        return;
    };

    if let Some(authors) = metadata.get("authors") {
        match authors.as_array() {
            Some(items) => {
                for (i, author) in items.iter().enumerate() {
                    if !author.is_string() {
                        errors.push(format!("metadata.authors[{}] must be a string", i));
                    }
                }
            }
            None => errors.push("metadata.authors must be an array".to_string()),
        }
    }

    for key in ["publication_date", "journal"] {
        if let Some(value) = metadata.get(key) {
            if !value.is_string() && !value.is_null() {
                errors.push(format!("metadata.{} must be a string", key));
            }
        }
    }
}

fn validate_features(features: &Value, errors: &mut Vec<String>) {
    let Some(items) = features.as_array() else {
        errors.push("extracted_features must be an array".to_string());
        return;
    };

    for (i, item) in items.iter().enumerate() {
        let Some(feature) = item.as_object() else {
            errors.push(format!("extracted_features[{}] must be an object", i));
            continue;
        };

        match feature.get("description") {
            Some(Value::String(_)) => {}
            Some(_) => errors.push(format!(
                "extracted_features[{}].description must be a string",
                i
            )),
            None => errors.push(format!(
                "extracted_features[{}].description is required",
                i
            )),
        }

        if let Some(value) = feature.get("value") {
            if value.is_array() || value.is_object() {
                errors.push(format!("extracted_features[{}].value must be a scalar", i));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_record() {
        let record = json!({
            "description": "Trial",
            "metadata": {"authors": ["Smith"], "publication_date": "2021", "journal": "BMJ"},
            "extracted_features": [{"description": "Outcomes", "value": "70%"}]
        });

        let report = ExtractionSchemaValidator.validate(&record);
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_invalid_record_collects_all_errors() {
        let record = json!({
            "description": 5,
            "metadata": {"authors": "Smith"},
            "extracted_features": [{"value": [1, 2]}, "oops"]
        });

        let report = ExtractionSchemaValidator.validate(&record);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "description must be a string",
                "metadata.authors must be an array",
                "extracted_features[0].description is required",
                "extracted_features[0].value must be a scalar",
                "extracted_features[1] must be an object",
            ]
        );
    }

    #[test]
    fn test_non_object_record() {
        let report = ExtractionSchemaValidator.validate(&json!([1, 2]));
        assert!(!report.valid);
    }
}
