//! Header-based document segmentation

use tracing::debug;

use super::Sections;

/// Section headers recognized when no vocabulary is configured
pub const DEFAULT_SECTION_HEADERS: &[&str] = &[
    "ABSTRACT",
    "BACKGROUND",
    "INTRODUCTION",
    "METHODS",
    "RESULTS",
    "ADVERSE EVENTS",
    "DISCUSSION",
    "CONCLUSION",
    "CONCLUSIONS",
];

/// Canonical header names, uppercase and deduplicated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVocabulary {
    headers: Vec<String>,
}

impl SectionVocabulary {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical: Vec<String> = Vec::new();

        for header in headers {
            let name = header.as_ref().trim().to_uppercase();
            if !name.is_empty() && !canonical.contains(&name) {
                canonical.push(name);
            }
        }

        Self { headers: canonical }
    }

    /// Canonical name when the whole line, ignoring surrounding whitespace, is a known header
    pub fn match_line(&self, line: &str) -> Option<&str> {
        let candidate = line.trim().to_uppercase();
        if candidate.is_empty() {
            return None;
        }

        self.headers
            .iter()
            .find(|h| **h == candidate)
            .map(String::as_str)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

impl Default for SectionVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SECTION_HEADERS.iter().copied())
    }
}

/// Splits raw text into named sections
#[derive(Debug, Clone, Default)]
pub struct DocumentSegmenter {
    vocabulary: SectionVocabulary,
}

impl DocumentSegmenter {
    pub fn new(vocabulary: SectionVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &SectionVocabulary {
        &self.vocabulary
    }

    /// Segment on lines that are exactly a header (case-insensitive).
    ///
    /// Surrounding whitespace on a line is ignored when matching, so an
    /// indented `  RESULTS  ` is a header. Text before the first header is dropped. Body lines are trimmed and
    /// joined with single spaces; blank lines are skipped. A header that
    /// appears twice extends the first occurrence. No headers yields an
    /// empty mapping.
    pub fn segment(&self, text: &str) -> Sections {
        let mut sections = Sections::new();
        let mut current: Option<&str> = None;
        let mut preamble_lines = 0usize;

        for line in text.lines() {
            if let Some(header) = self.vocabulary.match_line(line) {
                current = Some(header);
                sections.append(header, "");
                continue;
            }

            let body = line.trim();
            if body.is_empty() {
                continue;
            }

            match current {
                Some(name) => sections.append(name, body),
                None => preamble_lines += 1,
            }
        }

        debug!(
            "Segmented document into {} sections ({} preamble lines dropped)",
            sections.len(),
            preamble_lines
        );

        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIAL: &str = "
INTRODUCTION
This clinical trial investigates the effects of Drug A on patients with lupus.

METHODS
The study was conducted on 200 participants,
each receiving 50mg of Drug A daily.

RESULTS
The results showed a 70% improvement in symptoms over 5 years.
";

    #[test]
    fn test_segments_headers_in_order() {
        let sections = DocumentSegmenter::default().segment(TRIAL);

        assert_eq!(
            sections.names().collect::<Vec<_>>(),
            vec!["INTRODUCTION", "METHODS", "RESULTS"]
        );
        assert_eq!(
            sections.get("METHODS").unwrap().text,
            "The study was conducted on 200 participants, each receiving 50mg of Drug A daily."
        );
        assert_eq!(
            sections.get("RESULTS").unwrap().text,
            "The results showed a 70% improvement in symptoms over 5 years."
        );
    }

    #[test]
    fn test_no_headers_yields_empty_mapping() {
        let sections = DocumentSegmenter::default().segment("Just a paragraph.\nAnother line.");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_preamble_is_discarded() {
        let text = "Journal of Trials, vol. 3\nRESULTS\nResponse rate 40%.";
        let sections = DocumentSegmenter::default().segment(text);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections.get("RESULTS").unwrap().text, "Response rate 40%.");
    }

    #[test]
    fn test_headers_match_case_insensitively_on_whole_line() {
        let text = "Adverse Events\nMild nausea.\nResults were good\nstill adverse events body";
        let sections = DocumentSegmenter::default().segment(text);

        assert_eq!(sections.names().collect::<Vec<_>>(), vec!["ADVERSE EVENTS"]);
        assert_eq!(
            sections.get("ADVERSE EVENTS").unwrap().text,
            "Mild nausea. Results were good still adverse events body"
        );
    }

    #[test]
    fn test_indented_header_is_recognized() {
        let text = "  RESULTS  \n\t70% improvement over 5 years\nRESULTS of the survey";
        let sections = DocumentSegmenter::default().segment(text);

        assert_eq!(sections.names().collect::<Vec<_>>(), vec!["RESULTS"]);
        assert_eq!(
            sections.get("RESULTS").unwrap().text,
            "70% improvement over 5 years RESULTS of the survey"
        );
    }

    #[test]
    fn test_repeated_header_is_deduplicated() {
        let text = "RESULTS\nfirst\nDISCUSSION\nmiddle\nresults\nsecond";
        let sections = DocumentSegmenter::default().segment(text);

        assert_eq!(
            sections.names().collect::<Vec<_>>(),
            vec!["RESULTS", "DISCUSSION"]
        );
        assert_eq!(sections.get("RESULTS").unwrap().text, "first second");
    }

    #[test]
    fn test_custom_vocabulary_is_canonicalized() {
        let vocabulary = SectionVocabulary::new(["Findings", "findings ", "Safety"]);
        assert_eq!(vocabulary.headers(), &["FINDINGS".to_string(), "SAFETY".to_string()]);

        let sections = DocumentSegmenter::new(vocabulary).segment("findings\nx\nRESULTS\ny");
        assert_eq!(sections.get("FINDINGS").unwrap().text, "x RESULTS y");
    }
}
