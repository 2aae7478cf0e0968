// ============================================================
// Layer 4 — Text Composer
// ============================================================
// Builds the single text field the classifier reads:
//
//   Question: {question}
//   Answer: {interview_answer}
//
// Substitution is verbatim: no trimming, case folding, or
// escaping. Two records with the same question and answer
// always produce byte-identical text.

use crate::domain::record::RawRecord;

pub struct TextComposer;

impl TextComposer {
    pub fn new() -> Self {
        Self
    }

    /// Fill the template with both fields exactly as given.
    pub fn compose(&self, question: &str, interview_answer: &str) -> String {
        format!("Question: {question}\nAnswer: {interview_answer}")
    }

    /// Model text for a record, or `None` when either source field is missing.
    pub fn compose_record(&self, record: &RawRecord<'_>) -> Option<String> {
        match (record.question, record.interview_answer) {
            (Some(q), Some(a)) => Some(self.compose(q, a)),
            _ => None,
        }
    }
}

impl Default for TextComposer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_template() {
        let c = TextComposer::new();
        assert_eq!(c.compose("Q1", "A1"), "Question: Q1\nAnswer: A1");
    }

    #[test]
    fn test_no_normalisation() {
        let c = TextComposer::new();
        assert_eq!(
            c.compose("  Why?  ", "Well,\n\tno."),
            "Question:   Why?  \nAnswer: Well,\n\tno."
        );
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let c = TextComposer::new();
        let fields_a = vec!["x".to_string()];
        let fields_b = vec!["y".to_string()];
        let a = RawRecord {
            question:         Some("Is water wet?"),
            interview_answer: Some("yes"),
            label:            Some("Clear Reply"),
            fields:           &fields_a,
        };
        let b = RawRecord {
            question:         Some("Is water wet?"),
            interview_answer: Some("yes"),
            label:            None,
            fields:           &fields_b,
        };
        assert_eq!(c.compose_record(&a), c.compose_record(&b));
    }

    #[test]
    fn test_missing_field_yields_none() {
        let c = TextComposer::new();
        let fields = Vec::new();
        let rec = RawRecord {
            question:         Some("Q"),
            interview_answer: None,
            label:            None,
            fields:           &fields,
        };
        assert_eq!(c.compose_record(&rec), None);
    }
}
