//! Extraction of structured records from LLM-authored analysis text.
//!
//! The analysis prompt asks the model for numbered markdown entries with
//! fixed-label fields. Matching is a single multiline pattern requiring the
//! exact labels in the exact order; entries that deviate (missing field,
//! reordered fields, alternate punctuation) are silently dropped rather than
//! partially parsed.
//!
//! Known fragility, inherited deliberately: both the entry template and the
//! `Cover match:` line depend on the model following the prompt's phrasing
//! to the letter. There is no recovery path when it does not.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder the prompt tells the model to emit for undocumented results.
const NO_DOCSTRING: &str = "(No docstring provided)";

static RESULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)\*\*(\d+)\. [^*]+\*\*\n",
        r"- \*\*Lean Name\*\*: `([^`]+)`\n",
        r"- \*\*Type\*\*: ([^\n]+)\n",
        r"- \*\*Statement\*\*: `([^`]+)`\n",
        r"- \*\*Relevance\*\*: ([^\n]+)\n",
        r"- \*\*Module\*\*: ([^\n]+)\n",
        r"(?:- \*\*Documentation\*\*: ([^\n]+))?",
    ))
    .expect("analysis result pattern is valid")
});

/// One structured record extracted from the analysis text.
///
/// Records are independent of each other; their only relationship is ordinal
/// position in the source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// The entry's number in the analysis text.
    pub index: u32,
    /// Fully qualified Lean declaration name.
    pub lean_name: String,
    /// Declaration kind (theorem, lemma, definition, ...).
    pub r#type: String,
    /// Statement text.
    pub statement: String,
    /// Why the model considers the entry relevant.
    pub relevance: String,
    /// Module the declaration lives in.
    pub module: String,
    /// Docstring, absent when the model emitted the placeholder.
    pub documentation: Option<String>,
}

/// Parse all well-formed numbered entries out of `text`, in input order.
pub fn parse_analysis(text: &str) -> Vec<AnalysisRecord> {
    RESULT_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let index: u32 = caps.get(1)?.as_str().parse().ok()?;
            let documentation = caps
                .get(7)
                .map(|m| m.as_str().trim().to_string())
                .filter(|d| !d.is_empty() && d != NO_DOCSTRING);
            Some(AnalysisRecord {
                index,
                lean_name: caps.get(2)?.as_str().trim().to_string(),
                r#type: caps.get(3)?.as_str().trim().to_string(),
                statement: caps.get(4)?.as_str().trim().to_string(),
                relevance: caps.get(5)?.as_str().trim().to_string(),
                module: caps.get(6)?.as_str().trim().to_string(),
                documentation,
            })
        })
        .collect()
}

/// Extract the cover-match value from the analysis text.
///
/// Scans for the first line containing the literal `Cover match` and a
/// colon; the value is everything after the first colon, trimmed with
/// backticks stripped. The literal `None` maps to absent.
pub fn extract_cover_match(text: &str) -> Option<String> {
    for line in text.lines() {
        if line.contains("Cover match") {
            if let Some((_, value)) = line.split_once(':') {
                let value = value.trim().trim_matches('`').to_string();
                if value == "None" || value.is_empty() {
                    return None;
                }
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: u32, name: &str, with_doc: Option<&str>) -> String {
        let mut text = format!(
            "**{index}. Some heading**\n\
             - **Lean Name**: `{name}`\n\
             - **Type**: theorem\n\
             - **Statement**: `theorem {name} : True`\n\
             - **Relevance**: Directly answers the query\n\
             - **Module**: Mathlib.Algebra.Group.Basic\n"
        );
        if let Some(doc) = with_doc {
            text.push_str(&format!("- **Documentation**: {doc}\n"));
        }
        text
    }

    #[test]
    fn test_parses_well_formed_entries_in_order() {
        let text = format!(
            "{}\n{}\n{}",
            entry(1, "Nat.add_comm", Some("Addition commutes.")),
            entry(2, "Nat.mul_comm", None),
            entry(3, "Nat.add_assoc", Some("Addition associates."))
        );
        let records = parse_analysis(&text);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].lean_name, "Nat.add_comm");
        assert_eq!(records[0].documentation.as_deref(), Some("Addition commutes."));
        assert_eq!(records[1].lean_name, "Nat.mul_comm");
        assert!(records[1].documentation.is_none());
        assert_eq!(records[2].index, 3);
    }

    #[test]
    fn test_malformed_entry_is_dropped() {
        // Second entry is missing the Module field entirely.
        let malformed = "**2. Broken**\n\
                         - **Lean Name**: `Bad.name`\n\
                         - **Type**: theorem\n\
                         - **Statement**: `x`\n\
                         - **Relevance**: none\n";
        let text = format!(
            "{}\n{}\n{}",
            entry(1, "Nat.add_comm", None),
            malformed,
            entry(3, "Nat.add_assoc", None)
        );
        let records = parse_analysis(&text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].lean_name, "Nat.add_comm");
        assert_eq!(records[1].lean_name, "Nat.add_assoc");
    }

    #[test]
    fn test_reordered_fields_are_dropped() {
        let reordered = "**1. Heading**\n\
                         - **Type**: theorem\n\
                         - **Lean Name**: `X`\n\
                         - **Statement**: `x`\n\
                         - **Relevance**: r\n\
                         - **Module**: M\n";
        assert!(parse_analysis(reordered).is_empty());
    }

    #[test]
    fn test_docstring_placeholder_normalized() {
        let text = entry(1, "Nat.add_comm", Some("(No docstring provided)"));
        let records = parse_analysis(&text);
        assert_eq!(records.len(), 1);
        assert!(records[0].documentation.is_none());
    }

    #[test]
    fn test_empty_text_yields_no_records() {
        assert!(parse_analysis("").is_empty());
        assert!(parse_analysis("free prose with no entries").is_empty());
    }

    #[test]
    fn test_cover_match_value() {
        assert_eq!(
            extract_cover_match("Analysis...\nCover match: foo\n"),
            Some("foo".to_string())
        );
    }

    #[test]
    fn test_cover_match_none_literal() {
        assert_eq!(extract_cover_match("Cover match: None"), None);
    }

    #[test]
    fn test_cover_match_strips_backticks() {
        assert_eq!(
            extract_cover_match("**Cover match**: `Nat.add_comm`"),
            Some("Nat.add_comm".to_string())
        );
    }

    #[test]
    fn test_cover_match_first_line_wins() {
        let text = "Cover match: first\nCover match: second";
        assert_eq!(extract_cover_match(text), Some("first".to_string()));
    }

    #[test]
    fn test_cover_match_absent() {
        assert_eq!(extract_cover_match("no such line here"), None);
        assert_eq!(extract_cover_match("Cover match without colon"), None);
    }
}
