//! Column inference: propose a selection from header names alone.

use regex::Regex;

use crate::spec::{BatchError, SpecColumnSelection, SpecInferOptions};

/// Compiled header-name matchers.
#[derive(Debug, Clone)]
pub struct ColumnInferrer {
    regex_full_name: Regex,
    regex_first_name: Regex,
    regex_last_name: Regex,
}

impl ColumnInferrer {
    /// Compile `options` into whole-name, case-insensitive matchers.
    pub fn new(options: &SpecInferOptions) -> Result<Self, BatchError> {
        Ok(Self {
            regex_full_name: compile_name_patterns(&options.patterns_full_name)?,
            regex_first_name: compile_name_patterns(&options.patterns_first_name)?,
            regex_last_name: compile_name_patterns(&options.patterns_last_name)?,
        })
    }

    /// Propose a selection for `columns`.
    ///
    /// Names are matched after trimming and collapsing inner whitespace runs
    /// to one space; the selection keeps the original name.
    ///
    /// A full-name column wins over a first-name column. Within one category
    /// the last matching column in header order is kept. The last-name column
    /// is chosen independently.
    pub fn infer(&self, columns: &[String]) -> SpecColumnSelection {
        let mut c_full_name: Option<&str> = None;
        let mut c_first_name: Option<&str> = None;
        let mut c_last_name: Option<&str> = None;

        for c_name in columns {
            let c_normalized = normalize_header_name(c_name);
            if self.regex_full_name.is_match(&c_normalized) {
                c_full_name = Some(c_name);
            } else if self.regex_first_name.is_match(&c_normalized) {
                c_first_name = Some(c_name);
            } else if self.regex_last_name.is_match(&c_normalized) {
                c_last_name = Some(c_name);
            }
        }

        let selection = SpecColumnSelection::new(c_full_name.or(c_first_name), c_last_name);
        tracing::debug!(
            first_column = selection.first_column.as_deref(),
            last_column = selection.last_column.as_deref(),
            "columns inferred"
        );
        selection
    }
}

fn normalize_header_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn compile_name_patterns(patterns: &[String]) -> Result<Regex, BatchError> {
    // An empty alternation must match nothing rather than the empty name.
    if patterns.is_empty() {
        return Regex::new(r"[^\s\S]")
            .map_err(|e| BatchError::InvalidPattern(format!("Invalid column pattern: {e}")));
    }
    let c_body = patterns
        .iter()
        .map(|pattern| format!("(?:{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)^(?:{c_body})$"))
        .map_err(|e| BatchError::InvalidPattern(format!("Invalid column pattern: {e}")))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn inferrer() -> ColumnInferrer {
        ColumnInferrer::new(&SpecInferOptions::default()).expect("default patterns")
    }

    #[test]
    fn infer_picks_full_name_column() {
        let selection = inferrer().infer(&cols(&["ID", "Full Name", "Email"]));
        assert_eq!(selection.first_column.as_deref(), Some("Full Name"));
        assert_eq!(selection.last_column, None);
    }

    #[test]
    fn infer_picks_first_and_last_columns() {
        let selection = inferrer().infer(&cols(&["fname", "LNAME", "Table"]));
        assert_eq!(selection.first_column.as_deref(), Some("fname"));
        assert_eq!(selection.last_column.as_deref(), Some("LNAME"));

        let selection = inferrer().infer(&cols(&["Given Name", "Family Name"]));
        assert_eq!(selection.first_column.as_deref(), Some("Given Name"));
        assert_eq!(selection.last_column.as_deref(), Some("Family Name"));
    }

    #[test]
    fn infer_full_name_outranks_first_name() {
        let selection = inferrer().infer(&cols(&["Name", "First", "Surname"]));
        assert_eq!(selection.first_column.as_deref(), Some("Name"));
        assert_eq!(selection.last_column.as_deref(), Some("Surname"));
    }

    #[test]
    fn infer_last_match_wins_within_category() {
        let selection = inferrer().infer(&cols(&["First Name", "first", "Last", "surname"]));
        assert_eq!(selection.first_column.as_deref(), Some("first"));
        assert_eq!(selection.last_column.as_deref(), Some("surname"));
    }

    #[test]
    fn infer_requires_whole_name_match() {
        let selection = inferrer().infer(&cols(&["Company Name", "first_name", "Last-Name"]));
        assert_eq!(selection, SpecColumnSelection::default());
    }

    #[test]
    fn infer_normalizes_header_whitespace() {
        let selection = inferrer().infer(&cols(&["First Name ", "Last Name "]));
        assert_eq!(selection.first_column.as_deref(), Some("First Name "));
        assert_eq!(selection.last_column.as_deref(), Some("Last Name "));

        let selection = inferrer().infer(&cols(&["First  Name", "Last\tName"]));
        assert_eq!(selection.first_column.as_deref(), Some("First  Name"));
        assert_eq!(selection.last_column.as_deref(), Some("Last\tName"));

        let selection = inferrer().infer(&cols(&[" Name", "  family   name  "]));
        assert_eq!(selection.first_column.as_deref(), Some(" Name"));
        assert_eq!(selection.last_column.as_deref(), Some("  family   name  "));
    }

    #[test]
    fn inferrer_rejects_invalid_pattern() {
        let options = SpecInferOptions {
            patterns_full_name: vec!["(".to_string()],
            ..SpecInferOptions::default()
        };
        let err = ColumnInferrer::new(&options).expect_err("invalid regex must fail");
        assert!(matches!(err, BatchError::InvalidPattern(_)));
    }

    #[test]
    fn inferrer_with_no_patterns_matches_nothing() {
        let options = SpecInferOptions {
            patterns_full_name: vec![],
            patterns_first_name: vec![],
            patterns_last_name: vec!["nom".to_string()],
        };
        let selection = ColumnInferrer::new(&options)
            .expect("compile")
            .infer(&cols(&["", "Name", "NOM"]));
        assert_eq!(selection.first_column, None);
        assert_eq!(selection.last_column.as_deref(), Some("NOM"));
    }

    proptest! {
        #[test]
        fn infer_is_a_pure_function_of_columns(
            names in proptest::collection::vec("[A-Za-z ]{0,12}", 0..8)
        ) {
            let inferrer = inferrer();
            let selection_a = inferrer.infer(&names);
            let selection_b = inferrer.infer(&names);
            prop_assert_eq!(&selection_a, &selection_b);
            if let Some(c_first) = &selection_a.first_column {
                prop_assert!(names.contains(c_first));
            }
        }
    }
}
