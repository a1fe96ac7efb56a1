use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::change::ChangeField;

// Template variables come first so `{{ name }}` is captured whole rather
// than as a `{...}` token with a dangling brace.
static FORMAT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\{\{[^\}\n]*\}\})|(?:\{[^\}\n]*\})|(?:%\([^\)]*\)[acdefgiorsux])")
        .expect("valid regex literal")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There should be {expected} formating token(s) in the source text and the translation.")]
pub struct ValidationError {
    pub field: ChangeField,
    pub expected: usize,
    pub found: usize,
}

pub fn extract_tokens(text: &str) -> Vec<&str> {
    FORMAT_TOKEN.find_iter(text).map(|found| found.as_str()).collect()
}

pub fn check_tokens(source_text: &str, translated_text: &str) -> Result<(), ValidationError> {
    if translated_text.is_empty() {
        return Ok(());
    }
    let expected = extract_tokens(source_text).len();
    let found = extract_tokens(translated_text).len();
    if expected == found {
        Ok(())
    } else {
        Err(ValidationError {
            field: ChangeField::Translation,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{check_tokens, extract_tokens};
    use crate::change::ChangeField;

    #[test]
    fn accepts_renamed_tokens_with_equal_count() {
        assert!(check_tokens("Hi {name}", "Bonjour {nom}").is_ok());
        assert!(check_tokens("Order is not really {important}, {ok}", "{ok}, l'ordre n'est pas tres {important}.").is_ok());
    }

    #[test]
    fn rejects_missing_token() {
        let err = check_tokens("Hi {name}", "Bonjour").expect_err("missing");
        assert_eq!(err.expected, 1);
        assert_eq!(err.found, 0);
        assert_eq!(err.field, ChangeField::Translation);
    }

    #[test]
    fn accepts_empty_translation() {
        assert!(check_tokens("Order is not really {important}, {ok}", "").is_ok());
    }

    #[test]
    fn rejects_extra_token_in_translation() {
        assert!(check_tokens("Nothing to format.", "Rien a formater {{ actuellement }}.").is_err());
        assert!(check_tokens("Nothing {{ important }} to format.", "Rien {{ important }} a formater {{ lol }}.").is_err());
    }

    #[test]
    fn error_reports_expected_count() {
        let err = check_tokens("Something {important} to {1} format {}.", "Rien a formater.")
            .expect_err("mismatch");
        assert_eq!(
            err.to_string(),
            "There should be 3 formating token(s) in the source text and the translation."
        );
    }

    #[test]
    fn recognizes_percent_tokens_with_legal_conversions() {
        assert!(extract_tokens("foo %(bar) baz").is_empty());
        for conversion in "acdefgiorsux".chars() {
            let text = format!("foo %(bar){conversion} baz");
            assert_eq!(extract_tokens(&text), vec![format!("%(bar){conversion}")]);
        }
        for conversion in "bhjklmnpqtvwyz".chars() {
            let text = format!("foo %(bar){conversion} baz");
            assert!(extract_tokens(&text).is_empty());
        }
    }

    #[test]
    fn captures_template_variables_whole() {
        assert_eq!(extract_tokens("Hi {{ user.name }}!"), vec!["{{ user.name }}"]);
        assert_eq!(extract_tokens("{0} and {}"), vec!["{0}", "{}"]);
    }
}
