//! `forsooth check` — validate a rule document.

use std::path::Path;

use crate::error::ExitCode;
use crate::rules::RuleSet;

/// Loads the document and reports its table sizes.
pub fn run(rules_path: &Path) -> i32 {
    let rules = RuleSet::load(rules_path);
    if !rules.is_valid() {
        eprintln!(
            "{}: invalid rule document, the engine would pass text through unchanged",
            rules_path.display()
        );
        return ExitCode::CONFIG_ERROR;
    }

    println!(
        "{}: ok ({} rules, {} prepend phrases, {} append phrases)",
        rules_path.display(),
        rules.rules().len(),
        rules.prepend_pool().len(),
        rules.append_pool().len()
    );
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn valid_document_exits_zero() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"{
                "prepended_words": {"Hark!": 1},
                "appended_words": {"Verily!": 1},
                "word_replacements": [{"word": ["horse"], "replacement": ["steed"]}]
            }"#,
        )
        .unwrap();
        assert_eq!(run(file.path()), ExitCode::SUCCESS);
    }

    #[test]
    fn invalid_document_exits_with_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert_eq!(run(file.path()), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn missing_document_exits_with_config_error() {
        assert_eq!(
            run(Path::new("/nonexistent/rules.json")),
            ExitCode::CONFIG_ERROR
        );
    }
}
