//! Replacement rule tables for the speech engine.
//!
//! [`RuleSet::load`] parses an external JSON rule document into
//! immutable in-memory tables. Loading never fails: a missing file, a
//! parse error, or an empty required table produces an explicitly
//! *invalid* `RuleSet`, and an invalid `RuleSet` forces the engine into
//! pass-through mode (output == input). Defects are reported through a
//! warning-level diagnostic only; end users never see them.

mod schema;

use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::error::DataError;
use schema::{RuleDocument, coerce_count};

/// One word replacement rule.
///
/// Rules are matched in declaration order; the first rule that matches
/// a word wins. A rule with no trigger words and no trigger plurals can
/// never match and contributes no transformation.
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    /// Fire probability denominator: the rule fires with probability
    /// `1/chance`. Always >= 1.
    pub chance: u64,
    /// Number of adjectives drawn from `prepended` on a match.
    pub prepend_count: usize,
    /// Adjective candidates prepended to the replacement.
    pub prepended: Vec<String>,
    /// Replacement candidates for a singular match.
    pub singular_replacements: Vec<String>,
    /// Replacement candidates for a plural match; falls back to
    /// `singular_replacements` when empty.
    pub plural_replacements: Vec<String>,
    /// Singular trigger words.
    pub trigger_words: Vec<String>,
    /// Plural trigger words.
    pub trigger_plurals: Vec<String>,
    /// When non-empty, the rule only matches if the previous word is in
    /// this list *and* in the set of all known trigger words.
    pub required_prev: Vec<String>,
}

/// Immutable rule tables loaded from a rule document.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ReplacementRule>,
    prepend_pool: Vec<String>,
    append_pool: Vec<String>,
    /// Lowercased union of every trigger/plural/prev word.
    trigger_words: HashSet<String>,
    valid: bool,
}

impl RuleSet {
    /// Loads a rule document from a file.
    ///
    /// Never fails: any defect yields an invalid `RuleSet` and a
    /// warning.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                let err = DataError::MissingFile {
                    path: path.to_path_buf(),
                };
                warn!(%err, "speech rules disabled");
                return Self::invalid();
            }
        };

        match serde_json::from_str::<RuleDocument>(&raw) {
            Ok(doc) => Self::from_document(doc),
            Err(e) => {
                let err = DataError::Parse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                };
                warn!(%err, "speech rules disabled");
                Self::invalid()
            }
        }
    }

    /// Parses a rule document from a JSON string.
    ///
    /// Same contract as [`RuleSet::load`]: defects yield an invalid
    /// `RuleSet`, never an error.
    #[must_use]
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<RuleDocument>(raw) {
            Ok(doc) => Self::from_document(doc),
            Err(e) => {
                warn!(error = %e, "unable to parse rule document, speech rules disabled");
                Self::invalid()
            }
        }
    }

    /// Returns an explicitly invalid `RuleSet` (engine pass-through).
    #[must_use]
    pub fn invalid() -> Self {
        Self::default()
    }

    fn from_document(doc: RuleDocument) -> Self {
        let prepend_pool: Vec<String> = doc.prepended_words.into_keys().collect();
        if prepend_pool.is_empty() {
            warn!("rule document has no prepended phrases, speech rules disabled");
            return Self::invalid();
        }

        let append_pool: Vec<String> = doc.appended_words.into_keys().collect();
        if append_pool.is_empty() {
            warn!("rule document has no appended phrases, speech rules disabled");
            return Self::invalid();
        }

        let mut rules = Vec::with_capacity(doc.word_replacements.len());
        let mut trigger_words = HashSet::new();

        for record in doc.word_replacements {
            for word in record
                .word
                .iter()
                .chain(record.word_plural.iter())
                .chain(record.prev.iter())
            {
                trigger_words.insert(word.to_lowercase());
            }

            rules.push(ReplacementRule {
                chance: coerce_count("chance", record.chance.as_ref(), 1).max(1),
                prepend_count: usize::try_from(coerce_count(
                    "prepend_count",
                    record.prepend_count.as_ref(),
                    0,
                ))
                .unwrap_or(0),
                prepended: record.replacement_prepend,
                singular_replacements: record.replacement,
                plural_replacements: record.replacement_plural,
                trigger_words: record.word,
                trigger_plurals: record.word_plural,
                required_prev: record.prev,
            });
        }

        if rules.is_empty() {
            warn!("rule document has no word replacements, speech rules disabled");
            return Self::invalid();
        }

        info!(count = rules.len(), "loaded word replacements");

        Self {
            rules,
            prepend_pool,
            append_pool,
            trigger_words,
            valid: true,
        }
    }

    /// Whether this `RuleSet` can drive transformations.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Replacement rules in priority order.
    #[must_use]
    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    /// Prepend phrase pool in document order.
    #[must_use]
    pub fn prepend_pool(&self) -> &[String] {
        &self.prepend_pool
    }

    /// Append phrase pool in document order.
    #[must_use]
    pub fn append_pool(&self) -> &[String] {
        &self.append_pool
    }

    /// Case-insensitive membership test against the union of every
    /// trigger, plural, and previous word across all rules.
    #[must_use]
    pub fn is_trigger_word(&self, word: &str) -> bool {
        self.trigger_words.contains(&word.to_lowercase())
    }
}
