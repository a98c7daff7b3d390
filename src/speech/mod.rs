//! Ye Olde English speech transformation.
//!
//! [`SpeechEngine`] rewrites chat lines word by word against the loaded
//! [`RuleSet`]: replacement rules first, a morphological fallback for
//! unclaimed words, plus randomly drawn prepend/append phrases around
//! generated lines. The engine owns its RNG and phrase cursors, so each
//! holder gets an independent random stream.

mod morph;
mod selector;

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::rules::{ReplacementRule, RuleSet};
use selector::SelectorState;

/// Upper bound on retries when drawing distinct prepend adjectives.
const ADJECTIVE_DRAW_ATTEMPTS: u32 = 10;

/// Probability gates for phrase generation, as `1/n`.
const PREPEND_GATE: u64 = 4;
const APPEND_GATE: u64 = 5;

/// Stateful lexical transformation engine.
///
/// Holds shared immutable rule tables plus per-holder mutable state
/// (RNG, phrase cursors). Not `Sync`; give each concurrent holder its
/// own engine over the same `Arc<RuleSet>`.
pub struct SpeechEngine {
    rules: Arc<RuleSet>,
    cursors: SelectorState,
    rng: StdRng,
}

impl std::fmt::Debug for SpeechEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechEngine")
            .field("valid", &self.rules.is_valid())
            .finish_non_exhaustive()
    }
}

impl SpeechEngine {
    /// Creates an engine seeded from the operating system.
    #[must_use]
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            rules,
            cursors: SelectorState::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates an engine with a fixed seed, for reproducible output.
    #[must_use]
    pub fn with_seed(rules: Arc<RuleSet>, seed: u64) -> Self {
        Self {
            rules,
            cursors: SelectorState::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Transforms one chat line.
    ///
    /// An invalid rule set passes the line through byte for byte. A
    /// leading `-` is stripped and suppresses phrase generation for
    /// that line only.
    pub fn transform(&mut self, line: &str) -> String {
        if !self.rules.is_valid() {
            return line.to_string();
        }
        match line.strip_prefix('-') {
            Some(rest) => self.modify_speech(rest, false, false),
            None => self.modify_speech(line, true, false),
        }
    }

    /// Core word-by-word rewrite pass.
    ///
    /// `generate` enables the prepend/append phrase draws; `in_phrase`
    /// marks a recursive pass over a phrase, where only `&`-prefixed
    /// tokens are eligible for replacement.
    fn modify_speech(&mut self, text: &str, generate: bool, in_phrase: bool) -> String {
        let mut out = String::new();

        if generate {
            if let Some(phrase) = self.draw_prepend() {
                let rendered = self.modify_speech(&phrase, false, true);
                out.push_str(&rendered);
                out.push(' ');
            }
        }

        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        // The scan keeps the previous word's output in `stored` for one
        // extra position so the next word can adjust it (a/an) or fuse
        // with it (apostrophe combination) before it is emitted.
        let mut prev_start = 0usize;
        let mut word_start = 0usize;
        let mut cur = 0usize;
        let mut stored = String::new();

        while cur <= len {
            if cur < len {
                let ch = chars[cur];
                if ch.is_ascii_alphabetic() || ch == '&' {
                    cur += 1;
                    continue;
                }
            }

            let word_len = cur - word_start;
            let prev_len = word_start.saturating_sub(prev_start + 1);
            let current_word: String = chars[word_start..cur].iter().collect();
            let prev_word: String = chars[prev_start..prev_start + prev_len].iter().collect();

            if word_len > 0 {
                let modify = !in_phrase || chars[word_start] == '&';
                let word_to_check: String = if in_phrase && modify {
                    current_word.chars().skip(1).collect()
                } else {
                    current_word.clone()
                };

                let mut replaced = if modify {
                    self.replace_word(&word_to_check, &prev_word, false, in_phrase)
                } else {
                    None
                };

                // Apostrophe combination: "o'" + "er" retried as "o'er".
                if replaced.is_some() && modify && stored.ends_with('\'') {
                    let combined = format!("{stored}{current_word}");
                    if let Some((rep, _)) = self.replace_word(&combined, "", false, in_phrase) {
                        replaced = Some((rep, true));
                    }
                }

                let used_prev = replaced.as_ref().is_some_and(|(_, used)| *used);

                if !stored.is_empty() && !used_prev {
                    let rep_text = match &replaced {
                        Some((rep, _)) if !rep.is_empty() => rep.as_str(),
                        _ => current_word.as_str(),
                    };
                    let ends_apostrophe = stored.ends_with('\'');
                    out.push_str(&adjust_article(rep_text, &prev_word, &stored));
                    if !ends_apostrophe {
                        out.push(' ');
                    }
                }

                stored = match replaced {
                    Some((rep, _)) => match_first_case(&current_word, rep),
                    None => word_to_check,
                };
            }

            if cur >= len {
                if !stored.is_empty() {
                    out.push_str(&stored);
                }
                break;
            }

            if chars[cur] != ' ' {
                let symbol = chars[cur].to_string();
                match self.replace_word(&symbol, "", true, true) {
                    Some((rep, _)) => stored.push_str(&rep),
                    None => stored.push(chars[cur]),
                }
            }

            cur += 1;
            prev_start = word_start;
            word_start = cur;
        }

        if generate && !out.is_empty() {
            let last = out.chars().next_back().unwrap_or(' ');
            if last != '?' && last != '!' {
                if let Some(phrase) = self.draw_append() {
                    if last == '.' {
                        out.push(' ');
                    } else {
                        out.push_str(". ");
                    }
                    let rendered = self.modify_speech(&phrase, false, true);
                    out.push_str(&rendered);
                }
            }
        }

        out
    }

    /// Runs one word through the rule tables.
    ///
    /// Returns the replacement text plus a flag telling the caller that
    /// the previous word was consumed by the match. `symbols` marks a
    /// boundary-character lookup; `word_list_only` suppresses the
    /// morphological fallback.
    fn replace_word(
        &mut self,
        word: &str,
        prev_word: &str,
        symbols: bool,
        word_list_only: bool,
    ) -> Option<(String, bool)> {
        let rules = Arc::clone(&self.rules);

        for rule in rules.rules() {
            if let Some(result) = self.match_rule(rule, &rules, word, prev_word) {
                return Some(result);
            }
        }

        if !symbols && !word_list_only && !word.is_empty() {
            return morph::apply(word, &mut self.rng).map(|tweaked| (tweaked, false));
        }

        None
    }

    /// Tries one rule against one word.
    fn match_rule(
        &mut self,
        rule: &ReplacementRule,
        rules: &RuleSet,
        word: &str,
        prev_word: &str,
    ) -> Option<(String, bool)> {
        // Roll the chance gate before looking at the word at all, so a
        // 1-in-n rule consumes its roll on every candidate.
        if rule.chance > 1 && self.rng.random_range(1..=rule.chance) > 1 {
            return None;
        }

        let mut used_prev = false;
        if !rule.required_prev.is_empty() {
            if prev_word.is_empty()
                || !rules.is_trigger_word(prev_word)
                || !contains_ci(&rule.required_prev, prev_word)
            {
                return None;
            }
            used_prev = true;
        }

        if contains_ci(&rule.trigger_words, word) {
            let rep = self.build_replacement(rule, false);
            return Some((rep, used_prev));
        }
        if contains_ci(&rule.trigger_plurals, word) {
            let rep = self.build_replacement(rule, true);
            return Some((rep, used_prev));
        }

        None
    }

    /// Assembles replacement text for a matched rule: drawn adjectives
    /// followed by a randomly chosen replacement word.
    fn build_replacement(&mut self, rule: &ReplacementRule, plural: bool) -> String {
        let mut rep = String::new();

        if rule.prepend_count > 0 && !rule.prepended.is_empty() {
            let mut picked: Vec<usize> = Vec::with_capacity(rule.prepend_count);
            for _ in 0..rule.prepend_count {
                let mut idx = self.rng.random_range(0..rule.prepended.len());
                for _ in 0..ADJECTIVE_DRAW_ATTEMPTS {
                    if !picked.contains(&idx) {
                        break;
                    }
                    idx = self.rng.random_range(0..rule.prepended.len());
                }
                // Duplicates stand after the retry budget runs out.
                picked.push(idx);
            }
            for (n, idx) in picked.iter().enumerate() {
                rep.push_str(&rule.prepended[*idx]);
                if n + 1 < picked.len() {
                    rep.push_str(", ");
                } else {
                    rep.push(' ');
                }
            }
        }

        let pool = if plural && !rule.plural_replacements.is_empty() {
            &rule.plural_replacements
        } else {
            &rule.singular_replacements
        };
        if !pool.is_empty() {
            let idx = self.rng.random_range(0..pool.len());
            rep.push_str(&pool[idx]);
        }

        rep
    }

    fn draw_prepend(&mut self) -> Option<String> {
        if self.rng.random_range(1..=PREPEND_GATE) != 1 {
            return None;
        }
        let rules = Arc::clone(&self.rules);
        let pool = rules.prepend_pool();
        if pool.is_empty() {
            return None;
        }
        let idx = self.cursors.next_prepend(&mut self.rng, pool.len());
        Some(pool[idx].clone())
    }

    fn draw_append(&mut self) -> Option<String> {
        if self.rng.random_range(1..=APPEND_GATE) != 1 {
            return None;
        }
        let rules = Arc::clone(&self.rules);
        let pool = rules.append_pool();
        if pool.is_empty() {
            return None;
        }
        let idx = self.cursors.next_append(&mut self.rng, pool.len());
        Some(pool[idx].clone())
    }
}

/// Case-insensitive membership test.
fn contains_ci(list: &[String], word: &str) -> bool {
    list.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// Fixes up a stored "a"/"an" article against the replacement that now
/// follows it.
fn adjust_article(replacement: &str, prev_word: &str, stored: &str) -> String {
    let Some(first) = replacement.chars().next() else {
        return stored.to_string();
    };
    let vowel = matches!(first.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u');
    if prev_word.eq_ignore_ascii_case("an") && !vowel {
        let mut trimmed = stored.to_string();
        trimmed.pop();
        trimmed
    } else if prev_word.eq_ignore_ascii_case("a") && vowel {
        format!("{stored}n")
    } else {
        stored.to_string()
    }
}

/// Copies the case of `original`'s first letter onto `replacement`.
fn match_first_case(original: &str, replacement: String) -> String {
    let (Some(orig), Some(rep)) = (original.chars().next(), replacement.chars().next()) else {
        return replacement;
    };
    let rest = &replacement[rep.len_utf8()..];
    if orig.is_uppercase() {
        rep.to_uppercase().collect::<String>() + rest
    } else if orig.is_lowercase() {
        rep.to_lowercase().collect::<String>() + rest
    } else {
        replacement
    }
}
