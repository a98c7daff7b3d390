//! Morphological fallback for words no replacement rule claimed.
//!
//! Each candidate suffix/prefix tweak is tried in a fixed order with its
//! own probability gate; the first one that fires wins. A word can pick
//! up at most one tweak per pass.

use rand::Rng;

/// Applies at most one archaic tweak to `word`.
///
/// Returns `None` when no tweak fires, which is the common case.
pub(crate) fn apply(word: &str, rng: &mut impl Rng) -> Option<String> {
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();
    if n == 0 {
        return None;
    }
    let low = |i: usize| chars[i].to_ascii_lowercase();

    // h-dropping: "hello" -> "'ello"
    if low(0) == 'h' && rng.random_range(1..=2) == 1 {
        let rest: String = chars[1..].iter().collect();
        return Some(format!("'{rest}"));
    }

    if n > 3 {
        // "-ed" -> "-'d", unless the stem itself ends in 'e'
        if low(n - 2) == 'e' && low(n - 1) == 'd' && low(n - 3) != 'e' && rng.random_range(1..=4) == 1
        {
            let stem: String = chars[..n - 2].iter().collect();
            return Some(format!("{stem}'d"));
        }
        // "-ke" -> "-keth" / "-kest"
        if low(n - 2) == 'k' && low(n - 1) == 'e' && rng.random_range(1..=3) == 1 {
            return if rng.random_range(1..=2) == 1 {
                Some(format!("{word}th"))
            } else {
                Some(format!("{word}st"))
            };
        }
    }

    if n >= 3 {
        // hard stop -> "-eth": "let" -> "leteth"
        if rng.random_range(1..=5) == 1 && matches!(low(n - 1), 't' | 'p' | 'k' | 'g' | 'b' | 'w') {
            return Some(format!("{word}eth"));
        }
        // "-ss" -> "-ssest"
        if low(n - 2) == 's' && low(n - 1) == 's' && rng.random_range(1..=5) == 1 {
            return Some(format!("{word}est"));
        }
    }

    if n > 4 {
        // "-ing" -> "a-...ing" or "a-...in'", skipping words already
        // carrying a prefix like "a-going"
        if low(n - 3) == 'i' && low(n - 2) == 'n' && low(n - 1) == 'g' && chars[2] != '-' {
            if rng.random_range(1..=2) == 1 {
                return Some(format!("a-{word}"));
            }
            let stem: String = chars[..n - 1].iter().collect();
            return Some(format!("a-{stem}'"));
        }
    }

    None
}
