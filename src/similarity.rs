//! Content-similarity test for learning deduplication.
//!
//! Deliberately lexical, not semantic: two fix explanations count as the same
//! learning when their significant words overlap enough. The threshold and
//! token cutoff below are policy constants; changing either changes which
//! accepted suggestions reinforce instead of create.

use std::collections::HashSet;

/// Jaccard overlap a pair of texts must exceed to count as the same fix.
const SIMILARITY_THRESHOLD: f64 = 0.4;
/// Tokens must be longer than this to count as significant.
const MIN_TOKEN_LEN: usize = 3;

/// Whether two free-text fragments describe the same fix.
///
/// Normalizes both sides (lowercase, strip everything outside `[a-z0-9\s]`),
/// keeps words longer than 3 characters, and compares the resulting word sets
/// by Jaccard similarity. Returns `true` iff the union is non-empty and the
/// ratio exceeds 0.4. Symmetric by construction.
pub fn is_similar(a: &str, b: &str) -> bool {
    let words_a = significant_words(a);
    let words_b = significant_words(b);

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return false;
    }

    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64 > SIMILARITY_THRESHOLD
}

fn significant_words(text: &str) -> HashSet<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();

    normalized
        .split_whitespace()
        .filter(|w| w.len() > MIN_TOKEN_LEN)
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_is_similar() {
        let text = "Increase the nginx proxy timeout for large uploads";
        assert!(is_similar(text, text));
    }

    #[test]
    fn test_is_symmetric() {
        let a = "Invalidate stale session tokens after password reset";
        let b = "After password reset, stale session tokens must be invalidated";
        assert_eq!(is_similar(a, b), is_similar(b, a));
        assert!(is_similar(a, b));
    }

    #[test]
    fn test_unrelated_text_is_not_similar() {
        assert!(!is_similar(
            "Increase nginx proxy timeout for uploads",
            "Rotate SMTP credentials in the secrets manager",
        ));
    }

    #[test]
    fn test_both_empty_is_not_similar() {
        assert!(!is_similar("", ""));
        // Nothing survives the length filter on either side.
        assert!(!is_similar("a an to", "is of it"));
    }

    #[test]
    fn test_one_empty_side_degrades_gracefully() {
        // The union comes entirely from the non-empty side; ratio is 0.
        assert!(!is_similar("", "clear the redis cache entries"));
    }

    #[test]
    fn test_token_cutoff_is_exactly_three() {
        // "jwt" (3 chars) is filtered out; "token" survives.
        // With only "token" shared out of {token, expired, immediately},
        // 1/3 < 0.4.
        assert!(!is_similar("jwt token", "token expired immediately"));
        // Shared-only sets of surviving words give ratio 1.0.
        assert!(is_similar("jwt token", "xml token"));
    }

    #[test]
    fn test_threshold_is_exclusive_at_0_4() {
        // 2 shared words out of a union of 5: ratio exactly 0.4, not similar.
        assert!(!is_similar(
            "alpha bravo charlie delta",
            "alpha bravo echofoxtrot",
        ));
        // 3 shared out of 5: 0.6, similar.
        assert!(is_similar(
            "alpha bravo charlie delta",
            "alpha bravo charlie echofoxtrot",
        ));
    }

    #[test]
    fn test_punctuation_is_stripped_not_tokenized() {
        // "don't" normalizes to "dont", matching the same word on both sides.
        assert!(is_similar("don't restart workers", "dont restart workers"));
    }
}
