/// Stopwords stripped from every piece of text before comparison.
const STOPWORDS: &[&str] = &["the", "a", "an"];

/// Strips stopwords, lowercases the surviving tokens and rejoins them with
/// single spaces, preserving their relative order.
///
/// Queries and corpus text (keywords and question variants) must both pass
/// through this before any substring check or similarity score, so a keyword
/// like "hello world" still matches a query phrased "hello the world".
/// Idempotent: normalizing already-normalized text changes nothing.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| !STOPWORDS.iter().any(|stop| word.eq_ignore_ascii_case(stop)))
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_stopwords_case_insensitively() {
        assert_eq!(normalize("The quick brown fox"), "quick brown fox");
        assert_eq!(normalize("An Apple A Day"), "apple day");
        assert_eq!(normalize("the a an"), "");
    }

    #[test]
    fn lowercases_and_rejoins_with_single_spaces() {
        assert_eq!(normalize("  Hello   WORLD  "), "hello world");
    }

    #[test]
    fn preserves_token_order() {
        assert_eq!(
            normalize("reset the password for an account"),
            "reset password for account"
        );
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "",
            "The quick brown fox",
            "hello the world",
            "  MIXED   Case  Input ",
            "already normalized text",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "sample: {sample:?}");
        }
    }

    #[test]
    fn keeps_stopword_substrings_inside_words() {
        // "another" contains "an" but is not a stopword itself
        assert_eq!(normalize("another theory"), "another theory");
    }
}
