use crate::normalize::normalize_example;

/// Whether a displayed example sentence is the stored one with exactly one token missing.
///
/// Both sides go through [`normalize_example`] first.
///
/// An empty stored example never matches, even though dropping its only token
/// would trivially equal an empty page. Cards learned without an example must not
/// pair with every one-word sentence.
pub fn fuzzy_match(page_text: &str, stored_example: &str) -> bool {
    let page = normalize_example(page_text);
    let stored = normalize_example(stored_example);
    matches_minus_one(&page, &stored)
}

/// Same as [`fuzzy_match`] for inputs that are already normalized.
pub fn matches_minus_one(page: &str, stored: &str) -> bool {
    if stored.is_empty() {
        return false;
    }

    let tokens: Vec<&str> = stored.split(' ').collect();

    (0..tokens.len()).any(|skip| {
        let candidate = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, token)| *token)
            .collect::<Vec<_>>()
            .join(" ");
        candidate == page
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORED: &str = "the cat sat on the mat";

    #[test]
    fn any_single_token_may_be_missing() {
        let tokens: Vec<&str> = STORED.split(' ').collect();
        for skip in 0..tokens.len() {
            let page: Vec<&str> = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, t)| *t)
                .collect();
            assert!(fuzzy_match(&page.join(" "), STORED), "skip {skip}");
        }
    }

    #[test]
    fn two_missing_tokens_do_not_match() {
        assert!(!fuzzy_match("cat on the mat", STORED));
        assert!(!fuzzy_match("the cat sat on", STORED));
    }

    #[test]
    fn blank_placeholder_counts_as_the_missing_word() {
        assert!(fuzzy_match("The cat ___ on the mat.", STORED));
        assert!(fuzzy_match("the cat _____ on the mat", STORED));
    }

    #[test]
    fn complete_sentence_is_not_a_match() {
        // nothing was removed
        assert!(!fuzzy_match(STORED, STORED));
    }

    #[test]
    fn empty_stored_example_never_matches() {
        assert!(!fuzzy_match("", ""));
        assert!(!fuzzy_match("anything", ""));
        // Folds to nothing, so it is as good as missing.
        assert!(!fuzzy_match("", "?! ..."));
        assert!(!matches_minus_one("", ""));
    }

    #[test]
    fn single_token_example_matches_empty_page() {
        assert!(matches_minus_one("", "ubiquitous"));
    }
}
