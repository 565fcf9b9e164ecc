//! Header line fitting
//!
//! The label header is fitted against a fixed character budget, not measured
//! text width. Existing printed stock was laid out this way and the budget has
//! to stay literal to keep the output identical.

/// Characters allowed on one header line
pub const MAX_CHARS_PER_LINE: usize = 25;

/// Appended to a second header line that had to be cut
pub const ELLIPSIS: &str = "...";

/// Header text after fitting, one or two lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLines {
    Single(String),
    Wrapped { first: String, second: String },
}

/// Number of characters (not bytes) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Fit `text` into at most two lines of `budget` characters.
///
/// Text within the budget stays on one line. Longer text is split by a single
/// greedy pass over whitespace-separated words: words fill the first line
/// until one does not fit, then that word and every later word go to the
/// second line. The second line is cut to `budget - 3` characters plus
/// [`ELLIPSIS`] when it is still too long.
pub fn fit_header(text: &str, budget: usize) -> HeaderLines {
    if char_len(text) <= budget {
        return HeaderLines::Single(text.to_string());
    }

    let mut first = String::new();
    let mut second = String::new();
    let mut overflowed = false;

    for word in text.split_whitespace() {
        if !overflowed && char_len(&first) + char_len(word) + 1 <= budget {
            first.push_str(word);
            first.push(' ');
        } else {
            overflowed = true;
            second.push_str(word);
            second.push(' ');
        }
    }

    let first = first.trim_end().to_string();
    let mut second = second.trim_end().to_string();

    if char_len(&second) > budget {
        let keep = budget.saturating_sub(ELLIPSIS.len());
        second = second.chars().take(keep).collect();
        second.push_str(ELLIPSIS);
    }

    HeaderLines::Wrapped { first, second }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrapped(text: &str) -> (String, String) {
        match fit_header(text, MAX_CHARS_PER_LINE) {
            HeaderLines::Wrapped { first, second } => (first, second),
            HeaderLines::Single(line) => panic!("expected two lines, got {line:?}"),
        }
    }

    #[test]
    fn test_short_text_stays_on_one_line() {
        let text = "Paralen  tbl 20 ks";
        assert_eq!(fit_header(text, MAX_CHARS_PER_LINE), HeaderLines::Single(text.to_string()));
    }

    #[test]
    fn test_exactly_at_budget_is_single_line() {
        let text = "a".repeat(MAX_CHARS_PER_LINE);
        assert_eq!(fit_header(&text, MAX_CHARS_PER_LINE), HeaderLines::Single(text.clone()));
    }

    #[test]
    fn test_budget_counts_characters_not_bytes() {
        // 25 characters, more than 25 bytes
        let text = "Čistící Řešení Žlutý  sir";
        assert_eq!(char_len(text), 25);
        assert!(text.len() > 25);
        assert!(matches!(fit_header(text, MAX_CHARS_PER_LINE), HeaderLines::Single(_)));
    }

    #[test]
    fn test_greedy_split_fills_first_line() {
        let (first, second) = wrapped("Ibuprofen Galmed Forte  tbl 400 ks");
        assert_eq!(first, "Ibuprofen Galmed Forte");
        assert_eq!(second, "tbl 400 ks");
        assert!(char_len(&first) <= MAX_CHARS_PER_LINE);
    }

    #[test]
    fn test_first_line_is_maximal_prefix() {
        let text = "Acidum Ascorbicum Cum Rutoside  tbl 60 ks";
        let (first, second) = wrapped(text);
        let words: Vec<&str> = text.split_whitespace().collect();
        let first_count = first.split_whitespace().count();
        // Adding the next word would break the budget rule
        let next = words[first_count];
        assert!(char_len(&first) + 1 + char_len(next) + 1 > MAX_CHARS_PER_LINE);
        assert_eq!(words[first_count..].join(" "), second);
    }

    #[test]
    fn test_words_after_overflow_never_return_to_first_line() {
        // "ab" would still fit after "Extraordinarily" overflows, but must not move up
        let (first, second) = wrapped("Supercalifragilistic Extraordinarily ab");
        assert_eq!(first, "Supercalifragilistic");
        assert_eq!(second, "Extraordinarily ab");
    }

    #[test]
    fn test_long_second_line_is_truncated_with_ellipsis() {
        let (first, second) =
            wrapped("Magnesium Lactate Forte Chewable Tablets Orange Flavour  tbl 100 ks");
        assert_eq!(first, "Magnesium Lactate Forte");
        assert_eq!(char_len(&second), MAX_CHARS_PER_LINE);
        assert!(second.ends_with(ELLIPSIS));
        assert_eq!(second, "Chewable Tablets Orang...");
    }

    #[test]
    fn test_single_overlong_word_goes_to_second_line() {
        let word = "x".repeat(30);
        let (first, second) = wrapped(&word);
        assert_eq!(first, "");
        assert_eq!(second, format!("{}{}", "x".repeat(22), ELLIPSIS));
    }

    #[test]
    fn test_truncation_respects_multibyte_characters() {
        let (_, second) = wrapped("Přípravek ŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽŽ");
        assert_eq!(char_len(&second), MAX_CHARS_PER_LINE);
        assert!(second.starts_with("ŽŽŽ"));
    }
}
