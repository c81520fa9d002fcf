use crate::scanner::Scanner;
use std::str::Chars;

/// Splits free text into words for the parser. ASCII punctuation is dropped,
/// both between words ("dog, cat") and inside them ("don't" becomes "dont").
pub struct SentenceTokenizer<'a>(Scanner<Chars<'a>>);

impl<'a> SentenceTokenizer<'a> {
    pub fn scanner(source: &'a str) -> Scanner<SentenceTokenizer<'a>> {
        Scanner::new(SentenceTokenizer(Scanner::from_str(source)))
    }
}

fn is_separator(c: &char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation()
}

impl Iterator for SentenceTokenizer<'_> {
    type Item = String;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_matching(is_separator);
        self.0.ignore();
        if !self.0.until(|c| c.is_whitespace()) {
            return None; // EOF
        }
        let word = self.0.extract().into_iter()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        Some(word)
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::SentenceTokenizer;

    fn words(input: &str) -> Vec<String> {
        SentenceTokenizer::scanner(input).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(words("the dog  chased\ta\ncat"), vec!["the", "dog", "chased", "a", "cat"]);
    }

    #[test]
    fn strips_punctuation() {
        assert_eq!(words("the dog, chased a cat!"), vec!["the", "dog", "chased", "a", "cat"]);
        assert_eq!(words("\"Hello\" -- she said; don't."), vec!["Hello", "she", "said", "dont"]);
    }

    #[test]
    fn keeps_case_and_digits() {
        assert_eq!(words("Route 66 (again)"), vec!["Route", "66", "again"]);
    }

    #[test]
    fn nothing_to_split() {
        assert!(words("").is_empty());
        assert!(words("  ... !? ").is_empty());
    }

    #[test]
    fn peek_ahead() {
        let mut tokens = SentenceTokenizer::scanner("a big, dog");
        assert_eq!(tokens.peek(), Some("a".to_string()));
        assert_eq!(tokens.next(), Some("a".to_string()));
        assert_eq!(tokens.next(), Some("big".to_string()));
        assert_eq!(tokens.prev(), Some("a".to_string()));
    }
}
