//! Forward (prefix) tokenization for the rule index
//!
//! Indexing emits every prefix of every word, so a query word matches any
//! indexed word it is a prefix of. Han characters carry no word
//! boundaries, so each one is a word of its own.

/// Free-text prefixes longer than this are not indexed; the whole word
/// still is. Whole values (identifiers) are not capped.
pub const MAX_PREFIX_CHARS: usize = 32;

/// A lower-cased word and its byte range in the original text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

pub fn is_han(c: char) -> bool {
    matches!(
        c,
        '\u{3400}'..='\u{4DBF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{F900}'..='\u{FAFF}'
            | '\u{20000}'..='\u{2A6DF}'
    )
}

/// Split text into lower-cased words.
pub fn split_words(text: &str) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<(usize, String)> = None;

    let flush = |current: &mut Option<(usize, String)>, end: usize, words: &mut Vec<Word>| {
        if let Some((start, text)) = current.take() {
            words.push(Word { text, start, end });
        }
    };

    for (idx, c) in text.char_indices() {
        if is_han(c) {
            flush(&mut current, idx, &mut words);
            words.push(Word {
                text: c.to_string(),
                start: idx,
                end: idx + c.len_utf8(),
            });
        } else if c.is_alphanumeric() || c == '_' {
            current
                .get_or_insert_with(|| (idx, String::new()))
                .1
                .extend(c.to_lowercase());
        } else {
            flush(&mut current, idx, &mut words);
        }
    }
    flush(&mut current, text.len(), &mut words);
    words
}

/// The whole trimmed value as a single lower-cased word.
pub fn whole_value(text: &str) -> Option<Word> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let start = text.len() - text.trim_start().len();
    Some(Word {
        text: trimmed.to_lowercase(),
        start,
        end: start + trimmed.len(),
    })
}

/// Left-anchored prefixes of a word, shortest first. At most `max_chars`
/// proper prefixes are returned, followed by the word itself.
pub fn prefixes(word: &str, max_chars: usize) -> Vec<&str> {
    let mut out: Vec<&str> = word
        .char_indices()
        .skip(1)
        .map(|(idx, _)| &word[..idx])
        .take(max_chars)
        .collect();
    if !word.is_empty() {
        out.push(word);
    }
    out.dedup();
    out
}

#[cfg(feature = "search")]
pub use tantivy_impl::ForwardTokenizer;

#[cfg(feature = "search")]
mod tantivy_impl {
    use super::*;
    use tantivy::tokenizer::{Token, TokenStream, Tokenizer};

    /// Prefix-emitting tokenizer, registered under [`ForwardTokenizer::WORDS`]
    /// and [`ForwardTokenizer::WHOLE_VALUE`]
    #[derive(Debug, Clone, Copy)]
    pub struct ForwardTokenizer {
        whole_value: bool,
    }

    impl ForwardTokenizer {
        pub const WORDS: &'static str = "forward_words";
        pub const WHOLE_VALUE: &'static str = "forward_whole";

        /// Tokenize free text word by word
        pub fn words() -> Self {
            Self { whole_value: false }
        }

        /// Treat the whole value (an identifier) as one word
        pub fn whole_value() -> Self {
            Self { whole_value: true }
        }
    }

    pub struct ForwardTokenStream {
        tokens: Vec<Token>,
        cursor: usize,
    }

    impl Tokenizer for ForwardTokenizer {
        type TokenStream<'a> = ForwardTokenStream;

        fn token_stream<'a>(&'a mut self, text: &'a str) -> Self::TokenStream<'a> {
            let (words, max_chars) = if self.whole_value {
                (whole_value(text).into_iter().collect(), usize::MAX)
            } else {
                (split_words(text), MAX_PREFIX_CHARS)
            };

            let mut tokens = Vec::new();
            for (position, word) in words.iter().enumerate() {
                for prefix in prefixes(&word.text, max_chars) {
                    tokens.push(Token {
                        offset_from: word.start,
                        offset_to: word.end,
                        position,
                        text: prefix.to_string(),
                        position_length: 1,
                    });
                }
            }
            ForwardTokenStream { tokens, cursor: 0 }
        }
    }

    impl TokenStream for ForwardTokenStream {
        fn advance(&mut self) -> bool {
            if self.cursor < self.tokens.len() {
                self.cursor += 1;
                true
            } else {
                false
            }
        }

        fn token(&self) -> &Token {
            &self.tokens[self.cursor.saturating_sub(1)]
        }

        fn token_mut(&mut self) -> &mut Token {
            let idx = self.cursor.saturating_sub(1);
            &mut self.tokens[idx]
        }
    }
}
