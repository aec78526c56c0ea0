//! Word-coverage self-check of rendered output against its source

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\S+").unwrap();
    /// Tokens made only of table pipes, emphasis, heading or rule markup
    static ref MARKUP_TOKEN: Regex = Regex::new(r"^[|*#\-\s]+$").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coverage {
    pub input_words: usize,
    pub output_words: usize,
    /// `output_words / input_words`, 1.0 for input without words
    pub ratio: f64,
}

impl Coverage {
    /// Compare the words of `input` with the text left in `html` once
    /// tags are removed
    pub fn measure(input: &str, html: &str) -> Self {
        let input_words = WORD
            .find_iter(input)
            .filter(|m| !MARKUP_TOKEN.is_match(m.as_str()))
            .count();
        let text = TAG.replace_all(html, " ");
        let output_words = WORD.find_iter(&text).count();

        let ratio = if input_words == 0 {
            1.0
        } else {
            output_words as f64 / input_words as f64
        };

        Self {
            input_words,
            output_words,
            ratio,
        }
    }

    pub fn is_below(&self, threshold: f64) -> bool {
        self.ratio < threshold
    }
}
