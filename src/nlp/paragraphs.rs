//! Whitespace-aware tokenisation and paragraph segmentation.
//!
//! A single space following a word is stored on the word as trailing
//! whitespace; every other whitespace run becomes a token of its own. A space
//! token holding two or more newlines marks a paragraph boundary.

use serde::Serialize;

/// A token of a [`Document`], addressed by byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub index: usize,
    pub offset: usize,
    pub len: usize,
    pub is_space: bool,
    pub trailing_space: bool,
}

/// Tokenised view over a borrowed text.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    text: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Document<'a> {
    pub fn tokenize(text: &'a str) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some(&(start, ch)) = chars.peek() {
            let space_run = ch.is_whitespace();
            let mut end = start;
            while let Some(&(idx, c)) = chars.peek() {
                if c.is_whitespace() != space_run {
                    break;
                }
                end = idx + c.len_utf8();
                chars.next();
            }

            if !space_run {
                tokens.push(Token {
                    index: tokens.len(),
                    offset: start,
                    len: end - start,
                    is_space: false,
                    trailing_space: false,
                });
                continue;
            }

            let mut run_start = start;
            if let Some(prev) = tokens.last_mut() {
                if !prev.is_space && text[start..end].starts_with(' ') {
                    prev.trailing_space = true;
                    run_start += 1;
                }
            }
            if run_start < end {
                tokens.push(Token {
                    index: tokens.len(),
                    offset: run_start,
                    len: end - run_start,
                    is_space: true,
                    trailing_space: false,
                });
            }
        }

        Self { text, tokens }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_text(&self, token: &Token) -> &'a str {
        &self.text[token.offset..token.offset + token.len]
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token range `[start, end)` as a span. Trailing whitespace of the last
    /// token is excluded from the text.
    pub fn span(&self, start: usize, end: usize) -> Span<'a> {
        let start_byte = self
            .tokens
            .get(start)
            .map(|t| t.offset)
            .unwrap_or(self.text.len());
        let end_byte = if end > start {
            let last = &self.tokens[end - 1];
            last.offset + last.len
        } else {
            start_byte
        };
        Span {
            start,
            end,
            start_byte,
            end_byte,
            text: &self.text[start_byte..end_byte],
        }
    }

    fn is_paragraph_break(&self, token: &Token) -> bool {
        token.is_space && self.token_text(token).matches('\n').count() > 1
    }
}

/// A contiguous token range of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span<'a> {
    pub start: usize,
    pub end: usize,
    pub start_byte: usize,
    pub end_byte: usize,
    pub text: &'a str,
}

impl Span<'_> {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Lazy iterator over the paragraphs of a document.
///
/// Each span starts at the previous boundary token (inclusive) and stops before
/// the next one; the final span runs to the end of the document. Empty spans
/// are yielded as-is.
#[derive(Debug)]
pub struct Paragraphs<'d, 'a> {
    doc: &'d Document<'a>,
    cursor: usize,
    start: usize,
    finished: bool,
}

impl<'a> Iterator for Paragraphs<'_, 'a> {
    type Item = Span<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while self.cursor < self.doc.len() {
            let token = self.doc.tokens[self.cursor];
            self.cursor += 1;
            if self.doc.is_paragraph_break(&token) {
                let span = self.doc.span(self.start, token.index);
                self.start = token.index;
                return Some(span);
            }
        }
        self.finished = true;
        Some(self.doc.span(self.start, self.doc.len()))
    }
}

/// Split a document into paragraph spans.
pub fn paragraphs<'d, 'a>(doc: &'d Document<'a>) -> Paragraphs<'d, 'a> {
    Paragraphs {
        doc,
        cursor: 0,
        start: 0,
        finished: false,
    }
}
