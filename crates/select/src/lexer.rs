//! Selector Lexer
//!
//! Splits a selector string into compound selectors and the combinators
//! between them. Brackets, parentheses and quotes are consumed as balanced
//! regions so that a `,` or `>` inside `[href=">"]` or `:has(a > b)` is
//! never taken for a combinator.

use log::trace;

use crate::error::{SelectorError, SelectorResult};

/// A combinator joining two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Selector list separator (,)
    Group,
    /// Descendant combinator (whitespace)
    Descendant,
    /// Child combinator (>)
    Child,
    /// Next sibling combinator (+)
    NextSibling,
    /// Subsequent sibling combinator (~)
    SubsequentSibling,
}

impl Combinator {
    /// Map an explicit combinator character
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ',' => Some(Self::Group),
            '>' => Some(Self::Child),
            '+' => Some(Self::NextSibling),
            '~' => Some(Self::SubsequentSibling),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Group => ',',
            Self::Descendant => ' ',
            Self::Child => '>',
            Self::NextSibling => '+',
            Self::SubsequentSibling => '~',
        }
    }
}

/// Lexer output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of simple selectors with no combinator in between
    Compound { text: &'a str, offset: usize },
    /// A combinator, positioned at its character (or the whitespace run)
    Combinator { combinator: Combinator, offset: usize },
}

/// Character queue over a selector string.
///
/// The same cursor drives both the top-level token stream and the
/// parser's scan through a single compound.
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    after_compound: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            after_compound: false,
        }
    }

    /// Byte offset of the next unread character
    pub fn position(&self) -> usize {
        self.position
    }

    /// Everything not yet consumed
    pub fn remainder(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Peek at the next character without consuming
    pub fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    /// Consume the next character
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume whitespace, reporting whether any was seen
    pub fn consume_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.position > start
    }

    /// Consume characters while `pred` holds
    pub fn consume_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.input[start..self.position]
    }

    /// Consume an identifier: letters, digits, `-` and `_`
    pub fn consume_identifier(&mut self) -> &'a str {
        self.consume_while(is_ident_char)
    }

    /// Consume a tag name, which may carry a namespace prefix (`ns|tag`)
    pub fn consume_element_selector(&mut self) -> &'a str {
        self.consume_while(|c| is_ident_char(c) || c == '|')
    }

    /// Consume a balanced region starting at `open` and return what lies
    /// between the outer `open` and `close`.
    ///
    /// Nested `open`/`close` pairs count depth; `'` and `"` toggle quoting
    /// (unless the quote is the opener itself) and nothing inside quotes
    /// counts; a backslash escapes the following character.
    pub fn chomp_balanced(&mut self, open: char, close: char) -> SelectorResult<&'a str> {
        let start = self.position;
        if self.peek() != Some(open) {
            return Err(SelectorError::unexpected(self.remainder(), start));
        }

        let mut depth = 0usize;
        let mut quote: Option<(char, usize)> = None;
        let mut escaped = false;

        while let Some(c) = self.advance() {
            if escaped {
                escaped = false;
                continue;
            }
            if c == '\\' {
                escaped = true;
                continue;
            }
            if let Some((q, _)) = quote {
                if c == q {
                    quote = None;
                }
                continue;
            }
            if (c == '"' || c == '\'') && c != open {
                quote = Some((c, self.position - c.len_utf8()));
            } else if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    let inner = &self.input[start + open.len_utf8()..self.position - close.len_utf8()];
                    return Ok(inner);
                }
            }
        }

        let fragment = self.input[start..].to_string();
        Err(match quote {
            Some((quote, offset)) => SelectorError::UnterminatedQuote { quote, fragment, offset },
            None => SelectorError::Unbalanced { open, fragment, offset: start },
        })
    }

    /// Consume one compound selector: everything up to the next top-level
    /// whitespace or combinator, with bracketed regions taken whole.
    fn consume_compound(&mut self) -> SelectorResult<()> {
        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    self.chomp_balanced('(', ')')?;
                }
                '[' => {
                    self.chomp_balanced('[', ']')?;
                }
                c if c.is_whitespace() || Combinator::from_char(c).is_some() => break,
                _ => {
                    self.advance();
                }
            }
        }
        Ok(())
    }

    /// Get the next token, `None` at end of input
    pub fn next_token(&mut self) -> SelectorResult<Option<Token<'a>>> {
        let whitespace_start = self.position;
        let saw_whitespace = self.consume_whitespace();

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(None),
        };

        if let Some(combinator) = Combinator::from_char(c) {
            let offset = self.position;
            self.advance();
            self.consume_whitespace();
            self.after_compound = false;
            return Ok(Some(Token::Combinator { combinator, offset }));
        }

        if saw_whitespace && self.after_compound {
            self.after_compound = false;
            return Ok(Some(Token::Combinator {
                combinator: Combinator::Descendant,
                offset: whitespace_start,
            }));
        }

        let offset = self.position;
        self.consume_compound()?;
        self.after_compound = true;
        Ok(Some(Token::Compound {
            text: &self.input[offset..self.position],
            offset,
        }))
    }

    /// Tokenize all remaining input
    pub fn tokenize_all(&mut self) -> SelectorResult<Vec<Token<'a>>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            trace!("selector token {:?}", token);
            tokens.push(token);
        }
        Ok(tokens)
    }
}

/// Check if character can be part of an identifier
pub(crate) fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Remove backslash escapes: `\x` becomes `x`
pub fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn tokenize(input: &str) -> Vec<Token<'_>> {
        Lexer::new(input).tokenize_all().unwrap()
    }

    fn compound(text: &str, offset: usize) -> Token<'_> {
        Token::Compound { text, offset }
    }

    fn comb(combinator: Combinator, offset: usize) -> Token<'static> {
        Token::Combinator { combinator, offset }
    }

    #[test]
    fn test_single_compound() {
        assert_eq!(tokenize("div.a#b"), vec![compound("div.a#b", 0)]);
    }

    #[test]
    fn test_descendant_from_whitespace() {
        assert_eq!(
            tokenize("a  b"),
            vec![compound("a", 0), comb(Combinator::Descendant, 1), compound("b", 3)]
        );
    }

    #[test]
    fn test_explicit_combinators_absorb_whitespace() {
        assert_eq!(
            tokenize("ol > li + li ~ p, a"),
            vec![
                compound("ol", 0),
                comb(Combinator::Child, 3),
                compound("li", 5),
                comb(Combinator::NextSibling, 8),
                compound("li", 10),
                comb(Combinator::SubsequentSibling, 13),
                compound("p", 15),
                comb(Combinator::Group, 16),
                compound("a", 18),
            ]
        );
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        assert_eq!(tokenize("  p  "), vec![compound("p", 2)]);
    }

    #[test]
    fn test_brackets_hide_combinators() {
        assert_eq!(
            tokenize("a[title='x > y, z'] p:has(b + c)"),
            vec![
                compound("a[title='x > y, z']", 0),
                comb(Combinator::Descendant, 19),
                compound("p:has(b + c)", 20),
            ]
        );
    }

    #[test]
    fn test_chomp_balanced_nested() {
        let mut lexer = Lexer::new("(a(b)c) rest");
        assert_eq!(lexer.chomp_balanced('(', ')').unwrap(), "a(b)c");
        assert_eq!(lexer.remainder(), " rest");
    }

    #[test]
    fn test_chomp_balanced_quoted_close() {
        let mut lexer = Lexer::new("[title=\"]\"]");
        assert_eq!(lexer.chomp_balanced('[', ']').unwrap(), "title=\"]\"");
    }

    #[test]
    fn test_chomp_balanced_escape() {
        let mut lexer = Lexer::new(r"(a\)b)");
        assert_eq!(lexer.chomp_balanced('(', ')').unwrap(), r"a\)b");
    }

    #[test]
    fn test_unclosed_attribute_quote() {
        let err = Lexer::new("section > a[href=\"]").tokenize_all().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lex);
        assert!(matches!(err, SelectorError::UnterminatedQuote { quote: '"', offset: 17, .. }));
    }

    #[test]
    fn test_unclosed_quote_in_parens() {
        let err = Lexer::new("p:contains(One \" One)").tokenize_all().unwrap_err();
        assert!(matches!(err, SelectorError::UnterminatedQuote { quote: '"', .. }));
    }

    #[test]
    fn test_unclosed_paren() {
        let err = Lexer::new("p:not(.a").tokenize_all().unwrap_err();
        assert!(matches!(err, SelectorError::Unbalanced { open: '(', offset: 5, .. }));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"One \" One"#), "One \" One");
        assert_eq!(unescape(r"a\\b"), r"a\b");
        assert_eq!(unescape("plain"), "plain");
    }
}
