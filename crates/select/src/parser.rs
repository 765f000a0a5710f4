//! Selector Query Parser
//!
//! Turns the lexer's token stream into an [`Evaluator`] tree. Comma binds
//! loosest; within a comma-separated group the combinators fold left, each
//! new compound becoming `And[compound, Structural(everything so far)]`.

use log::{debug, trace};
use regex::Regex;

use crate::error::{SelectorError, SelectorResult};
use crate::evaluator::{AttributeOp, Evaluator, NthKind};
use crate::lexer::{is_ident_char, unescape, Combinator, Lexer, Token};
use crate::nth::NthExpr;

/// Compile a selector string
pub fn parse(query: &str) -> SelectorResult<Evaluator> {
    let evaluator = QueryParser::new(query, 0).parse()?;
    debug!("Parsed selector '{}' as '{}'", query, evaluator);
    Ok(evaluator)
}

/// Parser for one selector string. `base` is the byte offset of `query`
/// inside the outermost selector, so that errors from nested `:has()` and
/// `:not()` arguments point into the text the caller actually wrote.
struct QueryParser<'a> {
    query: &'a str,
    base: usize,
}

impl<'a> QueryParser<'a> {
    fn new(query: &'a str, base: usize) -> Self {
        Self { query, base }
    }

    fn parse(&self) -> SelectorResult<Evaluator> {
        let tokens = Lexer::new(self.query)
            .tokenize_all()
            .map_err(|e| e.shifted(self.base))?;

        let mut groups = Vec::new();
        let mut segment: Vec<Token<'a>> = Vec::new();
        let mut last_comma: Option<usize> = None;

        for token in tokens {
            match token {
                Token::Combinator { combinator: Combinator::Group, offset } => {
                    groups.push(self.parse_segment(&segment, offset)?);
                    segment.clear();
                    last_comma = Some(offset);
                }
                other => segment.push(other),
            }
        }

        if segment.is_empty() {
            return Err(match last_comma {
                Some(offset) => SelectorError::DanglingCombinator {
                    combinator: ',',
                    offset: self.base + offset,
                },
                None => SelectorError::EmptyGroup { offset: self.base },
            });
        }
        groups.push(self.parse_segment(&segment, self.query.len())?);

        Ok(if groups.len() == 1 {
            groups.remove(0)
        } else {
            Evaluator::Or(groups)
        })
    }

    /// Parse the tokens between two commas. `anchor` is where an empty
    /// segment gets reported.
    fn parse_segment(&self, tokens: &[Token<'a>], anchor: usize) -> SelectorResult<Evaluator> {
        let mut current: Option<Evaluator> = None;
        let mut pending: Option<(Combinator, usize)> = None;

        for token in tokens {
            match *token {
                Token::Combinator { combinator, offset } => {
                    if pending.is_some() {
                        return Err(SelectorError::unexpected(
                            &self.query[offset..],
                            self.base + offset,
                        ));
                    }
                    // A leading combinator is relative to the search root
                    if current.is_none() {
                        current = Some(Evaluator::Root);
                    }
                    pending = Some((combinator, offset));
                }
                Token::Compound { text, offset } => {
                    let evaluator = self.parse_compound(text, offset)?;
                    current = Some(match (current.take(), pending.take()) {
                        (None, _) => evaluator,
                        (Some(left), Some((combinator, _))) => combine(left, combinator, evaluator),
                        (Some(_), None) => {
                            return Err(SelectorError::unexpected(text, self.base + offset));
                        }
                    });
                }
            }
        }

        if let Some((combinator, offset)) = pending {
            return Err(SelectorError::DanglingCombinator {
                combinator: combinator.as_char(),
                offset: self.base + offset,
            });
        }

        current.ok_or(SelectorError::EmptyGroup { offset: self.base + anchor })
    }

    /// Parse one compound into its simple selectors, ANDed when more than one
    fn parse_compound(&self, text: &'a str, offset: usize) -> SelectorResult<Evaluator> {
        let origin = self.base + offset;
        let mut lexer = Lexer::new(text);
        let mut evaluators = Vec::new();

        while let Some(c) = lexer.peek() {
            let start = lexer.position();
            let evaluator = match c {
                '#' => {
                    lexer.advance();
                    let id = lexer.consume_identifier();
                    if id.is_empty() {
                        return Err(SelectorError::unexpected(&text[start..], origin + start));
                    }
                    Evaluator::Id(id.to_string())
                }
                '.' => {
                    lexer.advance();
                    let class = lexer.consume_identifier();
                    if class.is_empty() {
                        return Err(SelectorError::unexpected(&text[start..], origin + start));
                    }
                    Evaluator::Class(class.to_string())
                }
                '*' => {
                    lexer.advance();
                    let tag = lexer.consume_element_selector();
                    if tag.is_empty() {
                        Evaluator::Universal(None)
                    } else {
                        Evaluator::Universal(Some(normalize_tag(tag)))
                    }
                }
                '[' => {
                    let inner = lexer
                        .chomp_balanced('[', ']')
                        .map_err(|e| e.shifted(origin))?;
                    parse_attribute(inner, origin + start)?
                }
                ':' => self.parse_pseudo(&mut lexer, origin)?,
                c if is_ident_char(c) || c == '|' => {
                    Evaluator::Tag(normalize_tag(lexer.consume_element_selector()))
                }
                _ => return Err(SelectorError::unexpected(&text[start..], origin + start)),
            };
            evaluators.push(evaluator);
        }

        Ok(if evaluators.len() == 1 {
            evaluators.remove(0)
        } else {
            Evaluator::And(evaluators)
        })
    }

    /// Parse `:name` or `:name(argument)`; the lexer sits on the colon
    fn parse_pseudo(&self, lexer: &mut Lexer<'a>, origin: usize) -> SelectorResult<Evaluator> {
        let colon = lexer.position();
        lexer.advance();
        let name = lexer.consume_identifier();
        if name.is_empty() {
            return Err(SelectorError::unexpected(lexer.remainder(), origin + colon));
        }
        let offset = origin + colon;
        let context = format!(":{}", name);

        let argument = if lexer.peek() == Some('(') {
            let arg_offset = origin + lexer.position() + 1;
            let arg = lexer.chomp_balanced('(', ')').map_err(|e| e.shifted(origin))?;
            Some((arg, arg_offset))
        } else {
            None
        };

        let required = |argument: Option<(&'a str, usize)>| {
            argument.ok_or_else(|| {
                SelectorError::invalid_argument(&context, "", "missing argument", offset)
            })
        };
        let no_argument = |evaluator: Evaluator| match argument {
            Some((arg, arg_offset)) => Err(SelectorError::invalid_argument(
                &context,
                arg,
                "takes no argument",
                arg_offset,
            )),
            None => Ok(evaluator),
        };

        let evaluator = match name.to_ascii_lowercase().as_str() {
            "lt" => Evaluator::IndexLessThan(parse_index(&context, required(argument)?)?),
            "gt" => Evaluator::IndexGreaterThan(parse_index(&context, required(argument)?)?),
            "eq" => Evaluator::IndexEquals(parse_index(&context, required(argument)?)?),

            "nth-child" => parse_nth(&context, NthKind::Child, required(argument)?)?,
            "nth-last-child" => parse_nth(&context, NthKind::LastChild, required(argument)?)?,
            "nth-of-type" => parse_nth(&context, NthKind::OfType, required(argument)?)?,
            "nth-last-of-type" => parse_nth(&context, NthKind::LastOfType, required(argument)?)?,

            "contains" => Evaluator::ContainsText(parse_search_text(&context, required(argument)?)?),
            "containsown" => {
                Evaluator::ContainsOwnText(parse_search_text(&context, required(argument)?)?)
            }
            "containsdata" => {
                Evaluator::ContainsData(parse_search_text(&context, required(argument)?)?)
            }
            "matches" => Evaluator::Matches(parse_regex(&context, required(argument)?)?),
            "matchesown" => Evaluator::MatchesOwn(parse_regex(&context, required(argument)?)?),

            "has" => {
                let (arg, arg_offset) = required(argument)?;
                trace!("Parsing :has argument '{}'", arg);
                Evaluator::Has(Box::new(QueryParser::new(arg, arg_offset).parse()?))
            }
            "not" => {
                let (arg, arg_offset) = required(argument)?;
                trace!("Parsing :not argument '{}'", arg);
                Evaluator::Not(Box::new(QueryParser::new(arg, arg_offset).parse()?))
            }

            "first-child" => no_argument(Evaluator::FirstChild)?,
            "last-child" => no_argument(Evaluator::LastChild)?,
            "first-of-type" => no_argument(Evaluator::FirstOfType)?,
            "last-of-type" => no_argument(Evaluator::LastOfType)?,
            "only-child" => no_argument(Evaluator::OnlyChild)?,
            "only-of-type" => no_argument(Evaluator::OnlyOfType)?,
            "empty" => no_argument(Evaluator::Empty)?,
            "root" => no_argument(Evaluator::IsRoot)?,

            _ => {
                return Err(SelectorError::UnknownPseudoClass {
                    name: name.to_string(),
                    offset,
                })
            }
        };

        Ok(evaluator)
    }
}

/// Join what was parsed so far with the compound on the right of `combinator`
fn combine(left: Evaluator, combinator: Combinator, right: Evaluator) -> Evaluator {
    let structural = match combinator {
        Combinator::Child => Evaluator::ImmediateParent(Box::new(left)),
        Combinator::Descendant => Evaluator::Ancestor(Box::new(left)),
        Combinator::NextSibling => Evaluator::PreviousSibling(Box::new(left)),
        Combinator::SubsequentSibling => Evaluator::PreviousSiblings(Box::new(left)),
        Combinator::Group => unreachable!("selector groups are split before combinators fold"),
    };
    Evaluator::And(vec![right, structural])
}

/// Lowercase a tag name; `ns|tag` is stored as `ns:tag`
fn normalize_tag(tag: &str) -> String {
    tag.trim_start_matches('|').replace('|', ":").to_ascii_lowercase()
}

/// Parse the inside of `[...]`
fn parse_attribute(inner: &str, offset: usize) -> SelectorResult<Evaluator> {
    let context = "attribute selector";

    let Some(eq) = inner.find('=') else {
        let key = inner.trim();
        if let Some(prefix) = key.strip_prefix('^') {
            if prefix.is_empty() {
                return Err(SelectorError::invalid_argument(context, inner, "empty attribute prefix", offset));
            }
            return Ok(Evaluator::AttributeStarting(prefix.to_ascii_lowercase()));
        }
        if key.is_empty() {
            return Err(SelectorError::invalid_argument(context, inner, "missing attribute name", offset));
        }
        return Ok(Evaluator::Attribute(key.to_ascii_lowercase()));
    };

    let (key_end, op) = match inner[..eq].chars().last() {
        Some('!') => (eq - 1, Some(AttributeOp::NotEquals)),
        Some('^') => (eq - 1, Some(AttributeOp::Prefix)),
        Some('$') => (eq - 1, Some(AttributeOp::Suffix)),
        Some('*') => (eq - 1, Some(AttributeOp::Contains)),
        Some('~') => (eq - 1, None),
        _ => (eq, Some(AttributeOp::Equals)),
    };

    let key = inner[..key_end].trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err(SelectorError::invalid_argument(context, inner, "missing attribute name", offset));
    }

    let value = strip_quotes(inner[eq + 1..].trim()).trim();
    if value.is_empty() {
        return Err(SelectorError::invalid_argument(context, inner, "missing attribute value", offset));
    }

    match op {
        Some(op) => Ok(Evaluator::AttributeValue {
            key,
            op,
            value: value.to_ascii_lowercase(),
        }),
        None => {
            let pattern = Regex::new(value).map_err(|e| {
                SelectorError::invalid_argument(context, value, e.to_string(), offset)
            })?;
            Ok(Evaluator::AttributeMatches { key, pattern })
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn parse_index(context: &str, (arg, offset): (&str, usize)) -> SelectorResult<i32> {
    arg.trim()
        .parse::<i32>()
        .map_err(|_| SelectorError::invalid_argument(context, arg, "index must be an integer", offset))
}

fn parse_nth(context: &str, kind: NthKind, (arg, offset): (&str, usize)) -> SelectorResult<Evaluator> {
    let expr = NthExpr::parse(arg).ok_or_else(|| {
        SelectorError::invalid_argument(context, arg, "expected an+b, odd or even", offset)
    })?;
    Ok(Evaluator::Nth { kind, expr })
}

/// Search text for the `:contains` family, lowercased for matching
fn parse_search_text(context: &str, (arg, offset): (&str, usize)) -> SelectorResult<String> {
    let text = unescape(arg);
    if text.is_empty() {
        return Err(SelectorError::invalid_argument(context, arg, "search text must not be empty", offset));
    }
    Ok(text.to_ascii_lowercase())
}

fn parse_regex(context: &str, (arg, offset): (&str, usize)) -> SelectorResult<Regex> {
    if arg.is_empty() {
        return Err(SelectorError::invalid_argument(context, arg, "pattern must not be empty", offset));
    }
    Regex::new(arg).map_err(|e| SelectorError::invalid_argument(context, arg, e.to_string(), offset))
}
