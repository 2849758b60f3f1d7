//! Path expression compiler.
//!
//! The text is split into segments on the segment divider, then each segment
//! is scanned left to right, dispatching on the character at the head of
//! what remains.

use std::str::FromStr;

use super::ast::{Bound, DefaultKind, DefaultValue, Index, MultiValue, Path, PathOp};
use super::error::CompileError;
use crate::config::{Syntax, SyntaxError};
use crate::document::value::Value;

/// Compiles path expressions written in a particular [`Syntax`].
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    syntax: Syntax,
}

/// Compiles `text` with the default syntax.
///
/// # Example
///
/// ```
/// use treewalker::compile;
///
/// let path = compile("users[0].name<anonymous:str>").unwrap();
/// assert_eq!(path.to_string(), "users[0].name<anonymous:str>");
/// assert!(compile("a|b.c").is_err());
/// ```
pub fn compile(text: &str) -> Result<Path, CompileError> {
    Compiler::default().compile(text)
}

impl FromStr for Path {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl Compiler {
    /// Creates a compiler for a custom syntax, validating it first.
    pub fn new(syntax: Syntax) -> Result<Self, SyntaxError> {
        syntax.validate()?;
        Ok(Self { syntax })
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Compiles a path expression.
    pub fn compile(&self, text: &str) -> Result<Path, CompileError> {
        let ops = self.compile_ops(text)?;
        tracing::debug!(path = text, ops = ops.len(), "compiled path");
        Ok(Path::from_ops(ops))
    }

    fn compile_ops(&self, text: &str) -> Result<Vec<PathOp>, CompileError> {
        let segments = self.split_top_level(text, self.syntax.segment_divider);
        let last = segments.len() - 1;

        let mut ops = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            self.compile_segment(segment.trim(), i == last, &mut ops)?;
            if i < last {
                ops.push(PathOp::PathDivider);
            }
        }
        Ok(ops)
    }

    fn compile_segment(
        &self,
        segment: &str,
        is_last: bool,
        ops: &mut Vec<PathOp>,
    ) -> Result<(), CompileError> {
        let s = &self.syntax;
        let mut rest = segment;

        loop {
            rest = rest.trim_start();
            let Some(head) = rest.chars().next() else {
                break;
            };

            if head == s.context_marker {
                ops.push(PathOp::AddContext);
                rest = &rest[head.len_utf8()..];
            } else if head == s.index_open {
                let (bracketed, after) = split_bracketed(rest, s.index_close, false)?;
                ops.push(PathOp::Index(self.parse_index(bracketed)?));
                rest = after;
            } else if head == s.default_open {
                let (bracketed, after) = split_bracketed(rest, s.default_close, true)?;
                ops.push(PathOp::Default(self.parse_default(bracketed)?));
                rest = after;
            } else if head == s.dict_iter_open {
                let (bracketed, after) = split_bracketed(rest, s.dict_iter_close, false)?;
                self.parse_dict_iter(bracketed)?;
                ops.push(PathOp::DictIter);
                rest = after;
            } else if self.split_top_level(rest, s.alternation).len() > 1 {
                if !is_last {
                    return Err(CompileError::MisplacedAlternation {
                        fragment: segment.to_string(),
                    });
                }
                let paths = self
                    .split_top_level(rest, s.alternation)
                    .into_iter()
                    .map(|sub| self.compile_ops(sub.trim()).map(Path::from_ops))
                    .collect::<Result<Vec<_>, _>>()?;
                ops.push(PathOp::MultiValue(MultiValue::new(paths)?));
                break;
            } else if head == s.alternation_continuation || head == s.segment_divider {
                ops.push(PathOp::PathDivider);
                rest = &rest[head.len_utf8()..];
            } else {
                let stops = [
                    s.index_open,
                    s.default_open,
                    s.dict_iter_open,
                    s.context_marker,
                    s.alternation_continuation,
                    s.segment_divider,
                ];
                let end = rest.find(|c| stops.contains(&c)).unwrap_or(rest.len());
                ops.push(PathOp::Key(rest[..end].trim().to_string()));
                rest = &rest[end..];
            }
        }

        Ok(())
    }

    /// Splits on `sep` where it is not inside an index or a default.
    fn split_top_level<'t>(&self, text: &'t str, sep: char) -> Vec<&'t str> {
        let s = &self.syntax;
        let mut parts = Vec::new();
        let mut start = 0;
        let mut index_depth = 0usize;
        let mut in_default = false;
        let mut quote: Option<char> = None;

        for (i, c) in text.char_indices() {
            if let Some(q) = quote {
                if c == q {
                    quote = None;
                }
            } else if in_default {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                } else if c == s.default_close {
                    in_default = false;
                }
            } else if c == s.default_open {
                in_default = true;
            } else if c == s.index_open {
                index_depth += 1;
            } else if c == s.index_close {
                index_depth = index_depth.saturating_sub(1);
            } else if c == sep && index_depth == 0 {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
        }
        parts.push(&text[start..]);
        parts
    }

    /// Parses `[n]`, `[*]` or `[start:end]`.
    fn parse_index(&self, text: &str) -> Result<Index, CompileError> {
        let s = &self.syntax;
        let inner = strip_brackets(text, s.index_open, s.index_close);

        let bound = |part: &str| -> Result<Bound, CompileError> {
            let part = part.trim();
            if part.chars().eq(std::iter::once(s.wildcard)) {
                Ok(Bound::Wildcard)
            } else if is_integer_literal(part) {
                part.parse::<i64>()
                    .map(Bound::At)
                    .map_err(|_| CompileError::malformed(text, format!("index {} is out of range", part)))
            } else {
                Err(CompileError::malformed(
                    text,
                    format!("index must be an integer or '{}'", s.wildcard),
                ))
            }
        };

        match inner.split_once(s.range_separator) {
            Some((_, end)) if end.contains(s.range_separator) => Err(CompileError::malformed(
                text,
                "a range takes exactly two bounds",
            )),
            Some((start, end)) => Ok(Index::range(bound(start)?, bound(end)?)),
            None => Ok(Index::single(bound(inner)?)),
        }
    }

    /// Parses `<value:type>`, coercing the value once here.
    fn parse_default(&self, text: &str) -> Result<DefaultValue, CompileError> {
        let s = &self.syntax;
        let inner = strip_brackets(text, s.default_open, s.default_close);
        let Some((source, type_name)) = inner.rsplit_once(s.type_delimiter) else {
            return Err(CompileError::malformed(
                text,
                format!(
                    "default must be in the form {}value{}type{}",
                    s.default_open, s.type_delimiter, s.default_close
                ),
            ));
        };

        let source = source.trim();
        let type_name = type_name.trim();
        let kind = DefaultKind::from_name(type_name).ok_or_else(|| {
            CompileError::UnknownDefaultType {
                type_name: type_name.to_string(),
                fragment: text.to_string(),
            }
        })?;

        Ok(DefaultValue {
            value: coerce(source, kind, text)?,
            kind,
            source: source.to_string(),
        })
    }

    /// Accepts only `{*}`.
    fn parse_dict_iter(&self, text: &str) -> Result<(), CompileError> {
        let s = &self.syntax;
        let inner = strip_brackets(text, s.dict_iter_open, s.dict_iter_close);
        if inner.trim().chars().eq(std::iter::once(s.wildcard)) {
            Ok(())
        } else {
            Err(CompileError::malformed(
                text,
                format!(
                    "mapping wildcard must be {}{}{}",
                    s.dict_iter_open, s.wildcard, s.dict_iter_close
                ),
            ))
        }
    }
}

/// Splits `text` (which starts with an opening bracket) after its matching
/// `close`, returning the bracketed part and the remainder.
fn split_bracketed(text: &str, close: char, quoted: bool) -> Result<(&str, &str), CompileError> {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices().skip(1) {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if quoted && (c == '\'' || c == '"') => quote = Some(c),
            None if c == close => return Ok(text.split_at(i + c.len_utf8())),
            None => {}
        }
    }
    Err(CompileError::malformed(text, format!("missing closing '{}'", close)))
}

fn strip_brackets(text: &str, open: char, close: char) -> &str {
    text.strip_prefix(open)
        .and_then(|t| t.strip_suffix(close))
        .unwrap_or(text)
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Converts a default's text to its declared type.
///
/// Numbers that don't parse stay text; list and dict literals that don't
/// parse are errors.
fn coerce(source: &str, kind: DefaultKind, fragment: &str) -> Result<Value, CompileError> {
    let text = if source.contains(['\'', '"']) {
        source.trim_matches('\'').trim_matches('"')
    } else {
        source
    };

    let value = match kind {
        DefaultKind::Int => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| keep_text(text, kind)),
        DefaultKind::Float => text
            .parse::<f64>()
            .map(Value::from)
            .unwrap_or_else(|_| keep_text(text, kind)),
        DefaultKind::Str => Value::from(text),
        DefaultKind::Bool => Value::Bool(matches!(text.to_lowercase().as_str(), "true" | "1")),
        DefaultKind::List | DefaultKind::Dict => parse_literal(text, kind, fragment)?,
    };
    Ok(value)
}

fn keep_text(text: &str, kind: DefaultKind) -> Value {
    tracing::warn!(value = text, kind = %kind, "default does not coerce, keeping it as text");
    Value::from(text)
}

fn parse_literal(text: &str, kind: DefaultKind, fragment: &str) -> Result<Value, CompileError> {
    let invalid = |message: String| CompileError::InvalidDefaultLiteral {
        kind: kind.as_str(),
        fragment: fragment.to_string(),
        message,
    };

    let value: Value = serde_yaml::from_str(text).map_err(|err| invalid(err.to_string()))?;
    let shape_ok = match kind {
        DefaultKind::List => value.is_sequence(),
        _ => value.is_mapping(),
    };
    if shape_ok {
        Ok(value)
    } else {
        Err(invalid(format!("expected a {}, found {}", kind, value.type_name())))
    }
}
