//! Compiled path types.

use std::fmt;

use super::error::CompileError;
use crate::config::Syntax;
use crate::document::value::Value;

/// One side of an index or range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Unbounded (`*`)
    Wildcard,
    /// An explicit position; negative values count from the end
    At(i64),
}

impl Bound {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Bound::Wildcard)
    }
}

/// Whether an index selects one element or a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    Single,
    Range,
}

/// Sequence selection (`[n]`, `[*]`, `[start:end]`).
///
/// Bounds are fixed at compile time; every evaluation resolves them against
/// the length of the sequence at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index {
    pub start: Bound,
    pub end: Bound,
    pub mode: IndexMode,
}

impl Index {
    /// A single-element index. `Bound::Wildcard` selects every element.
    pub fn single(at: Bound) -> Self {
        Self {
            start: at,
            end: Bound::Wildcard,
            mode: IndexMode::Single,
        }
    }

    /// A `[start, end)` range.
    pub fn range(start: Bound, end: Bound) -> Self {
        Self {
            start,
            end,
            mode: IndexMode::Range,
        }
    }

    /// True when the index yields exactly one value wherever it is applied.
    pub fn is_fully_bounded(&self) -> bool {
        match self.mode {
            IndexMode::Single => !self.start.is_wildcard(),
            IndexMode::Range => !self.start.is_wildcard() && !self.end.is_wildcard(),
        }
    }
}

/// Target type of a default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKind {
    Int,
    Str,
    Float,
    Bool,
    /// A YAML flow sequence such as `[1, 'a', null]`. Python spellings are
    /// not special: `None` reads as the text "None" and a tuple `(1, 2)` is
    /// not a list.
    List,
    /// A YAML flow mapping such as `{'k': [1, 2]}`.
    Dict,
}

impl DefaultKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(DefaultKind::Int),
            "str" => Some(DefaultKind::Str),
            "float" => Some(DefaultKind::Float),
            "bool" => Some(DefaultKind::Bool),
            "list" => Some(DefaultKind::List),
            "dict" => Some(DefaultKind::Dict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultKind::Int => "int",
            DefaultKind::Str => "str",
            DefaultKind::Float => "float",
            DefaultKind::Bool => "bool",
            DefaultKind::List => "list",
            DefaultKind::Dict => "dict",
        }
    }
}

impl fmt::Display for DefaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fallback used when the current value is absent (`<value:type>`).
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValue {
    /// The coerced fallback.
    pub value: Value,
    pub kind: DefaultKind,
    /// Value text as written, quotes included.
    pub source: String,
}

/// Alternative sub-paths evaluated against the same value (`a|b[0]`).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiValue {
    paths: Vec<Path>,
}

impl MultiValue {
    /// Builds an alternation, rejecting sub-paths that could yield anything
    /// other than exactly one value.
    pub fn new(paths: Vec<Path>) -> Result<Self, CompileError> {
        for path in &paths {
            for op in path.ops() {
                match op {
                    PathOp::MultiValue(_) => {
                        return Err(CompileError::NestedAlternation {
                            fragment: path.to_string(),
                        })
                    }
                    PathOp::DictIter => {
                        return Err(CompileError::DictIterInAlternation {
                            fragment: path.to_string(),
                        })
                    }
                    PathOp::Index(index) if !index.is_fully_bounded() => {
                        return Err(CompileError::UnboundedIndexInAlternation {
                            fragment: path.to_string(),
                        })
                    }
                    _ => {}
                }
            }
        }
        Ok(Self { paths })
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }
}

/// A single step of a compiled path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOp {
    /// Named mapping entry
    Key(String),
    /// Sequence element or slice
    Index(Index),
    /// Fallback for an absent value
    Default(DefaultValue),
    /// Capture the current value into the trail (`@`)
    AddContext,
    /// Alternative sub-paths; always the last step
    MultiValue(MultiValue),
    /// Segment boundary, no effect on evaluation
    PathDivider,
    /// Mapping wildcard (`{*}`), currently inert
    DictIter,
}

impl PathOp {
    fn write(&self, out: &mut String, syntax: &Syntax, divider: char) {
        match self {
            PathOp::Key(name) => out.push_str(name),
            PathOp::Index(index) => {
                let bound = |out: &mut String, bound: Bound| match bound {
                    Bound::Wildcard => out.push(syntax.wildcard),
                    Bound::At(at) => out.push_str(&at.to_string()),
                };
                out.push(syntax.index_open);
                bound(out, index.start);
                if index.mode == IndexMode::Range {
                    out.push(syntax.range_separator);
                    bound(out, index.end);
                }
                out.push(syntax.index_close);
            }
            PathOp::Default(default) => {
                out.push(syntax.default_open);
                out.push_str(&default.source);
                out.push(syntax.type_delimiter);
                out.push_str(default.kind.as_str());
                out.push(syntax.default_close);
            }
            PathOp::AddContext => out.push(syntax.context_marker),
            PathOp::MultiValue(multi) => {
                for (i, path) in multi.paths.iter().enumerate() {
                    if i > 0 {
                        out.push(syntax.alternation);
                    }
                    write_ops(path.ops(), out, syntax, syntax.alternation_continuation);
                }
            }
            PathOp::PathDivider => out.push(divider),
            PathOp::DictIter => {
                out.push(syntax.dict_iter_open);
                out.push(syntax.wildcard);
                out.push(syntax.dict_iter_close);
            }
        }
    }
}

/// Writes `ops` in order. A key runs into whatever name follows it, so a
/// divider is written between a key and a following key or alternation.
fn write_ops(ops: &[PathOp], out: &mut String, syntax: &Syntax, divider: char) {
    let mut prev: Option<&PathOp> = None;
    for op in ops {
        if matches!(prev, Some(PathOp::Key(_)))
            && matches!(op, PathOp::Key(_) | PathOp::MultiValue(_))
        {
            out.push(divider);
        }
        op.write(out, syntax, divider);
        prev = Some(op);
    }
}

/// Characters a key name cannot hold and still read back as one key.
fn key_stops(syntax: &Syntax) -> [char; 7] {
    [
        syntax.segment_divider,
        syntax.context_marker,
        syntax.index_open,
        syntax.default_open,
        syntax.dict_iter_open,
        syntax.alternation,
        syntax.alternation_continuation,
    ]
}

impl fmt::Display for PathOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let syntax = Syntax::default();
        let mut out = String::new();
        self.write(&mut out, &syntax, syntax.segment_divider);
        f.write_str(&out)
    }
}

/// A compiled path expression.
///
/// Immutable once built; one path can be walked over any number of trees,
/// from any number of threads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    /// Builds a path from operations, requiring any alternation to be last.
    ///
    /// Key names must be non-empty, without surrounding whitespace, and free
    /// of the default syntax's delimiters, so the path renders to text that
    /// compiles back to the same walk.
    pub fn new(ops: Vec<PathOp>) -> Result<Self, CompileError> {
        let stops = key_stops(&Syntax::default());
        for op in &ops {
            if let PathOp::Key(name) = op {
                if name.is_empty() || name.trim() != name {
                    return Err(CompileError::malformed(
                        name,
                        "key must be non-empty without surrounding whitespace",
                    ));
                }
                if let Some(ch) = name.chars().find(|c| stops.contains(c)) {
                    return Err(CompileError::malformed(
                        name,
                        format!("key cannot contain '{}'", ch),
                    ));
                }
            }
        }

        let last = ops.len().saturating_sub(1);
        if let Some(op) = ops
            .iter()
            .enumerate()
            .find_map(|(i, op)| (i != last && matches!(op, PathOp::MultiValue(_))).then_some(op))
        {
            return Err(CompileError::MisplacedAlternation {
                fragment: op.to_string(),
            });
        }
        Ok(Self { ops })
    }

    pub(crate) fn from_ops(ops: Vec<PathOp>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Writes the path back out as text in the given syntax.
    pub fn render(&self, syntax: &Syntax) -> String {
        let mut out = String::new();
        write_ops(&self.ops, &mut out, syntax, syntax.segment_divider);
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&Syntax::default()))
    }
}
