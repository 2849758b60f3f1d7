//! Evaluation of individual path operations.
//!
//! Values flow through as `Cow` so that navigating a borrowed tree never
//! clones it; only defaults, slices and alternations produce owned values.

use std::borrow::Cow;
use std::ops::Range;

use super::ast::{Bound, DefaultValue, Index, IndexMode, MultiValue, PathOp};
use crate::document::value::Value;

static NULL: Value = Value::Null;

/// Values captured by `@`, in capture order.
pub type Trail<'v> = Vec<Cow<'v, Value>>;

/// What an index picks out of a sequence of a given length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// One position, or `None` when it falls outside the sequence
    Element(Option<usize>),
    /// The whole sequence (`[*]`)
    All,
    /// A clamped `[start, end)` slice, possibly empty
    Slice(Range<usize>),
}

impl Index {
    /// Resolves the bounds against `len` without touching `self`.
    pub fn select(&self, len: usize) -> Selection {
        match self.mode {
            IndexMode::Single => match self.start {
                Bound::Wildcard => Selection::All,
                Bound::At(at) => Selection::Element(resolve_position(at, len)),
            },
            IndexMode::Range => {
                let start = resolve_bound(self.start, 0, len);
                let end = resolve_bound(self.end, len, len);
                Selection::Slice(start..end.max(start))
            }
        }
    }

    /// Applies the index to a value; non-sequences pass through unchanged.
    pub fn apply<'v>(&self, current: Cow<'v, Value>) -> Cow<'v, Value> {
        let len = match current.as_ref() {
            Value::Sequence(items) => items.len(),
            _ => return current,
        };

        match self.select(len) {
            Selection::All => current,
            Selection::Element(None) => Cow::Borrowed(&NULL),
            Selection::Element(Some(i)) => elements(current, i..i + 1)
                .pop()
                .unwrap_or(Cow::Borrowed(&NULL)),
            Selection::Slice(range) => Cow::Owned(Value::Sequence(
                elements(current, range)
                    .into_iter()
                    .map(Cow::into_owned)
                    .collect(),
            )),
        }
    }
}

fn resolve_position(at: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let pos = if at < 0 { len + at } else { at };
    (0..len).contains(&pos).then_some(pos as usize)
}

fn resolve_bound(bound: Bound, unbounded: usize, len: usize) -> usize {
    match bound {
        Bound::Wildcard => unbounded,
        Bound::At(at) => {
            let len = len as i64;
            let pos = if at < 0 { len + at } else { at };
            pos.clamp(0, len) as usize
        }
    }
}

/// Splits `range` out of a sequence, borrowing when the sequence is borrowed.
///
/// `range` must lie within the sequence; anything but a sequence yields
/// nothing.
pub(crate) fn elements<'v>(seq: Cow<'v, Value>, range: Range<usize>) -> Vec<Cow<'v, Value>> {
    match seq {
        Cow::Borrowed(Value::Sequence(items)) => items[range].iter().map(Cow::Borrowed).collect(),
        Cow::Owned(Value::Sequence(mut items)) => {
            items.truncate(range.end);
            items.drain(..range.start);
            items.into_iter().map(Cow::Owned).collect()
        }
        _ => Vec::new(),
    }
}

/// Looks `name` up in a mapping; other values pass through unchanged.
pub(crate) fn lookup<'v>(current: Cow<'v, Value>, name: &str) -> Cow<'v, Value> {
    match current {
        Cow::Borrowed(Value::Mapping(map)) => Cow::Borrowed(map.get(name).unwrap_or(&NULL)),
        Cow::Owned(Value::Mapping(mut map)) => Cow::Owned(map.shift_remove(name).unwrap_or_default()),
        other => other,
    }
}

impl DefaultValue {
    /// Substitutes the fallback for an absent value.
    pub fn apply<'v>(&self, current: Cow<'v, Value>) -> Cow<'v, Value> {
        if current.is_null() {
            Cow::Owned(self.value.clone())
        } else {
            current
        }
    }
}

impl MultiValue {
    /// Runs every sub-path from `current`, in declaration order, and collects
    /// one value per sub-path. The trail is threaded through the sub-paths in
    /// turn, so captures made by earlier ones precede later ones.
    pub fn evaluate<'v>(&self, current: Cow<'v, Value>, trail: &mut Trail<'v>) -> Vec<Value> {
        let mut values = Vec::with_capacity(self.paths().len());
        for path in self.paths() {
            let mut value = current.clone();
            for op in path.ops() {
                value = op.apply(value, trail);
            }
            values.push(value.into_owned());
        }
        values
    }
}

impl PathOp {
    /// Applies this step to `current`, recording captures in `trail`.
    pub fn apply<'v>(&self, current: Cow<'v, Value>, trail: &mut Trail<'v>) -> Cow<'v, Value> {
        match self {
            PathOp::Key(name) => lookup(current, name),
            PathOp::Index(index) => index.apply(current),
            PathOp::Default(default) => default.apply(current),
            PathOp::AddContext => {
                trail.push(current.clone());
                current
            }
            PathOp::MultiValue(multi) => Cow::Owned(Value::Sequence(multi.evaluate(current, trail))),
            PathOp::PathDivider | PathOp::DictIter => current,
        }
    }
}
