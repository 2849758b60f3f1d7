//! Depth-first, lazy evaluation of a path against a tree.

use std::borrow::Cow;
use std::iter::FusedIterator;

use super::ast::{Path, PathOp};
use super::error::{CompileError, WalkError};
use super::ops::{elements, Selection, Trail};
use super::parser::compile;
use crate::document::value::Value;

/// Anything `walk` accepts as a path: text is compiled on the way in.
pub trait IntoPath<'a> {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError>;
}

impl<'a> IntoPath<'a> for &'a Path {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<'a> IntoPath<'a> for Path {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError> {
        Ok(Cow::Owned(self))
    }
}

impl<'a> IntoPath<'a> for &str {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError> {
        compile(self).map(Cow::Owned)
    }
}

impl<'a> IntoPath<'a> for &String {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError> {
        compile(self).map(Cow::Owned)
    }
}

impl<'a> IntoPath<'a> for String {
    fn into_path(self) -> Result<Cow<'a, Path>, CompileError> {
        compile(&self).map(Cow::Owned)
    }
}

/// Lazily walks `root` along `path`.
///
/// Each item is either a bare leaf value or, when the path captures context
/// with `@` or ends in an alternation, a sequence holding the captured values
/// followed by the leaf (or the per-alternative values). Results come out in
/// depth-first, left-to-right order.
///
/// # Example
///
/// ```
/// use treewalker::{walk, Value};
///
/// let doc: Value = serde_yaml::from_str("a: [10, 20, 30]").unwrap();
/// let found: Vec<Value> = walk(&doc, "a[*]").unwrap().collect::<Result<_, _>>().unwrap();
/// assert_eq!(found, vec![Value::from(10), Value::from(20), Value::from(30)]);
/// ```
pub fn walk<'a>(root: &'a Value, path: impl IntoPath<'a>) -> Result<Walk<'a>, WalkError> {
    let path = path.into_path()?;
    Ok(Walk::new(root, path))
}

/// Walks `root` along `path` and collects every result.
pub fn walk_all<'a>(root: &'a Value, path: impl IntoPath<'a>) -> Result<Vec<Value>, WalkError> {
    walk(root, path)?.collect()
}

impl Path {
    /// Lazily walks `root` along this path.
    pub fn walk<'a>(&'a self, root: &'a Value) -> Walk<'a> {
        Walk::new(root, Cow::Borrowed(self))
    }
}

struct Frame<'a> {
    value: Cow<'a, Value>,
    next: usize,
    trail: Trail<'a>,
}

/// Iterator returned by [`walk`].
///
/// Pending branches live on an explicit stack; nothing is evaluated until the
/// next result is pulled. An index applied to a non-sequence yields one
/// error, after which the iterator is exhausted.
pub struct Walk<'a> {
    path: Cow<'a, Path>,
    stack: Vec<Frame<'a>>,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Value, path: Cow<'a, Path>) -> Self {
        tracing::debug!(path = %path, "walking");
        Self {
            path,
            stack: vec![Frame {
                value: Cow::Borrowed(root),
                next: 0,
                trail: Vec::new(),
            }],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Result<Value, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Frame {
            value,
            next,
            mut trail,
        }) = self.stack.pop()
        {
            let op = self.path.ops().get(next);

            // Null ends the branch unless a default is still ahead to fill it.
            if value.is_null()
                && !matches!(
                    op,
                    Some(PathOp::Default(_) | PathOp::PathDivider | PathOp::DictIter)
                )
            {
                continue;
            }

            let Some(op) = op else {
                return Some(Ok(finish(trail, value)));
            };
            tracing::trace!(op = %op, step = next, "applying");

            match op {
                PathOp::MultiValue(multi) => {
                    let values = multi.evaluate(value, &mut trail);
                    let mut out = into_owned(trail);
                    out.extend(values);
                    return Some(Ok(Value::Sequence(out)));
                }
                PathOp::Index(index) => {
                    let Some(len) = value.as_sequence().map(<[Value]>::len) else {
                        self.stack.clear();
                        return Some(Err(WalkError::NonSequenceIndex {
                            index: op.to_string(),
                            found: value.type_name(),
                        }));
                    };

                    let branches = match index.select(len) {
                        Selection::All => elements(value, 0..len),
                        Selection::Slice(range) => elements(value, range),
                        Selection::Element(None) => Vec::new(),
                        Selection::Element(Some(i)) => match elements(value, i..i + 1).pop() {
                            // A selected element that is itself a sequence
                            // fans out one more level.
                            Some(element) if element.is_sequence() => {
                                let inner = element.as_sequence().map_or(0, <[Value]>::len);
                                elements(element, 0..inner)
                            }
                            Some(element) => vec![element],
                            None => Vec::new(),
                        },
                    };

                    self.stack
                        .extend(branches.into_iter().rev().map(|value| Frame {
                            value,
                            next: next + 1,
                            trail: trail.clone(),
                        }));
                }
                _ => {
                    let value = op.apply(value, &mut trail);
                    self.stack.push(Frame {
                        value,
                        next: next + 1,
                        trail,
                    });
                }
            }
        }
        None
    }
}

impl FusedIterator for Walk<'_> {}

fn into_owned(trail: Trail<'_>) -> Vec<Value> {
    trail.into_iter().map(Cow::into_owned).collect()
}

fn finish(trail: Trail<'_>, value: Cow<'_, Value>) -> Value {
    if trail.is_empty() {
        return value.into_owned();
    }
    let mut out = into_owned(trail);
    out.push(value.into_owned());
    Value::Sequence(out)
}
