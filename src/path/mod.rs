//! Path expression compiler and tree walker.
//!
//! A path is a compact expression that pulls values out of nested
//! mappings and sequences.
//!
//! # Supported Syntax
//!
//! - `name` - Mapping entry
//! - `.` - Segment divider
//! - `[n]` - Sequence element (supports negative indices)
//! - `[*]` - Every element
//! - `[start:end]` - Slice; either bound may be `*`
//! - `<value:type>` - Fallback when the value is absent; type is one of
//!   `int`, `str`, `float`, `bool`, `list`, `dict`
//! - `@` - Capture the current value into the result
//! - `a|b` - Alternatives, combined into one result (last segment only)
//! - `,` - Step divider inside an alternative
//! - `{*}` - Mapping wildcard (accepted, currently has no effect)
//!
//! # Examples
//!
//! ```
//! // users[*].name            - every user's name
//! // users[-1].email<none:str> - last user's email, or "none"
//! // @users[0].name|email      - first user, with name and email
//! ```

pub mod ast;
pub mod error;
pub mod ops;
pub mod parser;
pub mod walker;

pub use ast::{Bound, DefaultKind, DefaultValue, Index, IndexMode, MultiValue, Path, PathOp};
pub use error::{CompileError, WalkError};
pub use parser::{compile, Compiler};
pub use walker::{walk, walk_all, IntoPath, Walk};
