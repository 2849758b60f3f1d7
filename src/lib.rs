//! Treewalker pulls values out of parsed YAML and JSON trees with compact
//! path expressions.
//!
//! ```
//! use treewalker::{walk_all, Value};
//!
//! let doc: Value = serde_yaml::from_str("
//! users:
//!   - name: alice
//!     email: alice@example.com
//!   - name: bob
//! ").unwrap();
//!
//! let emails = walk_all(&doc, "users[*].email<unknown:str>").unwrap();
//! assert_eq!(emails, vec![Value::from("alice@example.com"), Value::from("unknown")]);
//! ```

pub mod config;
pub mod document;
pub mod path;

pub use config::Syntax;
pub use document::value::{Number, Value};
pub use path::{compile, walk, walk_all, CompileError, Compiler, Path, PathOp, WalkError};
