//! Delimiter configuration for the path language.
//!
//! Every character with a syntactic role in a path expression lives in
//! [`Syntax`], with defaults and support for serialization/deserialization
//! via serde. A syntax can be loaded from a TOML file; fields missing from
//! the file keep their defaults.
//!
//! # Example
//!
//! ```
//! use treewalker::config::Syntax;
//!
//! let syntax = Syntax::default();
//! assert_eq!(syntax.segment_divider, '.');
//! assert_eq!(syntax.context_marker, '@');
//!
//! let custom = Syntax {
//!     segment_divider: '/',
//!     ..Syntax::default()
//! };
//! assert!(custom.validate().is_ok());
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors reported by [`Syntax::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("delimiter '{ch}' for {first} is also used for {second}")]
    Duplicate {
        ch: char,
        first: &'static str,
        second: &'static str,
    },

    #[error("delimiter '{ch}' for {role} must not be alphanumeric or whitespace")]
    Unusable { ch: char, role: &'static str },
}

/// Characters that give a path expression its structure.
///
/// # Fields
///
/// * `segment_divider` - Separates path segments (default: `.`)
/// * `context_marker` - Captures the current value into the trail (default: `@`)
/// * `index_open` / `index_close` - Delimit an index or range (default: `[` `]`)
/// * `range_separator` - Splits range bounds inside an index (default: `:`)
/// * `wildcard` - Unbounded index side, or every mapping entry (default: `*`)
/// * `default_open` / `default_close` - Delimit a default value (default: `<` `>`)
/// * `type_delimiter` - Splits a default's value from its type (default: `:`)
/// * `alternation` - Separates alternative sub-paths (default: `|`)
/// * `alternation_continuation` - Divides steps inside a sub-path (default: `,`)
/// * `dict_iter_open` / `dict_iter_close` - Delimit a mapping wildcard (default: `{` `}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    #[serde(default = "default_segment_divider")]
    pub segment_divider: char,

    #[serde(default = "default_context_marker")]
    pub context_marker: char,

    #[serde(default = "default_index_open")]
    pub index_open: char,

    #[serde(default = "default_index_close")]
    pub index_close: char,

    #[serde(default = "default_range_separator")]
    pub range_separator: char,

    #[serde(default = "default_wildcard")]
    pub wildcard: char,

    #[serde(default = "default_default_open")]
    pub default_open: char,

    #[serde(default = "default_default_close")]
    pub default_close: char,

    #[serde(default = "default_type_delimiter")]
    pub type_delimiter: char,

    #[serde(default = "default_alternation")]
    pub alternation: char,

    #[serde(default = "default_alternation_continuation")]
    pub alternation_continuation: char,

    #[serde(default = "default_dict_iter_open")]
    pub dict_iter_open: char,

    #[serde(default = "default_dict_iter_close")]
    pub dict_iter_close: char,
}

fn default_segment_divider() -> char {
    '.'
}

fn default_context_marker() -> char {
    '@'
}

fn default_index_open() -> char {
    '['
}

fn default_index_close() -> char {
    ']'
}

fn default_range_separator() -> char {
    ':'
}

fn default_wildcard() -> char {
    '*'
}

fn default_default_open() -> char {
    '<'
}

fn default_default_close() -> char {
    '>'
}

fn default_type_delimiter() -> char {
    ':'
}

fn default_alternation() -> char {
    '|'
}

fn default_alternation_continuation() -> char {
    ','
}

fn default_dict_iter_open() -> char {
    '{'
}

fn default_dict_iter_close() -> char {
    '}'
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            segment_divider: default_segment_divider(),
            context_marker: default_context_marker(),
            index_open: default_index_open(),
            index_close: default_index_close(),
            range_separator: default_range_separator(),
            wildcard: default_wildcard(),
            default_open: default_default_open(),
            default_close: default_default_close(),
            type_delimiter: default_type_delimiter(),
            alternation: default_alternation(),
            alternation_continuation: default_alternation_continuation(),
            dict_iter_open: default_dict_iter_open(),
            dict_iter_close: default_dict_iter_close(),
        }
    }
}

impl Syntax {
    /// Characters that are significant while scanning a segment, by role.
    fn structural(&self) -> [(&'static str, char); 11] {
        [
            ("segment divider", self.segment_divider),
            ("context marker", self.context_marker),
            ("index open", self.index_open),
            ("index close", self.index_close),
            ("wildcard", self.wildcard),
            ("default open", self.default_open),
            ("default close", self.default_close),
            ("alternation", self.alternation),
            ("alternation continuation", self.alternation_continuation),
            ("dict-iter open", self.dict_iter_open),
            ("dict-iter close", self.dict_iter_close),
        ]
    }

    /// Checks that the delimiters can be told apart while scanning.
    ///
    /// The range separator and type delimiter only matter inside their
    /// brackets, so they may share a character with each other but not with
    /// the wildcard, the minus sign, or their own closing bracket.
    pub fn validate(&self) -> Result<(), SyntaxError> {
        let structural = self.structural();
        let scoped = [
            ("range separator", self.range_separator),
            ("type delimiter", self.type_delimiter),
        ];

        for &(role, ch) in structural.iter().chain(scoped.iter()) {
            if ch.is_alphanumeric() || ch.is_whitespace() {
                return Err(SyntaxError::Unusable { ch, role });
            }
        }

        for (i, &(first, a)) in structural.iter().enumerate() {
            if let Some(&(second, _)) = structural[i + 1..].iter().find(|&&(_, b)| a == b) {
                return Err(SyntaxError::Duplicate {
                    ch: a,
                    first,
                    second,
                });
            }
        }

        let clashes = [
            ("range separator", self.range_separator, "index close", self.index_close),
            ("range separator", self.range_separator, "wildcard", self.wildcard),
            ("range separator", self.range_separator, "minus sign", '-'),
            ("type delimiter", self.type_delimiter, "default close", self.default_close),
        ];
        for (first, a, second, b) in clashes {
            if a == b {
                return Err(SyntaxError::Duplicate { ch: a, first, second });
            }
        }

        Ok(())
    }

    /// Parses a syntax from TOML text and validates it.
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let syntax: Syntax = toml::from_str(contents).context("Failed to parse syntax TOML")?;
        syntax.validate()?;
        Ok(syntax)
    }

    /// Loads and validates a syntax from a TOML file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read syntax file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Writes the syntax as TOML to `path`.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)
            .with_context(|| format!("Failed to write syntax file {}", path.display()))?;

        Ok(())
    }
}
