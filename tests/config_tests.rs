use std::fs;
use tempfile::TempDir;
use treewalker::config::{Syntax, SyntaxError};
use treewalker::{walk_all, Compiler, Value};

#[test]
fn test_default_config() {
    let syntax = Syntax::default();
    assert_eq!(syntax.segment_divider, '.');
    assert_eq!(syntax.context_marker, '@');
    assert_eq!(syntax.index_open, '[');
    assert_eq!(syntax.index_close, ']');
    assert_eq!(syntax.range_separator, ':');
    assert_eq!(syntax.wildcard, '*');
    assert_eq!(syntax.default_open, '<');
    assert_eq!(syntax.default_close, '>');
    assert_eq!(syntax.type_delimiter, ':');
    assert_eq!(syntax.alternation, '|');
    assert_eq!(syntax.alternation_continuation, ',');
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("syntax.toml");
    fs::write(&path, "segment_divider = \"/\"\ncontext_marker = \"^\"\n").unwrap();

    let syntax = Syntax::load_from(&path).unwrap();
    assert_eq!(syntax.segment_divider, '/');
    assert_eq!(syntax.context_marker, '^');
    assert_eq!(syntax.wildcard, '*');

    let compiler = Compiler::new(syntax).unwrap();
    let doc: Value = serde_yaml::from_str("a:\n  b.c: 1\n").unwrap();
    let path = compiler.compile("^a/b.c").unwrap();
    assert_eq!(
        walk_all(&doc, &path).unwrap(),
        vec![Value::Sequence(vec![
            serde_yaml::from_str("a:\n  b.c: 1\n").unwrap(),
            Value::from(1),
        ])]
    );
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = Syntax::load_from(dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read syntax file"));
}

#[test]
fn test_load_rejects_clashing_delimiters() {
    let err = Syntax::from_toml_str("alternation = \",\"\n").unwrap_err();
    assert_eq!(
        err.downcast_ref::<SyntaxError>(),
        Some(&SyntaxError::Duplicate {
            ch: ',',
            first: "alternation",
            second: "alternation continuation",
        })
    );
}

#[test]
fn test_load_rejects_bad_toml() {
    assert!(Syntax::from_toml_str("segment_divider = \"ab\"\n").is_err());
    assert!(Syntax::from_toml_str("segment_divider = 3\n").is_err());
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("syntax.toml");
    let syntax = Syntax {
        alternation: '+',
        ..Syntax::default()
    };

    syntax.save_to(&path).unwrap();
    assert_eq!(Syntax::load_from(&path).unwrap(), syntax);
}
