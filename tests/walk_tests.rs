//! Integration tests for walking trees with path expressions.

use serde_json::json;
use treewalker::path::MultiValue;
use treewalker::{compile, walk, walk_all, Path, PathOp, Value, WalkError};

fn tree(value: serde_json::Value) -> Value {
    serde_json::from_value(value).unwrap()
}

fn values(items: serde_json::Value) -> Vec<Value> {
    match tree(items) {
        Value::Sequence(items) => items,
        other => panic!("expected a sequence, got {:?}", other),
    }
}

/// Helper to create a sample bookstore structure
fn create_bookstore() -> Value {
    tree(json!({
        "store": {
            "book": [
                {"category": "reference", "author": "Nigel Rees", "price": 8.95},
                {"category": "fiction", "author": "Herman Melville", "price": 8.99},
                {"category": "fiction", "author": "J. R. R. Tolkien", "isbn": "0-395-19395-8", "price": 22.99}
            ],
            "bicycle": {"color": "red", "price": 19.95}
        }
    }))
}

#[test]
fn test_missing_key_yields_nothing() {
    let doc = tree(json!({"a": {}}));
    assert!(walk_all(&doc, "a.b").unwrap().is_empty());
}

#[test]
fn test_default_substitutes_only_when_absent() {
    assert_eq!(
        walk_all(&tree(json!({"a": null})), "a<5:int>").unwrap(),
        vec![Value::from(5)]
    );
    assert_eq!(
        walk_all(&tree(json!({"a": 3})), "a<5:int>").unwrap(),
        vec![Value::from(3)]
    );
    assert_eq!(
        walk_all(&tree(json!({})), "a<5:int>").unwrap(),
        vec![Value::from(5)]
    );
}

#[test]
fn test_default_after_divider() {
    assert_eq!(
        walk_all(&tree(json!({})), "a.<x:str>").unwrap(),
        vec![Value::from("x")]
    );
}

#[test]
fn test_wildcard_fans_out_in_order() {
    let doc = tree(json!({"a": [10, 20, 30]}));
    assert_eq!(
        walk_all(&doc, "a[*]").unwrap(),
        vec![Value::from(10), Value::from(20), Value::from(30)]
    );
}

#[test]
fn test_negative_index_resolves_per_walk() {
    let path = compile("[-1]").unwrap();
    let long = tree(json!([1, 2, 3]));
    let short = tree(json!([1, 2]));

    assert_eq!(walk_all(&long, &path).unwrap(), vec![Value::from(3)]);
    assert_eq!(walk_all(&short, &path).unwrap(), vec![Value::from(2)]);
    assert_eq!(walk_all(&long, &path).unwrap(), vec![Value::from(3)]);
}

#[test]
fn test_partial_range_resolves_per_walk() {
    let path = compile("[-2:*]").unwrap();
    assert_eq!(
        walk_all(&tree(json!([1, 2, 3, 4])), &path).unwrap(),
        vec![Value::from(3), Value::from(4)]
    );
    assert_eq!(
        walk_all(&tree(json!([7])), &path).unwrap(),
        vec![Value::from(7)]
    );
}

#[test]
fn test_out_of_range_index_yields_nothing() {
    let doc = tree(json!({"a": [1, 2]}));
    assert!(walk_all(&doc, "a[5]").unwrap().is_empty());
    assert!(walk_all(&doc, "a[-3]").unwrap().is_empty());
    assert!(walk_all(&doc, "a[4:9]").unwrap().is_empty());
    assert!(walk_all(&doc, "a[1:0]").unwrap().is_empty());
}

#[test]
fn test_context_capture() {
    let doc = tree(json!({"a": {"b": 7}}));
    assert_eq!(
        walk_all(&doc, "@a.@b").unwrap(),
        vec![Value::Sequence(values(json!([{"a": {"b": 7}}, {"b": 7}, 7])))]
    );
    assert_eq!(
        walk_all(&doc, "a.@b").unwrap(),
        vec![Value::Sequence(values(json!([{"b": 7}, 7])))]
    );
}

#[test]
fn test_context_is_shared_across_fan_out() {
    let doc = tree(json!({"groups": [{"name": "x", "ids": [1, 2]}, {"name": "y", "ids": [3]}]}));
    assert_eq!(
        walk_all(&doc, "groups[*].@ids[*]").unwrap(),
        vec![
            Value::Sequence(values(json!([{"name": "x", "ids": [1, 2]}, 1]))),
            Value::Sequence(values(json!([{"name": "x", "ids": [1, 2]}, 2]))),
            Value::Sequence(values(json!([{"name": "y", "ids": [3]}, 3]))),
        ]
    );
    assert_eq!(
        walk_all(&doc, "groups[*].ids.@[-1]").unwrap(),
        vec![
            Value::Sequence(values(json!([[1, 2], 2]))),
            Value::Sequence(values(json!([[3], 3]))),
        ]
    );
}

#[test]
fn test_alternation_combines_branches() {
    let doc = tree(json!({"a": 1, "b": 2}));
    assert_eq!(
        walk_all(&doc, "a|b").unwrap(),
        vec![Value::Sequence(vec![Value::from(1), Value::from(2)])]
    );
}

#[test]
fn test_alternation_per_fan_out_branch() {
    let doc = create_bookstore();
    assert_eq!(
        walk_all(&doc, "store.book[*].author|isbn<none:str>").unwrap(),
        vec![
            Value::Sequence(values(json!(["Nigel Rees", "none"]))),
            Value::Sequence(values(json!(["Herman Melville", "none"]))),
            Value::Sequence(values(json!(["J. R. R. Tolkien", "0-395-19395-8"]))),
        ]
    );
}

#[test]
fn test_alternation_keeps_missing_values_as_null() {
    let doc = tree(json!({"a": 1}));
    assert_eq!(
        walk_all(&doc, "a|b").unwrap(),
        vec![Value::Sequence(vec![Value::from(1), Value::Null])]
    );
}

#[test]
fn test_alternation_with_context() {
    let doc = tree(json!({"user": {"name": "ann", "tags": ["x", "y"]}}));
    assert_eq!(
        walk_all(&doc, "@user.name|tags[-1]").unwrap(),
        vec![Value::Sequence(values(json!([
            {"user": {"name": "ann", "tags": ["x", "y"]}},
            "ann",
            "y"
        ])))]
    );
}

#[test]
fn test_alternation_subpath_continuation() {
    let doc = tree(json!({"x": {"a": {"b": 1}, "c": 2}}));
    assert_eq!(
        walk_all(&doc, "x.a,b|c").unwrap(),
        vec![Value::Sequence(vec![Value::from(1), Value::from(2)])]
    );
}

#[test]
fn test_key_on_non_mapping_passes_through() {
    let doc = tree(json!({"a": 5}));
    assert_eq!(walk_all(&doc, "a.b").unwrap(), vec![Value::from(5)]);
}

#[test]
fn test_index_on_non_sequence_is_an_error() {
    let doc = tree(json!({"a": {"b": 1}}));
    let mut results = walk(&doc, "a[0]").unwrap();
    assert!(matches!(
        results.next(),
        Some(Err(WalkError::NonSequenceIndex { found: "dict", .. }))
    ));
    assert!(results.next().is_none());
    assert!(walk_all(&doc, "a[0]").is_err());
}

/// A single index that lands on a nested sequence fans out over it.
#[test]
fn test_single_index_on_nested_sequence_fans_out() {
    let doc = tree(json!({"m": [[1, 2], [3]]}));
    assert_eq!(
        walk_all(&doc, "m[0]").unwrap(),
        vec![Value::from(1), Value::from(2)]
    );
    // A wildcard only fans out one level.
    assert_eq!(
        walk_all(&doc, "m[*]").unwrap(),
        values(json!([[1, 2], [3]]))
    );
}

#[test]
fn test_dict_iter_is_inert() {
    let doc = tree(json!({"a": {"b": 1}}));
    assert_eq!(walk_all(&doc, "a.{*}.b").unwrap(), vec![Value::from(1)]);
}

#[test]
fn test_null_leaf_yields_nothing() {
    let doc = tree(json!({"a": [1, null, 3]}));
    assert_eq!(
        walk_all(&doc, "a[*]").unwrap(),
        vec![Value::from(1), Value::from(3)]
    );
}

#[test]
fn test_bookstore_prices() {
    let doc = create_bookstore();
    assert_eq!(
        walk_all(&doc, "store.book[0:2].price").unwrap(),
        vec![Value::from(8.95), Value::from(8.99)]
    );
    assert_eq!(
        walk_all(&doc, "store.bicycle.color").unwrap(),
        vec![Value::from("red")]
    );
}

#[test]
fn test_walk_from_yaml() {
    let doc: Value = serde_yaml::from_str(
        "servers:\n  - host: a.example\n    port: 80\n  - host: b.example\n",
    )
    .unwrap();
    assert_eq!(
        walk_all(&doc, "servers[*].port<8080:int>").unwrap(),
        vec![Value::from(80), Value::from(8080)]
    );
}

#[test]
fn test_text_and_compiled_paths_agree() {
    let doc = create_bookstore();
    for text in [
        "store.book[*].author",
        "@store.book[-1:*].price",
        "store.book[1].category|price",
        "store.missing<[1, 2]:list>[*]",
        "store.bicycle.{*}.color",
    ] {
        let path = compile(text).unwrap();
        let recompiled: Path = path.to_string().parse().unwrap();
        assert_eq!(recompiled, path, "{} did not survive rendering", text);
        assert_eq!(
            walk_all(&doc, &path).unwrap(),
            walk_all(&doc, path.to_string()).unwrap(),
        );
        assert_eq!(walk_all(&doc, text).unwrap(), walk_all(&doc, &path).unwrap());
    }
}

#[test]
fn test_built_paths_render_to_the_same_walk() {
    let doc = tree(json!({"a": {"x": 1, "y": 2}, "ax": 9}));
    let key = |name: &str| PathOp::Key(name.to_string());
    let alternation = MultiValue::new(vec![
        Path::new(vec![key("x")]).unwrap(),
        Path::new(vec![key("y")]).unwrap(),
    ])
    .unwrap();

    let paths = [
        Path::new(vec![key("a"), PathOp::MultiValue(alternation)]).unwrap(),
        Path::new(vec![key("a"), key("x")]).unwrap(),
    ];
    let expected = [
        vec![Value::Sequence(vec![Value::from(1), Value::from(2)])],
        vec![Value::from(1)],
    ];

    for (path, expected) in paths.iter().zip(expected) {
        assert_eq!(walk_all(&doc, path).unwrap(), expected);
        assert_eq!(
            walk_all(&doc, path.to_string()).unwrap(),
            expected,
            "{} walked differently once rendered",
            path
        );
    }
}

#[test]
fn test_error_after_results_keeps_earlier_results() {
    let doc = tree(json!({"a": [[1], {"k": 2}, [3]]}));
    let mut results = walk(&doc, "a[*][0]").unwrap();
    assert_eq!(results.next(), Some(Ok(Value::from(1))));
    assert_eq!(
        results.next(),
        Some(Err(WalkError::NonSequenceIndex {
            index: "[0]".to_string(),
            found: "dict",
        }))
    );
    assert_eq!(results.next(), None);
    assert_eq!(results.next(), None);
}

#[test]
fn test_alternation_with_range_yields_one_combined_value() {
    let doc = tree(json!({"x": {"a": [1, 2, 3], "b": [4, 5]}}));
    assert_eq!(
        walk_all(&doc, "x.a[0:2]|b[-1]").unwrap(),
        vec![Value::Sequence(values(json!([[1, 2], 5])))]
    );
}

#[test]
fn test_walk_yaml_with_scalar_keys() {
    let doc: Value = serde_yaml::from_str("codes:\n  404: missing\n  500: broken\n").unwrap();
    assert_eq!(
        walk_all(&doc, "codes.404").unwrap(),
        vec![Value::from("missing")]
    );
}

#[test]
fn test_path_walk_method() {
    let doc = tree(json!({"a": [1, 2]}));
    let path = compile("a[1]").unwrap();
    let found: Result<Vec<Value>, WalkError> = path.walk(&doc).collect();
    assert_eq!(found.unwrap(), vec![Value::from(2)]);
}

#[test]
fn test_compiled_path_shared_across_threads() {
    let path = compile("items[-1]").unwrap();
    let docs: Vec<Value> = (1..=4)
        .map(|n| tree(json!({ "items": (0..n).collect::<Vec<i64>>() })))
        .collect();

    let results: Vec<Vec<Value>> = std::thread::scope(|scope| {
        let handles: Vec<_> = docs
            .iter()
            .map(|doc| {
                let path = &path;
                scope.spawn(move || walk_all(doc, path).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(
        results,
        vec![
            vec![Value::from(0)],
            vec![Value::from(1)],
            vec![Value::from(2)],
            vec![Value::from(3)],
        ]
    );
}
