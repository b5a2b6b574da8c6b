use serde_json::{json, Map, Value};

use super::*;

fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn schema(params: Vec<(&str, ParamOptions)>) -> ParamSchema {
    let mut schema = ParamSchema::new();
    for (name, options) in params {
        schema.add(name, options).unwrap();
    }
    schema
}

#[test]
fn test_required_missing() {
    let s = schema(vec![("name", ParamOptions::new().required(true))]);
    let err = validate(&s, &obj(json!({}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Required);
    assert_eq!(err.info.key, "name");
    assert_eq!(err.message, "\"name\" is required");
}

#[test]
fn test_default_bypasses_required() {
    let s = schema(vec![(
        "page",
        ParamOptions::new().required(true).default_value(1),
    )]);
    assert_eq!(validate(&s, &obj(json!({}))).unwrap(), obj(json!({"page": 1})));
    assert_eq!(
        validate(&s, &obj(json!({"page": 4}))).unwrap(),
        obj(json!({"page": 4}))
    );
}

#[test]
fn test_optional_absent_is_omitted() {
    let s = schema(vec![
        ("a", ParamOptions::new()),
        ("b", ParamOptions::new()),
    ]);
    assert_eq!(validate(&s, &obj(json!({"b": "x", "c": 1}))).unwrap(), obj(json!({"b": "x"})));
}

#[test]
fn test_null_rejected_when_not_nullable() {
    let s = schema(vec![("q", ParamOptions::new().nullable(false))]);
    for bad in [json!({"q": null}), json!({"q": ""})] {
        let err = validate(&s, &obj(bad)).unwrap_err();
        assert_eq!(err.code, ErrorCode::Null);
    }
}

#[test]
fn test_null_passes_through_when_nullable() {
    let s = schema(vec![(
        "q",
        ParamOptions::new().kind(ParamType::Number).choices([1, 2]),
    )]);
    assert_eq!(validate(&s, &obj(json!({"q": null}))).unwrap(), obj(json!({"q": null})));
}

#[test]
fn test_type_error_messages() {
    let s = schema(vec![("n", ParamOptions::new().kind(ParamType::Number))]);

    let err = validate(&s, &obj(json!({"n": "abc"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Type);
    assert_eq!(err.message, "\"abc\" of \"n\" is not number type");

    let err = validate(&s, &obj(json!({"n": [1, 2]}))).unwrap_err();
    assert_eq!(err.message, "[1,2] of \"n\" is not number type");

    let err = validate(&s, &obj(json!({"n": true}))).unwrap_err();
    assert_eq!(err.message, "true of \"n\" is not number type");
}

#[test]
fn test_primitive_tags_do_not_coerce() {
    let s = schema(vec![
        ("s", ParamOptions::new().kind(ParamType::String)),
        ("b", ParamOptions::new().kind(ParamType::Boolean)),
        ("o", ParamOptions::new().kind(ParamType::Object)),
        ("a", ParamOptions::new().kind(ParamType::Array)),
    ]);
    let ok = obj(json!({"s": "x", "b": false, "o": {"k": 1}, "a": []}));
    assert_eq!(validate(&s, &ok).unwrap(), ok);

    let err = validate(&s, &obj(json!({"s": 1}))).unwrap_err();
    assert_eq!((err.code, err.info.key.as_str()), (ErrorCode::Type, "s"));
    let err = validate(&s, &obj(json!({"b": "true"}))).unwrap_err();
    assert_eq!((err.code, err.info.key.as_str()), (ErrorCode::Type, "b"));
}

#[test]
fn test_int_coercion() {
    let s = schema(vec![("age", ParamOptions::new().kind("int".parse().unwrap()))]);
    assert_eq!(validate(&s, &obj(json!({"age": "42"}))).unwrap(), obj(json!({"age": 42})));
    assert_eq!(validate(&s, &obj(json!({"age": 7}))).unwrap(), obj(json!({"age": 7})));

    let err = validate(&s, &obj(json!({"age": "lleohao"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conver);
    assert_eq!(err.info.key, "age");
    assert_eq!(err.message, "Can not convert \"age\" to number type");
    assert!(err.info.others.as_ref().unwrap()["reason"]
        .as_str()
        .unwrap()
        .contains("lleohao"));
}

#[test]
fn test_float_and_boolean_coercion() {
    let s = schema(vec![
        ("f", ParamOptions::new().kind(ParamType::Custom(Coercer::float()))),
        ("b", ParamOptions::new().kind(ParamType::Custom(Coercer::boolean()))),
    ]);
    assert_eq!(
        validate(&s, &obj(json!({"f": "1.5", "b": "0"}))).unwrap(),
        obj(json!({"f": 1.5, "b": false}))
    );
    let err = validate(&s, &obj(json!({"f": "NaN"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conver);
}

#[test]
fn test_custom_coercer_error_detail() {
    let s = schema(vec![(
        "date",
        ParamOptions::new().coerce("date", |_| Err("bad month".to_string())),
    )]);
    let err = validate(&s, &obj(json!({"date": "2020-13-01"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Conver);
    assert_eq!(err.message, "Can not convert \"date\" to date type");
    assert_eq!(err.info.others, Some(json!({"type": "date", "reason": "bad month"})));
}

#[test]
fn test_choices_values() {
    let s = schema(vec![("sex", ParamOptions::new().choices(["man", "woman"]))]);
    let err = validate(&s, &obj(json!({"sex": "lalalal"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Choices);
    assert_eq!(err.info.others, Some(json!(["man", "woman"])));
    assert_eq!(err.message, "\"sex\" must be one of [\"man\",\"woman\"]");

    assert!(validate(&s, &obj(json!({"sex": "man"}))).is_ok());
}

#[test]
fn test_choices_predicate() {
    let s = schema(vec![(
        "n",
        ParamOptions::new().choices_fn(|v| match v.as_i64() {
            Some(n) => Ok(n % 2 == 0),
            None => Err("not a number".to_string()),
        }),
    )]);
    assert!(validate(&s, &obj(json!({"n": 4}))).is_ok());

    let err = validate(&s, &obj(json!({"n": 3}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Choices);
    assert_eq!(err.message, "\"n\" is not an allowed value");

    let err = validate(&s, &obj(json!({"n": "x"}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::ChoicesRun);
    assert_eq!(err.message, "Choices check for \"n\" failed: not a number");
}

#[test]
fn test_choices_checked_before_normalisation() {
    let s = schema(vec![(
        "c",
        ParamOptions::new().choices(["A"]).lowercase(true),
    )]);
    assert_eq!(validate(&s, &obj(json!({"c": "A"}))).unwrap(), obj(json!({"c": "a"})));
    assert!(validate(&s, &obj(json!({"c": "a"}))).is_err());
}

#[test]
fn test_lowercase_then_trim() {
    let s = schema(vec![(
        "name",
        ParamOptions::new().lowercase(true).trim(true),
    )]);
    assert_eq!(
        validate(&s, &obj(json!({"name": "  LleoHao \n"}))).unwrap(),
        obj(json!({"name": "lleohao"}))
    );
}

#[test]
fn test_convert_runs_last() {
    let s = schema(vec![(
        "tags",
        ParamOptions::new().trim(true).convert(|v| {
            let s = v.as_str().ok_or("expected string")?;
            Ok(Value::Array(s.split(',').map(|t| json!(t)).collect()))
        }),
    )]);
    assert_eq!(
        validate(&s, &obj(json!({"tags": " a,b "}))).unwrap(),
        obj(json!({"tags": ["a", "b"]}))
    );

    let err = validate(&s, &obj(json!({"tags": 5}))).unwrap_err();
    assert_eq!(err.code, ErrorCode::Cover);
    assert_eq!(err.message, "Conversion of \"tags\" failed: expected string");
}

#[test]
fn test_alias() {
    let s = schema(vec![("name", ParamOptions::new().alias("fullName"))]);
    let out = validate(&s, &obj(json!({"name": "lleohao"}))).unwrap();
    assert_eq!(out, obj(json!({"fullName": "lleohao"})));
    assert!(!out.contains_key("name"));
}

#[test]
fn test_first_failure_wins() {
    let s = schema(vec![
        ("a", ParamOptions::new().required(true)),
        ("b", ParamOptions::new().kind(ParamType::Number)),
    ]);
    let err = validate(&s, &obj(json!({"b": "x"}))).unwrap_err();
    assert_eq!(err.info.key, "a");

    let errors = validate_all(&s, &obj(json!({"b": "x"}))).unwrap_err();
    let codes: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
    assert_eq!(codes, vec![ErrorCode::Required, ErrorCode::Type]);
}

#[test]
fn test_global_defaults() {
    let mut s = ParamSchema::with_defaults(
        ParamOptions::new().required(true).trim(true).alias("ignored"),
    );
    s.add("a", ParamOptions::new()).unwrap();
    s.add("b", ParamOptions::new().required(false)).unwrap();

    assert!(s.get("a").unwrap().required);
    assert!(s.get("a").unwrap().trim);
    assert!(s.get("a").unwrap().alias.is_none());
    assert!(!s.get("b").unwrap().required);
    assert!(s.get("b").unwrap().nullable);
}

#[test]
fn test_duplicate_and_alias_collisions() {
    let mut s = ParamSchema::new();
    s.add("name", ParamOptions::new().alias("fullName")).unwrap();

    assert_eq!(
        s.add("name", ParamOptions::new()),
        Err(SchemaError::DuplicateParameter {
            name: "name".to_string()
        })
    );
    assert!(matches!(
        s.add("fullName", ParamOptions::new()),
        Err(SchemaError::DuplicateParameter { .. })
    ));
    assert_eq!(
        s.add("nick", ParamOptions::new().alias("name")),
        Err(SchemaError::AliasCollision {
            name: "nick".to_string(),
            alias: "name".to_string()
        })
    );
    assert!(matches!(
        s.add("other", ParamOptions::new().alias("fullName")),
        Err(SchemaError::AliasCollision { .. })
    ));
    assert_eq!(s.len(), 1);
}

#[test]
fn test_remove() {
    let mut s = schema(vec![
        ("a", ParamOptions::new()),
        ("b", ParamOptions::new()),
        ("c", ParamOptions::new()),
    ]);
    assert!(s.remove("a"));
    assert!(!s.remove("missing"));
    s.remove_many(["b", "nope"]);
    let names: Vec<&str> = s.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["c"]);
}

#[test]
fn test_unknown_type_tag() {
    assert_eq!(
        "date".parse::<ParamType>().unwrap_err(),
        SchemaError::UnknownType {
            token: "date".to_string()
        }
    );
}

#[test]
fn test_error_serialisation() {
    let s = schema(vec![("q", ParamOptions::new().required(true))]);
    let err = validate(&s, &obj(json!({}))).unwrap_err();
    assert_eq!(
        serde_json::to_value(&err).unwrap(),
        json!({
            "code": "REQUIRED_ERROR",
            "message": "\"q\" is required",
            "info": {"key": "q"}
        })
    );
}
