use super::{PlaceholderKind, Route, RouteError, Router, Segment};

fn params(route: &Route, path: &str) -> Option<Vec<(String, String)>> {
    route.match_path(path).map(|p| {
        p.into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    })
}

fn pair(k: &str, v: &str) -> (String, String) {
    (k.to_string(), v.to_string())
}

#[test]
fn test_root_path() {
    let route = Route::compile("/").unwrap();
    assert_eq!(params(&route, "/"), Some(vec![]));
    assert_eq!(params(&route, ""), None);
    assert_eq!(route.weight(), 1);
}

#[test]
fn test_untyped_placeholders() {
    let route = Route::compile("/books/<id>/<page>").unwrap();
    assert_eq!(
        params(&route, "/books/1/25"),
        Some(vec![pair("id", "1"), pair("page", "25")])
    );
    assert_eq!(params(&route, "/books/1"), None);
    assert_eq!(params(&route, "/books/1/25/extra"), None);
}

#[test]
fn test_segments() {
    let route = Route::compile("/a/<int:b>/c").unwrap();
    assert_eq!(route.segments().len(), 3);
    assert_eq!(route.segments()[0], Segment::Literal("/a/".to_string()));
    assert!(matches!(
        &route.segments()[1],
        Segment::Capture { kind: PlaceholderKind::Int, name } if name.as_ref() == "b"
    ));
    assert_eq!(route.segments()[2], Segment::Literal("/c".to_string()));
}

#[test]
fn test_int_rejects_float_literal() {
    let route = Route::compile("/dynamic/with/type/int/<int:n>").unwrap();
    assert_eq!(params(&route, "/dynamic/with/type/int/1.23"), None);
    assert_eq!(
        params(&route, "/dynamic/with/type/int/123"),
        Some(vec![pair("n", "123")])
    );
}

#[test]
fn test_float_requires_fraction() {
    let route = Route::compile("/price/<float:amount>").unwrap();
    assert_eq!(params(&route, "/price/1.23"), Some(vec![pair("amount", "1.23")]));
    assert_eq!(params(&route, "/price/12"), None);
}

#[test]
fn test_placeholders_reject_non_ascii_characters() {
    let int = Route::compile("/n/<int:id>").unwrap();
    assert_eq!(params(&int, "/n/١٢"), None);
    assert_eq!(params(&int, "/n/12"), Some(vec![pair("id", "12")]));

    let float = Route::compile("/f/<float:x>").unwrap();
    assert_eq!(params(&float, "/f/१.२"), None);
    assert_eq!(params(&float, "/f/1.2"), Some(vec![pair("x", "1.2")]));

    let word = Route::compile("/s/<name>").unwrap();
    assert_eq!(params(&word, "/s/café"), None);
    assert_eq!(params(&word, "/s/cafe_2"), Some(vec![pair("name", "cafe_2")]));
}

#[test]
fn test_non_ascii_digits_fall_through_to_catch_all() {
    let mut router: Router<&'static str> = Router::new();
    router.add_resource("/n/<int:id>", "int").unwrap();
    router.add_resource("/n/<path:rest>", "path").unwrap();
    let matched = router.resolve("/n/١٢").unwrap();
    assert_eq!(*matched.resource, "path");
    assert_eq!(matched.get_path_param("rest"), Some("١٢"));
    assert_eq!(*router.resolve("/n/12").unwrap().resource, "int");
}

#[test]
fn test_str_is_word_characters_only() {
    let route = Route::compile("/user/<name>").unwrap();
    assert_eq!(params(&route, "/user/lleo_hao"), Some(vec![pair("name", "lleo_hao")]));
    assert_eq!(params(&route, "/user/lleo-hao"), None);
    assert_eq!(params(&route, "/user/a/b"), None);
}

#[test]
fn test_path_spans_slashes() {
    let route = Route::compile("/static/<path:file>/raw").unwrap();
    assert_eq!(
        params(&route, "/static/css/site/main.css/raw"),
        Some(vec![pair("file", "css/site/main.css")])
    );
}

#[test]
fn test_literal_regex_metacharacters_are_escaped() {
    let route = Route::compile("/v1.0/items(<int:id>)").unwrap();
    assert!(route.match_path("/v1.0/items(3)").is_some());
    assert!(route.match_path("/v1x0/items(3)").is_none());
}

#[test]
fn test_weight() {
    assert_eq!(Route::compile("/only/static").unwrap().weight(), 12);
    assert_eq!(Route::compile("/a/<x>").unwrap().weight(), 3 + 100);
    assert_eq!(Route::compile("/a/<int:x>").unwrap().weight(), 3 + 50);
    assert_eq!(Route::compile("/a/<float:x>").unwrap().weight(), 3 + 50);
    assert_eq!(Route::compile("/a/<path:x>").unwrap().weight(), 3 + 200);
}

#[test]
fn test_duplicate_variable() {
    let err = Route::compile("/<id>/<int:id>").unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicateVariable {
            pattern: "/<id>/<int:id>".to_string(),
            name: "id".to_string()
        }
    );
}

#[test]
fn test_unknown_type() {
    let err = Route::compile("/<uuid:id>").unwrap_err();
    assert!(matches!(err, RouteError::UnknownType { kind, .. } if kind == "uuid"));
}

#[test]
fn test_malformed_rules() {
    for pattern in ["/<id", "/id>", "/<<id>>", "/<a<b>", "/<>", "/<int:>", "/<1abc>", "/<a b>"] {
        let err = Route::compile(pattern).unwrap_err();
        assert!(
            matches!(err, RouteError::MalformedRule { .. }),
            "{pattern} should be malformed, got {err:?}"
        );
    }
}

#[test]
fn test_router_orders_by_weight_stably() {
    let mut router: Router<u32> = Router::new();
    router.add_resource("/x/<path:p>", 1).unwrap();
    router.add_resource("/x/<a>", 2).unwrap();
    router.add_resource("/x/<int:a>", 3).unwrap();
    router.add_resource("/y/<b>", 4).unwrap();

    let order: Vec<&str> = router.routes().map(Route::pattern).collect();
    assert_eq!(order, vec!["/x/<int:a>", "/x/<a>", "/y/<b>", "/x/<path:p>"]);
}

#[test]
fn test_router_resolve_prefers_lower_weight() {
    let mut router: Router<&str> = Router::new();
    router.add_resource("/files/<path:rest>", "catch_all").unwrap();
    router.add_resource("/files/<name>", "single").unwrap();
    router.add_resource("/files/<int:id>", "numeric").unwrap();

    assert_eq!(*router.resolve("/files/42").unwrap().resource, "numeric");
    assert_eq!(*router.resolve("/files/readme").unwrap().resource, "single");
    assert_eq!(*router.resolve("/files/a/b.txt").unwrap().resource, "catch_all");
}

#[test]
fn test_router_duplicate_route() {
    let mut router: Router<()> = Router::new();
    router.add_resource("/a/<b>", ()).unwrap();
    let err = router.add_resource("/a/<b>", ()).unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicateRoute {
            pattern: "/a/<b>".to_string()
        }
    );
    assert_eq!(router.len(), 1);
}

#[test]
fn test_add_route_factory_error_passes_through() {
    #[derive(Debug)]
    struct Boom;
    impl std::fmt::Display for Boom {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("boom")
        }
    }
    impl std::error::Error for Boom {}

    let mut router: Router<()> = Router::new();
    let err = router.add_route("/a", || Err::<(), _>(Boom)).unwrap_err();
    assert!(err.downcast_ref::<Boom>().is_some());
    assert!(router.is_empty());
    assert!(!router.contains("/a"));
}

#[test]
fn test_add_route_compile_error_is_typed() {
    let mut router: Router<()> = Router::new();
    let mut called = false;
    let err = router
        .add_route("/a/<oops", || {
            called = true;
            Ok::<_, anyhow::Error>(())
        })
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RouteError>(),
        Some(RouteError::MalformedRule { .. })
    ));
    assert!(!called);
}
