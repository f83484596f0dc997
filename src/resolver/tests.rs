use super::*;
use serde_json::json;

fn call(value: &ResolverValue, arg: Json) -> Json {
    value.as_function().expect("function resolver")(arg)
}

fn leaf(tag: &str) -> ResolverValue {
    let tag = tag.to_string();
    ResolverValue::function(move |_| json!(tag))
}

mod deep_merge {
    use super::*;

    #[test]
    fn disjoint_keys_concatenate_in_order() {
        let mut acc = ResolverMap::new();
        acc.insert("Query".to_string(), leaf("q"));
        let mut inc = ResolverMap::new();
        inc.insert("Mutation".to_string(), leaf("m"));

        deep_merge(&mut acc, inc);

        let keys: Vec<_> = acc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Query", "Mutation"]);
    }

    #[test]
    fn nested_maps_merge_key_by_key() {
        let mut inner_a = ResolverMap::new();
        inner_a.insert("me".to_string(), leaf("a"));
        let mut acc = ResolverMap::new();
        acc.insert("Query".to_string(), ResolverValue::Map(inner_a));

        let mut inner_b = ResolverMap::new();
        inner_b.insert("posts".to_string(), leaf("b"));
        let mut inc = ResolverMap::new();
        inc.insert("Query".to_string(), ResolverValue::Map(inner_b));

        deep_merge(&mut acc, inc);

        let query = acc["Query"].as_map().unwrap();
        let keys: Vec<_> = query.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["me", "posts"]);
    }

    #[test]
    fn incoming_value_replaces_on_collision() {
        let mut acc = ResolverMap::new();
        acc.insert("Query".to_string(), leaf("old"));
        let mut inc = ResolverMap::new();
        inc.insert("Query".to_string(), leaf("new"));

        deep_merge(&mut acc, inc);

        assert_eq!(call(&acc["Query"], Json::Null), json!("new"));
    }

    #[test]
    fn incoming_map_replaces_a_function() {
        let mut acc = ResolverMap::new();
        acc.insert("Query".to_string(), leaf("fn"));
        let mut inner = ResolverMap::new();
        inner.insert("me".to_string(), leaf("map"));
        let mut inc = ResolverMap::new();
        inc.insert("Query".to_string(), ResolverValue::Map(inner));

        deep_merge(&mut acc, inc);

        assert!(acc["Query"].as_map().is_some());
    }
}

mod paths {
    use super::*;

    fn sample() -> ResolverMap {
        let mut fields = ResolverMap::new();
        fields.insert("createPicture".to_string(), leaf("create"));
        let mut map = ResolverMap::new();
        map.insert("Mutation".to_string(), ResolverValue::Map(fields));
        map.insert("version".to_string(), ResolverValue::Constant(json!(2)));
        map
    }

    #[test]
    fn get_path_walks_nested_maps() {
        let map = sample();
        let found = get_path(&map, "Mutation.createPicture").expect("path exists");
        assert_eq!(call(found, Json::Null), json!("create"));
    }

    #[test]
    fn get_path_returns_none_for_missing_segments() {
        let map = sample();
        assert!(get_path(&map, "Mutation.deletePicture").is_none());
        assert!(get_path(&map, "Subscription.onPicture").is_none());
        // A non-map intermediate stops the walk.
        assert!(get_path(&map, "version.major").is_none());
    }

    #[test]
    fn set_path_materializes_intermediates() {
        let mut map = ResolverMap::new();
        set_path(&mut map, "Query.me", leaf("me"));

        let found = get_path(&map, "Query.me").expect("path written");
        assert_eq!(call(found, Json::Null), json!("me"));
    }

    #[test]
    fn set_path_replaces_a_non_map_intermediate() {
        let mut map = sample();
        set_path(&mut map, "version.major", ResolverValue::Constant(json!(2)));

        assert!(map["version"].as_map().is_some());
        let major = get_path(&map, "version.major").unwrap();
        assert_eq!(major.as_constant(), Some(&json!(2)));
    }

    #[test]
    fn set_path_overwrites_an_existing_value() {
        let mut map = sample();
        set_path(&mut map, "Mutation.createPicture", leaf("wrapped"));

        let found = get_path(&map, "Mutation.createPicture").unwrap();
        assert_eq!(call(found, Json::Null), json!("wrapped"));
    }
}

mod values {
    use super::*;

    #[test]
    fn null_resolve_type_always_answers_null() {
        let f = null_resolve_type();
        assert_eq!(f(json!({"kind": "Photo"})), Json::Null);
    }

    #[test]
    fn scalar_resolver_emptiness_tracks_its_slots() {
        assert!(ScalarResolver::default().is_empty());
        let scalar = ScalarResolver {
            serialize: Some(Arc::new(|v| v)),
            ..ScalarResolver::default()
        };
        assert!(!scalar.is_empty());
    }

    #[test]
    fn debug_output_never_prints_callables() {
        let rendered = format!("{:?}", leaf("x"));
        assert_eq!(rendered, "<function>");
    }
}
