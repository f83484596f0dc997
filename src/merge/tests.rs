use super::*;
use crate::ast;

fn parse(sdl: &str) -> ast::schema::Document {
    ast::parse_sdl(sdl).expect("test SDL parses")
}

fn object_def(def: &ast::schema::Definition) -> &ast::schema::ObjectType {
    match def {
        ast::schema::Definition::TypeDefinition(ast::schema::TypeDefinition::Object(obj)) => obj,
        other => panic!("expected object type definition, got {other:?}"),
    }
}

mod grouping {
    use super::*;

    #[test]
    fn one_definition_per_distinct_name() {
        let merged = merge_documents(vec![
            parse("type User { id: ID }\ntype Post { id: ID }"),
            parse("extend type User { name: String }\ntype Comment { id: ID }"),
        ]);

        let names: Vec<_> = merged
            .definitions
            .iter()
            .map(|def| ast::definition_name(def).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["User", "Post", "Comment"]);
    }

    #[test]
    fn first_key_encountered_order_is_kept() {
        let merged = merge_documents(vec![
            parse("type B { x: Int }\ntype A { x: Int }"),
            parse("extend type A { y: Int }\ntype C { x: Int }"),
        ]);

        let names: Vec<_> = merged
            .definitions
            .iter()
            .map(|def| ast::definition_name(def).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn schema_blocks_collapse_into_one() {
        let merged = merge_documents(vec![
            parse("schema { query: Query }"),
            parse("schema { mutation: Mutation }"),
            parse("type Query { ok: Boolean }"),
        ]);

        let blocks: Vec<_> = merged
            .definitions
            .iter()
            .filter_map(|def| match def {
                ast::schema::Definition::SchemaDefinition(block) => Some(block),
                _ => None,
            })
            .collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].query.as_deref(), Some("Query"));
        // The later block fills in the operation the first one omitted.
        assert_eq!(blocks[0].mutation.as_deref(), Some("Mutation"));
    }

    #[test]
    fn single_document_passes_through_unchanged() {
        let doc = parse(concat!(
            "type Query { me: User }\n",
            "type User implements Node { id: ID name: String }\n",
            "enum Color { RED GREEN }\n",
        ));
        assert_eq!(merge_documents(vec![doc.clone()]), doc);
    }
}

mod kind_promotion {
    use super::*;

    #[test]
    fn extension_then_definition_yields_definition() {
        let merged = merge_documents(vec![
            parse("extend type User { name: String }"),
            parse("type User { id: ID }"),
        ]);

        assert_eq!(merged.definitions.len(), 1);
        let obj = object_def(&merged.definitions[0]);
        assert_eq!(obj.name, "User");
        let fields: Vec<_> = obj.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["name", "id"]);
    }

    #[test]
    fn definition_then_extension_stays_definition() {
        let merged = merge_documents(vec![
            parse("type User { id: ID }"),
            parse("extend type User { name: String }"),
        ]);

        assert_eq!(merged.definitions.len(), 1);
        let obj = object_def(&merged.definitions[0]);
        let fields: Vec<_> = obj.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["id", "name"]);
    }

    #[test]
    fn two_extensions_synthesize_a_definition() {
        let merged = merge_documents(vec![
            parse("extend type User { id: ID }"),
            parse("extend type User { name: String }"),
        ]);

        assert_eq!(merged.definitions.len(), 1);
        let obj = object_def(&merged.definitions[0]);
        let fields: Vec<_> = obj.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["id", "name"]);
    }

    #[test]
    fn lone_extension_survives_as_extension() {
        let merged = merge_documents(vec![parse("extend type User { email: String }")]);

        assert_eq!(merged.definitions.len(), 1);
        assert!(matches!(
            merged.definitions[0],
            ast::schema::Definition::TypeExtension(ast::schema::TypeExtension::Object(_)),
        ));
    }

    #[test]
    fn accumulated_definition_wins_over_unlike_kind() {
        let merged = merge_documents(vec![
            parse("type Tag { name: String }"),
            parse("enum Tag { A B }"),
        ]);

        assert_eq!(merged.definitions.len(), 1);
        let obj = object_def(&merged.definitions[0]);
        assert_eq!(obj.fields.len(), 1);
    }

    #[test]
    fn extension_loses_to_unlike_incoming_definition() {
        let merged = merge_documents(vec![
            parse("extend type Tag { name: String }"),
            parse("enum Tag { A B }"),
        ]);

        assert_eq!(merged.definitions.len(), 1);
        assert!(matches!(
            merged.definitions[0],
            ast::schema::Definition::TypeDefinition(ast::schema::TypeDefinition::Enum(_)),
        ));
    }
}

mod list_merge {
    use super::*;

    #[test]
    fn unmatched_then_matched_then_created() {
        // acc has [a, b]; inc has [b, c]; b matches.
        let merged = merge_documents(vec![
            parse("type T { a: Int b: Int }"),
            parse("extend type T { b: String c: Int }"),
        ]);

        let obj = object_def(&merged.definitions[0]);
        let fields: Vec<_> = obj.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
        // The matched pair folds recursively; the incoming scalar type wins.
        assert_eq!(
            obj.fields[1].field_type,
            ast::schema::Type::NamedType("String".to_string()),
        );
    }

    #[test]
    fn union_members_merge_by_value() {
        let merged = merge_documents(vec![
            parse("union Media = Photo | Video"),
            parse("extend union Media = Video | Audio"),
        ]);

        match &merged.definitions[0] {
            ast::schema::Definition::TypeDefinition(ast::schema::TypeDefinition::Union(u)) => {
                assert_eq!(u.types, vec!["Photo", "Video", "Audio"]);
            }
            other => panic!("expected union definition, got {other:?}"),
        }
    }

    #[test]
    fn enum_values_merge_by_name() {
        let merged = merge_documents(vec![
            parse("enum Color { RED GREEN }"),
            parse("extend enum Color { GREEN BLUE }"),
        ]);

        match &merged.definitions[0] {
            ast::schema::Definition::TypeDefinition(ast::schema::TypeDefinition::Enum(e)) => {
                let values: Vec<_> = e.values.iter().map(|v| v.name.as_str()).collect();
                assert_eq!(values, vec!["RED", "GREEN", "BLUE"]);
            }
            other => panic!("expected enum definition, got {other:?}"),
        }
    }

    #[test]
    fn implemented_interfaces_merge_by_value() {
        let merged = merge_documents(vec![
            parse("type User implements Node { id: ID }"),
            parse("extend type User implements Timestamped { at: String }"),
        ]);

        let obj = object_def(&merged.definitions[0]);
        assert_eq!(obj.implements_interfaces, vec!["Node", "Timestamped"]);
    }

    #[test]
    fn field_arguments_merge_by_name() {
        let merged = merge_documents(vec![
            parse("type Query { items(first: Int): [Item] }"),
            parse("extend type Query { items(first: Int = 10, after: String): [Item] }"),
        ]);

        let obj = object_def(&merged.definitions[0]);
        let args = &obj.fields[0].arguments;
        let names: Vec<_> = args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["first", "after"]);
        // The matched argument picks up the incoming default value.
        assert!(args[0].default_value.is_some());
    }

    #[test]
    fn directive_definitions_merge_arguments_and_locations() {
        let merged = merge_documents(vec![
            parse("directive @tag(name: String) on FIELD_DEFINITION"),
            parse("directive @tag(weight: Int) on OBJECT | FIELD_DEFINITION"),
        ]);

        match &merged.definitions[0] {
            ast::schema::Definition::DirectiveDefinition(dir) => {
                let args: Vec<_> = dir.arguments.iter().map(|a| a.name.as_str()).collect();
                assert_eq!(args, vec!["name", "weight"]);
                assert_eq!(
                    dir.locations,
                    vec![
                        ast::schema::DirectiveLocation::FieldDefinition,
                        ast::schema::DirectiveLocation::Object,
                    ],
                );
            }
            other => panic!("expected directive definition, got {other:?}"),
        }
    }
}

mod round_trip {
    use super::*;

    #[test]
    fn printed_merge_output_is_stable_under_reparse() {
        let merged = merge_documents(vec![
            parse("type Query { me: User }\nextend type User { age: Int }"),
            parse("type User implements Node { id: ID }\nscalar DateTime"),
            parse("schema { query: Query }"),
        ]);

        let printed = ast::print_document(&merged);
        let reparsed = ast::parse_sdl(&printed).expect("merge output parses");
        assert_eq!(ast::print_document(&reparsed), printed);
    }
}

mod extension_normalizer {
    use super::*;

    #[test]
    fn surviving_extensions_become_definitions() {
        let doc = parse(concat!(
            "extend type User { id: ID }\n",
            "extend enum Color { RED }\n",
            "extend interface Node { id: ID }\n",
            "extend union Media = Photo\n",
            "extend scalar Date\n",
            "extend input Filter { q: String }\n",
            "type Query { ok: Boolean }\n",
        ));

        let fixed = normalize_extensions(doc);
        assert!(
            fixed
                .definitions
                .iter()
                .all(|def| !matches!(def, ast::schema::Definition::TypeExtension(_))),
        );
        // Untouched definitions pass through as-is.
        assert!(ast::print_document(&fixed).contains("type Query"));
    }

    #[test]
    fn normalized_output_prints_without_extend() {
        let fixed = normalize_extensions(parse("extend type Picture { size: Int }"));
        let printed = ast::print_document(&fixed);
        assert!(printed.contains("type Picture"));
        assert!(!printed.contains("extend"));
    }
}
