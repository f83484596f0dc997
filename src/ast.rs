//! Owned aliases over the `graphql_parser` schema AST, plus the two codec
//! entry points ([`parse_sdl`] and [`print_document`]) everything else in
//! this crate goes through.
//!
//! The merge engine and the entity layer never inspect SDL text directly;
//! they operate on these nodes and round-trip through the codec at the
//! boundaries.

pub mod schema {
    pub use graphql_parser::schema::ParseError;

    pub type Definition = graphql_parser::schema::Definition<'static, String>;
    pub type Directive = graphql_parser::query::Directive<'static, String>;
    pub type DirectiveDefinition = graphql_parser::schema::DirectiveDefinition<'static, String>;
    pub type DirectiveLocation = graphql_parser::schema::DirectiveLocation;
    pub type Document = graphql_parser::schema::Document<'static, String>;
    pub type EnumType = graphql_parser::schema::EnumType<'static, String>;
    pub type EnumTypeExtension = graphql_parser::schema::EnumTypeExtension<'static, String>;
    pub type EnumValue = graphql_parser::schema::EnumValue<'static, String>;
    pub type Field = graphql_parser::schema::Field<'static, String>;
    pub type InputObjectType = graphql_parser::schema::InputObjectType<'static, String>;
    pub type InputObjectTypeExtension = graphql_parser::schema::InputObjectTypeExtension<'static, String>;
    pub type InputValue = graphql_parser::schema::InputValue<'static, String>;
    pub type InterfaceType = graphql_parser::schema::InterfaceType<'static, String>;
    pub type InterfaceTypeExtension = graphql_parser::schema::InterfaceTypeExtension<'static, String>;
    pub type ObjectType = graphql_parser::schema::ObjectType<'static, String>;
    pub type ObjectTypeExtension = graphql_parser::schema::ObjectTypeExtension<'static, String>;
    pub type ScalarType = graphql_parser::schema::ScalarType<'static, String>;
    pub type ScalarTypeExtension = graphql_parser::schema::ScalarTypeExtension<'static, String>;
    pub type SchemaDefinition = graphql_parser::schema::SchemaDefinition<'static, String>;
    pub type Type = graphql_parser::schema::Type<'static, String>;
    pub type TypeDefinition = graphql_parser::schema::TypeDefinition<'static, String>;
    pub type TypeExtension = graphql_parser::schema::TypeExtension<'static, String>;
    pub type UnionType = graphql_parser::schema::UnionType<'static, String>;
    pub type UnionTypeExtension = graphql_parser::schema::UnionTypeExtension<'static, String>;
    pub type Value = graphql_parser::query::Value<'static, String>;
}

/// Parses SDL text into an owned schema [`Document`](schema::Document).
pub fn parse_sdl(text: &str) -> Result<schema::Document, schema::ParseError> {
    Ok(graphql_parser::schema::parse_schema::<String>(text)?.into_static())
}

/// Renders a schema [`Document`](schema::Document) back to SDL text.
pub fn print_document(doc: &schema::Document) -> String {
    doc.to_string()
}

/// The name introduced (or extended) by a type definition node.
pub fn type_definition_name(def: &schema::TypeDefinition) -> &str {
    match def {
        schema::TypeDefinition::Scalar(def) => &def.name,
        schema::TypeDefinition::Object(def) => &def.name,
        schema::TypeDefinition::Interface(def) => &def.name,
        schema::TypeDefinition::Union(def) => &def.name,
        schema::TypeDefinition::Enum(def) => &def.name,
        schema::TypeDefinition::InputObject(def) => &def.name,
    }
}

/// The name of the type a type extension node augments.
pub fn type_extension_name(ext: &schema::TypeExtension) -> &str {
    match ext {
        schema::TypeExtension::Scalar(ext) => &ext.name,
        schema::TypeExtension::Object(ext) => &ext.name,
        schema::TypeExtension::Interface(ext) => &ext.name,
        schema::TypeExtension::Union(ext) => &ext.name,
        schema::TypeExtension::Enum(ext) => &ext.name,
        schema::TypeExtension::InputObject(ext) => &ext.name,
    }
}

/// The name a definition contributes to a merged document, if it has one.
/// Schema blocks are nameless.
pub fn definition_name(def: &schema::Definition) -> Option<&str> {
    match def {
        schema::Definition::SchemaDefinition(_) => None,
        schema::Definition::TypeDefinition(def) => Some(type_definition_name(def)),
        schema::Definition::TypeExtension(ext) => Some(type_extension_name(ext)),
        schema::Definition::DirectiveDefinition(def) => Some(&def.name),
    }
}
