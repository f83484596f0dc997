//! Entity roles, the classifier, and leaf entities.
//!
//! A leaf entity wraps exactly one SDL declaration plus an optional resolver
//! payload; the classifier decides which role a given input plays and
//! constructs the matching wrapper. Composites are defined in
//! [`crate::schema`] and referenced here through the [`Entity`] enum.

use crate::ast;
use crate::error::ComposeError;
use crate::resolver::{ResolverFn, ResolverMap, ResolverValue, ScalarResolver, null_resolve_type};
use crate::schema::{SchemaEntity, SchemaInput};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;


type Result<T> = std::result::Result<T, ComposeError>;

/// The closed set of roles a leaf entity can play.
///
/// Dispatch over roles is always an exhaustive match; there is no fallback
/// role and no default behavior to silently inherit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityRole {
    Query,
    Mutation,
    Subscription,
    Type,
    Input,
    Union,
    Interface,
    Scalar,
    Enum,
    Directive,
}

impl EntityRole {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityRole::Query => "query",
            EntityRole::Mutation => "mutation",
            EntityRole::Subscription => "subscription",
            EntityRole::Type => "type",
            EntityRole::Input => "input",
            EntityRole::Union => "union",
            EntityRole::Interface => "interface",
            EntityRole::Scalar => "scalar",
            EntityRole::Enum => "enum",
            EntityRole::Directive => "directive",
        }
    }

    /// Whether this role contributes fields to a root operation type rather
    /// than introducing a type of its own.
    pub fn is_field_role(self) -> bool {
        matches!(
            self,
            EntityRole::Query | EntityRole::Mutation | EntityRole::Subscription
        )
    }
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityRole {
    type Err = ComposeError;

    /// Parses a textual role tag. `schema` is deliberately not a leaf role;
    /// it fails here like any other unrecognized token.
    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "query" => Ok(EntityRole::Query),
            "mutation" => Ok(EntityRole::Mutation),
            "subscription" => Ok(EntityRole::Subscription),
            "type" => Ok(EntityRole::Type),
            "input" => Ok(EntityRole::Input),
            "union" => Ok(EntityRole::Union),
            "interface" => Ok(EntityRole::Interface),
            "scalar" => Ok(EntityRole::Scalar),
            "enum" => Ok(EntityRole::Enum),
            "directive" => Ok(EntityRole::Directive),
            other => Err(ComposeError::UnknownRole(other.to_string())),
        }
    }
}

/// SDL either as raw text or as an already-parsed document.
#[derive(Clone, Debug)]
pub enum SchemaSource {
    Sdl(String),
    Document(ast::schema::Document),
}

impl SchemaSource {
    /// Resolves to a parsed document, keeping the original text when there
    /// was one.
    pub(crate) fn into_document(self) -> Result<(Option<String>, ast::schema::Document)> {
        match self {
            SchemaSource::Sdl(text) => {
                let doc = ast::parse_sdl(&text)?;
                Ok((Some(text), doc))
            }
            SchemaSource::Document(doc) => Ok((None, doc)),
        }
    }
}

impl From<&str> for SchemaSource {
    fn from(text: &str) -> Self {
        SchemaSource::Sdl(text.to_string())
    }
}

impl From<String> for SchemaSource {
    fn from(text: String) -> Self {
        SchemaSource::Sdl(text)
    }
}

impl From<ast::schema::Document> for SchemaSource {
    fn from(doc: ast::schema::Document) -> Self {
        SchemaSource::Document(doc)
    }
}

/// A role/schema/resolver bundle, the richest leaf construction input.
#[derive(Default)]
pub struct EntityBundle {
    pub role: Option<EntityRole>,
    pub schema: Option<SchemaSource>,
    pub resolver: Option<ResolverValue>,
    pub serialize: Option<ResolverFn>,
    pub parse_value: Option<ResolverFn>,
    pub parse_literal: Option<ResolverFn>,
}

impl EntityBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, role: EntityRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn schema(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn resolver(mut self, resolver: impl Into<ResolverValue>) -> Self {
        self.resolver = Some(resolver.into());
        self
    }

    pub fn resolver_fn(mut self, f: impl Fn(Json) -> Json + Send + Sync + 'static) -> Self {
        self.resolver = Some(ResolverValue::function(f));
        self
    }

    pub fn serialize(mut self, f: impl Fn(Json) -> Json + Send + Sync + 'static) -> Self {
        self.serialize = Some(Arc::new(f));
        self
    }

    pub fn parse_value(mut self, f: impl Fn(Json) -> Json + Send + Sync + 'static) -> Self {
        self.parse_value = Some(Arc::new(f));
        self
    }

    pub fn parse_literal(mut self, f: impl Fn(Json) -> Json + Send + Sync + 'static) -> Self {
        self.parse_literal = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for EntityBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBundle")
            .field("role", &self.role)
            .field("schema", &self.schema)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

/// Anything the classifier accepts.
#[derive(Debug)]
pub enum EntityInput {
    Sdl(String),
    Document(ast::schema::Document),
    Bundle(EntityBundle),
    Schema(SchemaInput),
    /// An already-constructed entity, passed through untouched.
    Entity(Box<Entity>),
}

impl From<&str> for EntityInput {
    fn from(text: &str) -> Self {
        EntityInput::Sdl(text.to_string())
    }
}

impl From<String> for EntityInput {
    fn from(text: String) -> Self {
        EntityInput::Sdl(text)
    }
}

impl From<ast::schema::Document> for EntityInput {
    fn from(doc: ast::schema::Document) -> Self {
        EntityInput::Document(doc)
    }
}

impl From<EntityBundle> for EntityInput {
    fn from(bundle: EntityBundle) -> Self {
        EntityInput::Bundle(bundle)
    }
}

impl From<SchemaInput> for EntityInput {
    fn from(input: SchemaInput) -> Self {
        EntityInput::Schema(input)
    }
}

impl From<Entity> for EntityInput {
    fn from(entity: Entity) -> Self {
        EntityInput::Entity(Box::new(entity))
    }
}

/// A leaf or composite member of a composition tree.
#[derive(Clone, Debug)]
pub enum Entity {
    Type(TypeEntity),
    Schema(SchemaEntity),
}

impl Entity {
    /// Classifies `input` and constructs the matching entities.
    ///
    /// A bundle with an explicit role yields exactly one leaf of that role.
    /// A bare document (or SDL text, or a role-less bundle) is exploded into
    /// one leaf per definition, each classified independently; schema blocks
    /// are not individually instantiable and are dropped from the
    /// explosion. A role-less bundle's resolver payload is dropped with
    /// them: there is no single leaf to attach it to.
    pub fn create(input: impl Into<EntityInput>) -> Result<Vec<Entity>> {
        match input.into() {
            EntityInput::Sdl(text) => classify_document(ast::parse_sdl(&text)?),
            EntityInput::Document(doc) => classify_document(doc),
            EntityInput::Bundle(bundle) => match bundle.role {
                Some(role) => Ok(vec![Entity::Type(TypeEntity::from_bundle(role, bundle)?)]),
                None => {
                    let source = bundle.schema.ok_or(ComposeError::InvalidInput)?;
                    let (_, doc) = source.into_document()?;
                    classify_document(doc)
                }
            },
            EntityInput::Schema(input) => Ok(vec![Entity::Schema(SchemaEntity::new(input)?)]),
            EntityInput::Entity(entity) => Ok(vec![*entity]),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Type(leaf) => leaf.name(),
            Entity::Schema(schema) => schema.name(),
        }
    }

    /// The rendered SDL this entity contributes to a parent merge. Empty
    /// for a composite that has not been built yet.
    pub fn sdl(&self) -> &str {
        match self {
            Entity::Type(leaf) => leaf.sdl(),
            Entity::Schema(schema) => schema.schema(),
        }
    }

    /// The parsed document this entity contributes to a parent merge.
    pub fn document(&self) -> Option<&ast::schema::Document> {
        match self {
            Entity::Type(leaf) => Some(leaf.document()),
            Entity::Schema(schema) => schema.schema_ast(),
        }
    }

    /// The resolver map fragment this entity contributes to a parent merge.
    /// A composite contributes its already-merged map.
    pub fn resolver_fragment(&self) -> Option<ResolverMap> {
        match self {
            Entity::Type(leaf) => leaf.resolver_fragment(),
            Entity::Schema(schema) => {
                if schema.resolvers().is_empty() {
                    None
                } else {
                    Some(schema.resolvers().clone())
                }
            }
        }
    }

    pub fn as_type(&self) -> Option<&TypeEntity> {
        match self {
            Entity::Type(leaf) => Some(leaf),
            Entity::Schema(_) => None,
        }
    }

    pub fn as_schema(&self) -> Option<&SchemaEntity> {
        match self {
            Entity::Schema(schema) => Some(schema),
            Entity::Type(_) => None,
        }
    }
}

/// One leaf: a single wrapped declaration plus its resolver contribution.
#[derive(Clone, Debug)]
pub struct TypeEntity {
    role: EntityRole,
    name: String,
    sdl: String,
    document: ast::schema::Document,
    is_extend: bool,
    /// For field roles: the enclosing root operation type's name.
    root_name: Option<String>,
    resolver: Option<ResolverValue>,
}

impl TypeEntity {
    pub(crate) fn from_bundle(role: EntityRole, bundle: EntityBundle) -> Result<Self> {
        let source = bundle.schema.ok_or(ComposeError::InvalidInput)?;
        let (sdl, document) = source.into_document()?;

        let resolver = if role == EntityRole::Scalar {
            let scalar = ScalarResolver {
                serialize: bundle.serialize,
                parse_value: bundle.parse_value,
                parse_literal: bundle.parse_literal,
            };
            (!scalar.is_empty()).then_some(ResolverValue::Scalar(scalar))
        } else {
            bundle.resolver
        };

        Self::from_document(role, document, sdl, resolver)
    }

    pub(crate) fn from_document(
        role: EntityRole,
        document: ast::schema::Document,
        sdl: Option<String>,
        resolver: Option<ResolverValue>,
    ) -> Result<Self> {
        let declared = document
            .definitions
            .first()
            .and_then(|def| ast::definition_name(def))
            .map(str::to_string);

        let name = if role.is_field_role() {
            // A field-role declaration names itself after the field it
            // contributes, falling back to the declaration's own name for
            // field-less root types.
            first_field_name(&document).or(declared)
        } else {
            declared
        }
        .ok_or(ComposeError::InvalidInput)?;

        if document.definitions.len() > 1 {
            return Err(ComposeError::TooManyDefinitions { name });
        }

        let root_name = role
            .is_field_role()
            .then(|| enclosing_object_name(&document))
            .flatten();

        let is_extend = role == EntityRole::Type && has_object_extension(&document);

        let sdl = sdl.unwrap_or_else(|| ast::print_document(&document));

        Ok(Self {
            role,
            name,
            sdl,
            document,
            is_extend,
            root_name,
            resolver,
        })
    }

    pub fn role(&self) -> EntityRole {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sdl(&self) -> &str {
        &self.sdl
    }

    pub fn document(&self) -> &ast::schema::Document {
        &self.document
    }

    /// True when the wrapped declaration extends an object type instead of
    /// defining one. Only meaningful for the `Type` role.
    pub fn is_extend(&self) -> bool {
        self.is_extend
    }

    pub fn resolver(&self) -> Option<&ResolverValue> {
        self.resolver.as_ref()
    }

    /// Shapes this leaf's resolver contribution for a parent merge.
    pub fn resolver_fragment(&self) -> Option<ResolverMap> {
        match self.role {
            EntityRole::Type | EntityRole::Enum => self
                .resolver
                .clone()
                .map(|resolver| single(self.name.clone(), resolver)),

            EntityRole::Query | EntityRole::Mutation | EntityRole::Subscription => {
                let root = self.root_name.clone()?;
                let resolver = self.resolver.clone()?;
                Some(single(
                    root,
                    ResolverValue::Map(single(self.name.clone(), resolver)),
                ))
            }

            // Unions and interfaces always contribute a `__resolveType`,
            // answering null when none was supplied.
            EntityRole::Union | EntityRole::Interface => {
                let resolve_type = self
                    .resolver
                    .clone()
                    .unwrap_or_else(|| ResolverValue::Function(null_resolve_type()));
                Some(single(
                    self.name.clone(),
                    ResolverValue::Map(single("__resolveType".to_string(), resolve_type)),
                ))
            }

            EntityRole::Scalar => match &self.resolver {
                Some(scalar @ ResolverValue::Scalar(_)) => {
                    Some(single(self.name.clone(), scalar.clone()))
                }
                _ => None,
            },

            EntityRole::Input | EntityRole::Directive => None,
        }
    }
}

fn single(key: String, value: ResolverValue) -> ResolverMap {
    let mut map = ResolverMap::new();
    map.insert(key, value);
    map
}

/// Explodes a document into one classified leaf per definition. Schema
/// blocks are skipped.
fn classify_document(doc: ast::schema::Document) -> Result<Vec<Entity>> {
    let mut entities = Vec::with_capacity(doc.definitions.len());
    for def in doc.definitions {
        let Some(role) = classify_definition(&def) else {
            continue;
        };
        let doc = ast::schema::Document {
            definitions: vec![def],
        };
        entities.push(Entity::Type(TypeEntity::from_document(
            role, doc, None, None,
        )?));
    }
    Ok(entities)
}

fn classify_definition(def: &ast::schema::Definition) -> Option<EntityRole> {
    use ast::schema::{Definition as D, TypeDefinition as T, TypeExtension as E};
    match def {
        D::SchemaDefinition(_) => None,
        D::DirectiveDefinition(_) => Some(EntityRole::Directive),
        D::TypeDefinition(def) => Some(match def {
            T::Scalar(_) => EntityRole::Scalar,
            T::Object(def) => object_role(&def.name),
            T::Interface(_) => EntityRole::Interface,
            T::Union(_) => EntityRole::Union,
            T::Enum(_) => EntityRole::Enum,
            T::InputObject(_) => EntityRole::Input,
        }),
        D::TypeExtension(ext) => Some(match ext {
            E::Scalar(_) => EntityRole::Scalar,
            E::Object(ext) => object_role(&ext.name),
            E::Interface(_) => EntityRole::Interface,
            E::Union(_) => EntityRole::Union,
            E::Enum(_) => EntityRole::Enum,
            E::InputObject(_) => EntityRole::Input,
        }),
    }
}

/// Role of an object type, decided by name substring, case-insensitively,
/// in this fixed order. A type named `CreateQueryLog` therefore classifies
/// as a Query contribution; that lookalike behavior is part of the
/// contract.
fn object_role(name: &str) -> EntityRole {
    let lower = name.to_ascii_lowercase();
    if lower.contains("mutation") {
        EntityRole::Mutation
    } else if lower.contains("query") {
        EntityRole::Query
    } else if lower.contains("subscription") {
        EntityRole::Subscription
    } else {
        EntityRole::Type
    }
}

fn first_field_name(doc: &ast::schema::Document) -> Option<String> {
    use ast::schema::{Definition as D, TypeDefinition as T, TypeExtension as E};
    for def in &doc.definitions {
        let fields = match def {
            D::TypeDefinition(T::Object(def)) => &def.fields,
            D::TypeExtension(E::Object(ext)) => &ext.fields,
            _ => continue,
        };
        if let Some(field) = fields.first() {
            return Some(field.name.clone());
        }
    }
    None
}

fn enclosing_object_name(doc: &ast::schema::Document) -> Option<String> {
    use ast::schema::{Definition as D, TypeDefinition as T, TypeExtension as E};
    doc.definitions.iter().find_map(|def| match def {
        D::TypeDefinition(T::Object(def)) => Some(def.name.clone()),
        D::TypeExtension(E::Object(ext)) => Some(ext.name.clone()),
        _ => None,
    })
}

fn has_object_extension(doc: &ast::schema::Document) -> bool {
    doc.definitions.iter().any(|def| {
        matches!(
            def,
            ast::schema::Definition::TypeExtension(ast::schema::TypeExtension::Object(_))
        )
    })
}
