//! The composite entity: an ordered collection of leaves and nested
//! composites that builds into one merged document and one merged resolver
//! map, with hooks bubbled up from descendant composites.

use crate::ast;
use crate::entity::{Entity, EntityInput, EntityRole, SchemaSource, TypeEntity};
use crate::error::ComposeError;
use crate::hook::ResolverHook;
use crate::merge::{merge_documents, normalize_extensions};
use crate::resolver::{self, ResolverMap};
use log::debug;


type Result<T> = std::result::Result<T, ComposeError>;

/// Construction input for a [`SchemaEntity`]. A bare `&str` converts into
/// an input holding only the display name.
#[derive(Debug, Default)]
pub struct SchemaInput {
    pub name: String,
    pub items: Vec<EntityInput>,
    pub resolver: Option<ResolverMap>,
    pub hooks: Vec<ResolverHook>,
    /// An SDL fragment merged in after every child's contribution.
    pub schema: Option<SchemaSource>,
    pub root_query: Option<String>,
    pub root_mutation: Option<String>,
    pub root_subscription: Option<String>,
}

impl SchemaInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn item(mut self, item: impl Into<EntityInput>) -> Self {
        self.items.push(item.into());
        self
    }

    pub fn items<I, T>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityInput>,
    {
        self.items.extend(items.into_iter().map(Into::into));
        self
    }

    pub fn resolver(mut self, resolver: ResolverMap) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn hook(mut self, hook: ResolverHook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn hooks<I>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = ResolverHook>,
    {
        self.hooks.extend(hooks);
        self
    }

    pub fn schema(mut self, schema: impl Into<SchemaSource>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn root_query(mut self, name: impl Into<String>) -> Self {
        self.root_query = Some(name.into());
        self
    }

    pub fn root_mutation(mut self, name: impl Into<String>) -> Self {
        self.root_mutation = Some(name.into());
        self
    }

    pub fn root_subscription(mut self, name: impl Into<String>) -> Self {
        self.root_subscription = Some(name.into());
        self
    }
}

impl From<&str> for SchemaInput {
    fn from(name: &str) -> Self {
        SchemaInput::new(name)
    }
}

impl From<String> for SchemaInput {
    fn from(name: String) -> Self {
        SchemaInput::new(name)
    }
}

/// A recursively-buildable aggregation of child entities.
///
/// Children accumulate through [`add`](Self::add) until
/// [`build`](Self::build) runs; building is idempotent unless forced
/// through [`rebuild`](Self::rebuild), which recomputes the derived state
/// from the current child list.
#[derive(Clone, Debug)]
pub struct SchemaEntity {
    name: String,
    items: Vec<Entity>,
    initial_sdl: Option<String>,
    initial_document: Option<ast::schema::Document>,
    resolver: Option<ResolverMap>,
    hooks: Vec<ResolverHook>,
    // Accepted for input compatibility; nothing in the build consumes them.
    root_query: String,
    root_mutation: String,
    root_subscription: String,
    is_built: bool,
    schema: String,
    schema_ast: Option<ast::schema::Document>,
    resolvers: ResolverMap,
    compiled_hooks: Vec<ResolverHook>,
}

impl SchemaEntity {
    pub fn new(input: impl Into<SchemaInput>) -> Result<Self> {
        let input = input.into();

        // Parse the initial fragment up front so malformed SDL fails at
        // construction, not at build.
        let (initial_sdl, initial_document) = match input.schema {
            Some(source) => {
                let (sdl, doc) = source.into_document()?;
                (sdl, Some(doc))
            }
            None => (None, None),
        };

        let mut entity = Self {
            name: input.name,
            items: Vec::new(),
            initial_sdl,
            initial_document,
            resolver: input.resolver,
            hooks: input.hooks,
            root_query: input.root_query.unwrap_or_else(|| "Query".to_string()),
            root_mutation: input.root_mutation.unwrap_or_else(|| "Mutation".to_string()),
            root_subscription: input
                .root_subscription
                .unwrap_or_else(|| "Subscription".to_string()),
            is_built: false,
            schema: String::new(),
            schema_ast: None,
            resolvers: ResolverMap::new(),
            compiled_hooks: Vec::new(),
        };

        for item in input.items {
            entity.add_all(Entity::create(item)?);
        }

        Ok(entity)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ordered child list.
    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    pub fn is_built(&self) -> bool {
        self.is_built
    }

    /// The merged SDL text; empty until built.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The merged document; `None` until built.
    pub fn schema_ast(&self) -> Option<&ast::schema::Document> {
        self.schema_ast.as_ref()
    }

    /// The merged resolver map; empty until built.
    pub fn resolvers(&self) -> &ResolverMap {
        &self.resolvers
    }

    /// Direct leaf children with the Query role. Useful after build.
    pub fn queries(&self) -> Vec<&TypeEntity> {
        self.leaves_with_role(EntityRole::Query)
    }

    /// Direct leaf children with the Mutation role.
    pub fn mutations(&self) -> Vec<&TypeEntity> {
        self.leaves_with_role(EntityRole::Mutation)
    }

    /// Direct leaf children with the Subscription role.
    pub fn subscriptions(&self) -> Vec<&TypeEntity> {
        self.leaves_with_role(EntityRole::Subscription)
    }

    fn leaves_with_role(&self, role: EntityRole) -> Vec<&TypeEntity> {
        self.items
            .iter()
            .filter_map(Entity::as_type)
            .filter(|leaf| leaf.role() == role)
            .collect()
    }

    /// Appends one child entity. Each entity instance is owned by exactly
    /// one parent; adding a structurally identical clone is allowed and
    /// contributes twice.
    pub fn add(&mut self, entity: Entity) {
        self.items.push(entity);
    }

    pub fn add_all(&mut self, entities: Vec<Entity>) {
        self.items.extend(entities);
    }

    /// Classifies `input` and appends the resulting entities.
    pub fn add_input(&mut self, input: impl Into<EntityInput>) -> Result<()> {
        self.add_all(Entity::create(input)?);
        Ok(())
    }

    /// Directly-declared hooks followed by the hooks bubbled up from
    /// composite children during the last build.
    pub fn hooks(&self) -> Vec<ResolverHook> {
        self.hooks
            .iter()
            .chain(self.compiled_hooks.iter())
            .cloned()
            .collect()
    }

    /// Builds this composite: children first (depth-first), then the SDL
    /// merge, the resolver deep-merge, and hook collection. A second call
    /// is a no-op; use [`rebuild`](Self::rebuild) to force recomputation.
    pub fn build(&mut self) -> Result<()> {
        self.build_inner(false)
    }

    /// Rebuilds from the current child list even if already built.
    pub fn rebuild(&mut self) -> Result<()> {
        self.build_inner(true)
    }

    fn build_inner(&mut self, force: bool) -> Result<()> {
        if self.is_built && !force {
            return Ok(());
        }

        if self.items.is_empty() && self.initial_document.is_none() {
            // Nothing to merge: the own resolver map is the whole result.
            self.resolvers = self.resolver.clone().unwrap_or_default();
            self.compiled_hooks = Vec::new();
            self.is_built = true;
            return Ok(());
        }

        for item in &mut self.items {
            if let Entity::Schema(child) = item {
                child.build()?;
            }
        }

        let mut docs: Vec<ast::schema::Document> = Vec::new();
        for item in &self.items {
            if let Some(doc) = item.document() {
                docs.push(doc.clone());
            }
        }
        if let Some(doc) = &self.initial_document {
            docs.push(doc.clone());
        }

        let merged = merge_documents(docs);
        let text = ast::print_document(&merged);
        // Round-trip through the codec so the stored AST is exactly what a
        // consumer parsing our output would see.
        self.schema_ast = Some(ast::parse_sdl(&text)?);
        self.schema = text;

        let mut resolvers = self.resolver.clone().unwrap_or_default();
        for item in &self.items {
            if let Some(fragment) = item.resolver_fragment() {
                resolver::deep_merge(&mut resolvers, fragment);
            }
        }
        self.resolvers = resolvers;

        self.compiled_hooks = self
            .items
            .iter()
            .filter_map(Entity::as_schema)
            .flat_map(SchemaEntity::hooks)
            .collect();

        self.is_built = true;
        debug!(
            "built schema `{}`: {} children, {} hooks",
            self.name,
            self.items.len(),
            self.hooks.len() + self.compiled_hooks.len(),
        );
        Ok(())
    }

    /// Applies every hook, in [`hooks`](Self::hooks) order, to the merged
    /// resolver map. Each declared path is read, transformed, and written
    /// back immediately, so later hooks observe earlier hooks' writes.
    pub fn apply_hooks(&mut self) {
        for hook in self.hooks() {
            for (path, transform) in hook.iter() {
                let current = resolver::get_path(&self.resolvers, path).cloned();
                resolver::set_path(&mut self.resolvers, path, transform(current));
            }
        }
    }

    /// Rewrites any extension definitions surviving in the built document
    /// into their definition forms and re-renders the stored SDL text.
    pub fn fix_schema(&mut self) {
        if let Some(doc) = self.schema_ast.take() {
            let fixed = normalize_extensions(doc);
            self.schema = ast::print_document(&fixed);
            self.schema_ast = Some(fixed);
        }
    }

    /// The initial SDL fragment supplied at construction, if any.
    pub fn initial_schema(&self) -> Option<&str> {
        self.initial_sdl.as_deref()
    }

    pub fn root_query(&self) -> &str {
        &self.root_query
    }

    pub fn root_mutation(&self) -> &str {
        &self.root_mutation
    }

    pub fn root_subscription(&self) -> &str {
        &self.root_subscription
    }
}
