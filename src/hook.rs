//! Resolver hooks: named transforms keyed by dotted resolver paths,
//! collected bottom-up during a composite build and applied top-down by
//! [`SchemaEntity::apply_hooks`](crate::SchemaEntity::apply_hooks).

use crate::resolver::ResolverValue;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A hook transform. Receives whatever currently sits at the declared path
/// (possibly nothing) and returns the replacement value.
pub type HookFn = Arc<dyn Fn(Option<ResolverValue>) -> ResolverValue + Send + Sync>;

/// An ordered set of path -> transform entries. Hooks applied later observe
/// the writes of hooks applied earlier at the same path, so hooks compose
/// as a left-to-right pipeline per path.
#[derive(Clone, Default)]
pub struct ResolverHook {
    transforms: IndexMap<String, HookFn>,
}

impl ResolverHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a transform for the dotted resolver path `path`. A second
    /// registration for the same path within one hook replaces the first.
    pub fn on(
        mut self,
        path: impl Into<String>,
        transform: impl Fn(Option<ResolverValue>) -> ResolverValue + Send + Sync + 'static,
    ) -> Self {
        self.transforms.insert(path.into(), Arc::new(transform));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HookFn)> {
        self.transforms
            .iter()
            .map(|(path, transform)| (path.as_str(), transform))
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl fmt::Debug for ResolverHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverHook")
            .field("paths", &self.transforms.keys().collect::<Vec<_>>())
            .finish()
    }
}
