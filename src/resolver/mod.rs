//! Resolver values, resolver maps, and the deep-merge / dotted-path
//! operations the composition layer performs on them.
//!
//! Resolver callables are opaque to this crate: execution lives in whatever
//! engine consumes the composed `(schema text, resolver map)` pair. They are
//! modeled as `Arc`'d functions over [`serde_json::Value`] so contributions
//! can be cloned into several composites and exercised from tests.

use indexmap::IndexMap;
use serde_json::Value as Json;
use std::fmt;
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// An opaque resolver callable: JSON in, JSON out.
pub type ResolverFn = Arc<dyn Fn(Json) -> Json + Send + Sync>;

/// A resolver map: type name -> field name -> resolver, in insertion order.
pub type ResolverMap = IndexMap<String, ResolverValue>;

/// One node in a resolver map.
#[derive(Clone)]
pub enum ResolverValue {
    /// A nested map (a type's fields, or a whole sub-schema's map).
    Map(ResolverMap),
    /// A field resolver.
    Function(ResolverFn),
    /// A custom scalar's codec bundle.
    Scalar(ScalarResolver),
    /// A constant entry, e.g. an enum member's internal value.
    Constant(Json),
}

impl ResolverValue {
    pub fn function(f: impl Fn(Json) -> Json + Send + Sync + 'static) -> Self {
        ResolverValue::Function(Arc::new(f))
    }

    pub fn as_map(&self) -> Option<&ResolverMap> {
        match self {
            ResolverValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&ResolverFn> {
        match self {
            ResolverValue::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarResolver> {
        match self {
            ResolverValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Json> {
        match self {
            ResolverValue::Constant(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for ResolverValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverValue::Map(map) => f.debug_map().entries(map.iter()).finish(),
            ResolverValue::Function(_) => f.write_str("<function>"),
            ResolverValue::Scalar(scalar) => scalar.fmt(f),
            ResolverValue::Constant(value) => value.fmt(f),
        }
    }
}

impl From<ResolverMap> for ResolverValue {
    fn from(map: ResolverMap) -> Self {
        ResolverValue::Map(map)
    }
}

impl From<Json> for ResolverValue {
    fn from(value: Json) -> Self {
        ResolverValue::Constant(value)
    }
}

/// The serialize / parse-value / parse-literal bundle a custom scalar
/// contributes. Any subset of the three may be present.
#[derive(Clone, Default)]
pub struct ScalarResolver {
    pub serialize: Option<ResolverFn>,
    pub parse_value: Option<ResolverFn>,
    pub parse_literal: Option<ResolverFn>,
}

impl ScalarResolver {
    pub fn is_empty(&self) -> bool {
        self.serialize.is_none() && self.parse_value.is_none() && self.parse_literal.is_none()
    }
}

impl fmt::Debug for ScalarResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarResolver")
            .field("serialize", &self.serialize.as_ref().map(|_| "<function>"))
            .field("parse_value", &self.parse_value.as_ref().map(|_| "<function>"))
            .field("parse_literal", &self.parse_literal.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// The default `__resolveType` for unions and interfaces that were composed
/// without one: always answers JSON null.
pub fn null_resolve_type() -> ResolverFn {
    Arc::new(|_| Json::Null)
}

/// Folds `inc` into `acc`. Maps merge key-by-key recursively; on any other
/// collision the incoming value replaces the accumulated one.
pub fn deep_merge(acc: &mut ResolverMap, inc: ResolverMap) {
    for (key, value) in inc {
        match (acc.get_mut(&key), value) {
            (Some(ResolverValue::Map(existing)), ResolverValue::Map(incoming)) => {
                deep_merge(existing, incoming);
            }
            (_, value) => {
                acc.insert(key, value);
            }
        }
    }
}

/// Looks up the value at a dotted `path`, if every intermediate segment is
/// a map entry.
pub fn get_path<'a>(map: &'a ResolverMap, path: &str) -> Option<&'a ResolverValue> {
    let mut segments = path.split('.');
    let mut current = map.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            ResolverValue::Map(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at a dotted `path`, materializing intermediate maps and
/// replacing any non-map value standing in the way.
pub fn set_path(map: &mut ResolverMap, path: &str, value: ResolverValue) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = map;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| ResolverValue::Map(ResolverMap::new()));
        if !matches!(slot, ResolverValue::Map(_)) {
            *slot = ResolverValue::Map(ResolverMap::new());
        }
        current = match slot {
            ResolverValue::Map(next) => next,
            _ => unreachable!("slot was just normalized to a map"),
        };
    }
    current.insert(last.to_string(), value);
}
