//! Compose modular GraphQL SDL fragments — and the resolver logic attached
//! to them — into a single schema document and a single resolver map.
//!
//! Modules contribute type definitions and `extend` declarations without
//! ever seeing the whole schema; [`merge_documents`] folds them into one
//! self-consistent document, and [`SchemaEntity`] aggregates leaves and
//! nested composites into a buildable tree whose resolver fragments
//! deep-merge alongside the SDL.
//!
//! ```no_run
//! use sdl_compose::{SchemaEntity, SchemaInput};
//!
//! # fn main() -> Result<(), sdl_compose::ComposeError> {
//! let mut schema = SchemaEntity::new(
//!     SchemaInput::new("app")
//!         .item("type Picture { name: String }")
//!         .item("extend type Picture { size: Int }"),
//! )?;
//! schema.build()?;
//! schema.fix_schema();
//! println!("{}", schema.schema());
//! # Ok(())
//! # }
//! ```

pub mod ast;
mod entity;
mod error;
mod hook;
mod merge;
pub mod resolver;
mod schema;

pub use entity::{Entity, EntityBundle, EntityInput, EntityRole, SchemaSource, TypeEntity};
pub use error::ComposeError;
pub use hook::{HookFn, ResolverHook};
pub use merge::{merge_documents, normalize_extensions};
pub use resolver::{ResolverFn, ResolverMap, ResolverValue, ScalarResolver};
pub use schema::{SchemaEntity, SchemaInput};
