use crate::ast;
use thiserror::Error;

/// Errors surfaced while constructing or building entities.
///
/// Every variant is a programmer/input error discovered synchronously; the
/// merge engine itself has no failure mode.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// Construction input matched none of the recognized shapes (for
    /// example, a bundle carrying neither SDL text nor a parsed document).
    #[error("not valid input")]
    InvalidInput,

    /// An explicit role tag was not one of the recognized entity roles.
    /// Note that `schema` is not a leaf role and lands here too.
    #[error("unknown type `{0}`")]
    UnknownRole(String),

    /// A non-composite entity was given a document with more than one
    /// top-level definition.
    #[error("too many type definitions in simple type `{name}`")]
    TooManyDefinitions { name: String },

    /// Malformed SDL rejected by the parser. Propagated unchanged.
    #[error(transparent)]
    Parse(#[from] ast::schema::ParseError),
}
