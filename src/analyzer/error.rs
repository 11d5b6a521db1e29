use graphql_parser::Pos;
use thiserror::Error;

use crate::model::{OperationKind, Path};

pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Why an analysis run was aborted. There is no partial result.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalyzerError {
    #[error("A schema must be provided before analyzing documents.")]
    MissingSchema,

    #[error("At least one document must be provided.")]
    NoDocuments,

    #[error("Operation at {}:{} has no name.", .position.line, .position.column)]
    AnonymousOperation { position: Pos },

    #[error("The schema has no {kind} root type, required by operation \"{operation}\".")]
    UnsupportedRootOperation {
        operation: String,
        kind: OperationKind,
    },

    #[error(
        "Fields \"{response_name}\" at `{path}` conflict ({}:{} and {}:{}): {reason}.",
        .first.line, .first.column, .second.line, .second.column
    )]
    FieldMergeConflict {
        response_name: String,
        path: Path,
        first: Pos,
        second: Pos,
        reason: String,
    },

    #[error(
        "Type condition \"{type_condition}\" at `{path}` ({}:{}) can never apply to \"{parent_type}\".",
        .position.line, .position.column
    )]
    UnknownTypeCondition {
        type_condition: String,
        parent_type: String,
        path: Path,
        position: Pos,
    },

    #[error("Unknown fragment \"{name}\" at `{path}` ({}:{}).", .position.line, .position.column)]
    UnknownFragment {
        name: String,
        path: Path,
        position: Pos,
    },

    #[error("Fragment \"{name}\" is defined more than once.")]
    DuplicateFragmentName { name: String },

    #[error(
        "Cannot spread fragment \"{name}\" within itself ({}:{}, via {}).",
        .position.line, .position.column, .via.join(" -> ")
    )]
    FragmentCycle {
        name: String,
        /// Fragments expanded from `name` until it is spread again.
        via: Vec<String>,
        position: Pos,
    },

    #[error(
        "Cannot query field \"{field_name}\" on type \"{type_name}\" at `{path}` ({}:{}).",
        .position.line, .position.column
    )]
    UnknownField {
        type_name: String,
        field_name: String,
        path: Path,
        position: Pos,
    },

    #[error("Unknown type \"{name}\" at `{path}` ({}:{}).", .position.line, .position.column)]
    UnknownType {
        name: String,
        path: Path,
        position: Pos,
    },

    #[error("Type \"{name}\" at `{path}` cannot be used as an output type.")]
    NotAnOutputType { name: String, path: Path },

    /// `path` is the position the name was allocated for. Enum and input
    /// models belong to no result position and report none.
    #[error(
        "Type name \"{name}\" is already registered{}.",
        .path.as_ref().map(|path| format!(" (allocated at `{}`)", path)).unwrap_or_default()
    )]
    DuplicateTypeName { name: String, path: Option<Path> },

    #[error("Directive \"@{directive}\" may only appear once on {location}.")]
    DuplicateDirective { directive: String, location: String },

    #[error("Directive \"@{directive}\" on {location} requires a string argument \"{argument}\".")]
    InvalidDirectiveArgument {
        directive: String,
        argument: String,
        location: String,
    },
}
