pub mod directives;
pub mod document_analyzer;
pub mod error;
pub mod output_models;
pub mod registry;
pub mod type_usage;
pub mod usage_models;

#[cfg(test)]
pub mod test_utils;

pub use self::directives::*;
pub use self::document_analyzer::*;
pub use self::error::*;
pub use self::output_models::*;
pub use self::registry::*;
pub use self::type_usage::*;
pub use self::usage_models::*;
