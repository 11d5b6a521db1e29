//! The result of an analysis run: selections resolved per concrete type, the
//! type models built from them, and the per-operation assembly.

pub mod document_model;
pub mod path;
pub mod selection;
pub mod type_model;

pub use self::document_model::*;
pub use self::path::*;
pub use self::selection::*;
pub use self::type_model::*;
