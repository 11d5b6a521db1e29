pub mod collect_fields;
pub mod ext;
pub mod operation_visitor;
pub mod utils;

pub use self::collect_fields::*;
pub use self::ext::*;
pub use self::operation_visitor::*;
pub use self::utils::*;
