use crate::ast::FieldExtension;
use crate::model::Path;
use crate::static_graphql::{query, schema};

/// One occurrence of a field inside the selection of one concrete type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSelection {
    /// Schema definition of the selected field.
    pub field: schema::Field,
    /// The (merged) field node from the document.
    pub selection: query::Field,
    /// Path of the selection set owning this field.
    pub path: Path,
}

impl FieldSelection {
    pub fn new(field: schema::Field, selection: query::Field, path: Path) -> Self {
        FieldSelection {
            field,
            selection,
            path,
        }
    }

    pub fn response_name(&self) -> &str {
        self.selection.response_name()
    }

    /// Path of the value this field produces.
    pub fn field_path(&self) -> Path {
        self.path.append(self.response_name())
    }
}

/// Fields selected when the runtime type is `type_condition`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub type_condition: String,
    pub fields: Vec<FieldSelection>,
}

impl SelectionInfo {
    pub fn field(&self, response_name: &str) -> Option<&FieldSelection> {
        self.fields
            .iter()
            .find(|f| f.response_name() == response_name)
    }

    pub fn response_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.response_name()).collect()
    }
}

/// A selection set expanded into one variant per concrete type it can resolve to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PossibleSelections {
    pub variants: Vec<SelectionInfo>,
}

impl PossibleSelections {
    pub fn variant(&self, type_condition: &str) -> Option<&SelectionInfo> {
        self.variants
            .iter()
            .find(|v| v.type_condition == type_condition)
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
