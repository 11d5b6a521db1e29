use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{Path, TypeModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Root type name used when the schema has no `schema { ... }` definition.
    pub fn conventional_root_name(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => write!(f, "query"),
            OperationKind::Mutation => write!(f, "mutation"),
            OperationKind::Subscription => write!(f, "subscription"),
        }
    }
}

/// One analyzed operation: its root model and where every nested model sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationModel {
    pub name: String,
    pub kind: OperationKind,
    pub root_type: String,
    /// Model name for every composite position of the result, root included.
    pub paths: IndexMap<Path, String>,
}

impl OperationModel {
    pub fn type_at(&self, path: &Path) -> Option<&str> {
        self.paths.get(path).map(String::as_str)
    }
}

/// Everything an emitter needs, immutable once returned by the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    types: IndexMap<String, TypeModel>,
    operations: Vec<OperationModel>,
}

impl DocumentModel {
    pub(crate) fn new(types: IndexMap<String, TypeModel>, operations: Vec<OperationModel>) -> Self {
        DocumentModel { types, operations }
    }

    /// All models in registration order.
    pub fn types(&self) -> impl Iterator<Item = &TypeModel> {
        self.types.values()
    }

    pub fn type_by_name(&self, name: &str) -> Option<&TypeModel> {
        self.types.get(name)
    }

    pub fn operations(&self) -> &[OperationModel] {
        &self.operations
    }

    pub fn operation(&self, name: &str) -> Option<&OperationModel> {
        self.operations.iter().find(|o| o.name == name)
    }

    /// Root model of the named operation.
    pub fn root_type(&self, operation_name: &str) -> Option<&TypeModel> {
        self.operation(operation_name)
            .and_then(|o| self.type_by_name(&o.root_type))
    }

    /// Model at `path` within the operation the path starts with.
    pub fn type_at(&self, path: &Path) -> Option<&TypeModel> {
        let operation = self.operation(path.segments().first()?)?;

        operation
            .type_at(path)
            .and_then(|name| self.type_by_name(name))
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
