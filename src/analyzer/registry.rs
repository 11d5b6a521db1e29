use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use super::{AnalyzerError, Result};
use crate::model::{Path, TypeModel};

/// Identity of the thing a model name is allocated for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// An enum or input object type of the schema.
    SchemaType(String),
    /// The root selection set of a named operation.
    Operation(String),
    /// A composite field position of a result.
    Selection(Path),
    /// One concrete type behind the abstract type selected at a position.
    Variant(Path, String),
}

impl NodeKey {
    /// Result position of the node. Schema types have none.
    pub fn path(&self) -> Option<Path> {
        match self {
            NodeKey::SchemaType(_) => None,
            NodeKey::Operation(name) => Some(Path::root(name.as_str())),
            NodeKey::Selection(path) | NodeKey::Variant(path, _) => Some(path.clone()),
        }
    }
}

/// Allocates unique model names and collects the models of one analysis run.
///
/// A registry belongs to a single run, nothing is shared between runs.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    names: HashMap<NodeKey, String>,
    taken: HashMap<String, NodeKey>,
    models: IndexMap<String, TypeModel>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name for `node`, allocating one on the first call.
    ///
    /// When `proposed` belongs to another node or is listed in `skip_names`, the
    /// first free `{proposed}{n}` with n = 1, 2, ... is used instead.
    pub fn get_or_create_name(
        &mut self,
        node: NodeKey,
        proposed: &str,
        skip_names: &IndexSet<String>,
    ) -> String {
        if let Some(name) = self.names.get(&node) {
            return name.clone();
        }

        let is_free = |name: &str| !self.taken.contains_key(name) && !skip_names.contains(name);

        let name = if is_free(proposed) {
            proposed.to_string()
        } else {
            (1..)
                .map(|n| format!("{}{}", proposed, n))
                .find(|candidate| is_free(candidate))
                .unwrap_or_else(|| proposed.to_string())
        };

        tracing::trace!(?node, proposed, %name, "allocated type name");

        self.taken.insert(name.clone(), node.clone());
        self.names.insert(node, name.clone());

        name
    }

    /// Name previously allocated for `node`, if any.
    pub fn name_of(&self, node: &NodeKey) -> Option<&str> {
        self.names.get(node).map(String::as_str)
    }

    pub fn register(&mut self, model: TypeModel) -> Result<()> {
        let name = model.name().to_string();

        if self.models.contains_key(&name) {
            let path = self.taken.get(&name).and_then(NodeKey::path);
            return Err(AnalyzerError::DuplicateTypeName { name, path });
        }

        self.models.insert(name, model);

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeModel> {
        self.models.get(name)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Ends the run and hands out the models in registration order.
    pub fn finish(self) -> IndexMap<String, TypeModel> {
        self.models
    }
}

#[cfg(test)]
fn object_model(name: &str) -> TypeModel {
    TypeModel::Object(crate::model::ObjectTypeModel {
        name: name.to_string(),
        description: None,
        schema_type: name.to_string(),
        fields: vec![],
    })
}

#[test]
fn naming_is_idempotent_per_node() {
    let mut registry = TypeRegistry::new();
    let node = NodeKey::Selection(Path::root("GetPet").append("pet"));

    let first = registry.get_or_create_name(node.clone(), "Pet", &IndexSet::new());
    let second = registry.get_or_create_name(node, "Pet", &IndexSet::new());

    assert_eq!(first, "Pet");
    assert_eq!(first, second);
}

#[test]
fn collisions_are_suffixed() {
    let mut registry = TypeRegistry::new();
    let root = Path::root("GetDogs");

    let a = registry.get_or_create_name(
        NodeKey::Selection(root.append("dog")),
        "Dog",
        &IndexSet::new(),
    );
    let b = registry.get_or_create_name(
        NodeKey::Selection(root.append("mother")),
        "Dog",
        &IndexSet::new(),
    );
    let c = registry.get_or_create_name(
        NodeKey::Selection(root.append("father")),
        "Dog",
        &IndexSet::new(),
    );

    assert_eq!(vec![a, b, c], vec!["Dog", "Dog1", "Dog2"]);
}

#[test]
fn skip_names_are_never_allocated() {
    let mut registry = TypeRegistry::new();
    let skip: IndexSet<String> = ["GetPet".to_string(), "GetPet1".to_string()].into();

    let name = registry.get_or_create_name(
        NodeKey::Selection(Path::root("Other").append("getPet")),
        "GetPet",
        &skip,
    );

    assert_eq!(name, "GetPet2");
}

#[test]
fn register_rejects_duplicate_names() {
    let mut registry = TypeRegistry::new();
    let path = Path::root("GetDog").append("dog");

    let name = registry.get_or_create_name(NodeKey::Selection(path.clone()), "Dog", &IndexSet::new());
    assert!(registry.register(object_model(&name)).is_ok());

    let error = registry.register(object_model("Dog")).unwrap_err();
    assert_eq!(
        error,
        AnalyzerError::DuplicateTypeName {
            name: "Dog".to_string(),
            path: Some(path),
        }
    );
    assert_eq!(
        error.to_string(),
        "Type name \"Dog\" is already registered (allocated at `GetDog.dog`)."
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn duplicate_schema_type_names_have_no_position() {
    let mut registry = TypeRegistry::new();

    let name = registry.get_or_create_name(
        NodeKey::SchemaType("Color".to_string()),
        "Colour",
        &IndexSet::new(),
    );
    assert!(registry.register(object_model(&name)).is_ok());

    assert_eq!(
        registry.register(object_model("Colour")),
        Err(AnalyzerError::DuplicateTypeName {
            name: "Colour".to_string(),
            path: None,
        })
    );
}
