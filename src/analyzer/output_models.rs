use std::collections::VecDeque;

use graphql_parser::Pos;
use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use super::{AnalyzerError, NodeKey, Result, TypeRegistry};
use crate::ast::{
    to_class_name, FieldCollector, OperationDefinitionExtension, SchemaDocumentExtension,
    TypeDefinitionExtension, TypeExtension, TypeKind, BUILTIN_SCALARS,
};
use crate::model::{
    FieldSelection, InterfaceTypeModel, ObjectTypeModel, OperationKind, OperationModel,
    OutputFieldModel, Path, SelectionInfo, TypeModel, UnionTypeModel,
};
use crate::static_graphql::{query, schema::TypeDefinition};

/// Class-cased operation names plus `reserved`. Nested models never take these.
pub fn operation_skip_names(
    documents: &[query::Document],
    reserved: &IndexSet<String>,
) -> IndexSet<String> {
    let mut skip_names = reserved.clone();

    for document in documents {
        for definition in &document.definitions {
            if let query::Definition::Operation(operation) = definition {
                if let Some(name) = operation.name() {
                    skip_names.insert(to_class_name(name));
                }
            }
        }
    }

    skip_names
}

/// One response name as selected under one or more mutually exclusive parents,
/// e.g. `owner` inside both `... on Dog` and `... on Cat`.
///
/// Occurrences are collected one by one, so their arguments never have to agree.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOccurrences {
    pub selection: FieldSelection,
    pub alternatives: Vec<FieldSelection>,
}

impl FieldOccurrences {
    pub fn new(selection: FieldSelection) -> Self {
        FieldOccurrences {
            selection,
            alternatives: vec![],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldSelection> {
        std::iter::once(&self.selection).chain(&self.alternatives)
    }

    fn named_type(&self) -> String {
        self.selection.field.field_type.inner_type()
    }

    /// Adds the occurrences of `other`. Both must select the same schema field
    /// and return the same named type.
    fn absorb(&mut self, other: FieldOccurrences) -> Result<()> {
        let reason = if self.selection.field.name != other.selection.field.name {
            Some(format!(
                "\"{}\" and \"{}\" are different fields",
                self.selection.field.name, other.selection.field.name
            ))
        } else if self.named_type() != other.named_type() {
            Some(format!(
                "they return \"{}\" and \"{}\"",
                self.named_type(),
                other.named_type()
            ))
        } else {
            None
        };

        if let Some(reason) = reason {
            return Err(AnalyzerError::FieldMergeConflict {
                response_name: other.selection.response_name().to_string(),
                path: other.selection.path.clone(),
                first: self.selection.selection.position,
                second: other.selection.selection.position,
                reason,
            });
        }

        let FieldOccurrences {
            selection,
            alternatives,
        } = other;

        for occurrence in std::iter::once(selection).chain(alternatives) {
            if !self
                .iter()
                .any(|existing| existing.selection == occurrence.selection)
            {
                self.alternatives.push(occurrence);
            }
        }

        Ok(())
    }
}

/// Fields of one concrete type, merged over every occurrence of a field.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantFields {
    pub type_condition: String,
    pub fields: Vec<FieldOccurrences>,
}

impl From<SelectionInfo> for VariantFields {
    fn from(variant: SelectionInfo) -> Self {
        VariantFields {
            type_condition: variant.type_condition,
            fields: variant.fields.into_iter().map(FieldOccurrences::new).collect(),
        }
    }
}

/// A composite field whose model still has to be built.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingField {
    pub field: FieldOccurrences,
    /// Position of the field's value.
    pub path: Path,
}

impl PendingField {
    fn new(field: FieldOccurrences) -> Self {
        let path = field.selection.field_path();
        PendingField { field, path }
    }

    fn named_type(&self) -> String {
        self.field.named_type()
    }

    fn position(&self) -> Pos {
        self.field.selection.selection.position
    }
}

/// FIFO queue of pending fields.
#[derive(Debug, Default)]
pub struct Worklist {
    tasks: VecDeque<PendingField>,
}

impl Worklist {
    pub fn extend(&mut self, tasks: impl IntoIterator<Item = PendingField>) {
        self.tasks.extend(tasks);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Removes every task queued so far, in order.
    pub fn take_pass(&mut self) -> Vec<PendingField> {
        self.tasks.drain(..).collect()
    }
}

/// What a traversal has built so far.
#[derive(Debug, Default)]
pub struct TraversalState {
    pub registry: TypeRegistry,
    pub paths: IndexMap<Path, String>,
}

impl TraversalState {
    pub fn new(registry: TypeRegistry) -> Self {
        TraversalState {
            registry,
            paths: IndexMap::new(),
        }
    }

    pub fn into_parts(self) -> (TypeRegistry, IndexMap<Path, String>) {
        (self.registry, self.paths)
    }
}

/// An operation whose root model exists and whose nested fields are queued.
#[derive(Debug)]
pub struct OperationTraversal {
    pub name: String,
    pub kind: OperationKind,
    pub root_type: String,
    pub state: TraversalState,
    pub worklist: Worklist,
}

/// Children discovered by the variants of one abstract selection, one per Path.
#[derive(Default)]
struct ChildTasks {
    tasks: IndexMap<Path, PendingField>,
}

impl ChildTasks {
    fn add(&mut self, task: PendingField) -> Result<()> {
        match self.tasks.entry(task.path.clone()) {
            Entry::Vacant(entry) => {
                entry.insert(task);
                Ok(())
            }
            Entry::Occupied(mut entry) => entry.get_mut().field.absorb(task.field),
        }
    }

    /// Queues `task` only when no variant reached its Path.
    fn add_missing(&mut self, task: PendingField) {
        if !self.tasks.contains_key(&task.path) {
            self.tasks.insert(task.path.clone(), task);
        }
    }

    fn into_tasks(self) -> Vec<PendingField> {
        self.tasks.into_values().collect()
    }
}

/// Groups `fields` into `merged` by response name.
fn merge_occurrences(
    merged: &mut IndexMap<String, FieldOccurrences>,
    fields: impl IntoIterator<Item = FieldSelection>,
) -> Result<()> {
    for field in fields {
        let field = FieldOccurrences::new(field);

        match merged.entry(field.selection.response_name().to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(field);
            }
            Entry::Occupied(mut entry) => entry.get_mut().absorb(field)?,
        }
    }

    Ok(())
}

/// Builds the result models of operations, one composite field position at a time.
pub struct OutputModelBuilder<'a> {
    collector: &'a FieldCollector<'a>,
    reserved: IndexSet<String>,
    skip_names: IndexSet<String>,
}

impl<'a> OutputModelBuilder<'a> {
    pub fn new(
        collector: &'a FieldCollector<'a>,
        reserved: &IndexSet<String>,
        skip_names: &IndexSet<String>,
    ) -> Self {
        OutputModelBuilder {
            collector,
            reserved: reserved.clone(),
            skip_names: skip_names.clone(),
        }
    }

    /// Creates the root model of `operation` and queues its composite fields.
    pub fn start(
        &self,
        registry: TypeRegistry,
        operation: &query::OperationDefinition,
    ) -> Result<OperationTraversal> {
        let name = operation
            .name()
            .ok_or_else(|| AnalyzerError::AnonymousOperation {
                position: operation.position(),
            })?
            .to_string();
        let kind = operation.kind();

        let root = self
            .collector
            .schema()
            .root_type(kind)
            .ok_or_else(|| AnalyzerError::UnsupportedRootOperation {
                operation: name.clone(),
                kind,
            })?;

        let root_path = Path::root(name.as_str());
        let possible = self
            .collector
            .collect(root, operation.selection_set(), &root_path)?;

        let mut state = TraversalState::new(registry);
        let root_type = state.registry.get_or_create_name(
            NodeKey::Operation(name.clone()),
            &to_class_name(&name),
            &self.reserved,
        );

        let fields =
            first_variant_fields(possible.variants.into_iter().map(VariantFields::from));
        let (mut state, fields, children) = self.output_fields(state, &fields)?;

        state.registry.register(
            ObjectTypeModel {
                name: root_type.clone(),
                description: root.description().cloned(),
                schema_type: root.name().to_string(),
                fields,
            }
            .into(),
        )?;
        state.paths.insert(root_path, root_type.clone());

        let mut worklist = Worklist::default();
        worklist.extend(children);

        Ok(OperationTraversal {
            name,
            kind,
            root_type,
            state,
            worklist,
        })
    }

    /// Builds the model at one pending position and returns the positions below it.
    pub fn step(
        &self,
        state: TraversalState,
        task: &PendingField,
    ) -> Result<(TraversalState, Vec<PendingField>)> {
        let named_type = task.named_type();
        let type_def = self
            .collector
            .schema()
            .type_by_name(&named_type)
            .ok_or_else(|| AnalyzerError::UnknownType {
                name: named_type.clone(),
                path: task.path.clone(),
                position: task.position(),
            })?;

        trace!(
            path = %task.path,
            type_name = %named_type,
            occurrences = task.field.iter().count(),
            "building model"
        );

        let possible = self.collect_occurrences(type_def, task)?;

        match type_def.kind() {
            TypeKind::Object => self.generate_object(state, type_def, task, possible),
            TypeKind::Interface => self.generate_interface(state, type_def, task, possible),
            TypeKind::Union => self.generate_union(state, type_def, task, possible),
            TypeKind::Enum | TypeKind::Scalar => Ok((state, vec![])),
            TypeKind::InputObject => Err(AnalyzerError::NotAnOutputType {
                name: named_type,
                path: task.path.clone(),
            }),
        }
    }

    /// Processes the worklist pass by pass until it is empty. Returns the pass count.
    pub fn drain(
        &self,
        mut state: TraversalState,
        worklist: &mut Worklist,
    ) -> Result<(TraversalState, usize)> {
        let mut passes = 0;

        while !worklist.is_empty() {
            passes += 1;

            for task in worklist.take_pass() {
                let (next, children) = self.step(state, &task)?;
                state = next;
                worklist.extend(children);
            }
        }

        Ok((state, passes))
    }

    pub fn build_operation(
        &self,
        registry: TypeRegistry,
        operation: &query::OperationDefinition,
    ) -> Result<(TypeRegistry, OperationModel)> {
        let OperationTraversal {
            name,
            kind,
            root_type,
            state,
            mut worklist,
        } = self.start(registry, operation)?;

        let (state, passes) = self.drain(state, &mut worklist)?;
        let (registry, paths) = state.into_parts();

        debug!(operation = %name, %kind, passes, models = paths.len(), "built operation");

        Ok((
            registry,
            OperationModel {
                name,
                kind,
                root_type,
                paths,
            },
        ))
    }

    /// Every operation of every document, in order.
    pub fn build(
        &self,
        mut registry: TypeRegistry,
        documents: &[query::Document],
    ) -> Result<(TypeRegistry, Vec<OperationModel>)> {
        let mut operations = vec![];

        for document in documents {
            for definition in &document.definitions {
                if let query::Definition::Operation(operation) = definition {
                    let (next, model) = self.build_operation(registry, operation)?;
                    registry = next;
                    operations.push(model);
                }
            }
        }

        Ok((registry, operations))
    }

    /// Collects every occurrence of `task` on its own and merges the results
    /// per concrete type and response name.
    fn collect_occurrences(
        &self,
        type_def: &TypeDefinition,
        task: &PendingField,
    ) -> Result<Vec<VariantFields>> {
        let mut variants: IndexMap<String, IndexMap<String, FieldOccurrences>> = IndexMap::new();

        for occurrence in task.field.iter() {
            let possible = self.collector.collect(
                type_def,
                &occurrence.selection.selection_set,
                &task.path,
            )?;

            for variant in possible.variants {
                let merged = variants.entry(variant.type_condition).or_default();
                merge_occurrences(merged, variant.fields)?;
            }
        }

        Ok(variants
            .into_iter()
            .map(|(type_condition, fields)| VariantFields {
                type_condition,
                fields: fields.into_values().collect(),
            })
            .collect())
    }

    /// Fields selected on the abstract type itself, over every occurrence of `task`.
    fn collect_shared(
        &self,
        type_def: &TypeDefinition,
        task: &PendingField,
    ) -> Result<Vec<FieldOccurrences>> {
        let mut merged = IndexMap::new();

        for occurrence in task.field.iter() {
            let fields = self.collector.collect_fields_on(
                type_def,
                &occurrence.selection.selection_set,
                &task.path,
            )?;
            merge_occurrences(&mut merged, fields)?;
        }

        Ok(merged.into_values().collect())
    }

    fn generate_object(
        &self,
        state: TraversalState,
        type_def: &TypeDefinition,
        task: &PendingField,
        possible: Vec<VariantFields>,
    ) -> Result<(TraversalState, Vec<PendingField>)> {
        let mut state = state;
        let name = state.registry.get_or_create_name(
            NodeKey::Selection(task.path.clone()),
            type_def.name(),
            &self.skip_names,
        );

        let fields = first_variant_fields(possible);
        let (mut state, fields, children) = self.output_fields(state, &fields)?;

        state.registry.register(
            ObjectTypeModel {
                name: name.clone(),
                description: type_def.description().cloned(),
                schema_type: type_def.name().to_string(),
                fields,
            }
            .into(),
        )?;
        state.paths.insert(task.path.clone(), name);

        Ok((state, children))
    }

    fn generate_interface(
        &self,
        state: TraversalState,
        type_def: &TypeDefinition,
        task: &PendingField,
        possible: Vec<VariantFields>,
    ) -> Result<(TraversalState, Vec<PendingField>)> {
        let (mut state, abstract_model, variants, children) =
            self.generate_abstract(state, type_def, task, possible)?;

        let model = InterfaceTypeModel {
            name: abstract_model.name,
            description: abstract_model.description,
            schema_type: abstract_model.schema_type,
            fields: abstract_model.fields,
            implementations: variants.iter().map(|v| v.name.clone()).collect(),
        };

        state.paths.insert(task.path.clone(), model.name.clone());
        register_all(&mut state.registry, model.into(), variants)?;

        Ok((state, children))
    }

    fn generate_union(
        &self,
        state: TraversalState,
        type_def: &TypeDefinition,
        task: &PendingField,
        possible: Vec<VariantFields>,
    ) -> Result<(TraversalState, Vec<PendingField>)> {
        let (mut state, abstract_model, variants, children) =
            self.generate_abstract(state, type_def, task, possible)?;

        let model = UnionTypeModel {
            name: abstract_model.name,
            description: abstract_model.description,
            schema_type: abstract_model.schema_type,
            fields: abstract_model.fields,
            implementations: variants.iter().map(|v| v.name.clone()).collect(),
        };

        state.paths.insert(task.path.clone(), model.name.clone());
        register_all(&mut state.registry, model.into(), variants)?;

        Ok((state, children))
    }

    /// One object model per variant, plus the fields selected on the abstract
    /// type itself. Returned as an object model for the caller to rewrap.
    fn generate_abstract(
        &self,
        state: TraversalState,
        type_def: &TypeDefinition,
        task: &PendingField,
        possible: Vec<VariantFields>,
    ) -> Result<(
        TraversalState,
        ObjectTypeModel,
        Vec<ObjectTypeModel>,
        Vec<PendingField>,
    )> {
        let mut state = state;
        let name = state.registry.get_or_create_name(
            NodeKey::Selection(task.path.clone()),
            type_def.name(),
            &self.skip_names,
        );

        let mut children = ChildTasks::default();
        let mut variants = Vec::with_capacity(possible.len());

        for variant in possible {
            let variant_name = state.registry.get_or_create_name(
                NodeKey::Variant(task.path.clone(), variant.type_condition.clone()),
                &variant.type_condition,
                &self.skip_names,
            );

            let (next, fields, variant_children) = self.output_fields(state, &variant.fields)?;
            state = next;

            for child in variant_children {
                children.add(child)?;
            }

            variants.push(ObjectTypeModel {
                name: variant_name,
                description: self
                    .collector
                    .schema()
                    .type_by_name(&variant.type_condition)
                    .and_then(|t| t.description().cloned()),
                schema_type: variant.type_condition,
                fields,
            });
        }

        let shared = self.collect_shared(type_def, task)?;
        let (state, fields, shared_children) = self.output_fields(state, &shared)?;
        for child in shared_children {
            children.add_missing(child);
        }

        let abstract_model = ObjectTypeModel {
            name,
            description: type_def.description().cloned(),
            schema_type: type_def.name().to_string(),
            fields,
        };

        Ok((state, abstract_model, variants, children.into_tasks()))
    }

    /// Field models of one selection, naming the models of composite fields
    /// and returning them as pending work.
    fn output_fields(
        &self,
        state: TraversalState,
        fields: &[FieldOccurrences],
    ) -> Result<(TraversalState, Vec<OutputFieldModel>, Vec<PendingField>)> {
        let mut state = state;
        let mut models = Vec::with_capacity(fields.len());
        let mut children = vec![];

        for occurrences in fields {
            let field = &occurrences.selection;
            let named_type = field.field.field_type.inner_type();
            let path = field.field_path();

            let kind = self.output_kind(&named_type, &path, field.selection.position)?;

            let type_model = match kind {
                TypeKind::Scalar => None,
                TypeKind::Enum => state
                    .registry
                    .name_of(&NodeKey::SchemaType(named_type.clone()))
                    .map(str::to_string),
                TypeKind::Object | TypeKind::Interface | TypeKind::Union => {
                    let name = state.registry.get_or_create_name(
                        NodeKey::Selection(path.clone()),
                        &named_type,
                        &self.skip_names,
                    );
                    children.push(PendingField::new(occurrences.clone()));
                    Some(name)
                }
                TypeKind::InputObject => {
                    return Err(AnalyzerError::NotAnOutputType {
                        name: named_type,
                        path,
                    })
                }
            };

            models.push(OutputFieldModel {
                response_name: field.response_name().to_string(),
                field_name: field.field.name.clone(),
                description: field.field.description.clone(),
                field_type: field.field.field_type.render(),
                path,
                type_model,
            });
        }

        Ok((state, models, children))
    }

    fn output_kind(&self, named_type: &str, path: &Path, position: Pos) -> Result<TypeKind> {
        match self.collector.schema().type_by_name(named_type) {
            Some(type_def) => Ok(type_def.kind()),
            None if BUILTIN_SCALARS.contains(&named_type) => Ok(TypeKind::Scalar),
            None => {
                trace!(%path, named_type, "unresolved field type");
                Err(AnalyzerError::UnknownType {
                    name: named_type.to_string(),
                    path: path.clone(),
                    position,
                })
            }
        }
    }
}

fn first_variant_fields(
    variants: impl IntoIterator<Item = VariantFields>,
) -> Vec<FieldOccurrences> {
    variants
        .into_iter()
        .next()
        .map(|variant| variant.fields)
        .unwrap_or_default()
}

/// Abstract model first, then its implementations.
fn register_all(
    registry: &mut TypeRegistry,
    abstract_model: TypeModel,
    variants: Vec<ObjectTypeModel>,
) -> Result<()> {
    registry.register(abstract_model)?;

    for variant in variants {
        registry.register(variant.into())?;
    }

    Ok(())
}

#[test]
fn single_nested_field_takes_one_pass() {
    use crate::analyzer::test_utils::*;
    use crate::ast::index_fragments;

    let schema = parse_schema(TEST_SCHEMA);
    let documents = vec![parse_document("query GetDog { dog { name barkVolume } }")];
    let collector = FieldCollector::new(&schema, index_fragments(&documents).unwrap());
    let skip_names = operation_skip_names(&documents, &IndexSet::new());
    let builder = OutputModelBuilder::new(&collector, &IndexSet::new(), &skip_names);

    let query::Definition::Operation(operation) = &documents[0].definitions[0] else {
        panic!("expected an operation");
    };

    let mut traversal = builder.start(TypeRegistry::new(), operation).unwrap();
    assert_eq!(traversal.root_type, "GetDog");
    assert_eq!(traversal.worklist.len(), 1);

    let (state, passes) = builder
        .drain(traversal.state, &mut traversal.worklist)
        .unwrap();

    assert_eq!(passes, 1);
    assert!(traversal.worklist.is_empty());
    assert_eq!(state.registry.len(), 2);
    assert_eq!(
        state
            .paths
            .iter()
            .map(|(path, name)| (path.to_string(), name.as_str()))
            .collect::<Vec<_>>(),
        vec![
            ("GetDog".to_string(), "GetDog"),
            ("GetDog.dog".to_string(), "Dog"),
        ]
    );

    let dog = state.registry.get("Dog").unwrap();
    assert_eq!(dog.description(), Some("A good boy."));
    assert_eq!(
        dog.fields()
            .iter()
            .map(|f| (f.response_name.as_str(), f.field_type.as_str(), f.type_model.is_none()))
            .collect::<Vec<_>>(),
        vec![("name", "String", true), ("barkVolume", "Int", true)]
    );
}

#[test]
fn step_returns_child_positions() {
    use crate::analyzer::test_utils::*;
    use crate::ast::index_fragments;

    let schema = parse_schema(TEST_SCHEMA);
    let documents = vec![parse_document(
        "query GetDog { dog { owner { name } mother { name } } }",
    )];
    let collector = FieldCollector::new(&schema, index_fragments(&documents).unwrap());
    let builder = OutputModelBuilder::new(&collector, &IndexSet::new(), &IndexSet::new());

    let query::Definition::Operation(operation) = &documents[0].definitions[0] else {
        panic!("expected an operation");
    };

    let mut traversal = builder.start(TypeRegistry::new(), operation).unwrap();
    let tasks = traversal.worklist.take_pass();
    let (state, children) = builder.step(traversal.state, &tasks[0]).unwrap();

    assert_eq!(
        children
            .iter()
            .map(|c| c.path.to_string())
            .collect::<Vec<_>>(),
        vec!["GetDog.dog.owner", "GetDog.dog.mother"]
    );
    // Names of the children exist before their models do.
    assert_eq!(
        state
            .registry
            .name_of(&NodeKey::Selection(children[1].path.clone())),
        Some("Dog1")
    );
    assert!(state.registry.get("Dog1").is_none());
}

#[test]
fn recursive_types_get_distinct_names() {
    use crate::analyzer::test_utils::*;

    let (registry, operations) = build_output_models(
        "query GetDog { dog { mother { mother { name } } father { name } } }",
        TEST_SCHEMA,
    )
    .unwrap();

    let paths = &operations[0].paths;
    let root = Path::root("GetDog");
    assert_eq!(operations[0].type_at(&root.append("dog")), Some("Dog"));
    assert_eq!(
        operations[0].type_at(&root.append("dog").append("mother")),
        Some("Dog1")
    );
    assert_eq!(
        operations[0].type_at(&root.append("dog").append("father")),
        Some("Dog2")
    );
    assert_eq!(
        operations[0].type_at(&root.append("dog").append("mother").append("mother")),
        Some("Dog3")
    );
    assert_eq!(paths.len(), 5);
    assert_eq!(registry.len(), 5);
}

#[test]
fn union_models_link_their_variants() {
    use crate::analyzer::test_utils::*;

    let (registry, operations) = build_output_models(
        "query GetCatOrDog { catOrDog { __typename ... on Dog { barkVolume } } }",
        TEST_SCHEMA,
    )
    .unwrap();

    let union = registry.get("CatOrDog").and_then(|m| m.as_union()).unwrap();
    assert_eq!(union.implementations, vec!["Cat", "Dog"]);
    assert_eq!(union.fields.len(), 1);
    assert_eq!(union.fields[0].field_type, "String!");

    let dog = registry.get("Dog").and_then(|m| m.as_object()).unwrap();
    assert_eq!(dog.fields.len(), 2);
    assert_eq!(
        registry.get("Cat").map(|m| m.fields().len()),
        Some(1)
    );

    let root = registry.get("GetCatOrDog").unwrap();
    assert_eq!(root.fields()[0].type_model.as_deref(), Some("CatOrDog"));
    assert_eq!(
        operations[0].type_at(&Path::root("GetCatOrDog").append("catOrDog")),
        Some("CatOrDog")
    );
    assert_eq!(
        registry
            .finish()
            .keys()
            .collect::<Vec<_>>(),
        vec!["GetCatOrDog", "CatOrDog", "Cat", "Dog"]
    );
}

#[test]
fn variant_children_at_one_path_merge() {
    use crate::analyzer::test_utils::*;

    let (registry, operations) = build_output_models(
        "query GetPet {
          pet {
            ... on Dog { owner { name } }
            ... on Cat { owner { pets { name } } }
          }
        }",
        TEST_SCHEMA,
    )
    .unwrap();

    let human = registry.get("Human").unwrap();
    assert_eq!(
        human
            .fields()
            .iter()
            .map(|f| f.response_name.as_str())
            .collect::<Vec<_>>(),
        vec!["name", "pets"]
    );

    let pets = Path::from_iter(["GetPet", "pet", "owner", "pets"]);
    assert_eq!(operations[0].type_at(&pets), Some("Pet1"));
    assert_eq!(
        registry.get("Pet1").map(|m| m.implementations().to_vec()),
        Some(vec!["Dog1".to_string(), "Cat1".to_string()])
    );
}

#[test]
fn variant_children_of_different_types_conflict() {
    use crate::analyzer::test_utils::*;

    let error = build_output_models(
        "query GetPet {
          pet {
            ... on Dog { friend { name } }
            ... on Cat { friend { name } }
          }
        }",
        TEST_SCHEMA,
    )
    .unwrap_err();

    match error {
        AnalyzerError::FieldMergeConflict {
            response_name,
            path,
            first,
            second,
            ..
        } => {
            assert_eq!(response_name, "friend");
            assert_eq!(path.to_string(), "GetPet.pet");
            assert_eq!((first.line, second.line), (3, 4));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn operations_need_a_name_and_a_root_type() {
    use crate::analyzer::test_utils::*;

    assert!(matches!(
        build_output_models("{ dog { name } }", TEST_SCHEMA),
        Err(AnalyzerError::AnonymousOperation { .. })
    ));
    assert_eq!(
        build_output_models("subscription OnPet { pet { name } }", TEST_SCHEMA).err(),
        Some(AnalyzerError::UnsupportedRootOperation {
            operation: "OnPet".to_string(),
            kind: OperationKind::Subscription,
        })
    );
}

#[test]
fn nested_models_skip_operation_names() {
    use crate::analyzer::test_utils::*;

    let (registry, operations) = build_output_models(
        "query Dog { dog { name } } mutation Adopt { adopt { name } }",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(operations[0].root_type, "Dog");
    assert_eq!(operations[0].type_at(&Path::root("Dog").append("dog")), Some("Dog1"));
    assert_eq!(operations[1].kind, OperationKind::Mutation);
    assert_eq!(
        registry.get("Adopt").map(|m| m.schema_type().to_string()),
        Some("Mutation".to_string())
    );
}

#[test]
fn exclusive_parents_may_use_different_arguments() {
    use crate::analyzer::test_utils::*;

    let (registry, operations) = build_output_models(
        "query GetPet {
          pet {
            ... on Dog { owner { pets { name(surname: true) } } }
            ... on Cat { owner { pets { name(surname: false) } } }
          }
        }",
        TEST_SCHEMA,
    )
    .unwrap();

    let pets = Path::from_iter(["GetPet", "pet", "owner", "pets"]);
    assert_eq!(operations[0].type_at(&pets), Some("Pet1"));
    assert_eq!(
        registry.get("Dog1").map(|m| m
            .fields()
            .iter()
            .map(|f| f.response_name.as_str())
            .collect::<Vec<_>>()),
        Some(vec!["name"])
    );
    assert_eq!(
        registry
            .get("Human")
            .map(|m| m.fields().len()),
        Some(1)
    );
}

#[test]
fn identical_variant_selections_collapse() {
    use crate::analyzer::test_utils::*;
    use crate::ast::index_fragments;

    let schema = parse_schema(TEST_SCHEMA);
    let documents = vec![parse_document(
        "query GetPet { pet { owner { name } } }",
    )];
    let collector = FieldCollector::new(&schema, index_fragments(&documents).unwrap());
    let builder = OutputModelBuilder::new(&collector, &IndexSet::new(), &IndexSet::new());

    let query::Definition::Operation(operation) = &documents[0].definitions[0] else {
        panic!("expected an operation");
    };

    let mut traversal = builder.start(TypeRegistry::new(), operation).unwrap();
    let tasks = traversal.worklist.take_pass();
    let (_, children) = builder.step(traversal.state, &tasks[0]).unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].path.to_string(), "GetPet.pet.owner");
    // Dog and Cat both reach the same `owner` node.
    assert_eq!(children[0].field.iter().count(), 1);
}

#[test]
fn unknown_field_types_report_their_position() {
    use crate::analyzer::test_utils::*;

    let error = build_output_models(
        "query GetGhost {
          ghost
        }",
        "type Query { ghost: Ghost }",
    )
    .unwrap_err();

    match error {
        AnalyzerError::UnknownType {
            name,
            path,
            position,
        } => {
            assert_eq!(name, "Ghost");
            assert_eq!(path.to_string(), "GetGhost.ghost");
            assert_eq!(position.line, 2);
        }
        other => panic!("unexpected error: {}", other),
    }
}
