use indexmap::IndexSet;

use crate::ast::{
    visit_document, OperationVisitor, OperationVisitorContext, SchemaDocumentExtension,
    TypeDefinitionExtension, TypeExtension, TypeKind,
};
use crate::static_graphql::{
    query,
    schema::{self, EnumType, InputObjectType, TypeDefinition},
};

/// Enum and input object types the analyzed documents depend on, by schema name,
/// in order of discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeUsage {
    pub enum_types: IndexSet<String>,
    pub input_object_types: IndexSet<String>,
}

impl TypeUsage {
    fn record(&mut self, type_def: &TypeDefinition) {
        match type_def.kind() {
            TypeKind::Enum => {
                self.enum_types.insert(type_def.name().to_string());
            }
            TypeKind::InputObject => {
                self.input_object_types.insert(type_def.name().to_string());
            }
            TypeKind::Object | TypeKind::Interface | TypeKind::Union | TypeKind::Scalar => {}
        }
    }

    /// Follows the fields of every recorded input object, including the ones
    /// discovered along the way.
    fn record_nested(&mut self, schema: &schema::Document) {
        let mut index = 0;

        while let Some(name) = self.input_object_types.get_index(index).cloned() {
            if let Some(TypeDefinition::InputObject(input_object)) = schema.type_by_name(&name) {
                for field in &input_object.fields {
                    if let Some(field_type) = schema.type_by_name(&field.value_type.inner_type()) {
                        self.record(field_type);
                    }
                }
            }

            index += 1;
        }
    }

    /// Only types of `schema` are ever recorded, so every name resolves.
    pub fn enum_types<'a>(&self, schema: &'a schema::Document) -> Vec<&'a EnumType> {
        self.enum_types
            .iter()
            .filter_map(|name| match schema.type_by_name(name) {
                Some(TypeDefinition::Enum(enum_type)) => Some(enum_type),
                _ => None,
            })
            .collect()
    }

    pub fn input_object_types<'a>(&self, schema: &'a schema::Document) -> Vec<&'a InputObjectType> {
        self.input_object_types
            .iter()
            .filter_map(|name| match schema.type_by_name(name) {
                Some(TypeDefinition::InputObject(input_object)) => Some(input_object),
                _ => None,
            })
            .collect()
    }
}

struct TypeUsageVisitor;

impl<'a> OperationVisitor<'a, TypeUsage> for TypeUsageVisitor {
    fn enter_variable_definition(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        usage: &mut TypeUsage,
        _: &'a query::VariableDefinition,
    ) {
        if let Some(input_type) = context.current_input_type() {
            usage.record(input_type);
        }
    }

    fn enter_argument(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        usage: &mut TypeUsage,
        _: &'a (String, query::Value),
    ) {
        if let Some(input_type) = context.current_input_type() {
            usage.record(input_type);
        }
    }

    fn enter_object_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        usage: &mut TypeUsage,
        _: (&'a String, &'a query::Value),
    ) {
        if let Some(input_type) = context.current_input_type() {
            usage.record(input_type);
        }
    }

    fn enter_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        usage: &mut TypeUsage,
        _: &'a query::Field,
    ) {
        // Results carry enum values too.
        if let Some(output_type @ TypeDefinition::Enum(_)) = context.current_type() {
            usage.record(output_type);
        }
    }
}

pub fn analyze_type_usage(schema: &schema::Document, documents: &[query::Document]) -> TypeUsage {
    let mut usage = TypeUsage::default();

    for document in documents {
        let mut context = OperationVisitorContext::new(schema);
        visit_document(&mut TypeUsageVisitor, document, &mut context, &mut usage);
    }

    usage.record_nested(schema);

    tracing::debug!(
        enums = usage.enum_types.len(),
        input_objects = usage.input_object_types.len(),
        "collected type usage"
    );

    usage
}

pub fn analyze_enum_types<'a>(
    schema: &'a schema::Document,
    documents: &[query::Document],
) -> Vec<&'a EnumType> {
    analyze_type_usage(schema, documents).enum_types(schema)
}

pub fn analyze_input_object_types<'a>(
    schema: &'a schema::Document,
    documents: &[query::Document],
) -> Vec<&'a InputObjectType> {
    analyze_type_usage(schema, documents).input_object_types(schema)
}

#[cfg(test)]
fn usage_of(operations: &str) -> TypeUsage {
    use crate::analyzer::test_utils::*;

    let schema = parse_schema(TEST_SCHEMA);
    analyze_type_usage(&schema, &[parse_document(operations)])
}

#[test]
fn records_variables_arguments_and_selected_enums() {
    let usage = usage_of(
        "query FindPets($filter: PetFilter) { pets(filter: $filter) { name } }
        query Paint { paint(color: RED) }
        query GetCat { cat { furColor } }",
    );

    assert_eq!(
        usage.input_object_types.iter().collect::<Vec<_>>(),
        vec!["PetFilter", "OwnerFilter"]
    );
    assert_eq!(
        usage.enum_types.iter().collect::<Vec<_>>(),
        vec!["Color", "FurColor"]
    );
}

#[test]
fn follows_input_literals_and_nested_inputs() {
    let usage = usage_of(r#"query FindPets { pets(filter: { owner: { name: "Ann" } }) { name } }"#);

    assert_eq!(
        usage.input_object_types.iter().collect::<Vec<_>>(),
        vec!["PetFilter", "OwnerFilter"]
    );
    assert_eq!(usage.enum_types.iter().collect::<Vec<_>>(), vec!["FurColor"]);
}

#[test]
fn fragments_and_list_variables_count() {
    let usage = usage_of(
        "query GetDog($command: [DogCommand!]) { dog { ...Commands } }
        fragment Commands on Dog { doesKnowCommand(dogCommand: SIT) }",
    );

    assert_eq!(
        usage.enum_types.iter().collect::<Vec<_>>(),
        vec!["DogCommand"]
    );
    assert!(usage.input_object_types.is_empty());
}

#[test]
fn usage_is_stable_across_runs() {
    use crate::analyzer::test_utils::*;

    let schema = parse_schema(TEST_SCHEMA);
    let documents = vec![parse_document(
        "query GetCat { cat { furColor } } mutation Adopt($filter: PetFilter) { adopt(filter: $filter) { name } }",
    )];

    let first = analyze_type_usage(&schema, &documents);
    let second = analyze_type_usage(&schema, &documents);

    assert_eq!(first, second);
    assert_eq!(
        analyze_enum_types(&schema, &documents)
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>(),
        vec!["FurColor"]
    );
    assert_eq!(
        analyze_input_object_types(&schema, &documents)
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>(),
        vec!["PetFilter", "OwnerFilter"]
    );
}
