use indexmap::IndexSet;

use super::{KnownDirective, NodeKey, Result, TypeRegistry, TypeUsage};
use crate::ast::{to_class_name, TypeExtension};
use crate::model::{ComplexInputTypeModel, EnumTypeModel, EnumValueModel, InputFieldModel};
use crate::static_graphql::schema::{self, EnumType, InputObjectType};

/// Model name of a schema type, honoring `@rename`.
fn type_model_name(
    schema_name: &str,
    directives: &[schema::Directive],
    location: &str,
    registry: &mut TypeRegistry,
    skip_names: &IndexSet<String>,
) -> Result<String> {
    let proposed = KnownDirective::Rename
        .read(directives, location)?
        .unwrap_or_else(|| schema_name.to_string());

    Ok(registry.get_or_create_name(
        NodeKey::SchemaType(schema_name.to_string()),
        &to_class_name(&proposed),
        skip_names,
    ))
}

pub fn build_enum_model(
    enum_type: &EnumType,
    registry: &mut TypeRegistry,
    skip_names: &IndexSet<String>,
) -> Result<EnumTypeModel> {
    let location = format!("enum {}", enum_type.name);
    let name = type_model_name(
        &enum_type.name,
        &enum_type.directives,
        &location,
        registry,
        skip_names,
    )?;

    let values = enum_type
        .values
        .iter()
        .map(|value| -> Result<EnumValueModel> {
            let location = format!("enum value {}.{}", enum_type.name, value.name);
            let renamed = KnownDirective::Rename.read(&value.directives, &location)?;

            Ok(EnumValueModel {
                name: to_class_name(renamed.as_deref().unwrap_or(&value.name)),
                value: value.name.clone(),
                description: value.description.clone(),
                explicit_value: KnownDirective::EnumValue.read(&value.directives, &location)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EnumTypeModel {
        name,
        description: enum_type.description.clone(),
        schema_type: enum_type.name.clone(),
        serialization_type: KnownDirective::SerializationType
            .read(&enum_type.directives, &location)?,
        values,
    })
}

pub fn build_input_model(
    input_object: &InputObjectType,
    registry: &mut TypeRegistry,
    skip_names: &IndexSet<String>,
) -> Result<ComplexInputTypeModel> {
    let name = type_model_name(
        &input_object.name,
        &input_object.directives,
        &format!("input {}", input_object.name),
        registry,
        skip_names,
    )?;

    let fields = input_object
        .fields
        .iter()
        .map(|field| -> Result<InputFieldModel> {
            let location = format!("input field {}.{}", input_object.name, field.name);
            let renamed = KnownDirective::Rename.read(&field.directives, &location)?;

            Ok(InputFieldModel {
                name: to_class_name(renamed.as_deref().unwrap_or(&field.name)),
                field_name: field.name.clone(),
                description: field.description.clone(),
                field_type: field.value_type.render(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ComplexInputTypeModel {
        name,
        description: input_object.description.clone(),
        schema_type: input_object.name.clone(),
        fields,
    })
}

/// Builds and registers a model for every enum in `usage`.
pub fn register_enum_models(
    schema: &schema::Document,
    usage: &TypeUsage,
    registry: &mut TypeRegistry,
    skip_names: &IndexSet<String>,
) -> Result<()> {
    for enum_type in usage.enum_types(schema) {
        let model = build_enum_model(enum_type, registry, skip_names)?;
        registry.register(model.into())?;
    }

    Ok(())
}

/// Builds and registers a model for every input object in `usage`.
pub fn register_input_models(
    schema: &schema::Document,
    usage: &TypeUsage,
    registry: &mut TypeRegistry,
    skip_names: &IndexSet<String>,
) -> Result<()> {
    for input_object in usage.input_object_types(schema) {
        let model = build_input_model(input_object, registry, skip_names)?;
        registry.register(model.into())?;
    }

    Ok(())
}

#[test]
fn enum_directives_shape_the_model() {
    use crate::analyzer::test_utils::*;
    use crate::ast::SchemaDocumentExtension;
    use crate::static_graphql::schema::TypeDefinition;

    let schema = parse_schema(TEST_SCHEMA);
    let mut registry = TypeRegistry::new();

    let Some(TypeDefinition::Enum(color)) = schema.type_by_name("Color") else {
        panic!("Color is not an enum");
    };
    let model = build_enum_model(color, &mut registry, &IndexSet::new()).unwrap();

    assert_eq!(model.name, "Colour");
    assert_eq!(model.schema_type, "Color");
    assert_eq!(
        model
            .values
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_str()))
            .collect::<Vec<_>>(),
        vec![("Crimson", "RED"), ("OrangeRed", "ORANGE_RED")]
    );
    assert_eq!(model.values[0].description.as_deref(), Some("Not quite red."));

    let Some(TypeDefinition::Enum(fur_color)) = schema.type_by_name("FurColor") else {
        panic!("FurColor is not an enum");
    };
    let model = build_enum_model(fur_color, &mut registry, &IndexSet::new()).unwrap();

    assert_eq!(model.serialization_type.as_deref(), Some("Int"));
    assert_eq!(model.values[0].explicit_value.as_deref(), Some("1"));
    assert_eq!(model.values[1].explicit_value, None);
    assert_eq!(model.values[2].name, "Bald");
}

#[test]
fn input_fields_keep_schema_names() {
    use crate::analyzer::test_utils::*;
    use crate::ast::SchemaDocumentExtension;
    use crate::static_graphql::schema::TypeDefinition;

    let schema = parse_schema(TEST_SCHEMA);
    let mut registry = TypeRegistry::new();

    let Some(TypeDefinition::InputObject(owner_filter)) = schema.type_by_name("OwnerFilter")
    else {
        panic!("OwnerFilter is not an input object");
    };
    let model = build_input_model(owner_filter, &mut registry, &IndexSet::new()).unwrap();

    assert_eq!(model.name, "OwnerFilter");
    assert_eq!(
        model
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.field_name.as_str(), f.field_type.as_str()))
            .collect::<Vec<_>>(),
        vec![("Name", "name", "String"), ("MinimumPets", "min_pets", "Int")]
    );
}

#[test]
fn usage_models_avoid_skip_names() {
    use crate::analyzer::analyze_type_usage;
    use crate::analyzer::test_utils::*;

    let schema = parse_schema(TEST_SCHEMA);
    let usage = analyze_type_usage(
        &schema,
        &[parse_document(
            "query FindPets($filter: PetFilter) { pets(filter: $filter) { name } }",
        )],
    );
    let skip_names: IndexSet<String> = ["PetFilter".to_string()].into();
    let mut registry = TypeRegistry::new();

    register_enum_models(&schema, &usage, &mut registry, &skip_names).unwrap();
    register_input_models(&schema, &usage, &mut registry, &skip_names).unwrap();

    assert_eq!(
        registry.finish().keys().collect::<Vec<_>>(),
        vec!["FurColor", "PetFilter1", "OwnerFilter"]
    );
}
