use serde::Serialize;

use crate::model::Path;

/// Every type the emitter generates code for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TypeModel {
    Enum(EnumTypeModel),
    ComplexInput(ComplexInputTypeModel),
    Object(ObjectTypeModel),
    Interface(InterfaceTypeModel),
    Union(UnionTypeModel),
}

impl TypeModel {
    pub fn name(&self) -> &str {
        match self {
            TypeModel::Enum(m) => &m.name,
            TypeModel::ComplexInput(m) => &m.name,
            TypeModel::Object(m) => &m.name,
            TypeModel::Interface(m) => &m.name,
            TypeModel::Union(m) => &m.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeModel::Enum(m) => m.description.as_deref(),
            TypeModel::ComplexInput(m) => m.description.as_deref(),
            TypeModel::Object(m) => m.description.as_deref(),
            TypeModel::Interface(m) => m.description.as_deref(),
            TypeModel::Union(m) => m.description.as_deref(),
        }
    }

    /// Name of the schema type this model was built from.
    pub fn schema_type(&self) -> &str {
        match self {
            TypeModel::Enum(m) => &m.schema_type,
            TypeModel::ComplexInput(m) => &m.schema_type,
            TypeModel::Object(m) => &m.schema_type,
            TypeModel::Interface(m) => &m.schema_type,
            TypeModel::Union(m) => &m.schema_type,
        }
    }

    /// Selected fields for output models, empty for enums and inputs.
    pub fn fields(&self) -> &[OutputFieldModel] {
        match self {
            TypeModel::Object(m) => &m.fields,
            TypeModel::Interface(m) => &m.fields,
            TypeModel::Union(m) => &m.fields,
            TypeModel::Enum(_) | TypeModel::ComplexInput(_) => &[],
        }
    }

    /// Concrete object models behind an interface or union model.
    pub fn implementations(&self) -> &[String] {
        match self {
            TypeModel::Interface(m) => &m.implementations,
            TypeModel::Union(m) => &m.implementations,
            _ => &[],
        }
    }

    pub fn as_enum(&self) -> Option<&EnumTypeModel> {
        match self {
            TypeModel::Enum(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_complex_input(&self) -> Option<&ComplexInputTypeModel> {
        match self {
            TypeModel::ComplexInput(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectTypeModel> {
        match self {
            TypeModel::Object(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_interface(&self) -> Option<&InterfaceTypeModel> {
        match self {
            TypeModel::Interface(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionTypeModel> {
        match self {
            TypeModel::Union(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumTypeModel {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: String,
    /// Wire representation override from `@serializationType`.
    pub serialization_type: Option<String>,
    pub values: Vec<EnumValueModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumValueModel {
    pub name: String,
    /// The value as declared in the schema.
    pub value: String,
    pub description: Option<String>,
    /// Literal override from `@enumValue`.
    pub explicit_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexInputTypeModel {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: String,
    pub fields: Vec<InputFieldModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputFieldModel {
    pub name: String,
    pub field_name: String,
    pub description: Option<String>,
    pub field_type: String,
}

/// A field of a result type as selected by a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFieldModel {
    pub response_name: String,
    pub field_name: String,
    pub description: Option<String>,
    /// Declared GraphQL type, e.g. `[Pet!]!`.
    pub field_type: String,
    pub path: Path,
    /// Model describing the value, for composite and enum fields.
    pub type_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectTypeModel {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: String,
    pub fields: Vec<OutputFieldModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceTypeModel {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: String,
    pub fields: Vec<OutputFieldModel>,
    pub implementations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionTypeModel {
    pub name: String,
    pub description: Option<String>,
    pub schema_type: String,
    pub fields: Vec<OutputFieldModel>,
    pub implementations: Vec<String>,
}

impl From<EnumTypeModel> for TypeModel {
    fn from(model: EnumTypeModel) -> Self {
        TypeModel::Enum(model)
    }
}

impl From<ComplexInputTypeModel> for TypeModel {
    fn from(model: ComplexInputTypeModel) -> Self {
        TypeModel::ComplexInput(model)
    }
}

impl From<ObjectTypeModel> for TypeModel {
    fn from(model: ObjectTypeModel) -> Self {
        TypeModel::Object(model)
    }
}

impl From<InterfaceTypeModel> for TypeModel {
    fn from(model: InterfaceTypeModel) -> Self {
        TypeModel::Interface(model)
    }
}

impl From<UnionTypeModel> for TypeModel {
    fn from(model: UnionTypeModel) -> Self {
        TypeModel::Union(model)
    }
}
