use graphql_parser::Pos;
use lazy_static::lazy_static;

use crate::model::OperationKind;
use crate::static_graphql::query::{
    self, Directive, OperationDefinition, SelectionSet, Type, Value, VariableDefinition,
};
use crate::static_graphql::schema::{
    self, InputValue, InterfaceType, ObjectType, SchemaDefinition, TypeDefinition, UnionType,
};

pub const TYPENAME_FIELD_NAME: &str = "__typename";

/// Scalars every schema has, whether it declares them or not.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

lazy_static! {
    static ref TYPENAME_FIELD: schema::Field = schema::Field {
        position: Pos { line: 0, column: 0 },
        description: None,
        name: TYPENAME_FIELD_NAME.to_string(),
        arguments: vec![],
        field_type: Type::NonNullType(Box::new(Type::NamedType("String".to_string()))),
        directives: vec![],
    };
}

pub trait FieldByNameExtension {
    fn field_by_name(&self, name: &str) -> Option<&schema::Field>;
    fn input_field_by_name(&self, name: &str) -> Option<&InputValue>;
}

impl FieldByNameExtension for TypeDefinition {
    fn field_by_name(&self, name: &str) -> Option<&schema::Field> {
        if name == TYPENAME_FIELD_NAME && self.is_composite_type() {
            return Some(&*TYPENAME_FIELD);
        }

        match self {
            TypeDefinition::Object(object) => {
                object.fields.iter().find(|field| field.name.eq(name))
            }
            TypeDefinition::Interface(interface) => {
                interface.fields.iter().find(|field| field.name.eq(name))
            }
            _ => None,
        }
    }

    fn input_field_by_name(&self, name: &str) -> Option<&InputValue> {
        match self {
            TypeDefinition::InputObject(input_object) => {
                input_object.fields.iter().find(|field| field.name.eq(name))
            }
            _ => None,
        }
    }
}

pub trait OperationDefinitionExtension {
    fn variable_definitions(&self) -> &[VariableDefinition];
    fn directives(&self) -> &[Directive];
    fn selection_set(&self) -> &SelectionSet;
    fn kind(&self) -> OperationKind;
    fn name(&self) -> Option<&str>;
    fn position(&self) -> Pos;
}

impl OperationDefinitionExtension for OperationDefinition {
    fn variable_definitions(&self) -> &[VariableDefinition] {
        match self {
            OperationDefinition::Query(query) => &query.variable_definitions,
            OperationDefinition::SelectionSet(_) => &[],
            OperationDefinition::Mutation(mutation) => &mutation.variable_definitions,
            OperationDefinition::Subscription(subscription) => &subscription.variable_definitions,
        }
    }

    fn selection_set(&self) -> &SelectionSet {
        match self {
            OperationDefinition::Query(query) => &query.selection_set,
            OperationDefinition::SelectionSet(selection_set) => selection_set,
            OperationDefinition::Mutation(mutation) => &mutation.selection_set,
            OperationDefinition::Subscription(subscription) => &subscription.selection_set,
        }
    }

    fn directives(&self) -> &[Directive] {
        match self {
            OperationDefinition::Query(query) => &query.directives,
            OperationDefinition::SelectionSet(_) => &[],
            OperationDefinition::Mutation(mutation) => &mutation.directives,
            OperationDefinition::Subscription(subscription) => &subscription.directives,
        }
    }

    fn kind(&self) -> OperationKind {
        match self {
            OperationDefinition::Query(_) | OperationDefinition::SelectionSet(_) => {
                OperationKind::Query
            }
            OperationDefinition::Mutation(_) => OperationKind::Mutation,
            OperationDefinition::Subscription(_) => OperationKind::Subscription,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            OperationDefinition::Query(query) => query.name.as_deref(),
            OperationDefinition::SelectionSet(_) => None,
            OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
            OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
        }
    }

    fn position(&self) -> Pos {
        match self {
            OperationDefinition::Query(query) => query.position,
            OperationDefinition::SelectionSet(selection_set) => selection_set.span.0,
            OperationDefinition::Mutation(mutation) => mutation.position,
            OperationDefinition::Subscription(subscription) => subscription.position,
        }
    }
}

pub trait SchemaDocumentExtension {
    fn type_by_name(&self, name: &str) -> Option<&TypeDefinition>;
    fn schema_definition(&self) -> Option<&SchemaDefinition>;
    fn root_type_name(&self, kind: OperationKind) -> Option<&str>;
    fn root_type(&self, kind: OperationKind) -> Option<&TypeDefinition>;
    fn possible_types(&self, type_def: &TypeDefinition) -> Vec<&TypeDefinition>;
    fn do_types_overlap(&self, a: &TypeDefinition, b: &TypeDefinition) -> bool;
}

impl SchemaDocumentExtension for schema::Document {
    fn type_by_name(&self, name: &str) -> Option<&TypeDefinition> {
        for def in &self.definitions {
            if let schema::Definition::TypeDefinition(type_def) = def {
                if type_def.name().eq(name) {
                    return Some(type_def);
                }
            }
        }

        None
    }

    fn schema_definition(&self) -> Option<&SchemaDefinition> {
        self.definitions
            .iter()
            .find_map(|definition| match definition {
                schema::Definition::SchemaDefinition(schema_definition) => Some(schema_definition),
                _ => None,
            })
    }

    fn root_type_name(&self, kind: OperationKind) -> Option<&str> {
        match self.schema_definition() {
            Some(schema_definition) => match kind {
                OperationKind::Query => schema_definition.query.as_deref(),
                OperationKind::Mutation => schema_definition.mutation.as_deref(),
                OperationKind::Subscription => schema_definition.subscription.as_deref(),
            },
            None => {
                let conventional = kind.conventional_root_name();

                self.type_by_name(conventional)
                    .filter(|t| t.is_object_type())
                    .map(|_| conventional)
            }
        }
    }

    fn root_type(&self, kind: OperationKind) -> Option<&TypeDefinition> {
        self.root_type_name(kind)
            .and_then(|name| self.type_by_name(name))
            .filter(|t| t.is_object_type())
    }

    /// Concrete object types a value of `type_def` can be at runtime, in schema order.
    fn possible_types(&self, type_def: &TypeDefinition) -> Vec<&TypeDefinition> {
        match type_def {
            TypeDefinition::Object(o) => self.type_by_name(&o.name).into_iter().collect(),
            TypeDefinition::Interface(i) => self
                .definitions
                .iter()
                .filter_map(|def| match def {
                    schema::Definition::TypeDefinition(t @ TypeDefinition::Object(_))
                        if i.is_implemented_by(t) =>
                    {
                        Some(t)
                    }
                    _ => None,
                })
                .collect(),
            TypeDefinition::Union(u) => u
                .types
                .iter()
                .filter_map(|type_name| match self.type_by_name(type_name) {
                    Some(t @ TypeDefinition::Object(_)) => Some(t),
                    _ => None,
                })
                .collect(),
            TypeDefinition::Scalar(_) | TypeDefinition::Enum(_) | TypeDefinition::InputObject(_) => {
                vec![]
            }
        }
    }

    fn do_types_overlap(&self, a: &TypeDefinition, b: &TypeDefinition) -> bool {
        if a.name() == b.name() {
            return true;
        }

        let b_types = self.possible_types(b);

        self.possible_types(a)
            .iter()
            .any(|t| b_types.iter().any(|other| other.name() == t.name()))
    }
}

pub trait TypeExtension {
    fn inner_type(&self) -> String;
    fn render(&self) -> String;
}

impl TypeExtension for Type {
    fn inner_type(&self) -> String {
        match self {
            Type::NamedType(name) => name.clone(),
            Type::ListType(child) => child.inner_type(),
            Type::NonNullType(child) => child.inner_type(),
        }
    }

    fn render(&self) -> String {
        match self {
            Type::NamedType(name) => name.clone(),
            Type::ListType(child) => format!("[{}]", child.render()),
            Type::NonNullType(child) => format!("{}!", child.render()),
        }
    }
}

pub trait ValueExtension {
    fn compare(&self, other: &Self) -> bool;
    fn as_static_bool(&self) -> Option<bool>;
}

impl ValueExtension for Value {
    fn compare(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a.eq(b),
            (Value::Enum(a), Value::Enum(b)) => a.eq(b),
            (Value::Variable(a), Value::Variable(b)) => a.eq(b),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| a.compare(b))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b.iter())
                        .all(|(a, b)| a.0 == b.0 && a.1.compare(b.1))
            }
            _ => false,
        }
    }

    fn as_static_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Argument lists are equal when they carry the same names with equal values, in any order.
pub fn arguments_equal(a: &[(String, Value)], b: &[(String, Value)]) -> bool {
    a.len() == b.len()
        && a.iter().all(|(name, value)| {
            b.iter()
                .any(|(other_name, other_value)| name == other_name && value.compare(other_value))
        })
}

/// Closed classification of schema types. Dispatch over schema types matches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

pub trait TypeDefinitionExtension {
    fn name(&self) -> &str;
    fn kind(&self) -> TypeKind;
    fn description(&self) -> Option<&String>;
    fn directives(&self) -> &[schema::Directive];
    fn is_object_type(&self) -> bool;
    fn is_composite_type(&self) -> bool;
}

impl TypeDefinitionExtension for TypeDefinition {
    fn name(&self) -> &str {
        match self {
            TypeDefinition::Object(o) => &o.name,
            TypeDefinition::Interface(i) => &i.name,
            TypeDefinition::Union(u) => &u.name,
            TypeDefinition::Scalar(s) => &s.name,
            TypeDefinition::Enum(e) => &e.name,
            TypeDefinition::InputObject(i) => &i.name,
        }
    }

    fn kind(&self) -> TypeKind {
        match self {
            TypeDefinition::Object(_) => TypeKind::Object,
            TypeDefinition::Interface(_) => TypeKind::Interface,
            TypeDefinition::Union(_) => TypeKind::Union,
            TypeDefinition::Scalar(_) => TypeKind::Scalar,
            TypeDefinition::Enum(_) => TypeKind::Enum,
            TypeDefinition::InputObject(_) => TypeKind::InputObject,
        }
    }

    fn description(&self) -> Option<&String> {
        match self {
            TypeDefinition::Object(o) => o.description.as_ref(),
            TypeDefinition::Interface(i) => i.description.as_ref(),
            TypeDefinition::Union(u) => u.description.as_ref(),
            TypeDefinition::Scalar(s) => s.description.as_ref(),
            TypeDefinition::Enum(e) => e.description.as_ref(),
            TypeDefinition::InputObject(i) => i.description.as_ref(),
        }
    }

    fn directives(&self) -> &[schema::Directive] {
        match self {
            TypeDefinition::Object(o) => &o.directives,
            TypeDefinition::Interface(i) => &i.directives,
            TypeDefinition::Union(u) => &u.directives,
            TypeDefinition::Scalar(s) => &s.directives,
            TypeDefinition::Enum(e) => &e.directives,
            TypeDefinition::InputObject(i) => &i.directives,
        }
    }

    fn is_object_type(&self) -> bool {
        matches!(self, TypeDefinition::Object(_))
    }

    fn is_composite_type(&self) -> bool {
        matches!(
            self.kind(),
            TypeKind::Object | TypeKind::Interface | TypeKind::Union
        )
    }
}

pub trait ImplementingInterfaceExtension {
    fn interfaces(&self) -> Vec<String>;
}

impl ImplementingInterfaceExtension for TypeDefinition {
    fn interfaces(&self) -> Vec<String> {
        match self {
            TypeDefinition::Object(o) => o.interfaces(),
            TypeDefinition::Interface(i) => i.interfaces(),
            _ => vec![],
        }
    }
}

impl ImplementingInterfaceExtension for InterfaceType {
    fn interfaces(&self) -> Vec<String> {
        self.implements_interfaces.clone()
    }
}

impl ImplementingInterfaceExtension for ObjectType {
    fn interfaces(&self) -> Vec<String> {
        self.implements_interfaces.clone()
    }
}

pub trait AbstractTypeDefinitionExtension {
    fn is_implemented_by(&self, other_type: &dyn ImplementingInterfaceExtension) -> bool;
}

impl AbstractTypeDefinitionExtension for InterfaceType {
    fn is_implemented_by(&self, other_type: &dyn ImplementingInterfaceExtension) -> bool {
        other_type.interfaces().iter().any(|v| self.name.eq(v))
    }
}

pub trait SubTypeExtension {
    fn has_sub_type(&self, other_type_name: &str) -> bool;
}

impl SubTypeExtension for UnionType {
    fn has_sub_type(&self, other_type_name: &str) -> bool {
        self.types.iter().any(|v| other_type_name.eq(v))
    }
}

pub trait FieldExtension {
    fn response_name(&self) -> &str;
}

impl FieldExtension for query::Field {
    fn response_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}
