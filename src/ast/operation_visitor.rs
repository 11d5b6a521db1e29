use crate::static_graphql::{query::*, schema};

use super::{
    FieldByNameExtension, OperationDefinitionExtension, SchemaDocumentExtension,
    TypeDefinitionExtension, TypeExtension,
};

/// Tracks the schema types in effect while walking an executable document.
pub struct OperationVisitorContext<'a> {
    pub schema: &'a schema::Document,

    type_stack: Vec<Option<&'a schema::TypeDefinition>>,
    parent_type_stack: Vec<Option<&'a schema::TypeDefinition>>,
    input_type_stack: Vec<Option<&'a schema::TypeDefinition>>,
    input_type_literal_stack: Vec<Option<&'a Type>>,
}

impl<'a> OperationVisitorContext<'a> {
    pub fn new(schema: &'a schema::Document) -> Self {
        OperationVisitorContext {
            schema,
            type_stack: vec![],
            parent_type_stack: vec![],
            input_type_stack: vec![],
            input_type_literal_stack: vec![],
        }
    }

    pub fn with_named_type<Func>(&mut self, name: Option<&str>, func: Func)
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>),
    {
        let schema = self.schema;
        self.type_stack
            .push(name.and_then(|name| schema.type_by_name(name)));
        func(self);
        self.type_stack.pop();
    }

    pub fn with_type<Func>(&mut self, t: Option<&Type>, func: Func)
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>),
    {
        let name = t.map(|t| t.inner_type());
        self.with_named_type(name.as_deref(), func);
    }

    pub fn with_parent_type<Func>(&mut self, func: Func)
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>),
    {
        self.parent_type_stack
            .push(self.type_stack.last().copied().flatten());
        func(self);
        self.parent_type_stack.pop();
    }

    pub fn with_input_type<Func>(&mut self, t: Option<&'a Type>, func: Func)
    where
        Func: FnOnce(&mut OperationVisitorContext<'a>),
    {
        let schema = self.schema;
        self.input_type_stack
            .push(t.and_then(|t| schema.type_by_name(&t.inner_type())));
        self.input_type_literal_stack.push(t);
        func(self);
        self.input_type_literal_stack.pop();
        self.input_type_stack.pop();
    }

    pub fn current_type(&self) -> Option<&'a schema::TypeDefinition> {
        self.type_stack.last().copied().flatten()
    }

    pub fn current_input_type(&self) -> Option<&'a schema::TypeDefinition> {
        self.input_type_stack.last().copied().flatten()
    }

    pub fn current_parent_type(&self) -> Option<&'a schema::TypeDefinition> {
        self.parent_type_stack.last().copied().flatten()
    }

    pub fn current_input_type_literal(&self) -> Option<&'a Type> {
        self.input_type_literal_stack.last().copied().flatten()
    }
}

pub fn visit_document<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    document: &'a Document,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    let schema = context.schema;

    for definition in &document.definitions {
        let schema_type_name = match definition {
            Definition::Fragment(fragment) => {
                let TypeCondition::On(name) = &fragment.type_condition;
                Some(name.as_str())
            }
            Definition::Operation(operation) => schema.root_type_name(operation.kind()),
        };

        context.with_named_type(schema_type_name, |context| match definition {
            Definition::Fragment(fragment) => {
                visit_fragment_definition(visitor, fragment, context, user_context)
            }
            Definition::Operation(operation) => {
                visit_operation_definition(visitor, operation, context, user_context)
            }
        });
    }
}

fn visit_directives<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    directives: &'a [Directive],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    let schema = context.schema;

    for directive in directives {
        let directive_def_args = schema
            .definitions
            .iter()
            .find_map(|def| match def {
                schema::Definition::DirectiveDefinition(directive_def)
                    if directive_def.name == directive.name =>
                {
                    Some(directive_def.arguments.as_slice())
                }
                _ => None,
            });

        visit_arguments(
            visitor,
            directive_def_args,
            &directive.arguments,
            context,
            user_context,
        );
    }
}

fn visit_arguments<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    arguments_definition: Option<&'a [schema::InputValue]>,
    arguments: &'a [(String, Value)],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for argument in arguments {
        let arg_type = arguments_definition
            .and_then(|argument_defs| argument_defs.iter().find(|a| a.name.eq(&argument.0)))
            .map(|a| &a.value_type);

        context.with_input_type(arg_type, |context| {
            visitor.enter_argument(context, user_context, argument);
            visit_input_value(visitor, &argument.1, context, user_context);
        })
    }
}

fn visit_input_value<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    input_value: &'a Value,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    match input_value {
        Value::List(items) => {
            let item_type = context.current_input_type_literal().and_then(list_item_type);

            context.with_input_type(item_type, |context| {
                for item in items {
                    visit_input_value(visitor, item, context, user_context)
                }
            });
        }
        Value::Object(fields) => {
            for (name, value) in fields.iter() {
                let input_type = context
                    .current_input_type()
                    .and_then(|t| t.input_field_by_name(name))
                    .map(|f| &f.value_type);

                context.with_input_type(input_type, |context| {
                    visitor.enter_object_field(context, user_context, (name, value));
                    visit_input_value(visitor, value, context, user_context);
                });
            }
        }
        _ => {}
    }
}

fn list_item_type(t: &Type) -> Option<&Type> {
    match t {
        Type::NonNullType(inner) => list_item_type(inner),
        Type::ListType(inner) => Some(inner.as_ref()),
        Type::NamedType(_) => None,
    }
}

fn visit_variable_definitions<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    variables: &'a [VariableDefinition],
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    for variable in variables {
        context.with_input_type(Some(&variable.var_type), |context| {
            visitor.enter_variable_definition(context, user_context, variable);

            if let Some(default_value) = &variable.default_value {
                visit_input_value(visitor, default_value, context, user_context);
            }
        })
    }
}

fn visit_selection<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    selection: &'a Selection,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    match selection {
        Selection::Field(field) => {
            let field_def = context
                .current_parent_type()
                .and_then(|t| t.field_by_name(&field.name));

            let field_type = field_def.map(|f| &f.field_type);
            let field_args = field_def.map(|f| f.arguments.as_slice());

            context.with_type(field_type, |context| {
                visitor.enter_field(context, user_context, field);
                visit_arguments(visitor, field_args, &field.arguments, context, user_context);
                visit_directives(visitor, &field.directives, context, user_context);
                visit_selection_set(visitor, &field.selection_set, context, user_context);
            });
        }
        Selection::FragmentSpread(fragment_spread) => {
            visit_directives(visitor, &fragment_spread.directives, context, user_context);
        }
        Selection::InlineFragment(inline_fragment) => {
            let visit = |context: &mut OperationVisitorContext<'a>| {
                visit_directives(visitor, &inline_fragment.directives, context, user_context);
                visit_selection_set(
                    visitor,
                    &inline_fragment.selection_set,
                    context,
                    user_context,
                );
            };

            match &inline_fragment.type_condition {
                Some(TypeCondition::On(fragment_condition)) => {
                    context.with_named_type(Some(fragment_condition.as_str()), visit)
                }
                None => {
                    let current = context.current_type().map(|t| t.name().to_string());
                    context.with_named_type(current.as_deref(), visit)
                }
            }
        }
    }
}

fn visit_selection_set<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    selection_set: &'a SelectionSet,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    context.with_parent_type(|context| {
        for selection in &selection_set.items {
            visit_selection(visitor, selection, context, user_context);
        }
    });
}

fn visit_fragment_definition<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    fragment: &'a FragmentDefinition,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    visit_directives(visitor, &fragment.directives, context, user_context);
    visit_selection_set(visitor, &fragment.selection_set, context, user_context);
}

fn visit_operation_definition<'a, Visitor, UserContext>(
    visitor: &mut Visitor,
    operation: &'a OperationDefinition,
    context: &mut OperationVisitorContext<'a>,
    user_context: &mut UserContext,
) where
    Visitor: OperationVisitor<'a, UserContext>,
{
    visit_directives(visitor, operation.directives(), context, user_context);
    visit_variable_definitions(
        visitor,
        operation.variable_definitions(),
        context,
        user_context,
    );
    visit_selection_set(visitor, operation.selection_set(), context, user_context);
}

/// Hooks called while walking a document. Every hook defaults to doing nothing.
pub trait OperationVisitor<'a, UserContext = ()> {
    fn enter_variable_definition(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a VariableDefinition,
    ) {
    }

    fn enter_argument(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a (String, Value),
    ) {
    }

    fn enter_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: &'a Field,
    ) {
    }

    fn enter_object_field(
        &mut self,
        _: &mut OperationVisitorContext<'a>,
        _: &mut UserContext,
        _: (&'a String, &'a Value),
    ) {
    }
}

#[cfg(test)]
#[derive(Default)]
struct FieldTypes {
    seen: Vec<String>,
}

#[cfg(test)]
struct FieldTypesVisitor;

#[cfg(test)]
impl<'a> OperationVisitor<'a, FieldTypes> for FieldTypesVisitor {
    fn enter_field(
        &mut self,
        context: &mut OperationVisitorContext<'a>,
        user_context: &mut FieldTypes,
        field: &'a Field,
    ) {
        let parent = context.current_parent_type().map(|t| t.name()).unwrap_or("?");
        let current = context.current_type().map(|t| t.name()).unwrap_or("?");
        user_context
            .seen
            .push(format!("{}.{}: {}", parent, field.name, current));
    }
}

#[test]
fn tracks_types_through_fragments() {
    use crate::analyzer::test_utils::*;

    let schema = parse_schema(TEST_SCHEMA);
    let document = parse_document(
        "query GetPet { pet { ... on Dog { mother { name } } ...CatFur } }
        fragment CatFur on Cat { furColor }",
    );

    let mut context = OperationVisitorContext::new(&schema);
    let mut field_types = FieldTypes::default();
    visit_document(&mut FieldTypesVisitor, &document, &mut context, &mut field_types);

    assert_eq!(
        field_types.seen,
        vec![
            "Query.pet: Pet",
            "Dog.mother: Dog",
            "Dog.name: ?",
            "Cat.furColor: FurColor",
        ]
    );
}
