use std::collections::{HashMap, HashSet};

use indexmap::map::Entry;
use indexmap::IndexMap;

use super::{
    arguments_equal, AbstractTypeDefinitionExtension, FieldByNameExtension, FieldExtension,
    SchemaDocumentExtension, SubTypeExtension, TypeDefinitionExtension, ValueExtension,
};
use crate::analyzer::{AnalyzerError, Result};
use crate::model::{FieldSelection, Path, PossibleSelections, SelectionInfo};
use crate::static_graphql::{
    query::{self, Selection, TypeCondition},
    schema::{self, TypeDefinition},
};

/// Fragment definitions of every analyzed document, by name.
pub fn index_fragments(
    documents: &[query::Document],
) -> Result<HashMap<&str, &query::FragmentDefinition>> {
    let mut known_fragments = HashMap::new();

    for document in documents {
        for definition in &document.definitions {
            if let query::Definition::Fragment(fragment) = definition {
                if known_fragments
                    .insert(fragment.name.as_str(), fragment)
                    .is_some()
                {
                    return Err(AnalyzerError::DuplicateFragmentName {
                        name: fragment.name.clone(),
                    });
                }
            }
        }
    }

    let mut visited_fragments = HashSet::new();
    let mut spread_path = Vec::new();

    for document in documents {
        for definition in &document.definitions {
            if let query::Definition::Fragment(fragment) = definition {
                detect_cycles(
                    fragment,
                    &known_fragments,
                    &mut visited_fragments,
                    &mut spread_path,
                )?;
            }
        }
    }

    Ok(known_fragments)
}

/// Depth-first walk over fragment spreads. `spread_path` holds the fragments
/// currently being expanded, so reaching one of them again closes a cycle.
fn detect_cycles<'a>(
    fragment: &'a query::FragmentDefinition,
    known_fragments: &HashMap<&'a str, &'a query::FragmentDefinition>,
    visited_fragments: &mut HashSet<&'a str>,
    spread_path: &mut Vec<&'a str>,
) -> Result<()> {
    if !visited_fragments.insert(fragment.name.as_str()) {
        return Ok(());
    }

    spread_path.push(fragment.name.as_str());

    let mut spreads = Vec::new();
    collect_spreads(&fragment.selection_set, &mut spreads);

    for spread in spreads {
        let spread_name = spread.fragment_name.as_str();

        if let Some(index) = spread_path.iter().position(|name| *name == spread_name) {
            return Err(AnalyzerError::FragmentCycle {
                name: spread.fragment_name.clone(),
                via: spread_path[index..].iter().map(|name| name.to_string()).collect(),
                position: spread.position,
            });
        }

        if let Some(&next) = known_fragments.get(spread_name) {
            detect_cycles(next, known_fragments, visited_fragments, spread_path)?;
        }
    }

    spread_path.pop();

    Ok(())
}

/// Spreads at any depth of `selection_set`, nested fields included.
fn collect_spreads<'a>(
    selection_set: &'a query::SelectionSet,
    spreads: &mut Vec<&'a query::FragmentSpread>,
) {
    for item in &selection_set.items {
        match item {
            Selection::Field(f) => collect_spreads(&f.selection_set, spreads),
            Selection::InlineFragment(f) => collect_spreads(&f.selection_set, spreads),
            Selection::FragmentSpread(f) => spreads.push(f),
        }
    }
}

/// Resolves selection sets into the fields requested per concrete type.
pub struct FieldCollector<'a> {
    schema: &'a schema::Document,
    known_fragments: HashMap<&'a str, &'a query::FragmentDefinition>,
}

impl<'a> FieldCollector<'a> {
    pub fn new(
        schema: &'a schema::Document,
        known_fragments: HashMap<&'a str, &'a query::FragmentDefinition>,
    ) -> Self {
        FieldCollector {
            schema,
            known_fragments,
        }
    }

    pub fn schema(&self) -> &'a schema::Document {
        self.schema
    }

    /// One variant per concrete type of `type_def`, in schema order.
    pub fn collect(
        &self,
        type_def: &TypeDefinition,
        selection_set: &query::SelectionSet,
        path: &Path,
    ) -> Result<PossibleSelections> {
        let variants = self
            .schema
            .possible_types(type_def)
            .into_iter()
            .map(|concrete_type| -> Result<SelectionInfo> {
                Ok(SelectionInfo {
                    type_condition: concrete_type.name().to_string(),
                    fields: self.collect_for(concrete_type, type_def, selection_set, path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(PossibleSelections { variants })
    }

    /// Fields selected on `type_def` itself, without narrowing to a concrete type.
    pub fn collect_fields_on(
        &self,
        type_def: &TypeDefinition,
        selection_set: &query::SelectionSet,
        path: &Path,
    ) -> Result<Vec<FieldSelection>> {
        self.collect_for(type_def, type_def, selection_set, path)
    }

    fn collect_for(
        &self,
        runtime_type: &TypeDefinition,
        scope: &TypeDefinition,
        selection_set: &query::SelectionSet,
        path: &Path,
    ) -> Result<Vec<FieldSelection>> {
        let mut fields = IndexMap::new();
        let mut visited_fragments_names: Vec<String> = Vec::new();

        self.collect_fields_inner(
            selection_set,
            runtime_type,
            scope,
            path,
            &mut fields,
            &mut visited_fragments_names,
        )?;

        fields
            .into_values()
            .map(|selection: query::Field| -> Result<FieldSelection> {
                let field = runtime_type
                    .field_by_name(&selection.name)
                    .ok_or_else(|| AnalyzerError::UnknownField {
                        type_name: runtime_type.name().to_string(),
                        field_name: selection.name.clone(),
                        path: path.clone(),
                        position: selection.position,
                    })?;

                Ok(FieldSelection::new(field.clone(), selection, path.clone()))
            })
            .collect()
    }

    fn collect_fields_inner(
        &self,
        selection_set: &query::SelectionSet,
        runtime_type: &TypeDefinition,
        scope: &TypeDefinition,
        path: &Path,
        result_map: &mut IndexMap<String, query::Field>,
        visited_fragments_names: &mut Vec<String>,
    ) -> Result<()> {
        for item in &selection_set.items {
            match item {
                Selection::Field(f) => {
                    if !is_statically_excluded(&f.directives) {
                        merge_field(result_map, f, path)?;
                    }
                }
                Selection::InlineFragment(f) => {
                    if is_statically_excluded(&f.directives) {
                        continue;
                    }

                    let condition = match &f.type_condition {
                        Some(TypeCondition::On(type_name)) => {
                            self.resolve_condition(type_name, scope, path, f.position)?
                        }
                        None => scope,
                    };

                    if does_fragment_condition_match(condition, runtime_type) {
                        self.collect_fields_inner(
                            &f.selection_set,
                            runtime_type,
                            condition,
                            path,
                            result_map,
                            visited_fragments_names,
                        )?;
                    }
                }
                Selection::FragmentSpread(f) => {
                    if is_statically_excluded(&f.directives)
                        || visited_fragments_names
                            .iter()
                            .any(|name| f.fragment_name.eq(name))
                    {
                        continue;
                    }

                    visited_fragments_names.push(f.fragment_name.clone());

                    let fragment = self
                        .known_fragments
                        .get(f.fragment_name.as_str())
                        .ok_or_else(|| AnalyzerError::UnknownFragment {
                            name: f.fragment_name.clone(),
                            path: path.clone(),
                            position: f.position,
                        })?;

                    let TypeCondition::On(type_name) = &fragment.type_condition;
                    let condition =
                        self.resolve_condition(type_name, scope, path, f.position)?;

                    if does_fragment_condition_match(condition, runtime_type) {
                        self.collect_fields_inner(
                            &fragment.selection_set,
                            runtime_type,
                            condition,
                            path,
                            result_map,
                            visited_fragments_names,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    fn resolve_condition(
        &self,
        type_name: &str,
        scope: &TypeDefinition,
        path: &Path,
        position: graphql_parser::Pos,
    ) -> Result<&'a TypeDefinition> {
        self.schema
            .type_by_name(type_name)
            .filter(|condition| {
                condition.is_composite_type() && self.schema.do_types_overlap(condition, scope)
            })
            .ok_or_else(|| AnalyzerError::UnknownTypeCondition {
                type_condition: type_name.to_string(),
                parent_type: scope.name().to_string(),
                path: path.clone(),
                position,
            })
    }
}

fn does_fragment_condition_match(
    conditional_type: &TypeDefinition,
    runtime_type: &TypeDefinition,
) -> bool {
    if conditional_type.name().eq(runtime_type.name()) {
        return true;
    }

    match conditional_type {
        TypeDefinition::Interface(interface_type) => interface_type.is_implemented_by(runtime_type),
        TypeDefinition::Union(union_type) => union_type.has_sub_type(runtime_type.name()),
        _ => false,
    }
}

/// `@skip`/`@include` with a literal condition that removes the selection.
/// Conditions given as variables are left for runtime.
fn is_statically_excluded(directives: &[query::Directive]) -> bool {
    directives.iter().any(|directive| {
        let condition = directive
            .arguments
            .iter()
            .find(|(name, _)| name == "if")
            .and_then(|(_, value)| value.as_static_bool());

        matches!(
            (directive.name.as_str(), condition),
            ("skip", Some(true)) | ("include", Some(false))
        )
    })
}

fn merge_field(
    result_map: &mut IndexMap<String, query::Field>,
    field: &query::Field,
    path: &Path,
) -> Result<()> {
    match result_map.entry(field.response_name().to_string()) {
        Entry::Vacant(entry) => {
            entry.insert(field.clone());
        }
        Entry::Occupied(mut entry) => {
            let existing = entry.get_mut();

            let reason = if existing.name != field.name {
                Some(format!(
                    "\"{}\" and \"{}\" are different fields",
                    existing.name, field.name
                ))
            } else if !arguments_equal(&existing.arguments, &field.arguments) {
                Some("they have differing arguments".to_string())
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(AnalyzerError::FieldMergeConflict {
                    response_name: field.response_name().to_string(),
                    path: path.clone(),
                    first: existing.position,
                    second: field.position,
                    reason,
                });
            }

            existing
                .selection_set
                .items
                .extend(field.selection_set.items.iter().cloned());
        }
    }

    Ok(())
}

#[test]
fn interface_selection_yields_variant_per_implementation() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetPet { pet { name ... on Dog { breed } ... on Cat { lives } } }",
        "pet",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(possible.variants.len(), 2);
    assert_eq!(
        possible.variant("Dog").map(|v| v.response_names()),
        Some(vec!["name", "breed"])
    );
    assert_eq!(
        possible.variant("Cat").map(|v| v.response_names()),
        Some(vec!["name", "lives"])
    );
}

#[test]
fn same_fields_from_fragments_collapse() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetDog {
          dog {
            ...DogName
            ... on Dog { name nickname }
            name
          }
        }
        fragment DogName on Dog { name }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(possible.variants.len(), 1);
    assert_eq!(possible.variants[0].type_condition, "Dog");
    assert_eq!(possible.variants[0].response_names(), vec!["name", "nickname"]);
}

#[test]
fn merged_fields_combine_nested_selections() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetDog { dog { owner { name } owner { pets { name } } } }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap();

    let owner = possible.variants[0].field("owner").unwrap();
    assert_eq!(owner.selection.selection_set.items.len(), 2);
    assert_eq!(owner.path.to_string(), "GetDog.dog");
    assert_eq!(owner.field_path().to_string(), "GetDog.dog.owner");
}

#[test]
fn differing_arguments_conflict() {
    use crate::analyzer::test_utils::*;

    let error = collect_with_schema(
        "query GetDog {
          dog {
            name(surname: true)
            ... on Dog { name(surname: false) }
          }
        }",
        "dog",
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
            assert_eq!(response_name, "name");
            assert_eq!(path.to_string(), "GetDog.dog");
            assert_eq!(first.line, 3);
            assert_eq!(second.line, 4);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn aliased_different_fields_conflict() {
    use crate::analyzer::test_utils::*;

    let error = collect_with_schema(
        "query GetDog { dog { title: name title: nickname } }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        AnalyzerError::FieldMergeConflict { ref response_name, .. } if response_name == "title"
    ));
}

#[test]
fn unresolved_type_condition_fails() {
    use crate::analyzer::test_utils::*;

    let error = collect_with_schema(
        "query GetPet { pet { ... on Snake { name } } }",
        "pet",
        TEST_SCHEMA,
    )
    .unwrap_err();

    assert!(matches!(
        error,
        AnalyzerError::UnknownTypeCondition { ref type_condition, .. } if type_condition == "Snake"
    ));
}

#[test]
fn disjoint_type_condition_fails() {
    use crate::analyzer::test_utils::*;

    let error = collect_with_schema(
        "query GetPet { pet { ...HumanName } } fragment HumanName on Human { name }",
        "pet",
        TEST_SCHEMA,
    )
    .unwrap_err();

    match error {
        AnalyzerError::UnknownTypeCondition {
            type_condition,
            parent_type,
            path,
            position,
        } => {
            assert_eq!(type_condition, "Human");
            assert_eq!(parent_type, "Pet");
            assert_eq!(path.to_string(), "GetPet.pet");
            assert_eq!(position.line, 1);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn static_skip_and_include_remove_selections() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetDog($withBreed: Boolean!) {
          dog {
            name @skip(if: true)
            nickname @include(if: false)
            barkVolume @skip(if: false)
            breed @include(if: $withBreed)
            ... on Dog @skip(if: true) { father { name } }
            ...Mother @include(if: false)
          }
        }
        fragment Mother on Dog { mother { name } }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(
        possible.variants[0].response_names(),
        vec!["barkVolume", "breed"]
    );
}

#[test]
fn union_members_get_variants() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetCatOrDog {
          catOrDog {
            __typename
            ... on Pet { name }
            ... on Dog { barkVolume }
          }
        }",
        "catOrDog",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(
        possible
            .variants
            .iter()
            .map(|v| (v.type_condition.as_str(), v.response_names()))
            .collect::<Vec<_>>(),
        vec![
            ("Cat", vec!["__typename", "name"]),
            ("Dog", vec!["__typename", "name", "barkVolume"]),
        ]
    );
}

#[test]
fn abstract_type_without_implementations_has_no_variants() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetLonely { lonely { since } }",
        "lonely",
        TEST_SCHEMA,
    )
    .unwrap();

    assert!(possible.is_empty());
}

#[test]
fn fragment_cycles_are_rejected() {
    use crate::analyzer::test_utils::*;

    let error = collect_with_schema(
        "query GetDog { dog { ...A } }
        fragment A on Dog { name ...B }
        fragment B on Dog { nickname ...A }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap_err();

    match error {
        AnalyzerError::FragmentCycle { name, via, position } => {
            assert_eq!(name, "A");
            assert_eq!(via, vec!["A", "B"]);
            assert_eq!(position.line, 3);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn fragment_cycles_through_nested_fields_are_rejected() {
    let documents = vec![crate::analyzer::test_utils::parse_document(
        "query GetDog { dog { ...A } }
        fragment A on Dog { name mother { ... on Dog { ...A } } }",
    )];

    assert!(matches!(
        index_fragments(&documents),
        Err(AnalyzerError::FragmentCycle { ref name, ref via, .. })
            if name == "A" && via == &vec!["A".to_string()]
    ));
}

#[test]
fn fragments_spread_twice_are_not_cycles() {
    use crate::analyzer::test_utils::*;

    let possible = collect_with_schema(
        "query GetDog { dog { ...A ...B } }
        fragment A on Dog { name ...C }
        fragment B on Dog { nickname mother { ...C } }
        fragment C on Dog { breed }",
        "dog",
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(
        possible.variants[0].response_names(),
        vec!["name", "breed", "nickname", "mother"]
    );
}

#[test]
fn unknown_fragment_and_field_fail() {
    use crate::analyzer::test_utils::*;

    assert!(matches!(
        collect_with_schema("query GetDog { dog { ...Missing } }", "dog", TEST_SCHEMA),
        Err(AnalyzerError::UnknownFragment { ref name, .. }) if name == "Missing"
    ));
    assert!(matches!(
        collect_with_schema("query GetDog { dog { meows } }", "dog", TEST_SCHEMA),
        Err(AnalyzerError::UnknownField { ref type_name, ref field_name, .. })
            if type_name == "Dog" && field_name == "meows"
    ));
}

#[test]
fn fields_on_abstract_type_itself() {
    use crate::analyzer::test_utils::*;
    use crate::ast::SchemaDocumentExtension;

    let schema = parse_schema(TEST_SCHEMA);
    let document = parse_document(
        "query GetPet { pet { __typename ... on Pet { owner { name } } ... on Dog { breed } name } }",
    );
    let documents = vec![document];
    let collector = FieldCollector::new(&schema, index_fragments(&documents).unwrap());
    let pet = first_field(&documents[0]);

    let fields = collector
        .collect_fields_on(
            schema.type_by_name("Pet").unwrap(),
            &pet.selection_set,
            &Path::root("GetPet").append("pet"),
        )
        .unwrap();

    assert_eq!(
        fields.iter().map(|f| f.response_name()).collect::<Vec<_>>(),
        vec!["__typename", "owner", "name"]
    );
}

#[test]
fn duplicate_fragment_names_fail() {
    use crate::analyzer::test_utils::*;

    let documents = vec![
        parse_document("fragment A on Dog { name }"),
        parse_document("fragment A on Cat { name }"),
    ];

    assert_eq!(
        index_fragments(&documents).err(),
        Some(AnalyzerError::DuplicateFragmentName {
            name: "A".to_string()
        })
    );
}
