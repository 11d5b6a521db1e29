use indexmap::IndexSet;
use tracing::debug;

use super::{
    analyze_type_usage, operation_skip_names, register_enum_models, register_input_models,
    AnalyzerError, OutputModelBuilder, Result, TypeRegistry,
};
use crate::ast::{index_fragments, FieldCollector};
use crate::model::DocumentModel;
use crate::static_graphql::{query, schema};

/// Configures and runs one analysis.
///
/// ```ignore
/// let model = DocumentAnalyzer::new()
///     .with_schema(schema)
///     .add_document(document)
///     .analyze()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalyzer {
    schema: Option<schema::Document>,
    documents: Vec<query::Document>,
    reserved_names: IndexSet<String>,
}

impl DocumentAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(self, schema: schema::Document) -> Self {
        DocumentAnalyzer {
            schema: Some(schema),
            ..self
        }
    }

    pub fn add_document(mut self, document: query::Document) -> Self {
        self.documents.push(document);
        self
    }

    /// A name generated models must not take, e.g. one the emitter already uses.
    pub fn reserve_name(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.insert(name.into());
        self
    }

    pub fn analyze(&self) -> Result<DocumentModel> {
        let schema = self.schema.as_ref().ok_or(AnalyzerError::MissingSchema)?;

        if self.documents.is_empty() {
            return Err(AnalyzerError::NoDocuments);
        }

        debug!(documents = self.documents.len(), "analyzing documents");

        let known_fragments = index_fragments(&self.documents)?;
        let skip_names = operation_skip_names(&self.documents, &self.reserved_names);
        let usage = analyze_type_usage(schema, &self.documents);

        let mut registry = TypeRegistry::new();
        register_enum_models(schema, &usage, &mut registry, &skip_names)?;
        register_input_models(schema, &usage, &mut registry, &skip_names)?;
        debug!(models = registry.len(), "registered enum and input models");

        let collector = FieldCollector::new(schema, known_fragments);
        let builder = OutputModelBuilder::new(&collector, &self.reserved_names, &skip_names);
        let (registry, operations) = builder.build(registry, &self.documents)?;

        debug!(
            models = registry.len(),
            operations = operations.len(),
            "analysis finished"
        );

        Ok(DocumentModel::new(registry.finish(), operations))
    }
}

#[cfg(test)]
static PET_SCHEMA: &str = "
type Query { pet: Pet }
interface Pet { name: String }
type Dog implements Pet { name: String breed: String }
type Cat implements Pet { name: String lives: Int }
";

#[test]
fn interface_selection_end_to_end() {
    use crate::analyzer::test_utils::*;
    use crate::model::Path;

    let model = analyze_with_schema(
        &["query GetPet { pet { name ... on Dog { breed } ... on Cat { lives } } }"],
        PET_SCHEMA,
    )
    .unwrap();

    assert_eq!(
        model.types().map(|t| t.name()).collect::<Vec<_>>(),
        vec!["GetPet", "Pet", "Dog", "Cat"]
    );

    let pet = model.type_by_name("Pet").and_then(|t| t.as_interface()).unwrap();
    assert_eq!(pet.implementations, vec!["Dog", "Cat"]);
    assert_eq!(pet.fields.len(), 1);

    assert_eq!(
        model
            .type_by_name("Dog")
            .map(|t| t.fields().iter().map(|f| f.response_name.clone()).collect::<Vec<_>>()),
        Some(vec!["name".to_string(), "breed".to_string()])
    );
    assert_eq!(
        model
            .type_by_name("Cat")
            .map(|t| t.fields().iter().map(|f| f.response_name.clone()).collect::<Vec<_>>()),
        Some(vec!["name".to_string(), "lives".to_string()])
    );

    let root = model.root_type("GetPet").unwrap();
    assert_eq!(root.fields()[0].type_model.as_deref(), Some("Pet"));
    assert_eq!(
        model
            .type_at(&Path::root("GetPet").append("pet"))
            .map(|t| t.name()),
        Some("Pet")
    );
}

#[test]
fn enums_and_inputs_join_the_model() {
    use crate::analyzer::test_utils::*;

    let model = analyze_with_schema(
        &[
            "query FindPets($filter: PetFilter) { pets(filter: $filter) { name } }",
            "query GetCat { cat { furColor ...Owner } }
            fragment Owner on Cat { owner { name } }",
        ],
        TEST_SCHEMA,
    )
    .unwrap();

    let fur_color = model.type_by_name("FurColor").and_then(|t| t.as_enum()).unwrap();
    assert_eq!(fur_color.serialization_type.as_deref(), Some("Int"));
    assert!(model
        .type_by_name("OwnerFilter")
        .and_then(|t| t.as_complex_input())
        .is_some());

    let cat = model
        .operation("GetCat")
        .and_then(|o| o.type_at(&crate::model::Path::from_iter(["GetCat", "cat"])))
        .and_then(|name| model.type_by_name(name))
        .unwrap();
    assert_eq!(
        cat.fields()
            .iter()
            .map(|f| (f.response_name.as_str(), f.type_model.as_deref()))
            .collect::<Vec<_>>(),
        vec![("furColor", Some("FurColor")), ("owner", Some("Human"))]
    );
    assert_eq!(model.operations().len(), 2);
}

#[test]
fn analysis_is_deterministic() {
    use crate::analyzer::test_utils::*;

    let documents = [
        "query GetPet { pet { name ... on Dog { mother { name } } } }",
        "query GetCatOrDog { catOrDog { ... on Cat { furColor } } }",
    ];

    let first = analyze_with_schema(&documents, TEST_SCHEMA).unwrap();
    let second = analyze_with_schema(&documents, TEST_SCHEMA).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn json_output_tags_models_by_kind() {
    use crate::analyzer::test_utils::*;

    let model = analyze_with_schema(&["query GetDog { dog { name } }"], TEST_SCHEMA).unwrap();
    let json = model.to_json().unwrap();

    assert_eq!(json["types"]["Dog"]["kind"], "Object");
    assert_eq!(json["types"]["Dog"]["fields"][0]["path"], "GetDog.dog.name");
    assert_eq!(json["operations"][0]["kind"], "Query");
    assert_eq!(json["operations"][0]["paths"]["GetDog.dog"], "Dog");
}

#[test]
fn reserved_names_are_avoided() {
    use crate::analyzer::test_utils::*;

    let model = DocumentAnalyzer::new()
        .with_schema(parse_schema(TEST_SCHEMA))
        .add_document(parse_document("query GetDog { dog { name } }"))
        .reserve_name("Dog")
        .reserve_name("GetDog")
        .analyze()
        .unwrap();

    assert_eq!(model.operation("GetDog").map(|o| o.root_type.as_str()), Some("GetDog1"));
    assert!(model.type_by_name("Dog1").is_some());
    assert!(model.type_by_name("Dog").is_none());
}

#[test]
fn preconditions_fail_before_traversal() {
    use crate::analyzer::test_utils::*;

    assert_eq!(
        DocumentAnalyzer::new()
            .add_document(parse_document("query GetDog { dog { name } }"))
            .analyze(),
        Err(AnalyzerError::MissingSchema)
    );
    assert_eq!(
        DocumentAnalyzer::new()
            .with_schema(parse_schema(TEST_SCHEMA))
            .analyze(),
        Err(AnalyzerError::NoDocuments)
    );
}

#[test]
fn fragments_are_shared_across_documents() {
    use crate::analyzer::test_utils::*;

    let model = analyze_with_schema(
        &[
            "query GetDog { dog { ...DogName } }",
            "fragment DogName on Dog { name nickname }",
        ],
        TEST_SCHEMA,
    )
    .unwrap();

    assert_eq!(
        model.type_by_name("Dog").map(|t| t.fields().len()),
        Some(2)
    );
}

#[test]
fn recursive_fragments_fail_before_traversal() {
    use crate::analyzer::test_utils::*;

    assert!(matches!(
        analyze_with_schema(
            &["query GetDog { dog { ...A } } fragment A on Dog { name mother { ...A } }"],
            TEST_SCHEMA,
        ),
        Err(AnalyzerError::FragmentCycle { ref name, .. }) if name == "A"
    ));
}
