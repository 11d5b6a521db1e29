use super::{operation_skip_names, DocumentAnalyzer, OutputModelBuilder, Result, TypeRegistry};
use crate::ast::{
    index_fragments, FieldByNameExtension, FieldCollector, FieldExtension,
    OperationDefinitionExtension, SchemaDocumentExtension, TypeExtension,
};
use crate::model::{DocumentModel, OperationModel, Path, PossibleSelections};
use crate::static_graphql::{query, schema};

pub static TEST_SCHEMA: &str = r#"
directive @skip(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @include(if: Boolean!) on FIELD | FRAGMENT_SPREAD | INLINE_FRAGMENT
directive @rename(name: String!) on ENUM | ENUM_VALUE | INPUT_OBJECT | INPUT_FIELD_DEFINITION
directive @serializationType(name: String!) on ENUM
directive @enumValue(value: String!) on ENUM_VALUE

interface Pet {
  name(surname: Boolean): String
  owner: Human
}
enum DogCommand {
  SIT
  HEEL
  DOWN
}
"A good boy."
type Dog implements Pet {
  name(surname: Boolean): String
  nickname: String
  barkVolume: Int
  breed: String
  owner: Human
  mother: Dog
  father: Dog
  friend: Dog
  doesKnowCommand(dogCommand: DogCommand): Boolean
}
type Cat implements Pet {
  name(surname: Boolean): String
  nickname: String
  lives: Int
  meows: Boolean
  furColor: FurColor
  owner: Human
  friend: Cat
}
union CatOrDog = Cat | Dog
type Human {
  id: ID!
  name: String
  pets: [Pet]
}
interface Unadopted {
  since: String
}
enum FurColor @serializationType(name: "Int") {
  BROWN @enumValue(value: "1")
  BLACK
  NO_FUR @rename(name: "Bald")
}
enum Color @rename(name: "Colour") {
  "Not quite red."
  RED @rename(name: "Crimson")
  ORANGE_RED
}
input PetFilter {
  name: String
  furColor: FurColor
  owner: OwnerFilter
}
input OwnerFilter {
  name: String
  min_pets: Int @rename(name: "MinimumPets")
}
type Query {
  pet: Pet
  dog: Dog
  cat: Cat
  catOrDog: CatOrDog
  human(id: ID): Human
  pets(filter: PetFilter): [Pet!]!
  lonely: Unadopted
  paint(color: Color!): Boolean
}
type Mutation {
  adopt(filter: PetFilter): Pet
}
"#;

fn string_to_static_str(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

pub fn parse_schema(sdl: &str) -> schema::Document {
    graphql_parser::parse_schema::<String>(string_to_static_str(sdl.to_string()))
        .expect("Failed to parse schema")
}

pub fn parse_document(operation: &str) -> query::Document {
    graphql_parser::parse_query::<String>(operation)
        .expect("Failed to parse document")
        .into_static()
}

/// The first field of the first operation in `document`.
pub fn first_field(document: &query::Document) -> &query::Field {
    document
        .definitions
        .iter()
        .find_map(|definition| match definition {
            query::Definition::Operation(operation) => {
                operation
                    .selection_set()
                    .items
                    .iter()
                    .find_map(|selection| match selection {
                        query::Selection::Field(field) => Some(field),
                        _ => None,
                    })
            }
            _ => None,
        })
        .expect("No field in document")
}

/// Collects the selection of the top-level field `field_name` of the first operation.
pub fn collect_with_schema(
    operation: &str,
    field_name: &str,
    schema: &str,
) -> Result<PossibleSelections> {
    let schema = parse_schema(schema);
    let documents = vec![parse_document(operation)];
    let collector = FieldCollector::new(&schema, index_fragments(&documents)?);

    let operation = documents[0]
        .definitions
        .iter()
        .find_map(|definition| match definition {
            query::Definition::Operation(operation) => Some(operation),
            _ => None,
        })
        .expect("No operation in document");

    let field = operation
        .selection_set()
        .items
        .iter()
        .find_map(|selection| match selection {
            query::Selection::Field(field) if field.name == field_name => Some(field),
            _ => None,
        })
        .expect("No such field");

    let root = schema
        .root_type(operation.kind())
        .expect("No root type for operation");
    let field_type = root
        .field_by_name(&field.name)
        .expect("Unknown root field")
        .field_type
        .inner_type();
    let type_def = schema.type_by_name(&field_type).expect("Unknown field type");

    let name = operation.name().expect("Operation has no name");
    let path = Path::root(name).append(field.response_name());

    collector.collect(type_def, &field.selection_set, &path)
}

/// Runs only the output model builder over `operations`.
pub fn build_output_models(
    operations: &str,
    schema: &str,
) -> Result<(TypeRegistry, Vec<OperationModel>)> {
    let schema = parse_schema(schema);
    let documents = vec![parse_document(operations)];
    let collector = FieldCollector::new(&schema, index_fragments(&documents)?);
    let reserved = Default::default();
    let skip_names = operation_skip_names(&documents, &reserved);

    let builder = OutputModelBuilder::new(&collector, &reserved, &skip_names);

    builder.build(TypeRegistry::new(), &documents)
}

pub fn analyze_with_schema(documents: &[&str], schema: &str) -> Result<DocumentModel> {
    documents
        .iter()
        .fold(
            DocumentAnalyzer::new().with_schema(parse_schema(schema)),
            |analyzer, document| analyzer.add_document(parse_document(document)),
        )
        .analyze()
}
