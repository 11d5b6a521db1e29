use super::{AnalyzerError, Result};
use crate::static_graphql::schema::{Directive, Value};

/// Schema directives the analyzer understands. Each may appear at most once per
/// annotated element and carries a single string argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownDirective {
    /// `@rename(name: String!)` on types, enum values and input fields.
    Rename,
    /// `@serializationType(name: String!)` on enum types.
    SerializationType,
    /// `@enumValue(value: String!)` on enum values.
    EnumValue,
}

impl KnownDirective {
    pub fn name(&self) -> &'static str {
        match self {
            KnownDirective::Rename => "rename",
            KnownDirective::SerializationType => "serializationType",
            KnownDirective::EnumValue => "enumValue",
        }
    }

    pub fn argument(&self) -> &'static str {
        match self {
            KnownDirective::Rename | KnownDirective::SerializationType => "name",
            KnownDirective::EnumValue => "value",
        }
    }

    /// The single instance of this directive in `directives`, if present.
    pub fn find<'d>(&self, directives: &'d [Directive], location: &str) -> Result<Option<&'d Directive>> {
        let mut found = directives.iter().filter(|d| d.name == self.name());
        let first = found.next();

        if found.next().is_some() {
            return Err(AnalyzerError::DuplicateDirective {
                directive: self.name().to_string(),
                location: location.to_string(),
            });
        }

        Ok(first)
    }

    /// The string argument of this directive, if the directive is present.
    pub fn read(&self, directives: &[Directive], location: &str) -> Result<Option<String>> {
        let Some(directive) = self.find(directives, location)? else {
            return Ok(None);
        };

        directive
            .arguments
            .iter()
            .find_map(|(name, value)| match value {
                Value::String(s) if name == self.argument() => Some(s.clone()),
                _ => None,
            })
            .map(Some)
            .ok_or_else(|| AnalyzerError::InvalidDirectiveArgument {
                directive: self.name().to_string(),
                argument: self.argument().to_string(),
                location: location.to_string(),
            })
    }
}

#[cfg(test)]
fn enum_directives(sdl: &'static str) -> Vec<Directive> {
    use crate::ast::{SchemaDocumentExtension, TypeDefinitionExtension};

    let schema = graphql_parser::parse_schema::<String>(sdl).expect("Failed to parse schema");

    schema
        .type_by_name("Color")
        .map(|t| t.directives().to_vec())
        .unwrap_or_default()
}

#[test]
fn reads_single_directive() {
    let directives = enum_directives(r#"enum Color @rename(name: "Colour") { RED }"#);

    assert_eq!(
        KnownDirective::Rename.read(&directives, "enum Color"),
        Ok(Some("Colour".to_string()))
    );
    assert_eq!(
        KnownDirective::SerializationType.read(&directives, "enum Color"),
        Ok(None)
    );
}

#[test]
fn rejects_repeated_single_valued_directive() {
    let directives =
        enum_directives(r#"enum Color @rename(name: "A") @rename(name: "B") { RED }"#);

    assert_eq!(
        KnownDirective::Rename.read(&directives, "enum Color"),
        Err(AnalyzerError::DuplicateDirective {
            directive: "rename".to_string(),
            location: "enum Color".to_string(),
        })
    );
}

#[test]
fn rejects_missing_argument() {
    let directives = enum_directives(r#"enum Color @serializationType(type: "Int") { RED }"#);

    assert_eq!(
        KnownDirective::SerializationType.read(&directives, "enum Color"),
        Err(AnalyzerError::InvalidDirectiveArgument {
            directive: "serializationType".to_string(),
            argument: "name".to_string(),
            location: "enum Color".to_string(),
        })
    );
}
