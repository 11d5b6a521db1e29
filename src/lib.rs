//! graphql-codegen-analyzer
//! ========================
//!
//! Static analysis of client GraphQL documents against a schema. The result is a
//! [`DocumentModel`](model::DocumentModel) describing the shape of every possible
//! response, including one variant per concrete type behind interfaces and unions.
//! Inputs are `Document`s produced by the `graphql_parser` crate.
//!

pub mod ast;

pub mod static_graphql {
    macro_rules! static_graphql {
    ($m:ident, $m2:ident, {$($n:ident,)*}) => {
        pub mod $m {
            use graphql_parser::$m2 as $m;
            pub use $m::*;
            $(
                pub type $n = $m::$n<'static, String>;
            )*
        }
    };
  }

    static_graphql!(query, query, {
      Document, Value, OperationDefinition, InlineFragment, TypeCondition,
      FragmentSpread, Field, Selection, SelectionSet, FragmentDefinition,
      Directive, VariableDefinition, Type, Query, Definition, Subscription, Mutation,
    });
    static_graphql!(schema, schema, {
      Field, Directive, InterfaceType, ObjectType, Value, TypeDefinition,
      EnumType, Type, Document, ScalarType, InputValue, DirectiveDefinition,
      UnionType, InputObjectType, EnumValue, SchemaDefinition, Definition,
    });
}

pub mod model;

pub mod analyzer;

pub use analyzer::{AnalyzerError, DocumentAnalyzer, Result};
pub use model::DocumentModel;
