//! The schema transformation engine.
//!
//! Three synthesis directions over one descriptor model:
//! - `forward`: type descriptor -> JSON:API JSON Schema
//! - `reverse`: JSON Schema -> Swift declarations (plus recovered descriptor)
//! - `testgen`: example payload + path metadata -> test function declaration
//!
//! Supporting pieces:
//! - `descriptor`: the immutable resource/document value model
//! - `mapping`: schema kind -> Swift primitive type
//! - `context`: per-run deduplication state threaded through all calls

pub mod context;
pub mod descriptor;
pub mod forward;
pub mod mapping;
pub mod reverse;
pub mod testgen;

pub use context::GenerationContext;
pub use descriptor::{
    AttributeDescriptor, Cardinality, DocumentDescriptor, IdentityKind, PrimaryShape,
    RelationshipDescriptor, ResourceTypeDescriptor, SampleProvider, SchemaSamples,
};
pub use mapping::type_for;
pub use reverse::ReverseOptions;
pub use testgen::{Direction, HttpVerb, TestFunctionName};
