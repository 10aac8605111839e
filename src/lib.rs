//! Bidirectional JSON:API schema synthesis and Swift code generation.
//!
//! The crate turns a dereferenced OpenAPI document into two artifacts:
//! - a JSON:API-shaped JSON Schema for each resource/document type
//!   (forward synthesis, from a [`synth::ResourceTypeDescriptor`])
//! - Swift type declarations and example-bound test functions recovered
//!   from each response/request schema (reverse synthesis)
//!
//! [`batch::generate`] drives the whole run: it walks every
//! (path, verb, status) unit, recovers declarations into a shared
//! [`synth::GenerationContext`], synthesizes one test per example, and
//! collects per-unit failures without aborting siblings.

pub mod batch;
pub mod error;
pub mod schema;
pub mod spec;
pub mod swift;
pub mod synth;

pub use batch::{BatchOutput, GeneratorOptions, UnitFailure, generate};
pub use error::{ForwardError, MappingError, ReverseError, TestGenError, UnitError};
pub use schema::{SchemaKind, SchemaNode};
pub use spec::OpenApiDocument;
pub use synth::{GenerationContext, ResourceTypeDescriptor};
