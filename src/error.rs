//! Error taxonomy for the schema/codegen engine.
//!
//! Four classes of failure, all returned as typed results so the batch driver
//! can aggregate a full report instead of stopping at the first bad unit:
//! - Mapping: a schema's value space has no direct Swift type
//! - Forward: a type descriptor violates a JSON:API structural invariant
//! - Reverse: a schema does not match the engine's understanding of JSON:API
//! - TestGen: test synthesis cannot bind a parameter or resolve a host

use thiserror::Error;

/// A schema kind could not be mapped to a concrete Swift type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Bare `object`, bare `array`, or a `oneOf`/`anyOf` node with
    /// placeholders disabled.
    #[error("no Swift type can be resolved for {kind} schema")]
    TypeNotResolvable {
        /// Human-readable schema kind ("object", "array", "oneOf", ...).
        kind: String,
    },
}

/// Forward synthesis (descriptor to schema) failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    /// To-many relationships can never be nullable.
    #[error("to-many relationship '{name}' cannot be nullable")]
    NullableToManyRelationship { name: String },
}

/// Reverse synthesis (schema to declarations) failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReverseError {
    /// The root schema is not object-kind.
    #[error("root schema must be an object to describe a JSON:API {context}")]
    RootNotObject { context: &'static str },

    /// No `type` property exists on the resource object schema.
    #[error("resource object schema has no 'type' discriminant property")]
    TypeDiscriminantNotFound,

    /// The `type` property enumerates zero or more than one literal value and
    /// placeholders are disabled.
    #[error("'type' discriminant does not name exactly one value (candidates: {candidates:?})")]
    TypeDiscriminantAmbiguous { candidates: Vec<String> },

    /// An attribute's schema could not be mapped and placeholders are off.
    #[error("attribute '{name}' type is unresolvable: {source}")]
    AttributeTypeUnresolvable {
        name: String,
        #[source]
        source: MappingError,
    },

    /// A `oneOf`/`anyOf` attribute with placeholders disabled.
    #[error("attribute '{name}' is polymorphic (oneOf/anyOf) and placeholders are disabled")]
    PolymorphicAttributeUnsupported { name: String },

    /// A relationship entry has no object- or array-kind `data` property.
    #[error("relationship '{name}' has no 'data' object")]
    RelationshipMissingDataObject { name: String },

    /// A to-many relationship's `data` schema is marked nullable.
    #[error("to-many relationship '{name}' cannot be nullable")]
    ToManyRelationshipCannotBeNullable { name: String },

    /// A document schema with neither `data` nor `errors`.
    #[error("document schema has neither 'data' nor 'errors'; not a JSON:API document")]
    UnhandledDocument,

    /// An `included` array schema without an `items` schema.
    #[error("'included' array schema is missing an 'items' schema")]
    IncludedMissingItems,

    /// Two generated declarations would collide on the same name with
    /// different structure.
    #[error("duplicate declaration name '{name}' with conflicting definitions")]
    DuplicateDeclaration { name: String },
}

/// Test synthesis failures. Always fatal to the one test being synthesized;
/// a silently skipped test is a worse failure mode than a build break.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TestGenError {
    /// A declared path or header parameter has no test-supplied value.
    #[error("no value given for parameter '{name}'")]
    ValueMissingForParameter { name: String },

    /// A host override that does not parse as a URL at all.
    #[error("test host override '{url}' is not a valid URL")]
    MalformedTestHostUrl { url: String },

    /// A host override URL without a scheme or host component.
    #[error("test host override '{url}' must contain a scheme and host")]
    TestHostUrlMustContainScheme { url: String },

    /// No host is available from any source (override, suite, or server).
    #[error("no server URL or host override available for test synthesis")]
    NoHostAvailable,

    /// Two tests in the same batch derived the same function name.
    #[error("duplicate test function name '{name}'")]
    DuplicateTestName { name: String },

    /// Two parameters collide to the same generated argument identifier.
    #[error("parameters collide on generated argument identifier '{name}'")]
    DuplicateArgument { name: String },

    /// A field of a test function name contains the reserved separator or is
    /// empty, which would make the name non-invertible.
    #[error("test name field '{field}' is not representable in a function name")]
    UnrepresentableNameField { field: String },

    /// A canonical test function name string that does not parse back.
    #[error("'{name}' is not a canonical test function name")]
    UnparseableTestName { name: String },
}

/// Any failure of a single (path, verb, status) generation unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error(transparent)]
    Forward(#[from] ForwardError),
    #[error(transparent)]
    Reverse(#[from] ReverseError),
    #[error(transparent)]
    TestGen(#[from] TestGenError),
}
