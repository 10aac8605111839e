//! OpenAPI specification structs for serde deserialization.
//!
//! A minimal subset of the OpenAPI 3.x document model: just enough of paths,
//! operations, parameters, responses, examples, and servers to drive JSON:API
//! schema recovery and test synthesis. The document is expected to be fully
//! dereferenced before it reaches this crate; `$ref` is parsed but treated as
//! an opaque name.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Root OpenAPI document.
#[derive(Debug, Deserialize)]
pub struct OpenApiDocument {
    #[serde(default)]
    pub servers: Vec<Server>,
    pub paths: BTreeMap<String, PathItem>,
}

/// A server entry; only the URL matters here.
#[derive(Debug, Deserialize)]
pub struct Server {
    pub url: String,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
    /// Path-level parameters shared by all operations.
    pub parameters: Option<Vec<Parameter>>,
}

/// An API operation (endpoint).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub parameters: Option<Vec<Parameter>>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
}

/// A parameter (query, path, or header).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
}

/// A request body definition.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    pub content: Option<HashMap<String, MediaType>>,
}

/// A response definition, including the `x-tests` vendor extension.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub content: Option<HashMap<String, MediaType>>,
    /// Structured test-case overrides, keyed by test name.
    #[serde(rename = "x-tests", default)]
    pub x_tests: BTreeMap<String, TestOverride>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    pub schema: Option<Schema>,
    /// Single default example payload.
    pub example: Option<serde_json::Value>,
    /// Named example payloads.
    pub examples: Option<BTreeMap<String, ExampleObject>>,
}

impl MediaType {
    /// All example payloads on this media type: the default example under the
    /// `"default"` slug plus every named example.
    pub fn example_payloads(&self) -> Vec<(String, &serde_json::Value)> {
        let mut out = Vec::new();
        if let Some(example) = &self.example {
            out.push(("default".to_string(), example));
        }
        if let Some(named) = &self.examples {
            for (name, ex) in named {
                if let Some(value) = &ex.value {
                    out.push((name.clone(), value));
                }
            }
        }
        out
    }
}

/// A named example wrapper.
#[derive(Debug, Deserialize)]
pub struct ExampleObject {
    pub value: Option<serde_json::Value>,
}

/// Per-test overrides supplied via the `x-tests` vendor extension.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestOverride {
    /// Host to target instead of the OpenAPI server URL.
    pub test_host: Option<String>,
    /// Assert the response parses as the expected type without comparing it
    /// against the example payload.
    #[serde(default)]
    pub skip_example: bool,
    #[serde(default)]
    pub ignore_missing_parameter_warnings: bool,
    /// Concrete values for path and header parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
    /// Extra query parameters appended to the request.
    #[serde(default)]
    pub query_parameters: Vec<QueryParameterOverride>,
}

/// One query parameter name/value pair from `x-tests`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryParameterOverride {
    pub name: String,
    pub value: String,
}

/// JSON Schema definition as it appears in an OpenAPI document.
///
/// This is the raw serde shape; the engine converts it to
/// [`crate::schema::SchemaNode`] before doing anything with it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object,
    /// array) or an array of types for 3.1-style nullability.
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema (left opaque; input should be
    /// dereferenced).
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in document order.
    pub properties: Option<indexmap::IndexMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Minimum number of properties for object types.
    pub min_properties: Option<u64>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Whether array items must be unique.
    pub unique_items: Option<bool>,

    /// Minimum items for arrays.
    pub min_items: Option<u64>,

    /// Enum values (strings, numbers, booleans, or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Union type (any of these schemas).
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<Schema>>,

    /// Negation.
    pub not: Option<Box<Schema>>,

    /// Format hint (e.g., date, date-time).
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,

    /// Example payload attached to the schema.
    pub example: Option<serde_json::Value>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl OpenApiDocument {
    /// Parse an OpenAPI document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Schema {
    /// Check if this schema is nullable (nullable flag, null in a type
    /// array, or an anyOf branch of type null).
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }

        if let Some(any_of) = &self.any_of {
            for schema in any_of {
                if let Some(SchemaType::Single(t)) = &schema.schema_type
                    && t == "null"
                {
                    return true;
                }
            }
        }

        if let Some(SchemaType::Multiple(types)) = &self.schema_type
            && types.iter().any(|t| t == "null")
        {
            return true;
        }

        false
    }
}
