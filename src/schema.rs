//! Engine-level JSON Schema model.
//!
//! [`SchemaNode`] is the tagged union both synthesis directions operate on:
//! forward synthesis produces it from a type descriptor, reverse synthesis
//! consumes it to recover declarations. The raw serde shape from an OpenAPI
//! document ([`crate::spec::Schema`]) is converted to this model first so
//! that nullability spellings (3.0 `nullable`, 3.1 type arrays, anyOf-null)
//! all collapse to one flag.
//!
//! Two flags live on every node and are deliberately orthogonal:
//! - `required`: whether the *enclosing context* mandates this node's
//!   presence (an absent node is simply not emitted)
//! - `nullable`: whether the node's value may be `null`

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::spec;

/// The format-specific payload of a schema node.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Boolean,
    Integer,
    Number,
    String,
    Array(ArrayContext),
    Object(ObjectContext),
    /// `oneOf` union.
    OneOf(Vec<SchemaNode>),
    /// `anyOf` union.
    AnyOf(Vec<SchemaNode>),
    /// `not` negation.
    Not(Box<SchemaNode>),
    /// An unresolved `$ref`, kept as the referenced name.
    Reference(String),
}

/// Object-specific context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectContext {
    /// Property name to schema, in emission order.
    pub properties: IndexMap<String, SchemaNode>,
    /// Names of properties the object requires.
    pub required_properties: Vec<String>,
    pub min_properties: Option<usize>,
}

/// Array-specific context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayContext {
    pub items: Option<Box<SchemaNode>>,
    pub unique_items: bool,
    pub min_items: Option<usize>,
}

/// One node of a JSON Schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    /// Whether the enclosing context mandates this node.
    pub required: bool,
    /// Whether the value may be `null`.
    pub nullable: bool,
    /// Format tag (e.g. `date`, `date-time`).
    pub format: Option<String>,
    /// Literal values the node is restricted to. Used both for enums and for
    /// JSON:API's single-value `type` discriminator.
    pub allowed_values: Vec<Value>,
    /// Concrete sample payload attached to the schema.
    pub example: Option<Value>,
}

impl SchemaNode {
    /// A required, non-nullable node of the given kind.
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            required: true,
            nullable: false,
            format: None,
            allowed_values: Vec::new(),
            example: None,
        }
    }

    pub fn boolean() -> Self {
        Self::new(SchemaKind::Boolean)
    }

    pub fn integer() -> Self {
        Self::new(SchemaKind::Integer)
    }

    pub fn number() -> Self {
        Self::new(SchemaKind::Number)
    }

    pub fn string() -> Self {
        Self::new(SchemaKind::String)
    }

    pub fn object(context: ObjectContext) -> Self {
        Self::new(SchemaKind::Object(context))
    }

    pub fn array(context: ArrayContext) -> Self {
        Self::new(SchemaKind::Array(context))
    }

    /// A string schema restricted to exactly one literal value, as JSON:API
    /// uses for the `type` discriminator.
    pub fn string_literal(value: &str) -> Self {
        let mut node = Self::string();
        node.allowed_values = vec![Value::String(value.to_string())];
        node
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_string());
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Object context, if this is an object-kind node.
    pub fn as_object(&self) -> Option<&ObjectContext> {
        match &self.kind {
            SchemaKind::Object(context) => Some(context),
            _ => None,
        }
    }

    /// Array context, if this is an array-kind node.
    pub fn as_array(&self) -> Option<&ArrayContext> {
        match &self.kind {
            SchemaKind::Array(context) => Some(context),
            _ => None,
        }
    }

    /// The single allowed string value, when `allowed_values` holds exactly
    /// one string.
    pub fn single_allowed_string(&self) -> Option<&str> {
        match self.allowed_values.as_slice() {
            [Value::String(s)] => Some(s),
            _ => None,
        }
    }

    /// Human-readable kind tag, used in error messages and placeholders.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            SchemaKind::Boolean => "boolean",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::String => "string",
            SchemaKind::Array(_) => "array",
            SchemaKind::Object(_) => "object",
            SchemaKind::OneOf(_) => "oneOf",
            SchemaKind::AnyOf(_) => "anyOf",
            SchemaKind::Not(_) => "not",
            SchemaKind::Reference(_) => "reference",
        }
    }

    /// Convert a raw OpenAPI schema into the engine model.
    ///
    /// The produced node is `required = true`; callers adjust the flag from
    /// their own required-property lists.
    pub fn from_raw(raw: &spec::Schema) -> Self {
        let nullable = raw.is_nullable();

        // $ref is opaque; input is expected to be dereferenced.
        if let Some(ref_path) = &raw.ref_path {
            let name = ref_path.rsplit('/').next().unwrap_or(ref_path);
            let mut node = Self::new(SchemaKind::Reference(name.to_string()));
            node.nullable = nullable;
            return node;
        }

        if let Some(one_of) = &raw.one_of {
            let branches = one_of.iter().map(Self::from_raw).collect();
            let mut node = Self::new(SchemaKind::OneOf(branches));
            node.nullable = nullable;
            return node;
        }

        if let Some(any_of) = &raw.any_of {
            // anyOf-with-null is just a nullability spelling, not a union.
            let non_null: Vec<_> = any_of
                .iter()
                .filter(|s| !matches!(&s.schema_type, Some(spec::SchemaType::Single(t)) if t == "null"))
                .collect();
            if non_null.len() == 1 {
                let mut node = Self::from_raw(non_null[0]);
                node.nullable = node.nullable || nullable || non_null.len() != any_of.len();
                return node;
            }
            let branches = non_null.into_iter().map(Self::from_raw).collect();
            let mut node = Self::new(SchemaKind::AnyOf(branches));
            node.nullable = nullable;
            return node;
        }

        if let Some(not) = &raw.not {
            let mut node = Self::new(SchemaKind::Not(Box::new(Self::from_raw(not))));
            node.nullable = nullable;
            return node;
        }

        let type_name = match &raw.schema_type {
            Some(spec::SchemaType::Single(t)) => Some(t.as_str()),
            Some(spec::SchemaType::Multiple(types)) => {
                types.iter().map(String::as_str).find(|t| *t != "null")
            }
            None => None,
        };

        let kind = match type_name {
            Some("boolean") => SchemaKind::Boolean,
            Some("integer") => SchemaKind::Integer,
            Some("number") => SchemaKind::Number,
            Some("string") => SchemaKind::String,
            Some("array") => SchemaKind::Array(ArrayContext {
                items: raw.items.as_deref().map(|s| Box::new(Self::from_raw(s))),
                unique_items: raw.unique_items.unwrap_or(false),
                min_items: raw.min_items.map(|n| n as usize),
            }),
            Some("object") | None => SchemaKind::Object(object_context_from_raw(raw)),
            Some(_) => SchemaKind::Object(ObjectContext::default()),
        };

        let mut allowed_values: Vec<Value> = raw.enum_values.clone().unwrap_or_default();
        let had_null_literal = allowed_values.iter().any(Value::is_null);
        allowed_values.retain(|v| !v.is_null());

        Self {
            kind,
            required: true,
            nullable: nullable || had_null_literal,
            format: raw.format.clone(),
            allowed_values,
            example: raw.example.clone(),
        }
    }

    /// Serialize to a JSON Schema fragment (OpenAPI 3.0 spelling: nullability
    /// as a `nullable` flag).
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();

        match &self.kind {
            SchemaKind::Boolean => {
                out.insert("type".into(), json!("boolean"));
            }
            SchemaKind::Integer => {
                out.insert("type".into(), json!("integer"));
            }
            SchemaKind::Number => {
                out.insert("type".into(), json!("number"));
            }
            SchemaKind::String => {
                out.insert("type".into(), json!("string"));
            }
            SchemaKind::Array(context) => {
                out.insert("type".into(), json!("array"));
                if let Some(items) = &context.items {
                    out.insert("items".into(), items.to_json());
                }
                if context.unique_items {
                    out.insert("uniqueItems".into(), json!(true));
                }
                if let Some(min) = context.min_items {
                    out.insert("minItems".into(), json!(min));
                }
            }
            SchemaKind::Object(context) => {
                out.insert("type".into(), json!("object"));
                if !context.properties.is_empty() {
                    let mut properties = Map::new();
                    for (name, node) in &context.properties {
                        properties.insert(name.clone(), node.to_json());
                    }
                    out.insert("properties".into(), Value::Object(properties));
                }
                if !context.required_properties.is_empty() {
                    out.insert("required".into(), json!(context.required_properties));
                }
                if let Some(min) = context.min_properties {
                    out.insert("minProperties".into(), json!(min));
                }
            }
            SchemaKind::OneOf(branches) => {
                let rendered: Vec<_> = branches.iter().map(Self::to_json).collect();
                out.insert("oneOf".into(), Value::Array(rendered));
            }
            SchemaKind::AnyOf(branches) => {
                let rendered: Vec<_> = branches.iter().map(Self::to_json).collect();
                out.insert("anyOf".into(), Value::Array(rendered));
            }
            SchemaKind::Not(inner) => {
                out.insert("not".into(), inner.to_json());
            }
            SchemaKind::Reference(name) => {
                out.insert(
                    "$ref".into(),
                    json!(format!("#/components/schemas/{name}")),
                );
            }
        }

        if let Some(format) = &self.format {
            out.insert("format".into(), json!(format));
        }
        if !self.allowed_values.is_empty() {
            out.insert("enum".into(), Value::Array(self.allowed_values.clone()));
        }
        if self.nullable {
            out.insert("nullable".into(), json!(true));
        }
        if let Some(example) = &self.example {
            out.insert("example".into(), example.clone());
        }

        Value::Object(out)
    }
}

fn object_context_from_raw(raw: &spec::Schema) -> ObjectContext {
    let required_properties: Vec<String> = raw.required.clone().unwrap_or_default();

    let mut properties = IndexMap::new();
    if let Some(raw_properties) = &raw.properties {
        for (name, raw_property) in raw_properties {
            let mut node = SchemaNode::from_raw(raw_property);
            node.required = required_properties.iter().any(|r| r == name);
            properties.insert(name.clone(), node);
        }
    }

    ObjectContext {
        properties,
        required_properties,
        min_properties: raw.min_properties.map(|n| n as usize),
    }
}
