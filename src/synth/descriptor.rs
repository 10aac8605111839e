//! The immutable resource/document value model.
//!
//! A [`ResourceTypeDescriptor`] describes one JSON:API resource type as plain
//! data: its json type string, identity kind, attributes, and relationships.
//! Forward synthesis consumes it; reverse synthesis recovers it from a
//! schema. Sample values for example-augmented synthesis come from an
//! explicit [`SampleProvider`], never from reflection.

use serde_json::{Value, json};

use crate::schema::{SchemaKind, SchemaNode};
use crate::swift::ident::type_identifier;

/// Whether a resource carries a server-assigned `id`.
///
/// `Unidentified` is the pre-creation, client-submitted shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    Identified,
    Unidentified,
}

/// Relationship cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// One declared attribute.
///
/// `omittable` (the property may be absent) and `nullable` (the value may be
/// `null`) are independent; both survive a round trip through the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    /// Value-space schema of the raw type. A `required = false` value schema
    /// signals an inner optional, which forward synthesis lifts to
    /// nullable-and-present at the attribute boundary.
    pub value: SchemaNode,
    pub omittable: bool,
    pub nullable: bool,
}

impl AttributeDescriptor {
    pub fn new(name: &str, value: SchemaNode) -> Self {
        Self {
            name: name.to_string(),
            value,
            omittable: false,
            nullable: false,
        }
    }

    pub fn omittable(mut self) -> Self {
        self.omittable = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// One declared relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipDescriptor {
    pub name: String,
    pub cardinality: Cardinality,
    /// The related resource's raw json type string.
    pub related_json_type: String,
    pub omittable: bool,
    /// To-one only; a nullable to-many is an error, not a representable
    /// state.
    pub nullable: bool,
}

impl RelationshipDescriptor {
    pub fn to_one(name: &str, related_json_type: &str) -> Self {
        Self {
            name: name.to_string(),
            cardinality: Cardinality::ToOne,
            related_json_type: related_json_type.to_string(),
            omittable: false,
            nullable: false,
        }
    }

    pub fn to_many(name: &str, related_json_type: &str) -> Self {
        Self {
            name: name.to_string(),
            cardinality: Cardinality::ToMany,
            related_json_type: related_json_type.to_string(),
            omittable: false,
            nullable: false,
        }
    }

    pub fn omittable(mut self) -> Self {
        self.omittable = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A statically described resource shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTypeDescriptor {
    /// The json type string discriminant (e.g. `"widgets"`).
    pub json_type: String,
    pub identity: IdentityKind,
    pub attributes: Vec<AttributeDescriptor>,
    pub relationships: Vec<RelationshipDescriptor>,
}

impl ResourceTypeDescriptor {
    pub fn new(json_type: &str, identity: IdentityKind) -> Self {
        Self {
            json_type: json_type.to_string(),
            identity,
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_relationship(mut self, relationship: RelationshipDescriptor) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// The derived Swift type name. Type identity across a generation run is
    /// this identifier, not the raw json type string.
    pub fn swift_type_name(&self) -> String {
        type_identifier(&self.json_type)
    }
}

/// Primary body shape of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryShape {
    Single { nullable: bool },
    Many,
}

/// A document type: primary resource shape plus include set.
///
/// The error branch is implicit; every document schema is
/// `oneOf[success, error]` by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentDescriptor {
    pub primary: PrimaryShape,
    pub resource: ResourceTypeDescriptor,
    /// Distinct related resource shapes; each appears at most once.
    pub includes: Vec<ResourceTypeDescriptor>,
}

/// Capability for producing canonical example values.
///
/// Each domain type supplies one; forward synthesis injects it wherever it
/// needs a concrete sample.
pub trait SampleProvider {
    /// Canonical example value for one attribute of the named resource type.
    /// Returning `None` falls back to a schema-derived sample.
    fn attribute_sample(&self, json_type: &str, attribute: &AttributeDescriptor) -> Option<Value>;

    /// Canonical example id for the named resource type.
    fn id_sample(&self, _json_type: &str) -> Value {
        json!("1")
    }
}

/// Default provider: derives every sample from the attribute's schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaSamples;

impl SampleProvider for SchemaSamples {
    fn attribute_sample(&self, _json_type: &str, attribute: &AttributeDescriptor) -> Option<Value> {
        Some(sample_from_schema(&attribute.value))
    }
}

/// Canonical sample value for a schema node.
pub fn sample_from_schema(schema: &SchemaNode) -> Value {
    if let Some(first) = schema.allowed_values.first() {
        return first.clone();
    }

    match &schema.kind {
        SchemaKind::Boolean => json!(true),
        SchemaKind::Integer => json!(0),
        SchemaKind::Number => json!(0.5),
        SchemaKind::String => match schema.format.as_deref() {
            Some("date") => json!("2001-01-01"),
            Some("date-time") => json!("2001-01-01T00:00:00Z"),
            _ => json!("string"),
        },
        SchemaKind::Array(context) => match &context.items {
            Some(items) => json!([sample_from_schema(items)]),
            None => json!([]),
        },
        SchemaKind::Object(context) => {
            let mut out = serde_json::Map::new();
            for (name, property) in &context.properties {
                out.insert(name.clone(), sample_from_schema(property));
            }
            Value::Object(out)
        }
        SchemaKind::OneOf(branches) | SchemaKind::AnyOf(branches) => branches
            .first()
            .map(sample_from_schema)
            .unwrap_or(Value::Null),
        SchemaKind::Not(_) | SchemaKind::Reference(_) => Value::Null,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_swift_type_name_is_case_insensitive_identity() {
        let lower = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified);
        let upper = ResourceTypeDescriptor::new("Widgets", IdentityKind::Identified);
        assert_eq!(lower.swift_type_name(), upper.swift_type_name());
        assert_eq!(lower.swift_type_name(), "Widgets");
    }

    #[test]
    fn test_sample_from_schema_formats() {
        assert_eq!(
            sample_from_schema(&SchemaNode::string().with_format("date")),
            json!("2001-01-01")
        );
        assert_eq!(sample_from_schema(&SchemaNode::integer()), json!(0));
        assert_eq!(
            sample_from_schema(&SchemaNode::string_literal("widgets")),
            json!("widgets")
        );
    }

    #[test]
    fn test_schema_samples_provider_uses_attribute_schema() {
        let attribute = AttributeDescriptor::new("createdAt", SchemaNode::string().with_format("date-time"));
        let sample = SchemaSamples.attribute_sample("widgets", &attribute).unwrap();
        assert_eq!(sample, json!("2001-01-01T00:00:00Z"));
    }
}
