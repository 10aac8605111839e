//! Forward schema synthesis: type descriptor to JSON:API JSON Schema.
//!
//! Produces the canonical schema fragments for a resource object, a
//! relationship object, and a whole document envelope. The document schema
//! is always `oneOf[success, error]`; the two branches never share a
//! required top-level key.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use crate::error::ForwardError;
use crate::synth::descriptor::{
    AttributeDescriptor, Cardinality, DocumentDescriptor, IdentityKind, PrimaryShape,
    RelationshipDescriptor, ResourceTypeDescriptor, SampleProvider, sample_from_schema,
};
use crate::schema::{ArrayContext, ObjectContext, SchemaNode};

/// Synthesize the schema for one attribute value.
///
/// Nullability-lift rule: an attribute whose raw value type signals its own
/// omittability at a deeper layer (`required = false` on the value schema)
/// collapses outward into nullable-and-present at the attribute boundary,
/// never into "sometimes absent".
pub fn attribute_schema(attribute: &AttributeDescriptor) -> SchemaNode {
    let mut node = attribute.value.clone();

    if !node.required {
        node.required = true;
        node.nullable = true;
    }
    if attribute.nullable {
        node.nullable = true;
    }
    node.required = !attribute.omittable;

    node
}

/// Synthesize the `{"data": ...}` schema for one relationship.
///
/// To-one data is `{id, type}` with the type pinned to a single allowed
/// value, nullable iff the relationship is. To-many data is always an array
/// of that shape and can never be nullable.
pub fn relationship_schema(
    relationship: &RelationshipDescriptor,
) -> Result<SchemaNode, ForwardError> {
    let identifier = resource_identifier_schema(&relationship.related_json_type);

    let data = match relationship.cardinality {
        Cardinality::ToOne => {
            let mut node = identifier;
            node.nullable = relationship.nullable;
            node
        }
        Cardinality::ToMany => {
            if relationship.nullable {
                return Err(ForwardError::NullableToManyRelationship {
                    name: relationship.name.clone(),
                });
            }
            SchemaNode::array(ArrayContext {
                items: Some(Box::new(identifier)),
                ..ArrayContext::default()
            })
        }
    };

    let mut properties = IndexMap::new();
    properties.insert("data".to_string(), data);

    let mut node = SchemaNode::object(ObjectContext {
        properties,
        required_properties: vec!["data".to_string()],
        min_properties: Some(1),
    });
    node.required = !relationship.omittable;
    Ok(node)
}

/// The `{id, type}` resource identifier schema for a json type.
fn resource_identifier_schema(json_type: &str) -> SchemaNode {
    let mut properties = IndexMap::new();
    properties.insert("id".to_string(), SchemaNode::string());
    properties.insert("type".to_string(), SchemaNode::string_literal(json_type));

    SchemaNode::object(ObjectContext {
        properties,
        required_properties: vec!["id".to_string(), "type".to_string()],
        min_properties: Some(2),
    })
}

/// Synthesize the canonical resource object schema for a descriptor.
///
/// `minProperties` counts the always-present top-level keys. `id` appears
/// iff the identity kind is not the unidentified sentinel; `attributes` and
/// `relationships` appear iff declared.
pub fn resource_schema(descriptor: &ResourceTypeDescriptor) -> Result<SchemaNode, ForwardError> {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();

    properties.insert(
        "type".to_string(),
        SchemaNode::string_literal(&descriptor.json_type),
    );
    required.push("type".to_string());

    if descriptor.identity == IdentityKind::Identified {
        properties.insert("id".to_string(), SchemaNode::string());
        required.push("id".to_string());
    }

    if !descriptor.attributes.is_empty() {
        let mut attribute_properties = IndexMap::new();
        let mut attribute_required = Vec::new();
        for attribute in &descriptor.attributes {
            let node = attribute_schema(attribute);
            if node.required {
                attribute_required.push(attribute.name.clone());
            }
            attribute_properties.insert(attribute.name.clone(), node);
        }
        let min = attribute_required.len();
        properties.insert(
            "attributes".to_string(),
            SchemaNode::object(ObjectContext {
                properties: attribute_properties,
                required_properties: attribute_required,
                min_properties: Some(min),
            }),
        );
        required.push("attributes".to_string());
    }

    if !descriptor.relationships.is_empty() {
        let mut relationship_properties = IndexMap::new();
        let mut relationship_required = Vec::new();
        for relationship in &descriptor.relationships {
            let node = relationship_schema(relationship)?;
            if node.required {
                relationship_required.push(relationship.name.clone());
            }
            relationship_properties.insert(relationship.name.clone(), node);
        }
        let min = relationship_required.len();
        properties.insert(
            "relationships".to_string(),
            SchemaNode::object(ObjectContext {
                properties: relationship_properties,
                required_properties: relationship_required,
                min_properties: Some(min),
            }),
        );
        required.push("relationships".to_string());
    }

    let min = required.len();
    Ok(SchemaNode::object(ObjectContext {
        properties,
        required_properties: required,
        min_properties: Some(min),
    }))
}

/// Synthesize a resource schema with a concrete sample payload attached as
/// the schema's `example`, its `minProperties`/required set recomputed from
/// the sample's concrete shape for contract round-trip testing.
pub fn resource_schema_with_example(
    descriptor: &ResourceTypeDescriptor,
    samples: &dyn SampleProvider,
) -> Result<SchemaNode, ForwardError> {
    let mut node = resource_schema(descriptor)?;
    let sample = resource_sample(descriptor, samples);

    if let (Value::Object(sample_keys), crate::schema::SchemaKind::Object(context)) =
        (&sample, &mut node.kind)
    {
        context.min_properties = Some(sample_keys.len());
        context.required_properties = sample_keys.keys().cloned().collect();
    }

    node.example = Some(sample);
    Ok(node)
}

/// Build a concrete sample resource payload from the provider.
pub fn resource_sample(
    descriptor: &ResourceTypeDescriptor,
    samples: &dyn SampleProvider,
) -> Value {
    let mut out = Map::new();
    out.insert("type".to_string(), json!(descriptor.json_type));
    if descriptor.identity == IdentityKind::Identified {
        out.insert("id".to_string(), samples.id_sample(&descriptor.json_type));
    }

    if !descriptor.attributes.is_empty() {
        let mut attributes = Map::new();
        for attribute in &descriptor.attributes {
            let value = samples
                .attribute_sample(&descriptor.json_type, attribute)
                .unwrap_or_else(|| sample_from_schema(&attribute.value));
            attributes.insert(attribute.name.clone(), value);
        }
        out.insert("attributes".to_string(), Value::Object(attributes));
    }

    if !descriptor.relationships.is_empty() {
        let mut relationships = Map::new();
        for relationship in &descriptor.relationships {
            let identifier = json!({
                "id": "1",
                "type": relationship.related_json_type,
            });
            let data = match relationship.cardinality {
                Cardinality::ToOne => identifier,
                Cardinality::ToMany => json!([identifier]),
            };
            relationships.insert(relationship.name.clone(), json!({ "data": data }));
        }
        out.insert("relationships".to_string(), Value::Object(relationships));
    }

    Value::Object(out)
}

/// The flat error payload schema used for the error branch.
fn error_payload_schema() -> SchemaNode {
    let mut properties = IndexMap::new();
    for name in ["id", "status", "code", "title", "detail"] {
        properties.insert(name.to_string(), SchemaNode::string().optional());
    }
    SchemaNode::object(ObjectContext {
        properties,
        required_properties: Vec::new(),
        min_properties: None,
    })
}

/// Synthesize a whole document schema: `oneOf[success, error]`.
///
/// Include-count degeneracy: an empty include set omits the `included` key
/// entirely; one include type is the bare type; N are an N-ary `oneOf`.
/// `included` arrays always carry `uniqueItems`.
pub fn document_schema(document: &DocumentDescriptor) -> Result<SchemaNode, ForwardError> {
    let resource = resource_schema(&document.resource)?;

    let data = match document.primary {
        PrimaryShape::Single { nullable } => {
            let mut node = resource;
            node.nullable = nullable;
            node
        }
        PrimaryShape::Many => SchemaNode::array(ArrayContext {
            items: Some(Box::new(resource)),
            ..ArrayContext::default()
        }),
    };

    let mut success_properties = IndexMap::new();
    success_properties.insert("data".to_string(), data);

    if !document.includes.is_empty() {
        let mut include_schemas = Vec::new();
        for include in &document.includes {
            include_schemas.push(resource_schema(include)?);
        }
        let items = if include_schemas.len() == 1 {
            include_schemas.remove(0)
        } else {
            SchemaNode::new(crate::schema::SchemaKind::OneOf(include_schemas))
        };
        let mut included = SchemaNode::array(ArrayContext {
            items: Some(Box::new(items)),
            unique_items: true,
            min_items: None,
        });
        included.required = false;
        success_properties.insert("included".to_string(), included);
    }

    let success = SchemaNode::object(ObjectContext {
        properties: success_properties,
        required_properties: vec!["data".to_string()],
        min_properties: Some(1),
    });

    let mut error_properties = IndexMap::new();
    error_properties.insert(
        "errors".to_string(),
        SchemaNode::array(ArrayContext {
            items: Some(Box::new(error_payload_schema())),
            ..ArrayContext::default()
        }),
    );
    let error = SchemaNode::object(ObjectContext {
        properties: error_properties,
        required_properties: vec!["errors".to_string()],
        min_properties: Some(1),
    });

    Ok(SchemaNode::new(crate::schema::SchemaKind::OneOf(vec![
        success, error,
    ])))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::synth::descriptor::SchemaSamples;
    use crate::schema::SchemaKind;

    fn widgets() -> ResourceTypeDescriptor {
        ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new("productName", SchemaNode::string()))
            .with_relationship(RelationshipDescriptor::to_many("subcomponents", "widgets"))
    }

    #[test]
    fn test_minimal_resource_scenario() {
        let schema = resource_schema(&widgets()).unwrap();
        let root = schema.as_object().unwrap();

        // id, type, attributes, relationships all required
        assert_eq!(root.min_properties, Some(4));
        assert_eq!(
            schema.as_object().unwrap().properties["type"].single_allowed_string(),
            Some("widgets")
        );

        let attributes = root.properties["attributes"].as_object().unwrap();
        assert_eq!(attributes.min_properties, Some(1));
        assert_eq!(attributes.required_properties, vec!["productName".to_string()]);
    }

    #[test]
    fn test_relationships_key_only_when_declared() {
        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new("productName", SchemaNode::string()));
        let schema = resource_schema(&descriptor).unwrap();
        let root = schema.as_object().unwrap();
        assert!(!root.properties.contains_key("relationships"));
        assert_eq!(root.min_properties, Some(3));
    }

    #[test]
    fn test_unidentified_resource_has_no_id() {
        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Unidentified);
        let schema = resource_schema(&descriptor).unwrap();
        assert!(!schema.as_object().unwrap().properties.contains_key("id"));
    }

    #[test]
    fn test_omittable_nullable_grid() {
        // (omittable, nullable) -> (required, nullable) on the emitted node
        let cases = [
            (false, false, true, false),
            (false, true, true, true),
            (true, false, false, false),
            (true, true, false, true),
        ];
        for (omittable, nullable, want_required, want_nullable) in cases {
            let mut attribute = AttributeDescriptor::new("a", SchemaNode::string());
            attribute.omittable = omittable;
            attribute.nullable = nullable;
            let node = attribute_schema(&attribute);
            assert_eq!(node.required, want_required, "omittable={omittable} nullable={nullable}");
            assert_eq!(node.nullable, want_nullable, "omittable={omittable} nullable={nullable}");
        }
    }

    #[test]
    fn test_nullability_lift_rule() {
        // An inner-optional value collapses to nullable-and-present.
        let attribute = AttributeDescriptor::new("derived", SchemaNode::string().optional());
        let node = attribute_schema(&attribute);
        assert!(node.required);
        assert!(node.nullable);
    }

    #[test]
    fn test_to_one_nullable_relationship() {
        let relationship = RelationshipDescriptor::to_one("parent", "widgets").nullable();
        let node = relationship_schema(&relationship).unwrap();
        let data = &node.as_object().unwrap().properties["data"];
        assert!(data.nullable);
        assert_eq!(
            data.as_object().unwrap().properties["type"].single_allowed_string(),
            Some("widgets")
        );
    }

    #[test]
    fn test_nullable_to_many_is_an_error() {
        let relationship = RelationshipDescriptor::to_many("subcomponents", "widgets").nullable();
        assert_eq!(
            relationship_schema(&relationship),
            Err(ForwardError::NullableToManyRelationship {
                name: "subcomponents".to_string()
            })
        );
    }

    #[test]
    fn test_document_is_union_of_success_and_error() {
        let document = DocumentDescriptor {
            primary: PrimaryShape::Single { nullable: false },
            resource: widgets(),
            includes: Vec::new(),
        };
        let schema = document_schema(&document).unwrap();
        let SchemaKind::OneOf(branches) = &schema.kind else {
            panic!("expected oneOf, got {:?}", schema.kind_name());
        };
        assert_eq!(branches.len(), 2);

        let success = branches[0].as_object().unwrap();
        let error = branches[1].as_object().unwrap();
        assert_eq!(success.required_properties, vec!["data".to_string()]);
        assert_eq!(error.required_properties, vec!["errors".to_string()]);
        // Success and error branches never share a required top-level key.
        assert!(!success.properties.contains_key("errors"));
        assert!(!error.properties.contains_key("data"));
        // Include set of size zero omits the included key entirely.
        assert!(!success.properties.contains_key("included"));
    }

    #[test]
    fn test_include_count_degeneracy() {
        let other = ResourceTypeDescriptor::new("gadgets", IdentityKind::Identified);
        let third = ResourceTypeDescriptor::new("gizmos", IdentityKind::Identified);

        // One include type: the bare type, uniqueItems on the array.
        let document = DocumentDescriptor {
            primary: PrimaryShape::Many,
            resource: widgets(),
            includes: vec![other.clone()],
        };
        let schema = document_schema(&document).unwrap();
        let SchemaKind::OneOf(branches) = &schema.kind else {
            panic!("expected oneOf");
        };
        let included = &branches[0].as_object().unwrap().properties["included"];
        let array = included.as_array().unwrap();
        assert!(array.unique_items);
        let items = array.items.as_deref().unwrap();
        assert!(items.as_object().is_some());

        // N > 1 include types: an N-ary union.
        let document = DocumentDescriptor {
            primary: PrimaryShape::Many,
            resource: widgets(),
            includes: vec![other, third],
        };
        let schema = document_schema(&document).unwrap();
        let SchemaKind::OneOf(branches) = &schema.kind else {
            panic!("expected oneOf");
        };
        let included = &branches[0].as_object().unwrap().properties["included"];
        let items = included.as_array().unwrap().items.as_deref().unwrap();
        match &items.kind {
            SchemaKind::OneOf(include_branches) => assert_eq!(include_branches.len(), 2),
            other => panic!("expected oneOf items, got {other:?}"),
        }
    }

    #[test]
    fn test_example_augmented_schema() {
        let schema = resource_schema_with_example(&widgets(), &SchemaSamples).unwrap();
        let example = schema.example.as_ref().unwrap();
        assert_eq!(example["type"], "widgets");
        assert_eq!(example["attributes"]["productName"], "string");
        assert_eq!(example["relationships"]["subcomponents"]["data"][0]["type"], "widgets");

        // minProperties recomputed from the sample's concrete shape.
        let root = schema.as_object().unwrap();
        assert_eq!(root.min_properties, Some(4));
    }
}
