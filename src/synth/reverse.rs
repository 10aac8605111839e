//! Reverse schema synthesis: JSON:API JSON Schema to Swift declarations.
//!
//! Recovery runs a fixed pipeline per resource schema: validate the root,
//! recover the type discriminant, resolve attributes, resolve relationships,
//! then emit. A failure at any step aborts only that one resource; the batch
//! driver collects per-unit failures and continues.

use tracing::debug;

use crate::error::ReverseError;
use crate::synth::context::GenerationContext;
use crate::synth::descriptor::{
    AttributeDescriptor, Cardinality, IdentityKind, RelationshipDescriptor, ResourceTypeDescriptor,
};
use crate::synth::mapping::{self, type_for};
use crate::schema::{SchemaKind, SchemaNode};
use crate::swift::decl::{BlockKind, Decl, Expr, SwiftTypeRef};
use crate::swift::ident::{member_identifier, type_identifier};

/// Knobs for one reverse-synthesis run.
#[derive(Debug, Clone, Copy)]
pub struct ReverseOptions {
    /// Degrade unresolvable types to editor placeholders instead of failing.
    pub allow_placeholders: bool,
}

impl Default for ReverseOptions {
    fn default() -> Self {
        Self {
            allow_placeholders: true,
        }
    }
}

/// A recovered resource shape.
///
/// `type_name_candidates` is non-empty only when the `type` discriminant did
/// not name exactly one value and placeholders are enabled; the descriptor's
/// json type is then empty and emission substitutes a fresh placeholder name.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovery {
    pub descriptor: ResourceTypeDescriptor,
    pub type_name_candidates: Vec<String>,
}

/// Recover a [`ResourceTypeDescriptor`] from a resource object schema.
pub fn recover_resource(
    schema: &SchemaNode,
    options: &ReverseOptions,
) -> Result<Recovery, ReverseError> {
    let root = schema.as_object().ok_or(ReverseError::RootNotObject {
        context: "resource object",
    })?;

    let (json_type, candidates) = recover_type_discriminant(schema, options)?;

    let identity = if root.properties.contains_key("id") {
        IdentityKind::Identified
    } else {
        IdentityKind::Unidentified
    };

    let mut descriptor = ResourceTypeDescriptor::new(&json_type, identity);

    if let Some(attributes) = root.properties.get("attributes") {
        if let Some(context) = attributes.as_object() {
            let mut names: Vec<&String> = context.properties.keys().collect();
            names.sort();
            for name in names {
                let node = &context.properties[name];
                let mut value = node.clone();
                value.required = true;
                value.nullable = false;
                let mut attribute = AttributeDescriptor::new(name, value);
                attribute.omittable = !node.required;
                attribute.nullable = node.nullable;
                descriptor.attributes.push(attribute);
            }
        }
    }

    if let Some(relationships) = root.properties.get("relationships") {
        if let Some(context) = relationships.as_object() {
            let mut names: Vec<&String> = context.properties.keys().collect();
            names.sort();
            for name in names {
                let node = &context.properties[name];
                let mut relationship = recover_relationship(name, node)?;
                relationship.omittable = !node.required;
                descriptor.relationships.push(relationship);
            }
        }
    }

    Ok(Recovery {
        descriptor,
        type_name_candidates: candidates,
    })
}

/// Read the `type` property's single allowed literal. Zero or many candidates
/// degrade to a placeholder name (candidates kept for documentation) or fail.
fn recover_type_discriminant(
    schema: &SchemaNode,
    options: &ReverseOptions,
) -> Result<(String, Vec<String>), ReverseError> {
    let root = schema.as_object().ok_or(ReverseError::RootNotObject {
        context: "resource object",
    })?;
    let discriminant = root
        .properties
        .get("type")
        .ok_or(ReverseError::TypeDiscriminantNotFound)?;

    if let Some(value) = discriminant.single_allowed_string() {
        return Ok((value.to_string(), Vec::new()));
    }

    let candidates: Vec<String> = discriminant
        .allowed_values
        .iter()
        .filter_map(|v| v.as_str().map(ToString::to_string))
        .collect();

    if options.allow_placeholders {
        Ok((String::new(), candidates))
    } else {
        Err(ReverseError::TypeDiscriminantAmbiguous { candidates })
    }
}

/// Recover one relationship from its `{"data": ...}` wrapper schema.
fn recover_relationship(
    name: &str,
    wrapper: &SchemaNode,
) -> Result<RelationshipDescriptor, ReverseError> {
    let data = wrapper
        .as_object()
        .and_then(|context| context.properties.get("data"))
        .ok_or_else(|| ReverseError::RelationshipMissingDataObject {
            name: name.to_string(),
        })?;

    match &data.kind {
        SchemaKind::Object(_) => {
            let related = related_type_name(name, data)?;
            let mut relationship = RelationshipDescriptor::to_one(name, &related);
            relationship.nullable = data.nullable;
            Ok(relationship)
        }
        SchemaKind::Array(context) => {
            if data.nullable {
                return Err(ReverseError::ToManyRelationshipCannotBeNullable {
                    name: name.to_string(),
                });
            }
            let items = context.items.as_deref().ok_or_else(|| {
                ReverseError::RelationshipMissingDataObject {
                    name: name.to_string(),
                }
            })?;
            let related = related_type_name(name, items)?;
            Ok(RelationshipDescriptor::to_many(name, &related))
        }
        _ => Err(ReverseError::RelationshipMissingDataObject {
            name: name.to_string(),
        }),
    }
}

/// The related resource's json type, read from a resource identifier schema.
fn related_type_name(name: &str, identifier: &SchemaNode) -> Result<String, ReverseError> {
    let discriminant = identifier
        .as_object()
        .and_then(|context| context.properties.get("type"))
        .ok_or_else(|| ReverseError::RelationshipMissingDataObject {
            name: name.to_string(),
        })?;
    match discriminant.single_allowed_string() {
        Some(value) => Ok(value.to_string()),
        None => Err(ReverseError::TypeDiscriminantAmbiguous {
            candidates: discriminant
                .allowed_values
                .iter()
                .filter_map(|v| v.as_str().map(ToString::to_string))
                .collect(),
        }),
    }
}

/// Recover a resource schema and register its declarations, returning the
/// generated Swift type name.
///
/// Structurally identical re-registrations deduplicate; conflicting ones are
/// a hard error. Every relationship target is noted on the context so the
/// run can finalize stubs for types defined outside this generation scope.
pub fn resource_declarations(
    schema: &SchemaNode,
    ctx: &mut GenerationContext,
    options: &ReverseOptions,
) -> Result<String, ReverseError> {
    let recovery = recover_resource(schema, options)?;
    let descriptor = &recovery.descriptor;

    let type_name = if recovery.type_name_candidates.is_empty() && !descriptor.json_type.is_empty()
    {
        descriptor.swift_type_name()
    } else {
        ctx.placeholder_type_name()
    };
    debug!(%type_name, json_type = %descriptor.json_type, "recovered resource");

    let description_name = format!("{type_name}Description");
    let mut members = Vec::new();

    if recovery.type_name_candidates.is_empty() {
        members.push(Decl::static_property(
            "jsonType",
            SwiftTypeRef::named("String"),
            Expr::str(&descriptor.json_type),
        ));
    } else {
        // Keep the candidate names visible where the developer must decide.
        members.push(Decl::Raw(format!(
            "// json type candidates: {}",
            recovery.type_name_candidates.join(", ")
        )));
        members.push(Decl::static_property(
            "jsonType",
            SwiftTypeRef::named("String"),
            Expr::Raw("<#T##jsonType: String#>".to_string()),
        ));
    }

    members.push(attributes_member(descriptor, ctx, options)?);
    members.push(relationships_member(descriptor, ctx));

    let description = Decl::block(
        BlockKind::Enum,
        &description_name,
        &["JSONAPI.ResourceObjectDescription"],
        members,
    );

    let identity_arg = match descriptor.identity {
        IdentityKind::Identified => SwiftTypeRef::named("String"),
        IdentityKind::Unidentified => SwiftTypeRef::named("Unidentified"),
    };
    let alias = Decl::typealias(
        &type_name,
        SwiftTypeRef::generic(
            "JSONAPI.ResourceObject",
            vec![
                SwiftTypeRef::named(&description_name),
                SwiftTypeRef::named("NoMetadata"),
                SwiftTypeRef::named("NoLinks"),
                identity_arg,
            ],
        ),
    );

    ctx.insert_declaration(description)?;
    ctx.insert_declaration(alias)?;

    for relationship in &descriptor.relationships {
        ctx.note_relationship_target(&relationship.related_json_type);
    }

    Ok(type_name)
}

/// The nested `Attributes` member: a struct when attributes exist, an alias
/// to the empty sentinel otherwise.
fn attributes_member(
    descriptor: &ResourceTypeDescriptor,
    ctx: &mut GenerationContext,
    options: &ReverseOptions,
) -> Result<Decl, ReverseError> {
    if descriptor.attributes.is_empty() {
        return Ok(Decl::typealias(
            "Attributes",
            SwiftTypeRef::named("NoAttributes"),
        ));
    }

    let mut properties = Vec::new();
    for attribute in &descriptor.attributes {
        let mut value_type = attribute_value_type(attribute, ctx, options)?;
        if attribute.nullable {
            value_type = value_type.optional();
        }
        let mut wrapped = SwiftTypeRef::generic("Attribute", vec![value_type]);
        if attribute.omittable {
            wrapped = wrapped.optional();
        }
        properties.push(Decl::let_property(
            &member_identifier(&attribute.name),
            wrapped,
        ));
    }

    Ok(Decl::block(
        BlockKind::Struct,
        "Attributes",
        &["JSONAPI.Attributes"],
        properties,
    ))
}

/// Resolve one attribute's value type, recursively synthesizing named
/// structures for object-kind schemas and arrays of them.
fn attribute_value_type(
    attribute: &AttributeDescriptor,
    ctx: &mut GenerationContext,
    options: &ReverseOptions,
) -> Result<SwiftTypeRef, ReverseError> {
    match &attribute.value.kind {
        SchemaKind::Object(_) => {
            nested_structure(&attribute.name, &attribute.value, ctx, options)
        }
        SchemaKind::Array(context) => match context.items.as_deref() {
            Some(items) if items.as_object().is_some() => {
                Ok(nested_structure(&attribute.name, items, ctx, options)?.array_of())
            }
            _ => map_attribute_type(attribute, options),
        },
        SchemaKind::OneOf(_) | SchemaKind::AnyOf(_) => {
            if options.allow_placeholders {
                Ok(SwiftTypeRef::placeholder(&format!(
                    "{} ({} schema)",
                    mapping::PLACEHOLDER_HINT,
                    attribute.value.kind_name()
                )))
            } else {
                Err(ReverseError::PolymorphicAttributeUnsupported {
                    name: attribute.name.clone(),
                })
            }
        }
        _ => map_attribute_type(attribute, options),
    }
}

fn map_attribute_type(
    attribute: &AttributeDescriptor,
    options: &ReverseOptions,
) -> Result<SwiftTypeRef, ReverseError> {
    type_for(&attribute.value, options.allow_placeholders).map_err(|source| {
        ReverseError::AttributeTypeUnresolvable {
            name: attribute.name.clone(),
            source,
        }
    })
}

/// Synthesize a named plain-Codable structure for a nested object schema and
/// register it globally, returning a reference to it.
///
/// Nested properties are plain types; absence and null both surface as Swift
/// optionality at this depth.
fn nested_structure(
    name: &str,
    schema: &SchemaNode,
    ctx: &mut GenerationContext,
    options: &ReverseOptions,
) -> Result<SwiftTypeRef, ReverseError> {
    let struct_name = type_identifier(name);
    let context = schema.as_object().ok_or(ReverseError::RootNotObject {
        context: "nested attribute structure",
    })?;

    let mut names: Vec<&String> = context.properties.keys().collect();
    names.sort();

    let mut properties = Vec::new();
    for property_name in names {
        let property = &context.properties[property_name];
        let mut property_type = match &property.kind {
            SchemaKind::Object(_) => nested_structure(property_name, property, ctx, options)?,
            SchemaKind::Array(array) => match array.items.as_deref() {
                Some(items) if items.as_object().is_some() => {
                    nested_structure(property_name, items, ctx, options)?.array_of()
                }
                _ => plain_type(property_name, property, options)?,
            },
            _ => plain_type(property_name, property, options)?,
        };
        if !property.required || property.nullable {
            property_type = property_type.optional();
        }
        properties.push(Decl::let_property(
            &member_identifier(property_name),
            property_type,
        ));
    }

    ctx.insert_declaration(Decl::block(
        BlockKind::Struct,
        &struct_name,
        &["Codable", "Equatable"],
        properties,
    ))?;

    Ok(SwiftTypeRef::Named(struct_name))
}

fn plain_type(
    name: &str,
    schema: &SchemaNode,
    options: &ReverseOptions,
) -> Result<SwiftTypeRef, ReverseError> {
    type_for(schema, options.allow_placeholders).map_err(|source| {
        ReverseError::AttributeTypeUnresolvable {
            name: name.to_string(),
            source,
        }
    })
}

/// The nested `Relationships` member.
fn relationships_member(descriptor: &ResourceTypeDescriptor, ctx: &mut GenerationContext) -> Decl {
    if descriptor.relationships.is_empty() {
        return Decl::typealias("Relationships", SwiftTypeRef::named("NoRelationships"));
    }

    let mut properties = Vec::new();
    for relationship in &descriptor.relationships {
        ctx.note_relationship_target(&relationship.related_json_type);
        let target = SwiftTypeRef::Named(type_identifier(&relationship.related_json_type));
        let mut wrapped = match relationship.cardinality {
            Cardinality::ToOne => {
                let arg = if relationship.nullable {
                    target.optional()
                } else {
                    target
                };
                SwiftTypeRef::generic("ToOneRelationship", vec![arg])
            }
            Cardinality::ToMany => SwiftTypeRef::generic("ToManyRelationship", vec![target]),
        };
        if relationship.omittable {
            wrapped = wrapped.optional();
        }
        properties.push(Decl::let_property(
            &member_identifier(&relationship.name),
            wrapped,
        ));
    }

    Decl::block(
        BlockKind::Struct,
        "Relationships",
        &["JSONAPI.Relationships"],
        properties,
    )
}

/// Recover a whole document schema and register every declaration it
/// implies, returning the Swift type name tests should decode against.
///
/// Exactly one of `data` and `errors` must be present per branch. A `oneOf`
/// root is handled branch by branch; the success branch's primary type name
/// wins when both branches are present.
pub fn document_declarations(
    schema: &SchemaNode,
    name_hint: &str,
    ctx: &mut GenerationContext,
    options: &ReverseOptions,
) -> Result<String, ReverseError> {
    if let SchemaKind::OneOf(branches) = &schema.kind {
        let mut success_name = None;
        let mut error_name = None;
        for branch in branches {
            let root = branch.as_object().ok_or(ReverseError::RootNotObject {
                context: "document",
            })?;
            if root.properties.contains_key("data") {
                success_name = Some(document_declarations(branch, name_hint, ctx, options)?);
            } else if root.properties.contains_key("errors") {
                error_name = Some(document_declarations(branch, name_hint, ctx, options)?);
            }
        }
        return success_name
            .or(error_name)
            .ok_or(ReverseError::UnhandledDocument);
    }

    let root = schema.as_object().ok_or(ReverseError::RootNotObject {
        context: "document",
    })?;

    let data = root.properties.get("data");
    let errors = root.properties.get("errors");

    match (data, errors) {
        (Some(data), None) => {
            let primary_name = match &data.kind {
                SchemaKind::Object(_) => resource_declarations(data, ctx, options)?,
                SchemaKind::Array(context) => {
                    let items = context.items.as_deref().ok_or(ReverseError::RootNotObject {
                        context: "primary data",
                    })?;
                    resource_declarations(items, ctx, options)?
                }
                _ => {
                    return Err(ReverseError::RootNotObject {
                        context: "primary data",
                    });
                }
            };

            if let Some(included) = root.properties.get("included") {
                let array = included.as_array().ok_or(ReverseError::RootNotObject {
                    context: "included",
                })?;
                let items = array
                    .items
                    .as_deref()
                    .ok_or(ReverseError::IncludedMissingItems)?;
                match &items.kind {
                    SchemaKind::OneOf(branches) => {
                        for branch in branches {
                            resource_declarations(branch, ctx, options)?;
                        }
                    }
                    _ => {
                        resource_declarations(items, ctx, options)?;
                    }
                }
            }

            Ok(primary_name)
        }
        (None, Some(errors)) => {
            let items = errors
                .as_array()
                .and_then(|array| array.items.as_deref())
                .ok_or(ReverseError::UnhandledDocument)?;
            let name = format!("{}Error", type_identifier(name_hint));
            nested_structure(&name, items, ctx, options)?;
            Ok(name)
        }
        _ => Err(ReverseError::UnhandledDocument),
    }
}

/// Minimal declarations for a related resource type referenced but not
/// defined in the current generation scope, so emitted code still compiles.
pub fn stub_declarations(json_type: &str) -> Vec<Decl> {
    let type_name = type_identifier(json_type);
    let description_name = format!("{type_name}Description");

    let description = Decl::block(
        BlockKind::Enum,
        &description_name,
        &["JSONAPI.ResourceObjectDescription"],
        vec![
            Decl::static_property(
                "jsonType",
                SwiftTypeRef::named("String"),
                Expr::str(json_type),
            ),
            Decl::typealias("Attributes", SwiftTypeRef::named("NoAttributes")),
            Decl::typealias("Relationships", SwiftTypeRef::named("NoRelationships")),
        ],
    );
    let alias = Decl::typealias(
        &type_name,
        SwiftTypeRef::generic(
            "JSONAPI.ResourceObject",
            vec![
                SwiftTypeRef::named(&description_name),
                SwiftTypeRef::named("NoMetadata"),
                SwiftTypeRef::named("NoLinks"),
                SwiftTypeRef::named("String"),
            ],
        ),
    );

    vec![description, alias]
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::synth::descriptor::{DocumentDescriptor, PrimaryShape};
    use crate::synth::forward::{document_schema, resource_schema};
    use crate::swift::emit::render;

    fn strict() -> ReverseOptions {
        ReverseOptions {
            allow_placeholders: false,
        }
    }

    fn widgets() -> ResourceTypeDescriptor {
        ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new("productName", SchemaNode::string()))
            .with_relationship(RelationshipDescriptor::to_many("subcomponents", "widgets"))
    }

    #[test]
    fn test_round_trip_through_forward_synthesis() {
        // Attribute/relationship declaration order matches recovery's sorted
        // order so structural equality holds.
        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new("productName", SchemaNode::string()))
            .with_attribute(
                AttributeDescriptor::new("serial", SchemaNode::string())
                    .omittable()
                    .nullable(),
            )
            .with_attribute(AttributeDescriptor::new("weight", SchemaNode::number()).nullable())
            .with_relationship(RelationshipDescriptor::to_one("parent", "widgets").nullable())
            .with_relationship(RelationshipDescriptor::to_many("subcomponents", "widgets"));

        let schema = resource_schema(&descriptor).unwrap();
        let recovery = recover_resource(&schema, &strict()).unwrap();
        assert_eq!(recovery.descriptor, descriptor);
        assert!(recovery.type_name_candidates.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_omittable_nullable_grid() {
        for (omittable, nullable) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut attribute = AttributeDescriptor::new("a", SchemaNode::string());
            attribute.omittable = omittable;
            attribute.nullable = nullable;
            let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
                .with_attribute(attribute);

            let schema = resource_schema(&descriptor).unwrap();
            let recovered = recover_resource(&schema, &strict()).unwrap().descriptor;
            assert_eq!(recovered.attributes[0].omittable, omittable);
            assert_eq!(recovered.attributes[0].nullable, nullable);
        }
    }

    #[test]
    fn test_root_must_be_object() {
        let err = recover_resource(&SchemaNode::string(), &strict()).unwrap_err();
        assert!(matches!(err, ReverseError::RootNotObject { .. }));
    }

    #[test]
    fn test_missing_type_discriminant() {
        let schema = SchemaNode::object(crate::schema::ObjectContext::default());
        assert_eq!(
            recover_resource(&schema, &strict()).unwrap_err(),
            ReverseError::TypeDiscriminantNotFound
        );
    }

    #[test]
    fn test_nullable_to_many_is_rejected() {
        // Hand-build the invalid shape; forward synthesis refuses to make it.
        let mut schema = resource_schema(&widgets()).unwrap();
        let SchemaKind::Object(root) = &mut schema.kind else {
            panic!("expected object");
        };
        let SchemaKind::Object(relationships) = &mut root.properties["relationships"].kind else {
            panic!("expected object");
        };
        let SchemaKind::Object(wrapper) = &mut relationships.properties["subcomponents"].kind
        else {
            panic!("expected object");
        };
        wrapper.properties["data"].nullable = true;

        assert_eq!(
            recover_resource(&schema, &strict()).unwrap_err(),
            ReverseError::ToManyRelationshipCannotBeNullable {
                name: "subcomponents".to_string()
            }
        );
    }

    #[test]
    fn test_relationship_without_data_is_rejected() {
        let mut schema = resource_schema(&widgets()).unwrap();
        let SchemaKind::Object(root) = &mut schema.kind else {
            panic!("expected object");
        };
        let SchemaKind::Object(relationships) = &mut root.properties["relationships"].kind else {
            panic!("expected object");
        };
        relationships
            .properties
            .insert("broken".to_string(), SchemaNode::string());

        assert_eq!(
            recover_resource(&schema, &strict()).unwrap_err(),
            ReverseError::RelationshipMissingDataObject {
                name: "broken".to_string()
            }
        );
    }

    #[test]
    fn test_ambiguous_discriminant_policy() {
        let mut schema = resource_schema(&widgets()).unwrap();
        let SchemaKind::Object(root) = &mut schema.kind else {
            panic!("expected object");
        };
        root.properties["type"].allowed_values = vec![
            serde_json::json!("widgets"),
            serde_json::json!("gadgets"),
        ];

        assert_eq!(
            recover_resource(&schema, &strict()).unwrap_err(),
            ReverseError::TypeDiscriminantAmbiguous {
                candidates: vec!["widgets".to_string(), "gadgets".to_string()]
            }
        );

        let recovery = recover_resource(&schema, &ReverseOptions::default()).unwrap();
        assert_eq!(
            recovery.type_name_candidates,
            vec!["widgets".to_string(), "gadgets".to_string()]
        );
    }

    #[test]
    fn test_emitted_declarations_shape() {
        let schema = resource_schema(&widgets()).unwrap();
        let mut ctx = GenerationContext::new();
        let name = resource_declarations(&schema, &mut ctx, &ReverseOptions::default()).unwrap();
        assert_eq!(name, "Widgets");

        let source = render(&ctx.into_declarations());
        assert!(source.contains("public enum WidgetsDescription: JSONAPI.ResourceObjectDescription {"));
        assert!(source.contains("public static let jsonType: String = \"widgets\""));
        assert!(source.contains("public let productName: Attribute<String>"));
        assert!(source.contains("public let subcomponents: ToManyRelationship<Widgets>"));
        assert!(source.contains(
            "public typealias Widgets = JSONAPI.ResourceObject<WidgetsDescription, NoMetadata, NoLinks, String>"
        ));
    }

    #[test]
    fn test_empty_resource_uses_sentinel_aliases() {
        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Unidentified);
        let schema = resource_schema(&descriptor).unwrap();
        let mut ctx = GenerationContext::new();
        resource_declarations(&schema, &mut ctx, &ReverseOptions::default()).unwrap();

        let source = render(&ctx.into_declarations());
        assert!(source.contains("public typealias Attributes = NoAttributes"));
        assert!(source.contains("public typealias Relationships = NoRelationships"));
        assert!(source.contains("NoLinks, Unidentified>"));
    }

    #[test]
    fn test_nested_object_attribute_synthesizes_named_structure() {
        let mut dimensions = crate::schema::ObjectContext::default();
        dimensions
            .properties
            .insert("width".to_string(), SchemaNode::number());
        dimensions
            .properties
            .insert("height".to_string(), SchemaNode::number().optional());
        dimensions.required_properties = vec!["width".to_string()];

        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new(
                "dimensions",
                SchemaNode::object(dimensions),
            ));
        let schema = resource_schema(&descriptor).unwrap();

        let mut ctx = GenerationContext::new();
        resource_declarations(&schema, &mut ctx, &strict()).unwrap();
        let source = render(&ctx.into_declarations());

        assert!(source.contains("public struct Dimensions: Codable, Equatable {"));
        assert!(source.contains("public let width: Double"));
        assert!(source.contains("public let height: Double?"));
        assert!(source.contains("public let dimensions: Attribute<Dimensions>"));
    }

    #[test]
    fn test_polymorphic_attribute_policy() {
        let union = SchemaNode::new(SchemaKind::OneOf(vec![
            SchemaNode::string(),
            SchemaNode::integer(),
        ]));
        let descriptor = ResourceTypeDescriptor::new("widgets", IdentityKind::Identified)
            .with_attribute(AttributeDescriptor::new("payload", union));
        let schema = resource_schema(&descriptor).unwrap();

        let mut ctx = GenerationContext::new();
        let err = resource_declarations(&schema, &mut ctx, &strict()).unwrap_err();
        assert_eq!(
            err,
            ReverseError::PolymorphicAttributeUnsupported {
                name: "payload".to_string()
            }
        );

        let mut ctx = GenerationContext::new();
        resource_declarations(&schema, &mut ctx, &ReverseOptions::default()).unwrap();
        let source = render(&ctx.into_declarations());
        assert!(source.contains("<#T##Swift Type: Any (oneOf schema)#>"));
    }

    #[test]
    fn test_document_with_neither_data_nor_errors() {
        let schema = SchemaNode::object(crate::schema::ObjectContext::default());
        let mut ctx = GenerationContext::new();
        assert_eq!(
            document_declarations(&schema, "widgets", &mut ctx, &ReverseOptions::default())
                .unwrap_err(),
            ReverseError::UnhandledDocument
        );
    }

    #[test]
    fn test_included_union_dedupes_regardless_of_ordering() {
        let gadgets = ResourceTypeDescriptor::new("gadgets", IdentityKind::Identified);
        let gizmos = ResourceTypeDescriptor::new("gizmos", IdentityKind::Identified);

        let forward_document = |includes: Vec<ResourceTypeDescriptor>| DocumentDescriptor {
            primary: PrimaryShape::Single { nullable: false },
            resource: widgets(),
            includes,
        };

        let mut first = GenerationContext::new();
        let schema = document_schema(&forward_document(vec![gadgets.clone(), gizmos.clone()]))
            .unwrap();
        document_declarations(&schema, "widgets", &mut first, &strict()).unwrap();

        let mut second = GenerationContext::new();
        let schema = document_schema(&forward_document(vec![gizmos, gadgets])).unwrap();
        document_declarations(&schema, "widgets", &mut second, &strict()).unwrap();

        let names = |ctx: GenerationContext| -> Vec<String> {
            ctx.into_declarations()
                .iter()
                .filter_map(|d| d.name().map(ToString::to_string))
                .collect()
        };
        let first_names = names(first);
        assert_eq!(first_names, names(second));
        assert!(first_names.contains(&"Gadgets".to_string()));
        assert!(first_names.contains(&"Gizmos".to_string()));
        // Three resources with two decls each, plus the error-branch
        // payload struct.
        assert_eq!(first_names.len(), 7);
        assert!(first_names.contains(&"WidgetsError".to_string()));
    }

    #[test]
    fn test_error_document_synthesizes_payload_structure() {
        let descriptor = DocumentDescriptor {
            primary: PrimaryShape::Single { nullable: false },
            resource: widgets(),
            includes: Vec::new(),
        };
        let schema = document_schema(&descriptor).unwrap();

        let mut ctx = GenerationContext::new();
        let name =
            document_declarations(&schema, "widgets", &mut ctx, &ReverseOptions::default())
                .unwrap();
        // Success branch's primary type wins as the decode target.
        assert_eq!(name, "Widgets");

        let source = render(&ctx.into_declarations());
        assert!(source.contains("public struct WidgetsError: Codable, Equatable {"));
        assert!(source.contains("public let detail: String?"));
    }

    #[test]
    fn test_stub_declarations_compile_shape() {
        let source = render(&stub_declarations("widget-parts"));
        assert!(source.contains("public enum WidgetPartsDescription: JSONAPI.ResourceObjectDescription {"));
        assert!(source.contains("public static let jsonType: String = \"widget-parts\""));
        assert!(source.contains("public typealias Attributes = NoAttributes"));
        assert!(
            source.contains("public typealias WidgetParts = JSONAPI.ResourceObject<WidgetPartsDescription, NoMetadata, NoLinks, String>")
        );
    }
}
