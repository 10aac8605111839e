//! Schema kind to Swift primitive type mapping.
//!
//! Answers only "what type represents this schema's value space". Wrapping
//! the result for omittability or nullability is the caller's job.

use crate::error::MappingError;
use crate::schema::{SchemaKind, SchemaNode};
use crate::swift::decl::SwiftTypeRef;
use crate::swift::ident::type_identifier;

/// Hint carried by every placeholder this module emits.
pub const PLACEHOLDER_HINT: &str = "Swift Type: Any";

/// Map a schema node to the Swift type for its value space.
///
/// Fails with [`MappingError::TypeNotResolvable`] when the schema's kind has
/// no direct primitive mapping (bare `object`, bare `array`, `oneOf`/`anyOf`)
/// and placeholders are disabled; otherwise degrades to a placeholder
/// carrying a human-readable hint.
pub fn type_for(schema: &SchemaNode, allow_placeholders: bool) -> Result<SwiftTypeRef, MappingError> {
    match &schema.kind {
        SchemaKind::Boolean => Ok(SwiftTypeRef::named("Bool")),
        SchemaKind::Integer => Ok(SwiftTypeRef::named("Int")),
        SchemaKind::String => Ok(SwiftTypeRef::named("String")),
        SchemaKind::Number => match schema.format.as_deref() {
            Some("float") => Ok(SwiftTypeRef::named("Float")),
            _ => Ok(SwiftTypeRef::named("Double")),
        },
        SchemaKind::Array(context) => match &context.items {
            Some(items) => Ok(type_for(items, allow_placeholders)?.array_of()),
            None => placeholder_or_fail(schema, allow_placeholders),
        },
        // Attribute objects are named structures, never a bare map type;
        // nested-structure synthesis happens before this mapping is asked.
        SchemaKind::Object(_)
        | SchemaKind::OneOf(_)
        | SchemaKind::AnyOf(_)
        | SchemaKind::Not(_) => placeholder_or_fail(schema, allow_placeholders),
        SchemaKind::Reference(name) => Ok(SwiftTypeRef::Named(type_identifier(name))),
    }
}

fn placeholder_or_fail(
    schema: &SchemaNode,
    allow_placeholders: bool,
) -> Result<SwiftTypeRef, MappingError> {
    if allow_placeholders {
        Ok(SwiftTypeRef::placeholder(&format!(
            "{PLACEHOLDER_HINT} ({} schema)",
            schema.kind_name()
        )))
    } else {
        Err(MappingError::TypeNotResolvable {
            kind: schema.kind_name().to_string(),
        })
    }
}
