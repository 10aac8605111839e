//! Per-run generation state.
//!
//! A [`GenerationContext`] is threaded through every synthesis call in a
//! batch. It deduplicates declarations by name, tracks relationship targets
//! that still need stub types, and guards test function names against
//! collisions. Order of insertion never matters; output is sorted by name.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::{ReverseError, TestGenError};
use crate::swift::decl::Decl;
use crate::swift::ident::type_identifier;

/// Mutable state shared by all generation units in one run.
#[derive(Debug, Default)]
pub struct GenerationContext {
    declarations: BTreeMap<String, Decl>,
    /// Raw json types referenced by some relationship, pending a declaration.
    relationship_targets: BTreeSet<String>,
    test_names: BTreeSet<String>,
    placeholder_counter: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named declaration.
    ///
    /// Re-inserting a structurally equal declaration is a no-op, so the same
    /// resource type may be recovered from any number of documents. A
    /// same-name declaration with different structure is a hard error.
    /// Unnamed declarations (imports, raw blocks) are rejected by debug
    /// assertion and otherwise dropped.
    pub fn insert_declaration(&mut self, decl: Decl) -> Result<(), ReverseError> {
        let Some(name) = decl.name().map(ToString::to_string) else {
            debug_assert!(false, "unnamed declarations cannot be deduplicated");
            return Ok(());
        };
        match self.declarations.get(&name) {
            Some(existing) if *existing == decl => Ok(()),
            Some(_) => Err(ReverseError::DuplicateDeclaration { name }),
            None => {
                self.declarations.insert(name, decl);
                Ok(())
            }
        }
    }

    /// Whether a declaration with this name has been registered.
    pub fn contains(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    /// Note a raw json type referenced by a relationship, so the run can
    /// finalize a stub for it if no real declaration ever appears.
    pub fn note_relationship_target(&mut self, json_type: &str) {
        self.relationship_targets.insert(json_type.to_string());
    }

    /// Json types that were referenced by a relationship but never received a
    /// declaration, sorted. The batch driver turns these into stubs.
    pub fn pending_relationship_targets(&self) -> Vec<String> {
        self.relationship_targets
            .iter()
            .filter(|json_type| !self.contains(&type_identifier(json_type)))
            .cloned()
            .collect()
    }

    /// Claim a test function name for this run.
    pub fn register_test_name(&mut self, name: &str) -> Result<(), TestGenError> {
        if self.test_names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(TestGenError::DuplicateTestName {
                name: name.to_string(),
            })
        }
    }

    /// A fresh name for a type whose real name could not be determined.
    pub fn placeholder_type_name(&mut self) -> String {
        self.placeholder_counter += 1;
        format!("UnknownType{}", self.placeholder_counter)
    }

    /// All registered declarations, sorted by name.
    pub fn into_declarations(self) -> Vec<Decl> {
        self.declarations.into_values().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::swift::decl::SwiftTypeRef;

    #[test]
    fn test_insert_is_idempotent_for_equal_decls() {
        let mut context = GenerationContext::new();
        let decl = Decl::typealias("Widgets", SwiftTypeRef::named("ResourceObject"));
        context.insert_declaration(decl.clone()).unwrap();
        context.insert_declaration(decl).unwrap();
        assert_eq!(context.into_declarations().len(), 1);
    }

    #[test]
    fn test_conflicting_decl_is_rejected() {
        let mut context = GenerationContext::new();
        context
            .insert_declaration(Decl::typealias("Widgets", SwiftTypeRef::named("A")))
            .unwrap();
        let err = context
            .insert_declaration(Decl::typealias("Widgets", SwiftTypeRef::named("B")))
            .unwrap_err();
        assert_eq!(
            err,
            ReverseError::DuplicateDeclaration {
                name: "Widgets".to_string()
            }
        );
    }

    #[test]
    fn test_declarations_come_out_sorted() {
        let mut context = GenerationContext::new();
        context
            .insert_declaration(Decl::typealias("Zeta", SwiftTypeRef::named("A")))
            .unwrap();
        context
            .insert_declaration(Decl::typealias("Alpha", SwiftTypeRef::named("B")))
            .unwrap();
        let names: Vec<_> = context
            .into_declarations()
            .iter()
            .map(|d| d.name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Alpha".to_string(), "Zeta".to_string()]);
    }

    #[test]
    fn test_pending_targets_exclude_declared_types() {
        let mut context = GenerationContext::new();
        context.note_relationship_target("widgets");
        context.note_relationship_target("gadgets");
        context
            .insert_declaration(Decl::typealias("Widgets", SwiftTypeRef::named("ResourceObject")))
            .unwrap();
        assert_eq!(context.pending_relationship_targets(), vec!["gadgets".to_string()]);
    }

    #[test]
    fn test_duplicate_test_name_is_rejected() {
        let mut context = GenerationContext::new();
        context.register_test_name("test__a__b__get__response__200").unwrap();
        let err = context
            .register_test_name("test__a__b__get__response__200")
            .unwrap_err();
        assert!(matches!(err, TestGenError::DuplicateTestName { .. }));
    }

    #[test]
    fn test_placeholder_names_are_fresh() {
        let mut context = GenerationContext::new();
        assert_eq!(context.placeholder_type_name(), "UnknownType1");
        assert_eq!(context.placeholder_type_name(), "UnknownType2");
    }
}
