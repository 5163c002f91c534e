//! # Identifier Generation
//!
//! Filenames and metadata record ids are drawn from an [`IdGenerator`]
//! injected at construction, so callers never choose their own identifiers.

use uuid::Uuid;

/// Source of unique opaque identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random (v4) UUIDs in hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
