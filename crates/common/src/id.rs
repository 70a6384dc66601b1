//! ID generation utilities.

use std::str::FromStr;

use ulid::Ulid;

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are lexicographically sortable and render as 26 lowercase
    /// characters, which is the format every primary key uses.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }

    /// Whether `id` is a syntactically valid entity reference.
    #[must_use]
    pub fn is_valid(id: &str) -> bool {
        id.len() == 26 && Ulid::from_str(id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_generated_ids_are_valid() {
        let id = IdGenerator::new().generate();
        assert!(IdGenerator::is_valid(&id));
    }

    #[test]
    fn test_is_valid_rejects_garbage() {
        assert!(!IdGenerator::is_valid(""));
        assert!(!IdGenerator::is_valid("not-an-id"));
        assert!(!IdGenerator::is_valid("507f1f77bcf86cd799439011"));
        // 'u' is outside the Crockford alphabet
        assert!(!IdGenerator::is_valid("01arz3ndektsv4rrffq69g5fau"));
    }
}
