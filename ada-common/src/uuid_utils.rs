//! UUID utilities

use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Generate a new UUIDv4 in its hyphenated text form
///
/// Session identifiers travel as plain strings on the wire, so callers
/// that only need the text form use this instead of [`generate`].
pub fn generate_string() -> String {
    generate().to_string()
}
