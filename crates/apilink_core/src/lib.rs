//! Public library API for linking GPU API schemas and deriving wire protocol schemas.

/// Schema loading, tag filtering, type linking, structure ordering, and wire/fuzz derivation.
pub mod schema;
