//! Entity to model mappers
//!
//! This module provides conversions between domain entities (wisdom-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `TryFrom` where a column can hold a value the domain rejects

mod draft;
mod post;
mod profile;
mod reaction;

pub use reaction::{parse_reaction_type, usage_from_rows};
