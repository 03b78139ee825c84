//! Pub/Sub channel definitions.
//!
//! One Redis channel per backend table: `wisdom:table:{name}`.

use wisdom_core::events::Table;

/// Channel prefix for table change events
pub const TABLE_CHANNEL_PREFIX: &str = "wisdom:table:";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Row changes of one table
    Table(Table),
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    /// Create a table channel
    #[must_use]
    pub fn table(table: Table) -> Self {
        Self::Table(table)
    }

    /// Create a custom channel
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Table(table) => format!("{TABLE_CHANNEL_PREFIX}{}", table.as_str()),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        name.strip_prefix(TABLE_CHANNEL_PREFIX)
            .and_then(Table::parse)
            .map_or_else(|| Self::Custom(name.to_string()), Self::Table)
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
