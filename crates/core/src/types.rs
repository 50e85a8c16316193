/// All timestamps are UTC and serialise as ISO-8601 strings.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Designs, canvas items, brands, and actors are keyed by opaque strings.
pub type EntityId = String;

/// Generate a time-ordered identifier with the given prefix, e.g. `design-0190…`.
pub fn time_based_id(prefix: &str) -> EntityId {
    format!("{prefix}-{}", uuid::Uuid::now_v7())
}
