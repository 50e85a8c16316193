//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async SQL methods
//! that accept `&PgPool` as the first argument. Methods used inside a
//! transaction take any `PgExecutor` instead.

pub mod design_repo;
pub mod portal_token_repo;

pub use design_repo::DesignRepo;
pub use portal_token_repo::PortalTokenRepo;
