//! Row structs for the `designs` and `portal_tokens` tables.

pub mod design;
pub mod portal_token;
