//! Creative Studio domain model.
//!
//! Pure, synchronous building blocks shared by the persistence, event, and
//! API crates. This crate has zero internal dependencies:
//!
//! - [`canvas`]: canvas items as a tagged union keyed on item type.
//! - [`format`]: preset canvas formats and their pixel dimensions.
//! - [`design`]: the design aggregate and the blank-design factory.
//! - [`history`]: editor session state with a linear undo/redo stack.
//! - [`approval`]: review lifecycle and the guarded transition function.
//! - [`scheduling`]: publish platforms and schedule payloads.
//! - [`portal`]: client-portal access token generation.

pub mod approval;
pub mod canvas;
pub mod design;
pub mod error;
pub mod format;
pub mod history;
pub mod portal;
pub mod scheduling;
pub mod types;
