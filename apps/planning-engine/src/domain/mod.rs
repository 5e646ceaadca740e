//! Domain layer - value objects and pure aggregation logic.
//!
//! Nothing in this module performs I/O; everything is deterministic given
//! its inputs.

pub mod account;
pub mod category;
pub mod currency;
pub mod grouping;
pub mod instance;
pub mod item;
pub mod reconciliation;
