//! Application layer - use cases over the backend ports.

pub mod coordinator;
pub mod ports;
pub mod resolver;
pub mod session;
