//! Analysis layer - plan-vs-actual aggregation over a date window.

pub mod calculator;
pub mod service;
pub mod types;
