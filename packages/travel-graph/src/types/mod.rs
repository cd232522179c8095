//! Data types for the travel graph.

pub mod candidate;
pub mod classification;
pub mod config;
pub mod filters;
pub mod message;
pub mod turn;
