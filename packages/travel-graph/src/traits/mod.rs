//! Core trait abstractions for the travel graph.
//!
//! These traits define the external capabilities the graph consumes:
//! classification, phrasing, the candidate corpus and the favorites store.

pub mod classifier;
pub mod corpus;
pub mod phraser;
