//! External capability implementations.
//!
//! Reference implementations of the `TravelClassifier` and `Phraser`
//! traits. Users can use these directly or implement their own.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::OpenAI;
