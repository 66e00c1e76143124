//! Generation backend implementations for Ragify.
//!
//! All providers implement the `ragify_core::Provider` trait. The factory
//! builds the configured provider for whatever credential the current pass
//! resolved.

pub mod factory;
pub mod openai_compat;

pub use factory::{ConfiguredProviderFactory, default_base_url};
pub use openai_compat::OpenAiCompatProvider;
