//! # Ragify Core
//!
//! Domain types, traits, and error definitions for the Ragify assistant.
//! This crate has **no I/O of its own**: it defines the domain model that
//! the other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here. Implementations live in
//! their respective crates:
//! - [`Provider`] / [`ProviderFactory`]: the generation backend
//!   (`ragify-providers`)
//! - [`DocumentLoader`]: grounding document extraction (`ragify-agent`)
//!
//! This keeps the turn state machine testable with scripted stand-ins.

pub mod credential;
pub mod document;
pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use credential::Credential;
pub use document::DocumentLoader;
pub use error::{ContextError, Error, ProviderError, Result};
pub use message::{Message, Role, SessionId, Speaker, Turn};
pub use provider::{Provider, ProviderFactory, ProviderRequest, ProviderResponse, Usage};
