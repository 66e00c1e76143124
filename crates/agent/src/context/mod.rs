//! Grounding context and prompt assembly.
//!
//! | Piece              | Lifetime         | Role                                   |
//! |--------------------|------------------|----------------------------------------|
//! | `PdfLoader`        | stateless        | PDF path → one text unit per page      |
//! | `PlainTextLoader`  | stateless        | Text path → form-feed separated pages  |
//! | `ContextStore`     | process          | Extracts once, hands out `Arc<str>`    |
//! | `PromptAssembler`  | stateless        | Instructions + grounding + history     |

pub mod assembler;
pub mod loader;
pub mod pdf;
pub mod store;

pub use assembler::PromptAssembler;
pub use loader::PlainTextLoader;
pub use pdf::PdfLoader;
pub use store::ContextStore;
