//! Chat orchestration for the RAG backend.
//!
//! [`ChatPipeline`] runs one chat turn as explicit stages over a
//! [`session_store::SessionStore`], a [`rag_store::Retriever`] and an
//! [`ai_llm_service::TextGenerator`]. Provider failures are absorbed here:
//! retrieval degrades to no context and completion degrades to a substitute
//! reply, so a well-formed chat request always gets an answer.

pub mod completion;
mod error;
pub mod pipeline;
pub mod prompt;

pub use completion::Completion;
pub use error::ContextorError;
pub use pipeline::{ChatPipeline, ChatTurn, Retrieval, SESSION_CREATED_NOTICE};
