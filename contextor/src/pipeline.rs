//! The chat turn as explicit stages:
//! record user turn → retrieve → assemble → complete → record assistant turn.
//!
//! Each stage is a public method so ordering and failure injection can be
//! tested on its own. Only session-store failures abort a turn; turns already
//! appended stay appended.

use std::sync::Arc;
use std::time::Instant;

use ai_llm_service::TextGenerator;
use rag_store::{Passage, Retriever};
use session_store::{Role, SessionStore, Turn, new_session_id};
use tracing::{debug, info, warn};

use crate::completion::{self, Completion};
use crate::error::ContextorError;
use crate::prompt::{self, DEFAULT_PREAMBLE};

/// System notice written as the first turn of every new session.
pub const SESSION_CREATED_NOTICE: &str = "New session created";

/// Output of the retrieval stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// Search succeeded; may legitimately be empty.
    Found(Vec<Passage>),
    /// Embedding or search failed; the turn continues without context.
    Degraded { cause: String },
}

impl Retrieval {
    pub fn passages(&self) -> &[Passage] {
        match self {
            Retrieval::Found(p) => p,
            Retrieval::Degraded { .. } => &[],
        }
    }

    pub fn into_passages(self) -> Vec<Passage> {
        match self {
            Retrieval::Found(p) => p,
            Retrieval::Degraded { .. } => Vec::new(),
        }
    }
}

/// What a chat turn hands back to the caller.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub reply: String,
    pub context: Vec<Passage>,
    /// `true` when `reply` is a substitute message, not model output.
    pub substituted: bool,
}

/// Sequences one chat turn over the store, retriever and generator.
pub struct ChatPipeline {
    store: Arc<dyn SessionStore>,
    retriever: Retriever,
    generator: Arc<dyn TextGenerator>,
}

impl ChatPipeline {
    pub fn new(
        store: Arc<dyn SessionStore>,
        retriever: Retriever,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            store,
            retriever,
            generator,
        }
    }

    /// Creates a session id and writes the system notice turn.
    pub async fn create_session(&self) -> Result<String, ContextorError> {
        let id = new_session_id();
        self.store
            .append_turn(&id, Role::System, SESSION_CREATED_NOTICE)
            .await?;
        info!(session_id = %id, "session created");
        Ok(id)
    }

    pub async fn history(&self, session_id: &str) -> Result<Vec<Turn>, ContextorError> {
        Ok(self.store.list_turns(session_id).await?)
    }

    pub async fn reset(&self, session_id: &str) -> Result<(), ContextorError> {
        self.store.clear_session(session_id).await?;
        info!(session_id = %session_id, "session reset");
        Ok(())
    }

    /// Runs the full turn. Callers validate that both arguments are non-empty.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatTurn, ContextorError> {
        let started = Instant::now();

        self.record(session_id, Role::User, message).await?;
        let retrieval = self.retrieve(message).await;
        let prompt = self.assemble(retrieval.passages(), message);
        let completion = self.complete(&prompt).await;
        self.record(session_id, Role::Assistant, completion.reply()).await?;

        info!(
            session_id = %session_id,
            passages = retrieval.passages().len(),
            degraded = matches!(retrieval, Retrieval::Degraded { .. }),
            substituted = completion.is_substituted(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat turn done"
        );

        Ok(ChatTurn {
            substituted: completion.is_substituted(),
            reply: completion.into_reply(),
            context: retrieval.into_passages(),
        })
    }

    /// Appends one turn to the session.
    pub async fn record(&self, session_id: &str, role: Role, text: &str) -> Result<(), ContextorError> {
        self.store.append_turn(session_id, role, text).await?;
        debug!(session_id = %session_id, role = role.as_str(), "turn appended");
        Ok(())
    }

    /// Retrieval stage. Never fails; provider errors become [`Retrieval::Degraded`].
    pub async fn retrieve(&self, message: &str) -> Retrieval {
        match self.retriever.retrieve(message, None).await {
            Ok(passages) => Retrieval::Found(passages),
            Err(err) => {
                warn!("retrieval degraded to no context: {err}");
                Retrieval::Degraded { cause: err.to_string() }
            }
        }
    }

    /// Prompt stage.
    pub fn assemble(&self, passages: &[Passage], message: &str) -> String {
        prompt::assemble(DEFAULT_PREAMBLE, passages, message)
    }

    /// Completion stage. Never fails; see [`completion::complete`].
    pub async fn complete(&self, prompt: &str) -> Completion {
        completion::complete(self.generator.as_ref(), prompt).await
    }
}
