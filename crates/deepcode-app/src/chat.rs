//! Chat session over the workspace

use deepcode_client::{
    Backend, ChatContext, ChatRequest, RagChatRequest, RagMetadata, RagStrategy,
};
use deepcode_config::ClientConfig;
use deepcode_core::{ChatMessage, ContextMode, Transcript, Workspace};
use std::sync::Arc;
use tracing::{debug, warn};

const CHAT_FALLBACK: &str = "AI call failed. Check backend /api/ai/chat.";
const RAG_FALLBACK: &str = "AI call failed. Check backend /api/ai/chat-rag.";
const NO_REPLY: &str = "(no reply)";

/// A transcript plus the settings used to send messages
pub struct ChatSession<B: Backend + ?Sized> {
    backend: Arc<B>,
    transcript: Transcript,
    context_mode: ContextMode,
    model: Option<String>,
    embed_model: String,
    top_k: u32,
}

impl<B: Backend + ?Sized> ChatSession<B> {
    /// New session with the greeting and configured defaults
    pub fn new(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            context_mode: config.chat.context_mode,
            model: config.chat.model.clone(),
            embed_model: config.indexing.embed_model.clone(),
            top_k: config.chat.top_k,
        }
    }

    /// Messages so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// `all` sends no file list, `selected` sends the selection
    pub fn set_context_mode(&mut self, mode: ContextMode) {
        self.context_mode = mode;
    }

    /// Current context mode
    pub fn context_mode(&self) -> ContextMode {
        self.context_mode
    }

    /// Chat model; `None` uses the backend default
    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model;
    }

    /// Reset the transcript
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Send `draft` with context from `workspace`.
    ///
    /// Blank drafts are ignored and return `None`. Otherwise the assistant's
    /// reply (or the error text) is appended and returned. Sends cannot
    /// overlap: each one holds `&mut self` until the reply is in.
    pub async fn send(&mut self, draft: &str, workspace: &Workspace) -> Option<&ChatMessage> {
        let text = draft.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));

        let files = match self.context_mode {
            ContextMode::All => None,
            ContextMode::Selected => Some(workspace.selected_context_files()),
        };
        debug!(
            mode = %self.context_mode,
            files = files.as_ref().map_or(0, Vec::len),
            "chat context"
        );
        let request = ChatRequest {
            message: text.to_string(),
            context: ChatContext {
                mode: self.context_mode,
                files,
            },
            model: self.model.clone(),
        };

        let content = match self.backend.chat(&request).await {
            Ok(reply) => reply
                .reply
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| NO_REPLY.to_string()),
            Err(err) => {
                warn!(error = %err, "chat failed");
                err.user_message(CHAT_FALLBACK)
            }
        };

        self.transcript.push(ChatMessage::assistant(content));
        self.transcript.last()
    }

    /// Retrieval-augmented variant over indexed projects.
    ///
    /// Returns the retrieval report when the backend sent one.
    pub async fn send_rag(
        &mut self,
        draft: &str,
        project_ids: Vec<String>,
        strategy: RagStrategy,
        workspace: &Workspace,
    ) -> Option<RagMetadata> {
        let text = draft.trim();
        if text.is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(text));

        let files = match self.context_mode {
            ContextMode::All => Vec::new(),
            ContextMode::Selected => workspace.selected_context_files(),
        };
        let request = RagChatRequest {
            message: text.to_string(),
            project_ids,
            mode: self.context_mode,
            strategy,
            files,
            embed_model: self.embed_model.clone(),
            top_k: self.top_k,
            model: self.model.clone(),
        };

        let (content, rag) = match self.backend.chat_rag(&request).await {
            Ok(response) => (
                response
                    .answer
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| NO_REPLY.to_string()),
                response.rag,
            ),
            Err(err) => {
                warn!(error = %err, "RAG chat failed");
                (err.user_message(RAG_FALLBACK), None)
            }
        };

        if let Some(rag) = &rag {
            debug!(
                strategy = %rag.strategy_used,
                chunks_used = rag.chunks_used,
                indexed_now = rag.indexed_now,
                "RAG answer"
            );
        }
        self.transcript.push(ChatMessage::assistant(content));
        rag
    }
}
