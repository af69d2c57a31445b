//! Chat session

mod common;

use common::{import_response, server_error, FakeBackend};
use deepcode_app::ChatSession;
use deepcode_client::{ApiError, ChatReply, RagChatResponse, RagMetadata, RagStrategy};
use deepcode_config::{ClientConfig, ContextMode};
use deepcode_core::workspace::github_target;
use deepcode_core::{ChatRole, ImportSource, Workspace};
use std::sync::Arc;

fn session(backend: &Arc<FakeBackend>) -> ChatSession<FakeBackend> {
    ChatSession::new(Arc::clone(backend), &ClientConfig::default())
}

fn workspace_with_selection() -> Workspace {
    let mut workspace = Workspace::new();
    let response = import_response("p1", &["src/a.ts", "src/b.ts"], false);
    workspace.attach_github_tree(
        github_target("acme", "widgets", Some("main"), None).unwrap(),
        response.tree,
        Some(("p1".into(), None)),
    );
    workspace.select_paths(&["src/b.ts"]);
    workspace
}

#[tokio::test]
async fn test_selected_mode_sends_selection() {
    let backend = Arc::new(FakeBackend::default());
    let mut chat = session(&backend);
    chat.set_context_mode(ContextMode::Selected);

    let reply = chat
        .send("  explain b  ", &workspace_with_selection())
        .await
        .unwrap();
    assert_eq!(reply.role, ChatRole::Assistant);
    assert_eq!(reply.content, "ok");

    let request = &backend.chats.lock().unwrap()[0];
    assert_eq!(request.message, "explain b");
    assert_eq!(request.context.mode, ContextMode::Selected);
    let files = request.context.files.as_ref().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "src/b.ts");
    assert_eq!(files[0].source, ImportSource::Github);
    assert_eq!(files[0].github.as_ref().unwrap().repo, "widgets");

    // greeting, user, assistant
    assert_eq!(chat.transcript().len(), 3);
}

#[tokio::test]
async fn test_back_to_back_sends_are_both_answered() {
    let backend = Arc::new(FakeBackend::default());
    let mut chat = session(&backend);
    let workspace = Workspace::new();

    assert!(chat.send("first", &workspace).await.is_some());
    assert!(chat.send("second", &workspace).await.is_some());

    let messages: Vec<String> = backend
        .chats
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.message.clone())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
    assert_eq!(chat.transcript().len(), 5);
}

#[tokio::test]
async fn test_all_mode_omits_files() {
    let backend = Arc::new(FakeBackend::default());
    let mut chat = session(&backend);
    chat.set_context_mode(ContextMode::All);

    chat.send("hello", &workspace_with_selection()).await;
    let request = &backend.chats.lock().unwrap()[0];
    assert_eq!(request.context.mode, ContextMode::All);
    assert!(request.context.files.is_none());
}

#[tokio::test]
async fn test_blank_draft_is_ignored() {
    let backend = Arc::new(FakeBackend::default());
    let mut chat = session(&backend);

    assert!(chat.send("   ", &Workspace::new()).await.is_none());
    assert_eq!(chat.transcript().len(), 1);
    assert!(backend.chats.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failures_become_assistant_messages() {
    let backend = Arc::new(FakeBackend::default());
    *backend.chat_reply.lock().unwrap() = Err(ApiError::Transport("connection refused".into()));
    let mut chat = session(&backend);

    let reply = chat.send("hi", &Workspace::new()).await.unwrap();
    assert_eq!(reply.content, "AI call failed. Check backend /api/ai/chat.");

    *backend.chat_reply.lock().unwrap() = Err(server_error("model not loaded"));
    let reply = chat.send("hi", &Workspace::new()).await.unwrap();
    assert_eq!(reply.content, "model not loaded");

    *backend.chat_reply.lock().unwrap() = Ok(ChatReply { reply: None });
    let reply = chat.send("hi", &Workspace::new()).await.unwrap();
    assert_eq!(reply.content, "(no reply)");
}

#[tokio::test]
async fn test_rag_returns_metadata() {
    let backend = Arc::new(FakeBackend::default());
    *backend.rag_reply.lock().unwrap() = Ok(RagChatResponse {
        answer: Some("b exports a helper".into()),
        rag: Some(RagMetadata {
            strategy_used: "use_existing".into(),
            used_existing: true,
            chunks_used: 4,
            ..RagMetadata::default()
        }),
    });
    let mut chat = session(&backend);
    chat.set_context_mode(ContextMode::Selected);

    let rag = chat
        .send_rag(
            "what is b?",
            vec!["p1".into()],
            RagStrategy::UseExisting,
            &workspace_with_selection(),
        )
        .await
        .unwrap();
    assert_eq!(rag.chunks_used, 4);
    assert_eq!(
        chat.transcript().last().unwrap().content,
        "b exports a helper"
    );

    let request = &backend.rag_chats.lock().unwrap()[0];
    assert_eq!(request.project_ids, vec!["p1".to_string()]);
    assert_eq!(request.strategy, RagStrategy::UseExisting);
    assert_eq!(request.files.len(), 1);
    assert_eq!(request.embed_model, "nomic-embed-text");
    assert_eq!(request.top_k, 5);
}

#[tokio::test]
async fn test_rag_failure_has_no_metadata() {
    let backend = Arc::new(FakeBackend::default());
    *backend.rag_reply.lock().unwrap() = Err(ApiError::Transport("timeout".into()));
    let mut chat = session(&backend);

    let rag = chat
        .send_rag("q", Vec::new(), RagStrategy::Reindex, &Workspace::new())
        .await;
    assert!(rag.is_none());
    assert_eq!(
        chat.transcript().last().unwrap().content,
        "AI call failed. Check backend /api/ai/chat-rag."
    );
}

#[tokio::test]
async fn test_clear_resets_transcript() {
    let backend = Arc::new(FakeBackend::default());
    let mut chat = session(&backend);
    chat.send("hi", &Workspace::new()).await;
    chat.clear();

    assert_eq!(chat.transcript().len(), 1);
    assert_eq!(
        chat.transcript().last().unwrap().content,
        "Chat cleared. What do you want to do next?"
    );
}
