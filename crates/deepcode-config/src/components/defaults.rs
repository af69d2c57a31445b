//! Built-in default values

/// Backend base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

/// HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Interval between indexing status polls
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

/// Embedding model preselected in the import wizard
pub const DEFAULT_EMBED_MODEL: &str = "nomic-embed-text";

/// Embedding models offered when the backend model list is unavailable
pub const DEFAULT_EMBED_MODELS: &[&str] = &["nomic-embed-text", "mxbai-embed-large", "all-minilm"];

/// Characters per chunk when indexing
pub const DEFAULT_CHUNK_SIZE: u32 = 500;

/// Characters shared by consecutive chunks
pub const DEFAULT_CHUNK_OVERLAP: u32 = 50;

/// Number of chunks retrieved for a RAG answer
pub const DEFAULT_TOP_K: u32 = 5;
