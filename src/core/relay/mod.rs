pub mod chunker;
pub mod relay_service;

pub use chunker::{split_message, ChunkError, DEFAULT_CHUNK_LIMIT};
pub use relay_service::{ChunkSender, RelayError, RelayOutcome, RelayService, Translator};
