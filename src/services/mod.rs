pub mod document_service;
pub mod ledger_writer;
pub mod llm_service;
pub mod prompts;
pub mod text_sanitizer;

pub use document_service::{DocumentService, DocumentSpec};
pub use ledger_writer::LedgerWriter;
pub use llm_service::LlmService;
