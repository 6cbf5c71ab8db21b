pub mod docs_client;
pub mod format_hook;
pub mod google_http;
pub mod llm_client;
pub mod sheets_client;

pub use docs_client::{DocumentBody, DocumentStore, GoogleDocsClient};
pub use format_hook::{FormatHook, WebAppFormatHook};
pub use llm_client::{GenerationCall, OpenAiCompatClient, TextGenerator};
pub use sheets_client::{GoogleSheetsClient, LedgerStore};
