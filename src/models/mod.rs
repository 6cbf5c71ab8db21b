pub mod document;
pub mod identity;
pub mod ledger;
pub mod loaders;
pub mod stage;
pub mod submission;

pub use document::{DocumentRecord, Placeholder, PlaceholderMap};
pub use identity::{decompose_code, normalize_code, StudentIdentity};
pub use ledger::{hyperlink_formula, LedgerRow};
pub use loaders::{load_all_submissions, load_submission};
pub use stage::{GenerationOutputs, StageKind, StageOutput, StageState};
pub use submission::{GenerationRequest, Submission};
