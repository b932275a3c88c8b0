pub mod deviation;
pub mod forenames;
pub mod handlers;
pub mod occurrences;
pub mod sentence_indices;
pub mod session;
pub mod store;
pub mod vocable;

pub use deviation::deviation_masks;
pub use forenames::{DEFAULT_FORENAMES, ForenameConvertor};
pub use handlers::{AppState, router};
pub use occurrences::TokenOccurrencesMap;
pub use sentence_indices::TokenSentenceIndicesMap;
pub use session::{
    DataPaths, SessionError, SessionOptions, TrainingMode, TrainingSession, create_token_maps,
};
pub use store::{MapError, MapStore, TokenMap};
pub use vocable::{VocableEntry, entries_to_be_trained, find_paraphrases};
