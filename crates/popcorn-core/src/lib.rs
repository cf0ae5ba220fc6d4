pub mod detail;
#[cfg(test)]
mod fake;
pub mod keys;
pub mod persisted;
pub mod rating;
pub mod search;
pub mod session;
pub mod stats;
pub mod storage;
pub mod title;
pub mod watched;

pub use detail::{DetailFetcher, DetailState};
pub use keys::{Key, KeyBinder, KeyBinding};
pub use persisted::PersistedState;
pub use rating::StarRating;
pub use search::{SearchFetcher, SearchState, NOT_FOUND_MESSAGE};
pub use session::{AddOutcome, Session};
pub use stats::{average, summarize};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use title::{NoopTitle, RecordingTitle, ScopedTitle, TitleSink};
pub use watched::WatchedList;
