pub mod counter;
pub mod error;
pub mod keyword;
pub mod observe;
pub mod page;

pub use counter::{count_occurrences, OccurrenceCounter};
pub use error::ScoreError;
pub use keyword::{Keyword, KeywordCatalog};
pub use observe::{NoopObserver, ScoreObserver, TracingObserver};
pub use page::{FetchContent, KeywordCount, Page};

pub type Weight = u32;
