pub mod fetch;
pub mod report;
pub mod run;
pub mod seeds;

pub use fetch::{FileFetcher, HttpFetcher, HttpOptions};
pub use report::{rank, RankedPage};
pub use run::{score_targets, Failure, Outcome, RunOptions};
pub use seeds::{load_seeds, local_targets, parse_seeds, Target};
