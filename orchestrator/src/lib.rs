// Pipeline orchestration: configuration, the record source, and the
// batch scoring driver.

pub mod config;
pub mod pipeline;
pub mod source;

pub use config::PipelineConfig;
pub use pipeline::{run_word_frequency, RunSummary, ScoringDriver};
pub use source::{RecordSource, StoreRecordSource};
