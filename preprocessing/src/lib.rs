// Social text preprocessing library

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod models;
pub mod normalizer;
pub mod stopwords;

pub use error::{PreprocessingError, Result};
pub use models::RawRecord;
pub use normalizer::TextNormalizer;
