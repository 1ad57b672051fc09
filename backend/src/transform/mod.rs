//! Dataset stages.
//!
//! - `text`: station/town name normalization
//! - `nulls`: missing station filter and null report
//! - `dates`: calendar feature derivation
//! - `pipeline`: stage ordering and the batch runs

pub mod dates;
pub mod nulls;
pub mod pipeline;
pub mod text;

pub use dates::{derive_date_features, week_of_month, DateFeatures};
pub use nulls::{analyze_nulls, drop_invalid_rows, LineNullReport};
pub use pipeline::*;
pub use text::{remove_words, text_processing, NormalizerTables, TextNormalizer};
