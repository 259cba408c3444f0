pub mod config;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod transform;

pub use config::{parse_start_time, AugmentConfig, DEFAULT_STEP_SECONDS};
pub use errors::{AugmentError, Result};
pub use model::{DerivedColumn, DerivedFields, HeaderIndex, Row};
pub use pipeline::{augment_file, augment_stream, AugmentSummary, CarriedState};
pub use schema::{OutputColumn, OutputSchema};
pub use transform::{
    format_iso8601, lower_wick_percent, normalize_time_utc, percentage_change, synthetic_time,
    RowTransformer,
};
