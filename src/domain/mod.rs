//! Domain layer: Core business types and logic.
//!
//! Pure Rust types with no I/O: policyholder records, the expected column
//! schema, the fitted categorical encoder, tabular batch data, feature
//! alignment and prediction results.

mod encoder;
pub mod features;
mod policyholder;
mod prediction;
mod schema;
mod table;

pub use encoder::{EncoderError, LabelEncoder};
pub use features::{align_record, AlignedRow, RawRecord, RawValue, UnknownCategory};
pub use policyholder::{
    Gender, PolicyType, PolicyholderRecord, Region, AGE_RANGE, ANNUAL_PREMIUM_RANGE,
    ATTRIBUTE_NAMES, CLAIMS_HISTORY_RANGE, CREDIT_SCORE_RANGE, DEPENDENTS_RANGE,
    VEHICLE_AGE_RANGE,
};
pub use prediction::{
    BatchPrediction, BatchWarning, ClaimPrediction, SinglePrediction, Verdict, POSITIVE_CLASS,
    PREDICTION_COLUMN,
};
pub use schema::{ColumnSchema, SchemaError};
pub use table::{Table, TableError};
