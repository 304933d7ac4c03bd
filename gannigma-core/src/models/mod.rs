//! The three level models and the pipeline they share.
//!
//! A model run is a pure function of the provider's data and `ModelParams`;
//! the only thing that differs between the 360° grid, prior-year and
//! prior-month models is the `LadderSpec` that builds the level sequence.

pub mod error;
pub mod params;
pub mod pipeline;
pub mod result;

pub use error::ModelError;
pub use params::{
    LadderSpec, ModelKind, ModelParams, DEFAULT_ATR_PERIOD, DEFAULT_DATA_BUFFER_DAYS,
    FETCH_PADDING_DAYS,
};
pub use pipeline::{run_model, RECENT_CANDLES};
pub use result::{LadderInfo, ModelResult, PeriodReference};
