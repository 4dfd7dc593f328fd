//! Rule-based weather prediction service.
//!
//! Loads the category list and per-province climate averages once at startup
//! and serves predictions over a small JSON API.

pub mod climate;
pub mod engine;
pub mod metadata;
pub mod routes;
mod startup;
pub mod timestamp;
mod utils;

pub use climate::{ClimateData, ClimateLookup, ClimateProfile, ClimateTable};
pub use engine::{CategoryProbability, PredictionQuery, PredictionResult, Predictor};
pub use metadata::ModelMetadata;
pub use routes::*;
pub use startup::*;
pub use timestamp::{parse_timestamp, TimeFeatures};
pub use utils::*;
