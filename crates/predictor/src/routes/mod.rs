pub mod catalog;
pub mod predict;

pub use catalog::{classes_handler, provinces_handler};
pub use predict::{predict_handler, PredictRequest, PredictResponse};
