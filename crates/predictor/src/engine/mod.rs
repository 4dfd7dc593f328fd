//! Rule-based weather predictor.
//!
//! A prediction is a pure function of the query, the immutable climate table
//! and draws from the caller's random number generator. The generator only
//! feeds the jitter on the simulated temperature/humidity; the category
//! distribution is fully deterministic.

pub mod rules;

use std::{collections::HashMap, sync::Arc};

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::climate::{ClimateData, ClimateProfile};
use rules::{active_adjustments, select_rule, Conditions, FLOOR_WEIGHT};

pub const TOP_N: usize = 3;
pub const TEMPERATURE_JITTER: f64 = 0.5;
pub const HUMIDITY_JITTER: f64 = 5.0;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Predictor needs at least one weather category")]
    NoCategories,
    #[error("Weather category '{0}' is listed more than once")]
    DuplicateCategory(String),
    #[error("Hour must be between 0 and 23, got {0}")]
    Hour(u8),
    #[error("Month must be between 1 and 12, got {0}")]
    Month(u8),
    #[error("Temperature must be a finite number, got {0}")]
    Temperature(f64),
    #[error("Humidity must be between 0 and 100, got {0}")]
    Humidity(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PredictionQuery {
    hour: u8,
    month: u8,
    temperature: Option<f64>,
    humidity: Option<f64>,
    location: String,
}

impl PredictionQuery {
    pub fn new(hour: u8, month: u8, location: impl Into<String>) -> Result<Self, Error> {
        if hour > 23 {
            return Err(Error::Hour(hour));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::Month(month));
        }
        Ok(Self {
            hour,
            month,
            temperature: None,
            humidity: None,
            location: location.into(),
        })
    }

    pub fn with_temperature(mut self, temperature: f64) -> Result<Self, Error> {
        if !temperature.is_finite() {
            return Err(Error::Temperature(temperature));
        }
        self.temperature = Some(temperature);
        Ok(self)
    }

    pub fn with_humidity(mut self, humidity: f64) -> Result<Self, Error> {
        if !(0.0..=100.0).contains(&humidity) {
            return Err(Error::Humidity(humidity));
        }
        self.humidity = Some(humidity);
        Ok(self)
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct CategoryProbability {
    pub category: String,
    pub probability: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PredictionResult {
    /// Most likely weather category
    pub category: String,
    /// Probability of `category`
    pub confidence: f64,
    /// Highest probabilities first
    pub top: Vec<CategoryProbability>,
    /// Every configured category, in configured order
    pub probabilities: Vec<CategoryProbability>,
    /// Name of the base rule that fired
    pub rule: String,
    pub input_temperature: f64,
    pub input_humidity: f64,
    pub predicted_temperature: f64,
    pub predicted_humidity: f64,
    pub temperature_change: f64,
    /// False when the province was unknown and the default climate profile was used
    pub location_found: bool,
    pub climate: ClimateProfile,
}

impl PredictionResult {
    pub fn probability(&self, category: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.category == category)
            .map(|p| p.probability)
    }
}

pub struct Predictor {
    categories: Vec<String>,
    positions: HashMap<String, usize>,
    climate: Arc<dyn ClimateData>,
}

impl Predictor {
    pub fn new(categories: Vec<String>, climate: Arc<dyn ClimateData>) -> Result<Self, Error> {
        if categories.is_empty() {
            return Err(Error::NoCategories);
        }
        let mut positions = HashMap::with_capacity(categories.len());
        for (idx, category) in categories.iter().enumerate() {
            if positions.insert(category.clone(), idx).is_some() {
                return Err(Error::DuplicateCategory(category.clone()));
            }
        }
        Ok(Self {
            categories,
            positions,
            climate,
        })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn predict<R: Rng>(&self, query: &PredictionQuery, rng: &mut R) -> PredictionResult {
        let lookup = self.climate.lookup(query.location());
        let input_temperature = query
            .temperature()
            .unwrap_or(lookup.profile.avg_temperature);
        let input_humidity = query.humidity().unwrap_or(lookup.profile.avg_humidity);

        let conditions = Conditions {
            temperature: input_temperature,
            humidity: input_humidity,
            hour: query.hour(),
            month: query.month(),
        };

        let (rule, weights) = self.weigh(&conditions);
        let probabilities = normalize(weights);
        let ranked = rank(&probabilities);

        let as_pair = |idx: usize| CategoryProbability {
            category: self.categories[idx].clone(),
            probability: probabilities[idx],
        };
        let best = ranked[0];
        let top = ranked.iter().take(TOP_N).map(|&idx| as_pair(idx)).collect();

        let predicted_temperature =
            input_temperature + rng.gen_range(-TEMPERATURE_JITTER..=TEMPERATURE_JITTER);
        let predicted_humidity = (input_humidity
            + rng.gen_range(-HUMIDITY_JITTER..=HUMIDITY_JITTER))
        .clamp(0.0, 100.0);

        debug!(
            "prediction for '{}' at hour {} month {}: rule {}, {} ({:.3})",
            query.location(),
            query.hour(),
            query.month(),
            rule,
            self.categories[best],
            probabilities[best]
        );

        PredictionResult {
            category: self.categories[best].clone(),
            confidence: probabilities[best],
            top,
            probabilities: (0..self.categories.len()).map(as_pair).collect(),
            rule: rule.to_owned(),
            input_temperature,
            input_humidity,
            predicted_temperature,
            predicted_humidity,
            temperature_change: predicted_temperature - input_temperature,
            location_found: lookup.found,
            climate: lookup.profile,
        }
    }

    /// Unnormalized weight per configured category, plus the name of the base rule used
    pub fn weigh(&self, conditions: &Conditions) -> (&'static str, Vec<f64>) {
        let mut weights: Vec<Option<f64>> = vec![None; self.categories.len()];

        let rule = select_rule(conditions);
        for (label, weight) in rule.weights {
            if let Some(&idx) = self.positions.get(*label) {
                weights[idx] = Some(*weight);
            }
        }

        for adjustment in active_adjustments(conditions) {
            for (label, factor) in adjustment.factors {
                // An absent weight counts as 0.0 once multiplied, so it no longer gets the floor
                if let Some(&idx) = self.positions.get(*label) {
                    weights[idx] = Some(weights[idx].unwrap_or(0.0) * factor);
                }
            }
        }

        let weights = weights
            .into_iter()
            .map(|w| w.unwrap_or(FLOOR_WEIGHT))
            .collect();
        (rule.name, weights)
    }
}

/// Scale weights to sum to one; an all-zero input becomes uniform
pub fn normalize(weights: Vec<f64>) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.into_iter().map(|w| w / total).collect()
    } else {
        let uniform = 1.0 / weights.len() as f64;
        vec![uniform; weights.len()]
    }
}

/// Indices ordered by descending probability; ties keep configured order
fn rank(probabilities: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));
    order
}
