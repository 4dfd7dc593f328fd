use std::{collections::HashMap, io::Read, path::Path};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read climate statistics: {0}")]
    Csv(#[from] csv::Error),
    #[error("Climate statistics contain no provinces")]
    Empty,
}

/// Historical climate averages for a single province
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, ToSchema)]
pub struct ClimateProfile {
    pub province: String,
    #[serde(rename = "avg_temp_province")]
    pub avg_temperature: f64,
    #[serde(rename = "avg_humidity_province")]
    pub avg_humidity: f64,
    #[serde(rename = "avg_pressure_province")]
    pub avg_pressure: f64,
    #[serde(rename = "avg_wind_speed_province")]
    pub avg_wind_speed: f64,
}

/// Outcome of a province lookup; `found` is false when the fallback profile was used
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateLookup {
    pub profile: ClimateProfile,
    pub found: bool,
}

pub trait ClimateData: Send + Sync {
    /// Never fails; unknown provinces resolve to the default profile with `found == false`
    fn lookup(&self, province: &str) -> ClimateLookup;
    /// All known provinces, sorted
    fn provinces(&self) -> Vec<String>;
}

/// Climate statistics loaded once at startup and never mutated afterwards
pub struct ClimateTable {
    profiles: Vec<ClimateProfile>,
    index: HashMap<String, usize>,
}

impl ClimateTable {
    pub fn new(rows: Vec<ClimateProfile>) -> Result<Self, Error> {
        let mut profiles = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        for row in rows {
            if index.contains_key(&row.province) {
                warn!("duplicate climate row for '{}', keeping the first", row.province);
                continue;
            }
            index.insert(row.province.clone(), profiles.len());
            profiles.push(row);
        }

        if profiles.is_empty() {
            return Err(Error::Empty);
        }
        Ok(Self { profiles, index })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        let table = Self::from_csv_reader(reader)?;
        info!(
            "Loaded climate statistics for {} provinces from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, Error> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(rdr);
        Self::from_csv_reader(reader)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, Error> {
        let rows = reader
            .deserialize::<ClimateProfile>()
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(rows)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// First row in load order
    fn fallback(&self) -> &ClimateProfile {
        &self.profiles[0]
    }
}

impl ClimateData for ClimateTable {
    fn lookup(&self, province: &str) -> ClimateLookup {
        match self.index.get(province) {
            Some(&idx) => ClimateLookup {
                profile: self.profiles[idx].clone(),
                found: true,
            },
            None => {
                let profile = self.fallback().clone();
                debug!(
                    "no climate row for '{}', falling back to '{}'",
                    province, profile.province
                );
                ClimateLookup {
                    profile,
                    found: false,
                }
            }
        }
    }

    fn provinces(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.iter().map(|p| p.province.clone()).collect();
        names.sort();
        names
    }
}
