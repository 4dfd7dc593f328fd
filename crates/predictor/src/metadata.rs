use std::{collections::HashSet, fs, path::Path};

use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to read metadata file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse metadata: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Metadata lists no weather classes")]
    NoCategories,
    #[error("Weather class list contains a blank label")]
    BlankCategory,
    #[error("Weather class listed twice: {0}")]
    DuplicateCategory(String),
}

/// Contents of `metadata.json` produced alongside the trained models
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ModelMetadata {
    pub classes: Classes,
    #[serde(default)]
    pub features: Features,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Classes {
    pub weather_classes: Vec<String>,
}

/// Feature names the models were trained on; the rule engine does not read them
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Features {
    #[serde(default)]
    pub all_features: Vec<String>,
}

impl ModelMetadata {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        let metadata = Self::from_json(&raw)?;
        info!(
            "Loaded metadata from {}: weather classes {:?}",
            path.display(),
            metadata.categories()
        );
        debug!("metadata features: {:?}", metadata.features.all_features);
        Ok(metadata)
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        let metadata: ModelMetadata = serde_json::from_str(raw)?;
        metadata.validate()?;
        Ok(metadata)
    }

    /// Weather categories in configured order, which is also the tie-break order
    pub fn categories(&self) -> &[String] {
        &self.classes.weather_classes
    }

    fn validate(&self) -> Result<(), Error> {
        let categories = self.categories();
        if categories.is_empty() {
            return Err(Error::NoCategories);
        }
        let mut seen = HashSet::with_capacity(categories.len());
        for category in categories {
            if category.trim().is_empty() {
                return Err(Error::BlankCategory);
            }
            if !seen.insert(category.as_str()) {
                return Err(Error::DuplicateCategory(category.clone()));
            }
        }
        Ok(())
    }
}
