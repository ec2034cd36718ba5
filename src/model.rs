// The pre-trained efficiency model, loaded from disk.
//
// The engine treats the scorer as opaque; this module only knows how to
// read the exported weight file and apply it row by row. Training and
// validation happen elsewhere and are out of scope here.
use crate::select::{EfficiencyPredictor, FeatureRow, FEATURE_COUNT};
use serde::Deserialize;
use std::error::Error;
use std::fs;

/// Linear scoring model over the standardized feature columns
/// (year, mpg, CO2 per mile, fuel cost).
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    pub weights: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

impl LinearModel {
    pub fn load(path: &str) -> Result<LinearModel, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let model: LinearModel = serde_json::from_str(&raw)?;
        Ok(model)
    }
}

impl EfficiencyPredictor for LinearModel {
    fn predict(&self, features: &[FeatureRow]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                let dot: f64 = row.iter().zip(self.weights.iter()).map(|(x, w)| x * w).sum();
                dot + self.intercept
            })
            .collect()
    }
}
