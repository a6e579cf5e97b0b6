//! Weight configuration, normalization and the weighted overall score.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{clamp_score, Grade, MetricKey, Metrics};

/// Errors that can occur when loading weights.
#[derive(Error, Debug)]
pub enum WeightError {
    #[error("Failed to read weights file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown weight preset '{0}' (expected one of: balanced, climate-first, low-toxicity, ethical-labor)")]
    UnknownPreset(String),
}

/// Relative importance of each metric, on an arbitrary scale.
///
/// Keys are metric wire names. Unrecognized keys and non-positive or
/// non-finite values are carried but ignored by [`normalize_weights`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightConfig(BTreeMap<String, f64>);

impl WeightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, weight: f64) -> Self {
        self.0.insert(key.into(), weight);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, weight: f64) {
        self.0.insert(key.into(), weight);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weights of a named preset.
    pub fn preset(preset: WeightPreset) -> Self {
        let mut config: Self = DEFAULT_WEIGHTS
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), *v))
            .collect();

        let overrides: &[(MetricKey, f64)] = match preset {
            WeightPreset::Balanced => &[],
            WeightPreset::ClimateFirst => &[
                (MetricKey::CarbonFootprint, 40.0),
                (MetricKey::TransportDistance, 18.0),
                (MetricKey::EnergyEfficiency, 18.0),
                (MetricKey::PackagingWaste, 12.0),
                (MetricKey::RenewableContent, 16.0),
            ],
            WeightPreset::LowToxicity => &[
                (MetricKey::ToxicMaterials, 45.0),
                (MetricKey::ChemicalUse, 28.0),
                (MetricKey::VocEmissions, 18.0),
                (MetricKey::WaterUsage, 12.0),
                (MetricKey::CarbonFootprint, 14.0),
            ],
            WeightPreset::EthicalLabor => &[
                (MetricKey::WorkingConditions, 45.0),
                (MetricKey::EcoCertifications, 28.0),
                (MetricKey::Lifespan, 14.0),
                (MetricKey::Repairability, 14.0),
                (MetricKey::CarbonFootprint, 14.0),
            ],
        };
        for (key, weight) in overrides {
            config.insert(key.as_str(), *weight);
        }
        config
    }

    /// Parse weights from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, WeightError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse weights from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, WeightError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load weights from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, WeightError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }
}

impl FromIterator<(String, f64)> for WeightConfig {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Default ("balanced") weights.
pub const DEFAULT_WEIGHTS: [(MetricKey, f64); MetricKey::COUNT] = [
    (MetricKey::CarbonFootprint, 20.0),
    (MetricKey::EcoCertifications, 20.0),
    (MetricKey::EnergyEfficiency, 15.0),
    (MetricKey::Recyclability, 15.0),
    (MetricKey::WaterUsage, 10.0),
    (MetricKey::Biodegradability, 20.0),
    (MetricKey::ToxicMaterials, 20.0),
    (MetricKey::Lifespan, 10.0),
    (MetricKey::Repairability, 10.0),
    (MetricKey::PackagingWaste, 10.0),
    (MetricKey::TransportDistance, 10.0),
    (MetricKey::ResourceEfficiency, 10.0),
    (MetricKey::ChemicalUse, 10.0),
    (MetricKey::RenewableContent, 30.0),
    (MetricKey::WorkingConditions, 10.0),
    (MetricKey::VocEmissions, 10.0),
];

/// Named weight presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPreset {
    #[default]
    Balanced,
    ClimateFirst,
    LowToxicity,
    EthicalLabor,
}

impl WeightPreset {
    pub const ALL: [WeightPreset; 4] = [
        WeightPreset::Balanced,
        WeightPreset::ClimateFirst,
        WeightPreset::LowToxicity,
        WeightPreset::EthicalLabor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightPreset::Balanced => "balanced",
            WeightPreset::ClimateFirst => "climate-first",
            WeightPreset::LowToxicity => "low-toxicity",
            WeightPreset::EthicalLabor => "ethical-labor",
        }
    }
}

impl fmt::Display for WeightPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightPreset {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(WeightPreset::Balanced),
            "climate-first" | "climateFirst" => Ok(WeightPreset::ClimateFirst),
            "low-toxicity" | "lowToxicity" => Ok(WeightPreset::LowToxicity),
            "ethical-labor" | "ethicalLabor" => Ok(WeightPreset::EthicalLabor),
            other => Err(WeightError::UnknownPreset(other.to_string())),
        }
    }
}

/// Weights over recognized metrics that sum to 1.
///
/// Empty when no usable weight remains.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedWeights(BTreeMap<MetricKey, f64>);

impl NormalizedWeights {
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Weighted metric keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of all weights (1 unless empty).
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Back to a plain configuration, e.g. for re-normalization.
    pub fn to_config(&self) -> WeightConfig {
        self.iter()
            .map(|(k, v)| (k.as_str().to_string(), v))
            .collect()
    }
}

/// Normalize a weight configuration so the usable weights sum to 1.
///
/// Unrecognized keys and non-finite or non-positive weights are dropped.
/// If nothing usable remains the result is empty.
pub fn normalize_weights(weights: &WeightConfig) -> NormalizedWeights {
    let usable: Vec<(MetricKey, f64)> = weights
        .iter()
        .filter(|(_, w)| w.is_finite() && *w > 0.0)
        .filter_map(|(k, w)| MetricKey::from_key(k).map(|key| (key, w)))
        .collect();

    let total: f64 = usable.iter().map(|(_, w)| w).sum();
    if usable.is_empty() || !total.is_finite() || total <= 0.0 {
        return NormalizedWeights::default();
    }

    NormalizedWeights(usable.into_iter().map(|(k, w)| (k, w / total)).collect())
}

/// Weighted overall score, rounded and clamped to `[0, 100]`.
///
/// Returns 0 when the weights are empty.
pub fn weighted_overall(metrics: &Metrics, weights: &NormalizedWeights) -> u8 {
    if weights.is_empty() {
        return 0;
    }
    let sum: f64 = weights
        .iter()
        .map(|(key, w)| f64::from(metrics.score(key)) * w)
        .sum();
    clamp_score(sum)
}

/// Overall score and grade in one step.
pub fn aggregate(metrics: &Metrics, weights: &NormalizedWeights) -> (u8, Grade) {
    let overall = weighted_overall(metrics, weights);
    (overall, Grade::from_overall(overall))
}
