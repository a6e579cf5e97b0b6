//! Core types for EcoLens analyses.
//!
//! The metric set is closed: [`MetricKey`] enumerates the sixteen dimensions
//! and [`Metrics`] always holds exactly one [`MetricResult`] per key. Nothing
//! downstream can add or remove a metric, only rewrite its score and note.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alternatives::Alternative;
use crate::product::ProductRecord;

/// Maximum entries in `drivers.boosted` and `drivers.dropped`.
pub const MAX_DRIVERS: usize = 6;

/// Maximum greenwashing warnings per analysis.
pub const MAX_GREENWASHING: usize = 3;

/// Maximum notes per analysis.
pub const MAX_NOTES: usize = 10;

/// One of the sixteen fixed sustainability dimensions.
///
/// Declaration order is the canonical metric order used for iteration
/// and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    CarbonFootprint,
    EcoCertifications,
    EnergyEfficiency,
    Recyclability,
    WaterUsage,
    Biodegradability,
    ToxicMaterials,
    Lifespan,
    Repairability,
    PackagingWaste,
    TransportDistance,
    ResourceEfficiency,
    ChemicalUse,
    RenewableContent,
    WorkingConditions,
    VocEmissions,
}

impl MetricKey {
    /// Number of metrics.
    pub const COUNT: usize = 16;

    /// All metric keys in canonical order.
    pub const ALL: [MetricKey; Self::COUNT] = [
        MetricKey::CarbonFootprint,
        MetricKey::EcoCertifications,
        MetricKey::EnergyEfficiency,
        MetricKey::Recyclability,
        MetricKey::WaterUsage,
        MetricKey::Biodegradability,
        MetricKey::ToxicMaterials,
        MetricKey::Lifespan,
        MetricKey::Repairability,
        MetricKey::PackagingWaste,
        MetricKey::TransportDistance,
        MetricKey::ResourceEfficiency,
        MetricKey::ChemicalUse,
        MetricKey::RenewableContent,
        MetricKey::WorkingConditions,
        MetricKey::VocEmissions,
    ];

    /// Wire name of the metric (camelCase).
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::CarbonFootprint => "carbonFootprint",
            MetricKey::EcoCertifications => "ecoCertifications",
            MetricKey::EnergyEfficiency => "energyEfficiency",
            MetricKey::Recyclability => "recyclability",
            MetricKey::WaterUsage => "waterUsage",
            MetricKey::Biodegradability => "biodegradability",
            MetricKey::ToxicMaterials => "toxicMaterials",
            MetricKey::Lifespan => "lifespan",
            MetricKey::Repairability => "repairability",
            MetricKey::PackagingWaste => "packagingWaste",
            MetricKey::TransportDistance => "transportDistance",
            MetricKey::ResourceEfficiency => "resourceEfficiency",
            MetricKey::ChemicalUse => "chemicalUse",
            MetricKey::RenewableContent => "renewableContent",
            MetricKey::WorkingConditions => "workingConditions",
            MetricKey::VocEmissions => "vocEmissions",
        }
    }

    /// Look up a metric by its wire name. Unrecognized names yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown metric key: {}", s))
    }
}

/// Round and clamp a raw value into the integer score range `[0, 100]`.
///
/// Non-finite input maps to 0.
pub fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Score and rationale for a single metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricResult {
    /// Integer score in `[0, 100]`
    pub score: u8,

    /// Short rationale
    pub note: String,
}

impl MetricResult {
    pub fn new(score: u8, note: impl Into<String>) -> Self {
        Self {
            score: score.min(100),
            note: note.into(),
        }
    }
}

/// The complete set of sixteen metric results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<MetricKey, MetricResult>",
    into = "BTreeMap<MetricKey, MetricResult>"
)]
pub struct Metrics {
    results: [MetricResult; MetricKey::COUNT],
}

impl Metrics {
    /// Build the full metric set by computing each key in canonical order.
    pub fn from_fn(mut f: impl FnMut(MetricKey) -> MetricResult) -> Self {
        Self {
            results: std::array::from_fn(|i| f(MetricKey::ALL[i])),
        }
    }

    /// Result for a metric. Every key is always present.
    pub fn get(&self, key: MetricKey) -> &MetricResult {
        &self.results[key.index()]
    }

    /// Score for a metric.
    pub fn score(&self, key: MetricKey) -> u8 {
        self.get(key).score
    }

    /// Overwrite the score and note of an existing metric.
    pub fn set(&mut self, key: MetricKey, score: u8, note: impl Into<String>) {
        self.results[key.index()] = MetricResult::new(score, note);
    }

    /// Iterate metrics in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, &MetricResult)> {
        MetricKey::ALL.iter().copied().zip(self.results.iter())
    }
}

impl From<Metrics> for BTreeMap<MetricKey, MetricResult> {
    fn from(metrics: Metrics) -> Self {
        MetricKey::ALL.into_iter().zip(metrics.results).collect()
    }
}

impl TryFrom<BTreeMap<MetricKey, MetricResult>> for Metrics {
    type Error = String;

    fn try_from(mut map: BTreeMap<MetricKey, MetricResult>) -> Result<Self, Self::Error> {
        if let Some(missing) = MetricKey::ALL.iter().find(|k| !map.contains_key(k)) {
            return Err(format!("missing metric: {}", missing));
        }
        Ok(Self::from_fn(|key| {
            map.remove(&key)
                .unwrap_or_else(|| MetricResult::new(0, String::new()))
        }))
    }
}

/// Coarse product category derived from the text blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[default]
    #[serde(rename = "general")]
    General,
    #[serde(rename = "personal care")]
    PersonalCare,
    #[serde(rename = "cleaning")]
    Cleaning,
    #[serde(rename = "fashion")]
    Fashion,
    #[serde(rename = "electronics")]
    Electronics,
    #[serde(rename = "reusables")]
    Reusables,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::PersonalCare => "personal care",
            Category::Cleaning => "cleaning",
            Category::Fashion => "fashion",
            Category::Electronics => "electronics",
            Category::Reusables => "reusables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter grade derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map an overall score to a grade. Each band's lower bound is inclusive.
    pub fn from_overall(overall: u8) -> Self {
        match overall {
            85.. => Grade::A,
            70..=84 => Grade::B,
            55..=69 => Grade::C,
            40..=54 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(s)
    }
}

/// Coarse reliability label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            other => Err(format!("unknown confidence: {}", other)),
        }
    }
}

/// Rough extra-impact estimates relative to a good product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimates {
    pub co2_kg: u32,
    pub water_l: u32,
}

impl Estimates {
    /// Toy linear model anchored at an overall of 70.
    pub fn from_overall(overall: u8) -> Self {
        let gap = 70.0 - f64::from(overall);
        Self {
            co2_kg: (gap * 0.25).round().clamp(0.0, 25.0) as u32,
            water_l: (gap * 3.0).round().clamp(0.0, 400.0) as u32,
        }
    }
}

/// Human-readable explanations for upward and downward adjustments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drivers {
    pub boosted: Vec<String>,
    pub dropped: Vec<String>,
}

/// Boolean flags derived from metric thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signals {
    pub recyclable: bool,
    pub toxic_risk: bool,
    pub renewable: bool,
}

impl Signals {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        Self {
            recyclable: metrics.score(MetricKey::Recyclability) >= 70,
            toxic_risk: metrics.score(MetricKey::ToxicMaterials) <= 45,
            renewable: metrics.score(MetricKey::RenewableContent) >= 70,
        }
    }
}

/// Verification status of a certification claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertStatus {
    /// Mentioned on-page only
    Claimed,
    /// A license code was found that can be checked
    Verifiable,
    /// Confirmed by the caller against the registry
    Verified,
}

/// A certification mentioned on the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertClaim {
    pub name: String,
    pub status: CertStatus,
    pub verify_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Which path produced the final analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Deterministic heuristics only
    #[default]
    Heuristic,
    /// Heuristics with an external overlay merged in
    Enriched,
}

/// Provenance of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMeta {
    pub analyzed_at: DateTime<Utc>,
    pub engine_version: String,
}

impl AnalysisMeta {
    pub fn now() -> Self {
        Self {
            analyzed_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// The engine's output: a complete, self-contained sustainability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub product: ProductRecord,
    pub category: Category,
    pub overall: u8,
    pub grade: Grade,
    pub confidence: Confidence,
    pub metrics: Metrics,
    pub estimates: Estimates,
    pub drivers: Drivers,
    pub greenwashing: Vec<String>,
    pub certifications: Vec<CertClaim>,
    pub signals: Signals,
    pub notes: Vec<String>,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub alternatives: Vec<Alternative>,
    pub meta: AnalysisMeta,
}

impl Analysis {
    /// Set the overall score and keep grade and estimates consistent with it.
    pub fn set_overall(&mut self, overall: u8) {
        self.overall = overall.min(100);
        self.grade = Grade::from_overall(self.overall);
        self.estimates = Estimates::from_overall(self.overall);
    }

    /// Recompute signal flags from the current metrics.
    pub fn refresh_signals(&mut self) {
        self.signals = Signals::from_metrics(&self.metrics);
    }

    /// Append notes, dropping whatever does not fit under [`MAX_NOTES`].
    pub fn append_notes<I, S>(&mut self, notes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let room = MAX_NOTES.saturating_sub(self.notes.len());
        self.notes.extend(notes.into_iter().take(room).map(Into::into));
    }
}

/// Deduplicate while preserving first-seen order, then cap the length.
pub fn unique_capped<I, S>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.into();
        let trimmed = item.trim();
        if trimmed.is_empty() || out.iter().any(|x| x == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
        if out.len() == cap {
            break;
        }
    }
    out
}
