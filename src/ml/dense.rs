//! Dense-network score model loaded from a JSON artifact.
//!
//! The artifact bundles the categorical vocabularies used at training time,
//! the numeric feature list and a small MLP:
//!
//! ```json
//! {
//!   "categorical": { "opposition": ["India"], "pitch_type": ["Green"], ... },
//!   "numeric": ["avg_runs", "avg_strike_rate"],
//!   "network": { "input_mean": null, "input_std": null, "layers": [...] }
//! }
//! ```
//!
//! Categorical columns are one-hot encoded in a fixed order; a value outside
//! the vocabulary encodes as an all-zero block.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ScorePredictor;
use crate::domain::{MatchContext, PlayerAggregate};
use crate::error::{PredictError, Result, XiError};

/// Categorical inputs, in encoding order.
pub const CATEGORICAL_FEATURES: [&str; 5] =
    ["opposition", "pitch_type", "weather", "player_name", "player_type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Sigmoid => {
                if x >= 0.0 {
                    1.0 / (1.0 + (-x).exp())
                } else {
                    let z = x.exp();
                    z / (1.0 + z)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Weights shape: [out_dim][in_dim]
    pub weights: Vec<Vec<f64>>,
    /// Bias shape: [out_dim]
    pub bias: Vec<f64>,
    #[serde(default)]
    pub activation: Activation,
}

impl DenseLayer {
    fn forward(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum = row.iter().zip(x).fold(*b, |acc, (w, v)| acc + w * v);
                self.activation.apply(sum)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreNetwork {
    /// Optional z-score normalization of the encoded input.
    #[serde(default)]
    pub input_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub input_std: Option<Vec<f64>>,
    pub layers: Vec<DenseLayer>,
}

impl ScoreNetwork {
    fn validate(&self, input_dim: usize) -> std::result::Result<(), String> {
        if input_dim == 0 {
            return Err("model has no input features".to_string());
        }
        if self.layers.is_empty() {
            return Err("layers must not be empty".to_string());
        }
        match (&self.input_mean, &self.input_std) {
            (Some(mean), Some(std)) => {
                if mean.len() != input_dim || std.len() != input_dim {
                    return Err(format!(
                        "normalization length mean={} std={} != input_dim {input_dim}",
                        mean.len(),
                        std.len()
                    ));
                }
                if std.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return Err("input_std must be finite and > 0".to_string());
                }
            }
            (None, None) => {}
            _ => return Err("input_mean and input_std must be provided together".to_string()),
        }

        let mut expected_in = input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            let out_dim = layer.weights.len();
            if out_dim == 0 {
                return Err(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != out_dim {
                return Err(format!(
                    "layer[{idx}] bias len {} != out_dim {out_dim}",
                    layer.bias.len()
                ));
            }
            if let Some((r, row)) = layer
                .weights
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != expected_in)
            {
                return Err(format!(
                    "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                    row.len()
                ));
            }
            let finite = layer.weights.iter().flatten().chain(&layer.bias).all(|v| v.is_finite());
            if !finite {
                return Err(format!("layer[{idx}] contains non-finite parameters"));
            }
            expected_in = out_dim;
        }
        if expected_in != 1 {
            return Err(format!("final layer must produce one score, got {expected_in}"));
        }
        Ok(())
    }

    fn forward_scalar(&self, input: &[f64]) -> f64 {
        let mut x: Vec<f64> = match (&self.input_mean, &self.input_std) {
            (Some(mean), Some(std)) => input
                .iter()
                .zip(mean.iter().zip(std))
                .map(|(v, (m, s))| (v - m) / s.max(1e-12))
                .collect(),
            _ => input.to_vec(),
        };
        for layer in &self.layers {
            x = layer.forward(&x);
        }
        x.first().copied().unwrap_or(f64::NAN)
    }
}

/// Training-time vocabularies for the categorical inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoricalVocab {
    #[serde(default)]
    pub opposition: Vec<String>,
    #[serde(default)]
    pub pitch_type: Vec<String>,
    #[serde(default)]
    pub weather: Vec<String>,
    #[serde(default)]
    pub player_name: Vec<String>,
    #[serde(default)]
    pub player_type: Vec<String>,
}

impl CategoricalVocab {
    fn blocks(&self) -> [&[String]; 5] {
        [
            &self.opposition,
            &self.pitch_type,
            &self.weather,
            &self.player_name,
            &self.player_type,
        ]
    }

    fn width(&self) -> usize {
        self.blocks().iter().map(|b| b.len()).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseScoreModel {
    #[serde(default)]
    pub categorical: CategoricalVocab,
    /// Names of the aggregate columns appended after the one-hot blocks.
    #[serde(default)]
    pub numeric: Vec<String>,
    pub network: ScoreNetwork,
    /// Free-form training metadata.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseScoreModel {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let model: Self = serde_json::from_str(&content)?;
        model.validate().map_err(XiError::Validation)?;
        Ok(model)
    }

    pub fn input_dim(&self) -> usize {
        self.categorical.width() + self.numeric.len()
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(name) = self.numeric.iter().find(|n| numeric_feature(n).is_none()) {
            return Err(format!("unknown numeric feature '{name}'"));
        }
        self.network.validate(self.input_dim())
    }

    /// One-hot categorical blocks followed by the numeric features.
    pub fn encode(
        &self,
        player: &PlayerAggregate,
        context: &MatchContext,
    ) -> std::result::Result<Vec<f64>, PredictError> {
        let values = [
            context.opposition.as_str(),
            context.pitch_type.as_str(),
            context.weather.as_str(),
            player.name.as_str(),
            player.role.as_str(),
        ];

        let mut x = Vec::with_capacity(self.input_dim());
        for (vocab, value) in self.categorical.blocks().iter().zip(values) {
            let value = value.trim();
            x.extend(
                vocab
                    .iter()
                    .map(|v| if v.eq_ignore_ascii_case(value) { 1.0 } else { 0.0 }),
            );
        }
        for name in &self.numeric {
            let extract = numeric_feature(name)
                .ok_or_else(|| PredictError::InvalidFeature(format!("unknown feature {name}")))?;
            let v = extract(player);
            if !v.is_finite() {
                return Err(PredictError::InvalidFeature(format!(
                    "{name} is not finite for {}",
                    player.name
                )));
            }
            x.push(v);
        }
        Ok(x)
    }
}

type Extractor = fn(&PlayerAggregate) -> f64;

fn numeric_feature(name: &str) -> Option<Extractor> {
    let f: Extractor = match name {
        "avg_runs" => |p| p.avg_runs,
        "avg_strike_rate" => |p| p.avg_strike_rate,
        "avg_wickets" => |p| p.avg_wickets,
        "avg_economy" => |p| p.avg_economy,
        "avg_fours" => |p| p.avg_fours,
        "avg_sixes" => |p| p.avg_sixes,
        "avg_runs_conceded" => |p| p.avg_runs_conceded,
        "matches" => |p| p.matches as f64,
        _ => return None,
    };
    Some(f)
}

impl ScorePredictor for DenseScoreModel {
    fn predict(
        &self,
        player: &PlayerAggregate,
        context: &MatchContext,
    ) -> std::result::Result<f64, PredictError> {
        let x = self.encode(player, context)?;
        let score = self.network.forward_scalar(&x);
        if score.is_finite() {
            Ok(score)
        } else {
            Err(PredictError::InvalidFeature(format!(
                "model produced a non-finite score for {}",
                player.name
            )))
        }
    }
}
