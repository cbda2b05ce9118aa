//! Dense neural network artifacts (CPU-only).
//!
//! Small MLPs loaded from JSON, used either as a regressor (scalar output)
//! or as a classifier (arg-max over outputs, or a cut-off on a single
//! sigmoid output).

use serde::{Deserialize, Serialize};

use super::model::Model;
use crate::error::{GateError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Default for Activation {
    fn default() -> Self {
        Self::Linear
    }
}

/// How the final layer's activations become the model's single output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputHead {
    /// Single output returned as-is
    Value,
    /// Index of the largest output
    Argmax,
    /// Single output compared against a cut-off: class 1 when `>= cutoff`
    Threshold { cutoff: f64 },
}

impl Default for OutputHead {
    fn default() -> Self {
        Self::Value
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
    fn out_dim(&self) -> usize {
        self.weights.len()
    }

    fn apply(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| {
                let sum = row.iter().zip(x).fold(*b, |acc, (w, v)| acc + w * v);
                activate(sum, self.activation)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    /// Expected input dimension.
    pub input_dim: usize,

    /// Optional z-score normalization.
    #[serde(default)]
    pub input_mean: Option<Vec<f64>>,
    #[serde(default)]
    pub input_std: Option<Vec<f64>>,

    pub layers: Vec<DenseLayer>,

    #[serde(default)]
    pub output: OutputHead,

    /// Optional free-form metadata (versioning, training info, etc).
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl DenseNetwork {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GateError::Validation(msg));

        if self.input_dim == 0 {
            return invalid("input_dim must be > 0".to_string());
        }
        if self.layers.is_empty() {
            return invalid("layers must not be empty".to_string());
        }
        match (&self.input_mean, &self.input_std) {
            (Some(mean), Some(std)) => {
                if mean.len() != self.input_dim || std.len() != self.input_dim {
                    return invalid(format!(
                        "input_mean/input_std length {}/{} != input_dim {}",
                        mean.len(),
                        std.len(),
                        self.input_dim
                    ));
                }
                if mean.iter().any(|v| !v.is_finite()) {
                    return invalid("input_mean must be finite".to_string());
                }
                if std.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                    return invalid("input_std must be finite and > 0".to_string());
                }
            }
            (None, None) => {}
            _ => return invalid("input_mean and input_std must be provided together".to_string()),
        }

        let mut expected_in = self.input_dim;
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.out_dim() == 0 {
                return invalid(format!("layer[{idx}] out_dim must be > 0"));
            }
            if layer.bias.len() != layer.out_dim() {
                return invalid(format!(
                    "layer[{idx}] bias len {} != out_dim {}",
                    layer.bias.len(),
                    layer.out_dim()
                ));
            }
            for (r, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_in {
                    return invalid(format!(
                        "layer[{idx}] weights row {r} len {} != expected in_dim {expected_in}",
                        row.len()
                    ));
                }
            }
            let weights_finite = layer.weights.iter().flatten().all(|v| v.is_finite());
            if !weights_finite || layer.bias.iter().any(|v| !v.is_finite()) {
                return invalid(format!("layer[{idx}] has non-finite parameters"));
            }
            expected_in = layer.out_dim();
        }

        match self.output {
            OutputHead::Value | OutputHead::Threshold { .. } if self.output_dim() != 1 => invalid(
                format!("{:?} output needs output_dim=1, got {}", self.output, self.output_dim()),
            ),
            OutputHead::Threshold { cutoff } if !cutoff.is_finite() => {
                invalid("threshold cutoff must be finite".to_string())
            }
            _ => Ok(()),
        }
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.out_dim()).unwrap_or(0)
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_dim {
            return Err(GateError::Validation(format!(
                "DenseNetwork input dim mismatch: got {}, expected {}",
                input.len(),
                self.input_dim
            )));
        }

        let mut x: Vec<f64> = match (&self.input_mean, &self.input_std) {
            (Some(mean), Some(std)) => input
                .iter()
                .zip(mean.iter().zip(std))
                .map(|(v, (m, s))| (v - m) / s.max(1e-12))
                .collect(),
            _ => input.to_vec(),
        };

        for layer in &self.layers {
            x = layer.apply(&x);
        }
        Ok(x)
    }
}

impl Model for DenseNetwork {
    fn kind(&self) -> &'static str {
        "dense"
    }

    fn input_dim(&self) -> usize {
        self.input_dim
    }

    fn predict(&self, features: &[f64]) -> Result<f64> {
        let out = self.forward(features)?;
        let first = out.first().copied().ok_or_else(|| {
            GateError::Model("DenseNetwork produced no outputs".to_string())
        })?;
        Ok(match self.output {
            OutputHead::Value => first,
            OutputHead::Threshold { cutoff } => {
                if first >= cutoff {
                    1.0
                } else {
                    0.0
                }
            }
            OutputHead::Argmax => argmax(&out) as f64,
        })
    }
}

/// Index of the largest value; the first one wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, v)| {
            if *v > bv {
                (i, *v)
            } else {
                (bi, bv)
            }
        })
        .0
}

fn activate(x: f64, act: Activation) -> f64 {
    match act {
        Activation::Linear => x,
        Activation::Relu => x.max(0.0),
        Activation::Tanh => x.tanh(),
        Activation::Sigmoid => sigmoid(x),
    }
}

fn sigmoid(x: f64) -> f64 {
    // Numerically-stable sigmoid.
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}
