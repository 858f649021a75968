//! The evaluation oracle consulted by search.
//!
//! An oracle maps an encoded position to a move-logit head, a tile-logit
//! head and a scalar value, all in canonical (mover at the bottom)
//! orientation. Search treats it as a black box; anything that satisfies
//! `Oracle` can drive it, from a remote network to a constant stub.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{MOVE_SPACE, TILE_SPACE};

/// Encoded game state as a flat tensor for neural network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor, `[planes, height, width]` for board encodings.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }
}

/// Errors an oracle can report. Both abort the current search call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    /// The oracle could not produce an answer at all.
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle answered with the wrong shape, non-finite logits or a
    /// value outside `[-1, 1]`.
    #[error("malformed oracle output: {0}")]
    MalformedOutput(String),
}

/// One oracle answer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleOutput {
    /// One logit per `from * 25 + to`.
    pub move_logits: Vec<f32>,
    /// One logit per tile index (no placement, 25 black, 25 gray).
    pub tile_logits: Vec<f32>,
    /// Expected outcome for the side to move, in `[-1, 1]`.
    pub value: f32,
}

impl OracleOutput {
    /// Check head lengths, that every logit is finite and that the value
    /// lies in `[-1, 1]`.
    pub fn validate(&self) -> Result<(), OracleError> {
        if self.move_logits.len() != MOVE_SPACE {
            return Err(OracleError::MalformedOutput(format!(
                "expected {MOVE_SPACE} move logits, got {}",
                self.move_logits.len()
            )));
        }
        if self.tile_logits.len() != TILE_SPACE {
            return Err(OracleError::MalformedOutput(format!(
                "expected {TILE_SPACE} tile logits, got {}",
                self.tile_logits.len()
            )));
        }
        if !(-1.0..=1.0).contains(&self.value) {
            return Err(OracleError::MalformedOutput(format!(
                "value {} is outside [-1, 1]",
                self.value
            )));
        }
        if let Some(bad) = self
            .move_logits
            .iter()
            .chain(self.tile_logits.iter())
            .find(|l| !l.is_finite())
        {
            return Err(OracleError::MalformedOutput(format!("logit {bad} is not finite")));
        }
        Ok(())
    }
}

/// Position evaluator used by search at unexpanded nodes.
///
/// Implementations must be deterministic for search results to be
/// reproducible under a fixed seed.
pub trait Oracle: Send + Sync {
    /// Evaluate one encoded position.
    fn evaluate(&self, encoded: &EncodedState) -> Result<OracleOutput, OracleError>;

    /// Batch evaluation (optional optimization).
    fn evaluate_batch(&self, encoded: &[EncodedState]) -> Result<Vec<OracleOutput>, OracleError> {
        encoded.iter().map(|e| self.evaluate(e)).collect()
    }
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn evaluate(&self, encoded: &EncodedState) -> Result<OracleOutput, OracleError> {
        (**self).evaluate(encoded)
    }

    fn evaluate_batch(&self, encoded: &[EncodedState]) -> Result<Vec<OracleOutput>, OracleError> {
        (**self).evaluate_batch(encoded)
    }
}

/// All-zero logits and a zero value: uniform priors over legal actions.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformOracle;

impl Oracle for UniformOracle {
    fn evaluate(&self, _encoded: &EncodedState) -> Result<OracleOutput, OracleError> {
        Ok(OracleOutput {
            move_logits: vec![0.0; MOVE_SPACE],
            tile_logits: vec![0.0; TILE_SPACE],
            value: 0.0,
        })
    }
}

/// Fixed logits and value regardless of input (for testing).
#[derive(Clone, Debug)]
pub struct ConstantOracle {
    output: OracleOutput,
}

impl ConstantOracle {
    /// Zero logits and zero value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OracleOutput {
                move_logits: vec![0.0; MOVE_SPACE],
                tile_logits: vec![0.0; TILE_SPACE],
                value: 0.0,
            },
        }
    }

    /// Set the value returned for every position.
    #[must_use]
    pub fn with_value(mut self, value: f32) -> Self {
        self.output.value = value;
        self
    }

    /// Set a single move logit. Out-of-range indices are ignored.
    #[must_use]
    pub fn with_move_logit(mut self, move_index: usize, logit: f32) -> Self {
        if let Some(slot) = self.output.move_logits.get_mut(move_index) {
            *slot = logit;
        }
        self
    }

    /// Set a single tile logit. Out-of-range indices are ignored.
    #[must_use]
    pub fn with_tile_logit(mut self, tile_index: usize, logit: f32) -> Self {
        if let Some(slot) = self.output.tile_logits.get_mut(tile_index) {
            *slot = logit;
        }
        self
    }

    /// Replace the whole output. Not validated until search asks for it.
    #[must_use]
    pub fn with_output(mut self, output: OracleOutput) -> Self {
        self.output = output;
        self
    }
}

impl Default for ConstantOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl Oracle for ConstantOracle {
    fn evaluate(&self, _encoded: &EncodedState) -> Result<OracleOutput, OracleError> {
        Ok(self.output.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoded_state_zeros() {
        let state = EncodedState::zeros(vec![2, 3]);
        assert_eq!(state.tensor.len(), 6);
        assert!(state.tensor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_uniform_oracle_is_valid() {
        let output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        assert!(output.validate().is_ok());
        assert_eq!(output.value, 0.0);
    }

    #[test]
    fn test_constant_oracle_builder() {
        let oracle = ConstantOracle::new()
            .with_value(0.5)
            .with_move_logit(3, 2.0)
            .with_tile_logit(50, -1.0)
            .with_move_logit(10_000, 9.0);
        let output = oracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();

        assert_eq!(output.value, 0.5);
        assert_eq!(output.move_logits[3], 2.0);
        assert_eq!(output.tile_logits[50], -1.0);
        assert!(output.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let mut output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        output.move_logits.pop();
        assert!(matches!(output.validate(), Err(OracleError::MalformedOutput(_))));

        let mut output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        output.tile_logits.push(0.0);
        assert!(matches!(output.validate(), Err(OracleError::MalformedOutput(_))));
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let mut output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        output.value = f32::NAN;
        assert!(output.validate().is_err());

        let mut output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        output.value = 1.5;
        assert!(matches!(output.validate(), Err(OracleError::MalformedOutput(_))));
        output.value = -1.0;
        assert!(output.validate().is_ok());

        let mut output = UniformOracle.evaluate(&EncodedState::zeros(vec![1])).unwrap();
        output.move_logits[7] = f32::INFINITY;
        assert!(output.validate().is_err());
    }

    #[test]
    fn test_evaluate_batch() {
        let oracle = ConstantOracle::new().with_value(-0.25);
        let states = vec![EncodedState::zeros(vec![2]), EncodedState::zeros(vec![2])];
        let outputs = (&oracle).evaluate_batch(&states).unwrap();

        assert_eq!(outputs.len(), 2);
        assert!(outputs.iter().all(|o| o.value == -0.25));
    }

    #[test]
    fn test_output_serialization() {
        let output = ConstantOracle::new()
            .with_value(1.0)
            .evaluate(&EncodedState::zeros(vec![1]))
            .unwrap();
        let json = serde_json::to_string(&output).unwrap();
        let deserialized: OracleOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(output, deserialized);
    }
}
