//! Canonical logical states and Bloch-sphere angles.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

/// Encoding angles `(theta, phi)` of the logical qubit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BlochAngles {
    /// Polar angle.
    pub theta: f64,
    /// Azimuthal angle.
    pub phi: f64,
}

impl BlochAngles {
    /// Create angles.
    pub fn new(theta: f64, phi: f64) -> Self {
        Self { theta, phi }
    }

    /// Both angles are finite.
    pub fn is_finite(&self) -> bool {
        self.theta.is_finite() && self.phi.is_finite()
    }
}

impl fmt::Display for BlochAngles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(θ={:.4}, φ={:.4})", self.theta, self.phi)
    }
}

/// The four canonical logical states used by the benchmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalState {
    /// |0⟩
    Zero,
    /// |1⟩
    One,
    /// |+⟩
    Plus,
    /// |−⟩
    Minus,
}

impl LogicalState {
    /// All canonical states.
    pub const ALL: [LogicalState; 4] = [
        LogicalState::Zero,
        LogicalState::One,
        LogicalState::Plus,
        LogicalState::Minus,
    ];

    /// Encoding angles of this state.
    pub fn angles(self) -> BlochAngles {
        match self {
            LogicalState::Zero => BlochAngles::new(0.0, 0.0),
            LogicalState::One => BlochAngles::new(0.0, PI),
            LogicalState::Plus => BlochAngles::new(0.0, FRAC_PI_2),
            LogicalState::Minus => BlochAngles::new(PI, FRAC_PI_2),
        }
    }

    /// Ket label, e.g. `|+>`.
    pub fn ket(self) -> &'static str {
        match self {
            LogicalState::Zero => "|0>",
            LogicalState::One => "|1>",
            LogicalState::Plus => "|+>",
            LogicalState::Minus => "|->",
        }
    }
}

impl From<LogicalState> for BlochAngles {
    fn from(state: LogicalState) -> Self {
        state.angles()
    }
}

impl fmt::Display for LogicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ket())
    }
}

impl FromStr for LogicalState {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "|0>" | "|0⟩" | "0" | "zero" => Ok(LogicalState::Zero),
            "|1>" | "|1⟩" | "1" | "one" => Ok(LogicalState::One),
            "|+>" | "|+⟩" | "+" | "plus" => Ok(LogicalState::Plus),
            "|->" | "|-⟩" | "-" | "minus" => Ok(LogicalState::Minus),
            _ => Err(CodeError::UnknownState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_angles() {
        assert_eq!(LogicalState::Zero.angles(), BlochAngles::new(0.0, 0.0));
        assert_eq!(LogicalState::One.angles(), BlochAngles::new(0.0, PI));
        assert_eq!(LogicalState::Plus.angles(), BlochAngles::new(0.0, FRAC_PI_2));
        assert_eq!(LogicalState::Minus.angles(), BlochAngles::new(PI, FRAC_PI_2));
    }

    #[test]
    fn test_parse_names() {
        for state in LogicalState::ALL {
            assert_eq!(state.ket().parse::<LogicalState>().unwrap(), state);
        }
        assert_eq!("Plus".parse::<LogicalState>().unwrap(), LogicalState::Plus);
        assert!(matches!(
            "|2>".parse::<LogicalState>(),
            Err(CodeError::UnknownState(_))
        ));
    }
}
