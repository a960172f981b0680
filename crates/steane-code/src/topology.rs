//! Stabilizer topology of the [[7,1,3]] color code.
//!
//! Three plaquettes, each labelled by a color, check four of the seven
//! physical qubits. The same supports are used for the X-type and the
//! Z-type stabilizer families:
//!
//! ```text
//!   RED   = {2, 3, 4, 6}
//!   GREEN = {1, 2, 4, 5}
//!   BLUE  = {0, 1, 2, 3}
//! ```
//!
//! Color order (RED, GREEN, BLUE) is part of the bit-exact syndrome
//! contract: RED is the most significant bit of a [`SyndromeVector`].
//!
//! [`SyndromeVector`]: crate::syndrome::SyndromeVector

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CodeError, CodeResult};

/// Number of physical qubits in the code block.
pub const NUM_QUBITS: usize = 7;

/// Number of qubits checked by each stabilizer.
pub const GROUP_WEIGHT: usize = 4;

/// Plaquette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    /// Red plaquette, most significant syndrome bit.
    Red,
    /// Green plaquette.
    Green,
    /// Blue plaquette, least significant syndrome bit.
    Blue,
}

impl Color {
    /// Colors in syndrome bit order.
    pub const ORDER: [Color; 3] = [Color::Red, Color::Green, Color::Blue];

    /// Bit mask of this color inside a 3-bit syndrome.
    pub fn mask(self) -> u8 {
        match self {
            Color::Red => 0b100,
            Color::Green => 0b010,
            Color::Blue => 0b001,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "red"),
            Color::Green => write!(f, "green"),
            Color::Blue => write!(f, "blue"),
        }
    }
}

/// Probe basis of a stabilizer family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// X-type stabilizers; detect X components of a fault.
    X,
    /// Z-type stabilizers; detect Z components of a fault.
    Z,
}

impl Basis {
    /// Both bases in measurement order.
    pub const BOTH: [Basis; 2] = [Basis::X, Basis::Z];
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Basis::X => write!(f, "X"),
            Basis::Z => write!(f, "Z"),
        }
    }
}

/// One color-labelled stabilizer of one basis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilizerGroup {
    /// Plaquette color.
    pub color: Color,
    /// Stabilizer family.
    pub basis: Basis,
    /// Checked qubits, ascending.
    pub qubits: [usize; GROUP_WEIGHT],
}

impl StabilizerGroup {
    /// Create a group; the support is stored sorted.
    pub fn new(color: Color, basis: Basis, mut qubits: [usize; GROUP_WEIGHT]) -> Self {
        qubits.sort_unstable();
        Self {
            color,
            basis,
            qubits,
        }
    }

    /// Whether `qubit` is in the support.
    pub fn contains(&self, qubit: usize) -> bool {
        self.qubits.contains(&qubit)
    }
}

/// The full set of six stabilizer groups.
///
/// Immutable once validated; share it by reference or inside an `Arc`.
/// Groups are kept per basis in RED, GREEN, BLUE order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StabilizerTopology {
    x_groups: [StabilizerGroup; 3],
    z_groups: [StabilizerGroup; 3],
}

impl StabilizerTopology {
    /// The standard [[7,1,3]] layout.
    pub fn steane() -> Self {
        let supports = [[2, 3, 4, 6], [1, 2, 4, 5], [0, 1, 2, 3]];
        let family = |basis| {
            std::array::from_fn(|i| StabilizerGroup::new(Color::ORDER[i], basis, supports[i]))
        };
        Self {
            x_groups: family(Basis::X),
            z_groups: family(Basis::Z),
        }
    }

    /// Build and validate a topology from arbitrary groups.
    ///
    /// Exactly one group per (color, basis) is required; the result is then
    /// checked with [`validate`](Self::validate).
    pub fn from_groups(groups: Vec<StabilizerGroup>) -> CodeResult<Self> {
        if groups.len() != Color::ORDER.len() * Basis::BOTH.len() {
            return Err(CodeError::InvalidTopology(format!(
                "expected 6 groups, found {}",
                groups.len()
            )));
        }
        let topology = Self {
            x_groups: Self::family(&groups, Basis::X)?,
            z_groups: Self::family(&groups, Basis::Z)?,
        };
        topology.validate()?;
        Ok(topology)
    }

    /// Check the structural invariants:
    /// - four distinct in-range indices per group
    /// - X and Z groups of the same color have identical supports
    /// - every qubit is checked by at least one color
    pub fn validate(&self) -> CodeResult<()> {
        for group in self.all_groups() {
            if let Some(&q) = group.qubits.iter().find(|&&q| q >= NUM_QUBITS) {
                return Err(CodeError::QubitOutOfRange {
                    index: q,
                    num_qubits: NUM_QUBITS,
                });
            }
            if group.qubits.windows(2).any(|w| w[0] == w[1]) {
                return Err(CodeError::InvalidTopology(format!(
                    "{} {} group repeats a qubit",
                    group.basis, group.color
                )));
            }
        }

        for (x, z) in self.x_groups.iter().zip(&self.z_groups) {
            if x.qubits != z.qubits {
                return Err(CodeError::InvalidTopology(format!(
                    "{} X and Z supports differ: {:?} vs {:?}",
                    x.color, x.qubits, z.qubits
                )));
            }
        }

        if let Some(q) = (0..NUM_QUBITS).find(|&q| self.membership(q) == 0) {
            return Err(CodeError::InvalidTopology(format!(
                "qubit {q} is not checked by any stabilizer"
            )));
        }
        Ok(())
    }

    fn family(groups: &[StabilizerGroup], basis: Basis) -> CodeResult<[StabilizerGroup; 3]> {
        let mut slots: [Option<StabilizerGroup>; 3] = [None, None, None];
        for group in groups.iter().filter(|g| g.basis == basis) {
            let slot = &mut slots[color_slot(group.color)];
            if slot.is_some() {
                return Err(CodeError::InvalidTopology(format!(
                    "duplicate {basis} {} group",
                    group.color
                )));
            }
            *slot = Some(StabilizerGroup::new(group.color, basis, group.qubits));
        }
        let [r, g, b] = slots;
        match (r, g, b) {
            (Some(r), Some(g), Some(b)) => Ok([r, g, b]),
            _ => Err(CodeError::InvalidTopology(format!(
                "missing a {basis} group"
            ))),
        }
    }

    /// The three groups of `basis` in RED, GREEN, BLUE order.
    pub fn groups(&self, basis: Basis) -> &[StabilizerGroup; 3] {
        match basis {
            Basis::X => &self.x_groups,
            Basis::Z => &self.z_groups,
        }
    }

    /// All six groups, X family first.
    pub fn all_groups(&self) -> impl Iterator<Item = &StabilizerGroup> {
        self.x_groups.iter().chain(&self.z_groups)
    }

    /// 3-bit pattern of colors whose support contains `qubit`.
    ///
    /// This is the syndrome delta a single X (or Z) fault on `qubit`
    /// produces in the X (or Z) family.
    pub fn membership(&self, qubit: usize) -> u8 {
        self.x_groups
            .iter()
            .filter(|g| g.contains(qubit))
            .fold(0, |acc, g| acc | g.color.mask())
    }
}

fn color_slot(color: Color) -> usize {
    match color {
        Color::Red => 0,
        Color::Green => 1,
        Color::Blue => 2,
    }
}

impl Default for StabilizerTopology {
    fn default() -> Self {
        Self::steane()
    }
}
