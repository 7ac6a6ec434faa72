use std::fmt::{self, Display};

use crate::tape::{self, TapeThreadLocal, CONSTANT};
use crate::Float;

/// Reverse-mode AD variable.
///
/// Just a value and a tape index, 12 bytes for `f64`. `Copy` because the
/// tape lives in a thread-local, not inside this struct.
#[derive(Clone, Copy, Debug)]
pub struct Reverse<F: Float> {
    pub(crate) value: F,
    pub(crate) index: u32,
}

impl<F: Float> Reverse<F> {
    /// Create a constant (not tracked on tape).
    #[inline]
    pub fn constant(value: F) -> Self {
        Reverse {
            value,
            index: CONSTANT,
        }
    }

    /// Create a reverse variable from a tape allocation.
    /// Typically only used internally by the API layer and tests.
    #[inline]
    pub fn from_tape(value: F, index: u32) -> Self {
        Reverse { value, index }
    }

    /// Get the tape index (for advanced usage / testing).
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Primal value.
    #[inline]
    pub fn val(&self) -> F {
        self.value
    }

    /// True if this value is not recorded on any tape.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.index == CONSTANT
    }
}

impl<F: Float + TapeThreadLocal> Reverse<F> {
    /// Register a new leaf on the active tape.
    ///
    /// # Panics
    ///
    /// Panics if no tape is active on this thread.
    pub fn variable(value: F) -> Self {
        let (index, value) = tape::with_active_tape(|t| t.new_variable(value));
        Reverse { value, index }
    }

    /// Partial derivatives of `self` with respect to each of `inputs`.
    ///
    /// Runs one reverse sweep over the active tape seeded at this node. Inputs
    /// that never influenced `self`, and constant inputs, get exactly zero.
    /// Each call allocates fresh adjoints, so repeated queries against the
    /// same tape are independent of one another.
    ///
    /// # Panics
    ///
    /// Panics if no tape is active, or if an input was created before the
    /// active tape was last cleared.
    pub fn grad(&self, inputs: &[Reverse<F>]) -> Vec<F> {
        if self.is_constant() {
            return vec![F::zero(); inputs.len()];
        }
        let adjoints = tape::with_active_tape(|t| t.reverse(self.index));
        inputs
            .iter()
            .map(|x| {
                if x.is_constant() {
                    F::zero()
                } else {
                    adjoints[x.index as usize]
                }
            })
            .collect()
    }
}

impl<F: Float> Display for Reverse<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<F: Float> Default for Reverse<F> {
    fn default() -> Self {
        Reverse::constant(F::zero())
    }
}
