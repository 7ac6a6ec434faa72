//! Two-stack tape for reverse-mode AD.
//!
//! Each statement stores the precomputed partial derivatives (multipliers) of
//! its result with respect to its operands, so the reverse sweep is a single
//! multiply-accumulate loop. Statements can only reference earlier variables,
//! which makes creation order a valid topological order.
//!
//! A tape is owned by the caller and made visible to [`crate::Reverse`]
//! arithmetic through a thread-local pointer installed by [`TapeGuard`]. Every
//! thread therefore records onto its own tape.

use std::cell::Cell;

use crate::Float;

/// Sentinel index indicating a constant (not recorded on tape).
pub const CONSTANT: u32 = u32::MAX;

/// A recorded operation: its result lives at `lhs_index`, and its operands'
/// multipliers/indices span `[prev.end_plus_one .. self.end_plus_one)`.
#[derive(Clone, Copy, Debug)]
struct Statement {
    lhs_index: u32,
    end_plus_one: u32,
}

const SENTINEL: Statement = Statement {
    lhs_index: 0,
    end_plus_one: 0,
};

/// Reverse-mode tape: an append-only log of statements plus the variable
/// counter that hands out node indices.
pub struct Tape<F: Float> {
    statements: Vec<Statement>,
    multipliers: Vec<F>,
    indices: Vec<u32>,
    num_variables: u32,
}

impl<F: Float> Default for Tape<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Tape<F> {
    /// Create an empty tape.
    pub fn new() -> Self {
        Tape {
            // Sentinel statement at index 0 so that `statements[i-1].end_plus_one`
            // is always valid for i >= 1.
            statements: vec![SENTINEL],
            multipliers: Vec::new(),
            indices: Vec::new(),
            num_variables: 0,
        }
    }

    /// Create a tape with room for roughly `est_ops` operations.
    pub fn with_capacity(est_ops: usize) -> Self {
        log::debug!("allocating tape for ~{} operations", est_ops);
        let mut statements = Vec::with_capacity(est_ops + 1);
        statements.push(SENTINEL);
        Tape {
            statements,
            multipliers: Vec::with_capacity(est_ops * 2),
            indices: Vec::with_capacity(est_ops * 2),
            num_variables: 0,
        }
    }

    /// Number of variables (leaves and results) allocated so far.
    pub fn len(&self) -> usize {
        self.num_variables as usize
    }

    /// True when no variable has been allocated.
    pub fn is_empty(&self) -> bool {
        self.num_variables == 0
    }

    /// Number of recorded statements (leaves are not statements).
    pub fn num_statements(&self) -> usize {
        self.statements.len() - 1
    }

    /// Discard every statement and variable.
    ///
    /// Any `Reverse` created against this tape before the call refers to a
    /// stale index afterwards and must not be used again.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing tape: {} variables, {} statements",
            self.num_variables,
            self.num_statements()
        );
        self.statements.clear();
        self.statements.push(SENTINEL);
        self.multipliers.clear();
        self.indices.clear();
        self.num_variables = 0;
    }

    /// Register a new independent variable. Returns `(index, value)`.
    ///
    /// No statement is pushed for leaves.
    #[inline]
    pub fn new_variable(&mut self, value: F) -> (u32, F) {
        let idx = self.num_variables;
        self.num_variables += 1;
        (idx, value)
    }

    /// Record a unary operation: `result = f(operand)` with precomputed `multiplier = df/d(operand)`.
    #[inline]
    pub fn push_unary(&mut self, operand_idx: u32, multiplier: F) -> u32 {
        if operand_idx != CONSTANT {
            self.multipliers.push(multiplier);
            self.indices.push(operand_idx);
        }
        self.finish_statement()
    }

    /// Record a binary operation with precomputed partial derivatives.
    #[inline]
    pub fn push_binary(&mut self, lhs_idx: u32, lhs_mult: F, rhs_idx: u32, rhs_mult: F) -> u32 {
        if lhs_idx != CONSTANT {
            self.multipliers.push(lhs_mult);
            self.indices.push(lhs_idx);
        }
        if rhs_idx != CONSTANT {
            self.multipliers.push(rhs_mult);
            self.indices.push(rhs_idx);
        }
        self.finish_statement()
    }

    /// Record an operation with any number of operands, given as
    /// `(index, partial)` pairs. Constant operands are skipped.
    pub fn push_nary(&mut self, operands: impl IntoIterator<Item = (u32, F)>) -> u32 {
        for (idx, mult) in operands {
            if idx != CONSTANT {
                self.multipliers.push(mult);
                self.indices.push(idx);
            }
        }
        self.finish_statement()
    }

    #[inline]
    fn finish_statement(&mut self) -> u32 {
        let result_idx = self.num_variables;
        self.num_variables += 1;
        self.statements.push(Statement {
            lhs_index: result_idx,
            end_plus_one: self.multipliers.len() as u32,
        });
        result_idx
    }

    /// Run the reverse sweep, seeding the adjoint of `seed_index` with 1.
    /// Returns the full adjoint vector, one entry per variable.
    pub fn reverse(&self, seed_index: u32) -> Vec<F> {
        self.reverse_seeded(&[(seed_index, F::one())])
    }

    /// Run the reverse sweep with custom adjoint seeds.
    ///
    /// Seeds on [`CONSTANT`] are ignored. Adjoints of interior nodes are left
    /// in place so they can be read back alongside the leaves.
    pub fn reverse_seeded(&self, seeds: &[(u32, F)]) -> Vec<F> {
        log::trace!(
            "reverse sweep over {} statements with {} seeds",
            self.num_statements(),
            seeds.len()
        );
        let mut adjoints = vec![F::zero(); self.num_variables as usize];
        for &(idx, seed) in seeds {
            if idx != CONSTANT {
                adjoints[idx as usize] = adjoints[idx as usize] + seed;
            }
        }

        for i in (1..self.statements.len()).rev() {
            let stmt = self.statements[i];
            let a = adjoints[stmt.lhs_index as usize];
            if a != F::zero() {
                let start = self.statements[i - 1].end_plus_one as usize;
                let end = stmt.end_plus_one as usize;
                for j in start..end {
                    adjoints[self.indices[j] as usize] =
                        adjoints[self.indices[j] as usize] + self.multipliers[j] * a;
                }
            }
        }
        adjoints
    }
}

// Thread-local active tape pointer.
thread_local! {
    static TAPE_F32: Cell<*mut Tape<f32>> = const { Cell::new(std::ptr::null_mut()) };
    static TAPE_F64: Cell<*mut Tape<f64>> = const { Cell::new(std::ptr::null_mut()) };
}

/// Trait to select the correct thread-local for a given float type.
pub trait TapeThreadLocal: Float {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>>;
}

impl TapeThreadLocal for f32 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F32
    }
}

impl TapeThreadLocal for f64 {
    fn cell() -> &'static std::thread::LocalKey<Cell<*mut Tape<Self>>> {
        &TAPE_F64
    }
}

/// True when a tape is active on this thread for `F`.
pub fn has_active_tape<F: TapeThreadLocal>() -> bool {
    F::cell().with(|cell| !cell.get().is_null())
}

/// Access the active tape for the current thread. Panics if no tape is active.
#[inline]
pub fn with_active_tape<F: TapeThreadLocal, R>(f: impl FnOnce(&mut Tape<F>) -> R) -> R {
    F::cell().with(|cell| {
        let ptr = cell.get();
        assert!(
            !ptr.is_null(),
            "No active tape. Activate one with TapeGuard or use nestad::grad()."
        );
        // SAFETY: The TapeGuard guarantees the pointer is valid for the
        // duration of the guarded scope, and only one mutable reference
        // exists at a time (single-threaded access via thread-local).
        let tape = unsafe { &mut *ptr };
        f(tape)
    })
}

/// Record a unary statement unless the operand is a constant, in which case
/// the result is a constant too and the tape is not touched.
#[inline]
pub(crate) fn record_unary<F: TapeThreadLocal>(operand_idx: u32, multiplier: F) -> u32 {
    if operand_idx == CONSTANT {
        return CONSTANT;
    }
    with_active_tape(|t| t.push_unary(operand_idx, multiplier))
}

/// Binary counterpart of [`record_unary`].
#[inline]
pub(crate) fn record_binary<F: TapeThreadLocal>(
    lhs_idx: u32,
    lhs_mult: F,
    rhs_idx: u32,
    rhs_mult: F,
) -> u32 {
    if lhs_idx == CONSTANT && rhs_idx == CONSTANT {
        return CONSTANT;
    }
    with_active_tape(|t| t.push_binary(lhs_idx, lhs_mult, rhs_idx, rhs_mult))
}

/// N-ary counterpart of [`record_unary`].
pub(crate) fn record_nary<F: TapeThreadLocal>(operands: &[(u32, F)]) -> u32 {
    if operands.iter().all(|&(idx, _)| idx == CONSTANT) {
        return CONSTANT;
    }
    with_active_tape(|t| t.push_nary(operands.iter().copied()))
}

/// RAII guard that sets a tape as the thread-local active tape and restores
/// the previous one on drop.
pub struct TapeGuard<F: TapeThreadLocal> {
    prev: *mut Tape<F>,
}

impl<F: TapeThreadLocal> TapeGuard<F> {
    /// Activate `tape` as the thread-local tape. Returns a guard that restores
    /// the previous tape on drop.
    pub fn new(tape: &mut Tape<F>) -> Self {
        let prev = F::cell().with(|cell| {
            let prev = cell.get();
            cell.set(tape as *mut Tape<F>);
            prev
        });
        TapeGuard { prev }
    }
}

impl<F: TapeThreadLocal> Drop for TapeGuard<F> {
    fn drop(&mut self) {
        F::cell().with(|cell| {
            cell.set(self.prev);
        });
    }
}
