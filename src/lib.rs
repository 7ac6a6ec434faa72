//! Nested forward- and reverse-mode automatic differentiation over dense
//! linear algebra.
//!
//! [`Reverse`] records onto a thread-local [`Tape`]; [`Dual`] carries a
//! tangent in any [`Scalar`], so `Dual<Reverse<f64>>` and
//! `Dual<Dual<Reverse<f64>>>` deliver second and third derivatives from a
//! single evaluation. The [`linalg`] routines and [`prob`] densities are
//! written once against [`Scalar`] and work at every nesting depth.

pub mod api;
pub mod check;
pub mod container;
pub mod dual;
pub mod error;
pub mod float;
pub mod linalg;
pub mod prob;
pub mod promote;
pub mod reverse;
pub mod scalar;
pub mod special;
pub mod tape;
mod traits;

pub use api::{grad, grad_hessian, hessian, hvp, jacobian, jvp, vjp};
pub use container::{Container, Matrix, RowVector, Vector};
pub use dual::Dual;
pub use error::{Error, Result};
pub use float::Float;
pub use promote::{Promote, Promoted};
pub use reverse::Reverse;
pub use scalar::Scalar;
pub use tape::{Tape, TapeGuard};

/// Type alias for forward-mode dual numbers over `f64`.
pub type Dual64 = Dual<f64>;
/// Type alias for forward-mode dual numbers over `f32`.
pub type Dual32 = Dual<f32>;
/// Type alias for reverse-mode variables over `f64`.
pub type Reverse64 = Reverse<f64>;
/// Type alias for reverse-mode variables over `f32`.
pub type Reverse32 = Reverse<f32>;
/// Forward-over-reverse scalar for second derivatives.
pub type DualReverse64 = Dual<Reverse<f64>>;
/// Doubly nested forward-over-reverse scalar for third derivatives.
pub type DualDualReverse64 = Dual<Dual<Reverse<f64>>>;
