use std::fmt::{Debug, Display};

use num_traits::{Float as NumFloat, FloatConst, FromPrimitive};

/// Marker trait for the primitive floats (`f32`, `f64`) at the bottom of every
/// nesting of AD types.
///
/// Tape storage, adjoints and special-function kernels are all expressed in
/// terms of this trait. AD wrapper types never implement it.
pub trait Float:
    NumFloat + FloatConst + FromPrimitive + Copy + Send + Sync + Default + Debug + Display + 'static
{
}

impl Float for f32 {}
impl Float for f64 {}
