//! Linear algebra types and traits used by the reference backend.
//!
//! All internal math goes through the traits defined here, which are
//! implemented generically for floats of type [`FloatT`].  The canonical
//! sparse type is [`CscMatrix`], which uses native `usize` index arrays.
//! Caller-facing sparse inputs with 32- or 64-bit indices live in
//! [`crate::solver::inputs`] and are converted at the backend
//! boundary.

#![allow(non_snake_case)]

mod csc;
mod dense;
mod error_types;
mod floats;
mod math_traits;
mod matrix_types;
mod vecmath;

pub use csc::*;
pub use dense::*;
pub use error_types::*;
pub use floats::*;
pub use math_traits::*;
pub use matrix_types::*;

/// Number of elements in the triangle of a `k×k` matrix
#[inline]
pub fn triangular_number(k: usize) -> usize {
    (k * (k + 1)) >> 1
}
