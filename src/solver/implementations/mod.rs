//! Implementations of the conic solver backend trait.

pub mod admm;
