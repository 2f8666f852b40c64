//! Numerical utilities shared across the curve layer.

pub mod solvers;
