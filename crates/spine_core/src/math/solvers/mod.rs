//! Linear solvers used by curve construction.

mod qr;

pub use qr::solve_qr;
