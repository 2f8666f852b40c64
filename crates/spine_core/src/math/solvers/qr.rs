//! Dense linear system solver based on Householder QR.
//!
//! Used to solve the small square systems that arise when initializing
//! spline coefficients from knot values. The systems are banded but tiny
//! (one row per knot), so a dense factorization is simpler and fast enough.

use crate::types::{CurveError, CurveResult};

/// Solves `A x = b` for square `A` using a Householder QR factorization.
///
/// # Arguments
///
/// * `a` - Row-major square matrix.
/// * `b` - Right-hand side, one entry per row of `a`.
///
/// # Returns
///
/// The solution vector `x`.
///
/// # Errors
///
/// Returns [`CurveError::InvalidInput`] when the dimensions are inconsistent
/// and [`CurveError::Numerical`] when the matrix is singular to working
/// precision.
pub fn solve_qr(a: &[Vec<f64>], b: &[f64]) -> CurveResult<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(CurveError::InvalidInput(format!(
            "matrix shape does not match rhs of length {n}"
        )));
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut r: Vec<Vec<f64>> = a.to_vec();
    let mut rhs = b.to_vec();

    // Apply Householder reflections column by column, updating the
    // right-hand side in place so Q never needs to be formed.
    for k in 0..n {
        let mut norm = 0.0;
        for row in r.iter().skip(k) {
            norm += row[k] * row[k];
        }
        let norm = norm.sqrt();
        if norm < 1e-14 {
            return Err(CurveError::Numerical(format!(
                "singular matrix in QR factorization at column {k}"
            )));
        }

        let alpha = if r[k][k] > 0.0 { -norm } else { norm };
        let mut v = vec![0.0; n - k];
        v[0] = r[k][k] - alpha;
        for i in (k + 1)..n {
            v[i - k] = r[i][k];
        }
        let v_dot = v.iter().map(|x| x * x).sum::<f64>();
        if v_dot < 1e-300 {
            // Column already triangular.
            continue;
        }

        for j in k..n {
            let mut dot = 0.0;
            for i in k..n {
                dot += v[i - k] * r[i][j];
            }
            let scale = 2.0 * dot / v_dot;
            for i in k..n {
                r[i][j] -= scale * v[i - k];
            }
        }

        let mut dot = 0.0;
        for i in k..n {
            dot += v[i - k] * rhs[i];
        }
        let scale = 2.0 * dot / v_dot;
        for i in k..n {
            rhs[i] -= scale * v[i - k];
        }
    }

    // Back substitution on the triangular factor.
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..n {
            sum -= r[i][j] * x[j];
        }
        if r[i][i].abs() < 1e-14 {
            return Err(CurveError::Numerical(format!(
                "singular matrix in back substitution at row {i}"
            )));
        }
        x[i] = sum / r[i][i];
    }

    Ok(x)
}

// ============================================================
// Tests
// ============================================================
