//! Finite-difference checks shared by the interpolation-method tests.

use super::Interpolation;
use crate::knots::SharedKnots;
use approx::assert_relative_eq;

const H: f64 = 1e-6;

/// Asserts that `accumulate_gradient` agrees with central finite
/// differences bumped through the unknown knot y values.
pub fn check_gradient(m: &mut dyn Interpolation, knots: &SharedKnots, x: f64) {
    let n = knots.borrow().number_of_unknowns();
    let mut grad = vec![0.0; n];
    m.accumulate_gradient(x, 1.0, &mut grad);
    for (i, g) in grad.iter().enumerate() {
        let fd = central_difference(m, knots, i, x, |m, x| m.evaluate(x));
        assert_relative_eq!(*g, fd, epsilon = 1e-5, max_relative = 1e-4);
    }
}

/// Asserts that `accumulate_integral_gradient` agrees with central finite
/// differences bumped through the unknown knot y values.
pub fn check_integral_gradient(m: &mut dyn Interpolation, knots: &SharedKnots, x: f64) {
    let n = knots.borrow().number_of_unknowns();
    let mut grad = vec![0.0; n];
    m.accumulate_integral_gradient(x, 1.0, &mut grad).unwrap();
    for (i, g) in grad.iter().enumerate() {
        let fd = central_difference(m, knots, i, x, |m, x| m.integral(x).unwrap());
        assert_relative_eq!(*g, fd, epsilon = 1e-5, max_relative = 1e-4);
    }
}

fn central_difference(
    m: &mut dyn Interpolation,
    knots: &SharedKnots,
    unknown: usize,
    x: f64,
    value: impl Fn(&dyn Interpolation, f64) -> f64,
) -> f64 {
    let y0 = knots.borrow().unknown_y(unknown).unwrap();

    knots.borrow_mut().set_unknown_y(unknown, y0 + H).unwrap();
    m.update().unwrap();
    let up = value(m, x);

    knots.borrow_mut().set_unknown_y(unknown, y0 - H).unwrap();
    m.update().unwrap();
    let down = value(m, x);

    knots.borrow_mut().set_unknown_y(unknown, y0).unwrap();
    m.update().unwrap();

    (up - down) / (2.0 * H)
}
