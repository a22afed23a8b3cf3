/// Normalizes an angle in degrees to the range [0, 360).
///
/// This function takes any angle value (positive or negative) and converts it
/// to an equivalent angle in the range [0, 360). Values outside this range
/// are wrapped around using modulo arithmetic.
pub(crate) fn normalize_degrees_360(degrees: f64) -> f64 {
    let turns = degrees / 360.0;
    let mut limited = 360.0 * (turns - turns.floor());
    if limited < 0.0 {
        limited += 360.0;
    }
    if limited >= 360.0 {
        limited -= 360.0;
    }
    limited
}

/// Computes a polynomial using Horner's method.
///
/// Coefficients are ordered [a₀, a₁, a₂, ...] for a₀ + a₁x + a₂x² + ...
pub(crate) fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    let Some(&last) = coeffs.last() else {
        return 0.0;
    };

    let mut result = last;
    for &coeff in coeffs.iter().rev().skip(1) {
        result = result.mul_add(x, coeff);
    }
    result
}
