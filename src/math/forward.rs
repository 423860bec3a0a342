//! Expected replication time for a firing-rate profile.
//!
//! For every window radius `k = 0..=L` the model widens a running reach
//!
//! ```text
//! unitary_k(j) = Σ_{|d| <= k} x(j + d)
//! ```
//!
//! (edge-wrapped, see [`roll_add`]) and adds the probability mass that the position
//! is first reached during step `k`, scaled by the reach:
//!
//! ```text
//! E_k(j) = exp(-Σ_{i <= k} unitary_i(j) / v)
//! y(j)  += (E_{k-1}(j) - E_k(j)) / unitary_k(j)        with E_{-1} = 1
//! ```
//!
//! The recurrence is evaluated on whole columns with nalgebra so each radius costs
//! `O(N)`.

use nalgebra::DVector;

use crate::math::roll_add;

/// Run the forward model on `rates` with window radius `radius` and speed `speed`.
///
/// Output is position-aligned with `rates`. Every rate must be strictly positive
/// for the result to be finite; callers keep the profile above its floor.
pub fn expected_timing(rates: &[f64], radius: usize, speed: f64) -> Vec<f64> {
    let n = rates.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = radius.min(n);

    let mut unitary = DVector::from_column_slice(rates);
    let mut raw_exponent = DVector::<f64>::zeros(n);
    let mut decay = DVector::<f64>::from_element(n, 1.0);
    let mut timing = DVector::<f64>::zeros(n);

    for k in 0..=radius {
        if k != 0 {
            let shift = k as isize;
            roll_add(unitary.as_mut_slice(), rates, shift);
            roll_add(unitary.as_mut_slice(), rates, -shift);
        }

        let next_raw = &raw_exponent + &unitary / speed;
        let next_decay = next_raw.map(|e| (-e).exp());

        timing += (&decay - &next_decay).component_div(&unitary);

        raw_exponent = next_raw;
        decay = next_decay;
    }

    timing.as_slice().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_position_aligned() {
        let rates = vec![0.1; 37];
        for radius in [0, 1, 5, 18] {
            assert_eq!(expected_timing(&rates, radius, 1.4).len(), 37);
        }
    }

    #[test]
    fn zero_radius_is_single_term() {
        let rates = [0.5, 1.0, 2.0];
        let v = 1.4;
        let y = expected_timing(&rates, 0, v);
        for (yi, xi) in y.iter().zip(rates) {
            let expected = (1.0 - (-xi / v).exp()) / xi;
            assert!((yi - expected).abs() < 1e-15);
        }
    }

    #[test]
    fn radius_one_matches_hand_computation() {
        // Uniform profile: unitary_0 = x, unitary_1 = 3x.
        let x = 0.2;
        let v = 1.4;
        let y = expected_timing(&[x; 5], 1, v);

        let e0 = (-x / v).exp();
        let e1 = (-(x + 3.0 * x) / v).exp();
        let expected = (1.0 - e0) / x + (e0 - e1) / (3.0 * x);
        for yi in y {
            assert!((yi - expected).abs() < 1e-14);
        }
    }

    #[test]
    fn uniform_profile_gives_uniform_timing() {
        let y = expected_timing(&[0.05; 20], 4, 1.4);
        let first = y[0];
        assert!(y.iter().all(|v| (v - first).abs() < 1e-12));
    }

    #[test]
    fn higher_rates_replicate_earlier() {
        let slow = expected_timing(&[0.01; 10], 2, 1.4);
        let fast = expected_timing(&[0.5; 10], 2, 1.4);
        assert!(fast[0] < slow[0]);
    }

    #[test]
    fn tiny_floor_rates_stay_finite() {
        let mut rates = vec![1e-15; 12];
        rates[6] = 0.3;
        let y = expected_timing(&rates, 3, 1.4);
        assert!(y.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn empty_profile_is_empty() {
        assert!(expected_timing(&[], 3, 1.4).is_empty());
    }
}
