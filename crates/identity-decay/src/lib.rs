//! The three interchangeable decay families from which a rule set selects.
//! Every function here is pure over 64-bit floats: no I/O, no allocation,
//! nothing but arithmetic.

use serde::{Deserialize, Serialize};

/// Which decay family a rule set has selected. `Power`'s `p <= 0` is
/// normalized to `1.0` for `apply_decay`/`apply_inactivity_decay`, and to
/// `0.5` for `time_bonus`, per the documented boundary behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayFn {
    Exponential,
    Linear,
    Power { p: f64 },
}

fn clamp_rate(r: f64) -> f64 {
    r.min(1.0)
}

impl DecayFn {
    /// `v` decayed by `delta_epoch` epochs with half-life `h`.
    /// `delta_epoch <= 0` or `h <= 0` returns `v` unchanged.
    pub fn apply_decay(&self, v: f64, delta_epoch: f64, h: f64) -> f64 {
        if delta_epoch <= 0.0 || h <= 0.0 {
            return v;
        }
        match *self {
            DecayFn::Exponential => v * 0.5_f64.powf(delta_epoch / h),
            DecayFn::Linear => v * (1.0 - delta_epoch / (2.0 * h)).max(0.0),
            DecayFn::Power { p } => {
                let p = if p <= 0.0 { 1.0 } else { p };
                v * (1.0 + delta_epoch / h).powf(-p)
            }
        }
    }

    /// `v` decayed by inactivity rate `r` over `delta_epoch` epochs.
    /// `delta_epoch <= 0` returns `v` unchanged; `r > 1` is clamped to `1`.
    pub fn apply_inactivity_decay(&self, v: f64, delta_epoch: f64, r: f64) -> f64 {
        if delta_epoch <= 0.0 {
            return v;
        }
        let r = clamp_rate(r);
        match *self {
            DecayFn::Exponential => v * (1.0 - r).powf(delta_epoch),
            DecayFn::Linear => v * (1.0 - delta_epoch * r).max(0.0),
            DecayFn::Power { p } => {
                let p = if p <= 0.0 { 1.0 } else { p };
                v * (1.0 + delta_epoch * r).powf(-p)
            }
        }
    }

    /// Bounded time-bonus growth over the span `[first, now]`, reduced by
    /// epochs of inactivity since `last`.
    pub fn time_bonus(&self, first: f64, last: f64, now: f64, max_growth: f64) -> f64 {
        let age = (now - first).max(0.0);
        let inactive = (now - last).max(0.0);
        let raw = match *self {
            DecayFn::Exponential => (1.0 + age).ln() * (1.0 / (1.0 + 0.1 * inactive)),
            DecayFn::Linear => age.sqrt() * (1.0 - 0.05 * inactive).max(0.1),
            DecayFn::Power { p } => {
                let p = if p <= 0.0 { 0.5 } else { p };
                age.powf(1.0 / p) * (1.0 + 0.1 * inactive).powf(-p)
            }
        };
        raw.min(max_growth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive_delta_is_identity() {
        let d = DecayFn::Exponential;
        assert_eq!(d.apply_decay(42.0, 0.0, 10.0), 42.0);
        assert_eq!(d.apply_decay(42.0, -5.0, 10.0), 42.0);
        assert_eq!(d.apply_decay(42.0, 5.0, 0.0), 42.0);
    }

    #[test]
    fn exponential_half_life_halves_value() {
        let d = DecayFn::Exponential;
        let v = d.apply_decay(100.0, 10.0, 10.0);
        assert!((v - 50.0).abs() < 1e-9);
    }

    #[test]
    fn linear_decay_reaches_zero_at_twice_half_life() {
        let d = DecayFn::Linear;
        let v = d.apply_decay(100.0, 20.0, 10.0);
        assert!((v - 0.0).abs() < 1e-9);
    }

    #[test]
    fn power_decay_default_p_when_non_positive() {
        let d = DecayFn::Power { p: 0.0 };
        let v = d.apply_decay(100.0, 10.0, 10.0);
        let expected = 100.0 * (1.0 + 1.0_f64).powf(-1.0);
        assert!((v - expected).abs() < 1e-9);
    }

    #[test]
    fn inactivity_rate_clamped_to_one() {
        let d = DecayFn::Exponential;
        let over = d.apply_inactivity_decay(100.0, 3.0, 5.0);
        let at_one = d.apply_inactivity_decay(100.0, 3.0, 1.0);
        assert!((over - at_one).abs() < 1e-9);
    }

    #[test]
    fn time_bonus_capped_at_max() {
        let d = DecayFn::Exponential;
        let v = d.time_bonus(0.0, 0.0, 1_000_000.0, 50.0);
        assert!(v <= 50.0);
    }

    #[test]
    fn zero_age_time_bonus_is_zero() {
        let d = DecayFn::Linear;
        assert_eq!(d.time_bonus(10.0, 10.0, 10.0, 50.0), 0.0);
    }
}
