use identity_core::{Epoch, RuleSet};
use identity_decay::DecayFn;
use identity_provider::{AttestationRecord, KycRecord, ReportRecord};

pub fn decay_fn(rules: &RuleSet) -> DecayFn {
    match rules.decay {
        identity_core::DecayKind::Exponential => DecayFn::Exponential,
        identity_core::DecayKind::Linear => DecayFn::Linear,
        identity_core::DecayKind::Power { p } => DecayFn::Power { p },
    }
}

/// `K`: sum over non-expired KYC records of `weight * decay(age)`. Expiry
/// filtering already happened in the data provider; this just ages what it
/// was handed.
pub fn k_factor(mut records: Vec<KycRecord>, epoch: Epoch, decay: DecayFn, half_life: f64) -> f64 {
    records.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    records
        .into_iter()
        .map(|r| {
            let age = (epoch - r.epoch) as f64;
            decay.apply_decay(r.weight, age, half_life)
        })
        .sum()
}

/// `A`: sum over attestations of `weight * issuer_reputation * decay(age)`.
pub fn a_factor(mut records: Vec<AttestationRecord>, epoch: Epoch, decay: DecayFn, half_life: f64) -> f64 {
    records.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    records
        .into_iter()
        .map(|r| {
            let age = (epoch - r.epoch) as f64;
            decay.apply_decay(r.weight * r.issuer_reputation, age, half_life)
        })
        .sum()
}

/// `R`: sum over adjudicated-and-upheld reports of `severity * decay(age)`.
pub fn r_factor(mut records: Vec<ReportRecord>, epoch: Epoch, decay: DecayFn, half_life: f64) -> f64 {
    records.retain(|r| r.adjudicated && r.upheld);
    records.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    records
        .into_iter()
        .map(|r| {
            let age = (epoch - r.epoch) as f64;
            decay.apply_decay(r.severity, age, half_life)
        })
        .sum()
}

/// `T`: bounded tenure growth, then faded by inactivity since last activity.
pub fn t_factor(
    span: Option<(Epoch, Epoch)>,
    epoch: Epoch,
    decay: DecayFn,
    max_growth: f64,
    inactivity_rate: f64,
) -> f64 {
    let Some((first, last)) = span else {
        return 0.0;
    };
    let bonus = decay.time_bonus(first as f64, last as f64, epoch as f64, max_growth);
    let inactive = (epoch - last) as f64;
    decay.apply_inactivity_decay(bonus, inactive, inactivity_rate)
}

/// `V`: concave aggregation of `min(voucher_score, vouch_cap) * decay(strength)`
/// weighted contributions, reduced for low voucher diversity.
pub fn v_factor(weighted_contributions: &[f64], diversity_penalty: f64, diversity_score: f64) -> f64 {
    let w: f64 = weighted_contributions.iter().sum();
    w.sqrt() * (1.0 - diversity_penalty * (1.0 - diversity_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v_factor_with_full_diversity_is_unreduced() {
        let v = v_factor(&[100.0], 0.2, 1.0);
        assert!((v - 10.0).abs() < 1e-9);
    }

    #[test]
    fn v_factor_penalizes_zero_diversity() {
        let full = v_factor(&[100.0], 0.2, 1.0);
        let zero = v_factor(&[100.0], 0.2, 0.0);
        assert!(zero < full);
    }
}
