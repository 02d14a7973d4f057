use identity_codec::content_id_of_bytes;
use identity_provider::{AttestationRecord, KycRecord, ReportRecord, VouchRecord};

/// Canonical per-record lines (`v:<from>:<to>:<strength>:<epoch>`,
/// `a:<issuer>:<type>:<weight>:<epoch>`, etc.), concatenated in sorted order
/// and hashed with SHA-256. Feeds the signed proof's `input_hash` field; two
/// evaluations over the same event set must hash identically.
#[allow(clippy::too_many_arguments)]
pub fn compute_input_hash(
    identity: &str,
    vouches: &[VouchRecord],
    attestations: &[AttestationRecord],
    kyc: &[KycRecord],
    reports: &[ReportRecord],
) -> String {
    let mut lines: Vec<String> = Vec::new();

    let mut vouches = vouches.to_vec();
    vouches.sort_by(|a, b| a.from.cmp(&b.from).then(a.epoch.cmp(&b.epoch)));
    for v in &vouches {
        lines.push(format!("v:{}:{}:{:.6}:{}", v.from, identity, v.strength, v.epoch));
    }

    let mut attestations = attestations.to_vec();
    attestations.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    for a in &attestations {
        lines.push(format!("a:{}:attestation:{:.6}:{}", a.issuer, a.weight, a.epoch));
    }

    let mut kyc = kyc.to_vec();
    kyc.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    for k in &kyc {
        lines.push(format!("k:{}:kyc:{:.6}:{}", k.issuer, k.weight, k.epoch));
    }

    let mut reports = reports.to_vec();
    reports.sort_by(|a, b| a.issuer.cmp(&b.issuer).then(a.epoch.cmp(&b.epoch)));
    for r in &reports {
        lines.push(format!("r:{}:report:{:.6}:{}", r.issuer, r.severity, r.epoch));
    }

    content_id_of_bytes(lines.join("\n").as_bytes()).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity_core::Identifier;

    #[test]
    fn hash_is_order_independent() {
        let a = VouchRecord { from: Identifier::new("key:a").unwrap(), strength: 1.0, epoch: 1 };
        let b = VouchRecord { from: Identifier::new("key:b").unwrap(), strength: 2.0, epoch: 2 };
        let h1 = compute_input_hash("key:target", &[a.clone(), b.clone()], &[], &[], &[]);
        let h2 = compute_input_hash("key:target", &[b, a], &[], &[], &[]);
        assert_eq!(h1, h2);
    }

    #[test]
    fn hash_changes_with_content() {
        let a = VouchRecord { from: Identifier::new("key:a").unwrap(), strength: 1.0, epoch: 1 };
        let h1 = compute_input_hash("key:target", &[a.clone()], &[], &[], &[]);
        let mut a2 = a;
        a2.strength = 2.0;
        let h2 = compute_input_hash("key:target", &[a2], &[], &[], &[]);
        assert_ne!(h1, h2);
    }
}
