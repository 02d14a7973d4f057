use identity_core::{Epoch, Identifier};

/// One non-expired KYC/PoP credential, as consumed by the scoring engine's
/// `K` factor.
#[derive(Debug, Clone)]
pub struct KycRecord {
    pub issuer: Identifier,
    pub weight: f64,
    pub epoch: Epoch,
}

/// One attestation, as consumed by the `A` factor.
#[derive(Debug, Clone)]
pub struct AttestationRecord {
    pub issuer: Identifier,
    pub weight: f64,
    pub issuer_reputation: f64,
    pub epoch: Epoch,
}

/// One vouch received by the target identity, as consumed by the `V`
/// factor.
#[derive(Debug, Clone)]
pub struct VouchRecord {
    pub from: Identifier,
    pub strength: f64,
    pub epoch: Epoch,
}

/// One report, as consumed by the `R` factor. The scoring engine filters to
/// `adjudicated && upheld` before summing.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub issuer: Identifier,
    pub severity: f64,
    pub adjudicated: bool,
    pub upheld: bool,
    pub epoch: Epoch,
}

/// A directed, weighted vouch edge within a `(context, epoch-range)`
/// window, as consumed by the graph analyzer.
#[derive(Debug, Clone)]
pub struct VouchEdge {
    pub from: Identifier,
    pub to: Identifier,
    pub strength: f64,
    pub epoch: Epoch,
}

/// The derived vouch graph handed to `identity-graph`: nodes are
/// identities, edges are vouches observed in the requested window.
#[derive(Debug, Clone, Default)]
pub struct VouchGraph {
    pub nodes: Vec<Identifier>,
    pub edges: Vec<VouchEdge>,
}

impl VouchGraph {
    /// Outgoing edges from `id`.
    pub fn outgoing<'a>(&'a self, id: &'a Identifier) -> impl Iterator<Item = &'a VouchEdge> {
        self.edges.iter().filter(move |e| &e.from == id)
    }

    /// Incoming edges to `id` (the vouches it has received).
    pub fn incoming<'a>(&'a self, id: &'a Identifier) -> impl Iterator<Item = &'a VouchEdge> {
        self.edges.iter().filter(move |e| &e.to == id)
    }
}
