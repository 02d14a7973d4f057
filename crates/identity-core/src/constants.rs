//! Default configuration values. These are the defaults a fresh `Config` is
//! built with; every one is overridable at runtime through `GET/PUT /config`.

// ── Scoring weights ──────────────────────────────────────────────────────────

/// Default weight on the KYC/PoP factor.
pub const DEFAULT_ALPHA: f64 = 0.3;
/// Default weight on the attestation factor.
pub const DEFAULT_BETA: f64 = 0.2;
/// Default weight on the vouch factor.
pub const DEFAULT_GAMMA: f64 = 0.3;
/// Default weight on the report (penalty) factor.
pub const DEFAULT_DELTA: f64 = 0.1;
/// Default weight on the tenure factor.
pub const DEFAULT_TAU: f64 = 0.1;

// ── Vouch / decay parameters ─────────────────────────────────────────────────

/// Maximum contribution a single vouch may make to `V` before decay.
pub const DEFAULT_VOUCH_CAP: f64 = 100.0;
/// Half-life, in epochs, for vouch-strength decay.
pub const DEFAULT_VOUCH_HALF_LIFE: f64 = 10.0;
/// Half-life, in epochs, for report-severity decay.
pub const DEFAULT_REPORT_HALF_LIFE: f64 = 20.0;
/// Ceiling on the tenure time-bonus term.
pub const DEFAULT_TIME_MAX_GROWTH: f64 = 50.0;
/// Rate at which tenure bonus decays with inactivity.
pub const DEFAULT_TIME_INACTIVITY_DECAY: f64 = 0.02;

// ── Budget manager ───────────────────────────────────────────────────────────

/// Floor on every budget's total, regardless of score.
pub const DEFAULT_BASE_BUDGET: f64 = 10.0;
/// Multiplier applied to score when deriving a budget's total.
pub const DEFAULT_BUDGET_MULTIPLIER: f64 = 0.1;
/// Fraction of attempted-but-failed spend recorded as a penalty.
pub const PENALTY_RATE: f64 = 0.1;
/// Fraction of score used to derive the reputation bond.
pub const BOND_SCORE_FRACTION: f64 = 0.1;
/// Numeric tolerance for the `spent + remaining == total` invariant.
pub const BUDGET_TOLERANCE: f64 = 1e-3;

// ── Graph analyzer ───────────────────────────────────────────────────────────

/// Penalty applied to `V` for low diversity.
pub const DEFAULT_DIVERSITY_PENALTY: f64 = 0.2;
/// Jaccard threshold used when merging community memberships.
pub const DEFAULT_COMMUNITY_THRESHOLD: f64 = 0.7;
/// Minimum edge density to continue growing a dense subgraph.
pub const DEFAULT_COLLUSION_THRESHOLD: f64 = 0.8;
/// Penalty weight applied when a collusion cluster is detected.
pub const DEFAULT_COLLUSION_PENALTY: f64 = 0.5;
/// Minimum node count for a dense subgraph to count as a collusion cluster.
pub const MIN_COLLUSION_CLUSTER_SIZE: usize = 3;

// ── Voucher-score bootstrap ──────────────────────────────────────────────────

/// Base term of the bootstrap heuristic used to break recursive voucher-score
/// cycles: `min(BOOTSTRAP_BASE + BOOTSTRAP_PER_VOUCH * vouch_count, vouch_cap)`.
pub const BOOTSTRAP_BASE: f64 = 10.0;
pub const BOOTSTRAP_PER_VOUCH: f64 = 2.0;

// ── Status list ──────────────────────────────────────────────────────────────

/// Default bitstring size, in bits, for a newly created status list.
pub const DEFAULT_STATUS_LIST_SIZE: u64 = 131_072;
/// Hard ceiling a status list may grow to via auto-expansion.
pub const DEFAULT_STATUS_LIST_MAX_SIZE: u64 = 1_048_576;
/// Gzip compression level (0-9) applied to the bitstring.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
/// Cache TTL, in seconds, for a decoded status-list cache entry.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Whether a full list auto-expands rather than failing `allocate_index`.
pub const DEFAULT_AUTO_EXPAND: bool = true;
/// Bit count added on each auto-expansion.
pub const DEFAULT_EXPAND_INCREMENT: u64 = 65_536;

// ── Governance ───────────────────────────────────────────────────────────────

/// Default number of days between proposal approval and the earliest
/// possible execution.
pub const DEFAULT_TIMELOCK_DAYS: i64 = 1;
/// Grace period, in seconds, after which a still-pending proposal is
/// considered (derived, not stored) `expired`.
pub const DEFAULT_PROPOSAL_GRACE_SECS: i64 = 7 * 86_400;

// ── Transport ────────────────────────────────────────────────────────────────

/// Default deadline, in seconds, for status-list HTTP fetches.
pub const DEFAULT_HTTP_DEADLINE_SECS: u64 = 30;

/// Seconds per epoch under the default day-granularity bucketing.
pub const EPOCH_SECONDS: i64 = 86_400;
