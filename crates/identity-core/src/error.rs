use thiserror::Error;

/// Error taxonomy shared by every crate in the workspace. The HTTP layer in
/// `identity-node` maps each variant to a status code (see its `AppError`).
#[derive(Debug, Error)]
pub enum IdentityError {
    // ── Input validation ─────────────────────────────────────────────────────
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ── Lookup ───────────────────────────────────────────────────────────────
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    // ── Capacity ─────────────────────────────────────────────────────────────
    #[error("too large: {0}")]
    TooLarge(String),

    #[error("status list is full")]
    ListFull,

    // ── Lifecycle ────────────────────────────────────────────────────────────
    #[error("store is closed")]
    Closed,

    #[error("operation canceled")]
    Canceled,

    // ── Budget ───────────────────────────────────────────────────────────────
    #[error("insufficient budget: need {need}, have {have}")]
    InsufficientBudget { need: f64, have: f64 },

    // ── Governance ───────────────────────────────────────────────────────────
    #[error("timelock not expired; activates at {activation_date}")]
    TimelockNotExpired { activation_date: i64 },

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    // ── Cryptography ─────────────────────────────────────────────────────────
    #[error("signature failure: {0}")]
    SignatureFailure(String),

    // ── Transport / integrity ────────────────────────────────────────────────
    #[error("transport error: {0}")]
    Transport(String),

    #[error("integrity error: {0}")]
    Integrity(String),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Other(String),
}

impl IdentityError {
    /// A stable machine-readable tag, used in HTTP error bodies and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            IdentityError::InvalidInput(_) => "invalid_input",
            IdentityError::NotFound(_) => "not_found",
            IdentityError::AlreadyExists(_) => "already_exists",
            IdentityError::TooLarge(_) => "too_large",
            IdentityError::ListFull => "too_large",
            IdentityError::Closed => "closed",
            IdentityError::Canceled => "canceled",
            IdentityError::InsufficientBudget { .. } => "insufficient_budget",
            IdentityError::TimelockNotExpired { .. } => "timelock_not_expired",
            IdentityError::PermissionDenied(_) => "permission_denied",
            IdentityError::SignatureFailure(_) => "signature_failure",
            IdentityError::Transport(_) => "transport",
            IdentityError::Integrity(_) => "integrity",
            IdentityError::Serialization(_) => "serialization",
            IdentityError::Storage(_) => "storage",
            IdentityError::Other(_) => "other",
        }
    }
}
