//! Five-factor scoring engine: deterministic evaluation of
//! `S = max(0, alpha*K + beta*A + gamma*V - delta*R + tau*T)` with decay,
//! caps, concave aggregation of vouches, and signed proof of computation.

mod engine;
mod factors;
mod input_hash;

pub use engine::ScoringEngine;
pub use input_hash::compute_input_hash;
