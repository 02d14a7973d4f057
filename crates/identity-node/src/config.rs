use std::path::Path;

use serde::{Deserialize, Serialize};

use identity_core::{
    Factors, IdentityError, DEFAULT_BASE_BUDGET, DEFAULT_BUDGET_MULTIPLIER, DEFAULT_COLLUSION_PENALTY,
    DEFAULT_COLLUSION_THRESHOLD, DEFAULT_COMMUNITY_THRESHOLD, DEFAULT_DIVERSITY_PENALTY,
    DEFAULT_REPORT_HALF_LIFE, DEFAULT_TIME_INACTIVITY_DECAY, DEFAULT_TIME_MAX_GROWTH, DEFAULT_VOUCH_CAP,
    DEFAULT_VOUCH_HALF_LIFE,
};

/// Live, hot-swappable configuration, read through `GET /config` and
/// replaced through `PUT /config`. Every field
/// mirrors a rule-set parameter; the registry's active rule set remains the
/// source of truth for scoring itself, while this `Config` governs the
/// defaults new rule-set proposals are drafted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub factors: Factors,
    pub vouch_cap: f64,
    pub vouch_half_life: f64,
    pub report_half_life: f64,
    pub time_max_growth: f64,
    pub time_inactivity_decay: f64,
    pub base_budget: f64,
    pub budget_multiplier: f64,
    pub diversity_penalty: f64,
    pub community_threshold: f64,
    pub collusion_threshold: f64,
    pub collusion_penalty: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            factors: Factors::default(),
            vouch_cap: DEFAULT_VOUCH_CAP,
            vouch_half_life: DEFAULT_VOUCH_HALF_LIFE,
            report_half_life: DEFAULT_REPORT_HALF_LIFE,
            time_max_growth: DEFAULT_TIME_MAX_GROWTH,
            time_inactivity_decay: DEFAULT_TIME_INACTIVITY_DECAY,
            base_budget: DEFAULT_BASE_BUDGET,
            budget_multiplier: DEFAULT_BUDGET_MULTIPLIER,
            diversity_penalty: DEFAULT_DIVERSITY_PENALTY,
            community_threshold: DEFAULT_COMMUNITY_THRESHOLD,
            collusion_threshold: DEFAULT_COLLUSION_THRESHOLD,
            collusion_penalty: DEFAULT_COLLUSION_PENALTY,
        }
    }
}

impl Config {
    /// `/config PUT` rejects any negative factor weight or parameter.
    pub fn validate(&self) -> Result<(), IdentityError> {
        self.factors.validate()?;
        let non_negative = [
            self.vouch_cap,
            self.vouch_half_life,
            self.report_half_life,
            self.time_max_growth,
            self.time_inactivity_decay,
            self.base_budget,
            self.budget_multiplier,
            self.diversity_penalty,
            self.community_threshold,
            self.collusion_threshold,
            self.collusion_penalty,
        ];
        if non_negative.iter().any(|v| *v < 0.0) {
            return Err(IdentityError::InvalidInput("config parameters must be non-negative".into()));
        }
        Ok(())
    }

    /// Loads a `Config` from a JSON file if given, else falls back to
    /// defaults. Kept separate from CLI argument parsing so the node binary
    /// and tests can construct a `Config` the same way.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = path {
            let json = std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("reading config from {}: {e}", p.display()))?;
            let config: Config = serde_json::from_str(&json)
                .map_err(|e| anyhow::anyhow!("parsing config JSON: {e}"))?;
            config.validate()?;
            return Ok(config);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn negative_parameter_rejected() {
        let mut config = Config::default();
        config.vouch_cap = -1.0;
        assert!(config.validate().is_err());
    }
}
