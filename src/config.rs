use serde::{Deserialize, Serialize};

use crate::types::Ownership;
use crate::validation::ValidationError;

/// Which allocation the bed-need coverage threshold is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Both the doctor and the bed threshold are checked against the
    /// distance-decayed doctor allocation.
    #[default]
    DoctorWeighted,
    /// The bed threshold is checked against the distance-decayed bed
    /// allocation instead.
    PerResource,
}

/// Tunable coefficients of the allocation model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hospital/district pairs farther apart than this are not eligible.
    pub distance_threshold_km: f64,
    /// Upper bound on each allocation as a multiple of the current count.
    pub capacity_ratio: f64,
    pub public_factor: f64,
    pub private_factor: f64,
    pub doctor_need_per_capita: f64,
    pub bed_need_per_capita: f64,
    pub doctor_coverage_divisor: f64,
    pub bed_coverage_divisor: f64,
    pub equity_vulnerability_threshold: f64,
    pub equity_multiplier: f64,
    /// Share of the equity requirement public hospitals must supply on
    /// their own when any are in range.
    pub public_equity_share: f64,
    /// Doctors per hospital must lie in `[beds / band, beds * band]`.
    pub ratio_band: f64,
    pub coverage_mode: CoverageMode,
    pub time_limit_secs: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distance_threshold_km: 15.0,
            capacity_ratio: 1.5,
            public_factor: 1.5,
            private_factor: 1.0,
            doctor_need_per_capita: 0.004,
            bed_need_per_capita: 0.011,
            doctor_coverage_divisor: 90.0,
            bed_coverage_divisor: 240.0,
            equity_vulnerability_threshold: 0.5,
            equity_multiplier: 2.0,
            public_equity_share: 0.5,
            ratio_band: 8.0,
            coverage_mode: CoverageMode::DoctorWeighted,
            time_limit_secs: None,
        }
    }
}

impl Config {
    pub fn ownership_factor(&self, ownership: Ownership) -> f64 {
        match ownership {
            Ownership::Public => self.public_factor,
            Ownership::Private => self.private_factor,
        }
    }

    /// Reject coefficients that would make the model meaningless.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("distance_threshold_km", self.distance_threshold_km),
            ("capacity_ratio", self.capacity_ratio),
            ("public_factor", self.public_factor),
            ("private_factor", self.private_factor),
            ("doctor_coverage_divisor", self.doctor_coverage_divisor),
            ("bed_coverage_divisor", self.bed_coverage_divisor),
            ("ratio_band", self.ratio_band),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        let non_negative = [
            ("doctor_need_per_capita", self.doctor_need_per_capita),
            ("bed_need_per_capita", self.bed_need_per_capita),
            (
                "equity_vulnerability_threshold",
                self.equity_vulnerability_threshold,
            ),
            ("equity_multiplier", self.equity_multiplier),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field,
                    reason: format!("must be a non-negative number, got {value}"),
                });
            }
        }

        if !(0.0..=1.0).contains(&self.public_equity_share) {
            return Err(ValidationError::InvalidConfig {
                field: "public_equity_share",
                reason: format!("must lie in [0, 1], got {}", self.public_equity_share),
            });
        }

        if let Some(secs) = self.time_limit_secs {
            if !secs.is_finite() || secs <= 0.0 {
                return Err(ValidationError::InvalidConfig {
                    field: "time_limit_secs",
                    reason: format!("must be a positive number of seconds, got {secs}"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.distance_threshold_km, 15.0);
        assert_eq!(config.ratio_band, 8.0);
        assert_eq!(config.coverage_mode, CoverageMode::DoctorWeighted);
        assert!(config.time_limit_secs.is_none());
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let config: Config =
            serde_yaml::from_str("distance_threshold_km: 20\ncoverage_mode: per_resource\n")
                .unwrap();
        assert_eq!(config.distance_threshold_km, 20.0);
        assert_eq!(config.coverage_mode, CoverageMode::PerResource);
        assert_eq!(config.capacity_ratio, 1.5);
        assert_eq!(config.bed_coverage_divisor, 240.0);
    }

    #[test]
    fn ownership_factor_follows_config() {
        let config = Config::default();
        assert_eq!(config.ownership_factor(Ownership::Public), 1.5);
        assert_eq!(config.ownership_factor(Ownership::Private), 1.0);
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let config = Config {
            distance_threshold_km: 0.0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidConfig {
                field: "distance_threshold_km",
                ..
            })
        ));
    }

    #[test]
    fn rejects_public_share_above_one() {
        let config = Config {
            public_equity_share: 1.2,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_time_limit() {
        let config = Config {
            time_limit_secs: Some(0.0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
