use crate::config::Config;
use crate::eligibility::EligibilityIndex;
use crate::types::{District, Tables};

/// Per-capita, vulnerability-adjusted staffing need of one district.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Need {
    pub doctors: u64,
    pub beds: u64,
}

impl Need {
    pub fn of(district: &District, config: &Config) -> Self {
        let population = district.population as f64;
        let adjust = 1.0 + district.vulnerability;
        Self {
            doctors: (config.doctor_need_per_capita * population * adjust).floor() as u64,
            beds: (config.bed_need_per_capita * population * adjust).floor() as u64,
        }
    }
}

/// Double-coverage floor for a high-vulnerability district.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equity {
    pub doctors: f64,
    pub beds: f64,
    /// Present when at least one public hospital is in range.
    pub public_share: Option<f64>,
}

/// The coverage and equity rows a single district contributes.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictRequirement {
    pub district: usize,
    pub need: Need,
    pub doctor_coverage: f64,
    pub bed_coverage: f64,
    pub equity: Option<Equity>,
}

/// Derive the requirement of every district that has at least one
/// eligible hospital. Districts with no hospital in range impose nothing.
pub fn district_requirements(
    tables: &Tables,
    index: &EligibilityIndex,
    config: &Config,
) -> Vec<DistrictRequirement> {
    tables
        .districts
        .iter()
        .enumerate()
        .filter(|&(d, _)| index.has_hospitals(d))
        .map(|(d, district)| {
            let need = Need::of(district, config);
            let equity = (district.vulnerability >= config.equity_vulnerability_threshold)
                .then(|| {
                    let doctors = config.equity_multiplier * need.doctors as f64;
                    let beds = config.equity_multiplier * need.beds as f64;
                    Equity {
                        doctors,
                        beds,
                        public_share: index
                            .has_public_hospitals(d)
                            .then_some(config.public_equity_share),
                    }
                });

            DistrictRequirement {
                district: d,
                need,
                doctor_coverage: need.doctors as f64 / config.doctor_coverage_divisor,
                bed_coverage: need.beds as f64 / config.bed_coverage_divisor,
                equity,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Distance, Hospital, Ownership};

    fn district(population: u64, vulnerability: f64) -> District {
        District {
            id: "D".into(),
            population,
            vulnerability,
        }
    }

    fn tables(ownership: Ownership, vulnerability: f64) -> Tables {
        Tables {
            hospitals: vec![Hospital {
                id: "H1".into(),
                ownership,
                doctors: 10,
                beds: 80,
            }],
            districts: vec![
                District {
                    id: "D1".into(),
                    population: 10_000,
                    vulnerability,
                },
                District {
                    id: "D2".into(),
                    population: 5_000,
                    vulnerability: 0.9,
                },
            ],
            distances: vec![Distance {
                hospital: "H1".into(),
                district: "D1".into(),
                km: 5.0,
            }],
        }
    }

    #[test]
    fn need_is_floored_and_vulnerability_adjusted() {
        let need = Need::of(&district(10_000, 0.6), &Config::default());
        assert_eq!(need, Need { doctors: 64, beds: 176 });

        let need = Need::of(&district(900, 0.6), &Config::default());
        assert_eq!(need, Need { doctors: 5, beds: 15 });
    }

    #[test]
    fn empty_district_needs_nothing() {
        let need = Need::of(&district(0, 0.0), &Config::default());
        assert_eq!(need, Need { doctors: 0, beds: 0 });

        let mut tables = tables(Ownership::Private, 0.0);
        tables.districts[0].population = 0;
        let index = EligibilityIndex::build(&tables, 15.0);
        let reqs = district_requirements(&tables, &index, &Config::default());
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].doctor_coverage, 0.0);
        assert_eq!(reqs[0].bed_coverage, 0.0);
        assert!(reqs[0].equity.is_none());
    }

    #[test]
    fn unreachable_districts_are_skipped() {
        let tables = tables(Ownership::Private, 0.2);
        let index = EligibilityIndex::build(&tables, 15.0);
        let reqs = district_requirements(&tables, &index, &Config::default());
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].district, 0);
    }

    #[test]
    fn coverage_thresholds_divide_need() {
        let tables = tables(Ownership::Private, 0.2);
        let index = EligibilityIndex::build(&tables, 15.0);
        let reqs = district_requirements(&tables, &index, &Config::default());
        // need = floor(0.004 * 10000 * 1.2) = 48, floor(0.011 * 10000 * 1.2) = 132
        assert_eq!(reqs[0].need, Need { doctors: 48, beds: 132 });
        assert!((reqs[0].doctor_coverage - 48.0 / 90.0).abs() < 1e-12);
        assert!((reqs[0].bed_coverage - 132.0 / 240.0).abs() < 1e-12);
        assert!(reqs[0].equity.is_none());
    }

    #[test]
    fn vulnerable_district_gets_double_coverage() {
        let tables = tables(Ownership::Private, 0.5);
        let index = EligibilityIndex::build(&tables, 15.0);
        let reqs = district_requirements(&tables, &index, &Config::default());
        let equity = reqs[0].equity.unwrap();
        // need = floor(0.004 * 10000 * 1.5) = 60, floor(0.011 * 10000 * 1.5) = 165
        assert_eq!(equity.doctors, 120.0);
        assert_eq!(equity.beds, 330.0);
        assert_eq!(equity.public_share, None);
    }

    #[test]
    fn public_share_applies_only_with_public_hospitals() {
        let tables = tables(Ownership::Public, 0.7);
        let index = EligibilityIndex::build(&tables, 15.0);
        let reqs = district_requirements(&tables, &index, &Config::default());
        assert_eq!(reqs[0].equity.unwrap().public_share, Some(0.5));
    }
}
