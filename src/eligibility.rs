//! Eligibility links and gravity-model demand scores.
//!
//! A hospital/district pair is eligible when a distance entry exists for it
//! and that distance is within the configured threshold. The index stores
//! each link once and exposes it from both the hospital and the district
//! side.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::config::Config;
use crate::types::{Ownership, Tables};

/// An eligible hospital/district pair, by position in the input tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub hospital: usize,
    pub district: usize,
    pub km: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EligibilityIndex {
    links: Vec<Link>,
    by_hospital: Vec<Vec<usize>>,
    by_district: Vec<Vec<usize>>,
    public_by_district: Vec<Vec<usize>>,
    private_by_district: Vec<Vec<usize>>,
}

impl EligibilityIndex {
    pub fn build(tables: &Tables, threshold_km: f64) -> Self {
        let hospital_pos: BTreeMap<&str, usize> = tables
            .hospitals
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id.as_str(), i))
            .collect();
        let district_pos: BTreeMap<&str, usize> = tables
            .districts
            .iter()
            .enumerate()
            .map(|(i, d)| (d.id.as_str(), i))
            .collect();

        let mut index = Self {
            links: Vec::new(),
            by_hospital: vec![Vec::new(); tables.hospitals.len()],
            by_district: vec![Vec::new(); tables.districts.len()],
            public_by_district: vec![Vec::new(); tables.districts.len()],
            private_by_district: vec![Vec::new(); tables.districts.len()],
        };

        for entry in &tables.distances {
            let (Some(&hospital), Some(&district)) = (
                hospital_pos.get(entry.hospital.as_str()),
                district_pos.get(entry.district.as_str()),
            ) else {
                warn!(
                    hospital = %entry.hospital,
                    district = %entry.district,
                    "skipping distance entry for unknown hospital or district"
                );
                continue;
            };

            if entry.km > threshold_km {
                continue;
            }

            let link_id = index.links.len();
            index.links.push(Link {
                hospital,
                district,
                km: entry.km,
            });
            index.by_hospital[hospital].push(link_id);
            index.by_district[district].push(link_id);
            match tables.hospitals[hospital].ownership {
                Ownership::Public => index.public_by_district[district].push(link_id),
                Ownership::Private => index.private_by_district[district].push(link_id),
            }
        }

        debug!(
            links = index.links.len(),
            threshold_km, "built eligibility index"
        );
        index
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links from hospital `h` to every district it can serve.
    pub fn hospital_links(&self, h: usize) -> impl Iterator<Item = &Link> {
        self.resolve(&self.by_hospital[h])
    }

    /// Links from district `d` to every hospital in range of it.
    pub fn district_links(&self, d: usize) -> impl Iterator<Item = &Link> {
        self.resolve(&self.by_district[d])
    }

    pub fn public_links(&self, d: usize) -> impl Iterator<Item = &Link> {
        self.resolve(&self.public_by_district[d])
    }

    pub fn private_links(&self, d: usize) -> impl Iterator<Item = &Link> {
        self.resolve(&self.private_by_district[d])
    }

    pub fn districts_served(&self, h: usize) -> usize {
        self.by_hospital[h].len()
    }

    pub fn has_hospitals(&self, d: usize) -> bool {
        !self.by_district[d].is_empty()
    }

    pub fn has_public_hospitals(&self, d: usize) -> bool {
        !self.public_by_district[d].is_empty()
    }

    fn resolve<'a>(&'a self, ids: &'a [usize]) -> impl Iterator<Item = &'a Link> {
        ids.iter().map(|&id| &self.links[id])
    }
}

/// Gravity-model demand per hospital:
/// the sum over eligible districts of `factor * vi * population / km^2`.
pub fn demand_scores(tables: &Tables, index: &EligibilityIndex, config: &Config) -> Vec<f64> {
    tables
        .hospitals
        .iter()
        .enumerate()
        .map(|(h, hospital)| {
            let factor = config.ownership_factor(hospital.ownership);
            index
                .hospital_links(h)
                .map(|link| {
                    let district = &tables.districts[link.district];
                    factor * district.vulnerability * district.population as f64
                        / link.km.powi(2)
                })
                .sum()
        })
        .collect()
}
