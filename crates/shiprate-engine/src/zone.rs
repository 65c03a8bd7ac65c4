//! # Zone Resolution
//!
//! Places a shipment into exactly one [`Zone`].
//!
//! Configured zone rules are tried first. A rule matches when every
//! criterion it sets is satisfied by the destination; among matching rules
//! the most specific wins (+2 for a state list, +1 for a country list), and
//! the earliest rule wins a tie. With no matching rule the zone falls back to
//! comparing origin and destination:
//!
//! | Origin vs destination                         | Zone            |
//! |-----------------------------------------------|-----------------|
//! | countries differ                              | `International` |
//! | same country, both states set and different   | `National`      |
//! | same state, both cities set and different     | `Regional`      |
//! | otherwise                                     | `Local`         |

use shiprate_core::{Address, Zone};
use shiprate_rules::ZoneRule;

use crate::shipment::code_listed;

/// Resolves destinations to zones using an ordered list of zone rules.
#[derive(Debug, Clone, Copy)]
pub struct ZoneResolver<'a> {
    rules: &'a [ZoneRule],
}

impl<'a> ZoneResolver<'a> {
    /// A resolver over `rules`, tried in order.
    pub fn new(rules: &'a [ZoneRule]) -> Self {
        Self { rules }
    }

    /// Resolve the zone for a shipment from `origin` to `destination`.
    ///
    /// `distance_km` is only consulted by rules that set a distance
    /// threshold, and only when it is known.
    pub fn resolve(&self, origin: &Address, destination: &Address, distance_km: Option<f64>) -> Zone {
        match self.best_match(destination, distance_km) {
            Some(rule) => {
                tracing::debug!(rule = %rule.id, zone = %rule.zone, "zone rule matched");
                rule.zone
            }
            None => geographic_zone(origin, destination),
        }
    }

    /// The most specific matching rule, earliest first on ties.
    pub fn best_match(&self, destination: &Address, distance_km: Option<f64>) -> Option<&'a ZoneRule> {
        let mut best: Option<&'a ZoneRule> = None;
        for rule in self.rules {
            if !zone_rule_matches(rule, destination, distance_km) {
                continue;
            }
            // Strictly greater keeps the earlier rule on a tie.
            if best.map_or(true, |b| rule.specificity() > b.specificity()) {
                best = Some(rule);
            }
        }
        best
    }
}

/// Whether `destination` satisfies every criterion `rule` sets.
pub fn zone_rule_matches(rule: &ZoneRule, destination: &Address, distance_km: Option<f64>) -> bool {
    if !rule.countries.is_empty() && !code_listed(&rule.countries, &destination.country) {
        return false;
    }
    if !rule.states.is_empty() && !code_listed(&rule.states, &destination.state) {
        return false;
    }
    if !rule.postal_codes.is_empty() || !rule.postal_ranges.is_empty() {
        let postal = destination.postal_code.as_str();
        let listed = rule.postal_codes.iter().any(|p| p == postal);
        let in_range = rule.postal_ranges.iter().any(|r| r.contains(postal));
        if !listed && !in_range {
            return false;
        }
    }
    if let (Some(threshold), Some(distance)) = (rule.distance_threshold_km, distance_km) {
        if distance > threshold {
            return false;
        }
    }
    true
}

/// Zone derived from comparing origin and destination alone.
pub fn geographic_zone(origin: &Address, destination: &Address) -> Zone {
    if !origin.country.eq_ignore_ascii_case(&destination.country) {
        return Zone::International;
    }
    if both_set_and_differ(&origin.state, &destination.state) {
        return Zone::National;
    }
    if both_set_and_differ(&origin.city, &destination.city) {
        return Zone::Regional;
    }
    Zone::Local
}

fn both_set_and_differ(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && !a.eq_ignore_ascii_case(b)
}
