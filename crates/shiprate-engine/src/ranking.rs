//! # Option Ranking
//!
//! Picks the cheapest, fastest, and recommended options and orders the list
//! by cost.
//!
//! The recommended option is the first option, in the order the options were
//! produced, that arrives within [`RECOMMENDED_MAX_DAYS`] days and costs at
//! most [`RECOMMENDED_COST_FACTOR`] times the cheapest. When none does, the
//! cheapest option is recommended.

use std::cmp::Ordering;

use crate::option::ShippingOption;

/// Longest transit time a recommended option may have.
pub const RECOMMENDED_MAX_DAYS: u32 = 5;

/// Highest multiple of the cheapest cost a recommended option may have.
pub const RECOMMENDED_COST_FACTOR: f64 = 1.5;

/// Positions of the selected options in the list that was ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ranking {
    pub cheapest: Option<usize>,
    pub fastest: Option<usize>,
    pub recommended: Option<usize>,
}

/// Select over `options` in their current order. Ties keep the first option.
pub fn rank(options: &[ShippingOption]) -> Ranking {
    let mut cheapest: Option<usize> = None;
    let mut fastest: Option<usize> = None;
    for (i, option) in options.iter().enumerate() {
        if cheapest.map_or(true, |c| option.cost < options[c].cost) {
            cheapest = Some(i);
        }
        if fastest.map_or(true, |f| option.estimated_days < options[f].estimated_days) {
            fastest = Some(i);
        }
    }

    let recommended = cheapest.map(|c| {
        let ceiling = options[c].cost * RECOMMENDED_COST_FACTOR;
        options
            .iter()
            .position(|o| o.estimated_days <= RECOMMENDED_MAX_DAYS && o.cost <= ceiling)
            .unwrap_or(c)
    });

    Ranking {
        cheapest,
        fastest,
        recommended,
    }
}

/// Stable ascending sort by cost.
pub fn sort_by_cost(options: &mut [ShippingOption]) {
    options.sort_by(|a, b| a.cost.partial_cmp(&b.cost).unwrap_or(Ordering::Equal));
}
