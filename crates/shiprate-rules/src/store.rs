//! # Rule Store
//!
//! The mutable home of a rule configuration. Every mutation is validated
//! before it is applied, so the store can never hold a rule that would fail
//! [`RuleSet::validate`].
//!
//! ## Thread Safety
//!
//! Mutation takes `&mut self`. Services that edit rules while quoting should
//! wrap the store in a lock and give each engine an owned snapshot from
//! [`RuleStore::active_snapshot`]; engines never observe a half-applied edit.

use chrono::{DateTime, Utc};

use crate::document::RuleDocument;
use crate::error::{RuleError, RuleResult};
use crate::ruleset::{Rule, RuleSet};

/// Validated, id-keyed storage for all rule families.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: RuleSet,
}

impl RuleStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded from an existing rule set, validated as a whole.
    pub fn from_rule_set(rules: RuleSet) -> RuleResult<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    /// Add a rule. Fails on invalid fields or an id / key collision.
    pub fn add<T: Rule>(&mut self, rule: T) -> RuleResult<()> {
        rule.validate()?;
        let existing = T::slot(&self.rules);
        if existing.iter().any(|r| r.id() == rule.id()) {
            return Err(RuleError::Duplicate {
                kind: T::KIND,
                id: rule.id().to_string(),
            });
        }
        check_unique_key(existing, &rule, None)?;
        tracing::debug!(kind = T::KIND, id = rule.id(), "rule added");
        T::slot_mut(&mut self.rules).push(rule);
        Ok(())
    }

    /// Replace the rule with the same id, keeping its position.
    pub fn update<T: Rule>(&mut self, rule: T) -> RuleResult<()> {
        rule.validate()?;
        let existing = T::slot(&self.rules);
        let index = position(existing, rule.id())?;
        check_unique_key(existing, &rule, Some(index))?;
        tracing::debug!(kind = T::KIND, id = rule.id(), "rule updated");
        T::slot_mut(&mut self.rules)[index] = rule;
        Ok(())
    }

    /// Remove and return the rule with `id`.
    pub fn remove<T: Rule>(&mut self, id: &str) -> RuleResult<T> {
        let index = position(T::slot(&self.rules), id)?;
        tracing::debug!(kind = T::KIND, id, "rule removed");
        Ok(T::slot_mut(&mut self.rules).remove(index))
    }

    /// Look up a rule by id.
    pub fn get<T: Rule>(&self, id: &str) -> RuleResult<&T> {
        let index = position(T::slot(&self.rules), id)?;
        Ok(&T::slot(&self.rules)[index])
    }

    /// All rules of one family, in insertion order.
    pub fn list<T: Rule>(&self) -> &[T] {
        T::slot(&self.rules)
    }

    /// The full configuration, including inactive rules.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// An owned snapshot of the rules in force at `now`.
    pub fn active_snapshot(&self, now: DateTime<Utc>) -> RuleSet {
        self.rules.active_at(now)
    }

    /// Export the full configuration as a versioned document.
    pub fn export_document(&self, now: DateTime<Utc>) -> RuleDocument {
        RuleDocument::new(self.rules.clone(), Some(now))
    }

    /// Replace the whole configuration with a document's rules.
    ///
    /// All-or-nothing: on any validation failure the store is unchanged.
    pub fn import_document(&mut self, document: RuleDocument) -> RuleResult<usize> {
        let rules = document.into_rule_set()?;
        let count = rules.rule_count();
        self.rules = rules;
        tracing::info!(rule_count = count, "rule document imported");
        Ok(count)
    }
}

fn position<T: Rule>(rules: &[T], id: &str) -> RuleResult<usize> {
    rules
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| RuleError::NotFound {
            kind: T::KIND,
            id: id.to_string(),
        })
}

fn check_unique_key<T: Rule>(rules: &[T], rule: &T, skip: Option<usize>) -> RuleResult<()> {
    let Some(key) = rule.unique_key() else {
        return Ok(());
    };
    let clash = rules
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .find(|(_, r)| r.unique_key().as_deref() == Some(key.as_str()));
    match clash {
        Some((_, other)) => Err(RuleError::DuplicateKey {
            kind: T::KIND,
            id: rule.id().to_string(),
            existing: other.id().to_string(),
            key,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RULE_DOCUMENT_VERSION;
    use crate::rules::{
        CarrierRule, DeliveryTimeRule, FreeShippingRule, ShippingRestriction, ShippingRule,
        ZoneRule,
    };
    use chrono::TimeZone;
    use shiprate_core::{ShippingMethod, ValidityWindow, Zone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap()
    }

    fn ground() -> ShippingRule {
        ShippingRule::new("ground", "Ground", ShippingMethod::Standard).with_pricing(5.0, 1.0)
    }

    #[test]
    fn add_and_get() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        let rule: &ShippingRule = store.get("ground").unwrap();
        assert_eq!(rule.base_cost, 5.0);
        assert_eq!(store.list::<ShippingRule>().len(), 1);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        let err = store.add(ground()).unwrap_err();
        assert!(matches!(err, RuleError::Duplicate { .. }));
    }

    #[test]
    fn add_rejects_empty_id() {
        let mut store = RuleStore::new();
        let err = store
            .add(ZoneRule::new("", Zone::Local))
            .unwrap_err();
        assert!(matches!(err, RuleError::EmptyField { field: "id", .. }));
    }

    #[test]
    fn add_rejects_inverted_window() {
        let mut store = RuleStore::new();
        let bad = FreeShippingRule {
            window: ValidityWindow {
                valid_from: Some(now()),
                valid_until: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            },
            ..FreeShippingRule::new("f", "Free")
        };
        assert!(matches!(
            store.add(bad),
            Err(RuleError::InvalidWindow { .. })
        ));
        assert!(store.list::<FreeShippingRule>().is_empty());
    }

    #[test]
    fn same_id_in_different_families_is_allowed() {
        let mut store = RuleStore::new();
        store.add(ZoneRule::new("x", Zone::Local)).unwrap();
        store
            .add(ShippingRestriction::hazardous("x", "no hazmat"))
            .unwrap();
    }

    #[test]
    fn delivery_key_uniqueness_on_add_and_update() {
        let mut store = RuleStore::new();
        store
            .add(DeliveryTimeRule::new("a", ShippingMethod::Express, Zone::Local, 1))
            .unwrap();
        store
            .add(DeliveryTimeRule::new("b", ShippingMethod::Express, Zone::National, 2))
            .unwrap();
        assert!(store
            .add(DeliveryTimeRule::new("c", ShippingMethod::Express, Zone::Local, 3))
            .is_err());

        // Updating a rule in place with its own key is fine.
        store
            .update(DeliveryTimeRule::new("a", ShippingMethod::Express, Zone::Local, 4))
            .unwrap();
        // Moving it onto another rule's key is not.
        let err = store
            .update(DeliveryTimeRule::new("a", ShippingMethod::Express, Zone::National, 4))
            .unwrap_err();
        assert!(matches!(err, RuleError::DuplicateKey { .. }));
    }

    #[test]
    fn update_keeps_position() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        store
            .add(ShippingRule::new("express", "Express", ShippingMethod::Express))
            .unwrap();
        store.update(ground().with_pricing(6.0, 1.0)).unwrap();
        let list = store.list::<ShippingRule>();
        assert_eq!(list[0].id, "ground");
        assert_eq!(list[0].base_cost, 6.0);
    }

    #[test]
    fn update_missing_is_not_found() {
        let mut store = RuleStore::new();
        assert!(matches!(
            store.update(ground()),
            Err(RuleError::NotFound { .. })
        ));
    }

    #[test]
    fn remove_returns_rule() {
        let mut store = RuleStore::new();
        store
            .add(CarrierRule::new("ups", "ups", "UPS", ShippingMethod::Standard))
            .unwrap();
        let removed: CarrierRule = store.remove("ups").unwrap();
        assert_eq!(removed.carrier_name, "UPS");
        assert!(store.remove::<CarrierRule>("ups").is_err());
    }

    #[test]
    fn active_snapshot_drops_inactive() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        let mut off = ShippingRule::new("off", "Off", ShippingMethod::Economy);
        off.active = false;
        store.add(off).unwrap();
        let snapshot = store.active_snapshot(now());
        assert_eq!(snapshot.shipping_rules.len(), 1);
        assert_eq!(store.rules().shipping_rules.len(), 2);
    }

    #[test]
    fn export_import_round_trip() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        store
            .add(ZoneRule::new("ca", Zone::Regional).with_states(&["CA"]))
            .unwrap();
        let doc = store.export_document(now());
        assert_eq!(doc.version, RULE_DOCUMENT_VERSION);

        let mut other = RuleStore::new();
        assert_eq!(other.import_document(doc).unwrap(), 2);
        assert_eq!(other.rules(), store.rules());
    }

    #[test]
    fn failed_import_leaves_store_untouched() {
        let mut store = RuleStore::new();
        store.add(ground()).unwrap();
        let mut bad = RuleSet::new();
        bad.shipping_rules.push(ShippingRule::new("x", "", ShippingMethod::Standard));
        assert!(store.import_document(RuleDocument::new(bad, None)).is_err());
        assert_eq!(store.list::<ShippingRule>()[0].id, "ground");
    }
}
