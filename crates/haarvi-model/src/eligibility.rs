//! Per-participant eligibility bookkeeping.

use std::collections::BTreeMap;

use crate::category::EligibilityKey;

/// Results of every (category, offset) check evaluated for one participant.
///
/// `checks` maps each evaluated key to its outcome; a key that is absent was
/// never evaluated because the category had no event dates. The eligible
/// keys are also kept in the order they were first found, which is the order
/// written to the schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Eligibility {
    checks: BTreeMap<EligibilityKey, bool>,
    appointments: Vec<EligibilityKey>,
}

impl Eligibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of one check.
    ///
    /// Recording the same key again never duplicates it in the appointment
    /// list, and a positive outcome is never downgraded. Returns `true` when
    /// the key was added to the appointment list by this call.
    pub fn record(&mut self, key: EligibilityKey, eligible: bool) -> bool {
        if !eligible {
            self.checks.entry(key).or_insert(false);
            return false;
        }
        self.checks.insert(key, true);
        if self.appointments.contains(&key) {
            return false;
        }
        self.appointments.push(key);
        true
    }

    /// Outcome of a check, or `None` when it was never evaluated.
    pub fn check(&self, key: EligibilityKey) -> Option<bool> {
        self.checks.get(&key).copied()
    }

    pub fn is_eligible(&self, key: EligibilityKey) -> bool {
        self.check(key).unwrap_or(false)
    }

    /// Iterates over every evaluated check in key order.
    pub fn checks(&self) -> impl Iterator<Item = (EligibilityKey, bool)> + '_ {
        self.checks.iter().map(|(key, eligible)| (*key, *eligible))
    }

    /// Eligible appointments in discovery order.
    pub fn appointments(&self) -> &[EligibilityKey] {
        &self.appointments
    }

    /// True when no appointment is due.
    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{EventCategory, Offset};

    fn key(category: EventCategory, offset: Offset) -> EligibilityKey {
        EligibilityKey::new(category, offset)
    }

    #[test]
    fn recording_twice_does_not_duplicate() {
        let mut eligibility = Eligibility::new();
        let cov = key(EventCategory::CovVaccine, Offset::Months3);
        assert!(eligibility.record(cov, true));
        assert!(!eligibility.record(cov, true));
        assert_eq!(eligibility.appointments(), &[cov]);
    }

    #[test]
    fn positive_outcome_is_not_downgraded() {
        let mut eligibility = Eligibility::new();
        let flu = key(EventCategory::FluVaccine, Offset::Days30);
        eligibility.record(flu, true);
        eligibility.record(flu, false);
        assert_eq!(eligibility.check(flu), Some(true));
    }

    #[test]
    fn unevaluated_checks_are_distinguished_from_failures() {
        let mut eligibility = Eligibility::new();
        let rsv = key(EventCategory::RsvVaccine, Offset::Months12);
        let cov = key(EventCategory::CovInfection, Offset::Months6);
        eligibility.record(rsv, false);
        assert_eq!(eligibility.check(rsv), Some(false));
        assert_eq!(eligibility.check(cov), None);
        assert!(!eligibility.is_eligible(cov));
        assert!(eligibility.is_empty());
        assert_eq!(eligibility.checks().count(), 1);
    }

    #[test]
    fn appointments_keep_discovery_order() {
        let mut eligibility = Eligibility::new();
        let first = key(EventCategory::RsvVaccine, Offset::Months24);
        let second = key(EventCategory::CovInfection, Offset::Days30);
        eligibility.record(first, true);
        eligibility.record(second, true);
        assert_eq!(eligibility.appointments(), &[first, second]);
    }
}
