use super::{AuthenticationConfiguration, Setting, SettingKind};
use crate::mechanism::names;
use std::collections::BTreeSet;

impl AuthenticationConfiguration {
    /// Whether some overlay can make use of `mechanism`.
    fn sasl_supported_by_configuration(&self, mechanism: &str) -> bool {
        self.settings().any(|setting| setting.supports(mechanism))
            || mechanism == names::JBOSS_LOCAL_USER
    }

    /// Whether every overlay's policy permits `mechanism`.
    fn sasl_allowed_by_configuration(&self, mechanism: &str) -> bool {
        self.settings().all(|setting| setting.allows(mechanism))
    }

    /// Whether this configuration would negotiate `mechanism`: it must be
    /// usable with what is configured and permitted by policy.
    pub fn sasl_mechanism_supported(&self, mechanism: &str) -> bool {
        self.sasl_supported_by_configuration(mechanism)
            && self.sasl_allowed_by_configuration(mechanism)
    }

    /// The `offered` mechanisms this configuration would negotiate, in
    /// offered order.
    pub fn filter_sasl_mechanisms<I, S>(&self, offered: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        offered
            .into_iter()
            .map(Into::into)
            .filter(|mechanism| self.sasl_mechanism_supported(mechanism))
            .collect()
    }

    /// Allows the named mechanisms, lifting any prohibition on them.
    pub fn allow_sasl_mechanisms<I, S>(&self, mechanisms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mechanisms: BTreeSet<String> = mechanisms.into_iter().map(Into::into).collect();
        let mut allowed = self.allowed_sasl_mechanisms();
        let mut denied = self.denied_sasl_mechanisms();
        allowed.extend(mechanisms.iter().cloned());
        denied.retain(|mechanism| !mechanisms.contains(mechanism));
        self.use_mechanism_filter(allowed, denied)
    }

    /// Forbids the named mechanisms, withdrawing any allowance of them.
    pub fn forbid_sasl_mechanisms<I, S>(&self, mechanisms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mechanisms: BTreeSet<String> = mechanisms.into_iter().map(Into::into).collect();
        let mut allowed = self.allowed_sasl_mechanisms();
        let mut denied = self.denied_sasl_mechanisms();
        allowed.retain(|mechanism| !mechanisms.contains(mechanism));
        denied.extend(mechanisms);
        self.use_mechanism_filter(allowed, denied)
    }

    /// Drops the mechanism filter.
    pub fn allow_all_sasl_mechanisms(&self) -> Self {
        self.without(SettingKind::MechanismFilter)
    }

    fn use_mechanism_filter(&self, allowed: BTreeSet<String>, denied: BTreeSet<String>) -> Self {
        if allowed.is_empty() && denied.is_empty() {
            return self.allow_all_sasl_mechanisms();
        }
        self.overlay(Setting::MechanismFilter { allowed, denied })
    }
}
