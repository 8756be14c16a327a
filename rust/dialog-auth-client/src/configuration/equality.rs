use super::{AuthenticationConfiguration, Setting, SettingKind};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::Ordering;

/// The effective settings of a chain, keyed by kind.
///
/// Singleton kinds map to their one active overlay. Multi-valued kinds list
/// their overlays from the oldest to the newest. Overlays that answer like
/// their absence are left out.
type Canonical<'a> = BTreeMap<SettingKind, Vec<&'a Setting>>;

impl AuthenticationConfiguration {
    fn canonical(&self) -> Canonical<'_> {
        let mut canonical = Canonical::new();
        for setting in self.settings().filter(|setting| !setting.is_default()) {
            let kind = setting.kind();
            if kind.is_multi_valued() {
                canonical.entry(kind).or_default().insert(0, setting);
            } else {
                canonical.entry(kind).or_insert_with(|| vec![setting]);
            }
        }
        canonical
    }

    /// Whether every effective setting of this chain is also effective in
    /// `other`.
    fn half_equal(&self, other: &AuthenticationConfiguration) -> bool {
        let theirs = other.canonical();
        self.canonical()
            .iter()
            .all(|(kind, settings)| theirs.get(kind) == Some(settings))
    }

    /// Hash of the effective settings, computed once per chain. Zero is
    /// reserved for "not computed yet".
    pub(super) fn structural_hash(&self) -> u64 {
        let cached = self.0.hash.load(Ordering::Acquire);
        if cached != 0 {
            return cached;
        }
        let mut hasher = DefaultHasher::new();
        self.canonical().hash(&mut hasher);
        let computed = match hasher.finish() {
            0 => 1,
            hash => hash,
        };
        self.0.hash.store(computed, Ordering::Release);
        computed
    }
}

impl PartialEq for AuthenticationConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.structural_hash() == other.structural_hash()
                && self.half_equal(other)
                && other.half_equal(self))
    }
}

impl Eq for AuthenticationConfiguration {}

impl Hash for AuthenticationConfiguration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.structural_hash().hash(state);
    }
}
