//! Security providers: named bundles of mechanism factories and trust
//! material, looked up through a [`ProviderSupplier`].

use crate::{Handle, SaslClientFactory, X509TrustManager};
use parking_lot::RwLock;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

/// A named source of security services.
pub trait SecurityProvider: Send + Sync {
    /// Unique provider name.
    fn name(&self) -> &str;

    /// Mechanism factories this provider offers, in preference order.
    fn sasl_client_factories(&self) -> Vec<Arc<dyn SaslClientFactory>>;

    /// The platform trust manager, if this provider offers one.
    fn trust_manager(&self) -> Option<Arc<dyn X509TrustManager>> {
        None
    }
}

/// An ordered list of providers that can be changed at runtime.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<Vec<Arc<dyn SecurityProvider>>>,
}

static GLOBAL: LazyLock<Arc<ProviderRegistry>> =
    LazyLock::new(|| Arc::new(ProviderRegistry::default()));

impl ProviderRegistry {
    /// The process-wide registry backing [`ProviderSupplier::installed`].
    pub fn global() -> Arc<ProviderRegistry> {
        GLOBAL.clone()
    }

    /// Appends `provider` unless one with the same name is already
    /// installed. Returns whether it was added.
    pub fn install(&self, provider: Arc<dyn SecurityProvider>) -> bool {
        let mut providers = self.providers.write();
        if providers
            .iter()
            .any(|installed| installed.name() == provider.name())
        {
            return false;
        }
        tracing::trace!(provider = provider.name(), "Installing security provider");
        providers.push(provider);
        true
    }

    /// Removes the provider called `name`. Returns whether one was removed.
    pub fn remove(&self, name: &str) -> bool {
        let mut providers = self.providers.write();
        let before = providers.len();
        providers.retain(|provider| provider.name() != name);
        providers.len() != before
    }

    /// Snapshot of the installed providers, in installation order.
    pub fn providers(&self) -> Vec<Arc<dyn SecurityProvider>> {
        self.providers.read().clone()
    }
}

impl Debug for ProviderRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let providers = self.providers();
        f.debug_list()
            .entries(providers.iter().map(|provider| provider.name()))
            .finish()
    }
}

/// Installs `provider` in the process-wide registry.
pub fn install_provider(provider: Arc<dyn SecurityProvider>) -> bool {
    GLOBAL.install(provider)
}

/// Removes the provider called `name` from the process-wide registry.
pub fn remove_provider(name: &str) -> bool {
    GLOBAL.remove(name)
}

/// Snapshot of the process-wide registry.
pub fn installed_providers() -> Vec<Arc<dyn SecurityProvider>> {
    GLOBAL.providers()
}

type SupplierFn = dyn Fn() -> Vec<Arc<dyn SecurityProvider>> + Send + Sync;

static INSTALLED: LazyLock<ProviderSupplier> = LazyLock::new(|| {
    let registry = ProviderRegistry::global();
    ProviderSupplier::new(move || registry.providers())
});

/// Yields the providers to search, in order. Each call may produce a fresh
/// list, so suppliers backed by a registry see later installations.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProviderSupplier(Handle<SupplierFn>);

impl ProviderSupplier {
    /// Wraps a supplier function.
    pub fn new(
        supplier: impl Fn() -> Vec<Arc<dyn SecurityProvider>> + Send + Sync + 'static,
    ) -> Self {
        let supplier: Arc<SupplierFn> = Arc::new(supplier);
        Self(Handle::from_arc(supplier))
    }

    /// The process-wide installed providers. Every call returns the same
    /// supplier.
    pub fn installed() -> Self {
        INSTALLED.clone()
    }

    /// Providers currently installed in `registry`.
    pub fn from_registry(registry: Arc<ProviderRegistry>) -> Self {
        Self::new(move || registry.providers())
    }

    /// Always the given providers.
    pub fn fixed(providers: Vec<Arc<dyn SecurityProvider>>) -> Self {
        Self::new(move || providers.clone())
    }

    /// Runs the supplier.
    pub fn providers(&self) -> Vec<Arc<dyn SecurityProvider>> {
        (*self.0)()
    }

    /// This supplier's providers followed by those of `fallback` whose names
    /// are not already present.
    pub fn then(&self, fallback: ProviderSupplier) -> Self {
        let first = self.clone();
        Self::new(move || {
            let mut providers = first.providers();
            for provider in fallback.providers() {
                if !providers
                    .iter()
                    .any(|existing| existing.name() == provider.name())
                {
                    providers.push(provider);
                }
            }
            providers
        })
    }
}

impl Debug for ProviderSupplier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ProviderSupplier").field(&self.0).finish()
    }
}
