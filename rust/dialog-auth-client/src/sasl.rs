//! Mechanism factories and the decorators the assembly pipeline wraps them
//! in.
//!
//! A [`SaslClientFactory`] turns a [`SaslClientRequest`] (offered mechanism
//! names plus target details) into a [`SaslClient`] for the first mechanism
//! it can run. Decorators rewrite the request on its way down and pass the
//! delegate's answer, including any error, back up unchanged.

use crate::{CallbackHandler, Handle, SaslError};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

mod filter;
mod properties;
mod protocol;
mod provider;
mod server_name;

pub use filter::*;
pub use properties::*;
pub use protocol::*;
pub use provider::*;
pub use server_name::*;

/// Client side of one mechanism exchange.
pub trait SaslClient: Send {
    /// Name of the negotiated mechanism.
    fn mechanism_name(&self) -> &str;

    /// Whether the client speaks first.
    fn has_initial_response(&self) -> bool;

    /// Answers a server challenge (empty for the initial response).
    fn evaluate_challenge(&mut self, challenge: &[u8]) -> Result<Vec<u8>, SaslError>;

    /// Whether the exchange has finished on the client side.
    fn is_complete(&self) -> bool;
}

/// Everything a factory needs to pick and start a mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaslClientRequest {
    /// Mechanisms the server offered, in server preference order.
    pub mechanisms: Vec<String>,
    /// Identity to act as once authenticated, if different from the
    /// authentication identity.
    pub authorization_id: Option<String>,
    /// Protocol the exchange runs in (e.g. `remote+http`).
    pub protocol: String,
    /// Fully qualified server host name.
    pub server_name: String,
    /// Mechanism specific properties.
    pub properties: BTreeMap<String, String>,
}

/// Creates mechanism clients.
pub trait SaslClientFactory: Send + Sync {
    /// Creates a client for the first mechanism in `request.mechanisms` this
    /// factory supports, or `None` if it supports none of them.
    fn create_sasl_client(
        &self,
        request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError>;

    /// Mechanisms this factory can run given `properties`.
    fn mechanism_names(&self, properties: &BTreeMap<String, String>) -> Vec<String>;
}

type FactoryFn = dyn Fn() -> Arc<dyn SaslClientFactory> + Send + Sync;

/// Yields the base mechanism factory for a configuration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SaslClientFactorySupplier(Handle<FactoryFn>);

impl SaslClientFactorySupplier {
    /// Wraps a supplier function.
    pub fn new(supplier: impl Fn() -> Arc<dyn SaslClientFactory> + Send + Sync + 'static) -> Self {
        let supplier: Arc<FactoryFn> = Arc::new(supplier);
        Self(Handle::from_arc(supplier))
    }

    /// Always yields `factory`.
    pub fn fixed(factory: Arc<dyn SaslClientFactory>) -> Self {
        Self::new(move || factory.clone())
    }

    /// Runs the supplier.
    pub fn supply(&self) -> Arc<dyn SaslClientFactory> {
        (*self.0)()
    }
}

impl Debug for SaslClientFactorySupplier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SaslClientFactorySupplier")
            .field(&self.0)
            .finish()
    }
}
