use anyhow::Result;
use dialog_auth_client::{
    AccessContext, AuthenticationConfiguration, Callback, CallbackError, CallbackHandler,
    Credential, CredentialKind, IdentityCredentials, NameCallback, NamePrincipal, Password,
    PasswordCallback, Principal, SaslClient, SaslClientFactory, SaslClientRequest, SaslError,
    SecurityDomain, SecurityIdentity, mechanism::names,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread::ThreadId;
use url::Url;

/// A PLAIN client whose initial response is assembled from callbacks.
struct PlainClient {
    response: Vec<u8>,
    complete: bool,
}

impl SaslClient for PlainClient {
    fn mechanism_name(&self) -> &str {
        names::PLAIN
    }

    fn has_initial_response(&self) -> bool {
        true
    }

    fn evaluate_challenge(&mut self, _: &[u8]) -> Result<Vec<u8>, SaslError> {
        self.complete = true;
        Ok(self.response.clone())
    }

    fn is_complete(&self) -> bool {
        self.complete
    }
}

/// Runs PLAIN only, and remembers the requests it saw.
#[derive(Default)]
struct PlainFactory {
    requests: Mutex<Vec<SaslClientRequest>>,
}

impl SaslClientFactory for PlainFactory {
    fn create_sasl_client(
        &self,
        request: SaslClientRequest,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<Option<Box<dyn SaslClient>>, SaslError> {
        let offered = request.mechanisms.iter().any(|name| name == names::PLAIN);
        let authorization = request.authorization_id.clone().unwrap_or_default();
        self.requests.lock().push(request);
        if !offered {
            return Ok(None);
        }

        let mut callbacks = [
            Callback::Name(NameCallback::new("Username: ")),
            Callback::Password(PasswordCallback::new("Password: ")),
        ];
        handler.handle(&mut callbacks)?;
        let (name, password) = match &callbacks {
            [Callback::Name(name), Callback::Password(password)] => (
                name.name().unwrap_or_default().to_string(),
                password.password().map(Password::as_str).unwrap_or_default().to_string(),
            ),
            _ => return Err(SaslError::Negotiation("callbacks reordered".into())),
        };

        let response = format!("{authorization}\0{name}\0{password}").into_bytes();
        Ok(Some(Box::new(PlainClient {
            response,
            complete: false,
        })))
    }

    fn mechanism_names(&self, _: &BTreeMap<String, String>) -> Vec<String> {
        vec![names::PLAIN.to_string()]
    }
}

impl PlainFactory {
    fn last_request(&self) -> Option<SaslClientRequest> {
        self.requests.lock().last().cloned()
    }
}

/// Resolves one identity, only on the thread that created the domain.
struct ThreadDomain {
    thread: ThreadId,
    identity: SecurityIdentity,
}

impl SecurityDomain for ThreadDomain {
    fn current_identity(&self, context: &AccessContext) -> Option<SecurityIdentity> {
        (context.thread() == self.thread).then(|| self.identity.clone())
    }
}

fn target() -> Result<Url> {
    Ok(Url::parse("remote+https://auth.example.org:9993/")?)
}

#[test]
fn negotiates_plain_with_configured_credentials() -> Result<()> {
    let factory = Arc::new(PlainFactory::default());
    let configuration = AuthenticationConfiguration::empty()
        .use_name("alice")
        .use_password(Some(Password::clear("secret")))
        .use_authorization_name(Some("admin"))
        .use_sasl_client_factory(factory.clone());

    let client = configuration.create_sasl_client(
        &target()?,
        [names::GSSAPI, names::PLAIN],
        |factory| factory,
    )?;
    let Some(mut client) = client else {
        anyhow::bail!("expected a PLAIN client");
    };

    assert_eq!(client.mechanism_name(), names::PLAIN);
    assert_eq!(client.evaluate_challenge(&[])?, b"admin\0alice\0secret".to_vec());
    assert!(client.is_complete());

    let request = factory.last_request().ok_or(anyhow::anyhow!("no request"))?;
    assert_eq!(request.mechanisms, vec![names::PLAIN.to_string()]);
    assert_eq!(request.server_name, "auth.example.org");
    assert_eq!(request.protocol, "remote+https");
    Ok(())
}

#[test]
fn configured_target_overrides_the_uri() -> Result<()> {
    let factory = Arc::new(PlainFactory::default());
    let configuration = AuthenticationConfiguration::empty()
        .use_name("alice")
        .use_password(Some(Password::clear("secret")))
        .use_host("internal.example.org")
        .use_protocol("remote")
        .use_mechanism_properties([("sasl.relax-compliance", "true")])
        .use_sasl_client_factory(factory.clone());

    configuration.create_sasl_client(&target()?, [names::PLAIN], |factory| factory)?;

    let request = factory.last_request().ok_or(anyhow::anyhow!("no request"))?;
    assert_eq!(request.server_name, "internal.example.org");
    assert_eq!(request.protocol, "remote");
    assert_eq!(
        request.properties.get("sasl.relax-compliance").map(String::as_str),
        Some("true")
    );
    Ok(())
}

#[test]
fn forbidden_mechanisms_never_reach_the_factory() -> Result<()> {
    let factory = Arc::new(PlainFactory::default());
    let configuration = AuthenticationConfiguration::empty()
        .use_name("alice")
        .use_password(Some(Password::clear("secret")))
        .forbid_sasl_mechanisms([names::PLAIN])
        .use_sasl_client_factory(factory.clone());

    let client = configuration.create_sasl_client(&target()?, [names::PLAIN], |factory| factory)?;

    assert!(client.is_none());
    assert_eq!(factory.last_request(), None);
    Ok(())
}

#[test]
fn the_factory_operator_sees_the_base_factory() -> Result<()> {
    let configured = Arc::new(PlainFactory::default());
    let replacement = Arc::new(PlainFactory::default());
    let configuration = AuthenticationConfiguration::empty()
        .use_name("alice")
        .use_password(Some(Password::clear("secret")))
        .use_sasl_client_factory(configured.clone());

    let expected: Arc<dyn SaslClientFactory> = configured.clone();
    let substitute: Arc<dyn SaslClientFactory> = replacement.clone();
    configuration.create_sasl_client(&target()?, [names::PLAIN], |base| {
        assert!(Arc::ptr_eq(&base, &expected));
        substitute
    })?;

    assert_eq!(configured.last_request(), None);
    assert!(replacement.last_request().is_some());
    Ok(())
}

#[test]
fn a_configured_handler_answers_instead_of_the_configuration() -> Result<()> {
    let factory = Arc::new(PlainFactory::default());
    let handler: Arc<dyn CallbackHandler> =
        Arc::new(|callbacks: &mut [Callback]| -> Result<(), CallbackError> {
            for callback in callbacks.iter_mut() {
                match callback {
                    Callback::Name(prompt) => prompt.set_name("carol"),
                    Callback::Password(prompt) => prompt.set_password(Password::clear("hunter2")),
                    other => return Err(CallbackError::Unsupported(other.kind())),
                }
            }
            Ok(())
        });
    let configuration = AuthenticationConfiguration::empty()
        .use_name("alice")
        .use_password(Some(Password::clear("secret")))
        .use_callback_handler(handler)
        .use_sasl_client_factory(factory);

    let Some(mut client) =
        configuration.create_sasl_client(&target()?, [names::PLAIN], |factory| factory)?
    else {
        anyhow::bail!("expected a PLAIN client");
    };

    assert_eq!(client.evaluate_challenge(&[])?, b"\0carol\0hunter2".to_vec());
    Ok(())
}

#[test]
fn forwards_the_identity_of_the_capturing_thread() -> Result<()> {
    let identity = SecurityIdentity::new(
        NamePrincipal::new("alice").into(),
        IdentityCredentials::none()
            .with_credential(Credential::Password(Password::clear("fwd"))),
    );
    let domain: Arc<dyn SecurityDomain> = Arc::new(ThreadDomain {
        thread: std::thread::current().id(),
        identity,
    });
    let configuration = AuthenticationConfiguration::empty()
        .use_name("bob")
        .use_forwarded_identity(domain);

    assert_eq!(configuration.principal().name(), Some("alice"));
    assert!(configuration.sasl_mechanism_supported(names::PLAIN));
    assert_eq!(
        configuration.credential_source().get_credential(CredentialKind::Password)?,
        Some(Credential::Password(Password::clear("fwd")))
    );

    // The captured context stays with the configuration when it moves.
    let elsewhere = configuration.clone();
    let principal = std::thread::spawn(move || elsewhere.principal())
        .join()
        .map_err(|_| anyhow::anyhow!("thread panicked"))?;
    assert_eq!(principal.name(), Some("alice"));

    // Naming again replaces the forwarded identity.
    assert_eq!(configuration.use_name("bob").principal().name(), Some("bob"));
    Ok(())
}

#[test]
fn forwarding_from_an_unknown_context_is_anonymous() -> Result<()> {
    let domain: Arc<dyn SecurityDomain> = Arc::new(ThreadDomain {
        thread: std::thread::current().id(),
        identity: SecurityIdentity::new(
            NamePrincipal::new("alice").into(),
            IdentityCredentials::none(),
        ),
    });

    let configuration = std::thread::spawn(move || {
        AuthenticationConfiguration::empty().use_forwarded_identity(domain)
    })
    .join()
    .map_err(|_| anyhow::anyhow!("thread panicked"))?;

    assert_eq!(configuration.principal(), Principal::Anonymous);
    assert!(!configuration.sasl_mechanism_supported(names::PLAIN));
    Ok(())
}
