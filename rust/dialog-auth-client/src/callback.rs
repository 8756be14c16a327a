//! Prompts a mechanism raises during negotiation, and the handlers that
//! answer them.

use crate::{CallbackError, Credential, CredentialKind, Handle, Password};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

/// Discriminant of a [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallbackKind {
    /// [`Callback::Name`]
    Name,
    /// [`Callback::Password`]
    Password,
    /// [`Callback::Credential`]
    Credential,
    /// [`Callback::Realm`]
    Realm,
    /// [`Callback::Choice`] over something other than realms.
    Choice,
    /// [`Callback::Choice`] over realms.
    RealmChoice,
}

/// Asks for the authentication name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCallback {
    prompt: String,
    default_name: Option<String>,
    name: Option<String>,
}

impl NameCallback {
    /// Creates an unanswered name prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default_name: None,
            name: None,
        }
    }

    /// Adds a suggested name.
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = Some(name.into());
        self
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The suggested name.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// The answer, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Answers the prompt.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }
}

/// Asks for a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCallback {
    prompt: String,
    password: Option<Password>,
}

impl PasswordCallback {
    /// Creates an unanswered password prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            password: None,
        }
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The answer, if any.
    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    /// Answers the prompt.
    pub fn set_password(&mut self, password: Password) {
        self.password = Some(password);
    }
}

/// Asks for a credential of a specific kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialCallback {
    kind: CredentialKind,
    credential: Option<Credential>,
}

impl CredentialCallback {
    /// Creates an unanswered request for a credential of `kind`.
    pub fn new(kind: CredentialKind) -> Self {
        Self {
            kind,
            credential: None,
        }
    }

    /// The requested kind.
    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// The answer, if any.
    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Takes the answer out of the callback.
    pub fn take_credential(&mut self) -> Option<Credential> {
        self.credential.take()
    }

    /// Answers the request. Credentials of another kind are ignored and
    /// `false` is returned.
    pub fn set_credential(&mut self, credential: Credential) -> bool {
        if credential.kind() != self.kind {
            return false;
        }
        self.credential = Some(credential);
        true
    }
}

/// Asks for a realm name as free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmCallback {
    prompt: String,
    default_text: Option<String>,
    text: Option<String>,
}

impl RealmCallback {
    /// Creates an unanswered realm prompt with an optional suggestion.
    pub fn new(prompt: impl Into<String>, default_text: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            default_text,
            text: None,
        }
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The suggested realm.
    pub fn default_text(&self) -> Option<&str> {
        self.default_text.as_deref()
    }

    /// The answer, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Answers the prompt.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }
}

/// What a [`ChoiceCallback`] chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Mechanism specific choice.
    Generic,
    /// Choice between realms offered by the server.
    Realm,
}

/// Asks to pick among a fixed list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceCallback {
    kind: ChoiceKind,
    prompt: String,
    choices: Vec<String>,
    default_choice: usize,
    selected: Vec<usize>,
}

impl ChoiceCallback {
    /// Creates an unanswered choice.
    pub fn new(
        kind: ChoiceKind,
        prompt: impl Into<String>,
        choices: Vec<String>,
        default_choice: usize,
    ) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            choices,
            default_choice,
            selected: Vec::new(),
        }
    }

    /// Creates an unanswered choice between realms.
    pub fn realm(prompt: impl Into<String>, choices: Vec<String>, default_choice: usize) -> Self {
        Self::new(ChoiceKind::Realm, prompt, choices, default_choice)
    }

    /// What is being chosen.
    pub fn kind(&self) -> ChoiceKind {
        self.kind
    }

    /// The prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The options, in server order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Index of the suggested option.
    pub fn default_choice(&self) -> usize {
        self.default_choice
    }

    /// Indexes selected so far.
    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    /// Selects exactly one option.
    pub fn select(&mut self, index: usize) {
        self.selected = vec![index];
    }
}

/// A prompt raised by a mechanism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    /// See [`NameCallback`].
    Name(NameCallback),
    /// See [`PasswordCallback`].
    Password(PasswordCallback),
    /// See [`CredentialCallback`].
    Credential(CredentialCallback),
    /// See [`RealmCallback`].
    Realm(RealmCallback),
    /// See [`ChoiceCallback`].
    Choice(ChoiceCallback),
}

impl Callback {
    /// The kind of this callback.
    pub fn kind(&self) -> CallbackKind {
        match self {
            Self::Name(_) => CallbackKind::Name,
            Self::Password(_) => CallbackKind::Password,
            Self::Credential(_) => CallbackKind::Credential,
            Self::Realm(_) => CallbackKind::Realm,
            Self::Choice(choice) => match choice.kind() {
                ChoiceKind::Generic => CallbackKind::Choice,
                ChoiceKind::Realm => CallbackKind::RealmChoice,
            },
        }
    }
}

/// Answers the callbacks a mechanism raises.
///
/// Returning [`CallbackError::Unsupported`] tells the mechanism that this
/// handler cannot answer; the mechanism decides whether that is fatal.
pub trait CallbackHandler: Send + Sync {
    /// Answers every callback in `callbacks`, in order.
    fn handle(&self, callbacks: &mut [Callback]) -> Result<(), CallbackError>;
}

impl<F> CallbackHandler for F
where
    F: Fn(&mut [Callback]) -> Result<(), CallbackError> + Send + Sync,
{
    fn handle(&self, callbacks: &mut [Callback]) -> Result<(), CallbackError> {
        self(callbacks)
    }
}

type ChoiceFn = dyn Fn(&mut ChoiceCallback) -> bool + Send + Sync;

static NEVER: LazyLock<ChoiceOperation> = LazyLock::new(|| ChoiceOperation::new(|_| false));

/// Answers a [`ChoiceCallback`] if it recognises it, returning `true` when
/// it made a selection.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ChoiceOperation(Handle<ChoiceFn>);

impl ChoiceOperation {
    /// Wraps a choice function.
    pub fn new(operation: impl Fn(&mut ChoiceCallback) -> bool + Send + Sync + 'static) -> Self {
        let operation: Arc<ChoiceFn> = Arc::new(operation);
        Self(Handle::from_arc(operation))
    }

    /// The operation that never answers.
    pub fn never() -> Self {
        NEVER.clone()
    }

    /// Tries this operation, then `other` if this one made no selection.
    pub fn or(&self, other: ChoiceOperation) -> Self {
        let first = self.clone();
        Self::new(move |callback| first.apply(callback) || other.apply(callback))
    }

    /// Runs the operation against `callback`.
    pub fn apply(&self, callback: &mut ChoiceCallback) -> bool {
        (*self.0)(callback)
    }
}

impl Debug for ChoiceOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ChoiceOperation").field(&self.0).finish()
    }
}
