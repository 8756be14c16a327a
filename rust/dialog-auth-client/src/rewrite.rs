use crate::Handle;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, LazyLock};

type RewriteFn = dyn Fn(&str) -> String + Send + Sync;

static IDENTITY: LazyLock<NameRewriter> =
    LazyLock::new(|| NameRewriter::new(|name: &str| name.to_string()));

/// Rewrites the principal name before it is handed to a mechanism.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct NameRewriter(Handle<RewriteFn>);

impl NameRewriter {
    /// Wraps a rewrite function.
    pub fn new(rewrite: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        let rewrite: Arc<RewriteFn> = Arc::new(rewrite);
        Self(Handle::from_arc(rewrite))
    }

    /// The rewriter that leaves names unchanged. Every call returns the same
    /// rewriter.
    pub fn identity() -> Self {
        IDENTITY.clone()
    }

    /// Applies the rewriter.
    pub fn rewrite(&self, name: &str) -> String {
        (*self.0)(name)
    }

    /// Applies this rewriter, then `next`. Composing with the identity
    /// rewriter on either side returns the other rewriter unchanged.
    pub fn and_then(&self, next: NameRewriter) -> Self {
        if *self == *IDENTITY {
            return next;
        }
        if next == *IDENTITY {
            return self.clone();
        }
        let first = self.clone();
        Self::new(move |name| next.rewrite(&first.rewrite(name)))
    }
}

impl Debug for NameRewriter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NameRewriter").field(&self.0).finish()
    }
}
