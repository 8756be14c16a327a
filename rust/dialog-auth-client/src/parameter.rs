use std::any::{Any, TypeId};
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Algorithm parameters handed to mechanisms that need them (e.g. a
/// channel-binding type or a digest algorithm choice).
///
/// Any `'static` type with value equality and hashing is a parameter spec.
/// A configuration holds at most one spec per concrete type.
pub trait ParameterSpec: Any + Debug + Send + Sync {
    /// Upcast used for downcasting and type comparison.
    fn as_any(&self) -> &dyn Any;

    /// Value equality across erased specs: false when types differ.
    fn dyn_eq(&self, other: &dyn ParameterSpec) -> bool;

    /// Feeds the spec's type and value into `state`.
    fn dyn_hash(&self, state: &mut dyn Hasher);
}

impl<T> ParameterSpec for T
where
    T: Any + Debug + Eq + Hash + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ParameterSpec) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn dyn_hash(&self, mut state: &mut dyn Hasher) {
        TypeId::of::<T>().hash(&mut state);
        self.hash(&mut state);
    }
}

/// A shared, type-erased [`ParameterSpec`].
#[derive(Debug, Clone)]
pub struct ParameterSpecRef(Arc<dyn ParameterSpec>);

impl ParameterSpecRef {
    /// Erases `spec`.
    pub fn new<T: ParameterSpec>(spec: T) -> Self {
        Self(Arc::new(spec))
    }

    /// Concrete type of the spec; specs of the same type replace each other.
    pub fn spec_type(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    /// The spec as `T`, if that is its concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for ParameterSpecRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.dyn_eq(other.0.as_ref())
    }
}

impl Eq for ParameterSpecRef {}

impl Hash for ParameterSpecRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.dyn_hash(state);
    }
}
