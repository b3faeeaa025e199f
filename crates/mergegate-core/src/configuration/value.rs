//! Typed rule configuration values
//!
//! Rules declare their configuration as an ordinary Rust type implementing
//! [`ConfigurationType`]. The engine carries it around as an opaque
//! [`ConfigurationValue`] and only the owning rule downcasts it.

use super::descriptor::TypeDescriptor;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A rule configuration type
pub trait ConfigurationType:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Stable tag identifying this type in persisted payloads
    const TYPE_TAG: &'static str;

    /// Shape and constraints of this type
    fn descriptor() -> TypeDescriptor;
}

trait ErasedConfiguration: fmt::Debug + Send + Sync {
    fn type_tag(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn ErasedConfiguration) -> bool;
}

impl<T: ConfigurationType> ErasedConfiguration for T {
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn ErasedConfiguration) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map(|other| self == other)
            .unwrap_or(false)
    }
}

/// Type-erased configuration value of a single applied rule
///
/// Cloning is cheap; the value itself is immutable.
#[derive(Clone)]
pub struct ConfigurationValue {
    inner: Arc<dyn ErasedConfiguration>,
}

impl ConfigurationValue {
    /// Wrap a typed configuration
    pub fn new<T: ConfigurationType>(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Tag of the wrapped type
    pub fn type_tag(&self) -> &'static str {
        self.inner.type_tag()
    }

    /// Borrow the wrapped value as `T` if it has that type
    pub fn downcast_ref<T: ConfigurationType>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Check whether the wrapped value has type `T`
    pub fn is<T: ConfigurationType>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl PartialEq for ConfigurationValue {
    fn eq(&self, other: &Self) -> bool {
        self.inner.dyn_eq(other.inner.as_ref())
    }
}

impl fmt::Debug for ConfigurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
