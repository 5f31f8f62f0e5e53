//! Callable representation for composed operations and hooks.
//!
//! Every operation a feature contributes — instance member, class member,
//! pre/post handler, constructor — shares one callable shape: it receives an
//! explicit receiver and an argument slice, and returns a value or fails.
//! The receiver is always threaded as a parameter; there is no ambient
//! binding for an operation to capture implicitly.

use std::fmt;
use std::rc::Rc;

use crate::{
    error::Error,
    ty::{ComposedType, Instance},
    values::Value,
};

/// A composed operation: shared, immutable, freely clonable.
///
/// Hook chains and member maps hold these by reference count, so installing
/// the same operation on several surfaces never copies the closure, and an
/// unwrapped operation keeps reference identity (`Rc::ptr_eq`).
pub type Method = Rc<dyn Fn(&Receiver, &[Value]) -> Result<Value, Error>>;

/// Wrap a closure as a [`Method`].
pub fn method<F>(f: F) -> Method
where
    F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
{
    Rc::new(f)
}

/// The scope an operation runs against: the type itself for class-level
/// calls, a constructed instance for instance-level calls.
#[derive(Clone)]
pub enum Receiver {
    Type(ComposedType),
    Instance(Instance),
}

impl Receiver {
    /// The receiving type, or `InvalidInput` when the operation was
    /// dispatched against an instance.
    pub fn as_type(&self) -> Result<&ComposedType, Error> {
        match self {
            Receiver::Type(ty) => Ok(ty),
            Receiver::Instance(_) => Err(Error::invalid_input(
                "expected a type receiver, got an instance",
            )),
        }
    }

    /// The receiving instance, or `InvalidInput` when the operation was
    /// dispatched against the type itself.
    pub fn as_instance(&self) -> Result<&Instance, Error> {
        match self {
            Receiver::Instance(instance) => Ok(instance),
            Receiver::Type(_) => Err(Error::invalid_input(
                "expected an instance receiver, got a type",
            )),
        }
    }
}

impl fmt::Debug for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::Type(ty) => write!(f, "Receiver::Type({ty:?})"),
            Receiver::Instance(instance) => write!(f, "Receiver::Instance({instance:?})"),
        }
    }
}
