//! Core machinery of the composable feature engine.
//!
//! A *feature* contributes instance members, class (static) members, and
//! pre/post interception hooks. [`compose`] folds an ordered feature list
//! into a single synthesized type with deterministic semantics:
//!
//! - later features override earlier ones, member by member;
//! - directly redefining a member purges the class-scope hooks staged so
//!   far for that name (instance-scope hooks survive);
//! - hooks chain around the original as unary transformers, threading one
//!   value from step to step;
//! - the receiver (type or instance) is an explicit parameter of every
//!   operation, never an ambient binding.
//!
//! Composition happens once, at type-definition time, and the result is
//! immutable. The handles are single-threaded by construction (`Rc`-based);
//! see the crate-level facade for the full API tour.
//!
//! ```
//! use composable_core::{Feature, Value, compose};
//!
//! let base = compose([]).unwrap();
//! let point = base
//!     .use_features(Feature::new().instance("sum", |receiver, _args| {
//!         let instance = receiver.as_instance()?;
//!         let x = instance.get("x").and_then(|v| v.as_int()).unwrap_or(0);
//!         let y = instance.get("y").and_then(|v| v.as_int()).unwrap_or(0);
//!         Ok(Value::from(x + y))
//!     }))
//!     .unwrap()
//!     .get_composed()
//!     .unwrap();
//!
//! let record = Value::record([("x", Value::from(2)), ("y", Value::from(3))]);
//! let made = point.create(&[record]).unwrap();
//! let instance = made.as_instance().unwrap();
//! assert_eq!(instance.call("sum", &[]).unwrap(), Value::from(5));
//! ```

pub mod builder;
pub mod defaults;
pub mod error;
pub mod feature;
pub mod merge;
pub mod ty;
pub mod values;
pub mod wrap;

pub use builder::{Composer, HookDescriptor, Scope};
pub use defaults::{default_class_members, default_feature, default_instance_members};
pub use error::Error;
pub use feature::{Feature, FeatureInput, HookBlock, HookMap, MemberMap, Staged, normalize};
pub use merge::merge;
pub use ty::{ComposedType, Instance};
pub use values::{
    Value,
    method::{Method, Receiver, method},
};

/// Compose zero or more feature inputs into a synthesized type.
///
/// Each input is a descriptor, an `(instance_members, class_members)` pair,
/// an existing constructible type, or a list of any of the former (flattened
/// exactly one level). A leading constructible type becomes the parent of
/// the composition. With no inputs at all, the documented default feature is
/// composed: record-copy construction plus a `create` factory.
pub fn compose(inputs: impl IntoIterator<Item = FeatureInput>) -> Result<ComposedType, Error> {
    let inputs: Vec<FeatureInput> = inputs.into_iter().collect();
    let staged = if inputs.is_empty() {
        vec![Staged::Feature(defaults::default_feature())]
    } else {
        normalize(inputs)?
    };
    merge(staged)
}
