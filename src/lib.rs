//! Composable — a feature composition engine for dynamic types.
//!
//! # Overview
//!
//! Composable synthesizes types out of ordered lists of *features*. A
//! feature contributes instance-level operations, class-level (static)
//! operations, and pre/post interception hooks; composing a list folds those
//! contributions into one constructible type with deterministic semantics:
//! later features override earlier ones, hooks chain around originals as
//! unary transformers, and a direct redefinition purges the class-scope
//! hooks staged for that name. Typical uses:
//!
//! - Layering shared behavior (audit stamps, id assignment, argument
//!   massaging) over a family of model types
//! - Grafting the surface of an existing composed type into a new one
//! - Intercepting factory methods without touching their implementation
//!
//! # Quick Start
//!
//! ```
//! use composable::{Feature, Value, compose};
//!
//! // The zero-input composition: record-copy construction + a `create`
//! // factory.
//! let base = compose([]).unwrap();
//!
//! // Stage a feature that stamps everything `create` produces.
//! let audited = base
//!     .use_features(Feature::new().post_class("create", |_, args| {
//!         let made = args[0].clone();
//!         if let Some(instance) = made.as_instance() {
//!             instance.set("audited", Value::from(true));
//!         }
//!         Ok(made)
//!     }))
//!     .unwrap()
//!     .get_composed()
//!     .unwrap();
//!
//! let made = audited
//!     .create(&[Value::record([("x", Value::from(1))])])
//!     .unwrap();
//! let instance = made.as_instance().unwrap();
//! assert_eq!(instance.get("x"), Some(Value::from(1)));
//! assert_eq!(instance.get("audited"), Some(Value::from(true)));
//! ```
//!
//! # Hooks
//!
//! Hooks registered through [`Composer::pre`] / [`Composer::post`] (or the
//! feature-level `pre_*`/`post_*` builders) run as a chain around the
//! original operation: `pre..., original, post...`. The first step receives
//! the caller's arguments; every later step receives exactly the previous
//! step's return value. The receiver — the type for class-level calls, the
//! instance for instance-level calls — is threaded explicitly into every
//! step.
//!
//! Composition is synchronous and single-threaded by construction; the
//! handles are reference-counted and deliberately not `Send`/`Sync`.

pub use composable_core::{
    ComposedType, Composer, Error, Feature, FeatureInput, HookBlock, HookDescriptor, HookMap,
    Instance, MemberMap, Method, Receiver, Scope, Staged, Value, compose, default_class_members,
    default_feature, default_instance_members, merge, method, normalize, wrap,
};
