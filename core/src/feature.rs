//! Canonical feature records and input normalization.
//!
//! A feature is a unit of composable behavior: operations for the instance
//! surface, operations for the class surface, and pre/post interception
//! hooks for either. Features are plain data — merging them never touches an
//! existing type, it only produces new member maps.

use std::collections::BTreeMap;
use std::fmt;

use crate::{
    error::Error,
    ty::ComposedType,
    values::{
        Value,
        method::{Method, Receiver, method},
    },
};

/// Named operations contributed to one surface of a type.
pub type MemberMap = BTreeMap<String, Method>;

/// Ordered handler lists, keyed by the method name they intercept.
pub type HookMap = BTreeMap<String, Vec<Method>>;

/// Hook contributions for both scopes of a feature.
#[derive(Clone, Default)]
pub struct HookBlock {
    pub instance_members: HookMap,
    pub class_members: HookMap,
}

impl HookBlock {
    pub fn is_empty(&self) -> bool {
        self.instance_members.is_empty() && self.class_members.is_empty()
    }
}

impl fmt::Debug for HookBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summarize = |map: &HookMap| {
            map.iter()
                .map(|(name, handlers)| (name.clone(), handlers.len()))
                .collect::<BTreeMap<_, _>>()
        };
        f.debug_struct("HookBlock")
            .field("instance_members", &summarize(&self.instance_members))
            .field("class_members", &summarize(&self.class_members))
            .finish()
    }
}

/// A unit of composable behavior.
///
/// Feature order is override precedence: when two features contribute the
/// same member name, the later one wins. Hooks accumulate in registration
/// order across features unless purged by a direct redefinition.
#[derive(Clone, Default)]
pub struct Feature {
    pub name: Option<String>,
    pub instance_members: MemberMap,
    pub class_members: MemberMap,
    pub pre: HookBlock,
    pub post: HookBlock,
}

impl Feature {
    pub fn new() -> Self {
        Self::default()
    }

    /// A feature carrying a diagnostic name.
    pub fn named(name: impl Into<String>) -> Self {
        Feature {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Contribute an instance-level operation.
    ///
    /// The `constructor` entry is special: the synthesizer lifts it out as
    /// the resulting type's construction function.
    pub fn instance<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.instance_members.insert(name.into(), method(op));
        self
    }

    /// Contribute a class-level (static) operation.
    pub fn class<F>(mut self, name: impl Into<String>, op: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.class_members.insert(name.into(), method(op));
        self
    }

    /// Append a pre-hook for the named instance-level operation.
    pub fn pre_instance<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.pre
            .instance_members
            .entry(name.into())
            .or_default()
            .push(method(handler));
        self
    }

    /// Append a pre-hook for the named class-level operation.
    pub fn pre_class<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.pre
            .class_members
            .entry(name.into())
            .or_default()
            .push(method(handler));
        self
    }

    /// Append a post-hook for the named instance-level operation.
    pub fn post_instance<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.post
            .instance_members
            .entry(name.into())
            .or_default()
            .push(method(handler));
        self
    }

    /// Append a post-hook for the named class-level operation.
    pub fn post_class<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.post
            .class_members
            .entry(name.into())
            .or_default()
            .push(method(handler));
        self
    }

    /// Read an existing type back into feature form: its instance surface
    /// with the construction function re-inserted under `constructor`, and
    /// its static surface as-is.
    pub fn from_type(ty: &ComposedType) -> Self {
        let mut instance_members = ty.instance_surface().clone();
        instance_members.insert("constructor".to_string(), ty.constructor());
        Feature {
            name: None,
            instance_members,
            class_members: ty.static_surface().clone(),
            pre: HookBlock::default(),
            post: HookBlock::default(),
        }
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field(
                "instance_members",
                &self.instance_members.keys().collect::<Vec<_>>(),
            )
            .field(
                "class_members",
                &self.class_members.keys().collect::<Vec<_>>(),
            )
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

/// One surface form accepted by [`compose`](crate::compose) and
/// [`Composer::use_features`](crate::builder::Composer::use_features).
pub enum FeatureInput {
    /// A canonical descriptor, passed through unchanged.
    Feature(Feature),
    /// An `(instance_members, class_members)` ordered pair.
    Pair(MemberMap, MemberMap),
    /// An existing constructible type.
    Type(ComposedType),
    /// A list of any of the former, flattened exactly one level.
    List(Vec<FeatureInput>),
}

impl From<Feature> for FeatureInput {
    fn from(feature: Feature) -> Self {
        FeatureInput::Feature(feature)
    }
}

impl From<(MemberMap, MemberMap)> for FeatureInput {
    fn from((instance_members, class_members): (MemberMap, MemberMap)) -> Self {
        FeatureInput::Pair(instance_members, class_members)
    }
}

impl From<ComposedType> for FeatureInput {
    fn from(ty: ComposedType) -> Self {
        FeatureInput::Type(ty)
    }
}

impl From<Vec<FeatureInput>> for FeatureInput {
    fn from(inputs: Vec<FeatureInput>) -> Self {
        FeatureInput::List(inputs)
    }
}

impl fmt::Debug for FeatureInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureInput::Feature(feature) => write!(f, "FeatureInput::Feature({feature:?})"),
            FeatureInput::Pair(instance, class) => write!(
                f,
                "FeatureInput::Pair({:?}, {:?})",
                instance.keys().collect::<Vec<_>>(),
                class.keys().collect::<Vec<_>>()
            ),
            FeatureInput::Type(ty) => write!(f, "FeatureInput::Type({ty:?})"),
            FeatureInput::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

/// A normalized item on the pending composition stack.
#[derive(Clone)]
pub enum Staged {
    /// A constructible type. In leading position it becomes the parent of
    /// the merge; anywhere else it is read back into feature form.
    Base(ComposedType),
    /// A canonical feature record.
    Feature(Feature),
}

impl fmt::Debug for Staged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Staged::Base(ty) => write!(f, "Staged::Base({ty:?})"),
            Staged::Feature(feature) => write!(f, "Staged::Feature({feature:?})"),
        }
    }
}

/// Convert heterogeneous inputs into canonical staged records.
///
/// A lone list input is unwrapped exactly once — an array of one array
/// yields the inner elements, not a recursive flatten — then every element
/// converts individually. A list still nested after the single unwrap is
/// rejected.
pub fn normalize(inputs: Vec<FeatureInput>) -> Result<Vec<Staged>, Error> {
    let inputs = if inputs.len() == 1 {
        match inputs.into_iter().next() {
            Some(FeatureInput::List(inner)) => inner,
            Some(other) => vec![other],
            None => Vec::new(),
        }
    } else {
        inputs
    };
    inputs.into_iter().map(normalize_one).collect()
}

fn normalize_one(input: FeatureInput) -> Result<Staged, Error> {
    match input {
        FeatureInput::Feature(feature) => Ok(Staged::Feature(feature)),
        FeatureInput::Pair(instance_members, class_members) => Ok(Staged::Feature(Feature {
            instance_members,
            class_members,
            ..Feature::default()
        })),
        FeatureInput::Type(ty) => Ok(Staged::Base(ty)),
        FeatureInput::List(_) => Err(Error::invalid_input(
            "feature lists flatten a single level; found a nested list",
        )),
    }
}

#[cfg(test)]
#[path = "feature_test.rs"]
mod feature_test;
