//! Synthesized types and their instances.
//!
//! A synthesized type is immutable once built: its surfaces are flattened
//! copies of the parent's surfaces with the merged members layered on top,
//! so dispatch never walks a chain. Handles are reference-counted — cloning
//! a type or an instance shares the interior.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::{
    error::Error,
    feature::MemberMap,
    values::{
        Value,
        method::{Method, Receiver},
    },
};

struct TypeInner {
    /// The construction function: a feature-supplied `constructor`, the
    /// parent's (shared, not re-wrapped), or the record-copy default.
    ctor: Method,
    /// Instance surface, constructor excluded.
    proto: MemberMap,
    /// Class (static) surface.
    statics: MemberMap,
    /// The parent's instance surface, kept for diagnostics and chaining;
    /// dispatch never consults it.
    parent_proto: MemberMap,
}

/// A constructible type produced by composition.
///
/// Cheap to clone; all clones share the same immutable member surfaces.
#[derive(Clone)]
pub struct ComposedType {
    inner: Rc<TypeInner>,
}

impl ComposedType {
    /// Build a derived type from `parent` plus merged member maps.
    ///
    /// A `constructor` entry in `instance_members` becomes the type's own
    /// construction function; otherwise construction forwards to the parent
    /// unchanged. Without a parent, the root shell supplies the default
    /// convention: a bare record argument is shallow-copied field-by-field
    /// onto the fresh instance.
    pub fn synthesize(
        parent: Option<&ComposedType>,
        mut instance_members: MemberMap,
        class_members: MemberMap,
    ) -> ComposedType {
        let (parent_ctor, parent_proto, parent_statics) = match parent {
            Some(parent) => (
                parent.inner.ctor.clone(),
                parent.inner.proto.clone(),
                parent.inner.statics.clone(),
            ),
            None => (
                crate::defaults::copy_constructor(),
                MemberMap::new(),
                MemberMap::new(),
            ),
        };

        let ctor = instance_members
            .remove("constructor")
            .unwrap_or(parent_ctor);

        let mut proto = parent_proto.clone();
        proto.extend(instance_members);
        let mut statics = parent_statics;
        statics.extend(class_members);

        ComposedType {
            inner: Rc::new(TypeInner {
                ctor,
                proto,
                statics,
                parent_proto,
            }),
        }
    }

    /// The instance surface (inherited + overridden), constructor excluded.
    pub fn instance_surface(&self) -> &MemberMap {
        &self.inner.proto
    }

    /// The class (static) surface (inherited + overridden).
    pub fn static_surface(&self) -> &MemberMap {
        &self.inner.statics
    }

    /// Back-reference to the parent's instance surface.
    pub fn parent_surface(&self) -> &MemberMap {
        &self.inner.parent_proto
    }

    /// The construction function, own or inherited.
    pub fn constructor(&self) -> Method {
        self.inner.ctor.clone()
    }

    /// Whether two handles denote the same synthesized type.
    pub fn same(&self, other: &ComposedType) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Resolve an instance-surface operation. The `constructor` slot always
    /// resolves to the construction function.
    pub(crate) fn instance_member(&self, name: &str) -> Option<Method> {
        if name == "constructor" {
            return Some(self.inner.ctor.clone());
        }
        self.inner.proto.get(name).cloned()
    }

    /// Resolve a class-surface operation.
    pub(crate) fn static_member(&self, name: &str) -> Option<Method> {
        self.inner.statics.get(name).cloned()
    }

    /// Construct a fresh instance through the construction function.
    ///
    /// The allocated instance is the receiver; when the construction
    /// function returns some other instance, that one is the result.
    pub fn construct(&self, args: &[Value]) -> Result<Instance, Error> {
        let instance = Instance::bare(self.clone());
        let receiver = Receiver::Instance(instance.clone());
        match (self.inner.ctor)(&receiver, args)? {
            Value::Instance(other) => Ok(other),
            _ => Ok(instance),
        }
    }

    /// Invoke a class-level operation with this type as the receiver.
    pub fn call_static(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let op = self
            .static_member(name)
            .ok_or_else(|| Error::invalid_input(format!("no such class method `{name}`")))?;
        op(&Receiver::Type(self.clone()), args)
    }

    /// The `create` factory, routed through the static surface so per-type
    /// overrides and interception hooks apply.
    pub fn create(&self, args: &[Value]) -> Result<Value, Error> {
        self.call_static("create", args)
    }
}

impl fmt::Debug for ComposedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedType")
            .field("instance", &self.inner.proto.keys().collect::<Vec<_>>())
            .field("static", &self.inner.statics.keys().collect::<Vec<_>>())
            .finish()
    }
}

struct InstanceInner {
    ty: ComposedType,
    fields: RefCell<BTreeMap<String, Value>>,
}

/// A constructed object: a shared mutable field record plus the type that
/// produced it.
#[derive(Clone)]
pub struct Instance {
    inner: Rc<InstanceInner>,
}

impl Instance {
    fn bare(ty: ComposedType) -> Instance {
        Instance {
            inner: Rc::new(InstanceInner {
                ty,
                fields: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    /// The type this instance was constructed by.
    pub fn ty(&self) -> ComposedType {
        self.inner.ty.clone()
    }

    /// Read an own field.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.inner.fields.borrow().get(name).cloned()
    }

    /// Write an own field.
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.inner.fields.borrow_mut().insert(name.into(), value);
    }

    /// Snapshot the instance's own fields as a record value.
    pub fn to_record(&self) -> Value {
        Value::Record(self.inner.fields.borrow().clone())
    }

    /// Whether two handles denote the same instance.
    pub fn same(&self, other: &Instance) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Invoke an instance-level operation with this instance as receiver.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        let op = self
            .inner
            .ty
            .instance_member(name)
            .ok_or_else(|| Error::invalid_input(format!("no such instance method `{name}`")))?;
        op(&Receiver::Instance(self.clone()), args)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({:?})", self.to_record())
    }
}

#[cfg(test)]
#[path = "ty_test.rs"]
mod ty_test;
