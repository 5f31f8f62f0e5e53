//! Baseline members composed when the entry function receives no input.
//!
//! Exposed as named functions so callers can compose against the defaults
//! explicitly, e.g. to layer them under their own features.

use crate::{
    feature::{Feature, MemberMap},
    values::{
        Value,
        method::{Method, method},
    },
};

/// The default construction convention: a bare record argument is
/// shallow-copied field-by-field onto the fresh instance; anything else
/// contributes nothing.
pub(crate) fn copy_constructor() -> Method {
    method(|receiver, args| {
        let instance = receiver.as_instance()?;
        if let Some(Value::Record(fields)) = args.first() {
            for (name, value) in fields {
                instance.set(name.clone(), value.clone());
            }
        }
        Ok(Value::Instance(instance.clone()))
    })
}

/// The default instance-member set: a `constructor` following the record
/// shallow-copy convention.
pub fn default_instance_members() -> MemberMap {
    let mut members = MemberMap::new();
    members.insert("constructor".to_string(), copy_constructor());
    members
}

/// The default class-member set: a `create` factory routed through the
/// type's construction function.
pub fn default_class_members() -> MemberMap {
    let mut members = MemberMap::new();
    members.insert(
        "create".to_string(),
        method(|receiver, args| {
            let ty = receiver.as_type()?;
            Ok(Value::Instance(ty.construct(args)?))
        }),
    );
    members
}

/// The feature composed by the zero-argument entry.
pub fn default_feature() -> Feature {
    Feature {
        name: Some("defaults".to_string()),
        instance_members: default_instance_members(),
        class_members: default_class_members(),
        ..Feature::default()
    }
}
