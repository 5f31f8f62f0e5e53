//! The compose fold: member override, hook purge, weaving.

use std::collections::BTreeSet;

use crate::{
    error::Error,
    feature::{Feature, HookBlock, HookMap, MemberMap, Staged},
    ty::ComposedType,
    values::method::Method,
    wrap::wrap,
};

/// Per-scope hook registries accumulated across the fold.
#[derive(Default)]
struct HookRegistry {
    instance: HookMap,
    class: HookMap,
}

/// Fold an ordered staged list into a synthesized type.
///
/// A leading constructible type becomes the parent; a constructible type
/// anywhere else is read back into feature form first. Members merge
/// last-wins into per-scope extender maps, hooks accumulate per method name
/// in registration order, and a direct member redefinition purges the
/// class-scope registrations staged so far for that name (and only those —
/// instance-scope registrations survive). Every surviving hooked name is
/// then woven over its original and installed, and the result is
/// synthesized against the parent.
pub fn merge(staged: Vec<Staged>) -> Result<ComposedType, Error> {
    if staged.is_empty() {
        return Err(Error::invalid_input(
            "compose accepts only a non-empty feature list",
        ));
    }

    let mut parent = None;
    let mut features = Vec::new();
    for (index, item) in staged.into_iter().enumerate() {
        match item {
            Staged::Base(ty) if index == 0 => parent = Some(ty),
            Staged::Base(ty) => features.push(Feature::from_type(&ty)),
            Staged::Feature(feature) => features.push(feature),
        }
    }
    tracing::debug!(
        features = features.len(),
        has_parent = parent.is_some(),
        "merging feature list"
    );

    let mut instance_extender = MemberMap::new();
    let mut class_extender = MemberMap::new();
    let mut pre_fns = HookRegistry::default();
    let mut post_fns = HookRegistry::default();

    for feature in features {
        if !feature.instance_members.is_empty() {
            purge_class_hooks(&mut pre_fns, &mut post_fns, &feature.instance_members);
            instance_extender.extend(feature.instance_members);
        }
        if !feature.class_members.is_empty() {
            purge_class_hooks(&mut pre_fns, &mut post_fns, &feature.class_members);
            class_extender.extend(feature.class_members);
        }
        append_hooks(&mut pre_fns, feature.pre);
        append_hooks(&mut post_fns, feature.post);
    }

    weave_scope(
        &mut instance_extender,
        &pre_fns.instance,
        &post_fns.instance,
        |name| parent.as_ref().and_then(|p| p.instance_member(name)),
        "instance",
    )?;
    weave_scope(
        &mut class_extender,
        &pre_fns.class,
        &post_fns.class,
        |name| parent.as_ref().and_then(|p| p.static_member(name)),
        "class",
    )?;

    Ok(ComposedType::synthesize(
        parent.as_ref(),
        instance_extender,
        class_extender,
    ))
}

/// A redefined member wins over interception staged so far. Only the
/// class-scope registries are purged; instance-scope hooks survive
/// redefinition.
fn purge_class_hooks(pre: &mut HookRegistry, post: &mut HookRegistry, members: &MemberMap) {
    for name in members.keys() {
        let purged_pre = pre.class.remove(name).is_some();
        let purged_post = post.class.remove(name).is_some();
        if purged_pre || purged_post {
            tracing::debug!(method = %name, "redefinition purged staged class-scope hooks");
        }
    }
}

fn append_hooks(registry: &mut HookRegistry, block: HookBlock) {
    for (name, handlers) in block.instance_members {
        registry.instance.entry(name).or_default().extend(handlers);
    }
    for (name, handlers) in block.class_members {
        registry.class.entry(name).or_default().extend(handlers);
    }
}

/// Weave every hooked name in one scope over its original and install the
/// result in the extender map.
///
/// The original is the extender's member when one was merged, else the
/// operation inherited from the parent. A name resolving on neither fails
/// eagerly — composition is definitional, so a dangling hook is an input
/// error, not a latent call-time crash.
fn weave_scope(
    extender: &mut MemberMap,
    pre: &HookMap,
    post: &HookMap,
    inherited: impl Fn(&str) -> Option<Method>,
    scope: &str,
) -> Result<(), Error> {
    let hooked: BTreeSet<&String> = pre.keys().chain(post.keys()).collect();
    for name in hooked {
        let original = extender
            .get(name.as_str())
            .cloned()
            .or_else(|| inherited(name))
            .ok_or_else(|| {
                Error::invalid_input(format!("no original {scope} method `{name}` to hook"))
            })?;
        let wrapped = wrap(
            original,
            pre.get(name.as_str()).map(Vec::as_slice).unwrap_or(&[]),
            post.get(name.as_str()).map(Vec::as_slice).unwrap_or(&[]),
            None,
        );
        extender.insert(name.clone(), wrapped);
    }
    Ok(())
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
