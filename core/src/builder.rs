//! Fluent staging of features against a base type.
//!
//! The pending composition stack lives on an explicit [`Composer`] value,
//! not on the type itself, so two builds over the same base can never
//! clobber each other's staging state.

use std::fmt;
use std::mem;

use crate::{
    error::Error,
    feature::{Feature, FeatureInput, HookBlock, Staged, normalize},
    merge::merge,
    ty::ComposedType,
    values::{
        Value,
        method::{Method, Receiver, method},
    },
};

/// Which surface a hook registration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Instance,
    Class,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Instance => write!(f, "instance"),
            Scope::Class => write!(f, "class"),
        }
    }
}

/// Descriptor form of a hook registration, accepted by
/// [`Composer::pre_with`] and [`Composer::post_with`].
pub struct HookDescriptor {
    pub name: String,
    pub handle: Method,
    pub scope: Option<Scope>,
}

#[derive(Clone, Copy)]
enum HookKind {
    Pre,
    Post,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Pre => write!(f, "pre"),
            HookKind::Post => write!(f, "post"),
        }
    }
}

/// Pending composition stack for one base type.
///
/// The stack auto-initializes with the base type itself on the first
/// `use_features`, so finalization always knows its parent. Finalizing
/// drains the stack; finalizing again without new staging yields the base
/// type unchanged.
pub struct Composer {
    base: ComposedType,
    staged: Vec<Staged>,
}

impl Composer {
    pub fn new(base: ComposedType) -> Self {
        Composer {
            base,
            staged: Vec::new(),
        }
    }

    /// The base type this composer stages against.
    pub fn base(&self) -> &ComposedType {
        &self.base
    }

    /// Stage features for composition.
    ///
    /// Input normalizes under the single-level flatten rule before anything
    /// is appended, so a rejected input leaves the stack untouched.
    pub fn use_features(
        &mut self,
        features: impl Into<FeatureInput>,
    ) -> Result<&mut Self, Error> {
        let incoming = normalize(vec![features.into()])?;
        if self.staged.is_empty() {
            self.staged.push(Staged::Base(self.base.clone()));
        }
        self.staged.extend(incoming);
        Ok(self)
    }

    /// Register a pre-hook on `name`.
    ///
    /// Without a scope hint both of the base type's surfaces are probed and
    /// the handler registers on every surface where `name` resolves to an
    /// operation; with a hint only that surface is considered. A name
    /// resolving nowhere is `InvalidInput` and stages nothing.
    pub fn pre<F>(&mut self, name: &str, handler: F, scope: Option<Scope>) -> Result<&mut Self, Error>
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.hook(HookKind::Pre, name, method(handler), scope)
    }

    /// Register a post-hook on `name`. Same resolution rules as [`pre`](Self::pre).
    pub fn post<F>(&mut self, name: &str, handler: F, scope: Option<Scope>) -> Result<&mut Self, Error>
    where
        F: Fn(&Receiver, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.hook(HookKind::Post, name, method(handler), scope)
    }

    /// Descriptor form of [`pre`](Self::pre).
    pub fn pre_with(&mut self, descriptor: HookDescriptor) -> Result<&mut Self, Error> {
        self.hook(
            HookKind::Pre,
            &descriptor.name,
            descriptor.handle,
            descriptor.scope,
        )
    }

    /// Descriptor form of [`post`](Self::post).
    pub fn post_with(&mut self, descriptor: HookDescriptor) -> Result<&mut Self, Error> {
        self.hook(
            HookKind::Post,
            &descriptor.name,
            descriptor.handle,
            descriptor.scope,
        )
    }

    fn hook(
        &mut self,
        kind: HookKind,
        name: &str,
        handler: Method,
        scope: Option<Scope>,
    ) -> Result<&mut Self, Error> {
        let candidates: &[Scope] = match scope {
            Some(Scope::Instance) => &[Scope::Instance],
            Some(Scope::Class) => &[Scope::Class],
            None => &[Scope::Instance, Scope::Class],
        };

        let mut block = HookBlock::default();
        for candidate in candidates {
            let resolves = match candidate {
                Scope::Instance => self.base.instance_member(name).is_some(),
                Scope::Class => self.base.static_member(name).is_some(),
            };
            if !resolves {
                continue;
            }
            let hooks = match candidate {
                Scope::Instance => &mut block.instance_members,
                Scope::Class => &mut block.class_members,
            };
            hooks
                .entry(name.to_string())
                .or_default()
                .push(handler.clone());
        }

        if block.is_empty() {
            let scope_text = match scope {
                Some(scope) => scope.to_string(),
                None => "instance or class".to_string(),
            };
            return Err(Error::invalid_input(format!(
                "{kind}: no such {scope_text} method `{name}`"
            )));
        }

        tracing::debug!(kind = %kind, method = %name, "staging interception hook");
        let feature = match kind {
            HookKind::Pre => Feature {
                pre: block,
                ..Feature::default()
            },
            HookKind::Post => Feature {
                post: block,
                ..Feature::default()
            },
        };
        self.use_features(feature)
    }

    /// Finalize: drain the stack and, when anything beyond the base was
    /// staged, merge it into a new synthesized type. With nothing staged the
    /// base type comes back unchanged.
    pub fn get_composed(&mut self) -> Result<ComposedType, Error> {
        let staged = mem::take(&mut self.staged);
        if staged.len() > 1 {
            merge(staged)
        } else {
            Ok(self.base.clone())
        }
    }

    /// Alias for [`get_composed`](Self::get_composed).
    pub fn get_extended(&mut self) -> Result<ComposedType, Error> {
        self.get_composed()
    }
}

impl fmt::Debug for Composer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composer")
            .field("base", &self.base)
            .field("staged", &self.staged.len())
            .finish()
    }
}

impl ComposedType {
    /// Begin staging features against this type.
    pub fn composer(&self) -> Composer {
        Composer::new(self.clone())
    }

    /// Begin staging and immediately stage `features`.
    pub fn use_features(&self, features: impl Into<FeatureInput>) -> Result<Composer, Error> {
        let mut composer = self.composer();
        composer.use_features(features)?;
        Ok(composer)
    }
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod builder_test;
