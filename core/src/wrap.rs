//! Hook weaving: wrap one operation with its accumulated pre/post chain.

use std::rc::Rc;
use std::slice;

use smallvec::SmallVec;

use crate::values::{
    Value,
    method::{Method, Receiver},
};

/// Wrap `original` with ordered pre and post handler chains.
///
/// With both chains empty the operation comes back untouched, so unhooked
/// members keep reference identity (`Rc::ptr_eq`). Otherwise the returned
/// operation runs `pre..., original, post...` in order, threading a single
/// value: the first step receives the caller's full argument list, every
/// later step receives a one-element list holding the previous step's return
/// value. Hooks are unary transformers — extra arguments a handler might
/// want to forward do not survive the first step.
///
/// The scope every step runs against is `fixed_scope` when one was captured
/// at wrap time, otherwise the receiver of the call — late-bound, so a
/// class-level chain installed on a derived type sees whichever concrete
/// type performs the call.
pub fn wrap(
    original: Method,
    pre: &[Method],
    post: &[Method],
    fixed_scope: Option<Receiver>,
) -> Method {
    if pre.is_empty() && post.is_empty() {
        return original;
    }

    let mut steps: SmallVec<[Method; 4]> = SmallVec::with_capacity(pre.len() + post.len() + 1);
    steps.extend(pre.iter().cloned());
    steps.push(original);
    steps.extend(post.iter().cloned());

    Rc::new(move |receiver: &Receiver, args: &[Value]| {
        let scope = fixed_scope.as_ref().unwrap_or(receiver);
        // `steps` always holds at least the original.
        let mut value = (steps[0])(scope, args)?;
        for step in &steps[1..] {
            value = step(scope, slice::from_ref(&value))?;
        }
        Ok(value)
    })
}

#[cfg(test)]
#[path = "wrap_test.rs"]
mod wrap_test;
