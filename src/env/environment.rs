//! The immutable lexical environment (C1).
//!
//! A persistent singly-linked chain of frames, each contributing one
//! binding and sharing its parent via `Rc`. `bind` never mutates an
//! existing environment — it returns a new one whose tail is shared with
//! the receiver, mirroring the `Rc`-wrapped copy-on-write scope chains
//! used elsewhere in the corpus (e.g. a type-checker's persistent scope)
//! rather than a balanced/mutable map.

use std::collections::HashSet;
use std::rc::Rc;

use super::binding::{Binding, BindingKind};
use crate::core::{Id, OverloadId};

struct Frame {
    binding: Binding,
    parent: Environment,
}

/// A persistent, reference-counted environment. Cloning is O(1).
#[derive(Clone)]
pub struct Environment(Option<Rc<Frame>>);

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = Vec::new();
        self.visit(|b| names.push(b.id.name.clone()));
        f.debug_tuple("Environment").field(&names).finish()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::empty()
    }
}

impl Environment {
    pub fn empty() -> Self {
        Environment(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Number of frames from here to the root.
    pub fn depth(&self) -> usize {
        let mut n = 0;
        let mut node = &self.0;
        while let Some(frame) = node {
            n += 1;
            node = &frame.parent.0;
        }
        n
    }

    /// The binding at the top of this environment, if any.
    pub fn top_binding(&self) -> Option<&Binding> {
        self.0.as_ref().map(|frame| &frame.binding)
    }

    /// The environment with the top frame removed.
    pub fn parent(&self) -> Environment {
        match &self.0 {
            None => Environment::empty(),
            Some(frame) => frame.parent.clone(),
        }
    }

    /// Layer one binding on top.
    #[must_use]
    pub fn bind(&self, binding: Binding) -> Environment {
        Environment(Some(Rc::new(Frame { binding, parent: self.clone() })))
    }

    /// Layer a sequence of bindings on top, most-recent-last becoming the
    /// new top. Returns the receiver unchanged (no new frames allocated)
    /// if the top `bindings.len()` frames already hold exactly these
    /// bindings in this order — the identity optimization of spec.md §4.1.
    #[must_use]
    pub fn bind_all<I: IntoIterator<Item = Binding>>(&self, bindings: I) -> Environment {
        let bindings: Vec<Binding> = bindings.into_iter().collect();
        if !bindings.is_empty() && self.already_has_top(&bindings) {
            return self.clone();
        }
        let mut env = self.clone();
        for binding in bindings {
            env = env.bind(binding);
        }
        env
    }

    fn already_has_top(&self, bindings: &[Binding]) -> bool {
        let mut cur = self.clone();
        for binding in bindings.iter().rev() {
            match cur.top_binding() {
                Some(top) if top.id == binding.id && top.value == binding.value => {
                    cur = cur.parent();
                }
                _ => return false,
            }
        }
        true
    }

    /// Most recent unshadowed binding matching `name` (by own id name, or
    /// by overload group name).
    pub fn get_opt(&self, name: &str) -> Option<&Binding> {
        let mut node = &self.0;
        while let Some(frame) = node {
            if frame.binding.matches_name(name) {
                return Some(&frame.binding);
            }
            node = &frame.parent.0;
        }
        None
    }

    /// Exact identifier (name + ordinal) match.
    pub fn get_opt_id(&self, id: &Id) -> Option<&Binding> {
        let mut node = &self.0;
        while let Some(frame) = node {
            if frame.binding.id == *id {
                return Some(&frame.binding);
            }
            node = &frame.parent.0;
        }
        None
    }

    /// First frame whose *own* top binding matches `name`; unlike
    /// [`Environment::get_opt`] this never resolves via an overload
    /// group's name, only the binding's own identifier.
    pub fn get_top(&self, name: &str) -> Option<&Binding> {
        let mut node = &self.0;
        while let Some(frame) = node {
            if frame.binding.id.name == name {
                return Some(&frame.binding);
            }
            node = &frame.parent.0;
        }
        None
    }

    /// Call `consumer` for every binding whose name matches `id.name`
    /// (see `DESIGN.md` for why this matches by name rather than strict
    /// id equality), most-recent-first. Used to enumerate the instances
    /// of an overloaded name.
    pub fn collect(&self, id: &Id, mut consumer: impl FnMut(&Binding)) {
        let mut node = &self.0;
        while let Some(frame) = node {
            if frame.binding.matches_name(&id.name) {
                consumer(&frame.binding);
            }
            node = &frame.parent.0;
        }
    }

    /// Visit every binding, most-recent-first, including shadowed ones.
    pub fn visit(&self, mut consumer: impl FnMut(&Binding)) {
        let mut node = &self.0;
        while let Some(frame) = node {
            consumer(&frame.binding);
            node = &frame.parent.0;
        }
    }

    /// Visit only bindings with a non-`Unit` value, deduplicated by name
    /// (the unshadowed occurrence wins).
    pub fn for_each_value(&self, mut consumer: impl FnMut(&Binding)) {
        let mut seen = HashSet::new();
        self.visit(|b| {
            if matches!(&b.value, Some(v) if !v.is_unit()) && seen.insert(b.id.name.clone()) {
                consumer(b);
            }
        });
    }

    /// Visit every binding for type purposes, injecting one synthetic
    /// `OVER` entry immediately before the first `INST` binding of each
    /// overload group encountered (see `DESIGN.md` decision 6).
    pub fn for_each_type(&self, mut consumer: impl FnMut(&Binding)) {
        let mut seen_groups: HashSet<u32> = HashSet::new();
        self.visit(|b| {
            if let BindingKind::Inst(ov) = &b.kind {
                if seen_groups.insert(ov.group) {
                    let synthetic = Binding {
                        id: Id::new(ov.name.clone(), 0),
                        kind: BindingKind::Inst(OverloadId { name: ov.name.clone(), group: ov.group }),
                        value: None,
                        ty: None,
                    };
                    consumer(&synthetic);
                }
            }
            consumer(b);
        });
    }

    /// Extend `self` with `other`'s bindings, reinserted so that
    /// `other`'s own top ends up on top of the result.
    #[must_use]
    pub fn plus(&self, other: &Environment) -> Environment {
        let mut others = Vec::new();
        other.visit(|b| others.push(b.clone()));
        others.reverse(); // oldest-of-`other`-first
        let mut env = self.clone();
        for binding in others {
            env = env.bind(binding);
        }
        env
    }

    /// Number of frames between the top and the nearest binding matching
    /// `id`'s name, or `depth() + 1` if unbound (the spec's "sentinel
    /// beyond the chain length").
    pub fn distance(&self, id: &Id) -> usize {
        let mut node = &self.0;
        let mut n = 0;
        while let Some(frame) = node {
            if frame.binding.matches_name(&id.name) {
                return n;
            }
            n += 1;
            node = &frame.parent.0;
        }
        self.depth() + 1
    }

    /// The deepest prefix of this environment whose top binding's name is
    /// not in `obscured`; the empty environment returns itself.
    #[must_use]
    pub fn nearest_ancestor_not_obscured_by(&self, obscured: &HashSet<String>) -> Environment {
        let mut cur = self.clone();
        loop {
            match cur.top_binding() {
                None => return cur,
                Some(b) if !obscured.contains(&b.id.name) => return cur,
                Some(_) => cur = cur.parent(),
            }
        }
    }

    /// Rebuild this environment with every binding's ordinal reset to 0.
    ///
    /// Per spec.md §9 (OQ3), this is a deliberately crude, linear rebuild:
    /// no attempt is made to anticipate how the real extent-inference
    /// machinery's `renumber` might evolve.
    #[must_use]
    pub fn renumber(&self) -> Environment {
        let mut bindings = Vec::new();
        self.visit(|b| bindings.push(b.clone()));
        bindings.reverse(); // oldest-first, so folding restores original top
        let mut env = Environment::empty();
        for mut b in bindings {
            b.id.ordinal = 0;
            env = env.bind(b);
        }
        env
    }
}

#[cfg(test)]
#[path = "environment_tests.rs"]
mod tests;
