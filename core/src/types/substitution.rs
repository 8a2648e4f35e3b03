use ecow::EcoString;
use hashbrown::HashMap;

use super::StaticType;

/// Default cap on [`Substitution::resolve`] passes.
pub const MAX_SUBSTITUTION_PASSES: usize = 32;

/// Mapping from type-variable names to the types they were solved to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: HashMap<EcoString, StaticType>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, variable: impl Into<EcoString>, ty: StaticType) {
        self.bindings.insert(variable.into(), ty);
    }

    pub fn get(&self, variable: &str) -> Option<&StaticType> {
        self.bindings.get(variable)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Rewrites every bound variable in `ty` once.
    ///
    /// The replacement itself is not rewritten again, so chains like
    /// `?0 -> ?1 -> Number` need [`Substitution::resolve`].
    pub fn apply(&self, ty: &StaticType) -> StaticType {
        ty.rebuild(&mut |ty: &StaticType| match ty {
            StaticType::Variable(name) => self.bindings.get(name).cloned(),
            _ => None,
        })
    }

    /// Applies the substitution until the type stops changing.
    pub fn resolve(&self, ty: &StaticType) -> StaticType {
        self.resolve_with_limit(ty, MAX_SUBSTITUTION_PASSES)
    }

    /// Like [`Substitution::resolve`] with an explicit pass cap.
    ///
    /// The cap only matters for cyclic bindings, which the unifier's occurs
    /// check never produces.
    pub fn resolve_with_limit(&self, ty: &StaticType, max_passes: usize) -> StaticType {
        let mut current = ty.clone();
        for _ in 0..max_passes {
            let next = self.apply(&current);
            if next == current {
                return next;
            }
            current = next;
        }
        tracing::debug!(%ty, max_passes, "substitution did not reach a fixed point");
        current
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EcoString, &StaticType)> {
        self.bindings.iter()
    }
}

/// Resolves `ty` to a fixed point under `substitution`.
pub fn substitute(substitution: &Substitution, ty: &StaticType) -> StaticType {
    substitution.resolve(ty)
}
