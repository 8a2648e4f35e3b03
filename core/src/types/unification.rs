use std::collections::VecDeque;

use thiserror::Error;

use crate::diagnostics::Reporter;
use crate::syntax::NodeId;

use super::{Constraint, StaticType, Substitution};

/// Why a constraint could not be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnificationError {
    #[error("type mismatch: expected {expected}, found {found}")]
    Mismatch {
        expected: StaticType,
        found: StaticType,
    },

    #[error("`{name}` takes {expected} type arguments, found {found}")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("function takes {expected} arguments, found {found}")]
    ParameterCountMismatch { expected: usize, found: usize },

    #[error("{variable} occurs in {ty}, which would make an infinite type")]
    OccursCheck { variable: String, ty: StaticType },
}

/// Worklist solver for type constraints.
///
/// Performs Hindley-Milner style unification: variables bind to whatever
/// they are equated with (after an occurs check), constants unify with
/// constants of the same name and arity, functions unify argument-wise.
/// A failed constraint is reported and dropped; solving goes on with the
/// rest.
pub struct Unifier<'r> {
    substitution: Substitution,
    reporter: &'r dyn Reporter,
    errors: Vec<(NodeId, UnificationError)>,
}

impl<'r> Unifier<'r> {
    pub fn new(reporter: &'r dyn Reporter) -> Self {
        Self {
            substitution: Substitution::new(),
            reporter,
            errors: Vec::new(),
        }
    }

    /// Failures so far, in the order they were found.
    pub fn errors(&self) -> &[(NodeId, UnificationError)] {
        &self.errors
    }

    /// Follows variable bindings at the top of `ty`.
    fn shallow(&self, ty: &StaticType) -> StaticType {
        let mut current = ty;
        while let StaticType::Variable(name) = current {
            match self.substitution.get(name) {
                Some(bound) => current = bound,
                None => break,
            }
        }
        current.clone()
    }

    /// Resolves every variable inside `ty`, however deep the chains are.
    fn zonk(&self, ty: &StaticType) -> StaticType {
        ty.rebuild(&mut |ty: &StaticType| match ty {
            StaticType::Variable(name) => self.substitution.get(name).map(|bound| self.zonk(bound)),
            _ => None,
        })
    }

    pub fn solve<I>(&mut self, constraints: I)
    where
        I: IntoIterator<Item = Constraint>,
    {
        for constraint in constraints {
            if let Err(error) = self.unify_one(&constraint) {
                self.reporter
                    .error(&format!("{}: {error}", constraint.origin));
                self.errors.push((constraint.origin, error));
            }
        }
    }

    fn unify_one(&mut self, constraint: &Constraint) -> Result<(), UnificationError> {
        let mut worklist = VecDeque::from([(constraint.head.clone(), constraint.tail.clone())]);

        while let Some((head, tail)) = worklist.pop_front() {
            let head = self.shallow(&head);
            let tail = self.shallow(&tail);
            if head == tail {
                continue;
            }

            match (head, tail) {
                (StaticType::Variable(name), other) | (other, StaticType::Variable(name)) => {
                    let other = self.zonk(&other);
                    if other.occurs(&name) {
                        return Err(UnificationError::OccursCheck {
                            variable: name.to_string(),
                            ty: other,
                        });
                    }
                    tracing::trace!(variable = %name, ty = %other, "bind");
                    self.substitution.bind(name, other);
                }
                (
                    StaticType::Constant {
                        name: head_name,
                        parameters: head_parameters,
                    },
                    StaticType::Constant {
                        name: tail_name,
                        parameters: tail_parameters,
                    },
                ) if head_name == tail_name => {
                    if head_parameters.len() != tail_parameters.len() {
                        return Err(UnificationError::ArityMismatch {
                            name: head_name.to_string(),
                            expected: head_parameters.len(),
                            found: tail_parameters.len(),
                        });
                    }
                    worklist.extend(head_parameters.into_iter().zip(tail_parameters));
                }
                (
                    StaticType::Function {
                        arguments: head_arguments,
                        return_type: head_return,
                    },
                    StaticType::Function {
                        arguments: tail_arguments,
                        return_type: tail_return,
                    },
                ) => {
                    if head_arguments.len() != tail_arguments.len() {
                        return Err(UnificationError::ParameterCountMismatch {
                            expected: head_arguments.len(),
                            found: tail_arguments.len(),
                        });
                    }
                    worklist.push_back((*head_return, *tail_return));
                    worklist.extend(
                        head_arguments
                            .into_iter()
                            .zip(tail_arguments)
                            .map(|(head, tail)| (head.ty, tail.ty)),
                    );
                }
                (head, tail) => {
                    return Err(UnificationError::Mismatch {
                        expected: self.zonk(&head),
                        found: self.zonk(&tail),
                    });
                }
            }
        }
        Ok(())
    }

    /// The solved substitution, with every binding fully resolved.
    ///
    /// Because bindings are normalized, one [`Substitution::apply`] pass
    /// already reaches the fixed point.
    pub fn finish(self) -> Substitution {
        let mut normalized = Substitution::new();
        for (name, ty) in self.substitution.iter() {
            normalized.bind(name.clone(), self.zonk(ty));
        }
        normalized
    }
}

/// Solves `constraints` in order and returns the resulting substitution.
pub fn unify<I>(constraints: I, reporter: &dyn Reporter) -> Substitution
where
    I: IntoIterator<Item = Constraint>,
{
    let mut unifier = Unifier::new(reporter);
    unifier.solve(constraints);
    tracing::debug!(
        bindings = unifier.substitution.len(),
        errors = unifier.errors.len(),
        "unification finished"
    );
    unifier.finish()
}

#[cfg(test)]
#[path = "unification_test.rs"]
mod unification_test;
