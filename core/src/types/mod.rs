//! Static types and Hindley-Milner style inference.
//!
//! Inference runs in two steps. [`make_unification_context`] walks the
//! program and emits [`Constraint`]s; [`unify`] (or a [`Unifier`]) solves them
//! into a [`Substitution`] that maps every type variable to what it stands for.

mod checker;
mod constraint;
mod static_type;
mod substitution;
mod unification;

pub use checker::{UnificationContext, make_unification_context};
pub use constraint::Constraint;
pub use static_type::{
    ARRAY, BOOLEAN, COLOR, FunctionArgument, NUMBER, STRING, StaticType, TypeVariableGenerator,
    UNIT,
};
pub use substitution::{MAX_SUBSTITUTION_PASSES, Substitution, substitute};
pub use unification::{UnificationError, Unifier, unify};
