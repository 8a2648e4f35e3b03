//! Memoizing thunk graph.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use hashbrown::HashSet;
use tracing::trace;

use super::EvaluationError;
use crate::api::ExecutionOptions;
use crate::diagnostics::Reporter;
use crate::syntax::NodeId;
use crate::values::Value;

/// Computes a node's value from the values of its dependencies, given in the
/// order they were declared.
pub type Materializer<'a> =
    Rc<dyn Fn(&EvaluationContext<'a>, &[Value<'a>]) -> Result<Value<'a>, EvaluationError> + 'a>;

/// Deferred computation of a node's value.
#[derive(Clone)]
pub struct Thunk<'a> {
    pub dependencies: Vec<NodeId>,
    pub materialize: Materializer<'a>,
}

impl<'a> Thunk<'a> {
    pub fn new<F>(dependencies: Vec<NodeId>, materialize: F) -> Self
    where
        F: Fn(&EvaluationContext<'a>, &[Value<'a>]) -> Result<Value<'a>, EvaluationError> + 'a,
    {
        Self {
            dependencies,
            materialize: Rc::new(materialize),
        }
    }
}

/// Values and thunks keyed by node id.
///
/// Each thunk runs at most once per context. Copies share nothing mutable
/// except the depth counter: both maps are persistent, so [`copy`] is cheap
/// and writes to a copy never show through to the original.
///
/// [`copy`]: EvaluationContext::copy
pub struct EvaluationContext<'a> {
    values: RefCell<im::HashMap<NodeId, Value<'a>>>,
    thunks: RefCell<im::HashMap<NodeId, Thunk<'a>>>,
    in_progress: RefCell<HashSet<NodeId>>,
    rebound: RefCell<HashSet<NodeId>>,
    depth: Rc<Cell<usize>>,
    options: Rc<ExecutionOptions>,
    reporter: &'a dyn Reporter,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(reporter: &'a dyn Reporter, options: ExecutionOptions) -> Self {
        Self {
            values: RefCell::default(),
            thunks: RefCell::default(),
            in_progress: RefCell::default(),
            rebound: RefCell::default(),
            depth: Rc::default(),
            options: Rc::new(options),
            reporter,
        }
    }

    /// Snapshot of this context with an empty in-progress set and no
    /// rebindings.
    pub fn copy(&self) -> Self {
        Self {
            values: RefCell::new(self.values.borrow().clone()),
            thunks: RefCell::new(self.thunks.borrow().clone()),
            in_progress: RefCell::default(),
            rebound: RefCell::default(),
            depth: Rc::clone(&self.depth),
            options: Rc::clone(&self.options),
            reporter: self.reporter,
        }
    }

    pub fn reporter(&self) -> &'a dyn Reporter {
        self.reporter
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.options
    }

    pub fn add_value(&self, id: NodeId, value: Value<'a>) {
        self.values.borrow_mut().insert(id, value);
    }

    pub fn add_thunk(&self, id: NodeId, thunk: Thunk<'a>) {
        self.thunks.borrow_mut().insert(id, thunk);
    }

    /// Memoized value of `id`, without materializing anything.
    pub fn value(&self, id: NodeId) -> Option<Value<'a>> {
        self.values.borrow().get(&id).cloned()
    }

    /// Value of `id`, materializing it if needed. Failures are reported once
    /// and yield `None`.
    pub fn evaluate(&self, id: NodeId) -> Option<Value<'a>> {
        match self.try_evaluate(id) {
            Ok(value) => Some(value),
            Err(error) => {
                self.reporter.error(&format!("{id}: {error}"));
                None
            }
        }
    }

    pub fn try_evaluate(&self, id: NodeId) -> Result<Value<'a>, EvaluationError> {
        if let Some(value) = self.value(id) {
            return Ok(value);
        }
        let thunk = self
            .thunks
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(EvaluationError::MissingValue(id))?;

        if !self.in_progress.borrow_mut().insert(id) {
            return Err(EvaluationError::Cycle(id));
        }
        let depth = self.depth.get() + 1;
        let max_depth = self.options.max_depth;
        if depth > max_depth {
            self.in_progress.borrow_mut().remove(&id);
            return Err(EvaluationError::DepthExceeded { depth, max_depth });
        }

        self.depth.set(depth);
        let result = self.materialize(&thunk);
        self.depth.set(depth - 1);
        self.in_progress.borrow_mut().remove(&id);

        let value = result?;
        trace!(node = %id, value = %value, "materialized");
        self.values.borrow_mut().insert(id, value.clone());
        Ok(value)
    }

    fn materialize(&self, thunk: &Thunk<'a>) -> Result<Value<'a>, EvaluationError> {
        let dependencies = thunk
            .dependencies
            .iter()
            .map(|&dependency| self.try_evaluate(dependency))
            .collect::<Result<Vec<_>, _>>()?;
        (thunk.materialize)(self, &dependencies)
    }

    pub fn try_evaluate_bool(&self, id: NodeId) -> Result<bool, EvaluationError> {
        let value = self.try_evaluate(id)?;
        value
            .as_bool()
            .ok_or_else(|| EvaluationError::NotABoolean(value.to_string()))
    }

    /// Replace the value of a declaration, remembering the rebinding so an
    /// enclosing frame can adopt it.
    pub fn rebind(&self, id: NodeId, value: Value<'a>) {
        self.values.borrow_mut().insert(id, value);
        self.rebound.borrow_mut().insert(id);
    }

    /// Carry over every rebinding made in `other`.
    pub fn adopt_rebindings(&self, other: &EvaluationContext<'a>) {
        for &id in other.rebound.borrow().iter() {
            if let Some(value) = other.value(id) {
                self.rebind(id, value);
            }
        }
    }

    /// Drop memoized values of the given nodes so their thunks run again.
    ///
    /// Values without a thunk (literals, constructors, bound parameters)
    /// cannot be recomputed and are kept.
    pub fn forget<'i>(&self, ids: impl IntoIterator<Item = &'i NodeId>) {
        let thunks = self.thunks.borrow();
        let mut values = self.values.borrow_mut();
        for id in ids {
            if thunks.contains_key(id) {
                values.remove(id);
            }
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;
