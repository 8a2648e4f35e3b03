//! Function calls and statement execution.

use std::rc::Rc;

use ecow::EcoString;
use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace};

use super::{EvaluationContext, EvaluationError, Thunk};
use crate::syntax::{Node, NodeId, NodeKind, ParameterSlot, align};
use crate::types::StaticType;
use crate::values::{CallArguments, Function, FunctionMemory, Memory, Value};

/// Tables shared by every closure of one program.
#[derive(Debug, Default)]
pub(super) struct ExecutionPlan {
    /// Every node below a function or loop, which must be recomputed for
    /// each call or iteration.
    pub subtrees: HashMap<NodeId, Vec<NodeId>>,
    /// Declaration each assignment writes to.
    pub assignment_targets: HashMap<NodeId, NodeId>,
    /// Declarations referenced by each variable's initializer.
    pub reads: HashMap<NodeId, Vec<NodeId>>,
}

impl ExecutionPlan {
    fn subtree(&self, id: NodeId) -> &[NodeId] {
        self.subtrees.get(&id).map_or(&[], Vec::as_slice)
    }

    fn reads(&self, id: NodeId) -> &[NodeId] {
        self.reads.get(&id).map_or(&[], Vec::as_slice)
    }
}

/// Local declarations that were executed but whose initializers have not
/// run yet, in statement order.
type Pending = Vec<NodeId>;

/// Outcome of executing a statement.
enum Flow<'a> {
    Next,
    Return(Value<'a>),
}

/// A user-defined function together with the context it was defined in.
pub(super) struct Closure<'a> {
    pub name: EcoString,
    pub node: &'a Node<'a>,
    /// Parameter declarations in order, with their default value.
    pub parameters: Vec<(&'a Node<'a>, Option<Value<'a>>)>,
    pub body: &'a [&'a Node<'a>],
    pub base: EvaluationContext<'a>,
    pub plan: Rc<ExecutionPlan>,
}

impl<'a> Function<'a> for Closure<'a> {
    fn call(&self, arguments: CallArguments<'a>) -> Result<Value<'a>, EvaluationError> {
        let slots: Vec<ParameterSlot<'_>> = self
            .parameters
            .iter()
            .map(|(parameter, default)| ParameterSlot {
                name: parameter.declared_name().unwrap_or_default(),
                has_default: default.is_some(),
            })
            .collect();
        let aligned = align(&slots, arguments)?;

        let frame = self.base.copy();
        frame.forget(self.plan.subtree(self.node.id));
        for ((parameter, default), argument) in self.parameters.iter().zip(aligned) {
            let name = parameter.declared_name().unwrap_or_default();
            let value = argument
                .flatten()
                .or_else(|| default.clone())
                .ok_or_else(|| EvaluationError::MissingArgument(name.into()))?;
            frame.add_value(parameter.id, value);
        }

        debug!(function = %self.name, "call");
        let mut pending = Pending::new();
        match execute_block(&frame, self.body, &self.plan, &mut pending)? {
            Flow::Return(value) => Ok(value),
            Flow::Next => Ok(Value::unit()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn execute_block<'a>(
    frame: &EvaluationContext<'a>,
    statements: &[&'a Node<'a>],
    plan: &ExecutionPlan,
    pending: &mut Pending,
) -> Result<Flow<'a>, EvaluationError> {
    for statement in statements {
        if let Flow::Return(value) = execute_statement(frame, statement, plan, pending)? {
            return Ok(Flow::Return(value));
        }
    }
    Ok(Flow::Next)
}

/// Runs the pending initializers that read one of `targets`, directly or
/// through another pending local, so they keep the values visible where
/// they were declared.
///
/// A failing initializer is not reported here. Its error is stored and
/// surfaces only if the local is read.
fn settle<'a>(
    frame: &EvaluationContext<'a>,
    plan: &ExecutionPlan,
    pending: &mut Pending,
    targets: impl IntoIterator<Item = NodeId>,
) {
    let mut affected: HashSet<NodeId> = targets.into_iter().collect();
    if affected.is_empty() {
        return;
    }
    pending.retain(|&local| {
        if !plan.reads(local).iter().any(|read| affected.contains(read)) {
            return true;
        }
        affected.insert(local);
        trace!(node = %local, "snapshot before assignment");
        if let Err(error) = frame.try_evaluate(local) {
            let failed = Thunk::new(Vec::new(), move |_, _| Err(error.clone()));
            frame.add_thunk(local, failed);
        }
        false
    });
}

fn execute_statement<'a>(
    frame: &EvaluationContext<'a>,
    statement: &'a Node<'a>,
    plan: &ExecutionPlan,
    pending: &mut Pending,
) -> Result<Flow<'a>, EvaluationError> {
    match statement.kind {
        NodeKind::Branch { condition, block } => {
            if frame.try_evaluate_bool(condition.id)? {
                return execute_block(frame, block, plan, pending);
            }
        }
        NodeKind::Loop { condition, block } => {
            let subtree = plan.subtree(statement.id);
            let targets = subtree
                .iter()
                .filter_map(|id| plan.assignment_targets.get(id).copied());
            settle(frame, plan, pending, targets);
            let mut iterations = 0;
            loop {
                let iteration = frame.copy();
                iteration.forget(subtree);
                if !iteration.try_evaluate_bool(condition.id)? {
                    break;
                }
                if let Some(limit) = frame.options().max_iterations {
                    if iterations >= limit {
                        return Err(EvaluationError::IterationLimit { limit });
                    }
                }
                iterations += 1;
                let mut body_pending = Pending::new();
                if let Flow::Return(value) =
                    execute_block(&iteration, block, plan, &mut body_pending)?
                {
                    return Ok(Flow::Return(value));
                }
                frame.adopt_rebindings(&iteration);
            }
        }
        NodeKind::Return { expression } => {
            let value = match expression {
                Some(expression) => frame.try_evaluate(expression.id)?,
                None => Value::unit(),
            };
            return Ok(Flow::Return(value));
        }
        NodeKind::ExpressionStatement { expression } => match expression.kind {
            NodeKind::Assignment { value, .. } => {
                let target = plan
                    .assignment_targets
                    .get(&expression.id)
                    .copied()
                    .ok_or(EvaluationError::UnboundAssignment(expression.id))?;
                settle(frame, plan, pending, [target]);
                let value = frame.try_evaluate(value.id)?;
                frame.rebind(target, value);
            }
            _ => {
                frame.try_evaluate(expression.id)?;
            }
        },
        // Initializers run when the local is first read.
        NodeKind::Variable {
            initializer: Some(_),
            ..
        } => pending.push(statement.id),
        _ => {}
    }
    Ok(Flow::Next)
}

/// Dispatch a call on the callee's memory.
///
/// `result_type` is the inferred type of the call, given to constructed
/// records and enumeration values.
pub(super) fn call_value<'a>(
    context: &EvaluationContext<'a>,
    call: NodeId,
    callee: &Value<'a>,
    arguments: CallArguments<'a>,
    result_type: &StaticType,
) -> Result<Value<'a>, EvaluationError> {
    let Memory::Function(function) = &callee.memory else {
        let error = EvaluationError::NotCallable(callee.to_string());
        context.reporter().error(&format!("{call}: {error}"));
        return Ok(Value::unit());
    };

    match function {
        FunctionMemory::Builtin { implementation, .. } => {
            let values: Vec<Value<'a>> = arguments
                .into_iter()
                .filter_map(|(_, value)| value)
                .collect();
            implementation(&values)
        }
        FunctionMemory::Closure(closure) => closure.call(arguments),
        FunctionMemory::RecordInit { fields, .. } => {
            let slots: Vec<ParameterSlot<'_>> = fields
                .iter()
                .map(|(name, default)| ParameterSlot {
                    name: name.as_str(),
                    has_default: default.is_some(),
                })
                .collect();
            let aligned = align(&slots, arguments)?;
            let values = fields
                .iter()
                .zip(aligned)
                .map(|((name, default), argument)| {
                    argument
                        .flatten()
                        .or_else(|| default.clone())
                        .map(|value| (name.clone(), value))
                        .ok_or_else(|| EvaluationError::MissingArgument(name.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::record(result_type.clone(), values))
        }
        FunctionMemory::EnumInit { case } => Ok(Value::enumeration(
            result_type.clone(),
            case.clone(),
            arguments.into_iter().filter_map(|(_, value)| value),
        )),
    }
}
