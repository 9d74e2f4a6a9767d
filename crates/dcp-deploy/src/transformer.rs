use std::fmt;

use dcp_types::{fields, ModelNode};

/// A deferred rewrite applied when an operation is forwarded to a
/// subordinate node.
///
/// The trait is object-safe and `Send + Sync` so transformers can be queued
/// as `Box<dyn OperationTransformer>`.
pub trait OperationTransformer: Send + Sync {
    /// Produce the operation to forward in place of `operation`.
    fn transform(&self, operation: &ModelNode) -> ModelNode;
}

/// Substitutes a rewritten operation for the operation it was derived from.
///
/// A candidate matches when its operation name and address equal those of
/// the rewritten operation. Composite candidates are descended into and
/// only the matching steps are replaced, so several queued transformers
/// each rewrite their own step of the same composite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeOperationAwareTransformer {
    new_operation: ModelNode,
}

impl CompositeOperationAwareTransformer {
    pub fn new(new_operation: ModelNode) -> Self {
        Self { new_operation }
    }

    fn matches(&self, candidate: &ModelNode) -> bool {
        let expected = &self.new_operation;
        candidate.get_defined(fields::OP) == expected.get_defined(fields::OP)
            && candidate.get_defined(fields::OP_ADDR) == expected.get_defined(fields::OP_ADDR)
    }
}

impl OperationTransformer for CompositeOperationAwareTransformer {
    fn transform(&self, operation: &ModelNode) -> ModelNode {
        if is_composite(operation) {
            let mut transformed = operation.clone();
            if let Some(steps) = transformed
                .get_mut(fields::STEPS)
                .and_then(ModelNode::as_list_mut)
            {
                for step in steps.iter_mut() {
                    *step = self.transform(step);
                }
            }
            transformed
        } else if self.matches(operation) {
            self.new_operation.clone()
        } else {
            operation.clone()
        }
    }
}

fn is_composite(operation: &ModelNode) -> bool {
    operation.get_defined(fields::OP).and_then(ModelNode::as_str) == Some(fields::COMPOSITE)
}

/// Ordered queue of deferred transformations for one unit of work.
///
/// Insertion order is preserved; replay applies transformers in that order.
#[derive(Default)]
pub struct TransformerQueue {
    transformers: Vec<Box<dyn OperationTransformer>>,
}

impl TransformerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transformer to the end of the queue.
    pub fn push(&mut self, transformer: impl OperationTransformer + 'static) {
        self.transformers.push(Box::new(transformer));
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn OperationTransformer> {
        self.transformers.iter().map(|t| t.as_ref())
    }

    /// Fold every queued transformer over `operation`, in insertion order.
    pub fn apply(&self, operation: &ModelNode) -> ModelNode {
        self.iter()
            .fold(operation.clone(), |current, transformer| {
                transformer.transform(&current)
            })
    }
}

impl fmt::Debug for TransformerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerQueue")
            .field("len", &self.transformers.len())
            .finish()
    }
}
