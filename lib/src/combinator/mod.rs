//! Loop combinator signature resolution
//!
//! A loop is assembled from clauses, one per loop-local state variable, each
//! contributing up to four fragments: an initializer, a step, a predicate,
//! and a finalizer. Nothing declares the loop's external argument list — it
//! is inferred as the trailing parameter run shared by every step, predicate,
//! and finalizer fragment. Resolution either produces the composite
//! [`LoopSignature`] or fails closed with the first structural violation, in
//! a fixed rule order.
//!
//! Compatibility between fragment signatures is structural: arity plus
//! per-position [`ValueKind`](crate::ValueKind) agreement. The exact
//! reference class never decides compatibility, only how a mismatch is
//! reported.

mod loops;

pub use loops::*;

use crate::descriptors::{FieldType, MethodType};

/// One loop-local state variable's lifecycle fragments
///
/// Any fragment may be absent; a clause with all four absent is rejected at
/// resolution time.
#[derive(Clone, Debug, Default)]
pub struct Clause {
    pub init: Option<MethodType>,
    pub step: Option<MethodType>,
    pub predicate: Option<MethodType>,
    pub finalizer: Option<MethodType>,
}

impl Clause {
    pub fn new() -> Clause {
        Clause::default()
    }

    pub fn init(mut self, fragment: MethodType) -> Clause {
        self.init = Some(fragment);
        self
    }

    pub fn step(mut self, fragment: MethodType) -> Clause {
        self.step = Some(fragment);
        self
    }

    pub fn predicate(mut self, fragment: MethodType) -> Clause {
        self.predicate = Some(fragment);
        self
    }

    pub fn finalizer(mut self, fragment: MethodType) -> Clause {
        self.finalizer = Some(fragment);
        self
    }

    /// The state this clause carries: the step's return type, else the
    /// init's (`None` for a stateless clause)
    pub(crate) fn state_type(&self) -> Option<&FieldType> {
        self.step
            .as_ref()
            .and_then(|fragment| fragment.return_type.as_ref())
            .or_else(|| {
                self.init
                    .as_ref()
                    .and_then(|fragment| fragment.return_type.as_ref())
            })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.init.is_none()
            && self.step.is_none()
            && self.predicate.is_none()
            && self.finalizer.is_none()
    }
}

/// Resolved composite loop signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopSignature {
    /// Loop-local state types, one per state-carrying clause, in clause
    /// order
    pub state: Vec<FieldType>,
    /// Inferred external arguments, shared as a common suffix by the loop's
    /// fragments
    pub externals: Vec<FieldType>,
    pub return_type: Option<FieldType>,
}

impl LoopSignature {
    /// Full parameter sequence: state types followed by the externals
    pub fn parameters(&self) -> Vec<FieldType> {
        self.state
            .iter()
            .chain(self.externals.iter())
            .cloned()
            .collect()
    }

    /// The composite signature as a method type
    pub fn method_type(&self) -> MethodType {
        MethodType::new(self.parameters(), self.return_type.clone())
    }
}
