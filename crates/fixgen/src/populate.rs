//! Instance population
//!
//! A [`MutatorPlan`] is learned once per composite type: every declared
//! member is paired with the mutators whose name mentions both "set" and the
//! member (case-insensitive), first for the type itself, then for each
//! embedded ancestor. Populating an instance synthesizes arguments for each
//! planned mutator and invokes them in order, stopping at the first failure.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::{ApplyFn, CompositeShape, ProjectFn, TypeDescriptor, TypeRef};
use crate::errors::{FixgenError, Result};
use crate::registry;
use crate::synth::{RecursionContext, Synthesizer};
use crate::value::Value;

/// Outcome of populating one instance
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    /// Number of mutators that ran successfully
    pub applied: usize,
    /// Failure that stopped population, if any
    pub aborted: Option<FixgenError>,
}

impl Population {
    /// True when every planned mutator ran
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }
}

/// One planned mutator invocation
#[derive(Clone)]
pub struct PlannedMutator {
    member: &'static str,
    mutator: &'static str,
    params: Vec<TypeRef>,
    apply: ApplyFn,
}

impl PlannedMutator {
    /// Member the mutator was matched to
    pub fn member(&self) -> &'static str {
        self.member
    }

    /// Mutator name
    pub fn mutator(&self) -> &'static str {
        self.mutator
    }

    /// Parameter types, in declaration order
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    fn projected(&self, project: ProjectFn) -> Self {
        let apply = Arc::clone(&self.apply);
        let mutator = self.mutator;
        Self {
            member: self.member,
            mutator,
            params: self.params.clone(),
            apply: Arc::new(move |target: &mut dyn Any, args: Vec<Value>| {
                let ancestor = project(target).ok_or_else(|| {
                    FixgenError::mutator("ancestor", mutator, "receiver does not embed ancestor")
                })?;
                apply(ancestor, args)
            }),
        }
    }
}

impl fmt::Debug for PlannedMutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedMutator")
            .field("member", &self.member)
            .field("mutator", &self.mutator)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Ordered mutator invocations for one composite type
#[derive(Debug, Clone, Default)]
pub struct MutatorPlan {
    steps: Vec<PlannedMutator>,
}

impl MutatorPlan {
    /// Memoized plan for `descriptor`'s type
    pub fn for_descriptor(descriptor: &TypeDescriptor) -> Arc<MutatorPlan> {
        registry::plan_for(descriptor.type_id(), || Self::learn(descriptor))
    }

    fn learn(descriptor: &TypeDescriptor) -> Self {
        let mut steps = Vec::new();
        if let Some(shape) = descriptor.composite() {
            steps.extend(match_mutators(shape));
            if let Some(ancestor) = shape.ancestor() {
                let parent = ancestor.ty().resolve();
                let project = ancestor.project_fn();
                let inherited = Self::for_descriptor(&parent);
                steps.extend(
                    inherited
                        .steps()
                        .iter()
                        .map(|step| step.projected(Arc::clone(&project))),
                );
            }
        }
        tracing::trace!(
            type_name = descriptor.name(),
            steps = steps.len(),
            "Learned mutator plan"
        );
        Self { steps }
    }

    /// Planned invocations, in order
    pub fn steps(&self) -> &[PlannedMutator] {
        &self.steps
    }

    /// Number of planned invocations
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when nothing will be invoked
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Planned mutator names, in order
    pub fn mutator_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(PlannedMutator::mutator).collect()
    }
}

/// Whether `mutator` is considered a mutator of `member`
pub fn is_mutator_of(member: &str, mutator: &str) -> bool {
    let mutator = mutator.to_lowercase();
    mutator.contains("set") && mutator.contains(&member.to_lowercase())
}

fn match_mutators(shape: &CompositeShape) -> Vec<PlannedMutator> {
    let mut steps = Vec::new();
    for member in shape.members() {
        for mutator in shape.mutators() {
            if is_mutator_of(member.name(), mutator.name()) {
                steps.push(PlannedMutator {
                    member: member.name(),
                    mutator: mutator.name(),
                    params: mutator.params().to_vec(),
                    apply: mutator.apply_fn(),
                });
            }
        }
    }
    steps
}

/// Run every planned mutator of `descriptor`'s type on `instance`
///
/// Arguments are fully synthesized one level deeper while `context` has depth
/// left, and bare-constructed otherwise. The first failing mutator stops
/// population; the instance keeps whatever was applied before it.
pub fn populate(
    synth: &Synthesizer,
    instance: &mut dyn Any,
    descriptor: &TypeDescriptor,
    context: RecursionContext,
) -> Population {
    let plan = MutatorPlan::for_descriptor(descriptor);
    let mut applied = 0;
    for step in plan.steps() {
        if let Err(err) = invoke(synth, instance, step, context) {
            tracing::warn!(
                type_name = descriptor.name(),
                mutator = step.mutator,
                applied,
                error = %err,
                "Mutator failed, leaving instance partially populated"
            );
            return Population {
                applied,
                aborted: Some(err),
            };
        }
        applied += 1;
    }
    Population {
        applied,
        aborted: None,
    }
}

fn invoke(
    synth: &Synthesizer,
    instance: &mut dyn Any,
    step: &PlannedMutator,
    context: RecursionContext,
) -> Result<()> {
    let args: Vec<Value> = step
        .params
        .iter()
        .map(|param| {
            let descriptor = param.resolve();
            if context.is_exhausted() {
                synth.bare(&descriptor, context)
            } else {
                synth.synthesize(&descriptor, context.descend())
            }
        })
        .collect();
    (step.apply)(instance, args)
}
