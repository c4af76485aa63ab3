//! Process-wide memo of learned type shapes
//!
//! Learning the shape of a type (its descriptor and its mutator plan) happens
//! once per `TypeId`; fabricating values reads the memoized result. Only
//! immutable shapes are cached here, never synthesized instances.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::descriptor::TypeDescriptor;
use crate::fixture::Fixture;
use crate::populate::MutatorPlan;

static DESCRIPTORS: Lazy<RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static PLANS: Lazy<RwLock<HashMap<TypeId, Arc<MutatorPlan>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Memoized descriptor of `T`
pub fn descriptor_of<T: Fixture>() -> Arc<TypeDescriptor> {
    let key = TypeId::of::<T>();
    if let Some(descriptor) = DESCRIPTORS.read().get(&key) {
        return Arc::clone(descriptor);
    }

    // Describe outside the lock: descriptors of wrapper types describe their
    // inner type eagerly.
    let descriptor = Arc::new(T::describe());
    tracing::trace!(type_name = descriptor.name(), "Learned type shape");
    Arc::clone(DESCRIPTORS.write().entry(key).or_insert(descriptor))
}

/// Memoized mutator plan for the type identified by `key`
pub(crate) fn plan_for(key: TypeId, learn: impl FnOnce() -> MutatorPlan) -> Arc<MutatorPlan> {
    if let Some(plan) = PLANS.read().get(&key) {
        return Arc::clone(plan);
    }

    // Planning recurses into ancestors, which takes this lock again.
    let plan = Arc::new(learn());
    Arc::clone(PLANS.write().entry(key).or_insert(plan))
}

/// Number of types whose descriptor has been learned
pub fn learned_type_count() -> usize {
    DESCRIPTORS.read().len()
}
