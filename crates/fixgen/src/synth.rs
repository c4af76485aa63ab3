//! Value synthesis
//!
//! [`Synthesizer::synthesize`] is the full path: composites are constructed
//! and populated while the recursion context has depth left.
//! [`Synthesizer::bare`] is the depth-capped path used once the limit is
//! reached: composites are constructed but never populated and lists stay
//! empty. Array slots and nested-list elements are built like a child
//! builder's root: constructed, then always populated, with mutator arguments
//! capped once the slot's depth reaches the limit. Neither path fails;
//! anything that cannot be made degrades to [`Value::Absent`].

use std::sync::Arc;

use crate::classify::{classify, TypeCategory};
use crate::config::BuilderConfig;
use crate::descriptor::{CompositeShape, Shape, TypeDescriptor, TypeRef};
use crate::errors::{FixgenError, Result};
use crate::fixture::Fixture;
use crate::populate::{populate, Population};
use crate::proxy::Proxy;
use crate::registry;
use crate::value::Value;

/// Depth bookkeeping for one root build
///
/// Starts at depth 0 and only ever grows, one step per nested composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecursionContext {
    depth: u32,
    limit: u32,
}

impl RecursionContext {
    /// Context of a root build
    pub fn root(limit: u32) -> Self {
        Self { depth: 0, limit }
    }

    /// Current depth
    pub fn depth(self) -> u32 {
        self.depth
    }

    /// Configured depth limit
    pub fn limit(self) -> u32 {
        self.limit
    }

    /// Context one nesting level deeper
    pub fn descend(self) -> Self {
        Self {
            depth: self.depth.saturating_add(1),
            limit: self.limit,
        }
    }

    /// True once no further composite population is allowed
    pub fn is_exhausted(self) -> bool {
        self.depth >= self.limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    Bare,
}

/// Produces values for descriptors under one configuration snapshot
#[derive(Debug, Clone)]
pub struct Synthesizer {
    config: Arc<BuilderConfig>,
}

impl Synthesizer {
    /// Synthesizer reading `config`
    pub fn new(config: Arc<BuilderConfig>) -> Self {
        Self { config }
    }

    /// Configuration snapshot in use
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Root context for this configuration
    pub fn root_context(&self) -> RecursionContext {
        RecursionContext::root(self.config.depth_limit())
    }

    /// Construct and populate the root of a build
    ///
    /// The root is always populated; the depth limit only governs the values
    /// synthesized for its mutators.
    pub fn build_root(&self, descriptor: &TypeDescriptor) -> Value {
        let context = self.root_context();
        match (classify(descriptor, &self.config), descriptor.composite()) {
            (TypeCategory::Composite, Some(shape)) => {
                let Some(mut instance) = self.construct(descriptor, shape) else {
                    return Value::Absent;
                };
                let population = populate(self, instance.as_mut(), descriptor, context);
                tracing::debug!(
                    type_name = descriptor.name(),
                    applied = population.applied,
                    complete = population.is_complete(),
                    "Built root fixture"
                );
                Value::Object(instance)
            }
            _ => self.synthesize(descriptor, context),
        }
    }

    /// Full synthesis of one value
    pub fn synthesize(&self, descriptor: &TypeDescriptor, context: RecursionContext) -> Value {
        self.produce(descriptor, context, Mode::Full)
    }

    /// Depth-capped synthesis: composites are constructed, never populated
    pub fn bare(&self, descriptor: &TypeDescriptor, context: RecursionContext) -> Value {
        self.produce(descriptor, context, Mode::Bare)
    }

    /// Synthesize a value of `T` and convert it
    pub fn synthesize_as<T: Fixture>(&self, context: RecursionContext) -> Result<T> {
        let descriptor = registry::descriptor_of::<T>();
        T::from_value(self.synthesize(&descriptor, context))
    }

    /// Populate an existing instance of `descriptor`'s type
    pub fn populate(
        &self,
        instance: &mut dyn std::any::Any,
        descriptor: &TypeDescriptor,
    ) -> Population {
        populate(self, instance, descriptor, self.root_context())
    }

    fn produce(&self, descriptor: &TypeDescriptor, context: RecursionContext, mode: Mode) -> Value {
        let category = classify(descriptor, &self.config);
        match category {
            TypeCategory::Suppressed => Value::Absent,
            TypeCategory::Enum => self.first_constant(descriptor),
            TypeCategory::Array(element) => self.array(element, context, mode),
            TypeCategory::Primitive(kind) => self.config.default_for(kind),
            TypeCategory::ListLike => match (mode, descriptor.shape()) {
                (Mode::Full, Shape::List(element)) if self.config.build_nested_lists() => {
                    self.nested_list(descriptor, *element, context)
                }
                _ => Value::List(Vec::new()),
            },
            TypeCategory::MapLike => Value::Map,
            TypeCategory::Interface => self.proxy(descriptor, context),
            TypeCategory::Composite => match descriptor.composite() {
                Some(shape) => self.composite(descriptor, shape, context, mode),
                None => Value::Absent,
            },
        }
    }

    fn first_constant(&self, descriptor: &TypeDescriptor) -> Value {
        match descriptor.shape() {
            Shape::Enum(constants) => match constants.first() {
                Some(constant) => Value::Object(constant.instantiate()),
                None => {
                    tracing::debug!(type_name = descriptor.name(), "Enumeration has no constants");
                    Value::Absent
                }
            },
            _ => Value::Absent,
        }
    }

    /// Construct and always populate one element at `context`
    ///
    /// Non-composite elements go through the full path unchanged.
    fn element(&self, descriptor: &TypeDescriptor, context: RecursionContext) -> Value {
        match (classify(descriptor, &self.config), descriptor.composite()) {
            (TypeCategory::Composite, Some(shape)) => {
                let Some(mut instance) = self.construct(descriptor, shape) else {
                    return Value::Absent;
                };
                populate(self, instance.as_mut(), descriptor, context);
                Value::Object(instance)
            }
            _ => self.synthesize(descriptor, context),
        }
    }

    fn array(&self, element: TypeRef, context: RecursionContext, mode: Mode) -> Value {
        let element = element.resolve();
        let items = (0..self.config.collection_size())
            .map(|_| match mode {
                Mode::Full => self.element(&element, context),
                // Capped arguments must not populate, or self-referential
                // arrays would never terminate.
                Mode::Bare => self.bare(&element, context),
            })
            .collect();
        Value::Array(items)
    }

    fn nested_list(
        &self,
        descriptor: &TypeDescriptor,
        element: Option<TypeRef>,
        context: RecursionContext,
    ) -> Value {
        match self.list_elements(descriptor, element, context) {
            Ok(items) => Value::List(items),
            Err(err) => {
                tracing::debug!(
                    type_name = descriptor.name(),
                    error = %err,
                    "Falling back to an empty list"
                );
                Value::List(Vec::new())
            }
        }
    }

    fn list_elements(
        &self,
        descriptor: &TypeDescriptor,
        element: Option<TypeRef>,
        context: RecursionContext,
    ) -> Result<Vec<Value>> {
        let element = element
            .ok_or_else(|| FixgenError::element_type(descriptor.name()))?
            .resolve();
        (0..self.config.collection_size())
            .map(|_| match self.element(&element, context) {
                Value::Absent => Err(FixgenError::construction(
                    element.name(),
                    "list element could not be synthesized",
                )),
                value => Ok(value),
            })
            .collect()
    }

    fn proxy(&self, descriptor: &TypeDescriptor, context: RecursionContext) -> Value {
        match descriptor.shape() {
            Shape::Interface(factory) => {
                let proxy = Proxy::new(descriptor.name(), self.clone(), context);
                Value::Object(factory(proxy))
            }
            _ => Value::Absent,
        }
    }

    fn composite(
        &self,
        descriptor: &TypeDescriptor,
        shape: &CompositeShape,
        context: RecursionContext,
        mode: Mode,
    ) -> Value {
        let Some(mut instance) = self.construct(descriptor, shape) else {
            return Value::Absent;
        };
        if mode == Mode::Full && !context.is_exhausted() {
            populate(self, instance.as_mut(), descriptor, context);
        }
        Value::Object(instance)
    }

    fn construct(
        &self,
        descriptor: &TypeDescriptor,
        shape: &CompositeShape,
    ) -> Option<Box<dyn std::any::Any>> {
        match shape.construct(descriptor.name()) {
            Ok(instance) => Some(instance),
            Err(err) => {
                tracing::debug!(type_name = descriptor.name(), error = %err, "Construction failed");
                None
            }
        }
    }
}
