//! Builder façade
//!
//! [`Builder`] is the entry point for tests: configure defaults fluently,
//! then ask for one populated instance, an unpopulated one, or a list.

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::config::BuilderConfig;
use crate::fixture::Fixture;
use crate::populate::Population;
use crate::registry;
use crate::synth::Synthesizer;
use crate::value::Value;

/// Fabricates fully populated instances of `T`
///
/// ```rust
/// use fixgen::{Builder, Fixture, ShapeBuilder, TypeDescriptor};
///
/// #[derive(Debug, Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Fixture for Point {
///     fn describe() -> TypeDescriptor {
///         ShapeBuilder::<Point>::with_default()
///             .member::<i32>("x")
///             .member::<i32>("y")
///             .mutator("set_x", |p: &mut Point, x: i32| p.x = x)
///             .mutator("set_y", |p: &mut Point, y: i32| p.y = y)
///             .finish()
///     }
/// }
///
/// let point = Builder::<Point>::new().with_int_default(7).build().unwrap();
/// assert_eq!((point.x, point.y), (7, 7));
/// ```
pub struct Builder<T> {
    config: BuilderConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Fixture> Builder<T> {
    /// Builder with default settings and the current process-wide string default
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::seeded())
    }

    /// Builder using `config` as-is
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Mutable access to the configuration
    pub fn config_mut(&mut self) -> &mut BuilderConfig {
        &mut self.config
    }

    /// Set the boolean default
    pub fn with_bool_default(mut self, value: bool) -> Self {
        self.config.set_bool_default(value);
        self
    }

    /// Set the 32-bit integer default
    pub fn with_int_default(mut self, value: i32) -> Self {
        self.config.set_int_default(value);
        self
    }

    /// Set the 64-bit integer default
    pub fn with_long_default(mut self, value: i64) -> Self {
        self.config.set_long_default(value);
        self
    }

    /// Set the 32-bit float default
    pub fn with_float_default(mut self, value: f32) -> Self {
        self.config.set_float_default(value);
        self
    }

    /// Set the 64-bit float default
    pub fn with_double_default(mut self, value: f64) -> Self {
        self.config.set_double_default(value);
        self
    }

    /// Set the decimal default
    pub fn with_decimal_default(mut self, value: Decimal) -> Self {
        self.config.set_decimal_default(value);
        self
    }

    /// Set the character default
    pub fn with_char_default(mut self, value: char) -> Self {
        self.config.set_char_default(value);
        self
    }

    /// Set the byte default
    pub fn with_byte_default(mut self, value: i8) -> Self {
        self.config.set_byte_default(value);
        self
    }

    /// Set the string default for this builder only
    pub fn with_string_default(mut self, value: impl Into<String>) -> Self {
        self.config.set_string_default(value);
        self
    }

    /// Set the depth limit; negative input clamps to zero
    pub fn with_depth_limit(mut self, limit: i64) -> Self {
        self.config.set_depth_limit(limit);
        self
    }

    /// Set the collection size; non-positive input is ignored
    pub fn with_collection_size(mut self, size: i64) -> Self {
        self.config.set_collection_size(size);
        self
    }

    /// Synthesize bare `Box<dyn Any>` values instead of leaving them absent
    pub fn with_bare_objects(mut self) -> Self {
        self.config.set_ignore_bare_objects(false);
        self
    }

    /// Fill list-like mutator arguments with elements
    pub fn with_nested_lists(mut self) -> Self {
        self.config.set_build_nested_lists(true);
        self
    }

    fn synthesizer(&self) -> Synthesizer {
        Synthesizer::new(Arc::new(self.config.clone()))
    }

    fn convert(value: Value) -> Option<T> {
        if value.is_absent() {
            return None;
        }
        match T::from_value(value) {
            Ok(instance) => Some(instance),
            Err(err) => {
                tracing::debug!(
                    type_name = std::any::type_name::<T>(),
                    error = %err,
                    "Synthesized value did not convert"
                );
                None
            }
        }
    }

    /// One fully populated instance
    ///
    /// The root is always populated; the depth limit governs the values
    /// handed to its mutators. `None` when `T` cannot be constructed.
    pub fn build(&self) -> Option<T> {
        let descriptor = registry::descriptor_of::<T>();
        Self::convert(self.synthesizer().build_root(&descriptor))
    }

    /// One constructed but unpopulated instance
    pub fn build_empty(&self) -> Option<T> {
        let synth = self.synthesizer();
        let descriptor = registry::descriptor_of::<T>();
        Self::convert(synth.bare(&descriptor, synth.root_context()))
    }

    /// `collection_size` handles to one populated instance
    pub fn build_list(&self) -> Vec<Rc<T>> {
        self.build_list_of(self.config.collection_size())
    }

    /// `size` handles to one populated instance
    ///
    /// Every entry points at the same instance. Empty when `T` cannot be
    /// built.
    pub fn build_list_of(&self, size: usize) -> Vec<Rc<T>> {
        match self.build() {
            Some(instance) => vec![Rc::new(instance); size],
            None => Vec::new(),
        }
    }

    /// `size` independently built instances
    pub fn build_distinct(&self, size: usize) -> Vec<T> {
        (0..size).filter_map(|_| self.build()).collect()
    }

    /// Run the populator on an instance the caller already owns
    pub fn populate(&self, instance: &mut T) -> Population {
        let descriptor = registry::descriptor_of::<T>();
        self.synthesizer().populate(instance, &descriptor)
    }
}

impl<T: Fixture> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Builder<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("type_name", &std::any::type_name::<T>())
            .field("config", &self.config)
            .finish()
    }
}
