//! Behavioral proxies for interfaces
//!
//! An interface descriptor carries a factory that wraps a [`Proxy`] in a
//! synthetic implementation of the trait (usually generated by
//! `#[fixture_proxy]`). Every trait method forwards to [`Proxy::call`], which
//! fabricates a fresh value of the method's return type.
//!
//! ```rust
//! use fixgen::{Builder, Fixture, Proxy, TypeDescriptor};
//!
//! trait Clock {
//!     fn now(&self) -> i64;
//! }
//!
//! struct ClockProxy(Proxy);
//!
//! impl Clock for ClockProxy {
//!     fn now(&self) -> i64 {
//!         self.0.call("now")
//!     }
//! }
//!
//! impl Fixture for Box<dyn Clock> {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::interface::<Box<dyn Clock>>(|proxy| {
//!             Box::new(ClockProxy(proxy)) as Box<dyn Clock>
//!         })
//!     }
//! }
//!
//! let clock = Builder::<Box<dyn Clock>>::new()
//!     .with_long_default(1_700_000_000)
//!     .build()
//!     .unwrap();
//! assert_eq!(clock.now(), 1_700_000_000);
//! ```

use std::fmt;

use crate::errors::Result;
use crate::fixture::Fixture;
use crate::synth::{RecursionContext, Synthesizer};

/// Stateless stand-in for one interface
#[derive(Clone)]
pub struct Proxy {
    interface: &'static str,
    synthesizer: Synthesizer,
    context: RecursionContext,
}

impl Proxy {
    pub(crate) fn new(
        interface: &'static str,
        synthesizer: Synthesizer,
        context: RecursionContext,
    ) -> Self {
        Self {
            interface,
            synthesizer,
            context,
        }
    }

    /// Name of the interface this proxy stands in for
    pub fn interface(&self) -> &'static str {
        self.interface
    }

    /// Depth the proxy was created at; calls synthesize at the same depth
    pub fn depth(&self) -> u32 {
        self.context.depth()
    }

    /// Synthesize the return value of `method`
    pub fn try_call<R: Fixture>(&self, method: &str) -> Result<R> {
        tracing::trace!(
            interface = self.interface,
            method,
            returns = std::any::type_name::<R>(),
            "Proxy call"
        );
        self.synthesizer.synthesize_as::<R>(self.context)
    }

    /// Synthesize the return value of `method`
    ///
    /// # Panics
    ///
    /// Panics when `R` cannot hold the absence marker (it is not an `Option`)
    /// and no value of `R` could be synthesized, e.g. a composite without a
    /// constructor. The failure is logged at `warn` first. Use
    /// [`Self::try_call`] to handle that case.
    pub fn call<R: Fixture>(&self, method: &str) -> R {
        match self.try_call(method) {
            Ok(value) => value,
            Err(err) => {
                let returns = std::any::type_name::<R>();
                tracing::warn!(
                    interface = self.interface,
                    method,
                    returns,
                    error = %err,
                    "Proxy cannot produce a return value"
                );
                panic!("{}::{method} proxy cannot produce {returns}: {err}", self.interface)
            }
        }
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("interface", &self.interface)
            .field("depth", &self.context.depth())
            .finish_non_exhaustive()
    }
}
