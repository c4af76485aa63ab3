//! Fixgen: populated test fixtures from type descriptors
//!
//! Tests often need "some valid instance" of a type with every field set.
//! Fixgen fabricates one: each type describes its shape once (members,
//! mutators, constructor, ancestor) and the synthesizer walks that shape,
//! handing every mutator a default value of the right category. Nested
//! composites are populated down to a configurable depth, interfaces are
//! served by behavioral proxies, and anything that cannot be made is left
//! absent instead of failing the build.
//!
//! # Usage
//!
//! ```rust
//! use fixgen::{Builder, Fixture};
//!
//! #[derive(Debug, Default, Fixture)]
//! struct Address {
//!     street: String,
//!     number: u32,
//! }
//!
//! #[derive(Debug, Default, Fixture)]
//! struct Customer {
//!     name: String,
//!     address: Option<Address>,
//! }
//!
//! let customer = Builder::<Customer>::new()
//!     .with_string_default("alice")
//!     .with_int_default(12)
//!     .with_depth_limit(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(customer.name, "alice");
//! let address = customer.address.unwrap();
//! assert_eq!((address.street.as_str(), address.number), ("alice", 12));
//! ```
//!
//! # Organization
//!
//! - [`config`]: the default registry and its TOML form
//! - [`descriptor`] and [`fixture`]: describing types
//! - [`classify`], [`synth`] and [`populate`]: the synthesis engine
//! - [`proxy`]: stand-ins for interfaces
//! - [`builder`]: the façade tests use

extern crate self as fixgen;

pub mod builder;
pub mod classify;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod fixture;
pub mod populate;
pub mod proxy;
pub mod registry;
pub mod synth;
pub mod value;

pub use builder::Builder;
pub use classify::{classify, TypeCategory};
pub use config::{global_string_default, set_global_string_default, BuilderConfig, DefaultValue};
pub use descriptor::{
    Ancestor, CompositeShape, EnumConstant, Member, Mutator, MutatorFn, MutatorOutcome,
    PrimitiveKind, Shape, ShapeBuilder, TypeDescriptor, TypeRef,
};
pub use errors::{FixgenError, Result};
pub use fixture::Fixture;
pub use populate::{MutatorPlan, Population};
pub use proxy::Proxy;
pub use synth::{RecursionContext, Synthesizer};
pub use value::Value;

// Decimal defaults are part of the configuration surface
pub use rust_decimal::Decimal;

#[cfg(feature = "derive")]
pub use fixgen_macros::{fixture_proxy, Fixture};
