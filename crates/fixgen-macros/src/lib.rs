//! Fixgen Proc Macros
//!
//! This crate provides the derive and attribute macros that write fixgen
//! descriptors for you:
//!
//! - `#[derive(Fixture)]` describes a struct (one member and one `set_*`
//!   mutator per field) or a unit-only enum (its constants in order).
//! - `#[fixture_proxy]` on a trait generates a proxy implementation of the
//!   trait and `impl Fixture for Box<dyn Trait>`.
//!
//! Both are re-exported from `fixgen` behind its default `derive` feature.
//!
//! # Example
//!
//! ```ignore
//! use fixgen::{fixture_proxy, Fixture};
//!
//! #[fixture_proxy]
//! trait Clock {
//!     fn now(&self) -> i64;
//! }
//!
//! #[derive(Default, Fixture)]
//! struct Session {
//!     user: String,
//!     #[fixture(skip)]
//!     cache: Vec<u8>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput, ItemTrait};

mod fixture;
mod proxy;

/// Derive `fixgen::Fixture`
///
/// # Structs
///
/// Named-field and unit structs. Each field becomes a member plus a mutator
/// named `set_<field>` that assigns it. The constructor is `Default::default`
/// unless overridden.
///
/// Struct attributes:
/// - `#[fixture(no_default)]`: register no constructor; the type then only
///   appears as absent
/// - `#[fixture(constructor = "path::to::fn")]`: construct with a
///   zero-argument function instead of `Default`
///
/// Field attributes:
/// - `#[fixture(skip)]`: neither a member nor a mutator
/// - `#[fixture(extends)]`: the field embeds the ancestor type, whose own
///   mutators run after this type's
/// - `#[fixture(mutator = "method")]`: register `Self::method` as the
///   field's mutator instead of the generated setter
///
/// # Enums
///
/// Enums whose variants are all units; the first variant is the one
/// synthesized.
///
/// Generic types, tuple structs and enums with data are rejected.
#[proc_macro_derive(Fixture, attributes(fixture))]
pub fn derive_fixture(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match fixture::expand(input) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Generate a behavioral proxy for a trait
///
/// Emits the trait unchanged, a `<Trait>FixtureProxy` struct implementing it
/// by answering every method with a synthesized value of its return type,
/// and `impl fixgen::Fixture for Box<dyn Trait>`.
///
/// Every method needs a `self` receiver and may not be generic or async.
#[proc_macro_attribute]
pub fn fixture_proxy(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr = proc_macro2::TokenStream::from(attr);
    let item = parse_macro_input!(item as ItemTrait);
    match proxy::expand(attr, item) {
        Ok(output) => output.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
