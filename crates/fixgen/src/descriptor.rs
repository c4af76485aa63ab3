//! Type descriptors: the learned shape of a type
//!
//! A [`TypeDescriptor`] records everything synthesis needs to know about a
//! type: which category it belongs to, how to construct it, which members it
//! declares and which mutators assign them. Descriptors are produced once per
//! type by [`Fixture::describe`] and memoized by [`crate::registry`].
//!
//! Composite descriptors are usually written with [`ShapeBuilder`] (or
//! generated by `#[derive(Fixture)]`):
//!
//! ```rust
//! use fixgen::{Fixture, ShapeBuilder, TypeDescriptor};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Point {
//!     fn set_x(&mut self, x: i32) {
//!         self.x = x;
//!     }
//!
//!     fn set_y(&mut self, y: i32) {
//!         self.y = y;
//!     }
//! }
//!
//! impl Fixture for Point {
//!     fn describe() -> TypeDescriptor {
//!         ShapeBuilder::<Point>::with_default()
//!             .member::<i32>("x")
//!             .member::<i32>("y")
//!             .mutator("set_x", Point::set_x)
//!             .mutator("set_y", Point::set_y)
//!             .finish()
//!     }
//! }
//! ```

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{FixgenError, Result};
use crate::fixture::Fixture;
use crate::proxy::Proxy;
use crate::registry;
use crate::value::Value;

/// Primitive-like categories, each with exactly one configured default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// `bool`
    Boolean,
    /// `i32` and the narrower 16/32-bit integers
    Int,
    /// `i64` and the other 64-bit and pointer-sized integers
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `rust_decimal::Decimal`
    Decimal,
    /// `char`
    Char,
    /// `i8` and `u8`
    Byte,
    /// `String`
    String,
}

impl PrimitiveKind {
    /// Every category, in export order
    pub const ALL: [PrimitiveKind; 9] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
        PrimitiveKind::Decimal,
        PrimitiveKind::Char,
        PrimitiveKind::Byte,
        PrimitiveKind::String,
    ];

    /// Category name used by default export and import
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::String => "string",
        }
    }

    /// Inverse of [`Self::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Lazily resolved reference to another type's descriptor
///
/// Resolution goes through the registry, so self-referential shapes such as
/// a node holding a child node never recurse while being described.
#[derive(Clone, Copy)]
pub struct TypeRef {
    name: fn() -> &'static str,
    resolve: fn() -> Arc<TypeDescriptor>,
}

impl TypeRef {
    /// Reference to the descriptor of `T`
    pub fn of<T: Fixture>() -> Self {
        Self {
            name: type_name::<T>,
            resolve: registry::descriptor_of::<T>,
        }
    }

    /// Rust name of the referenced type
    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    /// Memoized descriptor of the referenced type
    pub fn resolve(&self) -> Arc<TypeDescriptor> {
        (self.resolve)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.name()).finish()
    }
}

pub(crate) type Constructor = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;
pub(crate) type ApplyFn = Arc<dyn Fn(&mut dyn Any, Vec<Value>) -> Result<()> + Send + Sync>;
pub(crate) type ProjectFn = Arc<dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync>;
pub(crate) type ProxyFactory = Arc<dyn Fn(Proxy) -> Box<dyn Any> + Send + Sync>;

/// Pin the higher-ranked signature of a projection closure.
pub(crate) fn projection<F>(project: F) -> ProjectFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(project)
}

/// One declared constant of an enumeration
#[derive(Clone)]
pub struct EnumConstant {
    name: &'static str,
    make: Constructor,
}

impl EnumConstant {
    /// Constant `name`, produced by `make`
    pub fn new<T: Any>(name: &'static str, make: fn() -> T) -> Self {
        Self {
            name,
            make: Arc::new(move || Box::new(make()) as Box<dyn Any>),
        }
    }

    /// Declared name of the constant
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Produce the constant
    pub fn instantiate(&self) -> Box<dyn Any> {
        (self.make)()
    }
}

impl fmt::Debug for EnumConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EnumConstant").field(&self.name).finish()
    }
}

/// A declared member (field) of a composite type
#[derive(Debug, Clone, Copy)]
pub struct Member {
    name: &'static str,
    ty: TypeRef,
}

impl Member {
    /// Declared member name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared member type
    pub fn ty(&self) -> TypeRef {
        self.ty
    }
}

/// A mutator method of a composite type
#[derive(Clone)]
pub struct Mutator {
    name: &'static str,
    params: Vec<TypeRef>,
    apply: ApplyFn,
}

impl Mutator {
    /// Declared method name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parameter types, in declaration order
    pub fn params(&self) -> &[TypeRef] {
        &self.params
    }

    pub(crate) fn apply_fn(&self) -> ApplyFn {
        Arc::clone(&self.apply)
    }
}

impl fmt::Debug for Mutator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mutator")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The embedded ancestor of a composite type
#[derive(Clone)]
pub struct Ancestor {
    ty: TypeRef,
    project: ProjectFn,
}

impl Ancestor {
    /// Type of the ancestor
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    pub(crate) fn project_fn(&self) -> ProjectFn {
        Arc::clone(&self.project)
    }
}

impl fmt::Debug for Ancestor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ancestor").field(&self.ty).finish()
    }
}

/// Construction and mutation surface of a composite type
#[derive(Clone, Default)]
pub struct CompositeShape {
    constructor: Option<Constructor>,
    members: Vec<Member>,
    mutators: Vec<Mutator>,
    ancestor: Option<Ancestor>,
}

impl CompositeShape {
    /// Declared members, own type only
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Declared mutators, own type only
    pub fn mutators(&self) -> &[Mutator] {
        &self.mutators
    }

    /// Embedded ancestor, if any
    pub fn ancestor(&self) -> Option<&Ancestor> {
        self.ancestor.as_ref()
    }

    /// Whether a no-argument constructor is registered
    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a bare, unpopulated instance
    pub fn construct(&self, type_name: &str) -> Result<Box<dyn Any>> {
        match &self.constructor {
            Some(make) => Ok(make()),
            None => Err(FixgenError::construction(
                type_name,
                "no constructor registered",
            )),
        }
    }
}

impl fmt::Debug for CompositeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeShape")
            .field("constructible", &self.is_constructible())
            .field("members", &self.members)
            .field("mutators", &self.mutators)
            .field("ancestor", &self.ancestor)
            .finish()
    }
}

/// Structural shape of a described type
#[derive(Clone)]
pub enum Shape {
    /// The untyped "any object" type
    AnyObject(CompositeShape),
    /// A primitive-like type with one configured default
    Primitive(PrimitiveKind),
    /// An enumeration with its constants in declaration order
    Enum(Vec<EnumConstant>),
    /// A fixed-size array of the element type
    Array(TypeRef),
    /// A list-like container; the element type may be unknown
    List(Option<TypeRef>),
    /// A map-like container
    Map,
    /// An interface implemented by a synthetic proxy
    Interface(ProxyFactory),
    /// A plain composite type built from its mutators
    Composite(CompositeShape),
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::AnyObject(_) => f.write_str("AnyObject"),
            Shape::Primitive(kind) => f.debug_tuple("Primitive").field(kind).finish(),
            Shape::Enum(constants) => f.debug_tuple("Enum").field(constants).finish(),
            Shape::Array(element) => f.debug_tuple("Array").field(element).finish(),
            Shape::List(element) => f.debug_tuple("List").field(element).finish(),
            Shape::Map => f.write_str("Map"),
            Shape::Interface(_) => f.write_str("Interface"),
            Shape::Composite(shape) => f.debug_tuple("Composite").field(shape).finish(),
        }
    }
}

/// Learned shape of one type
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    name: &'static str,
    type_id: TypeId,
    shape: Shape,
}

impl TypeDescriptor {
    /// Descriptor of `T` with an explicit shape
    pub fn new<T: Any>(shape: Shape) -> Self {
        Self {
            name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            shape,
        }
    }

    /// Primitive-like type of the given category
    pub fn primitive<T: Any>(kind: PrimitiveKind) -> Self {
        Self::new::<T>(Shape::Primitive(kind))
    }

    /// The untyped "any object" type; constructs `()` when not suppressed
    pub fn any_object<T: Any>() -> Self {
        let shape = CompositeShape {
            constructor: Some(Arc::new(|| Box::new(()) as Box<dyn Any>)),
            ..CompositeShape::default()
        };
        Self::new::<T>(Shape::AnyObject(shape))
    }

    /// Enumeration with constants in declaration order
    pub fn enumeration<T: Any>(constants: Vec<EnumConstant>) -> Self {
        Self::new::<T>(Shape::Enum(constants))
    }

    /// Array of `E`
    pub fn array<T: Any, E: Fixture>() -> Self {
        Self::new::<T>(Shape::Array(TypeRef::of::<E>()))
    }

    /// List-like container of `E`
    pub fn list<T: Any, E: Fixture>() -> Self {
        Self::new::<T>(Shape::List(Some(TypeRef::of::<E>())))
    }

    /// List-like container whose element type is not known
    pub fn untyped_list<T: Any>() -> Self {
        Self::new::<T>(Shape::List(None))
    }

    /// Map-like container
    pub fn map<T: Any>() -> Self {
        Self::new::<T>(Shape::Map)
    }

    /// Interface implemented by the proxy `factory` builds
    pub fn interface<T: Any>(factory: impl Fn(Proxy) -> T + Send + Sync + 'static) -> Self {
        Self::new::<T>(Shape::Interface(Arc::new(move |proxy| {
            Box::new(factory(proxy)) as Box<dyn Any>
        })))
    }

    /// Rust name of the described type
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identity of the described type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Structural shape
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Construction surface, for composites and the "any object" type
    pub fn composite(&self) -> Option<&CompositeShape> {
        match &self.shape {
            Shape::Composite(shape) | Shape::AnyObject(shape) => Some(shape),
            _ => None,
        }
    }
}

/// Result of a mutator call: `()` or `Result<(), E>`
pub trait MutatorOutcome {
    /// Normalize into a failure message
    fn into_outcome(self) -> std::result::Result<(), String>;
}

impl MutatorOutcome for () {
    fn into_outcome(self) -> std::result::Result<(), String> {
        Ok(())
    }
}

impl<E: fmt::Display> MutatorOutcome for std::result::Result<(), E> {
    fn into_outcome(self) -> std::result::Result<(), String> {
        self.map_err(|err| err.to_string())
    }
}

/// A function usable as a mutator of `T` taking the argument tuple `Args`
///
/// Implemented for closures and methods `Fn(&mut T, A, B, ..)` of up to four
/// arguments whose types implement [`Fixture`].
pub trait MutatorFn<T, Args>: Send + Sync + 'static {
    /// Parameter types, in declaration order
    fn param_types() -> Vec<TypeRef>;

    /// Convert `args` and call the mutator on `target`
    fn invoke(&self, target: &mut T, args: Vec<Value>) -> std::result::Result<(), String>;
}

macro_rules! impl_mutator_fn {
    ($($arg:ident $var:ident),*) => {
        impl<T, F, R, $($arg,)*> MutatorFn<T, ($($arg,)*)> for F
        where
            F: Fn(&mut T, $($arg),*) -> R + Send + Sync + 'static,
            R: MutatorOutcome,
            $($arg: Fixture,)*
        {
            fn param_types() -> Vec<TypeRef> {
                vec![$(TypeRef::of::<$arg>()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn invoke(&self, target: &mut T, args: Vec<Value>) -> std::result::Result<(), String> {
                let mut args = args.into_iter();
                $(
                    let $var = <$arg as Fixture>::from_value(args.next().unwrap_or(Value::Absent))
                        .map_err(|err| err.to_string())?;
                )*
                (self)(target, $($var),*).into_outcome()
            }
        }
    };
}

impl_mutator_fn!();
impl_mutator_fn!(A a);
impl_mutator_fn!(A a, B b);
impl_mutator_fn!(A a, B b, C c);
impl_mutator_fn!(A a, B b, C c, D d);

/// Typed builder for composite descriptors
pub struct ShapeBuilder<T> {
    shape: CompositeShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Default> ShapeBuilder<T> {
    /// Builder whose constructor is `T::default`
    pub fn with_default() -> Self {
        Self::new().constructor(T::default)
    }
}

impl<T: Any> Default for ShapeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Any> ShapeBuilder<T> {
    /// Builder with no constructor; construction fails until one is set
    pub fn new() -> Self {
        Self {
            shape: CompositeShape::default(),
            _marker: PhantomData,
        }
    }

    /// Register the no-argument constructor
    pub fn constructor(mut self, make: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.shape.constructor = Some(Arc::new(move || Box::new(make()) as Box<dyn Any>));
        self
    }

    /// Declare a member of type `F`
    pub fn member<F: Fixture>(mut self, name: &'static str) -> Self {
        self.shape.members.push(Member {
            name,
            ty: TypeRef::of::<F>(),
        });
        self
    }

    /// Declare a mutator
    pub fn mutator<Args: 'static, M>(mut self, name: &'static str, mutator: M) -> Self
    where
        M: MutatorFn<T, Args>,
    {
        let apply: ApplyFn = Arc::new(move |target: &mut dyn Any, args: Vec<Value>| {
            let target = target.downcast_mut::<T>().ok_or_else(|| {
                FixgenError::conversion(type_name::<T>(), "receiver of another type")
            })?;
            mutator
                .invoke(target, args)
                .map_err(|message| FixgenError::mutator(type_name::<T>(), name, message))
        });
        self.shape.mutators.push(Mutator {
            name,
            params: M::param_types(),
            apply,
        });
        self
    }

    /// Declare the embedded ancestor `P`, reached through `project`
    ///
    /// The ancestor's members and mutators (and its own ancestors') are
    /// planned after this type's own.
    pub fn extends<P: Fixture>(mut self, project: fn(&mut T) -> &mut P) -> Self {
        let project = projection(move |target| {
            target
                .downcast_mut::<T>()
                .map(|this| project(this) as &mut dyn Any)
        });
        self.shape.ancestor = Some(Ancestor {
            ty: TypeRef::of::<P>(),
            project,
        });
        self
    }

    /// Finish the composite descriptor
    pub fn finish(self) -> TypeDescriptor {
        TypeDescriptor::new::<T>(Shape::Composite(self.shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: i64,
    }

    impl Counter {
        fn set_hits(&mut self, hits: i64) {
            self.hits = hits;
        }
    }

    #[test]
    fn test_primitive_kind_names_round_trip() {
        for kind in PrimitiveKind::ALL {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("short"), None);
    }

    #[test]
    fn test_shape_builder_records_surface() {
        let descriptor = ShapeBuilder::<Counter>::with_default()
            .member::<i64>("hits")
            .mutator("set_hits", Counter::set_hits)
            .finish();

        let shape = descriptor.composite().unwrap();
        assert!(shape.is_constructible());
        assert_eq!(shape.members()[0].name(), "hits");
        assert_eq!(shape.mutators()[0].name(), "set_hits");
        assert_eq!(shape.mutators()[0].params()[0].name(), "i64");
        assert_eq!(descriptor.type_id(), TypeId::of::<Counter>());
    }

    #[test]
    fn test_mutator_converts_arguments() {
        let descriptor = ShapeBuilder::<Counter>::with_default()
            .mutator("set_hits", Counter::set_hits)
            .finish();
        let shape = descriptor.composite().unwrap();
        let mut instance = shape.construct(descriptor.name()).unwrap();

        let apply = shape.mutators()[0].apply_fn();
        apply(instance.as_mut(), vec![Value::Long(12)]).unwrap();
        assert_eq!(instance.downcast_ref::<Counter>().unwrap().hits, 12);

        let err = apply(instance.as_mut(), vec![Value::Str("x".into())]).unwrap_err();
        assert!(matches!(err, FixgenError::Mutator { .. }));
    }

    #[test]
    fn test_fallible_mutator_reports_message() {
        let descriptor = ShapeBuilder::<Counter>::with_default()
            .mutator("set_hits", |_: &mut Counter, _: i64| -> std::result::Result<(), String> {
                Err("rejected".to_string())
            })
            .finish();
        let shape = descriptor.composite().unwrap();
        let mut instance = shape.construct(descriptor.name()).unwrap();

        let err = shape.mutators()[0].apply_fn()(instance.as_mut(), vec![Value::Long(1)])
            .unwrap_err();
        assert!(err.to_string().ends_with("failed: rejected"));
    }

    #[test]
    fn test_missing_constructor_fails() {
        let descriptor = ShapeBuilder::<Counter>::new().finish();
        let err = descriptor
            .composite()
            .unwrap()
            .construct(descriptor.name())
            .unwrap_err();
        assert!(matches!(err, FixgenError::Construction { .. }));
    }
}
