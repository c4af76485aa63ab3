//! Type classification
//!
//! Maps a descriptor onto the closed set of synthesis categories. The
//! mapping is total: anything not recognized as a more specific category is
//! a composite.

use crate::config::BuilderConfig;
use crate::descriptor::{PrimitiveKind, Shape, TypeDescriptor, TypeRef};

/// Synthesis category of a type
#[derive(Debug, Clone, Copy)]
pub enum TypeCategory {
    /// Untyped object suppressed by configuration; synthesizes to absent
    Suppressed,
    /// Enumeration
    Enum,
    /// Array of the element type
    Array(TypeRef),
    /// Primitive-like type
    Primitive(PrimitiveKind),
    /// List-like container
    ListLike,
    /// Map-like container
    MapLike,
    /// Interface served by a proxy
    Interface,
    /// Plain composite, built from its mutators
    Composite,
}

impl TypeCategory {
    /// Short category name for logs
    pub fn name(&self) -> &'static str {
        match self {
            TypeCategory::Suppressed => "suppressed",
            TypeCategory::Enum => "enum",
            TypeCategory::Array(_) => "array",
            TypeCategory::Primitive(_) => "primitive",
            TypeCategory::ListLike => "list",
            TypeCategory::MapLike => "map",
            TypeCategory::Interface => "interface",
            TypeCategory::Composite => "composite",
        }
    }
}

/// Classify `descriptor` under `config`
pub fn classify(descriptor: &TypeDescriptor, config: &BuilderConfig) -> TypeCategory {
    match descriptor.shape() {
        Shape::AnyObject(_) if config.ignore_bare_objects() => TypeCategory::Suppressed,
        Shape::Enum(_) => TypeCategory::Enum,
        Shape::Array(element) => TypeCategory::Array(*element),
        Shape::Primitive(kind) => TypeCategory::Primitive(*kind),
        Shape::List(_) => TypeCategory::ListLike,
        Shape::Map => TypeCategory::MapLike,
        Shape::Interface(_) => TypeCategory::Interface,
        Shape::AnyObject(_) | Shape::Composite(_) => TypeCategory::Composite,
    }
}
