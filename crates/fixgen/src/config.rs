//! Builder configuration: the default registry
//!
//! Holds one default per primitive-like category together with the recursion
//! and collection limits. A `Builder` owns one `BuilderConfig`; every build
//! call snapshots it, so child syntheses read a private copy.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::descriptor::PrimitiveKind;
use crate::errors::Result;
use crate::value::Value;

/// String default used until [`set_global_string_default`] is called
pub const DEFAULT_STRING: &str = "text";

/// Depth limit applied when none is configured
pub const DEFAULT_DEPTH_LIMIT: u32 = 1;

/// Collection size applied when none is configured
pub const DEFAULT_COLLECTION_SIZE: usize = 1;

static GLOBAL_STRING_DEFAULT: Lazy<RwLock<String>> =
    Lazy::new(|| RwLock::new(DEFAULT_STRING.to_string()));

/// Set the process-wide string default
///
/// The value is read once by [`crate::Builder::new`]; builders created
/// earlier keep the string they were seeded with. The lock makes the write
/// itself safe, but the order between this call and a concurrent
/// `Builder::new()` on another thread is unspecified, so tests that change it
/// must run serially.
pub fn set_global_string_default(value: impl Into<String>) {
    *GLOBAL_STRING_DEFAULT.write() = value.into();
}

/// Current process-wide string default
pub fn global_string_default() -> String {
    GLOBAL_STRING_DEFAULT.read().clone()
}

/// One exported default, tagged with its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DefaultValue {
    /// Boolean default
    Boolean(bool),
    /// 32-bit integer default
    Int(i32),
    /// 64-bit integer default
    Long(i64),
    /// 32-bit float default
    Float(f32),
    /// 64-bit float default
    Double(f64),
    /// Decimal default
    Decimal(Decimal),
    /// Character default
    Char(char),
    /// Byte default
    Byte(i8),
    /// String default
    String(String),
}

impl DefaultValue {
    /// Category this value belongs to
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            DefaultValue::Boolean(_) => PrimitiveKind::Boolean,
            DefaultValue::Int(_) => PrimitiveKind::Int,
            DefaultValue::Long(_) => PrimitiveKind::Long,
            DefaultValue::Float(_) => PrimitiveKind::Float,
            DefaultValue::Double(_) => PrimitiveKind::Double,
            DefaultValue::Decimal(_) => PrimitiveKind::Decimal,
            DefaultValue::Char(_) => PrimitiveKind::Char,
            DefaultValue::Byte(_) => PrimitiveKind::Byte,
            DefaultValue::String(_) => PrimitiveKind::String,
        }
    }
}

/// Limits read from files go through the same clamping as the setters
mod clamped {
    use super::BuilderConfig;
    use serde::{Deserialize, Deserializer};

    pub fn depth_limit<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(BuilderConfig::default().set_depth_limit(raw).depth_limit())
    }

    pub fn collection_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(BuilderConfig::default()
            .set_collection_size(raw)
            .collection_size())
    }
}

/// Per-builder defaults and limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    bool_default: bool,
    int_default: i32,
    long_default: i64,
    float_default: f32,
    double_default: f64,
    decimal_default: Decimal,
    char_default: char,
    byte_default: i8,
    string_default: String,
    #[serde(deserialize_with = "clamped::depth_limit")]
    depth_limit: u32,
    #[serde(deserialize_with = "clamped::collection_size")]
    collection_size: usize,
    ignore_bare_objects: bool,
    build_nested_lists: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            bool_default: true,
            int_default: 1,
            long_default: 1,
            float_default: 1.0,
            double_default: 1.0,
            decimal_default: Decimal::ONE,
            char_default: 'c',
            byte_default: 1,
            string_default: DEFAULT_STRING.to_string(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            collection_size: DEFAULT_COLLECTION_SIZE,
            ignore_bare_objects: true,
            build_nested_lists: false,
        }
    }
}

impl BuilderConfig {
    /// Defaults with the string default taken from the process-wide value
    pub fn seeded() -> Self {
        Self {
            string_default: global_string_default(),
            ..Self::default()
        }
    }

    /// Load a configuration from a TOML document; missing keys keep defaults
    ///
    /// A negative depth limit clamps to zero and a non-positive collection
    /// size keeps the default, exactly as the setters do.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Render this configuration as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Boolean default
    pub fn bool_default(&self) -> bool {
        self.bool_default
    }

    /// Set the boolean default
    pub fn set_bool_default(&mut self, value: bool) -> &mut Self {
        self.bool_default = value;
        self
    }

    /// 32-bit integer default
    pub fn int_default(&self) -> i32 {
        self.int_default
    }

    /// Set the 32-bit integer default
    pub fn set_int_default(&mut self, value: i32) -> &mut Self {
        self.int_default = value;
        self
    }

    /// 64-bit integer default
    pub fn long_default(&self) -> i64 {
        self.long_default
    }

    /// Set the 64-bit integer default
    pub fn set_long_default(&mut self, value: i64) -> &mut Self {
        self.long_default = value;
        self
    }

    /// 32-bit float default
    pub fn float_default(&self) -> f32 {
        self.float_default
    }

    /// Set the 32-bit float default
    pub fn set_float_default(&mut self, value: f32) -> &mut Self {
        self.float_default = value;
        self
    }

    /// 64-bit float default
    pub fn double_default(&self) -> f64 {
        self.double_default
    }

    /// Set the 64-bit float default
    pub fn set_double_default(&mut self, value: f64) -> &mut Self {
        self.double_default = value;
        self
    }

    /// Decimal default
    pub fn decimal_default(&self) -> Decimal {
        self.decimal_default
    }

    /// Set the decimal default
    pub fn set_decimal_default(&mut self, value: Decimal) -> &mut Self {
        self.decimal_default = value;
        self
    }

    /// Character default
    pub fn char_default(&self) -> char {
        self.char_default
    }

    /// Set the character default
    pub fn set_char_default(&mut self, value: char) -> &mut Self {
        self.char_default = value;
        self
    }

    /// Byte default
    pub fn byte_default(&self) -> i8 {
        self.byte_default
    }

    /// Set the byte default
    pub fn set_byte_default(&mut self, value: i8) -> &mut Self {
        self.byte_default = value;
        self
    }

    /// String default
    pub fn string_default(&self) -> &str {
        &self.string_default
    }

    /// Set the string default
    pub fn set_string_default(&mut self, value: impl Into<String>) -> &mut Self {
        self.string_default = value.into();
        self
    }

    /// Number of nested composite levels populated below the root
    pub fn depth_limit(&self) -> u32 {
        self.depth_limit
    }

    /// Set the depth limit; negative input clamps to zero
    pub fn set_depth_limit(&mut self, limit: i64) -> &mut Self {
        self.depth_limit = u32::try_from(limit.max(0)).unwrap_or(u32::MAX);
        self
    }

    /// Size of synthesized arrays, nested lists and `build_list`
    pub fn collection_size(&self) -> usize {
        self.collection_size
    }

    /// Set the collection size; non-positive input keeps the current value
    pub fn set_collection_size(&mut self, size: i64) -> &mut Self {
        if size > 0 {
            self.collection_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        self
    }

    /// Whether bare `Box<dyn Any>` values are suppressed
    pub fn ignore_bare_objects(&self) -> bool {
        self.ignore_bare_objects
    }

    /// Choose whether bare `Box<dyn Any>` values are suppressed
    pub fn set_ignore_bare_objects(&mut self, ignore: bool) -> &mut Self {
        self.ignore_bare_objects = ignore;
        self
    }

    /// Whether list-like mutator arguments are filled with elements
    pub fn build_nested_lists(&self) -> bool {
        self.build_nested_lists
    }

    /// Choose whether list-like mutator arguments are filled with elements
    pub fn set_build_nested_lists(&mut self, build: bool) -> &mut Self {
        self.build_nested_lists = build;
        self
    }

    /// Exported default for one category
    pub fn default_value(&self, kind: PrimitiveKind) -> DefaultValue {
        match kind {
            PrimitiveKind::Boolean => DefaultValue::Boolean(self.bool_default),
            PrimitiveKind::Int => DefaultValue::Int(self.int_default),
            PrimitiveKind::Long => DefaultValue::Long(self.long_default),
            PrimitiveKind::Float => DefaultValue::Float(self.float_default),
            PrimitiveKind::Double => DefaultValue::Double(self.double_default),
            PrimitiveKind::Decimal => DefaultValue::Decimal(self.decimal_default),
            PrimitiveKind::Char => DefaultValue::Char(self.char_default),
            PrimitiveKind::Byte => DefaultValue::Byte(self.byte_default),
            PrimitiveKind::String => DefaultValue::String(self.string_default.clone()),
        }
    }

    /// Replace the default of the category `value` belongs to
    pub fn set_default_value(&mut self, value: DefaultValue) -> &mut Self {
        match value {
            DefaultValue::Boolean(v) => self.bool_default = v,
            DefaultValue::Int(v) => self.int_default = v,
            DefaultValue::Long(v) => self.long_default = v,
            DefaultValue::Float(v) => self.float_default = v,
            DefaultValue::Double(v) => self.double_default = v,
            DefaultValue::Decimal(v) => self.decimal_default = v,
            DefaultValue::Char(v) => self.char_default = v,
            DefaultValue::Byte(v) => self.byte_default = v,
            DefaultValue::String(v) => self.string_default = v,
        }
        self
    }

    /// Synthesized value for one primitive-like category
    pub fn default_for(&self, kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Boolean => Value::Bool(self.bool_default),
            PrimitiveKind::Int => Value::Int(self.int_default),
            PrimitiveKind::Long => Value::Long(self.long_default),
            PrimitiveKind::Float => Value::Float(self.float_default),
            PrimitiveKind::Double => Value::Double(self.double_default),
            PrimitiveKind::Decimal => Value::Decimal(self.decimal_default),
            PrimitiveKind::Char => Value::Char(self.char_default),
            PrimitiveKind::Byte => Value::Byte(self.byte_default),
            PrimitiveKind::String => Value::Str(self.string_default.clone()),
        }
    }

    /// Every category default, keyed by category name
    pub fn export_defaults(&self) -> IndexMap<&'static str, DefaultValue> {
        PrimitiveKind::ALL
            .iter()
            .map(|kind| (kind.name(), self.default_value(*kind)))
            .collect()
    }

    /// Apply defaults previously produced by [`Self::export_defaults`]
    ///
    /// Entries whose key does not name the category of their value are
    /// skipped.
    pub fn import_defaults(&mut self, defaults: &IndexMap<&'static str, DefaultValue>) -> &mut Self {
        for (name, value) in defaults {
            if PrimitiveKind::from_name(name) != Some(value.kind()) {
                tracing::debug!(category = %name, value = ?value, "Skipping mismatched default");
                continue;
            }
            self.set_default_value(value.clone());
        }
        self
    }
}
