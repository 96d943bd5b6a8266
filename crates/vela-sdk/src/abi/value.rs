//! Typed values exchanged with contracts

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;
use vela_primitives::Address;

use super::types::{EnumVariant, FieldDefinition, TypeValue};
use super::AbiError;

/// Field of a struct value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field value
    pub value: Value,
}

impl Field {
    /// Create a field
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Typed value. Each variant carries what is needed to rebuild its
/// [`TypeValue`], so the tag can never disagree with the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Integer
    Numeric {
        /// Two's complement when true
        signed: bool,
        /// Width in bytes, `None` for arbitrary precision
        size: Option<usize>,
        /// The number
        value: BigInt,
    },
    /// Boolean
    Boolean(bool),
    /// 32-byte address
    Address(Address),
    /// Byte buffer
    Bytes(Vec<u8>),
    /// Variable-length sequence
    List {
        /// Element type
        item: TypeValue,
        /// Elements
        items: Vec<Value>,
    },
    /// Fixed-length sequence; the length is `items.len()`
    Array {
        /// Element type
        item: TypeValue,
        /// Elements
        items: Vec<Value>,
    },
    /// Named record
    Struct {
        /// Struct name
        name: String,
        /// Fields in declaration order
        fields: Vec<Field>,
    },
    /// Anonymous record
    Tuple(Vec<Value>),
    /// Active variant of an enum
    Enum {
        /// Full enum type, needed to resolve discriminants
        ty: Box<TypeValue>,
        /// Name of the active variant
        variant: String,
        /// Payload fields of the active variant
        fields: Vec<Value>,
    },
    /// Zero-or-one value inside a composite
    Option {
        /// Inner type
        inner: TypeValue,
        /// The value, if present
        value: Option<Box<Value>>,
    },
    /// Zero-or-one trailing argument or result
    Optional {
        /// Inner type
        inner: TypeValue,
        /// The value, if provided
        value: Option<Box<Value>>,
    },
    /// Several values taken together
    Multi(Vec<Value>),
    /// Any number of trailing values
    Variadic {
        /// Element type
        item: TypeValue,
        /// Whether a count precedes the elements
        counted: bool,
        /// Elements
        items: Vec<Value>,
    },
}

impl Value {
    /// `u8` value
    pub fn u8(v: u8) -> Self {
        Self::numeric(TypeValue::u8(), v)
    }

    /// `u16` value
    pub fn u16(v: u16) -> Self {
        Self::numeric(TypeValue::u16(), v)
    }

    /// `u32` value
    pub fn u32(v: u32) -> Self {
        Self::numeric(TypeValue::u32(), v)
    }

    /// `u64` value
    pub fn u64(v: u64) -> Self {
        Self::numeric(TypeValue::u64(), v)
    }

    /// `i8` value
    pub fn i8(v: i8) -> Self {
        Self::numeric(TypeValue::i8(), v)
    }

    /// `i16` value
    pub fn i16(v: i16) -> Self {
        Self::numeric(TypeValue::i16(), v)
    }

    /// `i32` value
    pub fn i32(v: i32) -> Self {
        Self::numeric(TypeValue::i32(), v)
    }

    /// `i64` value
    pub fn i64(v: i64) -> Self {
        Self::numeric(TypeValue::i64(), v)
    }

    /// Arbitrary-precision unsigned value
    pub fn big_uint(v: impl Into<BigUint>) -> Self {
        Value::Numeric {
            signed: false,
            size: None,
            value: BigInt::from_biguint(Sign::Plus, v.into()),
        }
    }

    /// Arbitrary-precision signed value
    pub fn big_int(v: impl Into<BigInt>) -> Self {
        Value::Numeric {
            signed: true,
            size: None,
            value: v.into(),
        }
    }

    /// Numeric value of the given numeric type. Range is checked when encoding.
    pub fn numeric(ty: TypeValue, value: impl Into<BigInt>) -> Self {
        let (signed, size) = match ty {
            TypeValue::Numeric { signed, size } => (signed, size),
            _ => (false, None),
        };
        Value::Numeric {
            signed,
            size,
            value: value.into(),
        }
    }

    /// UTF-8 string carried as bytes
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Bytes(s.as_ref().as_bytes().to_vec())
    }

    /// List of `item`
    pub fn list(item: TypeValue, items: Vec<Value>) -> Self {
        Value::List { item, items }
    }

    /// Option holding `value`
    pub fn some(value: Value) -> Self {
        Value::Option {
            inner: value.type_value(),
            value: Some(Box::new(value)),
        }
    }

    /// Empty option of `inner`
    pub fn none(inner: TypeValue) -> Self {
        Value::Option { inner, value: None }
    }

    /// Provided optional argument
    pub fn optional(value: Value) -> Self {
        Value::Optional {
            inner: value.type_value(),
            value: Some(Box::new(value)),
        }
    }

    /// Missing optional argument
    pub fn missing(inner: TypeValue) -> Self {
        Value::Optional { inner, value: None }
    }

    /// Variadic of `item`
    pub fn variadic(item: TypeValue, items: Vec<Value>) -> Self {
        Value::Variadic {
            item,
            counted: false,
            items,
        }
    }

    /// Build an enum value, checking the variant exists
    pub fn enum_variant(
        ty: TypeValue,
        variant: impl Into<String>,
        fields: Vec<Value>,
    ) -> Result<Self, AbiError> {
        let variant = variant.into();
        find_variant_by_name(&ty, &variant)?;
        Ok(Value::Enum {
            ty: Box::new(ty),
            variant,
            fields,
        })
    }

    /// Type descriptor of this value
    pub fn type_value(&self) -> TypeValue {
        match self {
            Value::Numeric { signed, size, .. } => TypeValue::Numeric {
                signed: *signed,
                size: *size,
            },
            Value::Boolean(_) => TypeValue::Boolean,
            Value::Address(_) => TypeValue::Address,
            Value::Bytes(_) => TypeValue::Bytes,
            Value::List { item, .. } => TypeValue::list(item.clone()),
            Value::Array { item, items } => TypeValue::array(item.clone(), items.len()),
            Value::Struct { name, fields } => TypeValue::Struct {
                name: name.clone(),
                fields: fields
                    .iter()
                    .map(|f| FieldDefinition::new(f.name.clone(), f.value.type_value()))
                    .collect(),
            },
            Value::Tuple(members) => TypeValue::Tuple(members.iter().map(Value::type_value).collect()),
            Value::Enum { ty, .. } => (**ty).clone(),
            Value::Option { inner, .. } => TypeValue::option(inner.clone()),
            Value::Optional { inner, .. } => TypeValue::optional(inner.clone()),
            Value::Multi(members) => TypeValue::Multi(members.iter().map(Value::type_value).collect()),
            Value::Variadic { item, counted, .. } => TypeValue::variadic(item.clone(), *counted),
        }
    }

    /// Short kind name used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Numeric { .. } => "numeric",
            Value::Boolean(_) => "boolean",
            Value::Address(_) => "address",
            Value::Bytes(_) => "bytes",
            Value::List { .. } => "list",
            Value::Array { .. } => "array",
            Value::Struct { .. } => "struct",
            Value::Tuple(_) => "tuple",
            Value::Enum { .. } => "enum",
            Value::Option { .. } => "option",
            Value::Optional { .. } => "optional",
            Value::Multi(_) => "multi",
            Value::Variadic { .. } => "variadic",
        }
    }

    fn mismatch(&self, expected: &'static str) -> AbiError {
        AbiError::TypeMismatch {
            expected: expected.to_string(),
            actual: self.kind().to_string(),
        }
    }

    /// Numeric payload
    pub fn as_big_int(&self) -> Result<&BigInt, AbiError> {
        match self {
            Value::Numeric { value, .. } => Ok(value),
            other => Err(other.mismatch("numeric")),
        }
    }

    /// Numeric payload as an unsigned integer
    pub fn as_big_uint(&self) -> Result<BigUint, AbiError> {
        self.as_big_int()?
            .to_biguint()
            .ok_or_else(|| AbiError::Decode("negative value where unsigned expected".to_string()))
    }

    /// Numeric payload narrowed to `u64`
    pub fn as_u64(&self) -> Result<u64, AbiError> {
        let value = self.as_big_int()?;
        value
            .to_u64()
            .ok_or_else(|| AbiError::Decode(format!("{} does not fit in u64", value)))
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Result<bool, AbiError> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    /// Address payload
    pub fn as_address(&self) -> Result<&Address, AbiError> {
        match self {
            Value::Address(a) => Ok(a),
            other => Err(other.mismatch("address")),
        }
    }

    /// Byte payload
    pub fn as_bytes(&self) -> Result<&[u8], AbiError> {
        match self {
            Value::Bytes(b) => Ok(b),
            other => Err(other.mismatch("bytes")),
        }
    }

    /// Byte payload decoded as UTF-8
    pub fn as_string(&self) -> Result<String, AbiError> {
        let bytes = self.as_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| AbiError::Decode(e.to_string()))
    }

    /// Elements of a List, Array, Tuple, Multi or Variadic
    pub fn items(&self) -> Result<&[Value], AbiError> {
        match self {
            Value::List { items, .. }
            | Value::Array { items, .. }
            | Value::Variadic { items, .. }
            | Value::Tuple(items)
            | Value::Multi(items) => Ok(items),
            other => Err(other.mismatch("sequence")),
        }
    }

    /// Owned elements of a List, Array, Tuple, Multi or Variadic
    pub fn into_items(self) -> Result<Vec<Value>, AbiError> {
        match self {
            Value::List { items, .. }
            | Value::Array { items, .. }
            | Value::Variadic { items, .. }
            | Value::Tuple(items)
            | Value::Multi(items) => Ok(items),
            other => Err(other.mismatch("sequence")),
        }
    }

    /// Struct field by name
    pub fn field(&self, name: &str) -> Result<&Value, AbiError> {
        match self {
            Value::Struct { fields, .. } => fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| &f.value)
                .ok_or_else(|| AbiError::Decode(format!("no field named {}", name))),
            other => Err(other.mismatch("struct")),
        }
    }

    /// Active enum variant name
    pub fn variant_name(&self) -> Result<&str, AbiError> {
        match self {
            Value::Enum { variant, .. } => Ok(variant),
            other => Err(other.mismatch("enum")),
        }
    }

    /// Content of an Option or Optional
    pub fn as_option(&self) -> Result<Option<&Value>, AbiError> {
        match self {
            Value::Option { value, .. } | Value::Optional { value, .. } => Ok(value.as_deref()),
            other => Err(other.mismatch("option")),
        }
    }
}

impl From<Address> for Value {
    fn from(address: Address) -> Self {
        Value::Address(address)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

pub(crate) fn find_variant_by_name<'a>(
    ty: &'a TypeValue,
    name: &str,
) -> Result<&'a EnumVariant, AbiError> {
    match ty {
        TypeValue::Enum { name: enum_name, variants } => variants
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| AbiError::Encode(format!("{} has no variant {}", enum_name, name))),
        other => Err(AbiError::TypeMismatch {
            expected: "enum".to_string(),
            actual: other.name(),
        }),
    }
}
