//! Type descriptors for contract arguments and results

use std::fmt;

/// Tag of a binary type, used to pick the encode/decode rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryType {
    /// Integer of fixed or variable width
    Numeric,
    /// Boolean
    Boolean,
    /// 32-byte address
    Address,
    /// Length-prefixed byte buffer
    Bytes,
    /// Count-prefixed sequence
    List,
    /// Sequence with a statically known length
    Array,
    /// Named record
    Struct,
    /// Anonymous record
    Tuple,
    /// Discriminated union
    Enum,
    /// Zero-or-one value inside a composite
    Option,
    /// Zero-or-one trailing argument or result
    Optional,
    /// Several top-level values taken together
    Multi,
    /// Any number of trailing values
    Variadic,
}

/// Named field of a struct type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Field type
    pub ty: TypeValue,
}

impl FieldDefinition {
    /// Create a field definition
    pub fn new(name: impl Into<String>, ty: TypeValue) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// One variant of an enum type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Variant name
    pub name: String,
    /// Byte written on the wire
    pub discriminant: u8,
    /// Payload fields, nested-encoded after the discriminant
    pub fields: Vec<FieldDefinition>,
}

impl EnumVariant {
    /// Variant without payload
    pub fn unit(name: impl Into<String>, discriminant: u8) -> Self {
        Self {
            name: name.into(),
            discriminant,
            fields: Vec::new(),
        }
    }

    /// Variant carrying fields
    pub fn with_fields(
        name: impl Into<String>,
        discriminant: u8,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            discriminant,
            fields,
        }
    }
}

/// Type descriptor. Immutable once built; cheap enough to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeValue {
    /// Integer, `size == None` means arbitrary precision
    Numeric {
        /// Two's complement when true
        signed: bool,
        /// Width in bytes for fixed-size integers
        size: Option<usize>,
    },
    /// Boolean
    Boolean,
    /// 32-byte address
    Address,
    /// Byte buffer
    Bytes,
    /// Variable-length sequence
    List(Box<TypeValue>),
    /// Fixed-length sequence
    Array {
        /// Element type
        inner: Box<TypeValue>,
        /// Element count
        length: usize,
    },
    /// Named record
    Struct {
        /// Struct name
        name: String,
        /// Fields in declaration order
        fields: Vec<FieldDefinition>,
    },
    /// Anonymous record
    Tuple(Vec<TypeValue>),
    /// Discriminated union
    Enum {
        /// Enum name
        name: String,
        /// Variants in declaration order
        variants: Vec<EnumVariant>,
    },
    /// Zero-or-one value inside a composite
    Option(Box<TypeValue>),
    /// Zero-or-one trailing argument or result
    Optional(Box<TypeValue>),
    /// Several top-level values taken together
    Multi(Vec<TypeValue>),
    /// Any number of trailing values
    Variadic {
        /// Element type
        inner: Box<TypeValue>,
        /// Whether an explicit count precedes the elements
        counted: bool,
    },
}

impl TypeValue {
    /// `u8`
    pub fn u8() -> Self {
        Self::fixed(false, 1)
    }

    /// `u16`
    pub fn u16() -> Self {
        Self::fixed(false, 2)
    }

    /// `u32`
    pub fn u32() -> Self {
        Self::fixed(false, 4)
    }

    /// `u64`
    pub fn u64() -> Self {
        Self::fixed(false, 8)
    }

    /// `usize`, four bytes on the wire
    pub fn usize() -> Self {
        Self::fixed(false, 4)
    }

    /// Arbitrary-precision unsigned
    pub fn big_uint() -> Self {
        TypeValue::Numeric {
            signed: false,
            size: None,
        }
    }

    /// `i8`
    pub fn i8() -> Self {
        Self::fixed(true, 1)
    }

    /// `i16`
    pub fn i16() -> Self {
        Self::fixed(true, 2)
    }

    /// `i32`
    pub fn i32() -> Self {
        Self::fixed(true, 4)
    }

    /// `i64`
    pub fn i64() -> Self {
        Self::fixed(true, 8)
    }

    /// `isize`, four bytes on the wire
    pub fn isize() -> Self {
        Self::fixed(true, 4)
    }

    /// Arbitrary-precision signed
    pub fn big_int() -> Self {
        TypeValue::Numeric {
            signed: true,
            size: None,
        }
    }

    fn fixed(signed: bool, size: usize) -> Self {
        TypeValue::Numeric {
            signed,
            size: Some(size),
        }
    }

    /// List of `inner`
    pub fn list(inner: TypeValue) -> Self {
        TypeValue::List(Box::new(inner))
    }

    /// Array of `length` elements
    pub fn array(inner: TypeValue, length: usize) -> Self {
        TypeValue::Array {
            inner: Box::new(inner),
            length,
        }
    }

    /// Option of `inner`
    pub fn option(inner: TypeValue) -> Self {
        TypeValue::Option(Box::new(inner))
    }

    /// Optional of `inner`
    pub fn optional(inner: TypeValue) -> Self {
        TypeValue::Optional(Box::new(inner))
    }

    /// Variadic of `inner`
    pub fn variadic(inner: TypeValue, counted: bool) -> Self {
        TypeValue::Variadic {
            inner: Box::new(inner),
            counted,
        }
    }

    /// Binary tag
    pub fn binary_type(&self) -> BinaryType {
        match self {
            TypeValue::Numeric { .. } => BinaryType::Numeric,
            TypeValue::Boolean => BinaryType::Boolean,
            TypeValue::Address => BinaryType::Address,
            TypeValue::Bytes => BinaryType::Bytes,
            TypeValue::List(_) => BinaryType::List,
            TypeValue::Array { .. } => BinaryType::Array,
            TypeValue::Struct { .. } => BinaryType::Struct,
            TypeValue::Tuple(_) => BinaryType::Tuple,
            TypeValue::Enum { .. } => BinaryType::Enum,
            TypeValue::Option(_) => BinaryType::Option,
            TypeValue::Optional(_) => BinaryType::Optional,
            TypeValue::Multi(_) => BinaryType::Multi,
            TypeValue::Variadic { .. } => BinaryType::Variadic,
        }
    }

    /// Only numerics can be signed
    pub fn is_signed(&self) -> bool {
        matches!(self, TypeValue::Numeric { signed: true, .. })
    }

    /// Width in bytes when statically known, `None` for variable-size types
    pub fn size_in_bytes(&self) -> Option<usize> {
        match self {
            TypeValue::Numeric { size, .. } => *size,
            TypeValue::Boolean => Some(1),
            TypeValue::Address => Some(vela_primitives::ADDRESS_LENGTH),
            TypeValue::Array { inner, length } => inner.size_in_bytes().map(|s| s * length),
            TypeValue::Tuple(members) => sum_sizes(members.iter()),
            TypeValue::Struct { fields, .. } => sum_sizes(fields.iter().map(|f| &f.ty)),
            _ => None,
        }
    }

    /// Whether the width is statically known
    pub fn is_fixed_size(&self) -> bool {
        self.size_in_bytes().is_some()
    }

    /// Inner type of single-parameter containers
    pub fn inner(&self) -> Option<&TypeValue> {
        match self {
            TypeValue::List(inner)
            | TypeValue::Option(inner)
            | TypeValue::Optional(inner)
            | TypeValue::Array { inner, .. }
            | TypeValue::Variadic { inner, .. } => Some(inner),
            _ => None,
        }
    }

    /// Member types of Tuple, Multi and Struct, in declaration order
    pub fn members(&self) -> Vec<&TypeValue> {
        match self {
            TypeValue::Tuple(members) | TypeValue::Multi(members) => members.iter().collect(),
            TypeValue::Struct { fields, .. } => fields.iter().map(|f| &f.ty).collect(),
            _ => Vec::new(),
        }
    }

    /// Conventional type name, e.g. `u32`, `List<Address>`
    pub fn name(&self) -> String {
        match self {
            TypeValue::Numeric { signed, size } => match (signed, size) {
                (false, None) => "BigUint".to_string(),
                (true, None) => "BigInt".to_string(),
                (false, Some(n)) => format!("u{}", n * 8),
                (true, Some(n)) => format!("i{}", n * 8),
            },
            TypeValue::Boolean => "bool".to_string(),
            TypeValue::Address => "Address".to_string(),
            TypeValue::Bytes => "bytes".to_string(),
            TypeValue::List(inner) => format!("List<{}>", inner.name()),
            TypeValue::Array { inner, length } => format!("array{}<{}>", length, inner.name()),
            TypeValue::Struct { name, .. } | TypeValue::Enum { name, .. } => name.clone(),
            TypeValue::Tuple(members) => format!("tuple<{}>", join_names(members)),
            TypeValue::Option(inner) => format!("Option<{}>", inner.name()),
            TypeValue::Optional(inner) => format!("optional<{}>", inner.name()),
            TypeValue::Multi(members) => format!("multi<{}>", join_names(members)),
            TypeValue::Variadic { inner, counted } => {
                if *counted {
                    format!("counted-variadic<{}>", inner.name())
                } else {
                    format!("variadic<{}>", inner.name())
                }
            }
        }
    }
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn sum_sizes<'a>(types: impl Iterator<Item = &'a TypeValue>) -> Option<usize> {
    types.map(TypeValue::size_in_bytes).sum()
}

fn join_names(types: &[TypeValue]) -> String {
    types.iter().map(TypeValue::name).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_sizes() {
        assert_eq!(TypeValue::u8().size_in_bytes(), Some(1));
        assert_eq!(TypeValue::u64().size_in_bytes(), Some(8));
        assert_eq!(TypeValue::usize().size_in_bytes(), Some(4));
        assert_eq!(TypeValue::Address.size_in_bytes(), Some(32));
        assert_eq!(TypeValue::big_uint().size_in_bytes(), None);
        assert_eq!(TypeValue::Bytes.size_in_bytes(), None);
        assert_eq!(TypeValue::array(TypeValue::u16(), 3).size_in_bytes(), Some(6));
        assert_eq!(
            TypeValue::Tuple(vec![TypeValue::u8(), TypeValue::Bytes]).size_in_bytes(),
            None
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(TypeValue::u32().name(), "u32");
        assert_eq!(TypeValue::i64().name(), "i64");
        assert_eq!(TypeValue::big_uint().name(), "BigUint");
        assert_eq!(TypeValue::list(TypeValue::Address).name(), "List<Address>");
        assert_eq!(
            TypeValue::variadic(TypeValue::u8(), true).to_string(),
            "counted-variadic<u8>"
        );
    }

    #[test]
    fn test_binary_type_and_inner() {
        let ty = TypeValue::optional(TypeValue::Bytes);
        assert_eq!(ty.binary_type(), BinaryType::Optional);
        assert_eq!(ty.inner(), Some(&TypeValue::Bytes));
        assert!(TypeValue::i8().is_signed());
        assert!(!TypeValue::Boolean.is_signed());
    }

    #[test]
    fn test_members_preserve_order() {
        let ty = TypeValue::Struct {
            name: "Pair".to_string(),
            fields: vec![
                FieldDefinition::new("a", TypeValue::u8()),
                FieldDefinition::new("b", TypeValue::Bytes),
            ],
        };
        assert_eq!(ty.members(), vec![&TypeValue::u8(), &TypeValue::Bytes]);
    }
}
