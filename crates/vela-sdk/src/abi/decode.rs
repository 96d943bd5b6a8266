//! Binary decoding

use num_bigint::{BigInt, BigUint, Sign};

use super::types::TypeValue;
use super::value::{Field, Value};
use super::{AbiError, EncodeMode};

/// Decode a value of type `ty` from the front of `bytes`.
///
/// Returns the value and the number of bytes consumed. Top-level decoding of
/// variable-size types consumes the whole buffer.
pub fn decode(bytes: &[u8], ty: &TypeValue, mode: EncodeMode) -> Result<(Value, usize), AbiError> {
    let mut reader = Reader::new(bytes);
    let value = reader.read(ty, mode)?;
    Ok((value, reader.offset))
}

/// Decode a complete top-level buffer; trailing bytes are an error
pub fn decode_top_level(bytes: &[u8], ty: &TypeValue) -> Result<Value, AbiError> {
    let (value, consumed) = decode(bytes, ty, EncodeMode::TopLevel)?;
    if consumed != bytes.len() {
        return Err(AbiError::Decode(format!(
            "{} trailing bytes after {}",
            bytes.len() - consumed,
            ty
        )));
    }
    Ok(value)
}

/// Decode a nested value from the front of `bytes`
pub fn decode_nested(bytes: &[u8], ty: &TypeValue) -> Result<(Value, usize), AbiError> {
    decode(bytes, ty, EncodeMode::Nested)
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], AbiError> {
        if self.remaining() < len {
            return Err(AbiError::Decode(format!(
                "need {} bytes at offset {}, only {} left",
                len,
                self.offset,
                self.remaining()
            )));
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.offset..];
        self.offset = self.data.len();
        slice
    }

    fn read_length(&mut self) -> Result<usize, AbiError> {
        let bytes = self.take(4)?;
        let len = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        Ok(len as usize)
    }

    fn read(&mut self, ty: &TypeValue, mode: EncodeMode) -> Result<Value, AbiError> {
        match ty {
            TypeValue::Numeric { signed, size } => self.read_numeric(*signed, *size, mode),
            TypeValue::Boolean => self.read_bool(mode),
            TypeValue::Address => {
                let bytes = self.take(vela_primitives::ADDRESS_LENGTH)?;
                let address = vela_primitives::Address::from_slice(bytes)
                    .map_err(|e| AbiError::Decode(e.to_string()))?;
                Ok(Value::Address(address))
            }
            TypeValue::Bytes => {
                let bytes = match mode {
                    EncodeMode::Nested => {
                        let len = self.read_length()?;
                        self.take(len)?
                    }
                    EncodeMode::TopLevel => self.take_rest(),
                };
                Ok(Value::Bytes(bytes.to_vec()))
            }
            TypeValue::List(item) => {
                let items = match mode {
                    EncodeMode::Nested => {
                        let count = self.read_length()?;
                        self.read_count(item, count)?
                    }
                    EncodeMode::TopLevel => self.read_until_end(item)?,
                };
                Ok(Value::List {
                    item: (**item).clone(),
                    items,
                })
            }
            TypeValue::Array { inner, length } => Ok(Value::Array {
                item: (**inner).clone(),
                items: self.read_count(inner, *length)?,
            }),
            TypeValue::Struct { name, fields } => {
                let mut values = Vec::with_capacity(fields.len());
                for field in fields {
                    values.push(Field::new(
                        field.name.clone(),
                        self.read(&field.ty, EncodeMode::Nested)?,
                    ));
                }
                Ok(Value::Struct {
                    name: name.clone(),
                    fields: values,
                })
            }
            TypeValue::Tuple(members) => Ok(Value::Tuple(self.read_members(members)?)),
            TypeValue::Multi(members) => Ok(Value::Multi(self.read_members(members)?)),
            TypeValue::Enum { variants, .. } => {
                let discriminant = if mode == EncodeMode::TopLevel && self.remaining() == 0 {
                    0
                } else {
                    self.take(1)?[0]
                };
                let variant = variants
                    .iter()
                    .find(|v| v.discriminant == discriminant)
                    .ok_or_else(|| {
                        AbiError::Decode(format!("unknown discriminant {} for {}", discriminant, ty))
                    })?;
                let mut fields = Vec::with_capacity(variant.fields.len());
                for field in &variant.fields {
                    fields.push(self.read(&field.ty, EncodeMode::Nested)?);
                }
                Ok(Value::Enum {
                    ty: Box::new(ty.clone()),
                    variant: variant.name.clone(),
                    fields,
                })
            }
            TypeValue::Option(inner) => Ok(Value::Option {
                inner: (**inner).clone(),
                value: self.read_maybe(inner, mode)?,
            }),
            TypeValue::Optional(inner) => Ok(Value::Optional {
                inner: (**inner).clone(),
                value: self.read_maybe(inner, mode)?,
            }),
            TypeValue::Variadic { inner, counted } => {
                let items = if *counted {
                    let count = self.read_length()?;
                    self.read_count(inner, count)?
                } else {
                    self.read_until_end(inner)?
                };
                Ok(Value::Variadic {
                    item: (**inner).clone(),
                    counted: *counted,
                    items,
                })
            }
        }
    }

    fn read_numeric(
        &mut self,
        signed: bool,
        size: Option<usize>,
        mode: EncodeMode,
    ) -> Result<Value, AbiError> {
        let bytes = match (size, mode) {
            (Some(width), EncodeMode::Nested) => self.take(width)?,
            (Some(width), EncodeMode::TopLevel) => {
                if self.remaining() > width {
                    return Err(AbiError::Decode(format!(
                        "{} bytes for a {}-byte integer",
                        self.remaining(),
                        width
                    )));
                }
                self.take_rest()
            }
            (None, EncodeMode::Nested) => {
                let len = self.read_length()?;
                self.take(len)?
            }
            (None, EncodeMode::TopLevel) => self.take_rest(),
        };

        let value = if signed {
            BigInt::from_signed_bytes_be(bytes)
        } else {
            BigInt::from_biguint(Sign::Plus, BigUint::from_bytes_be(bytes))
        };
        Ok(Value::Numeric {
            signed,
            size,
            value,
        })
    }

    fn read_bool(&mut self, mode: EncodeMode) -> Result<Value, AbiError> {
        let byte = match mode {
            EncodeMode::Nested => self.take(1)?[0],
            EncodeMode::TopLevel => match self.take_rest() {
                [] => 0,
                [b] => *b,
                other => {
                    return Err(AbiError::Decode(format!(
                        "{} bytes for a boolean",
                        other.len()
                    )))
                }
            },
        };
        match byte {
            0 => Ok(Value::Boolean(false)),
            1 => Ok(Value::Boolean(true)),
            other => Err(AbiError::Decode(format!("invalid boolean byte {:#04x}", other))),
        }
    }

    fn read_maybe(
        &mut self,
        inner: &TypeValue,
        mode: EncodeMode,
    ) -> Result<Option<Box<Value>>, AbiError> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        Ok(Some(Box::new(self.read(inner, mode)?)))
    }

    fn read_members(&mut self, members: &[TypeValue]) -> Result<Vec<Value>, AbiError> {
        members
            .iter()
            .map(|m| self.read(m, EncodeMode::Nested))
            .collect()
    }

    fn read_count(&mut self, item: &TypeValue, count: usize) -> Result<Vec<Value>, AbiError> {
        // cap the preallocation; a bogus count must fail on read, not on allocate
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(self.read(item, EncodeMode::Nested)?);
        }
        Ok(items)
    }

    fn read_until_end(&mut self, item: &TypeValue) -> Result<Vec<Value>, AbiError> {
        let mut items = Vec::new();
        while self.remaining() > 0 {
            let before = self.offset;
            items.push(self.read(item, EncodeMode::Nested)?);
            if self.offset == before {
                return Err(AbiError::Decode(format!(
                    "{} consumed no input while decoding a sequence",
                    item
                )));
            }
        }
        Ok(items)
    }
}
