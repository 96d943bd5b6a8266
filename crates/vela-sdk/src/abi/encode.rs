//! Binary encoding

use num_bigint::{BigInt, Sign};
use num_traits::Zero;

use super::types::TypeValue;
use super::value::{find_variant_by_name, Value};
use super::{AbiError, EncodeMode};

/// Encode a value in the given mode
pub fn encode(value: &Value, mode: EncodeMode) -> Result<Vec<u8>, AbiError> {
    let mut out = Vec::new();
    encode_into(value, mode, &mut out)?;
    Ok(out)
}

/// Top-level encoding, used for standalone arguments and results
pub fn encode_top_level(value: &Value) -> Result<Vec<u8>, AbiError> {
    encode(value, EncodeMode::TopLevel)
}

/// Nested encoding, used inside composites
pub fn encode_nested(value: &Value) -> Result<Vec<u8>, AbiError> {
    encode(value, EncodeMode::Nested)
}

fn encode_into(value: &Value, mode: EncodeMode, out: &mut Vec<u8>) -> Result<(), AbiError> {
    match value {
        Value::Numeric {
            signed,
            size,
            value,
        } => encode_numeric(value, *signed, *size, mode, out),
        Value::Boolean(b) => {
            match (mode, b) {
                (EncodeMode::Nested, _) => out.push(u8::from(*b)),
                (EncodeMode::TopLevel, true) => out.push(1),
                (EncodeMode::TopLevel, false) => {}
            }
            Ok(())
        }
        Value::Address(address) => {
            out.extend_from_slice(address.as_bytes());
            Ok(())
        }
        Value::Bytes(bytes) => {
            if mode == EncodeMode::Nested {
                push_length(bytes.len(), out)?;
            }
            out.extend_from_slice(bytes);
            Ok(())
        }
        Value::List { item, items } => {
            if mode == EncodeMode::Nested {
                push_length(items.len(), out)?;
            }
            encode_members(items, Some(item), out)
        }
        Value::Array { item, items } => encode_members(items, Some(item), out),
        Value::Struct { fields, .. } => {
            for field in fields {
                encode_into(&field.value, EncodeMode::Nested, out)?;
            }
            Ok(())
        }
        Value::Tuple(members) | Value::Multi(members) => encode_members(members, None, out),
        Value::Enum {
            ty,
            variant,
            fields,
        } => {
            let definition = find_variant_by_name(ty, variant)?;
            if definition.fields.len() != fields.len() {
                return Err(AbiError::Encode(format!(
                    "variant {} expects {} fields, got {}",
                    variant,
                    definition.fields.len(),
                    fields.len()
                )));
            }
            let unit_zero = definition.discriminant == 0 && fields.is_empty();
            if !(mode == EncodeMode::TopLevel && unit_zero) {
                out.push(definition.discriminant);
            }
            for (field, expected) in fields.iter().zip(&definition.fields) {
                check_type(field, &expected.ty)?;
                encode_into(field, EncodeMode::Nested, out)?;
            }
            Ok(())
        }
        Value::Option { inner, value } | Value::Optional { inner, value } => match value {
            Some(held) => {
                check_type(held, inner)?;
                encode_into(held, mode, out)
            }
            None => Ok(()),
        },
        Value::Variadic {
            item,
            counted,
            items,
        } => {
            if *counted {
                push_length(items.len(), out)?;
            }
            encode_members(items, Some(item), out)
        }
    }
}

fn encode_members(
    items: &[Value],
    expected: Option<&TypeValue>,
    out: &mut Vec<u8>,
) -> Result<(), AbiError> {
    for item in items {
        if let Some(expected) = expected {
            check_type(item, expected)?;
        }
        encode_into(item, EncodeMode::Nested, out)?;
    }
    Ok(())
}

fn check_type(value: &Value, expected: &TypeValue) -> Result<(), AbiError> {
    let actual = value.type_value();
    if actual != *expected {
        return Err(AbiError::TypeMismatch {
            expected: expected.name(),
            actual: actual.name(),
        });
    }
    Ok(())
}

fn push_length(len: usize, out: &mut Vec<u8>) -> Result<(), AbiError> {
    let len = u32::try_from(len)
        .map_err(|_| AbiError::Encode(format!("length {} exceeds u32", len)))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

/// Minimal big-endian form: unsigned magnitude or two's complement, zero is empty
fn minimal_bytes(value: &BigInt, signed: bool) -> Result<Vec<u8>, AbiError> {
    if value.is_zero() {
        return Ok(Vec::new());
    }
    if signed {
        return Ok(value.to_signed_bytes_be());
    }
    if value.sign() == Sign::Minus {
        return Err(AbiError::Encode(format!(
            "negative value {} for unsigned type",
            value
        )));
    }
    Ok(value.magnitude().to_bytes_be())
}

fn encode_numeric(
    value: &BigInt,
    signed: bool,
    size: Option<usize>,
    mode: EncodeMode,
    out: &mut Vec<u8>,
) -> Result<(), AbiError> {
    let bytes = minimal_bytes(value, signed)?;

    match (size, mode) {
        (Some(width), mode) => {
            if bytes.len() > width {
                return Err(AbiError::Encode(format!(
                    "{} does not fit in {} bytes",
                    value, width
                )));
            }
            if mode == EncodeMode::Nested {
                let pad = if value.sign() == Sign::Minus { 0xff } else { 0x00 };
                out.extend(std::iter::repeat(pad).take(width - bytes.len()));
            }
            out.extend_from_slice(&bytes);
        }
        (None, EncodeMode::Nested) => {
            push_length(bytes.len(), out)?;
            out.extend_from_slice(&bytes);
        }
        (None, EncodeMode::TopLevel) => out.extend_from_slice(&bytes),
    }
    Ok(())
}
