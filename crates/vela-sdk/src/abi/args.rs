//! Argument serialization for call data and queries

use super::encode::encode_top_level;
use super::value::Value;
use super::AbiError;

/// Separator between the function name and each argument
pub const ARGS_SEPARATOR: char = '@';

/// Hex-encode each argument in order.
///
/// Every argument is top-level encoded. A `Multi` or `Variadic` expands to
/// one entry per member, and a missing `Optional` contributes nothing.
pub fn encode_args(args: &[Value]) -> Result<Vec<String>, AbiError> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        push_arg(arg, &mut out)?;
    }
    Ok(out)
}

fn push_arg(arg: &Value, out: &mut Vec<String>) -> Result<(), AbiError> {
    match arg {
        Value::Optional { value, .. } => {
            if let Some(inner) = value {
                push_arg(inner, out)?;
            }
        }
        Value::Multi(members) => {
            for member in members {
                push_arg(member, out)?;
            }
        }
        Value::Variadic {
            counted, items, ..
        } => {
            if *counted {
                out.push(hex::encode(encode_top_level(&Value::u32(
                    u32::try_from(items.len())
                        .map_err(|_| AbiError::Encode("too many variadic items".to_string()))?,
                ))?));
            }
            for item in items {
                push_arg(item, out)?;
            }
        }
        other => out.push(hex::encode(encode_top_level(other)?)),
    }
    Ok(())
}

/// Build `function@arg1@arg2...` call data
pub fn encode_call_data(function: &str, args: &[Value]) -> Result<String, AbiError> {
    let mut data = function.to_string();
    for arg in encode_args(args)? {
        data.push(ARGS_SEPARATOR);
        data.push_str(&arg);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::TypeValue;

    #[test]
    fn test_call_data_single_arg() {
        assert_eq!(encode_call_data("add", &[Value::u32(10)]).unwrap(), "add@0a");
    }

    #[test]
    fn test_missing_optional_contributes_nothing() {
        assert_eq!(
            encode_call_data("add", &[Value::missing(TypeValue::u32())]).unwrap(),
            "add"
        );
        assert_eq!(
            encode_call_data("add", &[Value::optional(Value::u32(10))]).unwrap(),
            "add@0a"
        );
    }

    #[test]
    fn test_zero_arg_is_empty_segment() {
        assert_eq!(encode_call_data("set", &[Value::u32(0)]).unwrap(), "set@");
    }

    #[test]
    fn test_multi_and_variadic_expand() {
        let args = [
            Value::Multi(vec![Value::string("ab"), Value::u8(1)]),
            Value::variadic(TypeValue::u16(), vec![Value::u16(2), Value::u16(3)]),
        ];
        assert_eq!(encode_args(&args).unwrap(), vec!["6162", "01", "02", "03"]);
    }

    #[test]
    fn test_counted_variadic_leads_with_count() {
        let arg = Value::Variadic {
            item: TypeValue::u8(),
            counted: true,
            items: vec![Value::u8(9), Value::u8(8)],
        };
        assert_eq!(encode_args(&[arg]).unwrap(), vec!["02", "09", "08"]);
    }

    #[test]
    fn test_hex_is_lowercase() {
        let data = encode_call_data("f", &[Value::Bytes(vec![0xAB, 0xCD])]).unwrap();
        assert_eq!(data, "f@abcd");
    }
}
