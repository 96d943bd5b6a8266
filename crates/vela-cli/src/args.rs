//! Typed arguments on the command line
//!
//! Arguments are written `type:value` (`u32:10`, `address:erd1...`) and
//! result types by name, with `<...>` for containers (`optional<u32>`).

use vela_primitives::{Address, BigInt, BigUint};
use vela_sdk::abi::{TypeValue, Value};

use crate::CliError;

/// Parse a type name such as `u64`, `list<bytes>` or `variadic<address>`
pub fn parse_type(s: &str) -> Result<TypeValue, CliError> {
    let s = s.trim();
    if let Some((outer, rest)) = s.split_once('<') {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| CliError::InvalidArgument(format!("unclosed `<` in {}", s)))?;
        let inner = parse_type(inner)?;
        return match outer {
            "list" => Ok(TypeValue::list(inner)),
            "option" => Ok(TypeValue::option(inner)),
            "optional" => Ok(TypeValue::optional(inner)),
            "variadic" => Ok(TypeValue::variadic(inner, false)),
            "counted-variadic" => Ok(TypeValue::variadic(inner, true)),
            other => Err(CliError::InvalidArgument(format!(
                "unknown container type: {}",
                other
            ))),
        };
    }
    let ty = match s {
        "u8" => TypeValue::u8(),
        "u16" => TypeValue::u16(),
        "u32" => TypeValue::u32(),
        "u64" => TypeValue::u64(),
        "usize" => TypeValue::usize(),
        "biguint" => TypeValue::big_uint(),
        "i8" => TypeValue::i8(),
        "i16" => TypeValue::i16(),
        "i32" => TypeValue::i32(),
        "i64" => TypeValue::i64(),
        "isize" => TypeValue::isize(),
        "bigint" => TypeValue::big_int(),
        "bool" => TypeValue::Boolean,
        "address" => TypeValue::Address,
        "bytes" | "str" => TypeValue::Bytes,
        other => {
            return Err(CliError::InvalidArgument(format!("unknown type: {}", other)));
        }
    };
    Ok(ty)
}

/// Parse a `type:value` argument
pub fn parse_arg(s: &str) -> Result<Value, CliError> {
    let (ty, raw) = s
        .split_once(':')
        .ok_or_else(|| CliError::InvalidArgument(format!("expected type:value, got {}", s)))?;
    match ty {
        "str" => Ok(Value::string(raw)),
        "bytes" => {
            let raw = raw.strip_prefix("0x").unwrap_or(raw);
            Ok(Value::Bytes(
                hex::decode(raw).map_err(|e| CliError::InvalidHex(e.to_string()))?,
            ))
        }
        "address" => Ok(Value::Address(Address::from_bech32(raw)?)),
        "bool" => match raw {
            "true" => Ok(Value::Boolean(true)),
            "false" => Ok(Value::Boolean(false)),
            other => Err(CliError::InvalidArgument(format!("not a bool: {}", other))),
        },
        "biguint" => Ok(Value::big_uint(parse_number::<BigUint>(raw)?)),
        _ => {
            let numeric = parse_type(ty)?;
            if !matches!(numeric, TypeValue::Numeric { .. }) {
                return Err(CliError::InvalidArgument(format!(
                    "{} arguments are not supported on the command line",
                    ty
                )));
            }
            Ok(Value::numeric(numeric, parse_number::<BigInt>(raw)?))
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str) -> Result<T, CliError> {
    raw.trim()
        .parse()
        .map_err(|_| CliError::InvalidArgument(format!("not a number: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vela_sdk::abi::encode_call_data;

    #[test]
    fn test_parse_numeric_args() {
        assert_eq!(parse_arg("u32:10").unwrap(), Value::u32(10));
        assert_eq!(parse_arg("i64:-3").unwrap(), Value::i64(-3));
        assert_eq!(parse_arg("biguint:1000").unwrap(), Value::big_uint(1000u32));
        assert!(parse_arg("u32:ten").is_err());
    }

    #[test]
    fn test_parse_other_args() {
        assert_eq!(parse_arg("str:hello").unwrap(), Value::Bytes(b"hello".to_vec()));
        assert_eq!(parse_arg("bytes:0a0b").unwrap(), Value::Bytes(vec![0x0a, 0x0b]));
        assert_eq!(parse_arg("bool:true").unwrap(), Value::Boolean(true));
        let alice = "erd1qyu5wthldzr8wx5c9ucg8kjagg0jfs53s8nr3zpz3hypefsdd8ssycr6th";
        assert_eq!(
            parse_arg(&format!("address:{}", alice)).unwrap(),
            Value::Address(Address::from_bech32(alice).unwrap())
        );
    }

    #[test]
    fn test_parse_arg_errors() {
        assert!(parse_arg("10").is_err());
        assert!(parse_arg("float:1.5").is_err());
        assert!(parse_arg("bool:yes").is_err());
    }

    #[test]
    fn test_out_of_range_fails_at_encoding() {
        let arg = parse_arg("u8:300").unwrap();
        assert!(encode_call_data("f", &[arg]).is_err());
    }

    #[test]
    fn test_parse_type() {
        assert_eq!(parse_type("u32").unwrap(), TypeValue::u32());
        assert_eq!(
            parse_type("optional<list<u8>>").unwrap(),
            TypeValue::optional(TypeValue::list(TypeValue::u8()))
        );
        assert_eq!(
            parse_type("counted-variadic<address>").unwrap(),
            TypeValue::variadic(TypeValue::Address, true)
        );
        assert!(parse_type("map<u8>").is_err());
        assert!(parse_type("list<u8").is_err());
    }
}
