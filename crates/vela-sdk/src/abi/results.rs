//! Decoding the result buffers of a contract query

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::decode::decode_top_level;
use super::types::TypeValue;
use super::value::Value;
use super::AbiError;

/// How a counted variadic finds its element count among result buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountedVariadicMode {
    /// The next buffer holds the count as a top-level `u32`
    #[default]
    LeadingCountBuffer,
    /// Every remaining buffer is one element; no count buffer is present
    RemainingBuffers,
}

/// Maps an ordered list of result buffers onto declared output types
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsParser {
    counted_mode: CountedVariadicMode,
}

impl ResultsParser {
    /// Parser with the default counted-variadic convention
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the counted-variadic convention
    pub fn with_counted_mode(mut self, mode: CountedVariadicMode) -> Self {
        self.counted_mode = mode;
        self
    }

    /// Decode base64 result buffers
    pub fn parse_base64(&self, buffers: &[String], outputs: &[TypeValue]) -> Result<Value, AbiError> {
        let decoded = decode_base64_buffers(buffers)?;
        self.parse(&decoded, outputs)
    }

    /// Decode raw result buffers.
    ///
    /// One declared output yields the value itself, several yield a `Multi`.
    pub fn parse(&self, buffers: &[Vec<u8>], outputs: &[TypeValue]) -> Result<Value, AbiError> {
        let mut cursor = Cursor {
            buffers,
            position: 0,
        };
        let mut values = Vec::with_capacity(outputs.len());
        for ty in outputs {
            values.push(self.resolve(ty, &mut cursor)?);
        }
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Ok(value);
            }
        }
        Ok(Value::Multi(values))
    }

    fn resolve(&self, ty: &TypeValue, cursor: &mut Cursor<'_>) -> Result<Value, AbiError> {
        match ty {
            TypeValue::Optional(inner) => {
                let value = if cursor.has_next() {
                    Some(Box::new(self.resolve(inner, cursor)?))
                } else {
                    None
                };
                Ok(Value::Optional {
                    inner: (**inner).clone(),
                    value,
                })
            }
            TypeValue::Variadic { inner, counted } => {
                let mut items = Vec::new();
                if *counted && self.counted_mode == CountedVariadicMode::LeadingCountBuffer {
                    let count = decode_top_level(cursor.next()?, &TypeValue::u32())?.as_u64()?;
                    // every item takes at least one buffer
                    if count > cursor.remaining() as u64 {
                        return Err(AbiError::Decode(format!(
                            "variadic count {} exceeds the {} remaining buffers",
                            count,
                            cursor.remaining()
                        )));
                    }
                    for _ in 0..count {
                        items.push(self.resolve(inner, cursor)?);
                    }
                } else {
                    while cursor.has_next() {
                        items.push(self.resolve(inner, cursor)?);
                    }
                }
                Ok(Value::Variadic {
                    item: (**inner).clone(),
                    counted: *counted,
                    items,
                })
            }
            TypeValue::Multi(members) => {
                let mut values = Vec::with_capacity(members.len());
                for member in members {
                    values.push(self.resolve(member, cursor)?);
                }
                Ok(Value::Multi(values))
            }
            other => decode_top_level(cursor.next()?, other),
        }
    }
}

struct Cursor<'a> {
    buffers: &'a [Vec<u8>],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn has_next(&self) -> bool {
        self.position < self.buffers.len()
    }

    fn remaining(&self) -> usize {
        self.buffers.len().saturating_sub(self.position)
    }

    fn next(&mut self) -> Result<&'a [u8], AbiError> {
        let buffer = self.buffers.get(self.position).ok_or_else(|| {
            AbiError::Decode(format!("missing result buffer at index {}", self.position))
        })?;
        self.position += 1;
        Ok(buffer.as_slice())
    }
}

/// Decode base64 buffers as returned by the gateway
pub fn decode_base64_buffers(buffers: &[String]) -> Result<Vec<Vec<u8>>, AbiError> {
    buffers
        .iter()
        .map(|b| {
            STANDARD
                .decode(b)
                .map_err(|e| AbiError::Decode(format!("invalid base64 result: {}", e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffers(raw: &[&[u8]]) -> Vec<Vec<u8>> {
        raw.iter().map(|b| b.to_vec()).collect()
    }

    #[test]
    fn test_single_output_is_unwrapped() {
        let parser = ResultsParser::new();
        let value = parser.parse(&buffers(&[&[0x2a]]), &[TypeValue::u32()]).unwrap();
        assert_eq!(value, Value::u32(42));
    }

    #[test]
    fn test_multiple_outputs_pack_into_multi() {
        let parser = ResultsParser::new();
        let value = parser
            .parse(&buffers(&[&[1], b"abc"]), &[TypeValue::u8(), TypeValue::Bytes])
            .unwrap();
        assert_eq!(value, Value::Multi(vec![Value::u8(1), Value::Bytes(b"abc".to_vec())]));
    }

    #[test]
    fn test_optional_without_buffer_is_missing() {
        let parser = ResultsParser::new();
        let outputs = [TypeValue::u8(), TypeValue::optional(TypeValue::u32())];
        let value = parser.parse(&buffers(&[&[1]]), &outputs).unwrap();
        let items = value.into_items().unwrap();
        assert_eq!(items[1].as_option().unwrap(), None);
    }

    #[test]
    fn test_uncounted_variadic_takes_all_remaining() {
        let parser = ResultsParser::new();
        let ty = TypeValue::variadic(TypeValue::u16(), false);
        let value = parser.parse(&buffers(&[&[1], &[2], &[3]]), &[ty]).unwrap();
        assert_eq!(value.items().unwrap(), &[Value::u16(1), Value::u16(2), Value::u16(3)]);
    }

    #[test]
    fn test_variadic_of_multi_shares_cursor() {
        let parser = ResultsParser::new();
        let pair = TypeValue::Multi(vec![TypeValue::Bytes, TypeValue::u8()]);
        let ty = TypeValue::variadic(pair, false);
        let value = parser
            .parse(&buffers(&[b"a", &[1], b"b", &[2]]), &[ty])
            .unwrap();
        let items = value.into_items().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[1],
            Value::Multi(vec![Value::Bytes(b"b".to_vec()), Value::u8(2)])
        );
    }

    #[test]
    fn test_counted_variadic_leading_buffer() {
        let parser = ResultsParser::new();
        let outputs = [TypeValue::variadic(TypeValue::u8(), true), TypeValue::Bytes];
        let value = parser
            .parse(&buffers(&[&[2], &[7], &[8], b"tail"]), &outputs)
            .unwrap();
        let items = value.into_items().unwrap();
        assert_eq!(items[0].items().unwrap(), &[Value::u8(7), Value::u8(8)]);
        assert_eq!(items[1], Value::Bytes(b"tail".to_vec()));
    }

    #[test]
    fn test_counted_variadic_count_beyond_buffers() {
        let parser = ResultsParser::new();
        let huge = u32::MAX.to_be_bytes();
        let ty = TypeValue::variadic(TypeValue::optional(TypeValue::u8()), true);
        let result = parser.parse(&buffers(&[&huge, &[7]]), &[ty]);
        assert!(matches!(result, Err(AbiError::Decode(_))));

        let ty = TypeValue::variadic(TypeValue::u8(), true);
        let result = parser.parse(&buffers(&[&[3], &[7], &[8]]), &[ty]);
        assert!(matches!(result, Err(AbiError::Decode(_))));
    }

    #[test]
    fn test_counted_variadic_remaining_buffers() {
        let parser = ResultsParser::new().with_counted_mode(CountedVariadicMode::RemainingBuffers);
        let ty = TypeValue::variadic(TypeValue::u8(), true);
        let value = parser.parse(&buffers(&[&[2], &[7], &[8]]), &[ty]).unwrap();
        assert_eq!(value.items().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_required_buffer() {
        let parser = ResultsParser::new();
        let result = parser.parse(&[], &[TypeValue::u32()]);
        assert!(matches!(result, Err(AbiError::Decode(_))));
    }

    #[test]
    fn test_parse_base64() {
        let parser = ResultsParser::new();
        // "Kg==" is 0x2a
        let value = parser.parse_base64(&["Kg==".to_string()], &[TypeValue::u8()]).unwrap();
        assert_eq!(value, Value::u8(42));
        assert!(parser.parse_base64(&["!!".to_string()], &[TypeValue::u8()]).is_err());
    }

    #[test]
    fn test_empty_buffer_is_zero() {
        let parser = ResultsParser::new();
        let value = parser.parse(&buffers(&[&[]]), &[TypeValue::big_uint()]).unwrap();
        assert_eq!(value, Value::big_uint(0u8));
    }
}
