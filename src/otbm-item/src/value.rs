use indexmap::IndexMap;
use otbm_node::{NodeWriter, PayloadReader};
use otbm_types::RawString;

use crate::ItemError;

/// A self-describing value inside the V4+ generic attribute map.
///
/// spec.md §9 leaves `ATTRIBUTE_MAP`'s payload format to "a sibling
/// spec"; this is the resolution SPEC_FULL adopts (see DESIGN.md):
/// an ordered map of string keys to one of these typed values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Bool(bool),
    String(RawString),
}

mod value_tag {
    pub const U8: u8 = 1;
    pub const U16: u8 = 2;
    pub const U32: u8 = 3;
    pub const U64: u8 = 4;
    pub const BOOL: u8 = 5;
    pub const STRING: u8 = 6;
}

/// Ordered key/value map, preserving insertion order across a
/// decode/encode round-trip.
pub type AttrMap = IndexMap<String, AttrValue>;

/// Decodes an `ATTRIBUTE_MAP` blob: `u16` entry count, then for each
/// entry a length-prefixed string key, a one-byte type tag, and the
/// value payload for that tag.
pub fn decode_attribute_map(r: &mut PayloadReader<'_>) -> Result<AttrMap, ItemError> {
    let count = r.get_u16()?;
    let mut map = AttrMap::with_capacity(count as usize);

    for _ in 0..count {
        let key = String::from_utf8_lossy(&r.get_string()?).into_owned();
        let tag = r.get_u8()?;
        let value = match tag {
            value_tag::U8 => AttrValue::U8(r.get_u8()?),
            value_tag::U16 => AttrValue::U16(r.get_u16()?),
            value_tag::U32 => AttrValue::U32(r.get_u32()?),
            value_tag::U64 => {
                let hi = r.get_u32()? as u64;
                let lo = r.get_u32()? as u64;
                AttrValue::U64((hi << 32) | lo)
            }
            value_tag::BOOL => AttrValue::Bool(r.get_u8()? != 0),
            value_tag::STRING => AttrValue::String(RawString(r.get_string()?)),
            _ => {
                return Err(ItemError::MalformedAttributeMap(
                    "unknown attribute value type tag",
                ))
            }
        };
        map.insert(key, value);
    }

    Ok(map)
}

/// Encodes an attribute map in the same shape [`decode_attribute_map`]
/// reads, preserving the map's iteration (insertion) order.
pub fn encode_attribute_map<W: std::io::Write>(
    w: &mut NodeWriter<W>,
    map: &AttrMap,
) -> Result<(), ItemError> {
    w.write_u16(map.len() as u16)?;

    for (key, value) in map {
        w.write_string(key.as_bytes())?;
        match value {
            AttrValue::U8(v) => {
                w.write_u8(value_tag::U8)?;
                w.write_u8(*v)?;
            }
            AttrValue::U16(v) => {
                w.write_u8(value_tag::U16)?;
                w.write_u16(*v)?;
            }
            AttrValue::U32(v) => {
                w.write_u8(value_tag::U32)?;
                w.write_u32(*v)?;
            }
            AttrValue::U64(v) => {
                w.write_u8(value_tag::U64)?;
                w.write_u32((*v >> 32) as u32)?;
                w.write_u32(*v as u32)?;
            }
            AttrValue::Bool(v) => {
                w.write_u8(value_tag::BOOL)?;
                w.write_u8(*v as u8)?;
            }
            AttrValue::String(v) => {
                w.write_u8(value_tag::STRING)?;
                w.write_string(v.as_bytes())?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_map_round_trip_preserves_order() {
        let mut map = AttrMap::new();
        map.insert("zeta".into(), AttrValue::U16(7));
        map.insert("alpha".into(), AttrValue::String(RawString::from("hi")));
        map.insert("big".into(), AttrValue::U64(0x1122_3344_5566_7788));

        let mut w = NodeWriter::new(Vec::new());
        encode_attribute_map(&mut w, &map).unwrap();
        let bytes = w.into_inner();

        let mut r = PayloadReader::new(&bytes);
        let decoded = decode_attribute_map(&mut r).unwrap();

        assert_eq!(decoded, map);
        assert_eq!(decoded.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "big"]);
    }
}
