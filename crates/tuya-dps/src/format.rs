//! Packed binary values
//!
//! Colour data points carry several fixed-width, big-endian unsigned fields
//! in one blob (e.g. `RRGGBBHHHHSSVV`). A `format` list names each field and
//! its width; this module reads and writes such blobs.

use std::io::Cursor;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tuya_core::{TuyaError, TuyaResult};

use crate::config::FormatField;

/// Total width in bytes of a packed value
pub fn packed_len(fields: &[FormatField]) -> usize {
    fields.iter().map(|f| usize::from(f.bytes)).sum()
}

/// Compact description of the layout, e.g. `>BBBHBB`
pub fn layout(fields: &[FormatField]) -> String {
    let mut out = String::from(">");
    for field in fields {
        out.push(match field.bytes {
            1 => 'B',
            2 => 'H',
            4 => 'I',
            _ => '?',
        });
    }
    out
}

fn check_width(field: &FormatField) -> TuyaResult<()> {
    match field.bytes {
        1 | 2 | 4 => Ok(()),
        other => Err(TuyaError::UnsupportedFormat(format!(
            "field {} has unsupported width of {} bytes",
            field.name, other
        ))),
    }
}

/// Split a packed value into its fields, in declaration order
pub fn unpack(fields: &[FormatField], data: &[u8]) -> TuyaResult<Vec<(String, u32)>> {
    let expected = packed_len(fields);
    if data.len() != expected {
        return Err(TuyaError::UnsupportedFormat(format!(
            "packed value is {} bytes, layout {} needs {}",
            data.len(),
            layout(fields),
            expected
        )));
    }

    let mut cursor = Cursor::new(data);
    let mut values = Vec::with_capacity(fields.len());
    for field in fields {
        check_width(field)?;
        let value = match field.bytes {
            1 => cursor.read_u8().map(u32::from),
            2 => cursor.read_u16::<BigEndian>().map(u32::from),
            _ => cursor.read_u32::<BigEndian>(),
        }
        .map_err(|e| TuyaError::UnsupportedFormat(format!("field {}: {}", field.name, e)))?;
        values.push((field.name.clone(), value));
    }
    Ok(values)
}

/// Build a packed value from one number per field
pub fn pack(fields: &[FormatField], values: &[u32]) -> TuyaResult<Vec<u8>> {
    if fields.len() != values.len() {
        return Err(TuyaError::UnsupportedFormat(format!(
            "layout {} needs {} values, got {}",
            layout(fields),
            fields.len(),
            values.len()
        )));
    }

    let mut out = Vec::with_capacity(packed_len(fields));
    for (field, &value) in fields.iter().zip(values) {
        check_width(field)?;
        let written = match field.bytes {
            1 => u8::try_from(value).map(|v| out.write_u8(v)),
            2 => u16::try_from(value).map(|v| out.write_u16::<BigEndian>(v)),
            _ => Ok(out.write_u32::<BigEndian>(value)),
        };
        match written {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                return Err(TuyaError::UnsupportedFormat(format!("field {}: {}", field.name, e)))
            }
            Err(_) => {
                return Err(TuyaError::invalid(
                    &field.name,
                    format!("{} does not fit in {} bytes", value, field.bytes),
                ))
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgbhsv() -> Vec<FormatField> {
        vec![
            FormatField::new("r", 1),
            FormatField::new("g", 1),
            FormatField::new("b", 1),
            FormatField::new("h", 2).with_range(0.0, 360.0),
            FormatField::new("s", 1),
            FormatField::new("v", 1),
        ]
    }

    #[test]
    fn test_layout() {
        assert_eq!(layout(&rgbhsv()), ">BBBHBB");
        assert_eq!(packed_len(&rgbhsv()), 7);
    }

    #[test]
    fn test_unpack_big_endian() {
        let data = hex::decode("ff00000168ff80").unwrap();
        let fields = unpack(&rgbhsv(), &data).unwrap();
        let values: Vec<u32> = fields.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![255, 0, 0, 360, 255, 128]);
        assert_eq!(fields[3].0, "h");
    }

    #[test]
    fn test_pack_matches_unpack() {
        let packed = pack(&rgbhsv(), &[0, 255, 0, 120, 255, 200]).unwrap();
        assert_eq!(hex::encode(&packed), "00ff000078ffc8");
    }

    #[test]
    fn test_wrong_length_fails() {
        assert!(unpack(&rgbhsv(), &[0, 1, 2]).is_err());
    }

    #[test]
    fn test_value_too_wide_fails() {
        let err = pack(&rgbhsv(), &[256, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, TuyaError::InvalidValue { .. }));
    }

    #[test]
    fn test_unsupported_width_fails() {
        let fields = vec![FormatField::new("x", 3)];
        assert!(matches!(
            unpack(&fields, &[0, 0, 0]),
            Err(TuyaError::UnsupportedFormat(_))
        ));
    }
}
