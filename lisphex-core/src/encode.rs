//! Packing cells into 24-bit words and back.
//!
//! Word layout: bits 20-23 carry the type tag, bits 0-19 the payload.
//! Pair and SymbolChar split the payload into two 10-bit fields (car or
//! character code in bits 10-19, cdr in bits 0-9); Integer uses all 20
//! payload bits as a two's-complement value; Operator and Boolean use
//! them as a plain number. Values that do not fit their field are
//! reported, never truncated.

use crate::cell::{Cell, CellId, Tag};
use crate::error::CompileError;

pub const TAG_SHIFT: u32 = 20;
pub const FIELD_SHIFT: u32 = 10;
/// Mask of one 10-bit car/cdr field.
pub const FIELD_MASK: u32 = 0x3FF;
/// Mask of the 20-bit payload.
pub const PAYLOAD_MASK: u32 = 0xF_FFFF;

/// Range of integer literals representable in the 20-bit payload.
pub const INT_MIN: i32 = -(1 << 19);
pub const INT_MAX: i32 = (1 << 19) - 1;

/// Pack one finished cell into its image word.
pub fn encode(cell: &Cell) -> Result<u32, CompileError> {
    let tag = (cell.tag() as u32) << TAG_SHIFT;
    let word = match cell {
        Cell::Pair { car, cdr } => tag | (field(*car)? << FIELD_SHIFT) | field(*cdr)?,
        Cell::Operator(op) => tag | op.code(),
        Cell::SymbolChar { ch, next } => {
            let code = *ch as u32;
            if code > FIELD_MASK {
                return Err(CompileError::FieldOverflow {
                    what: "character code",
                    value: code as i64,
                    bits: 10,
                });
            }
            tag | (code << FIELD_SHIFT) | field(*next)?
        }
        Cell::Integer(value) => {
            if *value < INT_MIN || *value > INT_MAX {
                return Err(CompileError::FieldOverflow {
                    what: "integer literal",
                    value: *value as i64,
                    bits: 20,
                });
            }
            tag | (*value as u32 & PAYLOAD_MASK)
        }
        Cell::Boolean(value) => tag | *value as u32,
    };
    Ok(word)
}

/// Unpack an image word back into a cell.
///
/// The inverse of `encode`, used by the dump and by round-trip checks.
/// Words that no cell encodes to (unknown tags, boolean payloads other
/// than 0 and 1, character codes with no scalar value) are rejected.
pub fn decode(word: u32) -> Result<Cell, CompileError> {
    let malformed = || CompileError::MalformedWord { word };

    let tag = Tag::from_bits((word >> TAG_SHIFT) as u8).ok_or_else(malformed)?;
    let payload = word & PAYLOAD_MASK;
    match tag {
        Tag::Pair => Ok(Cell::Pair {
            car: field_id(word >> FIELD_SHIFT),
            cdr: field_id(word),
        }),
        Tag::Operator => {
            let ops = crate::opcode::OPERATORS;
            if (payload as usize) < ops.len() {
                Ok(Cell::Operator(ops[payload as usize].1))
            } else {
                Err(malformed())
            }
        }
        Tag::SymbolChar => {
            let ch = char::from_u32((word >> FIELD_SHIFT) & FIELD_MASK).ok_or_else(malformed)?;
            Ok(Cell::SymbolChar {
                ch,
                next: field_id(word),
            })
        }
        Tag::Integer => {
            // Sign-extend the 20-bit payload.
            let value = ((payload as i32) << 12) >> 12;
            Ok(Cell::Integer(value))
        }
        Tag::Boolean => match payload {
            0 => Ok(Cell::Boolean(false)),
            1 => Ok(Cell::Boolean(true)),
            _ => Err(malformed()),
        },
    }
}

fn field(id: CellId) -> Result<u32, CompileError> {
    let index = id.index() as u32;
    if index > FIELD_MASK {
        return Err(CompileError::FieldOverflow {
            what: "cell index",
            value: index as i64,
            bits: 10,
        });
    }
    Ok(index)
}

fn field_id(bits: u32) -> CellId {
    CellId::new((bits & FIELD_MASK) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::Opcode;

    fn pair(car: u16, cdr: u16) -> Cell {
        Cell::Pair {
            car: CellId::new(car),
            cdr: CellId::new(cdr),
        }
    }

    #[test]
    fn packs_each_variant() {
        assert_eq!(encode(&pair(2, 3)).unwrap(), 0x000803);
        assert_eq!(encode(&Cell::Operator(Opcode::Quote)).unwrap(), 0x10000F);
        assert_eq!(
            encode(&Cell::SymbolChar {
                ch: 'a',
                next: CellId::NIL,
            })
            .unwrap(),
            0x218400
        );
        assert_eq!(encode(&Cell::Integer(1)).unwrap(), 0x300001);
        assert_eq!(encode(&Cell::Boolean(true)).unwrap(), 0x400001);
        assert_eq!(encode(&Cell::Boolean(false)).unwrap(), 0x400000);
    }

    #[test]
    fn packs_negative_integers_as_twos_complement() {
        assert_eq!(encode(&Cell::Integer(-1)).unwrap(), 0x3FFFFF);
        assert_eq!(encode(&Cell::Integer(INT_MIN)).unwrap(), 0x380000);
        assert_eq!(encode(&Cell::Integer(INT_MAX)).unwrap(), 0x37FFFF);
    }

    #[test]
    fn rejects_out_of_range_integers() {
        assert_eq!(
            encode(&Cell::Integer(INT_MAX + 1)).unwrap_err(),
            CompileError::FieldOverflow {
                what: "integer literal",
                value: (INT_MAX + 1) as i64,
                bits: 20,
            }
        );
        assert!(encode(&Cell::Integer(INT_MIN - 1)).is_err());
    }

    #[test]
    fn rejects_wide_character_codes() {
        let err = encode(&Cell::SymbolChar {
            ch: '€',
            next: CellId::NIL,
        })
        .unwrap_err();
        assert!(matches!(
            err,
            CompileError::FieldOverflow {
                what: "character code",
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_indices() {
        let err = encode(&pair(1024, 0)).unwrap_err();
        assert!(matches!(
            err,
            CompileError::FieldOverflow {
                what: "cell index",
                value: 1024,
                bits: 10,
            }
        ));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let cells = [
            pair(2, 3),
            pair(0, 0),
            Cell::Operator(Opcode::Eq),
            Cell::SymbolChar {
                ch: 'z',
                next: CellId::new(9),
            },
            Cell::Integer(-42),
            Cell::Integer(INT_MIN),
            Cell::Boolean(true),
        ];
        for cell in &cells {
            let word = encode(cell).unwrap();
            assert_eq!(&decode(word).unwrap(), cell, "word {word:#08X}");
        }
    }

    #[test]
    fn sign_extends_on_decode() {
        assert_eq!(decode(0x3FFFFF).unwrap(), Cell::Integer(-1));
        assert_eq!(decode(0x380000).unwrap(), Cell::Integer(INT_MIN));
    }

    #[test]
    fn rejects_words_that_are_not_cells() {
        // The return word carries tag bits 5.
        assert!(decode(0x503C00).is_err());
        // Boolean payload other than 0/1.
        assert!(decode(0x400002).is_err());
        // Operator beyond the table.
        assert!(decode(0x100012).is_err());
    }
}
