//! Human-readable listing of a memory image.
//!
//! One line per produced word: address, raw word, decoded form. The
//! length and return words are named rather than decoded, since they
//! are not cells.

use crate::cell::Cell;
use crate::encode::decode;
use crate::image::MemoryImage;

pub fn render_dump(image: &MemoryImage) -> String {
    use std::fmt::Write;

    let words = image.words();
    let mut out = String::new();
    for (address, word) in words.iter().enumerate() {
        let rendering = if address == 0 {
            format!("length {word}")
        } else if address == words.len() - 1 {
            "return".to_string()
        } else {
            describe(*word)
        };
        writeln!(out, "{address:04}  {word:06X}  {rendering}")
            .expect("writing to a String cannot fail");
    }
    out
}

fn describe(word: u32) -> String {
    match decode(word) {
        Ok(Cell::Pair { car, cdr }) => {
            format!("pair    car={:04} cdr={:04}", car.index(), cdr.index())
        }
        Ok(Cell::Operator(op)) => format!("op      {}", op.name()),
        Ok(Cell::SymbolChar { ch, next }) => {
            format!("char    {:?} next={:04}", ch, next.index())
        }
        Ok(Cell::Integer(value)) => format!("int     {value}"),
        Ok(Cell::Boolean(value)) => format!("bool    {value}"),
        Err(_) => "???".to_string(),
    }
}
