//! Compiler entry point.
//!
//! One call takes one expression through the whole pipeline:
//! lex + parse into the cell graph, then linearize into the memory
//! image. Each call owns all of its state, so compiling in a loop or
//! from several threads needs no coordination and identical inputs
//! produce identical images.

use crate::error::CompileError;
use crate::image::{MemoryImage, linearize};
use crate::parser::parse;

/// Compile one S-expression into a loadable memory image.
pub fn compile(source: &str) -> Result<MemoryImage, CompileError> {
    let program = parse(source)?;
    linearize(&program)
}
