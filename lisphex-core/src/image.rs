//! Linearization of the cell graph into the memory image.
//!
//! Output position is address and address equals cell index, so the
//! depth-first walk here must visit cells in exactly the order the
//! parser allocated them. That equivalence is the system's central
//! correctness property; rather than trust it, every emitted cell is
//! checked against its emission rank and any divergence aborts the
//! compilation.

use crate::cell::{Cell, CellId};
use crate::encode::encode;
use crate::error::CompileError;
use crate::parser::Program;

/// Fixed capacity of the machine's memory, in 24-bit words.
pub const IMAGE_WORDS: usize = 1024;

/// The synthetic top-level return continuation. The machine starts
/// with this word on its system stack so evaluation knows where to
/// stop; it follows the last cell word and is not itself a cell.
pub const RETURN_WORD: u32 = 0x503C00;

/// A finished memory image.
///
/// `words[0]` is the image length word (cell count plus the length and
/// return words), addresses 1..=N hold the cells, and address N+1 the
/// return word. Anything beyond is implicitly zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryImage {
    words: Vec<u32>,
}

impl MemoryImage {
    /// All produced words, length word first.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// The cell words only, without the length and return words.
    pub fn cell_words(&self) -> &[u32] {
        &self.words[1..self.words.len() - 1]
    }

    pub fn cell_count(&self) -> usize {
        self.words.len() - 2
    }

    /// The word at `address`, zero beyond the produced sequence.
    pub fn word_at(&self, address: usize) -> u32 {
        self.words.get(address).copied().unwrap_or(0)
    }
}

/// Emit the graph depth-first, car before cdr, one word per cell.
///
/// The cdr is pushed before the car so the car comes off the stack
/// first; nil children are skipped. Each cell must come off the stack
/// at its own index, and the walk must account for every allocated
/// cell. Either failure means the graph was not built by the
/// construction rule and its pointers would be garbage.
pub fn linearize(program: &Program) -> Result<MemoryImage, CompileError> {
    let arena = &program.arena;
    // Address 0: length word, patched once the count is known.
    let mut words = vec![0u32];
    let mut stack = vec![program.root];

    while let Some(id) = stack.pop() {
        if id.index() != words.len() {
            return Err(CompileError::Invariant(format!(
                "cell {} emitted at address {}",
                id.index(),
                words.len()
            )));
        }
        let cell = arena.get(id);
        words.push(encode(cell)?);

        match cell {
            Cell::Pair { car, cdr } => {
                push_child(&mut stack, *cdr);
                push_child(&mut stack, *car);
            }
            Cell::SymbolChar { next, .. } => push_child(&mut stack, *next),
            _ => {}
        }
    }

    let emitted = words.len() - 1;
    if emitted != arena.cell_count() {
        return Err(CompileError::Invariant(format!(
            "{} cells allocated but {} reachable from the root",
            arena.cell_count(),
            emitted
        )));
    }

    words.push(RETURN_WORD);
    if words.len() > IMAGE_WORDS {
        return Err(CompileError::ImageOverflow {
            required: words.len(),
            capacity: IMAGE_WORDS,
        });
    }
    words[0] = words.len() as u32;

    Ok(MemoryImage { words })
}

fn push_child(stack: &mut Vec<CellId>, id: CellId) {
    if !id.is_nil() {
        stack.push(id);
    }
}
