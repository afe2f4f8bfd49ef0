//! List-building parser.
//!
//! The parser turns the token stream into a binary-branching cell
//! graph, allocating arena indices as it goes. The allocation order is
//! load-bearing: the index a cell receives here must equal its rank in
//! the depth-first, car-before-cdr walk the linearizer performs later,
//! because those indices are the pointer values baked into the image.
//! The construction rule guarantees this: a node's car is allocated
//! before anything inside the car, and a node's cdr link is allocated
//! only once the whole car subtree is underway.
//!
//! State is an explicit stack of current-list-node ids plus one flag;
//! keeping it iterative preserves the exact interaction between
//! sibling atoms and nested lists.

use crate::cell::{Cell, CellArena, CellId};
use crate::error::CompileError;
use crate::lexer::{Lexer, TokenKind};

/// A parsed expression: the arena and the root cell id.
#[derive(Debug)]
pub struct Program {
    pub arena: CellArena,
    pub root: CellId,
}

/// Parse one complete expression out of `source`.
///
/// The whole token stream must be consumed: anything after the balanced
/// expression is a syntax error.
pub fn parse(source: &str) -> Result<Program, CompileError> {
    Parser::new(source).run()
}

struct Parser<'src> {
    lexer: Lexer<'src>,
    arena: CellArena,
    /// Innermost unfinished list node on top; the wrapper (slot 0)
    /// stays at the bottom for the whole parse.
    stack: Vec<CellId>,
    /// An atom was just placed in the current node's car.
    atom_in_car: bool,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            arena: CellArena::new(),
            stack: vec![CellId::NIL],
            atom_in_car: false,
        }
    }

    fn run(mut self) -> Result<Program, CompileError> {
        loop {
            let Some(token) = self.lexer.next_token() else {
                let message = if self.stack.len() > 1 {
                    "input ended inside an unclosed list"
                } else {
                    "no expression in input"
                };
                return Err(CompileError::syntax(self.lexer.offset(), message));
            };
            match token.kind {
                TokenKind::LParen => self.open_list()?,
                TokenKind::RParen => self.close_list(token.offset)?,
                kind => self.place_atom(kind, token.offset)?,
            }
            if self.stack.len() == 1 {
                break;
            }
        }

        if let Some(extra) = self.lexer.next_token() {
            return Err(CompileError::syntax(
                extra.offset,
                "trailing input after the expression",
            ));
        }

        let root = self.car_of(CellId::NIL);
        Ok(Program {
            arena: self.arena,
            root,
        })
    }

    fn open_list(&mut self) -> Result<(), CompileError> {
        let mut current = self.current();
        if self.atom_in_car || !self.car_of(current).is_nil() {
            current = self.chain_cdr()?;
        }
        self.atom_in_car = false;
        let child = self.arena.alloc(Cell::Pair {
            car: CellId::NIL,
            cdr: CellId::NIL,
        })?;
        self.set_car(current, child);
        self.stack.push(child);
        Ok(())
    }

    fn close_list(&mut self, offset: usize) -> Result<(), CompileError> {
        self.atom_in_car = false;
        if self.stack.len() <= 1 {
            return Err(CompileError::syntax(offset, "unmatched ')'"));
        }
        self.stack.pop();
        Ok(())
    }

    fn place_atom(&mut self, kind: TokenKind, offset: usize) -> Result<(), CompileError> {
        let mut current = self.current();
        if self.atom_in_car || !self.car_of(current).is_nil() {
            current = self.chain_cdr()?;
        } else {
            self.atom_in_car = true;
        }
        let atom = self.make_atom(kind, offset)?;
        self.set_car(current, atom);
        Ok(())
    }

    /// The current node's car is occupied: link a fresh pair into its
    /// cdr and make that pair the current node. Consecutive list
    /// elements chain this way, so `(a b)` ends up as
    /// `Pair(a, Pair(b, nil))`.
    fn chain_cdr(&mut self) -> Result<CellId, CompileError> {
        let link = self.arena.alloc(Cell::Pair {
            car: CellId::NIL,
            cdr: CellId::NIL,
        })?;
        let current = self.stack.pop().expect("parser stack holds the wrapper");
        self.set_cdr(current, link);
        self.stack.push(link);
        Ok(link)
    }

    fn make_atom(&mut self, kind: TokenKind, offset: usize) -> Result<CellId, CompileError> {
        match kind {
            TokenKind::Operator(op) => self.arena.alloc(Cell::Operator(op)),
            TokenKind::Boolean(value) => self.arena.alloc(Cell::Boolean(value)),
            TokenKind::Integer(value) => self.arena.alloc(Cell::Integer(value)),
            TokenKind::Symbol(text) => self.symbol_chain(&text, offset),
            TokenKind::LParen | TokenKind::RParen => {
                unreachable!("list tokens are handled by the main loop")
            }
        }
    }

    /// Expand an identifier into its chain of one-character cells, in
    /// left-to-right order so the chain occupies consecutive indices.
    fn symbol_chain(&mut self, text: &str, offset: usize) -> Result<CellId, CompileError> {
        let mut chars = text.chars();
        let first = match chars.next() {
            Some(ch) => self.arena.alloc(Cell::SymbolChar {
                ch,
                next: CellId::NIL,
            })?,
            None => return Err(CompileError::syntax(offset, "empty atom")),
        };
        let mut prev = first;
        for ch in chars {
            let cell = self.arena.alloc(Cell::SymbolChar {
                ch,
                next: CellId::NIL,
            })?;
            self.set_next(prev, cell);
            prev = cell;
        }
        Ok(first)
    }

    fn current(&self) -> CellId {
        *self.stack.last().expect("parser stack holds the wrapper")
    }

    fn car_of(&self, id: CellId) -> CellId {
        match self.arena.get(id) {
            Cell::Pair { car, .. } => *car,
            _ => unreachable!("list nodes are pairs"),
        }
    }

    fn set_car(&mut self, id: CellId, value: CellId) {
        match self.arena.get_mut(id) {
            Cell::Pair { car, .. } => *car = value,
            _ => unreachable!("list nodes are pairs"),
        }
    }

    fn set_cdr(&mut self, id: CellId, value: CellId) {
        match self.arena.get_mut(id) {
            Cell::Pair { cdr, .. } => *cdr = value,
            _ => unreachable!("list nodes are pairs"),
        }
    }

    fn set_next(&mut self, id: CellId, value: CellId) {
        match self.arena.get_mut(id) {
            Cell::SymbolChar { next, .. } => *next = value,
            _ => unreachable!("symbol chains link symbol cells"),
        }
    }
}
