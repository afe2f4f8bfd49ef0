//! The reserved operator names of the target machine.
//!
//! The machine identifies its built-in procedures by small integer
//! opcodes; the discriminants below are those opcodes and are part of
//! the image format, so they must never be renumbered.

/// A reserved built-in procedure name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Add = 0,
    Sub = 1,
    Lt = 2,
    NumEq = 3,
    Gt = 4,
    And = 5,
    Or = 6,
    Not = 7,
    Car = 8,
    Cdr = 9,
    Cons = 10,
    Eq = 11,
    Atom = 12,
    If = 13,
    Lambda = 14,
    Quote = 15,
    Define = 16,
    Begin = 17,
}

/// The complete operator table, in opcode order.
///
/// Atom classification and the dump both go through this table rather
/// than hard-coding names.
pub const OPERATORS: &[(&str, Opcode)] = &[
    ("+", Opcode::Add),
    ("-", Opcode::Sub),
    ("<", Opcode::Lt),
    ("=", Opcode::NumEq),
    (">", Opcode::Gt),
    ("and", Opcode::And),
    ("or", Opcode::Or),
    ("not", Opcode::Not),
    ("car", Opcode::Car),
    ("cdr", Opcode::Cdr),
    ("cons", Opcode::Cons),
    ("eq?", Opcode::Eq),
    ("atom?", Opcode::Atom),
    ("if", Opcode::If),
    ("lambda", Opcode::Lambda),
    ("quote", Opcode::Quote),
    ("define", Opcode::Define),
    ("begin", Opcode::Begin),
];

/// Look up an operator by its source-level name.
///
/// Linear over `OPERATORS`; the table is small.
pub fn lookup(name: &str) -> Option<Opcode> {
    for (op_name, op) in OPERATORS {
        if *op_name == name {
            return Some(*op);
        }
    }
    None
}

impl Opcode {
    /// The opcode value packed into the image.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// The source-level spelling of this operator.
    pub fn name(self) -> &'static str {
        OPERATORS[self as usize].0
    }
}
