use thiserror::Error;

/// Errors produced while compiling one expression into a memory image.
///
/// Every variant is fatal for that input: the compiler never returns a
/// partial image. `Syntax` covers malformed source text, the capacity
/// variants cover graphs and values that do not fit the fixed-width
/// image, and `Invariant` flags a divergence between construction order
/// and emission order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("expression needs more than {limit} cells")]
    GraphTooLarge { limit: usize },

    #[error("memory image needs {required} words but only {capacity} are addressable")]
    ImageOverflow { required: usize, capacity: usize },

    #[error("{what} {value} does not fit in a {bits}-bit field")]
    FieldOverflow {
        what: &'static str,
        value: i64,
        bits: u32,
    },

    #[error("word {word:#08X} does not decode to a cell")]
    MalformedWord { word: u32 },

    #[error("cell graph invariant violated: {0}")]
    Invariant(String),
}

impl CompileError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        CompileError::Syntax {
            offset,
            message: message.into(),
        }
    }
}
