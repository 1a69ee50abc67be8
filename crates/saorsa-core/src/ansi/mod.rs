//! The ANSI/VT wire protocol: input tokenization and output emission.
//!
//! This is the only code in the crate that understands raw escape-sequence
//! bytes; everything above it (surfaces, nodes, the router) deals in the
//! typed [`token::Token`] representation.

pub mod emitter;
pub mod token;
pub mod tokenizer;

pub use emitter::{emit, serialize, SgrState};
pub use token::{SgrParams, Token};
pub use tokenizer::{DoubleClickConfig, Tokenizer};
