//! # kush-base
//!
//! Structural atoms for the KUSH front-end.
//!
//! This crate provides the foundational types the lexer, parser, and
//! semantic passes build upon:
//!
//! - [`Interner`]/[`Name`] — deduplicated lexeme storage with O(1)
//!   equality
//! - [`Span`] — source regions as byte ranges plus line/column positions
//!
//! # Design Principles
//!
//! This crate has **no knowledge of the KUSH language or I/O**. Failure
//! reporting also lives elsewhere: the front-end never aborts on bad
//! input, so its diagnostics type sits next to the phases that produce it
//! rather than down here.

pub mod intern;
pub mod span;

pub use intern::{Interner, Name};
pub use span::Span;
