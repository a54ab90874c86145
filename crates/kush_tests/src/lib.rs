//! Integration test suite for the KUSH front-end.
//!
//! This crate exists only to run integration tests from the `tests/`
//! directory. All actual test code lives in `tests/*.rs` files.
//!
//! # Test Organization
//!
//! | Suite | Topic |
//! |-------|-------|
//! | `e2e_lexer` | Token round-trips, layout balance, enclosure suppression |
//! | `e2e_recovery` | Panic-mode determinism and diagnostic coalescing |
//! | `e2e_overloads` | Overload sets and the parameter-threshold rule |
//! | `e2e_resolution` | Name binding, lvalue law, imports, inheritance |
//! | `e2e_pipeline` | Whole-batch scenarios, kernel import, rendering |
//!
//! # Running Tests
//!
//! ```text
//! cargo test -p kush-tests
//! ```
