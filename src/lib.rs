//! This crate contains a finite-state parser for untyped lambda calculus
//! written in an ASCII notation (`L` for lambda, names like `X1`, parentheses
//! for grouping), together with the term representation it builds and the
//! operations on terms: abstraction, substitution, equivalence and printing.

pub mod end_to_end;
pub mod finite_state_parsing;
pub mod lexical_analysis;
pub mod term_generation;
pub mod term_representation;
pub mod transition_execution;

pub use term_representation::{Expression, Term, Variable};
pub use transition_execution::{parse, ParseError, ParserConfig, TransitionExecutor};

// Character classifiers and the nesting tracker the parser is built on.
pub use lexical_analysis::{
    is_decimal_digit, is_decimal_digit_run, is_uppercase_letter, is_variable_symbol,
    NestingTracker,
};
