//! Shared primitives used across the template and model layers

pub mod span;

pub use span::{Position, SourceMap, Span};
