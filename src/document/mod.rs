//! Document model navigated by path expressions.

pub mod value;

pub use value::{Number, Value};
