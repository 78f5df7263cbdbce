//! Command implementations.

pub mod evaluate;
pub mod parse;

pub use self::evaluate::execute_evaluate;
pub use self::parse::execute_parse;
