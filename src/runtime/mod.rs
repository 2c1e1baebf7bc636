//! Runtime evaluation of Cacophony programs

mod environment;
mod evaluator;

pub use environment::Environment;
pub use evaluator::Evaluator;
