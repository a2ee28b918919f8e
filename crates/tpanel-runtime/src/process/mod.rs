//! External process execution.

mod runner;
mod stream;

pub use runner::TokioProcessRunner;
