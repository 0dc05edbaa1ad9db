// Data models and payload validation

pub mod exercise;
pub mod validation;

pub use exercise::*;
pub use validation::*;
