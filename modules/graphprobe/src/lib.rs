pub mod runner;

pub use runner::{RunOutcome, Runner};
