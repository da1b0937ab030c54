pub mod runner;

pub use runner::{UpdateError, UpdateRunner};
