#![doc = include_str!("../README.md")]

mod compare;
mod error;
mod filter;
mod index;
mod resolver;
mod solution;
mod types;

pub use error::Error;
pub use index::NamedIndex;
pub use resolver::Resolver;
pub use solution::PackageSolution;
pub use solution::Solution;
pub use types::Cancellation;
pub use types::Disqualified;
