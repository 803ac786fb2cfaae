//! In-place lowercasing of text files, usable standalone or as a step of a
//! [`FilterChain`](filter::FilterChain).

pub mod errors;
pub mod filter;
pub mod fold;
pub mod input;
pub mod utils;

pub use errors::{LowerError, LowerResult};
pub use filter::{FileLowerCase, Filter, FilterChain};
pub use input::FilterInput;
