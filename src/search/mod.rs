//! Repository search: filters, request configuration and result sequences

pub mod form;
mod config;
mod sequence;
mod term;

pub use config::SearchConfig;
pub use sequence::ResourceSequence;
pub use term::{Operator, SearchTerm, ValueType};
