//! Runtime value model for Gale expressions

mod value;

pub use value::GaleValue;
