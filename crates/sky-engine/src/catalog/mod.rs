pub mod builder;
pub mod builtin;
pub mod constellation;
pub mod star;
