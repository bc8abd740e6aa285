pub mod error;
pub mod validatable;
