//! Release facts and the rules that derive them.

pub mod entities;
pub mod value_objects;
