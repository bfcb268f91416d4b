pub mod budget;
pub mod combinatorics;
pub mod error;
