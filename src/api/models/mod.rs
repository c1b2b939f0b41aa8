pub mod restaurants;

pub use restaurants::*;
