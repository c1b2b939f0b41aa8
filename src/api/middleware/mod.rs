pub mod rate_limit;
pub mod trace;

pub use rate_limit::*;
pub use trace::*;
