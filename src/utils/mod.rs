pub mod macros;
pub mod math;
