pub mod coordinates;
pub mod macros;
pub mod target;

pub use coordinates::*;
pub use target::*;
