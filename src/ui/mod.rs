pub mod controls;
pub mod response;

pub use controls::*;
pub use response::*;
