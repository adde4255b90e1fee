mod root;
pub mod trends;
pub mod youtube;

pub use root::*;
pub use trends::*;
pub use youtube::*;
