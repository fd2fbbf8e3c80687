pub mod health;
pub mod draft;

pub use health::*;
pub use draft::*;
