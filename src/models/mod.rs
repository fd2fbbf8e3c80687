pub mod draft;
pub mod health;
pub mod error;

pub use draft::*;
pub use health::*;
pub use error::*;
