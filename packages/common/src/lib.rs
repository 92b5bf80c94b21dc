pub mod error;
pub mod version;

pub use error::*;
pub use version::*;
