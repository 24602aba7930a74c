pub mod command;
pub mod config;
pub mod storage;
pub mod error;
pub mod traits;

pub use error::*;
pub use traits::*;
