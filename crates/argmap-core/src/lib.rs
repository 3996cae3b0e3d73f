//! Argmap Core - Entity types, wire protocol, visual mapping, and error handling

pub mod error;
pub mod protocol;
pub mod style;
pub mod types;

pub use error::{Error, Result};
pub use protocol::*;
pub use style::*;
pub use types::*;
