pub mod conflict;
pub mod detector;
pub mod error;
pub mod installer;
pub mod io;
pub mod manifest;
pub mod paths;
pub mod validator;

#[cfg(test)]
mod testutil;

pub use error::{LiteKitsError, Result};
