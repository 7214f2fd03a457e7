pub mod config;
pub mod conflict;
pub mod error;
pub mod generation;
pub mod io;
pub mod ledger;
pub mod paths;
pub mod project;
pub mod template;

pub use error::{Result, UkkoError};
