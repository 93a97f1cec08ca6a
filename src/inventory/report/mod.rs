pub mod error;
pub mod export;
pub mod flatten;
pub mod io;
pub mod model;
pub mod reports;

pub use error::{ReportError, Result};
