//! Error types shared by every mapper component.

mod types;

pub use types::{MapperError, Missing, Result};
