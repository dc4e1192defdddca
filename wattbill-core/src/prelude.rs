#![allow(unused_imports)]

pub use tracing::{debug, info, instrument, trace, warn};

pub use crate::error::{ConfigurationError, Error, InvalidInput, Result};
