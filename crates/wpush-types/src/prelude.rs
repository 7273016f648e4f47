pub use crate::error::{Error, WpResult};

pub use tracing::{debug, error, info, trace, warn};

// vim: ts=4
