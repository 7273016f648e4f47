pub use wpush_types::prelude::*;

// vim: ts=4
