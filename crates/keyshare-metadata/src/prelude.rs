pub use keyshare_core::prelude::*;

// vim: ts=4
