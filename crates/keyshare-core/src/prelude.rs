pub use crate::app::App;
pub use keyshare_types::error::{ClResult, Error};
pub use keyshare_types::types::{EncryptionMode, OrgId, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
