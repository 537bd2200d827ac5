//! Application-wide constants.

use std::time::Duration;

/// Blob container all photos are stored in. Fixed by contract; only the file
/// share name is configurable.
pub const PHOTOS_CONTAINER: &str = "photos";

/// Validity window for signed gallery URLs: 24 hours from the moment of the
/// listing request.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Endpoint suffix used when the connection string does not carry one.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";
