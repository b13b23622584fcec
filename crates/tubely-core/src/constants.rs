//! Constants shared across crates.

use std::time::Duration;

/// Lifetime of a signed access URL when the caller does not ask for one.
pub const DEFAULT_SIGNED_URL_EXPIRY: Duration = Duration::from_secs(15 * 60);

/// Maximum distance from 16:9 or 9:16 that still counts as that orientation.
pub const ORIENTATION_TOLERANCE: f64 = 0.05;

/// Suffix appended to the input path for the fast-start remux output.
pub const FAST_START_SUFFIX: &str = ".processing";

/// Number of random bytes in a generated object identifier.
pub const OBJECT_ID_BYTES: usize = 32;

/// Separator between bucket and key in a serialized object reference.
pub const REFERENCE_SEPARATOR: char = ',';
