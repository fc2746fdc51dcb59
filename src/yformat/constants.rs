//! y-format container constants.

/// Archive entry holding the versioned body.
pub const BODY_ENTRY: &str = "body.txt";

/// Body entry name used by older editors. Accepted on decode only.
pub const LEGACY_BODY_ENTRY: &str = "Editor.bin";

/// Archive entry holding the mutable metadata fields as JSON.
pub const METADATA_ENTRY: &str = "metadata.json";

/// Prefix of binary attachment entries, and of their references in the body.
pub const MEDIA_PREFIX: &str = "media/";

/// Newest body format version this crate knows the grammar of.
pub const LATEST_FORMAT_VERSION: u32 = 10;

/// Revision written by current engines.
pub const CURRENT_REVISION: u32 = 0;

/// Headers longer than this are rejected without scanning further.
pub const MAX_HEADER_LEN: usize = 64;

/// Upper bound on the buffer reserved up front for one archive entry. The
/// declared size in the archive is only a hint.
pub const MAX_ENTRY_PREALLOC: usize = 1 << 20;
