/// Default page size for hazard listings
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum uploaded media size in bytes (10MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Maximum hazard description length in characters
pub const MAX_DESCRIPTION_LENGTH: u64 = 1000;
