//! Shared constants.

/// Zero-padded width of the numeric part of a text identifier
/// (`cat-000001`).
pub const SEQUENCE_WIDTH: usize = 6;

/// Largest counter value representable at [`SEQUENCE_WIDTH`] digits.
/// Reserving past this value fails loudly instead of widening the padding.
pub const MAX_SEQUENCE: u64 = 999_999;

/// Number of random bytes behind a short object-key token (8 hex chars).
pub const TOKEN_BYTES: usize = 4;

/// Default lossy WebP quality, tuned for bandwidth over fidelity.
pub const DEFAULT_WEBP_QUALITY: f32 = 50.0;
