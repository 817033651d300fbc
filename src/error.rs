use thiserror::Error;

/// Errors produced while decoding SEI payloads.
///
/// Only `TruncatedPayload` is fatal for a whole NAL: it means a message
/// header declared more bytes than the payload actually carries, so the
/// dispatcher can no longer trust its byte accounting. Every other variant
/// is local to one message; the dispatcher logs it and seeks to the declared
/// message boundary before continuing.
#[derive(Error, Debug)]
pub enum SeiError {
    /// A message (or its type/size header) claims more bytes than remain in
    /// the NAL payload.
    #[error("truncated payload: {0}")]
    TruncatedPayload(String),

    /// Ran out of bits, or hit a malformed exp-Golomb code, inside a bounded
    /// message cursor.
    #[error("bitstream error: {0}")]
    Bitstream(String),

    /// A field held a value the message catalog does not allow.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Post-processing was asked to run against a parameter set that lacks
    /// the block it depends on (e.g. no HRD timing info).
    #[error("missing dependency: {0}")]
    MissingDependency(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SeiError>;
