use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(
        "external message dumper not found at `{}`; install it or point --dumper at its location",
        path.display()
    )]
    DumperNotFound { path: PathBuf },

    #[error("registry root `{path}` is missing or unreadable")]
    MissingRegistryRoot { path: String },

    #[error("dumper exited with status {status} while dumping `{path}`")]
    DumperFailed { path: String, status: i32 },

    #[error("failed to invoke dumper on `{path}`: {source}")]
    DumperInvocation { path: String, source: io::Error },

    #[error("malformed message header at line {line_number}: {reason}")]
    MalformedHeader {
        line_number: usize,
        reason: HeaderParseError,
    },

    #[error("an I/O error has occurred: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("failed to decode JSON input: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Reasons a single dumped message header line may be rejected.
///
/// These are per-block failures: the offending block is skipped with a
/// warning and the rest of the dump is still parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderParseError {
    #[error("expected at least 5 space-delimited tokens, found {found}")]
    TooFewTokens { found: usize },

    #[error("`{value}` is not a 0x-prefixed 8-digit hex message id")]
    BadHexId { value: String },

    #[error("`{value}` is not a parenthesized decimal message id")]
    BadDecimalId { value: String },

    #[error("hex id 0x{hex:08x} disagrees with decimal id {decimal}")]
    HexDecimalMismatch { hex: u32, decimal: u32 },
}
