//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                              |
//! |-------|-----------|------------------------------------------|
//! | 0     | Universal | Success                                  |
//! | 1     | Universal | General error (unspecified)              |
//! | 2     | Universal | CLI usage error (bad args, missing file) |
//! | 3-9   | files     | Reading and writing contact files        |
//! | 10-19 | compare   | Comparison outcomes                      |
//! | 20-29 | config    | Settings file problems                   |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Files (3-9)
// =============================================================================

/// File cannot be read or written.
pub const EXIT_IO: u8 = 3;

/// No codec recognizes the file, or the codec cannot write it.
pub const EXIT_FORMAT: u8 = 4;

/// File contains no records.
pub const EXIT_NO_RECORDS: u8 = 5;

/// `check` found rejected rows or warnings.
pub const EXIT_CHECK_WARNINGS: u8 = 6;

// =============================================================================
// Compare (10-19)
// =============================================================================

/// `compare --fail-on-unpaired` left records without a pair.
pub const EXIT_COMPARE_UNPAIRED: u8 = 10;

// =============================================================================
// Config (20-29)
// =============================================================================

/// Settings file unreadable or invalid.
pub const EXIT_CONFIG: u8 = 20;

/// Map a codec error to its exit code.
pub fn format_exit_code(err: &twincard_io::FormatError) -> u8 {
    use twincard_io::FormatError;
    match err {
        FormatError::Io { .. } => EXIT_IO,
        FormatError::Csv(_) | FormatError::UnknownFormat(_) | FormatError::ReadOnly(_) => EXIT_FORMAT,
        FormatError::NoRecords(_) => EXIT_NO_RECORDS,
    }
}
