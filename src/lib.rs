//! # emx-charsniff
//!
//! Text/binary classification and character encoding guessing for raw file
//! contents, without looking at file names or external metadata.
//!
//! ## Quick Check
//!
//! [`is_text`] answers the only question a directory dumper really needs:
//! any null byte in the first 8000 bytes means binary. Empty input is text.
//!
//! ## Full Classification
//!
//! [`classify`] returns a [`Classification`] with the guessed encoding, how
//! it was decided ([`EncodingSource`]) and which [`Script`] heuristic
//! answered:
//!
//! ```rust
//! use emx_charsniff::{classify, EncodingSource, Script};
//!
//! let result = classify(b"\xEF\xBB\xBFhello", Script::None);
//! assert_eq!(result.encoding, "UTF-8-BOM");
//! assert_eq!(result.source, EncodingSource::Bom);
//!
//! let result = classify("Привет, как дела? Всё хорошо.".as_bytes(), Script::Cyrillic);
//! assert_eq!(result.encoding, "UTF-8");
//! assert_eq!(result.script, Script::Cyrillic);
//! ```
//!
//! ## Detection Rules
//!
//! In order, the first match wins:
//! 1. Empty input → `us-ascii`
//! 2. BOM (`EF BB BF`, `FE FF`, `FF FE`) → `UTF-8-BOM`, `UTF-16BE`, `UTF-16LE`
//! 3. Null byte within the first 8000 bytes → binary
//! 4. Caller-forced encoding ([`Classifier::with_encoding`])
//! 5. Hinted script heuristic, then Western European, Cyrillic, Japanese
//!    (first 16 KiB only)
//! 6. Valid non-ASCII UTF-8 → `UTF-8`, otherwise `us-ascii`
//!
//! ## Directory Dumps
//!
//! With the `dump` feature (on by default through `cli`), [`Dumper`] prints a directory tree
//! followed by the contents of every text file.

pub mod detector;
pub mod heuristics;
pub mod japanese;

#[cfg(feature = "dump")]
pub mod dump;

pub use detector::{
    classify, is_text,
    Classification, Classifier, EncodingSource, Script, ScriptParseError,
    BINARY_SCAN_LIMIT, MAX_SAMPLE,
};
pub use japanese::{guess_japanese, JapaneseCode};

#[cfg(feature = "dump")]
pub use dump::{BinaryMode, DumpConfig, DumpSummary, Dumper};
