//! Text/binary classification and encoding detection
//!
//! The decision procedure runs in stages, and the first stage that reaches
//! an answer wins:
//!
//! 1. Empty input → `us-ascii` text
//! 2. Byte order mark → `UTF-8-BOM`, `UTF-16BE` or `UTF-16LE`
//! 3. Null byte in the first [`BINARY_SCAN_LIMIT`] bytes → binary
//! 4. User-chosen encoding (see [`Classifier::with_encoding`])
//! 5. Script heuristics: the hinted script, then Western European,
//!    Cyrillic and Japanese
//! 6. Whole-buffer UTF-8 validity → `UTF-8`, else `us-ascii`

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::heuristics;

/// Maximum number of bytes handed to the script heuristics
pub const MAX_SAMPLE: usize = 16 * 1024;

/// Maximum number of bytes searched for a null byte
pub const BINARY_SCAN_LIMIT: usize = 8000;

/// Encoding name reported for binary data
pub const BINARY: &str = "binary";

/// Encoding name reported when nothing more specific was found
pub const US_ASCII: &str = "us-ascii";

// Byte order marks, in priority order
const BOMS: &[(&[u8], &str)] = &[
    (&[0xEF, 0xBB, 0xBF], "UTF-8-BOM"),
    (&[0xFE, 0xFF], "UTF-16BE"),
    (&[0xFF, 0xFE], "UTF-16LE"),
];

/// How the encoding of a [`Classification`] was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncodingSource {
    /// Nothing matched; the default guess stands
    #[default]
    Default,
    /// Guessed by a script heuristic or the UTF-8 fallback
    AutoDetected,
    /// A byte order mark was found
    Bom,
    /// Declared in an XML prolog (never produced)
    XmlHeader,
    /// Declared in an HTML meta tag (never produced)
    MetaTag,
    /// Forced by the caller
    UserChosen,
}

impl fmt::Display for EncodingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EncodingSource::Default => "default",
            EncodingSource::AutoDetected => "heuristic",
            EncodingSource::Bom => "bom",
            EncodingSource::XmlHeader => "xml-header",
            EncodingSource::MetaTag => "meta-tag",
            EncodingSource::UserChosen => "user",
        };
        f.write_str(s)
    }
}

/// Language script family used to pick a heuristic
///
/// Families without a heuristic are accepted everywhere and simply never
/// produce an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Script {
    #[default]
    None,
    Arabic,
    Baltic,
    CentralEuropean,
    ChineseSimplified,
    ChineseTraditional,
    Cyrillic,
    Greek,
    Hebrew,
    Japanese,
    Korean,
    Turkish,
    WesternEuropean,
    Unicode,
}

impl Script {
    /// Every script family, in declaration order
    pub const ALL: [Script; 14] = [
        Script::None,
        Script::Arabic,
        Script::Baltic,
        Script::CentralEuropean,
        Script::ChineseSimplified,
        Script::ChineseTraditional,
        Script::Cyrillic,
        Script::Greek,
        Script::Hebrew,
        Script::Japanese,
        Script::Korean,
        Script::Turkish,
        Script::WesternEuropean,
        Script::Unicode,
    ];

    /// Kebab-case name, as accepted by [`Script::from_str`]
    pub fn name(self) -> &'static str {
        match self {
            Script::None => "none",
            Script::Arabic => "arabic",
            Script::Baltic => "baltic",
            Script::CentralEuropean => "central-european",
            Script::ChineseSimplified => "chinese-simplified",
            Script::ChineseTraditional => "chinese-traditional",
            Script::Cyrillic => "cyrillic",
            Script::Greek => "greek",
            Script::Hebrew => "hebrew",
            Script::Japanese => "japanese",
            Script::Korean => "korean",
            Script::Turkish => "turkish",
            Script::WesternEuropean => "western-european",
            Script::Unicode => "unicode",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for script name parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptParseError {
    /// The rejected input
    pub input: String,
}

impl fmt::Display for ScriptParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown script '{}'. Expected one of: ", self.input)?;
        for (i, script) in Script::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(script.name())?;
        }
        Ok(())
    }
}

impl std::error::Error for ScriptParseError {}

impl FromStr for Script {
    type Err = ScriptParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Script::ALL
            .iter()
            .copied()
            .find(|script| script.name() == wanted)
            .ok_or_else(|| ScriptParseError { input: s.to_string() })
    }
}

/// Result of classifying a byte buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Guessed encoding name, or `"binary"`
    pub encoding: Cow<'static, str>,
    /// How the encoding was decided
    pub source: EncodingSource,
    /// Script whose heuristic produced the answer, if any
    pub script: Script,
    /// Whether the data looks binary
    pub is_binary: bool,
}

impl Classification {
    fn binary() -> Self {
        Self {
            encoding: Cow::Borrowed(BINARY),
            source: EncodingSource::Default,
            script: Script::None,
            is_binary: true,
        }
    }

    fn text(encoding: impl Into<Cow<'static, str>>, source: EncodingSource, script: Script) -> Self {
        Self {
            encoding: encoding.into(),
            source,
            script,
            is_binary: false,
        }
    }

    /// Whether the data looks like text
    pub fn is_text(&self) -> bool {
        !self.is_binary
    }
}

/// Configurable classifier
///
/// [`classify`] covers the common case; use this when a forced encoding
/// is needed.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    script_hint: Script,
    forced_encoding: Option<String>,
}

impl Classifier {
    /// Create a classifier with no script hint and no forced encoding
    pub fn new() -> Self {
        Self::default()
    }

    /// Try this script's heuristic before the built-in ones
    pub fn with_script(mut self, script: Script) -> Self {
        self.script_hint = script;
        self
    }

    /// Force the encoding name for text input without a BOM
    ///
    /// Empty names are ignored.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        let encoding = encoding.into();
        self.forced_encoding = if encoding.trim().is_empty() {
            None
        } else {
            Some(encoding)
        };
        self
    }

    /// Classify a byte buffer
    pub fn classify(&self, data: &[u8]) -> Classification {
        if data.is_empty() {
            return Classification::text(US_ASCII, EncodingSource::Default, Script::None);
        }

        if let Some(encoding) = check_bom(data) {
            return Classification::text(encoding, EncodingSource::Bom, Script::None);
        }

        if is_binary(data) {
            return Classification::binary();
        }

        if let Some(encoding) = &self.forced_encoding {
            return Classification::text(encoding.clone(), EncodingSource::UserChosen, Script::None);
        }

        let sample = &data[..data.len().min(MAX_SAMPLE)];

        if self.script_hint != Script::None {
            if let Some(encoding) = heuristics::run(self.script_hint, sample) {
                return Classification::text(encoding, EncodingSource::AutoDetected, self.script_hint);
            }
        }

        for script in [Script::WesternEuropean, Script::Cyrillic, Script::Japanese] {
            if let Some(encoding) = heuristics::run(script, sample) {
                return Classification::text(encoding, EncodingSource::AutoDetected, script);
            }
        }

        // Scans the whole buffer, not just the sample
        if !data.is_ascii() && std::str::from_utf8(data).is_ok() {
            return Classification::text("UTF-8", EncodingSource::AutoDetected, Script::None);
        }

        Classification::text(US_ASCII, EncodingSource::Default, Script::None)
    }
}

/// Classify a byte buffer, trying `script_hint`'s heuristic first
pub fn classify(data: &[u8], script_hint: Script) -> Classification {
    Classifier::new().with_script(script_hint).classify(data)
}

/// Quick text/binary check
///
/// Only looks for null bytes; no BOM scan and no heuristics. Empty input
/// is text.
pub fn is_text(data: &[u8]) -> bool {
    data.is_empty() || !is_binary(data)
}

/// Any null byte in the first [`BINARY_SCAN_LIMIT`] bytes → binary
pub fn is_binary(data: &[u8]) -> bool {
    let window = &data[..data.len().min(BINARY_SCAN_LIMIT)];
    window.contains(&0)
}

/// Match a byte order mark at the start of `data`
pub fn check_bom(data: &[u8]) -> Option<&'static str> {
    BOMS.iter()
        .find(|(prefix, _)| data.starts_with(prefix))
        .map(|&(_, name)| name)
}
