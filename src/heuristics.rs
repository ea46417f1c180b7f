//! Per-script encoding heuristics
//!
//! Every heuristic is a pure function of the sample. `None` means the
//! heuristic is inconclusive. Byte thresholds work on raw bytes, never on
//! decoded characters.

use crate::detector::Script;
use crate::japanese::{guess_japanese, JapaneseCode};

/// A script heuristic: sample in, encoding name out
pub type Heuristic = fn(&[u8]) -> Option<&'static str>;

/// Scripts with an implemented heuristic. Families missing here have none.
const HEURISTICS: &[(Script, Heuristic)] = &[
    (Script::Arabic, arabic),
    (Script::Baltic, baltic),
    (Script::CentralEuropean, central_european),
    (Script::Cyrillic, cyrillic),
    (Script::Greek, greek),
    (Script::Hebrew, hebrew),
    (Script::Japanese, japanese),
    (Script::Turkish, turkish),
    (Script::WesternEuropean, western_european),
];

// Only the first bytes are looked at by the Cyrillic scanner
const CYRILLIC_WINDOW: usize = 1000;

// Minimum number of high-bit bytes before the Cyrillic scanner answers
const CYRILLIC_MIN_HIGH: usize = 8;

// Score bonus for a repeated sentence-end pair
const CYRILLIC_MARKER_BONUS: usize = 10;

/// Look up the heuristic for a script
pub fn lookup(script: Script) -> Option<Heuristic> {
    HEURISTICS
        .iter()
        .find(|(s, _)| *s == script)
        .map(|&(_, heuristic)| heuristic)
}

/// Run the heuristic for `script` over `sample`
///
/// Scripts without a heuristic yield `None`.
pub fn run(script: Script, sample: &[u8]) -> Option<&'static str> {
    lookup(script).and_then(|heuristic| heuristic(sample))
}

/// Western European: UTF-8, cp1252 or iso-8859-15
///
/// The last byte is never examined.
pub fn western_european(sample: &[u8]) -> Option<&'static str> {
    let mut non_ansi = 0usize;

    for pair in sample.windows(2) {
        let (b, next) = (pair[0], pair[1]);
        if b <= 0x79 {
            continue;
        }
        non_ansi += 1;
        if b > 0xC1 && b < 0xF0 && next > 0x7F && next < 0xC0 {
            return Some("UTF-8");
        }
        if (0x78..=0x9F).contains(&b) {
            return Some("cp1252");
        }
    }

    if non_ansi > 0 {
        Some("iso-8859-15")
    } else {
        // plain ASCII
        None
    }
}

/// Cyrillic: UTF-8, ibm866, cp1251 or koi8-u
pub fn cyrillic(sample: &[u8]) -> Option<&'static str> {
    let mut utf8_marks = 0usize;
    let mut koi_score = 0usize;
    let mut cp1251_score = 0usize;
    let mut koi_markers = 0usize;
    let mut cp1251_markers = 0usize;
    let mut cp1251_range = 0usize;
    let mut koi_range = 0usize;
    let mut ibm866_range = 0usize;

    let window = &sample[..sample.len().min(CYRILLIC_WINDOW)];

    for pair in window.windows(2) {
        let (prev, b) = (pair[0], pair[1]);
        match b {
            0xE0..=0xFF => {
                cp1251_range += 1;
                if b == 0xEE {
                    cp1251_score += 1;
                } else if b == 0xF2 && prev == 0xF1 {
                    cp1251_markers += 1;
                }
            }
            0xC0..=0xDF => {
                koi_range += 1;
                if b == 0xD0 || b == 0xD1 {
                    utf8_marks += 1;
                }
                if b == 0xCF {
                    koi_score += 1;
                } else if b == 0xD4 && prev == 0xD3 {
                    koi_markers += 1;
                }
            }
            0xA0..=0xAF => ibm866_range += 1,
            _ => {}
        }
    }

    let high = cp1251_range + koi_range + ibm866_range;
    if high < CYRILLIC_MIN_HIGH {
        return None;
    }
    if 3 * utf8_marks > high {
        return Some("UTF-8");
    }
    if ibm866_range > cp1251_range + koi_range {
        return Some("ibm866");
    }

    if cp1251_markers == 0 && koi_markers > 1 {
        koi_score += CYRILLIC_MARKER_BONUS;
    } else if koi_markers == 0 && cp1251_markers > 1 {
        cp1251_score += CYRILLIC_MARKER_BONUS;
    }

    if cp1251_score > koi_score {
        Some("cp1251")
    } else {
        Some("koi8-u")
    }
}

/// Japanese: delegates to [`guess_japanese`]
pub fn japanese(sample: &[u8]) -> Option<&'static str> {
    match guess_japanese(sample) {
        JapaneseCode::Jis => Some("jis7"),
        JapaneseCode::Euc => Some("eucjp"),
        JapaneseCode::Sjis => Some("sjis"),
        JapaneseCode::Utf8 => Some("utf8"),
        JapaneseCode::Unknown => None,
    }
}

/// Arabic: cp1256 or iso-8859-6
pub fn arabic(sample: &[u8]) -> Option<&'static str> {
    let marker = sample.iter().any(|&b| {
        matches!(b,
            0x80..=0x9F | 0xA1..=0xA3 | 0xA5..=0xAB | 0xAE..=0xBA
            | 0xBC..=0xBE | 0xC0 | 0xDB..=0xDF | 0xF3..=0xFF)
    });
    Some(if marker { "cp1256" } else { "iso-8859-6" })
}

/// Baltic: cp1257 or iso-8859-13
pub fn baltic(sample: &[u8]) -> Option<&'static str> {
    for &b in sample {
        match b {
            0x80..=0x9E => return Some("cp1257"),
            0xA1 | 0xA5 => return Some("iso-8859-13"),
            _ => {}
        }
    }
    Some("iso-8859-13")
}

/// Central European: ibm852, cp1250, iso-8859-2 or iso-8859-3
///
/// A cp1250 control-range byte outranks an earlier iso-8859-2 marker.
pub fn central_european(sample: &[u8]) -> Option<&'static str> {
    let mut charset = None;
    for &b in sample {
        match b {
            0x81 | 0x83 | 0x90 | 0x98 => return Some("ibm852"),
            0x80..=0x9F => charset = Some("cp1250"),
            0xA5 | 0xAE | 0xBE | 0xC3 | 0xD0 | 0xE3 | 0xF0 => {
                charset.get_or_insert("iso-8859-2");
            }
            _ => {}
        }
    }
    Some(charset.unwrap_or("iso-8859-3"))
}

/// Greek: cp1253 or iso-8859-7
pub fn greek(sample: &[u8]) -> Option<&'static str> {
    let marker = sample.iter().any(|&b| {
        matches!(b,
            0x80 | 0x82..=0x87 | 0x89 | 0x8B | 0x91..=0x97 | 0x99 | 0x9B
            | 0xA4 | 0xA5 | 0xAE)
    });
    Some(if marker { "cp1253" } else { "iso-8859-7" })
}

/// Hebrew: cp1255 or iso-8859-8-i
pub fn hebrew(sample: &[u8]) -> Option<&'static str> {
    for &b in sample {
        match b {
            0x80 | 0x82..=0x89 | 0x8B | 0x91..=0x99 | 0x9B | 0xA1 | 0xBF..=0xC9 | 0xCB..=0xD8 => {
                return Some("cp1255")
            }
            0xDF => return Some("iso-8859-8-i"),
            _ => {}
        }
    }
    Some("iso-8859-8-i")
}

/// Turkish: cp1254 or iso-8859-9
pub fn turkish(sample: &[u8]) -> Option<&'static str> {
    let marker = sample
        .iter()
        .any(|&b| matches!(b, 0x80 | 0x82..=0x8C | 0x91..=0x9C | 0x9F));
    Some(if marker { "cp1254" } else { "iso-8859-9" })
}
