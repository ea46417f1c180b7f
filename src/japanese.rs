//! Japanese multi-byte encoding guesser
//!
//! Tells ISO-2022-JP (JIS), EUC-JP, Shift_JIS and UTF-8 apart.
//!
//! 7-bit input is JIS when it carries an ISO-2022-JP escape sequence.
//! 8-bit input is fed byte by byte to three small automata, one per
//! encoding. An automaton dies on the first byte its encoding cannot
//! produce. A character cut off by the end of the sample does not count
//! against it, since samples are truncated at arbitrary offsets.

const ESC: u8 = 0x1B;

// ISO-2022-JP designations following ESC
const JIS_ESCAPES: &[&[u8]] = &[
    b"$@",  // JIS C 6226-1978
    b"$B",  // JIS X 0208-1983
    b"$(D", // JIS X 0212-1990
    b"(B",  // ASCII
    b"(J",  // JIS X 0201 Roman
    b"(I",  // JIS X 0201 Katakana
];

/// Outcome of [`guess_japanese`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JapaneseCode {
    /// Not recognisably Japanese
    Unknown,
    /// ISO-2022-JP
    Jis,
    /// EUC-JP
    Euc,
    /// Shift_JIS
    Sjis,
    /// UTF-8
    Utf8,
}

/// Guess which Japanese encoding `data` is in
pub fn guess_japanese(data: &[u8]) -> JapaneseCode {
    if data.is_ascii() {
        return if has_jis_escape(data) {
            JapaneseCode::Jis
        } else {
            JapaneseCode::Unknown
        };
    }

    let mut utf8 = Utf8Scanner::default();
    let mut sjis = SjisScanner::default();
    let mut euc = EucScanner::default();

    for &b in data {
        utf8.feed(b);
        sjis.feed(b);
        euc.feed(b);
    }

    if utf8.alive && utf8.chars > 0 {
        return JapaneseCode::Utf8;
    }

    match (sjis.alive, euc.alive) {
        (true, true) if sjis.score > euc.score => JapaneseCode::Sjis,
        (true, true) if euc.score > sjis.score => JapaneseCode::Euc,
        (true, false) if sjis.score > 0 => JapaneseCode::Sjis,
        (false, true) if euc.score > 0 => JapaneseCode::Euc,
        _ => JapaneseCode::Unknown,
    }
}

fn has_jis_escape(data: &[u8]) -> bool {
    data.iter().enumerate().any(|(i, &b)| {
        b == ESC && JIS_ESCAPES.iter().any(|seq| data[i + 1..].starts_with(seq))
    })
}

/// UTF-8 automaton: counts complete multi-byte characters
#[derive(Debug)]
struct Utf8Scanner {
    alive: bool,
    pending: u8,
    chars: usize,
}

impl Default for Utf8Scanner {
    fn default() -> Self {
        Self {
            alive: true,
            pending: 0,
            chars: 0,
        }
    }
}

impl Utf8Scanner {
    fn feed(&mut self, b: u8) {
        if !self.alive {
            return;
        }
        if self.pending > 0 {
            if (0x80..=0xBF).contains(&b) {
                self.pending -= 1;
                if self.pending == 0 {
                    self.chars += 1;
                }
            } else {
                self.alive = false;
            }
            return;
        }
        match b {
            0x00..=0x7F => {}
            0xC2..=0xDF => self.pending = 1,
            0xE0..=0xEF => self.pending = 2,
            0xF0..=0xF4 => self.pending = 3,
            _ => self.alive = false,
        }
    }
}

/// Shift_JIS automaton
///
/// Double-byte characters score 1, hiragana and katakana rows (leads
/// 0x82 and 0x83) one more. Half-width katakana score nothing.
#[derive(Debug)]
struct SjisScanner {
    alive: bool,
    lead: Option<u8>,
    score: usize,
}

impl Default for SjisScanner {
    fn default() -> Self {
        Self {
            alive: true,
            lead: None,
            score: 0,
        }
    }
}

impl SjisScanner {
    fn feed(&mut self, b: u8) {
        if !self.alive {
            return;
        }
        if let Some(lead) = self.lead.take() {
            if matches!(b, 0x40..=0x7E | 0x80..=0xFC) {
                self.score += 1;
                if lead == 0x82 || lead == 0x83 {
                    self.score += 1;
                }
            } else {
                self.alive = false;
            }
            return;
        }
        match b {
            0x00..=0x7F | 0xA1..=0xDF => {}
            0x81..=0x9F | 0xE0..=0xFC => self.lead = Some(b),
            _ => self.alive = false,
        }
    }
}

/// EUC-JP automaton
///
/// Double-byte characters score 1, hiragana and katakana rows (leads
/// 0xA4 and 0xA5) one more. SS2 half-width katakana and SS3 JIS X 0212
/// characters score nothing.
#[derive(Debug)]
struct EucScanner {
    alive: bool,
    state: EucState,
    score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EucState {
    Start,
    /// After a JIS X 0208 lead byte
    Trail { kana: bool },
    /// After SS2 (0x8E)
    Kana,
    /// After SS3 (0x8F), awaiting two more bytes
    Supplement { remaining: u8 },
}

impl Default for EucScanner {
    fn default() -> Self {
        Self {
            alive: true,
            state: EucState::Start,
            score: 0,
        }
    }
}

impl EucScanner {
    fn feed(&mut self, b: u8) {
        if !self.alive {
            return;
        }
        let high = (0xA1..=0xFE).contains(&b);
        let state = self.state;
        self.state = match state {
            EucState::Start => match b {
                0x00..=0x7F => EucState::Start,
                0x8E => EucState::Kana,
                0x8F => EucState::Supplement { remaining: 2 },
                0xA1..=0xFE => EucState::Trail {
                    kana: b == 0xA4 || b == 0xA5,
                },
                _ => {
                    self.alive = false;
                    return;
                }
            },
            EucState::Trail { kana } if high => {
                self.score += if kana { 2 } else { 1 };
                EucState::Start
            }
            EucState::Kana if (0xA1..=0xDF).contains(&b) => EucState::Start,
            EucState::Supplement { remaining: 2 } if high => EucState::Supplement { remaining: 1 },
            EucState::Supplement { .. } if high => EucState::Start,
            _ => {
                self.alive = false;
                return;
            }
        };
    }
}
