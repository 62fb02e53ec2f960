use std::borrow::Cow;

const fn create_windows_1252_table() -> [char; 256] {
    let mut table = [0 as char; 256];
    let mut i = 0usize;
    while i < 256 {
        let c = match i {
            128 => '\u{20ac}',
            129 => '\u{81}',
            130 => '\u{201a}',
            131 => '\u{0192}',
            132 => '\u{201e}',
            133 => '\u{2026}',
            134 => '\u{2020}',
            135 => '\u{2021}',
            136 => '\u{02c6}',
            137 => '\u{2030}',
            138 => '\u{0160}',
            139 => '\u{2039}',
            140 => '\u{0152}',
            141 => '\u{8d}',
            142 => '\u{017d}',
            143 => '\u{8f}',
            144 => '\u{90}',
            145 => '\u{2018}',
            146 => '\u{2019}',
            147 => '\u{201c}',
            148 => '\u{201d}',
            149 => '\u{2022}',
            150 => '\u{2013}',
            151 => '\u{2014}',
            152 => '\u{02dc}',
            153 => '\u{2122}',
            154 => '\u{0161}',
            155 => '\u{203a}',
            156 => '\u{0153}',
            157 => '\u{9d}',
            158 => '\u{017e}',
            159 => '\u{0178}',
            i => i as u8 as char,
        };
        table[i] = c;
        i += 1;
    }
    table
}

static WINDOWS_1252: [char; 256] = create_windows_1252_table();

/// Decodes bytes according to the windows1252 code page.
///
/// Steam writes narrow strings in whatever code page the publisher used, so
/// bytes that are not valid UTF-8 are interpreted as windows1252, which maps
/// every byte to a character and thus never fails.
///
/// ```
/// use appvdf::Windows1252Encoding;
///
/// assert_eq!(Windows1252Encoding::decode(b"Half-Life"), "Half-Life");
/// assert_eq!(Windows1252Encoding::decode(b"Pok\xe9mon"), "Pokémon");
/// assert_eq!(Windows1252Encoding::decode(b"\x8a"), "Š");
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Windows1252Encoding;

impl Windows1252Encoding {
    /// Creates a new windows 1252 decoder
    pub fn new() -> Self {
        Windows1252Encoding
    }

    /// Static method for decoding windows 1252 data
    pub fn decode(data: &[u8]) -> Cow<'_, str> {
        match data.iter().position(|x| !x.is_ascii()) {
            None => {
                // ascii is a subset of utf8
                debug_assert!(std::str::from_utf8(data).is_ok());
                Cow::Borrowed(std::str::from_utf8(data).unwrap_or_default())
            }
            Some(offset) => Cow::Owned(windows_1252_create(data, offset)),
        }
    }
}

fn windows_1252_create(d: &[u8], offset: usize) -> String {
    let (upto, rest) = d.split_at(offset);

    // size estimate: all remaining characters need translation
    let size_estimate = offset + (d.len() - offset) * 2;
    let mut result = String::with_capacity(size_estimate);
    result.extend(upto.iter().map(|&c| c as char));
    result.extend(rest.iter().map(|&c| WINDOWS_1252[usize::from(c)]));
    result
}

/// Interpret the bytes as utf8 when valid, otherwise as windows1252
pub(crate) fn decode_text(data: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(data) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Windows1252Encoding::decode(data),
    }
}
