use crate::errors::{Error, ErrorKind};
use std::borrow::Cow;

const WHITESPACE: u8 = 1;
const DELIMITER: u8 = 2;

const CHARACTER_CLASS: [u8; 256] = create_character_class_table();

const fn create_character_class_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    table[b'\t' as usize] = WHITESPACE;
    table[b'\n' as usize] = WHITESPACE;
    table[b'\x0b' as usize] = WHITESPACE; // \v
    table[b'\x0c' as usize] = WHITESPACE; // \f
    table[b'\r' as usize] = WHITESPACE;
    table[b' ' as usize] = WHITESPACE;
    table[b'"' as usize] = DELIMITER;
    table[b'{' as usize] = DELIMITER;
    table[b'}' as usize] = DELIMITER;
    table
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    CHARACTER_CLASS[usize::from(b)] == WHITESPACE
}

#[inline]
fn is_boundary(b: u8) -> bool {
    CHARACTER_CLASS[usize::from(b)] != 0
}

/// A lexical token of KeyValues text
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) enum Token<'a> {
    /// A `{` token
    Open,

    /// A `}` token
    Close,

    /// A quoted string with its escapes resolved
    Quoted(Cow<'a, [u8]>),

    /// A run of bytes up to the next whitespace, quote, or brace
    Unquoted(&'a [u8]),
}

impl<'a> Token<'a> {
    pub(crate) fn into_scalar(self) -> Option<Cow<'a, [u8]>> {
        match self {
            Token::Quoted(x) => Some(x),
            Token::Unquoted(x) => Some(Cow::Borrowed(x)),
            Token::Open | Token::Close => None,
        }
    }
}

/// Splits KeyValues text into tokens, skipping whitespace, `//` comments,
/// and `[$CONDITION]` markers.
#[derive(Debug)]
pub(crate) struct Lexer<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        let position = if data.starts_with(b"\xef\xbb\xbf") {
            3
        } else {
            0
        };

        Lexer { data, position }
    }

    /// Byte offset of the next unread byte
    pub(crate) fn position(&self) -> usize {
        self.position
    }

    /// Returns the next token and the offset it starts at
    pub(crate) fn next_token(&mut self) -> Result<Option<(Token<'a>, usize)>, Error> {
        self.skip_trivia()?;
        let start = self.position;
        let Some(&b) = self.data.get(start) else {
            return Ok(None);
        };

        let token = match b {
            b'{' => {
                self.position += 1;
                Token::Open
            }
            b'}' => {
                self.position += 1;
                Token::Close
            }
            b'"' => self.read_quoted()?,
            _ => {
                let rest = &self.data[start..];
                let len = rest
                    .iter()
                    .position(|&x| is_boundary(x))
                    .unwrap_or(rest.len());
                self.position += len;
                Token::Unquoted(&rest[..len])
            }
        };

        Ok(Some((token, start)))
    }

    fn skip_trivia(&mut self) -> Result<(), Error> {
        loop {
            let rest = &self.data[self.position..];
            match rest {
                [b, ..] if is_whitespace(*b) => self.position += 1,
                [b'/', b'/', ..] => {
                    let len = rest
                        .iter()
                        .position(|&x| x == b'\n')
                        .unwrap_or(rest.len());
                    self.position += len;
                }
                [b'[', b'$', ..] | [b'[', b'!', b'$', ..] => {
                    let Some(end) = rest.iter().position(|&x| x == b']') else {
                        return Err(Error::new(ErrorKind::Text {
                            msg: "unterminated conditional",
                            offset: self.position,
                        }));
                    };
                    self.position += end + 1;
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_quoted(&mut self) -> Result<Token<'a>, Error> {
        let start = self.position;
        let body = &self.data[start + 1..];

        // Fast path: no escapes before the closing quote
        for (i, &b) in body.iter().enumerate() {
            match b {
                b'"' => {
                    self.position = start + 1 + i + 1;
                    return Ok(Token::Quoted(Cow::Borrowed(&body[..i])));
                }
                b'\\' => return self.read_escaped(start, i),
                _ => {}
            }
        }

        Err(Error::new(ErrorKind::UnterminatedString {
            offset: start as u64,
        }))
    }

    fn read_escaped(&mut self, start: usize, prefix: usize) -> Result<Token<'a>, Error> {
        let body = &self.data[start + 1..];
        let mut result = body[..prefix].to_vec();
        let mut i = prefix;
        while let Some(&b) = body.get(i) {
            match b {
                b'"' => {
                    self.position = start + 1 + i + 1;
                    return Ok(Token::Quoted(Cow::Owned(result)));
                }
                b'\\' => {
                    let escaped = match body.get(i + 1) {
                        Some(b'n') => b'\n',
                        Some(b't') => b'\t',
                        Some(b'"') => b'"',
                        Some(b'\\') => b'\\',
                        Some(&x) => {
                            result.push(b'\\');
                            x
                        }
                        None => break,
                    };
                    result.push(escaped);
                    i += 2;
                }
                _ => {
                    result.push(b);
                    i += 1;
                }
            }
        }

        Err(Error::new(ErrorKind::UnterminatedString {
            offset: start as u64,
        }))
    }
}
