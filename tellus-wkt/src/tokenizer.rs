//! Lexer for the well-known text grammar.

use crate::error::TellusWktError;

/// A lexical token with the byte position it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    /// A keyword, upper-cased.
    Word(String),
    Number(f64),
    LParen,
    RParen,
    Comma,
    Semicolon,
    Equals,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(w) => format!("'{w}'"),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Semicolon => "';'".into(),
            TokenKind::Equals => "'='".into(),
        }
    }
}

/// Splits the input into tokens, rejecting anything outside the grammar.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, TellusWktError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
            }
            b'(' => {
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    offset: i,
                });
                i += 1;
            }
            b')' => {
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    offset: i,
                });
                i += 1;
            }
            b',' => {
                tokens.push(Token {
                    kind: TokenKind::Comma,
                    offset: i,
                });
                i += 1;
            }
            b';' => {
                tokens.push(Token {
                    kind: TokenKind::Semicolon,
                    offset: i,
                });
                i += 1;
            }
            b'=' => {
                tokens.push(Token {
                    kind: TokenKind::Equals,
                    offset: i,
                });
                i += 1;
            }
            b'-' | b'+' | b'.' | b'0'..=b'9' => {
                let start = i;
                i += 1;
                while i < bytes.len()
                    && matches!(bytes[i], b'0'..=b'9' | b'.' | b'e' | b'E' | b'-' | b'+')
                {
                    // Signs are only part of the number right after an exponent.
                    if matches!(bytes[i], b'-' | b'+')
                        && !matches!(bytes[i - 1], b'e' | b'E')
                    {
                        break;
                    }
                    i += 1;
                }
                let text = &input[start..i];
                let value = text.parse::<f64>().map_err(|_| {
                    TellusWktError::Format(format!(
                        "invalid number '{text}' at position {start}"
                    ))
                })?;
                tokens.push(Token {
                    kind: TokenKind::Number(value),
                    offset: start,
                });
            }
            b'a'..=b'z' | b'A'..=b'Z' => {
                let start = i;
                while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Word(input[start..i].to_ascii_uppercase()),
                    offset: start,
                });
            }
            _ => {
                return Err(TellusWktError::Format(format!(
                    "unexpected character '{}' at position {i}",
                    char::from(b)
                )));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn tokenizes_a_point() {
        let tokens = tokenize("point z (10 -2.5 3e2)").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Word("POINT".into()),
                TokenKind::Word("Z".into()),
                TokenKind::LParen,
                TokenKind::Number(10.0),
                TokenKind::Number(-2.5),
                TokenKind::Number(300.0),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn tracks_offsets() {
        let tokens = tokenize("SRID=4326;POINT(1 2)").unwrap();
        assert_eq!(tokens[0].offset, 0);
        assert_eq!(tokens[1].kind, TokenKind::Equals);
        assert_eq!(tokens[2].kind, TokenKind::Number(4326.0));
        assert_eq!(tokens[3].kind, TokenKind::Semicolon);
        assert_eq!(tokens[4].offset, 10);
    }

    #[test]
    fn adjacent_numbers_split_on_sign() {
        let tokens = tokenize("1-2").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Number(1.0));
        assert_eq!(tokens[1].kind, TokenKind::Number(-2.0));
    }

    #[test]
    fn rejects_stray_characters() {
        assert_matches!(tokenize("POINT #"), Err(TellusWktError::Format(msg)) if msg.contains('#'));
        assert_matches!(tokenize("POINT (1..2 3)"), Err(TellusWktError::Format(_)));
    }
}
