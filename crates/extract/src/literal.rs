//! A deliberately small grammar for the mapping literals models write:
//!
//! ```text
//! mapping := '{' (entry (',' entry)* ','?)? '}'
//! entry   := key ':' value
//! key     := string | identifier
//! value   := string | number | True | False | None | true | false | null
//! ```
//!
//! Strings may use single or double quotes. Nothing is evaluated; anything
//! outside this shape is rejected.

use std::collections::BTreeMap;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
}

impl Literal {
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Int(_) => "integer",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "boolean",
            Literal::None => "none",
        }
    }
}

pub fn parse_mapping(input: &str) -> Result<BTreeMap<String, Literal>, ParseError> {
    let mut parser = Parser {
        chars: input.char_indices().collect(),
        pos: 0,
        len: input.len(),
    };

    parser.skip_ws();
    if parser.peek() != Some('{') {
        return Err(ParseError::NoMapping);
    }
    let mapping = parser.mapping()?;
    parser.skip_ws();
    if parser.peek().is_some() {
        return Err(parser.error("trailing characters after mapping"));
    }
    Ok(mapping)
}

struct Parser {
    chars: Vec<(usize, char)>,
    pos: usize,
    len: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|&(i, _)| i).unwrap_or(self.len)
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::Syntax {
            offset: self.offset(),
            message: message.to_string(),
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, want: char) -> Result<(), ParseError> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == want => {
                self.pos += 1;
                Ok(())
            }
            _ => Err(self.error(&format!("expected '{want}'"))),
        }
    }

    fn mapping(&mut self) -> Result<BTreeMap<String, Literal>, ParseError> {
        self.expect('{')?;
        let mut entries = BTreeMap::new();

        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(entries);
            }

            let key = self.key()?;
            self.expect(':')?;
            self.skip_ws();
            let value = self.value()?;
            if entries.contains_key(&key) {
                return Err(ParseError::DuplicateKey(key));
            }
            entries.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {
                    self.pos += 1;
                    return Ok(entries);
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('\'') | Some('"') => self.string(),
            Some(c) if c.is_alphabetic() || c == '_' => Ok(self.identifier()),
            _ => Err(self.error("expected key")),
        }
    }

    fn value(&mut self) -> Result<Literal, ParseError> {
        match self.peek() {
            Some('\'') | Some('"') => self.string().map(Literal::Str),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let start = self.pos;
                match self.identifier().as_str() {
                    "True" | "true" => Ok(Literal::Bool(true)),
                    "False" | "false" => Ok(Literal::Bool(false)),
                    "None" | "null" => Ok(Literal::None),
                    _ => {
                        self.pos = start;
                        Err(self.error("bare names are not allowed as values"))
                    }
                }
            }
            _ => Err(self.error("expected value")),
        }
    }

    fn identifier(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                ident.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        ident
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();

        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self.bump().ok_or_else(|| self.error("unterminated string"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' => out.push(escaped),
                        '\n' => {}
                        'x' => out.push(self.hex_escape(2)?),
                        'u' => out.push(self.hex_escape(4)?),
                        other => {
                            // Unknown escapes are kept verbatim
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, ParseError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }

    fn number(&mut self) -> Result<Literal, ParseError> {
        let start = self.pos;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_') {
                if c != '_' {
                    text.push(c);
                }
                self.pos += 1;
            } else {
                break;
            }
        }

        if let Ok(n) = text.parse::<i64>() {
            return Ok(Literal::Int(n));
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Literal::Float(f)),
            _ => {
                self.pos = start;
                Err(self.error("invalid number"))
            }
        }
    }
}
