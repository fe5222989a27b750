//! Tokenizer for node expressions.

use super::error::ExpressionError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    Dot,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Question,
    Colon,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    AndAnd,
    OrOr,
    Eof,
}

impl TokenKind {
    /// Short human-readable form used in error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => n.to_string(),
            TokenKind::Str(s) => format!("{:?}", s),
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Dot => ".".to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Question => "?".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::Bang => "!".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::Le => "<=".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::Ge => ">=".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::EqEqEq => "===".to_string(),
            TokenKind::NotEqEq => "!==".to_string(),
            TokenKind::AndAnd => "&&".to_string(),
            TokenKind::OrOr => "||".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Character offset of the first character of the token.
    pub position: usize,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            position: 0,
        }
    }

    /// Splits the whole source into tokens, ending with `Eof`.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, ExpressionError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.position += 1;
        }
    }

    fn next_token(&mut self) -> Result<Token, ExpressionError> {
        self.skip_whitespace();
        let start = self.position;
        let Some(ch) = self.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position: start,
            });
        };

        let kind = match ch {
            '.' if matches!(self.peek(), Some(d) if d.is_ascii_digit()) => {
                self.position = start;
                self.lex_number()?
            }
            '.' => TokenKind::Dot,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '?' => TokenKind::Question,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '<' => self.with_eq(TokenKind::Lt, TokenKind::Le),
            '>' => self.with_eq(TokenKind::Gt, TokenKind::Ge),
            '!' => match (self.peek(), self.peek_at(1)) {
                (Some('='), Some('=')) => {
                    self.position += 2;
                    TokenKind::NotEqEq
                }
                (Some('='), _) => {
                    self.position += 1;
                    TokenKind::NotEq
                }
                _ => TokenKind::Bang,
            },
            '=' => match (self.peek(), self.peek_at(1)) {
                (Some('='), Some('=')) => {
                    self.position += 2;
                    TokenKind::EqEqEq
                }
                (Some('='), _) => {
                    self.position += 1;
                    TokenKind::EqEq
                }
                _ => {
                    return Err(ExpressionError::InvalidSyntax {
                        message: format!("assignment is not supported (position {})", start),
                    })
                }
            },
            '&' if self.peek() == Some('&') => {
                self.position += 1;
                TokenKind::AndAnd
            }
            '|' if self.peek() == Some('|') => {
                self.position += 1;
                TokenKind::OrOr
            }
            '\'' | '"' => self.lex_string(ch)?,
            c if c.is_ascii_digit() => {
                self.position = start;
                self.lex_number()?
            }
            c if is_ident_start(c) => {
                let mut name = String::from(c);
                while let Some(c) = self.peek() {
                    if is_ident_part(c) {
                        name.push(c);
                        self.position += 1;
                    } else {
                        break;
                    }
                }
                TokenKind::Ident(name)
            }
            other => {
                return Err(ExpressionError::UnexpectedToken {
                    position: start,
                    found: other.to_string(),
                    expected: "expression".to_string(),
                })
            }
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn with_eq(&mut self, plain: TokenKind, with_eq: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.position += 1;
            with_eq
        } else {
            plain
        }
    }

    fn lex_number(&mut self) -> Result<TokenKind, ExpressionError> {
        let start = self.position;
        let mut text = String::new();
        self.take_digits(&mut text);
        if self.peek() == Some('.') && matches!(self.peek_at(1), Some(d) if d.is_ascii_digit()) {
            text.push('.');
            self.position += 1;
            self.take_digits(&mut text);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if matches!(self.peek_at(digit_at), Some(d) if d.is_ascii_digit()) {
                text.push('e');
                self.position += 1;
                if sign {
                    text.extend(self.next());
                }
                self.take_digits(&mut text);
            }
        }
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ExpressionError::InvalidSyntax {
                message: format!("invalid number '{}' at position {}", text, start),
            })
    }

    fn take_digits(&mut self, out: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                out.push(ch);
                self.position += 1;
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<TokenKind, ExpressionError> {
        let mut value = String::new();
        loop {
            match self.next() {
                Some(ch) if ch == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.next() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('/') => value.push('/'),
                    Some('\\') => value.push('\\'),
                    Some('\'') => value.push('\''),
                    Some('"') => value.push('"'),
                    Some('u') => value.push(self.lex_unicode_escape()?),
                    Some(_) | None => {
                        return Err(ExpressionError::InvalidSyntax {
                            message: "Invalid escape sequence".to_string(),
                        })
                    }
                },
                Some(ch) => value.push(ch),
                None => {
                    return Err(ExpressionError::UnexpectedEnd {
                        expected: format!("closing quote '{}'", quote),
                    })
                }
            }
        }
    }

    fn lex_unicode_escape(&mut self) -> Result<char, ExpressionError> {
        let mut hex = String::new();
        for _ in 0..4 {
            match self.next() {
                Some(ch) if ch.is_ascii_hexdigit() => hex.push(ch),
                _ => {
                    return Err(ExpressionError::InvalidSyntax {
                        message: "Invalid unicode escape".to_string(),
                    })
                }
            }
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| ExpressionError::InvalidSyntax {
                message: format!("Invalid unicode escape \\u{}", hex),
            })
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_member_chain() {
        assert_eq!(
            kinds("items[0].name"),
            vec![
                TokenKind::Ident("items".to_string()),
                TokenKind::LBracket,
                TokenKind::Number(0.0),
                TokenKind::RBracket,
                TokenKind::Dot,
                TokenKind::Ident("name".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators_prefer_longest_match() {
        assert_eq!(
            kinds("a === b !== c == d != e <= f >= g && h || !i"),
            vec![
                TokenKind::Ident("a".to_string()),
                TokenKind::EqEqEq,
                TokenKind::Ident("b".to_string()),
                TokenKind::NotEqEq,
                TokenKind::Ident("c".to_string()),
                TokenKind::EqEq,
                TokenKind::Ident("d".to_string()),
                TokenKind::NotEq,
                TokenKind::Ident("e".to_string()),
                TokenKind::Le,
                TokenKind::Ident("f".to_string()),
                TokenKind::Ge,
                TokenKind::Ident("g".to_string()),
                TokenKind::AndAnd,
                TokenKind::Ident("h".to_string()),
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Ident("i".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1.5 .25 2e3 7"),
            vec![
                TokenKind::Number(1.5),
                TokenKind::Number(0.25),
                TokenKind::Number(2000.0),
                TokenKind::Number(7.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_strings_with_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "a\"bé""#),
            vec![
                TokenKind::Str("it's".to_string()),
                TokenKind::Str("a\"bé".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_fails() {
        assert!(matches!(
            Lexer::tokenize("'abc"),
            Err(ExpressionError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_assignment_and_stray_characters_fail() {
        assert!(Lexer::tokenize("a = 1").is_err());
        assert!(Lexer::tokenize("a & b").is_err());
        assert!(Lexer::tokenize("a; b").is_err());
        assert!(Lexer::tokenize("f => 1").is_err());
    }
}
