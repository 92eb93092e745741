//! Template lexer
//!
//! Splits a template into literal text and the tokens of each action. Trim
//! markers (`{{- ` and ` -}}`) are applied here, and comments are dropped.

use super::ast::LiteralKind;
use super::error::{TemplateError, TemplateResult};
use crate::utils::{Position, Span};

const KEYWORDS: &[&str] = &[
    "block", "break", "continue", "define", "else", "end", "if", "range", "template", "with",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String),
    LeftDelim,
    RightDelim,
    Field(Vec<String>),
    Dot,
    Identifier(String),
    Keyword(String),
    Variable(String),
    Declare,
    Assign,
    LeftParen,
    RightParen,
    Comma,
    Pipe,
    Literal(LiteralKind, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\r' | '\n')
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn has_left_trim_marker(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'-' && is_space(bytes[1] as char)
}

fn has_right_trim_marker(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 2 && is_space(bytes[0] as char) && bytes[1] == b'-'
}

/// Whether `text` is a number constant: decimal, hex, octal, binary, float or imaginary
fn is_valid_number(text: &str) -> bool {
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let cleaned = body.replace('_', "");

    let radix_body = |prefixes: [&str; 2]| {
        prefixes
            .iter()
            .find_map(|prefix| cleaned.strip_prefix(*prefix))
            .map(str::to_string)
    };

    if let Some(digits) = radix_body(["0x", "0X"]) {
        return u64::from_str_radix(&digits, 16).is_ok();
    }
    if let Some(digits) = radix_body(["0o", "0O"]) {
        return u64::from_str_radix(&digits, 8).is_ok();
    }
    if let Some(digits) = radix_body(["0b", "0B"]) {
        return u64::from_str_radix(&digits, 2).is_ok();
    }

    let real = cleaned.strip_suffix('i').unwrap_or(&cleaned);
    real.starts_with(|c: char| c.is_ascii_digit() || c == '.') && real.parse::<f64>().is_ok()
}

pub struct Lexer<'a> {
    source: &'a str,
    left: &'a str,
    right: &'a str,
    pos: Position,
    tokens: Vec<SpannedToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, left: &'a str, right: &'a str) -> Self {
        Self {
            source,
            left,
            right,
            pos: Position::start(),
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(mut self) -> TemplateResult<Vec<SpannedToken>> {
        let mut trim_leading = false;

        while self.pos.offset < self.source.len() {
            let rest = self.rest();
            let text_len = rest.find(self.left).unwrap_or(rest.len());
            let at_action = text_len < rest.len();
            let trim_trailing = at_action && has_left_trim_marker(&rest[text_len + self.left.len()..]);

            let mut text = &rest[..text_len];
            if trim_leading {
                text = text.trim_start_matches(is_space);
            }
            if trim_trailing {
                text = text.trim_end_matches(is_space);
            }

            let text_start = self.pos;
            self.bump(text_len);
            if !text.is_empty() {
                self.push(Token::Text(text.to_string()), text_start);
            }

            if !at_action {
                break;
            }
            trim_leading = self.lex_action(trim_trailing)?;
        }

        Ok(self.tokens)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self, len: usize) {
        let end = self.pos.offset + len;
        self.pos = self.pos.advance_str(&self.source[self.pos.offset..end]);
    }

    fn push(&mut self, token: Token, start: Position) {
        self.tokens.push(SpannedToken {
            token,
            span: Span::new(start, self.pos),
        });
    }

    fn single(&mut self, token: Token, len: usize) {
        let start = self.pos;
        self.bump(len);
        self.push(token, start);
    }

    /// Some(trim) when positioned on the closing delimiter
    fn right_delim_here(&self) -> Option<bool> {
        let rest = self.rest();
        if has_right_trim_marker(rest) && rest[2..].starts_with(self.right) {
            Some(true)
        } else if rest.starts_with(self.right) {
            Some(false)
        } else {
            None
        }
    }

    fn consume_right_delim(&mut self, trim: bool) {
        let len = if trim { 2 } else { 0 } + self.right.len();
        self.single(Token::RightDelim, len);
    }

    /// Lex one action; returns whether it ended with a trim marker
    fn lex_action(&mut self, trim_marker: bool) -> TemplateResult<bool> {
        let start = self.pos;
        self.bump(self.left.len());
        if trim_marker {
            self.bump(2);
        }

        if self.rest().starts_with("/*") {
            return self.lex_comment(start);
        }

        self.tokens.push(SpannedToken {
            token: Token::LeftDelim,
            span: Span::new(start, self.pos),
        });

        loop {
            if let Some(trim) = self.right_delim_here() {
                self.consume_right_delim(trim);
                return Ok(trim);
            }

            let Some(ch) = self.peek() else {
                return Err(TemplateError::UnterminatedAction {
                    span: Span::new(start, self.pos),
                });
            };

            match ch {
                c if is_space(c) => self.bump(c.len_utf8()),
                '|' => self.single(Token::Pipe, 1),
                '(' => self.single(Token::LeftParen, 1),
                ')' => self.single(Token::RightParen, 1),
                ',' => self.single(Token::Comma, 1),
                '=' => self.single(Token::Assign, 1),
                ':' if self.peek_second() == Some('=') => self.single(Token::Declare, 2),
                '"' => self.lex_quoted('"', LiteralKind::String, true)?,
                '\'' => self.lex_quoted('\'', LiteralKind::Char, true)?,
                '`' => self.lex_quoted('`', LiteralKind::RawString, false)?,
                '$' => self.lex_variable(),
                '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                    self.lex_number()?
                }
                '.' => self.lex_field(),
                '+' | '-' | '0'..='9' => self.lex_number()?,
                c if c.is_alphabetic() || c == '_' => self.lex_identifier(),
                other => {
                    return Err(TemplateError::UnexpectedCharacter {
                        character: other,
                        span: Span::new(self.pos, self.pos.advance(other)),
                    })
                }
            }
        }
    }

    fn lex_comment(&mut self, start: Position) -> TemplateResult<bool> {
        let Some(close) = self.rest().find("*/") else {
            let end = start.advance_str(&self.source[start.offset..]);
            return Err(TemplateError::UnterminatedComment {
                span: Span::new(start, end),
            });
        };
        self.bump(close + 2);

        match self.right_delim_here() {
            Some(trim) => {
                let len = if trim { 2 } else { 0 } + self.right.len();
                self.bump(len);
                Ok(trim)
            }
            None => Err(TemplateError::UnsupportedConstruct {
                construct: "comment ends before closing delimiter".to_string(),
                span: Span::new(start, self.pos),
            }),
        }
    }

    fn lex_quoted(&mut self, quote: char, kind: LiteralKind, escapes: bool) -> TemplateResult<()> {
        let start = self.pos;
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1);
        let mut end = None;

        while let Some((index, ch)) = chars.next() {
            if escapes && ch == '\\' {
                chars.next();
            } else if ch == quote {
                end = Some(index + ch.len_utf8());
                break;
            } else if escapes && ch == '\n' {
                break;
            }
        }

        match end {
            Some(len) => {
                let text = rest[..len].to_string();
                self.bump(len);
                self.push(Token::Literal(kind, text), start);
                Ok(())
            }
            None => Err(TemplateError::UnterminatedQuote {
                span: Span::at(start),
            }),
        }
    }

    fn lex_variable(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        let len = 1 + rest[1..].find(|c: char| !is_word_char(c)).unwrap_or(rest.len() - 1);
        let name = rest[..len].to_string();
        self.bump(len);
        self.push(Token::Variable(name), start);
    }

    fn lex_field(&mut self) {
        let start = self.pos;
        let mut segments = Vec::new();

        while self.rest().starts_with('.') {
            let after = &self.rest()[1..];
            let len = after.find(|c: char| !is_word_char(c)).unwrap_or(after.len());
            if len == 0 {
                break;
            }
            segments.push(after[..len].to_string());
            self.bump(1 + len);
        }

        if segments.is_empty() {
            self.bump(1);
            self.push(Token::Dot, start);
        } else {
            self.push(Token::Field(segments), start);
        }
    }

    fn lex_number(&mut self) -> TemplateResult<()> {
        let start = self.pos;
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(index, c)| {
                let sign_allowed = index == 0
                    || matches!(rest.as_bytes()[index - 1], b'e' | b'E' | b'p' | b'P');
                !(c.is_ascii_alphanumeric()
                    || c == '.'
                    || c == '_'
                    || (matches!(c, '+' | '-') && sign_allowed))
            })
            .map(|(index, _)| index)
            .unwrap_or(rest.len());

        let text = &rest[..len];
        if !is_valid_number(text) {
            return Err(TemplateError::InvalidNumber {
                text: text.to_string(),
                span: Span::new(start, start.advance_str(text)),
            });
        }

        self.bump(len);
        self.push(Token::Literal(LiteralKind::Number, text.to_string()), start);
        Ok(())
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        let rest = self.rest();
        let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
        let word = &rest[..len];

        let token = match word {
            "true" | "false" => Token::Literal(LiteralKind::Bool, word.to_string()),
            "nil" => Token::Literal(LiteralKind::Nil, word.to_string()),
            keyword if KEYWORDS.contains(&keyword) => Token::Keyword(keyword.to_string()),
            _ => Token::Identifier(word.to_string()),
        };

        self.bump(len);
        self.push(token, start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(source: &str) -> Vec<Token> {
        Lexer::new(source, "{{", "}}")
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_text_only() {
        assert_eq!(kinds("plain text"), vec![Token::Text("plain text".to_string())]);
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_field_and_marker() {
        assert_eq!(
            kinds("Error {{ string .Param1 | int }}!"),
            vec![
                Token::Text("Error ".to_string()),
                Token::LeftDelim,
                Token::Identifier("string".to_string()),
                Token::Field(vec!["Param1".to_string()]),
                Token::Pipe,
                Token::Identifier("int".to_string()),
                Token::RightDelim,
                Token::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_multi_segment_field_is_one_token() {
        assert_eq!(
            kinds("{{.A.B}}"),
            vec![
                Token::LeftDelim,
                Token::Field(vec!["A".to_string(), "B".to_string()]),
                Token::RightDelim,
            ]
        );
    }

    #[test]
    fn test_trim_markers() {
        assert_eq!(
            kinds("a  {{- .X -}}  b"),
            vec![
                Token::Text("a".to_string()),
                Token::LeftDelim,
                Token::Field(vec!["X".to_string()]),
                Token::RightDelim,
                Token::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_negative_number_is_not_trim_marker() {
        assert_eq!(
            kinds("{{-3}}"),
            vec![
                Token::LeftDelim,
                Token::Literal(LiteralKind::Number, "-3".to_string()),
                Token::RightDelim,
            ]
        );
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(
            kinds("a {{/* note */}}b"),
            vec![Token::Text("a ".to_string()), Token::Text("b".to_string())]
        );
        assert_eq!(kinds("a {{- /* note */ -}} b"), vec![
            Token::Text("a".to_string()),
            Token::Text("b".to_string()),
        ]);
    }

    #[test]
    fn test_literals_keywords_and_variables() {
        assert_eq!(
            kinds(r#"{{ "q\"s" `raw` 'c' 0x1F 1.5e3 true nil if $x := }}"#),
            vec![
                Token::LeftDelim,
                Token::Literal(LiteralKind::String, r#""q\"s""#.to_string()),
                Token::Literal(LiteralKind::RawString, "`raw`".to_string()),
                Token::Literal(LiteralKind::Char, "'c'".to_string()),
                Token::Literal(LiteralKind::Number, "0x1F".to_string()),
                Token::Literal(LiteralKind::Number, "1.5e3".to_string()),
                Token::Literal(LiteralKind::Bool, "true".to_string()),
                Token::Literal(LiteralKind::Nil, "nil".to_string()),
                Token::Keyword("if".to_string()),
                Token::Variable("$x".to_string()),
                Token::Declare,
                Token::RightDelim,
            ]
        );
    }

    #[test]
    fn test_custom_delimiters() {
        let tokens: Vec<Token> = Lexer::new("x [[ .A ]] {{ .B }}", "[[", "]]")
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect();

        assert_eq!(
            tokens,
            vec![
                Token::Text("x ".to_string()),
                Token::LeftDelim,
                Token::Field(vec!["A".to_string()]),
                Token::RightDelim,
                Token::Text(" {{ .B }}".to_string()),
            ]
        );
    }

    #[test]
    fn test_lexical_errors() {
        let lex = |s: &str| Lexer::new(s, "{{", "}}").tokenize();

        assert_matches!(lex("oops {{ .A"), Err(TemplateError::UnterminatedAction { .. }));
        assert_matches!(lex(r#"{{ "open }}"#), Err(TemplateError::UnterminatedAction { .. }) | Err(TemplateError::UnterminatedQuote { .. }));
        assert_matches!(lex("{{ `open }}"), Err(TemplateError::UnterminatedQuote { .. }));
        assert_matches!(lex("{{/* open"), Err(TemplateError::UnterminatedComment { .. }));
        assert_matches!(lex("{{/* c */ .A }}"), Err(TemplateError::UnsupportedConstruct { .. }));
        assert_matches!(
            lex("{{ .A # }}"),
            Err(TemplateError::UnexpectedCharacter { character: '#', .. })
        );
        assert_matches!(lex("{{ 12abc }}"), Err(TemplateError::InvalidNumber { .. }));
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new("line one\n{{ .Name }}", "{{", "}}")
            .tokenize()
            .unwrap();
        let field = &tokens[2];
        assert_eq!(field.token, Token::Field(vec!["Name".to_string()]));
        assert_eq!(field.span.start, Position::new(12, 2, 4));
        assert_eq!(field.span.end, Position::new(17, 2, 9));
    }
}
