use super::SyntaxError;

/// A lexical token with its 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Int(u64),
    Float(f64),
    Str(String),
    Ident(String),
    True,
    False,
    None,
    And,
    Or,
    Not,
    If,
    Else,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Newline,
    Eof,
}

impl TokenKind {
    /// Human-readable form used in "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Int(i) => format!("integer {i}"),
            TokenKind::Float(f) => format!("float {f}"),
            TokenKind::Str(_) => "string".to_string(),
            TokenKind::Ident(name) => format!("name '{name}'"),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::None => "None",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::DoubleSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            _ => "?",
        }
    }
}

/// Splits source text into tokens.
///
/// Newlines are significant only outside brackets; consecutive newlines
/// collapse into one token. The result always ends with `Eof`.
///
/// # Errors
/// Returns `SyntaxError` on unterminated strings, bad escapes, malformed
/// numbers, unbalanced closing brackets and unexpected characters.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    depth: usize,
    tokens: Vec<Token>,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                ' ' | '\t' | '\r' | '\u{c}' => {
                    self.bump();
                }
                '\n' => {
                    self.bump();
                    let last_is_newline = matches!(
                        self.tokens.last().map(|t| &t.kind),
                        None | Some(TokenKind::Newline)
                    );
                    if self.depth == 0 && !last_is_newline {
                        self.push(TokenKind::Newline, line, column);
                    }
                }
                '#' => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                '0'..='9' => {
                    let kind = self.number()?;
                    self.push(kind, line, column);
                }
                '\'' | '"' => {
                    let text = self.string(false)?;
                    self.push(TokenKind::Str(text), line, column);
                }
                c if is_ident_start(c) => {
                    if let Some(raw) = self.string_prefix() {
                        let text = self.string(raw)?;
                        self.push(TokenKind::Str(text), line, column);
                    } else {
                        let kind = self.identifier();
                        self.push(kind, line, column);
                    }
                }
                _ => {
                    let kind = self.punctuation()?;
                    self.push(kind, line, column);
                }
            }
        }

        if self.depth > 0 {
            return Err(self.error("unclosed bracket at end of input"));
        }
        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, line, column);
        Ok(self.tokens)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.line, self.column, message)
    }

    fn identifier(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|c| is_ident_continue(*c)) {
            name.push(c);
            self.bump();
        }
        match name.as_str() {
            "True" => TokenKind::True,
            "False" => TokenKind::False,
            "None" => TokenKind::None,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            _ => TokenKind::Ident(name),
        }
    }

    /// Consumes a `r`/`u` string prefix when one is directly followed by a quote.
    /// Returns whether the string is raw.
    fn string_prefix(&mut self) -> Option<bool> {
        let prefix = self.peek()?;
        if !matches!(self.peek_at(1), Some('\'' | '"')) {
            return None;
        }
        match prefix {
            'r' | 'R' => {
                self.bump();
                Some(true)
            }
            'u' | 'U' => {
                self.bump();
                Some(false)
            }
            _ => None,
        }
    }

    fn string(&mut self, raw: bool) -> Result<String, SyntaxError> {
        let (line, column) = (self.line, self.column);
        let Some(quote) = self.bump() else {
            return Err(self.error("expected string"));
        };
        let triple = self.peek() == Some(quote) && self.peek_at(1) == Some(quote);
        if triple {
            self.bump();
            self.bump();
        }

        let mut text = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(SyntaxError::new(line, column, "unterminated string"));
            };
            if c == quote {
                if !triple {
                    return Ok(text);
                }
                if self.peek() == Some(quote) && self.peek_at(1) == Some(quote) {
                    self.bump();
                    self.bump();
                    return Ok(text);
                }
                text.push(c);
                continue;
            }
            if c == '\n' && !triple {
                return Err(SyntaxError::new(line, column, "unterminated string"));
            }
            if c == '\\' {
                if raw {
                    // Raw strings keep the backslash but still cannot end on an escaped quote.
                    text.push('\\');
                    if let Some(next) = self.peek().filter(|n| *n == quote || *n == '\\') {
                        text.push(next);
                        self.bump();
                    }
                } else {
                    self.escape(&mut text)?;
                }
                continue;
            }
            text.push(c);
        }
    }

    fn escape(&mut self, text: &mut String) -> Result<(), SyntaxError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unterminated escape sequence"));
        };
        match c {
            '\\' => text.push('\\'),
            '\'' => text.push('\''),
            '"' => text.push('"'),
            'n' => text.push('\n'),
            'r' => text.push('\r'),
            't' => text.push('\t'),
            '0' => text.push('\0'),
            '\n' => {}
            'x' => {
                let code = self.hex_digits(2)?;
                text.push(self.char_from(code)?);
            }
            'u' if self.peek() == Some('{') => {
                self.bump();
                let mut digits = String::new();
                while let Some(d) = self.peek().filter(|d| *d != '}') {
                    digits.push(d);
                    self.bump();
                }
                if self.bump() != Some('}') {
                    return Err(self.error("unterminated unicode escape"));
                }
                let code = u32::from_str_radix(&digits, 16)
                    .map_err(|_| self.error(format!("invalid unicode escape '{digits}'")))?;
                text.push(self.char_from(code)?);
            }
            'u' => {
                let code = self.hex_digits(4)?;
                text.push(self.char_from(code)?);
            }
            other => {
                text.push('\\');
                text.push(other);
            }
        }
        Ok(())
    }

    fn hex_digits(&mut self, count: usize) -> Result<u32, SyntaxError> {
        let mut digits = String::with_capacity(count);
        for _ in 0..count {
            match self.bump() {
                Some(d) if d.is_ascii_hexdigit() => digits.push(d),
                _ => return Err(self.error(format!("expected {count} hex digits in escape"))),
            }
        }
        u32::from_str_radix(&digits, 16).map_err(|e| self.error(e.to_string()))
    }

    fn char_from(&self, code: u32) -> Result<char, SyntaxError> {
        char::from_u32(code).ok_or_else(|| self.error(format!("invalid character code {code:#x}")))
    }

    fn number(&mut self) -> Result<TokenKind, SyntaxError> {
        let mut text = String::new();
        let mut is_float = false;

        self.digits(&mut text);
        if self.peek() == Some('.') && !self.peek_at(1).is_some_and(is_ident_start) {
            is_float = true;
            text.push('.');
            self.bump();
            self.digits(&mut text);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                text.push('e');
                self.bump();
                if sign {
                    if let Some(s) = self.bump() {
                        text.push(s);
                    }
                }
                self.digits(&mut text);
            }
        }
        if self.peek().is_some_and(is_ident_continue) {
            return Err(self.error(format!("invalid numeric literal '{text}'")));
        }

        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|e| self.error(format!("invalid float '{text}': {e}")))
        } else {
            text.parse::<u64>()
                .map(TokenKind::Int)
                .map_err(|e| self.error(format!("invalid integer '{text}': {e}")))
        }
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
            } else if c != '_' {
                break;
            }
            self.bump();
        }
    }

    fn punctuation(&mut self) -> Result<TokenKind, SyntaxError> {
        let Some(c) = self.bump() else {
            return Err(self.error("unexpected end of input"));
        };
        let next = self.peek();
        let kind = match (c, next) {
            ('/', Some('/')) => {
                self.bump();
                TokenKind::DoubleSlash
            }
            ('=', Some('=')) => {
                self.bump();
                TokenKind::Eq
            }
            ('!', Some('=')) => {
                self.bump();
                TokenKind::NotEq
            }
            ('<', Some('=')) => {
                self.bump();
                TokenKind::LtEq
            }
            ('>', Some('=')) => {
                self.bump();
                TokenKind::GtEq
            }
            ('(', _) => self.open(TokenKind::LParen),
            ('[', _) => self.open(TokenKind::LBracket),
            ('{', _) => self.open(TokenKind::LBrace),
            (')', _) => self.close(TokenKind::RParen)?,
            (']', _) => self.close(TokenKind::RBracket)?,
            ('}', _) => self.close(TokenKind::RBrace)?,
            (',', _) => TokenKind::Comma,
            (':', _) => TokenKind::Colon,
            ('.', _) => TokenKind::Dot,
            ('=', _) => TokenKind::Assign,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,
            ('%', _) => TokenKind::Percent,
            ('<', _) => TokenKind::Lt,
            ('>', _) => TokenKind::Gt,
            (other, _) => return Err(self.error(format!("unexpected character '{other}'"))),
        };
        Ok(kind)
    }

    fn open(&mut self, kind: TokenKind) -> TokenKind {
        self.depth += 1;
        kind
    }

    fn close(&mut self, kind: TokenKind) -> Result<TokenKind, SyntaxError> {
        if self.depth == 0 {
            return Err(self.error(format!("unmatched '{}'", kind.symbol())));
        }
        self.depth -= 1;
        Ok(kind)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
