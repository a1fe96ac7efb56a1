use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid message syntax: {message} at {line}:{column}")]
pub struct SyntaxError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

pub trait SyntaxValidator {
    fn validate(&self, message: &str) -> Result<(), SyntaxError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IcuSyntaxValidator;

impl SyntaxValidator for IcuSyntaxValidator {
    fn validate(&self, message: &str) -> Result<(), SyntaxError> {
        let mut cursor = Cursor::new(message);
        let mut depth: u32 = 0;
        let mut opened: Vec<(u32, u32)> = Vec::new();

        while let Some(ch) = cursor.next() {
            let in_text = depth % 2 == 0;
            match ch {
                '\'' if in_text => match cursor.peek() {
                    Some('\'') => {
                        cursor.next();
                    }
                    Some('{') | Some('}') | Some('#') | Some('|') => {
                        let (line, column) = cursor.position();
                        if !cursor.skip_quoted() {
                            return Err(cursor.error("unterminated quoted literal", line, column));
                        }
                    }
                    _ => {}
                },
                '{' => {
                    opened.push(cursor.position());
                    depth += 1;
                    if depth % 2 == 1 {
                        cursor.skip_whitespace();
                        if matches!(cursor.peek(), None | Some('}') | Some(',')) {
                            let (line, column) = cursor.position();
                            return Err(cursor.error("empty argument", line, column));
                        }
                    }
                }
                '}' => {
                    if opened.pop().is_none() {
                        let (line, column) = cursor.position();
                        return Err(cursor.error("unmatched closing brace", line, column));
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }

        match opened.pop() {
            Some((line, column)) => Err(cursor.error("unclosed brace", line, column)),
            None => Ok(()),
        }
    }
}

struct Cursor<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
            column: 0,
        }
    }

    fn next(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn position(&self) -> (u32, u32) {
        (self.line, self.column)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.next();
        }
    }

    fn skip_quoted(&mut self) -> bool {
        while let Some(ch) = self.next() {
            if ch == '\'' {
                if self.peek() == Some('\'') {
                    self.next();
                    continue;
                }
                return true;
            }
        }
        false
    }

    fn error(&self, message: &str, line: u32, column: u32) -> SyntaxError {
        SyntaxError {
            message: message.to_string(),
            line,
            column,
        }
    }
}
