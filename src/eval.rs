use std::collections::BTreeMap;

use num_bigint::BigInt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),
}

/// parentheses allowed inside one expression
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Int(BigInt),
    Ident(String),
    Op(char),
    LParen,
    RParen,
    Assign,
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Int(n) => n.to_string(),
            Token::Ident(name) => name.clone(),
            Token::Op(c) => c.to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Assign => "=".to_string(),
        }
    }
}

fn tokenize(line: &str) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    chars.next();
                }
                // digits only, so parsing cannot fail
                let value = digits
                    .parse::<BigInt>()
                    .map_err(|_| EvalError::UnexpectedToken(digits.clone()))?;
                tokens.push(Token::Int(value));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_alphanumeric() || **d == '_') {
                    name.push(d);
                    chars.next();
                }
                tokens.push(Token::Ident(name));
            }
            '+' | '-' | '*' | '/' | '%' => {
                tokens.push(Token::Op(c));
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '=' => {
                tokens.push(Token::Assign);
                chars.next();
            }
            other => return Err(EvalError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

/// integer calculator with variables, run on every committed console line
#[derive(Debug, Default)]
pub struct Interpreter {
    vars: BTreeMap<String, BigInt>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// run one line; `Ok(None)` for blanks and assignments
    pub fn execute(&mut self, line: &str) -> Result<Option<String>, EvalError> {
        let tokens = tokenize(line)?;
        if tokens.is_empty() {
            return Ok(None);
        }

        if let [Token::Ident(name), Token::Assign, rest @ ..] = tokens.as_slice() {
            let value = Parser::new(rest, &self.vars).parse()?;
            self.vars.insert(name.clone(), value);
            return Ok(None);
        }

        let value = Parser::new(&tokens, &self.vars).parse()?;
        Ok(Some(value.to_string()))
    }

    /// bindings sorted by name
    pub fn vars(&self) -> impl Iterator<Item = (&str, &BigInt)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    vars: &'a BTreeMap<String, BigInt>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], vars: &'a BTreeMap<String, BigInt>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
            vars,
        }
    }

    fn parse(mut self) -> Result<BigInt, EvalError> {
        let value = self.expr()?;
        match self.tokens.get(self.pos) {
            None => Ok(value),
            Some(token) => Err(EvalError::UnexpectedToken(token.text())),
        }
    }

    fn peek_op(&self, ops: &[char]) -> Option<char> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(c)) if ops.contains(c) => Some(*c),
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<BigInt, EvalError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek_op(&['+', '-']) {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<BigInt, EvalError> {
        let mut value = self.factor()?;
        while let Some(op) = self.peek_op(&['*', '/', '%']) {
            self.pos += 1;
            let rhs = self.factor()?;
            value = match op {
                '*' => value * rhs,
                _ if rhs == BigInt::from(0) => return Err(EvalError::DivisionByZero),
                '/' => value / rhs,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<BigInt, EvalError> {
        // a run of unary minus is folded here instead of recursing per sign
        let mut negate = false;
        while let Some(Token::Op('-')) = self.tokens.get(self.pos) {
            negate = !negate;
            self.pos += 1;
        }

        let value = self.primary()?;
        Ok(if negate { -value } else { value })
    }

    fn primary(&mut self) -> Result<BigInt, EvalError> {
        let token = self.tokens.get(self.pos).ok_or(EvalError::UnexpectedEnd)?;
        self.pos += 1;

        match token {
            Token::Int(n) => Ok(n.clone()),
            Token::Ident(name) => self
                .vars
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownVariable(name.clone())),
            Token::LParen => {
                if self.depth == MAX_NESTING {
                    return Err(EvalError::TooDeep(MAX_NESTING));
                }
                self.depth += 1;
                let value = self.expr()?;
                self.depth -= 1;

                match self.tokens.get(self.pos) {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(other) => Err(EvalError::UnexpectedToken(other.text())),
                    None => Err(EvalError::UnexpectedEnd),
                }
            }
            other => Err(EvalError::UnexpectedToken(other.text())),
        }
    }
}
