//! Parser, evaluator and symbolic differentiator for functions of one variable `x`
//!
//! Supports numbers (with scientific notation), the variable `x`, the constants `pi` and
//! `e`, the operators `+ - * /`, powers written as `^` or `**` (right associative and
//! binding tighter than a leading minus, so `-x**2 = -(x**2)`), parentheses, and the
//! functions `sin cos tan exp ln log sqrt abs sign sinh cosh tanh` (`log` is the natural
//! logarithm).

use crate::{Error, ObjectiveTrait, Result, StrError};
use russell_lab::deriv1_central5;
use std::fmt;

// ast //////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Number(f64),
    Var,
    Neg(Box<Expr>),
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
    Abs,
    Sign,
    Sinh,
    Cosh,
    Tanh,
}

impl Func {
    fn from_name(name: &str) -> Option<Func> {
        let func = match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "exp" => Func::Exp,
            "ln" | "log" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "sign" => Func::Sign,
            "sinh" => Func::Sinh,
            "cosh" => Func::Cosh,
            "tanh" => Func::Tanh,
            _ => return None,
        };
        Some(func)
    }

    fn name(&self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Exp => "exp",
            Func::Ln => "ln",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Sign => "sign",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
        }
    }
}

/// Parsed function of one variable `x`
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    ast: Expr,
}

impl Expression {
    /// Parses an expression such as `x**3 - 2*x - 5`
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(parse_error(0, "empty expression"));
        }
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            end: input.len(),
        };
        let ast = parser.parse_add()?;
        if let Some(token) = parser.peek() {
            return Err(parse_error(
                token.position,
                &format!("unexpected {} after expression", token.kind),
            ));
        }
        Ok(Expression { ast })
    }

    /// Evaluates the expression at x
    ///
    /// `ln` of a non-positive number, `sqrt` of a negative number and a negative base
    /// raised to a non-integer power are reported as domain violations.
    pub fn eval(&self, x: f64) -> Result<f64> {
        eval_expr(&self.ast, x)
    }

    /// Returns the simplified symbolic derivative d/dx
    pub fn derivative(&self) -> Expression {
        Expression {
            ast: derive(&self.ast),
        }
    }

    /// Returns true if the expression does not depend on x
    pub fn is_constant(&self) -> bool {
        is_constant(&self.ast)
    }

    /// Calculates the derivative at x by central finite differences
    pub fn numerical_derivative(&self, x: f64) -> Result<f64> {
        let args = &mut 0;
        let value = deriv1_central5(x, args, |t, _| {
            self.eval(t)
                .map_err(|_| -> StrError { "function is undefined near the evaluation point" })
        })?;
        Ok(value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_expr(f, &self.ast)
    }
}

/// Function with its symbolic derivative, ready for Newton-Raphson
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicFunction {
    text: String,
    function: Expression,
    derivative: Expression,
}

impl SymbolicFunction {
    /// Parses f(x) and differentiates it
    pub fn parse(text: &str) -> Result<Self> {
        let function = Expression::parse(text)?;
        let derivative = function.derivative();
        Ok(SymbolicFunction {
            text: text.trim().to_string(),
            function,
            derivative,
        })
    }

    pub fn function(&self) -> &Expression {
        &self.function
    }

    pub fn derivative(&self) -> &Expression {
        &self.derivative
    }
}

impl ObjectiveTrait<f64> for SymbolicFunction {
    fn name(&self) -> &str {
        &self.text
    }

    fn value(&self, x: &f64) -> Result<f64> {
        self.function.eval(*x)
    }

    fn gradient(&self, x: &f64) -> Result<f64> {
        self.derivative.eval(*x)
    }
}

/// An expression alone differentiates numerically
impl ObjectiveTrait<f64> for Expression {
    fn name(&self) -> &str {
        "f(x)"
    }

    fn value(&self, x: &f64) -> Result<f64> {
        self.eval(*x)
    }

    fn gradient(&self, x: &f64) -> Result<f64> {
        self.numerical_derivative(*x)
    }
}

fn parse_error(position: usize, message: &str) -> Error {
    Error::Parse {
        position,
        message: message.to_string(),
    }
}

// evaluation ///////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn domain_error(function: &'static str, arg: f64) -> Error {
    Error::DomainViolation {
        objective: function,
        at: format!("argument {}", arg),
    }
}

fn eval_expr(e: &Expr, x: f64) -> Result<f64> {
    let value = match e {
        Expr::Number(n) => *n,
        Expr::Var => x,
        Expr::Neg(a) => -eval_expr(a, x)?,
        Expr::BinOp(op, a, b) => {
            let lhs = eval_expr(a, x)?;
            let rhs = eval_expr(b, x)?;
            match op {
                BinOp::Add => lhs + rhs,
                BinOp::Sub => lhs - rhs,
                BinOp::Mul => lhs * rhs,
                BinOp::Div => {
                    if rhs == 0.0 {
                        return Err(domain_error("division", lhs));
                    }
                    lhs / rhs
                }
                BinOp::Pow => {
                    if lhs == 0.0 && rhs < 0.0 {
                        return Err(domain_error("pow", lhs));
                    } else if rhs.fract() == 0.0 && f64::abs(rhs) <= i32::MAX as f64 {
                        lhs.powi(rhs as i32)
                    } else if lhs < 0.0 {
                        return Err(domain_error("pow", lhs));
                    } else {
                        lhs.powf(rhs)
                    }
                }
            }
        }
        Expr::Call(func, a) => {
            let arg = eval_expr(a, x)?;
            match func {
                Func::Sin => arg.sin(),
                Func::Cos => arg.cos(),
                Func::Tan => arg.tan(),
                Func::Exp => arg.exp(),
                Func::Ln => {
                    if arg <= 0.0 {
                        return Err(domain_error("ln", arg));
                    }
                    arg.ln()
                }
                Func::Sqrt => {
                    if arg < 0.0 {
                        return Err(domain_error("sqrt", arg));
                    }
                    arg.sqrt()
                }
                Func::Abs => arg.abs(),
                Func::Sign => {
                    if arg > 0.0 {
                        1.0
                    } else if arg < 0.0 {
                        -1.0
                    } else {
                        0.0
                    }
                }
                Func::Sinh => arg.sinh(),
                Func::Cosh => arg.cosh(),
                Func::Tanh => arg.tanh(),
            }
        }
    };
    Ok(value)
}

fn is_constant(e: &Expr) -> bool {
    match e {
        Expr::Number(_) => true,
        Expr::Var => false,
        Expr::Neg(a) | Expr::Call(_, a) => is_constant(a),
        Expr::BinOp(_, a, b) => is_constant(a) && is_constant(b),
    }
}

// differentiation //////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn derive(e: &Expr) -> Expr {
    match e {
        Expr::Number(_) => num(0.0),
        Expr::Var => num(1.0),
        Expr::Neg(a) => neg(derive(a)),
        Expr::BinOp(op, a, b) => {
            let (a, b) = (a.as_ref().clone(), b.as_ref().clone());
            match op {
                BinOp::Add => add(derive(&a), derive(&b)),
                BinOp::Sub => sub(derive(&a), derive(&b)),
                BinOp::Mul => add(mul(derive(&a), b.clone()), mul(a.clone(), derive(&b))),
                BinOp::Div => div(
                    sub(mul(derive(&a), b.clone()), mul(a.clone(), derive(&b))),
                    pow(b.clone(), num(2.0)),
                ),
                BinOp::Pow => {
                    if is_constant(&b) {
                        // d(a^n) = n a^(n-1) a'
                        mul(mul(b.clone(), pow(a.clone(), sub(b, num(1.0)))), derive(&a))
                    } else if is_constant(&a) {
                        // d(c^b) = c^b ln(c) b'
                        mul(mul(pow(a.clone(), b.clone()), call(Func::Ln, a)), derive(&b))
                    } else {
                        // d(a^b) = a^b (b' ln(a) + b a' / a)
                        let da = derive(&a);
                        let db = derive(&b);
                        mul(
                            pow(a.clone(), b.clone()),
                            add(mul(db, call(Func::Ln, a.clone())), div(mul(b, da), a)),
                        )
                    }
                }
            }
        }
        Expr::Call(func, a) => {
            let a = a.as_ref().clone();
            let da = derive(&a);
            let outer = match func {
                Func::Sin => call(Func::Cos, a),
                Func::Cos => neg(call(Func::Sin, a)),
                Func::Tan => div(num(1.0), pow(call(Func::Cos, a), num(2.0))),
                Func::Exp => call(Func::Exp, a),
                Func::Ln => div(num(1.0), a),
                Func::Sqrt => div(num(1.0), mul(num(2.0), call(Func::Sqrt, a))),
                Func::Abs => call(Func::Sign, a),
                Func::Sign => num(0.0),
                Func::Sinh => call(Func::Cosh, a),
                Func::Cosh => call(Func::Sinh, a),
                Func::Tanh => sub(num(1.0), pow(call(Func::Tanh, a), num(2.0))),
            };
            mul(outer, da)
        }
    }
}

// Constructors folding constants and neutral elements

fn num(value: f64) -> Expr {
    Expr::Number(value)
}

fn as_number(e: &Expr) -> Option<f64> {
    match e {
        Expr::Number(n) => Some(*n),
        _ => None,
    }
}

fn neg(a: Expr) -> Expr {
    match a {
        Expr::Number(n) => num(-n),
        Expr::Neg(inner) => *inner,
        other => Expr::Neg(Box::new(other)),
    }
}

fn add(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x + y),
        (Some(x), _) if x == 0.0 => b,
        (_, Some(y)) if y == 0.0 => a,
        (_, Some(y)) if y < 0.0 => Expr::BinOp(BinOp::Sub, Box::new(a), Box::new(num(-y))),
        _ => match b {
            Expr::Neg(inner) => Expr::BinOp(BinOp::Sub, Box::new(a), inner),
            b => Expr::BinOp(BinOp::Add, Box::new(a), Box::new(b)),
        },
    }
}

fn sub(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x - y),
        (Some(x), _) if x == 0.0 => neg(b),
        (_, Some(y)) if y == 0.0 => a,
        (_, Some(y)) if y < 0.0 => Expr::BinOp(BinOp::Add, Box::new(a), Box::new(num(-y))),
        _ => match b {
            Expr::Neg(inner) => Expr::BinOp(BinOp::Add, Box::new(a), inner),
            b => Expr::BinOp(BinOp::Sub, Box::new(a), Box::new(b)),
        },
    }
}

fn mul(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) => num(x * y),
        (Some(x), _) | (_, Some(x)) if x == 0.0 => num(0.0),
        (Some(x), _) if x == 1.0 => b,
        (_, Some(y)) if y == 1.0 => a,
        (Some(x), _) if x == -1.0 => neg(b),
        (_, Some(y)) if y == -1.0 => neg(a),
        // keep numeric factors on the left
        (None, Some(_)) => mul(b, a),
        _ => match (a, b) {
            (Expr::Neg(a), b) => neg(mul(*a, b)),
            (a, Expr::Neg(b)) => neg(mul(a, *b)),
            (a, b) => Expr::BinOp(BinOp::Mul, Box::new(a), Box::new(b)),
        },
    }
}

fn div(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (Some(x), Some(y)) if y != 0.0 => num(x / y),
        (Some(x), _) if x == 0.0 => num(0.0),
        (_, Some(y)) if y == 1.0 => a,
        _ => match (a, b) {
            (Expr::Neg(a), b) => neg(div(*a, b)),
            (a, b) => Expr::BinOp(BinOp::Div, Box::new(a), Box::new(b)),
        },
    }
}

fn pow(a: Expr, b: Expr) -> Expr {
    match (as_number(&a), as_number(&b)) {
        (_, Some(y)) if y == 0.0 => num(1.0),
        (_, Some(y)) if y == 1.0 => a,
        (Some(x), Some(y)) if x >= 0.0 || y.fract() == 0.0 => num(x.powf(y)),
        _ => Expr::BinOp(BinOp::Pow, Box::new(a), Box::new(b)),
    }
}

fn call(func: Func, a: Expr) -> Expr {
    Expr::Call(func, Box::new(a))
}

// display //////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::BinOp(BinOp::Add | BinOp::Sub, _, _) => 1,
        Expr::BinOp(BinOp::Mul | BinOp::Div, _, _) => 2,
        Expr::Neg(_) => 3,
        Expr::Number(n) if *n < 0.0 => 3,
        Expr::BinOp(BinOp::Pow, _, _) => 4,
        Expr::Number(_) | Expr::Var | Expr::Call(_, _) => 5,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, min_precedence: u8) -> fmt::Result {
    if precedence(e) < min_precedence {
        write!(f, "(")?;
        write_expr(f, e)?;
        write!(f, ")")
    } else {
        write_expr(f, e)
    }
}

fn write_expr(f: &mut fmt::Formatter<'_>, e: &Expr) -> fmt::Result {
    match e {
        Expr::Number(n) => {
            if *n == std::f64::consts::PI {
                write!(f, "pi")
            } else if *n == std::f64::consts::E {
                write!(f, "e")
            } else {
                write!(f, "{}", n)
            }
        }
        Expr::Var => write!(f, "x"),
        Expr::Neg(a) => {
            write!(f, "-")?;
            write_operand(f, a, 3)
        }
        Expr::BinOp(op, a, b) => {
            let (symbol, left, right) = match op {
                BinOp::Add => (" + ", 1, 1),
                BinOp::Sub => (" - ", 1, 2),
                BinOp::Mul => ("*", 2, 3),
                BinOp::Div => ("/", 2, 3),
                BinOp::Pow => ("^", 5, 3),
            };
            write_operand(f, a, left)?;
            write!(f, "{}", symbol)?;
            write_operand(f, b, right)
        }
        Expr::Call(func, a) => {
            write!(f, "{}(", func.name())?;
            write_expr(f, a)?;
            write!(f, ")")
        }
    }
}

// tokenizer ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Num(n) => write!(f, "number {}", n),
            TokenKind::Ident(name) => write!(f, "'{}'", name),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Token {
    kind: TokenKind,
    position: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (position, c) = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let single = match c {
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '/' => Some(TokenKind::Slash),
            '^' => Some(TokenKind::Caret),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            _ => None,
        };
        if let Some(kind) = single {
            tokens.push(Token { kind, position });
            i += 1;
            continue;
        }

        if c == '*' {
            // `**` is a power, as in Python
            if i + 1 < chars.len() && chars[i + 1].1 == '*' {
                tokens.push(Token {
                    kind: TokenKind::Caret,
                    position,
                });
                i += 2;
            } else {
                tokens.push(Token {
                    kind: TokenKind::Star,
                    position,
                });
                i += 1;
            }
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() {
                let d = chars[i].1;
                let exponent_sign = (d == '+' || d == '-') && i > start && matches!(chars[i - 1].1, 'e' | 'E');
                let exponent_mark = (d == 'e' || d == 'E')
                    && i + 1 < chars.len()
                    && (chars[i + 1].1.is_ascii_digit() || matches!(chars[i + 1].1, '+' | '-'));
                if d.is_ascii_digit() || d == '.' || exponent_mark || exponent_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            let end = if i < chars.len() { chars[i].0 } else { input.len() };
            let text = &input[position..end];
            let n: f64 = text
                .parse()
                .map_err(|_| parse_error(position, &format!("invalid number '{}'", text)))?;
            tokens.push(Token {
                kind: TokenKind::Num(n),
                position,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].1.is_ascii_alphanumeric() || chars[i].1 == '_') {
                i += 1;
            }
            let end = if i < chars.len() { chars[i].0 } else { input.len() };
            tokens.push(Token {
                kind: TokenKind::Ident(input[chars[start].0..end].to_string()),
                position,
            });
            continue;
        }

        return Err(parse_error(position, &format!("unexpected character '{}'", c)));
    }

    Ok(tokens)
}

// parser (recursive descent) ///////////////////////////////////////////////////////////////////////////////////////////////////////

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    end: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_rparen(&mut self, opened_at: usize) -> Result<()> {
        match self.next() {
            Some(Token {
                kind: TokenKind::RParen,
                ..
            }) => Ok(()),
            Some(token) => Err(parse_error(token.position, &format!("expected ')', got {}", token.kind))),
            None => Err(parse_error(
                self.end,
                &format!("missing ')' for '(' at position {}", opened_at),
            )),
        }
    }

    fn parse_add(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_mul()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.next();
            let rhs = self.parse_mul()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_mul(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.next();
            let rhs = self.parse_unary()?;
            lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Minus) => {
                self.next();
                let e = self.parse_unary()?;
                Ok(neg(e))
            }
            Some(TokenKind::Plus) => {
                self.next();
                self.parse_unary()
            }
            _ => self.parse_pow(),
        }
    }

    fn parse_pow(&mut self) -> Result<Expr> {
        let base = self.parse_atom()?;
        if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::Caret)) {
            self.next();
            // right associative; the exponent may carry its own sign
            let exponent = self.parse_unary()?;
            return Ok(Expr::BinOp(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Expr> {
        let token = match self.next() {
            Some(token) => token,
            None => return Err(parse_error(self.end, "unexpected end of expression")),
        };
        match &token.kind {
            TokenKind::Num(n) => Ok(Expr::Number(*n)),
            TokenKind::LParen => {
                let e = self.parse_add()?;
                self.expect_rparen(token.position)?;
                Ok(e)
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek().map(|t| &t.kind), Some(TokenKind::LParen)) {
                    let func = Func::from_name(name)
                        .ok_or_else(|| parse_error(token.position, &format!("unknown function '{}'", name)))?;
                    let open = self.next().map(|t| t.position).unwrap_or(self.end);
                    let arg = self.parse_add()?;
                    self.expect_rparen(open)?;
                    return Ok(Expr::Call(func, Box::new(arg)));
                }
                match name.as_str() {
                    "x" => Ok(Expr::Var),
                    "pi" => Ok(Expr::Number(std::f64::consts::PI)),
                    "e" => Ok(Expr::Number(std::f64::consts::E)),
                    _ => Err(parse_error(token.position, &format!("unknown identifier '{}'", name))),
                }
            }
            other => Err(parse_error(
                token.position,
                &format!("expected number, 'x', function or '(', got {}", other),
            )),
        }
    }
}

// tests ////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
