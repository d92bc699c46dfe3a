//! Expression parsing and evaluation.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr       := comparison
//! comparison := additive (("<" | "<=" | ">" | ">=" | "==" | "!=") additive)*
//! additive   := term (("+" | "-") term)*
//! term       := unary (("*" | "/") unary)*
//! unary      := ("-" | "+") unary | power
//! power      := primary ("^" unary)?
//! primary    := number | name | name "(" args ")" | "(" expr ")"
//! ```
//!
//! Comparisons evaluate to 1 or 0. `if(c, a, b)` selects `a` when `c != 0`.

use crate::error::{FunctionError, FunctionResult};
use bf_core::Real;
use nalgebra::Point3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Var {
    X,
    Y,
    Z,
    T,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Log10,
    Sqrt,
    Abs,
    Min,
    Max,
    Pow,
    Floor,
    Ceil,
}

impl Func {
    fn lookup(name: &str) -> Option<(Self, usize)> {
        let f = match name {
            "sin" => (Func::Sin, 1),
            "cos" => (Func::Cos, 1),
            "tan" => (Func::Tan, 1),
            "asin" => (Func::Asin, 1),
            "acos" => (Func::Acos, 1),
            "atan" => (Func::Atan, 1),
            "atan2" => (Func::Atan2, 2),
            "sinh" => (Func::Sinh, 1),
            "cosh" => (Func::Cosh, 1),
            "tanh" => (Func::Tanh, 1),
            "exp" => (Func::Exp, 1),
            "log" => (Func::Log, 1),
            "log10" => (Func::Log10, 1),
            "sqrt" => (Func::Sqrt, 1),
            "abs" => (Func::Abs, 1),
            "min" => (Func::Min, 2),
            "max" => (Func::Max, 2),
            "pow" => (Func::Pow, 2),
            "floor" => (Func::Floor, 1),
            "ceil" => (Func::Ceil, 1),
            _ => return None,
        };
        Some(f)
    }

    fn apply(self, a: Real, b: Real) -> Real {
        match self {
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Asin => a.asin(),
            Func::Acos => a.acos(),
            Func::Atan => a.atan(),
            Func::Atan2 => a.atan2(b),
            Func::Sinh => a.sinh(),
            Func::Cosh => a.cosh(),
            Func::Tanh => a.tanh(),
            Func::Exp => a.exp(),
            Func::Log => a.ln(),
            Func::Log10 => a.log10(),
            Func::Sqrt => a.sqrt(),
            Func::Abs => a.abs(),
            Func::Min => a.min(b),
            Func::Max => a.max(b),
            Func::Pow => a.powf(b),
            Func::Floor => a.floor(),
            Func::Ceil => a.ceil(),
        }
    }
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Num(Real),
    Var(Var),
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>, Option<Box<Expr>>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Parse a single scalar expression.
    pub fn parse(src: &str) -> FunctionResult<Self> {
        let tokens = lex(src)?;
        let mut parser = Parser {
            src,
            tokens,
            pos: 0,
        };
        let expr = parser.expr()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(parser.error_at(tok.pos, "unexpected trailing input")),
        }
    }

    /// Evaluate at point `p` with scalar argument `t`.
    pub fn eval(&self, p: &Point3<Real>, t: Real) -> Real {
        match self {
            Expr::Num(v) => *v,
            Expr::Var(Var::X) => p.x,
            Expr::Var(Var::Y) => p.y,
            Expr::Var(Var::Z) => p.z,
            Expr::Var(Var::T) => t,
            Expr::Neg(e) => -e.eval(p, t),
            Expr::Bin(op, a, b) => {
                let a = a.eval(p, t);
                let b = b.eval(p, t);
                match op {
                    BinOp::Add => a + b,
                    BinOp::Sub => a - b,
                    BinOp::Mul => a * b,
                    BinOp::Div => a / b,
                    BinOp::Pow => a.powf(b),
                    BinOp::Lt => bool_to_real(a < b),
                    BinOp::Le => bool_to_real(a <= b),
                    BinOp::Gt => bool_to_real(a > b),
                    BinOp::Ge => bool_to_real(a >= b),
                    BinOp::Eq => bool_to_real(a == b),
                    BinOp::Ne => bool_to_real(a != b),
                }
            }
            Expr::Call(f, a, b) => {
                let a = a.eval(p, t);
                let b = b.as_ref().map_or(0.0, |b| b.eval(p, t));
                f.apply(a, b)
            }
            Expr::If(c, a, b) => {
                if c.eval(p, t) != 0.0 {
                    a.eval(p, t)
                } else {
                    b.eval(p, t)
                }
            }
        }
    }
}

fn bool_to_real(b: bool) -> Real {
    if b { 1.0 } else { 0.0 }
}

/// Split `{a}{b}{c}` into its component expressions.
///
/// Text without a leading brace is a single component.
pub fn split_components(src: &str) -> FunctionResult<Vec<&str>> {
    let trimmed = src.trim();
    if !trimmed.starts_with('{') {
        return Ok(vec![trimmed]);
    }

    let mut parts = Vec::new();
    let mut rest = trimmed;
    while !rest.is_empty() {
        let offset = src.len() - rest.len();
        let Some(body) = rest.strip_prefix('{') else {
            return Err(FunctionError::Parse {
                expr: src.to_string(),
                pos: offset,
                what: "expected '{' to open a component".to_string(),
            });
        };
        let Some(close) = body.find('}') else {
            return Err(FunctionError::Parse {
                expr: src.to_string(),
                pos: offset,
                what: "unterminated component".to_string(),
            });
        };
        parts.push(&body[..close]);
        rest = body[close + 1..].trim_start();
    }
    Ok(parts)
}

#[derive(Clone, Debug, PartialEq)]
enum TokKind {
    Num(Real),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
    Comma,
}

#[derive(Clone, Debug)]
struct Tok {
    kind: TokKind,
    pos: usize,
}

fn lex(src: &str) -> FunctionResult<Vec<Tok>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        if c.is_ascii_digit() || c == b'.' {
            while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                let mut j = i + 1;
                if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                    j += 1;
                }
                if j < bytes.len() && bytes[j].is_ascii_digit() {
                    while j < bytes.len() && bytes[j].is_ascii_digit() {
                        j += 1;
                    }
                    i = j;
                }
            }
            let text = &src[start..i];
            let value = text.parse::<Real>().map_err(|_| FunctionError::Parse {
                expr: src.to_string(),
                pos: start,
                what: format!("invalid number '{text}'"),
            })?;
            tokens.push(Tok {
                kind: TokKind::Num(value),
                pos: start,
            });
            continue;
        }

        if c.is_ascii_alphabetic() || c == b'_' {
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Tok {
                kind: TokKind::Ident(src[start..i].to_string()),
                pos: start,
            });
            continue;
        }

        let next = bytes.get(i + 1).copied();
        let (kind, len) = match (c, next) {
            (b'<', Some(b'=')) => (TokKind::Op("<="), 2),
            (b'>', Some(b'=')) => (TokKind::Op(">="), 2),
            (b'=', Some(b'=')) => (TokKind::Op("=="), 2),
            (b'!', Some(b'=')) => (TokKind::Op("!="), 2),
            (b'<', _) => (TokKind::Op("<"), 1),
            (b'>', _) => (TokKind::Op(">"), 1),
            (b'+', _) => (TokKind::Op("+"), 1),
            (b'-', _) => (TokKind::Op("-"), 1),
            (b'*', _) => (TokKind::Op("*"), 1),
            (b'/', _) => (TokKind::Op("/"), 1),
            (b'^', _) => (TokKind::Op("^"), 1),
            (b'(', _) => (TokKind::LParen, 1),
            (b')', _) => (TokKind::RParen, 1),
            (b',', _) => (TokKind::Comma, 1),
            _ => {
                return Err(FunctionError::Parse {
                    expr: src.to_string(),
                    pos: start,
                    what: format!("unexpected character '{}'", c as char),
                });
            }
        };
        tokens.push(Tok { kind, pos: start });
        i += len;
    }

    Ok(tokens)
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Tok>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn peek_op(&self) -> Option<&'static str> {
        match self.peek() {
            Some(Tok {
                kind: TokKind::Op(op),
                ..
            }) => Some(*op),
            _ => None,
        }
    }

    fn next(&mut self) -> FunctionResult<Tok> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| self.error_at(self.src.len(), "unexpected end of input"))?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect(&mut self, kind: TokKind, what: &str) -> FunctionResult<()> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(())
        } else {
            Err(self.error_at(tok.pos, &format!("expected {what}")))
        }
    }

    fn error_at(&self, pos: usize, what: &str) -> FunctionError {
        FunctionError::Parse {
            expr: self.src.to_string(),
            pos,
            what: what.to_string(),
        }
    }

    fn expr(&mut self) -> FunctionResult<Expr> {
        let mut lhs = self.additive()?;
        while let Some(op) = self.peek_op() {
            let op = match op {
                "<" => BinOp::Lt,
                "<=" => BinOp::Le,
                ">" => BinOp::Gt,
                ">=" => BinOp::Ge,
                "==" => BinOp::Eq,
                "!=" => BinOp::Ne,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.additive()?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> FunctionResult<Expr> {
        let mut lhs = self.term()?;
        while let Some(op) = self.peek_op() {
            let op = match op {
                "+" => BinOp::Add,
                "-" => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> FunctionResult<Expr> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek_op() {
            let op = match op {
                "*" => BinOp::Mul,
                "/" => BinOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Bin(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> FunctionResult<Expr> {
        match self.peek_op() {
            Some("-") => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some("+") => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> FunctionResult<Expr> {
        let base = self.primary()?;
        if self.peek_op() == Some("^") {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(Expr::Bin(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> FunctionResult<Expr> {
        let tok = self.next()?;
        match tok.kind {
            TokKind::Num(v) => Ok(Expr::Num(v)),
            TokKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokKind::RParen, "')'")?;
                Ok(inner)
            }
            TokKind::Ident(name) => {
                if matches!(self.peek().map(|t| &t.kind), Some(TokKind::LParen)) {
                    self.pos += 1;
                    self.call(&name, tok.pos)
                } else {
                    self.name(&name, tok.pos)
                }
            }
            _ => Err(self.error_at(tok.pos, "expected a number, name or '('")),
        }
    }

    fn name(&self, name: &str, pos: usize) -> FunctionResult<Expr> {
        match name {
            "x" => Ok(Expr::Var(Var::X)),
            "y" => Ok(Expr::Var(Var::Y)),
            "z" => Ok(Expr::Var(Var::Z)),
            "t" => Ok(Expr::Var(Var::T)),
            "pi" => Ok(Expr::Num(std::f64::consts::PI)),
            "e" => Ok(Expr::Num(std::f64::consts::E)),
            _ => Err(self.error_at(pos, &format!("unknown variable '{name}'"))),
        }
    }

    fn call(&mut self, name: &str, pos: usize) -> FunctionResult<Expr> {
        let mut args = vec![self.expr()?];
        while matches!(self.peek().map(|t| &t.kind), Some(TokKind::Comma)) {
            self.pos += 1;
            args.push(self.expr()?);
        }
        self.expect(TokKind::RParen, "')'")?;

        if name == "if" {
            if args.len() != 3 {
                return Err(self.error_at(pos, "if() takes 3 arguments"));
            }
            let mut it = args.into_iter().map(Box::new);
            return match (it.next(), it.next(), it.next()) {
                (Some(c), Some(a), Some(b)) => Ok(Expr::If(c, a, b)),
                _ => Err(self.error_at(pos, "if() takes 3 arguments")),
            };
        }

        let Some((func, arity)) = Func::lookup(name) else {
            return Err(self.error_at(pos, &format!("unknown function '{name}'")));
        };
        if args.len() != arity {
            return Err(self.error_at(
                pos,
                &format!("{name}() takes {arity} argument(s), got {}", args.len()),
            ));
        }
        let mut it = args.into_iter().map(Box::new);
        match it.next() {
            Some(a) => Ok(Expr::Call(func, a, it.next())),
            None => Err(self.error_at(pos, "missing argument")),
        }
    }
}
