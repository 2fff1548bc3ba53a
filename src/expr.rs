//! A small statement and guard language for program graphs.
//!
//! This module provides the bundled evaluators used by the program-graph
//! expander: [`AssignActionDef`] for actions and [`ExprConditionDef`] for guards.
//!
//! # Syntax
//!
//! ```text
//! statement := "skip" | assign (";" assign)*
//! assign    := ident ":=" expr
//! expr      := or
//! or        := and ("||" and)*
//! and       := cmp ("&&" cmp)*
//! cmp       := sum (("==" | "!=" | "<" | "<=" | ">" | ">=") sum)?
//! sum       := term (("+" | "-") term)*
//! term      := unary (("*" | "/" | "%") unary)*
//! unary     := ("!" | "-") unary | atom
//! atom      := int | "true" | "false" | ident | "(" expr ")"
//! ```
//!
//! An empty guard is always true. Assignments in one statement run left to
//! right, each one seeing the effect of the previous ones.
//!
//! # Examples
//!
//! ```
//! use lts_rs::expand::{ActionDef, ConditionDef};
//! use lts_rs::expr::{AssignActionDef, ExprConditionDef, Valuation, Value};
//!
//! let eval = AssignActionDef.effect(&Valuation::new(), "x := 0; y := x + 2").unwrap();
//! assert_eq!(eval["y"], Value::Int(2));
//! assert!(ExprConditionDef.evaluate(&eval, "x < y && !(y == 0)").unwrap());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::expand::{ActionDef, ConditionDef};

#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Value {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Variable valuation. Ordered, so that it hashes structurally.
pub type Valuation = BTreeMap<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("parse error in {input:?} at byte {pos}: {message}")]
    Parse {
        input: String,
        pos: usize,
        message: String,
    },

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: Value },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Expr {
    Lit(Value),
    Var(String),
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn eval(&self, eval: &Valuation) -> Result<Value, EvalError> {
        match self {
            Expr::Lit(v) => Ok(v.clone()),
            Expr::Var(name) => eval
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            Expr::Not(e) => Ok(Value::Bool(!as_bool(e.eval(eval)?)?)),
            Expr::Neg(e) => as_int(e.eval(eval)?)?
                .checked_neg()
                .map(Value::Int)
                .ok_or(EvalError::Overflow),
            Expr::Binary(BinOp::And, lhs, rhs) => {
                Ok(Value::Bool(as_bool(lhs.eval(eval)?)? && as_bool(rhs.eval(eval)?)?))
            }
            Expr::Binary(BinOp::Or, lhs, rhs) => {
                Ok(Value::Bool(as_bool(lhs.eval(eval)?)? || as_bool(rhs.eval(eval)?)?))
            }
            Expr::Binary(op, lhs, rhs) => binary(*op, lhs.eval(eval)?, rhs.eval(eval)?),
        }
    }
}

fn as_int(v: Value) -> Result<i64, EvalError> {
    match v {
        Value::Int(n) => Ok(n),
        found => Err(EvalError::TypeMismatch {
            expected: "integer",
            found,
        }),
    }
}

fn as_bool(v: Value) -> Result<bool, EvalError> {
    match v {
        Value::Bool(b) => Ok(b),
        found => Err(EvalError::TypeMismatch {
            expected: "boolean",
            found,
        }),
    }
}

fn binary(op: BinOp, a: Value, b: Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Eq => Ok(Value::Bool(a == b)),
        BinOp::Ne => Ok(Value::Bool(a != b)),
        BinOp::And => Ok(Value::Bool(as_bool(a)? && as_bool(b)?)),
        BinOp::Or => Ok(Value::Bool(as_bool(a)? || as_bool(b)?)),
        BinOp::Add => arithmetic(a, b, i64::checked_add),
        BinOp::Sub => arithmetic(a, b, i64::checked_sub),
        BinOp::Mul => arithmetic(a, b, i64::checked_mul),
        BinOp::Div => division(a, b, i64::checked_div),
        BinOp::Mod => division(a, b, i64::checked_rem),
        BinOp::Lt => comparison(a, b, i64::lt),
        BinOp::Le => comparison(a, b, i64::le),
        BinOp::Gt => comparison(a, b, i64::gt),
        BinOp::Ge => comparison(a, b, i64::ge),
    }
}

fn arithmetic(a: Value, b: Value, f: fn(i64, i64) -> Option<i64>) -> Result<Value, EvalError> {
    f(as_int(a)?, as_int(b)?).map(Value::Int).ok_or(EvalError::Overflow)
}

fn division(a: Value, b: Value, f: fn(i64, i64) -> Option<i64>) -> Result<Value, EvalError> {
    let (a, b) = (as_int(a)?, as_int(b)?);
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    f(a, b).map(Value::Int).ok_or(EvalError::Overflow)
}

fn comparison(a: Value, b: Value, f: fn(&i64, &i64) -> bool) -> Result<Value, EvalError> {
    Ok(Value::Bool(f(&as_int(a)?, &as_int(b)?)))
}

// ─── Lexer ───

#[derive(Debug, Clone, Eq, PartialEq)]
enum Token {
    Int(i64),
    Ident(String),
    Sym(&'static str),
}

const SYMBOLS: [&str; 19] = [
    ":=", "==", "!=", "<=", ">=", "&&", "||", "<", ">", "+", "-", "*", "/", "%", "!", "(", ")", ";", "=",
];

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, EvalError> {
    let error = |pos: usize, message: &str| EvalError::Parse {
        input: input.to_string(),
        pos,
        message: message.to_string(),
    };

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let c = bytes[pos];
        if c.is_ascii_whitespace() {
            pos += 1;
        } else if c.is_ascii_digit() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let n = input[start..pos]
                .parse()
                .map_err(|_| error(start, "integer literal out of range"))?;
            tokens.push((start, Token::Int(n)));
        } else if c.is_ascii_alphabetic() || c == b'_' {
            let start = pos;
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            tokens.push((start, Token::Ident(input[start..pos].to_string())));
        } else {
            let sym = SYMBOLS
                .iter()
                .find(|s| input[pos..].starts_with(**s))
                .ok_or_else(|| error(pos, "unexpected character"))?;
            tokens.push((pos, Token::Sym(*sym)));
            pos += sym.len();
        }
    }
    Ok(tokens)
}

// ─── Parser ───

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(usize, Token)>,
    index: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, EvalError> {
        Ok(Self {
            input,
            tokens: tokenize(input)?,
            index: 0,
        })
    }

    fn error(&self, message: impl Into<String>) -> EvalError {
        let pos = self.tokens.get(self.index).map_or(self.input.len(), |(pos, _)| *pos);
        EvalError::Parse {
            input: self.input.to_string(),
            pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|(_, t)| t)
    }

    fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn eat(&mut self, sym: &str) -> bool {
        if matches!(self.peek(), Some(Token::Sym(s)) if *s == sym) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, sym: &str) -> Result<(), EvalError> {
        if self.eat(sym) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", sym)))
        }
    }

    fn ident(&mut self) -> Result<String, EvalError> {
        match self.peek() {
            Some(Token::Ident(name)) if !is_keyword(name) => {
                let name = name.clone();
                self.index += 1;
                Ok(name)
            }
            _ => Err(self.error("expected identifier")),
        }
    }

    fn finish(&self) -> Result<(), EvalError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing input"))
        }
    }

    fn statement(&mut self) -> Result<Vec<(String, Expr)>, EvalError> {
        if matches!(self.peek(), Some(Token::Ident(k)) if k == "skip") {
            self.index += 1;
            return Ok(Vec::new());
        }
        let mut assignments = Vec::new();
        loop {
            let var = self.ident()?;
            self.expect(":=")?;
            assignments.push((var, self.expr()?));
            if !self.eat(";") || self.is_at_end() {
                break;
            }
        }
        Ok(assignments)
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.and()?;
        while self.eat("||") {
            lhs = Expr::binary(BinOp::Or, lhs, self.and()?);
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.cmp()?;
        while self.eat("&&") {
            lhs = Expr::binary(BinOp::And, lhs, self.cmp()?);
        }
        Ok(lhs)
    }

    fn cmp(&mut self) -> Result<Expr, EvalError> {
        let lhs = self.sum()?;
        let ops = [
            ("==", BinOp::Eq),
            ("=", BinOp::Eq),
            ("!=", BinOp::Ne),
            ("<=", BinOp::Le),
            (">=", BinOp::Ge),
            ("<", BinOp::Lt),
            (">", BinOp::Gt),
        ];
        for (sym, op) in ops {
            if self.eat(sym) {
                return Ok(Expr::binary(op, lhs, self.sum()?));
            }
        }
        Ok(lhs)
    }

    fn sum(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            if self.eat("+") {
                lhs = Expr::binary(BinOp::Add, lhs, self.term()?);
            } else if self.eat("-") {
                lhs = Expr::binary(BinOp::Sub, lhs, self.term()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            if self.eat("*") {
                lhs = Expr::binary(BinOp::Mul, lhs, self.unary()?);
            } else if self.eat("/") {
                lhs = Expr::binary(BinOp::Div, lhs, self.unary()?);
            } else if self.eat("%") {
                lhs = Expr::binary(BinOp::Mod, lhs, self.unary()?);
            } else {
                return Ok(lhs);
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        if self.eat("!") {
            Ok(Expr::Not(Box::new(self.unary()?)))
        } else if self.eat("-") {
            Ok(Expr::Neg(Box::new(self.unary()?)))
        } else {
            self.atom()
        }
    }

    fn atom(&mut self) -> Result<Expr, EvalError> {
        if self.eat("(") {
            let e = self.expr()?;
            self.expect(")")?;
            return Ok(e);
        }
        let expr = match self.peek() {
            Some(Token::Int(n)) => Expr::Lit(Value::Int(*n)),
            Some(Token::Ident(k)) if k == "true" => Expr::Lit(Value::Bool(true)),
            Some(Token::Ident(k)) if k == "false" => Expr::Lit(Value::Bool(false)),
            Some(Token::Ident(k)) if !is_keyword(k) => Expr::Var(k.clone()),
            _ => return Err(self.error("expected expression")),
        };
        self.index += 1;
        Ok(expr)
    }
}

fn is_keyword(s: &str) -> bool {
    matches!(s, "true" | "false" | "skip")
}

/// Parses a guard. The empty guard parses as `true`.
pub fn parse_expr(input: &str) -> Result<Expr, EvalError> {
    let mut parser = Parser::new(input)?;
    if parser.is_at_end() {
        return Ok(Expr::Lit(Value::Bool(true)));
    }
    let e = parser.expr()?;
    parser.finish()?;
    Ok(e)
}

/// Parses a statement into its assignments, in execution order.
pub fn parse_statement(input: &str) -> Result<Vec<(String, Expr)>, EvalError> {
    let mut parser = Parser::new(input)?;
    let assignments = parser.statement()?;
    parser.finish()?;
    Ok(assignments)
}

/// Action evaluator for `x := e` statements (and `skip`).
#[derive(Debug, Default, Copy, Clone)]
pub struct AssignActionDef;

impl ActionDef for AssignActionDef {
    fn is_matching_action(&self, action: &str) -> bool {
        parse_statement(action).is_ok()
    }

    fn effect(&self, eval: &Valuation, action: &str) -> Result<Valuation, EvalError> {
        let mut result = eval.clone();
        for (var, expr) in parse_statement(action)? {
            let value = expr.eval(&result)?;
            result.insert(var, value);
        }
        Ok(result)
    }
}

/// Condition evaluator for boolean expressions over integer and boolean variables.
#[derive(Debug, Default, Copy, Clone)]
pub struct ExprConditionDef;

impl ConditionDef for ExprConditionDef {
    fn can_evaluate(&self, condition: &str) -> bool {
        parse_expr(condition).is_ok()
    }

    fn evaluate(&self, eval: &Valuation, condition: &str) -> Result<bool, EvalError> {
        as_bool(parse_expr(condition)?.eval(eval)?)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn valuation(pairs: &[(&str, Value)]) -> Valuation {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn eval_str(input: &str, eval: &Valuation) -> Result<Value, EvalError> {
        parse_expr(input)?.eval(eval)
    }

    #[test]
    fn test_precedence() {
        let empty = Valuation::new();
        assert_eq!(eval_str("1 + 2 * 3", &empty), Ok(Value::Int(7)));
        assert_eq!(eval_str("(1 + 2) * 3", &empty), Ok(Value::Int(9)));
        assert_eq!(eval_str("10 - 4 - 3", &empty), Ok(Value::Int(3)));
        assert_eq!(eval_str("-7 % 3", &empty), Ok(Value::Int(-1)));
        assert_eq!(eval_str("1 < 2 && 2 < 1 || true", &empty), Ok(Value::Bool(true)));
        assert_eq!(eval_str("!(1 == 1)", &empty), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_variables() {
        let eval = valuation(&[("x", Value::Int(3)), ("b", Value::Bool(false))]);
        assert_eq!(eval_str("x * x", &eval), Ok(Value::Int(9)));
        assert_eq!(eval_str("x = 3", &eval), Ok(Value::Bool(true)));
        assert_eq!(eval_str("b != true", &eval), Ok(Value::Bool(true)));
        assert_eq!(eval_str("y + 1", &eval), Err(EvalError::UndefinedVariable("y".to_string())));
    }

    #[test]
    fn test_errors() {
        let empty = Valuation::new();
        assert_eq!(eval_str("1 / 0", &empty), Err(EvalError::DivisionByZero));
        assert!(matches!(eval_str("1 + true", &empty), Err(EvalError::TypeMismatch { .. })));
        assert!(matches!(eval_str("1 +", &empty), Err(EvalError::Parse { .. })));
        assert!(matches!(eval_str("1 2", &empty), Err(EvalError::Parse { .. })));
        assert!(matches!(eval_str("x # 2", &empty), Err(EvalError::Parse { .. })));
        assert_eq!(eval_str("9223372036854775807 + 1", &empty), Err(EvalError::Overflow));
    }

    #[test]
    fn test_logical_operators() {
        let t = || Box::new(Expr::Lit(Value::Bool(true)));
        let f = || Box::new(Expr::Lit(Value::Bool(false)));
        let empty = Valuation::new();
        assert_eq!(Expr::Binary(BinOp::And, t(), f()).eval(&empty), Ok(Value::Bool(false)));
        assert_eq!(Expr::Binary(BinOp::Or, f(), t()).eval(&empty), Ok(Value::Bool(true)));

        assert_eq!(binary(BinOp::And, Value::Bool(true), Value::Bool(true)), Ok(Value::Bool(true)));
        assert_eq!(binary(BinOp::Or, Value::Bool(false), Value::Bool(false)), Ok(Value::Bool(false)));
        assert!(matches!(
            binary(BinOp::And, Value::Int(1), Value::Bool(true)),
            Err(EvalError::TypeMismatch { expected: "boolean", .. })
        ));
        assert_eq!(binary(BinOp::Mod, Value::Int(1), Value::Int(0)), Err(EvalError::DivisionByZero));
        assert_eq!(binary(BinOp::Ge, Value::Int(2), Value::Int(2)), Ok(Value::Bool(true)));

        // The right operand is not evaluated once the left one decides.
        assert_eq!(eval_str("false && 1 / 0 == 0", &empty), Ok(Value::Bool(false)));
        assert_eq!(eval_str("true || y", &empty), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_empty_guard_is_true() {
        assert!(ExprConditionDef.can_evaluate(""));
        assert_eq!(ExprConditionDef.evaluate(&Valuation::new(), "  "), Ok(true));
    }

    #[test]
    fn test_guard_must_be_boolean() {
        let eval = valuation(&[("x", Value::Int(0))]);
        assert!(matches!(
            ExprConditionDef.evaluate(&eval, "x + 1"),
            Err(EvalError::TypeMismatch { expected: "boolean", .. })
        ));
    }

    #[test]
    fn test_statements() {
        assert!(AssignActionDef.is_matching_action("x := 0"));
        assert!(AssignActionDef.is_matching_action("x := 0; y := x;"));
        assert!(AssignActionDef.is_matching_action("skip"));
        assert!(!AssignActionDef.is_matching_action("x < 1"));
        assert!(!AssignActionDef.is_matching_action("true := 1"));
        assert!(!AssignActionDef.is_matching_action(""));

        let eval = AssignActionDef
            .effect(&Valuation::new(), "x := 1; y := x + 1; x := y * 10")
            .unwrap();
        assert_eq!(eval, valuation(&[("x", Value::Int(20)), ("y", Value::Int(2))]));

        let same = AssignActionDef.effect(&eval, "skip").unwrap();
        assert_eq!(same, eval);
    }
}
