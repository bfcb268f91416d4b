//! Parser for instantiated relation expressions using chumsky.
//!
//! Two stages, as usual:
//! 1) Tokenisation from input string to a `Token` stream.
//! 2) Parsing tokens into a small owned AST consumed by the evaluator.
//!
//! Accepted syntax:
//! - Literals: decimal numbers (`5`, `5.0`, `1e-9`), strings (`'text'` or `"text"`,
//!   backslash escapes), `true`/`false` (also `True`/`False`).
//! - Geometric literals: `P(1.0, 2.0)`, `P(*, *)` and `L(P(..), P(..))`.
//! - Arithmetic: `+ - * / %` and unary `-`.
//! - Comparisons (non-associative): `< <= > >= == = != <>`.
//! - Logic: `not`/`!`, `and`/`&&`, `or`/`||`.
//! - Calls: `abs(x)`, `min(a, b, ...)`, `max(a, b, ...)`.
//!
//! Precedence, loosest first: or < and < not < comparison < sum < product < unary minus < atoms.
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chumsky::{input::ValueInput, prelude::*};

use crate::error::{Diagnostic, ExprError};

pub type Spanned<T> = (T, SimpleSpan);
type Span = SimpleSpan;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Token {
    // Delimiters & punctuation
    LParen,
    RParen,
    Comma,

    // Arithmetic
    Plus,
    Minus,
    Star, // also the wildcard coordinate of a generic point
    Slash,
    Percent,

    // Comparisons
    Lt,
    Le,
    Gt,
    Ge,
    Eq, // == or =
    Ne, // != or <>

    // Logic
    Not,
    And,
    Or,

    // Literals
    True,
    False,
    Number(BigDecimal),
    Str(String),

    // Function names, and any name left over by substitution
    Ident(String),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Not => write!(f, "not"),
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Str(s) => write!(f, "'{s}'"),
            Token::Ident(name) => write!(f, "{name}"),
        }
    }
}

// ---------------- Lexer ----------------

fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Spanned<Token>>, extra::Err<Rich<'a, char>>> {
    // Multi-char operators first to avoid prefix capture
    let operator = choice((
        just("==").to(Token::Eq),
        just("!=").to(Token::Ne),
        just("<>").to(Token::Ne),
        just("<=").to(Token::Le),
        just(">=").to(Token::Ge),
        just("&&").to(Token::And),
        just("||").to(Token::Or),
    ));

    let punct = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just(',').to(Token::Comma),
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('<').to(Token::Lt),
        just('>').to(Token::Gt),
        just('=').to(Token::Eq),
        just('!').to(Token::Not),
    ));

    let number = text::digits(10)
        .then(just('.').then(text::digits(10)).or_not())
        .then(
            one_of("eE")
                .then(one_of("+-").or_not())
                .then(text::digits(10))
                .or_not(),
        )
        .to_slice()
        .try_map(|s: &str, span| {
            BigDecimal::from_str(s)
                .map(Token::Number)
                .map_err(|e| Rich::custom(span, format!("invalid number literal '{s}': {e}")))
        });

    let escape = just('\\').ignore_then(any());
    let quoted = |quote: char| {
        just(quote)
            .ignore_then(
                any()
                    .filter(move |c: &char| *c != quote && *c != '\\')
                    .or(escape.clone())
                    .repeated()
                    .collect::<String>(),
            )
            .then_ignore(just(quote))
    };
    let string = quoted('\'').or(quoted('"')).map(Token::Str);

    // Keywords are matched on whole words only
    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(
            any()
                .filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
                .repeated(),
        )
        .to_slice()
        .map(|s: &str| match s {
            "true" | "True" => Token::True,
            "false" | "False" => Token::False,
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            _ => Token::Ident(s.to_string()),
        });

    let token = choice((operator, number, string, word, punct));

    token
        .map_with(|tok, e| (tok, e.span()))
        .padded()
        .repeated()
        .collect()
        .padded()
        .then_ignore(end())
}

// ---------------- Owned AST ----------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "and",
            BinOp::Or => "or",
        };
        write!(f, "{symbol}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Ast {
    Bool(bool),
    Number(BigDecimal),
    Str(String),
    Name(String),
    Wildcard,
    Neg(Box<Ast>),
    Not(Box<Ast>),
    Binary(BinOp, Box<Ast>, Box<Ast>),
    Call(String, Vec<Ast>),
}

impl Ast {
    fn binary(op: BinOp, lhs: Ast, rhs: Ast) -> Ast {
        Ast::Binary(op, Box::new(lhs), Box::new(rhs))
    }
}

// ---------------- chumsky parser over tokens ----------------

fn ast_parser<'tokens, I>()
-> impl Parser<'tokens, I, Ast, extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let literal = select! {
            Token::Number(n) => Ast::Number(n),
            Token::Str(s) => Ast::Str(s),
            Token::True => Ast::Bool(true),
            Token::False => Ast::Bool(false),
        };

        let ident = select! { Token::Ident(name) => name };

        // `*` is only meaningful as a coordinate of a generic point
        let argument = just(Token::Star).to(Ast::Wildcard).or(expr.clone());

        let call = ident
            .clone()
            .then(
                argument
                    .separated_by(just(Token::Comma))
                    .collect::<Vec<_>>()
                    .delimited_by(just(Token::LParen), just(Token::RParen)),
            )
            .map(|(name, args)| Ast::Call(name, args))
            .labelled("call");

        let atom = literal
            .or(call)
            .or(ident.map(Ast::Name))
            .or(expr
                .clone()
                .delimited_by(just(Token::LParen), just(Token::RParen)))
            .labelled("atom");

        let unary = just(Token::Minus)
            .repeated()
            .foldr(atom, |_, rhs| Ast::Neg(Box::new(rhs)));

        let product_op = choice((
            just(Token::Star).to(BinOp::Mul),
            just(Token::Slash).to(BinOp::Div),
            just(Token::Percent).to(BinOp::Rem),
        ));
        let product = unary
            .clone()
            .foldl(product_op.then(unary).repeated(), |a, (op, b)| {
                Ast::binary(op, a, b)
            })
            .labelled("product");

        let sum_op = choice((
            just(Token::Plus).to(BinOp::Add),
            just(Token::Minus).to(BinOp::Sub),
        ));
        let sum = product
            .clone()
            .foldl(sum_op.then(product).repeated(), |a, (op, b)| {
                Ast::binary(op, a, b)
            })
            .labelled("sum");

        let comparison_op = select! {
            Token::Lt => BinOp::Lt,
            Token::Le => BinOp::Le,
            Token::Gt => BinOp::Gt,
            Token::Ge => BinOp::Ge,
            Token::Eq => BinOp::Eq,
            Token::Ne => BinOp::Ne,
        };
        let comparison = sum
            .clone()
            .then(comparison_op.then(sum).or_not())
            .map(|(a, rest)| match rest {
                Some((op, b)) => Ast::binary(op, a, b),
                None => a,
            })
            .labelled("comparison");

        let negation = just(Token::Not)
            .repeated()
            .foldr(comparison, |_, rhs| Ast::Not(Box::new(rhs)));

        let conjunction = negation
            .clone()
            .foldl(just(Token::And).ignore_then(negation).repeated(), |a, b| {
                Ast::binary(BinOp::And, a, b)
            })
            .labelled("conjunction");

        conjunction
            .clone()
            .foldl(just(Token::Or).ignore_then(conjunction).repeated(), |a, b| {
                Ast::binary(BinOp::Or, a, b)
            })
            .labelled("disjunction")
    })
}

// ---------------- Public API ----------------

/// Parse an instantiated expression into its AST.
///
/// On failure, returns [`ExprError::Syntax`] with one diagnostic per lexer or
/// parser error, located in character offsets of `src`.
pub(crate) fn parse(src: &str) -> Result<Ast, ExprError> {
    let syntax = |diagnostics| ExprError::Syntax {
        expression: src.to_string(),
        diagnostics,
    };

    // 1) Lexing
    let (tokens, lex_errs) = lexer().parse(src).into_output_errors();
    let mut diagnostics: Vec<Diagnostic> = lex_errs
        .into_iter()
        .map(|e| Diagnostic {
            message: format!("lexing error: {e}"),
            start: e.span().start,
            end: e.span().end,
        })
        .collect();

    let tokens = match tokens {
        Some(tokens) if diagnostics.is_empty() => tokens,
        _ => return Err(syntax(diagnostics)),
    };

    // 2) Parsing over the plain token stream; spans are mapped back through the lexer's
    let plain: Vec<Token> = tokens.iter().map(|(t, _)| t.clone()).collect();
    let (ast, parse_errs) = ast_parser()
        .then_ignore(end())
        .parse(plain.as_slice())
        .into_output_errors();

    let locate = |index: usize| match tokens.get(index) {
        Some((_, span)) => span.start,
        None => src.len(),
    };
    diagnostics.extend(parse_errs.into_iter().map(|e| Diagnostic {
        message: format!("parse error: {e}"),
        start: locate(e.span().start),
        end: locate(e.span().end),
    }));

    match ast {
        Some(ast) if diagnostics.is_empty() => Ok(ast),
        _ => Err(syntax(diagnostics)),
    }
}
