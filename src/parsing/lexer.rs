use std::fmt;

use chumsky::prelude::*;

use super::syntax::BasicType;
use super::ParseErr;
use crate::Span;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    If,
    Else,
    While,
    Do,
    Break,

    Bool(bool),
    Basic(BasicType),
    Ident(String),
    Num(usize),
    Real(String),

    Eq,
    Ne,
    LessEq,
    GreaterEq,
    And,
    Or,
    Assign,
    Less,
    Greater,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,

    CurlyOpen,
    CurlyClose,
    ParenOpen,
    ParenClose,
    BracketOpen,
    BracketClose,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::If => write!(f, "if"),
            Token::Else => write!(f, "else"),
            Token::While => write!(f, "while"),
            Token::Do => write!(f, "do"),
            Token::Break => write!(f, "break"),
            Token::Bool(b) => write!(f, "{b}"),
            Token::Basic(basic) => write!(f, "{basic}"),
            Token::Ident(ident) => write!(f, "{ident}"),
            Token::Num(n) => write!(f, "{n}"),
            Token::Real(r) => write!(f, "{r}"),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::LessEq => write!(f, "<="),
            Token::GreaterEq => write!(f, ">="),
            Token::And => write!(f, "&&"),
            Token::Or => write!(f, "||"),
            Token::Assign => write!(f, "="),
            Token::Less => write!(f, "<"),
            Token::Greater => write!(f, ">"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Bang => write!(f, "!"),
            Token::CurlyOpen => write!(f, "{{"),
            Token::CurlyClose => write!(f, "}}"),
            Token::ParenOpen => write!(f, "("),
            Token::ParenClose => write!(f, ")"),
            Token::BracketOpen => write!(f, "["),
            Token::BracketClose => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
        }
    }
}

pub fn lex() -> impl Parser<char, Vec<(Token, Span)>, Error = ParseErr<char>> {
    let number = text::int(10)
        .then(just('.').ignore_then(text::digits(10)).or_not())
        .try_map(|(int, frac): (String, Option<String>), span| match frac {
            Some(frac) => Ok(Token::Real(format!("{int}.{frac}"))),
            None => int.parse().map(Token::Num).map_err(|_| {
                Simple::custom(span, format!("Integer literal {int} is too large"))
            }),
        });

    let symbol = choice((
        just("==").to(Token::Eq),
        just("!=").to(Token::Ne),
        just("<=").to(Token::LessEq),
        just(">=").to(Token::GreaterEq),
        just("&&").to(Token::And),
        just("||").to(Token::Or),
        one_of("=<>+-*/!{}()[];").map(|symb: char| match symb {
            '=' => Token::Assign,
            '<' => Token::Less,
            '>' => Token::Greater,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '!' => Token::Bang,
            '{' => Token::CurlyOpen,
            '}' => Token::CurlyClose,
            '(' => Token::ParenOpen,
            ')' => Token::ParenClose,
            '[' => Token::BracketOpen,
            ']' => Token::BracketClose,
            ';' => Token::Semicolon,
            _ => unreachable!(),
        }),
    ));

    let kw_or_ident = text::ident().map(|ident: String| match ident.as_str() {
        "if" => Token::If,
        "else" => Token::Else,
        "while" => Token::While,
        "do" => Token::Do,
        "break" => Token::Break,
        "true" => Token::Bool(true),
        "false" => Token::Bool(false),
        "char" => Token::Basic(BasicType::Char),
        "int" => Token::Basic(BasicType::Int),
        "float" => Token::Basic(BasicType::Float),
        "bool" => Token::Basic(BasicType::Bool),
        _ => Token::Ident(ident),
    });

    let token = number.or(symbol).or(kw_or_ident);

    let comment = just("//")
        .then(filter(|c: &char| *c != '\n').repeated())
        .padded();

    token
        .map_with_span(|tok, span| (tok, span))
        .padded_by(comment.repeated())
        .padded()
        .repeated()
        .then_ignore(end())
}
