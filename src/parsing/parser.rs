use chumsky::prelude::*;

use super::lexer::Token;
use super::syntax::{
    BinaryOperator, Block, Declaration, Expression, ExpressionKind, Location, Statement,
    StatementKind, UnaryOperator,
};
use super::ParseErr;
use crate::Span;

pub fn parser() -> impl Parser<Token, Block, Error = ParseErr<Token>> + Clone {
    let expr = recursive(|expr| {
        let literal = select! {
            Token::Num(n) => ExpressionKind::Int(n),
            Token::Real(r) => ExpressionKind::Real(r),
            Token::Bool(b) => ExpressionKind::Bool(b),
        }
        .labelled("value");

        let atom = literal
            .or(location(expr.clone()).map(ExpressionKind::Location))
            .map_with_span(|kind, span| Expression { kind, span })
            .or(expr
                .clone()
                .delimited_by(just(Token::ParenOpen), just(Token::ParenClose)));

        let unary = just(Token::Minus)
            .to(UnaryOperator::Neg)
            .or(just(Token::Bang).to(UnaryOperator::Not))
            .map_with_span(|op, span: Span| (op, span))
            .repeated()
            .then(atom)
            .foldr(|(op, span), inner| Expression {
                span: span.to(inner.span),
                kind: ExpressionKind::Unary {
                    op,
                    inner: Box::new(inner),
                },
            });

        let term = binary(
            unary,
            just(Token::Star)
                .to(BinaryOperator::Mul)
                .or(just(Token::Slash).to(BinaryOperator::Div)),
        );

        let sum = binary(
            term,
            just(Token::Plus)
                .to(BinaryOperator::Add)
                .or(just(Token::Minus).to(BinaryOperator::Sub)),
        );

        // relations do not chain: `a < b < c` is rejected
        let rel = sum
            .clone()
            .then(
                choice((
                    just(Token::Less).to(BinaryOperator::Less),
                    just(Token::LessEq).to(BinaryOperator::LessEq),
                    just(Token::GreaterEq).to(BinaryOperator::GreaterEq),
                    just(Token::Greater).to(BinaryOperator::Greater),
                ))
                .then(sum)
                .or_not(),
            )
            .map(|(lhs, rhs)| match rhs {
                Some((op, rhs)) => Expression::binary(op, lhs, rhs),
                None => lhs,
            });

        let equality = binary(
            rel,
            just(Token::Eq)
                .to(BinaryOperator::Eq)
                .or(just(Token::Ne).to(BinaryOperator::Ne)),
        );

        let join = binary(equality, just(Token::And).to(BinaryOperator::And));

        binary(join, just(Token::Or).to(BinaryOperator::Or)).labelled("expression")
    });

    let ident = select! { Token::Ident(ident) => ident }.labelled("identifier");
    let basic = select! { Token::Basic(basic) => basic }.labelled("type");
    let size = select! { Token::Num(n) => n }.labelled("array size");

    let decl = basic
        .then(
            size.delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
                .repeated(),
        )
        .then(ident)
        .then_ignore(just(Token::Semicolon))
        .map_with_span(|((basic, dims), name), span| Declaration {
            basic,
            dims,
            name,
            span,
        })
        .labelled("declaration");

    let stmt = recursive(|stmt| {
        let cond = expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        let empty = just(Token::Semicolon).to(StatementKind::Empty);

        // a nested `if` takes the `else`, if there is one
        let if_stmt = just(Token::If)
            .ignore_then(cond.clone())
            .then(stmt.clone())
            .then(just(Token::Else).ignore_then(stmt.clone()).or_not())
            .map(|((cond, then_branch), else_branch)| StatementKind::If {
                cond,
                then_branch: Box::new(then_branch),
                else_branch: else_branch.map(Box::new),
            });

        let while_stmt = just(Token::While)
            .ignore_then(cond.clone())
            .then(stmt.clone())
            .map(|(cond, body)| StatementKind::While {
                cond,
                body: Box::new(body),
            });

        let do_while = just(Token::Do)
            .ignore_then(stmt.clone())
            .then_ignore(just(Token::While))
            .then(cond)
            .then_ignore(just(Token::Semicolon).or_not())
            .map(|(body, cond)| StatementKind::DoWhile {
                body: Box::new(body),
                cond,
            });

        let break_stmt = just(Token::Break)
            .then_ignore(just(Token::Semicolon))
            .to(StatementKind::Break);

        let assign = location(expr.clone())
            .then_ignore(just(Token::Assign))
            .then(expr.clone())
            .then_ignore(just(Token::Semicolon))
            .map(|(target, value)| StatementKind::Assign { target, value });

        choice((
            empty,
            if_stmt,
            while_stmt,
            do_while,
            break_stmt,
            block(decl.clone(), stmt).map(StatementKind::Block),
            assign,
        ))
        .map_with_span(|kind, span| Statement { kind, span })
        .labelled("statement")
    });

    block(decl, stmt).then_ignore(end())
}

/// `ID ('[' expr ']')*`
fn location<P>(expr: P) -> impl Parser<Token, Location, Error = ParseErr<Token>> + Clone
where
    P: Parser<Token, Expression, Error = ParseErr<Token>> + Clone,
{
    let ident = select! { Token::Ident(ident) => ident }.labelled("identifier");

    ident
        .then(
            expr.delimited_by(just(Token::BracketOpen), just(Token::BracketClose))
                .repeated(),
        )
        .map_with_span(|(name, indices), span| Location {
            name,
            indices,
            span,
        })
}

/// `'{' decl* stmt* '}'`
fn block<D, S>(decl: D, stmt: S) -> impl Parser<Token, Block, Error = ParseErr<Token>> + Clone
where
    D: Parser<Token, Declaration, Error = ParseErr<Token>> + Clone,
    S: Parser<Token, Statement, Error = ParseErr<Token>> + Clone,
{
    decl.repeated()
        .then(stmt.repeated())
        .delimited_by(just(Token::CurlyOpen), just(Token::CurlyClose))
        .map_with_span(|(decls, stmts), span| Block { decls, stmts, span })
        .recover_with(nested_delimiters(
            Token::CurlyOpen,
            Token::CurlyClose,
            [
                (Token::ParenOpen, Token::ParenClose),
                (Token::BracketOpen, Token::BracketClose),
            ],
            |span| Block {
                decls: Vec::new(),
                stmts: Vec::new(),
                span,
            },
        ))
        .labelled("block")
}

/// Left-associative chain of `operand (op operand)*`
fn binary<P, O>(operand: P, op: O) -> impl Parser<Token, Expression, Error = ParseErr<Token>> + Clone
where
    P: Parser<Token, Expression, Error = ParseErr<Token>> + Clone,
    O: Parser<Token, BinaryOperator, Error = ParseErr<Token>> + Clone,
{
    operand
        .clone()
        .then(op.then(operand).repeated())
        .foldl(|lhs, (op, rhs)| Expression::binary(op, lhs, rhs))
}
