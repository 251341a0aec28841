use std::borrow::Cow;
use std::io;

use ptree::{write_tree, Style, TreeItem};

use super::*;

/// A node of the arena viewed as a tree, for printing
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    ast: &'a Ast,
    node: Node,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Stmt(StmtId),
    Expr(ExprId),
}

impl<'a> TreeNode<'a> {
    pub fn stmt(ast: &'a Ast, id: StmtId) -> Self {
        Self {
            ast,
            node: Node::Stmt(id),
        }
    }

    fn label(&self) -> String {
        match self.node {
            Node::Stmt(id) => match self.ast[id] {
                Stmt::Empty => String::from("Empty"),
                Stmt::Assign { .. } => String::from("Assign"),
                Stmt::AssignElem { .. } => String::from("AssignElem"),
                Stmt::Seq { .. } => String::from("Seq"),
                Stmt::If { .. } => String::from("If"),
                Stmt::IfElse { .. } => String::from("If-Else"),
                Stmt::While { .. } => String::from("While"),
                Stmt::DoWhile { .. } => String::from("Do-While"),
                Stmt::Break { .. } => String::from("Break"),
                Stmt::OpenLoop => String::from("Loop (unfinished)"),
            },
            Node::Expr(id) => {
                let expr = &self.ast[id];
                let typ = &expr.typ;
                match &expr.kind {
                    ExprKind::Constant(literal) => format!("Const {literal} : {typ}"),
                    ExprKind::Ident { name, offset } => format!("Id {name} : {typ} @{offset}"),
                    ExprKind::Access { .. } => format!("Access : {typ}"),
                    ExprKind::Arith { op, .. } => format!("Arith {op} : {typ}"),
                    ExprKind::Unary { op, .. } => format!("Unary {op} : {typ}"),
                    ExprKind::Temp(temp) => format!("Temp {temp} : {typ}"),
                    ExprKind::Or { .. } => format!("Or : {typ}"),
                    ExprKind::And { .. } => format!("And : {typ}"),
                    ExprKind::Not(_) => format!("Not : {typ}"),
                    ExprKind::Rel { op, .. } => format!("Rel {op} : {typ}"),
                }
            }
        }
    }

    fn child_nodes(&self) -> Vec<Node> {
        match self.node {
            Node::Stmt(id) => match self.ast[id] {
                Stmt::Empty | Stmt::Break { .. } | Stmt::OpenLoop => vec![],
                Stmt::Assign { target, value } => vec![Node::Expr(target), Node::Expr(value)],
                Stmt::AssignElem {
                    array,
                    index,
                    value,
                } => vec![Node::Expr(array), Node::Expr(index), Node::Expr(value)],
                Stmt::Seq { first, second } => vec![Node::Stmt(first), Node::Stmt(second)],
                Stmt::If { cond, body } => vec![Node::Expr(cond), Node::Stmt(body)],
                Stmt::IfElse {
                    cond,
                    then_branch,
                    else_branch,
                } => vec![
                    Node::Expr(cond),
                    Node::Stmt(then_branch),
                    Node::Stmt(else_branch),
                ],
                Stmt::While { cond, body, .. } => vec![Node::Expr(cond), Node::Stmt(body)],
                Stmt::DoWhile { body, cond, .. } => vec![Node::Stmt(body), Node::Expr(cond)],
            },
            Node::Expr(id) => match self.ast[id].kind {
                ExprKind::Constant(_) | ExprKind::Ident { .. } | ExprKind::Temp(_) => vec![],
                ExprKind::Access { array, index } => vec![Node::Expr(array), Node::Expr(index)],
                ExprKind::Arith { lhs, rhs, .. }
                | ExprKind::Or { lhs, rhs }
                | ExprKind::And { lhs, rhs }
                | ExprKind::Rel { lhs, rhs, .. } => vec![Node::Expr(lhs), Node::Expr(rhs)],
                ExprKind::Unary { operand, .. } | ExprKind::Not(operand) => {
                    vec![Node::Expr(operand)]
                }
            },
        }
    }
}

impl TreeItem for TreeNode<'_> {
    type Child = Self;

    fn write_self<W: io::Write>(&self, f: &mut W, style: &Style) -> io::Result<()> {
        write!(f, "{}", style.paint(self.label()))
    }

    fn children(&self) -> Cow<[Self::Child]> {
        let ast = self.ast;
        let children: Vec<Self> = self
            .child_nodes()
            .into_iter()
            .map(|node| TreeNode { ast, node })
            .collect();
        Cow::from(children)
    }
}

impl TypedProgram {
    pub fn write_tree<W: io::Write>(&self, out: W) -> io::Result<()> {
        write_tree(&TreeNode::stmt(&self.ast, self.root), out)
    }
}
