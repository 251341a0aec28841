use crate::ast::{ArithOp, AstBuilder, RelOp, StmtId};

use super::*;

/// `x`, `y` (int), `b` (bool) and the relations `x < y`, `x == y`
struct Fixture {
    b: AstBuilder,
    x: ExprId,
    y: ExprId,
    flag: ExprId,
    less: ExprId,
    equal: ExprId,
}

impl Fixture {
    fn new() -> Self {
        let mut b = AstBuilder::new();
        let x = b.ident("x", Type::Int, 0);
        let y = b.ident("y", Type::Int, 4);
        let flag = b.ident("b", Type::Bool, 8);
        let less = b.rel(RelOp::Less, x, y).unwrap();
        let equal = b.rel(RelOp::Eq, x, y).unwrap();
        Self {
            b,
            x,
            y,
            flag,
            less,
            equal,
        }
    }

    /// Code emitted by `expr.jumping(truthy, falsy)` with a fresh allocator
    fn jumping(self, expr: ExprId, truthy: Option<u32>, falsy: Option<u32>) -> Vec<String> {
        let mut program = self.b.finish(Ast::EMPTY);
        let mut fresh = Allocator::new();
        let mut translator = Translator::new(&mut program.ast, &mut fresh);
        translator
            .jumping(expr, truthy.map(Label::new), falsy.map(Label::new))
            .unwrap();
        translator.finish().lines()
    }

    /// Code emitted by `expr.reduce()`, and the text of the result
    fn reduce(self, expr: ExprId) -> (Vec<String>, String) {
        let mut program = self.b.finish(Ast::EMPTY);
        let mut fresh = Allocator::new();
        let mut translator = Translator::new(&mut program.ast, &mut fresh);
        let simple = translator.reduce(expr).unwrap();
        assert!(translator.ast.is_simple(simple));
        let text = translator.text(simple);
        (translator.finish().lines(), text)
    }

    fn translate(self, root: StmtId) -> Vec<String> {
        let mut program = self.b.finish(root);
        translate(&mut program).unwrap().lines()
    }
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(ToString::to_string).collect()
}

#[test]
fn or_with_true_label_needs_no_label_of_its_own() {
    let mut fx = Fixture::new();
    let or = fx.b.or(fx.less, fx.equal).unwrap();
    assert_eq!(
        fx.jumping(or, Some(7), None),
        lines(&["if x < y goto L7", "if x == y goto L7"])
    );
}

#[test]
fn or_without_true_label_allocates_one() {
    let mut fx = Fixture::new();
    let or = fx.b.or(fx.less, fx.equal).unwrap();
    assert_eq!(
        fx.jumping(or, None, Some(9)),
        lines(&["if x < y goto L1", "iffalse x == y goto L9", "L1:"])
    );
}

#[test]
fn and_with_false_label_needs_no_label_of_its_own() {
    let mut fx = Fixture::new();
    let and = fx.b.and(fx.less, fx.equal).unwrap();
    assert_eq!(
        fx.jumping(and, None, Some(9)),
        lines(&["iffalse x < y goto L9", "iffalse x == y goto L9"])
    );
}

#[test]
fn and_without_false_label_allocates_one() {
    let mut fx = Fixture::new();
    let and = fx.b.and(fx.less, fx.equal).unwrap();
    assert_eq!(
        fx.jumping(and, Some(7), None),
        lines(&["iffalse x < y goto L1", "if x == y goto L7", "L1:"])
    );
}

#[test]
fn de_morgan_duality() {
    for (truthy, falsy) in [(Some(7), None), (None, Some(9)), (Some(7), Some(9))] {
        let mut fx = Fixture::new();
        let and = fx.b.and(fx.less, fx.equal).unwrap();
        let not_and = fx.b.not(and).unwrap();
        let lhs = fx.jumping(not_and, truthy, falsy);

        let mut fx = Fixture::new();
        let not_less = fx.b.not(fx.less).unwrap();
        let not_equal = fx.b.not(fx.equal).unwrap();
        let or_not = fx.b.or(not_less, not_equal).unwrap();
        let rhs = fx.jumping(or_not, truthy, falsy);

        assert_eq!(lhs, rhs, "labels {truthy:?} / {falsy:?}");
    }
}

#[test]
fn not_swaps_targets() {
    let mut fx = Fixture::new();
    let not = fx.b.not(fx.less).unwrap();
    assert_eq!(
        fx.jumping(not, Some(3), None),
        lines(&["iffalse x < y goto L3"])
    );
}

#[test]
fn constant_branches_are_decided_statically() {
    let cases: [(ExprId, Option<u32>, Option<u32>, &[&str]); 6] = [
        (Ast::TRUE, Some(3), Some(4), &["goto L3"]),
        (Ast::TRUE, None, Some(4), &[]),
        (Ast::TRUE, Some(3), None, &["goto L3"]),
        (Ast::FALSE, Some(3), Some(4), &["goto L4"]),
        (Ast::FALSE, Some(3), None, &[]),
        (Ast::FALSE, None, Some(4), &["goto L4"]),
    ];

    for (constant, truthy, falsy, expected) in cases {
        let fx = Fixture::new();
        assert_eq!(fx.jumping(constant, truthy, falsy), lines(expected));
    }
}

#[test]
fn jump_table() {
    let cases: [(Option<u32>, Option<u32>, &[&str]); 4] = [
        (Some(3), Some(4), &["if b goto L3", "goto L4"]),
        (Some(3), None, &["if b goto L3"]),
        (None, Some(4), &["iffalse b goto L4"]),
        (None, None, &[]),
    ];

    for (truthy, falsy, expected) in cases {
        let fx = Fixture::new();
        let flag = fx.flag;
        assert_eq!(fx.jumping(flag, truthy, falsy), lines(expected));
    }
}

#[test]
fn array_element_is_loaded_before_test() {
    let mut fx = Fixture::new();
    let flags = fx.b.ident("flags", Type::array(4, Type::Bool).unwrap(), 12);
    let i = fx.x;
    let elem = fx.b.access(flags, &[i]).unwrap();
    assert_eq!(
        fx.jumping(elem, None, Some(5)),
        lines(&["t1 = x * 1", "t2 = flags [ t1 ]", "iffalse t2 goto L5"])
    );
}

#[test]
fn relation_reduces_operands() {
    let mut fx = Fixture::new();
    let one = fx.b.int(1);
    let sum = fx.b.arith(ArithOp::Add, fx.x, one).unwrap();
    let rel = fx.b.rel(RelOp::GreaterEq, sum, fx.y).unwrap();
    assert_eq!(
        fx.jumping(rel, Some(2), Some(3)),
        lines(&["t1 = x + 1", "if t1 >= y goto L2", "goto L3"])
    );
}

#[test]
fn reduce_emits_inner_operations_first() {
    let mut fx = Fixture::new();
    let one = fx.b.int(1);
    let sum = fx.b.arith(ArithOp::Add, fx.x, fx.y).unwrap();
    let diff = fx.b.arith(ArithOp::Sub, fx.x, one).unwrap();
    let product = fx.b.arith(ArithOp::Mul, sum, diff).unwrap();

    let (code, result) = fx.reduce(product);
    assert_eq!(code, lines(&["t1 = x + y", "t2 = x - 1", "t3 = t1 * t2"]));
    assert_eq!(result, "t3");
}

#[test]
fn reduce_leaves_simple_expressions_alone() {
    let fx = Fixture::new();
    let x = fx.x;
    let (code, result) = fx.reduce(x);
    assert!(code.is_empty());
    assert_eq!(result, "x");
}

#[test]
fn reduce_boolean_materializes_value() {
    let fx = Fixture::new();
    let less = fx.less;
    let (code, result) = fx.reduce(less);
    assert_eq!(
        code,
        lines(&[
            "iffalse x < y goto L1",
            "t1 = true",
            "goto L2",
            "L1:",
            "t1 = false",
            "L2:",
        ])
    );
    assert_eq!(result, "t1");
}

#[test]
fn assignment_keeps_top_operator() {
    let mut fx = Fixture::new();
    let two = fx.b.int(2);
    let product = fx.b.arith(ArithOp::Mul, fx.y, two).unwrap();
    let sum = fx.b.arith(ArithOp::Add, fx.x, product).unwrap();
    let assign = fx.b.assign(fx.x, sum).unwrap();

    assert_eq!(
        fx.translate(assign),
        lines(&["L1:", "t1 = y * 2", "x = x + t1", "L2:"])
    );
}

#[test]
fn assigning_a_relation() {
    let mut fx = Fixture::new();
    let assign = fx.b.assign(fx.flag, fx.less).unwrap();
    assert_eq!(
        fx.translate(assign),
        lines(&[
            "L1:",
            "iffalse x < y goto L3",
            "t1 = true",
            "goto L4",
            "L3:",
            "t1 = false",
            "L4:",
            "b = t1",
            "L2:",
        ])
    );
}

#[test]
fn assigning_a_relation_to_an_element() {
    let mut fx = Fixture::new();
    let flags = fx.b.ident("flags", Type::array(3, Type::Bool).unwrap(), 12);
    let elem = fx.b.access(flags, &[fx.x]).unwrap();
    let assign = fx.b.assign_elem(elem, fx.less).unwrap();
    assert_eq!(
        fx.translate(assign),
        lines(&[
            "L1:",
            "t1 = x * 1",
            "iffalse x < y goto L3",
            "t2 = true",
            "goto L4",
            "L3:",
            "t2 = false",
            "L4:",
            "flags [ t1 ] = t2",
            "L2:",
        ])
    );
}

#[test]
fn if_false_branch_jumps_to_after() {
    let mut fx = Fixture::new();
    let assign = fx.b.assign(fx.x, fx.y).unwrap();
    let stmt = fx.b.if_then(fx.less, assign).unwrap();
    assert_eq!(
        fx.translate(stmt),
        lines(&["L1:", "iffalse x < y goto L2", "L3:", "x = y", "L2:"])
    );
}

#[test]
fn counting_loop() {
    // { int i; i = 0; while (i < 10) i = i + 1; }
    let mut b = AstBuilder::new();
    let i = b.ident("i", Type::Int, 0);
    let zero = b.int(0);
    let init = b.assign(i, zero).unwrap();

    let w = b.open_loop();
    let ten = b.int(10);
    let cond = b.rel(RelOp::Less, i, ten).unwrap();
    let one = b.int(1);
    let next = b.arith(ArithOp::Add, i, one).unwrap();
    let step = b.assign(i, next).unwrap();
    let w = b.close_while(w, cond, step).unwrap();

    let rest = b.seq(w, Ast::EMPTY);
    let root = b.seq(init, rest);
    let code = translate(&mut b.finish(root)).unwrap().lines();

    assert_eq!(
        code,
        lines(&[
            "L1:",
            "i = 0",
            "L3:",
            "iffalse i < 10 goto L2",
            "L4:",
            "i = i + 1",
            "goto L3",
            "L2:",
        ])
    );

    // the end label is defined once and only the failed test jumps to it
    assert_eq!(code.iter().filter(|l| *l == "L2:").count(), 1);
    let jumps_to_end: Vec<_> = code.iter().filter(|l| l.ends_with("goto L2")).collect();
    assert_eq!(jumps_to_end, vec!["iffalse i < 10 goto L2"]);
}

#[test]
fn break_jumps_past_loop() {
    // { while (true) { break; } }
    let mut b = AstBuilder::new();
    let w = b.open_loop();
    let brk = b.break_loop().unwrap();
    let body = b.seq(brk, Ast::EMPTY);
    let w = b.close_while(w, Ast::TRUE, body).unwrap();
    let root = b.seq(w, Ast::EMPTY);

    let code = translate(&mut b.finish(root)).unwrap().lines();
    assert_eq!(code, lines(&["L1:", "L3:", "goto L2", "goto L1", "L2:"]));
}

#[test]
fn do_while_jumps_back_on_true() {
    let mut fx = Fixture::new();
    let d = fx.b.open_loop();
    let assign = fx.b.assign(fx.x, fx.y).unwrap();
    let d = fx.b.close_do_while(d, assign, fx.less).unwrap();
    assert_eq!(
        fx.translate(d),
        lines(&["L1:", "x = y", "L3:", "if x < y goto L1", "L2:"])
    );
}

#[test]
fn empty_statements_are_skipped_in_sequences() {
    let mut fx = Fixture::new();
    let assign = fx.b.assign(fx.x, fx.y).unwrap();
    let left = fx.b.seq(Ast::EMPTY, assign);
    let root = fx.b.seq(left, Ast::EMPTY);
    assert_eq!(fx.translate(root), lines(&["L1:", "x = y", "L2:"]));
}

#[test]
fn unfinished_loop_is_an_internal_error() {
    let mut b = AstBuilder::new();
    let w = b.open_loop();
    let err = translate(&mut b.finish(w)).unwrap_err();
    assert_eq!(err, TranslationError::UnfinishedLoop);
}

#[test]
fn break_outside_its_loop_is_an_internal_error() {
    let mut b = AstBuilder::new();
    let w = b.open_loop();
    let brk = b.break_loop().unwrap();
    let w = b.close_while(w, Ast::TRUE, Ast::EMPTY).unwrap();
    let root = b.seq(brk, w);
    let err = translate(&mut b.finish(root)).unwrap_err();
    assert_eq!(err, TranslationError::LoopExitUnknown);
}

/// Shift every `L<n>` and `t<n>` in `line` down by the given offsets
fn renumber(line: &str, labels: u32, temps: u32) -> String {
    line.split(' ')
        .map(|word| {
            let (body, colon) = match word.strip_suffix(':') {
                Some(body) => (body, ":"),
                None => (word, ""),
            };
            let shifted = match body.split_at(1) {
                ("L", n) if n.parse::<u32>().is_ok() => {
                    format!("L{}", n.parse::<u32>().unwrap_or_default() - labels)
                }
                ("t", n) if n.parse::<u32>().is_ok() => {
                    format!("t{}", n.parse::<u32>().unwrap_or_default() - temps)
                }
                _ => body.to_string(),
            };
            format!("{shifted}{colon}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn nested_program() -> TypedProgram {
    // while (x < y || b) { x = x + y * 2; if (x == y) break; }
    let mut fx = Fixture::new();
    let w = fx.b.open_loop();
    let cond = fx.b.or(fx.less, fx.flag).unwrap();
    let two = fx.b.int(2);
    let product = fx.b.arith(ArithOp::Mul, fx.y, two).unwrap();
    let sum = fx.b.arith(ArithOp::Add, fx.x, product).unwrap();
    let assign = fx.b.assign(fx.x, sum).unwrap();
    let brk = fx.b.break_loop().unwrap();
    let check = fx.b.if_then(fx.equal, brk).unwrap();
    let body = fx.b.seq(assign, check);
    let w = fx.b.close_while(w, cond, body).unwrap();
    fx.b.finish(w)
}

#[test]
fn translation_is_deterministic() {
    let first = translate(&mut nested_program()).unwrap();
    let second = translate(&mut nested_program()).unwrap();
    assert_eq!(first, second);

    // translating the same tree again gives the same code
    let mut program = nested_program();
    let again = translate(&mut program).unwrap();
    assert_eq!(again, translate(&mut program).unwrap());
    assert_eq!(first, again);
}

#[test]
fn shared_allocator_only_shifts_numbers() {
    let mut fresh = Allocator::new();
    let first = translate_with(&mut nested_program(), &mut fresh).unwrap();
    let label_shift = fresh.fresh_label().number();
    let temp_shift = fresh.fresh_temp().number();

    let second = translate_with(&mut nested_program(), &mut fresh).unwrap();
    assert_ne!(first, second);

    let shifted: Vec<String> = second
        .lines()
        .iter()
        .map(|line| renumber(line, label_shift, temp_shift))
        .collect();
    assert_eq!(first.lines(), shifted);
}
