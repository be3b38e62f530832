//! The per-statement wrapping decision.
//!
//! Recognition of `panic` and `recover` is by identifier text, the same
//! way the builtins are normally spelled. A file that shadows those names
//! with its own functions can make the guards misfire; resolving bindings
//! to tell the cases apart is out of scope.

use gobloat_syntax::ast::{AssignOp, Block, Expr, ExprId, Signature, SourceFile, Stmt, StmtId};
use gobloat_syntax::walk::{self, Node};

/// [`close_stmt`] lifted over an optional slot. An absent slot stays
/// absent.
pub fn close_opt(file: &mut SourceFile, slot: Option<StmtId>) -> Option<StmtId> {
    slot.map(|id| close_stmt(file, id))
}

/// Decide whether the statement can be wrapped in an immediately invoked
/// closure, and build the wrapper if so. Returns the id to store back in
/// the owning slot: the original when wrapping would change behavior,
/// otherwise a fresh expression statement `func() { s }()`.
pub fn close_stmt(file: &mut SourceFile, id: StmtId) -> StmtId {
    if !wrappable(file, id) {
        return id;
    }
    wrap(file, id)
}

fn wrappable(file: &SourceFile, id: StmtId) -> bool {
    match file.stmt(id) {
        // Clause arms only parse under their switch or select, a label
        // must stay attached to its statement, and a declaration's names
        // have to remain visible past it.
        Stmt::Empty
        | Stmt::Case { .. }
        | Stmt::Comm { .. }
        | Stmt::Decl(_)
        | Stmt::Labeled { .. } => return false,
        // A short variable declaration scopes its names to the enclosing
        // block; a closure would swallow them. Blocked whether or not the
        // names are referenced later.
        Stmt::Assign {
            op: AssignOp::Define,
            ..
        } => return false,
        // Bare `for {}` often stands in for an unreachable return; keep
        // the idiom recognizable.
        Stmt::For {
            init: None,
            cond: None,
            post: None,
            ..
        } => return false,
        // A one-argument panic call stays directly in its frame. Other
        // arities are ordinary calls to some local `panic`.
        Stmt::Expr(e) if is_unary_panic(file, *e) => return false,
        _ => {}
    }
    !contains_disqualifier(file, id)
}

fn is_unary_panic(file: &SourceFile, e: ExprId) -> bool {
    match file.expr(e) {
        Expr::Call { fun, args, .. } if args.len() == 1 => {
            matches!(file.expr(*fun), Expr::Ident(name) if name == "panic")
        }
        _ => false,
    }
}

/// Scan the statement's whole subtree, the statement itself included, for
/// constructs whose meaning depends on the enclosing function: returns,
/// branch statements whose target sits outside the new closure, defers
/// whose timing would move, and direct zero-argument `recover` calls.
/// Function-literal bodies are scanned too; that is stricter than needed
/// for returns and defers but never unsafe.
fn contains_disqualifier(file: &SourceFile, id: StmtId) -> bool {
    let mut found = false;
    walk::inspect_stmt(file, id, &mut |file, node| {
        if found {
            return false;
        }
        match node {
            Node::Stmt(s) => {
                if matches!(
                    file.stmt(s),
                    Stmt::Return(_) | Stmt::Branch { .. } | Stmt::Defer(_)
                ) {
                    found = true;
                }
            }
            Node::Expr(e) => {
                if let Expr::Call { fun, args, .. } = file.expr(e) {
                    if args.is_empty()
                        && matches!(file.expr(*fun), Expr::Ident(name) if name == "recover")
                    {
                        found = true;
                    }
                }
            }
        }
        !found
    });
    found
}

/// Build `func() { s }()` around the statement. The new nodes are freshly
/// allocated; the original statement moves, unmodified, into the literal's
/// body.
fn wrap(file: &mut SourceFile, id: StmtId) -> StmtId {
    let body = file.alloc_stmt(Stmt::Block(Block { list: vec![id] }));
    let lit = file.alloc_expr(Expr::FuncLit {
        sig: Signature::default(),
        body,
    });
    let call = file.alloc_expr(Expr::Call {
        fun: lit,
        args: Vec::new(),
        ellipsis: false,
    });
    file.alloc_stmt(Stmt::Expr(call))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobloat_parser::parse_file;

    /// Parse a single-statement function body and run the decision on
    /// that statement.
    fn close_single(stmt: &str) -> (gobloat_syntax::SourceFile, StmtId, StmtId) {
        let src = format!("package p\n\nfunc f() {{\n\t{stmt}\n}}\n");
        let mut file = parse_file("t.go", &src).unwrap();
        let body = match &file.decls[0] {
            gobloat_syntax::ast::Decl::Func(f) => f.body.unwrap(),
            other => panic!("unexpected decl {other:?}"),
        };
        let Stmt::Block(block) = file.stmt(body).clone() else {
            panic!("function body is not a block");
        };
        let id = block.list[0];
        let out = close_stmt(&mut file, id);
        (file, id, out)
    }

    fn is_wrapped(file: &gobloat_syntax::SourceFile, out: StmtId) -> bool {
        let Stmt::Expr(e) = file.stmt(out) else {
            return false;
        };
        let Expr::Call { fun, args, .. } = file.expr(*e) else {
            return false;
        };
        args.is_empty() && matches!(file.expr(*fun), Expr::FuncLit { .. })
    }

    #[test]
    fn wraps_plain_assignment() {
        let (file, id, out) = close_single("x = x + 1");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));
    }

    #[test]
    fn define_is_left_alone() {
        let (_, id, out) = close_single("x := 1");
        assert_eq!(id, out);
    }

    #[test]
    fn return_disqualifies() {
        let (_, id, out) = close_single("return");
        assert_eq!(id, out);
    }

    #[test]
    fn nested_branch_disqualifies() {
        let (_, id, out) = close_single("for i = 0; i < 10; i++ {\n\t\tbreak\n\t}");
        assert_eq!(id, out);
    }

    #[test]
    fn defer_disqualifies_but_go_does_not() {
        let (_, id, out) = close_single("defer cleanup()");
        assert_eq!(id, out);

        let (file, id, out) = close_single("go work()");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));
    }

    #[test]
    fn panic_guard_is_arity_sensitive() {
        let (_, id, out) = close_single("panic(\"boom\")");
        assert_eq!(id, out);

        let (file, id, out) = close_single("panic()");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));

        let (file, id, out) = close_single("panic(1, 2)");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));
    }

    #[test]
    fn recover_guard_is_arity_sensitive() {
        let (_, id, out) = close_single("err = recover()");
        assert_eq!(id, out);

        let (file, id, out) = close_single("err = recover(x)");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));
    }

    #[test]
    fn infinite_loop_is_left_alone() {
        let (_, id, out) = close_single("for {\n\t\twork()\n\t}");
        assert_eq!(id, out);
    }

    #[test]
    fn conditional_loop_is_wrapped() {
        let (file, id, out) = close_single("for x > 0 {\n\t\tx = x - 1\n\t}");
        assert_ne!(id, out);
        assert!(is_wrapped(&file, out));
    }

    #[test]
    fn labeled_statement_is_left_alone() {
        let (_, id, out) = close_single("done:\n\trecord()");
        assert_eq!(id, out);
    }

    #[test]
    fn declaration_statement_is_left_alone() {
        let (_, id, out) = close_single("var x = 1");
        assert_eq!(id, out);

        let (_, id, out) = close_single("const limit = 8");
        assert_eq!(id, out);

        let (_, id, out) = close_single("type row struct {\n\t\tk string\n\t}");
        assert_eq!(id, out);
    }
}
