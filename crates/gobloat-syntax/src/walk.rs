//! Pre-order tree walking.
//!
//! [`inspect_stmt`] and [`inspect_file`] visit every node exactly once,
//! depth-first, calling the callback before descending. Returning `false`
//! from the callback skips the node's children, mirroring `ast.Inspect`
//! from Go's standard library.

use crate::ast::{
    Decl, Expr, ExprId, InterfaceElem, Signature, SourceFile, Stmt, StmtId, ValueSpec,
};

/// A reference to a visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Stmt(StmtId),
    Expr(ExprId),
}

/// Walk every node of the file: declaration bodies, initializer
/// expressions, and everything nested below them (function literals
/// included).
pub fn inspect_file<F>(file: &SourceFile, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    for decl in &file.decls {
        walk_decl(file, decl, f);
    }
}

/// Walk the subtree rooted at a statement, the statement itself first.
pub fn inspect_stmt<F>(file: &SourceFile, id: StmtId, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    if !f(file, Node::Stmt(id)) {
        return;
    }
    match file.stmt(id) {
        Stmt::Empty | Stmt::Branch { .. } => {}
        Stmt::Block(block) => {
            for &s in &block.list {
                inspect_stmt(file, s, f);
            }
        }
        Stmt::Expr(e) | Stmt::Go(e) | Stmt::Defer(e) | Stmt::IncDec { expr: e, .. } => {
            inspect_expr(file, *e, f);
        }
        Stmt::Send { chan, value } => {
            inspect_expr(file, *chan, f);
            inspect_expr(file, *value, f);
        }
        Stmt::Assign { lhs, rhs, .. } => {
            for &e in lhs.iter().chain(rhs) {
                inspect_expr(file, e, f);
            }
        }
        Stmt::Decl(decl) => walk_decl(file, decl, f),
        Stmt::Return(results) => {
            for &e in results {
                inspect_expr(file, e, f);
            }
        }
        Stmt::Labeled { stmt, .. } => inspect_stmt(file, *stmt, f),
        Stmt::If {
            init,
            cond,
            then,
            else_branch,
        } => {
            if let Some(s) = init {
                inspect_stmt(file, *s, f);
            }
            inspect_expr(file, *cond, f);
            inspect_stmt(file, *then, f);
            if let Some(s) = else_branch {
                inspect_stmt(file, *s, f);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
        } => {
            if let Some(s) = init {
                inspect_stmt(file, *s, f);
            }
            if let Some(e) = cond {
                inspect_expr(file, *e, f);
            }
            if let Some(s) = post {
                inspect_stmt(file, *s, f);
            }
            inspect_stmt(file, *body, f);
        }
        Stmt::Range {
            key,
            value,
            expr,
            body,
            ..
        } => {
            if let Some(e) = key {
                inspect_expr(file, *e, f);
            }
            if let Some(e) = value {
                inspect_expr(file, *e, f);
            }
            inspect_expr(file, *expr, f);
            inspect_stmt(file, *body, f);
        }
        Stmt::Switch { init, tag, clauses } => {
            if let Some(s) = init {
                inspect_stmt(file, *s, f);
            }
            if let Some(e) = tag {
                inspect_expr(file, *e, f);
            }
            for &c in clauses {
                inspect_stmt(file, c, f);
            }
        }
        Stmt::TypeSwitch {
            init,
            assign,
            clauses,
        } => {
            if let Some(s) = init {
                inspect_stmt(file, *s, f);
            }
            inspect_stmt(file, *assign, f);
            for &c in clauses {
                inspect_stmt(file, c, f);
            }
        }
        Stmt::Select { clauses } => {
            for &c in clauses {
                inspect_stmt(file, c, f);
            }
        }
        Stmt::Case { exprs, body } => {
            if let Some(exprs) = exprs {
                for &e in exprs {
                    inspect_expr(file, e, f);
                }
            }
            for &s in body {
                inspect_stmt(file, s, f);
            }
        }
        Stmt::Comm { comm, body } => {
            if let Some(s) = comm {
                inspect_stmt(file, *s, f);
            }
            for &s in body {
                inspect_stmt(file, s, f);
            }
        }
    }
}

/// Walk the subtree rooted at an expression, including the bodies of any
/// function literals it contains.
pub fn inspect_expr<F>(file: &SourceFile, id: ExprId, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    if !f(file, Node::Expr(id)) {
        return;
    }
    match file.expr(id) {
        Expr::Ident(_) | Expr::BasicLit { .. } => {}
        Expr::FuncLit { sig, body } => {
            walk_signature(file, sig, f);
            inspect_stmt(file, *body, f);
        }
        Expr::CompositeLit { typ, elems } => {
            if let Some(t) = typ {
                inspect_expr(file, *t, f);
            }
            for &e in elems {
                inspect_expr(file, e, f);
            }
        }
        Expr::Paren(e) | Expr::Unary { expr: e, .. } | Expr::Selector { expr: e, .. } => {
            inspect_expr(file, *e, f);
        }
        Expr::Index { expr, index } => {
            inspect_expr(file, *expr, f);
            inspect_expr(file, *index, f);
        }
        Expr::Slice {
            expr,
            low,
            high,
            max,
        } => {
            inspect_expr(file, *expr, f);
            for e in [low, high, max].into_iter().flatten() {
                inspect_expr(file, *e, f);
            }
        }
        Expr::TypeAssert { expr, typ } => {
            inspect_expr(file, *expr, f);
            if let Some(t) = typ {
                inspect_expr(file, *t, f);
            }
        }
        Expr::Call { fun, args, .. } => {
            inspect_expr(file, *fun, f);
            for &a in args {
                inspect_expr(file, a, f);
            }
        }
        Expr::Binary { lhs, rhs, .. } => {
            inspect_expr(file, *lhs, f);
            inspect_expr(file, *rhs, f);
        }
        Expr::KeyValue { key, value } => {
            inspect_expr(file, *key, f);
            inspect_expr(file, *value, f);
        }
        Expr::Ellipsis(elem) => {
            if let Some(e) = elem {
                inspect_expr(file, *e, f);
            }
        }
        Expr::ArrayType { len, elem } => {
            if let Some(l) = len {
                inspect_expr(file, *l, f);
            }
            inspect_expr(file, *elem, f);
        }
        Expr::MapType { key, value } => {
            inspect_expr(file, *key, f);
            inspect_expr(file, *value, f);
        }
        Expr::ChanType { elem, .. } => inspect_expr(file, *elem, f),
        Expr::FuncType(sig) => walk_signature(file, sig, f),
        Expr::StructType { fields } => {
            for field in fields {
                inspect_expr(file, field.typ, f);
            }
        }
        Expr::InterfaceType { elems } => {
            for elem in elems {
                match elem {
                    InterfaceElem::Method { sig, .. } => walk_signature(file, sig, f),
                    InterfaceElem::Embedded(e) => inspect_expr(file, *e, f),
                }
            }
        }
    }
}

fn walk_decl<F>(file: &SourceFile, decl: &Decl, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    match decl {
        Decl::Func(func) => {
            if let Some(recv) = &func.recv {
                inspect_expr(file, recv.typ, f);
            }
            walk_signature(file, &func.sig, f);
            if let Some(body) = func.body {
                inspect_stmt(file, body, f);
            }
        }
        Decl::Var(gen) | Decl::Const(gen) => {
            for spec in &gen.specs {
                walk_value_spec(file, spec, f);
            }
        }
        Decl::TypeDef(group) => {
            for spec in &group.specs {
                inspect_expr(file, spec.typ, f);
            }
        }
    }
}

fn walk_value_spec<F>(file: &SourceFile, spec: &ValueSpec, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    if let Some(t) = spec.typ {
        inspect_expr(file, t, f);
    }
    for &e in &spec.values {
        inspect_expr(file, e, f);
    }
}

fn walk_signature<F>(file: &SourceFile, sig: &Signature, f: &mut F)
where
    F: FnMut(&SourceFile, Node) -> bool,
{
    for field in sig.params.iter().chain(&sig.results) {
        inspect_expr(file, field.typ, f);
    }
}
