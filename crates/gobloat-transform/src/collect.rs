//! First pass: gather every statement-owning node in a file.

use gobloat_syntax::ast::{SourceFile, Stmt, StmtId};
use gobloat_syntax::walk::{self, Node};

/// Walk the whole file and record, in visit order, every statement that
/// carries statement slots of its own. Nodes nested inside other owners
/// are recorded independently, so a block inside a block shows up twice
/// over. Nothing is mutated here; the update pass runs afterwards so the
/// walk never observes a half-rewritten tree.
pub fn collect(file: &SourceFile) -> Vec<StmtId> {
    let mut owners = Vec::new();
    walk::inspect_file(file, &mut |file, node| {
        if let Node::Stmt(id) = node {
            if owns_statements(file.stmt(id)) {
                owners.push(id);
            }
        }
        true
    });
    owners
}

/// The eight shapes with statement slots. Blocks, case arms and comm arms
/// carry a list; the rest carry one or two optional single-statement
/// fields (loop initializer and post step, conditional initializer and
/// else branch, switch initializers, a label's body).
fn owns_statements(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Block(_)
            | Stmt::Case { .. }
            | Stmt::Comm { .. }
            | Stmt::For { .. }
            | Stmt::If { .. }
            | Stmt::Labeled { .. }
            | Stmt::Switch { .. }
            | Stmt::TypeSwitch { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobloat_parser::parse_file;

    #[test]
    fn collects_nested_owners_independently() {
        let src = "package p\n\nfunc f(x int) {\n\tif x > 0 {\n\t\tfor i := 0; i < x; i++ {\n\t\t\tuse(i)\n\t\t}\n\t}\n}\n";
        let file = parse_file("t.go", src).unwrap();
        // Function body block, the if, its then block, the for, its body.
        assert_eq!(collect(&file).len(), 5);
    }

    #[test]
    fn collects_owners_inside_function_literals() {
        let src = "package p\n\nvar f = func() {\n\tgo func() {\n\t\twork()\n\t}()\n}\n";
        let file = parse_file("t.go", src).unwrap();
        assert_eq!(collect(&file).len(), 2);
    }

    #[test]
    fn select_and_range_are_not_owners_themselves() {
        let src = "package p\n\nfunc f(ch chan int, xs []int) {\n\tselect {\n\tcase <-ch:\n\t}\n\tfor _, v := range xs {\n\t\tuse(v)\n\t}\n}\n";
        let file = parse_file("t.go", src).unwrap();
        // Function body block, the comm arm, the range body block. The
        // select and range statements carry no slots of their own.
        assert_eq!(collect(&file).len(), 3);
    }
}
