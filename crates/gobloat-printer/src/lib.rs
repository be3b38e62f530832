//! The print collaborator: turns a parsed (and possibly rewritten) tree
//! back into Go source text.
//!
//! Output is gofmt-flavored — tab indentation, one statement per line —
//! but makes no attempt to reproduce the original file's formatting or
//! comments. The only contract is that printed output re-parses to an
//! equivalent tree. Statements sitting in control-clause header slots are
//! printed inline, with single-line blocks.

use gobloat_syntax::ast::{
    ChanDir, Decl, Expr, ExprId, Field, FuncDecl, GenDecl, ImportDecl, InterfaceElem, Signature,
    SourceFile, Stmt, StmtId, TypeDeclGroup,
};

/// Print a whole source file.
pub fn print_file(file: &SourceFile) -> String {
    let mut p = Printer::new(file);
    p.file();
    p.out
}

struct Printer<'a> {
    file: &'a SourceFile,
    out: String,
    indent: usize,
    /// Nonzero while printing a header slot; blocks and function-literal
    /// bodies go on one line there.
    inline: u32,
}

impl<'a> Printer<'a> {
    fn new(file: &'a SourceFile) -> Self {
        Self {
            file,
            out: String::new(),
            indent: 0,
            inline: 0,
        }
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn file(&mut self) {
        self.push("package ");
        self.push(&self.file.package.clone());
        self.push("\n");
        for import in &self.file.imports.clone() {
            self.push("\n");
            self.import_decl(import);
        }
        for decl in &self.file.decls.clone() {
            self.push("\n");
            self.decl(decl);
        }
    }

    fn import_decl(&mut self, decl: &ImportDecl) {
        if decl.grouped {
            self.push("import (\n");
            for spec in &decl.specs {
                self.push("\t");
                if let Some(alias) = &spec.alias {
                    self.push(alias);
                    self.push(" ");
                }
                self.push(&spec.path);
                self.push("\n");
            }
            self.push(")\n");
        } else {
            for spec in &decl.specs {
                self.push("import ");
                if let Some(alias) = &spec.alias {
                    self.push(alias);
                    self.push(" ");
                }
                self.push(&spec.path);
                self.push("\n");
            }
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Func(func) => self.func_decl(func),
            Decl::Var(gen) => {
                self.gen_decl("var", gen);
                self.push("\n");
            }
            Decl::Const(gen) => {
                self.gen_decl("const", gen);
                self.push("\n");
            }
            Decl::TypeDef(group) => {
                self.type_group(group);
                self.push("\n");
            }
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.push("func ");
        if let Some(recv) = &func.recv {
            self.push("(");
            self.field(recv);
            self.push(") ");
        }
        self.push(&func.name.clone());
        self.signature(&func.sig);
        match func.body {
            Some(body) => {
                self.push(" ");
                self.block(body);
                self.push("\n");
            }
            None => self.push("\n"),
        }
    }

    fn gen_decl(&mut self, keyword: &str, gen: &GenDecl) {
        self.push(keyword);
        if gen.grouped {
            self.push(" (\n");
            self.indent += 1;
            for spec in gen.specs.clone() {
                self.write_indent();
                self.value_spec(&spec);
                self.push("\n");
            }
            self.indent -= 1;
            self.write_indent();
            self.push(")");
        } else {
            self.push(" ");
            let spec = gen.specs[0].clone();
            self.value_spec(&spec);
        }
    }

    fn value_spec(&mut self, spec: &gobloat_syntax::ast::ValueSpec) {
        self.ident_list(&spec.names);
        if let Some(typ) = spec.typ {
            self.push(" ");
            self.expr(typ);
        }
        if !spec.values.is_empty() {
            self.push(" = ");
            self.expr_list(&spec.values);
        }
    }

    fn type_group(&mut self, group: &TypeDeclGroup) {
        self.push("type");
        if group.grouped {
            self.push(" (\n");
            self.indent += 1;
            for spec in group.specs.clone() {
                self.write_indent();
                self.type_spec(&spec);
                self.push("\n");
            }
            self.indent -= 1;
            self.write_indent();
            self.push(")");
        } else {
            self.push(" ");
            let spec = group.specs[0].clone();
            self.type_spec(&spec);
        }
    }

    fn type_spec(&mut self, spec: &gobloat_syntax::ast::TypeSpec) {
        self.push(&spec.name.clone());
        self.push(if spec.alias { " = " } else { " " });
        self.expr(spec.typ);
    }

    fn ident_list(&mut self, names: &[smol_str::SmolStr]) {
        for (i, name) in names.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.push(name);
        }
    }

    fn signature(&mut self, sig: &Signature) {
        self.push("(");
        self.fields(&sig.params);
        self.push(")");
        match sig.results.len() {
            0 => {}
            1 if sig.results[0].names.is_empty() => {
                self.push(" ");
                self.expr(sig.results[0].typ);
            }
            _ => {
                self.push(" (");
                self.fields(&sig.results);
                self.push(")");
            }
        }
    }

    fn fields(&mut self, fields: &[Field]) {
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.field(field);
        }
    }

    fn field(&mut self, field: &Field) {
        if !field.names.is_empty() {
            self.ident_list(&field.names);
            self.push(" ");
        }
        self.expr(field.typ);
    }

    // --- Statements ---

    /// Write a statement with indentation and a trailing newline.
    fn stmt_line(&mut self, id: StmtId) {
        self.write_indent();
        self.stmt(id);
        self.push("\n");
    }

    /// Write a statement without leading indent or trailing newline.
    /// Multi-line constructs manage their interior lines themselves.
    fn stmt(&mut self, id: StmtId) {
        match self.file.stmt(id).clone() {
            Stmt::Empty => {}
            Stmt::Block(_) => self.block(id),
            Stmt::Expr(e) => self.expr(e),
            Stmt::Send { chan, value } => {
                self.expr(chan);
                self.push(" <- ");
                self.expr(value);
            }
            Stmt::IncDec { expr, inc } => {
                self.expr(expr);
                self.push(if inc { "++" } else { "--" });
            }
            Stmt::Assign { lhs, op, rhs } => {
                self.expr_list(&lhs);
                self.push(" ");
                self.push(op.text());
                self.push(" ");
                self.expr_list(&rhs);
            }
            Stmt::Decl(decl) => match &decl {
                Decl::Var(gen) => self.gen_decl("var", gen),
                Decl::Const(gen) => self.gen_decl("const", gen),
                Decl::TypeDef(group) => self.type_group(group),
                Decl::Func(func) => self.func_decl(func),
            },
            Stmt::Return(results) => {
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.expr_list(&results);
                }
            }
            Stmt::Branch { kind, label } => {
                self.push(kind.text());
                if let Some(label) = label {
                    self.push(" ");
                    self.push(&label);
                }
            }
            Stmt::Go(call) => {
                self.push("go ");
                self.expr(call);
            }
            Stmt::Defer(call) => {
                self.push("defer ");
                self.expr(call);
            }
            Stmt::Labeled { label, stmt } => {
                self.push(&label);
                self.push(":");
                if !matches!(self.file.stmt(stmt), Stmt::Empty) {
                    if self.inline > 0 {
                        self.push(" ");
                        self.stmt(stmt);
                    } else {
                        self.push("\n");
                        self.write_indent();
                        self.stmt(stmt);
                    }
                }
            }
            Stmt::If {
                init,
                cond,
                then,
                else_branch,
            } => {
                self.push("if ");
                self.inline += 1;
                if let Some(init) = init {
                    self.stmt(init);
                    self.push("; ");
                }
                self.expr(cond);
                self.inline -= 1;
                self.push(" ");
                self.block(then);
                if let Some(els) = else_branch {
                    self.push(" else ");
                    match self.file.stmt(els) {
                        Stmt::If { .. } | Stmt::Block(_) => self.stmt(els),
                        _ => {
                            self.inline += 1;
                            self.stmt(els);
                            self.inline -= 1;
                        }
                    }
                }
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                self.push("for ");
                self.inline += 1;
                if init.is_some() || post.is_some() {
                    if let Some(init) = init {
                        self.stmt(init);
                    }
                    self.push("; ");
                    if let Some(cond) = cond {
                        self.expr(cond);
                    }
                    self.push("; ");
                    if let Some(post) = post {
                        self.stmt(post);
                    }
                    self.push(" ");
                } else if let Some(cond) = cond {
                    self.expr(cond);
                    self.push(" ");
                }
                self.inline -= 1;
                self.block(body);
            }
            Stmt::Range {
                key,
                value,
                define,
                expr,
                body,
            } => {
                self.push("for ");
                self.inline += 1;
                if let Some(key) = key {
                    self.expr(key);
                    if let Some(value) = value {
                        self.push(", ");
                        self.expr(value);
                    }
                    self.push(if define { " := " } else { " = " });
                }
                self.push("range ");
                self.expr(expr);
                self.inline -= 1;
                self.push(" ");
                self.block(body);
            }
            Stmt::Switch { init, tag, clauses } => {
                self.push("switch");
                self.inline += 1;
                if let Some(init) = init {
                    self.push(" ");
                    self.stmt(init);
                    self.push(";");
                }
                if let Some(tag) = tag {
                    self.push(" ");
                    self.expr(tag);
                }
                self.inline -= 1;
                self.push(" {");
                self.clause_list(&clauses);
            }
            Stmt::TypeSwitch {
                init,
                assign,
                clauses,
            } => {
                self.push("switch ");
                self.inline += 1;
                if let Some(init) = init {
                    self.stmt(init);
                    self.push("; ");
                }
                self.stmt(assign);
                self.inline -= 1;
                self.push(" {");
                self.clause_list(&clauses);
            }
            Stmt::Select { clauses } => {
                self.push("select {");
                self.clause_list(&clauses);
            }
            Stmt::Case { exprs, body } => {
                match exprs {
                    Some(exprs) => {
                        self.push("case ");
                        self.expr_list(&exprs);
                        self.push(":");
                    }
                    None => self.push("default:"),
                }
                self.clause_body(&body);
            }
            Stmt::Comm { comm, body } => {
                match comm {
                    Some(comm) => {
                        self.push("case ");
                        self.inline += 1;
                        self.stmt(comm);
                        self.inline -= 1;
                        self.push(":");
                    }
                    None => self.push("default:"),
                }
                self.clause_body(&body);
            }
        }
    }

    fn clause_list(&mut self, clauses: &[StmtId]) {
        if clauses.is_empty() {
            self.push("}");
            return;
        }
        self.push("\n");
        for &clause in clauses {
            self.write_indent();
            self.stmt(clause);
            self.push("\n");
        }
        self.write_indent();
        self.push("}");
    }

    fn clause_body(&mut self, body: &[StmtId]) {
        self.indent += 1;
        for &s in body {
            self.push("\n");
            self.write_indent();
            self.stmt(s);
        }
        self.indent -= 1;
    }

    fn block(&mut self, id: StmtId) {
        let Stmt::Block(block) = self.file.stmt(id).clone() else {
            // Slot invariants guarantee a block here; degrade gracefully.
            return self.stmt(id);
        };
        if self.inline > 0 {
            self.push("{");
            for (i, &s) in block.list.iter().enumerate() {
                self.push(if i == 0 { " " } else { "; " });
                self.stmt(s);
            }
            if !block.list.is_empty() {
                self.push(" ");
            }
            self.push("}");
        } else if block.list.is_empty() {
            self.push("{}");
        } else {
            self.push("{\n");
            self.indent += 1;
            for &s in &block.list {
                self.stmt_line(s);
            }
            self.indent -= 1;
            self.write_indent();
            self.push("}");
        }
    }

    // --- Expressions ---

    fn expr_list(&mut self, list: &[ExprId]) {
        for (i, &e) in list.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(e);
        }
    }

    fn expr(&mut self, id: ExprId) {
        match self.file.expr(id).clone() {
            Expr::Ident(name) => self.push(&name),
            Expr::BasicLit { text, kind: _ } => self.push(&text),
            Expr::FuncLit { sig, body } => {
                self.push("func");
                self.signature(&sig);
                self.push(" ");
                self.block(body);
            }
            Expr::CompositeLit { typ, elems } => {
                if let Some(typ) = typ {
                    self.expr(typ);
                }
                self.push("{");
                self.expr_list(&elems);
                self.push("}");
            }
            Expr::Paren(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
            Expr::Selector { expr, sel } => {
                self.expr(expr);
                self.push(".");
                self.push(&sel);
            }
            Expr::Index { expr, index } => {
                self.expr(expr);
                self.push("[");
                self.expr(index);
                self.push("]");
            }
            Expr::Slice {
                expr,
                low,
                high,
                max,
            } => {
                self.expr(expr);
                self.push("[");
                if let Some(low) = low {
                    self.expr(low);
                }
                self.push(":");
                if let Some(high) = high {
                    self.expr(high);
                }
                if let Some(max) = max {
                    self.push(":");
                    self.expr(max);
                }
                self.push("]");
            }
            Expr::TypeAssert { expr, typ } => {
                self.expr(expr);
                self.push(".(");
                match typ {
                    Some(typ) => self.expr(typ),
                    None => self.push("type"),
                }
                self.push(")");
            }
            Expr::Call {
                fun,
                args,
                ellipsis,
            } => {
                self.expr(fun);
                self.push("(");
                self.expr_list(&args);
                if ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            Expr::Unary { op, expr } => {
                self.push(op.text());
                self.expr(expr);
            }
            Expr::Binary { op, lhs, rhs } => {
                self.expr(lhs);
                self.push(" ");
                self.push(op.text());
                self.push(" ");
                self.expr(rhs);
            }
            Expr::KeyValue { key, value } => {
                self.expr(key);
                self.push(": ");
                self.expr(value);
            }
            Expr::Ellipsis(elem) => {
                self.push("...");
                if let Some(elem) = elem {
                    self.expr(elem);
                }
            }
            Expr::ArrayType { len, elem } => {
                self.push("[");
                if let Some(len) = len {
                    self.expr(len);
                }
                self.push("]");
                self.expr(elem);
            }
            Expr::MapType { key, value } => {
                self.push("map[");
                self.expr(key);
                self.push("]");
                self.expr(value);
            }
            Expr::ChanType { dir, elem } => {
                match dir {
                    ChanDir::Both => self.push("chan "),
                    ChanDir::Send => self.push("chan<- "),
                    ChanDir::Recv => self.push("<-chan "),
                }
                self.expr(elem);
            }
            Expr::FuncType(sig) => {
                self.push("func");
                self.signature(&sig);
            }
            Expr::StructType { fields } => {
                if fields.is_empty() {
                    self.push("struct{}");
                    return;
                }
                self.push("struct {\n");
                self.indent += 1;
                for field in &fields {
                    self.write_indent();
                    if !field.names.is_empty() {
                        self.ident_list(&field.names);
                        self.push(" ");
                    }
                    self.expr(field.typ);
                    if let Some(tag) = &field.tag {
                        self.push(" ");
                        self.push(tag);
                    }
                    self.push("\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.push("}");
            }
            Expr::InterfaceType { elems } => {
                if elems.is_empty() {
                    self.push("interface{}");
                    return;
                }
                self.push("interface {\n");
                self.indent += 1;
                for elem in &elems {
                    self.write_indent();
                    match elem {
                        InterfaceElem::Method { name, sig } => {
                            self.push(name);
                            self.signature(sig);
                        }
                        InterfaceElem::Embedded(typ) => self.expr(*typ),
                    }
                    self.push("\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.push("}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobloat_parser::parse_file;

    fn roundtrip(src: &str) -> String {
        let file = parse_file("test.go", src).unwrap();
        let printed = print_file(&file);
        // Printed output must itself parse.
        parse_file("printed.go", &printed).unwrap();
        printed
    }

    #[test]
    fn prints_canonical_function() {
        let out = roundtrip("package p\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n");
        assert_eq!(
            out,
            "package p\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n"
        );
    }

    #[test]
    fn prints_if_with_init_inline() {
        let out = roundtrip(
            "package p\n\nfunc f() {\n\tif err := do(); err != nil {\n\t\tlog(err)\n\t}\n}\n",
        );
        assert!(out.contains("if err := do(); err != nil {"));
    }

    #[test]
    fn prints_switch_clauses_at_switch_indent() {
        let out = roundtrip(
            "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 1:\n\t\ta()\n\tdefault:\n\t\tb()\n\t}\n}\n",
        );
        assert!(out.contains("\tswitch x {\n\tcase 1:\n\t\ta()\n\tdefault:\n\t\tb()\n\t}\n"));
    }

    #[test]
    fn prints_select_and_send() {
        let out = roundtrip(
            "package p\n\nfunc f(ch chan int) {\n\tselect {\n\tcase v := <-ch:\n\t\tuse(v)\n\tcase ch <- 1:\n\t}\n}\n",
        );
        assert!(out.contains("case v := <-ch:"));
        assert!(out.contains("case ch <- 1:"));
    }

    #[test]
    fn prints_types_and_composites() {
        let out = roundtrip(
            "package p\n\nvar m = map[string][]int{\"a\": {1, 2}}\n\ntype T struct {\n\tName string `json:\"name\"`\n\tnext *T\n}\n",
        );
        assert!(out.contains("map[string][]int{\"a\": {1, 2}}"));
        assert!(out.contains("Name string `json:\"name\"`"));
        assert!(out.contains("next *T"));
    }

    #[test]
    fn reparse_equals_reprint() {
        let src = "package p\n\nfunc f() {\n\tfor i := 0; i < len(xs); i++ {\n\t\tgo handle(xs[i], func(ok bool) {\n\t\t\tdone <- ok\n\t\t})\n\t}\n}\n";
        let once = roundtrip(src);
        let twice = {
            let file = parse_file("again.go", &once).unwrap();
            print_file(&file)
        };
        assert_eq!(once, twice);
    }
}
