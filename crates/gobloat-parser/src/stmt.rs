//! Statement parsing: blocks, simple statements, and the control
//! constructs with init-statement headers.

use gobloat_syntax::ast::{AssignOp, Block, BranchKind, Expr, ExprId, Stmt, StmtId};
use gobloat_syntax::TokenKind;

use crate::{ParseError, Parser};

enum SimpleOrRange {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        expr: ExprId,
    },
}

impl Parser<'_> {
    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let saved = std::mem::take(&mut self.no_composite);
        let mut list = Vec::new();
        while !self.at(&TokenKind::RBrace) && !self.at(&TokenKind::Eof) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let s = self.parse_stmt()?;
            list.push(s);
            self.expect_semi()?;
        }
        self.expect(&TokenKind::RBrace)?;
        self.no_composite = saved;
        Ok(self.out.alloc_stmt(Stmt::Block(Block { list })))
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        match self.cur().clone() {
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Var | TokenKind::Const | TokenKind::Type => {
                let decl = self.parse_decl_stmt()?;
                Ok(self.out.alloc_stmt(Stmt::Decl(decl)))
            }
            TokenKind::Return => {
                self.advance();
                let results = if matches!(
                    self.cur(),
                    TokenKind::Semi
                        | TokenKind::RBrace
                        | TokenKind::Case
                        | TokenKind::Default
                        | TokenKind::Eof
                ) {
                    Vec::new()
                } else {
                    self.parse_expr_list()?
                };
                Ok(self.out.alloc_stmt(Stmt::Return(results)))
            }
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Select => self.parse_select(),
            TokenKind::Go => {
                self.advance();
                let call = self.parse_call_expr("go")?;
                Ok(self.out.alloc_stmt(Stmt::Go(call)))
            }
            TokenKind::Defer => {
                self.advance();
                let call = self.parse_call_expr("defer")?;
                Ok(self.out.alloc_stmt(Stmt::Defer(call)))
            }
            TokenKind::Goto => {
                self.advance();
                let label = self.expect_ident()?;
                Ok(self.out.alloc_stmt(Stmt::Branch {
                    kind: BranchKind::Goto,
                    label: Some(label),
                }))
            }
            TokenKind::Break => {
                self.advance();
                let label = self.opt_label();
                Ok(self.out.alloc_stmt(Stmt::Branch {
                    kind: BranchKind::Break,
                    label,
                }))
            }
            TokenKind::Continue => {
                self.advance();
                let label = self.opt_label();
                Ok(self.out.alloc_stmt(Stmt::Branch {
                    kind: BranchKind::Continue,
                    label,
                }))
            }
            TokenKind::Fallthrough => {
                self.advance();
                Ok(self.out.alloc_stmt(Stmt::Branch {
                    kind: BranchKind::Fallthrough,
                    label: None,
                }))
            }
            TokenKind::Semi => {
                self.advance();
                Ok(self.out.alloc_stmt(Stmt::Empty))
            }
            TokenKind::Ident(label) if self.peek() == &TokenKind::Colon => {
                self.advance();
                self.advance();
                let stmt = if matches!(
                    self.cur(),
                    TokenKind::RBrace | TokenKind::Case | TokenKind::Default | TokenKind::Semi
                ) {
                    self.out.alloc_stmt(Stmt::Empty)
                } else {
                    self.parse_stmt()?
                };
                Ok(self.out.alloc_stmt(Stmt::Labeled { label, stmt }))
            }
            _ => self.parse_simple_stmt(),
        }
    }

    fn opt_label(&mut self) -> Option<smol_str::SmolStr> {
        if let TokenKind::Ident(label) = self.cur().clone() {
            self.advance();
            Some(label)
        } else {
            None
        }
    }

    fn parse_call_expr(&mut self, keyword: &str) -> Result<ExprId, ParseError> {
        let e = self.parse_expr()?;
        match self.out.expr(e) {
            Expr::Call { .. } => Ok(e),
            _ => Err(self.error(format!("expression in {keyword} must be function call"))),
        }
    }

    /// Parse a simple statement: assignment, define, send, inc/dec, or a
    /// bare expression.
    pub(crate) fn parse_simple_stmt(&mut self) -> Result<StmtId, ParseError> {
        match self.parse_simple_or_range(false)? {
            SimpleOrRange::Stmt(s) => Ok(s),
            SimpleOrRange::Range { .. } => Err(self.error("range is only valid in for statements")),
        }
    }

    fn parse_simple_or_range(&mut self, allow_range: bool) -> Result<SimpleOrRange, ParseError> {
        let exprs = self.parse_expr_list()?;
        if let Some(op) = assign_op(self.cur()) {
            self.advance();
            if allow_range
                && self.at(&TokenKind::Range)
                && matches!(op, AssignOp::Assign | AssignOp::Define)
            {
                self.advance();
                if exprs.len() > 2 {
                    return Err(self.error("too many variables in range clause"));
                }
                let expr = self.parse_expr()?;
                return Ok(SimpleOrRange::Range {
                    key: exprs.first().copied(),
                    value: exprs.get(1).copied(),
                    define: op == AssignOp::Define,
                    expr,
                });
            }
            let rhs = self.parse_expr_list()?;
            if !matches!(op, AssignOp::Assign | AssignOp::Define)
                && (exprs.len() != 1 || rhs.len() != 1)
            {
                return Err(self.error("compound assignment needs single operands"));
            }
            return Ok(SimpleOrRange::Stmt(self.out.alloc_stmt(Stmt::Assign {
                lhs: exprs,
                op,
                rhs,
            })));
        }
        match self.cur() {
            TokenKind::Arrow => {
                let [chan] = one(self, &exprs, "send statement")?;
                self.advance();
                let value = self.parse_expr()?;
                Ok(SimpleOrRange::Stmt(
                    self.out.alloc_stmt(Stmt::Send { chan, value }),
                ))
            }
            TokenKind::Inc => {
                let [expr] = one(self, &exprs, "increment statement")?;
                self.advance();
                Ok(SimpleOrRange::Stmt(
                    self.out.alloc_stmt(Stmt::IncDec { expr, inc: true }),
                ))
            }
            TokenKind::Dec => {
                let [expr] = one(self, &exprs, "decrement statement")?;
                self.advance();
                Ok(SimpleOrRange::Stmt(
                    self.out.alloc_stmt(Stmt::IncDec { expr, inc: false }),
                ))
            }
            _ => {
                let [expr] = one(self, &exprs, "expression statement")?;
                Ok(SimpleOrRange::Stmt(self.out.alloc_stmt(Stmt::Expr(expr))))
            }
        }
    }

    fn parse_if(&mut self) -> Result<StmtId, ParseError> {
        self.expect(&TokenKind::If)?;
        self.no_composite += 1;
        let first = self.parse_simple_stmt()?;
        let (init, cond) = if self.eat(&TokenKind::Semi) {
            (Some(first), self.parse_expr()?)
        } else {
            match self.out.stmt(first) {
                Stmt::Expr(e) => (None, *e),
                _ => return Err(self.error("missing condition in if statement")),
            }
        };
        self.no_composite -= 1;
        let then = self.parse_block()?;
        // `else` accepts any statement, not only a block or `if`: the
        // rewrite can place a wrapped call in the else slot, and the
        // grammar stays closed under re-parsing its own output.
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(self.parse_stmt()?)
        } else {
            None
        };
        Ok(self.out.alloc_stmt(Stmt::If {
            init,
            cond,
            then,
            else_branch,
        }))
    }

    fn parse_for(&mut self) -> Result<StmtId, ParseError> {
        self.expect(&TokenKind::For)?;
        self.no_composite += 1;

        enum Header {
            Plain {
                init: Option<StmtId>,
                cond: Option<ExprId>,
                post: Option<StmtId>,
            },
            Range {
                key: Option<ExprId>,
                value: Option<ExprId>,
                define: bool,
                expr: ExprId,
            },
        }

        let header = if self.at(&TokenKind::LBrace) {
            Header::Plain {
                init: None,
                cond: None,
                post: None,
            }
        } else if self.eat(&TokenKind::Range) {
            let expr = self.parse_expr()?;
            Header::Range {
                key: None,
                value: None,
                define: false,
                expr,
            }
        } else if self.eat(&TokenKind::Semi) {
            let cond = if self.at(&TokenKind::Semi) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.expect(&TokenKind::Semi)?;
            let post = if self.at(&TokenKind::LBrace) {
                None
            } else {
                Some(self.parse_simple_stmt()?)
            };
            Header::Plain {
                init: None,
                cond,
                post,
            }
        } else {
            match self.parse_simple_or_range(true)? {
                SimpleOrRange::Range {
                    key,
                    value,
                    define,
                    expr,
                } => Header::Range {
                    key,
                    value,
                    define,
                    expr,
                },
                SimpleOrRange::Stmt(s) => {
                    if self.eat(&TokenKind::Semi) {
                        let cond = if self.at(&TokenKind::Semi) {
                            None
                        } else {
                            Some(self.parse_expr()?)
                        };
                        self.expect(&TokenKind::Semi)?;
                        let post = if self.at(&TokenKind::LBrace) {
                            None
                        } else {
                            Some(self.parse_simple_stmt()?)
                        };
                        Header::Plain {
                            init: Some(s),
                            cond,
                            post,
                        }
                    } else {
                        match self.out.stmt(s) {
                            Stmt::Expr(e) => Header::Plain {
                                init: None,
                                cond: Some(*e),
                                post: None,
                            },
                            _ => return Err(self.error("missing condition in for statement")),
                        }
                    }
                }
            }
        };

        self.no_composite -= 1;
        let body = self.parse_block()?;
        let stmt = match header {
            Header::Plain { init, cond, post } => Stmt::For {
                init,
                cond,
                post,
                body,
            },
            Header::Range {
                key,
                value,
                define,
                expr,
            } => Stmt::Range {
                key,
                value,
                define,
                expr,
                body,
            },
        };
        Ok(self.out.alloc_stmt(stmt))
    }

    fn parse_switch(&mut self) -> Result<StmtId, ParseError> {
        self.expect(&TokenKind::Switch)?;
        self.no_composite += 1;
        let mut init = None;
        let mut header = None;
        if !self.at(&TokenKind::LBrace) {
            let s1 = self.parse_simple_stmt()?;
            if self.eat(&TokenKind::Semi) {
                init = Some(s1);
                if !self.at(&TokenKind::LBrace) {
                    header = Some(self.parse_simple_stmt()?);
                }
            } else {
                header = Some(s1);
            }
        }
        self.no_composite -= 1;
        let clauses = self.parse_case_clauses(false)?;

        let stmt = match header {
            None => Stmt::Switch {
                init,
                tag: None,
                clauses,
            },
            Some(s) if self.is_type_switch_header(s) => Stmt::TypeSwitch {
                init,
                assign: s,
                clauses,
            },
            Some(s) => match self.out.stmt(s) {
                Stmt::Expr(e) => Stmt::Switch {
                    init,
                    tag: Some(*e),
                    clauses,
                },
                _ => return Err(self.error("invalid switch header")),
            },
        };
        Ok(self.out.alloc_stmt(stmt))
    }

    fn is_type_switch_header(&self, s: StmtId) -> bool {
        let is_type_guard = |e: ExprId| {
            matches!(
                self.out.expr(e),
                Expr::TypeAssert { typ: None, .. }
            )
        };
        match self.out.stmt(s) {
            Stmt::Expr(e) => is_type_guard(*e),
            Stmt::Assign {
                op: AssignOp::Define,
                rhs,
                ..
            } => rhs.len() == 1 && is_type_guard(rhs[0]),
            _ => false,
        }
    }

    fn parse_select(&mut self) -> Result<StmtId, ParseError> {
        self.expect(&TokenKind::Select)?;
        let clauses = self.parse_case_clauses(true)?;
        Ok(self.out.alloc_stmt(Stmt::Select { clauses }))
    }

    fn parse_case_clauses(&mut self, select: bool) -> Result<Vec<StmtId>, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut clauses = Vec::new();
        while self.at(&TokenKind::Case) || self.at(&TokenKind::Default) {
            clauses.push(self.parse_case_clause(select)?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(clauses)
    }

    fn parse_case_clause(&mut self, select: bool) -> Result<StmtId, ParseError> {
        if self.eat(&TokenKind::Case) {
            if select {
                let comm = self.parse_simple_stmt()?;
                self.expect(&TokenKind::Colon)?;
                let body = self.parse_clause_body()?;
                Ok(self.out.alloc_stmt(Stmt::Comm {
                    comm: Some(comm),
                    body,
                }))
            } else {
                let exprs = self.parse_expr_list()?;
                self.expect(&TokenKind::Colon)?;
                let body = self.parse_clause_body()?;
                Ok(self.out.alloc_stmt(Stmt::Case {
                    exprs: Some(exprs),
                    body,
                }))
            }
        } else {
            self.expect(&TokenKind::Default)?;
            self.expect(&TokenKind::Colon)?;
            let body = self.parse_clause_body()?;
            let stmt = if select {
                Stmt::Comm { comm: None, body }
            } else {
                Stmt::Case { exprs: None, body }
            };
            Ok(self.out.alloc_stmt(stmt))
        }
    }

    fn parse_clause_body(&mut self) -> Result<Vec<StmtId>, ParseError> {
        let mut body = Vec::new();
        while !matches!(
            self.cur(),
            TokenKind::Case | TokenKind::Default | TokenKind::RBrace | TokenKind::Eof
        ) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let s = self.parse_stmt()?;
            body.push(s);
            self.expect_semi()?;
        }
        Ok(body)
    }
}

fn one<const N: usize>(
    p: &Parser<'_>,
    exprs: &[ExprId],
    what: &str,
) -> Result<[ExprId; N], ParseError> {
    exprs
        .try_into()
        .map_err(|_| p.error(format!("{what} needs exactly one expression")))
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::Define => AssignOp::Define,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Rem,
        TokenKind::AmpEq => AssignOp::And,
        TokenKind::PipeEq => AssignOp::Or,
        TokenKind::CaretEq => AssignOp::Xor,
        TokenKind::ShlEq => AssignOp::Shl,
        TokenKind::ShrEq => AssignOp::Shr,
        TokenKind::AmpCaretEq => AssignOp::AndNot,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use gobloat_syntax::ast::{AssignOp, Decl, Stmt};

    use crate::parse_file;

    fn body_of(src: &str) -> (gobloat_syntax::SourceFile, Vec<gobloat_syntax::StmtId>) {
        let file = parse_file("test.go", src).unwrap();
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Block(block) = file.stmt(func.body.unwrap()) else {
            panic!("expected block");
        };
        let list = block.list.clone();
        (file, list)
    }

    #[test]
    fn parses_define_and_assign() {
        let (file, list) = body_of("package p\n\nfunc f() {\n\tx := 1\n\tx = x + 1\n}\n");
        assert_eq!(list.len(), 2);
        assert!(matches!(
            file.stmt(list[0]),
            Stmt::Assign {
                op: AssignOp::Define,
                ..
            }
        ));
        assert!(matches!(
            file.stmt(list[1]),
            Stmt::Assign {
                op: AssignOp::Assign,
                ..
            }
        ));
    }

    #[test]
    fn parses_if_with_init() {
        let (file, list) = body_of(
            "package p\n\nfunc f() {\n\tif err := do(); err != nil {\n\t\treturn\n\t}\n}\n",
        );
        let Stmt::If { init, else_branch, .. } = file.stmt(list[0]) else {
            panic!("expected if");
        };
        assert!(init.is_some());
        assert!(else_branch.is_none());
    }

    #[test]
    fn parses_bare_for_and_three_clause_for() {
        let (file, list) = body_of(
            "package p\n\nfunc f() {\n\tfor {\n\t\twork()\n\t}\n\tfor i := 0; i < 10; i++ {\n\t\twork()\n\t}\n}\n",
        );
        let Stmt::For {
            init: None,
            cond: None,
            post: None,
            ..
        } = file.stmt(list[0])
        else {
            panic!("expected bare for");
        };
        let Stmt::For {
            init: Some(_),
            cond: Some(_),
            post: Some(_),
            ..
        } = file.stmt(list[1])
        else {
            panic!("expected three-clause for");
        };
    }

    #[test]
    fn parses_range_for() {
        let (file, list) =
            body_of("package p\n\nfunc f() {\n\tfor i, v := range xs {\n\t\tuse(i, v)\n\t}\n}\n");
        let Stmt::Range {
            key: Some(_),
            value: Some(_),
            define: true,
            ..
        } = file.stmt(list[0])
        else {
            panic!("expected range");
        };
    }

    #[test]
    fn parses_switch_and_type_switch() {
        let src = "package p\n\nfunc f(v interface{}) {\n\tswitch x := v; x {\n\tcase 1:\n\t\ta()\n\tdefault:\n\t\tb()\n\t}\n\tswitch t := v.(type) {\n\tcase int:\n\t\tuse(t)\n\t}\n}\n";
        let (file, list) = body_of(src);
        let Stmt::Switch { init: Some(_), tag: Some(_), clauses } = file.stmt(list[0]) else {
            panic!("expected switch with init and tag");
        };
        assert_eq!(clauses.len(), 2);
        assert!(matches!(file.stmt(clauses[1]), Stmt::Case { exprs: None, .. }));
        assert!(matches!(file.stmt(list[1]), Stmt::TypeSwitch { .. }));
    }

    #[test]
    fn parses_select_with_comm_clauses() {
        let src = "package p\n\nfunc f(ch chan int) {\n\tselect {\n\tcase v := <-ch:\n\t\tuse(v)\n\tcase ch <- 1:\n\tdefault:\n\t\tidle()\n\t}\n}\n";
        let (file, list) = body_of(src);
        let Stmt::Select { clauses } = file.stmt(list[0]) else {
            panic!("expected select");
        };
        assert_eq!(clauses.len(), 3);
        assert!(matches!(file.stmt(clauses[2]), Stmt::Comm { comm: None, .. }));
    }

    #[test]
    fn parses_labeled_goto_and_defer() {
        let src = "package p\n\nfunc f() {\nloop:\n\tfor {\n\t\tbreak loop\n\t}\n\tgoto loop\n\tdefer close()\n}\n";
        let (file, list) = body_of(src);
        assert!(matches!(file.stmt(list[0]), Stmt::Labeled { .. }));
        assert!(matches!(file.stmt(list[1]), Stmt::Branch { .. }));
        assert!(matches!(file.stmt(list[2]), Stmt::Defer(_)));
    }

    #[test]
    fn composite_literal_blocked_in_if_header_but_fine_in_parens() {
        assert!(parse_file(
            "test.go",
            "package p\n\nfunc f() {\n\tif x == (T{}) {\n\t\twork()\n\t}\n}\n"
        )
        .is_ok());
        let slice = "package p\n\nfunc f() {\n\tfor _, v := range []int{1, 2} {\n\t\tuse(v)\n\t}\n}\n";
        assert!(parse_file("test.go", slice).is_ok());
    }

    #[test]
    fn lenient_else_accepts_wrapped_statement() {
        let src = "package p\n\nfunc f() {\n\tif ok {\n\t\ta()\n\t} else func() {\n\t\tb()\n\t}()\n}\n";
        let (file, list) = body_of(src);
        let Stmt::If {
            else_branch: Some(e),
            ..
        } = file.stmt(list[0])
        else {
            panic!("expected if with else");
        };
        assert!(matches!(file.stmt(*e), Stmt::Expr(_)));
    }
}
