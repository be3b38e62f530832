//! Expression and type parsing.
//!
//! Types are expressions, as in `go/ast`, so conversions and composite
//! literal types fall out of the same grammar. The one ambiguity Go calls
//! out — a `T{...}` composite literal between a control keyword and the
//! block's opening brace — is handled with the `no_composite` depth
//! counter: identifier-typed composites are rejected there, while
//! `[]T{...}` and `map[K]V{...}` forms stay legal everywhere.

use gobloat_syntax::ast::{BinOp, ChanDir, Expr, ExprId, InterfaceElem, StructField, UnOp};
use gobloat_syntax::TokenKind;
use smol_str::SmolStr;

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        self.parse_binary(1)
    }

    pub(crate) fn parse_expr_list(&mut self) -> Result<Vec<ExprId>, ParseError> {
        let mut list = vec![self.parse_expr()?];
        while self.eat(&TokenKind::Comma) {
            list.push(self.parse_expr()?);
        }
        Ok(list)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let prec = self.cur().precedence();
            if prec < min_prec || prec == 0 {
                return Ok(lhs);
            }
            let op = binop(self.cur());
            self.advance();
            let rhs = self.parse_binary(prec + 1)?;
            lhs = self.out.alloc_expr(Expr::Binary { op, lhs, rhs });
        }
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cur() {
            TokenKind::Plus => UnOp::Plus,
            TokenKind::Minus => UnOp::Minus,
            TokenKind::Not => UnOp::Not,
            TokenKind::Caret => UnOp::Xor,
            TokenKind::Amp => UnOp::Addr,
            TokenKind::Star => UnOp::Deref,
            TokenKind::Arrow => {
                if self.peek() == &TokenKind::Chan {
                    // Receive-only channel type, not a receive operation.
                    return self.parse_type();
                }
                UnOp::Recv
            }
            _ => return self.parse_primary(),
        };
        self.advance();
        let expr = self.parse_unary()?;
        Ok(self.out.alloc_expr(Expr::Unary { op, expr }))
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let mut x = self.parse_operand()?;
        loop {
            match self.cur() {
                TokenKind::Dot => {
                    self.advance();
                    if self.eat(&TokenKind::LParen) {
                        let typ = if self.eat(&TokenKind::Type) {
                            None
                        } else {
                            Some(self.parse_type()?)
                        };
                        self.expect(&TokenKind::RParen)?;
                        x = self.out.alloc_expr(Expr::TypeAssert { expr: x, typ });
                    } else {
                        let sel = self.expect_ident()?;
                        x = self.out.alloc_expr(Expr::Selector { expr: x, sel });
                    }
                }
                TokenKind::LParen => {
                    x = self.parse_call(x)?;
                }
                TokenKind::LBracket => {
                    x = self.parse_index_or_slice(x)?;
                }
                TokenKind::LBrace if self.composite_ok(x) => {
                    x = self.parse_composite_lit(Some(x))?;
                }
                _ => return Ok(x),
            }
        }
    }

    /// Whether `{` after this operand opens a composite literal.
    fn composite_ok(&self, x: ExprId) -> bool {
        match self.out.expr(x) {
            // `T{...}` / `pkg.T{...}` are ambiguous in control headers.
            Expr::Ident(_) | Expr::Selector { .. } => self.no_composite == 0,
            Expr::ArrayType { .. } | Expr::MapType { .. } | Expr::StructType { .. } => true,
            _ => false,
        }
    }

    fn parse_call(&mut self, fun: ExprId) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let saved = std::mem::take(&mut self.no_composite);
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(&TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Ellipsis) {
                ellipsis = true;
            }
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        self.no_composite = saved;
        Ok(self.out.alloc_expr(Expr::Call {
            fun,
            args,
            ellipsis,
        }))
    }

    fn parse_index_or_slice(&mut self, expr: ExprId) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let saved = std::mem::take(&mut self.no_composite);
        let low = if self.at(&TokenKind::Colon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let node = if self.eat(&TokenKind::Colon) {
            let high = if self.at(&TokenKind::Colon) || self.at(&TokenKind::RBracket) {
                None
            } else {
                Some(self.parse_expr()?)
            };
            let max = if self.eat(&TokenKind::Colon) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            Expr::Slice {
                expr,
                low,
                high,
                max,
            }
        } else {
            match low {
                Some(index) => Expr::Index { expr, index },
                None => return Err(self.error("expected index expression")),
            }
        };
        self.expect(&TokenKind::RBracket)?;
        self.no_composite = saved;
        Ok(self.out.alloc_expr(node))
    }

    fn parse_operand(&mut self) -> Result<ExprId, ParseError> {
        match self.cur().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(self.out.alloc_expr(Expr::Ident(name)))
            }
            TokenKind::Int(text) => self.lit(gobloat_syntax::ast::LitKind::Int, text),
            TokenKind::Float(text) => self.lit(gobloat_syntax::ast::LitKind::Float, text),
            TokenKind::Imag(text) => self.lit(gobloat_syntax::ast::LitKind::Imag, text),
            TokenKind::Str(text) => self.lit(gobloat_syntax::ast::LitKind::Str, text),
            TokenKind::Rune(text) => self.lit(gobloat_syntax::ast::LitKind::Rune, text),
            TokenKind::LParen => {
                self.advance();
                let saved = std::mem::take(&mut self.no_composite);
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                self.no_composite = saved;
                Ok(self.out.alloc_expr(Expr::Paren(inner)))
            }
            TokenKind::Func => {
                self.advance();
                let sig = self.parse_signature()?;
                if self.at(&TokenKind::LBrace) {
                    let body = self.parse_block()?;
                    Ok(self.out.alloc_expr(Expr::FuncLit { sig, body }))
                } else {
                    Ok(self.out.alloc_expr(Expr::FuncType(sig)))
                }
            }
            TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Struct
            | TokenKind::Interface
            | TokenKind::Arrow => self.parse_type(),
            other => Err(self.error(format!(
                "expected expression, found {}",
                other.describe()
            ))),
        }
    }

    fn lit(
        &mut self,
        kind: gobloat_syntax::ast::LitKind,
        text: SmolStr,
    ) -> Result<ExprId, ParseError> {
        self.advance();
        Ok(self.out.alloc_expr(Expr::BasicLit { kind, text }))
    }

    pub(crate) fn parse_composite_lit(
        &mut self,
        typ: Option<ExprId>,
    ) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let saved = std::mem::take(&mut self.no_composite);
        let mut elems = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            let elem = self.parse_lit_elem()?;
            elems.push(elem);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        self.no_composite = saved;
        Ok(self.out.alloc_expr(Expr::CompositeLit { typ, elems }))
    }

    fn parse_lit_elem(&mut self) -> Result<ExprId, ParseError> {
        let key_or_value = if self.at(&TokenKind::LBrace) {
            self.parse_composite_lit(None)?
        } else {
            self.parse_expr()?
        };
        if self.eat(&TokenKind::Colon) {
            let value = if self.at(&TokenKind::LBrace) {
                self.parse_composite_lit(None)?
            } else {
                self.parse_expr()?
            };
            Ok(self.out.alloc_expr(Expr::KeyValue {
                key: key_or_value,
                value,
            }))
        } else {
            Ok(key_or_value)
        }
    }

    // --- Types ---

    pub(crate) fn parse_type(&mut self) -> Result<ExprId, ParseError> {
        match self.cur().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                let base = self.out.alloc_expr(Expr::Ident(name));
                if self.at(&TokenKind::Dot) && matches!(self.peek(), TokenKind::Ident(_)) {
                    self.advance();
                    let sel = self.expect_ident()?;
                    Ok(self.out.alloc_expr(Expr::Selector { expr: base, sel }))
                } else {
                    Ok(base)
                }
            }
            TokenKind::Star => {
                self.advance();
                let expr = self.parse_type()?;
                Ok(self.out.alloc_expr(Expr::Unary {
                    op: UnOp::Deref,
                    expr,
                }))
            }
            TokenKind::LBracket => {
                self.advance();
                let len = if self.eat(&TokenKind::RBracket) {
                    None
                } else if self.eat(&TokenKind::Ellipsis) {
                    self.expect(&TokenKind::RBracket)?;
                    Some(self.out.alloc_expr(Expr::Ellipsis(None)))
                } else {
                    let saved = std::mem::take(&mut self.no_composite);
                    let len = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    self.no_composite = saved;
                    Some(len)
                };
                let elem = self.parse_type()?;
                Ok(self.out.alloc_expr(Expr::ArrayType { len, elem }))
            }
            TokenKind::Map => {
                self.advance();
                self.expect(&TokenKind::LBracket)?;
                let key = self.parse_type()?;
                self.expect(&TokenKind::RBracket)?;
                let value = self.parse_type()?;
                Ok(self.out.alloc_expr(Expr::MapType { key, value }))
            }
            TokenKind::Chan => {
                self.advance();
                let dir = if self.eat(&TokenKind::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.parse_type()?;
                Ok(self.out.alloc_expr(Expr::ChanType { dir, elem }))
            }
            TokenKind::Arrow => {
                self.advance();
                self.expect(&TokenKind::Chan)?;
                let elem = self.parse_type()?;
                Ok(self.out.alloc_expr(Expr::ChanType {
                    dir: ChanDir::Recv,
                    elem,
                }))
            }
            TokenKind::Func => {
                self.advance();
                let sig = self.parse_signature()?;
                Ok(self.out.alloc_expr(Expr::FuncType(sig)))
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_type()?;
                self.expect(&TokenKind::RParen)?;
                Ok(self.out.alloc_expr(Expr::Paren(inner)))
            }
            other => Err(self.error(format!("expected type, found {}", other.describe()))),
        }
    }

    fn parse_struct_type(&mut self) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::Struct)?;
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            fields.push(self.parse_struct_field()?);
            self.expect_semi()?;
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.out.alloc_expr(Expr::StructType { fields }))
    }

    fn parse_struct_field(&mut self) -> Result<StructField, ParseError> {
        // Embedded pointer field.
        if self.at(&TokenKind::Star) {
            let typ = self.parse_type()?;
            let tag = self.parse_field_tag();
            return Ok(StructField {
                names: Vec::new(),
                typ,
                tag,
            });
        }

        let first = self.expect_ident()?;
        // Embedded field: a lone (possibly qualified) type name.
        if self.at(&TokenKind::Dot) {
            let base = self.out.alloc_expr(Expr::Ident(first));
            self.advance();
            let sel = self.expect_ident()?;
            let typ = self.out.alloc_expr(Expr::Selector { expr: base, sel });
            let tag = self.parse_field_tag();
            return Ok(StructField {
                names: Vec::new(),
                typ,
                tag,
            });
        }
        if matches!(
            self.cur(),
            TokenKind::Semi | TokenKind::RBrace | TokenKind::Str(_)
        ) {
            let typ = self.out.alloc_expr(Expr::Ident(first));
            let tag = self.parse_field_tag();
            return Ok(StructField {
                names: Vec::new(),
                typ,
                tag,
            });
        }

        let mut names = vec![first];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }
        let typ = self.parse_type()?;
        let tag = self.parse_field_tag();
        Ok(StructField { names, typ, tag })
    }

    fn parse_field_tag(&mut self) -> Option<SmolStr> {
        if let TokenKind::Str(tag) = self.cur().clone() {
            self.advance();
            Some(tag)
        } else {
            None
        }
    }

    fn parse_interface_type(&mut self) -> Result<ExprId, ParseError> {
        self.expect(&TokenKind::Interface)?;
        self.expect(&TokenKind::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let name = self.expect_ident()?;
            if self.at(&TokenKind::LParen) {
                let sig = self.parse_signature()?;
                elems.push(InterfaceElem::Method { name, sig });
            } else {
                let mut typ = self.out.alloc_expr(Expr::Ident(name));
                if self.eat(&TokenKind::Dot) {
                    let sel = self.expect_ident()?;
                    typ = self.out.alloc_expr(Expr::Selector { expr: typ, sel });
                }
                elems.push(InterfaceElem::Embedded(typ));
            }
            self.expect_semi()?;
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(self.out.alloc_expr(Expr::InterfaceType { elems }))
    }
}

fn binop(kind: &TokenKind) -> BinOp {
    match kind {
        TokenKind::OrOr => BinOp::OrOr,
        TokenKind::AndAnd => BinOp::AndAnd,
        TokenKind::EqEq => BinOp::Eq,
        TokenKind::NotEq => BinOp::NotEq,
        TokenKind::Lt => BinOp::Lt,
        TokenKind::LtEq => BinOp::LtEq,
        TokenKind::Gt => BinOp::Gt,
        TokenKind::GtEq => BinOp::GtEq,
        TokenKind::Plus => BinOp::Add,
        TokenKind::Minus => BinOp::Sub,
        TokenKind::Pipe => BinOp::Or,
        TokenKind::Caret => BinOp::Xor,
        TokenKind::Star => BinOp::Mul,
        TokenKind::Slash => BinOp::Div,
        TokenKind::Percent => BinOp::Rem,
        TokenKind::Shl => BinOp::Shl,
        TokenKind::Shr => BinOp::Shr,
        TokenKind::Amp => BinOp::And,
        TokenKind::AmpCaret => BinOp::AndNot,
        // precedence() returned nonzero, so this is unreachable
        _ => unreachable!("not a binary operator"),
    }
}
