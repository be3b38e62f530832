//! Parser for the Go subset gobloat rewrites.
//!
//! This crate is the parse collaborator of the pipeline: it turns source
//! text into the arena-based tree defined in `gobloat-syntax` and reports
//! the first syntax error it hits. Nothing downstream needs source
//! positions, so the tree itself carries none; errors are reported as
//! `file:line:column: message`.

mod expr;
mod lexer;
mod stmt;

use gobloat_syntax::ast::{
    Decl, Expr, ExprId, Field, FuncDecl, GenDecl, ImportDecl, ImportSpec, Signature, SourceFile,
    TypeDeclGroup, TypeSpec, ValueSpec,
};
use gobloat_syntax::{Span, Token, TokenKind};
use smol_str::SmolStr;
use thiserror::Error;

use crate::lexer::Lexer;

/// A syntax error in one input file. The first error aborts that file.
#[derive(Debug, Clone, Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl ParseError {
    pub(crate) fn at(file: &str, src: &str, offset: u32, message: String) -> Self {
        let offset = (offset as usize).min(src.len());
        let before = &src[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
        let column = (offset - before.rfind('\n').map_or(0, |i| i + 1)) as u32 + 1;
        Self {
            file: file.to_string(),
            line,
            column,
            message,
        }
    }
}

/// Parse one Go source file.
pub fn parse_file(file_name: &str, source: &str) -> Result<SourceFile, ParseError> {
    let tokens = Lexer::new(file_name, source).tokenize()?;
    log::trace!("{file_name}: {} tokens", tokens.len());
    Parser::new(file_name, source, tokens).parse()
}

pub(crate) struct Parser<'a> {
    file_name: &'a str,
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    pub(crate) out: SourceFile,
    /// Nonzero while parsing a control-clause header, where a composite
    /// literal at the top level of an expression would swallow the body's
    /// opening brace.
    pub(crate) no_composite: u32,
}

impl<'a> Parser<'a> {
    fn new(file_name: &'a str, src: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            file_name,
            src,
            tokens,
            pos: 0,
            out: SourceFile::default(),
            no_composite: 0,
        }
    }

    // --- Token plumbing ---

    pub(crate) fn cur(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    pub(crate) fn cur_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        let i = (self.pos + 1).min(self.tokens.len() - 1);
        &self.tokens[i].kind
    }

    pub(crate) fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    pub(crate) fn at(&self, kind: &TokenKind) -> bool {
        self.cur() == kind
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {}, found {}",
                kind.describe(),
                self.cur().describe()
            )))
        }
    }

    pub(crate) fn expect_ident(&mut self) -> Result<SmolStr, ParseError> {
        match self.cur().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            other => Err(self.error(format!("expected identifier, found {}", other.describe()))),
        }
    }

    /// Consume a terminating semicolon. A closing `)` or `}` (or EOF) may
    /// stand in for it, as in the Go grammar.
    pub(crate) fn expect_semi(&mut self) -> Result<(), ParseError> {
        match self.cur() {
            TokenKind::Semi => {
                self.advance();
                Ok(())
            }
            TokenKind::RParen | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            other => Err(self.error(format!("expected ';', found {}", other.describe()))),
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.file_name, self.src, self.cur_span().start, message.into())
    }

    /// Whether a token can start a type.
    pub(crate) fn starts_type(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Ident(_)
                | TokenKind::Star
                | TokenKind::LBracket
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Func
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::LParen
                | TokenKind::Arrow
        )
    }

    // --- File structure ---

    fn parse(mut self) -> Result<SourceFile, ParseError> {
        self.expect(&TokenKind::Package)?;
        self.out.package = self.expect_ident()?;
        self.expect_semi()?;

        while self.eat(&TokenKind::Semi) {}
        while self.at(&TokenKind::Import) {
            let decl = self.parse_import_decl()?;
            self.out.imports.push(decl);
            while self.eat(&TokenKind::Semi) {}
        }

        while !self.at(&TokenKind::Eof) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let decl = self.parse_top_decl()?;
            self.out.decls.push(decl);
            self.expect_semi()?;
        }
        Ok(self.out)
    }

    fn parse_import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        self.expect(&TokenKind::Import)?;
        let mut specs = Vec::new();
        let grouped = self.eat(&TokenKind::LParen);
        if grouped {
            while !self.at(&TokenKind::RParen) {
                if self.eat(&TokenKind::Semi) {
                    continue;
                }
                specs.push(self.parse_import_spec()?);
                self.expect_semi()?;
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            specs.push(self.parse_import_spec()?);
        }
        self.expect_semi()?;
        Ok(ImportDecl { specs, grouped })
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let alias = match self.cur().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Some(name)
            }
            TokenKind::Dot => {
                self.advance();
                Some(SmolStr::new("."))
            }
            _ => None,
        };
        match self.cur().clone() {
            TokenKind::Str(path) => {
                self.advance();
                Ok(ImportSpec { alias, path })
            }
            other => Err(self.error(format!("expected import path, found {}", other.describe()))),
        }
    }

    fn parse_top_decl(&mut self) -> Result<Decl, ParseError> {
        match self.cur() {
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::Var => {
                self.advance();
                Ok(Decl::Var(self.parse_gen_decl(false)?))
            }
            TokenKind::Const => {
                self.advance();
                Ok(Decl::Const(self.parse_gen_decl(true)?))
            }
            TokenKind::Type => {
                self.advance();
                Ok(Decl::TypeDef(self.parse_type_decl()?))
            }
            other => Err(self.error(format!(
                "expected declaration, found {}",
                other.describe()
            ))),
        }
    }

    /// Parse a `var`/`const`/`type` statement-level declaration (the
    /// keyword already consumed by the caller for top-level use).
    pub(crate) fn parse_decl_stmt(&mut self) -> Result<Decl, ParseError> {
        match self.cur() {
            TokenKind::Var => {
                self.advance();
                Ok(Decl::Var(self.parse_gen_decl(false)?))
            }
            TokenKind::Const => {
                self.advance();
                Ok(Decl::Const(self.parse_gen_decl(true)?))
            }
            TokenKind::Type => {
                self.advance();
                Ok(Decl::TypeDef(self.parse_type_decl()?))
            }
            other => Err(self.error(format!(
                "expected declaration, found {}",
                other.describe()
            ))),
        }
    }

    fn parse_func_decl(&mut self) -> Result<Decl, ParseError> {
        self.expect(&TokenKind::Func)?;
        let recv = if self.at(&TokenKind::LParen) {
            let mut fields = self.parse_params()?;
            if fields.len() != 1 {
                return Err(self.error("method receiver must be a single parameter"));
            }
            Some(fields.remove(0))
        } else {
            None
        };
        let name = self.expect_ident()?;
        let sig = self.parse_signature()?;
        let body = if self.at(&TokenKind::LBrace) {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(Decl::Func(FuncDecl {
            name,
            recv,
            sig,
            body,
        }))
    }

    pub(crate) fn parse_signature(&mut self) -> Result<Signature, ParseError> {
        let params = self.parse_params()?;
        let results = if self.at(&TokenKind::LParen) {
            self.parse_params()?
        } else if Self::starts_type(self.cur()) {
            let typ = self.parse_type()?;
            vec![Field {
                names: Vec::new(),
                typ,
            }]
        } else {
            Vec::new()
        };
        Ok(Signature { params, results })
    }

    /// Parse a parenthesized parameter list. Entries are parsed as either
    /// `name type` or a bare type; bare identifiers are regrouped as names
    /// when any entry in the list carries one (`a, b int`).
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Field>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let saved = std::mem::take(&mut self.no_composite);

        let mut entries: Vec<(Option<SmolStr>, ExprId)> = Vec::new();
        while !self.at(&TokenKind::RParen) {
            let entry = self.parse_param_entry()?;
            entries.push(entry);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RParen)?;
        self.no_composite = saved;
        self.regroup_params(entries)
    }

    fn parse_param_entry(&mut self) -> Result<(Option<SmolStr>, ExprId), ParseError> {
        // `name type` when an identifier is directly followed by something
        // that starts a type; `pkg.T` and a lone `name` fall through to the
        // type parser.
        if let TokenKind::Ident(name) = self.cur().clone() {
            let next = self.peek().clone();
            let named = (Self::starts_type(&next) || next == TokenKind::Ellipsis)
                && next != TokenKind::LParen;
            if named && !matches!(next, TokenKind::Dot) {
                self.advance();
                let typ = self.parse_param_type()?;
                return Ok((Some(name), typ));
            }
        }
        let typ = self.parse_param_type()?;
        Ok((None, typ))
    }

    fn parse_param_type(&mut self) -> Result<ExprId, ParseError> {
        if self.eat(&TokenKind::Ellipsis) {
            let elem = self.parse_type()?;
            Ok(self.out.alloc_expr(Expr::Ellipsis(Some(elem))))
        } else {
            self.parse_type()
        }
    }

    fn regroup_params(
        &mut self,
        entries: Vec<(Option<SmolStr>, ExprId)>,
    ) -> Result<Vec<Field>, ParseError> {
        if !entries.iter().any(|(name, _)| name.is_some()) {
            return Ok(entries
                .into_iter()
                .map(|(_, typ)| Field {
                    names: Vec::new(),
                    typ,
                })
                .collect());
        }
        let mut fields = Vec::new();
        let mut pending: Vec<SmolStr> = Vec::new();
        for (name, typ) in entries {
            match name {
                Some(name) => {
                    pending.push(name);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        typ,
                    });
                }
                None => match self.out.expr(typ) {
                    Expr::Ident(n) => pending.push(n.clone()),
                    _ => return Err(self.error("mixed named and unnamed parameters")),
                },
            }
        }
        if !pending.is_empty() {
            return Err(self.error("parameter names missing a type"));
        }
        Ok(fields)
    }

    fn parse_gen_decl(&mut self, is_const: bool) -> Result<GenDecl, ParseError> {
        let mut specs = Vec::new();
        let grouped = self.eat(&TokenKind::LParen);
        if grouped {
            while !self.at(&TokenKind::RParen) {
                if self.eat(&TokenKind::Semi) {
                    continue;
                }
                specs.push(self.parse_value_spec(is_const)?);
                self.expect_semi()?;
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            specs.push(self.parse_value_spec(is_const)?);
        }
        Ok(GenDecl { specs, grouped })
    }

    fn parse_value_spec(&mut self, is_const: bool) -> Result<ValueSpec, ParseError> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }
        let typ = if Self::starts_type(self.cur()) && !self.at(&TokenKind::LParen) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let values = if self.eat(&TokenKind::Eq) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };
        if !is_const && typ.is_none() && values.is_empty() {
            return Err(self.error("variable declaration needs a type or a value"));
        }
        Ok(ValueSpec { names, typ, values })
    }

    fn parse_type_decl(&mut self) -> Result<TypeDeclGroup, ParseError> {
        let mut specs = Vec::new();
        let grouped = self.eat(&TokenKind::LParen);
        if grouped {
            while !self.at(&TokenKind::RParen) {
                if self.eat(&TokenKind::Semi) {
                    continue;
                }
                specs.push(self.parse_type_spec()?);
                self.expect_semi()?;
            }
            self.expect(&TokenKind::RParen)?;
        } else {
            specs.push(self.parse_type_spec()?);
        }
        Ok(TypeDeclGroup { specs, grouped })
    }

    fn parse_type_spec(&mut self) -> Result<TypeSpec, ParseError> {
        let name = self.expect_ident()?;
        let alias = self.eat(&TokenKind::Eq);
        let typ = self.parse_type()?;
        Ok(TypeSpec { name, alias, typ })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gobloat_syntax::ast::Stmt;

    #[test]
    fn parses_package_and_imports() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\tio \"io\"\n)\n";
        let file = parse_file("test.go", src).unwrap();
        assert_eq!(file.package.as_str(), "main");
        assert_eq!(file.imports.len(), 1);
        assert_eq!(file.imports[0].specs.len(), 2);
        assert_eq!(file.imports[0].specs[1].alias.as_deref(), Some("io"));
    }

    #[test]
    fn parses_function_with_grouped_params() {
        let src = "package p\n\nfunc add(a, b int) int {\n\treturn a + b\n}\n";
        let file = parse_file("test.go", src).unwrap();
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        assert_eq!(func.name.as_str(), "add");
        assert_eq!(func.sig.params.len(), 1);
        assert_eq!(func.sig.params[0].names.len(), 2);
        assert_eq!(func.sig.results.len(), 1);
        let body = func.body.expect("body");
        let Stmt::Block(block) = file.stmt(body) else {
            panic!("expected block body");
        };
        assert_eq!(block.list.len(), 1);
    }

    #[test]
    fn parses_method_with_pointer_receiver() {
        let src = "package p\n\nfunc (s *Server) Close() error {\n\treturn nil\n}\n";
        let file = parse_file("test.go", src).unwrap();
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        assert!(func.recv.is_some());
        assert_eq!(func.recv.as_ref().unwrap().names[0].as_str(), "s");
    }

    #[test]
    fn parses_var_const_and_type_decls() {
        let src = "package p\n\nvar count int\n\nconst (\n\tA = 1\n\tB\n)\n\ntype Pair struct {\n\tK string\n\tV int\n}\n";
        let file = parse_file("test.go", src).unwrap();
        assert_eq!(file.decls.len(), 3);
        assert!(matches!(file.decls[0], Decl::Var(_)));
        assert!(matches!(file.decls[1], Decl::Const(_)));
        assert!(matches!(file.decls[2], Decl::TypeDef(_)));
    }

    #[test]
    fn reports_error_position() {
        let err = parse_file("bad.go", "package p\n\nfunc f( {\n").unwrap_err();
        assert_eq!(err.file, "bad.go");
        assert_eq!(err.line, 3);
        assert!(err.to_string().contains("bad.go:3:"));
    }

    #[test]
    fn rejects_missing_package_clause() {
        assert!(parse_file("bad.go", "func f() {}\n").is_err());
    }
}
