//! Arena-based AST for the Go subset.
//!
//! All statement and expression nodes live in typed arenas owned by
//! [`SourceFile`] and are referenced through [`StmtId`] / [`ExprId`]
//! indices. Every node is referenced by exactly one parent slot, so an id
//! doubles as a cheap non-owning handle into a distinct slot: the transform
//! pass can record owners in one walk and rewrite their slots later without
//! any shared ownership.

use la_arena::{Arena, Idx};
use smol_str::SmolStr;

/// Type-safe index into the statement arena.
pub type StmtId = Idx<Stmt>;

/// Type-safe index into the expression arena.
pub type ExprId = Idx<Expr>;

/// One parsed Go source file: package clause, imports, top-level
/// declarations, and the arenas owning every statement and expression node.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub package: SmolStr,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
    pub stmts: Arena<Stmt>,
    pub exprs: Arena<Expr>,
}

impl SourceFile {
    pub fn new(package: impl Into<SmolStr>) -> Self {
        Self {
            package: package.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    #[inline]
    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }
}

/// An `import` declaration, possibly a parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,
    pub grouped: bool,
}

/// A single import line: optional alias (including `.` and `_`) and the
/// quoted path text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub alias: Option<SmolStr>,
    pub path: SmolStr,
}

/// Top-level (or statement-level, for `var`/`const`/`type`) declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Func(FuncDecl),
    Var(GenDecl),
    Const(GenDecl),
    TypeDef(TypeDeclGroup),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: SmolStr,
    /// Method receiver, if any.
    pub recv: Option<Field>,
    pub sig: Signature,
    /// `None` for bodyless (assembly/external) declarations.
    pub body: Option<StmtId>,
}

/// A `var` or `const` declaration with one or more specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenDecl {
    pub specs: Vec<ValueSpec>,
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<SmolStr>,
    pub typ: Option<ExprId>,
    pub values: Vec<ExprId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclGroup {
    pub specs: Vec<TypeSpec>,
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: SmolStr,
    pub alias: bool,
    pub typ: ExprId,
}

/// A parameter or result group: zero or more names sharing one type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<SmolStr>,
    pub typ: ExprId,
}

/// A function signature. The synthesized closure literal uses the default
/// (zero parameters, no declared results).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// A struct field group, optionally embedded (empty `names`) and tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub names: Vec<SmolStr>,
    pub typ: ExprId,
    pub tag: Option<SmolStr>,
}

/// One element of an interface body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceElem {
    Method { name: SmolStr, sig: Signature },
    Embedded(ExprId),
}

/// An ordered sequence of statements (the list slot of blocks).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    pub list: Vec<StmtId>,
}

/// Statement nodes. The eight statement-owning shapes are `Block`, `Case`,
/// `Comm`, `For`, `If`, `Labeled`, `Switch` and `TypeSwitch`; everything
/// else owns no statement slot of its own (range-loop, go, defer and the
/// clause headers hold blocks or expressions that are collected on their
/// own).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Empty,
    Block(Block),
    Expr(ExprId),
    Send {
        chan: ExprId,
        value: ExprId,
    },
    IncDec {
        expr: ExprId,
        inc: bool,
    },
    Assign {
        lhs: Vec<ExprId>,
        op: AssignOp,
        rhs: Vec<ExprId>,
    },
    Decl(Decl),
    Return(Vec<ExprId>),
    Branch {
        kind: BranchKind,
        label: Option<SmolStr>,
    },
    Go(ExprId),
    Defer(ExprId),
    Labeled {
        label: SmolStr,
        stmt: StmtId,
    },
    If {
        init: Option<StmtId>,
        cond: ExprId,
        then: StmtId,
        else_branch: Option<StmtId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtId,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        expr: ExprId,
        body: StmtId,
    },
    Switch {
        init: Option<StmtId>,
        tag: Option<ExprId>,
        clauses: Vec<StmtId>,
    },
    TypeSwitch {
        init: Option<StmtId>,
        /// The `x := y.(type)` assignment or bare `y.(type)` expression
        /// statement. Not a wrappable slot.
        assign: StmtId,
        clauses: Vec<StmtId>,
    },
    Select {
        clauses: Vec<StmtId>,
    },
    /// A `case`/`default` arm of an expression or type switch.
    /// `exprs` is `None` for `default`.
    Case {
        exprs: Option<Vec<ExprId>>,
        body: Vec<StmtId>,
    },
    /// A `case`/`default` arm of a `select`. `comm` is `None` for `default`.
    Comm {
        comm: Option<StmtId>,
        body: Vec<StmtId>,
    },
}

/// Expression nodes. Type forms are expressions, as in `go/ast`, so
/// conversions, composite literal types and `make`/`new` arguments need no
/// separate grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident(SmolStr),
    BasicLit {
        kind: LitKind,
        text: SmolStr,
    },
    FuncLit {
        sig: Signature,
        /// Always a `Stmt::Block`.
        body: StmtId,
    },
    CompositeLit {
        /// `None` inside another composite literal, where the type is elided.
        typ: Option<ExprId>,
        elems: Vec<ExprId>,
    },
    Paren(ExprId),
    Selector {
        expr: ExprId,
        sel: SmolStr,
    },
    Index {
        expr: ExprId,
        index: ExprId,
    },
    Slice {
        expr: ExprId,
        low: Option<ExprId>,
        high: Option<ExprId>,
        max: Option<ExprId>,
    },
    TypeAssert {
        expr: ExprId,
        /// `None` for the `.(type)` form in a type switch header.
        typ: Option<ExprId>,
    },
    Call {
        fun: ExprId,
        args: Vec<ExprId>,
        ellipsis: bool,
    },
    Unary {
        op: UnOp,
        expr: ExprId,
    },
    Binary {
        op: BinOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    KeyValue {
        key: ExprId,
        value: ExprId,
    },
    Ellipsis(Option<ExprId>),

    // Type forms
    ArrayType {
        /// `None` for a slice type.
        len: Option<ExprId>,
        elem: ExprId,
    },
    MapType {
        key: ExprId,
        value: ExprId,
    },
    ChanType {
        dir: ChanDir,
        elem: ExprId,
    },
    FuncType(Signature),
    StructType {
        fields: Vec<StructField>,
    },
    InterfaceType {
        elems: Vec<InterfaceElem>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Str,
    Rune,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKind {
    pub fn text(self) -> &'static str {
        match self {
            BranchKind::Break => "break",
            BranchKind::Continue => "continue",
            BranchKind::Goto => "goto",
            BranchKind::Fallthrough => "fallthrough",
        }
    }
}

/// Assignment operators. `Define` is the short-form `:=` that introduces
/// new bindings into the enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Define,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn text(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::And => "&=",
            AssignOp::Or => "|=",
            AssignOp::Xor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::AndNot => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
    Not,
    Xor,
    Addr,
    Deref,
    Recv,
}

impl UnOp {
    pub fn text(self) -> &'static str {
        match self {
            UnOp::Plus => "+",
            UnOp::Minus => "-",
            UnOp::Not => "!",
            UnOp::Xor => "^",
            UnOp::Addr => "&",
            UnOp::Deref => "*",
            UnOp::Recv => "<-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    OrOr,
    AndAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinOp {
    pub fn text(self) -> &'static str {
        match self {
            BinOp::OrOr => "||",
            BinOp::AndAnd => "&&",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Lt => "<",
            BinOp::LtEq => "<=",
            BinOp::Gt => ">",
            BinOp::GtEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::And => "&",
            BinOp::AndNot => "&^",
        }
    }
}
