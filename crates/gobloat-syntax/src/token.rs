//! Token kinds and source spans for the Go subset.

use smol_str::SmolStr;

/// A byte-offset range in a single source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of start (inclusive)
    pub start: u32,
    /// Byte offset of end (exclusive)
    pub end: u32,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    /// Merge two spans into one that covers both.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A single lexed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token kinds, including the automatically inserted semicolon.
///
/// Literal and identifier tokens carry their source text verbatim; the
/// printer echoes literal text back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(SmolStr),
    Int(SmolStr),
    Float(SmolStr),
    Imag(SmolStr),
    Str(SmolStr),
    Rune(SmolStr),

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Operators and delimiters
    Plus,       // +
    Minus,      // -
    Star,       // *
    Slash,      // /
    Percent,    // %
    Amp,        // &
    Pipe,       // |
    Caret,      // ^
    Shl,        // <<
    Shr,        // >>
    AmpCaret,   // &^
    PlusEq,     // +=
    MinusEq,    // -=
    StarEq,     // *=
    SlashEq,    // /=
    PercentEq,  // %=
    AmpEq,      // &=
    PipeEq,     // |=
    CaretEq,    // ^=
    ShlEq,      // <<=
    ShrEq,      // >>=
    AmpCaretEq, // &^=
    AndAnd,     // &&
    OrOr,       // ||
    Arrow,      // <-
    Inc,        // ++
    Dec,        // --
    EqEq,       // ==
    Lt,         // <
    Gt,         // >
    Eq,         // =
    Not,        // !
    NotEq,      // !=
    LtEq,       // <=
    GtEq,       // >=
    Define,     // :=
    Ellipsis,   // ...
    LParen,     // (
    LBracket,   // [
    LBrace,     // {
    Comma,      // ,
    Dot,        // .
    RParen,     // )
    RBracket,   // ]
    RBrace,     // }
    Semi,       // ; (explicit or inserted)
    Colon,      // :

    Eof,
}

impl TokenKind {
    /// Binary operator precedence, Go levels 1 (lowest) to 5.
    /// Returns 0 for non-operators.
    pub fn precedence(&self) -> u8 {
        use TokenKind::*;
        match self {
            OrOr => 1,
            AndAnd => 2,
            EqEq | NotEq | Lt | LtEq | Gt | GtEq => 3,
            Plus | Minus | Pipe | Caret => 4,
            Star | Slash | Percent | Shl | Shr | Amp | AmpCaret => 5,
            _ => 0,
        }
    }

    /// Whether a newline after this token triggers semicolon insertion.
    pub fn ends_statement(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Ident(_)
                | Int(_)
                | Float(_)
                | Imag(_)
                | Str(_)
                | Rune(_)
                | Break
                | Continue
                | Fallthrough
                | Return
                | Inc
                | Dec
                | RParen
                | RBracket
                | RBrace
        )
    }

    /// Keyword lookup for an identifier-shaped word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "break" => Break,
            "case" => Case,
            "chan" => Chan,
            "const" => Const,
            "continue" => Continue,
            "default" => Default,
            "defer" => Defer,
            "else" => Else,
            "fallthrough" => Fallthrough,
            "for" => For,
            "func" => Func,
            "go" => Go,
            "goto" => Goto,
            "if" => If,
            "import" => Import,
            "interface" => Interface,
            "map" => Map,
            "package" => Package,
            "range" => Range,
            "return" => Return,
            "select" => Select,
            "struct" => Struct,
            "switch" => Switch,
            "type" => Type,
            "var" => Var,
            _ => return None,
        })
    }

    /// Human-readable rendering used in parse error messages.
    pub fn describe(&self) -> String {
        use TokenKind::*;
        match self {
            Ident(name) => format!("identifier {name}"),
            Int(text) | Float(text) | Imag(text) => format!("literal {text}"),
            Str(_) => "string literal".to_string(),
            Rune(_) => "rune literal".to_string(),
            Eof => "end of file".to_string(),
            Semi => "';'".to_string(),
            other => format!("'{}'", other.symbol_text()),
        }
    }

    /// Fixed source text for keyword/operator tokens.
    pub fn symbol_text(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Break => "break",
            Case => "case",
            Chan => "chan",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Defer => "defer",
            Else => "else",
            Fallthrough => "fallthrough",
            For => "for",
            Func => "func",
            Go => "go",
            Goto => "goto",
            If => "if",
            Import => "import",
            Interface => "interface",
            Map => "map",
            Package => "package",
            Range => "range",
            Return => "return",
            Select => "select",
            Struct => "struct",
            Switch => "switch",
            Type => "type",
            Var => "var",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Shl => "<<",
            Shr => ">>",
            AmpCaret => "&^",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            ShlEq => "<<=",
            ShrEq => ">>=",
            AmpCaretEq => "&^=",
            AndAnd => "&&",
            OrOr => "||",
            Arrow => "<-",
            Inc => "++",
            Dec => "--",
            EqEq => "==",
            Lt => "<",
            Gt => ">",
            Eq => "=",
            Not => "!",
            NotEq => "!=",
            LtEq => "<=",
            GtEq => ">=",
            Define => ":=",
            Ellipsis => "...",
            LParen => "(",
            LBracket => "[",
            LBrace => "{",
            Comma => ",",
            Dot => ".",
            RParen => ")",
            RBracket => "]",
            RBrace => "}",
            Semi => ";",
            Colon => ":",
            Ident(_) | Int(_) | Float(_) | Imag(_) | Str(_) | Rune(_) | Eof => "",
        }
    }
}
