//! The rewrite pass: wrap eligible statements in immediately invoked
//! zero-parameter closures, `s` becoming `func() { s }()`, without
//! changing what the program does.
//!
//! The pass runs in two phases over one file. [`collect`] walks the tree
//! once and records every statement-owning node; [`update`] then rewrites
//! each owner's slots through the [`close_stmt`] decision. Collection and
//! mutation never interleave, and because distinct owners hold distinct
//! slots, the owners can be processed in any order with the same result.
//!
//! The pass is deliberately not idempotent. A wrapped statement is an
//! ordinary call expression statement, so a second run wraps it again.

pub mod close;
pub mod collect;

use gobloat_syntax::ast::{SourceFile, Stmt, StmtId};
use serde::Serialize;

pub use close::{close_opt, close_stmt};
pub use collect::collect;

/// Counters reported per rewritten file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TransformStats {
    /// Statement-owning nodes found by the collection pass.
    pub owners: usize,
    /// Statements that were wrapped.
    pub wrapped: usize,
}

impl std::ops::AddAssign for TransformStats {
    fn add_assign(&mut self, rhs: Self) {
        self.owners += rhs.owners;
        self.wrapped += rhs.wrapped;
    }
}

/// Run both phases over a file in place. This cannot fail: statements the
/// pass does not recognize as owners are simply left untouched.
pub fn transform(file: &mut SourceFile) -> TransformStats {
    let owners = collect(file);
    let stats = update(file, &owners);
    log::debug!(
        "wrapped {} of the statements held by {} owners",
        stats.wrapped,
        stats.owners
    );
    stats
}

/// Second phase: push every slot of every collected owner through the
/// wrapping decision. List slots are rewritten element by element,
/// preserving order and length; absent single slots stay absent.
pub fn update(file: &mut SourceFile, owners: &[StmtId]) -> TransformStats {
    let mut stats = TransformStats {
        owners: owners.len(),
        ..TransformStats::default()
    };
    for &owner in owners {
        let mut stmt = file.stmt(owner).clone();
        match &mut stmt {
            Stmt::Block(block) => {
                for slot in &mut block.list {
                    *slot = counted(file, *slot, &mut stats);
                }
            }
            Stmt::Case { body, .. } | Stmt::Comm { body, .. } => {
                for slot in body.iter_mut() {
                    *slot = counted(file, *slot, &mut stats);
                }
            }
            Stmt::For { init, post, .. } => {
                *init = counted_opt(file, *init, &mut stats);
                *post = counted_opt(file, *post, &mut stats);
            }
            Stmt::If {
                init, else_branch, ..
            } => {
                *init = counted_opt(file, *init, &mut stats);
                *else_branch = counted_opt(file, *else_branch, &mut stats);
            }
            Stmt::Labeled { stmt: body, .. } => {
                *body = counted(file, *body, &mut stats);
            }
            Stmt::Switch { init, .. } | Stmt::TypeSwitch { init, .. } => {
                *init = counted_opt(file, *init, &mut stats);
            }
            // Not an owner; nothing to rewrite.
            _ => {}
        }
        *file.stmt_mut(owner) = stmt;
    }
    stats
}

fn counted(file: &mut SourceFile, id: StmtId, stats: &mut TransformStats) -> StmtId {
    let out = close_stmt(file, id);
    if out != id {
        stats.wrapped += 1;
    }
    out
}

fn counted_opt(
    file: &mut SourceFile,
    slot: Option<StmtId>,
    stats: &mut TransformStats,
) -> Option<StmtId> {
    slot.map(|id| counted(file, id, stats))
}
