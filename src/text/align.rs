//! Weighted token-level edit distance with full backtrace.
//!
//! Substitutions and deletions cost more than insertions: an extra spoken
//! word is a smaller fault than a wrong or missing one.

use crate::text::normalize::tokenize;
use crate::types::{AlignmentResult, EditOp};

pub const COST_SUBSTITUTE: f64 = 1.2;
pub const COST_INSERT: f64 = 1.0;
pub const COST_DELETE: f64 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Start,
    Equal,
    Substitute,
    Insert,
    Delete,
}

/// Row-major `(rows x cols)` index into a flattened table.
#[inline(always)]
fn idx(row: usize, col: usize, cols: usize) -> usize {
    row * cols + col
}

/// Align two texts after normalization.
pub fn align(reference: &str, hypothesis: &str) -> AlignmentResult {
    let reference = tokenize(reference);
    let hypothesis = tokenize(hypothesis);
    align_tokens(&reference, &hypothesis)
}

/// Minimum-cost alignment of two token sequences.
///
/// Ties between non-matching moves resolve substitute, then insert, then
/// delete. `wer` is the path cost divided by `max(1, reference length)`.
pub fn align_tokens(reference: &[String], hypothesis: &[String]) -> AlignmentResult {
    let n = reference.len();
    let m = hypothesis.len();
    let cols = m + 1;

    let mut cost = vec![0.0f64; (n + 1) * cols];
    let mut step = vec![Step::Start; (n + 1) * cols];

    for i in 1..=n {
        cost[idx(i, 0, cols)] = i as f64 * COST_DELETE;
        step[idx(i, 0, cols)] = Step::Delete;
    }
    for j in 1..=m {
        cost[idx(0, j, cols)] = j as f64 * COST_INSERT;
        step[idx(0, j, cols)] = Step::Insert;
    }

    for i in 1..=n {
        for j in 1..=m {
            let here = idx(i, j, cols);
            if reference[i - 1] == hypothesis[j - 1] {
                cost[here] = cost[idx(i - 1, j - 1, cols)];
                step[here] = Step::Equal;
                continue;
            }

            let (best, best_step) = cheapest(
                cost[idx(i - 1, j - 1, cols)] + COST_SUBSTITUTE,
                cost[idx(i, j - 1, cols)] + COST_INSERT,
                cost[idx(i - 1, j, cols)] + COST_DELETE,
            );
            cost[here] = best;
            step[here] = best_step;
        }
    }

    let ops = backtrace(&step, reference, hypothesis);
    let total = cost[idx(n, m, cols)];

    AlignmentResult {
        ops,
        cost: total,
        wer: total / n.max(1) as f64,
    }
}

/// Cheapest non-matching move. Only a strictly lower cost displaces an
/// earlier candidate, so ties go to substitute, then insert, then delete.
fn cheapest(substitute: f64, insert: f64, delete: f64) -> (f64, Step) {
    let mut best = (substitute, Step::Substitute);
    if insert < best.0 {
        best = (insert, Step::Insert);
    }
    if delete < best.0 {
        best = (delete, Step::Delete);
    }
    best
}

fn backtrace(step: &[Step], reference: &[String], hypothesis: &[String]) -> Vec<EditOp> {
    let cols = hypothesis.len() + 1;
    let (mut i, mut j) = (reference.len(), hypothesis.len());
    let mut ops = Vec::with_capacity(i.max(j));

    while i > 0 || j > 0 {
        match step[idx(i, j, cols)] {
            Step::Equal => {
                ops.push(EditOp::Equal(reference[i - 1].clone()));
                i -= 1;
                j -= 1;
            }
            Step::Substitute => {
                ops.push(EditOp::Substitute {
                    reference: reference[i - 1].clone(),
                    hypothesis: hypothesis[j - 1].clone(),
                });
                i -= 1;
                j -= 1;
            }
            Step::Insert => {
                ops.push(EditOp::Insert(hypothesis[j - 1].clone()));
                j -= 1;
            }
            Step::Delete => {
                ops.push(EditOp::Delete(reference[i - 1].clone()));
                i -= 1;
            }
            Step::Start => break,
        }
    }

    ops.reverse();
    ops
}
