//! Input pattern lists.

use sva_netlist::{Const, Trit};

enum Reduction {
    /// Drop the pattern at this index.
    Drop(usize),
    /// Set this position of the first pattern to x and drop the second.
    Merge(usize, usize, usize),
}

/// The one position where `a` and `b` are defined and differ, provided they
/// agree everywhere else, including on their x positions.
fn single_difference(a: &Const, b: &Const) -> Option<usize> {
    let mut delta = None;
    for (pos, (x, y)) in a.trits().iter().zip(b.trits()).enumerate() {
        if x == y {
            continue;
        }
        if !x.is_defined() || !y.is_defined() || delta.is_some() {
            return None;
        }
        delta = Some(pos);
    }
    delta
}

fn find_reduction(patterns: &[Const]) -> Option<Reduction> {
    for (i, a) in patterns.iter().enumerate() {
        for (j, b) in patterns.iter().enumerate() {
            if i == j {
                continue;
            }
            if a.covers(b) {
                return Some(Reduction::Drop(j));
            }
            if i < j {
                if let Some(pos) = single_difference(a, b) {
                    return Some(Reduction::Merge(i, j, pos));
                }
            }
        }
    }
    None
}

/// Shrinks a list of equal-width patterns without changing the set of inputs
/// it matches: patterns covered by another are dropped, and pairs differing
/// in one defined position are merged into one with x there. The survivors
/// keep their relative order.
#[must_use]
pub fn optimize_patterns(mut patterns: Vec<Const>) -> Vec<Const> {
    while let Some(reduction) = find_reduction(&patterns) {
        match reduction {
            Reduction::Drop(j) => {
                patterns.remove(j);
            }
            Reduction::Merge(i, j, pos) => {
                patterns[i].set(pos, Trit::X);
                patterns.remove(j);
            }
        }
    }
    patterns
}
