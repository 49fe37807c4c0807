//! Sequence alignment for corpus preparation.
//!
//! A Needleman-Wunsch variant over two sliceable sequences. The model
//! decides which windows of the two sides may match (keysymbols against
//! grapheme runs, morphology parts against their spelling); the aligner
//! minimises a lexicographic cost of unmatched items and match chunks and
//! returns the matched windows in order.

pub mod ortho;

use std::ops::Range;

/// Read-only random access to a sequence by index and window.
pub trait Sliceable {
    type Item;

    fn len(&self) -> usize;
    fn index(&self, i: usize) -> &Self::Item;
    fn slice(&self, range: Range<usize>) -> &[Self::Item];

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Sliceable for [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn index(&self, i: usize) -> &T {
        &self[i]
    }

    fn slice(&self, range: Range<usize>) -> &[T] {
        &self[range]
    }
}

/// Alignment cost, compared lexicographically: unmatched source items
/// first, then unmatched target items, then the number of match chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct AlignCost {
    pub unmatched_x: usize,
    pub unmatched_y: usize,
    pub chunks: usize,
}

/// Decides which `(x window, y window)` pairs count as a match.
pub trait AlignmentModel {
    type ItemX;
    type ItemY;
    type MatchData: Clone;

    /// Widest x window [`try_match`] will ever accept.
    ///
    /// [`try_match`]: AlignmentModel::try_match
    fn max_x_window(&self) -> usize;
    fn max_y_window(&self) -> usize;

    fn try_match(&self, xs: &[Self::ItemX], ys: &[Self::ItemY]) -> Option<Self::MatchData>;
}

/// One matched window pair in an optimal alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatch<M> {
    pub x: Range<usize>,
    pub y: Range<usize>,
    pub data: M,
}

enum Parent<M> {
    Start,
    GapX,
    GapY,
    Both,
    Match { dx: usize, dy: usize, data: M },
}

struct Cell<M> {
    cost: AlignCost,
    parent: Parent<M>,
}

/// Globally align `xs` against `ys` under `model`, returning the matched
/// windows in sequence order.
pub fn align<M, X, Y>(model: &M, xs: &X, ys: &Y) -> Vec<AlignmentMatch<M::MatchData>>
where
    M: AlignmentModel,
    X: Sliceable<Item = M::ItemX> + ?Sized,
    Y: Sliceable<Item = M::ItemY> + ?Sized,
{
    let nx = xs.len();
    let ny = ys.len();

    let mut grid: Vec<Vec<Cell<M::MatchData>>> = Vec::with_capacity(nx + 1);
    for i in 0..=nx {
        let mut row = Vec::with_capacity(ny + 1);
        for j in 0..=ny {
            // border cells are pure gap runs
            let (cost, parent) = if i == 0 && j == 0 {
                (AlignCost::default(), Parent::Start)
            } else if i == 0 {
                (
                    AlignCost {
                        unmatched_y: j,
                        ..AlignCost::default()
                    },
                    Parent::GapY,
                )
            } else {
                (
                    AlignCost {
                        unmatched_x: i,
                        unmatched_y: j,
                        chunks: 0,
                    },
                    Parent::GapX,
                )
            };
            row.push(Cell { cost, parent });
        }
        grid.push(row);
    }

    for i in 1..=nx {
        for j in 1..=ny {
            let mut best = grid[i - 1][j].cost;
            best.unmatched_x += 1;
            let mut parent = Parent::GapX;

            let mut gap_y = grid[i][j - 1].cost;
            gap_y.unmatched_y += 1;
            if gap_y < best {
                best = gap_y;
                parent = Parent::GapY;
            }

            let mut both = grid[i - 1][j - 1].cost;
            both.unmatched_x += 1;
            both.unmatched_y += 1;
            if both < best {
                best = both;
                parent = Parent::Both;
            }

            for dx in 1..=model.max_x_window().min(i) {
                for dy in 1..=model.max_y_window().min(j) {
                    let Some(data) =
                        model.try_match(xs.slice(i - dx..i), ys.slice(j - dy..j))
                    else {
                        continue;
                    };
                    let mut cost = grid[i - dx][j - dy].cost;
                    cost.chunks += 1;
                    if cost < best {
                        best = cost;
                        parent = Parent::Match { dx, dy, data };
                    }
                }
            }

            grid[i][j] = Cell { cost: best, parent };
        }
    }

    // explicit traceback loop from the far corner
    let mut matches = Vec::new();
    let (mut i, mut j) = (nx, ny);
    while i > 0 || j > 0 {
        match &grid[i][j].parent {
            Parent::Start => break,
            Parent::GapX => i -= 1,
            Parent::GapY => j -= 1,
            Parent::Both => {
                i -= 1;
                j -= 1;
            }
            Parent::Match { dx, dy, data } => {
                matches.push(AlignmentMatch {
                    x: i - dx..i,
                    y: j - dy..j,
                    data: data.clone(),
                });
                i -= dx;
                j -= dy;
            }
        }
    }
    matches.reverse();
    matches
}
