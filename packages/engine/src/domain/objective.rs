//! Objective functions for the magic cube.
//!
//! A 5x5x5 magic cube has every row, column, pillar, per-level diagonal and space
//! diagonal summing to 315. Costs are built from per-line deviations `|sum - 315|`.
//! All aggregates are integers (weights scaled by 20) so that equal states always
//! produce bit-identical costs, no matter in which order swaps were applied.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::cube::CubeState;
use crate::spatial::lattice::{flat_index, Coord, CELL_COUNT, EXTENT};

/// n(n^3 + 1) / 2 for n = 5
pub const MAGIC_NUMBER: i32 = 315;
/// 25 rows + 25 columns + 25 pillars + 10 level diagonals + 4 space diagonals
pub const LINE_COUNT: usize = 89;

const N: u8 = EXTENT;
const WEIGHT_SCALE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Number of lines whose sum is off
    Violations,
    /// Sum of absolute line deviations
    Deviation,
    /// Weighted deviations with large-deviation penalties and a balance term
    Weighted,
}

impl Objective {
    pub fn evaluate(self, cube: &CubeState) -> f64 {
        CostTracker::new(self, cube).cost()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Row,
    Column,
    Pillar,
    LevelDiagonal,
    SpaceDiagonal,
}

impl LineKind {
    fn weight20(self) -> i64 {
        match self {
            LineKind::Row | LineKind::Column => 20,
            LineKind::Pillar => 24,
            LineKind::LevelDiagonal => 30,
            LineKind::SpaceDiagonal => 40,
        }
    }

    /// (threshold in percent of the magic number, extra weight per unit, scaled by 20)
    fn penalty20(self) -> (i64, i64) {
        match self {
            LineKind::Row | LineKind::Column | LineKind::Pillar => (20, 2),
            LineKind::LevelDiagonal => (15, 3),
            LineKind::SpaceDiagonal => (10, 4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub kind: LineKind,
    pub cells: [usize; EXTENT as usize],
}

struct LineTable {
    lines: Vec<Line>,
    /// line indices through each cell
    membership: Vec<Vec<u8>>,
}

fn line_table() -> &'static LineTable {
    static TABLE: OnceLock<LineTable> = OnceLock::new();
    TABLE.get_or_init(build_line_table)
}

fn build_line_table() -> LineTable {
    let mut lines = Vec::with_capacity(LINE_COUNT);
    let mut push = |kind: LineKind, at: &dyn Fn(u8) -> Coord| {
        let mut cells = [0usize; EXTENT as usize];
        for i in 0..N {
            cells[i as usize] = flat_index(at(i));
        }
        lines.push(Line { kind, cells });
    };

    for level in 0..N {
        for row in 0..N {
            push(LineKind::Row, &|i| Coord::new(level, row, i));
        }
    }
    for level in 0..N {
        for col in 0..N {
            push(LineKind::Column, &|i| Coord::new(level, i, col));
        }
    }
    for row in 0..N {
        for col in 0..N {
            push(LineKind::Pillar, &|i| Coord::new(i, row, col));
        }
    }
    for level in 0..N {
        push(LineKind::LevelDiagonal, &|i| Coord::new(level, i, i));
        push(LineKind::LevelDiagonal, &|i| Coord::new(level, i, N - 1 - i));
    }
    push(LineKind::SpaceDiagonal, &|i| Coord::new(i, i, i));
    push(LineKind::SpaceDiagonal, &|i| Coord::new(i, i, N - 1 - i));
    push(LineKind::SpaceDiagonal, &|i| Coord::new(i, N - 1 - i, i));
    push(LineKind::SpaceDiagonal, &|i| Coord::new(i, N - 1 - i, N - 1 - i));

    debug_assert_eq!(lines.len(), LINE_COUNT);

    let mut membership = vec![Vec::new(); CELL_COUNT];
    for (idx, line) in lines.iter().enumerate() {
        for &cell in &line.cells {
            membership[cell].push(idx as u8);
        }
    }

    LineTable { lines, membership }
}

pub fn lines() -> &'static [Line] {
    &line_table().lines
}

/// Integer aggregates over all lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub violations: i64,
    pub deviation: i64,
    pub deviation_sq: i64,
    pub weighted20: i64,
}

impl Totals {
    fn line(kind: LineKind, sum: i32) -> Totals {
        let d = (sum - MAGIC_NUMBER).abs() as i64;
        let (pct, extra) = kind.penalty20();
        let mut weighted20 = kind.weight20() * d;
        if d * 100 > pct * MAGIC_NUMBER as i64 {
            weighted20 += extra * d;
        }
        Totals {
            violations: (d != 0) as i64,
            deviation: d,
            deviation_sq: d * d,
            weighted20,
        }
    }

    fn add(&mut self, other: Totals) {
        self.violations += other.violations;
        self.deviation += other.deviation;
        self.deviation_sq += other.deviation_sq;
        self.weighted20 += other.weighted20;
    }

    fn sub(&mut self, other: Totals) {
        self.violations -= other.violations;
        self.deviation -= other.deviation;
        self.deviation_sq -= other.deviation_sq;
        self.weighted20 -= other.weighted20;
    }

    pub fn cost(&self, objective: Objective) -> f64 {
        match objective {
            Objective::Violations => self.violations as f64,
            Objective::Deviation => self.deviation as f64,
            Objective::Weighted => {
                let n = LINE_COUNT as i64;
                // population variance: (n*S2 - S1^2) / n^2
                let numerator = (n * self.deviation_sq - self.deviation * self.deviation).max(0);
                let std = (numerator as f64 / (n * n) as f64).sqrt();
                self.weighted20 as f64 / WEIGHT_SCALE + 0.5 * std
            }
        }
    }
}

/// Per-line sums for one cube, kept in step with swaps applied through it.
#[derive(Debug, Clone)]
pub struct CostTracker {
    objective: Objective,
    sums: Vec<i32>,
    totals: Totals,
}

impl CostTracker {
    pub fn new(objective: Objective, cube: &CubeState) -> Self {
        let table = line_table();
        let mut sums = Vec::with_capacity(LINE_COUNT);
        let mut totals = Totals::default();
        for line in &table.lines {
            let sum: i32 = line.cells.iter().map(|&c| cube.get(c) as i32).sum();
            totals.add(Totals::line(line.kind, sum));
            sums.push(sum);
        }
        Self {
            objective,
            sums,
            totals,
        }
    }

    #[inline]
    pub fn objective(&self) -> Objective {
        self.objective
    }

    #[inline]
    pub fn totals(&self) -> Totals {
        self.totals
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.totals.cost(self.objective)
    }

    /// True when every line hits the magic number.
    pub fn is_solved(&self) -> bool {
        self.totals.violations == 0
    }

    /// Cost the cube would have after swapping cells `a` and `b`, without mutating.
    pub fn cost_after_swap(&self, cube: &CubeState, a: usize, b: usize) -> f64 {
        self.totals_after_swap(cube, a, b).cost(self.objective)
    }

    fn totals_after_swap(&self, cube: &CubeState, a: usize, b: usize) -> Totals {
        let mut totals = self.totals;
        let diff = cube.get(b) as i32 - cube.get(a) as i32;
        if a == b || diff == 0 {
            return totals;
        }
        self.for_each_shift(a, b, diff, |line, old, new| {
            totals.sub(Totals::line(line.kind, old));
            totals.add(Totals::line(line.kind, new));
        });
        totals
    }

    /// Swap the labels in `cube` and update the sums to match.
    pub fn apply_swap(&mut self, cube: &mut CubeState, a: usize, b: usize) {
        let diff = cube.get(b) as i32 - cube.get(a) as i32;
        if a != b && diff != 0 {
            let mut changes: Vec<(usize, i32)> = Vec::with_capacity(8);
            self.for_each_shift_indexed(a, b, diff, |idx, new| changes.push((idx, new)));
            let table = line_table();
            for (idx, new) in changes {
                let kind = table.lines[idx].kind;
                self.totals.sub(Totals::line(kind, self.sums[idx]));
                self.totals.add(Totals::line(kind, new));
                self.sums[idx] = new;
            }
        }
        cube.swap(a, b);
    }

    /// Lines through exactly one of the two cells shift by `diff`; lines through
    /// both keep their sum.
    fn for_each_shift(&self, a: usize, b: usize, diff: i32, mut f: impl FnMut(&Line, i32, i32)) {
        let table = line_table();
        self.for_each_shift_indexed(a, b, diff, |idx, new| {
            f(&table.lines[idx], self.sums[idx], new)
        });
    }

    fn for_each_shift_indexed(&self, a: usize, b: usize, diff: i32, mut f: impl FnMut(usize, i32)) {
        let table = line_table();
        let through_a = &table.membership[a];
        let through_b = &table.membership[b];
        for &l in through_a {
            if !through_b.contains(&l) {
                f(l as usize, self.sums[l as usize] + diff);
            }
        }
        for &l in through_b {
            if !through_a.contains(&l) {
                f(l as usize, self.sums[l as usize] - diff);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A perfect 5x5x5 magic cube, one level per block.
    pub(crate) fn perfect_cube() -> CubeState {
        let layers: [[[u16; 5]; 5]; 5] = [
            [[78, 109, 15, 41, 72], [45, 71, 77, 108, 14], [107, 13, 44, 75, 76], [74, 80, 106, 12, 43], [11, 42, 73, 79, 110]],
            [[40, 66, 97, 103, 9], [102, 8, 39, 70, 96], [69, 100, 101, 7, 38], [6, 37, 68, 99, 105], [98, 104, 10, 36, 67]],
            [[122, 3, 34, 65, 91], [64, 95, 121, 2, 33], [1, 32, 63, 94, 125], [93, 124, 5, 31, 62], [35, 61, 92, 123, 4]],
            [[59, 90, 116, 22, 28], [21, 27, 58, 89, 120], [88, 119, 25, 26, 57], [30, 56, 87, 118, 24], [117, 23, 29, 60, 86]],
            [[16, 47, 53, 84, 115], [83, 114, 20, 46, 52], [50, 51, 82, 113, 19], [112, 18, 49, 55, 81], [54, 85, 111, 17, 48]],
        ];
        let labels: Vec<u16> = layers.iter().flatten().flatten().copied().collect();
        CubeState::from_labels(labels).unwrap()
    }

    #[test]
    fn line_table_covers_every_family() {
        let all = lines();
        assert_eq!(all.len(), LINE_COUNT);
        // centre cell lies on its row, column, pillar, both level diagonals, all space diagonals
        let centre = flat_index(Coord::new(2, 2, 2));
        let through_centre = all.iter().filter(|l| l.cells.contains(&centre)).count();
        assert_eq!(through_centre, 3 + 2 + 4);
        // a corner lies on row, column, pillar, one level diagonal and one space diagonal
        let through_corner = all.iter().filter(|l| l.cells.contains(&0)).count();
        assert_eq!(through_corner, 5);
    }

    #[test]
    fn perfect_cube_costs_nothing() {
        let cube = perfect_cube();
        for objective in [Objective::Violations, Objective::Deviation, Objective::Weighted] {
            assert_eq!(objective.evaluate(&cube), 0.0, "{:?}", objective);
        }
        assert!(CostTracker::new(Objective::Weighted, &cube).is_solved());
    }

    #[test]
    fn identity_cube_has_known_deviation() {
        let cube = CubeState::identity();
        let tracker = CostTracker::new(Objective::Deviation, &cube);
        // first row sums to 1+2+3+4+5 = 15
        assert_eq!(tracker.sums[0], 15);
        assert!(tracker.cost() > 0.0);
        assert!(tracker.totals().violations > 0);
    }

    #[test]
    fn incremental_swap_matches_full_recompute() {
        let mut rng = fastrand::Rng::with_seed(42);
        let mut cube = CubeState::shuffled(&mut rng);
        let mut tracker = CostTracker::new(Objective::Weighted, &cube);

        for _ in 0..200 {
            let a = rng.usize(..CELL_COUNT);
            let b = rng.usize(..CELL_COUNT);
            let predicted = tracker.cost_after_swap(&cube, a, b);
            tracker.apply_swap(&mut cube, a, b);
            let fresh = CostTracker::new(Objective::Weighted, &cube);
            assert_eq!(tracker.totals(), fresh.totals());
            assert_eq!(predicted, fresh.cost());
        }
    }

    #[test]
    fn self_swap_changes_nothing() {
        let cube = CubeState::identity();
        let tracker = CostTracker::new(Objective::Violations, &cube);
        assert_eq!(tracker.cost_after_swap(&cube, 17, 17), tracker.cost());
    }
}
