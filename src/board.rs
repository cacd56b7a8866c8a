use std::collections::HashMap;
use std::collections::HashSet;

use tracing::trace;

use crate::coord::Coord;
use crate::coord::Region;
use crate::rule_set::RuleSet;

/// The set of live cells on the infinite plane.
///
/// Only live cells are stored: presence in the set means alive, absence means dead. This is what
/// lets us hold an unbounded board, since memory and stepping cost scale with the population and
/// not with the area the population is spread over.
#[derive(Debug, Clone, Default)]
pub struct Board {
    cells: HashSet<Coord>,
    rules: RuleSet,
}

impl Board {
    /// An empty board playing Conway's rules
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            cells: HashSet::new(),
            rules,
        }
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn is_alive(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }

    pub fn set_alive(&mut self, c: Coord, alive: bool) {
        if alive {
            self.cells.insert(c);
        } else {
            self.cells.remove(&c);
        }
    }

    /// Flip the state of a cell, returning its new state.
    pub fn toggle(&mut self, c: Coord) -> bool {
        let alive = !self.is_alive(c);
        self.set_alive(c, alive);

        alive
    }

    /// Number of live cells in the Moore neighborhood of `c`, in `[0, 8]`.
    pub fn neighbor_count(&self, c: Coord) -> u8 {
        c.neighbors().filter(|n| self.cells.contains(n)).count() as u8
    }

    /// Advance the board by one generation.
    ///
    /// Every live cell adds one to the count of each of its neighbors, so after a single pass
    /// over the population `counts` holds the neighbor count of every candidate: the live cells
    /// themselves, and every dead cell touching one. Dead cells far from any life are never
    /// visited.
    ///
    /// The next generation is collected in a fresh set and swapped in at the end. Reading and
    /// writing the same set would let later cells see already-updated neighbors.
    pub fn step(&mut self) {
        let mut counts: HashMap<Coord, u8> = HashMap::with_capacity(self.cells.len() * 9);

        for &c in &self.cells {
            // live cells are candidates even when isolated
            counts.entry(c).or_insert(0);

            for n in c.neighbors() {
                *counts.entry(n).or_insert(0) += 1;
            }
        }

        let candidates = counts.len();

        let next: HashSet<Coord> = counts
            .into_iter()
            .filter(|&(c, n)| self.rules.next_state(self.cells.contains(&c), n))
            .map(|(c, _)| c)
            .collect();

        trace!(
            candidates,
            before = self.cells.len(),
            after = next.len(),
            "stepped board"
        );

        self.cells = next;
    }

    /// Every live cell inside `region`, in row-major order.
    ///
    /// Whichever is smaller of the population and the region gets scanned, so neither a huge
    /// region nor a huge population elsewhere on the plane slows down a small query.
    pub fn alive_cells_in(&self, region: &Region) -> Vec<Coord> {
        if region.is_empty() || self.cells.is_empty() {
            return Vec::new();
        }

        let mut res: Vec<Coord> = if region.area() <= self.cells.len() as u128 {
            region.cells().filter(|c| self.cells.contains(c)).collect()
        } else {
            self.cells
                .iter()
                .copied()
                .filter(|&c| region.contains(c))
                .collect()
        };

        res.sort_unstable_by_key(|c| (c.y, c.x));

        res
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Live cells, in no particular order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl FromIterator<Coord> for Board {
    fn from_iter<T: IntoIterator<Item = Coord>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
            rules: RuleSet::default(),
        }
    }
}

impl Extend<Coord> for Board {
    fn extend<T: IntoIterator<Item = Coord>>(&mut self, iter: T) {
        self.cells.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Board;
    use crate::coord::Coord;
    use crate::coord::Region;
    use crate::rule_set::RuleSet;

    fn board(cells: &[(i64, i64)]) -> Board {
        cells.iter().copied().map(Coord::from).collect()
    }

    fn live(board: &Board) -> HashSet<Coord> {
        board.cells().collect()
    }

    #[test]
    fn untouched_cells_are_dead() {
        let b = Board::new();

        assert!(!b.is_alive(Coord::new(0, 0)));
        assert!(!b.is_alive(Coord::new(i64::MIN, i64::MAX)));
        assert!(b.is_empty());
    }

    #[test]
    fn set_alive_is_idempotent() {
        let mut b = Board::new();
        let c = Coord::new(4, -2);

        b.set_alive(c, true);
        b.set_alive(c, true);
        assert!(b.is_alive(c));
        assert_eq!(b.population(), 1);

        b.set_alive(c, false);
        b.set_alive(c, false);
        assert!(!b.is_alive(c));
        assert_eq!(b.population(), 0);
    }

    #[test]
    fn toggle_flips_state() {
        let mut b = Board::new();
        let c = Coord::new(1, 1);

        assert!(b.toggle(c));
        assert!(b.is_alive(c));
        assert!(!b.toggle(c));
        assert!(!b.is_alive(c));
    }

    #[test]
    fn neighbor_count_two() {
        let b = board(&[(1, 0), (0, 1)]);

        assert_eq!(b.neighbor_count(Coord::new(0, 0)), 2);
    }

    #[test]
    fn neighbor_count_ignores_center() {
        let mut b = board(&[(0, 0)]);
        assert_eq!(b.neighbor_count(Coord::new(0, 0)), 0);

        b.extend((-1..=1).flat_map(|x| (-1..=1).map(move |y| Coord::new(x, y))));
        assert_eq!(b.neighbor_count(Coord::new(0, 0)), 8);
    }

    #[test]
    fn birth_with_three() {
        let mut b = board(&[(-1, -1), (1, -1), (0, 1)]);
        b.step();

        assert!(b.is_alive(Coord::new(0, 0)));
    }

    #[test]
    fn survival_with_two_or_three() {
        // (0, 0) has 2 neighbors
        let mut b = board(&[(0, 0), (-1, 0), (1, 0)]);
        b.step();
        assert!(b.is_alive(Coord::new(0, 0)));

        // (0, 0) has 3 neighbors
        let mut b = board(&[(0, 0), (-1, 0), (1, 0), (0, 1)]);
        b.step();
        assert!(b.is_alive(Coord::new(0, 0)));
    }

    #[test]
    fn underpopulation() {
        let mut b = board(&[(0, 0)]);
        b.step();
        assert!(!b.is_alive(Coord::new(0, 0)));

        let mut b = board(&[(0, 0), (1, 1)]);
        b.step();
        assert!(b.is_empty());
    }

    #[test]
    fn overpopulation() {
        let mut b = board(&[(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)]);
        assert_eq!(b.neighbor_count(Coord::new(0, 0)), 4);

        b.step();
        assert!(!b.is_alive(Coord::new(0, 0)));
    }

    #[test]
    fn step_reads_only_the_old_generation() {
        // An L-tromino becomes a block. Updating in place would let (1, 1) be counted as
        // alive when evaluating its neighbors.
        let mut b = board(&[(0, 0), (1, 0), (0, 1)]);
        b.step();

        assert_eq!(live(&b), live(&board(&[(0, 0), (1, 0), (0, 1), (1, 1)])));
    }

    #[test]
    fn custom_rules_keep_isolated_cells() {
        // B3/S0: isolated cells survive
        let mut b = Board::with_rules(RuleSet::new(0b1000, 0b1));
        b.set_alive(Coord::new(7, 7), true);
        b.step();

        assert!(b.is_alive(Coord::new(7, 7)));
        assert_eq!(b.rules(), RuleSet::new(0b1000, 0b1));
    }

    #[test]
    fn region_query_scans_either_side() {
        let b = board(&[(0, 0), (2, 1), (5, 5), (-1, 0), (1, 3)]);

        // smaller than the population
        let small = Region::new(0, 2, 0, 1);
        assert_eq!(b.alive_cells_in(&small), vec![Coord::new(0, 0)]);

        // much larger than the population
        let large = Region::new(-1_000, 3, -1_000, 4);
        assert_eq!(
            b.alive_cells_in(&large),
            vec![
                Coord::new(-1, 0),
                Coord::new(0, 0),
                Coord::new(2, 1),
                Coord::new(1, 3),
            ]
        );
    }

    #[test]
    fn region_query_on_empty_region() {
        let b = board(&[(0, 0)]);

        assert!(b.alive_cells_in(&Region::new(0, 0, 0, 10)).is_empty());
    }

    #[test]
    fn clear_kills_everything() {
        let mut b = board(&[(0, 0), (1, 0)]);
        b.clear();

        assert!(b.is_empty());
    }
}
