//! Breadth-first exploration of the Cayley graph of a permutation group: the
//! nodes are group elements and every generator adds an edge from each element
//! to its product with that generator.

use std::{collections::VecDeque, fmt::Display, time::Instant};

use bnum::cast::As;
use fxhash::FxHashSet;
use log::{debug, info};

use crate::{math::Order, permutation::Permutation, start, success, working};

/// How a generator is combined with the state it is applied to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MoveSide {
    /// `state.apply_after(generator)`: the generator happens after the state,
    /// the same way algorithms accumulate their moves
    #[default]
    After,
    /// `state.compose(generator)`: the generator happens before the state
    Before,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplorerState {
    Running,
    /// Every reachable state has been visited. This is terminal until
    /// [`CayleyExplorer::reset`] is called.
    Exhausted,
}

/// A snapshot of how far an exploration has gotten
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Distinct states reached so far, including those still queued
    pub visited: usize,
    /// States reached whose successors have not been generated yet
    pub queued: usize,
    pub expected_total: Option<Order>,
}

impl Progress {
    /// The fraction of the expected total that has been reached
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> Option<f64> {
        self.expected_total
            .filter(|total| !total.is_zero())
            .map(|total| self.visited as f64 / total.as_::<f64>())
    }
}

impl Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.fraction(), self.expected_total) {
            (Some(fraction), Some(total)) => {
                write!(f, "{:.2}% ({}/{total})", fraction * 100., self.visited)
            }
            _ => write!(f, "{} states", self.visited),
        }
    }
}

/// How a call to [`CayleyExplorer::run_with`] ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exploration {
    Exhausted { states: usize },
    /// The caller asked to stop. The explorer can be resumed.
    Interrupted { states: usize },
}

impl Exploration {
    #[must_use]
    pub fn states(self) -> usize {
        match self {
            Exploration::Exhausted { states } | Exploration::Interrupted { states } => states,
        }
    }
}

/// Enumerates the group generated by a set of permutations, starting from a
/// single state (the identity unless told otherwise).
///
/// A successor is recorded as visited the moment it is generated, so the queue
/// never holds two copies of the same state and the visited set is exactly the
/// set of reachable states once the queue runs dry.
pub struct CayleyExplorer {
    generators: Vec<Permutation>,
    start: Permutation,
    queue: VecDeque<Permutation>,
    visited: FxHashSet<Permutation>,
    expanded: usize,
    expected_total: Option<Order>,
    report_interval: usize,
    move_side: MoveSide,
    state: ExplorerState,
}

impl CayleyExplorer {
    pub const DEFAULT_REPORT_INTERVAL: usize = 10_000;

    #[must_use]
    pub fn new(generators: Vec<Permutation>) -> CayleyExplorer {
        CayleyExplorer::starting_from(generators, Permutation::identity())
    }

    #[must_use]
    pub fn starting_from(generators: Vec<Permutation>, start: Permutation) -> CayleyExplorer {
        let mut explorer = CayleyExplorer {
            generators,
            start,
            queue: VecDeque::new(),
            visited: FxHashSet::default(),
            expanded: 0,
            expected_total: None,
            report_interval: CayleyExplorer::DEFAULT_REPORT_INTERVAL,
            move_side: MoveSide::default(),
            state: ExplorerState::Running,
        };

        explorer.reset();
        explorer
    }

    /// The number of states the exploration is expected to reach. Only used
    /// for progress reports.
    #[must_use]
    pub fn with_expected_total(mut self, expected_total: Order) -> CayleyExplorer {
        self.expected_total = Some(expected_total);
        self
    }

    /// Report progress every `report_interval` expanded states
    #[must_use]
    pub fn with_report_interval(mut self, report_interval: usize) -> CayleyExplorer {
        self.report_interval = report_interval.max(1);
        self
    }

    #[must_use]
    pub fn with_move_side(mut self, move_side: MoveSide) -> CayleyExplorer {
        self.move_side = move_side;
        self
    }

    /// Throw away everything that has been visited and start over
    pub fn reset(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.expanded = 0;

        self.queue.push_back(self.start.clone());
        self.visited.insert(self.start.clone());
        self.state = ExplorerState::Running;
    }

    pub fn state(&self) -> ExplorerState {
        self.state
    }

    pub fn generators(&self) -> &[Permutation] {
        &self.generators
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn contains(&self, permutation: &Permutation) -> bool {
        self.visited.contains(permutation)
    }

    pub fn visited(&self) -> impl Iterator<Item = &Permutation> {
        self.visited.iter()
    }

    pub fn into_visited(self) -> FxHashSet<Permutation> {
        self.visited
    }

    pub fn progress(&self) -> Progress {
        Progress {
            visited: self.visited.len(),
            queued: self.queue.len(),
            expected_total: self.expected_total,
        }
    }

    /// Dequeue one state and queue each of its successors that hasn't been
    /// seen yet. Returns `false` without doing anything once the exploration
    /// is exhausted.
    pub fn step(&mut self) -> bool {
        let Some(current) = self.queue.pop_front() else {
            self.state = ExplorerState::Exhausted;
            return false;
        };

        for generator in &self.generators {
            let next = match self.move_side {
                MoveSide::After => current.apply_after(generator),
                MoveSide::Before => current.compose(generator),
            };

            if self.visited.insert(next.clone()) {
                self.queue.push_back(next);
            }
        }

        self.expanded += 1;

        if self.queue.is_empty() {
            self.state = ExplorerState::Exhausted;
        }

        true
    }

    /// Explore until exhausted and return the number of distinct states
    pub fn run(&mut self) -> usize {
        self.run_with(|_| {}, |_| true).states()
    }

    /// Explore until exhausted or until `should_continue` returns `false`.
    /// `should_continue` is checked before every dequeue, and `on_progress` is
    /// called every report interval.
    pub fn run_with(
        &mut self,
        mut on_progress: impl FnMut(&Progress),
        mut should_continue: impl FnMut(&Progress) -> bool,
    ) -> Exploration {
        info!(
            start!("Exploring the group generated by {} permutations from {} visited states"),
            self.generators.len(),
            self.visited.len()
        );
        let start = Instant::now();

        while self.state == ExplorerState::Running {
            let progress = self.progress();

            if !should_continue(&progress) {
                info!(
                    working!("Stopped after {:.3}s at {}"),
                    start.elapsed().as_secs_f64(),
                    progress
                );
                return Exploration::Interrupted {
                    states: progress.visited,
                };
            }

            self.step();

            if self.expanded % self.report_interval == 0 {
                let progress = self.progress();
                debug!(working!("Explored {}"), progress);
                on_progress(&progress);
            }
        }

        info!(
            success!("Found {} states in {:.3}s"),
            self.visited.len(),
            start.elapsed().as_secs_f64()
        );

        Exploration::Exhausted {
            states: self.visited.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CayleyExplorer, Exploration, ExplorerState, MoveSide, Progress};
    use crate::{math::Order, permutation::Permutation, puzzles::SKEWB};

    fn skewb(name: &str) -> Permutation {
        SKEWB.get(name).unwrap().clone()
    }

    #[test]
    fn single_generator_cycles() {
        let r = skewb("R");
        let mut explorer = CayleyExplorer::new(vec![r.clone(), r.invert()]);

        assert_eq!(explorer.state(), ExplorerState::Running);
        assert_eq!(explorer.run(), 3);
        assert_eq!(explorer.state(), ExplorerState::Exhausted);

        assert!(explorer.contains(&Permutation::identity()));
        assert!(explorer.contains(&r));
        assert!(explorer.contains(&r.power(2)));
    }

    #[test]
    fn exhausted_is_terminal() {
        let mut explorer = CayleyExplorer::new(vec![skewb("U")]);

        assert_eq!(explorer.run(), 3);
        assert!(!explorer.step());
        assert_eq!(explorer.state(), ExplorerState::Exhausted);
        assert_eq!(explorer.run(), 3);

        explorer.reset();
        assert_eq!(explorer.state(), ExplorerState::Running);
        assert_eq!(explorer.visited_count(), 1);
        assert_eq!(explorer.run(), 3);
    }

    #[test]
    fn empty_generator_set() {
        let mut explorer = CayleyExplorer::new(vec![]);

        assert!(explorer.step());
        assert_eq!(explorer.state(), ExplorerState::Exhausted);
        assert_eq!(explorer.visited_count(), 1);
    }

    #[test]
    fn both_sides_reach_the_same_group() {
        let generators = vec![skewb("R"), skewb("U"), skewb("R").invert(), skewb("U").invert()];

        let mut after = CayleyExplorer::new(generators.clone());
        let mut before = CayleyExplorer::new(generators).with_move_side(MoveSide::Before);

        assert_eq!(after.run(), 58_320);
        assert_eq!(before.run(), 58_320);
        assert_eq!(after.into_visited(), before.into_visited());
    }

    #[test]
    fn starting_elsewhere_visits_a_coset() {
        let r = skewb("R");
        let u = skewb("U");
        let mut explorer = CayleyExplorer::starting_from(vec![r.clone()], u.clone());

        assert_eq!(explorer.run(), 3);
        assert!(explorer.contains(&u));
        assert!(explorer.contains(&u.apply_after(&r)));
        assert!(!explorer.contains(&Permutation::identity()));
    }

    #[test]
    fn interrupt_and_resume() {
        let generators = vec![skewb("R"), skewb("U"), skewb("R").invert(), skewb("U").invert()];
        let mut explorer =
            CayleyExplorer::new(generators).with_expected_total(Order::from_digit(58_320));

        let interrupted = explorer.run_with(|_| {}, |progress| progress.visited < 1000);
        let Exploration::Interrupted { states } = interrupted else {
            panic!("expected the exploration to be interrupted, got {interrupted:?}");
        };
        assert!(states >= 1000);
        assert_eq!(explorer.state(), ExplorerState::Running);

        assert_eq!(
            explorer.run_with(|_| {}, |_| true),
            Exploration::Exhausted { states: 58_320 }
        );
    }

    #[test]
    fn reports_progress() {
        let generators = vec![skewb("R"), skewb("U"), skewb("R").invert(), skewb("U").invert()];
        let mut explorer = CayleyExplorer::new(generators)
            .with_expected_total(Order::from_digit(58_320))
            .with_report_interval(10_000);

        let mut reports = vec![];
        explorer.run_with(|progress| reports.push(*progress), |_| true);

        // One report per ten thousand expanded states
        assert_eq!(reports.len(), 5);
        assert!(reports.windows(2).all(|w| w[0].visited <= w[1].visited));
        assert!(reports.iter().all(|p| p.expected_total == Some(Order::from_digit(58_320))));
    }

    #[test]
    fn progress_display() {
        let progress = Progress {
            visited: 1_228_800,
            queued: 10,
            expected_total: Some(Order::from_digit(2_457_600)),
        };
        assert_eq!(progress.fraction(), Some(0.5));
        assert_eq!(progress.to_string(), "50.00% (1228800/2457600)");

        let progress = Progress {
            visited: 12,
            queued: 0,
            expected_total: None,
        };
        assert_eq!(progress.fraction(), None);
        assert_eq!(progress.to_string(), "12 states");
    }
}
