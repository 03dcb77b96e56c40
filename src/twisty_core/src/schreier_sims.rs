use fxhash::FxHashMap;
use itertools::Itertools;
use log::debug;

use crate::{math::Order, permutation::Permutation, success};

/// A stabilizer chain for the group generated by a set of permutations, built
/// with the Schreier-Sims algorithm. Gives the order of the group and answers
/// membership queries without enumerating the group.
///
/// Base points are taken from the supports of the generators as they are
/// needed, so the size of the chain depends on the positions the group moves
/// and not on how large those positions are.
pub struct StabilizerChain {
    levels: Vec<Level>,
}

impl StabilizerChain {
    /// Create a stabilizer chain for the group generated by `generators`
    #[must_use]
    pub fn new<'a>(generators: impl IntoIterator<Item = &'a Permutation>) -> StabilizerChain {
        let mut chain = StabilizerChain { levels: Vec::new() };

        for generator in generators {
            chain.extend(generator.to_owned());
        }

        debug!(
            success!("Built a stabilizer chain with orbits of sizes [{}]"),
            chain.levels.iter().map(|level| level.coset_reps.len()).join(", ")
        );
        chain
    }

    /// Determine if a permutation is a member of the group
    #[must_use]
    pub fn is_member(&self, permutation: &Permutation) -> bool {
        self.sift(0, permutation.clone()).is_none()
    }

    /// Calculate the cardinality of the group
    ///
    /// # Panics
    ///
    /// Panics if the group has `2^2048` elements or more
    #[must_use]
    pub fn cardinality(&self) -> Order {
        self.levels
            .iter()
            .try_fold(Order::ONE, |cardinality, level| {
                cardinality.checked_mul(Order::from_digit(level.coset_reps.len() as u64))
            })
            .expect("The group is too large to count")
    }

    /// Strip `permutation` through the levels from `from` downwards. Returns
    /// `None` if it ends up as the identity, or else the level that it got
    /// stuck on with what is left of it. A level one past the end means that
    /// the chain needs another base point.
    fn sift(&self, from: usize, mut permutation: Permutation) -> Option<(usize, Permutation)> {
        for (depth, level) in self.levels.iter().enumerate().skip(from) {
            match level.strip(permutation) {
                Ok(stripped) => permutation = stripped,
                Err(stuck) => return Some((depth, stuck)),
            }
        }

        (!permutation.is_identity()).then_some((self.levels.len(), permutation))
    }

    fn extend(&mut self, generator: Permutation) {
        let mut pending = vec![(0, generator)];

        while let Some((from, permutation)) = pending.pop() {
            let Some((depth, residue)) = self.sift(from, permutation) else {
                continue;
            };

            if depth == self.levels.len() {
                let Some(stabilizes) = residue.support().next() else {
                    continue;
                };

                self.levels.push(Level::new(stabilizes));
            }

            // The residue fixes every base point before `depth`, so it belongs
            // to each level it passed through as well
            for (level_depth, level) in self
                .levels
                .iter_mut()
                .enumerate()
                .take(depth + 1)
                .skip(from)
            {
                pending.extend(
                    level
                        .add_generator(residue.clone())
                        .into_iter()
                        .map(|schreier_generator| (level_depth + 1, schreier_generator)),
                );
            }
        }
    }
}

/// One base point of the chain, with the generators of the subgroup that
/// fixes every earlier base point
#[derive(Debug)]
struct Level {
    stabilizes: usize,
    generating_set: Vec<Permutation>,
    /// For every point in the orbit of `stabilizes`, a permutation taking it
    /// one step closer to `stabilizes`
    coset_reps: FxHashMap<usize, Permutation>,
}

impl Level {
    fn new(stabilizes: usize) -> Level {
        let mut coset_reps = FxHashMap::default();
        coset_reps.insert(stabilizes, Permutation::identity());

        Level {
            stabilizes,
            generating_set: Vec::new(),
            coset_reps,
        }
    }

    /// Apply coset representatives until `stabilizes` is fixed, or fail with
    /// the partly stripped permutation if it leaves the orbit
    fn strip(&self, mut permutation: Permutation) -> Result<Permutation, Permutation> {
        loop {
            let rep = permutation.image(self.stabilizes);

            if rep == self.stabilizes {
                return Ok(permutation);
            }

            let Some(step) = self.coset_reps.get(&rep) else {
                return Err(permutation);
            };

            permutation = permutation.apply_after(step);
        }
    }

    /// Follow the coset representatives from `point` back to the stabilized
    /// point, applying each of them after `permutation`
    fn sift_to_base(&self, mut point: usize, mut permutation: Permutation) -> Option<Permutation> {
        while point != self.stabilizes {
            let step = self.coset_reps.get(&point)?;

            permutation = permutation.apply_after(step);
            point = step.image(point);
        }

        Some(permutation)
    }

    /// Add a generator and grow the orbit to match. Returns the Schreier
    /// generators that did not exist before it was added.
    fn add_generator(&mut self, generator: Permutation) -> Vec<Permutation> {
        let inverse = generator.invert();
        let previous_orbit = self.coset_reps.keys().copied().collect_vec();

        let mut newly_in_orbit = previous_orbit
            .iter()
            .map(|&point| generator.image(point))
            .filter(|goes_to| !self.coset_reps.contains_key(goes_to))
            .unique()
            .collect_vec();

        for &point in &newly_in_orbit {
            self.coset_reps.insert(point, inverse.clone());
        }

        self.generating_set.push(generator.clone());

        let mut added = newly_in_orbit.clone();

        while let Some(spot) = newly_in_orbit.pop() {
            for perm in &self.generating_set {
                let goes_to = perm.image(spot);

                if !self.coset_reps.contains_key(&goes_to) {
                    self.coset_reps.insert(goes_to, perm.invert());
                    newly_in_orbit.push(goes_to);
                    added.push(goes_to);
                }
            }
        }

        // Pairs of an old point and an old generator were already handed out
        let mut schreier_generators =
            self.schreier_generators(&previous_orbit, std::slice::from_ref(&generator));
        schreier_generators.extend(self.schreier_generators(&added, &self.generating_set));
        schreier_generators
    }

    /// Schreier generators: from the base to a point of the orbit, through a
    /// generator, and back to the base. Over every point and generator, they
    /// generate the stabilizer of `stabilizes`.
    fn schreier_generators(
        &self,
        points: &[usize],
        generators: &[Permutation],
    ) -> Vec<Permutation> {
        let mut schreier_generators = vec![];

        for &point in points {
            let Some(to_base) = self.sift_to_base(point, Permutation::identity()) else {
                continue;
            };

            let from_base = to_base.invert();

            for generator in generators {
                let through = from_base.apply_after(generator);

                if let Some(schreier_generator) =
                    self.sift_to_base(through.image(self.stabilizes), through)
                    && !schreier_generator.is_identity()
                {
                    schreier_generators.push(schreier_generator);
                }
            }
        }

        schreier_generators
    }
}
