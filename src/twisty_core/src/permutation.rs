use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Debug, Display},
    hash::{Hash, Hasher},
    str::FromStr,
    sync::{Arc, OnceLock},
};

use fxhash::FxHasher;
use itertools::{EitherOrBoth, Itertools};
use thiserror::Error;

use crate::math::{Order, lcm_of_lengths};

/// Stored positions. Puzzles have far fewer facelets than this holds, and two
/// bytes per position keep large explorations in memory. Orders rely on this
/// bound, see [`Order`].
type Point = u16;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationError {
    #[error("Position {position} is already mapped")]
    DuplicateMapping { position: usize },
    #[error("Position {image} would be the image of more than one position")]
    NotABijection { image: usize },
    #[error("Position {position} is past the largest movable position {}", Permutation::MAX_POSITION)]
    PositionOutOfRange { position: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermutationParseError {
    #[error("Unexpected character {found:?} at offset {offset}")]
    UnexpectedCharacter { offset: usize, found: char },
    #[error("The position at offset {offset} is too large")]
    PositionTooLarge { offset: usize },
    #[error("A cycle was opened but never closed")]
    UnclosedCycle,
    #[error(transparent)]
    Invalid(#[from] PermutationError),
}

/// A bijection on the non-negative integers that moves only finitely many of
/// them.
///
/// Only the support (the positions that are not fixed) is stored, as
/// `(position, image)` pairs sorted by position. Every constructor and
/// operation upholds that no stored pair maps a position to itself, which is
/// what makes equality a plain slice comparison and the hash independent of
/// how the permutation was built. Positions up to [`Permutation::MAX_POSITION`]
/// can be moved.
///
/// Values are immutable. Every operation returns a new permutation, and cloning
/// only bumps a reference count, so permutations are cheap to keep in both a
/// queue and a visited set.
#[derive(Clone)]
pub struct Permutation {
    support: Arc<[(Point, Point)]>,
    hash: u64,
    order: OnceLock<Box<Order>>,
}

/// Narrow a `(position, image)` pair to stored points
fn to_points((position, image): (usize, usize)) -> Result<(Point, Point), PermutationError> {
    let narrow = |position: usize| {
        Point::try_from(position).map_err(|_| PermutationError::PositionOutOfRange { position })
    };

    Ok((narrow(position)?, narrow(image)?))
}

impl Permutation {
    /// The largest position a permutation can move
    pub const MAX_POSITION: usize = Point::MAX as usize;

    /// The permutation that fixes every position
    #[must_use]
    pub fn identity() -> Permutation {
        Permutation::from_sorted_support(Vec::new())
    }

    /// `support` must be sorted by position and contain no fixed points
    fn from_sorted_support(support: Vec<(Point, Point)>) -> Permutation {
        debug_assert!(support.iter().tuple_windows().all(|(a, b)| a.0 < b.0));
        debug_assert!(support.iter().all(|&(position, image)| position != image));

        let mut hasher = FxHasher::default();
        support.hash(&mut hasher);

        Permutation {
            hash: hasher.finish(),
            support: Arc::from(support),
            order: OnceLock::new(),
        }
    }

    /// Build a permutation from explicit `(position, image)` pairs. Pairs that
    /// map a position to itself are accepted and dropped.
    ///
    /// # Errors
    ///
    /// Fails if a position is given twice, if the pairs do not describe a
    /// bijection (an image is hit twice, or an image is left without an entry
    /// of its own and would therefore also be its own image), or if a
    /// position is past [`Permutation::MAX_POSITION`].
    pub fn from_mapping(
        mapping: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Permutation, PermutationError> {
        let mut entries = BTreeMap::new();

        for (position, image) in mapping {
            if entries.insert(position, image).is_some() {
                return Err(PermutationError::DuplicateMapping { position });
            }
        }

        let mut images = BTreeSet::new();

        for &image in entries.values() {
            if !images.insert(image) || !entries.contains_key(&image) {
                return Err(PermutationError::NotABijection { image });
            }
        }

        Ok(Permutation::from_sorted_support(
            entries
                .into_iter()
                .filter(|&(position, image)| position != image)
                .map(to_points)
                .collect::<Result<_, _>>()?,
        ))
    }

    /// Build a permutation from disjoint cycles. The cycle `[p0, p1, …, pk]`
    /// sends `p0` to `p1`, `p1` to `p2`, and `pk` back to `p0`. Cycles of
    /// length zero or one describe fixed points.
    ///
    /// # Errors
    ///
    /// Fails with [`PermutationError::DuplicateMapping`] if a position appears
    /// more than once across all of the cycles, and with
    /// [`PermutationError::PositionOutOfRange`] if a moved position is past
    /// [`Permutation::MAX_POSITION`].
    pub fn from_cycles<C: AsRef<[usize]>>(
        cycles: impl IntoIterator<Item = C>,
    ) -> Result<Permutation, PermutationError> {
        let mut mapping = BTreeMap::new();

        for cycle in cycles {
            let cycle = cycle.as_ref();

            for (&position, &image) in cycle.iter().cycle().tuple_windows().take(cycle.len()) {
                if mapping.insert(position, image).is_some() {
                    return Err(PermutationError::DuplicateMapping { position });
                }
            }
        }

        Ok(Permutation::from_sorted_support(
            mapping
                .into_iter()
                .filter(|&(position, image)| position != image)
                .map(to_points)
                .collect::<Result<_, _>>()?,
        ))
    }

    /// Where this permutation sends `position`
    #[must_use]
    pub fn image(&self, position: usize) -> usize {
        match Point::try_from(position) {
            Ok(point) => usize::from(self.point_image(point)),
            Err(_) => position,
        }
    }

    fn point_image(&self, point: Point) -> Point {
        match self
            .support
            .binary_search_by_key(&point, |&(position, _)| position)
        {
            Ok(idx) => self.support[idx].1,
            Err(_) => point,
        }
    }

    /// The positions that are not fixed, in ascending order
    pub fn support(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.support.iter().map(|&(position, _)| usize::from(position))
    }

    /// The `(position, image)` pairs of the support, in ascending order of
    /// position
    pub fn mapping(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.support
            .iter()
            .map(|&(position, image)| (usize::from(position), usize::from(image)))
    }

    #[must_use]
    pub fn support_len(&self) -> usize {
        self.support.len()
    }

    /// The largest position that this permutation moves
    #[must_use]
    pub fn largest_moved_position(&self) -> Option<usize> {
        self.support.last().map(|&(position, _)| usize::from(position))
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.support.is_empty()
    }

    /// Returns `h` where `h(i) = self(other(i))`: `other` happens first, then
    /// `self`.
    #[must_use]
    pub fn compose(&self, other: &Permutation) -> Permutation {
        let mut support = Vec::with_capacity(self.support.len() + other.support.len());

        for entry in self
            .support
            .iter()
            .merge_join_by(other.support.iter(), |a, b| a.0.cmp(&b.0))
        {
            let (position, image) = match entry {
                // `other` fixes this position, and `self` does not
                EitherOrBoth::Left(&(position, image)) => (position, image),
                EitherOrBoth::Right(&(position, goes_to))
                | EitherOrBoth::Both(_, &(position, goes_to)) => {
                    (position, self.point_image(goes_to))
                }
            };

            if position != image {
                support.push((position, image));
            }
        }

        Permutation::from_sorted_support(support)
    }

    /// Returns `other.compose(self)`: `self` happens first, then `other`. This
    /// is the direction for accumulating moves onto a running state,
    /// `state = state.apply_after(&next_move)`.
    #[must_use]
    pub fn apply_after(&self, other: &Permutation) -> Permutation {
        other.compose(self)
    }

    /// Returns `g` such that `g(self(i)) = i` for every `i`
    #[must_use]
    pub fn invert(&self) -> Permutation {
        let mut support = self
            .support
            .iter()
            .map(|&(position, image)| (image, position))
            .collect_vec();

        support.sort_unstable();

        let inverse = Permutation::from_sorted_support(support);

        if let Some(order) = self.order.get() {
            let _ = inverse.order.set(order.clone());
        }

        inverse
    }

    /// Compose the permutation with itself `exponent` times. Negative exponents
    /// compose the inverse instead, so `power(-1)` is the inverse and
    /// `power(0)` is always the identity.
    #[must_use]
    pub fn power(&self, exponent: i64) -> Permutation {
        let exponent_abs = Order::from_digit(exponent.unsigned_abs());

        if exponent < 0 {
            self.invert().power_by(&exponent_abs)
        } else {
            self.power_by(&exponent_abs)
        }
    }

    /// [`Permutation::power`] for exponents too large for an `i64`, such as
    /// the order of a permutation on many positions
    #[must_use]
    pub fn power_by(&self, exponent: &Order) -> Permutation {
        let mut result = Permutation::identity();
        let mut base = self.clone();

        for bit in 0..exponent.bits() {
            if bit > 0 {
                base = base.compose(&base);
            }

            if exponent.bit(bit) {
                result = result.compose(&base);
            }
        }

        result
    }

    /// The smallest `k > 0` such that `self.power_by(&k)` is the identity; the
    /// LCM of the cycle lengths. Computed once and cached.
    #[must_use]
    pub fn order(&self) -> Order {
        **self.order.get_or_init(|| {
            Box::new(lcm_of_lengths(
                self.cycles().iter().map(|cycle| cycle.len() as u64),
            ))
        })
    }

    /// Decompose the support into disjoint cycles. Cycles are listed in the
    /// order of their smallest position, and each cycle starts at its smallest
    /// position. Fixed points never appear.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<usize>> {
        let mut covered = vec![false; self.support.len()];
        let mut cycles = vec![];

        for (start_idx, &(start, mut next)) in self.support.iter().enumerate() {
            if covered[start_idx] {
                continue;
            }

            covered[start_idx] = true;
            let mut cycle = vec![usize::from(start)];

            while next != start {
                let idx = match self
                    .support
                    .binary_search_by_key(&next, |&(position, _)| position)
                {
                    Ok(idx) => idx,
                    // The support of a bijection is closed under it
                    Err(_) => unreachable!(),
                };

                covered[idx] = true;
                cycle.push(usize::from(next));
                next = self.support[idx].1;
            }

            cycles.push(cycle);
        }

        cycles
    }

    /// The cycle lengths in ascending order
    #[must_use]
    pub fn cycle_type(&self) -> Vec<usize> {
        self.cycles().iter().map(Vec::len).sorted_unstable().collect()
    }

    /// Whether the permutation is a product of an even number of transpositions
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.cycles().iter().map(|cycle| cycle.len() - 1).sum::<usize>() % 2 == 0
    }

    /// Rearrange `initial` according to the permutation: the item that started
    /// at position `p` ends at position `self(p)`. Concretely, the inverse is
    /// taken and `result[i] = initial[inverse(i)]` for every `i` in
    /// `0..initial.len()`. This is how a state permutation turns into the
    /// colors shown on each facelet.
    ///
    /// # Panics
    ///
    /// Panics if the permutation moves a position inside `0..initial.len()`
    /// to one outside of it.
    #[must_use]
    pub fn arrange<T: Clone>(&self, initial: &[T]) -> Vec<T> {
        let inverse = self.invert();

        (0..initial.len())
            .map(|i| initial[inverse.image(i)].clone())
            .collect()
    }
}

impl Default for Permutation {
    fn default() -> Self {
        Permutation::identity()
    }
}

impl PartialEq for Permutation {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.support == other.support
    }
}

impl Eq for Permutation {}

impl Hash for Permutation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cycles = self.cycles();

        if cycles.is_empty() {
            return write!(f, "()");
        }

        for cycle in cycles {
            write!(f, "({})", cycle.iter().join(" "))?;
        }

        Ok(())
    }
}

impl Debug for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permutation{self}")
    }
}

impl FromStr for Permutation {
    type Err = PermutationParseError;

    /// Parse cycle notation such as `(10 15 25)(2, 23, 9)`. The empty string
    /// and `()` are the identity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cycles = vec![];
        let mut current: Option<Vec<usize>> = None;
        let mut chars = s.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '(' if current.is_none() => current = Some(Vec::new()),
                ')' if current.is_some() => cycles.extend(current.take()),
                ',' if current.is_some() => {}
                c if c.is_whitespace() => {}
                c if c.is_ascii_digit() => {
                    let Some(cycle) = current.as_mut() else {
                        return Err(PermutationParseError::UnexpectedCharacter { offset, found: c });
                    };

                    let mut end = offset + c.len_utf8();
                    while let Some((next_offset, next)) =
                        chars.next_if(|&(_, next)| next.is_ascii_digit())
                    {
                        end = next_offset + next.len_utf8();
                    }

                    let position = s[offset..end]
                        .parse()
                        .map_err(|_| PermutationParseError::PositionTooLarge { offset })?;
                    cycle.push(position);
                }
                found => return Err(PermutationParseError::UnexpectedCharacter { offset, found }),
            }
        }

        if current.is_some() {
            return Err(PermutationParseError::UnclosedCycle);
        }

        Ok(Permutation::from_cycles(cycles)?)
    }
}
