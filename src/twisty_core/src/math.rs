//! Permutation orders. The order of a permutation is the least common
//! multiple of its cycle lengths, and it outgrows every primitive integer long
//! before the number of moved positions does: one cycle of every prime length
//! up to 103 moves 1,264 positions and already needs 135 bits.
//!
//! Permutations move at most 65,536 positions. Landau's bound puts the largest
//! order on that many points below `2^1300`, so [`Order`] always has room.

use std::collections::BTreeMap;

use bnum::types::U2048;

/// The order of a permutation
pub type Order = U2048;

/// An [`Order`] that fits in a `u128`, for constants
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn order_from_u128(value: u128) -> Order {
    let mut digits = [0; Order::BITS as usize / 64];
    digits[0] = value as u64;
    digits[1] = (value >> 64) as u64;
    Order::from_digits(digits)
}

/// The least common multiple of a collection of cycle lengths, built from the
/// highest power of each prime that divides one of them. No lengths at all
/// give one.
///
/// # Panics
///
/// Panics if a length is zero.
#[must_use]
pub fn lcm_of_lengths(lengths: impl IntoIterator<Item = u64>) -> Order {
    let mut highest_powers = BTreeMap::<u64, u32>::new();

    for length in lengths {
        assert_ne!(length, 0, "Cycles can't be empty");

        for (prime, exponent) in prime_factors(length) {
            let highest = highest_powers.entry(prime).or_default();
            *highest = (*highest).max(exponent);
        }
    }

    highest_powers
        .into_iter()
        .fold(Order::ONE, |order, (prime, exponent)| {
            order * Order::from_digit(prime).pow(exponent)
        })
}

/// Trial division, which is plenty for cycle lengths
fn prime_factors(mut n: u64) -> Vec<(u64, u32)> {
    let mut factors = vec![];
    let mut divisor = 2;

    while divisor * divisor <= n {
        let mut exponent = 0;

        while n % divisor == 0 {
            n /= divisor;
            exponent += 1;
        }

        if exponent > 0 {
            factors.push((divisor, exponent));
        }

        divisor += 1;
    }

    if n > 1 {
        factors.push((n, 1));
    }

    factors
}
