use std::{collections::VecDeque, fmt::Write as _};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::PieceKind;

/// Upcoming piece sequence generated with the 7-bag randomizer.
///
/// # 7-Bag System
///
/// 1. Create a "bag" containing all 7 piece types (I, O, T, S, Z, J, L)
/// 2. Shuffle the bag
/// 3. Draw pieces in order from the bag
/// 4. Append a new shuffled bag when 7 or fewer pieces remain
///
/// Any piece type reappears within at most 12 draws, which prevents long
/// droughts while keeping the order random.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceQueue;
///
/// let mut queue = PieceQueue::new();
///
/// let first = queue.pop_next();
/// let upcoming: Vec<_> = queue.next_pieces().take(5).collect();
/// assert_eq!(upcoming.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceQueue {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Seed for deterministic piece generation.
///
/// A 128-bit seed, serialized as a 32-character hex string. The same seed
/// yields the same piece sequence, which makes sessions reproducible.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceQueue, PieceSeed};
/// use rand::Rng as _;
///
/// let seed: PieceSeed = rand::rng().random();
///
/// let mut a = PieceQueue::with_seed(seed);
/// let mut b = PieceQueue::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn as_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{:032x}", self.as_u128()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Invalid textual seed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected up to 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

/// Parses 1 to 32 hex digits; shorter values are zero-extended on the left.
impl std::str::FromStr for PieceSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.is_empty() || s.len() > 32 {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self::from_u128(num))
    }
}

/// Allows generating random `PieceSeed` values with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceQueue {
    /// Creates a queue with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        let rng = Pcg32::from_seed(seed.0);
        let bag = VecDeque::with_capacity(PieceKind::LEN * 2);
        let mut this = Self { rng, bag };
        this.fill_bag();
        this
    }

    /// Derives a seed for the next session from this queue's generator.
    ///
    /// The queue itself is not advanced, so the result depends only on the
    /// current state.
    #[must_use]
    pub fn derive_seed(&self) -> PieceSeed {
        self.rng.clone().random()
    }

    /// Appends shuffled bags until more than 7 pieces are queued.
    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next piece.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty, which `fill_bag` rules out.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        let next = self
            .bag
            .pop_front()
            .expect("Piece bag should never be empty");
        self.fill_bag();
        next
    }

    /// The piece [`Self::pop_next`] would return.
    ///
    /// # Panics
    ///
    /// Panics if the bag is empty, which `fill_bag` rules out.
    #[must_use]
    pub fn peek(&self) -> PieceKind {
        *self.bag.front().expect("Piece bag should never be empty")
    }

    /// Iterates over the queued pieces, next piece first.
    ///
    /// Always yields more than 7 elements.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}
