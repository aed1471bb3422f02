//! Functional-style iterators for order book depth analysis
//!
//! Lazy iterators over the levels of one side, in priority order, for
//! consumers that want depth information without copying the book. All of
//! them compose with the standard iterator combinators and short-circuit
//! where they can.

use super::level::PriceLevel;
use super::order::{Price, Quantity, Side};
use super::side::BookSide;

/// Information about a price level including its cumulative depth from the
/// top of book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo<P, Q> {
    /// The price of this level.
    pub price: P,

    /// Total quantity resting at this level.
    pub quantity: Q,

    /// Cumulative quantity up to and including this level, best level
    /// first. Zero when produced by [`BookSide::levels_in_range`], which
    /// does not track depth.
    pub cumulative_depth: Q,
}

/// Iterator over price levels with cumulative depth tracking.
///
/// Walks the levels best to worst, carrying a running total. Useful for
/// depth charts and for estimating how deep an aggressive order would
/// reach.
pub struct LevelsWithCumulativeDepth<'a, 'book, P, Q> {
    iter: std::slice::Iter<'a, PriceLevel<'book, P, Q>>,
    cumulative_depth: Q,
}

impl<'a, 'book, P: Price, Q: Quantity> Iterator for LevelsWithCumulativeDepth<'a, 'book, P, Q> {
    type Item = LevelInfo<P, Q>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|level| {
            self.cumulative_depth += level.total_quantity();

            LevelInfo {
                price: level.price(),
                quantity: level.total_quantity(),
                cumulative_depth: self.cumulative_depth,
            }
        })
    }
}

/// Iterator over price levels until a target depth is reached.
///
/// Stops after the level whose cumulative depth reaches or exceeds the
/// target, which tells you how many levels an order of that size would
/// sweep.
pub struct LevelsUntilDepth<'a, 'book, P, Q> {
    iter: std::slice::Iter<'a, PriceLevel<'book, P, Q>>,
    target_depth: Q,
    cumulative_depth: Q,
    finished: bool,
}

impl<'a, 'book, P: Price, Q: Quantity> Iterator for LevelsUntilDepth<'a, 'book, P, Q> {
    type Item = LevelInfo<P, Q>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.iter.next().map(|level| {
            self.cumulative_depth += level.total_quantity();

            if self.cumulative_depth >= self.target_depth {
                self.finished = true;
            }

            LevelInfo {
                price: level.price(),
                quantity: level.total_quantity(),
                cumulative_depth: self.cumulative_depth,
            }
        })
    }
}

/// Iterator over price levels within an inclusive price band.
///
/// Levels are iterated in priority order, so the walk stops as soon as it
/// passes the far end of the band rather than scanning the rest of the
/// side.
pub struct LevelsInRange<'a, 'book, P, Q> {
    iter: std::slice::Iter<'a, PriceLevel<'book, P, Q>>,
    side: Side,
    min_price: P,
    max_price: P,
    finished: bool,
}

impl<'a, 'book, P: Price, Q: Quantity> Iterator for LevelsInRange<'a, 'book, P, Q> {
    type Item = LevelInfo<P, Q>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        for level in self.iter.by_ref() {
            let price = level.price();

            // Ordered iteration: once past the band there is nothing left
            // to find. Bids descend towards min_price, asks ascend towards
            // max_price.
            let past_band = match self.side {
                Side::Buy => price < self.min_price,
                Side::Sell => price > self.max_price,
            };
            if past_band {
                break;
            }

            if price >= self.min_price && price <= self.max_price {
                return Some(LevelInfo {
                    price,
                    quantity: level.total_quantity(),
                    cumulative_depth: Q::zero(),
                });
            }
        }

        self.finished = true;
        None
    }
}

impl<'book, P: Price, Q: Quantity> BookSide<'book, P, Q> {
    /// Iterates the levels best to worst with a running cumulative depth.
    pub fn levels_with_cumulative_depth(&self) -> LevelsWithCumulativeDepth<'_, 'book, P, Q> {
        LevelsWithCumulativeDepth {
            iter: self.levels().iter(),
            cumulative_depth: Q::zero(),
        }
    }

    /// Iterates the levels best to worst, stopping once the cumulative
    /// depth reaches `target_depth`.
    pub fn levels_until_depth(&self, target_depth: Q) -> LevelsUntilDepth<'_, 'book, P, Q> {
        LevelsUntilDepth {
            iter: self.levels().iter(),
            target_depth,
            cumulative_depth: Q::zero(),
            finished: false,
        }
    }

    /// Iterates the levels whose price lies in `[min_price, max_price]`,
    /// best first.
    pub fn levels_in_range(&self, min_price: P, max_price: P) -> LevelsInRange<'_, 'book, P, Q> {
        LevelsInRange {
            iter: self.levels().iter(),
            side: self.side(),
            min_price,
            max_price,
            finished: false,
        }
    }
}
