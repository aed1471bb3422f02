//! One side of the book: price levels in priority order.

use super::level::PriceLevel;
use super::order::{Order, OrderQuantity, OrderType, Price, Quantity, Side};
use super::policy::ExecutionPolicy;
use async_stream::stream;
use futures::Stream;
use std::cmp::Ordering;
use tracing::trace;

/// An ordered sequence of [`PriceLevel`]s for one side of the book.
///
/// Levels are kept in a flat vector sorted most-aggressive-first — bids
/// descending, asks ascending — so the top of book is index 0 and inserts
/// are a binary search away. For realistic book depths this beats pointer
/// structures on every walk the engine does.
#[derive(Debug)]
pub struct BookSide<'book, P, Q> {
    side: Side,
    levels: Vec<PriceLevel<'book, P, Q>>,
}

impl<'book, P: Price, Q: Quantity> BookSide<'book, P, Q> {
    pub(crate) fn new(side: Side) -> Self {
        Self {
            side,
            levels: Vec::new(),
        }
    }

    /// Rests `quantity` of `order` on this side, creating the price level
    /// if the price is new.
    pub(crate) fn add_order(&mut self, order: &'book Order<P, Q>, quantity: Q) {
        let side = self.side;
        let price = order.price;

        let index = match self.levels.binary_search_by(|level| {
            if level.price() == price {
                Ordering::Equal
            } else if side.strictly_better(level.price(), price) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }) {
            Ok(index) => index,
            Err(index) => {
                trace!("new {} level at {:?}", side, price);
                self.levels.insert(index, PriceLevel::new(price));
                index
            }
        };

        self.levels[index].add_order(order, quantity);
    }

    /// Streams fills for `order` against this side, walking levels from the
    /// top of book downward.
    ///
    /// The walk ends when the incoming quantity is exhausted, the side
    /// empties, the next level's price is strictly worse than the order's
    /// limit (Market orders never stop on price), or a level survives its
    /// match — which happens exactly when demand ran out mid-level or the
    /// policy vetoed a fill against a non-final entry.
    ///
    /// Levels drained to empty are spliced out before the fill that drained
    /// them is yielded, so no empty level is ever observable, not even by a
    /// caller that drops the stream between fills.
    pub(crate) fn match_order<'a, E>(
        &'a mut self,
        order: &'a Order<P, Q>,
        policy: &'a mut E,
    ) -> impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a
    where
        E: ExecutionPolicy<P, Q>,
    {
        let side = self.side;
        let is_market = order.order_type == OrderType::Market;

        stream! {
            let mut remaining = order.quantity;
            while !remaining.is_zero() && !self.levels.is_empty() {
                let level_price = self.levels[0].price();
                if !is_market && !side.better_or_equal(level_price, order.price) {
                    break;
                }

                let execution = match self.levels[0].execute_front(remaining, &mut *policy).await {
                    Some(execution) => execution,
                    None => break,
                };
                remaining -= execution.fill.quantity;

                let emptied = self.levels[0].is_empty();
                if emptied {
                    trace!("{} level at {:?} swept, removing", side, level_price);
                    self.levels.remove(0);
                }

                yield execution.fill;

                if execution.vetoed && !emptied {
                    break;
                }
            }
        }
    }

    /// Quantity available to `order` at prices not worse than its limit.
    ///
    /// Read-only: no mutation, no policy involvement. Stops summing as soon
    /// as the order's full quantity is known to be coverable.
    pub(crate) fn quantity_available(&self, order: &Order<P, Q>) -> Q {
        let is_market = order.order_type == OrderType::Market;

        let mut available = Q::zero();
        for level in &self.levels {
            if !is_market && !self.side.better_or_equal(level.price(), order.price) {
                break;
            }
            available += level.total_quantity();
            if available >= order.quantity {
                break;
            }
        }
        available
    }

    pub(crate) fn levels(&self) -> &[PriceLevel<'book, P, Q>] {
        &self.levels
    }

    /// The side of the market these levels belong to.
    pub fn side(&self) -> Side {
        self.side
    }

    /// The best level: highest bid or lowest ask.
    pub fn top(&self) -> Option<&PriceLevel<'book, P, Q>> {
        self.levels.first()
    }

    /// Sum of the open quantities resting across all levels on this side.
    pub fn total_quantity(&self) -> Q {
        let mut total = Q::zero();
        for level in &self.levels {
            total += level.total_quantity();
        }
        total
    }

    /// Number of price levels on this side.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// `true` when no orders rest on this side.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Iterates the levels in priority order, best first.
    pub fn iter(&self) -> impl Iterator<Item = &PriceLevel<'book, P, Q>> {
        self.levels.iter()
    }
}

impl<'a, 'book, P: Price, Q: Quantity> IntoIterator for &'a BookSide<'book, P, Q> {
    type Item = &'a PriceLevel<'book, P, Q>;
    type IntoIter = std::slice::Iter<'a, PriceLevel<'book, P, Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}
