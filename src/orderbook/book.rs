//! The two-sided book and its order acceptance entry points.

use super::error::OrderBookError;
use super::order::{Order, OrderQuantity, OrderType, Price, Quantity, Side};
use super::policy::{ExecutionPolicy, NoopPolicy};
use super::side::BookSide;
use async_stream::stream;
use futures::{Stream, StreamExt, pin_mut};
use std::ops::Sub;
use tracing::trace;

/// A two-sided limit order book for a single instrument.
///
/// An incoming order is routed to the opposite side for matching under
/// strict price-time priority; whatever a limit order leaves unmatched is
/// rested on its own side. Fills are streamed lazily — consuming the next
/// fill drives one step of the matching walk — and every fill is committed
/// to the book before it is delivered, so dropping the stream at any point
/// leaves the book consistent with exactly the fills received.
///
/// The book stores references to the orders it is given; each order must
/// outlive the book (or at least every resting entry that points at it).
/// The engine never mutates a caller's order.
///
/// A book is single-threaded by design: matching is cooperative, with the
/// execution policy's `apply` call as the only suspension point. Run
/// independent instruments on independent books.
///
/// ```
/// use matchbook::prelude::*;
///
/// let bid = Order::new(Side::Buy, OrderType::Limit, 100, 5);
/// let sell = Order::new(Side::Sell, OrderType::Limit, 95, 3);
///
/// let mut book = OrderBook::new();
/// assert!(book.execute_order(&bid).is_empty());
///
/// let fills = book.execute_order(&sell);
/// assert_eq!(fills.len(), 1);
/// assert_eq!(fills[0].quantity, 3);
/// assert!(fills[0].is_for(&bid));
///
/// assert_eq!(book.best_bid(), Some(100));
/// assert!(book.ask().is_empty());
/// ```
#[derive(Debug)]
pub struct OrderBook<'book, P, Q> {
    bid: BookSide<'book, P, Q>,
    ask: BookSide<'book, P, Q>,
}

impl<'book, P: Price, Q: Quantity> OrderBook<'book, P, Q> {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self {
            bid: BookSide::new(Side::Buy),
            ask: BookSide::new(Side::Sell),
        }
    }

    /// Accepts `order` with the default no-op policy.
    ///
    /// See [`accept_order_with`](Self::accept_order_with).
    ///
    /// ```
    /// use futures::{StreamExt, executor::block_on, pin_mut};
    /// use matchbook::prelude::*;
    ///
    /// let resting = Order::new(Side::Buy, OrderType::Limit, 100, 5);
    /// let incoming = Order::new(Side::Sell, OrderType::ImmediateOrCancel, 100, 2);
    ///
    /// let mut book = OrderBook::new();
    /// block_on(async {
    ///     {
    ///         let fills = book.accept_order(&resting);
    ///         pin_mut!(fills);
    ///         assert!(fills.next().await.is_none());
    ///     }
    ///     let fills = book.accept_order(&incoming);
    ///     pin_mut!(fills);
    ///     let fill = fills.next().await.unwrap();
    ///     assert_eq!(fill.quantity, 2);
    /// });
    /// assert_eq!(book.bid().top().unwrap().total_quantity(), 3);
    /// ```
    pub fn accept_order<'a>(
        &'a mut self,
        order: &'book Order<P, Q>,
    ) -> impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a {
        self.accept_order_with(order, NoopPolicy)
    }

    /// Accepts `order`, streaming fills vetted by `policy`.
    ///
    /// The incoming order crosses the opposite side top-down; per order
    /// type, a limit remainder rests on the own side, a Market or
    /// immediate-or-cancel remainder is discarded, and a fill-or-kill first
    /// dry-runs the opposite side (no mutation, no policy involvement) and
    /// matches only if the full quantity is available at acceptable prices.
    ///
    /// `policy` is taken by value; pass `&mut policy` to keep a stateful
    /// policy across calls. The stream is lazy and single-consumer.
    /// Dropping it before the end cancels the rest of the walk: no further
    /// policy calls, no further mutations, and — for a limit order — no
    /// resting of the remainder, which only happens once all fills have
    /// been consumed.
    pub fn accept_order_with<'a, E>(
        &'a mut self,
        order: &'book Order<P, Q>,
        policy: E,
    ) -> impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a
    where
        E: ExecutionPolicy<P, Q> + 'a,
    {
        stream! {
            trace!(
                "accepting {} {} order: price {:?}, quantity {:?}",
                order.side, order.order_type, order.price, order.quantity
            );

            let mut policy = policy;
            let (opposite, own) = match order.side {
                Side::Buy => (&mut self.ask, &mut self.bid),
                Side::Sell => (&mut self.bid, &mut self.ask),
            };

            if order.order_type == OrderType::FillOrKill
                && opposite.quantity_available(order) < order.quantity
            {
                trace!("fill-or-kill order cannot be fully filled, killing");
            } else {
                let mut filled = Q::zero();
                {
                    let fills = opposite.match_order(order, &mut policy);
                    pin_mut!(fills);
                    while let Some(fill) = fills.next().await {
                        filled += fill.quantity;
                        yield fill;
                    }
                }

                if order.order_type == OrderType::Limit {
                    let remaining = order.quantity - filled;
                    if !remaining.is_zero() {
                        own.add_order(order, remaining);
                    }
                }
            }
        }
    }

    /// Checked variant of [`accept_order`](Self::accept_order).
    ///
    /// # Errors
    /// Returns [`OrderBookError::NonPositiveQuantity`] when `order.quantity`
    /// is zero or negative.
    pub fn try_accept_order<'a>(
        &'a mut self,
        order: &'book Order<P, Q>,
    ) -> Result<impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a, OrderBookError<Q>> {
        self.try_accept_order_with(order, NoopPolicy)
    }

    /// Checked variant of [`accept_order_with`](Self::accept_order_with).
    ///
    /// # Errors
    /// Returns [`OrderBookError::NonPositiveQuantity`] when `order.quantity`
    /// is zero or negative.
    pub fn try_accept_order_with<'a, E>(
        &'a mut self,
        order: &'book Order<P, Q>,
        policy: E,
    ) -> Result<impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a, OrderBookError<Q>>
    where
        E: ExecutionPolicy<P, Q> + 'a,
    {
        if order.quantity <= Q::zero() {
            return Err(OrderBookError::NonPositiveQuantity {
                quantity: order.quantity,
            });
        }
        Ok(self.accept_order_with(order, policy))
    }

    /// Accepts `order` and drives the fill stream to completion on the
    /// current thread, collecting the fills.
    ///
    /// The synchronous entry point for callers that have no per-fill
    /// asynchrony to interpose.
    pub fn execute_order(&mut self, order: &'book Order<P, Q>) -> Vec<OrderQuantity<'book, P, Q>> {
        self.execute_order_with(order, NoopPolicy)
    }

    /// Accepts `order` under `policy`, driving the fill stream to
    /// completion on the current thread and collecting the fills.
    pub fn execute_order_with<E>(
        &mut self,
        order: &'book Order<P, Q>,
        policy: E,
    ) -> Vec<OrderQuantity<'book, P, Q>>
    where
        E: ExecutionPolicy<P, Q>,
    {
        futures::executor::block_on(self.accept_order_with(order, policy).collect::<Vec<_>>())
    }

    /// The bid side, best level first.
    pub fn bid(&self) -> &BookSide<'book, P, Q> {
        &self.bid
    }

    /// The ask side, best level first.
    pub fn ask(&self) -> &BookSide<'book, P, Q> {
        &self.ask
    }

    /// The highest bid price, if any bids rest.
    pub fn best_bid(&self) -> Option<P> {
        self.bid.top().map(|level| level.price())
    }

    /// The lowest ask price, if any asks rest.
    pub fn best_ask(&self) -> Option<P> {
        self.ask.top().map(|level| level.price())
    }

    /// Best ask minus best bid, when both sides are populated.
    pub fn spread(&self) -> Option<P>
    where
        P: Sub<Output = P>,
    {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}

impl<'book, P: Price, Q: Quantity> Default for OrderBook<'book, P, Q> {
    fn default() -> Self {
        Self::new()
    }
}
