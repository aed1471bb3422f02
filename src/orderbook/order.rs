//! Order descriptors and the numeric bounds the engine is generic over.

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{AddAssign, Sub, SubAssign};

/// Side of the market an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The bid side. A buy order crosses the ask side.
    Buy,
    /// The ask side. A sell order crosses the bid side.
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// `true` when price `a` is at least as aggressive as price `b` on this
    /// side: `a >= b` for bids, `a <= b` for asks.
    ///
    /// The same comparator orders the levels of a [`super::BookSide`] and
    /// bounds the matching walk against an incoming order's limit.
    pub fn better_or_equal<P: Ord>(self, a: P, b: P) -> bool {
        match self {
            Side::Buy => a >= b,
            Side::Sell => a <= b,
        }
    }

    /// `true` when price `a` is strictly more aggressive than price `b` on
    /// this side: `a > b` for bids, `a < b` for asks.
    pub fn strictly_better<P: Ord>(self, a: P, b: P) -> bool {
        match self {
            Side::Buy => a > b,
            Side::Sell => a < b,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// How an incoming order interacts with the opposite side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Consume the opposite side at any price until the requested quantity
    /// is exhausted or the book empties. Never rests; any remainder is
    /// discarded.
    Market,
    /// Cross at prices not worse than the limit; any remainder rests on the
    /// order's own side.
    Limit,
    /// Cross at prices not worse than the limit; any remainder is discarded.
    ImmediateOrCancel,
    /// Cross only if the full requested quantity is available at prices not
    /// worse than the limit; otherwise do nothing.
    FillOrKill,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::ImmediateOrCancel => write!(f, "IOC"),
            OrderType::FillOrKill => write!(f, "FOK"),
        }
    }
}

/// Bounds required of a price type.
///
/// The engine only ever compares prices; it performs no arithmetic on them
/// outside of optional helpers such as [`super::OrderBook::spread`].
pub trait Price: Copy + Ord + fmt::Debug {}

impl<T> Price for T where T: Copy + Ord + fmt::Debug {}

/// Bounds required of a quantity type.
///
/// Matching needs comparison, addition, subtraction and `min` — nothing
/// else. Any integer type qualifies, as does any exact fixed-point decimal
/// implementing these ops. Floating point works but makes the running level
/// totals subject to non-associative rounding, which is the caller's
/// problem to own.
pub trait Quantity:
    Copy + Ord + fmt::Debug + Zero + AddAssign + SubAssign + Sub<Output = Self>
{
}

impl<T> Quantity for T where
    T: Copy + Ord + fmt::Debug + Zero + AddAssign + SubAssign + Sub<Output = Self>
{
}

/// An immutable order descriptor, owned by the caller.
///
/// Orders are handed to the engine by reference and are never mutated by
/// it; resting state lives in the book as [`OrderQuantity`] entries that
/// borrow the order. The order must therefore outlive any book it has been
/// accepted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order<P, Q> {
    /// Which side of the market this order is on.
    pub side: Side,
    /// How the order interacts with the opposite side.
    pub order_type: OrderType,
    /// Limit price. Ignored for [`OrderType::Market`] orders.
    pub price: P,
    /// Original quantity requested.
    pub quantity: Q,
}

impl<P: Price, Q: Quantity> Order<P, Q> {
    /// Creates an order descriptor.
    pub fn new(side: Side, order_type: OrderType, price: P, quantity: Q) -> Self {
        Self {
            side,
            order_type,
            price,
            quantity,
        }
    }
}

/// Binds an order reference to a quantity.
///
/// The same type serves two purposes: while resting on a price level the
/// quantity is the remaining open quantity of the order at that level, and
/// when emitted through a fill stream the quantity is the amount executed
/// on that fill event.
#[derive(Debug, Clone, Copy)]
pub struct OrderQuantity<'book, P, Q> {
    order: &'book Order<P, Q>,
    /// Remaining open quantity (resting) or executed quantity (fill event).
    pub quantity: Q,
}

impl<'book, P: Price, Q: Quantity> OrderQuantity<'book, P, Q> {
    pub(crate) fn new(order: &'book Order<P, Q>, quantity: Q) -> Self {
        Self { order, quantity }
    }

    /// The order this entry or fill refers to.
    pub fn order(&self) -> &'book Order<P, Q> {
        self.order
    }

    /// The limit price of the referenced order.
    pub fn price(&self) -> P {
        self.order.price
    }

    /// `true` when this entry or fill refers to exactly `order` (identity,
    /// not equality of fields).
    pub fn is_for(&self, order: &Order<P, Q>) -> bool {
        std::ptr::eq(self.order, order)
    }
}
