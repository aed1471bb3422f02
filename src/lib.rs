//! # Matchbook
//!
//! A single-instrument limit-order matching core with strict price-time
//! priority, lazy fill streams, and a pluggable per-execution policy. It is
//! a library, not a service: the surrounding exchange feeds orders in and
//! consumes executions out, while this crate owns the book itself.
//!
//! ## What it does
//!
//! - **Two-sided book**: bids and asks as flat, sorted sequences of price
//!   levels, each level a FIFO queue of resting entries at one price.
//! - **Price-time priority matching**: an incoming order crosses the
//!   opposite side best-price-first, earliest-arrival-first within a price.
//! - **Four order types**: `Market`, `Limit`, `ImmediateOrCancel` and
//!   `FillOrKill`, with the textbook resting/discard semantics for each.
//! - **Lazy fill streams**: `accept_order` returns a
//!   [`futures::Stream`](futures::Stream) of fills. Pulling the next fill
//!   drives one step of the matching walk; every fill is committed to the
//!   book before it is yielded, and dropping the stream stops the walk with
//!   no half-applied state.
//! - **Execution policies**: a caller-supplied collaborator is awaited once
//!   per tentative fill and may shrink it, down to a veto. Because the
//!   policy is awaited, it can suspend the walk for a real asynchronous
//!   check without the engine knowing what runtime sits above it.
//! - **Generic numerics**: prices and quantities are any types satisfying
//!   the small [`Price`] and [`Quantity`] bounds. The engine only ever
//!   compares, adds, subtracts, and takes minima.
//!
//! ## What it deliberately does not do
//!
//! No wire-protocol parsing, transport or sessions; no risk, credit, or
//! position keeping; no persistence; no market-data fan-out; no
//! cancel-by-identifier; no concurrent mutation of one book. Multiple
//! independent books on independent threads are fine.
//!
//! ## Ownership model
//!
//! Orders are owned by the caller and passed by reference; the book stores
//! those references in its resting entries and never mutates the order.
//! Each order must therefore outlive the book it was accepted into. Fills
//! carry the reference to the resting order they executed against so the
//! caller can correlate.
//!
//! ## Example
//!
//! ```
//! use matchbook::prelude::*;
//!
//! // The caller owns the orders; the book stores references.
//! let bids = [
//!     Order::new(Side::Buy, OrderType::Limit, 105, 2),
//!     Order::new(Side::Buy, OrderType::Limit, 100, 5),
//! ];
//! let mut book = OrderBook::new();
//! for bid in &bids {
//!     assert!(book.execute_order(bid).is_empty());
//! }
//!
//! // An aggressive sell, capped at 3 units per execution by a policy.
//! let sell = Order::new(Side::Sell, OrderType::ImmediateOrCancel, 100, 6);
//! let fills = book.execute_order_with(&sell, SizeLimitPolicy::new(3));
//!
//! let executed: Vec<i32> = fills.iter().map(|fill| fill.quantity).collect();
//! assert_eq!(executed, vec![2, 3]);
//! ```
//!
//! For per-fill asynchrony, use [`OrderBook::accept_order_with`] and drive
//! the returned stream from your executor; `execute_order` is the blocking
//! convenience for callers with nothing to await.

pub mod orderbook;

pub mod prelude;

pub use orderbook::iterators::LevelInfo;
pub use orderbook::policy::{
    ExecutionPolicy, FnPolicy, NoopPolicy, SizeLimitPolicy, TimeoutPolicy,
};
pub use orderbook::{
    BookSide, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderQuantity, OrderType,
    Price, PriceLevel, PriceLevelSnapshot, Quantity, Side,
};
