//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Core order book types
pub use crate::orderbook::{
    BookSide, Order, OrderBook, OrderBookError, OrderQuantity, OrderType, Price, PriceLevel,
    Quantity, Side,
};

// Execution policies
pub use crate::orderbook::policy::{
    ExecutionPolicy, FnPolicy, NoopPolicy, SizeLimitPolicy, TimeoutPolicy,
};

// Snapshot types
pub use crate::orderbook::{OrderBookSnapshot, PriceLevelSnapshot};

// Iterator types
pub use crate::orderbook::iterators::LevelInfo;
