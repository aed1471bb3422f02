//! Order book snapshot for market data

use super::book::OrderBook;
use super::error::OrderBookError;
use super::level::PriceLevel;
use super::order::{Price, Quantity};
use super::side::BookSide;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A by-value copy of one price level: its price, running total, and the
/// open quantity of each queued entry in time priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevelSnapshot<P, Q> {
    /// The level price.
    pub price: P,

    /// Sum of the open quantities at this level.
    pub total_quantity: Q,

    /// Open quantity of each resting entry, head of queue first.
    pub open_quantities: Vec<Q>,
}

impl<P: Price, Q: Quantity> PriceLevelSnapshot<P, Q> {
    fn of(level: &PriceLevel<'_, P, Q>) -> Self {
        Self {
            price: level.price(),
            total_quantity: level.total_quantity(),
            open_quantities: level.iter().map(|entry| entry.quantity).collect(),
        }
    }
}

/// A by-value copy of the whole book at one point in time, suitable for
/// market-data export. Levels are in priority order, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot<P, Q> {
    /// Bid levels, highest price first.
    pub bids: Vec<PriceLevelSnapshot<P, Q>>,

    /// Ask levels, lowest price first.
    pub asks: Vec<PriceLevelSnapshot<P, Q>>,
}

impl<P: Price, Q: Quantity> OrderBookSnapshot<P, Q> {
    fn of_side(side: &BookSide<'_, P, Q>) -> Vec<PriceLevelSnapshot<P, Q>> {
        side.iter().map(PriceLevelSnapshot::of).collect()
    }

    /// The best bid price and its total quantity.
    pub fn best_bid(&self) -> Option<(P, Q)> {
        self.bids
            .first()
            .map(|level| (level.price, level.total_quantity))
    }

    /// The best ask price and its total quantity.
    pub fn best_ask(&self) -> Option<(P, Q)> {
        self.asks
            .first()
            .map(|level| (level.price, level.total_quantity))
    }

    /// Serializes the snapshot as JSON.
    ///
    /// # Errors
    /// Returns [`OrderBookError::Serialization`] when encoding fails.
    pub fn to_json(&self) -> Result<String, OrderBookError<Q>>
    where
        P: Serialize,
        Q: Serialize,
    {
        serde_json::to_string(self).map_err(|err| OrderBookError::Serialization {
            message: err.to_string(),
        })
    }

    /// Parses a snapshot previously produced by [`to_json`](Self::to_json).
    ///
    /// # Errors
    /// Returns [`OrderBookError::Deserialization`] when decoding fails.
    pub fn from_json(json: &str) -> Result<Self, OrderBookError<Q>>
    where
        P: DeserializeOwned,
        Q: DeserializeOwned,
    {
        serde_json::from_str(json).map_err(|err| OrderBookError::Deserialization {
            message: err.to_string(),
        })
    }
}

impl<'book, P: Price, Q: Quantity> OrderBook<'book, P, Q> {
    /// Copies the current book state into an owned snapshot.
    pub fn snapshot(&self) -> OrderBookSnapshot<P, Q> {
        OrderBookSnapshot {
            bids: OrderBookSnapshot::of_side(self.bid()),
            asks: OrderBookSnapshot::of_side(self.ask()),
        }
    }
}
