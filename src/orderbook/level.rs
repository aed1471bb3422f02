//! A single price level: a FIFO queue of resting entries at one price.

use super::order::{Order, OrderQuantity, Price, Quantity};
use super::policy::ExecutionPolicy;
use async_stream::stream;
use futures::Stream;
use std::cmp;
use std::collections::VecDeque;
use tracing::{trace, warn};

/// One committed execution against the head of a level's queue.
pub(crate) struct LevelExecution<'book, P, Q> {
    /// The committed fill, ready to be yielded to the caller.
    pub fill: OrderQuantity<'book, P, Q>,
    /// The policy reduced the fill below the tentative quantity. The head
    /// entry has been cancelled and removed; the level walk must not
    /// continue past this execution.
    pub vetoed: bool,
}

/// All resting orders at one exact price on one side of the book.
///
/// Entries join at the tail and fill from the head, which is what gives the
/// book its time priority within a price. `total_quantity` is kept equal to
/// the sum of the queued entry quantities at every point a caller can
/// observe.
#[derive(Debug)]
pub struct PriceLevel<'book, P, Q> {
    price: P,
    total_quantity: Q,
    orders: VecDeque<OrderQuantity<'book, P, Q>>,
}

impl<'book, P: Price, Q: Quantity> PriceLevel<'book, P, Q> {
    pub(crate) fn new(price: P) -> Self {
        Self {
            price,
            total_quantity: Q::zero(),
            orders: VecDeque::new(),
        }
    }

    /// Appends a resting entry of `quantity` for `order` at the tail.
    pub(crate) fn add_order(&mut self, order: &'book Order<P, Q>, quantity: Q) {
        debug_assert!(quantity > Q::zero(), "resting quantity must be positive");

        self.orders.push_back(OrderQuantity::new(order, quantity));
        self.total_quantity += quantity;
    }

    /// Executes one fill against the head entry, or returns `None` when the
    /// queue is empty.
    ///
    /// The tentative fill is `min(wanted, head.quantity)`; the policy may
    /// reduce it before it is committed. Every mutation — the entry debit,
    /// the level total debit, and the head removal where due — is applied
    /// before this returns, so the caller can hand the fill out with the
    /// book already in its post-fill state.
    ///
    /// Head removal rules:
    /// - an entry debited to zero is consumed and popped;
    /// - an entry cut short by the policy is cancelled: it is popped and
    ///   its residual leaves the level total (whatever quantity remains
    ///   open belongs to routing layers above the book, not to the book);
    /// - an entry with residual left only because `wanted` ran out stays at
    ///   the head, keeping its time priority.
    pub(crate) async fn execute_front<E>(
        &mut self,
        wanted: Q,
        policy: &mut E,
    ) -> Option<LevelExecution<'book, P, Q>>
    where
        E: ExecutionPolicy<P, Q>,
    {
        let entry = self.orders.front_mut()?;

        let tentative = cmp::min(wanted, entry.quantity);
        let mut fill = OrderQuantity::new(entry.order(), tentative);
        policy.apply(&mut fill).await;

        if fill.quantity > tentative {
            warn!(
                "execution policy increased fill from {:?} to {:?}, clamping",
                tentative, fill.quantity
            );
            debug_assert!(false, "execution policy must never increase a fill");
            fill.quantity = tentative;
        }

        entry.quantity -= fill.quantity;
        let exhausted = entry.quantity.is_zero();
        let residual = entry.quantity;

        self.total_quantity -= fill.quantity;
        let vetoed = fill.quantity < tentative;

        if exhausted {
            self.orders.pop_front();
        } else if vetoed {
            trace!(
                "policy vetoed fill at {:?}, cancelling residual {:?}",
                self.price, residual
            );
            self.total_quantity -= residual;
            self.orders.pop_front();
        }

        Some(LevelExecution { fill, vetoed })
    }

    /// Streams fills against the head of the queue until `wanted` is
    /// exhausted, the queue empties, or the policy vetoes a fill.
    ///
    /// Each fill is committed before it is yielded; dropping the stream
    /// between fills leaves the level in the last committed state.
    pub(crate) fn match_order<'a, E>(
        &'a mut self,
        wanted: Q,
        policy: &'a mut E,
    ) -> impl Stream<Item = OrderQuantity<'book, P, Q>> + 'a
    where
        E: ExecutionPolicy<P, Q>,
    {
        stream! {
            let mut wanted = wanted;
            while !wanted.is_zero() {
                let execution = match self.execute_front(wanted, policy).await {
                    Some(execution) => execution,
                    None => break,
                };
                wanted -= execution.fill.quantity;
                yield execution.fill;
                if execution.vetoed {
                    break;
                }
            }
        }
    }

    /// The price shared by every entry on this level.
    pub fn price(&self) -> P {
        self.price
    }

    /// Sum of the open quantities of all queued entries.
    pub fn total_quantity(&self) -> Q {
        self.total_quantity
    }

    /// Number of resting entries queued at this price.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// `true` when no entries rest at this price.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The entry next in line to fill, if any.
    pub fn front(&self) -> Option<&OrderQuantity<'book, P, Q>> {
        self.orders.front()
    }

    /// Iterates the resting entries in time priority, head first.
    pub fn iter(&self) -> impl Iterator<Item = &OrderQuantity<'book, P, Q>> {
        self.orders.iter()
    }
}

impl<'a, 'book, P: Price, Q: Quantity> IntoIterator for &'a PriceLevel<'book, P, Q> {
    type Item = &'a OrderQuantity<'book, P, Q>;
    type IntoIter = std::collections::vec_deque::Iter<'a, OrderQuantity<'book, P, Q>>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}
