//! Execution policies: per-fill collaborators injected into the matching
//! walk.
//!
//! For every prospective fill the engine builds an [`OrderQuantity`] and
//! hands it to the policy before committing. The policy may reduce the fill
//! quantity — down to zero, which cancels the rest of the resting entry —
//! and it may suspend, which parks the whole matching walk until the
//! policy's future resolves. This is how a caller interposes an
//! asynchronous per-execution check (a remote risk limit, say) without the
//! engine knowing anything about the async substrate.

use super::order::{OrderQuantity, Quantity};
use std::future::Future;
use std::time::Duration;
use tracing::trace;

/// A per-execution collaborator invoked once per tentative fill.
///
/// Contract:
/// - the policy may read the fill's order and quantity;
/// - it may decrease `fill.quantity`, including to zero (a veto);
/// - it must not increase it — the engine clamps and complains if it does;
/// - awaiting [`apply`](ExecutionPolicy::apply) is the engine's only
///   suspension point, and the policy must eventually resolve unless the
///   caller drops the fill stream outright.
pub trait ExecutionPolicy<P, Q> {
    /// Inspect, and possibly reduce, one tentative fill.
    fn apply(&mut self, fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()>;
}

impl<P, Q, E> ExecutionPolicy<P, Q> for &mut E
where
    E: ExecutionPolicy<P, Q>,
{
    fn apply(&mut self, fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()> {
        (**self).apply(fill)
    }
}

/// The default policy: accepts every fill as proposed, without suspending.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPolicy;

impl<P, Q> ExecutionPolicy<P, Q> for NoopPolicy {
    fn apply(&mut self, _fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

/// Wraps a plain function as a policy that completes without suspending.
#[derive(Debug, Clone)]
pub struct FnPolicy<F> {
    f: F,
}

impl<F> FnPolicy<F> {
    /// Wraps `f`, which is called synchronously on every tentative fill.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<P, Q, F> ExecutionPolicy<P, Q> for FnPolicy<F>
where
    F: for<'a, 'b> FnMut(&'a mut OrderQuantity<'b, P, Q>),
{
    fn apply(&mut self, fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()> {
        (self.f)(fill);
        std::future::ready(())
    }
}

/// Caps every individual execution at a fixed quantity.
///
/// A fill trimmed by the cap counts as a veto: the engine removes the
/// resting entry it was cut against and, if that leaves the level
/// non-empty, stops the walk.
#[derive(Debug, Clone, Copy)]
pub struct SizeLimitPolicy<Q> {
    max_fill: Q,
}

impl<Q: Quantity> SizeLimitPolicy<Q> {
    /// Creates a policy capping each execution at `max_fill`.
    pub fn new(max_fill: Q) -> Self {
        Self { max_fill }
    }
}

impl<P, Q: Quantity> ExecutionPolicy<P, Q> for SizeLimitPolicy<Q> {
    fn apply(&mut self, fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()> {
        if fill.quantity > self.max_fill {
            fill.quantity = self.max_fill;
        }
        std::future::ready(())
    }
}

/// Bounds how long an inner policy may keep the matching walk suspended.
///
/// If the inner policy does not resolve within the deadline the fill is
/// vetoed to zero, which terminates the current fill without leaving a
/// half-applied state. The core itself defines no timeouts; this is the
/// policy-level rendition.
#[derive(Debug, Clone)]
pub struct TimeoutPolicy<E> {
    inner: E,
    deadline: Duration,
}

impl<E> TimeoutPolicy<E> {
    /// Wraps `inner`, giving it `deadline` per fill to resolve.
    pub fn new(inner: E, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

impl<P, Q, E> ExecutionPolicy<P, Q> for TimeoutPolicy<E>
where
    Q: Quantity,
    E: ExecutionPolicy<P, Q>,
{
    fn apply(&mut self, fill: &mut OrderQuantity<'_, P, Q>) -> impl Future<Output = ()> {
        async move {
            if tokio::time::timeout(self.deadline, self.inner.apply(fill))
                .await
                .is_err()
            {
                trace!("execution policy timed out, vetoing fill");
                fill.quantity = Q::zero();
            }
        }
    }
}
