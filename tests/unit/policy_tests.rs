//! Scenarios driven through execution policies.

use crate::helpers::{
    CountingPolicy, StalledPolicy, YieldingCapPolicy, assert_book_invariants, executions, fok,
    ioc, limit, seed,
};
use futures::StreamExt;
use matchbook::prelude::*;
use std::time::Duration;

#[test]
fn capped_ioc_stops_when_a_level_survives_the_veto() {
    let bids = [
        limit(Side::Buy, 105, 2),
        limit(Side::Buy, 100, 5),
        limit(Side::Buy, 100, 10),
        limit(Side::Buy, 95, 10),
        limit(Side::Buy, 90, 5),
    ];
    let incoming = ioc(Side::Sell, 100, 8);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let fills = book.execute_order_with(&incoming, SizeLimitPolicy::new(3));

    // The cap trims the second fill from 5 to 3, which cancels that entry's
    // residual and ends the walk at the surviving 100 level.
    assert_eq!(executions(&fills), vec![(105, 2), (100, 3)]);

    let shape: Vec<(i64, i64)> = book
        .bid()
        .iter()
        .map(|level| (level.price(), level.total_quantity()))
        .collect();
    assert_eq!(shape, vec![(100, 10), (95, 10), (90, 5)]);

    let top = book.bid().top().unwrap();
    assert_eq!(top.len(), 1);
    assert!(top.front().unwrap().is_for(&bids[2]));
    assert_book_invariants(&book);
}

#[test]
fn capped_sweep_continues_across_emptied_levels() {
    let asks = [limit(Side::Sell, 120, 7), limit(Side::Sell, 125, 4)];
    let incoming = ioc(Side::Buy, 125, 10);

    let mut book = OrderBook::new();
    seed(&mut book, &asks);

    let fills = book.execute_order_with(&incoming, SizeLimitPolicy::new(5));

    // The veto at 120 empties that level outright, so the walk moves on and
    // anything that could not execute is gone from the book.
    assert_eq!(executions(&fills), vec![(120, 5), (125, 4)]);
    assert!(book.ask().is_empty());
    assert!(book.bid().is_empty());
    assert_book_invariants(&book);
}

#[test]
fn fn_policy_wraps_a_plain_closure() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];
    let incoming = ioc(Side::Sell, 100, 6);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let policy = FnPolicy::new(|fill: &mut OrderQuantity<'_, i64, i64>| {
        if fill.quantity > 3 {
            fill.quantity = 3;
        }
    });
    let fills = book.execute_order_with(&incoming, policy);

    assert_eq!(executions(&fills), vec![(105, 2), (100, 3)]);
    assert_book_invariants(&book);
}

#[test]
fn a_stateful_policy_can_be_reused_across_orders() {
    let bids = [limit(Side::Buy, 100, 5), limit(Side::Buy, 95, 5)];
    let first = ioc(Side::Sell, 100, 5);
    let second = ioc(Side::Sell, 95, 5);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let mut policy = CountingPolicy::default();
    let _ = book.execute_order_with(&first, &mut policy);
    let _ = book.execute_order_with(&second, &mut policy);

    assert_eq!(policy.calls, 2);
    assert!(book.bid().is_empty());
}

#[test]
fn fok_dry_run_never_invokes_the_policy() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    // Killed: not enough liquidity at acceptable prices.
    let killed = fok(Side::Sell, 100, 20);
    let mut policy = CountingPolicy::default();
    let fills = book.execute_order_with(&killed, &mut policy);
    assert!(fills.is_empty());
    assert_eq!(policy.calls, 0);

    // Filled: the policy is consulted once per execution, as usual.
    let filled = fok(Side::Sell, 100, 7);
    let fills = book.execute_order_with(&filled, &mut policy);
    assert_eq!(fills.len(), 2);
    assert_eq!(policy.calls, 2);
    assert_book_invariants(&book);
}

#[tokio::test]
async fn a_suspending_policy_produces_the_same_fills_as_its_sync_twin() {
    let bids = [
        limit(Side::Buy, 105, 2),
        limit(Side::Buy, 100, 5),
        limit(Side::Buy, 100, 10),
    ];
    let incoming = ioc(Side::Sell, 100, 8);

    let mut sync_book = OrderBook::new();
    seed(&mut sync_book, &bids);
    let sync_fills = sync_book.execute_order_with(&incoming, SizeLimitPolicy::new(3));

    let mut async_book = OrderBook::new();
    seed(&mut async_book, &bids);
    let mut policy = YieldingCapPolicy::new(3);
    let async_fills: Vec<_> = async_book
        .accept_order_with(&incoming, &mut policy)
        .collect()
        .await;

    assert_eq!(executions(&sync_fills), executions(&async_fills));
    assert_eq!(sync_book.snapshot(), async_book.snapshot());

    // The policy saw the raw tentative quantities before its own cap.
    assert_eq!(policy.seen, vec![2, 5]);
}

#[tokio::test]
async fn timeout_policy_vetoes_a_stalled_inner_policy() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 105, 4)];
    let incoming = ioc(Side::Sell, 100, 6);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let policy = TimeoutPolicy::new(StalledPolicy, Duration::from_millis(10));
    let fills: Vec<_> = book.accept_order_with(&incoming, policy).collect().await;

    // The veto shrinks the first fill to zero and cancels its entry; the
    // surviving level ends the walk.
    assert_eq!(executions(&fills), vec![(105, 0)]);
    assert_eq!(book.bid().len(), 1);

    let top = book.bid().top().unwrap();
    assert_eq!(top.len(), 1);
    assert!(top.front().unwrap().is_for(&bids[1]));
    assert_eq!(top.total_quantity(), 4);
    assert_book_invariants(&book);
}

#[tokio::test]
async fn timeout_policy_passes_prompt_fills_through() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];
    let incoming = ioc(Side::Sell, 100, 7);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let policy = TimeoutPolicy::new(NoopPolicy, Duration::from_secs(1));
    let fills: Vec<_> = book.accept_order_with(&incoming, policy).collect().await;

    assert_eq!(executions(&fills), vec![(105, 2), (100, 5)]);
    assert!(book.bid().is_empty());
}
