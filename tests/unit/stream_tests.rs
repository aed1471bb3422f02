//! Laziness, cancellation, and commit-before-yield behavior of the fill
//! stream.

use crate::helpers::{assert_book_invariants, ioc, limit, seed};
use futures::{StreamExt, pin_mut};
use matchbook::prelude::*;

#[tokio::test]
async fn fills_arrive_one_step_at_a_time() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];
    let incoming = ioc(Side::Sell, 100, 7);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    let fills = book.accept_order(&incoming);
    pin_mut!(fills);

    let first = fills.next().await.unwrap();
    assert_eq!((first.price(), first.quantity), (105, 2));
    assert!(first.is_for(&bids[0]));

    let second = fills.next().await.unwrap();
    assert_eq!((second.price(), second.quantity), (100, 5));

    assert!(fills.next().await.is_none());
}

#[tokio::test]
async fn dropping_the_stream_keeps_only_committed_fills() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];
    let incoming = ioc(Side::Sell, 100, 7);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);

    {
        let fills = book.accept_order(&incoming);
        pin_mut!(fills);

        let first = fills.next().await.unwrap();
        assert_eq!((first.price(), first.quantity), (105, 2));
        // dropped here, mid-walk
    }

    // The first fill is fully committed, including the splice of the swept
    // 105 level; the rest of the walk never happened.
    assert_eq!(book.best_bid(), Some(100));
    assert_eq!(book.bid().top().unwrap().total_quantity(), 5);
    assert_book_invariants(&book);
}

#[tokio::test]
async fn an_unpolled_stream_commits_nothing() {
    let bids = [limit(Side::Buy, 105, 2), limit(Side::Buy, 100, 5)];
    let incoming = ioc(Side::Sell, 100, 7);

    let mut book = OrderBook::new();
    seed(&mut book, &bids);
    let before = book.snapshot();

    {
        let _fills = book.accept_order(&incoming);
        // never polled
    }

    assert_eq!(book.snapshot(), before);
}

#[tokio::test]
async fn limit_remainder_rests_only_after_a_full_drain() {
    let resting = limit(Side::Buy, 100, 5);
    let incoming = limit(Side::Sell, 95, 8);

    let mut book = OrderBook::new();
    seed(&mut book, std::slice::from_ref(&resting));

    {
        let fills = book.accept_order(&incoming);
        pin_mut!(fills);
        assert_eq!(fills.next().await.unwrap().quantity, 5);
        // dropped before the terminal None: the walk was cancelled, so the
        // remainder is not rested
    }
    assert!(book.ask().is_empty());
    assert!(book.bid().is_empty());

    // Drained to the end, the remainder does rest.
    let drained = limit(Side::Sell, 95, 3);
    assert!(book.execute_order(&drained).is_empty());
    assert_eq!(book.best_ask(), Some(95));
    assert_eq!(book.ask().top().unwrap().total_quantity(), 3);
    assert_book_invariants(&book);
}
