use std::time::Duration;

use chrono::Utc;

use super::*;
use crate::entities::Tally;
use crate::error::DomainError;
use crate::session::Session;
use crate::testing::MemoryDispositionStore;
use crate::value_objects::{EngagementKind, Presence, Rating, Snowflake};

const USER: Snowflake = Snowflake::new(1);
const OTHER: Snowflake = Snowflake::new(2);
const VIDEO: Snowflake = Snowflake::new(100);

fn session_for(user: Snowflake) -> Session {
    let now = Utc::now();
    Session::new(format!("s-{user}"), user, now, now + chrono::Duration::hours(1))
}

fn ratings() -> MemoryDispositionStore<Rating> {
    MemoryDispositionStore::new(EngagementKind::VideoRating)
}

#[tokio::test]
async fn test_toggle_parity() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    let mut current = None;
    for n in 1..=7 {
        let out = reconciler
            .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, current)
            .await
            .unwrap();
        current = out.effective;

        let expected = (n % 2 == 1).then_some(Rating::Like);
        assert_eq!(current, expected, "after {n} requests");
        assert_eq!(store.get(USER, VIDEO), expected);
    }
}

#[tokio::test]
async fn test_repeated_request_clears() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    let first = reconciler
        .toggle(&store, Some(&session), VIDEO, Rating::Dislike)
        .await
        .unwrap();
    let second = reconciler
        .toggle(&store, Some(&session), VIDEO, Rating::Dislike)
        .await
        .unwrap();

    assert_eq!(first.effective, Some(Rating::Dislike));
    assert_eq!(second.effective, None);
    assert_eq!(second.mutation, Mutation::Delete);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_like_then_dislike_keeps_one_row() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    let liked = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap();
    assert_eq!(liked.tally, Tally::rating(1, 0));

    let switched = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Dislike, liked.effective)
        .await
        .unwrap();

    assert_eq!(switched.mutation, Mutation::Update(Rating::Dislike));
    assert_eq!(switched.effective, Some(Rating::Dislike));
    assert_eq!(switched.tally, Tally::rating(0, 1));
    assert_eq!(store.rows_for(VIDEO), 1);
    assert_eq!(store.get(USER, VIDEO), Some(Rating::Dislike));
}

#[tokio::test]
async fn test_like_then_undo() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    let liked = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap();
    let undone = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, liked.effective)
        .await
        .unwrap();

    assert_eq!(undone.effective, None);
    assert_eq!(undone.tally, Tally::rating(0, 0));
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_insert_delete_reinsert() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    for expected in [Some(Rating::Like), None, Some(Rating::Like)] {
        let out = reconciler
            .toggle(&store, Some(&session), VIDEO, Rating::Like)
            .await
            .unwrap();
        assert_eq!(out.effective, expected);
    }

    assert_eq!(store.get(USER, VIDEO), Some(Rating::Like));
    assert_eq!(store.tally_now(VIDEO), Tally::rating(1, 0));
}

#[tokio::test]
async fn test_subscribe_unsubscribe_counter_tracks_rows() {
    let reconciler = Reconciler::default();
    let store = MemoryDispositionStore::new(EngagementKind::Subscription);
    let channel = Snowflake::new(500);
    let alice = session_for(USER);
    let bob = session_for(OTHER);

    let a = reconciler
        .toggle(&store, Some(&alice), channel, Presence::Present)
        .await
        .unwrap();
    assert_eq!(a.tally, Tally::presence(1));

    let b = reconciler
        .toggle(&store, Some(&bob), channel, Presence::Present)
        .await
        .unwrap();
    assert_eq!(b.tally.total(), store.rows_for(channel) as i64);
    assert_eq!(b.tally, Tally::presence(2));

    let a_off = reconciler
        .toggle(&store, Some(&alice), channel, Presence::Present)
        .await
        .unwrap();
    assert_eq!(a_off.effective, None);
    assert_eq!(a_off.tally, Tally::presence(1));

    let b_off = reconciler
        .toggle(&store, Some(&bob), channel, Presence::Present)
        .await
        .unwrap();
    assert_eq!(b_off.tally, Tally::presence(0));
    assert_eq!(store.rows_for(channel), 0);
}

#[tokio::test]
async fn test_unauthenticated_makes_no_store_call() {
    let reconciler = Reconciler::default();
    let store = ratings();
    // Any store call would surface as StoreUnavailable instead
    store.set_unavailable(true);

    let err = reconciler
        .apply_disposition(&store, None, VIDEO, Rating::Like, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    let mut signed_out = session_for(USER);
    signed_out.invalidate();
    let err = reconciler
        .toggle(&store, Some(&signed_out), VIDEO, Rating::Like)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    let now = Utc::now();
    let expired = Session::new("old", USER, now - chrono::Duration::hours(2), now);
    let err = reconciler
        .apply_disposition(&store, Some(&expired), VIDEO, Rating::Like, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Unauthenticated));

    assert_eq!(store.mutation_count(), 0);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_dangling_object_is_reference_error() {
    let reconciler = Reconciler::default();
    let store = MemoryDispositionStore::<Rating>::with_known_objects(EngagementKind::VideoRating);
    let session = session_for(USER);

    let err = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ReferenceError { object: "Video", .. }));
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_constraint_race_resolved_from_fresh_read() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    // Caller thinks the pair is empty, but a dislike lands first
    store.race_next_insert(Rating::Dislike);
    let out = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap();

    assert_eq!(out.mutation, Mutation::Update(Rating::Like));
    assert_eq!(out.effective, Some(Rating::Like));
    assert_eq!(store.rows_for(VIDEO), 1);
    assert_eq!(out.tally, Tally::rating(1, 0));
}

#[tokio::test]
async fn test_constraint_race_on_same_value_toggles_off() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    store.race_next_insert(Rating::Like);
    let out = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap();

    assert_eq!(out.effective, None);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_second_constraint_violation_surfaces() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);
    store.set_always_conflict(true);

    let err = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn test_store_timeout_is_unavailable() {
    let reconciler = Reconciler::new(Duration::from_millis(20));
    let store = ratings();
    let session = session_for(USER);
    store.set_latency(Some(Duration::from_millis(500)));

    let err = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, None)
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::StoreUnavailable(_)));
    assert!(err.is_transient());
    assert_eq!(reconciler.in_flight(), 0);
}

#[tokio::test]
async fn test_store_outage_is_unavailable() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);
    store.set_unavailable(true);

    let err = reconciler
        .toggle(&store, Some(&session), VIDEO, Rating::Like)
        .await
        .unwrap_err();
    assert!(err.is_transient());

    store.set_unavailable(false);
    let out = reconciler
        .toggle(&store, Some(&session), VIDEO, Rating::Like)
        .await
        .unwrap();
    assert_eq!(out.effective, Some(Rating::Like));
}

#[tokio::test]
async fn test_concurrent_requests_on_one_pair_are_serialized() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);
    store.set_latency(Some(Duration::from_millis(10)));

    let (a, b) = tokio::join!(
        reconciler.toggle(&store, Some(&session), VIDEO, Rating::Like),
        reconciler.toggle(&store, Some(&session), VIDEO, Rating::Like),
    );
    let mut effective = [a.unwrap().effective, b.unwrap().effective];
    effective.sort_by_key(Option::is_some);

    assert_eq!(effective, [None, Some(Rating::Like)]);
    assert_eq!(store.row_count(), 0);
    assert_eq!(store.mutation_count(), 2);
    assert_eq!(reconciler.in_flight(), 0);
}

#[tokio::test]
async fn test_stale_current_still_single_mutation() {
    let reconciler = Reconciler::default();
    let store = ratings();
    let session = session_for(USER);

    // Caller believes a like exists; the row is already gone
    let out = reconciler
        .apply_disposition(&store, Some(&session), VIDEO, Rating::Like, Some(Rating::Like))
        .await
        .unwrap();

    assert_eq!(out.mutation, Mutation::Delete);
    assert_eq!(out.effective, None);
    assert_eq!(out.tally, Tally::rating(0, 0));
}
