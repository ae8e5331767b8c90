mod common;

use std::sync::Arc;

use common::{broken_doc, course_doc, seeded, Call, RecordingStore};
use coursebook_client::{
    controller::{CourseList, ListState, Notice},
    CourseStore, MemoryStore,
};
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;

fn list_over(docs: &RecordingStore) -> CourseList {
    CourseList::new(CourseStore::new(Arc::new(docs.clone())))
}

#[tokio::test]
async fn test_reload_three_courses() {
    let docs = RecordingStore::new(seeded([
        course_doc("a", "Algebra"),
        course_doc("b", "Biology"),
        course_doc("c", "Chemistry"),
    ]));
    let list = list_over(&docs);
    let mut rx = list.subscribe();

    list.reload().await;

    // loading was published before the result
    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!(state.courses.len(), 3);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_loading_flag_while_in_flight() {
    let (docs, gate) = RecordingStore::gated(seeded([course_doc("a", "Algebra")]));
    let list = list_over(&docs);
    let mut rx = list.subscribe();

    let handle = list.spawn_reload(&Handle::current());
    assert!(list.state().is_loading);

    gate.notify_one();
    handle.await.unwrap();

    rx.changed().await.unwrap();
    let state = list.state();
    assert!(!state.is_loading);
    assert_eq!(state.courses.len(), 1);
}

#[tokio::test]
async fn test_reload_skips_malformed() {
    let docs = RecordingStore::new(seeded([
        course_doc("a", "Algebra"),
        broken_doc("b"),
        course_doc("c", "Chemistry"),
        broken_doc("d"),
        course_doc("e", "Economics"),
    ]));
    let list = list_over(&docs);

    list.reload().await;

    let state = list.state();
    assert_eq!(state.courses.len(), 3);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_failed_reload_keeps_courses() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra"), course_doc("b", "Biology")]));
    let list = list_over(&docs);
    list.reload().await;
    let before = list.state().courses;

    docs.fail_with("network unreachable");
    list.reload().await;

    assert_eq!(
        list.state(),
        ListState {
            courses: before,
            is_loading: false,
            error: Some("network unreachable".into()),
        }
    );
}

#[tokio::test]
async fn test_successful_reload_clears_error() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra")]));
    let list = list_over(&docs);

    docs.fail_with("network unreachable");
    list.reload().await;
    assert!(list.state().error.is_some());

    docs.succeed();
    list.reload().await;
    let state = list.state();
    assert_eq!(state.error, None);
    assert_eq!(state.courses.len(), 1);
}

#[tokio::test]
async fn test_empty_snapshot_empties_list() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra")]));
    let list = list_over(&docs);
    list.reload().await;
    assert_eq!(list.state().courses.len(), 1);

    list.remove("a").await.unwrap();

    assert_eq!(list.state().courses, vec![]);
}

#[tokio::test]
async fn test_remove_reloads_once() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra"), course_doc("b", "Biology")]));
    let list = list_over(&docs);
    let mut notices = list.notices();

    list.remove("a").await.unwrap();

    assert_eq!(
        docs.calls(),
        vec![Call::Delete("a".into()), Call::Get],
    );
    assert_eq!(list.state().courses.len(), 1);
    assert_eq!(notices.recv().await.unwrap(), Notice::info("Course deleted"));
}

#[tokio::test]
async fn test_failed_remove_leaves_state_alone() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra")]));
    let list = list_over(&docs);
    list.reload().await;
    let before = list.state();
    let mut notices = list.notices();

    docs.fail_with("permission denied");
    assert!(list.remove("a").await.is_err());

    assert_eq!(list.state(), before);
    assert_eq!(docs.count(|c| *c == Call::Get), 1);
    assert_eq!(
        notices.recv().await.unwrap(),
        Notice::error("Failed to delete: permission denied")
    );
}

#[tokio::test]
async fn test_spawn_remove_reloads() {
    let docs = RecordingStore::new(seeded([course_doc("a", "Algebra"), course_doc("b", "Biology")]));
    let list = list_over(&docs);

    list.spawn_remove(&Handle::current(), "b".into())
        .await
        .unwrap();

    let ids: Vec<_> = list.state().courses.into_iter().map(|c| c.id).collect();
    assert_eq!(ids, vec!["a"]);
    assert_eq!(docs.count(|c| *c == Call::Get), 1);
}

#[tokio::test]
async fn test_dropped_list_discards_result() {
    let (docs, gate) = RecordingStore::gated(seeded([course_doc("a", "Algebra")]));
    let list = list_over(&docs);
    let rx = list.subscribe();

    let handle = list.spawn_reload(&Handle::current());
    drop(list);
    gate.notify_one();
    handle.await.unwrap();

    // the store was asked, but nobody got told
    assert_eq!(docs.calls(), vec![Call::Get]);
    assert!(rx.has_changed().is_err());
    let last = rx.borrow();
    assert!(last.is_loading);
    assert!(last.courses.is_empty());
}

#[tokio::test]
async fn test_independent_lists() {
    let docs = MemoryStore::new();
    let store = CourseStore::new(Arc::new(docs));
    let a = CourseList::new(store.clone());
    let b = CourseList::new(store);

    a.spawn_reload(&Handle::current()).await.unwrap();

    assert!(!a.state().is_loading);
    assert_eq!(b.state(), ListState::default());
}
