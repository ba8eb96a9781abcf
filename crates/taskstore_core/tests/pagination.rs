mod common;

use common::seed;
use taskstore_core::{TaskListQuery, TaskStore};

fn expected_len(total: usize, page: usize, limit: usize) -> usize {
    let offset = (page - 1) * limit;
    limit.min(total.saturating_sub(offset))
}

#[test]
fn page_sizes_follow_offset_math() {
    let store = TaskStore::in_memory();
    seed(&store, 25);

    for page in 1..=4 {
        let tasks = store.list_paginated(page, 10, None);
        assert_eq!(tasks.len(), expected_len(25, page as usize, 10), "page {page}");
    }
}

#[test]
fn filter_is_applied_before_pagination() {
    let store = TaskStore::in_memory();
    // Indices 0, 3, ..., 24 are done: 9 done, 16 open.
    seed(&store, 25);

    let done_total = store.list().iter().filter(|task| task.done).count();
    let open_total = store.list().len() - done_total;
    assert_eq!((done_total, open_total), (9, 16));

    for page in 1..=3 {
        let done = store.list_paginated(page, 4, Some(true));
        assert_eq!(done.len(), expected_len(done_total, page as usize, 4));
        assert!(done.iter().all(|task| task.done));

        let open = store.list_paginated(page, 4, Some(false));
        assert_eq!(open.len(), expected_len(open_total, page as usize, 4));
        assert!(open.iter().all(|task| !task.done));
    }
}

#[test]
fn pages_partition_the_filtered_set() {
    let store = TaskStore::in_memory();
    seed(&store, 23);

    let mut collected = Vec::new();
    for page in 1..=3 {
        collected.extend(store.list_paginated(page, 10, None));
    }
    let ids: Vec<_> = collected.iter().map(|task| task.id).collect();
    let expected: Vec<_> = store.list().iter().map(|task| task.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn page_past_the_end_is_empty_not_absent() {
    let store = TaskStore::in_memory();
    seed(&store, 5);

    assert!(store.list_paginated(2, 10, None).is_empty());
    assert!(store.list_paginated(1_000, 100, Some(true)).is_empty());
    assert!(store.list_paginated(i64::MAX, 100, None).is_empty());
}

#[test]
fn empty_store_lists_nothing() {
    let store = TaskStore::in_memory();
    assert!(store.list_paginated(1, 10, None).is_empty());
    assert!(store.list_page(&TaskListQuery::default()).is_empty());
}

#[test]
fn page_and_limit_defaults_and_cap() {
    let store = TaskStore::in_memory();
    seed(&store, 150);

    assert_eq!(store.list_paginated(0, 10, None), store.list_paginated(1, 10, None));
    assert_eq!(store.list_paginated(-5, 10, None), store.list_paginated(1, 10, None));
    assert_eq!(store.list_paginated(1, 0, None), store.list_paginated(1, 10, None));
    assert_eq!(store.list_paginated(1, -1, None).len(), 10);
    assert_eq!(store.list_paginated(1, 500, None), store.list_paginated(1, 100, None));
    assert_eq!(store.list_paginated(1, 500, None).len(), 100);
    assert_eq!(store.list_paginated(2, 500, None).len(), 50);
}

#[test]
fn repeated_calls_return_the_same_page() {
    let store = TaskStore::in_memory();
    seed(&store, 30);

    let first = store.list_paginated(2, 7, Some(false));
    let second = store.list_paginated(2, 7, Some(false));
    assert_eq!(first, second);
    assert!(first.windows(2).all(|pair| pair[0].id < pair[1].id));
}
