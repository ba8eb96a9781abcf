use taskstore_core::{LoadError, LoadPolicy, ServiceError, StoreError, TaskListQuery, TaskService};

#[test]
fn open_restores_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    {
        let service = TaskService::open(&path, LoadPolicy::Abort).unwrap();
        let task = service.create_task("carry over").unwrap();
        service.update_task(task.id, "carry over done", true).unwrap();
        service.flush();
    }

    let service = TaskService::open(&path, LoadPolicy::Abort).unwrap();
    assert_eq!(service.data_file(), Some(path.as_path()));
    let restored = service.get_task(1).unwrap();
    assert_eq!(restored.title, "carry over done");
    assert!(restored.done);
    assert_eq!(service.create_task("fresh task").unwrap().id, 2);
}

#[test]
fn abort_policy_surfaces_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "not json at all").unwrap();

    let err = TaskService::open(&path, LoadPolicy::Abort)
        .err()
        .expect("corrupt snapshot should abort");
    assert!(matches!(err, ServiceError::Load(LoadError::Parse { .. })));
}

#[test]
fn abort_policy_surfaces_unreadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();

    let err = TaskService::open(dir.path(), LoadPolicy::Abort)
        .err()
        .expect("unreadable snapshot should abort");
    assert!(matches!(err, ServiceError::Load(LoadError::Read { .. })));
}

#[test]
fn continue_policy_starts_empty_on_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    std::fs::write(&path, "not json at all").unwrap();

    let service = TaskService::open(&path, LoadPolicy::Continue).unwrap();
    assert!(service.list_tasks(&TaskListQuery::default()).is_empty());
    assert_eq!(service.get_task(1), Err(StoreError::NotFound(1)));
}

#[test]
fn delete_through_service_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");

    {
        let service = TaskService::open(&path, LoadPolicy::Abort).unwrap();
        service.create_task("short lived").unwrap();
        service.create_task("long lived").unwrap();
        service.delete_task(1).unwrap();
    }

    let service = TaskService::open(&path, LoadPolicy::Abort).unwrap();
    let remaining = service.list_tasks(&TaskListQuery::new(1, 10, None));
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "long lived");
}
