//! Record store behaviour: ordering, dependencies, cascades, activity
use sessions_mcp::sessions::{ProjectPatch, SongPatch, TaskPatch};
use sessions_mcp::{ActivityKind, EntityType, Priority, Section, SessionsData, StoreError};

fn store_with_song(title: &str) -> (SessionsData, String) {
    let mut data = SessionsData::new();
    let song = data.create_song(title, None);
    (data, song.id)
}

#[test]
fn test_toggle_refuses_while_dependency_open() {
    let (mut data, song) = store_with_song("Paper Boats");
    let record = data
        .create_task(&song, Section::Recording, "record vocals", None, None)
        .unwrap();
    let mix = data
        .create_task(&song, Section::Mixing, "mix vocals", None, None)
        .unwrap();
    data.add_dependency(&mix.id, &record.id).unwrap();

    assert!(!data.can_complete_task(&mix.id));
    match data.toggle_task_done(&mix.id) {
        Err(StoreError::Blocked { task, blocking }) => {
            assert_eq!(task, mix.id);
            assert_eq!(blocking, vec![record.id.clone()]);
        }
        other => panic!("expected Blocked, got {:?}", other),
    }
    assert!(!data.find_task(&mix.id).unwrap().done);

    data.toggle_task_done(&record.id).unwrap();
    assert!(data.can_complete_task(&mix.id));
    assert!(data.toggle_task_done(&mix.id).unwrap().done);

    // reopening is always allowed
    assert!(!data.toggle_task_done(&record.id).unwrap().done);
    assert!(!data.toggle_task_done(&mix.id).unwrap().done);
}

#[test]
fn test_update_cannot_complete_blocked_task() {
    let (mut data, song) = store_with_song("Paper Boats");
    let lyrics = data
        .create_task(&song, Section::Writing, "finish lyrics", None, None)
        .unwrap();
    let vocals = data
        .create_task(&song, Section::Recording, "record vocals", None, None)
        .unwrap();
    data.add_dependency(&vocals.id, &lyrics.id).unwrap();

    let done = TaskPatch {
        done: Some(true),
        ..Default::default()
    };
    assert_eq!(
        data.update_task(&vocals.id, done.clone()).map(|t| t.done),
        Err(StoreError::Blocked {
            task: vocals.id.clone(),
            blocking: vec![lyrics.id.clone()],
        })
    );
    assert!(!data.find_task(&vocals.id).unwrap().done);

    data.update_task(&lyrics.id, done.clone()).unwrap();
    assert!(data.update_task(&vocals.id, done).unwrap().done);
}

#[test]
fn test_deleting_dependency_unblocks() {
    let (mut data, song) = store_with_song("Paper Boats");
    let first = data
        .create_task(&song, Section::Writing, "finish lyrics", None, None)
        .unwrap();
    let second = data
        .create_task(&song, Section::Recording, "record vocals", None, None)
        .unwrap();
    data.add_dependency(&second.id, &first.id).unwrap();
    assert!(data.toggle_task_done(&second.id).is_err());

    data.delete_task(&first.id).unwrap();
    assert!(data.find_task(&second.id).unwrap().depends_on.is_empty());
    assert!(data.toggle_task_done(&second.id).unwrap().done);
}

#[test]
fn test_removed_dependency_does_not_block() {
    let (mut data, song) = store_with_song("Static");
    let task = data
        .create_task(&song, Section::Idea, "hum melody", None, None)
        .unwrap();
    let other = data
        .create_task(&song, Section::Idea, "find chords", None, None)
        .unwrap();
    data.add_dependency(&task.id, &other.id).unwrap();
    // removing the edge again
    let task = data.remove_dependency(&task.id, &other.id).unwrap();
    assert!(task.depends_on.is_empty());
    assert!(data.can_complete_task(&task.id));
}

#[test]
fn test_delete_song_cascades() {
    let mut data = SessionsData::new();
    let project = data.create_project("Winter EP", None);
    let doomed = data.create_song("Doomed", Some(&project.id));
    let kept = data.create_song("Kept", Some(&project.id));

    data.create_task(&doomed.id, Section::Idea, "a", None, None)
        .unwrap();
    data.create_task(&doomed.id, Section::Mixing, "b", None, None)
        .unwrap();
    data.create_task(&kept.id, Section::Idea, "c", None, None)
        .unwrap();
    data.create_note(&doomed.id, "lyrics draft").unwrap();
    data.create_version(&doomed.id, "v1", None).unwrap();
    data.create_version(&kept.id, "v1", None).unwrap();

    let deleted = data.delete_song(&doomed.id).unwrap();
    assert_eq!(deleted.title, "Doomed");
    assert!(data.find_song(&doomed.id).is_none());
    assert!(data.tasks().iter().all(|t| t.song_id == kept.id));
    assert_eq!(data.tasks().len(), 1);
    assert!(data.notes().is_empty());
    assert_eq!(data.versions().len(), 1);
    assert_eq!(
        data.find_project(&project.id).unwrap().song_ids,
        vec![kept.id.clone()]
    );
    assert!(data.delete_song(&doomed.id).is_none());
}

#[test]
fn test_order_counts_within_song_and_section() {
    let mut data = SessionsData::new();
    let a = data.create_song("A", None);
    let b = data.create_song("B", None);

    let orders: Vec<u32> = [
        (&a.id, Section::Mixing),
        (&a.id, Section::Mixing),
        (&b.id, Section::Mixing),
        (&a.id, Section::Mastering),
        (&a.id, Section::Mixing),
    ]
    .into_iter()
    .map(|(song, section)| data.create_task(song, section, "t", None, None).unwrap().order)
    .collect();
    assert_eq!(orders, vec![0, 1, 0, 0, 2]);

    let mixing: Vec<u32> = data
        .tasks_by_section(&a.id, Section::Mixing)
        .iter()
        .map(|t| t.order)
        .collect();
    assert_eq!(mixing, vec![0, 1, 2]);
}

#[test]
fn test_delete_project_keeps_songs() {
    let mut data = SessionsData::new();
    let project = data.create_project("LP", Some("first album"));
    let song = data.create_song("Opener", Some(&project.id));
    assert_eq!(song.project_id.as_deref(), Some(project.id.as_str()));

    data.delete_project(&project.id).unwrap();
    let song = data.find_song(&song.id).unwrap();
    assert_eq!(song.project_id, None);
}

#[test]
fn test_reorder_project_songs() {
    let mut data = SessionsData::new();
    let project = data.create_project("EP", None);
    let one = data.create_song("One", Some(&project.id));
    let two = data.create_song("Two", Some(&project.id));

    let project = data
        .reorder_project_songs(&project.id, vec![two.id.clone(), one.id.clone()])
        .unwrap();
    assert_eq!(project.song_ids, vec![two.id.clone(), one.id.clone()]);
    assert_eq!(data.find_song(&two.id).unwrap().order, Some(0));
    assert_eq!(data.find_song(&one.id).unwrap().order, Some(1));

    let titles: Vec<&str> = data
        .list_songs(Some(&project.id))
        .iter()
        .map(|s| s.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Two", "One"]);

    assert_eq!(
        data.reorder_project_songs(&project.id, vec!["ghost".to_string()]),
        Err(StoreError::SongNotFound("ghost".to_string()))
    );
    assert!(matches!(
        data.reorder_project_songs("nope", vec![]),
        Err(StoreError::ProjectNotFound(_))
    ));
}

#[test]
fn test_update_activity_kinds() {
    let (mut data, song) = store_with_song("Kinds");
    let task = data
        .create_task(&song, Section::Idea, "t", None, None)
        .unwrap();

    data.update_task(
        &task.id,
        TaskPatch {
            done: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    data.update_task(
        &task.id,
        TaskPatch {
            done: Some(false),
            priority: Some(Some(Priority::Low)),
            ..Default::default()
        },
    )
    .unwrap();
    data.update_task(
        &task.id,
        TaskPatch {
            title: Some("renamed".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    data.update_song(
        &song,
        SongPatch {
            status: Some(Section::Writing),
            due_date: Some(chrono::NaiveDate::from_ymd_opt(2025, 4, 1)),
            ..Default::default()
        },
    );

    let kinds: Vec<ActivityKind> = data
        .activities(None, None, Some(4))
        .iter()
        .map(|a| a.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            ActivityKind::DueDateChanged,
            ActivityKind::Updated,
            ActivityKind::PriorityChanged,
            ActivityKind::Completed,
        ]
    );
}

#[test]
fn test_update_project_and_missing_records() {
    let mut data = SessionsData::new();
    let project = data.create_project("EP", None);
    let updated = data
        .update_project(
            &project.id,
            ProjectPatch {
                description: Some(Some("five songs".to_string())),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("five songs"));

    assert!(data.update_project("missing", ProjectPatch::default()).is_none());
    assert!(matches!(
        data.update_task("missing", TaskPatch::default()),
        Err(StoreError::TaskNotFound(_))
    ));
    assert!(data.delete_task("missing").is_none());
    assert_eq!(
        data.toggle_task_done("missing"),
        Err(StoreError::TaskNotFound("missing".to_string()))
    );
    assert!(matches!(
        data.create_note("missing", "x"),
        Err(StoreError::SongNotFound(_))
    ));
    assert_eq!(
        data.activities(Some(EntityType::Project), None, None).len(),
        2
    );
}
