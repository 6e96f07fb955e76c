use rusqlite::Connection;
use timu_core::db::{open_db, open_db_in_memory};
use timu_core::{
    PostId, PostListQuery, PostService, PostValidationError, SqlitePostRepository, SubmitError,
    SubmitPostRequest, MAX_STORY_CHARS, STORY_PREFIX,
};

fn story(content: &str) -> String {
    format!("{STORY_PREFIX}{content}")
}

fn request(account: &str, name: &str, title: &str, story_body: &str) -> SubmitPostRequest {
    SubmitPostRequest {
        account_id: account.to_string(),
        display_name: name.to_string(),
        title: title.to_string(),
        story: story_body.to_string(),
    }
}

fn submit(conn: &mut Connection, req: &SubmitPostRequest) -> Result<PostId, SubmitError> {
    let repo = SqlitePostRepository::try_new(conn).unwrap();
    PostService::new(repo).submit_post(req)
}

#[test]
fn submit_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();

    let req = request("acct-1", "Alex", "my bad", &story("pressed reply-all"));
    let post_id = submit(&mut conn, &req).unwrap();

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    let loaded = service.get_post(post_id).unwrap().unwrap();

    assert_eq!(loaded.uuid, post_id);
    assert_eq!(loaded.title, "my bad");
    assert_eq!(loaded.story, story("pressed reply-all"));
    assert_eq!(loaded.author_account_id, "acct-1");
    assert_eq!(loaded.author_display_name, "Alex");
    assert_eq!(loaded.total_reactions(), 0);
    assert!(loaded.reactions_by_account.is_empty());
}

#[test]
fn display_name_held_by_another_account_is_rejected() {
    let mut conn = open_db_in_memory().unwrap();

    submit(
        &mut conn,
        &request("acct-1", "Alex", "first", &story("claimed the name")),
    )
    .unwrap();

    let err = submit(
        &mut conn,
        &request("acct-2", "Alex", "second", &story("same name, other account")),
    )
    .unwrap_err();

    match err {
        SubmitError::DisplayNameTaken(name) => assert_eq!(name, "Alex"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn same_account_can_reuse_its_own_display_name() {
    let mut conn = open_db_in_memory().unwrap();

    submit(
        &mut conn,
        &request("acct-1", "Alex", "first", &story("one")),
    )
    .unwrap();
    submit(
        &mut conn,
        &request("acct-1", "Alex", "second", &story("two")),
    )
    .unwrap();

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    let posts = service.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(posts.len(), 2);
}

#[test]
fn submission_limits_are_enforced() {
    let mut conn = open_db_in_memory().unwrap();

    let err = submit(
        &mut conn,
        &request("acct-1", "Alex", " ", &story("no title")),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(PostValidationError::EmptyTitle)
    ));

    let err = submit(
        &mut conn,
        &request("acct-1", "Alex", "t", "missing the prefix"),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(PostValidationError::MissingStoryPrefix)
    ));

    let err = submit(
        &mut conn,
        &request(
            "acct-1",
            "Alex",
            "t",
            &story(&"x".repeat(MAX_STORY_CHARS + 1)),
        ),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(PostValidationError::StoryTooLong { .. })
    ));

    // Nothing was persisted by the failed attempts.
    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);
    assert!(service.list_posts(&PostListQuery::default()).unwrap().is_empty());
}

#[test]
fn listing_orders_newest_first_with_pagination() {
    let mut conn = open_db_in_memory().unwrap();

    let first = submit(
        &mut conn,
        &request("acct-1", "Alex", "oldest", &story("one")),
    )
    .unwrap();
    let second = submit(
        &mut conn,
        &request("acct-2", "Brook", "middle", &story("two")),
    )
    .unwrap();
    let third = submit(
        &mut conn,
        &request("acct-3", "Casey", "newest", &story("three")),
    )
    .unwrap();

    // Pin distinct timestamps; same-millisecond submissions would otherwise
    // fall back to the uuid tiebreak.
    for (uuid, created_at) in [(first, 1_000), (second, 2_000), (third, 3_000)] {
        conn.execute(
            "UPDATE posts SET created_at = ?1 WHERE uuid = ?2;",
            rusqlite::params![created_at, uuid.to_string()],
        )
        .unwrap();
    }

    let repo = SqlitePostRepository::try_new(&mut conn).unwrap();
    let service = PostService::new(repo);

    let all = service.list_posts(&PostListQuery::default()).unwrap();
    assert_eq!(
        all.iter().map(|post| post.uuid).collect::<Vec<_>>(),
        vec![third, second, first]
    );

    let page = service
        .list_posts(&PostListQuery {
            limit: Some(1),
            offset: 1,
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].uuid, second);
}

#[test]
fn snapshot_sequence_reflects_writes_between_pulls() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timu.db");

    let mut writer_conn = open_db(&path).unwrap();
    let mut reader_conn = open_db(&path).unwrap();

    submit(
        &mut writer_conn,
        &request("acct-1", "Alex", "first", &story("one")),
    )
    .unwrap();

    let repo = SqlitePostRepository::try_new(&mut reader_conn).unwrap();
    let service = PostService::new(repo);
    let mut snapshots = service.snapshots(PostListQuery::default());

    let initial = snapshots.next().unwrap().unwrap();
    assert_eq!(initial.len(), 1);

    submit(
        &mut writer_conn,
        &request("acct-2", "Brook", "second", &story("two")),
    )
    .unwrap();

    let refreshed = snapshots.next().unwrap().unwrap();
    assert_eq!(refreshed.len(), 2);

    // Restarting the sequence observes the same state.
    drop(snapshots);
    let mut restarted = service.snapshots(PostListQuery::default());
    assert_eq!(restarted.next().unwrap().unwrap().len(), 2);
}
