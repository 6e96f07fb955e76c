use timu_core::{rank_posts, EmojiKind, Post, STORY_PREFIX};
use uuid::Uuid;

fn post_with_total(index: u32, total: u32) -> Post {
    let uuid = Uuid::parse_str(&format!("00000000-0000-4000-8000-{index:012}")).unwrap();
    let mut post = Post::with_id(
        uuid,
        format!("post {index}"),
        format!("{STORY_PREFIX}story {index}"),
        format!("acct-{index}"),
        format!("author-{index}"),
        i64::from(index),
    );
    // Spread the total across two emoji so ranking provably sums all kinds.
    let fire = total / 2;
    let sob = total - fire;
    post.reactions.insert(EmojiKind::Fire, fire);
    post.reactions.insert(EmojiKind::Sob, sob);
    post
}

#[test]
fn ranking_an_empty_snapshot_yields_nothing() {
    assert!(rank_posts(Vec::new()).is_empty());
}

#[test]
fn ranking_orders_by_total_descending() {
    let posts = vec![
        post_with_total(1, 2),
        post_with_total(2, 9),
        post_with_total(3, 4),
    ];

    let ranked = rank_posts(posts);

    assert_eq!(
        ranked
            .iter()
            .map(|row| row.total_reactions)
            .collect::<Vec<_>>(),
        vec![9, 4, 2]
    );
    assert_eq!(ranked[0].post.title, "post 2");
}

#[test]
fn ties_keep_input_order() {
    // Totals [3, 5, 5, 1] must rank as [idx1, idx2, idx0, idx3].
    let posts = vec![
        post_with_total(0, 3),
        post_with_total(1, 5),
        post_with_total(2, 5),
        post_with_total(3, 1),
    ];
    let expected: Vec<Uuid> = [1, 2, 0, 3]
        .iter()
        .map(|index| posts[*index as usize].uuid)
        .collect();

    let ranked = rank_posts(posts);

    assert_eq!(
        ranked.iter().map(|row| row.post.uuid).collect::<Vec<_>>(),
        expected
    );
}

#[test]
fn totals_sum_every_emoji_kind() {
    let uuid = Uuid::parse_str("00000000-0000-4000-8000-0000000000aa").unwrap();
    let mut post = Post::with_id(
        uuid,
        "all kinds",
        format!("{STORY_PREFIX}everything at once"),
        "acct-1",
        "Alex",
        1,
    );
    for (offset, emoji) in EmojiKind::ALL.into_iter().enumerate() {
        post.reactions.insert(emoji, offset as u32 + 1);
    }

    let ranked = rank_posts(vec![post]);
    assert_eq!(ranked[0].total_reactions, 1 + 2 + 3 + 4 + 5);
}
