use anyhow::Result;

use engage_store::{
    ActivityLoader, CommentRepository, Database, LikeRepository, PostRepository,
    ReportRepository, StoreError, UserRepository,
};
use engage_types::{parse_timestamp, ActivityRecord, NewLike, TableCounts};

fn johndoe_record() -> Result<ActivityRecord> {
    Ok(ActivityRecord {
        user_id: 1,
        username: "johndoe".to_string(),
        email: "john@example.com".to_string(),
        post_id: 101,
        post_content: "Just finished my first marathon!".to_string(),
        post_date: parse_timestamp("2023-01-15 10:30:00")?,
        likes: 5,
        comments: 3,
    })
}

fn fresh_database() -> Result<Database> {
    let db = Database::in_memory()?;
    db.initialize()?;
    Ok(db)
}

/// Load one record, check the normalized shape, then like the post by hand
#[test]
fn test_single_record_end_to_end() -> Result<()> {
    let db = fresh_database()?;
    let pool = db.pool.clone();

    let summary = ActivityLoader::new(pool.clone()).load(&[johndoe_record()?])?;
    assert_eq!(summary.records, 1);

    assert_eq!(
        db.table_counts()?,
        TableCounts {
            users: 1,
            posts: 1,
            likes: 5,
            comments: 3,
            staged: 1,
        }
    );

    let posts = PostRepository::new(pool.clone());
    assert_eq!(posts.get_by_id(101)?.map(|p| p.likes_count), Some(5));

    let user = UserRepository::new(pool.clone())
        .get_by_username("johndoe")?
        .expect("johndoe should exist");
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "john@example.com");

    LikeRepository::new(pool.clone()).record_like(&NewLike {
        post_id: 101,
        user_id: 1,
        liked_at: parse_timestamp("2023-01-16 09:00:00")?,
    })?;
    assert_eq!(posts.get_by_id(101)?.map(|p| p.likes_count), Some(6));
    assert!(posts.like_count_drift()?.is_empty());

    let top = ReportRepository::new(pool.clone()).top_engagement(10)?;
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].username, "johndoe");
    assert_eq!((top[0].total_likes, top[0].total_comments), (6, 3));

    assert_eq!(CommentRepository::new(pool).count_for_post(101)?, 3);
    Ok(())
}

#[test]
fn test_like_on_missing_post_changes_nothing() -> Result<()> {
    let db = fresh_database()?;
    let pool = db.pool.clone();
    ActivityLoader::new(pool.clone()).load(&[johndoe_record()?])?;

    let result = LikeRepository::new(pool.clone()).record_like(&NewLike {
        post_id: 999,
        user_id: 1,
        liked_at: parse_timestamp("2023-01-16 09:00:00")?,
    });
    assert!(matches!(result, Err(StoreError::ReferentialIntegrity(_))));

    assert_eq!(db.table_counts()?.likes, 5);
    assert_eq!(
        PostRepository::new(pool).get_by_id(101)?.map(|p| p.likes_count),
        Some(5)
    );
    Ok(())
}

#[test]
fn test_sample_dataset_reports() -> Result<()> {
    let db = fresh_database()?;
    let pool = db.pool.clone();
    let records = engage_store::sample_records()?;
    ActivityLoader::new(pool.clone()).load(&records)?;

    let reports = ReportRepository::new(pool);

    let top = reports.top_engagement(3)?;
    assert_eq!(top.len(), 3);
    assert_eq!(top[0].post_id, 107);

    // Every post is ranked, with rank 1 at the top
    let ranked = reports.ranked_engagement()?;
    assert_eq!(ranked.len(), records.len());
    assert_eq!(ranked[0].rank, 1);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));

    // Posts 104 and 105 carry identical counts and so share a rank
    let rank_of = |id: i64| ranked.iter().find(|r| r.post_id == id).map(|r| r.rank);
    assert_eq!(rank_of(104), rank_of(105));

    let by_user = reports.user_report()?;
    assert_eq!(by_user.len(), records.len());
    assert!(by_user
        .windows(2)
        .all(|w| w[0].username <= w[1].username));
    Ok(())
}
