use std::collections::HashMap;
use std::sync::Arc;

use chrono_tz::Tz;
use cleanblog::application::posts::{
    POSTS_CREATED_METRIC, POSTS_DELETED_METRIC, POSTS_UPDATED_METRIC, PostContent, PostService,
    PostServiceError,
};
use cleanblog::application::repos::{PostsRepo, PostsWriteRepo};
use cleanblog::infra::db::SqliteRepositories;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use sqlx::SqlitePool;

fn content(title: &str) -> PostContent {
    PostContent {
        title: title.to_string(),
        subtitle: "Measured".to_string(),
        author: "Metrics".to_string(),
        img_url: "https://images.example.com/chart.png".to_string(),
        body: "<p>Counting things.</p>".to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn post_writes_emit_counters(pool: SqlitePool) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let repos = Arc::new(SqliteRepositories::new(pool));
    let reader: Arc<dyn PostsRepo> = repos.clone();
    let writer: Arc<dyn PostsWriteRepo> = repos;
    let service = PostService::new(reader, writer, Tz::UTC);

    let first = service.create_post(content("One")).await.expect("create");
    service.create_post(content("Two")).await.expect("create");
    service
        .update_post(first.id, content("One, revised"))
        .await
        .expect("update");
    service.delete_post(first.id).await.expect("delete");

    // Failed writes are not counted.
    assert!(matches!(
        service.create_post(content("Two")).await,
        Err(PostServiceError::DuplicateTitle(_))
    ));
    assert!(matches!(
        service.delete_post(first.id).await,
        Err(PostServiceError::NotFound(_))
    ));

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    assert_eq!(counters.get(POSTS_CREATED_METRIC), Some(&2));
    assert_eq!(counters.get(POSTS_UPDATED_METRIC), Some(&1));
    assert_eq!(counters.get(POSTS_DELETED_METRIC), Some(&1));
}
