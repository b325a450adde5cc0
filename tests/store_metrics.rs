use std::collections::HashMap;

use metrics::Unit;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use postbox::application::store::PostStore;
use postbox::domain::posts::{NewPost, PostPatch};
use postbox::infra::telemetry;

#[test]
fn store_mutations_emit_expected_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let store = PostStore::seeded();
    let post = store
        .insert(NewPost {
            title: Some("Metrics".to_string()),
            content: Some("body".to_string()),
        })
        .expect("insert");
    store
        .update(
            post.id,
            PostPatch {
                title: Some("Metrics, revised".to_string()),
                content: None,
            },
        )
        .expect("update");
    store.delete(1).expect("delete");
    assert!(store.delete(1).is_err());

    let metrics: HashMap<String, (Option<Unit>, DebugValue)> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, unit, _, value)| {
            (composite_key.key().name().to_string(), (unit, value))
        })
        .collect();

    for name in [
        "postbox_posts_created_total",
        "postbox_posts_updated_total",
        "postbox_posts_deleted_total",
        "postbox_posts_stored",
    ] {
        let (unit, _) = metrics
            .get(name)
            .unwrap_or_else(|| panic!("missing metric: {name}"));
        assert_eq!(*unit, Some(Unit::Count), "unit for {name}");
    }

    assert_eq!(
        metrics["postbox_posts_created_total"].1,
        DebugValue::Counter(1)
    );
    assert_eq!(
        metrics["postbox_posts_deleted_total"].1,
        DebugValue::Counter(1)
    );
}
