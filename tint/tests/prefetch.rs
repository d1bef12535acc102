//! Prefetch decisions taken when decorating with a repository.

use std::sync::Arc;

use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::{Call, DynamicRecord, MemoryRepository};
use tint::schema::SchemaTree;
use tint::{
    AssociationOptions, DecorationContext, DecoratorClass, KeyCasing, ParentLink, RecordId,
    RecordRef, TintError,
};

struct Classes {
    comments: DecoratorClass,
    posts: DecoratorClass,
}

#[fixture]
fn classes() -> Result<Classes> {
    let comments = DecoratorClass::builder("CommentDecorator")
        .attributes(["body"])
        .eager_load(["author"])
        .build()?;
    let posts = DecoratorClass::builder("PostDecorator")
        .attributes(["title"])
        .decorates_association("comments", AssociationOptions::new().with(&comments))
        .build()?;
    Ok(Classes { comments, posts })
}

fn post(title: &str) -> RecordRef {
    Arc::new(
        DynamicRecord::new("Post")
            .with_id(1)
            .with_field("title", json!(title))
            .with_many(
                "comments",
                vec![Arc::new(DynamicRecord::new("Comment").with_id(10).with_field("body", json!("hi")))],
            ),
    )
}

fn includes(class: &DecoratorClass) -> SchemaTree {
    class.eager_loads().clone()
}

fn context(repository: &Arc<MemoryRepository>) -> DecorationContext {
    DecorationContext::new().with_repository(Arc::clone(repository) as _)
}

#[rstest]
fn single_records_are_refetched_with_includes(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(MemoryRepository::new().with_record(post("fetched")));
    let decorated = posts.decorate(post("stale"), context(&repository))?;

    ensure!(
        repository.calls()
            == [Call::FetchByIdWithIncludes {
                model: "Post".into(),
                id: RecordId::Int(1),
                includes: includes(&posts),
            }],
        "unexpected calls {:?}",
        repository.calls()
    );
    let projected = decorated.as_json_with(KeyCasing::Identity)?;
    ensure!(
        projected == json!({"title": "fetched", "comments": [{"body": "hi"}]}),
        "unexpected projection {projected}"
    );
    Ok(())
}

#[rstest]
fn children_covered_by_the_parent_tree_are_not_refetched(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(MemoryRepository::new().with_record(post("fetched")));
    let decorated = posts.decorate(post("stale"), context(&repository))?;
    decorated.as_json()?;
    ensure!(repository.calls().len() == 1, "unexpected calls {:?}", repository.calls());
    Ok(())
}

#[rstest]
fn children_outside_the_parent_tree_are_refetched(classes: Result<Classes>) -> Result<()> {
    let Classes { comments, posts } = classes?;
    let repository = Arc::new(MemoryRepository::new());
    let comment: RecordRef = Arc::new(DynamicRecord::new("Comment").with_id(10));
    let covered = context(&repository).with_parent(ParentLink::new(posts.clone(), ["comments"]));
    comments.decorate_collection(vec![Arc::clone(&comment)], covered)?;
    ensure!(repository.calls().is_empty(), "unexpected calls {:?}", repository.calls());

    let uncovered = context(&repository).with_parent(ParentLink::new(posts, ["replies"]));
    comments.decorate_collection(vec![comment], uncovered)?;
    ensure!(
        repository.calls()
            == [Call::FetchCollectionWithIncludes {
                model: "Comment".into(),
                count: 1,
                includes: includes(&comments),
            }],
        "unexpected calls {:?}",
        repository.calls()
    );
    Ok(())
}

#[rstest]
fn collections_are_fetched_in_one_call(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(MemoryRepository::new());
    let records: Vec<RecordRef> = (1..=3)
        .map(|id| Arc::new(DynamicRecord::new("Post").with_id(id)) as RecordRef)
        .collect();
    let decorated = posts.decorate_collection(records, context(&repository))?;
    ensure!(decorated.len() == 3);
    ensure!(
        repository.calls()
            == [Call::FetchCollectionWithIncludes {
                model: "Post".into(),
                count: 3,
                includes: includes(&posts),
            }],
        "unexpected calls {:?}",
        repository.calls()
    );
    Ok(())
}

#[rstest]
#[case::loaded_cache(true, None)]
#[case::no_includes(false, Some(MemoryRepository::new().without_includes("Post")))]
#[case::no_find_by_id(false, Some(MemoryRepository::new().without_find_by_id("Post")))]
fn prefetch_is_suppressed(
    classes: Result<Classes>,
    #[case] mark_loaded: bool,
    #[case] repository: Option<MemoryRepository>,
) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(repository.unwrap_or_default());
    let record = post("stale");
    if mark_loaded {
        repository.mark_loaded(record.as_ref());
    }
    let decorated = posts.decorate(record, context(&repository))?;
    ensure!(repository.calls().is_empty(), "unexpected calls {:?}", repository.calls());
    ensure!(decorated.field("title") == Some(json!("stale")));
    Ok(())
}

#[rstest]
fn records_without_ids_are_not_refetched(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(MemoryRepository::new());
    posts.decorate(Arc::new(DynamicRecord::new("Post")), context(&repository))?;
    ensure!(repository.calls().is_empty());
    Ok(())
}

#[rstest]
fn classes_without_trees_never_fetch() -> Result<()> {
    let plain = DecoratorClass::builder("PlainDecorator")
        .attributes(["title"])
        .build()?;
    let repository = Arc::new(MemoryRepository::new());
    plain.decorate(post("stale"), context(&repository))?;
    ensure!(repository.calls().is_empty());
    Ok(())
}

#[rstest]
fn fetch_failures_propagate(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(MemoryRepository::new().failing("connection reset"));
    let err = posts
        .decorate(post("stale"), context(&repository))
        .err()
        .ok_or_else(|| anyhow!("decoration unexpectedly succeeded"))?;
    ensure!(matches!(err, TintError::Fetch { ref model, .. } if model == "Post"));
    ensure!(err.to_string() == "failed to fetch 'Post': connection reset", "{err}");
    Ok(())
}

#[rstest]
fn records_can_be_decorated_by_id(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let plain = DecoratorClass::builder("PlainDecorator")
        .attributes(["title"])
        .build()?;
    let repository = Arc::new(MemoryRepository::new().with_record(post("stored")));

    let decorated = posts.decorate_id("Post", &RecordId::Int(1), context(&repository))?;
    ensure!(decorated.field("title") == Some(json!("stored")));
    plain.decorate_id("Post", &RecordId::Int(1), context(&repository))?;
    ensure!(
        repository.calls()
            == [
                Call::FetchByIdWithIncludes {
                    model: "Post".into(),
                    id: RecordId::Int(1),
                    includes: includes(&posts),
                },
                Call::FetchById {
                    model: "Post".into(),
                    id: RecordId::Int(1),
                },
            ],
        "unexpected calls {:?}",
        repository.calls()
    );
    Ok(())
}

#[rstest]
fn decorating_by_id_without_lookup_support_uses_a_plain_fetch(
    classes: Result<Classes>,
) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let repository = Arc::new(
        MemoryRepository::new()
            .without_find_by_id("Post")
            .with_record(post("stored")),
    );
    let decorated = posts.decorate_id("Post", &RecordId::Int(1), context(&repository))?;
    ensure!(decorated.field("title") == Some(json!("stored")));
    ensure!(
        repository.calls()
            == [Call::FetchById {
                model: "Post".into(),
                id: RecordId::Int(1),
            }],
        "unexpected calls {:?}",
        repository.calls()
    );
    Ok(())
}

#[rstest]
fn decorating_by_id_needs_a_repository(classes: Result<Classes>) -> Result<()> {
    let Classes { posts, .. } = classes?;
    let result = posts.decorate_id("Post", &RecordId::Int(1), DecorationContext::new());
    ensure!(matches!(result, Err(TintError::MissingRepository { .. })));
    Ok(())
}
