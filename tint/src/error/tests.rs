//! Unit tests for error construction and declaration collection.

use rstest::rstest;

use super::{DeclarationErrors, TintError};

fn declaration(message: &str) -> TintError {
    TintError::invalid_declaration("SampleDecorator", message)
}

#[rstest]
fn nothing_recorded_collects_to_none() {
    assert!(DeclarationErrors::collect("SampleDecorator", Vec::new()).is_none());
}

#[rstest]
fn single_error_is_returned_unchanged() {
    let outcome = DeclarationErrors::collect("SampleDecorator", vec![declaration("empty path")]);
    assert!(
        matches!(outcome, Some(TintError::InvalidDeclaration { ref message, .. }) if message == "empty path"),
        "expected InvalidDeclaration, got {outcome:?}"
    );
}

#[rstest]
fn several_errors_render_one_line_per_rejection() {
    let outcome = DeclarationErrors::collect(
        "SampleDecorator",
        vec![
            declaration("attribute names must not be empty"),
            TintError::UnknownDecorator {
                name: "AuthorDecorator".into(),
            },
        ],
    );
    let Some(TintError::Declarations(rejected)) = outcome else {
        panic!("expected several declaration errors");
    };
    assert_eq!(rejected.class(), "SampleDecorator");
    assert_eq!(rejected.iter().count(), 2);
    assert_eq!(
        rejected.to_string(),
        "SampleDecorator: attribute names must not be empty\n\
         SampleDecorator: no decorator class named 'AuthorDecorator' is registered"
    );
    let err = TintError::Declarations(rejected);
    assert!(err.to_string().starts_with("2 declarations rejected\nSampleDecorator: "));
}

#[test]
fn fetch_errors_keep_their_source() {
    let err = TintError::fetch("Post", "connection reset".into());
    assert_eq!(err.to_string(), "failed to fetch 'Post': connection reset");
    assert!(std::error::Error::source(&err).is_some());
}
