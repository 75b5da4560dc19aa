// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use futures::{pin_mut, Stream, StreamExt};

use crate::errors::{AggregateError, SourceError};

/// Drains a result stream into the values that succeeded plus one joined
/// error covering everything that failed.
///
/// Successful values keep their original relative order; failed items are
/// skipped, never inserted as placeholders. Partial results are always
/// returned alongside the joined error. An empty stream yields an empty list
/// and no error.
///
/// This is the one reduction used everywhere: over a single source's stream
/// and over the engine's fan-in stream alike.
pub async fn collect<T, S>(stream: S) -> (Vec<T>, Option<AggregateError>)
where
    S: Stream<Item = Result<T, SourceError>>,
{
    pin_mut!(stream);

    let mut results = Vec::new();
    let mut errors = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(value) => results.push(value),
            Err(err) => errors.push(err),
        }
    }

    (results, AggregateError::join(errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn ok(value: &str) -> Result<String, SourceError> {
        Ok(value.to_string())
    }

    fn fail(source: &str, reason: &str) -> Result<String, SourceError> {
        Err(SourceError::parse(source, reason))
    }

    #[tokio::test]
    async fn empty_stream() {
        let (results, err) = collect(stream::iter(Vec::<Result<String, SourceError>>::new())).await;

        assert!(results.is_empty());
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn all_successful() {
        let (results, err) = collect(stream::iter(vec![ok("one"), ok("two"), ok("three")])).await;

        assert_eq!(results, vec!["one", "two", "three"]);
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn all_errors() {
        let (results, err) =
            collect(stream::iter(vec![fail("a", "error one"), fail("b", "error two")])).await;

        assert!(results.is_empty());
        let err = err.unwrap();
        assert_eq!(err.len(), 2);
        assert_eq!(err.errors()[0].source_name(), "a");
        assert_eq!(err.errors()[1].source_name(), "b");
    }

    #[tokio::test]
    async fn mixed_results_and_errors() {
        let (results, err) = collect(stream::iter(vec![
            ok("one"),
            fail("a", "error one"),
            ok("two"),
            fail("b", "error two"),
        ]))
        .await;

        assert_eq!(results, vec!["one", "two"]);
        let err = err.unwrap();
        assert_eq!(err.len(), 2);
        assert!(err.errors()[0].to_string().contains("error one"));
        assert!(err.errors()[1].to_string().contains("error two"));
    }

    #[tokio::test]
    async fn single_result() {
        let (results, err) = collect(stream::iter(vec![ok("only")])).await;

        assert_eq!(results, vec!["only"]);
        assert!(err.is_none());
    }

    #[tokio::test]
    async fn single_error() {
        let (results, err) = collect(stream::iter(vec![fail("a", "error one")])).await;

        assert!(results.is_empty());
        assert_eq!(err.unwrap().len(), 1);
    }
}
