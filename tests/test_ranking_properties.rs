mod common;

use common::{sample_profiles, setup};
use profilematch::domain::entities::search::SearchStatus;
use std::collections::BTreeSet;

const QUERIES: [&str; 4] = [
    "fintech expert",
    "react developer",
    "climate researcher carbon",
    "need a co-founder for a DeFi startup",
];

#[tokio::test]
async fn test_no_result_below_threshold() {
    let matcher = setup(sample_profiles()).await;
    for query in QUERIES {
        for threshold in [0.0, 0.05, 0.1, 0.2, 0.35, 0.5, 0.8] {
            let resp = matcher.search(query, 20, None, threshold).await.unwrap();
            assert!(
                resp.results.iter().all(|r| r.similarity_score >= threshold),
                "query {query:?} threshold {threshold}"
            );
        }
    }
}

#[tokio::test]
async fn test_result_count_never_exceeds_k() {
    let matcher = setup(sample_profiles()).await;
    for query in QUERIES {
        for k in 1..=6 {
            let resp = matcher.search(query, k, None, 0.0).await.unwrap();
            assert!(resp.results.len() <= k);
            assert_eq!(resp.total_found, resp.results.len());
        }
    }
}

#[tokio::test]
async fn test_results_are_in_score_group_order() {
    let matcher = setup(sample_profiles()).await;
    for query in QUERIES {
        let resp = matcher.search(query, 20, None, 0.0).await.unwrap();
        let buckets: Vec<i64> = resp
            .results
            .iter()
            .map(|r| (r.similarity_score * 100.0).round() as i64)
            .collect();
        assert!(buckets.windows(2).all(|w| w[0] >= w[1]), "query {query:?}: {buckets:?}");
    }
}

#[tokio::test]
async fn test_exclusion_removes_exactly_that_id() {
    let matcher = setup(sample_profiles()).await;
    let ids = |resp: &profilematch::domain::entities::search::SearchResponse| -> BTreeSet<i64> {
        resp.results.iter().map(|r| r.profile.id).collect()
    };

    for query in QUERIES {
        let all = matcher.search(query, 20, None, 0.0).await.unwrap();
        for excluded in 1..=6 {
            let without = matcher.search(query, 20, Some(excluded), 0.0).await.unwrap();
            let mut expected = ids(&all);
            expected.remove(&excluded);
            assert_eq!(ids(&without), expected, "query {query:?} excluding {excluded}");
        }

        let absent = matcher.search(query, 20, Some(999), 0.0).await.unwrap();
        assert_eq!(ids(&absent), ids(&all));
    }
}

#[tokio::test]
async fn test_repeated_searches_are_deterministic() {
    let matcher = setup(sample_profiles()).await;
    let first = matcher.search("react developer", 5, None, 0.0).await.unwrap();
    let second = matcher.search("react developer", 5, None, 0.0).await.unwrap();
    assert_eq!(first.status, SearchStatus::Success);
    let order = |r: &profilematch::domain::entities::search::SearchResponse| -> Vec<i64> {
        r.results.iter().map(|x| x.profile.id).collect()
    };
    assert_eq!(order(&first), order(&second));
    assert_eq!(first.top_match_explanation, second.top_match_explanation);
}
