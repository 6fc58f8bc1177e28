//! Aggregation of per-source outcomes and ranking into the final digest.

use crate::feeds::FeedOutcome;
use crate::models::{Article, RankedDigest};

/// Articles gathered from every source plus the names of sources that failed.
#[derive(Debug, Default)]
pub struct Aggregate {
    /// All articles in registry order, then per-source document order.
    pub articles: Vec<Article>,
    pub failed_sources: Vec<String>,
}

/// Concatenate outcomes in the order given.
///
/// A failed source contributes nothing but its name; it never stops the
/// remaining sources from being collected.
pub fn aggregate(outcomes: Vec<FeedOutcome>) -> Aggregate {
    outcomes
        .into_iter()
        .fold(Aggregate::default(), |mut acc, outcome| {
            match outcome.result {
                Ok(articles) => acc.articles.extend(articles),
                Err(_) => acc.failed_sources.push(outcome.source.source_name),
            }
            acc
        })
}

/// Keep positively scored articles, best first, at most `max_articles` of them.
///
/// The sort is stable: equal scores stay in the order they were encountered.
pub fn rank(mut articles: Vec<Article>, max_articles: usize) -> RankedDigest {
    articles.retain(|a| a.score > 0);
    articles.sort_by(|a, b| b.score.cmp(&a.score));
    articles.truncate(max_articles);
    RankedDigest::from_ranked(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::fetch::FetchError;
    use crate::models::{FeedSource, Topic};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn article(title: &str, score: i64) -> Article {
        Article {
            title: title.to_string(),
            link: format!("https://example.com/{title}"),
            description: String::new(),
            pub_date: String::new(),
            source: "Example".to_string(),
            topic: Topic::Technology,
            score,
        }
    }

    fn titles(digest: &RankedDigest) -> Vec<&str> {
        digest.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_rank_truncates_to_best() {
        let digest = rank(vec![article("a", 30), article("b", 10), article("c", 20)], 2);
        let scores: Vec<i64> = digest.iter().map(|a| a.score).collect();
        assert_eq!(scores, vec![30, 20]);
    }

    #[test]
    fn test_rank_ties_keep_encounter_order() {
        let digest = rank(vec![article("A", 12), article("B", 12)], 30);
        assert_eq!(titles(&digest), vec!["A", "B"]);
    }

    #[test]
    fn test_rank_drops_zero_and_negative() {
        let digest = rank(vec![article("zero", 0), article("neg", -45), article("pos", 1)], 30);
        assert_eq!(titles(&digest), vec!["pos"]);
    }

    #[test]
    fn test_rank_empty_input() {
        assert!(rank(Vec::new(), 30).is_empty());
    }

    #[test]
    fn test_aggregate_isolates_failures() {
        let ok = |name: &str, arts: Vec<Article>| FeedOutcome {
            source: FeedSource::new("https://example.com", Topic::Science, name, 5),
            result: Ok(arts),
        };
        let outcomes = vec![
            ok("First", vec![article("a", 5)]),
            FeedOutcome {
                source: FeedSource::new("https://example.com", Topic::Science, "Down", 5),
                result: Err(FetchError::Timeout),
            },
            ok("Third", vec![article("b", 7), article("c", 1)]),
        ];

        let agg = aggregate(outcomes);
        let collected: Vec<&str> = agg.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(collected, vec!["a", "b", "c"]);
        assert_eq!(agg.failed_sources, vec!["Down".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_rank_invariants(
            scores in prop::collection::vec(-60i64..60, 0..80),
            max in 1usize..40,
        ) {
            let input: Vec<Article> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| article(&i.to_string(), *s))
                .collect();
            let digest = rank(input, max);

            prop_assert!(digest.len() <= max);
            prop_assert!(digest.iter().all(|a| a.score > 0));

            let ranked: Vec<&Article> = digest.iter().collect();
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    let i: usize = pair[0].title.parse().unwrap();
                    let j: usize = pair[1].title.parse().unwrap();
                    prop_assert!(i < j);
                }
            }

            let positives = scores.iter().filter(|s| **s > 0).count();
            prop_assert_eq!(digest.len(), positives.min(max));
        }
    }
}
