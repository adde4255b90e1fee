use crate::error::ApiError;
use crate::models::{SentimentBreakdown, SentimentResponse, TagCount, TopVideo};
use crate::services::text_analysis::{
    LanguageDetector, SentimentClassifier, SentimentLabel, ENGLISH,
};
use crate::services::youtube_client::{SearchItem, SearchOrder, SearchRequest, VideoPlatform};
use crate::utils::{contains_ignore_case, percentage};
use log::{debug, info};
use std::collections::{HashMap, HashSet};

const TOP_VIDEOS_SEARCH_SIZE: u32 = 25;
const TOP_VIDEOS_LIMIT: usize = 5;

const TITLE_SEARCH_SIZE: u32 = 50;
const TITLE_SAMPLE_LIMIT: usize = 25;

const TRENDING_TAGS_LIMIT: usize = 15;
const MIN_TAG_CHARS: usize = 3;

pub async fn top_videos(
    platform: &dyn VideoPlatform,
    keyword: &str,
) -> Result<Vec<TopVideo>, ApiError> {
    let request =
        SearchRequest::exact_phrase(keyword, SearchOrder::ViewCount, TOP_VIDEOS_SEARCH_SIZE);
    let matches: Vec<SearchItem> = platform
        .search(&request)
        .await?
        .into_iter()
        .filter(|item| {
            contains_ignore_case(&item.title, keyword)
                || contains_ignore_case(&item.description, keyword)
        })
        .collect();

    if matches.is_empty() {
        info!("No videos mention {keyword:?}");
        return Ok(Vec::new());
    }

    let ids: Vec<String> = matches.iter().map(|item| item.video_id.clone()).collect();
    let views: HashMap<String, u64> = platform
        .details(&ids)
        .await?
        .into_iter()
        .map(|detail| (detail.video_id, detail.view_count))
        .collect();

    let mut videos: Vec<TopVideo> = matches
        .into_iter()
        .map(|item| TopVideo {
            views: views.get(&item.video_id).copied().unwrap_or(0),
            title: item.title,
            thumbnail: item.thumbnail_url,
            channel: item.channel_title,
            video_id: item.video_id,
        })
        .collect();
    videos.sort_by(|a, b| b.views.cmp(&a.views));
    videos.truncate(TOP_VIDEOS_LIMIT);

    Ok(videos)
}

fn is_english(detector: &dyn LanguageDetector, title: &str) -> bool {
    match detector.detect(title) {
        Ok(language) => language == ENGLISH,
        Err(e) => {
            debug!("Skipping title {title:?}: {e}");
            false
        }
    }
}

/// Walk search results in order and keep up to `limit` English titles
/// accepted by `keep`. With `distinct_titles` a repeated title is skipped.
fn collect_english_titles<'a>(
    items: &'a [SearchItem],
    detector: &dyn LanguageDetector,
    limit: usize,
    distinct_titles: bool,
    keep: impl Fn(&SearchItem) -> bool,
) -> Vec<&'a SearchItem> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for item in items {
        if kept.len() >= limit {
            break;
        }
        if (distinct_titles && seen.contains(item.title.as_str())) || !keep(item) {
            continue;
        }
        if is_english(detector, &item.title) {
            seen.insert(item.title.as_str());
            kept.push(item);
        }
    }

    kept
}

pub async fn sentiment_distribution(
    platform: &dyn VideoPlatform,
    detector: &dyn LanguageDetector,
    classifier: &dyn SentimentClassifier,
    keyword: &str,
) -> Result<SentimentResponse, ApiError> {
    let request = SearchRequest::exact_phrase(keyword, SearchOrder::Date, TITLE_SEARCH_SIZE);
    let items = platform.search(&request).await?;
    let titles = collect_english_titles(&items, detector, TITLE_SAMPLE_LIMIT, true, |item| {
        contains_ignore_case(&item.title, keyword)
    });

    let mut counts = SentimentBreakdown::<u32>::default();
    for item in &titles {
        let scores = classifier.classify(&item.title).await?;
        match scores.top_label() {
            SentimentLabel::Negative => counts.negative += 1,
            SentimentLabel::Neutral => counts.neutral += 1,
            SentimentLabel::Positive => counts.positive += 1,
        }
    }

    let total = counts.negative + counts.neutral + counts.positive;
    info!(
        "Sentiment for {keyword:?} over {total} titles: {}/{}/{} (neg/neu/pos)",
        counts.negative, counts.neutral, counts.positive
    );

    Ok(SentimentResponse {
        sentiment_counts: counts,
        sentiment_percentages: SentimentBreakdown {
            negative: percentage(counts.negative, total),
            neutral: percentage(counts.neutral, total),
            positive: percentage(counts.positive, total),
        },
        total_analyzed: total,
    })
}

pub async fn trending_tags(
    platform: &dyn VideoPlatform,
    detector: &dyn LanguageDetector,
    keyword: &str,
) -> Result<Vec<TagCount>, ApiError> {
    let request = SearchRequest::exact_phrase(keyword, SearchOrder::Relevance, TITLE_SEARCH_SIZE);
    let items = platform.search(&request).await?;
    let matches = collect_english_titles(&items, detector, TITLE_SAMPLE_LIMIT, false, |item| {
        contains_ignore_case(&item.title, keyword)
    });

    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = matches.iter().map(|item| item.video_id.clone()).collect();
    let details = platform.details(&ids).await?;

    let tags = count_tags(details.into_iter().flat_map(|detail| detail.tags), keyword);
    debug!("Found {} distinct tags for {keyword:?}", tags.len());
    Ok(tags)
}

/// Count tag occurrences, dropping tags that repeat the keyword or are too
/// short, most frequent first. Equal counts keep first-seen order.
fn count_tags(tags: impl IntoIterator<Item = String>, keyword: &str) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for tag in tags {
        if contains_ignore_case(&tag, keyword) || tag.chars().count() < MIN_TAG_CHARS {
            continue;
        }
        match positions.get(&tag) {
            Some(&index) => counts[index].count += 1,
            None => {
                positions.insert(tag.clone(), counts.len());
                counts.push(TagCount { tag, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TRENDING_TAGS_LIMIT);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::services::testing::{FakeDetector, FakeVideoPlatform, FixedClassifier};
    use crate::services::text_analysis::SentimentScores;
    use crate::services::youtube_client::VideoDetail;

    fn item(id: &str, title: &str, description: &str) -> SearchItem {
        SearchItem {
            video_id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            channel_title: format!("channel-{id}"),
            thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
        }
    }

    fn detail(id: &str, views: u64, tags: &[&str]) -> VideoDetail {
        VideoDetail {
            video_id: id.to_string(),
            view_count: views,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn top_videos_keeps_only_keyword_matches_sorted_by_views() {
        let platform = FakeVideoPlatform::new(
            vec![
                item("a", "Matcha latte recipe", ""),
                item("b", "Morning routine", "with MATCHA"),
                item("c", "Coffee review", "no mention"),
                item("d", "matcha vs coffee", ""),
                item("e", "Best Matcha", ""),
                item("f", "Iced matcha", ""),
                item("g", "Matcha cake", ""),
            ],
            vec![
                detail("a", 300, &[]),
                detail("b", 900, &[]),
                detail("c", 10_000, &[]),
                detail("d", 50, &[]),
                detail("e", 700, &[]),
                detail("f", 100, &[]),
                detail("g", 800, &[]),
            ],
        );

        let videos = top_videos(&platform, "matcha").await.unwrap();
        let ids: Vec<&str> = videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "g", "e", "a", "f"]);
        assert!(videos.windows(2).all(|w| w[0].views > w[1].views));
        assert_eq!(videos[0].channel, "channel-b");
        assert_eq!(videos[0].thumbnail, "https://i.ytimg.com/vi/b/hqdefault.jpg");

        let request = platform.last_search().unwrap();
        assert_eq!(request.query, "\"matcha\"");
        assert_eq!(request.order, SearchOrder::ViewCount);
        assert_eq!(request.max_results, 25);
        assert!(!platform.requested_ids().contains(&"c".to_string()));
    }

    #[tokio::test]
    async fn top_videos_without_matches_is_empty() {
        let platform = FakeVideoPlatform::new(vec![item("a", "Coffee", "beans")], vec![]);
        let videos = top_videos(&platform, "matcha").await.unwrap();
        assert!(videos.is_empty());
        assert!(platform.requested_ids().is_empty());
    }

    #[tokio::test]
    async fn search_failure_aborts_top_videos() {
        let platform = FakeVideoPlatform::failing();
        let err = top_videos(&platform, "matcha").await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(ProviderError::Api { .. })));
    }

    #[tokio::test]
    async fn all_positive_titles_give_full_positive_share() {
        let platform = FakeVideoPlatform::new(
            vec![
                item("a", "Great kombucha", ""),
                item("b", "Kombucha at home", ""),
                item("c", "Kombucha taste test", ""),
            ],
            vec![],
        );
        let classifier = FixedClassifier(SentimentScores {
            negative: 0.1,
            neutral: 0.2,
            positive: 0.7,
        });

        let response =
            sentiment_distribution(&platform, &FakeDetector::english(), &classifier, "kombucha")
                .await
                .unwrap();

        assert_eq!(
            response.sentiment_counts,
            SentimentBreakdown {
                negative: 0,
                neutral: 0,
                positive: 3
            }
        );
        assert_eq!(
            response.sentiment_percentages,
            SentimentBreakdown {
                negative: 0.0,
                neutral: 0.0,
                positive: 100.0
            }
        );
        assert_eq!(response.total_analyzed, 3);
        assert_eq!(platform.last_search().unwrap().order, SearchOrder::Date);
        assert_eq!(platform.last_search().unwrap().max_results, 50);
    }

    #[tokio::test]
    async fn sentiment_skips_duplicates_foreign_and_undetectable_titles() {
        let platform = FakeVideoPlatform::new(
            vec![
                item("a", "Kombucha review", ""),
                item("b", "Kombucha review", ""),
                item("c", "Reseña de kombucha", ""),
                item("d", "???", ""),
                item("e", "Kombucha fail", ""),
            ],
            vec![],
        );
        let detector = FakeDetector::english()
            .with("Reseña de kombucha", Ok("spa"))
            .with("???", Err(()));

        let response = sentiment_distribution(
            &platform,
            &detector,
            &crate::services::text_analysis::LexiconClassifier,
            "kombucha",
        )
        .await
        .unwrap();

        assert_eq!(response.total_analyzed, 2);
        assert_eq!(response.sentiment_counts.negative, 1);
        assert_eq!(response.sentiment_counts.neutral, 1);
        assert_eq!(response.sentiment_percentages.negative, 50.0);
    }

    #[tokio::test]
    async fn sentiment_ignores_titles_without_the_keyword() {
        let platform = FakeVideoPlatform::new(
            vec![
                item("a", "Matcha review", ""),
                item("b", "My morning routine", "made with matcha"),
            ],
            vec![],
        );
        let classifier = FixedClassifier(SentimentScores {
            negative: 0.0,
            neutral: 0.0,
            positive: 1.0,
        });

        let response =
            sentiment_distribution(&platform, &FakeDetector::english(), &classifier, "matcha")
                .await
                .unwrap();

        assert_eq!(response.total_analyzed, 1);
        assert_eq!(response.sentiment_counts.positive, 1);
    }

    #[tokio::test]
    async fn sentiment_stops_at_twenty_five_titles() {
        let items: Vec<SearchItem> = (0..40)
            .map(|i| item(&format!("v{i}"), &format!("Protein bar video {i}"), ""))
            .collect();
        let platform = FakeVideoPlatform::new(items, vec![]);
        let classifier = FixedClassifier(SentimentScores {
            negative: 0.0,
            neutral: 1.0,
            positive: 0.0,
        });

        let response = sentiment_distribution(
            &platform,
            &FakeDetector::english(),
            &classifier,
            "protein bar",
        )
        .await
        .unwrap();

        assert_eq!(response.total_analyzed, 25);
        assert_eq!(response.sentiment_percentages.neutral, 100.0);
    }

    #[tokio::test]
    async fn no_titles_gives_zero_percentages() {
        let platform = FakeVideoPlatform::new(vec![], vec![]);
        let response = sentiment_distribution(
            &platform,
            &FakeDetector::english(),
            &crate::services::text_analysis::LexiconClassifier,
            "kombucha",
        )
        .await
        .unwrap();

        assert_eq!(response.total_analyzed, 0);
        assert_eq!(response.sentiment_percentages, SentimentBreakdown::default());
    }

    #[tokio::test]
    async fn trending_tags_drop_keyword_and_short_tags() {
        let platform = FakeVideoPlatform::new(
            vec![
                item("a", "Oat milk latte", ""),
                item("b", "Barista oat milk", ""),
                item("c", "Almond drink", ""),
                item("d", "Lait d'avoine oat milk", ""),
            ],
            vec![
                detail("a", 0, &["Oat Milk", "vegan", "tv", "dairy free", "latte"]),
                detail("b", 0, &["vegan", "tv", "barista", "best oat milk", "latte"]),
                detail("c", 0, &["vegan", "almond"]),
                detail("d", 0, &["vegan", "french"]),
            ],
        );
        let detector = FakeDetector::english().with("Lait d'avoine oat milk", Ok("fra"));

        let tags = trending_tags(&platform, &detector, "oat milk").await.unwrap();

        assert_eq!(
            tags,
            vec![
                TagCount { tag: "vegan".into(), count: 2 },
                TagCount { tag: "latte".into(), count: 2 },
                TagCount { tag: "dairy free".into(), count: 1 },
                TagCount { tag: "barista".into(), count: 1 },
            ]
        );
        assert_eq!(platform.requested_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn trending_tags_count_videos_sharing_a_title() {
        let platform = FakeVideoPlatform::new(
            vec![item("a", "Matcha latte", ""), item("b", "Matcha latte", "")],
            vec![detail("a", 0, &["vegan"]), detail("b", 0, &["vegan"])],
        );

        let tags = trending_tags(&platform, &FakeDetector::english(), "matcha")
            .await
            .unwrap();

        assert_eq!(tags, vec![TagCount { tag: "vegan".into(), count: 2 }]);
        assert_eq!(platform.requested_ids(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn tag_counts_are_capped_at_fifteen() {
        let tags = (0..20).flat_map(|i| std::iter::repeat(format!("tag{i:02}")).take(20 - i));
        let counted = count_tags(tags, "matcha");
        assert_eq!(counted.len(), 15);
        assert_eq!(counted[0], TagCount { tag: "tag00".into(), count: 20 });
        assert!(counted.windows(2).all(|w| w[0].count >= w[1].count));
    }
}
