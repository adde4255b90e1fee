use crate::error::ProviderError;
use lazy_static::lazy_static;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// ISO 639-3 code reported for English text.
pub const ENGLISH: &str = "eng";

pub trait LanguageDetector: Send + Sync {
    /// Language code of `text`; fails when the text is too short or ambiguous.
    fn detect(&self, text: &str) -> Result<String, ProviderError>;
}

pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String, ProviderError> {
        whatlang::detect(text)
            .map(|info| info.lang().code().to_string())
            .ok_or_else(|| ProviderError::Detection(format!("no language found in {text:?}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    Negative,
    Neutral,
    Positive,
}

/// Probability of each class for one text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentScores {
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
}

impl SentimentScores {
    /// Highest-probability class; ties go to the earlier of Negative, Neutral, Positive.
    pub fn top_label(&self) -> SentimentLabel {
        let mut best = (SentimentLabel::Negative, self.negative);
        for candidate in [
            (SentimentLabel::Neutral, self.neutral),
            (SentimentLabel::Positive, self.positive),
        ] {
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        best.0
    }

    fn from_weights(negative: f64, neutral: f64, positive: f64) -> Self {
        let total = negative + neutral + positive;
        if total <= 0.0 {
            return Self {
                neutral: 1.0,
                ..Self::default()
            };
        }
        Self {
            negative: negative / total,
            neutral: neutral / total,
            positive: positive / total,
        }
    }
}

#[rocket::async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentScores, ProviderError>;
}

/// Three-class sentiment model served by a Hugging Face style inference endpoint.
pub struct InferenceClassifier {
    client: Client,
    endpoint: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The endpoint answers `[[{label, score}, ...]]` for a single input, some
/// deployments drop the outer list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Single(Vec<LabelScore>),
}

impl InferenceClassifier {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

fn scores_from_labels(labels: &[LabelScore]) -> Result<SentimentScores, ProviderError> {
    let mut scores = SentimentScores::default();
    for entry in labels {
        match entry.label.to_lowercase().as_str() {
            "negative" | "label_0" => scores.negative = entry.score,
            "neutral" | "label_1" => scores.neutral = entry.score,
            "positive" | "label_2" => scores.positive = entry.score,
            other => {
                return Err(ProviderError::Parse(format!(
                    "unexpected sentiment label {other}"
                )))
            }
        }
    }
    Ok(scores)
}

#[rocket::async_trait]
impl SentimentClassifier for InferenceClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "inputs": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let labels = match response.json::<InferenceResponse>().await? {
            InferenceResponse::Batched(mut batch) if !batch.is_empty() => batch.swap_remove(0),
            InferenceResponse::Batched(_) => Vec::new(),
            InferenceResponse::Single(labels) => labels,
        };
        if labels.is_empty() {
            return Err(ProviderError::Parse("empty sentiment response".into()));
        }
        scores_from_labels(&labels)
    }
}

lazy_static! {
    static ref POSITIVE_WORDS: HashSet<&'static str> = [
        "amazing", "awesome", "best", "better", "clean", "creamy", "crispy", "delicious",
        "easy", "excellent", "favorite", "favourite", "fresh", "fun", "glow", "good", "great",
        "happy", "healthy", "incredible", "love", "loved", "perfect", "refreshing", "smooth",
        "tasty", "top", "worth", "wow", "yummy",
    ]
    .into_iter()
    .collect();
    static ref NEGATIVE_WORDS: HashSet<&'static str> = [
        "allergic", "awful", "bad", "bland", "broke", "danger", "dangerous", "disappointing",
        "disgusting", "fail", "fake", "gross", "hate", "horrible", "mistake", "overpriced",
        "poison", "problem", "recall", "regret", "scam", "sick", "terrible", "toxic", "ugly",
        "waste", "worse", "worst", "wrong",
    ]
    .into_iter()
    .collect();
    static ref NEGATORS: HashSet<&'static str> =
        ["not", "no", "never", "don't", "isn't", "wasn't", "didn't"].into_iter().collect();
}

/// Word-list classifier used when no inference endpoint is configured.
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn score(&self, text: &str) -> SentimentScores {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|token| !token.is_empty())
            .collect();

        let (mut positive, mut negative) = (0u32, 0u32);
        for (index, token) in tokens.iter().enumerate() {
            let negated = index > 0 && NEGATORS.contains(tokens[index - 1]);
            let polarity = if POSITIVE_WORDS.contains(token) {
                1
            } else if NEGATIVE_WORDS.contains(token) {
                -1
            } else {
                continue;
            };
            if (polarity > 0) != negated {
                positive += 1;
            } else {
                negative += 1;
            }
        }

        // Neutral wins unless one polarity clearly dominates.
        let neutral = 0.75 + positive.min(negative) as f64;
        SentimentScores::from_weights(negative as f64, neutral, positive as f64)
    }
}

#[rocket::async_trait]
impl SentimentClassifier for LexiconClassifier {
    async fn classify(&self, text: &str) -> Result<SentimentScores, ProviderError> {
        let scores = self.score(text);
        debug!("Lexicon sentiment for {text:?}: {scores:?}");
        Ok(scores)
    }
}
