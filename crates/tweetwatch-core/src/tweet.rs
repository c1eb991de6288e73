//! Tweets and their enrichment slots.
//!
//! A tweet starts out bare from the crawler. The classifier fills
//! [`Tweet::sentiment`] and [`Tweet::classification`]; topic extraction fills
//! [`Tweet::topics`]. Each slot stays `None` until its stage has run, so a
//! neutral sentiment with a zero score is distinguishable from "never
//! classified".
//!
//! The backend writes zero values for slots it has not filled
//! (`"sentiment": ""`, `"tweet_class": ""`). An empty label reads back as
//! `None`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub status_id: String,
    pub user_name: String,
    pub text: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub created_at_full: String,
    #[serde(default)]
    pub favorite_count: i64,
    #[serde(default)]
    pub retweet_count: i64,
    #[serde(default)]
    pub in_reply_to_screen_name: String,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub lang: String,
    #[serde(default, rename = "is_annotated")]
    pub annotated: bool,
    #[serde(flatten)]
    pub sentiment: Option<Sentiment>,
    #[serde(flatten)]
    pub classification: Option<TweetClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics: Option<TweetTopics>,
}

/// Sentiment label assigned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSentiment")]
pub struct Sentiment {
    #[serde(rename = "sentiment")]
    pub label: String,
    #[serde(rename = "sentiment_score")]
    pub score: i32,
}

/// Domain class assigned by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTweetClass")]
pub struct TweetClass {
    #[serde(rename = "tweet_class")]
    pub label: String,
    #[serde(rename = "classifier_certainty")]
    pub certainty: i32,
}

#[derive(Deserialize)]
struct RawSentiment {
    sentiment: String,
    #[serde(default)]
    sentiment_score: i32,
}

#[derive(Deserialize)]
struct RawTweetClass {
    tweet_class: String,
    #[serde(default)]
    classifier_certainty: i32,
}

/// Rejected when the backend sent a zero-valued slot.
#[derive(Debug)]
pub struct EmptyLabel(&'static str);

impl std::fmt::Display for EmptyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "empty {} label", self.0)
    }
}

impl TryFrom<RawSentiment> for Sentiment {
    type Error = EmptyLabel;

    fn try_from(raw: RawSentiment) -> Result<Self, Self::Error> {
        if raw.sentiment.is_empty() {
            return Err(EmptyLabel("sentiment"));
        }
        Ok(Self {
            label: raw.sentiment,
            score: raw.sentiment_score,
        })
    }
}

impl TryFrom<RawTweetClass> for TweetClass {
    type Error = EmptyLabel;

    fn try_from(raw: RawTweetClass) -> Result<Self, Self::Error> {
        if raw.tweet_class.is_empty() {
            return Err(EmptyLabel("tweet_class"));
        }
        Ok(Self {
            label: raw.tweet_class,
            certainty: raw.classifier_certainty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub label: String,
    pub score: f64,
}

/// The two highest-ranked topics for a tweet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetTopics {
    pub first_class: TopicScore,
    pub second_class: TopicScore,
}

impl Tweet {
    /// A freshly crawled tweet with every enrichment slot empty.
    pub fn new(
        status_id: impl Into<String>,
        user_name: impl Into<String>,
        text: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            status_id: status_id.into(),
            user_name: user_name.into(),
            text: text.into(),
            created_at: 0,
            created_at_full: String::new(),
            favorite_count: 0,
            retweet_count: 0,
            in_reply_to_screen_name: String::new(),
            hashtags: Vec::new(),
            lang: lang.into(),
            annotated: false,
            sentiment: None,
            classification: None,
            topics: None,
        }
    }

    /// Returns this tweet with extracted topics attached.
    #[must_use]
    pub fn with_topics(self, topics: TweetTopics) -> Self {
        Self {
            topics: Some(topics),
            ..self
        }
    }

    /// Both classifier slots carry a label.
    #[must_use]
    pub fn is_classified(&self) -> bool {
        self.sentiment.is_some() && self.classification.is_some()
    }
}
