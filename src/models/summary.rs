use std::fmt;

use serde::{Deserialize, Serialize};

use super::Sentiment;

/// Seconds of main-speaker time per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentDurations {
    pub total: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

/// Share of the total duration per sentiment label
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentShares {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentDurations {
    pub fn add(&mut self, label: Sentiment, duration: f64) {
        self.total += duration;
        match label {
            Sentiment::Positive => self.positive += duration,
            Sentiment::Neutral => self.neutral += duration,
            Sentiment::Negative => self.negative += duration,
        }
    }

    pub fn merge(&mut self, other: &SentimentDurations) {
        self.total += other.total;
        self.positive += other.positive;
        self.neutral += other.neutral;
        self.negative += other.negative;
    }

    /// Divide each label by the total. A zero total yields all-zero shares.
    pub fn shares(&self) -> SentimentShares {
        if self.total == 0.0 {
            return SentimentShares::default();
        }
        SentimentShares {
            positive: self.positive / self.total,
            neutral: self.neutral / self.total,
            negative: self.negative / self.total,
        }
    }
}

/// One report row per analysed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSummary {
    pub speech_id: String,
    pub api_url: String,
    pub category: Option<String>,
    pub date_start: Option<String>,
    pub agenda_item_title: String,
    pub main_speaker: String,
    pub main_speaker_party: String,
    pub main_speaker_faction: String,
    pub sentence_count: usize,
    pub total_duration: f64,
    pub duration_positive: f64,
    pub duration_neutral: f64,
    pub duration_negative: f64,
    pub percentage_positive: f64,
    pub percentage_neutral: f64,
    pub percentage_negative: f64,
}

impl SpeechSummary {
    pub fn durations(&self) -> SentimentDurations {
        SentimentDurations {
            total: self.total_duration,
            positive: self.duration_positive,
            neutral: self.duration_neutral,
            negative: self.duration_negative,
        }
    }

    /// Label of this speech under the given grouping
    pub fn group_label(&self, key: GroupingKey) -> &str {
        match key {
            GroupingKey::Category => self.category.as_deref().unwrap_or(super::UNKNOWN),
            GroupingKey::Party => &self.main_speaker_party,
            GroupingKey::Faction => &self.main_speaker_faction,
        }
    }
}

/// Column that speech summaries are grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingKey {
    Category,
    Party,
    Faction,
}

impl GroupingKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingKey::Category => "category",
            GroupingKey::Party => "party",
            GroupingKey::Faction => "faction",
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed durations of many speeches sharing a group label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub group: String,
    pub grouping: GroupingKey,
    pub category: Option<String>,
    pub speech_count: usize,
    pub total_duration: f64,
    pub duration_positive: f64,
    pub duration_neutral: f64,
    pub duration_negative: f64,
    pub percentage_positive: f64,
    pub percentage_neutral: f64,
    pub percentage_negative: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shares_of_zero_total() {
        let durations = SentimentDurations::default();
        assert_eq!(durations.shares(), SentimentShares::default());
    }

    #[test]
    fn test_shares_sum_to_one() {
        let mut durations = SentimentDurations::default();
        durations.add(Sentiment::Positive, 1.7);
        durations.add(Sentiment::Neutral, 3.1);
        durations.add(Sentiment::Negative, 0.4);

        let shares = durations.shares();
        let sum = shares.positive + shares.neutral + shares.negative;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge() {
        let mut a = SentimentDurations::default();
        a.add(Sentiment::Positive, 2.0);
        let mut b = SentimentDurations::default();
        b.add(Sentiment::Negative, 3.0);

        a.merge(&b);
        assert_eq!(a.total, 5.0);
        assert_eq!(a.positive, 2.0);
        assert_eq!(a.negative, 3.0);
        assert_eq!(a.neutral, 0.0);
    }
}
