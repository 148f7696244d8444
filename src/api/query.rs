use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Inclusive date range expressed as millisecond epoch bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from_ms: i64,
    pub to_ms: i64,
}

impl DateRange {
    pub fn new(from_ms: i64, to_ms: i64) -> Result<Self> {
        if from_ms > to_ms {
            anyhow::bail!("Date range starts after it ends ({} > {})", from_ms, to_ms);
        }
        Ok(Self { from_ms, to_ms })
    }

    /// Range covering both calendar days completely (UTC)
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        let from_ms = from
            .and_hms_opt(0, 0, 0)
            .context("Invalid start date")?
            .and_utc()
            .timestamp_millis();
        let to_ms = to
            .and_hms_milli_opt(23, 59, 59, 999)
            .context("Invalid end date")?
            .and_utc()
            .timestamp_millis();
        Self::new(from_ms, to_ms)
    }
}

/// Parameters of a speech search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text keyword
    pub text: String,
    /// Keep only the first `limit` results
    pub limit: Option<usize>,
    pub date_range: Option<DateRange>,
    pub faction_id: Option<String>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: None,
            date_range: None,
            faction_id: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_faction(mut self, faction_id: impl Into<String>) -> Self {
        self.faction_id = Some(faction_id.into());
        self
    }

    /// Full GET URL of the search endpoint below `base_url`
    pub fn search_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}/search/media?q={}",
            base_url.trim_end_matches('/'),
            urlencoding::encode(&self.text)
        );
        if let Some(range) = &self.date_range {
            url.push_str(&format!("&dateFrom={}&dateTo={}", range.from_ms, range.to_ms));
        }
        if let Some(faction_id) = &self.faction_id {
            url.push_str(&format!("&factionID={}", urlencoding::encode(faction_id)));
        }
        url
    }
}
