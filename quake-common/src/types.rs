use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observed seismic event, as listed in the upstream report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// Report date, kept verbatim, e.g. "2024.03.15"
    pub date: String,
    /// Report time, e.g. "14:23:11"
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Depth in kilometers
    pub depth: f64,
    #[serde(rename = "magnitudeMD")]
    pub magnitude_md: Option<f64>,
    #[serde(rename = "magnitudeML")]
    pub magnitude_ml: Option<f64>,
    #[serde(rename = "magnitudeMw")]
    pub magnitude_mw: Option<f64>,
    /// Place name with internal whitespace collapsed, e.g. "SINDIRGI (BALIKESIR)"
    pub location: String,
    /// Solution quality code, e.g. "İlksel" or "REVIZE01"
    pub solution_quality: String,
    /// Derived key, see [`EarthquakeRecord::make_id`]
    pub id: String,
    /// Set only on records from the bundled sample dataset
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sample: bool,
}

impl EarthquakeRecord {
    /// Event key built from timestamp and coordinates.
    ///
    /// Two records describing the same instant at the same coordinates always
    /// share an id, so re-parsing a report yields identical keys.
    pub fn make_id(date: &str, time: &str, latitude: f64, longitude: f64) -> String {
        format!("{}_{}_{}_{}", date, time, latitude, longitude)
    }

    /// Largest magnitude reported on any scale, if any.
    pub fn max_magnitude(&self) -> Option<f64> {
        [self.magnitude_md, self.magnitude_ml, self.magnitude_mw]
            .into_iter()
            .flatten()
            .reduce(f64::max)
    }
}

/// Which acquisition stage produced a record set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedSource {
    #[serde(rename = "direct")]
    Direct,
    #[serde(rename = "local_relay")]
    LocalRelay,
    #[serde(rename = "public_relay")]
    PublicRelay,
    #[serde(rename = "fallback")]
    Fallback,
}

impl FeedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSource::Direct => "direct",
            FeedSource::LocalRelay => "local_relay",
            FeedSource::PublicRelay => "public_relay",
            FeedSource::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for FeedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one acquisition cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeFeed {
    pub source: FeedSource,
    /// When this cycle completed
    pub fetched_at: DateTime<Utc>,
    /// Records in report order (newest first)
    pub records: Vec<EarthquakeRecord>,
}

impl EarthquakeFeed {
    pub fn new(source: FeedSource, records: Vec<EarthquakeRecord>) -> Self {
        Self {
            source,
            fetched_at: Utc::now(),
            records,
        }
    }

    /// True when the records come from the bundled sample dataset
    pub fn is_sample(&self) -> bool {
        self.source == FeedSource::Fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EarthquakeRecord {
        EarthquakeRecord {
            date: "2024.03.15".to_string(),
            time: "14:23:11".to_string(),
            latitude: 38.4521,
            longitude: 27.1234,
            depth: 7.3,
            magnitude_md: None,
            magnitude_ml: Some(3.2),
            magnitude_mw: None,
            location: "SOME PLACE NAME".to_string(),
            solution_quality: "C".to_string(),
            id: EarthquakeRecord::make_id("2024.03.15", "14:23:11", 38.4521, 27.1234),
            sample: false,
        }
    }

    #[test]
    fn test_make_id() {
        assert_eq!(
            EarthquakeRecord::make_id("2024.03.15", "14:23:11", 38.4521, 27.1234),
            "2024.03.15_14:23:11_38.4521_27.1234"
        );
        assert_ne!(
            EarthquakeRecord::make_id("2024.03.15", "14:23:11", 38.4521, 27.1234),
            EarthquakeRecord::make_id("2024.03.15", "14:23:12", 38.4521, 27.1234)
        );
    }

    #[test]
    fn test_record_json_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["magnitudeMD"], serde_json::Value::Null);
        assert_eq!(value["magnitudeML"], 3.2);
        assert_eq!(value["magnitudeMw"], serde_json::Value::Null);
        assert_eq!(value["solutionQuality"], "C");
        assert_eq!(value["id"], "2024.03.15_14:23:11_38.4521_27.1234");
        // live records carry no marker
        assert!(value.get("sample").is_none());
    }

    #[test]
    fn test_sample_marker_serialized() {
        let mut r = record();
        r.sample = true;
        let value = serde_json::to_value(&r).unwrap();
        assert_eq!(value["sample"], true);

        let back: EarthquakeRecord = serde_json::from_value(value).unwrap();
        assert!(back.sample);
    }

    #[test]
    fn test_max_magnitude() {
        let mut r = record();
        assert_eq!(r.max_magnitude(), Some(3.2));
        r.magnitude_mw = Some(3.6);
        assert_eq!(r.max_magnitude(), Some(3.6));
        r.magnitude_ml = None;
        r.magnitude_mw = None;
        assert_eq!(r.max_magnitude(), None);
    }

    #[test]
    fn test_feed_source_names() {
        assert_eq!(FeedSource::LocalRelay.to_string(), "local_relay");
        assert_eq!(serde_json::to_value(FeedSource::PublicRelay).unwrap(), "public_relay");
    }

    #[test]
    fn test_feed_is_sample() {
        assert!(EarthquakeFeed::new(FeedSource::Fallback, vec![]).is_sample());
        assert!(!EarthquakeFeed::new(FeedSource::Direct, vec![record()]).is_sample());
    }
}
