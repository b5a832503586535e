//! Bundled sample dataset served when every live source fails.
//!
//! Every record carries `sample = true` so consumers can show a
//! "sample data" notice instead of presenting it as live.

use quake_common::EarthquakeRecord;

#[allow(clippy::too_many_arguments)]
fn sample(
    date: &str,
    time: &str,
    latitude: f64,
    longitude: f64,
    depth: f64,
    magnitudes: (Option<f64>, Option<f64>, Option<f64>),
    location: &str,
    solution_quality: &str,
) -> EarthquakeRecord {
    let (magnitude_md, magnitude_ml, magnitude_mw) = magnitudes;
    EarthquakeRecord {
        date: date.to_string(),
        time: time.to_string(),
        latitude,
        longitude,
        depth,
        magnitude_md,
        magnitude_ml,
        magnitude_mw,
        location: location.to_string(),
        solution_quality: solution_quality.to_string(),
        id: EarthquakeRecord::make_id(date, time, latitude, longitude),
        sample: true,
    }
}

/// The static fallback records, newest first
pub fn sample_records() -> Vec<EarthquakeRecord> {
    vec![
        sample("2024.01.25", "18:43:12", 39.2142, 28.1783, 8.4, (None, Some(3.9), Some(3.8)), "SINDIRGI (BALIKESIR)", "İlksel"),
        sample("2024.01.25", "16:05:47", 37.8650, 27.3412, 11.2, (None, Some(2.4), None), "KUSADASI KORFEZI (EGE DENIZI)", "İlksel"),
        sample("2024.01.25", "11:27:03", 38.3011, 38.1890, 7.0, (None, Some(3.1), None), "YESILYURT (MALATYA)", "İlksel"),
        sample("2024.01.25", "09:14:58", 40.8117, 29.1055, 9.6, (None, Some(2.0), None), "MARMARA DENIZI", "İlksel"),
        sample("2024.01.24", "22:51:30", 36.1733, 36.0188, 14.8, (None, Some(4.2), Some(4.3)), "DEFNE (HATAY)", "REVIZE01"),
        sample("2024.01.24", "19:02:16", 38.9420, 43.6522, 5.0, (None, Some(2.7), None), "VAN GOLU", "İlksel"),
        sample("2024.01.24", "13:38:41", 37.5814, 36.9702, 6.3, (None, Some(3.4), None), "ONIKISUBAT (KAHRAMANMARAS)", "REVIZE01"),
        sample("2024.01.24", "07:20:09", 35.5521, 26.7743, 17.5, (None, Some(3.0), None), "GIRIT ADASI ACIKLARI (AKDENIZ)", "İlksel"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_records_marked() {
        let records = sample_records();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.sample));
    }

    #[test]
    fn test_sample_ids_consistent_and_unique() {
        let records = sample_records();
        let ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids.len(), records.len());
        for r in &records {
            assert_eq!(r.id, EarthquakeRecord::make_id(&r.date, &r.time, r.latitude, r.longitude));
            assert!(r.depth >= 0.0);
        }
    }
}
