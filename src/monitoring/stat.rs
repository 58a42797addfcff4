//! Stat Normalizer

use super::error::MonitoringError;

/// Stat used when the caller does not name one
pub const DEFAULT_STAT: &str = "AVERAGE";

/// User-facing stat token -> CloudWatch statistic, in display order
const STAT_MAP: &[(&str, &str)] = &[
    ("AVERAGE", "Average"),
    ("MAX", "Maximum"),
    ("MIN", "Minimum"),
    ("SUM", "Sum"),
];

/// Supported stat tokens joined for error messages
pub fn supported_stats() -> String {
    STAT_MAP
        .iter()
        .map(|(key, _)| *key)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Translate a stat token into the name CloudWatch expects
pub fn normalize(stat: Option<&str>) -> Result<&'static str, MonitoringError> {
    let stat = stat.unwrap_or(DEFAULT_STAT);

    STAT_MAP
        .iter()
        .find(|(key, _)| *key == stat)
        .map(|(_, backend)| *backend)
        .ok_or_else(|| MonitoringError::UnsupportedStat {
            supported_stat: supported_stats(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_average() {
        assert_eq!(normalize(None), Ok("Average"));
        assert_eq!(normalize(Some("AVERAGE")), Ok("Average"));
    }

    #[test]
    fn test_all_stats() {
        assert_eq!(normalize(Some("MAX")), Ok("Maximum"));
        assert_eq!(normalize(Some("MIN")), Ok("Minimum"));
        assert_eq!(normalize(Some("SUM")), Ok("Sum"));
    }

    #[test]
    fn test_unsupported_stat_lists_supported_set() {
        let err = normalize(Some("TOTAL")).unwrap_err();
        assert_eq!(
            err,
            MonitoringError::UnsupportedStat {
                supported_stat: "AVERAGE | MAX | MIN | SUM".to_string()
            }
        );
        assert!(err.to_string().contains("AVERAGE | MAX | MIN | SUM"));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(normalize(Some("average")).is_err());
        assert!(normalize(Some("Average")).is_err());
    }
}
