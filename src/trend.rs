use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

const RUSH_ABOVE: u64 = 110;
const CALM_BELOW: u64 = 90;

static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)%").expect("percent pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendLevel {
    Rush,
    Calm,
    Normal,
}

impl TrendLevel {
    pub fn label(self) -> &'static str {
        match self {
            TrendLevel::Rush => "Rush",
            TrendLevel::Calm => "Calm",
            TrendLevel::Normal => "Normal",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            TrendLevel::Rush => "rush",
            TrendLevel::Calm => "calm",
            TrendLevel::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub level: TrendLevel,
    pub percent: u64,
}

impl Trend {
    pub fn from_percent(percent: u64) -> Self {
        Self {
            level: classify_percent(percent),
            percent,
        }
    }
}

/// Bounds are inclusive on the normal side: 90 and 110 are both `Normal`.
pub fn classify_percent(percent: u64) -> TrendLevel {
    if percent > RUSH_ABOVE {
        TrendLevel::Rush
    } else if percent < CALM_BELOW {
        TrendLevel::Calm
    } else {
        TrendLevel::Normal
    }
}

/// Extracts the first `<digits>%` from a diagnostic line and classifies it.
///
/// Returns `None` when the text carries no percentage, in which case the
/// trend indicator stays hidden.
pub fn classify(debug_info: &str) -> Option<Trend> {
    let captures = PERCENT.captures(debug_info)?;
    let percent = captures.get(1)?.as_str().parse::<u64>().ok()?;
    Some(Trend::from_percent(percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_normal_inclusive() {
        assert_eq!(classify_percent(89), TrendLevel::Calm);
        assert_eq!(classify_percent(90), TrendLevel::Normal);
        assert_eq!(classify_percent(110), TrendLevel::Normal);
        assert_eq!(classify_percent(111), TrendLevel::Rush);
    }

    #[test]
    fn extracts_percentage_from_diagnostic_text() {
        let trend = classify("Demand at 135% of baseline").unwrap();
        assert_eq!(trend.level, TrendLevel::Rush);
        assert_eq!(trend.percent, 135);

        let trend = classify("72% load").unwrap();
        assert_eq!(trend.level, TrendLevel::Calm);
        assert_eq!(trend.percent, 72);

        let trend = classify("IA active (Tendance: 100%)").unwrap();
        assert_eq!(trend.level, TrendLevel::Normal);
    }

    #[test]
    fn only_first_match_counts() {
        let trend = classify("was 150% now 50%").unwrap();
        assert_eq!(trend.percent, 150);
        assert_eq!(trend.level, TrendLevel::Rush);
    }

    #[test]
    fn missing_percentage_hides_trend() {
        assert_eq!(classify("Mode Simple (Pas d'IA)"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("100 percent"), None);
        assert_eq!(classify("99999999999999999999999% overflow"), None);
    }

    #[test]
    fn classification_is_idempotent() {
        let first = classify("Tendance: 111%");
        let second = classify("Tendance: 111%");
        assert_eq!(first, second);
    }
}
