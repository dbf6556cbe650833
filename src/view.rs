use crate::models::{
    DashboardView, Format, PredictionSnapshot, PredictionView, StatsSnapshot, StatsView,
    TrendBadge,
};
use crate::sync::SyncOrchestrator;

pub const PLACEHOLDER: &str = "--";
const MASS_PLACEHOLDER: &str = "0 kg";
const CONVERSIONS_PLACEHOLDER: &str = "0";

pub async fn build_dashboard(sync: &SyncOrchestrator) -> DashboardView {
    let store = sync.store();
    let (stats, prediction, history, last_synced) = tokio::join!(
        store.stats(),
        store.prediction(),
        store.history(),
        store.last_synced()
    );

    DashboardView {
        open: sync.poller().is_open(),
        last_synced: last_synced
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        stats: build_stats_view(&stats),
        prediction: build_prediction_view(&prediction),
        history,
    }
}

pub fn build_stats_view(stats: &StatsSnapshot) -> StatsView {
    StatsView {
        count_250g: stats.counts.get(Format::G250).to_string(),
        count_1kg: stats.counts.get(Format::Kg1).to_string(),
        count_2kg: stats.counts.get(Format::Kg2).to_string(),
        peak_hour: or_placeholder(stats.peak_hour.as_deref(), PLACEHOLDER),
        top_format: or_placeholder(stats.top_format.as_deref(), PLACEHOLDER),
        total_mass: or_placeholder(stats.total_mass.as_deref(), MASS_PLACEHOLDER),
        total_conversions: or_placeholder(
            stats.total_conversions.as_deref(),
            CONVERSIONS_PLACEHOLDER,
        ),
    }
}

pub fn build_prediction_view(prediction: &PredictionSnapshot) -> PredictionView {
    let trend = prediction.trend().map(|trend| TrendBadge {
        class: trend.level.css_class(),
        label: format!("{} ({}%)", trend.level.label(), trend.percent),
        percent: trend.percent,
    });

    PredictionView {
        hours_remaining: prediction
            .hours_remaining
            .map(|hours| hours.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        weather: or_placeholder(prediction.weather_label.as_deref(), PLACEHOLDER),
        event_name: prediction.event_name.clone().filter(|name| !name.is_empty()),
        forecast_250g: prediction.forecast.get(Format::G250).to_string(),
        forecast_1kg: prediction.forecast.get(Format::Kg1).to_string(),
        forecast_2kg: prediction.forecast.get(Format::Kg2).to_string(),
        debug_info: prediction.debug_info.clone(),
        trend,
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => placeholder.to_string(),
    }
}
