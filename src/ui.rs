use crate::errors::ForecastError;
use crate::models::{ActionKind, DashboardView, Format, HistoryEntry, WeeklyForecastDay};

pub const CLOSED_INDICATOR: &str = r#"<div class="day-closed">CLOSED</div>"#;
const EMPTY_HISTORY: &str = r#"<div class="history-empty">No recent activity</div>"#;
const WEEK_UNAVAILABLE: &str = r#"<div class="info-text">Forecast unavailable.</div>"#;

pub fn render_index(view: &DashboardView, notice: Option<&str>) -> String {
    let stats = &view.stats;
    let prediction = &view.prediction;

    let trend = match &prediction.trend {
        Some(badge) => format!(
            r#"<div id="trend-container"><span class="trend-badge {}">{}</span></div>"#,
            badge.class,
            escape_html(&badge.label)
        ),
        None => String::new(),
    };
    let event = match &prediction.event_name {
        Some(name) => format!(r#"<div id="event-banner">{}</div>"#, escape_html(name)),
        None => String::new(),
    };
    let notice = match notice {
        Some(text) if !text.is_empty() => {
            format!(r#"<div class="notice" role="status">{}</div>"#, escape_html(text))
        }
        _ => String::new(),
    };

    let peak = escape_html(&stats.peak_hour);
    let top = escape_html(&stats.top_format);
    let mass = escape_html(&stats.total_mass);
    let conversions = escape_html(&stats.total_conversions);
    let weather = escape_html(&prediction.weather);
    let debug = escape_html(&prediction.debug_info);
    let history = render_history(&view.history);

    fill(
        INDEX_HTML,
        &[
            ("STYLE", STYLE),
            ("OPEN", if view.open { "true" } else { "false" }),
            ("NOTICE", &notice),
            ("COUNT_250G", &stats.count_250g),
            ("COUNT_1KG", &stats.count_1kg),
            ("COUNT_2KG", &stats.count_2kg),
            ("PEAK", &peak),
            ("TOP", &top),
            ("MASS", &mass),
            ("CONV", &conversions),
            ("HOURS", &prediction.hours_remaining),
            ("WEATHER", &weather),
            ("EVENT", &event),
            ("PRED_250G", &prediction.forecast_250g),
            ("PRED_1KG", &prediction.forecast_1kg),
            ("PRED_2KG", &prediction.forecast_2kg),
            ("TREND", &trend),
            ("DEBUG", &debug),
            ("HISTORY", &history),
            ("SYNCED", &view.last_synced),
        ],
    )
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let (class, label) = match entry.kind {
                ActionKind::Sale => ("VENTE", "Sale"),
                ActionKind::Conversion => ("CONVERSION", "Conv."),
                ActionKind::Unknown => ("UNKNOWN", "Action"),
            };
            format!(
                r#"<div class="history-item type-{class}"><span>{label} <strong>{}</strong></span><span class="hist-time">{}</span></div>"#,
                escape_html(&entry.detail),
                escape_html(&entry.time)
            )
        })
        .collect()
}

pub fn render_week_day(day: &WeeklyForecastDay) -> String {
    let badge = day
        .event_name
        .as_deref()
        .map(|name| format!(r#"<span class="event-badge">{}</span>"#, escape_html(name)))
        .unwrap_or_default();

    let body = if day.closed {
        CLOSED_INDICATOR.to_string()
    } else {
        let totals: String = Format::ALL
            .iter()
            .map(|format| {
                format!(
                    r#"<div class="day-total"><div class="value">{}</div><div class="label">{}</div></div>"#,
                    day.totals.get(*format),
                    format.label()
                )
            })
            .collect();
        format!(r#"<div class="day-totals">{totals}</div>"#)
    };

    format!(
        r#"<div class="day-card" data-date="{}"><div class="day-header"><span class="day-date">{}</span>{badge}<span class="day-weather">{}</span></div>{body}</div>"#,
        escape_html(&day.date_key),
        escape_html(&day.date_display),
        escape_html(&day.weather)
    )
}

pub fn render_week(week: Result<&[WeeklyForecastDay], &ForecastError>) -> String {
    let list = match week {
        Ok(days) => days.iter().map(render_week_day).collect::<String>(),
        Err(_) => WEEK_UNAVAILABLE.to_string(),
    };
    fill(WEEK_HTML, &[("STYLE", STYLE), ("WEEK", &list)])
}

/// Substitutes `{{KEY}}` markers in one pass over the template, so text
/// coming from the remote is never scanned for markers itself. Unknown
/// markers are left as they are.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let value = after.find("}}").and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const STYLE: &str = r#"<style>
    :root {
      --bg-1: #161a23;
      --card: rgba(255, 255, 255, 0.06);
      --ink: #eef1f6;
      --muted: #a0a7b8;
      --rush: #e67e22;
      --calm: #3498db;
      --normal: #2ecc71;
      --closed: #e74c3c;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg-1);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    body[data-open="false"] .sales {
      opacity: 0.5;
    }

    .app {
      width: min(720px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      padding: 18px;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 12px;
    }

    .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .value {
      font-size: 1.6rem;
      font-weight: 600;
    }

    .notice {
      background: rgba(231, 76, 60, 0.15);
      border-radius: 12px;
      padding: 10px 14px;
    }

    .trend-badge {
      border-radius: 999px;
      padding: 4px 12px;
      font-weight: 600;
    }

    .trend-badge.rush { background: var(--rush); }
    .trend-badge.calm { background: var(--calm); }
    .trend-badge.normal { background: var(--normal); }

    .history-item, .day-header, .day-totals {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 10px;
      padding: 6px 0;
    }

    .history-empty, .info-text {
      color: var(--muted);
      font-style: italic;
      text-align: center;
    }

    .event-badge {
      background: linear-gradient(90deg, #8e44ad, #c0392b);
      border-radius: 6px;
      padding: 2px 8px;
      font-size: 0.7rem;
      font-weight: bold;
    }

    .day-closed {
      text-align: center;
      color: var(--closed);
      font-weight: bold;
      padding: 10px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 14px 18px;
      font-weight: 600;
      cursor: pointer;
    }
  </style>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Shop Dashboard</title>
  {{STYLE}}
</head>
<body data-open="{{OPEN}}">
  <main class="app">
    {{NOTICE}}
    <section class="card sales">
      <div class="grid">
        <div><div class="label">250g</div><div id="count-250g" class="value">{{COUNT_250G}}</div></div>
        <div><div class="label">1 kg</div><div id="count-1kg" class="value">{{COUNT_1KG}}</div></div>
        <div><div class="label">2 kg</div><div id="count-2kg" class="value">{{COUNT_2KG}}</div></div>
      </div>
      <div class="grid">
        <form method="post" action="/sale/250g"><button type="submit">+ 250g</button></form>
        <form method="post" action="/sale/1kg"><button type="submit">+ 1 kg</button></form>
        <form method="post" action="/sale/2kg"><button type="submit">+ 2 kg</button></form>
        <form method="post" action="/undo"><button type="submit">Undo</button></form>
      </div>
    </section>

    <section class="card">
      <div class="grid">
        <div><div class="label">Peak hour</div><div id="stat-peak" class="value">{{PEAK}}</div></div>
        <div><div class="label">Top format</div><div id="stat-top" class="value">{{TOP}}</div></div>
        <div><div class="label">Total mass</div><div id="stat-mass" class="value">{{MASS}}</div></div>
        <div><div class="label">Conversions</div><div id="stat-conv" class="value">{{CONV}}</div></div>
      </div>
    </section>

    <section class="card">
      <div class="grid">
        <div><div class="label">Hours left</div><div id="time-left" class="value">{{HOURS}}</div></div>
        <div><div class="label">Weather</div><div id="meteo-label" class="value">{{WEATHER}}</div></div>
      </div>
      {{EVENT}}
      <div class="grid">
        <div><div class="label">250g to make</div><div id="pred-250g" class="value">{{PRED_250G}}</div></div>
        <div><div class="label">1 kg to make</div><div id="pred-1kg" class="value">{{PRED_1KG}}</div></div>
        <div><div class="label">2 kg to make</div><div id="pred-2kg" class="value">{{PRED_2KG}}</div></div>
      </div>
      {{TREND}}
      <p id="prediction-info" class="label">{{DEBUG}}</p>
      <a href="/week">Next 7 days</a>
    </section>

    <section class="card" id="history-list">
      {{HISTORY}}
    </section>

    <p class="label">Last sync: {{SYNCED}}</p>
  </main>
</body>
</html>
"#;

const WEEK_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Weekly Forecast</title>
  {{STYLE}}
</head>
<body>
  <main class="app">
    <a href="/">Back</a>
    <section class="card" id="week-list">
      {{WEEK}}
    </section>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormatCounts, PredictionSnapshot, StatsSnapshot};
    use crate::view::{build_prediction_view, build_stats_view};

    fn day(closed: bool, event_name: Option<&str>) -> WeeklyForecastDay {
        WeeklyForecastDay {
            date_key: "2026-10-20".to_string(),
            date_display: "Tuesday 20".to_string(),
            weather: "Sunny".to_string(),
            event_name: event_name.map(str::to_string),
            closed,
            totals: FormatCounts {
                g250: 12,
                kg1: 4,
                kg2: 1,
            },
        }
    }

    #[test]
    fn closed_day_shows_only_closed_indicator() {
        let html = render_week_day(&day(true, None));
        assert!(html.contains(CLOSED_INDICATOR));
        assert!(!html.contains("day-total"));
        assert!(!html.contains(">12<"));
    }

    #[test]
    fn open_day_shows_totals_and_event_badge() {
        let html = render_week_day(&day(false, Some("Market day")));
        assert!(!html.contains(CLOSED_INDICATOR));
        assert!(html.contains(r#"<div class="value">12</div>"#));
        assert!(html.contains(r#"<div class="value">4</div>"#));
        assert!(html.contains(r#"<span class="event-badge">Market day</span>"#));
    }

    #[test]
    fn unavailable_week_renders_placeholder() {
        let err = ForecastError::Unavailable("model not trained".to_string());
        let html = render_week(Err(&err));
        assert!(html.contains(WEEK_UNAVAILABLE));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn missing_counter_renders_zero() {
        let stats: StatsSnapshot = serde_json::from_str(r#"{"c250": 5, "c1kg": 2}"#).unwrap();
        let view = build_stats_view(&stats);
        assert_eq!(view.count_250g, "5");
        assert_eq!(view.count_1kg, "2");
        assert_eq!(view.count_2kg, "0");
        assert_eq!(view.peak_hour, "--");
        assert_eq!(view.total_mass, "0 kg");
        assert_eq!(view.total_conversions, "0");
    }

    #[test]
    fn empty_history_renders_message() {
        assert_eq!(render_history(&[]), EMPTY_HISTORY);
    }

    #[test]
    fn history_text_is_escaped() {
        let entries = vec![HistoryEntry {
            kind: ActionKind::Sale,
            detail: "<b>1kg</b>".to_string(),
            time: "10:15".to_string(),
        }];
        let html = render_history(&entries);
        assert!(html.contains("&lt;b&gt;1kg&lt;/b&gt;"));
        assert!(html.contains("type-VENTE"));
    }

    #[test]
    fn marker_text_from_remote_is_rendered_literally() {
        let payload = r#"{"peak_hour": "{{SYNCED}}", "top_format": "{{STYLE"}"#;
        let stats: StatsSnapshot = serde_json::from_str(payload).unwrap();
        let view = DashboardView {
            open: true,
            last_synced: "12:00:00".to_string(),
            stats: build_stats_view(&stats),
            prediction: build_prediction_view(&PredictionSnapshot::default()),
            history: Vec::new(),
        };

        let html = render_index(&view, None);
        assert!(html.contains(r#"<div id="stat-peak" class="value">{{SYNCED}}</div>"#));
        assert!(!html.contains(r#"<div id="stat-peak" class="value">12:00:00</div>"#));
        assert!(html.contains("{{STYLE"));
        assert!(html.contains("Last sync: 12:00:00"));
    }

    #[test]
    fn unknown_marker_is_kept() {
        assert_eq!(fill("a {{X}} b {{Y}}", &[("Y", "y")]), "a {{X}} b y");
        assert_eq!(fill("{{Y}}}", &[("Y", "y")]), "y}");
    }
}
