use chrono::{DateTime, Local, Locale};

use crate::classify::{ReadingStatus, Thresholds};
use crate::history::{HistorySeries, HistoryWindow};
use crate::model::{Reading, ReadingView, WeatherReport, WeatherView};

pub const LABEL_FORMAT: &str = "%H:%M";
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const WEATHER_DATE_FORMAT: &str = "%A, %-d %B %Y";
pub const WEATHER_DATE_FORMAT_ES: &str = "%A, %-d de %B de %Y";

/// Locale for the long weather date, following the language weather
/// descriptions are requested in. Unknown languages fall back to English.
pub fn date_locale(lang: &str) -> Locale {
    let primary = lang
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match primary.as_str() {
        "es" => Locale::es_ES,
        "pt" => Locale::pt_BR,
        "fr" => Locale::fr_FR,
        "de" => Locale::de_DE,
        "it" => Locale::it_IT,
        _ => Locale::en_US,
    }
}

pub fn weather_date(at: DateTime<Local>, locale: Locale) -> String {
    let format = match locale {
        Locale::es_ES | Locale::pt_BR => WEATHER_DATE_FORMAT_ES,
        _ => WEATHER_DATE_FORMAT,
    };
    at.format_localized(format, locale).to_string()
}

/// Everything the dashboard knows. Owned by the poll loop; nothing else
/// mutates it.
#[derive(Debug)]
pub struct DashboardState {
    thresholds: Thresholds,
    history: HistoryWindow,
    latest: Option<ReadingView>,
    weather: Option<WeatherView>,
    weather_error: Option<String>,
    date_locale: Locale,
    last_update: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn new(thresholds: Thresholds, date_locale: Locale) -> Self {
        Self {
            thresholds,
            history: HistoryWindow::new(),
            latest: None,
            weather: None,
            weather_error: None,
            date_locale,
            last_update: None,
        }
    }

    /// Classifies a reading, appends it to the history and records it as
    /// the latest one.
    pub fn record_reading(&mut self, reading: &Reading, at: DateTime<Local>) -> ReadingStatus {
        let status = self.thresholds.classify(reading);
        self.history
            .append(reading, at.format(LABEL_FORMAT).to_string());
        self.latest = Some(ReadingView::new(reading, &status));
        self.last_update = Some(at);
        status
    }

    pub fn record_weather(&mut self, report: &WeatherReport, at: DateTime<Local>) -> &WeatherView {
        let view = WeatherView::new(report, weather_date(at, self.date_locale));
        self.weather_error = None;
        self.weather.insert(view)
    }

    /// Keeps the last good report, if any, alongside the error.
    pub fn record_weather_error(&mut self, message: String) -> &str {
        self.weather_error.insert(message)
    }

    pub fn weather(&self) -> Option<&WeatherView> {
        self.weather.as_ref()
    }

    pub fn weather_error(&self) -> Option<&str> {
        self.weather_error.as_deref()
    }

    pub fn latest(&self) -> Option<&ReadingView> {
        self.latest.as_ref()
    }

    pub fn history(&self) -> HistorySeries<'_> {
        self.history.series()
    }

    pub fn last_update(&self) -> Option<String> {
        self.last_update
            .map(|t| t.format(LAST_UPDATE_FORMAT).to_string())
    }
}
