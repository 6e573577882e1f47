use std::collections::VecDeque;

use crate::model::{HistoryResponse, Reading};

/// Number of samples kept for the chart.
pub const HISTORY_CAPACITY: usize = 50;

/// Sliding window of recent readings feeding the chart.
///
/// The four series are kept in lock-step: every append pushes onto all of
/// them and every eviction pops the front of all of them, so their lengths
/// are always equal and never exceed the capacity once `append` returns.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    capacity: usize,
    labels: VecDeque<String>,
    temperature: VecDeque<f64>,
    co2: VecDeque<u32>,
    humidity: VecDeque<f64>,
}

/// Borrowed view of the window, oldest sample first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistorySeries<'a> {
    pub labels: &'a VecDeque<String>,
    pub temperature: &'a VecDeque<f64>,
    pub co2: &'a VecDeque<u32>,
    pub humidity: &'a VecDeque<f64>,
}

impl HistorySeries<'_> {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn to_response(&self) -> HistoryResponse {
        HistoryResponse {
            labels: self.labels.iter().cloned().collect(),
            temperature: self.temperature.iter().copied().collect(),
            co2: self.co2.iter().copied().collect(),
            humidity: self.humidity.iter().copied().collect(),
        }
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryWindow {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            // One extra slot for the transient element before eviction.
            labels: VecDeque::with_capacity(capacity + 1),
            temperature: VecDeque::with_capacity(capacity + 1),
            co2: VecDeque::with_capacity(capacity + 1),
            humidity: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn append(&mut self, reading: &Reading, label: impl Into<String>) {
        self.labels.push_back(label.into());
        self.temperature.push_back(reading.temperature);
        self.co2.push_back(reading.co2);
        self.humidity.push_back(reading.humidity);

        if self.labels.len() > self.capacity {
            self.labels.pop_front();
            self.temperature.pop_front();
            self.co2.pop_front();
            self.humidity.pop_front();
        }
    }

    pub fn series(&self) -> HistorySeries<'_> {
        HistorySeries {
            labels: &self.labels,
            temperature: &self.temperature,
            co2: &self.co2,
            humidity: &self.humidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(i: u32) -> Reading {
        Reading {
            temperature: 20.0 + i as f64,
            humidity: 40.0 + i as f64,
            co2: 400 + i,
            tvoc: 100,
            pressure: 1013.0,
            fan_active: false,
        }
    }

    fn assert_lock_step(window: &HistoryWindow) {
        let series = window.series();
        assert_eq!(series.labels.len(), series.temperature.len());
        assert_eq!(series.labels.len(), series.co2.len());
        assert_eq!(series.labels.len(), series.humidity.len());
        assert!(series.len() <= HISTORY_CAPACITY);
    }

    #[test]
    fn test_starts_empty() {
        let window = HistoryWindow::new();
        assert!(window.series().is_empty());
        assert_eq!(window.capacity, HISTORY_CAPACITY);
    }

    #[test]
    fn test_series_stay_in_lock_step() {
        let mut window = HistoryWindow::new();
        for i in 0..120 {
            window.append(&reading(i), format!("{:02}:00", i % 24));
            assert_lock_step(&window);
        }
        assert_eq!(window.series().len(), HISTORY_CAPACITY);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut window = HistoryWindow::new();
        for i in 0..50 {
            window.append(&reading(i), format!("t{}", i));
        }
        assert_eq!(window.series().len(), 50);

        window.append(&reading(50), "t50");

        let series = window.series();
        assert_eq!(series.len(), 50);
        assert_eq!(series.labels.front().map(String::as_str), Some("t1"));
        assert_eq!(series.labels.back().map(String::as_str), Some("t50"));
        assert_eq!(series.co2.front(), Some(&401));
        assert_eq!(series.co2.back(), Some(&450));

        let expected: Vec<String> = (1..=50).map(|i| format!("t{}", i)).collect();
        assert_eq!(*series.labels, expected.as_slice());
    }

    #[test]
    fn test_appends_below_capacity_keep_everything() {
        let mut window = HistoryWindow::new();
        window.append(&reading(1), "10:01");
        window.append(&reading(2), "10:02");

        let series = window.series();
        assert_eq!(*series.labels, ["10:01".to_string(), "10:02".to_string()]);
        assert_eq!(*series.temperature, [21.0, 22.0]);
        assert_eq!(*series.humidity, [41.0, 42.0]);
    }

    #[test]
    fn test_small_capacity() {
        let mut window = HistoryWindow::with_capacity(0);
        window.append(&reading(1), "a");
        window.append(&reading(2), "b");

        assert_eq!(window.series().len(), 1);
        assert_eq!(*window.series().labels, ["b".to_string()]);
    }

    #[test]
    fn test_long_run_keeps_newest_in_order() {
        let mut window = HistoryWindow::with_capacity(3);
        for i in 0..1000 {
            window.append(&reading(i), format!("t{}", i));
        }

        let response = window.series().to_response();
        assert_eq!(response.labels, ["t997", "t998", "t999"]);
        assert_eq!(response.co2, [1397, 1398, 1399]);
        assert_eq!(response.temperature, [1017.0, 1018.0, 1019.0]);
    }

    #[test]
    fn test_to_response_copies_series() {
        let mut window = HistoryWindow::new();
        window.append(&reading(3), "08:15");

        let response = window.series().to_response();
        assert_eq!(response.labels, vec!["08:15".to_string()]);
        assert_eq!(response.co2, vec![403]);
    }
}
