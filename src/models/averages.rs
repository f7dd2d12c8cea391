//! Price average response models
//!
//! The shapes returned to read-side consumers of the store: per-window
//! average price and sample count for one card.

use serde::{Deserialize, Serialize};

/// Trailing windows listings are bucketed into. Windows are nested, so a
/// listing may count toward several at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Week,
    Month,
    Year,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::Week, Window::Month, Window::Year];

    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Week => "week",
            Window::Month => "month",
            Window::Year => "year",
        }
    }

    /// Trailing length of the window in days
    pub fn days(&self) -> i64 {
        match self {
            Window::Week => 7,
            Window::Month => 30,
            Window::Year => 365,
        }
    }
}

/// Average price and number of qualifying listings in one window. An empty
/// window reports average 0.0 with count 0; that is a valid result, not an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowStats {
    pub average: f64,
    pub count: u64,
}

impl WindowStats {
    pub fn empty() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardAverages {
    pub week: WindowStats,
    pub month: WindowStats,
    pub year: WindowStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_days() {
        assert_eq!(Window::Week.days(), 7);
        assert_eq!(Window::Month.days(), 30);
        assert_eq!(Window::Year.days(), 365);
    }

    #[test]
    fn test_window_names() {
        let names: Vec<&str> = Window::ALL.iter().map(|w| w.as_str()).collect();
        assert_eq!(names, vec!["week", "month", "year"]);
    }

    #[test]
    fn test_empty_window_stats() {
        let stats = WindowStats::empty();
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.count, 0);
    }
}
