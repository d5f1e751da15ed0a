//! Share report: a brag sheet for the player's saves

use super::GameState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareReport {
    pub date: NaiveDate,
    pub saved: u32,
    pub hope: u8,
    pub daily_challenge: bool,
}

impl ShareReport {
    pub fn from_state(state: &GameState, date: NaiveDate) -> Self {
        Self {
            date,
            saved: state.today_saved_count,
            hope: state.hope_value,
            daily_challenge: state.is_daily_challenge,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.saved {
            0 => "Bystander",
            1..=2 => "Part-time Hero",
            3..=5 => "Crisis Wrangler",
            6..=11 => "World Stabiliser",
            _ => "Planetary Legend",
        }
    }

    pub fn headline(&self) -> String {
        format!("I saved the world {} times today!", self.saved)
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("WORLD RESCUE REPORT - {}", self.date.format("%Y-%m-%d")),
            String::new(),
            self.headline(),
            format!("Rank: {}", self.title()),
            format!("Hope left: {}%", self.hope),
        ];
        if self.daily_challenge {
            lines.push("Mode: Daily challenge".to_string());
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(saved: u32) -> ShareReport {
        ShareReport {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            saved,
            hope: 80,
            daily_challenge: false,
        }
    }

    #[test]
    fn title_grows_with_saves() {
        assert_eq!(report(0).title(), "Bystander");
        assert_eq!(report(3).title(), "Crisis Wrangler");
        assert_eq!(report(12).title(), "Planetary Legend");
    }

    #[test]
    fn lines_carry_date_and_count() {
        let lines = report(6).lines();
        assert_eq!(lines[0], "WORLD RESCUE REPORT - 2024-05-01");
        assert!(lines.contains(&"I saved the world 6 times today!".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Daily")));
    }
}
