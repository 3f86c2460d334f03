//! Daily motivation line.

use chrono::{Datelike, NaiveDate};

pub const QUOTES: [&str; 15] = [
    "Small progress is still progress. Keep going!",
    "Every finished task is a step toward your goals.",
    "You are stronger than you think.",
    "Consistency beats intensity. Show up again today.",
    "Focus on what matters today; tomorrow can wait.",
    "What you do today shapes tomorrow. Make it count.",
    "One task at a time. You've got this.",
    "Excellence grows out of small daily habits.",
    "Every champion was once a beginner.",
    "Celebrate the wins, however small.",
    "Great work comes from caring about the work.",
    "Growth happens just past your comfort zone.",
    "Be the energy you want to attract.",
    "Your path is your own. Walk it with pride.",
    "Dream big, work steadily, stay focused.",
];

/// Quote for `date`, stable for the whole day.
pub fn quote_for(date: NaiveDate) -> &'static str {
    QUOTES[date.ordinal0() as usize % QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn same_day_same_quote() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(quote_for(date), quote_for(date));
    }

    #[test]
    fn cycles_through_every_quote() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(quote_for(start), QUOTES[0]);
        let seen: std::collections::BTreeSet<&str> = (0..15)
            .map(|offset| quote_for(start + Duration::days(offset)))
            .collect();
        assert_eq!(seen.len(), QUOTES.len());
    }
}
