//! Achievement catalog and evaluation.
//!
//! Unlock state is derived from the current stores on every call and is never
//! persisted. Predicates only read statistics, never other achievements.

use chrono::NaiveDate;
use serde::Serialize;

use crate::completion::CompletionStore;
use crate::profile::Profile;
use crate::stats;
use crate::task::TaskRegistry;

/// Weeks scanned by the perfect-week achievement.
const PERFECT_WEEK_SCAN: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Inputs every predicate may read.
pub struct AchievementInput<'a> {
    pub store: &'a CompletionStore,
    pub registry: &'a TaskRegistry,
    pub profile: &'a Profile,
    pub today: NaiveDate,
}

/// Figures computed once per evaluation.
struct Facts {
    task_count: usize,
    tracked_days: usize,
    current_streak: u32,
    perfect_weeks: u32,
    profile_complete: bool,
}

impl Facts {
    fn gather(input: &AchievementInput<'_>) -> Self {
        Self {
            task_count: input.registry.len(),
            tracked_days: stats::tracked_days(input.store),
            current_streak: stats::current_streak(input.store, input.today),
            perfect_weeks: stats::perfect_weeks(input.store, input.today, PERFECT_WEEK_SCAN),
            profile_complete: input.profile.is_complete(),
        }
    }
}

pub struct Achievement {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    unlocked: fn(&Facts) -> bool,
}

/// The fixed catalog, in display order.
pub static CATALOG: [Achievement; 10] = [
    Achievement {
        id: "first-task",
        name: "Getting Started",
        description: "Create your first task",
        rarity: Rarity::Common,
        unlocked: |facts| facts.task_count > 0,
    },
    Achievement {
        id: "first-day",
        name: "Day One",
        description: "Track your first day",
        rarity: Rarity::Common,
        unlocked: |facts| facts.tracked_days >= 1,
    },
    Achievement {
        id: "three-day-streak",
        name: "3-Day Streak",
        description: "Complete tasks three days in a row",
        rarity: Rarity::Uncommon,
        unlocked: |facts| facts.current_streak >= 3,
    },
    Achievement {
        id: "week-streak",
        name: "Week Warrior",
        description: "Keep a streak going for seven days",
        rarity: Rarity::Uncommon,
        unlocked: |facts| facts.current_streak >= 7,
    },
    Achievement {
        id: "perfect-week",
        name: "Perfect Week",
        description: "Finish every tracked task for a whole week",
        rarity: Rarity::Rare,
        unlocked: |facts| facts.perfect_weeks >= 1,
    },
    Achievement {
        id: "analytics-pro",
        name: "Analytics Pro",
        description: "Track five days of progress",
        rarity: Rarity::Uncommon,
        unlocked: |facts| facts.tracked_days >= 5,
    },
    Achievement {
        id: "profile-master",
        name: "Profile Complete",
        description: "Fill in name, email, location, title and bio",
        rarity: Rarity::Uncommon,
        unlocked: |facts| facts.profile_complete,
    },
    Achievement {
        id: "task-master",
        name: "Task Master",
        description: "Create ten tasks",
        rarity: Rarity::Rare,
        unlocked: |facts| facts.task_count >= 10,
    },
    Achievement {
        id: "fifty-days",
        name: "Committed",
        description: "Track fifty days",
        rarity: Rarity::Epic,
        unlocked: |facts| facts.tracked_days >= 50,
    },
    Achievement {
        id: "hundred-days",
        name: "Legendary",
        description: "Track one hundred days",
        rarity: Rarity::Legendary,
        unlocked: |facts| facts.tracked_days >= 100,
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub unlocked: bool,
}

pub fn evaluate(input: &AchievementInput<'_>) -> Vec<AchievementStatus> {
    let facts = Facts::gather(input);
    CATALOG
        .iter()
        .map(|achievement| AchievementStatus {
            id: achievement.id,
            name: achievement.name,
            description: achievement.description,
            rarity: achievement.rarity,
            unlocked: (achievement.unlocked)(&facts),
        })
        .collect()
}

pub fn unlocked_count(statuses: &[AchievementStatus]) -> usize {
    statuses.iter().filter(|status| status.unlocked).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::task::TaskDraft;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    fn unlocked_ids(input: &AchievementInput<'_>) -> Vec<&'static str> {
        evaluate(input)
            .into_iter()
            .filter(|status| status.unlocked)
            .map(|status| status.id)
            .collect()
    }

    #[test]
    fn catalog_ids_are_unique_and_stable() {
        let ids: Vec<&str> = CATALOG.iter().map(|a| a.id).collect();
        assert_eq!(ids.first(), Some(&"first-task"));
        assert_eq!(ids.last(), Some(&"hundred-days"));
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), ids.len());
    }

    #[test]
    fn empty_state_only_unlocks_lenient_perfect_week() {
        let store = CompletionStore::new();
        let registry = TaskRegistry::default();
        let profile = Profile::default();
        let input = AchievementInput {
            store: &store,
            registry: &registry,
            profile: &profile,
            today: day("2024-01-10"),
        };
        assert_eq!(unlocked_ids(&input), vec!["perfect-week"]);
    }

    #[test]
    fn three_day_streak_unlocks() {
        let today = day("2024-01-10");
        let mut store = CompletionStore::new();
        for offset in 0..3 {
            store.toggle(today - Duration::days(offset), "a");
        }
        let mut registry = TaskRegistry::default();
        registry.push(TaskDraft::new("Read").build(today, Utc::now()).unwrap());
        let profile = Profile::default();

        let input = AchievementInput {
            store: &store,
            registry: &registry,
            profile: &profile,
            today,
        };
        let ids = unlocked_ids(&input);
        assert!(ids.contains(&"first-task"));
        assert!(ids.contains(&"first-day"));
        assert!(ids.contains(&"three-day-streak"));
        assert!(!ids.contains(&"week-streak"));
        assert!(!ids.contains(&"analytics-pro"));
        assert_eq!(unlocked_count(&evaluate(&input)), ids.len());
    }

    #[test]
    fn tracked_day_milestones() {
        let today = day("2024-06-01");
        let mut store = CompletionStore::new();
        for offset in 0..100 {
            store.seed(today - Duration::days(offset * 2), ["a"]);
        }
        let registry = TaskRegistry::default();
        let profile = Profile::default();
        let input = AchievementInput {
            store: &store,
            registry: &registry,
            profile: &profile,
            today,
        };
        let ids = unlocked_ids(&input);
        assert!(ids.contains(&"analytics-pro"));
        assert!(ids.contains(&"fifty-days"));
        assert!(ids.contains(&"hundred-days"));
        assert!(!ids.contains(&"three-day-streak"));
    }
}
