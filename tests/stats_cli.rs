mod support;

use serde_json::Value;

use support::TestHome;

/// Home with one task checked off on Jan 8, 9 and 10.
fn three_day_run() -> (TestHome, String) {
    let home = TestHome::signed_up();
    let id = home.add_task("Read", &[]);
    for date in ["2024-01-08", "2024-01-09", "2024-01-10"] {
        home.json(&["check", &id, "--date", date]);
    }
    (home, id)
}

fn achievement<'a>(value: &'a Value, id: &str) -> &'a Value {
    value["data"]["achievements"]
        .as_array()
        .expect("achievement list")
        .iter()
        .find(|entry| entry["id"] == id)
        .expect("achievement present")
}

#[test]
fn stats_report_streaks_and_window() {
    let (home, _) = three_day_run();
    let value = home.json(&["stats"]);
    let stats = &value["data"];

    assert_eq!(stats["today"], "2024-01-10");
    assert_eq!(stats["current_streak"], 3);
    assert_eq!(stats["longest_streak"], 3);
    assert_eq!(stats["tracked_days"], 3);
    assert_eq!(stats["days_active"], 3);
    assert_eq!(stats["consistency"], 43);
    assert_eq!(stats["overall_completion"], 100);
    assert_eq!(stats["avg_completed_per_day"], 1);
    assert_eq!(stats["today_completion"]["percentage"], 100);
    assert_eq!(stats["last_seven_days"].as_array().map(Vec::len), Some(3));
}

#[test]
fn stats_include_goal_progress() {
    let (home, _) = three_day_run();
    let value = home.json(&["stats"]);
    let progress = &value["data"]["goal_progress"];

    assert_eq!(progress["completion"], 100);
    assert_eq!(progress["tasks_per_day"], 20);
    assert_eq!(progress["streak"], 43);
}

#[test]
fn unchecked_today_breaks_the_current_streak() {
    let home = TestHome::signed_up();
    let id = home.add_task("Stretch", &["--recurrence", "daily"]);
    home.json(&["check", &id, "--date", "2024-01-09"]);

    let value = home.json(&["stats"]);
    assert_eq!(value["data"]["current_streak"], 0);
    assert_eq!(value["data"]["longest_streak"], 1);
    assert_eq!(value["data"]["today_completion"]["total"], 1);
    assert_eq!(value["data"]["today_completion"]["completed"], 0);
}

#[test]
fn empty_account_has_zeroed_stats() {
    let home = TestHome::signed_up();
    let value = home.json(&["stats"]);
    let stats = &value["data"];

    assert_eq!(stats["current_streak"], 0);
    assert_eq!(stats["overall_completion"], 0);
    assert_eq!(stats["tasks_total"], 0);
    assert_eq!(value["next_steps"][0], "habitual task add <label> --recurrence daily");
}

#[test]
fn calendar_shows_the_requested_month() {
    let (home, _) = three_day_run();
    let value = home.json(&["calendar", "--month", "2024-01"]);
    let view = &value["data"];

    assert_eq!(view["year"], 2024);
    assert_eq!(view["month"], 1);
    assert_eq!(view["leading_blanks"], 1);
    assert_eq!(view["days"].as_array().map(Vec::len), Some(31));
    assert_eq!(view["totals"]["active_days"], 3);
    assert_eq!(view["totals"]["perfect_days"], 3);
    assert_eq!(view["days"][9]["is_today"], true);
    assert_eq!(view["days"][10]["is_future"], true);
}

#[test]
fn calendar_rejects_bad_months() {
    let home = TestHome::signed_up();
    home.json_err(&["calendar", "--month", "2024-13"], 2);
    home.json_err(&["calendar", "--month", "January"], 2);
}

#[test]
fn calendar_human_output_has_a_grid() {
    let (home, _) = three_day_run();
    home.cmd()
        .args(["calendar"])
        .assert()
        .success()
        .stdout(predicates::str::contains("January 2024"))
        .stdout(predicates::str::contains("Su  Mo  Tu  We  Th  Fr  Sa"));
}

#[test]
fn achievements_unlock_from_activity() {
    let (home, _) = three_day_run();
    let value = home.json(&["achievements"]);

    assert_eq!(value["data"]["total"], 10);
    assert_eq!(achievement(&value, "first-task")["unlocked"], true);
    assert_eq!(achievement(&value, "first-day")["unlocked"], true);
    assert_eq!(achievement(&value, "three-day-streak")["unlocked"], true);
    assert_eq!(achievement(&value, "week-streak")["unlocked"], false);
    assert_eq!(achievement(&value, "hundred-days")["unlocked"], false);
}

#[test]
fn completing_the_profile_unlocks_its_badge() {
    let home = TestHome::signed_up();
    let before = home.json(&["achievements"]);
    assert_eq!(achievement(&before, "profile-master")["unlocked"], false);

    home.json(&[
        "profile",
        "set",
        "--location",
        "London",
        "--title",
        "Engineer",
        "--bio",
        "Counting things",
    ]);
    let after = home.json(&["achievements"]);
    assert_eq!(achievement(&after, "profile-master")["unlocked"], true);
}
