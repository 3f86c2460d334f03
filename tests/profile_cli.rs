mod support;

use support::{TestHome, EMAIL};

#[test]
fn profile_is_filled_from_the_account() {
    let home = TestHome::signed_up();
    let value = home.json(&["profile", "show"]);
    assert_eq!(value["data"]["profile"]["name"], "Ada");
    assert_eq!(value["data"]["profile"]["email"], EMAIL);
    assert_eq!(value["data"]["complete"], false);
}

#[test]
fn profile_set_updates_fields() {
    let home = TestHome::signed_up();
    let value = home.json(&[
        "profile",
        "set",
        "--location",
        "London",
        "--dob",
        "1990-12-10",
    ]);
    assert_eq!(value["data"]["profile"]["location"], "London");
    assert_eq!(value["data"]["profile"]["dob"], "1990-12-10");

    let shown = home.json(&["profile", "show"]);
    assert_eq!(shown["data"]["profile"]["location"], "London");
}

#[test]
fn profile_set_requires_a_field() {
    let home = TestHome::signed_up();
    home.json_err(&["profile", "set"], 2);
    home.json_err(&["profile", "set", "--dob", "yesterday"], 2);
}

#[test]
fn goals_default_and_update() {
    let home = TestHome::signed_up();
    let shown = home.json(&["goals", "show"]);
    assert_eq!(shown["data"]["goals"]["target_completion_percent"], 80);
    assert_eq!(shown["data"]["goals"]["tasks_per_day"], 5);
    assert_eq!(shown["data"]["goals"]["streak_target_days"], 7);

    let updated = home.json(&["goals", "set", "--streak", "14", "--notes", "  keep going "]);
    assert_eq!(updated["data"]["goals"]["streak_target_days"], 14);
    assert_eq!(updated["data"]["goals"]["notes"], "keep going");
}

#[test]
fn invalid_goals_leave_the_old_values() {
    let home = TestHome::signed_up();
    home.json_err(&["goals", "set", "--target", "150", "--streak", "3"], 2);

    let shown = home.json(&["goals", "show"]);
    assert_eq!(shown["data"]["goals"]["target_completion_percent"], 80);
    assert_eq!(shown["data"]["goals"]["streak_target_days"], 7);
}

#[test]
fn theme_toggles_and_persists() {
    let home = TestHome::signed_up();
    let shown = home.json(&["theme", "show"]);
    assert_eq!(shown["data"]["theme"], "dark");
    assert_eq!(shown["data"]["changed"], false);

    let toggled = home.json(&["theme", "toggle"]);
    assert_eq!(toggled["data"]["theme"], "light");
    assert_eq!(toggled["data"]["changed"], true);

    let set = home.json(&["theme", "set", "light"]);
    assert_eq!(set["data"]["changed"], false);

    home.json_err(&["theme", "set", "sepia"], 2);
}
