mod support;

use predicates::str::contains;

use support::{habitual_cmd, TestHome};

#[test]
fn habitual_help_works() {
    habitual_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("personal habit checklist"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "signup",
        "login",
        "logout",
        "whoami",
        "task",
        "check",
        "day",
        "stats",
        "calendar",
        "achievements",
        "profile",
        "goals",
        "theme",
        "export",
        "import",
        "share",
        "quote",
    ];

    for cmd in subcommands {
        habitual_cmd().arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn quote_needs_no_account() {
    let home = TestHome::new();
    let value = home.json(&["quote"]);
    assert_eq!(value["schema_version"], "habitual.v1");
    assert_eq!(value["command"], "quote");
    assert_eq!(value["data"]["date"], "2024-01-10");
    assert!(!value["data"]["quote"].as_str().unwrap_or_default().is_empty());
}

#[test]
fn quote_is_stable_for_a_day() {
    let home = TestHome::new();
    let first = home.json(&["quote"]);
    let second = home.json(&["quote"]);
    assert_eq!(first["data"]["quote"], second["data"]["quote"]);
}

#[test]
fn commands_without_session_exit_with_auth_code() {
    let home = TestHome::new();
    let value = home.json_err(&["stats"], 3);
    assert_eq!(value["status"], "error");
    assert_eq!(value["command"], "stats");
    assert_eq!(value["error"]["kind"], "auth_required");
    assert!(value["next_steps"][0]
        .as_str()
        .unwrap_or_default()
        .starts_with("habitual login"));
}

#[test]
fn human_errors_go_to_stderr() {
    let home = TestHome::new();
    home.cmd()
        .args(["task", "ls"])
        .assert()
        .code(3)
        .stderr(contains("error: Not logged in"))
        .stderr(contains("hint: habitual login"));
}

#[test]
fn invalid_today_is_a_user_error() {
    let home = TestHome::new();
    home.cmd_on("2024-13-40")
        .args(["quote", "--json"])
        .assert()
        .code(2)
        .stdout(contains("\"user_error\""));
}

#[test]
fn quiet_suppresses_human_output() {
    let home = TestHome::new();
    home.cmd()
        .args(["quote", "-q"])
        .assert()
        .success()
        .stdout(predicates::str::is_empty());
}
