use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "castaway-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

/// Config file that disables pre-menu events so scripted input stays aligned.
fn quiet_config(dir: &Path) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create temp dir");
    let path = dir.join("quiet.json");
    std::fs::write(&path, r#"{ "daily_event_chance": 0.0 }"#).expect("write config");
    path
}

fn run_game(dir: &Path, extra: &[&str], stdin: &str) -> Output {
    let exe = env!("CARGO_BIN_EXE_castaway");
    let mut child = Command::new(exe)
        .args(["--no-color", "--seed", "7", "--save-dir"])
        .arg(dir.join("saves"))
        .args(extra)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn castaway");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("run castaway")
}

#[test]
fn quit_from_main_menu() {
    let dir = temp_path("quit");
    let output = run_game(&dir, &[], "3\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("MAIN MENU"));
    assert!(stdout.contains("Thanks for playing"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn invalid_menu_choice_reprompts() {
    let dir = temp_path("invalid");
    let output = run_game(&dir, &[], "9\n3\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Invalid choice. Please enter 1, 2 or 3."));
    assert_eq!(stdout.matches("MAIN MENU").count(), 2);
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn end_of_input_mid_game_exits_cleanly() {
    let dir = temp_path("eof");
    let output = run_game(&dir, &[], "1\nNobody\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome Nobody!"));
    assert!(stdout.contains("Thanks for playing"));
    assert!(!dir.join("saves").join("savegame.json").exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn sleeping_every_day_dies_of_thirst() {
    let dir = temp_path("sleep");
    let config = quiet_config(&dir);
    let output = run_game(
        &dir,
        &["--config", config.to_str().expect("utf-8 path")],
        "1\nSleeper\n3\n3\n3\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("📅 DAY 2 - Sleeper"));
    assert!(stdout.contains("GAME OVER"));
    assert!(stdout.contains("Died of dehydration..."));
    assert!(stdout.contains("You survived 3 day(s)."));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn surviving_past_target_is_victory() {
    let dir = temp_path("victory");
    let config = quiet_config(&dir);
    let output = run_game(
        &dir,
        &[
            "--config",
            config.to_str().expect("utf-8 path"),
            "--target-days",
            "1",
        ],
        "1\n\nsearch_water\n3\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome Adventurer!"));
    assert!(stdout.contains("VICTORY"));
    assert!(stdout.contains("Congratulations Adventurer!"));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn saved_game_can_be_loaded() {
    let dir = temp_path("save");
    let config = quiet_config(&dir);
    let config = config.to_str().expect("utf-8 path");

    // sleep once, save, quit without saving again, then reload
    let output = run_game(
        &dir,
        &["--config", config],
        "1\nSaver\n3\nS\nQ\n2\n2\nQ\n2\n3\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Game saved successfully!"));
    assert!(stdout.contains("Game loaded successfully!"));
    assert!(stdout.contains("Welcome back Saver!"));
    assert!(stdout.contains("📅 Day 2"));

    let save = dir.join("saves").join("savegame.json");
    let json = std::fs::read_to_string(&save).expect("save file written");
    assert!(json.contains("\"name\": \"Saver\""));
    assert!(json.contains("\"day\": 2"));
    assert!(json.contains("\"save_date\""));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn loading_without_a_save_reports_it() {
    let dir = temp_path("nosave");
    let output = run_game(&dir, &[], "2\n3\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No saved game found."));
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn finished_run_deletes_the_save() {
    let dir = temp_path("cleanup");
    let config = quiet_config(&dir);
    let config = config.to_str().expect("utf-8 path");
    let output = run_game(&dir, &["--config", config], "1\nGone\nS\n3\n3\n3\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Game saved successfully!"));
    assert!(stdout.contains("GAME OVER"));
    assert!(!dir.join("saves").join("savegame.json").exists());
    let _ = std::fs::remove_dir_all(dir);
}
