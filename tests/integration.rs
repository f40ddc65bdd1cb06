use std::{fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> String {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_agentic-savings"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );

    stdout_str.to_string()
}

fn run_bin_failing(args: &[&str]) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_agentic-savings"));
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");
    assert!(!output.status.success(), "expected failure with {args:?}");
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let agents_path = test_dir.join("agents.toml");
    let agents_contents = String::new()
        + "[[agents]]\n"
        + "id = 1\n"
        + "name = \"Router\"\n"
        + "role = \"Routing\"\n"
        + "weight = 100.0\n"
        + "color = \"#10b981\"\n"
        + "\n"
        + "[[agents]]\n"
        + "id = 2\n"
        + "name = \"Responder\"\n"
        + "role = \"Response Generation\"\n"
        + "weight = 300.0\n"
        + "color = \"#ef4444\"\n";

    fs::write(&agents_path, agents_contents).expect("failed to write agents file");

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");
    let agents_str = agents_path
        .to_str()
        .expect("failed to convert agents path to string");

    run_bin(&["--work-dir", test_dir_str, "init"]);
    assert!(test_dir.join("config.toml").exists());
    run_bin_failing(&["--work-dir", test_dir_str, "init"]);

    let cost = run_bin(&["--work-dir", test_dir_str, "cost"]);
    assert!(cost.contains("57.5%"), "{cost}");

    let prompt = "a".repeat(400);
    let analysis = run_bin(&[
        "--work-dir",
        test_dir_str,
        "analyze",
        "--text",
        &prompt,
        "--estimate",
    ]);
    assert!(analysis.contains("character-based estimation"), "{analysis}");
    assert!(analysis.contains("57.5%"), "{analysis}");

    run_bin(&[
        "--work-dir",
        test_dir_str,
        "analyze",
        "--text",
        "Summarize the attached quarterly report.",
    ]);
    run_bin_failing(&["--work-dir", test_dir_str, "analyze", "--text", "   "]);

    let project = run_bin(&["--work-dir", test_dir_str, "project", "--price", "0.01"]);
    assert!(project.contains("100M tokens"), "{project}");

    run_bin(&["--work-dir", test_dir_str, "providers"]);
    run_bin(&["--work-dir", test_dir_str, "providers", "--provider", "anthropic"]);

    let first = run_bin(&[
        "--work-dir",
        test_dir_str,
        "breakdown",
        "--text",
        "Review the database migration strategy.",
        "--seed",
        "7",
    ]);
    let second = run_bin(&[
        "--work-dir",
        test_dir_str,
        "breakdown",
        "--text",
        "Review the database migration strategy.",
        "--seed",
        "7",
    ]);
    assert_eq!(first, second);

    let idx = run_bin(&[
        "--work-dir",
        test_dir_str,
        "scenario",
        "add",
        "--name",
        "Lean",
        "--agents",
        agents_str,
    ]);
    assert_eq!(idx.trim(), "0");

    let list = run_bin(&["--work-dir", test_dir_str, "scenario", "list"]);
    assert!(list.contains("Lean"), "{list}");

    run_bin(&["--work-dir", test_dir_str, "scenario", "show", "--idx", "0"]);
    let scenario_analysis = run_bin(&[
        "--work-dir",
        test_dir_str,
        "analyze",
        "--text",
        "Classify this ticket.",
        "--scenario",
        "0",
    ]);
    assert!(scenario_analysis.contains("Router"), "{scenario_analysis}");
    assert!(scenario_analysis.contains("Responder"), "{scenario_analysis}");

    let achievements = run_bin(&[
        "--work-dir",
        test_dir_str,
        "achievements",
        "--monthly-tokens",
        "10000",
    ]);
    assert!(achievements.contains("[x] Workflow Architect"), "{achievements}");

    run_bin(&["--work-dir", test_dir_str, "export"]);
    let csv = fs::read_to_string(test_dir.join("report.csv")).expect("failed to read report");
    assert!(csv.starts_with("Agentic Workflow Analysis Report\nGenerated: "));
    assert!(csv.contains("\nMetric,Monolithic,Agentic,Savings\n"));
    assert!(csv.contains("\nTokens/Month,Monolithic Cost,Agentic Cost,Monthly Savings\n"));

    run_bin(&["--work-dir", test_dir_str, "scenario", "remove", "--idx", "0"]);
    run_bin_failing(&["--work-dir", test_dir_str, "scenario", "show", "--idx", "0"]);

    fs::remove_dir_all(&test_dir).ok();
}
