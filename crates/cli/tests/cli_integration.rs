use std::process::{Command, Output};

fn demo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_argparser-demo"))
}

fn run(args: &[&str]) -> Output {
    demo()
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run argparser-demo")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn help_works_without_numbers() {
    let out = run(&["--help"]);
    assert!(
        out.status.success(),
        "argparser-demo --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let text = stdout(&out);
    assert!(
        text.starts_with("argparser-demo\nSum or multiply a list of integers\n"),
        "unexpected help output:\n{text}"
    );
    assert!(text.contains("-s,  --sum,  Add the numbers"));
    assert!(text.contains("--N=<int>"));
    assert!(text.ends_with("-h, --help Display this help and exit\n"));
}

#[test]
fn sums_positional_numbers() {
    let out = run(&["-s", "1", "2", "3", "4", "5"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(stdout(&out).trim(), "15");
}

#[test]
fn multiplies_and_reports_json() {
    let out = run(&["--format=json", "2", "3", "4", "--mult"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&out)).expect("output should be JSON");
    assert_eq!(report["operation"], "product");
    assert_eq!(report["result"], 24);
    assert_eq!(report["numbers"], serde_json::json!([2, 3, 4]));
}

#[test]
fn missing_numbers_fail() {
    let out = run(&["--sum"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("missing or incomplete arguments"), "stderr:\n{stderr}");
}

#[test]
fn malformed_number_fails() {
    let out = run(&["--sum", "1", "two"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("invalid integer 'two'"), "stderr:\n{stderr}");
}

#[test]
fn unknown_option_fails() {
    let out = run(&["--sum", "--verbose", "1"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unknown argument: --verbose"), "stderr:\n{stderr}");
}

#[test]
fn describe_prints_schema() {
    let out = run(&["--describe"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    let schema: serde_json::Value =
        serde_json::from_str(&stdout(&out)).expect("schema should be JSON");
    assert_eq!(schema["name"], "argparser-demo");
    let args = schema["args"].as_array().expect("args array");
    let n = args.iter().find(|a| a["name"] == "N").expect("N declared");
    assert_eq!(n["positional"], true);
    assert_eq!(n["min-count"], 1);
}
