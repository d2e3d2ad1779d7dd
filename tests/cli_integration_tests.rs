//! Runs the funcstack binary against fixture stacks

mod support;

use support::StackFixture;
use tokio::process::Command;

fn fixture() -> StackFixture {
    let fixture = StackFixture::new("cli", "westeurope");
    fixture
        .unit("web", "node", Some("10"))
        .function("My Function", "run");
    fixture
}

#[tokio::test]
async fn test_cli_help_works() {
    let output = Command::new(env!("CARGO_BIN_EXE_funcstack"))
        .arg("--help")
        .output()
        .await
        .expect("Failed to run funcstack --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("deploy"));
}

#[tokio::test]
async fn test_inspect_json_report() {
    let fixture = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_funcstack"))
        .arg("inspect")
        .arg(fixture.root())
        .args(["--format", "json"])
        .output()
        .await
        .expect("Failed to run funcstack inspect");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["name"], "cli");
    assert_eq!(report["stage"], "ci");
    let deployment = &report["deployments"][0];
    assert_eq!(deployment["name"], "cliweb");
    assert_eq!(deployment["runtime"], "node10");
    assert_eq!(deployment["state"], "not_deployed");
    let function = &deployment["functions"][0];
    assert_eq!(function["name"], "my-function");
    assert_eq!(function["description"], "my function");
    assert_eq!(function["runtime"], "nodejs10");
    assert_eq!(function["memory_size"], "1536");
    assert!(function["url"].is_null());
}

#[tokio::test]
async fn test_dry_run_deploy_lists_commands() {
    let fixture = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_funcstack"))
        .arg("deploy")
        .arg(fixture.root())
        .args(["--dry-run", "--remove-after", "--format", "json"])
        .output()
        .await
        .expect("Failed to run funcstack deploy --dry-run");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let commands: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(commands.len(), 4);
    assert!(commands[0].starts_with("az group create -n cliweb"));
    assert!(commands[1].starts_with("az group deployment create"));
    let template_words = shell_words::split(&commands[1]).unwrap();
    assert_eq!(template_words.last().map(String::as_str), Some("nodeVersion=10"));
    assert!(template_words.contains(&"location=westeurope".to_string()));
    assert!(commands[2].starts_with("func azure functionapp publish cliweb"));
    assert!(commands[3].starts_with("az group delete -n cliweb"));
}

#[tokio::test]
async fn test_missing_stack_file_fails() {
    let root = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_funcstack"))
        .arg("inspect")
        .arg(root.path())
        .output()
        .await
        .expect("Failed to run funcstack inspect");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stack.json"));
}
