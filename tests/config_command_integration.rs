//! Integration tests for the `init` and `validate` commands.

use repo_charts::Host;
use std::fs;

#[derive(Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

#[tokio::test]
async fn test_init_then_validate_each_format() {
    let dir = tempfile::tempdir().unwrap();

    for name in ["charts.toml", "charts.yaml", "charts.json"] {
        let path = dir.path().join(name);
        let path = path.to_str().unwrap();

        let mut host = TestHost::default();
        repo_charts::run(&mut host, ["repo-charts", "init", path]).await.unwrap();
        assert!(host.output_str().contains(path));

        let mut host = TestHost::default();
        repo_charts::run(&mut host, ["repo-charts", "validate", "--config", path]).await.unwrap();
        assert!(host.output_str().contains("Configuration validation successful"), "{name}");
        assert!(host.error_buf.is_empty(), "{name}: {}", host.error_str());
    }
}

#[tokio::test]
async fn test_validate_rejects_unknown_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charts.toml");
    fs::write(&path, "repos = []\ncolour = \"red\"\n").unwrap();

    let mut host = TestHost::default();
    let result = repo_charts::run(&mut host, ["repo-charts", "validate", "--config", path.to_str().unwrap()]).await;

    let _ = result.unwrap_err();
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("Configuration validation failed"));
}

#[tokio::test]
async fn test_validate_reports_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("charts.yml");
    fs::write(&path, "repos:\n  - octo/repo\n  - not a repo\nbucket_minutes: 0\n").unwrap();

    let mut host = TestHost::default();
    repo_charts::run(&mut host, ["repo-charts", "validate", "--config", path.to_str().unwrap()])
        .await
        .unwrap();

    let errors = host.error_str();
    assert!(errors.contains("'not a repo' is not of the form 'owner/name'"));
    assert!(errors.contains("bucket_minutes"));
    assert_eq!(host.exit_code, None);
}
