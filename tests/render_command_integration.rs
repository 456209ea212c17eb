//! Integration tests for the `render` command.
//!
//! A mock server plays the metrics server so the whole path (placeholder discovery,
//! concurrent `/chartData` requests, chart mounting, and HTML output) runs without network access.

use camino::Utf8PathBuf;
use repo_charts::Host;
use repo_charts::facts::SampleStore;
use std::fs;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to in-memory buffers.
#[derive(Default)]
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
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

    fn exit(&mut self, _code: i32) {}
}

/// Answer `/chartData?repo=<repo>` exactly once with `response`.
async fn mount_chart_data(server: &MockServer, repo: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/chartData"))
        .and(query_param("repo", repo))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn write_config(dir: &Path, text: &str) -> String {
    let path = dir.join("charts.toml");
    fs::write(&path, text).unwrap();
    path.to_str().unwrap().to_string()
}

/// The chunk of the page between the opening tag of the element with `id` and the next `</div>`.
fn mount_contents<'a>(html: &'a str, id: &str) -> &'a str {
    let open = format!("<div id=\"{id}\" class=\"repo chart\">");
    let start = html.find(&open).unwrap() + open.len();
    let end = html[start..].find("</div>").unwrap() + start;
    &html[start..end]
}

#[tokio::test]
async fn test_render_from_chart_data_server() {
    let server = MockServer::start().await;
    mount_chart_data(
        &server,
        "octo/repo",
        ResponseTemplate::new(200).set_body_string(
            r#"{"rname":"octo/repo","labels":["03/10 09AM","03/10 10AM"],"cont":[1,2],"watch":[3,4],"star":[5,6]}"#,
        ),
    )
    .await;
    mount_chart_data(
        &server,
        "bad/payload",
        ResponseTemplate::new(200).set_body_string(r#"{"rname":"bad/payload","labels":["x"],"cont":[1],"watch":[1]}"#),
    )
    .await;
    mount_chart_data(&server, "broken/repo", ResponseTemplate::new(500).set_body_string("{}")).await;

    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "title = \"Team Dashboard\"\n");
    let output = dir.path().join("charts.html");

    let mut host = TestHost::default();
    repo_charts::run(
        &mut host,
        [
            "repo-charts",
            "render",
            "--config",
            &config,
            "--endpoint",
            &server.uri(),
            "--output",
            output.to_str().unwrap(),
            "--repo",
            "octo/repo",
            "--repo",
            "broken/repo",
            "--repo",
            "bad/payload",
        ],
    )
    .await
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains("<title>Team Dashboard</title>"));

    let mounted = mount_contents(&html, "octo/repo");
    assert_eq!(mounted.matches("<svg").count(), 1);
    assert!(mounted.contains("width=\"500\" height=\"500\""));
    assert!(mounted.contains("03/10 09AM"));

    assert!(!mount_contents(&html, "broken/repo").contains("<svg"));
    assert!(!mount_contents(&html, "bad/payload").contains("<svg"));

    assert!(host.output_str().contains("Rendered 1 of 3 chart(s)"));
    let errors = host.error_str();
    assert!(errors.contains("'broken/repo'"));
    assert!(errors.contains("500"));
    assert!(errors.contains("'bad/payload'"));
    assert!(errors.contains("star"));

    server.verify().await;
}

#[tokio::test]
async fn test_render_from_sample_store() {
    let dir = tempfile::tempdir().unwrap();
    let samples = Utf8PathBuf::from_path_buf(dir.path().join("samples")).unwrap();
    let _ = SampleStore::new(samples.clone()).record("octo/repo", [4.0, 9.0, 120.0]).unwrap();

    let config = write_config(dir.path(), "repos = [\"octo/repo\", \"empty/repo\"]\n");
    let output = dir.path().join("out.html");

    let mut host = TestHost::default();
    repo_charts::run(
        &mut host,
        [
            "repo-charts",
            "render",
            "--config",
            &config,
            "--samples",
            samples.as_str(),
            "--output",
            output.to_str().unwrap(),
        ],
    )
    .await
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert_eq!(mount_contents(&html, "octo/repo").matches("<svg").count(), 1);

    // No samples yet still produces an (empty) chart
    assert_eq!(mount_contents(&html, "empty/repo").matches("<svg").count(), 1);

    assert!(host.output_str().contains("Rendered 2 of 2 chart(s)"));
    assert!(host.error_buf.is_empty(), "{}", host.error_str());
}

#[tokio::test]
async fn test_render_with_bad_label_format_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let samples = Utf8PathBuf::from_path_buf(dir.path().join("samples")).unwrap();
    let _ = SampleStore::new(samples.clone()).record("octo/repo", [1.0, 2.0, 3.0]).unwrap();

    let config = write_config(dir.path(), "repos = [\"octo/repo\"]\nlabel_format = \"%Q\"\n");
    let output = dir.path().join("out.html");

    let mut host = TestHost::default();
    repo_charts::run(
        &mut host,
        [
            "repo-charts",
            "render",
            "--config",
            &config,
            "--samples",
            samples.as_str(),
            "--output",
            output.to_str().unwrap(),
        ],
    )
    .await
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(!mount_contents(&html, "octo/repo").contains("<svg"));

    assert!(host.output_str().contains("Rendered 0 of 1 chart(s)"));
    let errors = host.error_str();
    assert!(errors.contains("label format '%Q' is not a valid chrono format string"));
    assert!(errors.contains("Could not render chart for 'octo/repo'"));
}

#[tokio::test]
async fn test_render_without_repos_writes_empty_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), "");
    let output = dir.path().join("empty.html");

    let mut host = TestHost::default();
    repo_charts::run(
        &mut host,
        [
            "repo-charts",
            "render",
            "--config",
            &config,
            "--samples",
            dir.path().to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    )
    .await
    .unwrap();

    let html = fs::read_to_string(&output).unwrap();
    assert!(!html.contains("<svg"));
    assert!(host.output_str().contains("Rendered 0 of 0 chart(s)"));
}
