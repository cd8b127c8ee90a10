//! Integration tests for Critic

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Binary with an isolated config file and no ambient secrets
    fn critic(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("critic");
        cmd.env("CRITIC_CONFIG", dir.path().join("config.toml"))
            .env_remove("GITHUB_ACCESS_TOKEN")
            .env_remove("OPENAI_API")
            .env_remove("REDIS_HOST")
            .env_remove("REDIS_PORT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn memory_config(dir: &TempDir) {
        std::fs::write(
            dir.path().join("config.toml"),
            "[cache]\nbackend = \"memory\"\n",
        )
        .unwrap();
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("AI code review"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("critic"));
    }

    #[test]
    fn config_path_follows_flag() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(dir.path().to_string_lossy().as_ref()));
    }

    #[test]
    fn config_show_redacts_secrets() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .env("OPENAI_API", "sk-very-secret")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[redis]"))
            .stdout(predicate::str::contains("***"))
            .stdout(predicate::str::contains("sk-very-secret").not());
    }

    #[test]
    fn config_init_writes_file() {
        let dir = TempDir::new().unwrap();
        critic(&dir).args(["config", "init"]).assert().success();

        let written = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(written.contains("gpt-4-turbo"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[redis]\nport = \"many\"\n").unwrap();
        critic(&dir)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn review_rejects_invalid_link() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .args(["review", "--url", "https://gitlab.com/owner/repo", "--level", "junior"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("GitHub link is not valid"));
    }

    #[test]
    fn review_rejects_unknown_level() {
        let dir = TempDir::new().unwrap();
        critic(&dir)
            .args(["review", "--url", "https://github.com/o/r", "--level", "guru"])
            .assert()
            .failure();
    }

    #[test]
    fn review_without_openai_key_hints() {
        let dir = TempDir::new().unwrap();
        memory_config(&dir);
        critic(&dir)
            .args(["review", "--url", "https://github.com/o/r", "--level", "middle"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("openai.api_key"))
            .stderr(predicate::str::contains("OPENAI_API"));
    }

    #[test]
    fn status_with_memory_store() {
        let dir = TempDir::new().unwrap();
        memory_config(&dir);
        critic(&dir)
            .arg("status")
            .assert()
            .success()
            .stdout(predicate::str::contains("Reachable"))
            .stdout(predicate::str::contains("missing"));
    }

    #[test]
    fn cache_show_missing_entry() {
        let dir = TempDir::new().unwrap();
        memory_config(&dir);
        critic(&dir)
            .args(["cache", "show", "--repo", "abc123"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No entry under repo_abc123"));
    }

    #[test]
    fn cache_show_requires_target() {
        let dir = TempDir::new().unwrap();
        critic(&dir).args(["cache", "show"]).assert().failure();
    }
}

mod pipeline_tests {
    use critic::cache::{CacheKey, CacheStore, MemoryStore};
    use critic::config::Config;
    use critic::review::{DeveloperLevel, ReviewRequest, Reviewer};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const REPO: &str = "/repos/octo/demo";

    async fn mount_github(server: &MockServer) {
        let base = server.uri();
        Mock::given(method("GET"))
            .and(path(REPO))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"default_branch": "main"})),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/commits/main")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "abc123"})))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/contents/")))
            .and(query_param("ref", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"path": "app.py", "sha": "f1", "type": "file",
                 "url": format!("{base}/blobs/app.py")},
                {"path": "assets", "sha": "d1", "type": "dir",
                 "url": format!("{base}/dirs/assets")}
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{REPO}/contents/assets")))
            .and(query_param("ref", "abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"path": "assets/logo.png", "sha": "f9", "type": "file",
                 "url": format!("{base}/blobs/logo.png")}
            ])))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blobs/app.py"))
            // "print(1)"
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"content": "cHJp\nbnQoMSk=\n"})),
            )
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blobs/logo.png"))
            // PNG signature bytes, not UTF-8
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"content": "iVBORw0KGgo="})),
            )
            .mount(server)
            .await;
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    async fn mount_openai(server: &MockServer) {
        // The aggregation prompt carries the concatenated file reviews
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("Looks fine--Not text--"))
            .respond_with(completion(r#"{"message": "Tidy and correct", "grade": 5}"#))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("print(1)"))
            .respond_with(completion("Looks fine"))
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_string_contains("Error when trying to decode file content"))
            .respond_with(completion("Not text"))
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn review_is_computed_once_then_served_from_cache() {
        let github = MockServer::start().await;
        let openai = MockServer::start().await;
        mount_github(&github).await;
        mount_openai(&openai).await;

        let mut config = Config::default();
        config.github.api_url = github.uri();
        config.openai.api_url = openai.uri();
        config.openai.api_key = Some("sk-test".to_string());

        let store = Arc::new(MemoryStore::new());
        let shared: Arc<dyn CacheStore> = store.clone();
        let reviewer = Reviewer::from_config(&config, shared).unwrap();
        let request = ReviewRequest {
            task_requirements: "Print a number".to_string(),
            git_hub_url: "https://github.com/octo/demo".to_string(),
            developer_level: DeveloperLevel::Middle,
        };

        let first = reviewer.review(&request).await.unwrap();
        assert_eq!(first.message, "Tidy and correct");
        assert_eq!(first.grade.map(|g| g.value()), Some(5));
        assert_eq!(first.file_names, ["app.py", "assets/logo.png"]);
        assert_eq!(
            store.get(&CacheKey::file("app.py", "f1")).await.unwrap().as_deref(),
            Some("Looks fine")
        );

        let second = reviewer.review(&request).await.unwrap();
        assert_eq!(second, first);
        assert_eq!(store.writes(), 3);
        // MockServer verifies the single-call expectations on drop
    }
}
