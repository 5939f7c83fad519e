//! Ordering and gating contract of the sync pipeline, exercised over
//! recording mocks so no network or git checkout is involved.

use release_mirror::cli::OutputManager;
use release_mirror::{
    FetchError, GitError, ManifestError, ManifestSource, MirrorConfig, MirrorError, PublishError,
    Release, ReleaseHost, ReleasePayload, SourceControl, SyncOutcome, SyncPipeline,
};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use url::Url;

type Log = Arc<Mutex<Vec<String>>>;

fn release(tag: &str, body: &str) -> Release {
    Release {
        tag_name: tag.to_string(),
        body: body.to_string(),
    }
}

fn test_config(dir: &Path) -> MirrorConfig {
    MirrorConfig {
        upstream_releases_url: Url::parse("https://api.example.test/repos/vendor/sdk/releases")
            .expect("static url"),
        downstream_releases_url: Url::parse("https://api.example.test/repos/mirror/sdk/releases")
            .expect("static url"),
        manifest_url: Url::parse("https://raw.example.test/vendor/sdk/master/Package.swift")
            .expect("static url"),
        manifest_path: dir.join("Package.swift"),
        git_binary: PathBuf::from("/usr/bin/git"),
        accept_header: "application/vnd.github.v3+json".to_string(),
        user_agent: "release_mirror-tests".to_string(),
    }
}

#[derive(Clone)]
struct MockHost {
    upstream_url: Url,
    upstream: Vec<Release>,
    downstream: Vec<Release>,
    publish_error: Option<u16>,
    published: Arc<Mutex<Vec<ReleasePayload>>>,
    log: Log,
}

impl MockHost {
    fn new(config: &MirrorConfig, upstream: Vec<Release>, downstream: Vec<Release>, log: Log) -> Self {
        Self {
            upstream_url: config.upstream_releases_url.clone(),
            upstream,
            downstream,
            publish_error: None,
            published: Arc::new(Mutex::new(Vec::new())),
            log,
        }
    }
}

impl ReleaseHost for MockHost {
    async fn fetch_releases(&self, url: &Url) -> Result<Vec<Release>, FetchError> {
        let (side, list) = if *url == self.upstream_url {
            ("upstream", &self.upstream)
        } else {
            ("downstream", &self.downstream)
        };
        self.log.lock().unwrap().push(format!("fetch {side}"));
        Ok(list.clone())
    }

    async fn create_release(
        &self,
        _url: &Url,
        token: &str,
        payload: &ReleasePayload,
    ) -> Result<(), PublishError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("publish {} token={token}", payload.tag_name));
        if let Some(status) = self.publish_error {
            return Err(PublishError::Status { status });
        }
        self.published.lock().unwrap().push(payload.clone());
        Ok(())
    }
}

#[derive(Clone)]
struct MockManifest {
    text: String,
    log: Log,
}

impl ManifestSource for MockManifest {
    async fn fetch_manifest(&self, _url: &Url) -> Result<String, ManifestError> {
        self.log.lock().unwrap().push("fetch manifest".to_string());
        Ok(self.text.clone())
    }
}

#[derive(Clone)]
struct MockGit {
    fail_on: Option<&'static str>,
    log: Log,
}

impl MockGit {
    fn new(log: Log) -> Self {
        Self { fail_on: None, log }
    }
}

impl SourceControl for MockGit {
    fn run(&self, args: &[&str]) -> Result<(), GitError> {
        self.log.lock().unwrap().push(format!("git {}", args.join(" ")));
        if self.fail_on == args.first().copied() {
            return Err(GitError::CommandFailed {
                args: args.iter().map(|a| a.to_string()).collect(),
                status: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn up_to_date_performs_no_side_effects() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let manifest_path = config.manifest_path.clone();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(
        &config,
        vec![release("v2.0", "notes")],
        vec![release("v2.0", "notes")],
        log.clone(),
    );
    let manifest = MockManifest {
        text: "// must never be fetched".to_string(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let outcome = pipeline.run("secret").await.expect("up to date is success");

    assert_eq!(
        outcome,
        SyncOutcome::UpToDate {
            tag: "v2.0".to_string()
        }
    );
    let mut fetches = entries(&log);
    fetches.sort();
    assert_eq!(fetches, vec!["fetch downstream", "fetch upstream"]);
    assert!(!manifest_path.exists());
}

#[tokio::test]
async fn diverged_writes_commits_pushes_and_publishes_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let manifest_path = config.manifest_path.clone();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(
        &config,
        vec![release("v2.1", "new"), release("v2.0", "old")],
        vec![release("v2.0", "old")],
        log.clone(),
    );
    let published = host.published.clone();
    let manifest = MockManifest {
        text: "// manifest v2.1".to_string(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let outcome = pipeline.run("secret").await.expect("sync succeeds");

    assert_eq!(
        outcome,
        SyncOutcome::Published {
            tag: "v2.1".to_string()
        }
    );

    // Both fetches complete before any side-effecting step.
    let all = entries(&log);
    let mut fetches = all[..2].to_vec();
    fetches.sort();
    assert_eq!(fetches, vec!["fetch downstream", "fetch upstream"]);
    assert_eq!(
        all[2..],
        [
            "fetch manifest",
            "git add .",
            "git commit -m Bump to v2.1",
            "git push",
            "publish v2.1 token=secret",
        ]
    );

    let written = std::fs::read_to_string(&manifest_path).expect("manifest written");
    assert_eq!(written, "// manifest v2.1");

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].tag_name, "v2.1");
    assert_eq!(published[0].name, "v2.1");
    assert_eq!(published[0].body, "new");
}

#[tokio::test]
async fn empty_manifest_aborts_before_any_side_effect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let manifest_path = config.manifest_path.clone();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(
        &config,
        vec![release("v2.1", "new")],
        vec![release("v2.0", "old")],
        log.clone(),
    );
    let manifest = MockManifest {
        text: String::new(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let err = pipeline.run("secret").await.expect_err("empty manifest is fatal");

    assert!(matches!(
        err,
        MirrorError::Manifest(ManifestError::Empty)
    ));
    assert!(!manifest_path.exists());
    let all = entries(&log);
    assert!(all.iter().all(|e| !e.starts_with("git ")));
    assert!(all.iter().all(|e| !e.starts_with("publish")));
}

#[tokio::test]
async fn empty_downstream_list_aborts_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(&config, vec![release("v2.1", "new")], vec![], log.clone());
    let manifest = MockManifest {
        text: "// manifest".to_string(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let err = pipeline.run("secret").await.expect_err("empty list is fatal");

    match err {
        MirrorError::Fetch(FetchError::NoReleases { repo }) => assert_eq!(repo, "downstream"),
        other => panic!("unexpected error: {other:?}"),
    }
    // Nothing after the two fetches.
    assert_eq!(entries(&log).len(), 2);
}

#[tokio::test]
async fn empty_upstream_list_aborts_everything() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(&config, vec![], vec![release("v2.0", "old")], log.clone());
    let manifest = MockManifest {
        text: "// manifest".to_string(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let err = pipeline.run("secret").await.expect_err("empty list is fatal");

    match err {
        MirrorError::Fetch(FetchError::NoReleases { repo }) => assert_eq!(repo, "upstream"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(entries(&log).len(), 2);
}

#[tokio::test]
async fn publish_failure_does_not_roll_back_local_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let manifest_path = config.manifest_path.clone();
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let mut host = MockHost::new(
        &config,
        vec![release("v2.1", "new")],
        vec![release("v2.0", "old")],
        log.clone(),
    );
    host.publish_error = Some(422);
    let manifest = MockManifest {
        text: "// manifest v2.1".to_string(),
        log: log.clone(),
    };
    let git = MockGit::new(log.clone());

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let err = pipeline.run("secret").await.expect_err("publish failure is fatal");

    match err {
        MirrorError::Publish(PublishError::Status { status }) => assert_eq!(status, 422),
        other => panic!("unexpected error: {other:?}"),
    }

    // Manifest write and git chain already happened and stay in place.
    assert!(manifest_path.exists());
    let all = entries(&log);
    assert!(all.contains(&"git push".to_string()));
}

#[tokio::test]
async fn git_failure_aborts_remaining_steps() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = test_config(dir.path());
    let log: Log = Arc::new(Mutex::new(Vec::new()));

    let host = MockHost::new(
        &config,
        vec![release("v2.1", "new")],
        vec![release("v2.0", "old")],
        log.clone(),
    );
    let manifest = MockManifest {
        text: "// manifest v2.1".to_string(),
        log: log.clone(),
    };
    let mut git = MockGit::new(log.clone());
    git.fail_on = Some("commit");

    let pipeline = SyncPipeline::new(config, host, manifest, git, OutputManager::new());
    let err = pipeline.run("secret").await.expect_err("git failure is fatal");

    assert!(matches!(
        err,
        MirrorError::Git(GitError::CommandFailed { .. })
    ));
    let all = entries(&log);
    assert!(!all.contains(&"git push".to_string()));
    assert!(all.iter().all(|e| !e.starts_with("publish")));
}
