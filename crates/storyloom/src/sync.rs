//! Git publish/sync phase.
//!
//! Runs only after a fully successful pipeline: configure identity, point
//! the remote at a tokened URL, untrack runtime files, commit whatever
//! changed, then fetch/rebase/push. An empty staged diff is a successful
//! no-op. A rebase conflict is aborted and surfaced, never auto-resolved.

use std::path::PathBuf;
use std::process::Output;
use tokio_retry2::strategy::ExponentialBackoff;
use tokio_retry2::{Retry, RetryError};
use storyloom_core::SyncConfig;
use storyloom_error::{StoryloomResult, SyncError, SyncErrorKind};
use tracing::{debug, info, instrument, warn};

/// Drives the git subprocess steps of the publish phase.
pub struct GitSync {
    base_dir: PathBuf,
    settings: SyncConfig,
}

impl GitSync {
    /// Create a sync driver rooted at the published repository.
    pub fn new(base_dir: PathBuf, settings: SyncConfig) -> Self {
        Self { base_dir, settings }
    }

    async fn git(&self, args: &[&str]) -> Result<Output, SyncError> {
        debug!(?args, "Running git");
        tokio::process::Command::new("git")
            .args(args)
            .current_dir(&self.base_dir)
            .output()
            .await
            .map_err(|e| SyncError::new(SyncErrorKind::Spawn(e.to_string())))
    }

    /// Run a git command that must succeed.
    async fn git_checked(&self, step: &str, args: &[&str]) -> Result<(), SyncError> {
        let output = self.git(args).await?;
        if output.status.success() {
            return Ok(());
        }
        Err(SyncError::new(SyncErrorKind::Command {
            step: step.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }))
    }

    /// Run a git command whose failure is tolerable (untracking paths that
    /// were never tracked, cleaning directories that do not exist).
    async fn git_tolerant(&self, args: &[&str]) {
        match self.git(args).await {
            Ok(output) if !output.status.success() => {
                debug!(?args, "Tolerated git failure")
            }
            Err(e) => debug!(?args, error = %e, "Tolerated git spawn failure"),
            _ => {}
        }
    }

    /// Network-facing steps get a few attempts with doubling delays.
    async fn git_with_retry(&self, step: &'static str, args: &[&str]) -> Result<(), SyncError> {
        // 2s then 4s between the three attempts.
        let strategy = ExponentialBackoff::from_millis(2).factor(1000).take(2);

        Retry::spawn(strategy, || async move {
            match self.git_checked(step, args).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    warn!(step, error = %e, "git command failed, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
            }
        })
        .await
    }

    /// Execute the publish sequence.
    #[instrument(skip(self))]
    pub async fn sync(&self, today_compact: &str) -> StoryloomResult<()> {
        let token = std::fs::read_to_string(&self.settings.token_file)
            .map_err(|e| {
                SyncError::new(SyncErrorKind::Credential(format!(
                    "{}: {}",
                    self.settings.token_file.display(),
                    e
                )))
            })?
            .trim()
            .to_string();

        info!("Configuring git identity and remote");
        self.git_checked("config", &["config", "user.name", &self.settings.user_name])
            .await?;
        self.git_checked(
            "config",
            &["config", "user.email", &self.settings.user_email],
        )
        .await?;

        let remote_url = format!("https://{}@{}", token, self.settings.remote);
        self.git_checked("set-url", &["remote", "set-url", "origin", &remote_url])
            .await?;

        // Runtime files must never reach the remote even if a past run
        // accidentally tracked them.
        for path in &self.settings.runtime_paths {
            self.git_tolerant(&["rm", "--cached", "-r", "--ignore-unmatch", path])
                .await;
        }

        self.git_checked("add", &["add", "."]).await?;

        let staged = self.git(&["diff", "--cached", "--quiet"]).await?;
        if staged.status.success() {
            info!("No changes to publish");
            return Ok(());
        }

        let message = format!("Update stories {}", today_compact);
        info!(message = %message, "Committing");
        self.git_checked("commit", &["commit", "-m", &message])
            .await?;

        let branch = self.settings.branch.clone();
        self.git_with_retry("fetch", &["fetch", "origin", &branch])
            .await?;

        // Residual local edits to runtime files would make the rebase
        // stumble over noise.
        for path in &self.settings.runtime_paths {
            self.git_tolerant(&["checkout", "--", path]).await;
            self.git_tolerant(&["clean", "-fd", path]).await;
        }

        let upstream = format!("origin/{}", branch);
        let rebase = self.git(&["rebase", &upstream]).await?;
        if !rebase.status.success() {
            warn!(
                stderr = %String::from_utf8_lossy(&rebase.stderr).trim(),
                "Rebase conflict; aborting"
            );
            self.git_tolerant(&["rebase", "--abort"]).await;
            return Err(SyncError::new(SyncErrorKind::RebaseConflict).into());
        }

        self.git_with_retry("push", &["push", "origin", &branch])
            .await?;

        info!("Publish sync completed");
        Ok(())
    }
}
