// yt-dlp invocation and output-path normalization

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info};

use super::errors::DownloadError;
use super::models::{DownloadMode, DownloadResult};
use super::utils::{force_extension, sanitized_path};

/// Bounded title length in the output template, to stay clear of
/// filesystem name limits.
const TITLE_TEMPLATE: &str = "%(title).60s.%(ext)s";

/// Seam between the dialog layer and the external media tool.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(
        &self,
        link: &str,
        mode: DownloadMode,
        cookies: Option<&Path>,
    ) -> Result<DownloadResult, DownloadError>;
}

/// Fetcher backed by the yt-dlp CLI. The child process does the
/// blocking work; the event path only awaits its exit.
pub struct YtDlpFetcher {
    binary: String,
    download_dir: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            download_dir,
        }
    }

    #[cfg(test)]
    fn with_binary(binary: &str, download_dir: PathBuf) -> Self {
        Self {
            binary: binary.to_string(),
            download_dir,
        }
    }

    /// Run yt-dlp for one link and return the path it reports for the
    /// moved output file (the last non-empty stdout line).
    async fn run_tool(
        &self,
        link: &str,
        mode: DownloadMode,
        cookies: Option<&Path>,
    ) -> Result<PathBuf, DownloadError> {
        let template = self.download_dir.join(TITLE_TEMPLATE);

        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-playlist")
            .arg("--print")
            .arg("after_move:filepath")
            .arg("-o")
            .arg(&template)
            .args(mode.ytdlp_args());
        if let Some(jar) = cookies {
            cmd.arg("--cookies").arg(jar);
        }
        cmd.arg(link).stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!(link, mode = mode.label(), "running yt-dlp");
        let output = cmd.output().await.map_err(|e| DownloadError::Spawn {
            tool: self.binary.clone(),
            source: e,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(DownloadError::Extraction(stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reported = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or(DownloadError::NoReportedPath)?;

        let mut path = PathBuf::from(reported);
        if path.is_relative() {
            path = self.download_dir.join(path);
        }
        Ok(path)
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        link: &str,
        mode: DownloadMode,
        cookies: Option<&Path>,
    ) -> Result<DownloadResult, DownloadError> {
        let reported = self.run_tool(link, mode, cookies).await?;

        let expected = force_extension(&reported, mode.file_extension());
        let safe = sanitized_path(&expected);

        if safe != expected && fs::try_exists(&expected).await.unwrap_or(false) {
            fs::rename(&expected, &safe)
                .await
                .map_err(|e| DownloadError::Rename {
                    from: expected.clone(),
                    to: safe.clone(),
                    source: e,
                })?;
        }

        let path = if fs::try_exists(&safe).await.unwrap_or(false) {
            safe
        } else if fs::try_exists(&expected).await.unwrap_or(false) {
            expected
        } else {
            return Err(DownloadError::NotFound(expected));
        };

        let size = fs::metadata(&path).await?.len();
        info!(path = %path.display(), size, "download complete");
        Ok(DownloadResult { path, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A stand-in for yt-dlp: prints the path given as its final
    // argument after creating the file, mirroring after_move:filepath.
    fn fake_tool(dir: &Path) -> PathBuf {
        let script = dir.join("fake-ytdlp.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\nout=\"$(dirname \"$0\")/my title.mp3\"\ntouch \"$out\"\necho \"$out\"\n",
        )
        .unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        script
    }

    #[tokio::test]
    async fn test_fetch_sanitizes_and_renames_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = fake_tool(dir.path());
        let fetcher =
            YtDlpFetcher::with_binary(script.to_str().unwrap(), dir.path().to_path_buf());

        let result = fetcher
            .fetch("https://youtu.be/abc", DownloadMode::Audio, None)
            .await
            .unwrap();

        assert_eq!(result.path, dir.path().join("my_title.mp3"));
        assert!(result.path.exists());
        assert!(!dir.path().join("my title.mp3").exists());
    }

    #[tokio::test]
    async fn test_fetch_propagates_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("failing.sh");
        std::fs::write(&script, "#!/bin/sh\necho 'no such video' >&2\nexit 1\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let fetcher =
            YtDlpFetcher::with_binary(script.to_str().unwrap(), dir.path().to_path_buf());

        let err = fetcher
            .fetch("https://youtu.be/abc", DownloadMode::Audio, None)
            .await
            .unwrap_err();
        match err {
            DownloadError::Extraction(msg) => assert!(msg.contains("no such video")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_missing_binary_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = YtDlpFetcher::with_binary(
            "/nonexistent/yt-dlp-binary",
            dir.path().to_path_buf(),
        );
        let err = fetcher
            .fetch("https://youtu.be/abc", DownloadMode::Audio, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::Spawn { .. }));
    }
}
