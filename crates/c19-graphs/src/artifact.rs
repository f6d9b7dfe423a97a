//! Persisting generated bytes and cleaning them up afterwards.

use c19_common::utils::{format_file_timestamp, sanitize_file_component};
use c19_common::{Artifact, ArtifactKind, C19Error, Result};
use c19_config::{NamingPolicy, OutputConfig};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Writes artifacts under one directory with collision-aware names.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    directory: PathBuf,
    naming: NamingPolicy,
    clock: fn() -> DateTime<Local>,
}

impl ArtifactWriter {
    /// Writer for the configured output directory and naming policy.
    #[must_use]
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            naming: config.naming,
            clock: Local::now,
        }
    }

    /// Replaces the naming policy.
    #[must_use]
    pub fn with_policy(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Local>) -> Self {
        self.clock = clock;
        self
    }

    /// Output directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name for `prefix` at `at` under the current policy.
    #[must_use]
    pub fn file_name(&self, prefix: &str, kind: ArtifactKind, at: &DateTime<Local>) -> String {
        let prefix = sanitize_file_component(prefix);
        let stamp = format_file_timestamp(at);
        match self.naming {
            NamingPolicy::Timestamp => format!("{prefix}-{stamp}.{}", kind.extension()),
            NamingPolicy::UniqueSuffix => {
                let token = Uuid::new_v4().simple().to_string();
                format!("{prefix}-{stamp}-{}.{}", &token[..8], kind.extension())
            }
        }
    }

    /// Streams `reader` into a new file in the configured directory.
    ///
    /// # Errors
    ///
    /// See [`ArtifactWriter::persist_to`].
    pub async fn persist<R>(&self, reader: R, prefix: &str, kind: ArtifactKind) -> Result<Artifact>
    where
        R: AsyncRead + Unpin + Send,
    {
        self.persist_to(reader, &self.directory, prefix, kind).await
    }

    /// Writes an in-memory buffer; convenience over [`ArtifactWriter::persist`].
    ///
    /// # Errors
    ///
    /// See [`ArtifactWriter::persist_to`].
    pub async fn persist_bytes(
        &self,
        bytes: &[u8],
        prefix: &str,
        kind: ArtifactKind,
    ) -> Result<Artifact> {
        self.persist(bytes, prefix, kind).await
    }

    /// Streams `reader` into `{dir}/{prefix}-{timestamp}[-{token}].{ext}`.
    ///
    /// The directory is created when missing. The file is flushed, synced
    /// and closed before the artifact is returned; on failure the partial
    /// file is removed.
    ///
    /// # Errors
    ///
    /// Any I/O failure is returned as a write error naming the path.
    #[instrument(skip(self, reader, dir), fields(dir = %dir.display()))]
    pub async fn persist_to<R>(
        &self,
        mut reader: R,
        dir: &Path,
        prefix: &str,
        kind: ArtifactKind,
    ) -> Result<Artifact>
    where
        R: AsyncRead + Unpin + Send,
    {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| C19Error::write(dir, e))?;

        let created_at = (self.clock)();
        let path = dir.join(self.file_name(prefix, kind, &created_at));

        let written = async {
            let mut file = File::create(&path).await?;
            let bytes = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<_, std::io::Error>(bytes)
        }
        .await;

        match written {
            Ok(bytes) => {
                debug!(path = %path.display(), bytes, "artifact written");
                Ok(Artifact::new(path, kind, created_at))
            }
            Err(e) => {
                cleanup(&path).await;
                Err(C19Error::write(path, e))
            }
        }
    }
}

/// Removes `path`, logging instead of failing. Returns whether a file was removed.
pub async fn cleanup(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed artifact");
            true
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!("Failed to clean up {}: {}", path.display(), e);
            false
        }
    }
}

/// Owns an artifact until it has been delivered and deletes it on drop.
///
/// Call [`ArtifactGuard::keep`] to take the artifact out without deleting it,
/// or [`ArtifactGuard::release`] to delete it asynchronously.
#[derive(Debug)]
#[must_use = "dropping the guard deletes the artifact"]
pub struct ArtifactGuard {
    artifact: Artifact,
    armed: bool,
}

impl ArtifactGuard {
    /// Guards `artifact`.
    pub const fn new(artifact: Artifact) -> Self {
        Self {
            artifact,
            armed: true,
        }
    }

    /// Path of the guarded file.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.artifact.path()
    }

    /// The guarded artifact.
    #[must_use]
    pub const fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// Disarms the guard and hands the artifact back.
    #[must_use]
    pub fn keep(mut self) -> Artifact {
        self.armed = false;
        self.artifact.clone()
    }

    /// Leaves the file on disk when the guard goes away.
    pub fn disarm(mut self) {
        self.armed = false;
    }

    /// Deletes the file now.
    pub async fn release(mut self) {
        self.armed = false;
        cleanup(self.artifact.path()).await;
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(self.artifact.path()) {
            Ok(()) => debug!(path = %self.artifact.path().display(), "guard removed artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to clean up {}: {}",
                self.artifact.path().display(),
                e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use c19_common::test_utils::{create_temp_dir, mock_local_time};

    fn fixed_clock() -> DateTime<Local> {
        mock_local_time(2022, 1, 2, 9, 30, 15)
    }

    fn writer(dir: &Path, naming: NamingPolicy) -> ArtifactWriter {
        ArtifactWriter::new(&OutputConfig {
            directory: dir.to_path_buf(),
            naming,
        })
        .with_clock(fixed_clock)
    }

    #[tokio::test]
    async fn timestamp_policy_overwrites_within_a_second() {
        let dir = create_temp_dir();
        let writer = writer(dir.path(), NamingPolicy::Timestamp);

        let first = writer.persist_bytes(b"first", "chart", ArtifactKind::Png).await.unwrap();
        let second = writer.persist_bytes(b"second", "chart", ArtifactKind::Png).await.unwrap();

        assert_eq!(first.path(), second.path());
        assert_eq!(first.file_name(), Some("chart-220102093015.png"));
        assert_eq!(std::fs::read(second.path()).unwrap(), b"second");
    }

    #[tokio::test]
    async fn unique_suffix_keeps_both_files() {
        let dir = create_temp_dir();
        let writer = writer(dir.path(), NamingPolicy::UniqueSuffix);

        let first = writer.persist_bytes(b"a", "chart", ArtifactKind::Png).await.unwrap();
        let second = writer.persist_bytes(b"b", "chart", ArtifactKind::Png).await.unwrap();

        assert_ne!(first.path(), second.path());
        let name = first.file_name().unwrap();
        assert!(name.starts_with("chart-220102093015-"));
        assert_eq!(name.len(), "chart-220102093015-".len() + 8 + ".png".len());
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = create_temp_dir();
        let nested = dir.path().join("a/b");
        let artifact = writer(dir.path(), NamingPolicy::Timestamp)
            .persist_to(&b"x,y\n"[..], &nested, "Japan-all", ArtifactKind::Csv)
            .await
            .unwrap();
        assert!(artifact.path().starts_with(&nested));
        assert!(artifact.path().is_file());
    }

    #[tokio::test]
    async fn unwritable_target_is_a_write_error() {
        let dir = create_temp_dir();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let err = writer(dir.path(), NamingPolicy::Timestamp)
            .persist_to(&b""[..], &blocker, "chart", ArtifactKind::Png)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), c19_common::ErrorKind::Write);
    }

    #[tokio::test]
    async fn guard_deletes_unless_kept() {
        let dir = create_temp_dir();
        let writer = writer(dir.path(), NamingPolicy::UniqueSuffix);

        let dropped = ArtifactGuard::new(writer.persist_bytes(b"1", "a", ArtifactKind::Png).await.unwrap());
        let dropped_path = dropped.path().to_path_buf();
        drop(dropped);
        assert!(!dropped_path.exists());

        let released = ArtifactGuard::new(writer.persist_bytes(b"2", "b", ArtifactKind::Png).await.unwrap());
        let released_path = released.path().to_path_buf();
        released.release().await;
        assert!(!released_path.exists());

        let kept = ArtifactGuard::new(writer.persist_bytes(b"3", "c", ArtifactKind::Png).await.unwrap()).keep();
        assert!(kept.path().exists());
    }

    #[tokio::test]
    async fn disarmed_guard_leaves_file() {
        let dir = create_temp_dir();
        let writer = writer(dir.path(), NamingPolicy::UniqueSuffix);

        let guard = ArtifactGuard::new(writer.persist_bytes(b"4", "d", ArtifactKind::Csv).await.unwrap());
        let path = guard.path().to_path_buf();
        guard.disarm();
        assert!(path.is_file());
    }

    #[tokio::test]
    async fn cleanup_of_missing_file_is_quiet() {
        let dir = create_temp_dir();
        assert!(!cleanup(&dir.path().join("never-written.png")).await);
    }
}
