use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, warn};

use crate::error::{CounterError, CounterResult};
use crate::provider::IdProvider;

/// File name used by [`CounterFile::new`].
pub const DEFAULT_FILE_NAME: &str = "LastID.txt";

/// One integer persisted as decimal text in `<dir>/<file_name>`.
///
/// The directory doubles as the "initialized" marker: if reading fails and
/// the directory does not exist yet, the counter has never been written and
/// may be seeded from a provider.
#[derive(Clone, Debug)]
pub struct CounterFile {
    dir: PathBuf,
    file_name: String,
}

impl CounterFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Read and parse the stored integer. Newline characters are stripped;
    /// anything else that is not a decimal integer is a parse error.
    pub async fn try_read(&self) -> CounterResult<i64> {
        let raw = fs::read_to_string(self.path()).await?;
        let content: String = raw.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        content
            .parse()
            .map_err(|_| CounterError::Parse { content })
    }

    /// Persist `id` as decimal text, creating the directory if needed.
    pub async fn try_write(&self, id: i64) -> CounterResult<()> {
        if fs::metadata(&self.dir).await.is_err() {
            fs::create_dir_all(&self.dir).await?;
        }
        fs::write(self.path(), id.to_string()).await?;
        Ok(())
    }

    /// Read the counter.
    ///
    /// If the file cannot be read and the directory does not exist, the
    /// counter is uninitialized: with `allow_initialization` set, `provider`
    /// is asked for an id, which is written and returned. In every other
    /// failure case the problem is logged and `None` is returned.
    pub async fn read<P>(&self, allow_initialization: bool, provider: &P) -> Option<i64>
    where
        P: IdProvider + ?Sized,
    {
        let err = match self.try_read().await {
            Ok(id) => return Some(id),
            Err(err) => err,
        };
        if let CounterError::Parse { content } = &err {
            error!(path = %self.path().display(), content = %content, "counter is not an integer");
            return None;
        }
        warn!(path = %self.path().display(), error = %err, "could not read counter");

        if fs::metadata(&self.dir).await.is_ok() {
            error!(path = %self.path().display(), error = %err, "counter directory exists but the counter is unreadable");
            return None;
        }
        if !allow_initialization {
            error!(path = %self.path().display(), "counter is not initialized and auto-initialization is disabled");
            return None;
        }
        info!(path = %self.path().display(), "initializing counter from provider");
        let fetched = provider.fetch().await;
        self.write(fetched).await
    }

    /// Write the counter, returning the id that was asked to be written.
    ///
    /// `None` is rejected without touching disk. An I/O failure is logged and
    /// the id is still returned.
    pub async fn write(&self, id: Option<i64>) -> Option<i64> {
        let Some(id) = id else {
            error!(path = %self.path().display(), error = %CounterError::Empty, "refusing to write counter");
            return None;
        };
        match self.try_write(id).await {
            Ok(()) => info!(path = %self.path().display(), id, "counter written"),
            Err(e) => error!(path = %self.path().display(), id, error = %e, "cannot write counter"),
        }
        Some(id)
    }
}
