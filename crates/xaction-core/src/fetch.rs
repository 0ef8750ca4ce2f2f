//! Concurrent loading of required input files.
//!
//! [`fetch_inputs`] reads every path through a [`FileOpener`] on its own task
//! and returns the results in the order the paths were given.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinSet;
use tracing::debug;

use crate::digest::Digest;
use crate::error::{ExtractError, Result};
use crate::unit::FileInfo;

/// Readable byte stream handed out by a [`FileOpener`].
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Injectable source of file contents.
///
/// The default is [`FsOpener`]; swap it out to read from a sandbox or a test
/// double.
#[async_trait]
pub trait FileOpener: Send + Sync {
    async fn open(&self, path: &str) -> io::Result<ByteStream>;
}

/// Opens paths on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

#[async_trait]
impl FileOpener for FsOpener {
    async fn open(&self, path: &str) -> io::Result<ByteStream> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }
}

/// Open `path` and read it to the end.
pub async fn read_all(opener: &dyn FileOpener, path: &str) -> io::Result<Vec<u8>> {
    let mut stream = opener.open(path).await?;
    let mut data = Vec::new();
    stream.read_to_end(&mut data).await?;
    Ok(data)
}

/// Contents of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub info: FileInfo,
    pub content: Vec<u8>,
}

impl FileData {
    pub fn new(path: impl Into<String>, content: Vec<u8>) -> Self {
        let info = FileInfo {
            path: path.into(),
            digest: Digest::compute(&content),
            size: content.len() as u64,
        };
        Self { info, content }
    }
}

/// Fetch every path concurrently.
///
/// The result is index-aligned with `paths`. The first failure aborts the
/// tasks still in flight and is returned as [`ExtractError::InputFetch`].
pub async fn fetch_inputs(opener: Arc<dyn FileOpener>, paths: &[String]) -> Result<Vec<FileData>> {
    let mut join_set = JoinSet::new();
    for (idx, path) in paths.iter().cloned().enumerate() {
        let opener = Arc::clone(&opener);
        join_set.spawn(async move {
            let content = read_all(opener.as_ref(), &path)
                .await
                .map_err(|source| ExtractError::InputFetch {
                    path: path.clone(),
                    source,
                })?;
            Ok::<(usize, FileData), ExtractError>((idx, FileData::new(path, content)))
        });
    }

    let mut slots: Vec<Option<FileData>> = vec![None; paths.len()];
    while let Some(joined) = join_set.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(e) => {
                join_set.abort_all();
                return Err(ExtractError::FetchTask(e.to_string()));
            }
        };
        match result {
            Ok((idx, data)) => {
                debug!(path = %data.info.path, size = data.info.size, "fetched input");
                slots[idx] = Some(data);
            }
            Err(e) => {
                join_set.abort_all();
                return Err(e);
            }
        }
    }

    paths
        .iter()
        .zip(slots)
        .map(|(path, slot)| {
            slot.ok_or_else(|| ExtractError::FetchTask(format!("missing fetch result for {path:?}")))
        })
        .collect()
}
