//! Atomic streaming file writes
//!
//! A response body is streamed to a sibling temporary path and renamed into
//! place once complete. On any failure the partial file is deleted, so a
//! file is visible at its final path if and only if it was fully written.
//! The writer assumes exclusive right to create its destination: one
//! descriptor maps to one path and one worker.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::constants::files;
use crate::errors::{WriteError, WriteResult};

impl From<reqwest::Error> for WriteError {
    fn from(err: reqwest::Error) -> Self {
        WriteError::Stream(err)
    }
}

/// Sibling temporary path for an in-flight download
fn temp_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(files::TEMP_FILE_SUFFIX);
    PathBuf::from(name)
}

/// Stream a response body to its destination with an atomic rename
///
/// Returns the number of bytes written. The input stream is always fully
/// consumed or dropped; nothing is ever left visible at `destination` on
/// failure.
pub async fn write_response(
    response: reqwest::Response,
    destination: &Path,
) -> WriteResult<u64> {
    write_stream(response.bytes_stream(), destination).await
}

/// Stream arbitrary chunks to a destination with an atomic rename
///
/// Generic over the chunk and error types so interrupted streams can be
/// exercised without a network; chunk errors abort the write and clean up
/// the partial temporary file.
pub async fn write_stream<S, B, E>(stream: S, destination: &Path) -> WriteResult<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<WriteError>,
{
    if let Some(parent) = destination.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp = temp_path(destination);
    match copy_to_temp(stream, &temp).await {
        Ok(bytes_written) => {
            if let Err(source) = tokio::fs::rename(&temp, destination).await {
                let _ = tokio::fs::remove_file(&temp).await;
                return Err(WriteError::Rename {
                    temp_path: temp,
                    final_path: destination.to_path_buf(),
                    source,
                });
            }
            debug!(
                "Wrote {} bytes to {}",
                bytes_written,
                destination.display()
            );
            Ok(bytes_written)
        }
        Err(e) => {
            let _ = tokio::fs::remove_file(&temp).await;
            Err(e)
        }
    }
}

/// Copy the stream into the temporary file, reporting bytes written
async fn copy_to_temp<S, B, E>(stream: S, temp: &Path) -> WriteResult<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<WriteError>,
{
    let mut file = File::create(temp).await?;
    let mut bytes_written = 0u64;

    futures::pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::into)?;
        file.write_all(chunk.as_ref()).await?;
        bytes_written += chunk.as_ref().len() as u64;
    }
    file.flush().await?;
    Ok(bytes_written)
}
