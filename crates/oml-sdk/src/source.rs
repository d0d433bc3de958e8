use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::Path;

use oml_store::ReadSeek;
use tracing::debug;

use crate::error::{OmlError, OmlResult};

const PIPE_PREFIX: &str = "pipe:";

/// Where a document's bytes come from.
pub enum ByteSource {
    /// Random-access input handed to the store as is.
    Seekable(Box<dyn ReadSeek>),
    /// Forward-only input, buffered in memory before decoding.
    Sequential(Box<dyn Read>),
}

impl ByteSource {
    pub fn seekable<R: Read + Seek + 'static>(reader: R) -> Self {
        ByteSource::Seekable(Box::new(reader))
    }

    pub fn sequential<R: Read + 'static>(reader: R) -> Self {
        ByteSource::Sequential(Box::new(reader))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::seekable(Cursor::new(bytes.into()))
    }

    /// Open a file for reading.
    pub fn from_path(path: impl AsRef<Path>) -> OmlResult<Self> {
        let path = path.as_ref();
        check_path(path, PathRole::Input)?;
        Ok(Self::seekable(File::open(path)?))
    }

    /// A seekable reader, buffering sequential input in `chunk_size` reads.
    pub(crate) fn into_seekable(self, chunk_size: usize) -> OmlResult<Box<dyn ReadSeek>> {
        match self {
            ByteSource::Seekable(reader) => Ok(reader),
            ByteSource::Sequential(mut reader) => {
                let data = buffer_all(&mut *reader, chunk_size)?;
                debug!(bytes = data.len(), chunk_size, "buffered non-seekable source");
                Ok(Box::new(Cursor::new(data)))
            }
        }
    }
}

impl std::fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteSource::Seekable(_) => f.write_str("ByteSource::Seekable"),
            ByteSource::Sequential(_) => f.write_str("ByteSource::Sequential"),
        }
    }
}

/// Read `reader` to exhaustion, `chunk_size` bytes at a time.
pub fn buffer_all(reader: &mut dyn Read, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => return Ok(data),
            Ok(n) => data.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PathRole {
    Input,
    Output,
}

impl PathRole {
    fn as_str(self) -> &'static str {
        match self {
            PathRole::Input => "input",
            PathRole::Output => "output",
        }
    }
}

/// Reject empty paths and `pipe:` pseudo-paths.
pub(crate) fn check_path(path: &Path, role: PathRole) -> OmlResult<()> {
    let text = path.to_string_lossy();
    if text.is_empty() {
        return Err(OmlError::InvalidArgument(format!(
            "the {} argument is mandatory",
            role.as_str()
        )));
    }
    let is_pipe = text
        .get(..PIPE_PREFIX.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(PIPE_PREFIX))
        .unwrap_or(false);
    if is_pipe {
        return Err(OmlError::NotSupported(
            "piping is not supported in library mode".into(),
        ));
    }
    Ok(())
}

/// Create (or truncate) an output file.
pub fn open_output(path: impl AsRef<Path>) -> OmlResult<File> {
    let path = path.as_ref();
    check_path(path, PathRole::Output)?;
    Ok(File::create(path)?)
}
