//! Whole-file input loading with transparent decompression.

use crate::progress::ProgressReader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Compression format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Bzip2,
    Xz,
    Zstd,
}

impl Compression {
    /// Detect compression format from file extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("gz" | "gzip") => Compression::Gzip,
            Some("bz2" | "bzip2") => Compression::Bzip2,
            Some("xz" | "lzma") => Compression::Xz,
            Some("zst" | "zstd") => Compression::Zstd,
            _ => Compression::None,
        }
    }

    /// Wrap a reader with the appropriate decompressor
    pub fn wrap_reader<'a>(&self, reader: Box<dyn Read + 'a>) -> std::io::Result<Box<dyn Read + 'a>> {
        Ok(match self {
            Compression::None => reader,
            Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
            Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
            Compression::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        })
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compression::None => write!(f, "none"),
            Compression::Gzip => write!(f, "gzip"),
            Compression::Bzip2 => write!(f, "bzip2"),
            Compression::Xz => write!(f, "xz"),
            Compression::Zstd => write!(f, "zstd"),
        }
    }
}

/// Read a SQL file fully into memory, decompressing by extension.
///
/// A missing file is a fatal error naming the path.
pub fn read_sql_file(path: &Path) -> anyhow::Result<String> {
    read_sql_file_with_progress(path, None::<fn(u64)>)
}

/// Like [`read_sql_file`], reporting cumulative compressed bytes read.
pub fn read_sql_file_with_progress<F>(path: &Path, progress: Option<F>) -> anyhow::Result<String>
where
    F: Fn(u64) + 'static,
{
    if !path.exists() {
        anyhow::bail!("input file does not exist: {}", path.display());
    }

    let file = File::open(path)?;
    let compression = Compression::from_path(path);
    let raw: Box<dyn Read> = match progress {
        Some(cb) => Box::new(ProgressReader::new(file, cb)),
        None => Box::new(file),
    };
    let mut reader = compression.wrap_reader(raw)?;

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    String::from_utf8(bytes).map_err(|e| {
        anyhow::anyhow!(
            "{} is not valid UTF-8 (first bad byte at offset {})",
            path.display(),
            e.utf8_error().valid_up_to()
        )
    })
}
