use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;

/// Buffered writer for one batch file
pub struct BatchFileWriter {
    writer: BufWriter<File>,
    bytes_written: u64,
}

impl BatchFileWriter {
    pub fn new(filename: &Path) -> std::io::Result<Self> {
        let file = File::create(filename)?;
        let writer = BufWriter::with_capacity(WRITER_BUFFER_SIZE, file);

        Ok(Self {
            writer,
            bytes_written: 0,
        })
    }

    pub fn write_str(&mut self, text: &str) -> std::io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.bytes_written += text.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn finish(mut self) -> std::io::Result<u64> {
        self.writer.flush()?;
        Ok(self.bytes_written)
    }
}

/// Creates numbered batch files inside one output directory
pub struct BatchWriter {
    output_dir: PathBuf,
    file_prefix: String,
}

impl BatchWriter {
    pub fn new(output_dir: PathBuf, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir,
            file_prefix: file_prefix.into(),
        }
    }

    pub fn ensure_output_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            anyhow::anyhow!(
                "cannot create output directory {}: {}",
                self.output_dir.display(),
                e
            )
        })
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(crate::convert::batch_file_name(&self.file_prefix, index))
    }

    /// Write batch `index` from its rendered parts and return the file path.
    pub fn write_batch(&self, index: usize, parts: &[&str]) -> anyhow::Result<PathBuf> {
        let path = self.path_for(index);
        write_parts(&path, parts)
            .map_err(|e| anyhow::anyhow!("cannot write batch file {}: {}", path.display(), e))?;
        Ok(path)
    }
}

fn write_parts(path: &Path, parts: &[&str]) -> std::io::Result<()> {
    let mut writer = BatchFileWriter::new(path)?;
    for part in parts {
        writer.write_str(part)?;
    }
    writer.finish()?;
    Ok(())
}
