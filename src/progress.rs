//! Byte-based progress tracking for input files.
//!
//! `ProgressReader` wraps the raw (possibly compressed) file reader so the
//! convert command can drive an `indicatif` bar while a dump is loaded
//! into memory.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;

/// A reader wrapper that tracks bytes read and calls a progress callback.
pub struct ProgressReader<R: Read> {
    reader: R,
    callback: Box<dyn Fn(u64)>,
    bytes_read: u64,
}

impl<R: Read> ProgressReader<R> {
    /// The callback receives the total bytes read so far after each read.
    pub fn new<F>(reader: R, callback: F) -> Self
    where
        F: Fn(u64) + 'static,
    {
        Self {
            reader,
            callback: Box::new(callback),
            bytes_read: 0,
        }
    }
}

impl<R: Read> Read for ProgressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.bytes_read += n as u64;
        (self.callback)(self.bytes_read);
        Ok(n)
    }
}

/// Byte progress bar sized to a file on disk.
pub fn byte_bar(total_bytes: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {msg} [{bar:30.cyan/blue}] {bytes}/{total_bytes}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );
    pb.set_message(label.to_string());
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_counts_bytes_across_reads() {
        let data = vec![7u8; 10_000];
        let last = Rc::new(Cell::new(0u64));
        let last_cb = Rc::clone(&last);
        let mut reader = ProgressReader::new(&data[..], move |n| last_cb.set(n));

        let mut buf = [0u8; 4096];
        let mut total = 0;
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            total += n;
        }
        assert_eq!(total, 10_000);
        assert_eq!(last.get(), 10_000);
    }
}
