//! Streams an accepted response body into `<dest>.part`, renamed to `<dest>`
//! once the transfer is complete.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::transport::{BodySink, ResponseHead};
use crate::observer::ScanObserver;
use crate::retry::FetchError;

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

pub(crate) struct FileSink<'o> {
    dest: PathBuf,
    temp: PathBuf,
    file: Option<File>,
    written: u64,
    expected: Option<u64>,
    observer: &'o mut dyn ScanObserver,
}

impl<'o> FileSink<'o> {
    pub(crate) fn new(dest: &Path, observer: &'o mut dyn ScanObserver) -> Self {
        Self {
            dest: dest.to_path_buf(),
            temp: temp_path(dest),
            file: None,
            written: 0,
            expected: None,
            observer,
        }
    }

    /// Closes the temp file and moves it into place. With `verify_length`, a
    /// byte count that disagrees with Content-Length fails the fetch.
    pub(crate) fn finish(mut self, verify_length: bool) -> Result<u64, FetchError> {
        let Some(mut file) = self.file.take() else {
            return Err(FetchError::Storage(io::Error::new(
                io::ErrorKind::Other,
                "response body was never opened",
            )));
        };
        let flushed = file.flush();
        drop(file);
        if let Err(e) = flushed {
            let _ = fs::remove_file(&self.temp);
            return Err(e.into());
        }

        if verify_length {
            if let Some(expected) = self.expected {
                if expected != self.written {
                    let _ = fs::remove_file(&self.temp);
                    return Err(FetchError::PartialTransfer {
                        expected,
                        received: self.written,
                    });
                }
            }
        }

        if let Err(e) = fs::rename(&self.temp, &self.dest) {
            let _ = fs::remove_file(&self.temp);
            return Err(e.into());
        }
        Ok(self.written)
    }
}

impl BodySink for FileSink<'_> {
    fn begin(&mut self, head: &ResponseHead) -> io::Result<()> {
        // Non-200 bodies are discarded; nothing touches the disk.
        if head.status != 200 {
            return Ok(());
        }
        self.file = Some(File::create(&self.temp)?);
        self.expected = head.content_length;
        self.observer.progress(0, self.expected);
        Ok(())
    }

    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.write_all(data)?;
            self.written += data.len() as u64;
            self.observer.progress(self.written, self.expected);
        }
        Ok(())
    }
}

impl Drop for FileSink<'_> {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
