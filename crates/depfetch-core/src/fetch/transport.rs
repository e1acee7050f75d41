//! HTTP transport seam. The curl implementation streams the body through a
//! [`BodySink`] as it arrives; nothing is buffered in memory.

use std::cell::{Cell, RefCell};
use std::io;
use std::str;
use std::time::Duration;

use super::parse;
use crate::config::HttpConfig;
use crate::retry::FetchError;

/// Status and announced length of the final response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u32,
    pub content_length: Option<u64>,
}

/// Destination for a response body.
pub trait BodySink {
    /// Called exactly once per transfer, before the first chunk, or after the
    /// transfer when the body was empty.
    fn begin(&mut self, head: &ResponseHead) -> io::Result<()>;
    fn write_chunk(&mut self, data: &[u8]) -> io::Result<()>;
}

pub trait Transport {
    /// Performs one GET. Network failures come back as `FetchError::Curl`,
    /// sink failures as `FetchError::Storage`; any status is returned as-is.
    fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<ResponseHead, FetchError>;
}

#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Receive buffer size; bounds the size of each chunk handed to the sink.
    pub buffer_size: usize,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl From<&HttpConfig> for CurlOptions {
    fn from(cfg: &HttpConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: Duration::from_secs(cfg.timeout_secs),
            buffer_size: cfg.chunk_size.max(1024),
            follow_redirects: cfg.follow_redirects,
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

/// Blocking libcurl transport; one Easy handle per request.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    opts: CurlOptions,
}

impl CurlTransport {
    pub fn new(opts: CurlOptions) -> Self {
        Self { opts }
    }
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<ResponseHead, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(self.opts.follow_redirects)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;
        easy.buffer_size(self.opts.buffer_size)?;
        easy.useragent(&self.opts.user_agent)?;

        let head = RefCell::new(ResponseHead::default());
        let started = Cell::new(false);
        let sink_error: RefCell<Option<io::Error>> = RefCell::new(None);
        let sink = RefCell::new(sink);

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(line) = str::from_utf8(data) {
                    parse::apply_header_line(&mut head.borrow_mut(), line);
                }
                true
            })?;
            transfer.write_function(|data| {
                let mut sink = sink.borrow_mut();
                let res = if started.replace(true) {
                    sink.write_chunk(data)
                } else {
                    sink.begin(&head.borrow()).and_then(|()| sink.write_chunk(data))
                };
                match res {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        *sink_error.borrow_mut() = Some(e);
                        Ok(0) // abort transfer
                    }
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error.into_inner() {
            return Err(FetchError::Storage(e));
        }
        match performed {
            // A body shorter than Content-Length: the sink decides whether
            // the bytes received so far are kept.
            Err(e) if e.is_partial_file() => {
                tracing::debug!(url, "transfer ended early: {}", e);
            }
            other => other?,
        }

        let mut head = head.into_inner();
        head.status = easy.response_code()?;
        if !started.get() {
            sink.into_inner().begin(&head)?;
        }
        Ok(head)
    }
}
