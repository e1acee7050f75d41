//! Scripted transport for unit tests.

use super::transport::{BodySink, ResponseHead, Transport};
use crate::retry::FetchError;

/// One scripted reply: `Ok((status, body, content_length))` or a curl error code.
pub(crate) type Step = Result<(u32, Vec<u8>, Option<u64>), i32>;

/// Replays `script` in order; once exhausted every call is refused
/// (CURLE_COULDNT_CONNECT). Records every requested URL.
pub(crate) struct Scripted {
    pub calls: u32,
    pub urls: Vec<String>,
    script: Vec<Step>,
}

impl Scripted {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            calls: 0,
            urls: Vec::new(),
            script,
        }
    }

    pub fn always_refused() -> Self {
        Self::new(Vec::new())
    }

    /// Answers every request with 200 and `body`.
    pub fn serving(body: &[u8], times: usize) -> Self {
        Self::new(vec![Ok((200, body.to_vec(), Some(body.len() as u64))); times])
    }
}

impl Transport for Scripted {
    fn get(&mut self, url: &str, sink: &mut dyn BodySink) -> Result<ResponseHead, FetchError> {
        let step = self.script.get(self.calls as usize).cloned().unwrap_or(Err(7));
        self.calls += 1;
        self.urls.push(url.to_string());
        match step {
            Err(code) => Err(FetchError::Curl(curl::Error::new(code as _))),
            Ok((status, body, content_length)) => {
                let head = ResponseHead {
                    status,
                    content_length,
                };
                sink.begin(&head)?;
                for chunk in body.chunks(4) {
                    sink.write_chunk(chunk)?;
                }
                Ok(head)
            }
        }
    }
}
