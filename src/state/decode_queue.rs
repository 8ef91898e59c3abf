//! Deferred image decoding for native builds.
//!
//! Mirrors the browser's `FileReader` behaviour on a single thread: a decode is
//! requested synchronously and its completion is delivered later, when the host
//! loop pumps the queue. Requests carry the selection's [`DecodeToken`] so the
//! intake can discard superseded results.

use std::collections::VecDeque;

use web_time::Instant;

use super::intake::DecodeToken;
use crate::error::DecodeError;
use crate::media::{MediaAsset, decode_image};

/// A decode waiting to run.
struct DecodeRequest {
    token: DecodeToken,
    name: String,
    data: Vec<u8>,
}

/// A finished decode, ready to be handed back to the session.
#[derive(Debug)]
pub struct DecodeDone {
    pub token: DecodeToken,
    pub result: Result<MediaAsset, DecodeError>,
}

/// FIFO of pending decodes, completed one per pump.
#[derive(Default)]
pub struct LocalDecodeQueue {
    requests: VecDeque<DecodeRequest>,
}

impl LocalDecodeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a decode of `data` under `token`.
    pub fn request_decode(&mut self, token: DecodeToken, name: impl Into<String>, data: Vec<u8>) {
        let name = name.into();
        log::debug!("Queued decode {} for {} ({} bytes)", token, name, data.len());
        self.requests.push_back(DecodeRequest { token, name, data });
    }

    /// Run the oldest pending decode.
    pub fn pump_one(&mut self) -> Option<DecodeDone> {
        let request = self.requests.pop_front()?;
        let started = Instant::now();
        let result = decode_image(&request.name, &request.data);
        log::debug!(
            "Decode {} finished in {:.1} ms",
            request.token,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Some(DecodeDone {
            token: request.token,
            result,
        })
    }

    /// Drop a pending request without running it.
    ///
    /// Returns whether a request with that token was queued.
    pub fn cancel(&mut self, token: DecodeToken) -> bool {
        let before = self.requests.len();
        self.requests.retain(|r| r.token != token);
        before != self.requests.len()
    }

    pub fn pending_count(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::SelectedFile;
    use crate::media::tests::png_bytes;
    use crate::state::UploadIntake;
    use crate::state::intake::IntakeOutcome;

    fn token_for(intake: &mut UploadIntake, name: &str) -> DecodeToken {
        match intake.on_file_selected(&SelectedFile::new(name, "image/png", 64)) {
            IntakeOutcome::DecodeRequested(token) => token,
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_pump_in_fifo_order() {
        let mut intake = UploadIntake::default();
        let a = token_for(&mut intake, "a.png");
        let b = token_for(&mut intake, "b.png");

        let mut queue = LocalDecodeQueue::new();
        queue.request_decode(a, "a.png", png_bytes(2, 2));
        queue.request_decode(b, "b.png", png_bytes(3, 1));
        assert_eq!(queue.pending_count(), 2);

        let first = queue.pump_one().unwrap();
        assert_eq!(first.token, a);
        assert_eq!(first.result.unwrap().dimensions, Some((2, 2)));

        let second = queue.pump_one().unwrap();
        assert_eq!(second.token, b);
        assert!(queue.pump_one().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_failed_decode_is_delivered() {
        let mut intake = UploadIntake::default();
        let a = token_for(&mut intake, "broken.png");

        let mut queue = LocalDecodeQueue::new();
        queue.request_decode(a, "broken.png", vec![0, 1, 2, 3]);
        let done = queue.pump_one().unwrap();
        assert_eq!(done.token, a);
        assert!(done.result.is_err());
    }

    #[test]
    fn test_cancel() {
        let mut intake = UploadIntake::default();
        let a = token_for(&mut intake, "a.png");
        let b = token_for(&mut intake, "b.png");

        let mut queue = LocalDecodeQueue::new();
        queue.request_decode(a, "a.png", png_bytes(1, 1));
        queue.request_decode(b, "b.png", png_bytes(1, 1));

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(queue.pump_one().map(|d| d.token), Some(b));
    }
}
