//! Per-stream audio frame storage (§3 "Buffers").
//!
//! Each tablet/channel input and output stream gets its own frame and its own
//! lock, so push/tick/pull on independent streams don't contend (`spec.md`
//! §5's "per-buffer granularity" option).

use parking_lot::Mutex;

/// One frame of normalized float samples, fixed length for the process
/// lifetime (`spec.md` §4.C: "reconfiguring N requires a restart").
#[derive(Clone, Debug)]
pub struct Frame {
    samples: Vec<f32>,
}

impl Frame {
    pub fn zeroed(len: usize) -> Self {
        Frame {
            samples: vec![0.0; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.samples
    }

    /// Overwrite in place with zeros, without reallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0.0);
    }

    /// Overwrite in place from another frame of the same length.
    #[inline]
    pub fn copy_from(&mut self, other: &Frame) {
        self.samples.copy_from_slice(&other.samples);
    }
}

/// A bank of per-stream frames, one per tablet or channel, each independently
/// locked. Frames are allocated once at construction and reused every tick;
/// no per-tick allocation occurs on the hot path.
pub struct FrameBank {
    frame_size: usize,
    streams: Vec<Mutex<Frame>>,
}

impl FrameBank {
    pub fn new(num_streams: usize, frame_size: usize) -> Self {
        FrameBank {
            frame_size,
            streams: (0..num_streams)
                .map(|_| Mutex::new(Frame::zeroed(frame_size)))
                .collect(),
        }
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Replace the frame at `index` from PCM samples. Caller validates
    /// `samples.len() == frame_size` and the index bound before calling.
    pub fn push_pcm16(&self, index: usize, samples: &[i16]) {
        let mut frame = self.streams[index].lock();
        crate::convert::from_pcm16(samples, frame.as_mut_slice());
    }

    /// Copy the current frame at `index` out as PCM samples into `out`.
    pub fn pull_pcm16(&self, index: usize, out: &mut [i16]) {
        let frame = self.streams[index].lock();
        crate::convert::to_pcm16(frame.as_slice(), out);
    }

    /// Take a locked, read-only view of the frame at `index`. Used by the
    /// engine to copy inputs into its local working buffers under a short
    /// lock hold, per `spec.md` §5's "no lock held across tick's DSP work".
    pub fn snapshot_into(&self, index: usize, out: &mut Frame) {
        let frame = self.streams[index].lock();
        out.copy_from(&frame);
    }

    /// Overwrite the frame at `index` with `value`, e.g. to publish a tick's
    /// output.
    pub fn store(&self, index: usize, value: &Frame) {
        let mut frame = self.streams[index].lock();
        frame.copy_from(value);
    }
}
