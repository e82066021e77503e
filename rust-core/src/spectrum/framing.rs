//! Slicing a waveform into overlapping analysis frames
//!
//! Frame counts:
//! - `Snip`: floor((L - F) / S) + 1 when L >= F, otherwise 0
//! - `Pad`, left aligned: ceil(L / S) when L > 0, otherwise 0
//! - `Pad`, centered: ceil(L / S); when F >= S it is raised as needed so the
//!   last frame reaches the final sample, i.e. to ceil((L - (F - F/2)) / S) + 1
//!
//! Under `Pad`, frame i starts at i*S (left aligned) or i*S - F/2 (centered),
//! and samples outside [0, L) are zero or mirrored about the edge sample.

use super::options::{EdgePolicy, PadAlignment, PadMode, StftOptions};

/// Frame geometry for one engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framer {
    frame_length: usize,
    frame_shift: usize,
    edge_policy: EdgePolicy,
    pad_alignment: PadAlignment,
    pad_mode: PadMode,
}

impl Framer {
    pub fn new(options: &StftOptions) -> Self {
        Self {
            frame_length: options.frame_length,
            frame_shift: options.frame_shift,
            edge_policy: options.edge_policy,
            pad_alignment: options.pad_alignment,
            pad_mode: options.pad_mode,
        }
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn frame_shift(&self) -> usize {
        self.frame_shift
    }

    /// Number of frames produced for a signal of `num_samples` samples
    pub fn num_frames(&self, num_samples: usize) -> usize {
        match self.edge_policy {
            EdgePolicy::Snip => {
                if num_samples < self.frame_length {
                    0
                } else {
                    (num_samples - self.frame_length) / self.frame_shift + 1
                }
            }
            EdgePolicy::Pad => {
                if num_samples == 0 {
                    return 0;
                }
                let frames = num_samples.div_ceil(self.frame_shift);
                match self.pad_alignment {
                    PadAlignment::Center if self.frame_length >= self.frame_shift => {
                        // Samples a centered frame 0 covers from index 0
                        let head = self.frame_length - self.frame_length / 2;
                        let covering = if num_samples <= head {
                            1
                        } else {
                            (num_samples - head).div_ceil(self.frame_shift) + 1
                        };
                        frames.max(covering)
                    }
                    _ => frames,
                }
            }
        }
    }

    /// Signed sample index of the first sample of frame `index`
    pub fn frame_offset(&self, index: usize) -> i64 {
        let start = (index * self.frame_shift) as i64;
        match (self.edge_policy, self.pad_alignment) {
            (EdgePolicy::Pad, PadAlignment::Center) => start - (self.frame_length / 2) as i64,
            _ => start,
        }
    }

    /// Copy frame `index` of `signal` into the first `frame_length` samples
    /// of `dest`, synthesizing out-of-range samples per the pad mode
    ///
    /// `dest` must hold at least `frame_length` samples; the rest is left as is.
    pub fn extract(&self, signal: &[f64], index: usize, dest: &mut [f64]) {
        let dest = &mut dest[..self.frame_length];
        let len = signal.len() as i64;
        let offset = self.frame_offset(index);

        // Fast path: the frame lies entirely inside the signal
        if offset >= 0 && offset + self.frame_length as i64 <= len {
            let start = offset as usize;
            dest.copy_from_slice(&signal[start..start + self.frame_length]);
            return;
        }

        for (i, sample) in dest.iter_mut().enumerate() {
            let pos = offset + i as i64;
            *sample = if (0..len).contains(&pos) {
                signal[pos as usize]
            } else {
                match self.pad_mode {
                    PadMode::Zero => 0.0,
                    PadMode::Reflect => signal[reflect_index(pos, signal.len())],
                }
            };
        }
    }
}

/// Map an out-of-range index back into [0, len) by repeated mirroring about
/// the first and last samples, without repeating them
fn reflect_index(pos: i64, len: usize) -> usize {
    if len == 1 {
        return 0;
    }

    // Mirroring has period 2(L-1)
    let period = 2 * (len as i64 - 1);
    let folded = pos.rem_euclid(period);
    if folded < len as i64 {
        folded as usize
    } else {
        (period - folded) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn framer(
        frame_length: usize,
        frame_shift: usize,
        edge_policy: EdgePolicy,
        pad_alignment: PadAlignment,
        pad_mode: PadMode,
    ) -> Framer {
        Framer::new(&StftOptions {
            frame_length,
            frame_shift,
            edge_policy,
            pad_alignment,
            pad_mode,
            ..Default::default()
        })
    }

    fn snip(frame_length: usize, frame_shift: usize) -> Framer {
        framer(
            frame_length,
            frame_shift,
            EdgePolicy::Snip,
            PadAlignment::Left,
            PadMode::Zero,
        )
    }

    #[test]
    fn test_snip_frame_count() {
        let f = snip(400, 160);
        assert_eq!(f.num_frames(16000), 98);
        assert_eq!(f.num_frames(400), 1);
        assert_eq!(f.num_frames(399), 0);
        assert_eq!(f.num_frames(0), 0);
        assert_eq!(f.num_frames(559), 1);
        assert_eq!(f.num_frames(560), 2);
    }

    #[test]
    fn test_pad_frame_count() {
        let f = framer(400, 160, EdgePolicy::Pad, PadAlignment::Left, PadMode::Zero);
        assert_eq!(f.num_frames(16000), 100);
        assert_eq!(f.num_frames(16001), 101);
        assert_eq!(f.num_frames(1), 1);
        assert_eq!(f.num_frames(0), 0);
    }

    #[test]
    fn test_pad_center_reaches_last_sample() {
        // S < F < 2S: ceil(L / S) centered frames stop short of the end
        let f = framer(256, 160, EdgePolicy::Pad, PadAlignment::Center, PadMode::Zero);
        let len = 1120;
        let n = f.num_frames(len);
        assert_eq!(n, 8);

        let last_end = f.frame_offset(n - 1) + 256;
        assert!(last_end >= len as i64);
        assert!(f.frame_offset(n - 1) < len as i64);

        // F >= 2S keeps the left-aligned count
        let f = framer(400, 160, EdgePolicy::Pad, PadAlignment::Center, PadMode::Zero);
        assert_eq!(f.num_frames(16000), 100);
        assert_eq!(f.num_frames(1), 1);
        assert_eq!(f.num_frames(0), 0);
    }

    #[test]
    fn test_snip_extract() {
        let signal: Vec<f64> = (0..10).map(|n| n as f64).collect();
        let f = snip(4, 3);
        let mut frame = vec![0.0; 4];

        f.extract(&signal, 2, &mut frame);
        assert_eq!(frame, vec![6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_pad_left_zero_fills_tail() {
        let signal: Vec<f64> = (1..=5).map(|n| n as f64).collect();
        let f = framer(4, 2, EdgePolicy::Pad, PadAlignment::Left, PadMode::Zero);
        assert_eq!(f.num_frames(5), 3);

        let mut frame = vec![-1.0; 6];
        f.extract(&signal, 2, &mut frame);
        assert_eq!(frame, vec![5.0, 0.0, 0.0, 0.0, -1.0, -1.0]);
    }

    #[test]
    fn test_pad_center_reflect() {
        let signal = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let f = framer(4, 2, EdgePolicy::Pad, PadAlignment::Center, PadMode::Reflect);
        let mut frame = vec![0.0; 4];

        // Frame 0 spans [-2, 2)
        f.extract(&signal, 0, &mut frame);
        assert_eq!(frame, vec![3.0, 2.0, 1.0, 2.0]);

        // Frame 2 spans [2, 6)
        f.extract(&signal, 2, &mut frame);
        assert_eq!(frame, vec![3.0, 4.0, 5.0, 4.0]);
    }

    #[test]
    fn test_pad_center_zero() {
        let signal = vec![1.0, 2.0, 3.0];
        let f = framer(4, 1, EdgePolicy::Pad, PadAlignment::Center, PadMode::Zero);
        let mut frame = vec![0.0; 4];

        f.extract(&signal, 0, &mut frame);
        assert_eq!(frame, vec![0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reflect_index() {
        // x = [a b c]: ... b c | a b c | b a ...
        assert_eq!(reflect_index(-1, 3), 1);
        assert_eq!(reflect_index(-2, 3), 2);
        assert_eq!(reflect_index(-3, 3), 1);
        assert_eq!(reflect_index(3, 3), 1);
        assert_eq!(reflect_index(4, 3), 0);
        assert_eq!(reflect_index(7, 1), 0);
    }

    proptest! {
        #[test]
        fn prop_snip_frames_in_bounds(
            len in 0usize..5000,
            frame_length in 1usize..600,
            frame_shift in 1usize..300,
        ) {
            let f = snip(frame_length, frame_shift);
            let n = f.num_frames(len);

            if len >= frame_length {
                prop_assert_eq!(n, (len - frame_length) / frame_shift + 1);
                let last_end = f.frame_offset(n - 1) as usize + frame_length;
                prop_assert!(last_end <= len);
                // One more frame would run off the end
                prop_assert!(last_end + frame_shift > len);
            } else {
                prop_assert_eq!(n, 0);
            }
        }

        #[test]
        fn prop_pad_covers_signal(
            len in 1usize..5000,
            frame_shift in 1usize..300,
            extra in 0usize..300,
        ) {
            let frame_length = frame_shift + extra;
            let f = framer(
                frame_length,
                frame_shift,
                EdgePolicy::Pad,
                PadAlignment::Left,
                PadMode::Zero,
            );
            let n = f.num_frames(len);

            prop_assert_eq!(n, len.div_ceil(frame_shift));
            let last_start = f.frame_offset(n - 1) as usize;
            prop_assert!(last_start < len);
            prop_assert!(last_start + frame_length >= len);
        }

        #[test]
        fn prop_pad_center_covers_signal(
            len in 1usize..5000,
            frame_shift in 1usize..300,
            extra in 0usize..300,
        ) {
            let frame_length = frame_shift + extra;
            let f = framer(
                frame_length,
                frame_shift,
                EdgePolicy::Pad,
                PadAlignment::Center,
                PadMode::Zero,
            );
            let n = f.num_frames(len);
            let len = len as i64;

            prop_assert!(n >= (len as usize).div_ceil(frame_shift));
            prop_assert!(f.frame_offset(0) <= 0);
            prop_assert!(f.frame_offset(n - 1) < len);
            prop_assert!(f.frame_offset(n - 1) + frame_length as i64 >= len);
            // One frame fewer would leave the tail uncovered or drop below ceil(L / S)
            if n > (len as usize).div_ceil(frame_shift) {
                prop_assert!(f.frame_offset(n - 2) + (frame_length as i64) < len);
            }
        }

        #[test]
        fn prop_reflect_stays_in_range(pos in -10_000i64..10_000, len in 1usize..50) {
            prop_assert!(reflect_index(pos, len) < len);
        }
    }
}
