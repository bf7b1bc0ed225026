use std::f64::consts::PI;

/// Sine oscillator.
/// Sample `j` is `sin(2π · freq · j / sample_rate)`, so the first sample is always 0.
#[derive(Clone, Copy, Debug)]
pub struct Tone {
    i: usize,
    freq: f64,
    sample_rate: f64,
    duration: Option<usize>,
}

impl Tone {
    pub fn new(freq: f64, sample_rate: u32) -> Self {
        Self {
            i: 0,
            freq,
            sample_rate: sample_rate as f64,
            duration: None,
        }
    }

    /// Stops the tone after `duration` samples.
    pub fn duration(mut self, duration: usize) -> Self {
        self.duration = Some(duration);
        self
    }
}

impl Iterator for Tone {
    type Item = f64;

    fn next(&mut self) -> Option<Self::Item> {
        match self.duration {
            Some(i) if self.i >= i => return None,
            _ => {}
        }

        let t = self.i as f64 / self.sample_rate;
        self.i += 1;
        Some((2.0 * PI * self.freq * t).sin())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.duration {
            Some(i) => {
                let left = i.saturating_sub(self.i);
                (left, Some(left))
            }
            None => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod test {
    use super::Tone;

    #[test]
    fn test_tone_starts_at_zero() {
        let mut tone = Tone::new(1000.0, 8000);
        assert_eq!(tone.next(), Some(0.0));

        // An eighth of a period in
        let eighth = tone.next().unwrap();
        assert!((eighth - (std::f64::consts::PI / 4.0).sin()).abs() < 1e-12);
    }

    #[test]
    fn test_tone_duration() {
        let tone = Tone::new(440.0, 44100).duration(10);
        assert_eq!(tone.size_hint(), (10, Some(10)));
        assert_eq!(tone.count(), 10);

        let mut empty = Tone::new(440.0, 44100).duration(0);
        assert_eq!(empty.next(), None);
        assert_eq!(empty.next(), None);
    }

    #[test]
    fn test_tone_period() {
        // 100Hz at 8kHz repeats every 80 samples
        let samples = Tone::new(100.0, 8000).take(160).collect::<Vec<_>>();
        for i in 0..80 {
            assert!((samples[i] - samples[i + 80]).abs() < 1e-9);
        }
    }
}
