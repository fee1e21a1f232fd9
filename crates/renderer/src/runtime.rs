use std::time::Instant;

/// Clock reading handed to the frame driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Seconds since the clock was last reset.
    pub seconds: f32,
    /// Frames sampled since the clock was last reset.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Where frame time comes from.
pub trait TimeSource: Send {
    /// Restarts the clock at zero.
    fn reset(&mut self);
    /// Reads the clock for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Monotonic wall clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.origin.elapsed().as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Clock frozen at one timestamp, for still frames and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
    frame: u64,
}

impl FixedTimeSource {
    pub fn new(time: f32) -> Self {
        Self { time, frame: 0 }
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample::new(self.time, self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_source_counts_frames_but_not_time() {
        let mut clock = FixedTimeSource::new(3.0);
        assert_eq!(clock.sample(), TimeSample::new(3.0, 0));
        assert_eq!(clock.sample(), TimeSample::new(3.0, 1));
        clock.reset();
        assert_eq!(clock.sample().frame_index, 0);
    }

    #[test]
    fn system_source_is_monotonic() {
        let mut clock = SystemTimeSource::new();
        let first = clock.sample();
        let second = clock.sample();
        assert!(second.seconds >= first.seconds);
        assert_eq!(second.frame_index, first.frame_index + 1);
    }
}
