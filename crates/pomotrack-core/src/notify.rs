//! Completion cues.
//!
//! Both collaborators are fire-and-forget: a notifier that fails or an audio
//! device that is missing never affects the session engine.

use thiserror::Error;

use crate::timer::Mode;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("notifications are not permitted")]
    PermissionDenied,
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),
}

/// Desktop-style notification sink.
pub trait Notifier {
    /// # Errors
    ///
    /// Backends report failures; callers log and drop them.
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Plays a short synthesized tone.
pub trait AudioCue {
    fn play(&self, tone: &Tone);
}

/// A triangle-wave oscillator with an attack/decay gain envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Gain at the start of the attack ramp.
    pub floor_gain: f32,
    pub peak_gain: f32,
    pub attack_ms: u32,
    /// Exponential decay back to `floor_gain`, measured from the start.
    pub decay_ms: u32,
}

impl Tone {
    /// The cue played once per expired countdown.
    pub fn completion() -> Self {
        Self {
            frequency_hz: 880.0,
            floor_gain: 0.0001,
            peak_gain: 0.2,
            attack_ms: 10,
            decay_ms: 1000,
        }
    }

    /// Envelope gain `t_ms` after the tone starts, following exponential
    /// ramps between the floor and the peak.
    pub fn gain_at(&self, t_ms: u32) -> f32 {
        let ramp = |from: f32, to: f32, frac: f32| from * (to / from).powf(frac.clamp(0.0, 1.0));
        if t_ms <= self.attack_ms {
            let frac = t_ms as f32 / self.attack_ms.max(1) as f32;
            ramp(self.floor_gain, self.peak_gain, frac)
        } else if t_ms <= self.decay_ms {
            let span = self.decay_ms.saturating_sub(self.attack_ms).max(1) as f32;
            let frac = (t_ms - self.attack_ms) as f32 / span;
            ramp(self.peak_gain, self.floor_gain, frac)
        } else {
            0.0
        }
    }
}

/// Title and body announcing the end of `completed`.
pub fn completion_message(completed: Mode) -> (&'static str, &'static str) {
    let body = match completed {
        Mode::Pomodoro => "Take a break!",
        Mode::ShortBreak | Mode::LongBreak => "Back to work!",
    };
    ("Time's up!", body)
}

/// Does nothing. Used when notifications are turned off.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

impl AudioCue for Silent {
    fn play(&self, _tone: &Tone) {}
}
