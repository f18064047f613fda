// Per-element motion and aberration parameters, drawn independently per element.
// See DESIGN.md: params

use std::f64::consts::TAU;
use std::ops::Range;

use rand::Rng;

/// Translation drift amplitude (px).
pub const DRIFT_AMPLITUDE: Range<f64> = 3.0..14.0;
/// Translation drift frequency (Hz).
pub const DRIFT_FREQUENCY: Range<f64> = 0.18..0.45;
/// Rotation amplitude (degrees).
pub const ROTATION_AMPLITUDE: Range<f64> = 0.2..1.6;
/// Rotation frequency (Hz).
pub const ROTATION_FREQUENCY: Range<f64> = 0.10..0.30;

pub const ABERRATION_AMPLITUDE_X: Range<f64> = 1.0..3.0;
pub const ABERRATION_AMPLITUDE_Y: Range<f64> = 0.5..2.0;
pub const ABERRATION_FREQUENCY: Range<f64> = 0.25..0.55;

/// A sinusoid: `amplitude · wave(elapsed · frequency_hz · 2π + phase)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub amplitude: f64,
    pub frequency_hz: f64,
    pub phase: f64,
}

impl Oscillator {
    pub fn new(amplitude: f64, frequency_hz: f64, phase: f64) -> Self {
        Oscillator {
            amplitude,
            frequency_hz,
            phase,
        }
    }

    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        amplitude: Range<f64>,
        frequency_hz: Range<f64>,
    ) -> Self {
        Oscillator {
            amplitude: rng.gen_range(amplitude),
            frequency_hz: rng.gen_range(frequency_hz),
            phase: random_phase(rng),
        }
    }

    fn angle(&self, elapsed_secs: f64) -> f64 {
        elapsed_secs * self.frequency_hz * TAU + self.phase
    }

    pub fn sin_at(&self, elapsed_secs: f64) -> f64 {
        self.angle(elapsed_secs).sin() * self.amplitude
    }

    pub fn cos_at(&self, elapsed_secs: f64) -> f64 {
        self.angle(elapsed_secs).cos() * self.amplitude
    }
}

fn random_phase<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}

/// Drift on X, drift on Y, and rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    pub x: Oscillator,
    pub y: Oscillator,
    pub rotation: Oscillator,
}

impl MotionParams {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        MotionParams {
            x: Oscillator::random(rng, DRIFT_AMPLITUDE, DRIFT_FREQUENCY),
            y: Oscillator::random(rng, DRIFT_AMPLITUDE, DRIFT_FREQUENCY),
            rotation: Oscillator::random(rng, ROTATION_AMPLITUDE, ROTATION_FREQUENCY),
        }
    }
}

/// Chromatic aberration: one shared frequency and phase, separate X/Y amplitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextEffectParams {
    pub amp_x: f64,
    pub amp_y: f64,
    pub frequency_hz: f64,
    pub phase: f64,
}

impl TextEffectParams {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        TextEffectParams {
            amp_x: rng.gen_range(ABERRATION_AMPLITUDE_X),
            amp_y: rng.gen_range(ABERRATION_AMPLITUDE_Y),
            frequency_hz: rng.gen_range(ABERRATION_FREQUENCY),
            phase: random_phase(rng),
        }
    }

    pub fn x(&self) -> Oscillator {
        Oscillator::new(self.amp_x, self.frequency_hz, self.phase)
    }

    pub fn y(&self) -> Oscillator {
        Oscillator::new(self.amp_y, self.frequency_hz, self.phase)
    }
}
