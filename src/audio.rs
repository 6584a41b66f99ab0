//! Procedurally generated sound effects and music loops.
//!
//! Every sound is synthesized with fundsp into a mono sample buffer once at
//! startup, then handed to rodio. Playback is fire-and-forget: without an
//! output device the game simply runs silent.

use fundsp::prelude64::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink, Source, buffer::SamplesBuffer};

use crate::game::{Sound, Track};
use crate::settings::Settings;

pub const SAMPLE_RATE: u32 = 44_100;

// ── Synthesis ───────────────────────────────────────────────────────────────

fn render<U: AudioUnit>(unit: &mut U, seconds: f64) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f64 * seconds) as usize;
    (0..n).map(|_| unit.get_mono() as f32).collect()
}

/// Falling sawtooth: 400Hz to 80Hz over 0.4s, fading out over 0.5s.
pub fn death() -> Vec<f32> {
    let freq = lfo(|t| 400.0 + (80.0 - 400.0) * (t / 0.4).min(1.0));
    let gain = lfo(|t| 0.15 * (1.0 - (t / 0.5).min(1.0)));
    let mut sound = (freq >> saw()) * gain;
    render(&mut sound, 0.5)
}

/// Two quick rising square blips.
pub fn point() -> Vec<f32> {
    let freq = lfo(|t| if t < 0.06 { 880.0 } else { 1320.0 });
    let gain = lfo(|t| 0.12 * (1.0 - (t / 0.16).min(1.0)));
    let mut sound = (freq >> square()) * gain;
    render(&mut sound, 0.16)
}

/// Short soft tick for moving a menu selection.
pub fn hover() -> Vec<f32> {
    let gain = lfo(|t| 0.10 * (-t * 60.0).exp());
    let mut sound = sine_hz(660.0) * gain;
    render(&mut sound, 0.06)
}

/// Upward chirp for confirming a menu choice.
pub fn select() -> Vec<f32> {
    let freq = lfo(|t| 520.0 + 900.0 * (t / 0.12).min(1.0));
    let gain = lfo(|t| 0.12 * (1.0 - (t / 0.14).min(1.0)));
    let mut sound = (freq >> triangle()) * gain;
    render(&mut sound, 0.14)
}

/// (frequency Hz, length in eighth notes); 0 Hz is a rest.
const MENU_TUNE: &[(f32, u32)] = &[
    (330.0, 2), (392.0, 2), (440.0, 2), (392.0, 2),
    (330.0, 2), (294.0, 2), (330.0, 4),
    (262.0, 2), (294.0, 2), (330.0, 2), (392.0, 2),
    (330.0, 4), (0.0, 4),
];

const GAME_TUNE: &[(f32, u32)] = &[
    (440.0, 1), (0.0, 1), (440.0, 1), (523.0, 1), (587.0, 2), (523.0, 1), (440.0, 1),
    (392.0, 1), (0.0, 1), (392.0, 1), (440.0, 1), (523.0, 2), (440.0, 2),
    (440.0, 1), (0.0, 1), (440.0, 1), (523.0, 1), (659.0, 2), (587.0, 1), (523.0, 1),
    (587.0, 2), (523.0, 2), (440.0, 4),
];

fn tune(notes: &[(f32, u32)], eighth: f64, gain: f32) -> Vec<f32> {
    let mut out = Vec::new();
    for &(hz, eighths) in notes {
        let seconds = eighth * eighths as f64;
        if hz <= 0.0 {
            let n = (SAMPLE_RATE as f64 * seconds) as usize;
            out.extend(std::iter::repeat_n(0.0, n));
            continue;
        }
        let env = lfo(|t| (-t * 5.0).exp());
        let mut note = square_hz(hz.into()) * env;
        out.extend(render(&mut note, seconds).into_iter().map(|s| s * gain));
    }
    out
}

pub fn menu_music() -> Vec<f32> {
    tune(MENU_TUNE, 0.22, 0.05)
}

pub fn game_music() -> Vec<f32> {
    tune(GAME_TUNE, 0.13, 0.04)
}

// ── Playback ────────────────────────────────────────────────────────────────

struct Bank {
    hover: Vec<f32>,
    select: Vec<f32>,
    point: Vec<f32>,
    death: Vec<f32>,
    menu: Vec<f32>,
    game: Vec<f32>,
}

impl Bank {
    fn synthesize() -> Self {
        Bank {
            hover: hover(),
            select: select(),
            point: point(),
            death: death(),
            menu: menu_music(),
            game: game_music(),
        }
    }

    fn sound(&self, sound: Sound) -> &[f32] {
        match sound {
            Sound::Hover => &self.hover,
            Sound::Select => &self.select,
            Sound::Point => &self.point,
            Sound::Death => &self.death,
        }
    }

    fn track(&self, track: Track) -> &[f32] {
        match track {
            Track::Menu => &self.menu,
            Track::Game => &self.game,
        }
    }
}

pub struct Audio {
    stream: Option<OutputStream>,
    bank: Bank,
    music: Option<(Track, Sink)>,
    volume: f32,
}

impl Audio {
    pub fn new(settings: &Settings) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => Some(stream),
            Err(e) => {
                log::warn!("no audio output ({}); running silent", e);
                None
            }
        };
        Audio {
            stream,
            bank: Bank::synthesize(),
            music: None,
            volume: settings.effective_volume(),
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some((_, sink)) = &self.music {
            sink.set_volume(volume);
        }
    }

    fn sink(&self) -> Option<Sink> {
        let stream = self.stream.as_ref()?;
        let sink = Sink::connect_new(stream.mixer());
        sink.set_volume(self.volume);
        Some(sink)
    }

    pub fn play(&self, sound: Sound) {
        if self.volume <= 0.0 {
            return;
        }
        if let Some(sink) = self.sink() {
            let samples = self.bank.sound(sound).to_vec();
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
            sink.detach();
        }
    }

    /// Loop `track`, replacing whatever music is on. Asking for the track
    /// that is already playing keeps it going.
    pub fn play_music(&mut self, track: Track) {
        if let Some((current, sink)) = &self.music {
            if *current == track && !sink.empty() {
                return;
            }
        }
        self.stop_music();
        if let Some(sink) = self.sink() {
            let samples = self.bank.track(track).to_vec();
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples).repeat_infinite());
            self.music = Some((track, sink));
        }
    }

    pub fn stop_music(&mut self) {
        if let Some((_, sink)) = self.music.take() {
            sink.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(samples: &[f32]) -> f32 {
        samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn effects_have_expected_length_and_level() {
        let cases = [
            (death(), 0.5),
            (point(), 0.16),
            (hover(), 0.06),
            (select(), 0.14),
        ];
        for (samples, seconds) in cases {
            assert_eq!(samples.len(), (SAMPLE_RATE as f64 * seconds) as usize);
            let p = peak(&samples);
            assert!(p > 0.0, "effect is silent");
            assert!(p <= 1.0, "effect clips: {p}");
            assert!(samples.iter().all(|s| s.is_finite()));
        }
    }

    #[test]
    fn death_fades_to_silence() {
        let samples = death();
        let tail = &samples[samples.len() - 200..];
        assert!(peak(tail) < 0.01);
    }

    #[test]
    fn music_loops_cover_their_tunes() {
        let menu = menu_music();
        let eighths: u32 = MENU_TUNE.iter().map(|&(_, n)| n).sum();
        let expected = eighths as f64 * 0.22 * SAMPLE_RATE as f64;
        assert!((menu.len() as f64 - expected).abs() < MENU_TUNE.len() as f64);
        assert!(peak(&menu) > 0.0 && peak(&menu) <= 1.0);
        assert!(!game_music().is_empty());
    }
}
