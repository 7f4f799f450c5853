//! Canned sound effects. The core only decides *when* a cue plays; the
//! presentation layer synthesizes it from the patch returned here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Hover,
    Click,
    Transition,
    Success,
}

impl SoundCue {
    pub const ALL: [SoundCue; 4] = [Self::Hover, Self::Click, Self::Transition, Self::Success];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Click => "click",
            Self::Transition => "transition",
            Self::Success => "success",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    pub fn patch(self) -> SoundPatch {
        match self {
            // glassy blip
            Self::Hover => SoundPatch {
                cue: self,
                duration_secs: 0.1,
                reverb_send: 0.0,
                voices: vec![Voice {
                    source: Source::Oscillator(Waveform::Sine),
                    frequency: Sweep::exponential(1200.0, 1600.0, 0.05),
                    gain: Envelope::decay(0.05, 0.001, 0.05),
                    delay_secs: 0.0,
                }],
                filter: None,
            },
            // wood-block switch
            Self::Click => SoundPatch {
                cue: self,
                duration_secs: 0.1,
                reverb_send: 0.0,
                voices: vec![Voice {
                    source: Source::Oscillator(Waveform::Triangle),
                    frequency: Sweep::exponential(300.0, 50.0, 0.05),
                    gain: Envelope::decay(0.3, 0.001, 0.08),
                    delay_secs: 0.0,
                }],
                filter: None,
            },
            // low-pass noise whoosh
            Self::Transition => SoundPatch {
                cue: self,
                duration_secs: 0.5,
                reverb_send: 0.0,
                voices: vec![Voice {
                    source: Source::WhiteNoise,
                    frequency: Sweep::constant(0.0),
                    gain: Envelope {
                        attack_secs: 0.0,
                        peak: 0.1,
                        release_to: 0.0,
                        release_secs: 0.4,
                        curve: Curve::Linear,
                    },
                    delay_secs: 0.0,
                }],
                filter: Some(Filter {
                    kind: FilterKind::Lowpass,
                    cutoff: Sweep::exponential(200.0, 4000.0, 0.3),
                }),
            },
            // C major triad with reverb
            Self::Success => SoundPatch {
                cue: self,
                duration_secs: 1.0,
                reverb_send: 0.4,
                voices: [523.25, 659.25, 783.99]
                    .into_iter()
                    .enumerate()
                    .map(|(i, hz)| Voice {
                        source: Source::Oscillator(Waveform::Sine),
                        frequency: Sweep::constant(hz),
                        gain: Envelope {
                            attack_secs: 0.05 + i as f32 * 0.02,
                            peak: 0.2 * 0.1,
                            release_to: 0.001,
                            release_secs: 0.8,
                            curve: Curve::Exponential,
                        },
                        delay_secs: 0.0,
                    })
                    .collect(),
                filter: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundPatch {
    pub cue: SoundCue,
    pub duration_secs: f32,
    /// Share of the signal routed into the plate reverb.
    pub reverb_send: f32,
    pub voices: Vec<Voice>,
    pub filter: Option<Filter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Voice {
    pub source: Source,
    pub frequency: Sweep,
    pub gain: Envelope,
    pub delay_secs: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "waveform", rename_all = "camelCase")]
pub enum Source {
    Oscillator(Waveform),
    WhiteNoise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sweep {
    pub from: f32,
    pub to: f32,
    pub over_secs: f32,
    pub curve: Curve,
}

impl Sweep {
    fn constant(hz: f32) -> Self {
        Self {
            from: hz,
            to: hz,
            over_secs: 0.0,
            curve: Curve::Linear,
        }
    }

    fn exponential(from: f32, to: f32, over_secs: f32) -> Self {
        Self {
            from,
            to,
            over_secs,
            curve: Curve::Exponential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub attack_secs: f32,
    pub peak: f32,
    pub release_to: f32,
    pub release_secs: f32,
    pub curve: Curve,
}

impl Envelope {
    fn decay(peak: f32, release_to: f32, release_secs: f32) -> Self {
        Self {
            attack_secs: 0.0,
            peak,
            release_to,
            release_secs,
            curve: Curve::Exponential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub kind: FilterKind,
    pub cutoff: Sweep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Lowpass,
}

/// Background drone started with the first session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ambiance {
    pub fade_in_secs: f32,
    pub level: f32,
    pub pads: Vec<Pad>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pad {
    pub waveform: Waveform,
    pub frequency: f32,
    pub gain: f32,
}

pub fn ambiance() -> Ambiance {
    Ambiance {
        fade_in_secs: 4.0,
        level: 0.08,
        pads: vec![
            Pad {
                waveform: Waveform::Sine,
                frequency: 110.0,
                gain: 1.0,
            },
            // slightly detuned octave
            Pad {
                waveform: Waveform::Triangle,
                frequency: 220.5,
                gain: 0.05,
            },
        ],
    }
}
