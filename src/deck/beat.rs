use crate::foundation::core::Rgb8;
use crate::foundation::error::{DeckError, DeckResult};

/// The behavior ruleset a beat selects for its visuals.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualMode {
    /// Particles spring to a lattice.
    Grid,
    /// Fast ballistic bounce.
    Chaos,
    /// Particles stream along a sinusoidal angle field.
    Flow,
    /// Drifting nodes joined by proximity edges.
    Network,
    /// Spiral inflow toward the centre.
    Convergence,
    /// Calm drift behind the flocking illustration.
    Explosion,
}

impl VisualMode {
    /// Every mode, in deck order.
    pub const ALL: [Self; 6] = [
        Self::Grid,
        Self::Chaos,
        Self::Flow,
        Self::Network,
        Self::Convergence,
        Self::Explosion,
    ];

    /// Lowercase tag used in logs and file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::Chaos => "chaos",
            Self::Flow => "flow",
            Self::Network => "network",
            Self::Convergence => "convergence",
            Self::Explosion => "explosion",
        }
    }
}

impl std::fmt::Display for VisualMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slide of the presentation. Immutable once loaded.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Beat {
    /// Stable ordinal.
    pub id: u32,
    /// Headline.
    pub title: String,
    /// Optional second line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Optional body copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Visual ruleset.
    pub visual_mode: VisualMode,
    /// Accent color propagated to every mounted visual.
    #[serde(alias = "highlight_color")]
    pub accent: Rgb8,
    /// Optional code shown (and typed out) alongside the beat.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

/// Check a beat table: non-empty, ids strictly increasing.
pub fn validate_beats(beats: &[Beat]) -> DeckResult<()> {
    if beats.is_empty() {
        return Err(DeckError::validation("beat table must not be empty"));
    }
    for pair in beats.windows(2) {
        if pair[1].id <= pair[0].id {
            return Err(DeckError::validation(format!(
                "beat ids must be strictly increasing (beat {} follows {})",
                pair[1].id, pair[0].id
            )));
        }
    }
    Ok(())
}

const CODE_SNIPPET: &str = "const dream = await ai.generate({
  concept: fluidity(),
  context: presentation()
});";

fn beat(
    id: u32,
    title: &str,
    subtitle: &str,
    body: &str,
    visual_mode: VisualMode,
    accent: Rgb8,
) -> Beat {
    Beat {
        id,
        title: title.to_owned(),
        subtitle: Some(subtitle.to_owned()),
        body: Some(body.to_owned()),
        visual_mode,
        accent,
        code_snippet: None,
    }
}

/// The built-in six-beat deck.
pub fn default_beats() -> Vec<Beat> {
    let mut beats = vec![
        beat(
            0,
            "The Static Era",
            "Why are we still simulating acetate foils?",
            "Traditional slide decks are artifacts of a physical limitation. We project static rectangles because we used to carry physical paper. But software is alive.",
            VisualMode::Grid,
            Rgb8::new(0x64, 0x74, 0x8b),
        ),
        beat(
            1,
            "Entropy & Rigidity",
            "Breaking the grid.",
            "Bespoke software used to be expensive. So we forced our dynamic ideas into rigid, pre-fabricated templates. But rigidity kills the vibe.",
            VisualMode::Chaos,
            Rgb8::new(0xef, 0x44, 0x44),
        ),
        beat(
            2,
            "Code as Commodity",
            "The cost of creation is trending to zero.",
            "We are entering an era where if you can imagine a specific interaction, you can magic it into existence. Code is no longer a barrier; it's a medium.",
            VisualMode::Flow,
            Rgb8::new(0x3b, 0x82, 0xf6),
        ),
        beat(
            3,
            "Vibe Coding",
            "Telling stories with algorithms.",
            "Every bullet point, every title, every transition can be backed by custom logic. Instead of picking a prebuilt transition effect from a menu, you create movement that specifically meets your needs.",
            VisualMode::Network,
            Rgb8::new(0xa8, 0x55, 0xf7),
        ),
        beat(
            4,
            "The Extravaganza",
            "Let the computer help tell the story.",
            "Why settle for a 'slide' when you can have a simulation? Why show a chart when you can show the data living and breathing?",
            VisualMode::Convergence,
            Rgb8::new(0x10, 0xb9, 0x81),
        ),
        beat(
            5,
            "Magic into Existence",
            "The future is bespoke.",
            "This presentation isn't a file. It's an app. Built for this moment, for this audience. Welcome to the future of storytelling.",
            VisualMode::Explosion,
            Rgb8::new(0xf5, 0x9e, 0x0b),
        ),
    ];
    beats[2].code_snippet = Some(CODE_SNIPPET.to_owned());
    beats
}

#[cfg(test)]
#[path = "../../tests/unit/deck/beat.rs"]
mod tests;
