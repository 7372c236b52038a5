//! The scripted "prompt, think, code" sequence shown next to a beat's code snippet.
//!
//! A timed state machine driven by elapsed milliseconds. It loops forever:
//! idle -> user-typing -> ai-thinking -> coding -> exiting -> user-typing -> ...

use crate::sim::primitives::Rng64;

pub const DEFAULT_PROMPT: &str = "For the background of Beat 05, make a crowd dynamics simulation over an invisible continually shifting procedural noise field.";

/// The program typed out under [`DEFAULT_PROMPT`]: the flocking background the prompt asks for.
pub const CODE_LISTING: &str = r#"import { createNoise3D } from 'simplex-noise';
import { Vector2 } from './math';

// Crowd settings
const CROWD = {
  agents: 500,
  maxSpeed: 4.0,
  fieldScale: 0.002,
  drift: 0.5
};

const noise3D = createNoise3D();
const agents = Array.from({ length: CROWD.agents }, () => ({
  pos: new Vector2(Math.random() * width, Math.random() * height),
  vel: Vector2.random().scale(CROWD.maxSpeed)
}));

export function renderFrame(ctx, t) {
  // Fade the previous frame into a trail
  ctx.fillStyle = 'rgba(0,0,0,0.1)';
  ctx.fillRect(0, 0, width, height);

  for (const agent of agents) {
    // Steer along the shifting noise field
    const n = noise3D(agent.pos.x * CROWD.fieldScale, agent.pos.y * CROWD.fieldScale, t * CROWD.drift);
    agent.vel.add(Vector2.fromAngle(n * Math.PI * 2).scale(0.5));
    agent.vel.limit(CROWD.maxSpeed);
    agent.pos.add(agent.vel).wrap(width, height);

    ctx.beginPath();
    ctx.arc(agent.pos.x, agent.pos.y, 2, 0, Math.PI * 2);
    ctx.fillStyle = `hsl(${t * 50}, 70%, 50%)`;
    ctx.fill();
  }
}"#;

const LEAD_MS: f64 = 500.0;
const PROMPT_CHAR_MIN_MS: f64 = 10.0;
const PROMPT_CHAR_JITTER_MS: f64 = 20.0;
const PROMPT_PAUSE_MS: f64 = 300.0;
const THINK_MS: f64 = 600.0;
const THOUGHT_EVERY_MS: f64 = 1500.0;
const HOLD_MS: f64 = 2000.0;
const EXIT_MS: f64 = 800.0;

const CODE_OPACITY: f32 = 0.7;
const CODE_OPACITY_DIM: f32 = 0.4;
/// Once more lines than this are visible the code dims and types faster.
const DIM_AFTER_LINES: usize = 6;

const ANALYZING: &str = "Analyzing requirements...";
const IMPLEMENTED: &str = "Code implemented.";
const THOUGHTS: [&str; 5] = [
    "Generating physics...",
    "Optimizing vectors...",
    "Applying noise...",
    "Compiling shaders...",
    "Simulating agents...",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypingPhase {
    Idle,
    UserTyping,
    AiThinking,
    Coding,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Start,
    PromptChar,
    PromptDone,
    Think,
    CodeStart,
    CodeChar,
    CodeDone,
    Exit,
}

/// What the overlay would show at the current instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct TypingView<'a> {
    pub phase: TypingPhase,
    pub prompt: &'a str,
    pub code: &'a str,
    pub status: &'a str,
    pub code_opacity: f32,
    pub cycle: u64,
}

#[derive(Debug, Clone)]
pub struct TypingScript {
    prompt: String,
    code: String,
    rng: Rng64,
    phase: TypingPhase,
    next: Step,
    now_ms: f64,
    due_ms: f64,
    prompt_end: usize,
    code_end: usize,
    code_lines: usize,
    code_started_ms: f64,
    code_opacity: f32,
    status: &'static str,
    cycle: u64,
}

impl TypingScript {
    pub fn new(prompt: impl Into<String>, code: impl Into<String>, seed: u64) -> Self {
        Self {
            prompt: prompt.into(),
            code: code.into(),
            rng: Rng64::new(seed),
            phase: TypingPhase::Idle,
            next: Step::Start,
            now_ms: 0.0,
            due_ms: 0.0,
            prompt_end: 0,
            code_end: 0,
            code_lines: 1,
            code_started_ms: 0.0,
            code_opacity: 0.0,
            status: "",
            cycle: 0,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn view(&self) -> TypingView<'_> {
        TypingView {
            phase: self.phase,
            prompt: &self.prompt[..self.prompt_end],
            code: &self.code[..self.code_end],
            status: self.current_status(),
            code_opacity: self.code_opacity,
            cycle: self.cycle,
        }
    }

    fn current_status(&self) -> &'static str {
        if self.phase != TypingPhase::Coding || self.status == IMPLEMENTED {
            return self.status;
        }
        let ticks = ((self.now_ms - self.code_started_ms) / THOUGHT_EVERY_MS).floor() as usize;
        match ticks {
            0 => self.status,
            n => THOUGHTS[(n - 1) % THOUGHTS.len()],
        }
    }

    /// Run every event due within the next `dt_ms` milliseconds.
    pub fn advance(&mut self, dt_ms: f64) {
        let target = self.now_ms + dt_ms.max(0.0);
        while self.due_ms <= target {
            self.now_ms = self.due_ms;
            let wait = self.fire();
            self.due_ms = self.now_ms + wait;
        }
        self.now_ms = target;
    }

    /// Execute the pending step; returns the delay before the following one.
    fn fire(&mut self) -> f64 {
        match self.next {
            Step::Start => {
                self.prompt_end = 0;
                self.code_end = 0;
                self.code_lines = 1;
                self.code_opacity = 0.0;
                self.status = "";
                self.phase = TypingPhase::UserTyping;
                self.next = Step::PromptChar;
                LEAD_MS
            }
            Step::PromptChar => {
                let wait = PROMPT_CHAR_MIN_MS + self.rng.next_f64_01() * PROMPT_CHAR_JITTER_MS;
                match next_boundary(&self.prompt, self.prompt_end) {
                    Some(end) => self.prompt_end = end,
                    None => self.next = Step::PromptDone,
                }
                wait
            }
            Step::PromptDone => {
                self.next = Step::Think;
                PROMPT_PAUSE_MS
            }
            Step::Think => {
                self.phase = TypingPhase::AiThinking;
                self.status = ANALYZING;
                self.next = Step::CodeStart;
                THINK_MS
            }
            Step::CodeStart => {
                self.phase = TypingPhase::Coding;
                self.code_opacity = CODE_OPACITY;
                self.code_started_ms = self.now_ms;
                self.next = if self.code.is_empty() {
                    Step::CodeDone
                } else {
                    Step::CodeChar
                };
                0.0
            }
            Step::CodeChar => {
                let Some(end) = next_boundary(&self.code, self.code_end) else {
                    self.next = Step::CodeDone;
                    return 0.0;
                };
                let ch = self.code[self.code_end..end].chars().next().unwrap_or(' ');
                self.code_end = end;
                if ch == '\n' {
                    self.code_lines += 1;
                }
                if self.code_lines > DIM_AFTER_LINES && self.code_opacity == CODE_OPACITY {
                    self.code_opacity = CODE_OPACITY_DIM;
                }
                if self.code_end == self.code.len() {
                    self.next = Step::CodeDone;
                }
                char_delay_ms(ch, self.code_opacity == CODE_OPACITY_DIM)
            }
            Step::CodeDone => {
                self.status = IMPLEMENTED;
                self.next = Step::Exit;
                HOLD_MS
            }
            Step::Exit => {
                self.phase = TypingPhase::Exiting;
                self.next = Step::Start;
                self.cycle += 1;
                EXIT_MS
            }
        }
    }
}

fn next_boundary(s: &str, at: usize) -> Option<usize> {
    s[at..].chars().next().map(|c| at + c.len_utf8())
}

/// Pause after typing `ch`; `fast` once the code has dimmed.
pub(crate) fn char_delay_ms(ch: char, fast: bool) -> f64 {
    let (base, newline, punct) = if fast { (2.0, 10.0, 5.0) } else { (5.0, 30.0, 15.0) };
    match ch {
        '\n' => newline,
        ';' | '}' => punct,
        ' ' => 1.0,
        _ => base,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/script.rs"]
mod tests;
