//! Live in-place progress display
//!
//! The renderer is the only owner of terminal output during a build. It
//! consumes status events one at a time and keeps, per job, the screen line
//! that job was first printed on. Updating a job rewrites only the status
//! text at the end of its line:
//!
//! ```text
//! -->     linux/amd64: example.com/cmd/a ... finished (1.20s)
//! -->   windows/amd64: example.com/cmd/a ... building
//! -->     linux/amd64: example.com/cmd/b ... building        <- cursor below
//! ```
//!
//! To redraw a line `k` rows above the cursor: move up `k`, move right past
//! the prefix, clear to end of line, print, move down `k`, return to column
//! 0. The cursor therefore always rests on the line below the last one,
//! where the next new job is appended.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{MoveDown, MoveRight, MoveToColumn, MoveUp};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;

use crate::config::defaults::PLATFORM_COLUMN_WIDTH;
use crate::core::job::JobIdentity;
use crate::core::status::{Phase, StatusEvent};

/// Display state of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobState {
    /// Latest phase seen
    pub phase: Phase,
    /// Error text, set when the job failed
    pub error: String,
    /// Screen line assigned at first sight; never changes
    pub line: usize,
    /// When the job was dispatched
    pub started: Option<Instant>,
}

/// Per-job display state plus the number of lines printed so far
#[derive(Debug, Default)]
pub struct RenderState {
    jobs: HashMap<JobIdentity, JobState>,
    num_lines: usize,
}

impl RenderState {
    /// Number of job lines printed
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// State of one job, if any event has been seen for it
    pub fn get(&self, id: &JobIdentity) -> Option<&JobState> {
        self.jobs.get(id)
    }

    /// All jobs, ordered by screen line
    pub fn jobs_in_order(&self) -> Vec<(&JobIdentity, &JobState)> {
        let mut jobs: Vec<_> = self.jobs.iter().collect();
        jobs.sort_by_key(|(_, state)| state.line);
        jobs
    }

    /// Number of jobs whose latest phase is `phase`
    pub fn count(&self, phase: Phase) -> usize {
        self.jobs.values().filter(|s| s.phase == phase).count()
    }
}

/// Single-writer progress renderer
pub struct ProgressRenderer<W: Write> {
    out: W,
    state: RenderState,
}

impl<W: Write> ProgressRenderer<W> {
    /// Create a renderer writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: RenderState::default(),
        }
    }

    /// Current display state
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Finish rendering, returning the state and the writer
    pub fn into_parts(self) -> (RenderState, W) {
        (self.state, self.out)
    }

    /// Apply one status event and redraw the affected line
    pub fn update(&mut self, event: &StatusEvent) -> io::Result<()> {
        let prefix = line_prefix(&event.id);

        if !self.state.jobs.contains_key(&event.id) {
            let line = self.state.num_lines;
            self.state.num_lines += 1;
            self.state.jobs.insert(
                event.id.clone(),
                JobState {
                    phase: event.phase,
                    error: String::new(),
                    line,
                    started: None,
                },
            );
            writeln!(self.out, "{prefix}")?;
        }

        let Some(state) = self.state.jobs.get_mut(&event.id) else {
            return Ok(());
        };
        state.phase = event.phase;

        let text = match event.phase {
            Phase::Start => {
                state.started = Some(Instant::now());
                format!("{}", "building".cyan())
            }
            Phase::Success => {
                format!("{} ({:.2?})", "finished".green(), elapsed(state.started))
            }
            Phase::Error => {
                state.error.clone_from(&event.detail);
                format!("{}  ({:.2?})", "errored".red(), elapsed(state.started))
            }
            Phase::Skipped => format!("{}  ({})", "skipped".yellow(), event.detail),
        };
        let line = state.line;

        self.set_status_text(line, prefix.chars().count(), &text)
    }

    fn set_status_text(&mut self, line: usize, prefix_len: usize, text: &str) -> io::Result<()> {
        let lines_away = to_cells(self.state.num_lines - line);
        queue!(
            self.out,
            MoveUp(lines_away),
            MoveRight(to_cells(prefix_len)),
            Clear(ClearType::UntilNewLine),
            Print(text),
            MoveDown(lines_away),
            MoveToColumn(0)
        )?;
        self.out.flush()
    }
}

/// Static text in front of a job's status
pub fn line_prefix(id: &JobIdentity) -> String {
    format!(
        "--> {:>width$}: {} ... ",
        id.platform.to_string(),
        id.package,
        width = PLATFORM_COLUMN_WIDTH
    )
}

fn elapsed(started: Option<Instant>) -> Duration {
    started.map_or(Duration::ZERO, |t| t.elapsed())
}

fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
