//! Input scripts for automated runs.
//!
//! A script drives the pad (and a few session controls) on a frame
//! schedule, which makes regression runs reproducible: the same ROM and
//! script always produce the same frames.
//!
//! ## Script Format
//!
//! One entry per line, frames strictly increasing:
//! ```text
//! # frame,buttons[,command]
//! # buttons: UDLRABXYTS (T = Start, S = Select), . = released
//! 0,..........
//! 60,....A.....
//! 120,T
//! 180,.,screenshot:out.png
//! 240,.,save:0
//! ```
//!
//! Between entries the pad holds its last written state — the latch is
//! level-triggered, so nothing needs to be re-asserted every frame.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::io::Buttons;

/// Maximum script size in bytes to prevent OOM on a bad path.
const MAX_SCRIPT_SIZE: u64 = 1024 * 1024;

/// Session control attached to a script entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Reset,
    Save(u8),
    Load(u8),
    Screenshot(PathBuf),
}

/// One scheduled pad state, with an optional control command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    pub frame: u64,
    pub buttons: Buttons,
    pub command: Option<ScriptCommand>,
}

/// A parsed script: entries ordered by frame.
#[derive(Debug, Default)]
pub struct InputScript {
    entries: Vec<ScriptEntry>,
}

impl InputScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse a script file. The read is capped at
    /// [`MAX_SCRIPT_SIZE`] so a mistyped path to some huge file fails
    /// fast instead of ballooning memory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let file = File::open(path).map_err(|e| format!("cannot open script: {}", e))?;

        if let Ok(metadata) = file.metadata() {
            if metadata.len() > MAX_SCRIPT_SIZE {
                return Err(format!(
                    "script is {} bytes, the limit is {}",
                    metadata.len(),
                    MAX_SCRIPT_SIZE
                ));
            }
        }

        // Metadata can lie (pipes, special files), so the read itself is
        // capped one byte past the limit to make overruns detectable.
        let mut raw = Vec::new();
        file.take(MAX_SCRIPT_SIZE + 1)
            .read_to_end(&mut raw)
            .map_err(|e| format!("cannot read script: {}", e))?;
        if raw.len() as u64 > MAX_SCRIPT_SIZE {
            return Err(format!("script exceeds the {} byte limit", MAX_SCRIPT_SIZE));
        }

        let text =
            String::from_utf8(raw).map_err(|e| format!("script is not valid UTF-8: {}", e))?;
        Self::parse(&text)
    }

    /// Parse a script from a string.
    pub fn parse(content: &str) -> Result<Self, String> {
        let mut script = Self::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Blank lines and # comments carry no entry
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.splitn(3, ',').collect();
            if parts.len() < 2 {
                return Err(format!("Line {}: expected frame,buttons", line_num + 1));
            }

            let frame: u64 = parts[0]
                .trim()
                .parse()
                .map_err(|_| format!("Line {}: invalid frame number", line_num + 1))?;

            if let Some(last) = script.entries.last() {
                if frame <= last.frame {
                    return Err(format!(
                        "Line {}: frame {} not after previous frame {}",
                        line_num + 1,
                        frame,
                        last.frame
                    ));
                }
            }

            let buttons: Buttons = parts[1]
                .trim()
                .parse()
                .map_err(|e| format!("Line {}: {}", line_num + 1, e))?;

            let command = match parts.get(2).map(|c| c.trim()) {
                None | Some("") => None,
                Some(token) => Some(parse_command(token, line_num + 1)?),
            };

            script.entries.push(ScriptEntry {
                frame,
                buttons,
                command,
            });
        }

        Ok(script)
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frame of the last entry (0 for an empty script).
    pub fn max_frame(&self) -> u64 {
        self.entries.last().map_or(0, |entry| entry.frame)
    }
}

fn parse_command(token: &str, line_num: usize) -> Result<ScriptCommand, String> {
    if token == "reset" {
        return Ok(ScriptCommand::Reset);
    }
    if let Some(slot) = token.strip_prefix("save:") {
        let slot: u8 = slot
            .parse()
            .map_err(|_| format!("Line {}: invalid save slot \"{}\"", line_num, slot))?;
        return Ok(ScriptCommand::Save(slot));
    }
    if let Some(slot) = token.strip_prefix("load:") {
        let slot: u8 = slot
            .parse()
            .map_err(|_| format!("Line {}: invalid load slot \"{}\"", line_num, slot))?;
        return Ok(ScriptCommand::Load(slot));
    }
    if let Some(path) = token.strip_prefix("screenshot:") {
        if path.is_empty() {
            return Err(format!("Line {}: screenshot needs a path", line_num));
        }
        return Ok(ScriptCommand::Screenshot(PathBuf::from(path)));
    }
    Err(format!("Line {}: unknown command \"{}\"", line_num, token))
}

/// Plays a script back against the frame counter.
#[derive(Debug)]
pub struct InputManager {
    script: InputScript,
    next: usize,
}

impl InputManager {
    pub fn new(script: InputScript) -> Self {
        Self { script, next: 0 }
    }

    /// Consume every entry due at or before `frame` and return the last
    /// one. Runners call this once per frame, so normally at most one
    /// entry fires; if frames were skipped the latest entry wins.
    pub fn advance(&mut self, frame: u64) -> Option<&ScriptEntry> {
        let mut due = None;
        while let Some(entry) = self.script.entries.get(self.next) {
            if entry.frame > frame {
                break;
            }
            due = Some(self.next);
            self.next += 1;
        }
        due.map(|index| &self.script.entries[index])
    }

    /// True once every entry has been applied.
    pub fn is_complete(&self) -> bool {
        self.next >= self.script.len()
    }

    pub fn script(&self) -> &InputScript {
        &self.script
    }
}
