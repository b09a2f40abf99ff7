//! Frame-rate scheduler.
//!
//! Owns a [`Machine`] on a dedicated thread and drives it at the nominal
//! 60 Hz against the host clock. Control messages arrive over a channel
//! and are drained at the top of every frame; pad input bypasses the
//! channel entirely through the atomic input latch. The latest rendered
//! frame is published into a mutex-guarded slot for the caller to copy
//! out at its own pace.
//!
//! Pacing is deadline-based: each frame is due one period after the
//! previous one, so small overruns are absorbed by running the next few
//! frames without sleeping. A stall longer than [`MAX_LAG`] abandons the
//! backlog and re-anchors the deadline instead of fast-forwarding.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};

use crate::io::InputLatch;
use crate::machine::{Machine, FRAME_RATE};

/// Wall-clock period of one frame.
pub const FRAME_DURATION: Duration = Duration::from_nanos(1_000_000_000 / FRAME_RATE as u64);

/// Backlog beyond this is dropped rather than replayed.
pub const MAX_LAG: Duration = Duration::from_millis(250);

/// Control messages for the emulation thread.
#[derive(Debug)]
pub enum Command {
    LoadRom(Vec<u8>),
    Reset,
    SaveState(u8),
    LoadState(u8),
    SetPaused(bool),
    Shutdown,
}

/// Pacing counters, copied out under the shared lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaceStats {
    /// Frames rendered since spawn.
    pub frames: u64,
    /// Frames that missed their deadline.
    pub late_frames: u64,
    /// Frames completed during the last whole second (0 until one second
    /// has passed).
    pub fps: u32,
}

#[derive(Debug, Default)]
struct Shared {
    pixels: Vec<u8>,
    frame_count: u64,
    stats: PaceStats,
}

/// Handle to the emulation thread. Dropping it shuts the thread down and
/// joins it.
pub struct Scheduler {
    commands: Sender<Command>,
    shared: Arc<Mutex<Shared>>,
    input: Arc<InputLatch>,
    handle: Option<JoinHandle<()>>,
}

impl Scheduler {
    /// Move `machine` onto its own thread and start the frame loop.
    pub fn spawn(machine: Machine) -> std::io::Result<Scheduler> {
        let (commands, receiver) = crossbeam_channel::unbounded();
        let shared = Arc::new(Mutex::new(Shared::default()));
        let input = machine.input_latch();

        let loop_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("frame-loop".into())
            .spawn(move || run_loop(machine, receiver, loop_shared))?;

        info!("scheduler started at {} Hz", FRAME_RATE);
        Ok(Scheduler {
            commands,
            shared,
            input,
            handle: Some(handle),
        })
    }

    /// Queue a control message. Lost sends (thread already gone) are
    /// ignored; the join in `Drop` surfaces the thread's fate.
    pub fn send(&self, command: Command) {
        let _ = self.commands.send(command);
    }

    /// Shared handle to the pad latch. Stores become visible to the
    /// emulation thread at its next register read.
    pub fn input_latch(&self) -> Arc<InputLatch> {
        Arc::clone(&self.input)
    }

    /// Copy of the most recent frame and its index. Empty until the
    /// machine produces its first frame.
    pub fn latest_frame(&self) -> (Vec<u8>, u64) {
        // Lock poisoning means the emulation thread panicked; nothing to
        // salvage at that point.
        let shared = self.shared.lock().unwrap();
        (shared.pixels.clone(), shared.frame_count)
    }

    pub fn stats(&self) -> PaceStats {
        self.shared.lock().unwrap().stats
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_loop(mut machine: Machine, commands: Receiver<Command>, shared: Arc<Mutex<Shared>>) {
    let mut next_deadline = Instant::now() + FRAME_DURATION;
    let mut paused = false;
    let mut second_started = Instant::now();
    let mut frames_this_second = 0u32;

    loop {
        // Drain every pending command before stepping the frame
        loop {
            match commands.try_recv() {
                Ok(Command::Shutdown) | Err(TryRecvError::Disconnected) => {
                    info!("scheduler shutting down");
                    return;
                }
                Ok(Command::LoadRom(data)) => machine.load_rom(&data),
                Ok(Command::Reset) => machine.reset(),
                Ok(Command::SaveState(slot)) => {
                    if let Err(err) = machine.save_state(slot) {
                        warn!("save state failed: {}", err);
                    }
                }
                Ok(Command::LoadState(slot)) => {
                    if let Err(err) = machine.load_state(slot) {
                        warn!("load state failed: {}", err);
                    }
                }
                Ok(Command::SetPaused(value)) => {
                    paused = value;
                    info!("emulation {}", if paused { "paused" } else { "resumed" });
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        // A paused loop keeps ticking the deadline so commands stay
        // responsive and no backlog forms while frozen.
        if !paused && machine.run_frame().is_some() {
            let mut shared = shared.lock().unwrap();
            shared.pixels.clear();
            shared.pixels.extend_from_slice(machine.framebuffer());
            shared.frame_count = machine.frame_count();
            shared.stats.frames += 1;
            frames_this_second += 1;
        }

        if second_started.elapsed() >= Duration::from_secs(1) {
            debug!("{} fps", frames_this_second);
            shared.lock().unwrap().stats.fps = frames_this_second;
            frames_this_second = 0;
            second_started = Instant::now();
        }

        let now = Instant::now();
        let wait = next_deadline.saturating_duration_since(now);
        if wait > Duration::ZERO {
            thread::sleep(wait);
        } else {
            let behind = now.duration_since(next_deadline);
            shared.lock().unwrap().stats.late_frames += 1;
            if behind > MAX_LAG {
                debug!("frame loop {} ms behind, resyncing", behind.as_millis());
                next_deadline = now;
            }
        }
        next_deadline += FRAME_DURATION;
    }
}
