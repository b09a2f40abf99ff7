//! Headless runner.
//!
//! Loads a ROM, optionally plays an input script against it, and runs a
//! fixed number of frames either inline (with simple 60 Hz pacing) or on
//! the scheduler thread. Useful for regression runs, captures, and
//! profiling without any display attached.

use std::path::{Path, PathBuf};
use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::warn;

use argent::input::{InputManager, InputScript, ScriptCommand};
use argent::machine::{Machine, Snapshot};
use argent::rom;
use argent::scheduler::{Command, Scheduler, FRAME_DURATION};
use argent::screenshot;

/// Console-core runner
#[derive(Parser, Debug)]
#[command(name = "argent")]
#[command(about = "Run a ROM on the argent console core", long_about = None)]
struct Args {
    /// Path to the ROM image (raw binary or zip archive)
    rom: PathBuf,

    /// Number of frames to run
    #[arg(short, long, default_value = "600")]
    frames: u64,

    /// Input script to play back
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Write the final frame as a PNG
    #[arg(long)]
    screenshot: Option<PathBuf>,

    /// Write a JSON snapshot after the run
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Restore a JSON snapshot before the run
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Run as fast as possible instead of pacing to 60 Hz
    #[arg(long)]
    turbo: bool,

    /// Drive the machine from the scheduler thread
    #[arg(long)]
    threaded: bool,

    /// Dump CPU state after execution
    #[arg(short = 'c', long)]
    dump_cpu: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let rom_data = match rom::read_rom_file(&args.rom) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load ROM: {}", e);
            process::exit(1);
        }
    };

    let manager = match &args.script {
        Some(path) => match InputScript::load(path) {
            Ok(script) => Some(InputManager::new(script)),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        },
        None => None,
    };

    let mut machine = Machine::new();
    machine.load_rom(&rom_data);
    println!("Loaded {} ({} bytes)", args.rom.display(), rom_data.len());

    if let Some(path) = &args.load_state {
        let snapshot = match read_snapshot(path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        };
        if let Err(e) = machine.restore(&snapshot) {
            eprintln!("Failed to restore snapshot: {}", e);
            process::exit(1);
        }
        println!("Resumed at frame {}", machine.frame_count());
    }

    // A script longer than --frames extends the run to its last entry
    let total_frames = match manager.as_ref() {
        Some(m) => args.frames.max(m.script().max_frame() + 1),
        None => args.frames,
    };

    if args.threaded {
        run_threaded(machine, manager, total_frames, &args);
    } else {
        run_direct(machine, manager, total_frames, &args);
    }
}

fn run_direct(mut machine: Machine, mut manager: Option<InputManager>, total_frames: u64, args: &Args) {
    println!(
        "Running {} frames{}...",
        total_frames,
        if args.turbo { " (turbo)" } else { "" }
    );
    let mut times = FrameTimes::default();
    let started = Instant::now();

    while machine.frame_count() < total_frames {
        // Buttons latch before the frame runs; the entry's command fires
        // after it, so a screenshot at frame N captures frame N.
        let command = manager
            .as_mut()
            .and_then(|m| {
                m.advance(machine.frame_count()).map(|entry| {
                    machine.set_input(entry.buttons);
                    entry.command.clone()
                })
            })
            .flatten();

        let frame_start = Instant::now();
        machine.run_frame();
        times.record(frame_start.elapsed());

        if let Some(command) = command {
            run_command(&mut machine, command);
        }

        if !args.turbo {
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                thread::sleep(FRAME_DURATION - elapsed);
            }
        }
    }

    let elapsed = started.elapsed();
    println!(
        "Completed {} frames in {:.2}s ({:.1} fps)",
        machine.frame_count(),
        elapsed.as_secs_f64(),
        machine.frame_count() as f64 / elapsed.as_secs_f64()
    );
    times.report();

    if let Some(path) = &args.screenshot {
        match screenshot::save_png(machine.framebuffer(), path) {
            Ok(()) => println!("Wrote {}", path.display()),
            Err(e) => {
                eprintln!("Screenshot failed: {}", e);
                process::exit(1);
            }
        }
    }

    if let Some(path) = &args.save_state {
        match write_snapshot(path, &machine.snapshot()) {
            Ok(()) => println!("State saved to {}", path.display()),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    if args.dump_cpu {
        dump_cpu_state(&machine);
    }
}

fn run_threaded(machine: Machine, mut manager: Option<InputManager>, total_frames: u64, args: &Args) {
    let scheduler = match Scheduler::spawn(machine) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("Failed to start scheduler: {}", e);
            process::exit(1);
        }
    };
    let latch = scheduler.input_latch();
    println!("Running {} frames on the scheduler thread...", total_frames);

    loop {
        let (_, frame_count) = scheduler.latest_frame();
        if frame_count >= total_frames {
            break;
        }

        if let Some(m) = manager.as_mut() {
            if let Some(entry) = m.advance(frame_count) {
                latch.set_state(entry.buttons);
                match entry.command.clone() {
                    Some(ScriptCommand::Reset) => scheduler.send(Command::Reset),
                    Some(ScriptCommand::Save(slot)) => scheduler.send(Command::SaveState(slot)),
                    Some(ScriptCommand::Load(slot)) => scheduler.send(Command::LoadState(slot)),
                    Some(ScriptCommand::Screenshot(path)) => {
                        let (pixels, _) = scheduler.latest_frame();
                        if let Err(e) = screenshot::save_png(&pixels, &path) {
                            warn!("script screenshot failed: {}", e);
                        }
                    }
                    None => {}
                }
            }
        }

        thread::sleep(Duration::from_millis(2));
    }

    let stats = scheduler.stats();
    println!(
        "Completed {} frames ({} missed their deadline)",
        stats.frames, stats.late_frames
    );

    if let Some(path) = &args.screenshot {
        let (pixels, _) = scheduler.latest_frame();
        match screenshot::save_png(&pixels, path) {
            Ok(()) => println!("Wrote {}", path.display()),
            Err(e) => {
                eprintln!("Screenshot failed: {}", e);
                process::exit(1);
            }
        }
    }

    // The scheduler owns the machine, so end-of-run state extraction
    // only exists in the direct runner.
    if args.save_state.is_some() || args.dump_cpu {
        eprintln!("--save-state and --dump-cpu require the direct runner; ignored with --threaded");
    }
}

fn run_command(machine: &mut Machine, command: ScriptCommand) {
    match command {
        ScriptCommand::Reset => machine.reset(),
        ScriptCommand::Save(slot) => {
            if let Err(e) = machine.save_state(slot) {
                warn!("script save failed: {}", e);
            }
        }
        ScriptCommand::Load(slot) => {
            if let Err(e) = machine.load_state(slot) {
                warn!("script load failed: {}", e);
            }
        }
        ScriptCommand::Screenshot(path) => {
            match screenshot::save_png(machine.framebuffer(), &path) {
                Ok(()) => println!("Wrote {}", path.display()),
                Err(e) => warn!("script screenshot failed: {}", e),
            }
        }
    }
}

fn read_snapshot(path: &Path) -> Result<Snapshot, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read snapshot: {}", e))?;
    serde_json::from_str(&json).map_err(|e| format!("Snapshot is not valid JSON: {}", e))
}

fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), String> {
    let json = serde_json::to_string_pretty(snapshot)
        .map_err(|e| format!("Failed to encode snapshot: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write snapshot: {}", e))
}

fn dump_cpu_state(machine: &Machine) {
    let cpu = &machine.cpu;
    println!("\nCPU state:");
    println!("  A:  ${:02X}", cpu.a);
    println!("  X:  ${:02X}", cpu.x);
    println!("  Y:  ${:02X}", cpu.y);
    println!("  PC: ${:04X}", cpu.pc);
    println!("  SP: ${:04X}", cpu.sp);
    println!("  P:  {:08b}", cpu.p);
    println!("  Cycles: {}", cpu.cycles);
    println!("  Halted: {}", cpu.halted);
}

#[derive(Default)]
struct FrameTimes {
    min: Option<Duration>,
    max: Duration,
    total: Duration,
    count: u32,
}

impl FrameTimes {
    fn record(&mut self, elapsed: Duration) {
        self.min = Some(self.min.map_or(elapsed, |m| m.min(elapsed)));
        self.max = self.max.max(elapsed);
        self.total += elapsed;
        self.count += 1;
    }

    fn report(&self) {
        if self.count == 0 {
            return;
        }
        println!(
            "Frame time: avg {:.3} ms, min {:.3} ms, max {:.3} ms",
            self.total.as_secs_f64() * 1000.0 / f64::from(self.count),
            self.min.unwrap_or_default().as_secs_f64() * 1000.0,
            self.max.as_secs_f64() * 1000.0
        );
    }
}
