use std::path::PathBuf;
use std::time::Duration;

use cgmath::Point2;
use cubemath::Viewport;
use cubeprefs::Preferences;
use cubepuzzle::{
    Camera, Color, Cube, Face, Net, PerfStats, PerfSummary, RotationCommand, SelectionPicker,
};
use eyre::{Context, Result, bail};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use web_time::Instant;

/// Headless twisty cube simulator
#[derive(Debug, clap::Parser)]
#[command(version)]
pub(crate) struct Args {
    /// Preferences file to layer over the defaults.
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub(crate) enum Subcommand {
    /// Scramble a puzzle and play the turns until it comes to rest.
    Run {
        /// Puzzle size, overriding the preferences.
        #[arg(short = 'n', long)]
        size: Option<usize>,
        /// Number of random turns.
        #[arg(short, long, default_value_t = 20)]
        scramble: usize,
        /// Seed for the scramble.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Undo the scramble afterward.
        #[arg(short, long)]
        undo: bool,
        /// Simulated frame time in milliseconds.
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
        frame_ms: u64,
        /// Give up after this many frames.
        #[arg(long, default_value_t = 1_000_000)]
        max_ticks: usize,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Report the face under a pixel, seen from the default camera.
    Pick {
        /// Horizontal pixel coordinate, from the left.
        x: f32,
        /// Vertical pixel coordinate, from the top.
        y: f32,
        /// Puzzle size, overriding the preferences.
        #[arg(short = 'n', long)]
        size: Option<usize>,
        /// Viewport width in pixels.
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        /// Viewport height in pixels.
        #[arg(long, default_value_t = 600.0)]
        height: f32,
        /// Distance from the camera to the center of the puzzle.
        #[arg(long, default_value_t = 30.0)]
        distance: f32,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective preferences as YAML.
    Prefs {
        /// Also write them to this file.
        #[arg(long)]
        save: Option<PathBuf>,
    },
}

#[derive(Serialize, Debug)]
struct RunReport {
    size: usize,
    scramble: Vec<String>,
    ticks: usize,
    rotations_finished: usize,
    solved: bool,
    net: Net,
    perf: PerfSummary,
}

#[derive(Serialize, Debug)]
struct PickReport {
    cursor: [f32; 2],
    hit: Option<PickHit>,
}

#[derive(Serialize, Debug)]
struct PickHit {
    cubelet: usize,
    grid_position: [i32; 3],
    face: Face,
    color: Option<Color>,
    winding: String,
}

pub(crate) fn exec(args: Args) -> Result<()> {
    let prefs = Preferences::load(args.prefs.as_deref());

    match args.subcommand {
        Subcommand::Run {
            size,
            scramble,
            seed,
            undo,
            frame_ms,
            max_ticks,
            json,
        } => {
            let mut cube = build_cube(&prefs, size)?;
            let mut perf = PerfStats::new(prefs.perf.moving_average_window);

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let scramble = cube.scramble(&mut rng, scramble);
            if undo {
                for command in scramble.iter().rev() {
                    cube.enqueue_command(command.rev());
                }
            }

            let frame = Duration::from_millis(frame_ms);
            let start = Instant::now();
            let mut ticks = 0;
            let mut rotations_finished = 0;
            while !cube.is_idle() {
                if ticks >= max_ticks {
                    bail!("puzzle did not come to rest after {ticks} frames");
                }
                let outcome = {
                    let _timer = perf.time("tick");
                    cube.tick(frame)
                };
                ticks += 1;
                if outcome.dispatched.is_some() {
                    perf.count("commands");
                }
                if outcome.rotation_finished {
                    rotations_finished += 1;
                }
            }
            log::info!("simulated {ticks} frames in {:?}", start.elapsed());

            let report = RunReport {
                size: cube.size(),
                scramble: scramble.iter().map(RotationCommand::to_string).collect(),
                ticks,
                rotations_finished,
                solved: cube.is_solved(),
                net: cube.net(),
                perf: perf.summary(),
            };
            match json {
                true => write_json_output(&report),
                false => {
                    print_run_report(&report);
                    Ok(())
                }
            }
        }

        Subcommand::Pick {
            x,
            y,
            size,
            width,
            height,
            distance,
            json,
        } => {
            let cube = build_cube(&prefs, size)?;
            let camera = Camera::orbiting(
                cube.world_center(),
                distance,
                Viewport::with_size(width, height),
            );
            let mut picker = SelectionPicker::new(&prefs.interaction);
            let mut perf = PerfStats::new(prefs.perf.moving_average_window);

            let hit = picker
                .pick(Point2::new(x, y), &cube, &camera, &mut perf)
                .and_then(|selection| {
                    let cubelet = cube.cubelets().get(selection.cubelet)?;
                    Some(PickHit {
                        cubelet: selection.cubelet,
                        grid_position: cubelet.grid_position().into(),
                        face: selection.face,
                        color: cubelet
                            .stickers()
                            .iter()
                            .find(|s| s.face == selection.face)
                            .map(|s| s.color),
                        winding: selection.winding.to_string(),
                    })
                });
            let report = PickReport { cursor: [x, y], hit };

            match json {
                true => write_json_output(&report),
                false => {
                    match &report.hit {
                        Some(hit) => {
                            let [gx, gy, gz] = hit.grid_position;
                            let color = hit.color.map_or("none".to_string(), |c| c.to_string());
                            println!(
                                "cubelet {} at ({gx}, {gy}, {gz}), {} face ({color}), {}",
                                hit.cubelet, hit.face, hit.winding,
                            );
                        }
                        None => println!("nothing at ({x}, {y})"),
                    }
                    Ok(())
                }
            }
        }

        Subcommand::Prefs { save } => {
            let yaml = serde_norway::to_string(&prefs).context("error serializing preferences")?;
            print!("{yaml}");
            if let Some(path) = save {
                prefs
                    .save(&path)
                    .wrap_err_with(|| format!("error saving preferences to {}", path.display()))?;
            }
            Ok(())
        }
    }
}

fn build_cube(prefs: &Preferences, size: Option<usize>) -> Result<Cube> {
    let mut puzzle = prefs.puzzle.clone();
    if let Some(n) = size {
        puzzle.size = n;
    }
    Cube::new(&puzzle, &prefs.animation).context("error building puzzle")
}

fn print_run_report(report: &RunReport) {
    let n = report.size;
    println!("{n}x{n}x{n} scrambled with {} turns", report.scramble.len());
    if !report.scramble.is_empty() {
        println!("  {}", report.scramble.join(" "));
    }
    println!();
    println!("{}", report.net);
    println!("Solved: {}", if report.solved { "yes" } else { "no" });
    println!("Frames: {}", report.ticks);
    println!("Rotations finished: {}", report.rotations_finished);
    for timer in &report.perf.timers {
        if let Some(avg) = timer.average_us {
            println!("{}: {avg} µs average over {} samples", timer.name, timer.samples);
        }
    }
    for (name, count) in &report.perf.counters {
        println!("{name}: {count}");
    }
}

fn write_json_output<T: Serialize>(value: &T) -> Result<()> {
    serde_json::to_writer_pretty(std::io::stdout(), value)
        .context("error serializing data and writing to stdout")?;
    println!();
    Ok(())
}
