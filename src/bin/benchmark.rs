//! Headless solver benchmark: builds a seeded scene and steps it with a
//! fixed dt, no window and no sim thread.
//!
//! Usage: `benchmark [standard|planetarium] [TICKS] [SEED]`
//!
//! With `--features profile` a JSON report is also written to
//! `benchmark-<mode>.json`.

use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::prelude::*;

use newton_sandbox::config::{FRAME_HZ, WINDOW_SIZE};
use newton_sandbox::physics::{Bounds, Mode, Scene};

const DEFAULT_TICKS: u64 = 20_000;
const DEFAULT_SEED: u64 = 42;
const DT: f64 = 1.0 / FRAME_HZ;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Standard,
    Planetarium,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Standard => Mode::Standard,
            ModeArg::Planetarium => Mode::Planetarium,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(value_enum, default_value_t = ModeArg::Standard)]
    mode: ModeArg,
    #[arg(default_value_t = DEFAULT_TICKS)]
    ticks: u64,
    #[arg(default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let mode = Mode::from(args.mode);

    let bounds = Bounds::centered(WINDOW_SIZE.0 as f64, WINDOW_SIZE.1 as f64);
    let mut scene = Scene::new(mode, bounds);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let bodies = match scene.rebuild(mode, &mut rng) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("scene setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "mode={} bodies={} ticks={} seed={} dt={:.5}",
        mode, bodies, args.ticks, args.seed, DT
    );

    let start = Instant::now();
    let mut slowest = 0.0_f64;
    for _ in 0..args.ticks {
        let t = Instant::now();
        scene.advance_one_tick(DT);
        slowest = slowest.max(t.elapsed().as_secs_f64());
    }
    let elapsed = start.elapsed().as_secs_f64();

    let per_tick_us = elapsed / args.ticks.max(1) as f64 * 1e6;
    let ticks_per_sec = args.ticks as f64 / elapsed.max(f64::EPSILON);
    println!("elapsed: {elapsed:.3}s");
    println!("per tick: {per_tick_us:.2}us (slowest {:.2}us)", slowest * 1e6);
    println!("ticks/s: {ticks_per_sec:.0}");

    #[cfg(feature = "profile")]
    {
        let report = report::Report {
            mode: mode.to_string(),
            bodies,
            ticks: args.ticks,
            seed: args.seed,
            elapsed_s: elapsed,
            per_tick_us,
            slowest_tick_us: slowest * 1e6,
            ticks_per_sec,
        };
        if let Err(e) = report.write() {
            eprintln!("failed to write report: {e}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}

#[cfg(feature = "profile")]
mod report {
    use std::fs::File;
    use std::io::{self, BufWriter};

    use serde::Serialize;

    #[derive(Serialize)]
    pub struct Report {
        pub mode: String,
        pub bodies: usize,
        pub ticks: u64,
        pub seed: u64,
        pub elapsed_s: f64,
        pub per_tick_us: f64,
        pub slowest_tick_us: f64,
        pub ticks_per_sec: f64,
    }

    impl Report {
        pub fn write(&self) -> io::Result<()> {
            let path = format!("benchmark-{}.json", self.mode.to_lowercase());
            let out = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(out, self).map_err(io::Error::other)?;
            println!("report: {path}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_a_standard_run() {
        let args = Args::try_parse_from(["benchmark"]).unwrap();
        assert_eq!(Mode::from(args.mode), Mode::Standard);
        assert_eq!(args.ticks, DEFAULT_TICKS);
        assert_eq!(args.seed, DEFAULT_SEED);
    }

    #[test]
    fn positional_mode_ticks_and_seed() {
        let args = Args::try_parse_from(["benchmark", "planetarium", "500", "7"]).unwrap();
        assert_eq!(Mode::from(args.mode), Mode::Planetarium);
        assert_eq!(args.ticks, 500);
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["benchmark", "orbital"]).is_err());
    }
}
