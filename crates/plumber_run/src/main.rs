//! Headless host: drives the engine from a replay and logs what happens.

use std::path::PathBuf;
use std::time::Duration;

use plumber_core::input::{Button, InputFrame};
use plumber_core::time::TimeState;
use plumber_sim::replay::{load_replay_from_path, ReplayFrame, ReplaySequence};
use plumber_sim::{load_config_from_path, load_level_from_path, Engine, EngineConfig, GameState, LevelData, LoadError};

#[derive(Debug, Default)]
struct Options {
    level: Option<PathBuf>,
    config: Option<PathBuf>,
    replay: Option<PathBuf>,
    realtime: bool,
    snapshot: bool,
}

fn usage() -> String {
    "Usage: plumber_run [--level <level.json>] [--config <config.json>] [--replay <replay.json>] [--realtime] [--snapshot]\n\
     Without --level the built-in 1-1 stage is used; without --replay a short scripted run is played."
        .to_string()
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut path_for = |flag: &str| {
            iter.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("{flag} needs a path\n{}", usage()))
        };
        match arg.as_str() {
            "--level" => options.level = Some(path_for("--level")?),
            "--config" => options.config = Some(path_for("--config")?),
            "--replay" => options.replay = Some(path_for("--replay")?),
            "--realtime" => options.realtime = true,
            "--snapshot" => options.snapshot = true,
            "-h" | "--help" => return Err(usage()),
            other => return Err(format!("Unknown argument '{other}'\n{}", usage())),
        }
    }
    Ok(options)
}

/// Press start, then run right hopping every so often.
fn scripted_run() -> ReplaySequence {
    let run = InputFrame::default().with(Button::Right).with(Button::Run);
    let mut frames = vec![
        ReplayFrame::new(InputFrame::default().with(Button::Start), 1),
        ReplayFrame::new(InputFrame::default(), 30),
    ];
    for _ in 0..40 {
        frames.push(ReplayFrame::new(run, 25));
        frames.push(ReplayFrame::new(run.with(Button::Jump), 20));
    }
    ReplaySequence { frames }
}

fn build_engine(options: &Options) -> Result<(Engine, ReplaySequence), LoadError> {
    let level = match &options.level {
        Some(path) => load_level_from_path(path)?,
        None => LevelData::demo(),
    };
    let config = match &options.config {
        Some(path) => load_config_from_path(path)?,
        None => EngineConfig::default(),
    };
    let replay = match &options.replay {
        Some(path) => load_replay_from_path(path)?,
        None => scripted_run(),
    };
    Ok((Engine::new(level, config)?, replay))
}

/// Tick once and report cues and state changes.
fn step(engine: &mut Engine, input: &InputFrame, last_state: &mut GameState) {
    engine.tick(input);
    for cue in engine.drain_cues() {
        log::info!("[{:>6}] cue {:?}", engine.frame(), cue);
    }
    if engine.state() != *last_state {
        log::info!(
            "[{:>6}] {:?} -> {:?} (score {}, lives {})",
            engine.frame(),
            last_state,
            engine.state(),
            engine.session().score,
            engine.session().lives
        );
        *last_state = engine.state();
    }
}

fn run(options: &Options) -> Result<(), LoadError> {
    let (mut engine, replay) = build_engine(options)?;
    let inputs = replay.expanded_inputs();
    let mut last_state = engine.state();
    log::info!("Playing {} ticks{}", inputs.len(), if options.realtime { " in real time" } else { "" });

    if options.realtime {
        let mut time = TimeState::new();
        let mut next = inputs.iter();
        'frames: loop {
            time.begin_frame();
            while time.should_step() {
                let Some(input) = next.next() else {
                    break 'frames;
                };
                step(&mut engine, input, &mut last_state);
            }
            time.end_frame();
            std::thread::sleep(Duration::from_millis(1));
        }
        log::info!("Real-time run averaged {:.1} fps", time.smoothed_fps);
    } else {
        for input in &inputs {
            step(&mut engine, input, &mut last_state);
        }
    }

    let session = engine.session();
    log::info!(
        "Finished after {} ticks: {:?}, world {}, score {}, coins {}, lives {}, time {}",
        engine.frame(),
        engine.state(),
        session.world,
        session.score,
        session.coins,
        session.lives,
        session.time_left
    );

    if options.snapshot {
        match serde_json::to_string_pretty(&engine.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("Failed to serialize snapshot: {err}"),
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    if let Err(err) = run(&options) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_every_flag() {
        let options = parse_args(&args(&[
            "--level",
            "a.json",
            "--config",
            "b.json",
            "--replay",
            "c.json",
            "--realtime",
            "--snapshot",
        ]))
        .expect("valid args");
        assert_eq!(options.level, Some(PathBuf::from("a.json")));
        assert_eq!(options.config, Some(PathBuf::from("b.json")));
        assert_eq!(options.replay, Some(PathBuf::from("c.json")));
        assert!(options.realtime && options.snapshot);
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse_args(&args(&["--fast"])).is_err());
        assert!(parse_args(&args(&["--level"])).is_err());
    }

    #[test]
    fn scripted_run_starts_the_game() {
        let (mut engine, replay) = build_engine(&Options::default()).expect("built-in data is valid");
        let mut last_state = engine.state();
        for input in replay.expanded_inputs().iter().take(5) {
            step(&mut engine, input, &mut last_state);
        }
        assert_eq!(last_state, GameState::Playing);
    }
}
