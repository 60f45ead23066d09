//! Entry point and showcase loop.

mod cli;
mod config;
mod domain;
mod error;
mod logging;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::KeyCode;

use cli::Cli;
use config::{ConfigSource, ShowcaseConfig};
use domain::pick::Picker;
use domain::Millis;
use error::{ExitCode, ShowcaseError};
use logging::{init_logging, LogTarget};
use sim::event::Stamped;
use sim::showcase::Showcase;
use sim::switcher::Scene;
use ui::input::InputState;
use ui::renderer::Renderer;

fn main() {
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<(), ShowcaseError> {
    let (mut cfg, source) = match &cli.config {
        Some(path) => (ShowcaseConfig::load_from(path)?, ConfigSource::File(path.clone())),
        None => ShowcaseConfig::discover(),
    };
    if cli.no_animate {
        cfg.display.animate = false;
    }
    if let Some(path) = &cli.log_file {
        cfg.log_file = path.clone();
    }

    let target = if cli.headless { LogTarget::Stderr } else { LogTarget::File(cfg.log_file.clone()) };
    init_logging(&target, cli.verbose);
    source.log();

    let seed = cli.seed.or(cfg.seed);
    let picker = match seed {
        Some(seed) => Picker::seeded(seed),
        None => Picker::from_entropy(),
    };
    tracing::info!(?seed, animate = cfg.display.animate, headless = cli.headless, "starting");

    let mut showcase = Showcase::new(&cfg, picker);
    if cli.headless {
        run_headless(&mut showcase, cli.duration_ms);
        return Ok(());
    }

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e.into());
    }

    let frame = Duration::from_millis(cfg.timing.frame_ms);
    let result = showcase_loop(&mut showcase, &mut renderer, frame);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!("Thanks for watching.");
    Ok(())
}

/// Advance virtual time in one go and print what happened.
fn run_headless(showcase: &mut Showcase, duration: Millis) {
    for stamped in showcase.advance_to(duration) {
        println!("{stamped}");
    }
    let without = showcase.without();
    let with = showcase.with();
    println!(
        "-- {} at {} ms: threats={} problem={} step={} solutions={}",
        showcase.scene().label(),
        showcase.now(),
        without.threats(),
        without.problem_index(),
        with.current_step(),
        with.solutions_visible(),
    );
}

fn showcase_loop(showcase: &mut Showcase, renderer: &mut Renderer, frame: Duration) -> Result<(), ShowcaseError> {
    let mut kb = InputState::new();
    let start = Instant::now();

    loop {
        kb.drain_events()?;
        if kb.resized {
            renderer.invalidate();
        }

        let elapsed = Millis::try_from(start.elapsed().as_millis()).unwrap_or(Millis::MAX);
        log_events(&showcase.advance_to(elapsed));

        if kb.ctrl_c_pressed() || handle_meta(showcase, &kb) {
            break;
        }

        renderer.render(showcase)?;
        std::thread::sleep(frame);
    }

    Ok(())
}

fn log_events(events: &[Stamped]) {
    for stamped in events {
        tracing::debug!(at = stamped.at, "{}", stamped.event);
    }
}

// ── Key Constants ──

const KEYS_TOGGLE: &[KeyCode] = &[KeyCode::Tab, KeyCode::Char(' ')];
const KEYS_WITHOUT: &[KeyCode] = &[KeyCode::Char('1'), KeyCode::Left];
const KEYS_WITH: &[KeyCode] = &[KeyCode::Char('2'), KeyCode::Right];
const KEYS_ANIMATE: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

/// Returns true when the user asked to quit.
fn handle_meta(showcase: &mut Showcase, kb: &InputState) -> bool {
    if kb.any_pressed(KEYS_QUIT) {
        return true;
    }

    if kb.any_pressed(KEYS_TOGGLE) {
        log_events(&showcase.toggle());
    } else if kb.any_pressed(KEYS_WITHOUT) {
        log_events(&showcase.request(Scene::Without));
    } else if kb.any_pressed(KEYS_WITH) {
        log_events(&showcase.request(Scene::With));
    }

    if kb.any_pressed(KEYS_ANIMATE) {
        let animate = !showcase.is_animating();
        showcase.set_animate(animate);
        tracing::info!(animate, "animation toggled");
    }

    false
}
