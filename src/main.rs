//! Pac-Man engine demo runner
//!
//! Plays a headless game with the autopilot at a fixed frame rate and prints
//! the final board. Browser hosts use the library directly.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use pacman_engine::persistence::JsonFileStore;
    use pacman_engine::sim::GamePhase;
    use pacman_engine::{Engine, Result, Tuning, autopilot, platform};

    /// Command line arguments for the demo runner.
    #[derive(Parser, Debug)]
    #[command(name = "pacman-engine")]
    #[command(about = "Run a headless Pac-Man game driven by the autopilot")]
    #[command(version)]
    struct Args {
        /// Simulated seconds to play
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,

        /// Frame interval in milliseconds (16.67 is 60 Hz)
        #[arg(long, default_value_t = 16.67)]
        frame_ms: f64,

        /// Seed for frightened-ghost movement
        #[arg(short, long)]
        seed: Option<u64>,

        /// Tuning JSON file
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Leaderboard JSON file
        #[arg(long)]
        scores: Option<PathBuf>,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        platform::init_logging();
        log::info!("Pac-Man engine (native) starting...");

        let mut tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        if let Some(seed) = args.seed {
            tuning.seed = seed;
        }

        let mut engine = match &args.scores {
            Some(path) => Engine::with_store(tuning, Box::new(JsonFileStore::new(path))),
            None => Engine::new(tuning, 0),
        };

        let frame_ms = args.frame_ms.max(1.0);
        let end_ms = args.seconds.max(0.0) * 1000.0;
        let mut now = 0.0;

        engine.start();
        while now < end_ms {
            match engine.phase() {
                GamePhase::LevelComplete => {
                    engine.advance_level();
                    engine.start();
                }
                GamePhase::GameOver => break,
                _ => {}
            }

            if let Some(direction) = autopilot::next_direction(engine.state()) {
                engine.request_direction(direction);
            }
            if let Some(hud) = engine.frame(now) {
                log::debug!(
                    "score={} lives={} level={} phase={:?} fps={}",
                    hud.score,
                    hud.lives,
                    hud.level,
                    hud.phase,
                    hud.fps
                );
            }
            now += frame_ms;
        }

        let snapshot = engine.snapshot();
        print!("{}", snapshot.render_ascii());
        println!(
            "{:?} after {:.1}s: score {} | lives {} | level {} | dots left {}",
            snapshot.hud.phase,
            engine.state().time_ms / 1000.0,
            snapshot.hud.score,
            snapshot.hud.lives,
            snapshot.hud.level,
            snapshot.hud.dots_remaining
        );
        if let Some(score) = engine.take_new_high_score() {
            println!("New high score: {score}");
        }
        for (rank, entry) in engine.high_scores().entries.iter().enumerate() {
            println!("{:>2}. {:>7}  level {}", rank + 1, entry.score, entry.level);
        }

        engine.destroy();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> pacman_engine::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive `pacman_engine::Engine` from their own frame loop
}
