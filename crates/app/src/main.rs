mod presets;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use esp_eyes_core::{Component, EyesComponent, EyesConfig, FrameBuffer};
use tracing_subscriber::EnvFilter;

fn main() -> esp_eyes_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            source,
            ticks,
            seed,
            every,
        } => run_preview(&source, ticks, seed, every),
        Commands::Check { source } => run_check(&source),
        Commands::Presets => {
            for (name, _) in presets::PRESETS {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run_preview(
    source: &ConfigSource,
    ticks: u64,
    seed: Option<u64>,
    every: u64,
) -> esp_eyes_core::Result<()> {
    let config = source.load()?;
    tracing::info!(ticks, ?seed, "starting preview");

    let mut display = FrameBuffer::new(config.screen_width, config.screen_height);
    let mut eyes = match seed {
        Some(seed) => EyesComponent::seeded(seed),
        None => EyesComponent::new(),
    };
    let interval = u64::from(config.update_interval);
    eyes.initialize(config, &display, 0)?;

    let every = every.max(1);
    for step in 1..=ticks {
        let now = step * interval;
        let report = eyes.tick(now, &mut display)?;
        if let Some(err) = &report.render_error {
            eprintln!("tick {step}: {err}");
        }
        if step % every != 0 && report.events.is_empty() {
            continue;
        }

        if let Some(face) = eyes.face() {
            let mut header = format!(
                "tick {step} @ {now}ms  emotion={}  openness={:.2}  gaze=({:+.2}, {:+.2})",
                face.emotion, face.left.openness, face.left.gaze.x, face.left.gaze.y
            );
            if report.events.blink_started {
                header.push_str("  [blink]");
            }
            if let Some(target) = report.events.gaze_target {
                header.push_str(&format!("  [look {:+.2}, {:+.2}]", target.x, target.y));
            }
            if let Some(emotion) = report.events.emotion_selected {
                header.push_str(&format!("  [emotion {emotion}]"));
            }
            println!("{header}");
        }
        print!("{}", display.to_ascii('#', '.'));
        println!();
    }

    eyes.teardown();
    Ok(())
}

fn run_check(source: &ConfigSource) -> esp_eyes_core::Result<()> {
    let config = source.load()?;
    config.validate()?;
    let layout = config.layout()?;
    let weights = config.emotion_weights()?;

    println!(
        "display `{}` {}x{}, update every {}ms",
        config.display_id.as_deref().unwrap_or_default(),
        config.screen_width,
        config.screen_height,
        config.update_interval
    );
    println!(
        "left eye  {:>3},{:<3} {}x{}",
        layout.left.x, layout.left.y, layout.left.width, layout.left.height
    );
    println!(
        "right eye {:>3},{:<3} {}x{}",
        layout.right.x, layout.right.y, layout.right.width, layout.right.height
    );

    let total = weights.total();
    if total > 0.0 {
        for (emotion, weight) in weights.reachable() {
            println!("  {emotion:<12} {weight:>5.2}  ({:.0}%)", weight / total * 100.0);
        }
    } else {
        println!("  no weighted emotions; random behavior keeps the current emotion");
    }
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Animated eyes for small displays", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate the component and print frames as text.
    Preview {
        #[command(flatten)]
        source: ConfigSource,
        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 100)]
        ticks: u64,
        /// Seed for reproducible behavior.
        #[arg(short, long)]
        seed: Option<u64>,
        /// Print every N-th frame, plus every frame where something happened.
        #[arg(short, long, default_value_t = 20)]
        every: u64,
    },
    /// Validate a configuration and show the resulting layout.
    Check {
        #[command(flatten)]
        source: ConfigSource,
    },
    /// List the bundled presets.
    Presets,
}

#[derive(Args, Debug)]
struct ConfigSource {
    /// JSON configuration file.
    #[arg(short, long, conflicts_with = "preset")]
    config: Option<PathBuf>,
    /// Bundled preset name (defaults to `basic`).
    #[arg(short, long)]
    preset: Option<String>,
}

impl ConfigSource {
    fn load(&self) -> esp_eyes_core::Result<EyesConfig> {
        match (&self.config, &self.preset) {
            (Some(path), _) => {
                tracing::info!(?path, "loading configuration");
                EyesConfig::from_path(path)
            }
            (None, preset) => presets::load(preset.as_deref().unwrap_or("basic")),
        }
    }
}
