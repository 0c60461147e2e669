//! Endspace CLI - run the loading cover against a terminal.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use endspace_core::{BootReport, OverlayConfig, OverlayFrame, ResourceEntry, ResourceKind, ResourceSnapshot};
use endspace_cover::{loading_flag, LoadingCover, OverlayHost, ResourceFeed, StaticDocument};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "endspace")]
#[command(about = "Boot-sequence loading cover simulator", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a page load behind the cover
    Simulate {
        /// Image elements present at mount
        #[arg(long, default_value = "8")]
        images: u32,
        /// Images already complete at mount
        #[arg(long, default_value = "3")]
        preloaded: u32,
        /// Script elements present at mount
        #[arg(long, default_value = "3")]
        scripts: u32,
        /// Stylesheet links present at mount
        #[arg(long, default_value = "1")]
        stylesheets: u32,
        /// Milliseconds between resource completions
        #[arg(long, default_value = "80")]
        load_every: u64,
        /// Resource completions to deliver (default: everything not preloaded)
        #[arg(long)]
        loads: Option<u32>,
        /// When the page reports itself loaded, in milliseconds
        #[arg(long, default_value = "1000")]
        flag_clears_at: u64,
        /// Never report the page as loaded
        #[arg(long, conflicts_with = "flag_clears_at")]
        never_clear: bool,
        /// Simulate a browser without resource observation
        #[arg(long)]
        no_observer: bool,
        /// Override the site name
        #[arg(long)]
        site_name: Option<String>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => OverlayConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => OverlayConfig::default(),
    };

    match cli.command {
        Commands::Simulate {
            images,
            preloaded,
            scripts,
            stylesheets,
            load_every,
            loads,
            flag_clears_at,
            never_clear,
            no_observer,
            site_name,
            json,
        } => {
            let config = match site_name {
                Some(name) => config.with_site_name(name),
                None => config,
            };
            let snapshot = ResourceSnapshot {
                images,
                complete_images: preloaded.min(images),
                scripts,
                stylesheets,
            };
            let loads = loads.unwrap_or_else(|| {
                snapshot
                    .discovered()
                    .saturating_sub(snapshot.complete_images)
            });

            let (flag, reader) = loading_flag();
            let document = if no_observer {
                StaticDocument::new(snapshot)
            } else {
                let (document, feed) = StaticDocument::with_observer(snapshot);
                tokio::spawn(feed_loads(feed, loads, Duration::from_millis(load_every)));
                document
            };

            let mut watcher = flag.subscribe();
            tokio::spawn(async move {
                watcher.cleared().await;
                info!("page reported loaded");
            });
            if !never_clear {
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(flag_clears_at)).await;
                    flag.finish();
                });
            }

            let mut handle = LoadingCover::new(config, TerminalHost::default(), document, reader)
                .mount()?;
            info!(mount_id = %handle.mount_id(), "cover mounted");
            let report = handle.finished().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

/// Deliver `count` synthetic completions, one every `every`.
async fn feed_loads(feed: ResourceFeed, count: u32, every: Duration) {
    for i in 0..count {
        tokio::time::sleep(every).await;
        let kind = match i % 3 {
            0 => ResourceKind::Image,
            1 => ResourceKind::Script,
            _ => ResourceKind::Stylesheet,
        };
        if !feed.loaded(ResourceEntry::new(format!("/assets/{i}"), kind)) {
            debug!("cover gone, stopping resource feed");
            return;
        }
    }
}

/// Draws frames as progress lines.
#[derive(Default)]
struct TerminalHost {
    rendered: u64,
}

impl OverlayHost for TerminalHost {
    fn lock_scroll(&mut self) {
        debug!("scroll locked");
    }

    fn render(&mut self, frame: &OverlayFrame) {
        self.rendered += 1;
        let filled = usize::from(frame.percent) / 5;
        println!(
            "{:<9} [{}{}] {:>3}%  {}  {}",
            frame.css_class(),
            "#".repeat(filled),
            ".".repeat(20 - filled),
            frame.percent,
            frame.status,
            frame.site_name,
        );
    }

    fn teardown(&mut self) {
        debug!(rendered = self.rendered, "overlay removed, scroll restored");
    }
}

fn print_report(report: &BootReport) {
    println!();
    println!("Mount: {}", report.mount_id);
    println!("  Started: {}", report.started_at);
    for transition in &report.transitions {
        println!(
            "  {:>6}ms  {} -> {}",
            transition.at_ms, transition.from, transition.to
        );
    }
    println!("  Frames rendered: {}", report.frames_rendered);
    println!("  Loads observed: {}", report.loads_observed);
    println!(
        "  Observer: {}",
        if report.observer_available { "available" } else { "unavailable" }
    );
    println!("  Forced by safety timer: {}", report.forced_by_safety_timer);
}
