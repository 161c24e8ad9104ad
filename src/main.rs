use clap::{Parser, Subcommand};
use reframe::batch::{self, ProgressEvent, SaveSummary};
use reframe::config::FrameConfig;
use reframe::imaging::RustBackend;
use reframe::sink::DirectorySink;
use reframe::source::{SELECTION_LIMIT, Selection};
use reframe::{config, output};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::mpsc::{Sender, channel};

/// Shared flags for commands that pick images.
#[derive(clap::Args, Clone)]
struct SelectArgs {
    /// Image files to frame, in order
    paths: Vec<PathBuf>,

    /// Frame every supported image under this directory instead
    #[arg(long, conflicts_with = "paths")]
    from_dir: Option<PathBuf>,
}

impl SelectArgs {
    fn build(&self) -> Result<Selection, Box<dyn std::error::Error>> {
        let selection = match &self.from_dir {
            Some(dir) => Selection::from_dir(dir)?,
            None => Selection::from_paths(&self.paths)?,
        };
        if selection.len() > SELECTION_LIMIT {
            println!(
                "Note: {} images selected; a picker hands over at most {}",
                selection.len(),
                SELECTION_LIMIT
            );
        }
        Ok(selection)
    }
}

#[derive(Parser)]
#[command(name = "reframe")]
#[command(version)]
#[command(about = "Fit photos into social-media aspect-ratio frames")]
#[command(long_about = "\
Fit photos into social-media aspect-ratio frames

Each image is letterboxed: scaled uniformly, centered on a white canvas of
the chosen frame profile, and padded where the aspect ratios differ.
Exports never upscale past the source's native resolution.

Built-in profiles:

  Square      1:1    up to 1080x1080
  Portrait    4:5    up to 1080x1350   (default)
  Landscape   16:9   up to 1080x608

Run 'reframe gen-config' to generate a documented profiles.toml.")]
struct Cli {
    /// Profile configuration file
    #[arg(long, default_value = "profiles.toml", global = true)]
    config: PathBuf,

    /// Frame profile to use (default comes from config)
    #[arg(long, short, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the configured frame profiles
    Profiles,
    /// Render display-sized previews into a directory
    Preview {
        #[command(flatten)]
        select: SelectArgs,

        /// Output directory for previews
        #[arg(long, default_value = "previews")]
        out: PathBuf,
    },
    /// Frame images at export resolution and save them
    Frame {
        #[command(flatten)]
        select: SelectArgs,

        /// Output directory for framed images
        #[arg(long, default_value = "framed")]
        out: PathBuf,
    },
    /// Decode-check a selection without writing anything
    Check {
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Print a stock profiles.toml with all options documented
    GenConfig,
}

/// Manifest describing the artifacts a `frame` run produced.
#[derive(Serialize)]
struct FrameManifest {
    profile: String,
    images: Vec<ManifestImage>,
}

#[derive(Serialize)]
struct ManifestImage {
    source: String,
    output: String,
    width: u32,
    height: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = FrameConfig::load(&cli.config)?;
    let profile = config.select_profile(cli.profile.as_deref())?;

    match cli.command {
        Command::Profiles => {
            output::print_profiles(&config);
        }
        Command::Preview { select, out } => {
            let selection = select.build()?;
            if selection.is_empty() {
                println!("Nothing selected");
                return Ok(());
            }

            let backend = RustBackend::new();
            let (tx, printer) = spawn_printer();
            let previews = batch::preview_batch(
                &backend,
                &selection,
                &profile,
                config.display_width(),
                config.render_config(),
                Some(&tx),
            );
            drop(tx);
            printer.join().unwrap();

            let mut sink = DirectorySink::new(&out);
            let summary = save_previews(&mut sink, &previews)?;
            output::print_preview_summary(&previews, selection.len());
            println!("Wrote {} previews to {}", summary, out.display());
        }
        Command::Frame { select, out } => {
            let selection = select.build()?;
            if selection.is_empty() {
                println!("Nothing selected");
                return Ok(());
            }

            let backend = RustBackend::new();
            let mut sink = DirectorySink::new(&out);
            let (tx, printer) = spawn_printer();
            let result = batch::save_batch(
                &backend,
                &mut sink,
                &selection,
                &profile,
                config.render_config(),
                Some(&tx),
            );
            drop(tx);
            printer.join().unwrap();

            let summary = result?;
            output::print_save_summary(&summary);
            let extension = config.render_config().format.extension();
            write_manifest(&out, &profile.name, extension, &selection, &summary)?;
        }
        Command::Check { select } => {
            use reframe::imaging::ImageBackend;

            let selection = select.build()?;
            let backend = RustBackend::new();
            let mut failures = 0;
            for item in &selection.images {
                match backend.identify(&item.bytes) {
                    Ok(dims) => println!("{} {}x{}", item.name, dims.width, dims.height),
                    Err(e) => {
                        failures += 1;
                        println!("{} FAILED: {e}", item.name);
                    }
                }
            }
            if failures > 0 {
                return Err(
                    format!("{failures} of {} images failed to decode", selection.len()).into(),
                );
            }
            println!("Selection is valid ({} images)", selection.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Spawn the progress printer: batches report over an mpsc channel while
/// they run on the calling thread.
fn spawn_printer() -> (Sender<ProgressEvent>, std::thread::JoinHandle<()>) {
    let (tx, rx) = channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            println!("{}", output::format_progress_event(&event));
        }
    });
    (tx, printer)
}

/// Persist preview frames through a sink; previews reuse the save path so
/// authorization and naming behave the same as exports.
fn save_previews(
    sink: &mut DirectorySink,
    previews: &[reframe::batch::PreviewFrame],
) -> Result<usize, Box<dyn std::error::Error>> {
    use reframe::sink::{Authorization, ImageSink};

    if sink.request_authorization() != Authorization::Authorized {
        return Err("preview directory is not writable".into());
    }
    for preview in previews {
        let stem = preview
            .name
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or_else(|| preview.name.clone());
        sink.save(&format!("{stem}-preview"), &preview.image)?;
    }
    Ok(previews.len())
}

fn write_manifest(
    out: &std::path::Path,
    profile_name: &str,
    extension: &str,
    selection: &Selection,
    summary: &SaveSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = FrameManifest {
        profile: profile_name.to_string(),
        images: summary
            .saved
            .iter()
            .map(|frame| ManifestImage {
                source: selection.images[frame.source_index].name.clone(),
                output: format!("{}.{extension}", frame.name),
                width: frame.width,
                height: frame.height,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    std::fs::write(out.join("manifest.json"), json)?;
    Ok(())
}
