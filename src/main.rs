use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use ditherer::api;
use ditherer::models::{AppConfig, ParamSet, ParamUpdate};
use ditherer::server;
use ditherer::services::codec::{self, ImageFormat};
use ditherer::services::{Debouncer, FileWatcher, Presentation, PreviewSession};

#[derive(Parser)]
#[command(name = "ditherer", version)]
#[command(about = "Ordered (Bayer) dithering with live preview")]
struct Cli {
    /// Config file (YAML). Falls back to $DITHERER_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Dither parameter overrides shared by the commands
#[derive(Args, Debug, Default)]
struct DitherArgs {
    /// Downsample divisor applied before dithering
    #[arg(long)]
    scale: Option<u32>,

    /// Bayer matrix size: 2, 4 or 8
    #[arg(long)]
    matrix: Option<usize>,

    /// Dither RGB channels independently instead of luminance
    #[arg(long)]
    color: bool,

    /// Quantization levels per channel (at least 2)
    #[arg(long)]
    steps: Option<u32>,

    /// Scale the export back up to the source dimensions
    #[arg(long)]
    upscale: bool,
}

impl DitherArgs {
    fn update(&self) -> ParamUpdate {
        ParamUpdate {
            scale_factor: self.scale,
            matrix_size: self.matrix,
            color: self.color.then_some(true),
            steps: self.steps,
            upscale_on_export: self.upscale.then_some(true),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Dither an image once and write the result
    Render {
        /// Source image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format: png, jpg or jpeg (default: from the output extension)
        #[arg(long)]
        format: Option<String>,

        #[command(flatten)]
        dither: DitherArgs,
    },
    /// Watch the source and a parameter file, rewriting a preview on change
    Preview {
        /// Source image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Preview output path
        #[arg(short, long)]
        output: PathBuf,

        /// Parameter file (YAML) to watch
        #[arg(long)]
        params: Option<PathBuf>,

        /// Fit the preview into a frame, e.g. 320x240
        #[arg(long, value_parser = parse_frame)]
        fit: Option<(usize, usize)>,

        /// Integer nearest-neighbour zoom for the preview
        #[arg(long)]
        zoom: Option<u32>,

        #[command(flatten)]
        dither: DitherArgs,
    },
    /// Start the HTTP preview server
    Serve {
        /// Source image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        dither: DitherArgs,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ditherer API",
        description = "Ordered (Bayer) dithering preview server",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_preview, api::handle_export, api::handle_params),
    components(schemas(ParamSet)),
    tags(
        (name = "Preview", description = "Dithered preview and export")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = AppConfig::resolve_path(cli.config);

    match cli.command {
        Some(Commands::Render {
            input,
            output,
            format,
            dither,
        }) => run_render_command(config_path.as_deref(), &input, &output, format, &dither),
        Some(Commands::Preview {
            input,
            output,
            params,
            fit,
            zoom,
            dither,
        }) => {
            let presentation = Presentation { frame: fit, zoom };
            run_preview_command(
                config_path.as_deref(),
                &input,
                &output,
                params,
                presentation,
                &dither,
            )
            .await
        }
        Some(Commands::Serve { input, dither }) => {
            run_server(config_path.as_deref(), &input, &dither).await
        }
        None => {
            run_status_command(config_path.as_deref());
            Ok(())
        }
    }
}

/// Logging for one-shot and watch commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ditherer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn parse_frame(s: &str) -> Result<(usize, usize), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: usize = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: usize = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("frame dimensions must be positive".to_string());
    }
    Ok((w, h))
}

/// Merge CLI overrides into `base` and enforce the configured scale limit.
fn resolve_params(
    config: &AppConfig,
    base: ParamSet,
    dither: &DitherArgs,
) -> anyhow::Result<ParamSet> {
    let params = dither.update().apply(base);
    if params.scale_factor > config.max_scale_factor {
        anyhow::bail!(
            "scale factor {} exceeds the maximum of {}",
            params.scale_factor,
            config.max_scale_factor
        );
    }
    Ok(params)
}

/// Apply an edited parameter set. On error the session keeps its previous set.
fn apply_params(
    session: &mut PreviewSession,
    config: &AppConfig,
    params: ParamSet,
    dither: &DitherArgs,
) -> anyhow::Result<()> {
    let params = resolve_params(config, params, dither)?;
    session.set_params(params)?;
    Ok(())
}

fn output_format(output: &Path, format: Option<String>) -> anyhow::Result<ImageFormat> {
    Ok(match format {
        Some(f) => f.parse()?,
        None => ImageFormat::from_path(output).unwrap_or_default(),
    })
}

/// Dither a file once (no server needed)
fn run_render_command(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    format: Option<String>,
    dither: &DitherArgs,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = AppConfig::load(config_path);
    let params = resolve_params(&config, config.defaults, dither)?;
    let format = output_format(output, format)?;

    let source = codec::decode_file(input)?;
    tracing::info!(
        input = %input.display(),
        width = source.width(),
        height = source.height(),
        matrix = %params.matrix_label(),
        scale_factor = params.scale_factor,
        steps = params.steps,
        color = params.color,
        "Rendering"
    );

    let mut session =
        PreviewSession::new(source, params)?.with_jpeg_quality(config.jpeg_quality());
    let written = session.export_to_file(output, format, &mut |phase| {
        tracing::info!(progress = phase.percent(), ?phase, "Export progress");
    })?;

    println!("Rendered {} ({} bytes)", output.display(), written);
    Ok(())
}

/// Write the current preview to `output`.
fn write_preview(
    session: &mut PreviewSession,
    output: &Path,
    presentation: Presentation,
    quality: u8,
) -> anyhow::Result<()> {
    let format = ImageFormat::from_path(output).unwrap_or_default();
    let image = session.present(presentation)?;
    let bytes = codec::write_file(&image, output, format, quality)?;
    tracing::info!(
        output = %output.display(),
        width = image.width(),
        height = image.height(),
        bytes,
        "Preview written"
    );
    Ok(())
}

/// Watch mode: rewrite the preview whenever the source or parameter file changes
async fn run_preview_command(
    config_path: Option<&Path>,
    input: &Path,
    output: &Path,
    params_file: Option<PathBuf>,
    presentation: Presentation,
    dither: &DitherArgs,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = AppConfig::load(config_path);
    let quality = config.jpeg_quality();

    let file_params = |path: &Path| match ParamSet::load(path) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring parameter file");
            None
        }
    };

    let base = params_file
        .as_deref()
        .filter(|p| p.exists())
        .and_then(file_params)
        .unwrap_or(config.defaults);
    let params = resolve_params(&config, base, dither)?;

    let source = codec::decode_file(input)?;
    let mut session = PreviewSession::new(source, params)?;
    write_preview(&mut session, output, presentation, quality)?;

    let mut targets = vec![input.to_path_buf()];
    targets.extend(params_file.clone());
    let watcher = FileWatcher::new(targets);
    if !watcher.is_active() {
        tracing::warn!("File watching unavailable, preview written once");
        return Ok(());
    }
    let mut changes = watcher.subscribe();
    let (mut debouncer, mut settled) = Debouncer::new(config.debounce());

    tracing::info!(
        debounce_ms = config.debounce_ms,
        "Watching for changes (Ctrl-C to stop)"
    );

    let mut source_dirty = false;
    let mut params_dirty = false;

    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(event) => {
                    source_dirty |= event.touches(input);
                    params_dirty |= params_file.as_deref().is_some_and(|p| event.touches(p));
                    debouncer.trigger(());
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Change events lagged, reloading everything");
                    source_dirty = true;
                    params_dirty = params_file.is_some();
                    debouncer.trigger(());
                }
                Err(RecvError::Closed) => break,
            },
            Some(()) = settled.recv() => {
                let reload_source = std::mem::take(&mut source_dirty);
                let reload_params = std::mem::take(&mut params_dirty);

                tokio::task::block_in_place(|| {
                    if reload_source {
                        match codec::decode_file(input) {
                            Ok(raster) => {
                                if let Err(e) = session.replace_source(raster) {
                                    tracing::warn!(error = %e, "Keeping previous source");
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "Failed to reload source"),
                        }
                    }
                    if reload_params {
                        if let Some(p) = params_file.as_deref().and_then(file_params) {
                            if let Err(e) = apply_params(&mut session, &config, p, dither) {
                                tracing::warn!(error = %e, "Rejected parameters, keeping previous set");
                            }
                        }
                    }
                    if let Err(e) = write_preview(&mut session, output, presentation, quality) {
                        tracing::error!(error = %e, "Failed to write preview");
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping preview");
                break;
            }
        }
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command(config_path: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let rust_log = std::env::var("RUST_LOG").ok();

    println!("Ditherer v{VERSION} - ordered (Bayer) dithering\n");

    println!("Environment Variables:");
    println!(
        "  DITHERER_CONFIG = {}",
        config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );
    println!(
        "  BIND_ADDR       = {}",
        bind_addr.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  RUST_LOG        = {}",
        rust_log.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_path {
        Some(p) if p.exists() => p.display().to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    let config = match config_path {
        Some(p) if p.exists() => AppConfig::load(Some(p)),
        _ => AppConfig::default(),
    };
    let d = config.defaults;

    println!("\nConfiguration ({config_source}):");
    println!("  scale factor  = {} (max {})", d.scale_factor, config.max_scale_factor);
    println!("  matrix        = {}", d.matrix_label());
    println!("  color         = {}", d.color);
    println!("  steps         = {}", d.steps);
    println!("  upscale       = {}", d.upscale_on_export);
    println!("  debounce      = {} ms", config.debounce_ms);
    println!("  jpeg quality  = {}", config.jpeg_quality);
    println!("  listen        = {}", config.effective_bind_addr());

    println!("\nCommands:");
    println!("  ditherer render    Dither an image once");
    println!("  ditherer preview   Watch mode with a live preview file");
    println!("  ditherer serve     Start the HTTP preview server");
    println!("\nRun 'ditherer --help' for more details.");
}

/// Run the HTTP preview server
async fn run_server(
    config_path: Option<&Path>,
    input: &Path,
    dither: &DitherArgs,
) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ditherer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AppConfig::load(config_path);
    config.defaults = resolve_params(&config, config.defaults, dither)?;
    let bind_addr = config.effective_bind_addr();

    let source = codec::decode_file(input)?;
    tracing::info!(
        input = %input.display(),
        width = source.width(),
        height = source.height(),
        "Source loaded"
    );

    let state = server::create_app_state(source, config)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Ditherer preview server listening");
    tracing::info!("Preview available at http://{}/api/preview", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
