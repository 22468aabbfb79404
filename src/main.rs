use clap::Parser;
use inkpage::{HandlebarsSource, RenderError, RendererBuilder};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Render annotated markup to a PDF file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Markup file, or a handlebars template when --data is given
    markup: PathBuf,

    /// Where to write the PDF
    output: PathBuf,

    /// JSON data for rendering the markup file as a template
    #[arg(long)]
    data: Option<PathBuf>,

    /// Directory relative image and font paths resolve against
    #[arg(long)]
    base_dir: Option<PathBuf>,

    /// How long to wait for the writer to finish emitting, in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Resolve resources from the filesystem only
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Refuse filesystem sources outside the base directory
    #[arg(long, default_value_t = false)]
    sandbox: bool,
}

#[tokio::main]
async fn main() -> Result<(), RenderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("inkpage=info"))
        .init();

    let args = Args::parse();

    let mut builder = RendererBuilder::new()
        .with_network(!args.offline)
        .with_sandbox(args.sandbox);
    if let Some(base_dir) = &args.base_dir {
        builder = builder.with_base_dir(base_dir.clone());
    }
    if let Some(ms) = args.timeout_ms {
        builder = builder.with_emission_timeout(Duration::from_millis(ms));
    }
    let renderer = builder.build()?;

    let path = match &args.data {
        Some(data) => {
            let source = HandlebarsSource::from_files(&args.markup, data)?;
            renderer.render_to_file(&source, &args.output).await?
        }
        None => {
            let markup = fs::read_to_string(&args.markup)?;
            renderer.render_to_file(markup.as_str(), &args.output).await?
        }
    };

    println!("Generated {}", path.display());
    Ok(())
}
