use clap::Parser;
use color_eyre::eyre::{Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use stickerproxy::infrastructure::{AppConfig, CliArgs, Command, ConfigLoader};
use stickerproxy::presentation::{HandlerResponse, Handlers, ResponseBody};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = &config.log_path {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let loader = match &args.config {
        Some(_) => ConfigLoader::with_dir(std::env::current_dir()?),
        None => ConfigLoader::new()?,
    };
    let mut config = loader.load(args.config.as_deref())?;
    config.merge_with_args(args);
    config.normalize();
    Ok(config)
}

fn print_response(response: HandlerResponse) -> Result<()> {
    match response.body {
        ResponseBody::Text(body) if response.status.code() < 400 => println!("{body}"),
        ResponseBody::Text(body) => bail!("{} {body}", response.status.code()),
        ResponseBody::File(path) => println!(
            "{} {} {}",
            response.status.code(),
            response.content_type.unwrap_or_default(),
            path.display()
        ),
        ResponseBody::Empty => println!(
            "{} {}",
            response.status.code(),
            response.location.unwrap_or_default()
        ),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(
        version = stickerproxy::VERSION,
        storage = %config.storage_path.display(),
        "Starting stickerproxy"
    );

    let handlers = Handlers::from_config(config);

    match &args.command {
        Command::List => {
            let snapshot = handlers.cache().get_async().await?;
            info!(count = snapshot.len(), "Listed local files");
            print_response(handlers.local_listing())?;
        }
        Command::Resolve { id } => print_response(handlers.media(id))?,
        Command::Proxy { id } => {
            let media = handlers.resolve_for_proxy(id)?;
            println!("{}", serde_json::to_string(&media)?);
        }
        Command::Page => print_response(handlers.picker_page())?,
    }

    Ok(())
}
