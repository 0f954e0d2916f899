use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use fruit_ripeness::{
    classify::{ClassifyOptions, ClassifyPipeline, ReportFormatter},
    config::Config,
    models::ModelManager,
    web::serve,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fruit-ripeness")]
#[command(about = "ONNX-powered fruit ripeness classification service")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Model directory path (expects fruit_ripeness.onnx and labels.txt)
    #[arg(long, default_value = "models")]
    model_dir: String,

    /// Model input resolution (square, per deployed model instance)
    #[arg(long, default_value_t = 224)]
    input_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP classification service
    Serve {
        /// Server bind address
        #[arg(long, default_value = "0.0.0.0:5005")]
        bind: String,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Enable development mode
        #[arg(long)]
        dev: bool,
    },
    /// Classify a single image from the command line
    Predict {
        /// Path to the image file
        image: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Number of labels in the ranking
        #[arg(long, default_value_t = 5)]
        top_k: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志系统
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    match args.command {
        Command::Serve { bind, workers, dev } => {
            tracing::info!("Starting fruit ripeness service...");
            tracing::info!("Bind address: {}", bind);
            tracing::info!("Model directory: {}", args.model_dir);

            let config = Config::new(bind, args.model_dir, workers, args.input_size, dev)?;

            // worker数量决定HTTP运行时的线程数
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(config.workers)
                .enable_all()
                .build()?;
            runtime.block_on(serve(config))?;
        }
        Command::Predict {
            image,
            format,
            top_k,
        } => {
            // 批式入口不监听端口，绑定地址仅占位
            let config = Config::new(
                "127.0.0.1:0".to_string(),
                args.model_dir,
                None,
                args.input_size,
                false,
            )?;
            ModelManager::init(config)?;

            let options = ClassifyOptions { top_k: Some(top_k) };
            let result = ClassifyPipeline::process_path(&image, &options)?;

            match format {
                OutputFormat::Text => println!("{}", ReportFormatter::format_text(&result)),
                OutputFormat::Json => println!("{}", ReportFormatter::format_json(&result)?),
            }
        }
    }

    Ok(())
}
