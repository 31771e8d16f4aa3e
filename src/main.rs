//! CLI entry point for academic-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "academic-blog")]
#[command(version)]
#[command(about = "Serve a directory of Markdown posts as a blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to server.port from _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip from _config.yml)
        #[arg(short, long)]
        ip: Option<String>,

        /// Reload open pages when posts change
        #[arg(short, long)]
        watch: bool,
    },

    /// List posts in index order
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render one post page
    Render {
        /// File name inside the posts directory
        file: String,

        /// Write the page here instead of stdout
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "academic_blog=debug,info"
    } else {
        "academic_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Serve {
            port,
            ip,
            watch,
        } => {
            let blog = academic_blog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Serving posts from {:?}", blog.posts_dir);
            academic_blog::server::start(blog, &ip, port, watch).await?;
        }

        Commands::List { json } => {
            let blog = academic_blog::Blog::new(&base_dir)?;
            academic_blog::commands::list::run(&blog, json)?;
        }

        Commands::Render { file, output } => {
            let blog = academic_blog::Blog::new(&base_dir)?;
            academic_blog::commands::render::run(&blog, &file, output.as_deref())?;
        }

        Commands::Version => {
            println!("academic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
