//! CLI entry point for svx-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "svx-blog")]
#[command(version)]
#[command(about = "Load blog posts by slug and serve them as page data", long_about = None)]
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
    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug for the post (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Print a post's content and metadata as JSON
    Show {
        /// Slug of the post
        slug: String,
    },

    /// List published posts
    List,

    /// Start the HTTP server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port from _config.yml)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip from _config.yml)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "svx_blog=debug,info"
    } else {
        "svx_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::New { title, slug } => {
            let blog = svx_blog::Blog::new(&base_dir)?;
            let path = blog.new_post(&title, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Show { slug } => {
            let blog = svx_blog::Blog::new(&base_dir)?;
            svx_blog::commands::show::run(&blog, &slug).await?;
        }

        Commands::List => {
            let blog = svx_blog::Blog::new(&base_dir)?;
            svx_blog::commands::list::run(&blog).await?;
        }

        Commands::Server { port, ip } => {
            let blog = svx_blog::Blog::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            svx_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Version => {
            println!("svx-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
