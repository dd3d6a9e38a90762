mod logging;
mod server;
mod server_utils;

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::{Args, Parser, Subcommand};
use folio::{DocsOptions, DocsService, content::ParseOptions};
use logging::init_logging;
use server::{ServerOptions, start_docs_server};
use tracing::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Don't print anything
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the docs API, and optionally a directory of static files
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Directory holding config.json and the Markdown pages
    #[arg(long, default_value = "public/pages")]
    pages: PathBuf,

    /// Directory served for every path outside of the API
    #[arg(long = "static")]
    static_dir: Option<PathBuf>,

    /// Port to try first, the next free one is used if it's taken
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Expose the server to the network
    #[arg(long)]
    host: bool,

    /// Seconds a resolved page stays cached
    #[arg(long, default_value_t = 300)]
    cache_ttl: u64,

    /// Ignore heading-looking lines inside fenced code blocks
    #[arg(long)]
    skip_code_fences: bool,

    /// Give repeated headings distinct ids
    #[arg(long)]
    unique_slugs: bool,
}

impl ServeArgs {
    fn docs_options(&self) -> DocsOptions {
        DocsOptions {
            pages_dir: self.pages.clone(),
            cache_ttl: Duration::from_secs(self.cache_ttl),
            parse: ParseOptions {
                skip_code_fences: self.skip_code_fences,
                unique_slugs: self.unique_slugs,
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging();
    }

    match cli.command {
        Commands::Serve(args) => {
            let options = args.docs_options();
            if !options.pages_dir.is_dir() {
                error!(
                    "The pages directory {} does not exist.",
                    options.pages_dir.display()
                );
                return ExitCode::FAILURE;
            }

            let docs = DocsService::new(options);
            let server_options = ServerOptions {
                static_dir: args.static_dir,
                port: args.port,
                host: args.host,
            };

            if let Err(err) = start_docs_server(docs, server_options).await {
                error!("Server failed: {}", err);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
