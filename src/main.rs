#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use anyhow::{Context, Result, bail};
    use clap::{Args, Parser, Subcommand};
    use schemaviz::fixture;
    use schemaviz::reader::{ConnectionParams, MySqlSource, SchemaSource};
    use schemaviz::render::DiagramRenderer;
    use schemaviz::session::Session;
    use schemaviz::snapshot::Snapshot;
    use schemaviz::svg::{DEFAULT_VISIBLE_WIDTH, SvgSurface};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tracing_subscriber::EnvFilter;

    #[derive(Parser)]
    #[command(name = "schemaviz")]
    #[command(version)]
    #[command(about = "Render a MySQL database schema as an SVG diagram", long_about = None)]
    pub struct Cli {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Debug logging
        #[arg(short, long, global = true)]
        verbose: bool,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Args)]
    struct ConnectionArgs {
        /// Server host
        #[arg(long, env = "SCHEMAVIZ_HOST", default_value = "localhost", global = true)]
        host: String,

        /// Server port
        #[arg(long, env = "SCHEMAVIZ_PORT", default_value_t = 3306, global = true)]
        port: u16,

        /// User name
        #[arg(short, long, env = "SCHEMAVIZ_USER", default_value = "root", global = true)]
        user: String,

        /// Password
        #[arg(short, long, env = "SCHEMAVIZ_PASSWORD", default_value = "", hide_env_values = true, global = true)]
        password: String,
    }

    impl ConnectionArgs {
        fn params(&self) -> ConnectionParams {
            ConnectionParams {
                host: self.host.clone(),
                port: self.port,
                user: self.user.clone(),
                password: self.password.clone(),
            }
        }
    }

    #[derive(Subcommand)]
    enum Commands {
        /// List databases on the server
        Databases,

        /// Load a database schema and render it to SVG
        Render {
            /// Database to render
            #[arg(short, long)]
            database: String,

            /// Output file (default: stdout)
            #[arg(short, long)]
            output: Option<PathBuf>,

            /// Visible width at which table rows wrap
            #[arg(short, long, default_value_t = DEFAULT_VISIBLE_WIDTH)]
            width: f64,
        },

        /// Write a JSON snapshot of a database schema
        Export {
            /// Database to export
            #[arg(short, long)]
            database: String,

            /// Output file (default: stdout)
            #[arg(short, long)]
            output: Option<PathBuf>,
        },

        /// Render a JSON snapshot to SVG without connecting
        RenderSnapshot {
            /// Snapshot file written by `export`
            input: PathBuf,

            /// Output file (default: stdout)
            #[arg(short, long)]
            output: Option<PathBuf>,

            /// Visible width at which table rows wrap
            #[arg(short, long, default_value_t = DEFAULT_VISIBLE_WIDTH)]
            width: f64,
        },

        /// Drop and recreate the hotel booking test database
        Seed,
    }

    pub fn run(cli: Cli) -> Result<()> {
        init_logging(cli.verbose);
        let params = cli.connection.params();

        match cli.command {
            Commands::Databases => {
                let session = connect(params)?;
                for name in session.databases() {
                    println!("{}", name);
                }
                Ok(())
            }
            Commands::Render {
                database,
                output,
                width,
            } => {
                let mut session = connect(params)?;
                if !session.select_database(&database) {
                    bail!("{}", session.status().text);
                }
                let mut surface = SvgSurface::new(width);
                if session.load_schema(&mut surface).is_none() {
                    bail!("{}", session.status().text);
                }
                write_output(output.as_deref(), &surface.to_svg())
            }
            Commands::Export { database, output } => {
                let mut source = MySqlSource::connect(&params)?;
                let (schema, edges) = source
                    .read_schema(&database)
                    .with_context(|| format!("Error loading schema for '{}'", database))?;
                let json = Snapshot::new(Some(&database), &schema, &edges).to_json()?;
                write_output(output.as_deref(), &json)
            }
            Commands::RenderSnapshot {
                input,
                output,
                width,
            } => {
                let (schema, edges) = Snapshot::read_file(&input)
                    .with_context(|| format!("Failed to load {}", input.display()))?
                    .into_parts();
                let mut surface = SvgSurface::new(width);
                DiagramRenderer::default().render(&mut surface, &schema, &edges);
                write_output(output.as_deref(), &surface.to_svg())
            }
            Commands::Seed => {
                let mut source = MySqlSource::connect(&params)?;
                fixture::create_test_database(|statement| source.execute(statement))?;
                eprintln!("Database '{}' created successfully!", fixture::TEST_DATABASE);
                Ok(())
            }
        }
    }

    fn connect(params: ConnectionParams) -> Result<Session> {
        let mut session = Session::new(params);
        let connected = session.connect(|p| {
            MySqlSource::connect(p).map(|s| Box::new(s) as Box<dyn SchemaSource>)
        });
        if !connected {
            bail!("{}", session.status().text);
        }
        Ok(session)
    }

    fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
        match path {
            Some(path) => fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display())),
            None => {
                print!("{}", content);
                Ok(())
            }
        }
    }

    fn init_logging(verbose: bool) {
        let default = if verbose { "schemaviz=debug" } else { "schemaviz=info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    let cli = cli::Cli::parse();
    if let Err(e) = cli::run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
