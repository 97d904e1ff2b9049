use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use quilldb::{Config, Engine};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[clap(name = "quilldb")]
struct Arguments {
    /// Path of the database document.
    #[clap(long, env = "QUILLDB_PATH", default_value = "quill.json")]
    path: PathBuf,

    /// Name of the database when a new document is created.
    #[clap(long, env = "QUILLDB_NAME", default_value = "main")]
    name: String,

    /// Fail instead of starting empty when the document does not exist.
    #[clap(long)]
    no_create: bool,

    /// Do not write the document back after running the statements.
    #[clap(long)]
    no_save: bool,

    /// Statements to execute, in order.
    #[clap(trailing_var_arg = true, required = true)]
    statements: Vec<String>,
}

/// Runs each statement against the document and prints the results.
fn main() -> ExitCode {
    let args = Arguments::parse();

    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::WARN.into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("WARNING: failed to install log subscriber");
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Arguments) -> quilldb::Result<()> {
    let config = Config::default()
        .with_name(args.name)
        .with_path(args.path)
        .with_create_if_missing(!args.no_create);
    let mut engine = Engine::open(config)?;

    for statement in &args.statements {
        let result = engine.execute(statement)?;
        println!("{result}");
    }

    if !args.no_save {
        engine.save()?;
    }
    Ok(())
}
