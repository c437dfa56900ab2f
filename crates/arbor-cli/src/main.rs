use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use arbor_runtime::{Compiler, logging};

/// Inspect and check Arbor component (`.acl`) files.
#[derive(Parser)]
#[command(name = "arbor", version)]
struct Cli {
    /// Add a directory to the import search path (repeatable).
    #[arg(short = 'I', long = "include-path", value_name = "DIR", global = true)]
    include_paths: Vec<PathBuf>,

    /// Widget style to record for the build.
    #[arg(long, global = true, value_name = "NAME")]
    style: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a component file and report its diagnostics.
    Check {
        /// The `.acl` file to check.
        file: PathBuf,
    },
    /// Compile a component file and print its property table.
    Inspect {
        /// The `.acl` file to inspect.
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init_logging(None);
    let cli = Cli::parse();

    let mut compiler = Compiler::new();
    compiler.set_include_paths(cli.include_paths);
    compiler.set_style(cli.style);

    match cli.command {
        Command::Check { file } => check(&mut compiler, &file),
        Command::Inspect { file } => inspect(&mut compiler, &file),
    }
}

fn check(compiler: &mut Compiler, file: &PathBuf) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let definition = compiler.build_from_source(&source, file);

    for diag in compiler.diagnostics() {
        println!("{diag}");
    }

    match definition {
        Some(definition) => {
            println!("ok: component `{}`", definition.name());
            Ok(())
        }
        None => bail!("compilation failed"),
    }
}

fn inspect(compiler: &mut Compiler, file: &PathBuf) -> Result<()> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let Some(definition) = compiler.build_from_source(&source, file) else {
        for diag in compiler.diagnostics() {
            eprintln!("{diag}");
        }
        bail!("compilation failed");
    };

    println!("component {}", definition.name());
    let instance = definition.create();
    for (name, ty) in definition.properties() {
        // get_property cannot fail for a name taken from the listing.
        let default = instance
            .get_property(name)
            .map(|v| v.to_string())
            .unwrap_or_default();
        println!("    {name}: {ty} = {default}");
    }
    Ok(())
}
