use std::io::IsTerminal as _;
use std::process::ExitCode;

use anyhow::Context as _;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use mufiz_db::{File, RootDatabase, check_file};
use mufiz_errors::Renderer;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "mufiz", version, about = "Parser front-end for the Mufiz scripting language")]
struct Options {
    /// When to style diagnostics.
    #[arg(long, value_enum, default_value_t = Color::Auto, global = true)]
    color: Color,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the syntax tree of a file.
    Parse { path: Utf8PathBuf },
    /// Print every token of a file, trivia included.
    Tokens { path: Utf8PathBuf },
    /// Report diagnostics and fail if there are any.
    Check { path: Utf8PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    fn renderer(self) -> Renderer {
        let styled = match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        };
        if styled { Renderer::styled() } else { Renderer::plain() }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let filter = EnvFilter::try_from_env("MUFIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = Options::parse();
    let renderer = options.color.renderer();
    let db = RootDatabase::default();

    match options.command {
        Command::Parse { path } => {
            let file = load(&db, path)?;
            print!("{}", file.parse(&db).debug_dump());
            Ok(ExitCode::SUCCESS)
        }
        Command::Tokens { path } => {
            let file = load(&db, path)?;
            let text = file.text(&db);
            let (tokens, _) = mufiz_tokenizer::tokenize(text);
            for token in tokens {
                println!("{:?}@{:?} {:?}", token.kind, token.range, &text[token.range]);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path } => {
            let file = load(&db, path)?;
            let diagnostics = check_file(&db, file);
            let path = file.path(&db).as_str();
            let text = file.text(&db);

            for diagnostic in diagnostics {
                eprintln!("{}", diagnostic.render(&renderer, path, text));
            }

            if diagnostics.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("{path}: {} error(s)", diagnostics.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn load(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    tracing::debug!(%path, len = text.len(), "loaded source file");
    Ok(File::new(db, path, text))
}
