mod logging;
mod test_runner;

use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use minimark::parser::DEFAULT_MAX_DEPTH;
use render::{Format, RenderError, RenderOptions};
use tracing::debug;

const SUBCOMMANDS: &[&str] = &["render", "test", "help"];

#[derive(Parser)]
#[command(name = "minimark", version, about = "Render minimark documents")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log parser decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a document
    Render(RenderArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Markdown file to render, or "-" for stdin
    file: String,

    /// Output format: html, text or outline
    #[arg(short, long, default_value = "html")]
    format: Format,

    /// Maximum nesting depth of emphasis, strike and link labels
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Fail on input nested deeper than --max-depth instead of keeping it as text
    #[arg(long)]
    strict: bool,

    /// Parse only, don't render (exit 0 if valid)
    #[arg(long)]
    check: bool,

    /// Dump the parsed tree
    #[arg(long)]
    tree: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    let args = with_implied_render(std::env::args().collect());
    let cli = Cli::parse_from(&args);

    let level = if cli.verbose { "debug" } else { "warn" };
    logging::init_logger(level, cli.no_color);

    match cli.command {
        Command::Render(render_args) => do_render(render_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

/// Insert "render" before the first positional argument when it is not a
/// subcommand, so `minimark file.md` works like `minimark render file.md`.
fn with_implied_render(mut args: Vec<String>) -> Vec<String> {
    let first_positional = args
        .iter()
        .skip(1)
        .position(|arg| arg == "-" || !arg.starts_with('-'))
        .map(|i| i + 1);

    if let Some(i) = first_positional {
        if !SUBCOMMANDS.contains(&args[i].as_str()) {
            args.insert(i, "render".to_string());
        }
    }
    args
}

fn do_render(args: RenderArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let (name, source) = match read_source(&args.file) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(name.clone(), source.clone());

    let options = RenderOptions {
        format: args.format,
        max_depth: args.max_depth,
        strict: args.strict,
    };
    debug!(file = %name, format = %options.format, max_depth = options.max_depth, "rendering");

    let tree = match render::parse_source(&source, file_id, &options) {
        Ok(tree) => tree,
        Err(error) => {
            let writer = StandardStream::stderr(color_choice);
            emit_render_error(&writer, &files, &error);
            process::exit(1);
        }
    };

    if args.check {
        eprintln!("ok: {} parsed successfully", name);
        return;
    }

    if args.tree {
        println!("{:#?}", tree);
        return;
    }

    let rendered = render::render_tree(&tree, options.format);
    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", rendered).and_then(|_| stdout.flush()) {
        let writer = StandardStream::stderr(color_choice);
        emit_render_error(&writer, &files, &RenderError::from(e));
        process::exit(1);
    }
}

/// Read the named file, or stdin for "-". Returns the display name and text.
fn read_source(file: &str) -> io::Result<(String, String)> {
    if file == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        Ok(("<stdin>".to_string(), source))
    } else {
        Ok((file.to_string(), std::fs::read_to_string(file)?))
    }
}

fn emit_render_error(
    writer: &StandardStream,
    files: &SimpleFiles<String, String>,
    error: &RenderError,
) {
    match error.parse_error() {
        Some(parse_error) => {
            let config = term::Config::default();
            let diagnostic = parse_error.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, &diagnostic);
        }
        None => eprintln!("error: {}", error),
    }
}
