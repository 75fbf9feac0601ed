use clap::{ArgAction, Parser, Subcommand};
use croppa_url::{OptionSet, UrlCodec, config, output, to_engine_config};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "croppa-url")]
#[command(about = "Encode image transforms into file paths and parse them back")]
#[command(long_about = "\
Encode image transforms into file paths and parse them back

An encoded path names a source image and says how to derive a new one
from it:

  photos/dog-300x200-quality(80)-resize.jpg
  └──┬─────┘ └──┬──┘ └────────┬────────┘
  source     size     options
  photos/dog.jpg   300 x 200   quality(80), resize

Use _ for a side that should follow the aspect ratio: dog-300x_.jpg

Run 'croppa-url gen-config' to generate a documented croppa.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = defaults)
    #[arg(long, default_value = "croppa.toml", global = true)]
    config: PathBuf,

    /// Log decisions to stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a size and options into an image URL
    Generate {
        /// URL or path of the source image
        url: String,
        /// Target width in pixels
        #[arg(long)]
        width: Option<f64>,
        /// Target height in pixels
        #[arg(long)]
        height: Option<f64>,
        /// Option: `name=arg,arg`, or a raw token like `resize` / `quadrant(T)`
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// Decode an encoded path
    Parse {
        path: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the route expression for an external router
    RoutePattern,
    /// Report which paths the route expression accepts
    Check {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print a stock croppa.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate {
            url,
            width,
            height,
            options,
        } => {
            let codec = load_codec(&cli.config)?;
            let options = options_from_args(&options);
            match codec.generate(&url, width, height, &options)? {
                Some(url) => println!("{url}"),
                None => {
                    eprintln!("no path in '{url}'");
                    std::process::exit(1);
                }
            }
        }
        Command::Parse { path, json } => {
            let croppa_config = config::load_config(&cli.config)?;
            let codec = UrlCodec::new(&croppa_config)?;
            let Some(instruction) = codec.parse(&path) else {
                eprintln!("no match: {path}");
                std::process::exit(1);
            };
            let engine = to_engine_config(&instruction.options, &croppa_config);
            if json {
                let value = serde_json::json!({
                    "instruction": instruction,
                    "engine": engine,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for line in output::format_instruction(&instruction, &engine) {
                    println!("{line}");
                }
            }
        }
        Command::RoutePattern => {
            let codec = load_codec(&cli.config)?;
            println!("{}", codec.route_pattern());
        }
        Command::Check { paths } => {
            let codec = load_codec(&cli.config)?;
            for path in &paths {
                println!(
                    "{}",
                    output::format_route_check(path, codec.route_matches(path))
                );
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn load_codec(file: &std::path::Path) -> Result<UrlCodec, config::ConfigError> {
    UrlCodec::new(&config::load_config(file)?)
}

/// Logs go to stderr so stdout stays pipeable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Build an option set from `--option` values, in command-line order.
///
/// `name=a,b` is a named option with arguments; anything else is emitted
/// verbatim as a positional token.
fn options_from_args(args: &[String]) -> OptionSet {
    args.iter().fold(OptionSet::new(), |options, arg| {
        match arg.split_once('=') {
            Some((name, values)) => options.with_args(name, values.split(',')),
            None => options.with_positional(arg.as_str()),
        }
    })
}
