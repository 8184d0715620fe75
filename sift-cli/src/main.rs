//! sift command line
//!
//! ```text
//! sift [-P dir] [-A|-O] [-N] [--plugin-option [value]]... directory
//! ```
//!
//! Plugins are loaded from `-P`, else `$SIFT_PLUGINS_DIR`, else the current
//! directory. Every regular file under `directory` for which the selected
//! plugin options hold is printed on stdout.

mod args;
mod config;

use args::Action;
use config::Config;
use sift::{Mode, Renderer, Sift};
use sift_plugin::{load_plugins, PluginRegistry};
use std::env;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let config = Config::from_env();
    init_logging(&config);
    for warning in &config.warnings {
        warn!("{}", warning);
    }

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "sift".to_string());
    let argv: Vec<String> = argv.collect();
    let renderer = Renderer::new();

    // -P is needed before plugins exist, so it is read from the raw arguments
    let plugin_dir = args::parse(&argv)
        .plugin_dir
        .unwrap_or_else(|| config.plugin_dir.clone());
    let mut registry = PluginRegistry::with_capacity(config.max_plugins);
    let loaded = load_plugins(&plugin_dir, &mut registry);
    debug!(plugins = registry.len(), capacity = registry.capacity(), "registry ready");

    let args = args::bind(&mut registry, &argv);

    if args.action == Action::Version {
        println!("{}", renderer.version());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = loaded {
        eprintln!("{}: {}", program, e);
        return ExitCode::FAILURE;
    }

    match args.action {
        Action::Help => {
            print!("{}", renderer.help(&program, &registry));
            return ExitCode::SUCCESS;
        }
        Action::ListPlugins => {
            match renderer.plugins_json(&registry) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("cannot render plugin listing: {}", e),
            }
            return ExitCode::SUCCESS;
        }
        Action::Run | Action::Version => {}
    }

    let Some((root, extra)) = args.positionals.split_first() else {
        print!("{}", renderer.help(&program, &registry));
        return ExitCode::SUCCESS;
    };
    if !extra.is_empty() {
        debug!("ignoring extra arguments: {:?}", extra);
    }

    let sift = Sift::new(registry, Mode::new(args.combinator, args.invert));
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match sift.run(Path::new(root), &mut out).and_then(|stats| out.flush().map(|_| stats)) {
        Ok(stats) => debug!(?stats, "done"),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => error!("cannot write results: {}", e),
    }

    ExitCode::SUCCESS
}
