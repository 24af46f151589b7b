pub mod cli;
pub mod config;
pub mod expand;
pub mod overview;
pub mod parser;
pub mod stats;

pub use cli::{Cli, ColorMode, Commands, OutputFormat, cli_parse};
pub use expand::{ExpansionSet, MatchContext};
pub use overview::{format_overview_json, format_overview_text};
pub use parser::{
    Direction, ParseDiagnostic, ParseError, TraceMessage, TraceOverview, parse_trace_file,
    parse_trace_text,
};
pub use stats::{collect_type_stats, format_stats_json, format_stats_text};

use crate::config::TroveConfig;

/// Build the ExpansionSet from the --expand expressions
fn build_expansions(raw: &[String]) -> Result<ExpansionSet, Box<dyn std::error::Error>> {
    ExpansionSet::parse(raw)
        .map_err(|e| format!("Invalid expansion expression: {}", e).into())
}

fn write_output_file(
    path: &std::path::Path,
    content: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, content)
        .map_err(|e| format!("Failed to write output file '{}': {}", path.display(), e).into())
}

fn print_diagnostics(overview: &TraceOverview, quiet: bool) {
    if quiet {
        return;
    }
    for diagnostic in &overview.diagnostics {
        eprintln!("Warning: {}", diagnostic);
    }
}

fn parse_file(
    file: &std::path::Path,
    config: &TroveConfig,
    quiet: bool,
) -> Result<TraceOverview, Box<dyn std::error::Error>> {
    let overview = parse_trace_file(file, config)
        .map_err(|e| format!("Failed to parse trace file '{}': {}", file.display(), e))?;
    print_diagnostics(&overview, quiet);
    Ok(overview)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli_parse();
    let mut config = config::load_config(cli.config.as_deref())
        .map_err(|e| format!("Failed to load config: {}", e))?;
    if cli.drop_typeless {
        config.summary.keep_typeless = false;
    }

    // Set up color handling based on user preference
    match cli.color {
        ColorMode::Always => {
            // Force colors on
            unsafe {
                std::env::set_var("CLICOLOR_FORCE", "1");
            }
        }
        ColorMode::Never => {
            // Disable colors
            unsafe {
                std::env::set_var("NO_COLOR", "1");
            }
        }
        ColorMode::Auto => {
            // Default behavior - let the terminal decide
        }
    }

    // If in verbose mode, display some diagnostic information
    if cli.verbose > 0 && !cli.quiet {
        eprintln!("Verbosity level: {}", cli.verbose);
        eprintln!("Color mode: {:?}", cli.color);
        if let Some(out_path) = &cli.output {
            eprintln!("Output will be written to: {}", out_path.display());
        }
        for expr in &cli.expand {
            eprintln!("Expansion: {}", expr);
        }
        if let Some(config_path) = &cli.config {
            eprintln!("Config file: {}", config_path.display());
        }
        if !config.summary.keep_typeless {
            eprintln!("Dropping messages with no classifiable type");
        }
    }

    let expansions = build_expansions(&cli.expand)?;

    match &cli.command {
        Commands::Overview { files } => {
            let mut rendered = String::new();
            for file in files {
                let overview = parse_file(file, &config, cli.quiet)?;
                let text = match cli.format {
                    OutputFormat::Text => format_overview_text(&overview, &expansions, &config),
                    OutputFormat::Json => format_overview_json(&overview, &expansions, &config),
                };
                print!("{text}");
                rendered.push_str(&text);
            }
            if let Some(path) = &cli.output {
                write_output_file(path, &rendered)?;
            }
        }
        Commands::Stats { files } => {
            let mut messages = Vec::new();
            for file in files {
                let overview = parse_file(file, &config, cli.quiet)?;
                messages.extend(overview.messages);
            }

            let report = collect_type_stats(&messages);
            let text = match cli.format {
                OutputFormat::Text => format_stats_text(&report),
                OutputFormat::Json => format_stats_json(&report),
            };
            print!("{text}");
            if let Some(path) = &cli.output {
                write_output_file(path, &text)?;
            }
        }
    }

    Ok(())
}
