//! infogen CLI
//!
//! Generates an infographic from a JSON config and/or inline flags and writes
//! SVG or PNG depending on the output extension.

use anyhow::{anyhow, bail};
use clap::Parser;
use infogen::background::{FLAT_PRESETS, LAYERED_PRESETS};
use infogen::config::{format_guidance, validate_with_illustrations, ConfigOverrides, InfographicConfig};
use infogen::resources::{IconSet, IllustrationLibrary};
use infogen::templates::{generate_data_prompt, generate_json_schema, TEMPLATE_INFO};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "infogen")]
#[command(about = "Generate brand-styled infographics as SVG or PNG")]
struct Cli {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Template name (overrides the config file)
    #[arg(long)]
    template: Option<String>,

    /// Infographic data as JSON
    #[arg(long)]
    data: Option<String>,

    /// Theme config as JSON
    #[arg(long)]
    theme: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Background preset, or `solid` to keep the rendered background
    #[arg(long)]
    background: Option<String>,

    /// Directory of illustration files
    #[arg(long)]
    illustrations: Option<PathBuf>,

    /// Directory of Lucide icon files
    #[arg(long)]
    icons: Option<PathBuf>,

    /// Diagram library bundle (also read from INFOGEN_RENDERER_SCRIPT)
    #[arg(long)]
    renderer_script: Option<PathBuf>,

    /// Output file; `.svg` writes SVG, anything else PNG
    #[arg(long, required_unless_present_any = [
        "list_templates", "list_backgrounds", "list_icons", "prompt", "schema", "validate"
    ])]
    output: Option<PathBuf>,

    /// Device pixel ratio for PNG output
    #[arg(long, default_value_t = 2.0)]
    dpr: f64,

    /// Print a JSON result line on stdout
    #[arg(long)]
    json: bool,

    /// List known templates
    #[arg(long)]
    list_templates: bool,

    /// List background presets
    #[arg(long)]
    list_backgrounds: bool,

    /// List icon names, optionally filtered
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    list_icons: Option<String>,

    /// Print a data prompt for a template
    #[arg(long, value_name = "TEMPLATE")]
    prompt: Option<String>,

    /// Print the data JSON schema for a template
    #[arg(long, value_name = "TEMPLATE")]
    schema: Option<String>,

    /// Check the config and illustrations without rendering
    #[arg(long)]
    validate: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            template: self.template.clone(),
            data: self.data.clone(),
            theme: self.theme.clone(),
            width: self.width,
            height: self.height,
            background: self.background.clone(),
            illustrations_dir: self.illustrations.clone(),
            icons_dir: self.icons.clone(),
            renderer_script: self.renderer_script.clone(),
        }
    }
}

fn init_logging(json: bool) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else if json {
        builder.filter_level(log::LevelFilter::Warn);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.init();
}

/// Informational flags. Returns `true` when one was handled.
fn run_info(cli: &Cli) -> anyhow::Result<bool> {
    if cli.list_templates {
        for (name, info) in TEMPLATE_INFO {
            let mut traits = vec![info.kind.to_string(), format!("{} items", info.default_items)];
            if info.has_illustrations {
                traits.push("illustrations".into());
            }
            if info.has_icons {
                traits.push("icons".into());
            }
            println!("{:<42} {}", name, traits.join(", "));
        }
        return Ok(true);
    }

    if cli.list_backgrounds {
        println!("Layered: {}", LAYERED_PRESETS.join(", "));
        println!("Simple:  {}", FLAT_PRESETS.join(", "));
        println!("Other:   solid");
        return Ok(true);
    }

    if let Some(filter) = &cli.list_icons {
        let icons = IconSet::new(cli.icons.clone());
        let names = if filter.is_empty() { icons.list() } else { icons.search(filter) };
        for name in names {
            println!("{}", name);
        }
        return Ok(true);
    }

    if let Some(template) = &cli.prompt {
        let assets = cli
            .illustrations
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "./assets/infographics".to_string());
        print!("{}", generate_data_prompt(template, None, &assets)?);
        return Ok(true);
    }

    if let Some(template) = &cli.schema {
        let schema = generate_json_schema(template)
            .ok_or_else(|| anyhow!("Unknown template: {}", template))?;
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(true);
    }

    if cli.validate {
        let config = InfographicConfig::load(cli.config.as_deref(), &cli.overrides())?;
        let library = IllustrationLibrary::new(config.illustrations_dir.clone());
        let report = validate_with_illustrations(&config, &library);
        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}", format_guidance(&report));
        }
        if !report.is_valid() {
            bail!("Validation failed with {} error(s)", report.errors.len());
        }
        return Ok(true);
    }

    Ok(false)
}

#[cfg(feature = "cdp")]
fn run_generate(cli: &Cli) -> anyhow::Result<infogen::GenerateResult> {
    let output = cli.output.as_ref().ok_or_else(|| anyhow!("--output is required"))?;
    let config = InfographicConfig::load(cli.config.as_deref(), &cli.overrides())?;
    if let Some(t) = config.template.as_deref() {
        if infogen::templates::template_info(t).is_none() {
            log::debug!("Template {} is not in the catalogue", t);
        }
    }
    let generator = infogen::Generator::with_chrome(&config);
    Ok(generator.generate(&config, output, cli.dpr)?)
}

#[cfg(not(feature = "cdp"))]
fn run_generate(_cli: &Cli) -> anyhow::Result<infogen::GenerateResult> {
    bail!("infogen was built without the `cdp` feature; rendering is unavailable")
}

/// Report an argument error the same way as any other failure.
///
/// Help and version requests are printed and succeed.
fn argument_failure(err: clap::Error) -> ExitCode {
    use clap::error::ErrorKind;

    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = err.print();
        return ExitCode::SUCCESS;
    }

    let err = infogen::Error::ConfigError(err.render().to_string().trim_end().to_string());
    eprintln!("Error: {}", err);
    if std::env::args().skip(1).any(|a| a == "--json") {
        println!("{}", serde_json::json!({"success": false, "error": err.to_string()}));
    }
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return argument_failure(err),
    };
    init_logging(cli.json);

    let outcome = run_info(&cli).and_then(|handled| {
        if handled {
            Ok(None)
        } else {
            run_generate(&cli).map(Some)
        }
    });

    match outcome {
        Ok(Some(result)) => {
            if cli.json {
                match serde_json::to_string(&result) {
                    Ok(line) => println!("{}", line),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if cli.json {
                println!("{}", serde_json::json!({"success": false, "error": format!("{:#}", e)}));
            }
            ExitCode::FAILURE
        }
    }
}
