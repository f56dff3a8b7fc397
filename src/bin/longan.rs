//! longan - OpenDocument text converter

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use longan::convert::{make_converter, OutputFormat};
use longan::office::TextDocument;
use longan::postprocess::{CommandTexRunner, TexRunner};
use longan::{Error, Result};

#[derive(Parser)]
#[command(name = "longan")]
#[command(version, about = "OpenDocument text converter", long_about = None)]
#[command(after_help = "EXAMPLES:
    longan thesis.fodt out            Convert to LaTeX in out/
    longan -f xhtml manual.fodt site  Convert to XHTML
    longan -f epub -o split_level=1 book.fodt pages
    longan -c *clean article.fodt .   Convert with the *clean built-in
    longan -i thesis.fodt             Show document metadata")]
struct Cli {
    /// Input file (flat ODF text, .fodt)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Output format: latex, bibtex, xhtml or epub
    #[arg(short, long, default_value = "latex", value_parser = parse_format)]
    format: OutputFormat,

    /// Configuration file, or a built-in like *clean; repeatable
    #[arg(short, long, value_name = "FILE")]
    config: Vec<String>,

    /// Single configuration option as key=value; repeatable
    #[arg(short, long, value_name = "KEY=VALUE")]
    option: Vec<String>,

    /// Page template file (XHTML output only)
    #[arg(short, long, value_name = "FILE")]
    template: Option<String>,

    /// Run the TeX toolchain on the produced master (LaTeX output only)
    #[arg(short, long)]
    run: bool,

    /// Show document metadata as JSON without converting
    #[arg(short, long)]
    info: bool,

    /// Suppress progress messages
    #[arg(short, long)]
    quiet: bool,
}

fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    OutputFormat::parse(s)
        .ok_or_else(|| format!("unknown format '{s}' (expected latex, bibtex, xhtml or epub)"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let document = TextDocument::open(&cli.input)?;

    if cli.info {
        let json = serde_json::to_string_pretty(document.meta())
            .map_err(|e| Error::Other(e.to_string()))?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    let name = cli
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let out_dir = match &cli.output {
        Some(dir) => dir.clone(),
        None => cli
            .input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    // A config or template that cannot be loaded is reported, not fatal;
    // the conversion proceeds with what is applied so far
    let mut converter = make_converter(cli.format)?;
    for config in &cli.config {
        if let Err(e) = converter.apply_option("ConfigURL", config) {
            eprintln!("warning: configuration '{config}' was not applied: {e}");
        }
    }
    for option in &cli.option {
        let (key, value) = option
            .split_once('=')
            .ok_or_else(|| Error::Config(format!("expected key=value, got '{option}'")))?;
        if let Err(e) = converter.apply_option(key, value) {
            eprintln!("warning: option '{key}' was not applied: {e}");
        }
    }
    if let Some(template) = &cli.template {
        if let Err(e) = converter.apply_option("TemplateURL", template) {
            eprintln!("warning: template '{template}' was not applied: {e}");
        }
    }

    let result = converter.convert(&document, &name)?;
    let paths = result.write_all(&out_dir)?;

    if !cli.quiet {
        for path in &paths {
            println!("{}", path.display());
        }
    }
    for diagnostic in result.diagnostics().entries.iter() {
        eprintln!("{diagnostic}");
    }

    if cli.run {
        if cli.format != OutputFormat::Latex {
            eprintln!("warning: --run applies to LaTeX output only");
        } else if let Some(master) = result.master() {
            let report = CommandTexRunner.run(
                &out_dir.join(master.name()),
                converter.config().backend(),
            );
            if !report.success {
                eprintln!("{}", report.log);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if result.diagnostics().has_errors() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
