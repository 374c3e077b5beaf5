use crate::config::{Config, apply_settings_overrides, load_config};
use crate::layout_dump::write_layout_dump;
use crate::parser::parse_flows;
use crate::render::{SvgSink, render_flows, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{LevelFilter, debug, info};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "sankey", version, about = "Sankey diagram layout and renderer")]
pub struct Args {
    /// Input file (JSON flow list or `from, to, value` lines) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (settings, layout constants, theme)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Also write the computed layout as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logger(&args.log_level);
    debug!(args:?; "Parsed arguments");
    execute(&args)
}

fn init_logger(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });
    let _ = env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .try_init();
}

pub fn execute(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;
    let parsed = parse_flows(&input)?;
    info!(flows = parsed.edges.len(); "Parsed input");

    if let Some(overrides) = &parsed.settings {
        apply_settings_overrides(&mut config.settings, overrides)?;
    }
    apply_canvas_args(&mut config, args);

    let mut sink = SvgSink::new();
    let layout = render_flows(
        &parsed.edges,
        &config.settings,
        &config.layout,
        &config.theme,
        &config.render,
        &mut sink,
    )?;
    let svg = sink.finish();

    if let Some(dump_path) = args.dump_layout.as_deref() {
        write_layout_dump(dump_path, &layout)?;
        info!(path:? = dump_path; "Layout dump written");
    }

    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => write_png(&svg, args.output.as_deref(), &config)?,
    }
    Ok(())
}

fn apply_canvas_args(config: &mut Config, args: &Args) {
    if let Some(width) = args.width {
        config.settings.width = width;
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.settings.height = height;
        config.render.height = height;
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: Option<&Path>, config: &Config) -> Result<()> {
    let output = output.ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
    crate::render::write_output_png(svg, output, &config.render, &config.theme)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: Option<&Path>, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sankey-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn renders_file_to_svg_and_dump() {
        let input = temp_path("input.txt");
        let output = temp_path("out.svg");
        let dump = temp_path("dump.json");
        std::fs::write(&input, "sankey\nA, B, 10\nB, C, 4\n").unwrap();

        let args = Args::parse_from([
            "sankey",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-w",
            "640",
            "--dumpLayout",
            dump.to_str().unwrap(),
        ]);
        execute(&args).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("width=\"640\""));
        let dump_json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&dump).unwrap()).unwrap();
        assert_eq!(dump_json["levels"], 3);
        assert_eq!(dump_json["width"], 640.0);

        for path in [input, output, dump] {
            let _ = std::fs::remove_file(path);
        }
    }

    #[test]
    fn message_settings_apply_before_cli_overrides() {
        let input = temp_path("message.json");
        let output = temp_path("message.svg");
        std::fs::write(
            &input,
            r#"{"data":[{"from":"a","to":"b","value":1}],"settings":{"width":300,"height":200}}"#,
        )
        .unwrap();
        let args = Args::parse_from([
            "sankey",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-H",
            "500",
        ]);
        execute(&args).unwrap();
        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("width=\"300\" height=\"500\""));
        let _ = std::fs::remove_file(input);
        let _ = std::fs::remove_file(output);
    }

    #[test]
    fn invalid_input_is_an_error() {
        let input = temp_path("bad.txt");
        std::fs::write(&input, "A, B, lots").unwrap();
        let args = Args::parse_from(["sankey", "-i", input.to_str().unwrap()]);
        assert!(execute(&args).is_err());
        let _ = std::fs::remove_file(input);
    }
}
