// SPDX-License-Identifier: MPL-2.0
//! Command-line crop: lays an image out at a display size, selects a
//! rectangle on it and writes the density-scaled crop.

use iced_core::{Point, Rectangle, Size};
use retouch_lens::config;
use retouch_lens::diagnostics::DiagnosticsCollector;
use retouch_lens::domain::editing::EditorTool;
use retouch_lens::editor::Session;
use retouch_lens::media::ImageBuffer;
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = "\
retouch_lens: crop an image as seen on a display

USAGE:
  retouch_lens [OPTIONS] --rect X,Y,W,H -o OUTPUT INPUT

OPTIONS:
  --display WxH         Rendered size of the image (default: natural size)
  --rect X,Y,W,H        Selection in rendered coordinates
  --density RATIO       Device pixel ratio of the display (default: from config)
  -o, --output PATH     Where to write the PNG result
  --config-dir PATH     Directory holding settings.toml
  --diagnostics PATH    Write a JSON diagnostics report
  -h, --help            Print this help
";

struct Args {
    input: PathBuf,
    output: PathBuf,
    display: Option<Size>,
    rect: Rectangle,
    density: Option<f32>,
    config_dir: Option<PathBuf>,
    diagnostics: Option<PathBuf>,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let parsed = Args {
        display: args.opt_value_from_fn("--display", parse_size)?,
        rect: args.value_from_fn("--rect", parse_rect)?,
        density: args.opt_value_from_str("--density")?,
        output: args.value_from_str(["-o", "--output"])?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        diagnostics: args.opt_value_from_str("--diagnostics")?,
        input: args.free_from_str()?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Warning: unused arguments left: {rest:?}");
    }
    Ok(Some(parsed))
}

fn parse_size(value: &str) -> Result<Size, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{value}'"))?;
    let number = |s: &str| s.trim().parse::<f32>().map_err(|e| format!("'{s}': {e}"));
    Ok(Size::new(number(w)?, number(h)?))
}

fn parse_rect(value: &str) -> Result<Rectangle, String> {
    let parts = value
        .split(',')
        .map(|s| s.trim().parse::<f32>().map_err(|e| format!("'{s}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts.as_slice() {
        &[x, y, width, height] => Ok(Rectangle::new(Point::new(x, y), Size::new(width, height))),
        _ => Err(format!("expected X,Y,W,H, got '{value}'")),
    }
}

fn run(args: Args) -> Result<(), String> {
    let (config, warning) = config::load_with_override(args.config_dir);
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }

    let mut collector = DiagnosticsCollector::new(config.buffer_capacity());
    let mut session = Session::new(&config).with_diagnostics(collector.handle());

    let image = ImageBuffer::from_path(&args.input).map_err(|e| e.to_string())?;
    let display = args
        .display
        .unwrap_or_else(|| Size::new(image.width() as f32, image.height() as f32));
    let density = args
        .density
        .unwrap_or_else(|| config.device_pixel_ratio().value());

    session.load(image);
    session.set_layout(display, density);
    session.select_tool(EditorTool::Crop);
    session.set_crop_selection(args.rect);
    let result = session.apply_crop().map_err(|e| e.to_string());

    if let Some(path) = &args.diagnostics {
        collector.process_pending();
        if let Err(e) = collector.export_to_file(path) {
            eprintln!("Warning: could not write diagnostics: {e}");
        }
    }
    result?;

    let cropped = session
        .current()
        .ok_or_else(|| "no image after crop".to_string())?;
    std::fs::write(&args.output, cropped.bytes()).map_err(|e| e.to_string())?;
    let (width, height) = cropped.dimensions();
    println!("{} ({width}x{height})", args.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {e}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
