use anyhow::{bail, Context, Result};
use bitfont::{
    inspect::inspect,
    quantize,
    render::render_text,
    source::{write_bitmap_source, write_font_source},
    truetype::{RasterizeOptions, TrueTypeSource},
    FontBlock, FontExporter, FontFormat, NativePixelFormat, Palette, UnicodeBlock, UNICODE_BLOCKS,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info};
use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::{job::FontJob, preview::render_preview};
mod job;
mod preview;

#[derive(Parser)]
#[command(name = "bitfont", about = "Bitmap and font table toolkit for embedded displays")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Adafruit,
    TcUnicode,
}

impl From<FormatArg> for FontFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Adafruit => FontFormat::Adafruit,
            FormatArg::TcUnicode => FontFormat::TcUnicode,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PixelArg {
    Mono,
    Xbm,
    #[value(name = "2bpp")]
    Palette2,
    #[value(name = "4bpp")]
    Palette4,
}

impl From<PixelArg> for NativePixelFormat {
    fn from(value: PixelArg) -> Self {
        match value {
            PixelArg::Mono => NativePixelFormat::MonoBitmap,
            PixelArg::Xbm => NativePixelFormat::XbmLsbFirst,
            PixelArg::Palette2 => NativePixelFormat::Palette2Bpp,
            PixelArg::Palette4 => NativePixelFormat::Palette4Bpp,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Rasterize a TrueType/OpenType font into a font table
    Font {
        /// TOML job file; command line flags override its values
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        font: Option<PathBuf>,
        /// Pixel size
        #[arg(short, long)]
        size: Option<f32>,
        /// Coverage needed for a pixel to be set (0.0 - 1.0)
        #[arg(long)]
        threshold: Option<f32>,
        /// Unicode blocks to include, see `bitfont blocks`
        #[arg(short, long, value_delimiter = ',')]
        blocks: Vec<String>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Name of the C declarations
        #[arg(short, long)]
        name: Option<String>,
        /// Line height; derived from the glyphs when omitted
        #[arg(long)]
        y_advance: Option<u8>,
        /// Write C source instead of the binary table
        #[arg(long)]
        c_source: bool,
    },
    /// Convert an image into a native bitmap as C source
    Bitmap {
        #[arg(short, long)]
        input: PathBuf,
        /// Output file, stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "mono")]
        format: PixelArg,
        /// Percentage of the color range that still snaps to background
        #[arg(long, default_value = "10")]
        tolerance: f64,
        /// Treat transparent pixels as background
        #[arg(long)]
        alpha: bool,
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Summarize an exported binary font table
    Inspect {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long, value_enum, default_value = "adafruit")]
        format: FormatArg,
    },
    /// Print a line of text rendered with a font
    Preview {
        #[arg(short, long)]
        font: PathBuf,
        #[arg(short, long, default_value = "12")]
        size: f32,
        #[arg(long, default_value = "0.5")]
        threshold: f32,
        #[arg(short, long)]
        text: String,
    },
    /// List known Unicode blocks
    Blocks,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "font".into())
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

#[allow(clippy::too_many_arguments)]
fn run_font(
    config: Option<PathBuf>,
    font: Option<PathBuf>,
    size: Option<f32>,
    threshold: Option<f32>,
    blocks: Vec<String>,
    format: Option<FormatArg>,
    output: Option<PathBuf>,
    name: Option<String>,
    y_advance: Option<u8>,
    c_source: bool,
) -> Result<()> {
    let job = match &config {
        Some(path) => FontJob::load(path)?,
        None => FontJob::default(),
    };
    let font = font.or(job.font).context("no font given (--font or `font` in the job file)")?;
    let output = output
        .or(job.output)
        .context("no output given (--output or `output` in the job file)")?;
    let format = match (format, job.format.as_deref()) {
        (Some(f), _) => f,
        (None, Some(s)) => FormatArg::from_str(s, true)
            .map_err(|e| anyhow::anyhow!("invalid format {s:?} in job file: {e}"))?,
        (None, None) => FormatArg::Adafruit,
    };
    let blocks = if !blocks.is_empty() {
        blocks
    } else if !job.blocks.is_empty() {
        job.blocks
    } else {
        vec!["basic-latin".to_string()]
    };
    let defaults = RasterizeOptions::default();
    let options = RasterizeOptions {
        pixel_size: size.or(job.size).unwrap_or(defaults.pixel_size),
        coverage_threshold: threshold.or(job.threshold).unwrap_or(defaults.coverage_threshold),
    };
    let name = name
        .or(job.name)
        .unwrap_or_else(|| format!("{}{}", file_stem(&font), options.pixel_size.round()));
    let y_advance = y_advance.or(job.y_advance);
    let c_source = c_source || job.c_source;

    let source = TrueTypeSource::load(&font, options)
        .with_context(|| format!("loading font {}", font.display()))?;
    let mut font_blocks = Vec::with_capacity(blocks.len());
    for block_name in &blocks {
        let Some(block) = UnicodeBlock::find(block_name) else {
            bail!("unknown Unicode block {block_name:?}, see `bitfont blocks`");
        };
        let collected = FontBlock::collect(&source, &block);
        info!("{}: {} glyphs", collected.name, collected.glyph_count());
        font_blocks.push(collected);
    }

    let font_format = FontFormat::from(format);
    let mut sink = open_output(Some(&output))?;
    if c_source {
        write_font_source(&font_blocks, font_format, &name, y_advance, &mut sink)?;
    } else {
        let mut exporter = FontExporter::new(font_format);
        if let Some(y) = y_advance {
            exporter = exporter.with_y_advance(y);
        }
        exporter.export(&font_blocks, &mut sink)?;
    }
    sink.flush()?;

    let glyphs: usize = font_blocks.iter().map(FontBlock::glyph_count).sum();
    eprintln!(
        "Exported {glyphs} glyphs from {} ({font_format:?}) -> {}",
        font.display(),
        output.display()
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Cmd::Font {
            config,
            font,
            size,
            threshold,
            blocks,
            format,
            output,
            name,
            y_advance,
            c_source,
        } => run_font(
            config, font, size, threshold, blocks, format, output, name, y_advance, c_source,
        )?,
        Cmd::Bitmap {
            input,
            output,
            format,
            tolerance,
            alpha,
            name,
        } => {
            let image = image::open(&input)
                .with_context(|| format!("opening image {}", input.display()))?
                .to_rgba8();
            let format = NativePixelFormat::from(format);
            let palette = if format.has_palette() {
                Palette::grey(format.depth())
            } else {
                Palette::mono()
            };
            debug!("quantizing {} with {palette:?}", input.display());
            let raster = quantize(&image, format, &palette, tolerance, alpha)?;
            let name = name.unwrap_or_else(|| file_stem(&input));
            let mut sink = open_output(output.as_deref())?;
            write_bitmap_source(&raster, &palette, &name, &mut sink)?;
            sink.flush()?;
        }
        Cmd::Inspect { input, format } => {
            let bytes = fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let summary = inspect(&bytes, format.into())?;
            println!("{:?} font table: {}", summary.format, input.display());
            println!("  Line height: {}", summary.y_advance);
            println!("  Defined glyphs: {}", summary.glyph_count());
            if let Some((first, last)) = summary.index_range {
                println!("  Index: U+{first:04X}..U+{last:04X}");
            }
            for block in &summary.blocks {
                println!(
                    "  Block U+{:04X}..U+{:04X}: {} glyphs",
                    block.start, block.end, block.glyph_count
                );
            }
        }
        Cmd::Preview {
            font,
            size,
            threshold,
            text,
        } => {
            let options = RasterizeOptions {
                pixel_size: size,
                coverage_threshold: threshold,
            };
            let source = TrueTypeSource::load(&font, options)
                .with_context(|| format!("loading font {}", font.display()))?;
            let raster = render_text(&source, &text)?;
            println!("{}", render_preview(&raster, &text));
        }
        Cmd::Blocks => {
            for block in UNICODE_BLOCKS {
                println!(
                    "U+{:04X}..U+{:04X}  {:<28} {}",
                    block.start,
                    block.end,
                    block.slug(),
                    block.name
                );
            }
        }
    }
    Ok(())
}
