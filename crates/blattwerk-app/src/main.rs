// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Blattwerk — PDF document-utility toolkit.
//
// Entry point. Initialises logging, parses the command line, and dispatches
// to the document operations. One subcommand per tool.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{
    AppConfig, ImagePlacement, OutputImageFormat, PaperSize, ProcessedFile, SplitRange, ToolKind,
};
use blattwerk_document::{PdfReader, PdfWriter, add_image_to_pdf, compress_pdf, extract_text};

#[derive(Parser)]
#[command(name = "blattwerk")]
#[command(version)]
#[command(about = "PDF document-utility toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ImageFormatArg {
    Png,
    Jpeg,
}

impl From<ImageFormatArg> for OutputImageFormat {
    fn from(value: ImageFormatArg) -> Self {
        match value {
            ImageFormatArg::Png => OutputImageFormat::Png,
            ImageFormatArg::Jpeg => OutputImageFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PaperArg> for PaperSize {
    fn from(value: PaperArg) -> Self {
        match value {
            PaperArg::A4 => PaperSize::A4,
            PaperArg::A3 => PaperSize::A3,
            PaperArg::A5 => PaperSize::A5,
            PaperArg::Letter => PaperSize::Letter,
            PaperArg::Legal => PaperSize::Legal,
            PaperArg::Tabloid => PaperSize::Tabloid,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Convert images into a single PDF, one page per image
    #[command(name = "image-to-pdf")]
    ImageToPdf {
        /// Input images (JPEG or PNG)
        #[arg(value_name = "IMAGE", required = true)]
        images: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long, default_value = "images.pdf")]
        output: PathBuf,

        /// Paper size
        #[arg(long, value_enum, default_value_t = PaperArg::A4)]
        paper: PaperArg,
    },

    /// Export each PDF page as an image (requires a build with the "raster" feature)
    #[command(name = "pdf-to-image")]
    PdfToImage {
        /// Input PDF file
        input: PathBuf,

        /// Output image format
        #[arg(long, value_enum, default_value_t = ImageFormatArg::Png)]
        format: ImageFormatArg,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Extract all text from a PDF
    #[command(name = "pdf-to-text")]
    PdfToText {
        /// Input PDF file
        input: PathBuf,

        /// Output text file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert plain text into a paginated PDF
    #[command(name = "text-to-pdf")]
    TextToPdf {
        /// Input text file
        input: PathBuf,

        /// Document title drawn on the first page
        #[arg(long, default_value = "Document")]
        title: String,

        /// Output PDF file (defaults to the input with a .pdf extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Paper size
        #[arg(long, value_enum, default_value_t = PaperArg::A4)]
        paper: PaperArg,
    },

    /// Split a PDF into named page ranges
    #[command(name = "split-pdf")]
    SplitPdf {
        /// Input PDF file
        input: PathBuf,

        /// Ranges as START-END[:NAME], e.g. "1-3:Intro" "4-9"
        #[arg(value_name = "RANGE", required = true)]
        ranges: Vec<String>,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Shrink a PDF: strip metadata, prune objects, compress streams
    #[command(name = "compress-pdf")]
    CompressPdf {
        /// Input PDF file
        input: PathBuf,

        /// Output PDF file (defaults to "<stem>_compressed.pdf")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Stamp an image onto a page of an existing PDF
    #[command(name = "add-image")]
    AddImage {
        /// Input PDF file
        input: PathBuf,

        /// Image to stamp (JPEG or PNG)
        image: PathBuf,

        /// Target page (1-indexed)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Left edge in points from the page's bottom-left corner
        #[arg(short, long, default_value_t = 50.0)]
        x: f32,

        /// Bottom edge in points from the page's bottom-left corner
        #[arg(short, long, default_value_t = 50.0)]
        y: f32,

        /// Drawn width in points
        #[arg(long, default_value_t = 200.0)]
        width: f32,

        /// Drawn height in points
        #[arg(long, default_value_t = 150.0)]
        height: f32,

        /// Output PDF file (defaults to "<stem>_stamped.pdf")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show page count and per-page dimensions
    #[command(name = "preview-pdf")]
    PreviewPdf {
        /// Input PDF file
        input: PathBuf,

        /// Emit machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write per-page PNG thumbnails next to the input (requires a
        /// build with the "raster" feature)
        #[arg(long)]
        thumbnails: bool,
    },
}

impl Command {
    fn tool(&self) -> ToolKind {
        match self {
            Self::ImageToPdf { .. } => ToolKind::ImageToPdf,
            Self::PdfToImage { .. } => ToolKind::PdfToImage,
            Self::PdfToText { .. } => ToolKind::PdfToText,
            Self::TextToPdf { .. } => ToolKind::TextToPdf,
            Self::SplitPdf { .. } => ToolKind::SplitPdf,
            Self::CompressPdf { .. } => ToolKind::CompressPdf,
            Self::AddImage { .. } => ToolKind::AddImage,
            Self::PreviewPdf { .. } => ToolKind::PreviewPdf,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.command) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    let config = AppConfig::default();
    info!(tool = command.tool().slug(), "Running tool");

    match command {
        Command::ImageToPdf {
            images,
            output,
            paper,
        } => {
            let mut writer = PdfWriter::new(paper.into());
            writer.set_title(file_stem(&output));

            let mut inputs = Vec::with_capacity(images.len());
            for path in &images {
                inputs.push(fs::read(path)?);
            }
            let bytes = writer.create_from_images(&inputs)?;

            let result = ProcessedFile::new(
                "image-to-pdf",
                output.display().to_string(),
                "application/pdf",
                bytes,
            );
            fs::write(&output, &result.data)?;
            report(&result);
        }

        Command::PdfToImage {
            input,
            format,
            output_dir,
        } => {
            let data = fs::read(&input)?;
            let outputs = rasterize_pages(
                &data,
                &file_stem(&input),
                format.into(),
                config.export_scale,
                config.jpeg_quality,
            )?;
            let dir = output_directory(&input, output_dir);
            for output in &outputs {
                fs::write(dir.join(&output.name), &output.data)?;
                report(output);
            }
        }

        Command::PdfToText { input, output } => {
            let data = fs::read(&input)?;
            let text = extract_text(&data)?;
            match output {
                Some(path) => {
                    fs::write(&path, &text)?;
                    println!("{} ({} chars)", path.display(), text.len());
                }
                None => print!("{text}"),
            }
        }

        Command::TextToPdf {
            input,
            title,
            output,
            paper,
        } => {
            let body = fs::read_to_string(&input)?;
            let mut writer = PdfWriter::new(paper.into());
            writer.set_title(title);
            let bytes = writer.create_from_text(&body)?;

            let path = output.unwrap_or_else(|| input.with_extension("pdf"));
            let result = ProcessedFile::new(
                "text-to-pdf",
                path.display().to_string(),
                "application/pdf",
                bytes,
            );
            fs::write(&path, &result.data)?;
            report(&result);
        }

        Command::SplitPdf {
            input,
            ranges,
            output_dir,
        } => {
            let parsed: Result<Vec<SplitRange>> = ranges
                .iter()
                .enumerate()
                .map(|(index, spec)| parse_range(spec, index + 1))
                .collect();

            let reader = PdfReader::open(&input)?;
            let outputs = reader.split_ranges(&parsed?)?;

            let dir = output_directory(&input, output_dir);
            for output in &outputs {
                fs::write(dir.join(&output.name), &output.data)?;
                report(output);
            }
        }

        Command::CompressPdf { input, output } => {
            let data = fs::read(&input)?;
            let bytes = compress_pdf(&data, &config.producer)?;

            let path = output.unwrap_or_else(|| suffixed(&input, "_compressed"));
            let result = ProcessedFile::new(
                "compress-pdf",
                path.display().to_string(),
                "application/pdf",
                bytes,
            );
            fs::write(&path, &result.data)?;
            println!(
                "{} ({} -> {} bytes)",
                path.display(),
                data.len(),
                result.size
            );
        }

        Command::AddImage {
            input,
            image,
            page,
            x,
            y,
            width,
            height,
            output,
        } => {
            let pdf_data = fs::read(&input)?;
            let image_data = fs::read(&image)?;
            let placement = ImagePlacement {
                x,
                y,
                width,
                height,
                page,
            };
            let bytes = add_image_to_pdf(&pdf_data, &image_data, placement)?;

            let path = output.unwrap_or_else(|| suffixed(&input, "_stamped"));
            let result = ProcessedFile::new(
                "add-image",
                path.display().to_string(),
                "application/pdf",
                bytes,
            );
            fs::write(&path, &result.data)?;
            report(&result);
        }

        Command::PreviewPdf {
            input,
            json,
            thumbnails,
        } => {
            let reader = PdfReader::open(&input)?;
            let infos = reader.page_infos();
            if json {
                println!("{}", serde_json::to_string_pretty(&infos)?);
            } else {
                println!("{}: {} pages", input.display(), reader.page_count());
                for info in &infos {
                    println!(
                        "  page {:>3}  {:.1} x {:.1} pt",
                        info.page_number, info.width, info.height
                    );
                }
            }

            if thumbnails {
                let data = fs::read(&input)?;
                let stem = format!("{}_thumb", file_stem(&input));
                let outputs = rasterize_pages(
                    &data,
                    &stem,
                    OutputImageFormat::Png,
                    config.preview_scale,
                    config.jpeg_quality,
                )?;
                let dir = output_directory(&input, None);
                for output in &outputs {
                    fs::write(dir.join(&output.name), &output.data)?;
                    report(output);
                }
            }
        }
    }

    Ok(())
}

/// Parse a "START-END[:NAME]" or "PAGE[:NAME]" range spec.
fn parse_range(spec: &str, ordinal: usize) -> Result<SplitRange> {
    let (pages, name) = match spec.split_once(':') {
        Some((pages, name)) if !name.is_empty() => (pages, name.to_string()),
        Some((pages, _)) => (pages, format!("Part {ordinal}")),
        None => (spec, format!("Part {ordinal}")),
    };

    let (start, end) = match pages.split_once('-') {
        Some((start, end)) => (parse_page(start, spec)?, parse_page(end, spec)?),
        None => {
            let page = parse_page(pages, spec)?;
            (page, page)
        }
    };

    Ok(SplitRange::new(start, end, name))
}

fn parse_page(text: &str, spec: &str) -> Result<u32> {
    text.trim().parse().map_err(|_| {
        BlattwerkError::InvalidRange(format!(
            "\"{spec}\": expected START-END[:NAME], e.g. \"1-3:Intro\""
        ))
    })
}

#[cfg(feature = "raster")]
fn rasterize_pages(
    data: &[u8],
    stem: &str,
    format: OutputImageFormat,
    scale: f32,
    jpeg_quality: u8,
) -> Result<Vec<ProcessedFile>> {
    let rasterizer = blattwerk_document::Rasterizer::new()?;
    rasterizer.export_pages(data, stem, format, scale, jpeg_quality)
}

#[cfg(not(feature = "raster"))]
fn rasterize_pages(
    _data: &[u8],
    _stem: &str,
    _format: OutputImageFormat,
    _scale: f32,
    _jpeg_quality: u8,
) -> Result<Vec<ProcessedFile>> {
    Err(BlattwerkError::RasterUnavailable)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    path.with_file_name(format!("{}{}.pdf", file_stem(path), suffix))
}

fn output_directory(input: &Path, explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn report(file: &ProcessedFile) {
    println!("{} ({} bytes, sha256 {})", file.name, file.size, &file.sha256[..12]);
}
