//! Command line shell around the Void typeface engine: renders glyphs to
//! SVG or PNG, edits the persisted glyph library and exports the resolved
//! alphabet.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use flexi_logger::Logger;
use void_engine::{
    glyph_scene, GlyphLibrary, Glyph, GridLayout, RasterExport, RenderMethod, RenderOptions, StrokeMode, SvgExport,
    Variant, WobblyEffect, Color, GRID_SIZE,
};

const PROJECT_QUALIFIER: &str = "com";
const PROJECT_ORGANIZATION: &str = "GitHub";
const PROJECT_APPLICATION: &str = "void_draw";

/// File name of the persisted glyph library.
const LIBRARY_FILE: &str = "glyphs.json";

#[derive(Parser)]
#[command(name = "void_draw", about = "Render and edit Void typeface glyphs.", version)]
struct Cli {
    /// Path of the glyph library file (default: the per-user data
    /// directory).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Render a glyph to SVG or PNG")]
    Render {
        /// Character to render (looked up in the library).
        character: Option<char>,

        /// Render an explicit glyph code instead of a character.
        #[arg(long, conflicts_with = "character")]
        code: Option<String>,

        /// Alternate index instead of the base form.
        #[arg(long)]
        alt: Option<usize>,

        /// Output file; the extension selects the backend (.svg or .png).
        #[arg(long, default_value = "glyph.svg")]
        out: PathBuf,

        /// Output surface size in pixels (square).
        #[arg(long, default_value_t = 512)]
        size: u32,

        #[command(flatten)]
        style: StyleArgs,

        #[command(flatten)]
        wobble: WobbleArgs,
    },

    #[command(about = "List all characters and their variants")]
    Chars,

    #[command(about = "Store an edited glyph for a character")]
    Set {
        character: char,
        /// 50-character glyph code (spaces allowed).
        code: String,
        /// Edit an alternate instead of the base form.
        #[arg(long)]
        alt: Option<usize>,
    },

    #[command(about = "Delete an edited glyph, reverting to the built-in form")]
    Remove {
        character: char,
        #[arg(long)]
        alt: Option<usize>,
    },

    #[command(about = "Export the resolved alphabet (overrides applied) as JSON")]
    Export {
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct StyleArgs {
    /// Stroke thickness as a fraction of the cell size.
    #[arg(long, default_value_t = 0.5)]
    stem: f64,

    #[arg(long, value_enum, default_value_t = MethodArg::Fill)]
    method: MethodArg,

    #[arg(long, value_enum, default_value_t = ModeArg::Solid)]
    mode: ModeArg,

    /// Number of sub-strokes in stripes mode.
    #[arg(long, default_value_t = 3)]
    strokes: u32,

    /// Sub-stroke width relative to the gap between sub-strokes.
    #[arg(long, default_value_t = 2.0)]
    ratio: f64,

    /// Corner rounding of plain bars (fill method), in cell units.
    #[arg(long, default_value_t = 0.0)]
    corner_radius: f64,
}

#[derive(clap::Args)]
struct WobbleArgs {
    /// Perturb the geometry with coherent noise.
    #[arg(long)]
    wobble: bool,

    /// Noise seed; the same seed reproduces the same output.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum displacement in pixels.
    #[arg(long, default_value_t = 2.0)]
    amplitude: f64,

    /// Noise frequency in 1/pixels.
    #[arg(long, default_value_t = 0.02)]
    frequency: f64,

    /// Densification threshold in pixels.
    #[arg(long, default_value_t = 4.0)]
    detail: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Fill,
    Stroke,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Solid,
    Stripes,
}

impl StyleArgs {
    fn to_options(&self) -> RenderOptions {
        RenderOptions {
            mode: match self.mode {
                ModeArg::Solid => StrokeMode::Solid,
                ModeArg::Stripes => StrokeMode::Stripes,
            },
            strokes_num: self.strokes,
            stroke_gap_ratio: self.ratio,
            corner_radius: self.corner_radius,
            render_method: match self.method {
                MethodArg::Fill => RenderMethod::Fill,
                MethodArg::Stroke => RenderMethod::Stroke,
            },
            stem: self.stem,
        }
    }
}

impl WobbleArgs {
    fn to_effect(&self) -> Option<WobblyEffect> {
        if !self.wobble {
            return None;
        }
        let mut effect = WobblyEffect::new(self.seed);
        effect.amplitude = self.amplitude;
        effect.frequency = self.frequency;
        effect.detail = self.detail;
        Some(effect)
    }
}

fn library_path(cli_store: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli_store {
        return Ok(path.to_path_buf());
    }
    let dirs = directories::ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
        .context("could not determine a data directory; pass --store")?;
    Ok(dirs.data_dir().join(LIBRARY_FILE))
}

fn main() -> anyhow::Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;
    let cli = Cli::parse();

    let store = library_path(cli.store.as_deref())?;
    let mut library = GlyphLibrary::load(&store)?;

    match cli.command {
        Command::Render {
            character,
            code,
            alt,
            out,
            size,
            style,
            wobble,
        } => {
            let variant = alt.map_or(Variant::Base, Variant::Alt);
            let code = match (code, character) {
                (Some(code), _) => code,
                (None, Some(ch)) => library
                    .resolve(ch, variant)
                    .with_context(|| format!("no {variant} glyph for '{ch}'"))?
                    .into_owned(),
                (None, None) => bail!("pass a character or --code"),
            };
            let glyph = Glyph::from_code(&code)?;
            render(&glyph, size, &style.to_options(), wobble.to_effect().as_ref(), &out)?;
            log::info!("wrote {}", out.display());
        }
        Command::Chars => {
            for ch in library.chars() {
                let variants: Vec<String> = library
                    .variants(ch)
                    .into_iter()
                    .map(|variant| {
                        let marker = if library.has_override(ch, variant) { "*" } else { "" };
                        format!("{variant}{marker}")
                    })
                    .collect();
                println!("{ch}  {}", variants.join(", "));
            }
        }
        Command::Set { character, code, alt } => {
            let variant = alt.map_or(Variant::Base, Variant::Alt);
            library.set_override(character, variant, &code)?;
            println!("stored {variant} glyph for '{character}'");
        }
        Command::Remove { character, alt } => {
            let variant = alt.map_or(Variant::Base, Variant::Alt);
            if library.remove_override(character, variant)? {
                match library.resolve(character, variant) {
                    Some(_) => println!("reverted '{character}' ({variant}) to the built-in form"),
                    None => println!("removed '{character}' ({variant})"),
                }
            } else {
                println!("no edited {variant} glyph for '{character}'");
            }
        }
        Command::Export { out } => {
            let resolved = library.resolved();
            let json = serde_json::to_string_pretty(&resolved)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("wrote {}", path.display());
                }
                None => println!("{json}"),
            }
        }
    }
    Ok(())
}

fn render(glyph: &Glyph, size: u32, options: &RenderOptions, effect: Option<&WobblyEffect>, out: &Path) -> anyhow::Result<()> {
    let surface = f64::from(size);
    let layout = GridLayout::new(surface, surface);
    let scene = glyph_scene(glyph, &layout, options, Color::BLACK);
    if scene.is_empty() {
        log::warn!("glyph is empty; output will contain no shapes");
    }
    log::debug!("{} draw ops over a {}x{} grid", scene.len(), GRID_SIZE, GRID_SIZE);

    match out.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("svg") => {
            let svg = SvgExport::new(surface, surface).render(&scene, effect);
            std::fs::write(out, svg)?;
        }
        Some("png") => {
            let exporter = RasterExport::new(size, size);
            exporter.write_png(&scene, effect, out)?;
        }
        other => bail!("unsupported output format: {:?} (use .svg or .png)", other.unwrap_or("")),
    }
    Ok(())
}
