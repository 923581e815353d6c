//! Render a markup scene onto a page image
//!
//! Reads a JSON array of drawing objects, draws them over a page raster (or
//! a blank page) and writes the result as PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use pagemark::config::MarkupConfig;
use pagemark::domain::{DrawingObject, ImageData, Shape};
use pagemark::render::{GlyphPainter, PageRenderer, Surface};
use pagemark::store::{MemoryStore, ObjectStore, Viewport};

const PAGE: usize = 0;

/// pagemark CLI arguments
///
/// Examples:
///   pagemark scene.json out.png
///   pagemark scene.json out.png --page scan.png --font NotoSansJP.ttf
///   pagemark scene.json out.png --select 0,2 --viewport 0,0,400,300
#[derive(Parser, Debug)]
#[clap(name = "pagemark", version, about = "Draw vector markup over a page image")]
struct Args {
    /// JSON array of drawing objects
    scene: PathBuf,

    /// Output PNG
    output: PathBuf,

    /// Page raster to draw on; a white page is used otherwise
    #[clap(long, short = 'p')]
    page: Option<PathBuf>,

    /// Size of the blank page when no raster is given
    #[clap(long, default_value_t = 800)]
    width: u32,

    #[clap(long, default_value_t = 1000)]
    height: u32,

    /// Font for captions, labels and stamps; overrides the config file
    #[clap(long, short = 'f')]
    font: Option<PathBuf>,

    /// Config file; the per-user config is used otherwise
    #[clap(long, short = 'c')]
    config: Option<PathBuf>,

    /// Object indices to draw selection chrome for
    #[clap(long, value_delimiter = ',')]
    select: Vec<usize>,

    /// Visible area as x,y,width,height; enables culling against it
    #[clap(long, value_delimiter = ',')]
    viewport: Option<Vec<f32>>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MarkupConfig::load_from(path)?,
        None => MarkupConfig::load(),
    };

    let mut objects = read_scene(&args.scene)?;
    let base = args.scene.parent().unwrap_or_else(|| Path::new("."));
    for obj in &mut objects {
        attach_image(obj, base);
    }

    let mut store = MemoryStore::new();
    store.load_page(PAGE, objects);
    store.set_selected_indices(PAGE, args.select.clone());

    let mut surface = match &args.page {
        Some(path) => {
            let img = image::open(path)
                .with_context(|| format!("Failed to open page image: {}", path.display()))?
                .to_rgba8();
            Surface::from_image(&img).context("Page image has no pixels")?
        }
        None => {
            let Some(mut surface) = Surface::new(args.width, args.height) else {
                bail!("Blank page must not be empty: {}x{}", args.width, args.height);
            };
            surface.fill_color(pagemark::domain::Color::WHITE);
            surface
        }
    };

    let mut renderer = PageRenderer::new(config.culling);
    let preferred = args.font.as_deref().or(config.font_path.as_deref());
    if let Some(glyphs) = GlyphPainter::resolve(preferred) {
        renderer = renderer.with_glyphs(glyphs);
    }
    if let Some(v) = &args.viewport {
        if v.len() != 4 {
            bail!("Viewport needs x,y,width,height; got {} values", v.len());
        }
        renderer.set_viewport(Some(Viewport::new(v[2], v[3]).scrolled(v[0], v[1])));
    }

    let stats = renderer.render_page(&mut surface, &store, PAGE, 0.0);
    log::info!(
        "Rendered {}: {} drawn, {} culled, {} composited",
        args.scene.display(),
        stats.drawn,
        stats.culled,
        stats.composited
    );

    surface
        .to_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write output image: {}", args.output.display()))?;
    Ok(())
}

fn read_scene(path: &Path) -> Result<Vec<DrawingObject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scene file: {}", path.display()))
}

/// Decode the raster an image placement refers to, relative to the scene
fn attach_image(obj: &mut DrawingObject, base: &Path) {
    let Shape::Image(placement) = &mut obj.shape else {
        return;
    };
    let Some(source) = placement.source.as_deref() else {
        return;
    };
    let path = base.join(source);
    let decoded = image::open(&path)
        .map_err(anyhow::Error::from)
        .and_then(|img| Surface::from_image(&img.to_rgba8()).context("empty image"));
    match decoded {
        Ok(surface) => placement.pixels = Some(ImageData(surface.into_pixmap().into())),
        Err(e) => log::warn!("Skipping image {}: {}", path.display(), e),
    }
}
