//! Render a single node kind to a PNG file.

use std::path::PathBuf;

use clap::Args;
use texgraph_core::{ColorRaster, Connection, DataKind, RasterSize, Rgba};
use texgraph_nodes::TextureOutput;
use texgraph_nodes::color::lerp_u8;
use texgraph_registry::{builtin_evaluator, input_port_by_name};

use super::common::{load_settings, parse_key_val, parse_literal};

#[derive(Args)]
pub struct RenderArgs {
    /// Node kind to render (see `texgraph kinds`)
    #[arg(value_name = "KIND")]
    kind: String,

    /// Input port values (e.g., "scale=9", "color=#ff8000")
    #[arg(long = "set", value_parser = parse_key_val, number_of_values = 1)]
    set: Vec<(String, String)>,

    /// Output port to render (default: first port viewable as color)
    #[arg(long)]
    port: Option<String>,

    /// Raster size as WIDTHxHEIGHT (default: from settings)
    #[arg(short, long)]
    size: Option<RasterSize>,

    /// Output PNG file
    #[arg(short, long, default_value = "texture.png")]
    output: PathBuf,

    /// Keep transparency instead of compositing over the canvas background
    #[arg(long)]
    keep_alpha: bool,

    /// Settings file (default: user settings)
    #[arg(long)]
    settings: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let (settings, _) = load_settings(args.settings.as_deref())?;
    let size = args.size.unwrap_or_else(|| settings.canvas.default_size());
    if size.is_empty() {
        anyhow::bail!("Raster size {} has a zero dimension", size);
    }

    let mut graph = builtin_evaluator();
    let node = graph.try_add_node(&args.kind)?;

    for (name, text) in &args.set {
        let port = input_port_by_name(graph.catalog(), &args.kind, name).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown port '{}' for '{}'. Use 'texgraph kinds {}' to list ports.",
                name,
                args.kind,
                args.kind
            )
        })?;
        let declaration = graph
            .node(node)
            .and_then(|n| n.ports().input(port))
            .ok_or_else(|| anyhow::anyhow!("Unknown port '{}'", name))?;
        let literal = parse_literal(declaration, text)?;
        if !graph.set_node_input_value(node, port, literal) {
            anyhow::bail!("Value '{}' does not fit port '{}'", text, port);
        }
        tracing::debug!("render: {}.{} = {}", args.kind, port, text);
    }

    let source_port = {
        let outputs = graph
            .node(node)
            .map(|n| n.ports().outputs().to_vec())
            .unwrap_or_default();
        let chosen = match &args.port {
            Some(name) => outputs
                .iter()
                .find(|p| p.id == name.as_str() || p.id.strip_prefix("out_") == Some(name.as_str()))
                .ok_or_else(|| anyhow::anyhow!("Unknown output port '{}'", name))?,
            None => outputs
                .iter()
                .find(|p| p.kind == DataKind::Color)
                .or_else(|| outputs.iter().find(|p| p.kind.converts_to(DataKind::Color)))
                .ok_or_else(|| anyhow::anyhow!("'{}' has no output viewable as color", args.kind))?,
        };
        chosen.id
    };

    let sink = graph.try_add_node(TextureOutput::KIND)?;
    graph.add_connection(Connection::new(node, source_port, sink, "in_color"))?;

    tracing::info!("Rendering {}.{} at {}", args.kind, source_port, size);
    let texture = graph.evaluate_final_output(size)?;

    let pixels = if args.keep_alpha {
        texture.to_rgba8_bytes()
    } else {
        composite_over(&texture, settings.canvas.background).to_rgba8_bytes()
    };
    let image = image::RgbaImage::from_raw(size.width, size.height, pixels)
        .ok_or_else(|| anyhow::anyhow!("Raster does not match {}", size))?;
    image.save(&args.output)?;

    println!("Wrote {} ({})", args.output.display(), size);
    Ok(())
}

/// Flattens `texture` onto an opaque `background`.
fn composite_over(texture: &ColorRaster, background: Rgba) -> ColorRaster {
    texture.map(|p| {
        let t = f32::from(p.a) / 255.0;
        Rgba::rgb(
            lerp_u8(background.r, p.r, t),
            lerp_u8(background.g, p.g, t),
            lerp_u8(background.b, p.b, t),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_over_background() {
        let size = RasterSize::new(3, 1);
        let texture = ColorRaster::from_pixels(
            size,
            vec![Rgba::TRANSPARENT, Rgba::rgb(10, 20, 30), Rgba::new(0, 0, 0, 128)],
        )
        .unwrap();

        let flat = composite_over(&texture, Rgba::WHITE);
        assert_eq!(flat.get(0, 0), Some(Rgba::WHITE));
        assert_eq!(flat.get(1, 0), Some(Rgba::rgb(10, 20, 30)));
        let half = flat.get(2, 0).unwrap();
        assert_eq!(half.a, 255);
        assert!((126..=128).contains(&half.r), "{half:?}");
    }
}
