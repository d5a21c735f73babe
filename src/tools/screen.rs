//! Screen query and capture tools
//!
//! Captures come back from the provider as in-memory bitmaps and are encoded
//! here: PNG bytes, base64 text, with `format` and `encoding` tags so the
//! text-oriented envelope never carries raw binary.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageEncoder, RgbaImage};
use serde_json::{Value, json};

use super::display_arg;
use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::{CapabilityProvider, Geometry};

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("screen_get_size", "Get screen size")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        screen_get_size,
    );
    registry.register(
        ToolDescriptor::new("screen_get_displays_num", "Get number of displays/monitors"),
        screen_get_displays_num,
    );
    registry.register(
        ToolDescriptor::new("screen_get_display_bounds", "Get display bounds (x, y, width, height)")
            .required(ParamKind::Integer, "display_id", "Display ID"),
        screen_get_display_bounds,
    );
    registry.register(
        ToolDescriptor::new("screen_capture", "Capture screenshot (returns base64 PNG)")
            .optional(ParamKind::Integer, "x", "X coordinate (optional)")
            .optional(ParamKind::Integer, "y", "Y coordinate (optional)")
            .optional(ParamKind::Integer, "width", "Width (optional)")
            .optional(ParamKind::Integer, "height", "Height (optional)")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        screen_capture,
    );
    registry.register(
        ToolDescriptor::new("screen_capture_save", "Capture screenshot and save to file")
            .required(ParamKind::String, "path", "File path to save screenshot")
            .optional(ParamKind::Integer, "x", "X coordinate (optional)")
            .optional(ParamKind::Integer, "y", "Y coordinate (optional)")
            .optional(ParamKind::Integer, "width", "Width (optional)")
            .optional(ParamKind::Integer, "height", "Height (optional)"),
        screen_capture_save,
    );
    registry.register(
        ToolDescriptor::new("screen_get_pixel_color", "Get pixel color at position")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        screen_get_pixel_color,
    );
    registry.register(
        ToolDescriptor::new("screen_get_mouse_color", "Get pixel color at current mouse position")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        screen_get_mouse_color,
    );
}

/// A sub-region is requested only when all four bounds are usable; otherwise
/// the whole screen is captured. -1 sentinels mean "not supplied".
fn region_args(args: &Args) -> Option<Geometry> {
    let x = args.optional_i64("x", -1);
    let y = args.optional_i64("y", -1);
    let width = args.optional_i64("width", -1);
    let height = args.optional_i64("height", -1);

    (x >= 0 && y >= 0 && width > 0 && height > 0).then(|| Geometry {
        x: x as i32,
        y: y as i32,
        width: width as u32,
        height: height as u32,
    })
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ToolError> {
    let mut buffer = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(buffer)
}

async fn screen_get_size(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let display = display_arg(args.optional_i64("display_id", -1));
    let (width, height) = provider.screen_size(display).await?;
    Ok(json!({"width": width, "height": height}))
}

async fn screen_get_displays_num(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let count = provider.display_count().await?;
    Ok(json!({"count": count}))
}

async fn screen_get_display_bounds(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let display_id = args.require_i64("display_id")?;
    let bounds = provider.display_bounds(display_id as u32).await?;
    Ok(json!({
        "x": bounds.x,
        "y": bounds.y,
        "width": bounds.width,
        "height": bounds.height,
    }))
}

async fn screen_capture(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let region = region_args(&args);
    let display = display_arg(args.optional_i64("display_id", -1));

    let image = provider.capture_screen(region, display).await?;
    let png = encode_png(&image)?;

    Ok(json!({
        "image": BASE64.encode(&png),
        "format": "png",
        "encoding": "base64",
    }))
}

async fn screen_capture_save(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let path = args.require_str("path")?.to_string();
    let region = region_args(&args);

    provider.capture_to_file(&path, region).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Screenshot saved to {path}"),
        "path": path,
    }))
}

async fn screen_get_pixel_color(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let display = display_arg(args.optional_i64("display_id", -1));

    let color = provider.pixel_color(x as i32, y as i32, display).await?;
    Ok(json!({"color": color}))
}

async fn screen_get_mouse_color(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let display = display_arg(args.optional_i64("display_id", -1));
    let color = provider.pixel_color_at_pointer(display).await?;
    Ok(json!({"color": color}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn args(value: Value) -> Args {
        match value {
            Value::Object(map) => Args::new(map),
            _ => Args::new(Map::new()),
        }
    }

    #[test]
    fn region_requires_all_four_bounds() {
        assert!(region_args(&args(json!({}))).is_none());
        assert!(region_args(&args(json!({"x": 0, "y": 0, "width": 100}))).is_none());
        assert!(region_args(&args(json!({"x": 0, "y": 0, "width": 100, "height": 0}))).is_none());

        let region = region_args(&args(json!({"x": 10, "y": 20, "width": 100, "height": 50})))
            .expect("complete region");
        assert_eq!(
            (region.x, region.y, region.width, region.height),
            (10, 20, 100, 50)
        );
    }

    #[test]
    fn png_encoding_emits_signature() {
        let image = RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
        let png = encode_png(&image).expect("encode");
        assert_eq!(&png[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
