//! Pointer control tools

use std::sync::Arc;

use serde_json::{Value, json};

use super::display_arg;
use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("mouse_move", "Move mouse cursor to absolute position (x, y)")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        mouse_move,
    );
    registry.register(
        ToolDescriptor::new(
            "mouse_move_smooth",
            "Move mouse cursor smoothly (human-like) to position",
        )
        .required(ParamKind::Integer, "x", "X coordinate")
        .required(ParamKind::Integer, "y", "Y coordinate")
        .optional(ParamKind::Float, "low", "Low speed factor (default: 1.0)")
        .optional(ParamKind::Float, "high", "High speed factor (default: 3.0)"),
        mouse_move_smooth,
    );
    registry.register(
        ToolDescriptor::new("mouse_move_relative", "Move mouse cursor relative to current position")
            .required(ParamKind::Integer, "x", "X offset")
            .required(ParamKind::Integer, "y", "Y offset"),
        mouse_move_relative,
    );
    registry.register(
        ToolDescriptor::new("mouse_get_position", "Get current mouse cursor position"),
        mouse_get_position,
    );
    registry.register(
        ToolDescriptor::new("mouse_click", "Perform mouse click")
            .optional(
                ParamKind::String,
                "button",
                "Button: 'left', 'right', 'center' (default: 'left')",
            )
            .optional(ParamKind::Boolean, "double", "Double click (default: false)"),
        mouse_click,
    );
    registry.register(
        ToolDescriptor::new("mouse_click_at", "Move mouse to position and click")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate")
            .optional(
                ParamKind::String,
                "button",
                "Button: 'left', 'right', 'center' (default: 'left')",
            )
            .optional(ParamKind::Boolean, "double", "Double click (default: false)"),
        mouse_click_at,
    );
    registry.register(
        ToolDescriptor::new("mouse_toggle", "Press or release mouse button")
            .optional(
                ParamKind::String,
                "button",
                "Button: 'left', 'right', 'center' (default: 'left')",
            )
            .optional(
                ParamKind::Boolean,
                "down",
                "true to press down, false to release (default: true)",
            ),
        mouse_toggle,
    );
    registry.register(
        ToolDescriptor::new("mouse_drag", "Drag mouse to position")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate")
            .optional(ParamKind::String, "button", "Button to hold during drag (default: 'left')"),
        mouse_drag,
    );
    registry.register(
        ToolDescriptor::new("mouse_drag_smooth", "Drag mouse smoothly to position")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate")
            .optional(ParamKind::Float, "low", "Low speed factor (default: 1.0)")
            .optional(ParamKind::Float, "high", "High speed factor (default: 3.0)")
            .optional(ParamKind::String, "button", "Button to hold during drag (default: 'left')"),
        mouse_drag_smooth,
    );
    registry.register(
        ToolDescriptor::new("mouse_scroll", "Scroll mouse wheel")
            .required(ParamKind::Integer, "x", "Horizontal scroll amount")
            .required(ParamKind::Integer, "y", "Vertical scroll amount")
            .optional(ParamKind::Integer, "display_id", "Display ID (optional)"),
        mouse_scroll,
    );
    registry.register(
        ToolDescriptor::new("mouse_scroll_direction", "Scroll in a specific direction")
            .required(ParamKind::Integer, "amount", "Scroll amount")
            .required(ParamKind::String, "direction", "Direction: 'up', 'down', 'left', 'right'"),
        mouse_scroll_direction,
    );
    registry.register(
        ToolDescriptor::new("mouse_scroll_smooth", "Scroll smoothly")
            .required(ParamKind::Integer, "to", "Target scroll position")
            .optional(ParamKind::Integer, "num", "Number of scroll steps (default: 5)")
            .optional(ParamKind::Integer, "delay", "Delay between steps in ms (default: 100)"),
        mouse_scroll_smooth,
    );
}

async fn mouse_move(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let display = display_arg(args.optional_i64("display_id", -1));

    provider.pointer_move(x as i32, y as i32, display).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse moved to ({x}, {y})"),
    }))
}

async fn mouse_move_smooth(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let low = args.optional_f64("low", 1.0);
    let high = args.optional_f64("high", 3.0);

    let success = provider
        .pointer_move_smooth(x as i32, y as i32, low, high)
        .await?;

    Ok(json!({
        "status": "success",
        "success": success,
        "message": format!("Mouse moved smoothly to ({x}, {y})"),
    }))
}

async fn mouse_move_relative(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;

    provider.pointer_move_relative(x as i32, y as i32).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse moved relative by ({x}, {y})"),
    }))
}

async fn mouse_get_position(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let (x, y) = provider.pointer_location().await?;
    Ok(json!({"x": x, "y": y}))
}

async fn mouse_click(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let button = args.optional_str("button", "left");
    let double = args.optional_bool("double", false);

    provider.pointer_click(&button, double).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse {button} click performed"),
    }))
}

async fn mouse_click_at(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let button = args.optional_str("button", "left");
    let double = args.optional_bool("double", false);

    provider.pointer_move(x as i32, y as i32, None).await?;
    provider.pointer_click(&button, double).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse {button} click at ({x}, {y})"),
    }))
}

async fn mouse_toggle(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let button = args.optional_str("button", "left");
    let down = args.optional_bool("down", true);
    let action = if down { "down" } else { "up" };

    provider.pointer_toggle(&button, down).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse button {button} {action}"),
    }))
}

async fn mouse_drag(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let button = args.optional_str("button", "left");

    provider.pointer_drag(x as i32, y as i32, &button).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse dragged to ({x}, {y})"),
    }))
}

async fn mouse_drag_smooth(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let low = args.optional_f64("low", 1.0);
    let high = args.optional_f64("high", 3.0);
    let button = args.optional_str("button", "left");

    provider
        .pointer_drag_smooth(x as i32, y as i32, low, high, &button)
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse dragged smoothly to ({x}, {y})"),
    }))
}

async fn mouse_scroll(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;
    let display = display_arg(args.optional_i64("display_id", -1));

    provider.scroll(x as i32, y as i32, display).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse scrolled ({x}, {y})"),
    }))
}

async fn mouse_scroll_direction(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let amount = args.require_i64("amount")?;
    let direction = args.require_str("direction")?.to_string();

    provider.scroll_direction(amount as i32, &direction).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse scrolled {direction} by {amount}"),
    }))
}

async fn mouse_scroll_smooth(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let to = args.require_i64("to")?;
    let num = args.optional_i64("num", 5);
    let delay = args.optional_i64("delay", 100);

    provider
        .scroll_smooth(to as i32, num as i32, delay.max(0) as u64)
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("Mouse scrolled smoothly to {to}"),
    }))
}
