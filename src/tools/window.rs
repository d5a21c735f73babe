//! Window query and control tools

use std::sync::Arc;

use serde_json::{Value, json};

use super::pid_arg;
use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("window_get_active", "Get active window information"),
        window_get_active,
    );
    registry.register(
        ToolDescriptor::new("window_get_title", "Get window title").optional(
            ParamKind::Integer,
            "pid",
            "Process ID (optional, uses active window if not specified)",
        ),
        window_get_title,
    );
    registry.register(
        ToolDescriptor::new("window_get_bounds", "Get window bounds (x, y, width, height)")
            .required(ParamKind::Integer, "pid", "Process ID"),
        window_get_bounds,
    );
    registry.register(
        ToolDescriptor::new("window_set_active", "Activate window by PID")
            .required(ParamKind::Integer, "pid", "Process ID"),
        window_set_active,
    );
    registry.register(
        ToolDescriptor::new("window_move", "Move window to position")
            .required(ParamKind::Integer, "pid", "Process ID")
            .required(ParamKind::Integer, "x", "X coordinate")
            .required(ParamKind::Integer, "y", "Y coordinate"),
        window_move,
    );
    registry.register(
        ToolDescriptor::new("window_resize", "Resize window")
            .required(ParamKind::Integer, "pid", "Process ID")
            .required(ParamKind::Integer, "width", "New width")
            .required(ParamKind::Integer, "height", "New height"),
        window_resize,
    );
    registry.register(
        ToolDescriptor::new("window_minimize", "Minimize window")
            .required(ParamKind::Integer, "pid", "Process ID"),
        window_minimize,
    );
    registry.register(
        ToolDescriptor::new("window_maximize", "Maximize window")
            .required(ParamKind::Integer, "pid", "Process ID"),
        window_maximize,
    );
    registry.register(
        ToolDescriptor::new("window_close", "Close window").optional(
            ParamKind::Integer,
            "pid",
            "Process ID (optional, closes active window if not specified)",
        ),
        window_close,
    );
}

async fn window_get_active(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let window = provider.active_window().await?;
    Ok(json!({
        "handle": window.handle,
        "title": window.title,
        "pid": window.pid,
    }))
}

async fn window_get_title(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = pid_arg(args.optional_i64("pid", -1));
    let title = provider.window_title(pid).await?;
    Ok(json!({"title": title}))
}

async fn window_get_bounds(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;
    let bounds = provider.window_bounds(pid as i32).await?;
    Ok(json!({
        "x": bounds.x,
        "y": bounds.y,
        "width": bounds.width,
        "height": bounds.height,
    }))
}

async fn window_set_active(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    provider.activate_window(pid as i32).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Window with PID {pid} activated"),
    }))
}

async fn window_move(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;
    let x = args.require_i64("x")?;
    let y = args.require_i64("y")?;

    provider.move_window(pid as i32, x as i32, y as i32).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Window moved to ({x}, {y})"),
    }))
}

async fn window_resize(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;
    let width = args.require_i64("width")?;
    let height = args.require_i64("height")?;

    provider
        .resize_window(pid as i32, width.max(0) as u32, height.max(0) as u32)
        .await?;

    Ok(json!({
        "status": "success",
        "message": format!("Window resized to {width}x{height}"),
    }))
}

async fn window_minimize(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    provider.minimize_window(pid as i32).await?;

    Ok(json!({
        "status": "success",
        "message": "Window minimized",
    }))
}

async fn window_maximize(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    provider.maximize_window(pid as i32).await?;

    Ok(json!({
        "status": "success",
        "message": "Window maximized",
    }))
}

async fn window_close(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = pid_arg(args.optional_i64("pid", -1));

    provider.close_window(pid).await?;

    Ok(json!({
        "status": "success",
        "message": "Window closed",
    }))
}
