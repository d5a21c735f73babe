//! Key input and clipboard tools

use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("key_tap", "Tap a key (press and release)")
            .required(ParamKind::String, "key", "Key to tap (e.g., 'a', 'enter', 'f1')")
            .optional(
                ParamKind::StringList,
                "modifiers",
                "Modifier keys: 'alt', 'ctrl', 'shift', 'cmd'",
            ),
        key_tap,
    );
    registry.register(
        ToolDescriptor::new("key_toggle", "Press or release a key")
            .required(ParamKind::String, "key", "Key to toggle")
            .optional(
                ParamKind::Boolean,
                "down",
                "true to press down, false to release (default: true)",
            ),
        key_toggle,
    );
    registry.register(
        ToolDescriptor::new("type_text", "Type text (supports UTF-8)")
            .required(ParamKind::String, "text", "Text to type")
            .optional(ParamKind::Integer, "delay", "Delay between characters in ms (optional)"),
        type_text,
    );
    registry.register(
        ToolDescriptor::new(
            "type_text_delayed",
            "Type text with a specific delay between characters",
        )
        .required(ParamKind::String, "text", "Text to type")
        .required(ParamKind::Integer, "delay", "Delay between characters in ms"),
        type_text_delayed,
    );
    registry.register(
        ToolDescriptor::new("clipboard_read", "Read text from clipboard"),
        clipboard_read,
    );
    registry.register(
        ToolDescriptor::new("clipboard_write", "Write text to clipboard")
            .required(ParamKind::String, "text", "Text to write to clipboard"),
        clipboard_write,
    );
    registry.register(
        ToolDescriptor::new(
            "clipboard_paste",
            "Paste text via clipboard (writes to clipboard and simulates Ctrl+V/Cmd+V)",
        )
        .required(ParamKind::String, "text", "Text to paste"),
        clipboard_paste,
    );
}

async fn key_tap(provider: Arc<dyn CapabilityProvider>, args: Args) -> Result<Value, ToolError> {
    let key = args.require_str("key")?.to_string();
    let modifiers = args.optional_str_list("modifiers");

    provider.key_tap(&key, &modifiers).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Key '{key}' tapped"),
    }))
}

async fn key_toggle(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let key = args.require_str("key")?.to_string();
    let down = args.optional_bool("down", true);
    let action = if down { "down" } else { "up" };

    provider.key_toggle(&key, down).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Key '{key}' {action}"),
    }))
}

async fn type_text(provider: Arc<dyn CapabilityProvider>, args: Args) -> Result<Value, ToolError> {
    let text = args.require_str("text")?.to_string();
    let delay = args.optional_i64("delay", 0).max(0) as u64;

    provider.type_text(&text, delay).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Text typed: {} characters", text.len()),
    }))
}

async fn type_text_delayed(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let text = args.require_str("text")?.to_string();
    let delay = args.require_i64("delay")?.max(0) as u64;

    provider.type_text(&text, delay).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Text typed with {delay}ms delay: {} characters", text.len()),
    }))
}

async fn clipboard_read(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let text = provider.clipboard_read().await?;
    Ok(json!({"text": text}))
}

async fn clipboard_write(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let text = args.require_str("text")?.to_string();

    provider.clipboard_write(&text).await?;

    Ok(json!({
        "status": "success",
        "message": "Text written to clipboard",
    }))
}

async fn clipboard_paste(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let text = args.require_str("text")?.to_string();

    provider.clipboard_paste(&text).await?;

    Ok(json!({
        "status": "success",
        "message": "Text pasted via clipboard",
    }))
}
