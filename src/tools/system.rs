//! System info, sleep and alert tools

use std::sync::Arc;

use serde_json::{Value, json};

use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("system_get_info", "Get system information"),
        system_get_info,
    );
    registry.register(
        ToolDescriptor::new("util_sleep", "Sleep/pause for specified milliseconds")
            .required(ParamKind::Integer, "milliseconds", "Milliseconds to sleep"),
        util_sleep,
    );
    registry.register(
        ToolDescriptor::new("alert_show", "Show alert dialog")
            .required(ParamKind::String, "title", "Dialog title")
            .required(ParamKind::String, "message", "Dialog message")
            .optional(ParamKind::String, "default_btn", "Default button text (default: 'OK')")
            .optional(ParamKind::String, "cancel_btn", "Cancel button text (optional)"),
        alert_show,
    );
}

async fn system_get_info(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let info = provider.system_info().await?;
    Ok(json!({
        "version": info.version,
        "is_64bit": info.is_64bit,
        "main_display_id": info.main_display_id,
        "displays_count": info.displays_count,
    }))
}

async fn util_sleep(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let milliseconds = args.require_i64("milliseconds")?.max(0) as u64;

    provider.sleep_ms(milliseconds).await?;

    Ok(json!({
        "status": "success",
        "message": format!("Slept for {milliseconds} milliseconds"),
    }))
}

async fn alert_show(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let title = args.require_str("title")?.to_string();
    let message = args.require_str("message")?.to_string();
    let default_btn = args.optional_str("default_btn", "OK");
    let cancel_btn = args.optional_str("cancel_btn", "");
    let cancel = (!cancel_btn.is_empty()).then_some(cancel_btn.as_str());

    let clicked_default = provider.alert(&title, &message, &default_btn, cancel).await?;

    Ok(json!({"clicked_default": clicked_default}))
}
