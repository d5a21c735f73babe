//! Process query and control tools

use std::sync::Arc;

use anyhow::Context as _;
use serde_json::{Value, json};

use crate::core::ToolError;
use crate::core::codec::Args;
use crate::core::registry::{ParamKind, ToolDescriptor, ToolRegistry};
use crate::provider::CapabilityProvider;

pub fn register(registry: &mut ToolRegistry) {
    registry.register(
        ToolDescriptor::new("process_list", "List all running processes"),
        process_list,
    );
    registry.register(
        ToolDescriptor::new("process_find_by_name", "Find processes by name (case insensitive)")
            .required(ParamKind::String, "name", "Process name to search for"),
        process_find_by_name,
    );
    registry.register(
        ToolDescriptor::new("process_get_name", "Get process name by PID")
            .required(ParamKind::Integer, "pid", "Process ID"),
        process_get_name,
    );
    registry.register(
        ToolDescriptor::new("process_exists", "Check if process exists")
            .required(ParamKind::Integer, "pid", "Process ID"),
        process_exists,
    );
    registry.register(
        ToolDescriptor::new("process_kill", "Kill process by PID")
            .required(ParamKind::Integer, "pid", "Process ID"),
        process_kill,
    );
    registry.register(
        ToolDescriptor::new("process_run", "Run shell command")
            .required(ParamKind::String, "command", "Command to run"),
        process_run,
    );
}

async fn process_list(
    provider: Arc<dyn CapabilityProvider>,
    _args: Args,
) -> Result<Value, ToolError> {
    let processes = provider
        .processes()
        .await
        .context("failed to get process list")?;

    let entries: Vec<Value> = processes
        .iter()
        .map(|p| json!({"pid": p.pid, "name": p.name}))
        .collect();

    Ok(json!({
        "processes": entries,
        "count": entries.len(),
    }))
}

async fn process_find_by_name(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let name = args.require_str("name")?.to_string();

    let pids = provider
        .find_pids(&name)
        .await
        .context("failed to find processes")?;

    Ok(json!({
        "pids": pids,
        "count": pids.len(),
    }))
}

async fn process_get_name(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    let name = provider
        .process_name(pid as i32)
        .await
        .context("failed to get process name")?;

    Ok(json!({"name": name}))
}

async fn process_exists(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    let exists = provider
        .pid_exists(pid as i32)
        .await
        .context("failed to check process")?;

    Ok(json!({"exists": exists}))
}

async fn process_kill(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let pid = args.require_i64("pid")?;

    provider
        .kill_process(pid as i32)
        .await
        .context("failed to kill process")?;

    Ok(json!({
        "status": "success",
        "message": format!("Process {pid} killed"),
    }))
}

async fn process_run(
    provider: Arc<dyn CapabilityProvider>,
    args: Args,
) -> Result<Value, ToolError> {
    let command = args.require_str("command")?.to_string();

    let output = provider
        .run_command(&command)
        .await
        .context("failed to run command")?;

    Ok(json!({"output": output}))
}
