//! Tool catalog
//!
//! One module per capability category, each contributing its descriptors and
//! handlers to the registry at startup. Handlers are plain async functions:
//! extract typed arguments, delegate to the provider, wrap the payload.

pub mod keyboard;
pub mod mouse;
pub mod process;
pub mod screen;
pub mod system;
pub mod window;

use crate::core::registry::ToolRegistry;

/// Build the full tool registry. Called once at startup; a duplicate tool
/// name anywhere in the catalog aborts the process.
pub fn build_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    mouse::register(&mut registry);
    keyboard::register(&mut registry);
    screen::register(&mut registry);
    window::register(&mut registry);
    process::register(&mut registry);
    system::register(&mut registry);
    registry
}

/// Interpret the `display_id` argument's -1 sentinel as "default display".
pub(crate) fn display_arg(id: i64) -> Option<u32> {
    (id >= 0).then_some(id as u32)
}

/// Interpret the `pid` argument's -1 sentinel as "active window".
pub(crate) fn pid_arg(pid: i64) -> Option<i32> {
    (pid >= 0).then_some(pid as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_catalog_registers_without_collisions() {
        let registry = build_registry();
        assert_eq!(registry.len(), 44);
    }

    #[test]
    fn catalog_order_is_deterministic() {
        let first: Vec<String> = build_registry()
            .descriptors()
            .iter()
            .map(|d| d.name.clone())
            .collect();
        let second: Vec<String> = build_registry()
            .descriptors()
            .iter()
            .map(|d| d.name.clone())
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.first().map(String::as_str), Some("mouse_move"));
        assert_eq!(first.last().map(String::as_str), Some("alert_show"));
    }

    #[test]
    fn sentinel_helpers() {
        assert_eq!(display_arg(-1), None);
        assert_eq!(display_arg(0), Some(0));
        assert_eq!(pid_arg(-1), None);
        assert_eq!(pid_arg(4312), Some(4312));
    }
}
