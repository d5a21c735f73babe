//! Capability provider abstraction
//!
//! The provider is the automation backend that performs the actual OS-level
//! pointer, keyboard, clipboard, screen, window and process work. The
//! dispatch core depends only on this trait; it is injected as a single
//! `Arc<dyn CapabilityProvider>` at construction so tests can substitute a
//! recording fake without touching global state.
//!
//! Every method may fail with a provider-reported error; the core treats all
//! such errors as opaque domain failures and passes the message through
//! verbatim.

pub mod sim;

use std::sync::Arc;

use async_trait::async_trait;
use image::RgbaImage;

/// Position and size of a window, display or capture region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The window currently holding focus.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    /// Platform window handle.
    pub handle: i64,
    pub title: String,
    pub pid: i32,
}

/// One entry in the process table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
}

/// Host details reported by `system_get_info`.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub version: String,
    pub is_64bit: bool,
    pub main_display_id: u32,
    pub displays_count: u32,
}

/// The automation surface consumed by the tool handlers.
///
/// Calls block (in the async sense) until the underlying action has run to
/// completion; there is no cancellation partway through an action. The
/// desktop itself is a single global resource, so concurrent calls
/// interleave in whatever order the provider issues them.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    // Pointer
    async fn pointer_move(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<()>;
    /// Animated, human-like move. Returns whether the move completed.
    async fn pointer_move_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
    ) -> anyhow::Result<bool>;
    async fn pointer_move_relative(&self, dx: i32, dy: i32) -> anyhow::Result<()>;
    async fn pointer_location(&self) -> anyhow::Result<(i32, i32)>;
    async fn pointer_click(&self, button: &str, double: bool) -> anyhow::Result<()>;
    async fn pointer_toggle(&self, button: &str, down: bool) -> anyhow::Result<()>;
    async fn pointer_drag(&self, x: i32, y: i32, button: &str) -> anyhow::Result<()>;
    async fn pointer_drag_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
        button: &str,
    ) -> anyhow::Result<()>;
    async fn scroll(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<()>;
    async fn scroll_direction(&self, amount: i32, direction: &str) -> anyhow::Result<()>;
    async fn scroll_smooth(&self, to: i32, steps: i32, delay_ms: u64) -> anyhow::Result<()>;

    // Keyboard and clipboard
    async fn key_tap(&self, key: &str, modifiers: &[String]) -> anyhow::Result<()>;
    async fn key_toggle(&self, key: &str, down: bool) -> anyhow::Result<()>;
    /// Type text with an optional per-character delay (0 = as fast as the
    /// backend allows).
    async fn type_text(&self, text: &str, delay_ms: u64) -> anyhow::Result<()>;
    async fn clipboard_read(&self) -> anyhow::Result<String>;
    async fn clipboard_write(&self, text: &str) -> anyhow::Result<()>;
    /// Write to the clipboard and simulate the paste chord.
    async fn clipboard_paste(&self, text: &str) -> anyhow::Result<()>;

    // Screen
    async fn screen_size(&self, display: Option<u32>) -> anyhow::Result<(u32, u32)>;
    async fn display_count(&self) -> anyhow::Result<u32>;
    async fn display_bounds(&self, display: u32) -> anyhow::Result<Geometry>;
    /// Capture the screen (or a sub-region of it) into an in-memory bitmap.
    async fn capture_screen(
        &self,
        region: Option<Geometry>,
        display: Option<u32>,
    ) -> anyhow::Result<RgbaImage>;
    async fn capture_to_file(&self, path: &str, region: Option<Geometry>) -> anyhow::Result<()>;
    /// Pixel color at a point as a hex string, e.g. `"1e90ff"`.
    async fn pixel_color(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<String>;
    async fn pixel_color_at_pointer(&self, display: Option<u32>) -> anyhow::Result<String>;

    // Windows
    async fn active_window(&self) -> anyhow::Result<WindowInfo>;
    /// Title of the window owned by `pid`, or of the active window when
    /// `None`.
    async fn window_title(&self, pid: Option<i32>) -> anyhow::Result<String>;
    async fn window_bounds(&self, pid: i32) -> anyhow::Result<Geometry>;
    async fn activate_window(&self, pid: i32) -> anyhow::Result<()>;
    async fn move_window(&self, pid: i32, x: i32, y: i32) -> anyhow::Result<()>;
    async fn resize_window(&self, pid: i32, width: u32, height: u32) -> anyhow::Result<()>;
    async fn minimize_window(&self, pid: i32) -> anyhow::Result<()>;
    async fn maximize_window(&self, pid: i32) -> anyhow::Result<()>;
    /// Close the window owned by `pid`, or the active window when `None`.
    async fn close_window(&self, pid: Option<i32>) -> anyhow::Result<()>;

    // Processes
    async fn processes(&self) -> anyhow::Result<Vec<ProcessInfo>>;
    async fn find_pids(&self, name: &str) -> anyhow::Result<Vec<i32>>;
    async fn process_name(&self, pid: i32) -> anyhow::Result<String>;
    async fn pid_exists(&self, pid: i32) -> anyhow::Result<bool>;
    async fn kill_process(&self, pid: i32) -> anyhow::Result<()>;
    async fn run_command(&self, command: &str) -> anyhow::Result<String>;

    // System
    async fn system_info(&self) -> anyhow::Result<SystemInfo>;
    /// Blocking sleep for the requested duration.
    async fn sleep_ms(&self, milliseconds: u64) -> anyhow::Result<()>;
    /// Show a modal alert dialog. Returns true when the default button was
    /// clicked.
    async fn alert(
        &self,
        title: &str,
        message: &str,
        default_button: &str,
        cancel_button: Option<&str>,
    ) -> anyhow::Result<bool>;
}

/// Create the provider for this process.
///
/// Real OS backends implement [`CapabilityProvider`] out of tree; the
/// built-in simulated desktop keeps the server runnable (and testable)
/// without any display server.
pub fn create_provider() -> anyhow::Result<Arc<dyn CapabilityProvider>> {
    tracing::info!("Using simulated desktop provider");
    Ok(Arc::new(sim::SimulatedDesktop::new()))
}
