//! Simulated desktop provider
//!
//! An in-memory model of a desktop: pointer position, clipboard, one
//! display, a handful of windows and a process table. Every capability call
//! is recorded as `(method, arguments)` so tests can assert exactly what the
//! dispatch layer asked for.
//!
//! Captures render a solid-color framebuffer; nothing here touches the OS,
//! which keeps the server runnable headless and makes results deterministic.

use anyhow::bail;
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::{CapabilityProvider, Geometry, ProcessInfo, SystemInfo, WindowInfo};
use crate::SERVER_VERSION;

/// Background color of the simulated framebuffer (dodger blue).
const SCREEN_COLOR: [u8; 3] = [0x1e, 0x90, 0xff];

#[derive(Debug, Clone)]
struct SimWindow {
    handle: i64,
    pid: i32,
    title: String,
    geometry: Geometry,
}

struct DesktopState {
    pointer: (i32, i32),
    clipboard: String,
    displays: Vec<Geometry>,
    windows: Vec<SimWindow>,
    active_pid: i32,
    processes: Vec<ProcessInfo>,
    calls: Vec<(String, Value)>,
}

impl DesktopState {
    fn window(&self, pid: i32) -> anyhow::Result<&SimWindow> {
        self.windows
            .iter()
            .find(|w| w.pid == pid)
            .ok_or_else(|| anyhow::anyhow!("no window for process {pid}"))
    }

    fn window_mut(&mut self, pid: i32) -> anyhow::Result<&mut SimWindow> {
        self.windows
            .iter_mut()
            .find(|w| w.pid == pid)
            .ok_or_else(|| anyhow::anyhow!("no window for process {pid}"))
    }

    fn display(&self, id: u32) -> anyhow::Result<Geometry> {
        self.displays
            .get(id as usize)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("display {id} not found"))
    }

    fn primary(&self) -> Geometry {
        self.displays.first().copied().unwrap_or(Geometry {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        })
    }
}

/// In-memory desktop implementing the full capability surface.
pub struct SimulatedDesktop {
    state: Mutex<DesktopState>,
}

impl SimulatedDesktop {
    pub fn new() -> Self {
        let windows = vec![
            SimWindow {
                handle: 0x2a0001,
                pid: 101,
                title: "Stagehand Demo".to_string(),
                geometry: Geometry { x: 80, y: 60, width: 1024, height: 768 },
            },
            SimWindow {
                handle: 0x2a0002,
                pid: 102,
                title: "Console".to_string(),
                geometry: Geometry { x: 300, y: 200, width: 640, height: 480 },
            },
        ];
        let processes = vec![
            ProcessInfo { pid: 1, name: "init".to_string() },
            ProcessInfo { pid: 101, name: "demo-app".to_string() },
            ProcessInfo { pid: 102, name: "console".to_string() },
        ];

        Self {
            state: Mutex::new(DesktopState {
                pointer: (0, 0),
                clipboard: String::new(),
                displays: vec![Geometry { x: 0, y: 0, width: 1920, height: 1080 }],
                windows,
                active_pid: 101,
                processes,
                calls: Vec::new(),
            }),
        }
    }

    /// Every capability call received so far, in order.
    pub async fn calls(&self) -> Vec<(String, Value)> {
        self.state.lock().await.calls.clone()
    }

    fn render(geometry: Geometry) -> RgbaImage {
        let [r, g, b] = SCREEN_COLOR;
        RgbaImage::from_pixel(geometry.width.max(1), geometry.height.max(1), Rgba([r, g, b, 0xff]))
    }
}

impl Default for SimulatedDesktop {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityProvider for SimulatedDesktop {
    async fn pointer_move(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pointer_move".to_string(), json!({"x": x, "y": y, "display": display})));
        state.pointer = (x, y);
        Ok(())
    }

    async fn pointer_move_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
    ) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "pointer_move_smooth".to_string(),
            json!({"x": x, "y": y, "low": low, "high": high}),
        ));
        state.pointer = (x, y);
        Ok(true)
    }

    async fn pointer_move_relative(&self, dx: i32, dy: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pointer_move_relative".to_string(), json!({"dx": dx, "dy": dy})));
        state.pointer.0 += dx;
        state.pointer.1 += dy;
        Ok(())
    }

    async fn pointer_location(&self) -> anyhow::Result<(i32, i32)> {
        let mut state = self.state.lock().await;
        state.calls.push(("pointer_location".to_string(), json!({})));
        Ok(state.pointer)
    }

    async fn pointer_click(&self, button: &str, double: bool) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pointer_click".to_string(), json!({"button": button, "double": double})));
        Ok(())
    }

    async fn pointer_toggle(&self, button: &str, down: bool) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pointer_toggle".to_string(), json!({"button": button, "down": down})));
        Ok(())
    }

    async fn pointer_drag(&self, x: i32, y: i32, button: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pointer_drag".to_string(), json!({"x": x, "y": y, "button": button})));
        state.pointer = (x, y);
        Ok(())
    }

    async fn pointer_drag_smooth(
        &self,
        x: i32,
        y: i32,
        low: f64,
        high: f64,
        button: &str,
    ) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "pointer_drag_smooth".to_string(),
            json!({"x": x, "y": y, "low": low, "high": high, "button": button}),
        ));
        state.pointer = (x, y);
        Ok(())
    }

    async fn scroll(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("scroll".to_string(), json!({"x": x, "y": y, "display": display})));
        Ok(())
    }

    async fn scroll_direction(&self, amount: i32, direction: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "scroll_direction".to_string(),
            json!({"amount": amount, "direction": direction}),
        ));
        Ok(())
    }

    async fn scroll_smooth(&self, to: i32, steps: i32, delay_ms: u64) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "scroll_smooth".to_string(),
            json!({"to": to, "steps": steps, "delay_ms": delay_ms}),
        ));
        Ok(())
    }

    async fn key_tap(&self, key: &str, modifiers: &[String]) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("key_tap".to_string(), json!({"key": key, "modifiers": modifiers})));
        Ok(())
    }

    async fn key_toggle(&self, key: &str, down: bool) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("key_toggle".to_string(), json!({"key": key, "down": down})));
        Ok(())
    }

    async fn type_text(&self, text: &str, delay_ms: u64) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("type_text".to_string(), json!({"text": text, "delay_ms": delay_ms})));
        Ok(())
    }

    async fn clipboard_read(&self) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state.calls.push(("clipboard_read".to_string(), json!({})));
        Ok(state.clipboard.clone())
    }

    async fn clipboard_write(&self, text: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("clipboard_write".to_string(), json!({"text": text})));
        state.clipboard = text.to_string();
        Ok(())
    }

    async fn clipboard_paste(&self, text: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("clipboard_paste".to_string(), json!({"text": text})));
        state.clipboard = text.to_string();
        Ok(())
    }

    async fn screen_size(&self, display: Option<u32>) -> anyhow::Result<(u32, u32)> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("screen_size".to_string(), json!({"display": display})));
        let bounds = match display {
            Some(id) => state.display(id)?,
            None => state.primary(),
        };
        Ok((bounds.width, bounds.height))
    }

    async fn display_count(&self) -> anyhow::Result<u32> {
        let mut state = self.state.lock().await;
        state.calls.push(("display_count".to_string(), json!({})));
        Ok(state.displays.len() as u32)
    }

    async fn display_bounds(&self, display: u32) -> anyhow::Result<Geometry> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("display_bounds".to_string(), json!({"display": display})));
        state.display(display)
    }

    async fn capture_screen(
        &self,
        region: Option<Geometry>,
        display: Option<u32>,
    ) -> anyhow::Result<RgbaImage> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "capture_screen".to_string(),
            json!({
                "region": region.map(|r| json!({"x": r.x, "y": r.y, "width": r.width, "height": r.height})),
                "display": display,
            }),
        ));
        let geometry = match (region, display) {
            (Some(region), _) => region,
            (None, Some(id)) => state.display(id)?,
            (None, None) => state.primary(),
        };
        Ok(Self::render(geometry))
    }

    async fn capture_to_file(&self, path: &str, region: Option<Geometry>) -> anyhow::Result<()> {
        let geometry = {
            let mut state = self.state.lock().await;
            state.calls.push((
                "capture_to_file".to_string(),
                json!({
                    "path": path,
                    "region": region.map(|r| json!({"x": r.x, "y": r.y, "width": r.width, "height": r.height})),
                }),
            ));
            region.unwrap_or_else(|| state.primary())
        };
        Self::render(geometry).save(path)?;
        Ok(())
    }

    async fn pixel_color(&self, x: i32, y: i32, display: Option<u32>) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pixel_color".to_string(), json!({"x": x, "y": y, "display": display})));
        let bounds = match display {
            Some(id) => state.display(id)?,
            None => state.primary(),
        };
        if x < bounds.x
            || y < bounds.y
            || x >= bounds.x + bounds.width as i32
            || y >= bounds.y + bounds.height as i32
        {
            bail!("position ({x}, {y}) is outside the screen");
        }
        let [r, g, b] = SCREEN_COLOR;
        Ok(format!("{r:02x}{g:02x}{b:02x}"))
    }

    async fn pixel_color_at_pointer(&self, display: Option<u32>) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pixel_color_at_pointer".to_string(), json!({"display": display})));
        let [r, g, b] = SCREEN_COLOR;
        Ok(format!("{r:02x}{g:02x}{b:02x}"))
    }

    async fn active_window(&self) -> anyhow::Result<WindowInfo> {
        let mut state = self.state.lock().await;
        state.calls.push(("active_window".to_string(), json!({})));
        let active_pid = state.active_pid;
        let window = state.window(active_pid)?;
        Ok(WindowInfo {
            handle: window.handle,
            title: window.title.clone(),
            pid: window.pid,
        })
    }

    async fn window_title(&self, pid: Option<i32>) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("window_title".to_string(), json!({"pid": pid})));
        let pid = pid.unwrap_or(state.active_pid);
        Ok(state.window(pid)?.title.clone())
    }

    async fn window_bounds(&self, pid: i32) -> anyhow::Result<Geometry> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("window_bounds".to_string(), json!({"pid": pid})));
        Ok(state.window(pid)?.geometry)
    }

    async fn activate_window(&self, pid: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("activate_window".to_string(), json!({"pid": pid})));
        state.window(pid)?;
        state.active_pid = pid;
        Ok(())
    }

    async fn move_window(&self, pid: i32, x: i32, y: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("move_window".to_string(), json!({"pid": pid, "x": x, "y": y})));
        let window = state.window_mut(pid)?;
        window.geometry.x = x;
        window.geometry.y = y;
        Ok(())
    }

    async fn resize_window(&self, pid: i32, width: u32, height: u32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "resize_window".to_string(),
            json!({"pid": pid, "width": width, "height": height}),
        ));
        let window = state.window_mut(pid)?;
        window.geometry.width = width;
        window.geometry.height = height;
        Ok(())
    }

    async fn minimize_window(&self, pid: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("minimize_window".to_string(), json!({"pid": pid})));
        state.window(pid)?;
        Ok(())
    }

    async fn maximize_window(&self, pid: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("maximize_window".to_string(), json!({"pid": pid})));
        let bounds = state.primary();
        state.window_mut(pid)?.geometry = bounds;
        Ok(())
    }

    async fn close_window(&self, pid: Option<i32>) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("close_window".to_string(), json!({"pid": pid})));
        let pid = pid.unwrap_or(state.active_pid);
        state.window(pid)?;
        state.windows.retain(|w| w.pid != pid);
        if state.active_pid == pid {
            state.active_pid = state.windows.first().map(|w| w.pid).unwrap_or(0);
        }
        Ok(())
    }

    async fn processes(&self) -> anyhow::Result<Vec<ProcessInfo>> {
        let mut state = self.state.lock().await;
        state.calls.push(("processes".to_string(), json!({})));
        Ok(state.processes.clone())
    }

    async fn find_pids(&self, name: &str) -> anyhow::Result<Vec<i32>> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("find_pids".to_string(), json!({"name": name})));
        let needle = name.to_lowercase();
        Ok(state
            .processes
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .map(|p| p.pid)
            .collect())
    }

    async fn process_name(&self, pid: i32) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("process_name".to_string(), json!({"pid": pid})));
        state
            .processes
            .iter()
            .find(|p| p.pid == pid)
            .map(|p| p.name.clone())
            .ok_or_else(|| anyhow::anyhow!("process {pid} not found"))
    }

    async fn pid_exists(&self, pid: i32) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("pid_exists".to_string(), json!({"pid": pid})));
        Ok(state.processes.iter().any(|p| p.pid == pid))
    }

    async fn kill_process(&self, pid: i32) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("kill_process".to_string(), json!({"pid": pid})));
        if !state.processes.iter().any(|p| p.pid == pid) {
            bail!("process {pid} not found");
        }
        state.processes.retain(|p| p.pid != pid);
        state.windows.retain(|w| w.pid != pid);
        Ok(())
    }

    async fn run_command(&self, command: &str) -> anyhow::Result<String> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(("run_command".to_string(), json!({"command": command})));
        bail!("process execution is not available on the simulated desktop");
    }

    async fn system_info(&self) -> anyhow::Result<SystemInfo> {
        let mut state = self.state.lock().await;
        state.calls.push(("system_info".to_string(), json!({})));
        Ok(SystemInfo {
            version: format!("stagehand-sim {SERVER_VERSION}"),
            is_64bit: cfg!(target_pointer_width = "64"),
            main_display_id: 0,
            displays_count: state.displays.len() as u32,
        })
    }

    async fn sleep_ms(&self, milliseconds: u64) -> anyhow::Result<()> {
        {
            let mut state = self.state.lock().await;
            state
                .calls
                .push(("sleep_ms".to_string(), json!({"milliseconds": milliseconds})));
        }
        tokio::time::sleep(std::time::Duration::from_millis(milliseconds)).await;
        Ok(())
    }

    async fn alert(
        &self,
        title: &str,
        message: &str,
        default_button: &str,
        cancel_button: Option<&str>,
    ) -> anyhow::Result<bool> {
        let mut state = self.state.lock().await;
        state.calls.push((
            "alert".to_string(),
            json!({
                "title": title,
                "message": message,
                "default_button": default_button,
                "cancel_button": cancel_button,
            }),
        ));
        // Nobody is there to click; the default button wins.
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pointer_moves_are_observable() {
        let sim = SimulatedDesktop::new();
        sim.pointer_move(100, 200, None).await.unwrap();
        assert_eq!(sim.pointer_location().await.unwrap(), (100, 200));
        sim.pointer_move_relative(-10, 5).await.unwrap();
        assert_eq!(sim.pointer_location().await.unwrap(), (90, 205));
    }

    #[tokio::test]
    async fn calls_are_recorded_in_order() {
        let sim = SimulatedDesktop::new();
        sim.pointer_click("left", true).await.unwrap();
        sim.key_tap("enter", &[]).await.unwrap();

        let calls = sim.calls().await;
        assert_eq!(calls[0].0, "pointer_click");
        assert_eq!(calls[0].1, json!({"button": "left", "double": true}));
        assert_eq!(calls[1].0, "key_tap");
    }

    #[tokio::test]
    async fn clipboard_round_trips() {
        let sim = SimulatedDesktop::new();
        sim.clipboard_write("hello").await.unwrap();
        assert_eq!(sim.clipboard_read().await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn window_lifecycle() {
        let sim = SimulatedDesktop::new();
        sim.move_window(101, 10, 20).await.unwrap();
        sim.resize_window(101, 500, 400).await.unwrap();

        let bounds = sim.window_bounds(101).await.unwrap();
        assert_eq!((bounds.x, bounds.y, bounds.width, bounds.height), (10, 20, 500, 400));

        sim.maximize_window(101).await.unwrap();
        let bounds = sim.window_bounds(101).await.unwrap();
        assert_eq!((bounds.width, bounds.height), (1920, 1080));

        sim.activate_window(102).await.unwrap();
        assert_eq!(sim.active_window().await.unwrap().pid, 102);

        sim.close_window(None).await.unwrap();
        assert!(sim.window_bounds(102).await.is_err());
    }

    #[tokio::test]
    async fn kill_removes_process_and_window() {
        let sim = SimulatedDesktop::new();
        assert!(sim.pid_exists(101).await.unwrap());
        sim.kill_process(101).await.unwrap();
        assert!(!sim.pid_exists(101).await.unwrap());
        assert!(sim.window_bounds(101).await.is_err());

        let err = sim.kill_process(101).await.unwrap_err();
        assert_eq!(err.to_string(), "process 101 not found");
    }

    #[tokio::test]
    async fn find_pids_is_case_insensitive() {
        let sim = SimulatedDesktop::new();
        assert_eq!(sim.find_pids("DEMO").await.unwrap(), vec![101]);
        assert!(sim.find_pids("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn capture_matches_requested_region() {
        let sim = SimulatedDesktop::new();
        let region = Geometry { x: 0, y: 0, width: 32, height: 16 };
        let img = sim.capture_screen(Some(region), None).await.unwrap();
        assert_eq!((img.width(), img.height()), (32, 16));
    }
}
