use std::sync::{Mutex, PoisonError};

use tauri::{Manager, PhysicalPosition, WebviewWindow};

/// Monitor the launcher was last centered on.
#[derive(Debug, Default)]
pub(crate) struct MonitorMemory {
    previous: Mutex<Option<String>>,
}

impl MonitorMemory {
    pub(crate) fn is_previous(&self, name: &str) -> bool {
        self.previous
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            == Some(name)
    }

    pub(crate) fn remember(&self, name: &str) {
        *self.previous.lock().unwrap_or_else(PoisonError::into_inner) = Some(name.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonitorBounds {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl MonitorBounds {
    fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x <= self.x + self.width as i32
            && y >= self.y
            && y <= self.y + self.height as i32
    }

    pub(crate) fn centered_origin(&self, window_width: u32, window_height: u32) -> (i32, i32) {
        (
            self.x + (self.width as i32 - window_width as i32) / 2,
            self.y + (self.height as i32 - window_height as i32) / 2,
        )
    }
}

pub(crate) fn monitor_under_cursor(
    monitors: &[MonitorBounds],
    cursor: Option<(f64, f64)>,
) -> Option<usize> {
    let (x, y) = cursor?;
    let (x, y) = (x.round() as i32, y.round() as i32);
    monitors.iter().position(|bounds| bounds.contains(x, y))
}

fn bounds_of(monitor: &tauri::Monitor) -> MonitorBounds {
    MonitorBounds {
        x: monitor.position().x,
        y: monitor.position().y,
        width: monitor.size().width,
        height: monitor.size().height,
    }
}

/// Centers `window` on the monitor under the cursor, falling back to the
/// primary monitor. Nothing moves while the monitor is the one used last time.
pub(crate) fn move_to_active_monitor<F>(window: &WebviewWindow, log: &F)
where
    F: Fn(&str),
{
    let monitors = match window.available_monitors() {
        Ok(monitors) => monitors,
        Err(error) => {
            log(&format!("failed to list monitors: {error}"));
            return;
        }
    };
    let cursor = match window.cursor_position() {
        Ok(position) => Some((position.x, position.y)),
        Err(error) => {
            log(&format!("failed to read cursor position: {error}"));
            None
        }
    };

    let bounds: Vec<MonitorBounds> = monitors.iter().map(bounds_of).collect();
    let target = monitor_under_cursor(&bounds, cursor)
        .and_then(|index| monitors.into_iter().nth(index))
        .or_else(|| window.primary_monitor().ok().flatten());
    let Some(monitor) = target else {
        log("no monitor found for the launcher window");
        return;
    };

    let memory = window.app_handle().try_state::<MonitorMemory>();
    let name = monitor.name().cloned();
    if let (Some(memory), Some(name)) = (&memory, &name) {
        if memory.is_previous(name) {
            return;
        }
    }

    let size = match window.inner_size() {
        Ok(size) => size,
        Err(error) => {
            log(&format!("failed to read launcher window size: {error}"));
            return;
        }
    };
    let (x, y) = bounds_of(&monitor).centered_origin(size.width, size.height);
    if let Err(error) = window.set_position(PhysicalPosition::new(x, y)) {
        log(&format!("failed to move launcher window: {error}"));
        return;
    }

    if let (Some(memory), Some(name)) = (memory, name) {
        log(&format!("launcher window moved to monitor {name}"));
        memory.remember(&name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: MonitorBounds = MonitorBounds {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    };
    const RIGHT: MonitorBounds = MonitorBounds {
        x: 1920,
        y: 0,
        width: 2560,
        height: 1440,
    };

    #[test]
    fn monitor_under_cursor_picks_the_containing_monitor() {
        let monitors = [LEFT, RIGHT];

        assert_eq!(monitor_under_cursor(&monitors, Some((100.0, 100.0))), Some(0));
        assert_eq!(monitor_under_cursor(&monitors, Some((2500.4, 700.0))), Some(1));
    }

    #[test]
    fn monitor_under_cursor_is_none_without_cursor_or_match() {
        let monitors = [LEFT];

        assert_eq!(monitor_under_cursor(&monitors, None), None);
        assert_eq!(monitor_under_cursor(&monitors, Some((-50.0, 10.0))), None);
    }

    #[test]
    fn centered_origin_accounts_for_monitor_offset() {
        assert_eq!(RIGHT.centered_origin(1100, 640), (1920 + 730, 400));
        assert_eq!(LEFT.centered_origin(1100, 640), (410, 220));
    }

    #[test]
    fn monitor_memory_tracks_last_monitor() {
        let memory = MonitorMemory::default();
        assert!(!memory.is_previous("DISPLAY1"));

        memory.remember("DISPLAY1");
        assert!(memory.is_previous("DISPLAY1"));
        assert!(!memory.is_previous("DISPLAY2"));
    }
}
