use std::sync::atomic::{AtomicBool, Ordering};

use crate::LauncherError;

#[derive(Debug, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LauncherBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
    pub(crate) warnings: Vec<String>,
}

impl LauncherBridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    /// Successful result that still carries non-fatal problems for the UI.
    pub(crate) fn with_warnings(warnings: Vec<LauncherError>) -> Self {
        Self {
            ok: true,
            reason: None,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn atomic_flag_guard_try_set_rejects_double_set_until_drop() {
        let flag = AtomicBool::new(false);

        let guard = AtomicFlagGuard::try_set(&flag).expect("first set should succeed");
        assert!(flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_none());

        drop(guard);
        assert!(!flag.load(Ordering::Relaxed));
        assert!(AtomicFlagGuard::try_set(&flag).is_some());
    }

    #[test]
    fn bridge_result_ok_has_no_reason_or_warnings() {
        let value = serde_json::to_value(LauncherBridgeResult::ok()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "ok": true, "reason": null, "warnings": [] })
        );
    }

    #[test]
    fn bridge_result_serializes_warnings_as_messages() {
        let result = LauncherBridgeResult::with_warnings(vec![LauncherError::TrayResource(
            "no tray".to_string(),
        )]);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["ok"], true);
        assert!(value["reason"].is_null());
        assert_eq!(value["warnings"].as_array().unwrap().len(), 1);
    }
}
