use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use crate::{
    append_tray_log, tray_preference, LauncherError, SettingsStore, TrayPreference, TRAY_ID,
};

/// OS surface the reconciler drives: one tray resource addressed by id plus the
/// main window.
pub(crate) trait ShellHost {
    type Tray;

    fn find_tray(&self, id: &str) -> Option<Self::Tray>;
    fn create_tray(&self, id: &str) -> Result<Self::Tray, String>;
    fn refresh_tray_menu(&self, tray: &Self::Tray) -> Result<(), String>;
    fn close_tray(&self, id: &str, tray: Self::Tray) -> Result<(), String>;
    fn hide_main_window(&self);
    fn close_main_window(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseAction {
    HideToTray,
    Exit,
}

pub(crate) fn decide_close_action(tray_active: bool, quitting: bool) -> CloseAction {
    if tray_active && !quitting {
        CloseAction::HideToTray
    } else {
        CloseAction::Exit
    }
}

pub(crate) struct TrayReconciler<H: ShellHost> {
    host: H,
    preference: Mutex<TrayPreference>,
    tray: Mutex<Option<H::Tray>>,
    quitting: AtomicBool,
}

impl<H: ShellHost> TrayReconciler<H> {
    pub(crate) fn new(host: H, preference: TrayPreference) -> Self {
        Self {
            host,
            preference: Mutex::new(preference),
            tray: Mutex::new(None),
            quitting: AtomicBool::new(false),
        }
    }

    #[cfg(test)]
    pub(crate) fn host(&self) -> &H {
        &self.host
    }

    pub(crate) fn preference(&self) -> TrayPreference {
        *self.preference.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn tray_active(&self) -> bool {
        self.preference().tray_active
    }

    fn update_preference(&self, update: impl FnOnce(&mut TrayPreference)) {
        let mut preference = self.preference.lock().unwrap_or_else(PoisonError::into_inner);
        update(&mut preference);
    }

    /// Makes the tray resource match `tray_active`. Calling it again with the
    /// same value creates or closes nothing further.
    pub(crate) fn reconcile(&self, tray_active: bool) -> Result<(), LauncherError> {
        let mut owned = self.tray.lock().unwrap_or_else(PoisonError::into_inner);
        let existing = owned.take().or_else(|| self.host.find_tray(TRAY_ID));

        match (tray_active, existing) {
            (true, Some(tray)) => {
                let refreshed = self.host.refresh_tray_menu(&tray);
                *owned = Some(tray);
                refreshed.map_err(LauncherError::TrayResource)
            }
            (true, None) => {
                let tray = self
                    .host
                    .create_tray(TRAY_ID)
                    .map_err(LauncherError::TrayResource)?;
                append_tray_log("tray icon created");
                *owned = Some(tray);
                Ok(())
            }
            (false, Some(tray)) => {
                self.host
                    .close_tray(TRAY_ID, tray)
                    .map_err(LauncherError::TrayResource)?;
                append_tray_log("tray icon closed");
                Ok(())
            }
            (false, None) => Ok(()),
        }
    }

    pub(crate) fn close_action(&self) -> CloseAction {
        decide_close_action(self.tray_active(), self.is_quitting())
    }

    /// Close button handler: hides to the tray or closes the window for good.
    pub(crate) fn on_close_requested(&self) -> CloseAction {
        let action = self.close_action();
        match action {
            CloseAction::HideToTray => self.host.hide_main_window(),
            CloseAction::Exit => self.host.close_main_window(),
        }
        action
    }

    /// Handler for a close the OS already started. Returns true when the close
    /// has to be prevented because the window went to the tray instead.
    pub(crate) fn intercept_window_close(&self) -> bool {
        match self.close_action() {
            CloseAction::HideToTray => {
                self.host.hide_main_window();
                true
            }
            CloseAction::Exit => false,
        }
    }

    pub(crate) fn request_quit(&self) {
        self.quitting.store(true, Ordering::Relaxed);
        append_tray_log("quit requested from tray");
        self.host.close_main_window();
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::Relaxed)
    }

    /// Applies a new tray preference. The in-memory value always changes; a
    /// failed write or tray update comes back as a warning.
    pub(crate) fn toggle_preference(
        &self,
        next: bool,
        store: &SettingsStore,
    ) -> Vec<LauncherError> {
        let mut warnings = Vec::new();
        if let Err(error) = tray_preference::persist_tray_active(store, next) {
            tracing::warn!("failed to persist tray preference: {error}");
            warnings.push(error);
        }

        self.update_preference(|preference| preference.tray_active = next);
        append_tray_log(&format!(
            "run in tray on close: {}",
            if next { "enabled" } else { "disabled" }
        ));

        if let Err(error) = self.reconcile(next) {
            tracing::warn!("tray reconciliation failed: {error}");
            warnings.push(error);
        }
        warnings
    }

    pub(crate) fn set_allow_silent_updates(
        &self,
        allowed: bool,
        store: &SettingsStore,
    ) -> Result<(), LauncherError> {
        self.update_preference(|preference| preference.allow_silent_updates = allowed);
        tray_preference::persist_allow_silent_updates(store, allowed).inspect_err(|error| {
            tracing::warn!("failed to persist silent update preference: {error}");
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::settings_store::memory::MemoryBackend;

    #[derive(Debug, Default)]
    struct ShellLog {
        live_trays: Vec<u32>,
        next_tray: u32,
        created: usize,
        refreshed: usize,
        closed: usize,
        hidden: usize,
        window_closed: usize,
        fail_create: bool,
    }

    #[derive(Debug, Default)]
    struct FakeShell {
        log: Mutex<ShellLog>,
    }

    impl FakeShell {
        fn failing_create() -> Self {
            let shell = Self::default();
            shell.log.lock().unwrap().fail_create = true;
            shell
        }

        fn read<R>(&self, f: impl FnOnce(&ShellLog) -> R) -> R {
            f(&self.log.lock().unwrap())
        }
    }

    impl ShellHost for FakeShell {
        type Tray = u32;

        fn find_tray(&self, _id: &str) -> Option<u32> {
            self.log.lock().unwrap().live_trays.first().copied()
        }

        fn create_tray(&self, _id: &str) -> Result<u32, String> {
            let mut log = self.log.lock().unwrap();
            if log.fail_create {
                return Err("tray unsupported".to_string());
            }
            log.next_tray += 1;
            let tray = log.next_tray;
            log.live_trays.push(tray);
            log.created += 1;
            Ok(tray)
        }

        fn refresh_tray_menu(&self, _tray: &u32) -> Result<(), String> {
            self.log.lock().unwrap().refreshed += 1;
            Ok(())
        }

        fn close_tray(&self, _id: &str, tray: u32) -> Result<(), String> {
            let mut log = self.log.lock().unwrap();
            log.live_trays.retain(|live| *live != tray);
            log.closed += 1;
            Ok(())
        }

        fn hide_main_window(&self) {
            self.log.lock().unwrap().hidden += 1;
        }

        fn close_main_window(&self) {
            self.log.lock().unwrap().window_closed += 1;
        }
    }

    fn build_reconciler(tray_active: bool) -> TrayReconciler<FakeShell> {
        TrayReconciler::new(
            FakeShell::default(),
            TrayPreference {
                tray_active,
                allow_silent_updates: false,
            },
        )
    }

    #[test]
    fn decide_close_action_hides_only_with_tray_and_no_quit() {
        assert_eq!(decide_close_action(true, false), CloseAction::HideToTray);
        assert_eq!(decide_close_action(true, true), CloseAction::Exit);
        assert_eq!(decide_close_action(false, false), CloseAction::Exit);
    }

    #[test]
    fn reconcile_true_twice_creates_one_tray() {
        let reconciler = build_reconciler(true);

        reconciler.reconcile(true).unwrap();
        reconciler.reconcile(true).unwrap();

        reconciler.host().read(|log| {
            assert_eq!(log.created, 1);
            assert_eq!(log.live_trays.len(), 1);
            assert_eq!(log.refreshed, 1);
        });
    }

    #[test]
    fn reconcile_false_twice_closes_at_most_once() {
        let reconciler = build_reconciler(true);
        reconciler.reconcile(true).unwrap();

        reconciler.reconcile(false).unwrap();
        reconciler.reconcile(false).unwrap();

        reconciler.host().read(|log| {
            assert_eq!(log.closed, 1);
            assert!(log.live_trays.is_empty());
        });
    }

    #[test]
    fn reconcile_false_without_tray_is_not_an_error() {
        let reconciler = build_reconciler(false);
        assert!(reconciler.reconcile(false).is_ok());
        reconciler.host().read(|log| assert_eq!(log.closed, 0));
    }

    #[test]
    fn reconcile_adopts_tray_found_by_id() {
        let reconciler = build_reconciler(true);
        reconciler.host().log.lock().unwrap().live_trays.push(41);

        reconciler.reconcile(true).unwrap();
        reconciler.reconcile(false).unwrap();

        reconciler.host().read(|log| {
            assert_eq!(log.created, 0);
            assert_eq!(log.refreshed, 1);
            assert!(log.live_trays.is_empty());
        });
    }

    #[test]
    fn fresh_run_hides_window_on_close() {
        let store = SettingsStore::new(MemoryBackend::default());
        let reconciler = TrayReconciler::new(FakeShell::default(), TrayPreference::load(&store));

        assert!(reconciler.tray_active());
        assert_eq!(reconciler.on_close_requested(), CloseAction::HideToTray);
        reconciler.host().read(|log| {
            assert_eq!(log.hidden, 1);
            assert_eq!(log.window_closed, 0);
        });
    }

    #[test]
    fn disabling_tray_closes_it_and_makes_close_exit() {
        let store = SettingsStore::new(MemoryBackend::default());
        let reconciler = build_reconciler(true);
        reconciler.reconcile(true).unwrap();

        let warnings = reconciler.toggle_preference(false, &store);

        assert!(warnings.is_empty());
        assert!(!reconciler.tray_active());
        assert!(!TrayPreference::load(&store).tray_active);
        assert_eq!(reconciler.on_close_requested(), CloseAction::Exit);
        reconciler.host().read(|log| {
            assert_eq!(log.closed, 1);
            assert!(log.live_trays.is_empty());
            assert_eq!(log.window_closed, 1);
            assert_eq!(log.hidden, 0);
        });
    }

    #[test]
    fn persistence_failure_keeps_in_memory_toggle() {
        let store = SettingsStore::new(MemoryBackend::failing_writes());
        let reconciler = build_reconciler(false);

        let warnings = reconciler.toggle_preference(true, &store);

        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], LauncherError::Persistence { .. }));
        assert!(reconciler.tray_active());
        reconciler.host().read(|log| assert_eq!(log.created, 1));
    }

    #[test]
    fn tray_failure_keeps_logical_preference() {
        let store = SettingsStore::new(MemoryBackend::default());
        let reconciler = TrayReconciler::new(
            FakeShell::failing_create(),
            TrayPreference {
                tray_active: false,
                allow_silent_updates: false,
            },
        );

        let warnings = reconciler.toggle_preference(true, &store);

        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], LauncherError::TrayResource(_)));
        assert!(reconciler.tray_active());
        assert!(TrayPreference::load(&store).tray_active);
    }

    #[test]
    fn quit_bypasses_tray_hide() {
        let reconciler = build_reconciler(true);

        reconciler.request_quit();

        assert!(!reconciler.intercept_window_close());
        reconciler.host().read(|log| {
            assert_eq!(log.window_closed, 1);
            assert_eq!(log.hidden, 0);
        });
    }

    #[test]
    fn intercepted_close_hides_when_tray_active() {
        let reconciler = build_reconciler(true);
        assert!(reconciler.intercept_window_close());
        reconciler.host().read(|log| assert_eq!(log.hidden, 1));

        let reconciler = build_reconciler(false);
        assert!(!reconciler.intercept_window_close());
    }

    #[test]
    fn silent_update_preference_is_persisted() {
        let store = SettingsStore::new(MemoryBackend::default());
        let reconciler = build_reconciler(true);

        reconciler.set_allow_silent_updates(true, &store).unwrap();

        assert!(reconciler.preference().allow_silent_updates);
        assert!(TrayPreference::load(&store).allow_silent_updates);
    }
}
