//! Install mode and online/offline tracking for the status indicator.
//! Nothing here is persisted; every signal comes from the environment.

use std::time::{Duration, Instant};

/// How long the "back online" indicator stays up
pub const ONLINE_INDICATOR_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// No deferred prompt offered by the environment
    Unavailable,
    /// A prompt was captured and can be replayed
    Available,
    Installed,
}

/// What the status indicator currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Online,
    Offline,
}

impl Indicator {
    pub fn label(&self) -> &'static str {
        match self {
            Indicator::Online => "Connessione ripristinata",
            Indicator::Offline => "Sei offline",
        }
    }
}

/// Online state plus the install prompt of a browser-hosted build. The
/// desktop binary starts standalone, so it never captures a prompt.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    online: bool,
    install: InstallState,
    /// When the last transition happened and to what
    indicator: Option<(Indicator, Instant)>,
}

impl ConnectivityMonitor {
    /// `standalone` means the app already runs as an installed application
    pub fn new(standalone: bool) -> Self {
        Self {
            online: true,
            install: if standalone { InstallState::Installed } else { InstallState::Unavailable },
            indicator: None,
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn install_state(&self) -> InstallState {
        self.install
    }

    /// Feed an environment signal. Only transitions touch the indicator.
    /// Returns whether the state changed.
    pub fn set_online(&mut self, online: bool, now: Instant) -> bool {
        if online == self.online {
            return false;
        }
        self.online = online;
        let indicator = if online { Indicator::Online } else { Indicator::Offline };
        self.indicator = Some((indicator, now));
        if online {
            tracing::info!("Connection restored");
        } else {
            tracing::warn!("Connection lost");
        }
        true
    }

    /// Offline persists; online disappears after [`ONLINE_INDICATOR_DURATION`]
    pub fn indicator(&self, now: Instant) -> Option<Indicator> {
        match self.indicator {
            Some((Indicator::Offline, _)) => Some(Indicator::Offline),
            Some((Indicator::Online, since)) if now.duration_since(since) < ONLINE_INDICATOR_DURATION => {
                Some(Indicator::Online)
            }
            _ => None,
        }
    }

    /// Time until the indicator changes by itself, for scheduling a repaint
    pub fn next_change(&self, now: Instant) -> Option<Duration> {
        match self.indicator {
            Some((Indicator::Online, since)) => {
                ONLINE_INDICATOR_DURATION.checked_sub(now.duration_since(since))
            }
            _ => None,
        }
    }

    /// The environment offered a deferred install prompt
    pub fn capture_install_prompt(&mut self) {
        if self.install == InstallState::Unavailable {
            self.install = InstallState::Available;
        }
    }

    /// Replay the captured prompt. Returns `false` when none is held. The
    /// prompt can only be shown once.
    pub fn replay_install_prompt(&mut self) -> bool {
        if self.install != InstallState::Available {
            return false;
        }
        self.install = InstallState::Unavailable;
        true
    }

    /// Outcome of a replayed prompt
    pub fn install_outcome(&mut self, accepted: bool) {
        if accepted {
            tracing::info!("App installed");
            self.install = InstallState::Installed;
        }
    }

    pub fn show_install_button(&self) -> bool {
        self.install == InstallState::Available
    }

    /// Header decoration depending on the display mode
    pub fn header_badge(&self) -> Option<&'static str> {
        match self.install {
            InstallState::Installed => Some("App"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn online_indicator_auto_dismisses() {
        let start = Instant::now();
        let mut monitor = ConnectivityMonitor::new(true);
        assert_eq!(monitor.indicator(start), None);

        assert!(monitor.set_online(false, start));
        assert_eq!(monitor.indicator(start + Duration::from_secs(60)), Some(Indicator::Offline));

        let back = start + Duration::from_secs(61);
        assert!(monitor.set_online(true, back));
        assert_eq!(monitor.indicator(back + Duration::from_secs(2)), Some(Indicator::Online));
        assert_eq!(monitor.next_change(back + Duration::from_secs(2)), Some(Duration::from_secs(1)));
        assert_eq!(monitor.indicator(back + Duration::from_secs(3)), None);
    }

    #[test]
    fn repeated_signal_is_not_a_transition() {
        let now = Instant::now();
        let mut monitor = ConnectivityMonitor::new(false);
        assert!(!monitor.set_online(true, now));
        assert_eq!(monitor.indicator(now), None);
    }

    #[test]
    fn install_prompt_capture_and_accept() {
        let mut monitor = ConnectivityMonitor::new(false);
        assert!(!monitor.replay_install_prompt());
        monitor.capture_install_prompt();
        assert!(monitor.show_install_button());
        assert_eq!(monitor.header_badge(), None);

        assert!(monitor.replay_install_prompt());
        monitor.install_outcome(true);
        assert_eq!(monitor.install_state(), InstallState::Installed);
        assert_eq!(monitor.header_badge(), Some("App"));
        assert!(!monitor.show_install_button());
    }

    #[test]
    fn dismissed_prompt_is_gone() {
        let mut monitor = ConnectivityMonitor::new(false);
        monitor.capture_install_prompt();
        assert!(monitor.replay_install_prompt());
        monitor.install_outcome(false);
        assert_eq!(monitor.install_state(), InstallState::Unavailable);
    }

    #[test]
    fn standalone_never_offers_install() {
        let mut monitor = ConnectivityMonitor::new(true);
        monitor.capture_install_prompt();
        assert!(!monitor.show_install_button());
    }
}
