use shared::SessionUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    LoggingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

/// Owner of the client-side session flag. Every mutation goes through one of the
/// transition methods below; callers publish the outcome to the DOM afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGate {
    state: GateState,
    user: Option<SessionUser>,
    require_login: bool,
    dismissed: bool,
    active_tab: AuthTab,
    alert: Option<String>,
    /// Set by the first explicit auth transition; the on-load probe is stale after that.
    settled: bool,
}

impl SessionGate {
    /// Starts fail-closed until the session probe answers.
    pub fn new(require_login: bool) -> Self {
        Self {
            state: GateState::Unauthenticated,
            user: None,
            require_login,
            dismissed: false,
            active_tab: AuthTab::default(),
            alert: None,
            settled: false,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn active_tab(&self) -> AuthTab {
        self.active_tab
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn require_login(&self) -> bool {
        self.require_login
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == GateState::Authenticated
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, GateState::Authenticating | GateState::LoggingOut)
    }

    /// Whether the submission control may be used.
    pub fn access_granted(&self) -> bool {
        self.is_authenticated() || (!self.require_login && self.dismissed)
    }

    pub fn overlay_visible(&self) -> bool {
        matches!(self.state, GateState::Unauthenticated | GateState::Authenticating)
            && !self.dismissed
    }

    /// Applies the result of the on-load session probe. Ignored once a login or
    /// logout has started.
    pub fn session_probed(&mut self, user: Option<SessionUser>) {
        if self.settled || self.is_busy() {
            return;
        }
        match user {
            Some(user) => {
                self.user = Some(user);
                self.state = GateState::Authenticated;
                self.alert = None;
            }
            None => {
                self.user = None;
                self.state = GateState::Unauthenticated;
            }
        }
    }

    /// Returns `false` when a request is already in flight or the user is signed in.
    pub fn begin_auth(&mut self) -> bool {
        if self.state != GateState::Unauthenticated {
            return false;
        }
        self.state = GateState::Authenticating;
        self.alert = None;
        self.settled = true;
        true
    }

    pub fn auth_succeeded(&mut self, user: SessionUser) {
        self.settled = true;
        self.user = Some(user);
        self.state = GateState::Authenticated;
        self.alert = None;
        self.dismissed = false;
    }

    /// Returns to the pre-call state; the session is left untouched.
    pub fn auth_failed(&mut self, message: impl Into<String>) {
        if self.state == GateState::Authenticating {
            self.state = GateState::Unauthenticated;
        }
        self.alert = Some(message.into());
    }

    pub fn begin_logout(&mut self) -> bool {
        if self.state != GateState::Authenticated {
            return false;
        }
        self.state = GateState::LoggingOut;
        self.settled = true;
        true
    }

    pub fn logged_out(&mut self) {
        self.settled = true;
        self.state = GateState::Unauthenticated;
        self.user = None;
        self.dismissed = false;
        self.alert = None;
    }

    /// Returns `true` if the active tab changed. Entered values live with the
    /// forms and are not touched here.
    pub fn switch_tab(&mut self, tab: AuthTab) -> bool {
        self.alert = None;
        if self.active_tab == tab {
            return false;
        }
        self.active_tab = tab;
        true
    }

    /// Closes the overlay without a session. Only allowed when login is optional.
    pub fn dismiss(&mut self) -> bool {
        if self.require_login || !self.overlay_visible() || self.is_busy() {
            return false;
        }
        self.dismissed = true;
        true
    }

    /// Shows the overlay again after a dismiss. No-op once signed in.
    pub fn reopen(&mut self) -> bool {
        if self.is_authenticated() || self.state == GateState::LoggingOut {
            return false;
        }
        self.dismissed = false;
        true
    }

    /// Re-opens the overlay after an action was blocked for lack of a session.
    /// A session the server has rejected is dropped first.
    pub fn require_auth(&mut self, message: impl Into<String>) {
        if self.is_authenticated() {
            log::info!("Server rejected the session; signing in again");
            self.logged_out();
        }
        if self.reopen() {
            self.alert = Some(message.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> SessionUser {
        SessionUser {
            id: Some(1),
            username: "grace".into(),
            email: "grace@example.com".into(),
            is_admin: false,
        }
    }

    #[test]
    fn starts_fail_closed() {
        let gate = SessionGate::new(true);
        assert_eq!(gate.state(), GateState::Unauthenticated);
        assert!(gate.overlay_visible());
        assert!(!gate.access_granted());
    }

    #[test]
    fn probe_with_user_authenticates() {
        let mut gate = SessionGate::new(true);
        gate.session_probed(Some(user()));
        assert!(gate.is_authenticated());
        assert!(gate.access_granted());
        assert!(!gate.overlay_visible());
        assert_eq!(gate.user().map(|u| u.username.as_str()), Some("grace"));
    }

    #[test]
    fn probe_during_login_is_ignored() {
        let mut gate = SessionGate::new(true);
        assert!(gate.begin_auth());
        gate.session_probed(None);
        assert_eq!(gate.state(), GateState::Authenticating);
    }

    #[test]
    fn probe_after_login_keeps_fresh_session() {
        let mut gate = SessionGate::new(true);
        assert!(gate.begin_auth());
        gate.auth_succeeded(user());

        gate.session_probed(None);
        assert!(gate.is_authenticated());
        assert!(gate.access_granted());
        assert!(!gate.overlay_visible());
    }

    #[test]
    fn probe_after_failed_login_is_ignored() {
        let mut gate = SessionGate::new(true);
        gate.begin_auth();
        gate.auth_failed("Invalid credentials");

        gate.session_probed(Some(user()));
        assert_eq!(gate.state(), GateState::Unauthenticated);
        assert_eq!(gate.alert(), Some("Invalid credentials"));
    }

    #[test]
    fn rejected_session_reopens_overlay() {
        let mut gate = SessionGate::new(true);
        gate.session_probed(Some(user()));
        assert!(gate.access_granted());

        gate.require_auth("Please sign in to continue.");
        assert_eq!(gate.state(), GateState::Unauthenticated);
        assert!(gate.user().is_none());
        assert!(!gate.access_granted());
        assert!(gate.overlay_visible());
        assert_eq!(gate.alert(), Some("Please sign in to continue."));
    }

    #[test]
    fn auth_required_during_logout_waits_for_logout() {
        let mut gate = SessionGate::new(true);
        gate.session_probed(Some(user()));
        assert!(gate.begin_logout());

        gate.require_auth("Please sign in to continue.");
        assert_eq!(gate.state(), GateState::LoggingOut);
        assert!(gate.alert().is_none());
    }

    #[test]
    fn login_round_trip() {
        let mut gate = SessionGate::new(true);
        assert!(gate.begin_auth());
        assert!(gate.is_busy());
        assert!(!gate.begin_auth(), "no second request while one is in flight");
        assert!(gate.overlay_visible());

        gate.auth_succeeded(user());
        assert!(gate.access_granted());
        assert!(!gate.overlay_visible());
    }

    #[test]
    fn failed_login_restores_previous_state_and_alerts() {
        let mut gate = SessionGate::new(true);
        gate.begin_auth();
        gate.auth_failed("Invalid credentials");
        assert_eq!(gate.state(), GateState::Unauthenticated);
        assert_eq!(gate.alert(), Some("Invalid credentials"));
        assert!(gate.user().is_none());
        assert!(!gate.access_granted());
    }

    #[test]
    fn logout_clears_session_and_shows_overlay() {
        let mut gate = SessionGate::new(true);
        gate.session_probed(Some(user()));
        assert!(gate.begin_logout());
        assert!(!gate.access_granted());
        assert!(!gate.overlay_visible());

        gate.logged_out();
        assert!(gate.user().is_none());
        assert!(!gate.access_granted());
        assert!(gate.overlay_visible());
    }

    #[test]
    fn logout_requires_a_session() {
        let mut gate = SessionGate::new(true);
        assert!(!gate.begin_logout());
    }

    #[test]
    fn switching_tabs_clears_alert() {
        let mut gate = SessionGate::new(true);
        gate.begin_auth();
        gate.auth_failed("nope");
        assert!(gate.switch_tab(AuthTab::Signup));
        assert_eq!(gate.active_tab(), AuthTab::Signup);
        assert!(gate.alert().is_none());
        assert!(!gate.switch_tab(AuthTab::Signup));
    }

    #[test]
    fn dismiss_only_when_login_is_optional() {
        let mut required = SessionGate::new(true);
        assert!(!required.dismiss());
        assert!(required.overlay_visible());

        let mut optional = SessionGate::new(false);
        assert!(optional.dismiss());
        assert!(!optional.overlay_visible());
        assert!(optional.access_granted());
        assert!(!optional.is_authenticated());

        optional.require_auth("Please sign in to continue.");
        assert!(optional.overlay_visible());
        assert!(!optional.access_granted());
        assert_eq!(optional.alert(), Some("Please sign in to continue."));
    }
}
