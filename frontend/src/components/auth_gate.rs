use crate::api;
use crate::components::session_chip::SessionChip;
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::gate::controls::AUTH_REQUIRED_EVENT;
use crate::gate::focus::contain_focus;
use crate::gate::validation::{MIN_PASSWORD_STRENGTH, strength_label};
use crate::gate::{
    AuthTab, ControlWatcher, GateState, LoginForm, SessionGate, SignupForm, publish_access,
};
use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use shared::SessionUser;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, KeyboardEvent};
use yew::prelude::*;

pub enum Msg {
    SessionProbed(Option<SessionUser>),
    SwitchTab(AuthTab),

    // Login form
    IdentifierChanged(String),
    PasswordChanged(String),
    RememberChanged(bool),
    SubmitLogin,

    // Signup form
    EmailChanged(String),
    UsernameChanged(String),
    SignupPasswordChanged(String),
    SubmitSignup,

    // Outcomes
    AuthSucceeded(SessionUser),
    AuthFailed(ClientError),
    Logout,
    LoggedOut,

    Dismiss,
    Reopen,
    AuthRequired,
}

#[derive(Properties, PartialEq, Clone)]
pub struct AuthGateProps {
    pub config: AppConfig,
}

/// Owns the session, the modal overlay and the session chip.
pub struct AuthGate {
    gate: SessionGate,
    login: LoginForm,
    signup: SignupForm,
    overlay_ref: NodeRef,
    login_first_ref: NodeRef,
    signup_first_ref: NodeRef,
    focus_pending: bool,
    _keydown_listener: Option<EventListener>,
    _auth_required_listener: Option<EventListener>,
    _watcher: Option<ControlWatcher>,
}

impl Component for AuthGate {
    type Message = Msg;
    type Properties = AuthGateProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = ctx.props().config.clone();
        let gate = SessionGate::new(config.require_login);
        publish_access(gate.access_granted());

        let watcher = match ControlWatcher::start(config.watch_window_ms) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                gloo_console::error!("Could not watch for the submission control:", e);
                None
            }
        };

        let overlay_ref = NodeRef::default();
        let window = web_sys::window();
        let document = window.as_ref().and_then(|w| w.document());

        // Handled synchronously: preventDefault must run inside the dispatch.
        let keydown_listener = document.map(|document| {
            let overlay_ref = overlay_ref.clone();
            let options = EventListenerOptions {
                phase: EventListenerPhase::Capture,
                passive: false,
            };
            EventListener::new_with_options(&document, "keydown", options, move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if let Some(overlay) = overlay_ref.cast::<Element>() {
                    contain_focus(&overlay, event);
                }
            })
        });

        let auth_required_listener = window.map(|window| {
            let link = ctx.link().clone();
            EventListener::new(&window, AUTH_REQUIRED_EVENT, move |_| {
                link.send_message(Msg::AuthRequired)
            })
        });

        let link = ctx.link().clone();
        spawn_local(async move {
            let user = api::check_session(&config).await;
            link.send_message(Msg::SessionProbed(user));
        });

        Self {
            gate,
            login: LoginForm::default(),
            signup: SignupForm::default(),
            overlay_ref,
            login_first_ref: NodeRef::default(),
            signup_first_ref: NodeRef::default(),
            focus_pending: true,
            _keydown_listener: keydown_listener,
            _auth_required_listener: auth_required_listener,
            _watcher: watcher,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SessionProbed(user) => {
                match &user {
                    Some(user) => log::info!("Session found for {}", user.username),
                    None => log::info!("No session; showing sign-in"),
                }
                self.gate.session_probed(user);
                self.sync_access();
                self.focus_pending = self.gate.overlay_visible();
                true
            }
            Msg::SwitchTab(tab) => {
                self.gate.switch_tab(tab);
                self.focus_pending = true;
                true
            }

            Msg::IdentifierChanged(value) => {
                self.login.identifier = value;
                true
            }
            Msg::PasswordChanged(value) => {
                self.login.password = value;
                true
            }
            Msg::RememberChanged(value) => {
                self.login.remember = value;
                true
            }
            Msg::EmailChanged(value) => {
                self.signup.email = value;
                true
            }
            Msg::UsernameChanged(value) => {
                self.signup.username = value;
                true
            }
            Msg::SignupPasswordChanged(value) => {
                self.signup.password = value;
                true
            }

            Msg::SubmitLogin => self.handle_submit_login(ctx),
            Msg::SubmitSignup => self.handle_submit_signup(ctx),

            Msg::AuthSucceeded(user) => {
                log::info!("Signed in as {}", user.username);
                self.gate.auth_succeeded(user);
                self.login.password.clear();
                self.signup.password.clear();
                self.sync_access();
                true
            }
            Msg::AuthFailed(err) => {
                log::warn!("Authentication failed: {}", err);
                self.gate.auth_failed(err.to_string());
                true
            }
            Msg::Logout => self.handle_logout(ctx),
            Msg::LoggedOut => {
                self.gate.logged_out();
                self.sync_access();
                self.focus_pending = true;
                true
            }

            Msg::Dismiss => {
                if self.gate.dismiss() {
                    self.sync_access();
                    true
                } else {
                    false
                }
            }
            Msg::Reopen => {
                if self.gate.reopen() {
                    self.sync_access();
                    self.focus_pending = true;
                    true
                } else {
                    false
                }
            }
            Msg::AuthRequired => {
                self.gate.require_auth(ClientError::AuthRequired.to_string());
                self.sync_access();
                self.focus_pending = true;
                true
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if !self.focus_pending || !self.gate.overlay_visible() {
            return;
        }
        self.focus_pending = false;

        let first_field = match self.gate.active_tab() {
            AuthTab::Login => &self.login_first_ref,
            AuthTab::Signup => &self.signup_first_ref,
        };
        if let Some(input) = first_field.cast::<HtmlInputElement>() {
            if let Err(e) = input.focus() {
                gloo_console::warn!("Could not focus the sign-in form:", e);
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();

        html! {
            <>
                <div class="top-right">
                    <SessionChip
                        user={self.gate.user().cloned()}
                        logging_out={self.gate.state() == GateState::LoggingOut}
                        on_logout={link.callback(|_| Msg::Logout)}
                        on_sign_in={link.callback(|_| Msg::Reopen)}
                    />
                </div>
                if self.gate.overlay_visible() {
                    { self.render_overlay(ctx) }
                }
            </>
        }
    }
}

// Handler methods
impl AuthGate {
    /// Mirrors the gate's access flag onto the DOM.
    fn sync_access(&self) {
        publish_access(self.gate.access_granted());
    }

    fn handle_submit_login(&mut self, ctx: &Context<Self>) -> bool {
        if !self.login.is_submittable() || !self.gate.begin_auth() {
            return false;
        }

        let config = ctx.props().config.clone();
        let credentials = self.login.credentials();
        let link = ctx.link().clone();
        spawn_local(async move {
            match api::login(&config, &credentials).await {
                Ok(user) => link.send_message(Msg::AuthSucceeded(user)),
                Err(e) => link.send_message(Msg::AuthFailed(e)),
            }
        });
        true
    }

    fn handle_submit_signup(&mut self, ctx: &Context<Self>) -> bool {
        if !self.signup.is_submittable() || !self.gate.begin_auth() {
            return false;
        }

        let config = ctx.props().config.clone();
        let credentials = self.signup.credentials();
        let link = ctx.link().clone();
        spawn_local(async move {
            match api::register(&config, &credentials).await {
                Ok(user) => link.send_message(Msg::AuthSucceeded(user)),
                Err(e) => link.send_message(Msg::AuthFailed(e)),
            }
        });
        true
    }

    fn handle_logout(&mut self, ctx: &Context<Self>) -> bool {
        if !self.gate.begin_logout() {
            return false;
        }
        // Fail closed while the request is out.
        self.sync_access();

        let config = ctx.props().config.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            api::logout(&config).await;
            link.send_message(Msg::LoggedOut);
        });
        true
    }
}

// Rendering methods
impl AuthGate {
    fn render_overlay(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let active = self.gate.active_tab();

        html! {
            <div
                id="auth-overlay"
                class="auth-overlay"
                ref={self.overlay_ref.clone()}
                role="dialog"
                aria-modal="true"
                aria-labelledby="auth-title"
            >
                // No click handler: the backdrop never closes the gate.
                <div class="auth-backdrop"></div>
                <div class="auth-modal">
                    <div class="auth-modal-header">
                        <h2 id="auth-title">{"Sign in to continue"}</h2>
                        if !self.gate.require_login() {
                            <button
                                class="auth-close"
                                aria-label="Close"
                                onclick={link.callback(|_| Msg::Dismiss)}
                            >
                                <i class="fa-solid fa-times"></i>
                            </button>
                        }
                    </div>

                    <div class="auth-tabs" role="tablist">
                        { self.render_tab(ctx, AuthTab::Login, "Login") }
                        { self.render_tab(ctx, AuthTab::Signup, "Sign up") }
                    </div>

                    if let Some(alert) = self.gate.alert() {
                        <div class="auth-alert error-message" role="alert">
                            <i class="fa-solid fa-circle-exclamation"></i>
                            <p>{ alert }</p>
                        </div>
                    }

                    { self.render_login_form(ctx, active == AuthTab::Login) }
                    { self.render_signup_form(ctx, active == AuthTab::Signup) }
                </div>
            </div>
        }
    }

    fn render_tab(&self, ctx: &Context<Self>, tab: AuthTab, label: &'static str) -> Html {
        let selected = self.gate.active_tab() == tab;
        html! {
            <button
                type="button"
                role="tab"
                class={classes!("auth-tab", selected.then_some("active"))}
                aria-selected={selected.to_string()}
                onclick={ctx.link().callback(move |_| Msg::SwitchTab(tab))}
            >
                { label }
            </button>
        }
    }

    fn render_busy_label(&self, idle: &'static str, busy: &'static str) -> Html {
        if self.gate.state() == GateState::Authenticating {
            html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" "}{ busy }</> }
        } else {
            html! { <>{ idle }</> }
        }
    }

    fn render_login_form(&self, ctx: &Context<Self>, active: bool) -> Html {
        let link = ctx.link();
        let submit_disabled = !self.login.is_submittable() || self.gate.is_busy();

        html! {
            <form
                id="login-form"
                class={classes!("auth-form", active.then_some("active"))}
                hidden={!active}
                novalidate=true
                onsubmit={link.callback(|e: SubmitEvent| {
                    e.prevent_default();
                    Msg::SubmitLogin
                })}
            >
                <label for="login-identifier">{"Email or username"}</label>
                <input
                    id="login-identifier"
                    type="text"
                    autocomplete="username"
                    ref={self.login_first_ref.clone()}
                    value={self.login.identifier.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::IdentifierChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <label for="login-password">{"Password"}</label>
                <input
                    id="login-password"
                    type="password"
                    autocomplete="current-password"
                    value={self.login.password.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::PasswordChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <label class="remember-me">
                    <input
                        type="checkbox"
                        checked={self.login.remember}
                        onchange={link.callback(|e: Event| {
                            Msg::RememberChanged(e.target_unchecked_into::<HtmlInputElement>().checked())
                        })}
                    />
                    {" Remember me"}
                </label>
                <button type="submit" class="analyze-btn" disabled={submit_disabled}>
                    { self.render_busy_label("Login", "Signing in...") }
                </button>
            </form>
        }
    }

    fn render_signup_form(&self, ctx: &Context<Self>, active: bool) -> Html {
        let link = ctx.link();
        let submit_disabled = !self.signup.is_submittable() || self.gate.is_busy();
        let strength = self.signup.strength();
        let strength_class = if strength >= MIN_PASSWORD_STRENGTH {
            "strength-ok"
        } else {
            "strength-weak"
        };
        let meter_width = format!("width: {}%", u32::from(strength) * 20);

        html! {
            <form
                id="signup-form"
                class={classes!("auth-form", active.then_some("active"))}
                hidden={!active}
                novalidate=true
                onsubmit={link.callback(|e: SubmitEvent| {
                    e.prevent_default();
                    Msg::SubmitSignup
                })}
            >
                <label for="signup-email">{"Email"}</label>
                <input
                    id="signup-email"
                    type="email"
                    autocomplete="email"
                    ref={self.signup_first_ref.clone()}
                    value={self.signup.email.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::EmailChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <label for="signup-username">{"Username"}</label>
                <input
                    id="signup-username"
                    type="text"
                    autocomplete="username"
                    value={self.signup.username.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::UsernameChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <label for="signup-password">{"Password"}</label>
                <input
                    id="signup-password"
                    type="password"
                    autocomplete="new-password"
                    value={self.signup.password.clone()}
                    oninput={link.callback(|e: InputEvent| {
                        Msg::SignupPasswordChanged(e.target_unchecked_into::<HtmlInputElement>().value())
                    })}
                />
                <div class={classes!("strength-meter", strength_class)} data-score={strength.to_string()}>
                    <div class="meter">
                        <div class="meter-fill" style={meter_width}></div>
                    </div>
                    <span class="meter-value">{ strength_label(strength) }</span>
                </div>
                <button type="submit" class="analyze-btn" disabled={submit_disabled}>
                    { self.render_busy_label("Create account", "Creating account...") }
                </button>
            </form>
        }
    }
}
