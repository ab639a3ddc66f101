use shared::SessionUser;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SessionChipProps {
    pub user: Option<SessionUser>,
    pub logging_out: bool,
    pub on_logout: Callback<()>,
    pub on_sign_in: Callback<()>,
}

#[function_component(SessionChip)]
pub fn session_chip(props: &SessionChipProps) -> Html {
    let handle_logout = {
        let on_logout = props.on_logout.clone();
        Callback::from(move |_: MouseEvent| on_logout.emit(()))
    };
    let handle_sign_in = {
        let on_sign_in = props.on_sign_in.clone();
        Callback::from(move |_: MouseEvent| on_sign_in.emit(()))
    };

    match &props.user {
        Some(user) => html! {
            <div class="auth-button-container">
                <div class="user-info">
                    <div class="user-details">
                        <span class="session-chip user-name" data-role="session-chip" title={user.email.clone()}>
                            <i class="fa-solid fa-user"></i>{" "}{ user.to_string() }
                        </span>
                    </div>
                    <button
                        class="logout-button"
                        data-role="logout"
                        onclick={handle_logout}
                        disabled={props.logging_out}
                        title="Logout"
                    >
                        if props.logging_out {
                            <i class="fa-solid fa-spinner fa-spin"></i>{" Signing out..."}
                        } else {
                            <i class="fa-solid fa-sign-out-alt"></i>{" Logout"}
                        }
                    </button>
                </div>
            </div>
        },
        None => html! {
            <div class="auth-button-container">
                <span class="session-chip" data-role="session-chip"></span>
                <button class="login-button" onclick={handle_sign_in} title="Sign in">
                    <i class="fa-solid fa-right-to-bracket"></i>{" Sign in"}
                </button>
            </div>
        },
    }
}
