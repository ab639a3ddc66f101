pub mod controls;
pub mod focus;
pub mod session;
pub mod validation;

pub use controls::{ControlWatcher, access_granted, publish_access, request_auth};
pub use session::{AuthTab, GateState, SessionGate};
pub use validation::{LoginForm, SignupForm};
