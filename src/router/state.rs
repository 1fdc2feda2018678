//! Canonical router state and its pure transitions

use serde::Serialize;

use crate::message::ActionResult;

/// The single mutable entity. One writer (the router), many readers; every
/// published value is a complete state, never a half-applied one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterState {
    /// Current unsent user text.
    pub input_value: String,
    /// Outcome of the most recent successful match, if any.
    pub action_result: Option<ActionResult>,
    /// True strictly between a send and its resolution.
    pub sending_message: bool,
    /// True iff the most recent send attempt failed.
    pub api_error: bool,
}

impl RouterState {
    pub fn initial() -> Self {
        Self {
            input_value: String::new(),
            action_result: None,
            sending_message: false,
            api_error: false,
        }
    }
}

impl Default for RouterState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The six named transitions. `SendMessageSuccess`/`SendMessageFailure` are
/// produced only by the async phase of a send, never issued by callers.
#[derive(Debug, Clone)]
pub enum RouterAction {
    UpdateInput(String),
    ClearInput,
    SendMessage,
    SendMessageSuccess(ActionResult),
    SendMessageFailure,
    Reset,
}

/// Pure transition function: current state plus one action yields the next
/// complete state. Upholds the invariant that `sending_message` and
/// `api_error` are never both true (a new send clears a prior error).
pub fn reduce(state: &RouterState, action: RouterAction) -> RouterState {
    match action {
        RouterAction::UpdateInput(value) => RouterState { input_value: value, ..state.clone() },
        RouterAction::ClearInput => RouterState { input_value: String::new(), ..state.clone() },
        RouterAction::SendMessage => {
            RouterState { sending_message: true, api_error: false, ..state.clone() }
        }
        RouterAction::SendMessageSuccess(result) => RouterState {
            action_result: Some(result),
            sending_message: false,
            api_error: false,
            ..state.clone()
        },
        RouterAction::SendMessageFailure => {
            RouterState { sending_message: false, api_error: true, ..state.clone() }
        }
        RouterAction::Reset => RouterState::initial(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str) -> ActionResult {
        ActionResult { path: path.into(), params: None, original_message: "msg".into() }
    }

    #[test]
    fn update_and_clear_touch_only_input() {
        let state = reduce(&RouterState::initial(), RouterAction::UpdateInput("pizza".into()));
        assert_eq!(state.input_value, "pizza");
        assert!(state.action_result.is_none());
        assert!(!state.sending_message);
        assert!(!state.api_error);

        let cleared = reduce(&state, RouterAction::ClearInput);
        assert_eq!(cleared, RouterState::initial());
    }

    #[test]
    fn send_marks_in_flight_and_keeps_prior_result() {
        let prior = reduce(&RouterState::initial(), RouterAction::SendMessageSuccess(result("a")));
        let sending = reduce(&prior, RouterAction::SendMessage);
        assert!(sending.sending_message);
        assert_eq!(sending.action_result.as_ref().unwrap().path, "a");
    }

    #[test]
    fn success_replaces_result_and_clears_flags() {
        let sending = reduce(&RouterState::initial(), RouterAction::SendMessage);
        let state = reduce(&sending, RouterAction::SendMessageSuccess(result("search")));
        assert_eq!(state.action_result.as_ref().unwrap().path, "search");
        assert!(!state.sending_message);
        assert!(!state.api_error);
    }

    #[test]
    fn failure_sets_error_and_keeps_result() {
        let prior = reduce(&RouterState::initial(), RouterAction::SendMessageSuccess(result("a")));
        let sending = reduce(&prior, RouterAction::SendMessage);
        let state = reduce(&sending, RouterAction::SendMessageFailure);
        assert!(state.api_error);
        assert!(!state.sending_message);
        assert_eq!(state.action_result.as_ref().unwrap().path, "a");
    }

    #[test]
    fn resend_after_failure_clears_error() {
        // sending_message && api_error must never both hold
        let failed = reduce(
            &reduce(&RouterState::initial(), RouterAction::SendMessage),
            RouterAction::SendMessageFailure,
        );
        let resent = reduce(&failed, RouterAction::SendMessage);
        assert!(resent.sending_message);
        assert!(!resent.api_error);
    }

    #[test]
    fn reset_is_idempotent_from_any_state() {
        let mut state = RouterState::initial();
        for action in [
            RouterAction::UpdateInput("text".into()),
            RouterAction::SendMessage,
            RouterAction::SendMessageSuccess(result("search")),
        ] {
            state = reduce(&state, action);
        }
        let once = reduce(&state, RouterAction::Reset);
        assert_eq!(once, RouterState::initial());
        assert_eq!(reduce(&once, RouterAction::Reset), once);
    }

    #[test]
    fn flags_are_mutually_exclusive_across_all_transitions() {
        let actions = |i: usize| -> RouterAction {
            match i {
                0 => RouterAction::UpdateInput("x".into()),
                1 => RouterAction::ClearInput,
                2 => RouterAction::SendMessage,
                3 => RouterAction::SendMessageSuccess(result("a")),
                4 => RouterAction::SendMessageFailure,
                _ => RouterAction::Reset,
            }
        };
        // walk every action pair from the initial state
        for i in 0..6 {
            for j in 0..6 {
                let s1 = reduce(&RouterState::initial(), actions(i));
                assert!(!(s1.sending_message && s1.api_error), "after {i}");
                let s2 = reduce(&s1, actions(j));
                assert!(!(s2.sending_message && s2.api_error), "after {i},{j}");
            }
        }
    }
}
