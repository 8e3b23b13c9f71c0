//! # Swap Flow Navigation
//!
//! A closed state machine over the swap flow's focus states. Each side of
//! the form tracks its own focus step (amount field, token list, token
//! search), and the review and gas panels sit in one shared config layer
//! above both. Every legal step change is listed in one table; anything
//! else is a bug in the caller and gets logged loudly (and asserted in
//! debug builds) instead of silently corrupting the flow.

use parking_lot::RwLock;
use shared::SwapSide;
use tracing::{debug, error};

/// Focus state of one side of the swap form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusStep {
    /// The amount field has focus; no picker is open.
    InputElement,
    /// The side's token list is open.
    TokenList,
    /// The token search field has focus, over the open list.
    Search,
}

impl FocusStep {
    /// Steps reachable from this one. Search is only reachable over an
    /// open token list.
    fn can_go_to(self, next: FocusStep) -> bool {
        use FocusStep::*;
        matches!(
            (self, next),
            (InputElement, TokenList)
                | (TokenList, InputElement)
                | (TokenList, Search)
                | (Search, TokenList)
                | (Search, InputElement)
        )
    }
}

/// The shared panel layer above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPanel {
    Closed,
    /// Gas speed and custom fee editor.
    Gas,
    /// Final review before submission.
    Review,
}

type Hook = Box<dyn Fn() + Send + Sync + 'static>;

struct NavState {
    input_step: FocusStep,
    output_step: FocusStep,
    config: ConfigPanel,
    /// One-shot: set when review detours into the gas panel, so closing the
    /// panel returns to review instead of the form.
    return_to_review: bool,
}

impl NavState {
    fn step(&self, side: SwapSide) -> FocusStep {
        match side {
            SwapSide::Input => self.input_step,
            SwapSide::Output => self.output_step,
        }
    }

    fn set_step(&mut self, side: SwapSide, step: FocusStep) {
        match side {
            SwapSide::Input => self.input_step = step,
            SwapSide::Output => self.output_step = step,
        }
    }

    fn searching(&self) -> bool {
        self.input_step == FocusStep::Search || self.output_step == FocusStep::Search
    }

    fn dismiss_config(&mut self) {
        self.config = ConfigPanel::Closed;
        self.return_to_review = false;
    }
}

/// The swap flow navigator.
pub struct Navigator {
    state: RwLock<NavState>,
    exit_search_hooks: RwLock<Vec<Hook>>,
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(NavState {
                input_step: FocusStep::InputElement,
                output_step: FocusStep::InputElement,
                config: ConfigPanel::Closed,
                return_to_review: false,
            }),
            exit_search_hooks: RwLock::new(Vec::new()),
        }
    }

    pub fn step(&self, side: SwapSide) -> FocusStep {
        self.state.read().step(side)
    }

    pub fn config(&self) -> ConfigPanel {
        self.state.read().config
    }

    /// Which side the open token search edits, if one is open.
    pub fn search_side(&self) -> Option<SwapSide> {
        let state = self.state.read();
        if state.input_step == FocusStep::Search {
            Some(SwapSide::Input)
        } else if state.output_step == FocusStep::Search {
            Some(SwapSide::Output)
        } else {
            None
        }
    }

    /// Register a hook run whenever the token search closes. The engine uses
    /// this to refetch with the newly picked asset.
    pub fn on_exit_search(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.exit_search_hooks.write().push(Box::new(hook));
    }

    /// Toggle one side's token list. Opening it forces the other side fully
    /// closed; the two lists are never open at once. Any open review or gas
    /// panel is dismissed first.
    pub fn toggle_token_list(&self, side: SwapSide) {
        let exited_search = {
            let mut state = self.state.write();
            let was_searching = state.searching();
            state.dismiss_config();
            if state.step(side) == FocusStep::InputElement {
                Self::apply(&mut state, side, FocusStep::TokenList);
                Self::collapse(&mut state, other(side));
            } else {
                Self::collapse(&mut state, side);
            }
            was_searching && !state.searching()
        };
        if exited_search {
            self.fire_exit_search();
        }
    }

    /// Focus the token search over one side's open list. Illegal while that
    /// side's list is closed. Any open review or gas panel is dismissed
    /// first.
    pub fn focus_search(&self, side: SwapSide) -> bool {
        let mut state = self.state.write();
        state.dismiss_config();
        Self::apply(&mut state, side, FocusStep::Search)
    }

    /// Back out of the search layer: each side steps down one level, so the
    /// searching side lands back on its still-open token list and a side
    /// that was only showing its list closes fully. Fires the exit-search
    /// hooks when a search was actually open.
    pub fn exit_search(&self) {
        let exited_search = {
            let mut state = self.state.write();
            let was_searching = state.searching();
            for side in [SwapSide::Input, SwapSide::Output] {
                match state.step(side) {
                    FocusStep::Search => {
                        Self::apply(&mut state, side, FocusStep::TokenList);
                    }
                    FocusStep::TokenList => {
                        Self::apply(&mut state, side, FocusStep::InputElement);
                    }
                    FocusStep::InputElement => {}
                }
            }
            was_searching && !state.searching()
        };
        if exited_search {
            self.fire_exit_search();
        }
    }

    /// Show the review panel, forcing both sides back to their amount
    /// fields. Idempotent: calling it while review is already up does
    /// nothing, so a double tap cannot re-trigger review side effects.
    pub fn show_review(&self) -> bool {
        let (shown, exited_search) = {
            let mut state = self.state.write();
            if state.config == ConfigPanel::Review {
                (false, false)
            } else {
                let was_searching = state.searching();
                Self::collapse(&mut state, SwapSide::Input);
                Self::collapse(&mut state, SwapSide::Output);
                debug!(from = ?state.config, "showing review");
                state.config = ConfigPanel::Review;
                state.return_to_review = false;
                (true, was_searching)
            }
        };
        if exited_search {
            self.fire_exit_search();
        }
        shown
    }

    /// Show the gas panel, forcing both sides back to their amount fields.
    /// Opened from review, closing it will return there.
    pub fn show_gas(&self) -> bool {
        let (shown, exited_search) = {
            let mut state = self.state.write();
            if state.config == ConfigPanel::Gas {
                (false, false)
            } else {
                let was_searching = state.searching();
                Self::collapse(&mut state, SwapSide::Input);
                Self::collapse(&mut state, SwapSide::Output);
                debug!(from = ?state.config, "showing gas panel");
                state.return_to_review = state.config == ConfigPanel::Review;
                state.config = ConfigPanel::Gas;
                (true, was_searching)
            }
        };
        if exited_search {
            self.fire_exit_search();
        }
        shown
    }

    /// Close the gas panel, returning to review if that is where the user
    /// came from. The detour flag is consumed either way.
    pub fn close_gas_panel(&self) -> bool {
        let mut state = self.state.write();
        if state.config != ConfigPanel::Gas {
            return false;
        }
        let back = std::mem::take(&mut state.return_to_review);
        state.config = if back { ConfigPanel::Review } else { ConfigPanel::Closed };
        true
    }

    pub fn dismiss_review(&self) -> bool {
        let mut state = self.state.write();
        if state.config != ConfigPanel::Review {
            return false;
        }
        state.config = ConfigPanel::Closed;
        true
    }

    /// Transition one side to `next`. Illegal transitions keep the current
    /// step.
    fn apply(state: &mut NavState, side: SwapSide, next: FocusStep) -> bool {
        let current = state.step(side);
        if current == next {
            return false;
        }
        if !current.can_go_to(next) {
            error!(?side, ?current, ?next, "illegal focus transition");
            debug_assert!(false, "illegal focus transition: {current:?} -> {next:?}");
            return false;
        }
        debug!(?side, from = ?current, to = ?next, "focus step");
        state.set_step(side, next);
        true
    }

    /// Force a side fully closed, whatever it was showing.
    fn collapse(state: &mut NavState, side: SwapSide) {
        if state.step(side) != FocusStep::InputElement {
            Self::apply(state, side, FocusStep::InputElement);
        }
    }

    fn fire_exit_search(&self) {
        for hook in self.exit_search_hooks.read().iter() {
            hook();
        }
    }
}

fn other(side: SwapSide) -> SwapSide {
    match side {
        SwapSide::Input => SwapSide::Output,
        SwapSide::Output => SwapSide::Input,
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_token_lists_are_mutually_exclusive() {
        let nav = Navigator::new();
        nav.toggle_token_list(SwapSide::Input);
        assert_eq!(nav.step(SwapSide::Input), FocusStep::TokenList);

        // Opening the other side's list closes this one
        nav.toggle_token_list(SwapSide::Output);
        assert_eq!(nav.step(SwapSide::Input), FocusStep::InputElement);
        assert_eq!(nav.step(SwapSide::Output), FocusStep::TokenList);

        // Toggling the open side closes it
        nav.toggle_token_list(SwapSide::Output);
        assert_eq!(nav.step(SwapSide::Output), FocusStep::InputElement);
    }

    #[test]
    fn test_search_sits_over_the_open_list() {
        let nav = Navigator::new();
        nav.toggle_token_list(SwapSide::Output);
        assert!(nav.focus_search(SwapSide::Output));
        assert_eq!(nav.step(SwapSide::Output), FocusStep::Search);
        assert_eq!(nav.search_side(), Some(SwapSide::Output));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "illegal focus transition"))]
    fn test_search_without_open_list_is_loud() {
        let nav = Navigator::new();
        let focused = nav.focus_search(SwapSide::Input);
        // Release builds log and stay put instead of asserting
        assert!(!focused);
        assert_eq!(nav.step(SwapSide::Input), FocusStep::InputElement);
    }

    #[test]
    fn test_exit_search_steps_down_one_level() {
        let nav = Navigator::new();
        nav.toggle_token_list(SwapSide::Input);
        nav.focus_search(SwapSide::Input);

        // First exit lands back on the still-open token list
        nav.exit_search();
        assert_eq!(nav.step(SwapSide::Input), FocusStep::TokenList);
        assert_eq!(nav.search_side(), None);

        // Second exit closes the list fully
        nav.exit_search();
        assert_eq!(nav.step(SwapSide::Input), FocusStep::InputElement);
    }

    #[test]
    fn test_exit_search_hook_fires_on_search_close_only() {
        let nav = Navigator::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let hook_fired = fired.clone();
        nav.on_exit_search(move || {
            hook_fired.fetch_add(1, Ordering::SeqCst);
        });

        nav.toggle_token_list(SwapSide::Input);
        nav.focus_search(SwapSide::Input);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        nav.exit_search();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        // Closing just the list is not a search exit
        nav.exit_search();
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Review over an open search also closes it
        nav.toggle_token_list(SwapSide::Input);
        nav.focus_search(SwapSide::Input);
        nav.show_review();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_show_review_is_idempotent_and_collapses_sides() {
        let nav = Navigator::new();
        nav.toggle_token_list(SwapSide::Output);
        assert!(nav.show_review());
        assert_eq!(nav.config(), ConfigPanel::Review);
        assert_eq!(nav.step(SwapSide::Output), FocusStep::InputElement);

        assert!(!nav.show_review());
        assert_eq!(nav.config(), ConfigPanel::Review);
    }

    #[test]
    fn test_gas_panel_returns_to_review_once() {
        let nav = Navigator::new();
        nav.show_review();
        assert!(nav.show_gas());
        assert!(nav.close_gas_panel());
        assert_eq!(nav.config(), ConfigPanel::Review);

        // Opened from the form, the panel closes back to it
        nav.dismiss_review();
        nav.show_gas();
        assert!(nav.close_gas_panel());
        assert_eq!(nav.config(), ConfigPanel::Closed);
    }

    #[test]
    fn test_opening_a_list_dismisses_review() {
        let nav = Navigator::new();
        nav.show_review();
        nav.toggle_token_list(SwapSide::Input);
        assert_eq!(nav.config(), ConfigPanel::Closed);
        assert_eq!(nav.step(SwapSide::Input), FocusStep::TokenList);
    }
}
