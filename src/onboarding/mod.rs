//! First-run onboarding
//!
//! A fixed, linear four-step carousel shown until the user finishes or skips
//! it once. Completion is remembered through a [`FlagStore`].
//!
//! ```text
//!   Step 0 ──next──► Step 1 ──next──► Step 2 ──next──► Step 3 ──next──┐
//!     ▲  ◄──back──     ▲   ◄──back──    ▲   ◄──back──                  │
//!     │                                                                ▼
//!     └──────────── replay ◄──────────── Completed ◄──── skip (any step)
//! ```

pub mod steps;
pub mod store;

pub use steps::{OnboardingStep, STEPS, STEP_COUNT};
pub use store::{FileFlagStore, FlagStore, MemoryFlagStore, HAS_SEEN_ONBOARDING_KEY};

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Where the user is in the carousel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingState {
    Step(usize),
    Completed,
}

/// Onboarding state machine bound to its flag store
pub struct OnboardingFlow {
    store: Arc<dyn FlagStore>,
    state: OnboardingState,
}

impl OnboardingFlow {
    /// Start at the first step, or completed if the flag is already set
    pub fn start(store: Arc<dyn FlagStore>) -> Result<Self> {
        let state = if store.has_seen_onboarding()? {
            OnboardingState::Completed
        } else {
            OnboardingState::Step(0)
        };
        debug!(?state, "Onboarding started");
        Ok(Self { store, state })
    }

    pub fn state(&self) -> OnboardingState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == OnboardingState::Completed
    }

    /// Content of the step on screen, if any
    pub fn current_step(&self) -> Option<&'static OnboardingStep> {
        match self.state {
            OnboardingState::Step(index) => STEPS.get(index),
            OnboardingState::Completed => None,
        }
    }

    /// Advance one step; the last step completes the flow
    pub fn next(&mut self) -> Result<OnboardingState> {
        match self.state {
            OnboardingState::Step(index) if index + 1 < STEP_COUNT => {
                self.state = OnboardingState::Step(index + 1);
            }
            OnboardingState::Step(_) => self.complete()?,
            OnboardingState::Completed => return Err(Error::OnboardingCompleted),
        }
        Ok(self.state)
    }

    /// Go back one step; unavailable on the first step
    pub fn back(&mut self) -> Result<OnboardingState> {
        match self.state {
            OnboardingState::Step(0) => Err(Error::BackUnavailable),
            OnboardingState::Step(index) => {
                self.state = OnboardingState::Step(index - 1);
                Ok(self.state)
            }
            OnboardingState::Completed => Err(Error::OnboardingCompleted),
        }
    }

    /// Complete from any step
    pub fn skip(&mut self) -> Result<OnboardingState> {
        match self.state {
            OnboardingState::Step(index) => {
                info!(step = index, "Onboarding skipped");
                self.complete()?;
                Ok(self.state)
            }
            OnboardingState::Completed => Err(Error::OnboardingCompleted),
        }
    }

    /// "View tutorial again": re-enter at the first step, flag untouched
    pub fn replay(&mut self) -> OnboardingState {
        self.state = OnboardingState::Step(0);
        self.state
    }

    /// Label of the primary button on the current step
    pub fn primary_label(&self) -> Option<&'static str> {
        match self.state {
            OnboardingState::Step(index) if index + 1 == STEP_COUNT => Some("Get Started"),
            OnboardingState::Step(_) => Some("Next"),
            OnboardingState::Completed => None,
        }
    }

    /// "Step N of 4"
    pub fn progress_label(&self) -> Option<String> {
        match self.state {
            OnboardingState::Step(index) => {
                Some(format!("Step {} of {}", index + 1, STEP_COUNT))
            }
            OnboardingState::Completed => None,
        }
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.state, OnboardingState::Step(index) if index > 0)
    }

    fn complete(&mut self) -> Result<()> {
        self.store.mark_onboarding_seen()?;
        self.state = OnboardingState::Completed;
        info!("Onboarding completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn fresh() -> (Arc<MemoryFlagStore>, OnboardingFlow) {
        let store = Arc::new(MemoryFlagStore::new());
        let flow = OnboardingFlow::start(store.clone()).unwrap();
        (store, flow)
    }

    #[test]
    fn test_first_run_starts_at_step_zero() {
        let (_, flow) = fresh();
        assert_eq!(flow.state(), OnboardingState::Step(0));
        assert_eq!(flow.primary_label(), Some("Next"));
        assert_eq!(flow.progress_label().as_deref(), Some("Step 1 of 4"));
        assert_eq!(flow.current_step().unwrap().title, "Welcome to Karma Tipper");
    }

    #[test]
    fn test_seen_flag_starts_completed() {
        let flow = OnboardingFlow::start(Arc::new(MemoryFlagStore::seen())).unwrap();
        assert!(flow.is_completed());
        assert!(flow.current_step().is_none());
        assert!(flow.primary_label().is_none());
    }

    #[test]
    fn test_next_through_all_steps() {
        let (store, mut flow) = fresh();
        assert_eq!(flow.next().unwrap(), OnboardingState::Step(1));
        assert_eq!(flow.next().unwrap(), OnboardingState::Step(2));
        assert_eq!(flow.next().unwrap(), OnboardingState::Step(3));
        assert_eq!(flow.primary_label(), Some("Get Started"));
        assert!(!store.has_seen_onboarding().unwrap());

        assert_eq!(flow.next().unwrap(), OnboardingState::Completed);
        assert!(store.has_seen_onboarding().unwrap());
        assert!(matches!(flow.next(), Err(Error::OnboardingCompleted)));
    }

    #[test]
    fn test_back() {
        let (_, mut flow) = fresh();
        assert!(!flow.can_go_back());
        assert!(matches!(flow.back(), Err(Error::BackUnavailable)));
        assert_eq!(flow.state(), OnboardingState::Step(0));

        flow.next().unwrap();
        flow.next().unwrap();
        assert!(flow.can_go_back());
        assert_eq!(flow.back().unwrap(), OnboardingState::Step(1));
    }

    #[test]
    fn test_skip_from_any_step() {
        for steps_taken in 0..STEP_COUNT {
            let (store, mut flow) = fresh();
            for _ in 0..steps_taken {
                flow.next().unwrap();
            }
            assert_eq!(flow.skip().unwrap(), OnboardingState::Completed);
            assert!(store.has_seen_onboarding().unwrap());
        }
    }

    #[test]
    fn test_replay_keeps_flag() {
        let store = Arc::new(MemoryFlagStore::seen());
        let mut flow = OnboardingFlow::start(store.clone()).unwrap();

        assert_eq!(flow.replay(), OnboardingState::Step(0));
        assert!(store.has_seen_onboarding().unwrap());
        assert_eq!(flow.progress_label().as_deref(), Some("Step 1 of 4"));
    }

    #[test]
    fn test_completion_survives_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tipper-state.json");

        let mut flow = OnboardingFlow::start(Arc::new(FileFlagStore::new(&path))).unwrap();
        assert_eq!(flow.state(), OnboardingState::Step(0));
        flow.skip().unwrap();

        let again = OnboardingFlow::start(Arc::new(FileFlagStore::new(&path))).unwrap();
        assert!(again.is_completed());
    }

    #[test]
    fn test_step_content() {
        assert_eq!(STEP_COUNT, 4);
        for step in STEPS.iter() {
            assert!(!step.emoji.is_empty());
            assert!(!step.title.is_empty());
            assert!(!step.description.is_empty());
            assert!(!step.details.is_empty());
        }
    }
}
