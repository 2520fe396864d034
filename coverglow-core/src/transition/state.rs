//! Transition state machine

/// Sweep lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionState {
    /// Mirror frame is on the display, nothing in progress
    #[default]
    Idle,
    /// Interpolated frames are being presented
    Sweeping {
        /// Next step to present (0-based)
        step: u16,
        /// Total step count
        steps: u16,
    },
    /// Target is ready to become the mirror
    Committed,
}

/// Events driving the transition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionEvent {
    /// A complete target frame was decoded
    FrameReady {
        /// Number of interpolation steps to run
        steps: u16,
    },
    /// The current step frame reached the sink
    StepPresented,
    /// The target was copied over the mirror and pushed
    Finished,
}

impl TransitionState {
    /// Check if a sweep or commit is pending
    pub fn is_active(&self) -> bool {
        !matches!(self, TransitionState::Idle)
    }

    /// Process an event and return the next state
    ///
    /// A `FrameReady` that arrives while a sweep is underway is ignored;
    /// the target buffer keeps its latest contents for the next trigger.
    pub fn transition(self, event: TransitionEvent) -> Self {
        use TransitionEvent::*;
        use TransitionState::*;

        match (self, event) {
            (Idle, FrameReady { steps: 0 }) => Committed,
            (Idle, FrameReady { steps }) => Sweeping { step: 0, steps },

            (Sweeping { step, steps }, StepPresented) => {
                if step + 1 >= steps {
                    Committed
                } else {
                    Sweeping {
                        step: step + 1,
                        steps,
                    }
                }
            }

            (Committed, Finished) => Idle,

            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_starts_sweep() {
        let state = TransitionState::Idle.transition(TransitionEvent::FrameReady { steps: 3 });
        assert_eq!(state, TransitionState::Sweeping { step: 0, steps: 3 });
        assert!(state.is_active());
    }

    #[test]
    fn test_zero_steps_commits_immediately() {
        let state = TransitionState::Idle.transition(TransitionEvent::FrameReady { steps: 0 });
        assert_eq!(state, TransitionState::Committed);
    }

    #[test]
    fn test_full_cycle() {
        let mut state = TransitionState::Idle.transition(TransitionEvent::FrameReady { steps: 2 });
        state = state.transition(TransitionEvent::StepPresented);
        assert_eq!(state, TransitionState::Sweeping { step: 1, steps: 2 });
        state = state.transition(TransitionEvent::StepPresented);
        assert_eq!(state, TransitionState::Committed);
        state = state.transition(TransitionEvent::Finished);
        assert_eq!(state, TransitionState::Idle);
        assert!(!state.is_active());
    }

    #[test]
    fn test_overlapping_trigger_ignored() {
        let sweeping = TransitionState::Sweeping { step: 4, steps: 10 };
        assert_eq!(
            sweeping.transition(TransitionEvent::FrameReady { steps: 20 }),
            sweeping
        );
        assert_eq!(
            TransitionState::Committed.transition(TransitionEvent::FrameReady { steps: 5 }),
            TransitionState::Committed
        );
    }

    #[test]
    fn test_stray_events_keep_state() {
        assert_eq!(
            TransitionState::Idle.transition(TransitionEvent::StepPresented),
            TransitionState::Idle
        );
        assert_eq!(
            TransitionState::Idle.transition(TransitionEvent::Finished),
            TransitionState::Idle
        );
        let sweeping = TransitionState::Sweeping { step: 0, steps: 1 };
        assert_eq!(sweeping.transition(TransitionEvent::Finished), sweeping);
    }
}
