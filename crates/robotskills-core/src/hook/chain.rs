//! Ordered hook chain. Each hook runs even if an earlier one failed.

use robotskills_types::error::HookError;

use super::{BoxTransitionHook, TransitionEvent, TransitionHook};

#[derive(Default)]
pub struct HookChain {
    hooks: Vec<BoxTransitionHook>,
}

impl HookChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: TransitionHook + 'static>(mut self, hook: T) -> Self {
        self.hooks.push(BoxTransitionHook::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|h| h.name()).collect()
    }
}

impl TransitionHook for HookChain {
    fn name(&self) -> &str {
        "chain"
    }

    /// Failures are logged here and never reported upwards.
    async fn on_transition(&self, event: &TransitionEvent) -> Result<(), HookError> {
        for hook in &self.hooks {
            if let Err(e) = hook.on_transition(event).await {
                tracing::warn!(
                    hook = hook.name(),
                    submission_id = %event.submission_id,
                    to = %event.to,
                    error = %e,
                    "transition hook failed"
                );
            }
        }
        Ok(())
    }
}
