//! BoxTransitionHook -- object-safe dynamic dispatch wrapper for TransitionHook.
//!
//! `TransitionHook` uses RPITIT and cannot be a trait object, so:
//! 1. `TransitionHookDyn` is the object-safe twin with boxed futures
//! 2. it is blanket-implemented for every `T: TransitionHook`
//! 3. `BoxTransitionHook` wraps `Box<dyn TransitionHookDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use robotskills_types::error::HookError;

use super::{TransitionEvent, TransitionHook};

/// Object-safe version of [`TransitionHook`].
pub trait TransitionHookDyn: Send + Sync {
    fn name(&self) -> &str;

    fn on_transition_boxed<'a>(
        &'a self,
        event: &'a TransitionEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'a>>;
}

impl<T: TransitionHook> TransitionHookDyn for T {
    fn name(&self) -> &str {
        TransitionHook::name(self)
    }

    fn on_transition_boxed<'a>(
        &'a self,
        event: &'a TransitionEvent,
    ) -> Pin<Box<dyn Future<Output = Result<(), HookError>> + Send + 'a>> {
        Box::pin(self.on_transition(event))
    }
}

/// Type-erased hook, so adapters chosen at startup can share one chain.
pub struct BoxTransitionHook {
    inner: Box<dyn TransitionHookDyn>,
}

impl BoxTransitionHook {
    pub fn new<T: TransitionHook + 'static>(hook: T) -> Self {
        Self {
            inner: Box::new(hook),
        }
    }
}

impl TransitionHook for BoxTransitionHook {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn on_transition(&self, event: &TransitionEvent) -> Result<(), HookError> {
        self.inner.on_transition_boxed(event).await
    }
}
