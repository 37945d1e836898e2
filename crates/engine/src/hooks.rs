//! Lifecycle hooks
//!
//! Hooks are user callbacks run at fixed points of `serialize` and `parse`.
//! A hook may mutate the object or instance it receives. Whatever it returns
//! is discarded, and whatever it throws (or panics with) is swallowed:
//! a hook can never break the no-throw guarantee of the pipeline.

use errwire_core::{Function, Value};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Hook points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// `beforeSerialize(instance)`
    BeforeSerialize,
    /// `afterSerialize(instance, object)`
    AfterSerialize,
    /// `transformObject(object, instance)`
    TransformObject,
    /// `beforeParse(object)`
    BeforeParse,
    /// `afterParse(object, instance)`
    AfterParse,
    /// `transformInstance(instance, object)`
    TransformInstance,
    /// `transformArgs(args, object, class)`
    TransformArgs,
}

impl Hook {
    /// All hook points
    pub const ALL: [Hook; 7] = [
        Hook::BeforeSerialize,
        Hook::AfterSerialize,
        Hook::TransformObject,
        Hook::BeforeParse,
        Hook::AfterParse,
        Hook::TransformInstance,
        Hook::TransformArgs,
    ];

    /// Option key naming this hook
    pub fn name(self) -> &'static str {
        match self {
            Hook::BeforeSerialize => "beforeSerialize",
            Hook::AfterSerialize => "afterSerialize",
            Hook::TransformObject => "transformObject",
            Hook::BeforeParse => "beforeParse",
            Hook::AfterParse => "afterParse",
            Hook::TransformInstance => "transformInstance",
            Hook::TransformArgs => "transformArgs",
        }
    }

    /// Hook named by an option key
    pub fn from_name(name: &str) -> Option<Hook> {
        Hook::ALL.into_iter().find(|hook| hook.name() == name)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registered hooks, at most one per hook point
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    slots: [Option<Function>; 7],
}

impl Hooks {
    /// The hook registered at `hook`
    pub fn get(&self, hook: Hook) -> Option<&Function> {
        self.slots[hook as usize].as_ref()
    }

    /// Register `function` at `hook`, replacing any previous one
    pub fn set(&mut self, hook: Hook, function: Function) {
        self.slots[hook as usize] = Some(function);
    }

    /// Whether a hook is registered at `hook`
    pub fn has(&self, hook: Hook) -> bool {
        self.get(hook).is_some()
    }

    /// Invoke the hook registered at `hook`, if any
    pub fn call(&self, hook: Hook, args: &[Value]) {
        call(self.get(hook), hook, args);
    }
}

/// Invoke `function` with `args`, discarding its result and swallowing any
/// throw or panic. No-op when `function` is `None`.
pub fn call(function: Option<&Function>, hook: Hook, args: &[Value]) {
    let Some(function) = function else {
        return;
    };
    match panic::catch_unwind(AssertUnwindSafe(|| function.call(args))) {
        Ok(Ok(_)) => {}
        Ok(Err(thrown)) => {
            debug!(target: "errwire::hook", hook = %hook, error = %thrown, "Hook threw, ignoring");
        }
        Err(_) => {
            debug!(target: "errwire::hook", hook = %hook, "Hook panicked, ignoring");
        }
    }
}
