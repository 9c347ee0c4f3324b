//! Scenario tests for the update/draw protocol
//!
//! Components here record every hook they receive into a shared [`EventLog`]
//! as `"label:hook"` strings.

mod draw_phase;
mod workflow;

use crate::ecs::{Component, Context, EcsError};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, cloneable record of hook invocations
#[derive(Clone, Default)]
pub(super) struct EventLog(Rc<RefCell<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: String) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Drain the recorded events
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn count(&self, event: &str) -> usize {
        self.0.borrow().iter().filter(|recorded| *recorded == event).count()
    }

    pub fn contains(&self, event: &str) -> bool {
        self.count(event) > 0
    }

    /// Recorded events ending with `:hook`
    pub fn of_hook(&self, hook: &str) -> Vec<String> {
        let suffix = format!(":{hook}");
        self.0
            .borrow()
            .iter()
            .filter(|recorded| recorded.ends_with(&suffix))
            .cloned()
            .collect()
    }
}

/// Records hooks and does nothing else
pub(super) struct Probe {
    label: &'static str,
    log: EventLog,
}

impl Probe {
    pub fn new(label: &'static str, log: &EventLog) -> Self {
        Self { label, log: log.clone() }
    }

    fn record(&self, hook: &str) {
        self.log.push(format!("{}:{hook}", self.label));
    }
}

impl Component for Probe {
    fn on_start(&mut self, _ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.record("start");
        Ok(())
    }

    fn on_enable(&mut self, _ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.record("enable");
        Ok(())
    }

    fn on_disable(&mut self, _ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.record("disable");
        Ok(())
    }

    fn on_update(&mut self, _ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.record("update");
        Ok(())
    }

    fn on_before_draw(&mut self, _ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.record("before_draw");
        Ok(())
    }

    fn on_draw(&mut self, _ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.record("draw");
        Ok(())
    }

    fn on_after_draw(&mut self, _ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.record("after_draw");
        Ok(())
    }

    fn on_destroy(&mut self, _ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.record("destroy");
        Ok(())
    }
}

type Script = Box<dyn FnMut(&str, &mut Context<'_>) -> Result<(), EcsError>>;

/// Records hooks, then runs a closure with the hook name
pub(super) struct Scripted {
    label: &'static str,
    log: EventLog,
    script: Script,
}

impl Scripted {
    pub fn new(
        label: &'static str,
        log: &EventLog,
        script: impl FnMut(&str, &mut Context<'_>) -> Result<(), EcsError> + 'static,
    ) -> Self {
        Self { label, log: log.clone(), script: Box::new(script) }
    }

    fn run(&mut self, hook: &str, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.log.push(format!("{}:{hook}", self.label));
        (self.script)(hook, ctx)
    }
}

impl Component for Scripted {
    fn on_start(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.run("start", ctx)
    }

    fn on_enable(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.run("enable", ctx)
    }

    fn on_disable(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.run("disable", ctx)
    }

    fn on_update(&mut self, ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.run("update", ctx)
    }

    fn on_before_draw(&mut self, ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.run("before_draw", ctx)
    }

    fn on_draw(&mut self, ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.run("draw", ctx)
    }

    fn on_after_draw(&mut self, ctx: &mut Context<'_>, _delta_time: f32) -> Result<(), EcsError> {
        self.run("after_draw", ctx)
    }

    fn on_destroy(&mut self, ctx: &mut Context<'_>) -> Result<(), EcsError> {
        self.run("destroy", ctx)
    }
}

/// Plain data component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Health(pub i32);

impl Component for Health {}

/// Second plain data component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Armor(pub i32);

impl Component for Armor {}
