//! Structured event reporting. Every schedule-driven event
//! (restart, reduction, model, resource-limit warning) is both emitted
//! through the `log` facade at a matching level and offered to an
//! optional, user-installed [`EventHandler`] so a host embedding the solver
//! can react programmatically instead of scraping log output.

use std::fmt;

/// Which part of the lifecycle an event originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Load,
    Prepare,
    Solve,
    Facade,
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subsystem::Load => "load",
            Subsystem::Prepare => "prepare",
            Subsystem::Solve => "solve",
            Subsystem::Facade => "facade",
        };
        write!(f, "{name}")
    }
}

/// Verbosity band an event is reported at. Ordered so a configured minimum can be compared
/// against an event's own verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Low,
    High,
    Max,
}

/// A single reported event. Carries only the fields needed to
/// reconstruct the log line or forward it to a handler; no event variant
/// owns a reference into solver state.
#[derive(Debug, Clone)]
pub enum Event {
    Restart { conflicts_since_last: u64, decision_level_before: u32 },
    Reduction { deleted: usize, kept: usize },
    Grow { new_bound: f64 },
    Model { index: u64 },
    Message(String),
    Warning(String),
}

impl Event {
    fn verbosity(&self) -> Verbosity {
        match self {
            Event::Restart { .. } | Event::Reduction { .. } | Event::Model { .. } => Verbosity::Low,
            Event::Grow { .. } => Verbosity::High,
            Event::Message(_) => Verbosity::High,
            Event::Warning(_) => Verbosity::Quiet,
        }
    }
}

/// Consumes events a [`Logger`] reports. The default (`LogEventHandler`)
/// forwards to the `log` crate; a host can install its own to collect
/// events into a UI or a test assertion without installing a logger.
pub trait EventHandler {
    fn handle(&mut self, event: &Event, subsystem: Subsystem);
}

/// Forwards every event to the `log` crate at a matching level:
/// `info` for restarts/reductions/models, `high`-verbosity messages at
/// `debug`, warnings at `warn`. `trace`/per-propagation detail is gated
/// behind the `debug-checks` feature elsewhere and never reaches this type.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventHandler;

impl EventHandler for LogEventHandler {
    fn handle(&mut self, event: &Event, subsystem: Subsystem) {
        match event {
            Event::Restart { conflicts_since_last, decision_level_before } => {
                log::info!(target: "asp_core", "[{subsystem}] restart after {conflicts_since_last} conflicts (was at level {decision_level_before})");
            }
            Event::Reduction { deleted, kept } => {
                log::info!(target: "asp_core", "[{subsystem}] reduction deleted {deleted} learnt clauses, {kept} kept");
            }
            Event::Grow { new_bound } => {
                log::debug!(target: "asp_core", "[{subsystem}] learnt-db bound grown to {new_bound:.1}");
            }
            Event::Model { index } => {
                log::info!(target: "asp_core", "[{subsystem}] model #{index} committed");
            }
            Event::Message(message) => {
                log::debug!(target: "asp_core", "[{subsystem}] {message}");
            }
            Event::Warning(message) => {
                log::warn!(target: "asp_core", "[{subsystem}] {message}");
            }
        }
    }
}

/// Wraps an [`EventHandler`] with a subsystem/verbosity filter so callers
/// report events without re-checking the configured threshold at every
/// call site.
pub struct Logger {
    handler: Box<dyn EventHandler>,
    minimum_verbosity: Verbosity,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("minimum_verbosity", &self.minimum_verbosity).finish()
    }
}

impl Logger {
    pub fn new(handler: Box<dyn EventHandler>, minimum_verbosity: Verbosity) -> Self {
        Logger { handler, minimum_verbosity }
    }

    pub(crate) fn report(&mut self, event: Event, subsystem: Subsystem) {
        if event.verbosity() >= self.minimum_verbosity {
            self.handler.handle(&event, subsystem);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(Box::new(LogEventHandler), Verbosity::Low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collector(Vec<String>);

    impl EventHandler for Collector {
        fn handle(&mut self, event: &Event, _subsystem: Subsystem) {
            self.0.push(format!("{event:?}"));
        }
    }

    #[test]
    fn filters_below_minimum_verbosity() {
        struct SharedCollector(std::rc::Rc<std::cell::RefCell<Collector>>);
        impl EventHandler for SharedCollector {
            fn handle(&mut self, event: &Event, subsystem: Subsystem) {
                self.0.borrow_mut().handle(event, subsystem)
            }
        }
        let collector = std::rc::Rc::new(std::cell::RefCell::new(Collector::default()));
        let mut logger = Logger::new(Box::new(SharedCollector(collector.clone())), Verbosity::High);

        logger.report(Event::Restart { conflicts_since_last: 10, decision_level_before: 3 }, Subsystem::Solve);
        assert!(collector.borrow().0.is_empty(), "Low-verbosity restart event should be filtered out");

        logger.report(Event::Grow { new_bound: 42.0 }, Subsystem::Solve);
        assert_eq!(collector.borrow().0.len(), 1);
    }
}
