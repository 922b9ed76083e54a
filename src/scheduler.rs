use std::{cell::RefCell, collections::VecDeque};

use log::debug;

use crate::{TagloomResult, engine::Engine};

/// A unit of deferred work. It receives the engine and the scheduler so it can
/// load templates and queue further work of its own.
pub type Task = Box<dyn FnOnce(&Engine, &Scheduler) -> TagloomResult<()>>;

/// A single-threaded FIFO queue of deferred continuations.
///
/// Rendering never blocks on a template whose name is only known at render
/// time. The tag reserves its place in the output with a
/// [`DeferredCell`](crate::DeferredCell) and queues the loading here. Whoever
/// started the render drains the queue with [`Scheduler::run_until_idle`]
/// before reading the output.
#[derive(Default)]
pub struct Scheduler {
    queue: RefCell<VecDeque<Task>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer<F>(&self, task: F)
    where
        F: FnOnce(&Engine, &Self) -> TagloomResult<()> + 'static,
    {
        let mut queue = self.queue.borrow_mut();
        queue.push_back(Box::new(task));
        debug!("deferred task queued ({} pending)", queue.len());
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Runs queued tasks, including tasks they queue, until none are left.
    ///
    /// # Errors
    ///
    /// Stops at the first task that fails and returns its error. Tasks still
    /// queued at that point are left unrun.
    pub fn run_until_idle(&self, engine: &Engine) -> TagloomResult<()> {
        loop {
            // The borrow must end before the task runs, as tasks may defer.
            let next = self.queue.borrow_mut().pop_front();
            let Some(task) = next else {
                return Ok(());
            };
            debug!("running deferred task ({} still pending)", self.pending());
            task(engine, self)?;
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
