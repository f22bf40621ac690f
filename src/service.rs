//! Selection services receive "entity selected" events from registries.
//!
//! A service is a single-consumer subscriber, comparable to a UI event loop.
//! Each service owns a [`Dispatcher`], a FIFO task queue drained by one dedicated thread,
//! and registries never call [`EntityService::publish`] on their own thread:
//! they post the call onto the service's dispatcher and return immediately.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use parking_lot::{Mutex, RwLock};

use crate::Entity;

/// Why an entity is being selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionHint {
    /// The entity becomes the new current selection.
    EntityInit,
    /// The entity is selected transiently, e.g. while dragging.
    EntityTransient,
    /// The selection results from a location being designated.
    LocationInit,
}

/// The gesture that triggered a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseMovement {
    Pressing,
    Dragging,
    Releasing,
}

/// "This entity is now the current selection."
#[derive(Debug)]
pub struct EntityEvent<E: Entity> {
    /// Name of the registry that published the event.
    pub source:   String,
    pub hint:     SelectionHint,
    pub movement: MouseMovement,
    /// The selected entity, or `None` to clear the selection.
    pub entity:   Option<Arc<E>>,
}

impl<E: Entity> Clone for EntityEvent<E> {
    fn clone(&self) -> Self {
        Self {
            source:   self.source.clone(),
            hint:     self.hint,
            movement: self.movement,
            entity:   self.entity.clone(),
        }
    }
}

/// A subscriber to entity selection events.
pub trait EntityService<E: Entity>: Send + Sync {
    /// Called once when the service is bound to a registry.
    fn connect(&self);

    /// The queue on which events for this service are delivered.
    fn dispatcher(&self) -> &Dispatcher;

    /// Handles an event.
    ///
    /// Registries only call this from the dispatcher thread.
    fn publish(&self, event: EntityEvent<E>);
}

type Task = Box<dyn FnOnce() + Send>;

/// A FIFO task queue executed by a single dedicated thread.
///
/// Tasks run in posting order, one at a time.
/// A panicking task is logged and does not stop the queue.
/// Dropping the dispatcher runs the remaining tasks and joins the thread.
pub struct Dispatcher {
    name:   String,
    sender: Mutex<Option<mpsc::Sender<Task>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    thread: thread::ThreadId,
}

impl Dispatcher {
    /// Spawns the dispatcher thread.
    ///
    /// # Panics
    /// Panics if the thread cannot be spawned.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (sender, receiver) = mpsc::channel::<Task>();

        let worker = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                for task in receiver {
                    if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                        log::error!(
                            "Task panicked on dispatcher {:?}",
                            thread::current().name().unwrap_or_default()
                        );
                    }
                }
            })
            .expect("Failed to spawn dispatcher thread");
        let thread = worker.thread().id();

        Self {
            name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            thread,
        }
    }

    pub fn name(&self) -> &str { &self.name }

    /// Whether the current thread is the dispatcher thread.
    pub fn is_dispatch_thread(&self) -> bool { thread::current().id() == self.thread }

    /// Queues `task` for execution on the dispatcher thread and returns immediately.
    ///
    /// Tasks posted after [`shutdown`](Self::shutdown) are dropped with a warning.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        let sender = self.sender.lock();
        let delivered = match &*sender {
            Some(sender) => sender.send(Box::new(task)).is_ok(),
            None => false,
        };
        if !delivered {
            log::warn!("Dispatcher {:?} is shut down, task dropped", self.name);
        }
    }

    /// Blocks until every task posted before this call has run.
    ///
    /// Returns immediately when called from the dispatcher thread itself.
    pub fn sync(&self) {
        if self.is_dispatch_thread() {
            return;
        }

        let (done, wait) = mpsc::sync_channel(1);
        self.post(move || {
            _ = done.send(());
        });
        // an error means the task was dropped by shutdown, nothing left to wait for.
        _ = wait.recv();
    }

    /// Stops accepting tasks, runs the pending ones and joins the thread.
    pub fn shutdown(&self) {
        drop(self.sender.lock().take());

        if self.is_dispatch_thread() {
            return; // cannot join ourselves; the thread ends after the current task.
        }
        if let Some(worker) = self.worker.lock().take() {
            if worker.join().is_err() {
                log::error!("Dispatcher {:?} thread panicked", self.name);
            }
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) { self.shutdown(); }
}

type Subscriber<E> = Arc<dyn Fn(&EntityEvent<E>) + Send + Sync>;

/// The standard selection service.
///
/// It keeps the latest selection and forwards every event to its subscribers,
/// in subscription order, on its dispatcher thread.
pub struct SelectionService<E: Entity> {
    dispatcher:  Dispatcher,
    connected:   AtomicBool,
    selection:   RwLock<Option<EntityEvent<E>>>,
    subscribers: RwLock<Vec<Subscriber<E>>>,
}

impl<E: Entity> SelectionService<E> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dispatcher:  Dispatcher::new(name),
            connected:   AtomicBool::new(false),
            selection:   RwLock::new(None),
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Creates a service whose dispatcher thread is named after the config.
    pub fn with_config(name: &str, config: &crate::Config) -> Self {
        Self::new(format!("{} {name}", config.dispatcher_name))
    }

    /// Registers a callback invoked on the dispatcher thread for every event.
    ///
    /// A callback registered while an event is being delivered receives the next event.
    pub fn subscribe(&self, subscriber: impl Fn(&EntityEvent<E>) + Send + Sync + 'static) {
        self.subscribers.write().push(Arc::new(subscriber));
    }

    pub fn is_connected(&self) -> bool { self.connected.load(Ordering::SeqCst) }

    /// The latest event received, if any.
    ///
    /// Events still queued on the dispatcher are not visible yet.
    pub fn selection(&self) -> Option<EntityEvent<E>> { self.selection.read().clone() }

    /// The currently selected entity, if any.
    pub fn selected_entity(&self) -> Option<Arc<E>> {
        self.selection.read().as_ref().and_then(|event| event.entity.clone())
    }
}

impl<E: Entity> EntityService<E> for SelectionService<E> {
    fn connect(&self) {
        if self.connected.swap(true, Ordering::SeqCst) {
            log::debug!("Selection service {:?} connected again", self.dispatcher.name());
        } else {
            log::debug!("Selection service {:?} connected", self.dispatcher.name());
        }
    }

    fn dispatcher(&self) -> &Dispatcher { &self.dispatcher }

    fn publish(&self, event: EntityEvent<E>) {
        log::trace!(
            "{} selected {:?} ({:?}, {:?})",
            event.source,
            event.entity.as_ref().map(|entity| entity.id()),
            event.hint,
            event.movement,
        );

        // subscribers may subscribe from their callback
        let subscribers = self.subscribers.read().clone();
        for subscriber in &subscribers {
            subscriber(&event);
        }
        *self.selection.write() = Some(event);
    }
}
