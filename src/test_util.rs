#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::{fmt, thread};

use parking_lot::{Mutex, Once};
use serde::{Deserialize, Serialize};

use crate::service::{Dispatcher, EntityEvent, EntityService};
use crate::{Entity, Identity, Point, Rect};

pub fn init() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(env_logger::init);
}

/// A rectangular test entity.
#[derive(Debug, Serialize, Deserialize)]
pub struct Shape {
    pub id:     Identity,
    pub label:  String,
    pub bounds: Rect,
    #[serde(skip)]
    removed:    AtomicBool,
}

impl Shape {
    /// Creates an unregistered shape.
    pub fn new(label: &str, bounds: Rect) -> Arc<Self> {
        Arc::new(Self {
            id:      Identity::new(),
            label:   label.to_owned(),
            bounds,
            removed: AtomicBool::new(false),
        })
    }

    /// Creates a shape with a known ID, as if it was reloaded.
    pub fn with_id(id: u32, label: &str, bounds: Rect) -> Arc<Self> {
        Arc::new(Self {
            id:      Identity::with_id(id),
            label:   label.to_owned(),
            bounds,
            removed: AtomicBool::new(false),
        })
    }

    /// Creates `count` unregistered 10x10 shapes laid out on a diagonal.
    pub fn diagonal(count: usize) -> Vec<Arc<Self>> {
        (0..count)
            .map(|i| {
                let offset = i32::try_from(i * 10).expect("too many shapes");
                Self::new(&format!("s{i}"), Rect::new(offset, offset, 10, 10))
            })
            .collect()
    }

    pub fn mark_removed(&self) { self.removed.store(true, Ordering::SeqCst) }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.label == other.label && self.bounds == other.bounds
    }
}

impl Entity for Shape {
    fn identity(&self) -> &Identity { &self.id }

    fn bounds(&self) -> Rect { self.bounds }

    fn contains(&self, point: Point) -> bool { self.bounds.contains_point(point) }

    fn is_removed(&self) -> bool { self.removed.load(Ordering::SeqCst) }
}

/// An entity whose internals cannot be formatted.
#[derive(Debug, Default)]
pub struct Broken {
    pub id:    Identity,
    pub panic: bool,
}

impl Entity for Broken {
    fn identity(&self) -> &Identity { &self.id }

    fn bounds(&self) -> Rect { Rect::default() }

    fn contains(&self, _: Point) -> bool { false }

    fn write_internals(&self, _: &mut dyn fmt::Write) -> fmt::Result {
        if self.panic {
            panic!("internals are corrupted");
        }
        Err(fmt::Error)
    }
}

/// A selection service that records every event it receives.
pub struct RecordingService<E: Entity> {
    dispatcher:  Dispatcher,
    connections: AtomicUsize,
    events:      Mutex<Vec<(EntityEvent<E>, thread::ThreadId)>>,
}

impl<E: Entity> RecordingService<E> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            dispatcher:  Dispatcher::new("test dispatcher"),
            connections: AtomicUsize::new(0),
            events:      Mutex::new(Vec::new()),
        })
    }

    pub fn connections(&self) -> usize { self.connections.load(Ordering::SeqCst) }

    /// Waits for pending deliveries, then returns the received events.
    pub fn events(&self) -> Vec<EntityEvent<E>> {
        self.dispatcher.sync();
        self.events.lock().iter().map(|(event, _)| event.clone()).collect()
    }

    /// Waits for pending deliveries, then returns the threads that received each event.
    pub fn delivery_threads(&self) -> Vec<thread::ThreadId> {
        self.dispatcher.sync();
        self.events.lock().iter().map(|&(_, thread)| thread).collect()
    }
}

impl<E: Entity> EntityService<E> for RecordingService<E> {
    fn connect(&self) { self.connections.fetch_add(1, Ordering::SeqCst); }

    fn dispatcher(&self) -> &Dispatcher { &self.dispatcher }

    fn publish(&self, event: EntityEvent<E>) {
        self.events.lock().push((event, thread::current().id()));
    }
}
