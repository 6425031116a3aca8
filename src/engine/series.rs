//! Upstream data series and change notifications.
//!
//! A [`SeriesHandle`] is a shared reference to a time-ordered,
//! index-stable sequence of [`DataPoint`]s owned by the data provider.
//! Consumers observe it through [`subscribe`](SeriesHandle::subscribe),
//! which returns an owned [`Subscription`]; dropping (or releasing) the
//! subscription unregisters the listener. There is no ambient listener
//! registry: whoever holds the handle holds the only way to detach it,
//! so replacing a series is race-free by construction.
//!
//! Everything here is single-threaded; sharing uses `Rc`/`RefCell`.

use crate::engine::point::DataPoint;

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Lifecycle notifications emitted by a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesEvent {
    /// The provider finished (re)validating the current data set.
    DataValidated,
    /// The data set itself was replaced.
    DataSetChanged,
}

type Callback = Rc<dyn Fn(SeriesEvent)>;

struct Listener {
    id: u64,
    callback: Callback,
}

struct SeriesInner {
    points: RefCell<Vec<DataPoint>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener_id: Cell<u64>,
}

impl SeriesInner {
    fn notify(&self, event: SeriesEvent) {
        // Snapshot the callbacks so a listener registered or released
        // during delivery cannot invalidate the iteration.
        let callbacks: Vec<Callback> = self
            .listeners
            .borrow()
            .iter()
            .map(|l| Rc::clone(&l.callback))
            .collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

/// Shared reference to a price or volume data series.
#[derive(Clone)]
pub struct SeriesHandle {
    inner: Rc<SeriesInner>,
}

impl SeriesHandle {
    /// Creates a series over the given points.
    #[must_use]
    pub fn new(points: Vec<DataPoint>) -> Self {
        Self {
            inner: Rc::new(SeriesInner {
                points: RefCell::new(points),
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }

    /// Number of points currently in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.points.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.points.borrow().is_empty()
    }

    /// Read-only view of the current points.
    ///
    /// The borrow must be released before the series is mutated again.
    #[must_use]
    pub fn points(&self) -> Ref<'_, [DataPoint]> {
        Ref::map(self.inner.points.borrow(), Vec::as_slice)
    }

    /// Replaces the whole data set and emits
    /// [`SeriesEvent::DataSetChanged`].
    pub fn set_data(&self, points: Vec<DataPoint>) {
        debug!(points = points.len(), "series data set replaced");
        *self.inner.points.borrow_mut() = points;
        self.inner.notify(SeriesEvent::DataSetChanged);
    }

    /// Edits the data in place and emits
    /// [`SeriesEvent::DataValidated`] once the edit completes.
    pub fn update_data(&self, edit: impl FnOnce(&mut Vec<DataPoint>)) {
        edit(&mut self.inner.points.borrow_mut());
        debug!(points = self.len(), "series data revalidated");
        self.inner.notify(SeriesEvent::DataValidated);
    }

    /// Registers a listener and returns the handle that owns the
    /// registration. The listener fires until the handle is dropped.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(SeriesEvent) + 'static) -> Subscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner.listeners.borrow_mut().push(Listener {
            id,
            callback: Rc::new(callback),
        });
        Subscription {
            series: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Whether two handles refer to the same underlying series.
    #[must_use]
    pub fn same_series(&self, other: &SeriesHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl fmt::Debug for SeriesHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeriesHandle")
            .field("points", &self.len())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

/// Owned registration on a [`SeriesHandle`].
///
/// Dropping the subscription detaches the listener; a listener can never
/// fire after its subscription is gone.
pub struct Subscription {
    series: Weak<SeriesInner>,
    id: u64,
}

impl Subscription {
    /// Explicitly detaches the listener. Equivalent to dropping.
    pub fn release(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(series) = self.series.upgrade() {
            series.listeners.borrow_mut().retain(|l| l.id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
