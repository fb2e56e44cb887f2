//! Observable values for view-model outputs.

use std::fmt;

pub type Observer<T> = Box<dyn FnMut(&T) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// A value that pushes every change to its observers, in assignment order
pub struct Observable<T> {
    value: T,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_id: u64,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Register `observer`; it is called with the current value right away
    pub fn observe(&mut self, mut observer: impl FnMut(&T) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        observer(&self.value);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    pub fn set(&mut self, value: T) {
        self.value = value;
        self.notify();
    }

    /// Mutate in place, then notify once
    pub fn update(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.value);
        self.notify();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self) {
        let value = &self.value;
        for (_, observer) in self.observers.iter_mut() {
            observer(value);
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
