//! Listener registry - ordered listener bindings per event type.
//!
//! Bindings are registered once at startup through [`ListenerRegistryBuilder`]
//! and frozen by [`ListenerRegistryBuilder::build`]. The resulting
//! [`ListenerRegistry`] is read-only, so lookups need no locking.
//!
//! ## Ordering
//!
//! Within one event type bindings are kept sorted by priority ascending
//! (lower runs first). Equal priorities keep registration order: a new
//! binding is inserted after every existing binding with a priority less
//! than or equal to its own.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::DomainEvent;
use crate::ports::{DispatchMode, EventListener};

use super::outcome::panic_message;

/// Smallest accepted priority (runs first).
pub const HIGHEST_PRECEDENCE: i32 = -1_000_000;

/// Largest accepted priority (runs last). Bindings default to it.
pub const LOWEST_PRECEDENCE: i32 = 1_000_000;

/// Malformed binding detected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("listener registered for '{event_type}' has a blank name")]
    BlankListenerName { event_type: &'static str },

    #[error("listener '{listener}' for '{event_type}' has priority {priority}, expected {min}..={max}")]
    InvalidPriority {
        event_type: &'static str,
        listener: &'static str,
        priority: i32,
        min: i32,
        max: i32,
    },

    #[error("listener '{listener}' is already registered for '{event_type}'")]
    DuplicateListener {
        event_type: &'static str,
        listener: &'static str,
    },
}

type PredicateFn<E> = dyn Fn(&E) -> Result<bool, String> + Send + Sync;

/// Typed condition deciding whether a listener applies to an event.
///
/// A predicate that returns `Err` or panics counts as "does not match".
pub struct Predicate<E> {
    description: &'static str,
    test: Arc<PredicateFn<E>>,
}

impl<E: DomainEvent> Predicate<E> {
    /// Wraps an infallible condition.
    pub fn new<F>(description: &'static str, test: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            description,
            test: Arc::new(move |event| Ok(test(event))),
        }
    }

    /// Wraps a condition that may fail to evaluate.
    pub fn fallible<F, M>(description: &'static str, test: F) -> Self
    where
        F: Fn(&E) -> Result<bool, M> + Send + Sync + 'static,
        M: fmt::Display,
    {
        Self {
            description,
            test: Arc::new(move |event| test(event).map_err(|e| e.to_string())),
        }
    }

    /// Human-readable form of the condition, e.g. `amount > 1000`.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Evaluates the condition, converting a panic into an error.
    pub fn evaluate(&self, event: &E) -> Result<bool, String> {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.test)(event))) {
            Ok(result) => result,
            Err(payload) => Err(format!("predicate panicked: {}", panic_message(payload.as_ref()))),
        }
    }
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        Self {
            description: self.description,
            test: Arc::clone(&self.test),
        }
    }
}

impl<E> fmt::Debug for Predicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("description", &self.description)
            .finish()
    }
}

/// One subscriber for events of type `E`.
pub struct ListenerBinding<E: DomainEvent> {
    listener: Arc<dyn EventListener<E>>,
    priority: i32,
    mode: DispatchMode,
    predicate: Option<Predicate<E>>,
}

impl<E: DomainEvent> ListenerBinding<E> {
    /// Creates a binding with the lowest precedence and no predicate.
    pub fn new(listener: Arc<dyn EventListener<E>>, mode: DispatchMode) -> Self {
        Self {
            listener,
            priority: LOWEST_PRECEDENCE,
            mode,
            predicate: None,
        }
    }

    /// Binding awaited inline by the publisher.
    pub fn sync(listener: Arc<dyn EventListener<E>>) -> Self {
        Self::new(listener, DispatchMode::Sync)
    }

    /// Binding handed to the dispatch executor.
    pub fn asynchronous(listener: Arc<dyn EventListener<E>>) -> Self {
        Self::new(listener, DispatchMode::Async)
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_predicate(mut self, predicate: Predicate<E>) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Shorthand for `with_predicate(Predicate::new(description, test))`.
    pub fn when<F>(self, description: &'static str, test: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.with_predicate(Predicate::new(description, test))
    }

    pub fn listener(&self) -> &Arc<dyn EventListener<E>> {
        &self.listener
    }

    pub fn name(&self) -> &'static str {
        self.listener.name()
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn predicate(&self) -> Option<&Predicate<E>> {
        self.predicate.as_ref()
    }

    /// Whether this binding applies to `event`. No predicate always matches.
    pub fn matches(&self, event: &E) -> Result<bool, String> {
        match &self.predicate {
            Some(predicate) => predicate.evaluate(event),
            None => Ok(true),
        }
    }

    fn validate(&self) -> Result<(), RegistrationError> {
        let event_type = type_name::<E>();
        let listener = self.name();

        if listener.trim().is_empty() {
            return Err(RegistrationError::BlankListenerName { event_type });
        }
        if !(HIGHEST_PRECEDENCE..=LOWEST_PRECEDENCE).contains(&self.priority) {
            return Err(RegistrationError::InvalidPriority {
                event_type,
                listener,
                priority: self.priority,
                min: HIGHEST_PRECEDENCE,
                max: LOWEST_PRECEDENCE,
            });
        }
        Ok(())
    }

    fn describe(&self) -> BindingDescription {
        BindingDescription {
            event_type: type_name::<E>(),
            listener: self.name(),
            priority: self.priority,
            mode: self.mode,
            predicate: self.predicate.as_ref().map(Predicate::description),
        }
    }
}

impl<E: DomainEvent> Clone for ListenerBinding<E> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
            priority: self.priority,
            mode: self.mode,
            predicate: self.predicate.clone(),
        }
    }
}

impl<E: DomainEvent> fmt::Debug for ListenerBinding<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerBinding")
            .field("listener", &self.name())
            .field("priority", &self.priority)
            .field("mode", &self.mode)
            .field("predicate", &self.predicate)
            .finish()
    }
}

/// Type-erased summary of one binding, used for startup logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescription {
    pub event_type: &'static str,
    pub listener: &'static str,
    pub priority: i32,
    pub mode: DispatchMode,
    pub predicate: Option<&'static str>,
}

impl fmt::Display for BindingDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} (priority {}, {})",
            self.event_type, self.listener, self.priority, self.mode
        )?;
        if let Some(predicate) = self.predicate {
            write!(f, " when {}", predicate)?;
        }
        Ok(())
    }
}

/// Collects bindings at startup.
///
/// Errors are deferred to [`build`](Self::build) so registration reads as
/// one chain; the first malformed binding is reported.
#[derive(Default)]
pub struct ListenerRegistryBuilder {
    bindings: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    descriptions: Vec<BindingDescription>,
    errors: Vec<RegistrationError>,
}

impl ListenerRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding for events of type `E`.
    pub fn register<E: DomainEvent>(mut self, binding: ListenerBinding<E>) -> Self {
        if let Err(err) = binding.validate() {
            self.errors.push(err);
            return self;
        }

        let slot = self
            .bindings
            .entry(TypeId::of::<E>())
            .or_insert_with(|| Box::new(Vec::<ListenerBinding<E>>::new()));
        let Some(list) = slot.downcast_mut::<Vec<ListenerBinding<E>>>() else {
            // Keyed by TypeId::of::<E>(), so the slot always holds this type.
            return self;
        };

        if list.iter().any(|b| b.name() == binding.name()) {
            self.errors.push(RegistrationError::DuplicateListener {
                event_type: type_name::<E>(),
                listener: binding.name(),
            });
            return self;
        }

        let position = list.partition_point(|b| b.priority <= binding.priority);
        self.descriptions.push(binding.describe());
        list.insert(position, binding);
        self
    }

    /// Freezes the registry, failing on the first malformed binding.
    pub fn build(self) -> Result<ListenerRegistry, RegistrationError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut descriptions = self.descriptions;
        descriptions.sort_by(|a, b| {
            a.event_type
                .cmp(b.event_type)
                .then(a.priority.cmp(&b.priority))
        });

        Ok(ListenerRegistry {
            bindings: self.bindings,
            descriptions,
        })
    }
}

/// Immutable set of listener bindings, grouped by event type.
#[derive(Default)]
pub struct ListenerRegistry {
    bindings: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    descriptions: Vec<BindingDescription>,
}

impl ListenerRegistry {
    pub fn builder() -> ListenerRegistryBuilder {
        ListenerRegistryBuilder::new()
    }

    /// Bindings for `E` in dispatch order. Empty if none are registered.
    pub fn lookup<E: DomainEvent>(&self) -> &[ListenerBinding<E>] {
        self.bindings
            .get(&TypeId::of::<E>())
            .and_then(|slot| slot.downcast_ref::<Vec<ListenerBinding<E>>>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn listener_count<E: DomainEvent>(&self) -> usize {
        self.lookup::<E>().len()
    }

    /// Total number of bindings across all event types.
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    /// Every binding, grouped by event type and in dispatch order.
    pub fn describe(&self) -> &[BindingDescription] {
        &self.descriptions
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("bindings", &self.descriptions)
            .finish()
    }
}
