//! Shared-instance service registry.
//!
//! One concrete instance is registered once and then *bound* to each
//! capability it provides, so every capability lookup resolves to the same
//! shared instance. Services that should be driven on a cadence are
//! additionally enrolled via [`ServiceRegistry::add_cycle_service`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use takt_cycle::CycleService;

#[derive(Default)]
pub struct ServiceRegistry {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
    cycle_services: Vec<Arc<dyn CycleService>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a concrete instance, returning the shared handle used to bind
    /// capabilities. The concrete type itself is resolvable afterwards.
    pub fn register<T: Send + Sync + 'static>(&mut self, service: T) -> Arc<T> {
        let service = Arc::new(service);
        self.bind(Arc::clone(&service));
        service
    }

    /// Bind a capability (typically `Arc<dyn Trait>`) so lookups for it
    /// resolve to the given shared instance. Rebinding a capability
    /// replaces the previous binding.
    pub fn bind<C: ?Sized + Send + Sync + 'static>(&mut self, capability: Arc<C>) {
        self.entries
            .insert(TypeId::of::<Arc<C>>(), Box::new(capability));
    }

    /// Look up a previously bound capability.
    pub fn get<C: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.entries
            .get(&TypeId::of::<Arc<C>>())
            .and_then(|entry| entry.downcast_ref::<Arc<C>>())
            .cloned()
    }

    /// Enroll an instance to be driven by the host's cycle runner, in
    /// addition to any capability bindings it has.
    pub fn add_cycle_service(&mut self, service: Arc<dyn CycleService>) {
        self.cycle_services.push(service);
    }

    /// Services enrolled for cycle-driven execution, in enrollment order.
    pub fn cycle_services(&self) -> &[Arc<dyn CycleService>] {
        &self.cycle_services
    }
}
