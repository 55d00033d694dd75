// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Per-type constructor and destructor hooks, invoked when instances of a
//! type are materialized and destroyed.

use std::any::Any;

use hashbrown::HashMap;
use log::warn;
use uamodel_types::{NodeId, StatusCode};

/// Opaque payload a constructor may attach to an instance. The registry
/// stores it per instance and hands it back to the destructor, so no raw
/// pointers cross the API surface.
pub type InstanceHandle = Box<dyn Any + Send + Sync>;

/// Constructor hook for a type. Receives the node id of the newly
/// materialized instance and may return a handle to associate with it.
pub type Constructor =
    Box<dyn Fn(&NodeId) -> Result<Option<InstanceHandle>, StatusCode> + Send + Sync>;

/// Destructor hook for a type. Receives the instance node id and the
/// handle its constructor returned, if any.
pub type Destructor = Box<dyn Fn(&NodeId, Option<InstanceHandle>) + Send + Sync>;

#[derive(Default)]
struct TypeLifecycle {
    constructor: Option<Constructor>,
    destructor: Option<Destructor>,
}

/// Maps type node ids to their lifecycle hooks, and instances to the
/// handles their constructors produced.
///
/// When an instance is materialized the most-derived type with a
/// registered constructor is chosen; ancestors' hooks are not invoked
/// implicitly. Destruction resolves the destructor the same way.
#[derive(Default)]
pub struct LifecycleRegistry {
    lifecycles: HashMap<NodeId, TypeLifecycle>,
    handles: HashMap<NodeId, InstanceHandle>,
}

impl LifecycleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register, or replace, the lifecycle hooks for a type. Passing
    /// `None` for both removes the entry.
    pub fn set_lifecycle(
        &mut self,
        type_id: NodeId,
        constructor: Option<Constructor>,
        destructor: Option<Destructor>,
    ) {
        if constructor.is_none() && destructor.is_none() {
            self.lifecycles.remove(&type_id);
            return;
        }
        self.lifecycles.insert(
            type_id,
            TypeLifecycle {
                constructor,
                destructor,
            },
        );
    }

    /// Whether a constructor is registered for exactly this type.
    pub fn has_constructor(&self, type_id: &NodeId) -> bool {
        self.lifecycles
            .get(type_id)
            .is_some_and(|l| l.constructor.is_some())
    }

    /// Whether a destructor is registered for exactly this type.
    pub fn has_destructor(&self, type_id: &NodeId) -> bool {
        self.lifecycles
            .get(type_id)
            .is_some_and(|l| l.destructor.is_some())
    }

    /// Invoke the constructor registered for `type_id` on `instance`,
    /// storing the returned handle. A failing constructor cannot veto
    /// the instantiation, its error is only logged.
    pub fn construct(&mut self, type_id: &NodeId, instance: &NodeId) {
        let Some(constructor) = self
            .lifecycles
            .get(type_id)
            .and_then(|l| l.constructor.as_ref())
        else {
            return;
        };
        match constructor(instance) {
            Ok(Some(handle)) => {
                self.handles.insert(instance.clone(), handle);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(
                    "Constructor for type {} failed on instance {}: {}",
                    type_id, instance, e
                );
            }
        }
    }

    /// Invoke the destructor registered for `type_id` on `instance`,
    /// consuming the stored handle. The handle is dropped even if no
    /// destructor is registered.
    pub fn destroy(&mut self, type_id: &NodeId, instance: &NodeId) {
        let handle = self.handles.remove(instance);
        let Some(destructor) = self
            .lifecycles
            .get(type_id)
            .and_then(|l| l.destructor.as_ref())
        else {
            return;
        };
        destructor(instance, handle);
    }

    /// Get the handle stored for an instance, if its constructor
    /// produced one.
    pub fn handle(&self, instance: &NodeId) -> Option<&(dyn Any + Send + Sync)> {
        self.handles.get(instance).map(|h| h.as_ref())
    }

    /// Drop the handle stored for an instance without invoking any
    /// destructor.
    pub fn discard_handle(&mut self, instance: &NodeId) {
        self.handles.remove(instance);
    }
}
