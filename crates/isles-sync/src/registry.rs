//! Bidirectional identifier ↔ object registry.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use isles_core::{ObjectId, RegistryError, SharedObject};

/// Address of a shared object handle, used as the reverse-lookup key.
///
/// Thin pointer only: the vtable half of the fat pointer is dropped so
/// the key is stable regardless of how the trait object was produced.
fn handle_key(object: &SharedObject) -> usize {
    Rc::as_ptr(object).cast::<()>() as usize
}

/// Bijective map between process-local identifiers and live objects,
/// plus the monotonic identifier allocator.
///
/// Identifiers start at [`ObjectId::MIN_VALID`] and are never reused
/// within a session: allocation past `u16::MAX` is an error, not a
/// wraparound. The forward table is insertion-ordered so the per-tick
/// state broadcast walks objects deterministically.
///
/// Objects opt into synchronization by being registered; there is no
/// type-hierarchy check.
pub struct ObjectRegistry {
    id_to_object: IndexMap<ObjectId, SharedObject>,
    object_to_id: HashMap<usize, ObjectId>,
    next_id: u32,
}

impl Default for ObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectRegistry {
    /// Create an empty registry with the allocator at
    /// [`ObjectId::MIN_VALID`].
    pub fn new() -> Self {
        Self {
            id_to_object: IndexMap::new(),
            object_to_id: HashMap::new(),
            next_id: ObjectId::MIN_VALID.0 as u32,
        }
    }

    /// Return the next unused identifier.
    ///
    /// Fails with [`RegistryError::IdSpaceExhausted`] once the 16-bit
    /// space is spent.
    pub fn allocate(&mut self) -> Result<ObjectId, RegistryError> {
        if self.next_id > u16::MAX as u32 {
            return Err(RegistryError::IdSpaceExhausted);
        }
        let id = ObjectId(self.next_id as u16);
        self.next_id += 1;
        Ok(id)
    }

    /// Bind `id` to `object`, enforcing both directions of the
    /// bijection.
    pub fn register(&mut self, id: ObjectId, object: SharedObject) -> Result<(), RegistryError> {
        if self.id_to_object.contains_key(&id) {
            return Err(RegistryError::IdentifierInUse { id });
        }
        if let Some(&existing) = self.object_to_id.get(&handle_key(&object)) {
            return Err(RegistryError::ObjectAlreadyRegistered { id: existing });
        }
        self.object_to_id.insert(handle_key(&object), id);
        self.id_to_object.insert(id, object);
        Ok(())
    }

    /// Remove both directions of the binding for `id`, returning the
    /// object.
    ///
    /// System-reserved identifiers must never reach the registry, so
    /// `id` below [`ObjectId::MIN_VALID`] is
    /// [`RegistryError::ReservedIdentifier`] even when unbound.
    pub fn unregister(&mut self, id: ObjectId) -> Result<SharedObject, RegistryError> {
        if !id.is_valid() {
            return Err(RegistryError::ReservedIdentifier { id });
        }
        // shift_remove keeps the broadcast order of the remaining
        // objects identical to their registration order.
        let object = self
            .id_to_object
            .shift_remove(&id)
            .ok_or(RegistryError::NotRegistered { id })?;
        self.object_to_id.remove(&handle_key(&object));
        Ok(object)
    }

    /// Object bound to `id`, if any.
    pub fn lookup(&self, id: ObjectId) -> Option<SharedObject> {
        self.id_to_object.get(&id).cloned()
    }

    /// Identifier bound to `object`, if any.
    pub fn id_of(&self, object: &SharedObject) -> Option<ObjectId> {
        self.object_to_id.get(&handle_key(object)).copied()
    }

    /// Whether `id` is bound to a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.id_to_object.contains_key(&id)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.id_to_object.len()
    }

    /// Whether the registry holds no objects.
    pub fn is_empty(&self) -> bool {
        self.id_to_object.is_empty()
    }

    /// Live registrations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &SharedObject)> + '_ {
        self.id_to_object.iter().map(|(id, obj)| (*id, obj))
    }
}
