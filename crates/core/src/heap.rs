//! Arena heap for composite objects
//!
//! All lists, mappings and extension objects live in one append-only
//! [`Heap`] and are addressed by [`ObjRef`]. Object identity is arena-index
//! equality, which is what the encoder's identity map keys on and what the
//! decoder uses to hand out references to objects that are still being built.
//!
//! # Scratch allocations
//!
//! The encoder materialises temporary objects (mapping pairs, codec payloads)
//! while it walks. It takes a [`Checkpoint`] first and [`Heap::truncate`]s back
//! to it when done, so the caller's heap is left as it was found.

use crate::extension::Extension;
use crate::mapping::Mapping;
use crate::value::Value;
use rustc_hash::FxHashSet;
use std::fmt;

/// Handle to an object in a [`Heap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    /// Build a handle from a raw arena index
    pub fn from_index(index: usize) -> Self {
        ObjRef(index as u32)
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ObjRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A composite object
#[derive(Debug)]
pub enum Object {
    /// Ordered sequence
    List(Vec<Value>),
    /// Unordered mapping (kept in insertion order)
    Map(Mapping),
    /// Registered extension type
    Ext(Box<dyn Extension>),
}

impl Object {
    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Object::List(_) => "List",
            Object::Map(_) => "Map",
            Object::Ext(ext) => ext.type_name(),
        }
    }
}

/// Heap length marker for releasing scratch allocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Append-only object arena
#[derive(Debug, Default)]
pub struct Heap {
    objects: Vec<Object>,
}

impl Heap {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a heap with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            objects: Vec::with_capacity(capacity),
        }
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if heap is empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Store an object and return its handle
    pub fn alloc(&mut self, object: Object) -> ObjRef {
        let r = ObjRef::from_index(self.objects.len());
        self.objects.push(object);
        r
    }

    /// Allocate a list, returning it as a `Value::Ref`
    pub fn new_list(&mut self, items: Vec<Value>) -> Value {
        Value::Ref(self.alloc(Object::List(items)))
    }

    /// Allocate a mapping, returning it as a `Value::Ref`
    pub fn new_map(&mut self, map: Mapping) -> Value {
        Value::Ref(self.alloc(Object::Map(map)))
    }

    /// Allocate an extension object, returning it as a `Value::Ref`
    pub fn new_ext<T: Extension>(&mut self, ext: T) -> Value {
        Value::Ref(self.alloc(Object::Ext(Box::new(ext))))
    }

    /// Look up an object
    pub fn get(&self, r: ObjRef) -> Option<&Object> {
        self.objects.get(r.index())
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, r: ObjRef) -> Option<&mut Object> {
        self.objects.get_mut(r.index())
    }

    /// Items of a list object
    pub fn list(&self, r: ObjRef) -> Option<&[Value]> {
        match self.get(r)? {
            Object::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable items of a list object
    pub fn list_mut(&mut self, r: ObjRef) -> Option<&mut Vec<Value>> {
        match self.get_mut(r)? {
            Object::List(items) => Some(items),
            _ => None,
        }
    }

    /// A mapping object
    pub fn map(&self, r: ObjRef) -> Option<&Mapping> {
        match self.get(r)? {
            Object::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutable mapping object
    pub fn map_mut(&mut self, r: ObjRef) -> Option<&mut Mapping> {
        match self.get_mut(r)? {
            Object::Map(map) => Some(map),
            _ => None,
        }
    }

    /// An extension object of concrete type `T`
    pub fn ext<T: Extension>(&self, r: ObjRef) -> Option<&T> {
        match self.get(r)? {
            Object::Ext(ext) => ext.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Mutable extension object of concrete type `T`
    pub fn ext_mut<T: Extension>(&mut self, r: ObjRef) -> Option<&mut T> {
        match self.get_mut(r)? {
            Object::Ext(ext) => ext.downcast_mut::<T>(),
            _ => None,
        }
    }

    /// Remember the current length
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.objects.len())
    }

    /// Drop every object allocated after `checkpoint`.
    ///
    /// Handles to dropped objects become dangling; only call this once
    /// nothing outside the scratch region refers into it.
    pub fn truncate(&mut self, checkpoint: Checkpoint) {
        self.objects.truncate(checkpoint.0);
    }

    /// Structural equality of two graphs, possibly in different heaps.
    ///
    /// Cycles are handled by assuming a pair of objects equal while it is
    /// being compared (bisimulation), so a self-referential list equals any
    /// other list with the same shape of self-reference. Mappings compare
    /// entry by entry in insertion order. Extensions must share a concrete
    /// type, agree on `shallow_eq`, and have equal children. Floats compare
    /// bitwise so `NaN` survives a round trip check.
    pub fn graph_eq(&self, a: &Value, other: &Heap, b: &Value) -> bool {
        let mut assumed: FxHashSet<(ObjRef, ObjRef)> = FxHashSet::default();
        let mut work: Vec<(Value, Value)> = vec![(a.clone(), b.clone())];

        while let Some((x, y)) = work.pop() {
            let (rx, ry) = match (&x, &y) {
                (Value::Ref(rx), Value::Ref(ry)) => (*rx, *ry),
                (Value::Ref(_), _) | (_, Value::Ref(_)) => return false,
                _ => {
                    if !x.same_identity(&y) {
                        return false;
                    }
                    continue;
                }
            };
            if !assumed.insert((rx, ry)) {
                continue;
            }
            let (Some(ox), Some(oy)) = (self.get(rx), other.get(ry)) else {
                return false;
            };
            match (ox, oy) {
                (Object::List(xs), Object::List(ys)) => {
                    if xs.len() != ys.len() {
                        return false;
                    }
                    work.extend(xs.iter().cloned().zip(ys.iter().cloned()));
                }
                (Object::Map(mx), Object::Map(my)) => {
                    if mx.len() != my.len() {
                        return false;
                    }
                    for ((kx, vx), (ky, vy)) in mx.iter().zip(my.iter()) {
                        work.push((kx.clone(), ky.clone()));
                        work.push((vx.clone(), vy.clone()));
                    }
                }
                (Object::Ext(ex), Object::Ext(ey)) => {
                    if ex.concrete_type_id() != ey.concrete_type_id()
                        || !ex.shallow_eq(&**ey)
                    {
                        return false;
                    }
                    let cx = ex.children();
                    let cy = ey.children();
                    if cx.len() != cy.len() {
                        return false;
                    }
                    work.extend(cx.into_iter().zip(cy));
                }
                _ => return false,
            }
        }
        true
    }
}
