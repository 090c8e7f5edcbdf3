//! Extension objects
//!
//! Any composite type that is not a list or a mapping lives in the heap as a
//! boxed [`Extension`]. The engine never looks inside one; a registered codec
//! downcasts it through [`Extension::as_any`].

use crate::value::Value;
use std::any::Any;
use std::fmt;

/// A heap-resident composite handled by a registered codec.
pub trait Extension: Any + fmt::Debug {
    /// Name used in diagnostics (`UnencodableType` reports it)
    fn type_name(&self) -> &'static str;

    /// Downcast support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support, used by finalizers filling a placeholder
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Values held by this object, in a stable order.
    ///
    /// Structural equality compares children pairwise after `shallow_eq`.
    fn children(&self) -> Vec<Value> {
        Vec::new()
    }

    /// Equality of everything except `children`.
    ///
    /// `other` is guaranteed to have the same concrete type.
    fn shallow_eq(&self, other: &dyn Extension) -> bool;
}

impl dyn Extension {
    /// Downcast to a concrete extension type
    pub fn downcast_ref<T: Extension>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutable downcast to a concrete extension type
    pub fn downcast_mut<T: Extension>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// `TypeId` of the concrete type behind the trait object
    pub fn concrete_type_id(&self) -> std::any::TypeId {
        self.as_any().type_id()
    }
}
