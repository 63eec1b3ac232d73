//! Attached Property Store
//!
//! A per-node side table that lets a container stash layout metadata on its
//! children (dock side, canvas anchor, fill ratio, ...) without the child's
//! type knowing about it.
//!
//! Entries are identified by name alone. Two containers that pick the same key
//! will see each other's values, which is why the well-known keys carry a
//! container prefix (`"Dock.Side"`, `"Canvas.Anchor"`, ...).
//!
//! The store itself never touches the tree; [`LayoutTree::set_attached`](crate::tree::LayoutTree::set_attached)
//! wraps it and invalidates the owner's measurement on every write.

use crate::panels::canvas::Anchor;
use crate::panels::dock::DockSide;
use crate::primitives::{Point, Size};

/// A type-erased attached value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Float(f32),
    Point(Point),
    Size(Size),
    Anchor(Anchor),
    Dock(DockSide),
    Text(String),
}

/// Conversion between a concrete Rust type and [`PropertyValue`].
///
/// The getter side is where the type check happens: `from_value` returns
/// `None` when the stored variant does not match.
pub trait AttachedValue: Sized {
    fn into_value(self) -> PropertyValue;
    fn from_value(value: &PropertyValue) -> Option<Self>;
}

macro_rules! attached_value {
    ($ty:ty, $variant:ident) => {
        impl AttachedValue for $ty {
            fn into_value(self) -> PropertyValue {
                PropertyValue::$variant(self)
            }

            fn from_value(value: &PropertyValue) -> Option<Self> {
                match value {
                    PropertyValue::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

attached_value!(bool, Bool);
attached_value!(f32, Float);
attached_value!(Point, Point);
attached_value!(Size, Size);
attached_value!(Anchor, Anchor);
attached_value!(DockSide, Dock);
attached_value!(String, Text);

impl AttachedValue for PropertyValue {
    fn into_value(self) -> PropertyValue {
        self
    }

    fn from_value(value: &PropertyValue) -> Option<Self> {
        Some(value.clone())
    }
}

/// Unordered name → value list owned by one node.
#[derive(Debug, Clone, Default)]
pub struct AttachedProperties {
    entries: Vec<(String, PropertyValue)>,
}

impl AttachedProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any value is stored under `name`.
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Whether a value of type `T` is stored under `name`.
    pub fn has_typed<T: AttachedValue>(&self, name: &str) -> bool {
        self.get::<T>(name).is_some()
    }

    /// The value under `name`, if present and of type `T`.
    pub fn get<T: AttachedValue>(&self, name: &str) -> Option<T> {
        self.position(name).and_then(|i| T::from_value(&self.entries[i].1))
    }

    /// The value under `name`, or `default` when missing or of another type.
    pub fn get_or<T: AttachedValue>(&self, name: &str, default: T) -> T {
        self.get(name).unwrap_or(default)
    }

    pub fn get_or_default<T: AttachedValue + Default>(&self, name: &str) -> T {
        self.get(name).unwrap_or_default()
    }

    /// Store `value` under `name`; `None` removes the entry.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, name: &str, value: Option<PropertyValue>) -> Option<PropertyValue> {
        match (self.position(name), value) {
            (Some(i), Some(value)) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            (Some(i), None) => Some(self.entries.swap_remove(i).1),
            (None, Some(value)) => {
                self.entries.push((name.to_owned(), value));
                None
            }
            (None, None) => None,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.set(name, None)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == name)
    }
}
