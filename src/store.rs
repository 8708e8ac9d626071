// 📋 Record Store - ordered list of Persona shared between views
// Cloning a store yields another handle to the same list, so the table sees
// whatever a dialog appended without re-fetching anything.

use crate::persona::Persona;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    inner: Rc<RefCell<Vec<Persona>>>,
}

impl PersonaStore {
    pub fn new() -> Self {
        PersonaStore::default()
    }

    pub fn from_personas(personas: Vec<Persona>) -> Self {
        PersonaStore {
            inner: Rc::new(RefCell::new(personas)),
        }
    }

    /// All rows in insertion order.
    ///
    /// The returned guard borrows the shared list: drop it before calling
    /// `append`, `replace` or any `remove*`, or the `RefCell` panics.
    /// Use `snapshot` when the rows must outlive a mutation.
    pub fn get_all(&self) -> Ref<'_, [Persona]> {
        Ref::map(self.inner.borrow(), |v| v.as_slice())
    }

    /// Owned copy of all rows
    pub fn snapshot(&self) -> Vec<Persona> {
        self.inner.borrow().clone()
    }

    pub fn get(&self, index: usize) -> Option<Persona> {
        self.inner.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    pub fn contains(&self, persona: &Persona) -> bool {
        self.inner.borrow().contains(persona)
    }

    /// No uniqueness check here; that belongs to the form
    pub fn append(&self, persona: Persona) {
        self.inner.borrow_mut().push(persona);
    }

    /// Replace the row at `index`, returning the previous value
    pub fn replace(&self, index: usize, persona: Persona) -> Option<Persona> {
        let mut rows = self.inner.borrow_mut();
        rows.get_mut(index).map(|slot| std::mem::replace(slot, persona))
    }

    /// Remove the first row equal to `persona`
    pub fn remove(&self, persona: &Persona) -> bool {
        let mut rows = self.inner.borrow_mut();
        match rows.iter().position(|p| p == persona) {
            Some(index) => {
                rows.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&self, index: usize) -> Option<Persona> {
        let mut rows = self.inner.borrow_mut();
        if index < rows.len() {
            Some(rows.remove(index))
        } else {
            None
        }
    }

    /// True when both handles point at the same list
    pub fn shares_with(&self, other: &PersonaStore) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}
