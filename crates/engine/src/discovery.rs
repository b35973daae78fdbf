//! Member discovery through an explicit registration pass.
//!
//! A dialog state type lists its options and actions once in
//! [`DialogSchema::describe`]. Registration order is declaration order and is
//! preserved everywhere members are listed. Malformed metadata fails the
//! whole pass with a [`SchemaError`]; nothing is built from a partial list.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use dialogkit_types::{ActionDescriptor, ErrorKey, FieldValue, OptionDescriptor, ReversibleMapper, SchemaError};
use indexmap::IndexSet;
use tracing::debug;

use crate::definition::{ActionDefinition, OptionDefinition};
use crate::field::lens;
use crate::state::DialogState;

/// A dialog state that can describe its own members.
pub trait DialogSchema: DialogState + Sized {
    fn describe(members: &mut MemberRegistry<Self>);
}

/// Collects the members of one dialog state type in call order.
pub struct MemberRegistry<S: DialogState> {
    options: Vec<OptionDefinition<S>>,
    actions: Vec<ActionDefinition<S>>,
    seen: IndexSet<String>,
    error: Option<SchemaError>,
}

impl<S: DialogState> MemberRegistry<S> {
    fn new() -> Self {
        Self {
            options: Vec::new(),
            actions: Vec::new(),
            seen: IndexSet::new(),
            error: None,
        }
    }

    fn admit(&mut self, ident: &str, name: &str) -> bool {
        if self.error.is_some() {
            return false;
        }
        if name.trim().is_empty() {
            self.error = Some(SchemaError::EmptyName { member: ident.to_string() });
            return false;
        }
        if !self.seen.insert(ident.to_string()) {
            self.error = Some(SchemaError::DuplicateMember { member: ident.to_string() });
            return false;
        }
        true
    }

    /// Registers a field edited directly by the editor for `V`.
    pub fn option<V: FieldValue>(&mut self, ident: &str, descriptor: OptionDescriptor, project: impl Fn(&mut S) -> &mut V + 'static) -> &mut Self {
        if self.admit(ident, descriptor.name()) {
            self.options.push(OptionDefinition::new(ident, descriptor, lens(project)));
        }
        self
    }

    /// Registers a field edited through `mapper`.
    pub fn mapped_option<M>(
        &mut self,
        ident: &str,
        descriptor: OptionDescriptor,
        mapper: M,
        project: impl Fn(&mut S) -> &mut M::Original + 'static,
    ) -> &mut Self
    where
        M: ReversibleMapper + 'static,
        M::Original: 'static,
        M::Mapped: FieldValue + Default,
    {
        if self.admit(ident, descriptor.name()) {
            self.options.push(OptionDefinition::mapped(ident, descriptor, mapper, lens(project)));
        }
        self
    }

    /// Registers a zero-argument operation.
    pub fn action(&mut self, ident: &str, descriptor: ActionDescriptor, invoke: fn(&mut S)) -> &mut Self {
        if descriptor.validation_scope().is_some_and(|scope| scope.is_empty()) {
            if self.error.is_none() {
                self.error = Some(SchemaError::EmptyValidationScope { action: ident.to_string() });
            }
            return self;
        }
        if self.admit(ident, descriptor.name()) {
            self.actions.push(ActionDefinition::new(ident, descriptor, invoke));
        }
        self
    }

    fn finish(self) -> Result<Members<S>, SchemaError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(Members {
                options: self.options,
                actions: self.actions,
            }),
        }
    }
}

/// Discovered members of a dialog state type, in declaration order.
pub struct Members<S: DialogState> {
    options: Vec<OptionDefinition<S>>,
    actions: Vec<ActionDefinition<S>>,
}

impl<S: DialogState> Clone for Members<S> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<S: DialogState> Members<S> {
    pub fn options(&self) -> &[OptionDefinition<S>] {
        &self.options
    }

    pub fn actions(&self) -> &[ActionDefinition<S>] {
        &self.actions
    }

    pub fn option(&self, ident: &str) -> Option<&OptionDefinition<S>> {
        self.options.iter().find(|option| option.ident().as_str() == ident)
    }

    pub fn action(&self, ident: &str) -> Option<&ActionDefinition<S>> {
        self.actions.iter().find(|action| action.ident().as_str() == ident)
    }

    pub fn option_idents(&self) -> Vec<&ErrorKey> {
        self.options.iter().map(OptionDefinition::ident).collect()
    }

    pub fn action_idents(&self) -> Vec<&ErrorKey> {
        self.actions.iter().map(ActionDefinition::ident).collect()
    }
}

thread_local! {
    static DISCOVERED: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Runs the registration pass of `S`, once per type and thread.
pub fn discover<S: DialogSchema>() -> Result<Members<S>, SchemaError> {
    let type_id = TypeId::of::<S>();
    let cached = DISCOVERED.with(|cache| cache.borrow().get(&type_id).cloned());
    if let Some(members) = cached.and_then(|entry| entry.downcast::<Members<S>>().ok()) {
        return Ok(Members::clone(&members));
    }

    let mut registry = MemberRegistry::new();
    S::describe(&mut registry);
    let members = registry.finish()?;
    debug!(
        state = std::any::type_name::<S>(),
        options = members.options.len(),
        actions = members.actions.len(),
        "discovered dialog members"
    );

    let entry: Rc<dyn Any> = Rc::new(members.clone());
    DISCOVERED.with(|cache| cache.borrow_mut().insert(type_id, entry));
    Ok(members)
}
