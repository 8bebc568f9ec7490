use crate::{MissingCapability, Provide, Shape};
use std::fmt::{Debug, Formatter};

/// One shape a computation needs from its capability object `C`.
///
/// A requirement can only be declared for shapes that `C` can be asked
/// about, so the declaration itself is checked by the compiler while the
/// presence of the shape is checked against the actual object.
pub struct Requirement<C: ?Sized> {
    operation: &'static str,
    check: fn(&C) -> bool,
}

fn provides<C, S>(capabilities: &C) -> bool
where
    C: ?Sized + Provide<S>,
    S: ?Sized + Shape,
{
    Provide::<S>::provide(capabilities).is_some()
}

impl<C: ?Sized> Requirement<C> {
    /// Requirement for the shape `S`.
    pub fn of<S>() -> Self
    where
        C: Provide<S>,
        S: ?Sized + Shape,
    {
        Self {
            operation: S::NAME,
            check: provides::<C, S>,
        }
    }

    /// Name of the required operation.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Whether `capabilities` satisfies this requirement.
    pub fn is_met_by(&self, capabilities: &C) -> bool {
        (self.check)(capabilities)
    }
}

impl<C: ?Sized> Clone for Requirement<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Requirement<C> {}

impl<C: ?Sized> Debug for Requirement<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Requirement").field(&self.operation).finish()
    }
}

/// The declared set of shapes a computation needs, in declaration order.
pub struct Requirements<C: ?Sized> {
    requirements: Vec<Requirement<C>>,
}

impl<C: ?Sized> Requirements<C> {
    /// An empty set.
    pub fn new() -> Self {
        Self {
            requirements: Vec::new(),
        }
    }

    /// Adds the shape `S` unless it is already declared.
    pub fn require<S>(mut self) -> Self
    where
        C: Provide<S>,
        S: ?Sized + Shape,
    {
        self.insert(Requirement::of::<S>());
        self
    }

    /// Adds a requirement unless one for the same operation exists.
    pub fn insert(&mut self, requirement: Requirement<C>) {
        if !self.contains(requirement.operation()) {
            self.requirements.push(requirement);
        }
    }

    /// Adds every requirement of `other`, e.g. those of a sub-computation.
    pub fn extend(&mut self, other: &Requirements<C>) {
        for requirement in other.iter() {
            self.insert(*requirement);
        }
    }

    /// Whether an operation with this name is declared.
    pub fn contains(&self, operation: &str) -> bool {
        self.requirements
            .iter()
            .any(|requirement| requirement.operation() == operation)
    }

    /// Iterates over the declared requirements.
    pub fn iter(&self) -> impl Iterator<Item = &Requirement<C>> {
        self.requirements.iter()
    }

    /// Declared operation names, in declaration order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.requirements.iter().map(Requirement::operation).collect()
    }

    /// The first declared operation `capabilities` does not provide.
    pub fn missing(&self, capabilities: &C) -> Option<&'static str> {
        self.requirements
            .iter()
            .find(|requirement| !requirement.is_met_by(capabilities))
            .map(Requirement::operation)
    }

    /// Fails with [`MissingCapability`] unless every requirement is met.
    pub fn check(&self, capabilities: &C) -> Result<(), MissingCapability> {
        match self.missing(capabilities) {
            Some(operation) => Err(MissingCapability::new(operation)),
            None => Ok(()),
        }
    }

    /// Number of declared requirements.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }
}

impl<C: ?Sized> Default for Requirements<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ?Sized> Clone for Requirements<C> {
    fn clone(&self) -> Self {
        Self {
            requirements: self.requirements.clone(),
        }
    }
}

impl<C: ?Sized> Debug for Requirements<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.operations()).finish()
    }
}
