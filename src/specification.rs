//! Composable boolean predicates.
//!
//! Every predicate implements [`Specification`] for some entity type `T`.
//! The combinators [`And`], [`Or`] and [`Not`] know nothing about `T` beyond
//! that, so they compose any mix of atomic predicates:
//!
//! ```
//! use stencil::entity::{Color, Product, Size};
//! use stencil::predicates::{ColorSpec, SizeSpec};
//! use stencil::specification::{Specification, SpecificationExt};
//!
//! let spec = ColorSpec(Color::Green).and(SizeSpec(Size::Large));
//! assert!(spec.is_satisfied(&Product::new("Tree", Color::Green, Size::Large, 10)));
//! assert!(!spec.is_satisfied(&Product::new("Apple", Color::Green, Size::Small, 1)));
//! ```
//!
//! [`And`] stops at the first operand that fails and [`Or`] at the first that
//! holds, always evaluating left to right. An empty `And` holds and an empty
//! `Or` does not.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A pure, side-effect free predicate over `T`.
pub trait Specification<T: ?Sized>: Send + Sync {
    fn is_satisfied(&self, item: &T) -> bool;
}

pub type BoxedSpecification<T> = Box<dyn Specification<T>>;

impl<T: ?Sized> Specification<T> for Box<dyn Specification<T>> {
    fn is_satisfied(&self, item: &T) -> bool {
        (**self).is_satisfied(item)
    }
}

impl<T: ?Sized, S: Specification<T> + ?Sized> Specification<T> for &S {
    fn is_satisfied(&self, item: &T) -> bool {
        (**self).is_satisfied(item)
    }
}

impl<T: ?Sized, S: Specification<T> + ?Sized> Specification<T> for Arc<S> {
    fn is_satisfied(&self, item: &T) -> bool {
        (**self).is_satisfied(item)
    }
}

/// Any plain `Fn(&T) -> bool` is an atomic predicate.
pub struct Predicate<F>(pub F);

impl<T: ?Sized, F> Specification<T> for Predicate<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_satisfied(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

// ------------- Identities -------------
/// Holds for everything; the identity of [`And`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Always;

/// Holds for nothing; the identity of [`Or`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Never;

impl<T: ?Sized> Specification<T> for Always {
    fn is_satisfied(&self, _item: &T) -> bool {
        true
    }
}

impl<T: ?Sized> Specification<T> for Never {
    fn is_satisfied(&self, _item: &T) -> bool {
        false
    }
}

// ------------- And -------------
pub struct And<T: ?Sized> {
    operands: Vec<BoxedSpecification<T>>,
}

impl<T: ?Sized> And<T> {
    pub fn new(operands: Vec<BoxedSpecification<T>>) -> Self {
        Self { operands }
    }
    pub fn push(mut self, operand: impl Specification<T> + 'static) -> Self {
        self.operands.push(Box::new(operand));
        self
    }
    pub fn len(&self) -> usize {
        self.operands.len()
    }
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }
}

impl<T: ?Sized> Specification<T> for And<T> {
    fn is_satisfied(&self, item: &T) -> bool {
        self.operands.iter().all(|operand| operand.is_satisfied(item))
    }
}

// ------------- Or -------------
pub struct Or<T: ?Sized> {
    operands: Vec<BoxedSpecification<T>>,
}

impl<T: ?Sized> Or<T> {
    pub fn new(operands: Vec<BoxedSpecification<T>>) -> Self {
        Self { operands }
    }
    pub fn push(mut self, operand: impl Specification<T> + 'static) -> Self {
        self.operands.push(Box::new(operand));
        self
    }
    pub fn len(&self) -> usize {
        self.operands.len()
    }
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }
}

impl<T: ?Sized> Specification<T> for Or<T> {
    fn is_satisfied(&self, item: &T) -> bool {
        self.operands.iter().any(|operand| operand.is_satisfied(item))
    }
}

// ------------- Not -------------
pub struct Not<S> {
    operand: S,
}

impl<S> Not<S> {
    pub fn new(operand: S) -> Self {
        Self { operand }
    }
    pub fn into_inner(self) -> S {
        self.operand
    }
}

impl<T: ?Sized, S: Specification<T>> Specification<T> for Not<S> {
    fn is_satisfied(&self, item: &T) -> bool {
        !self.operand.is_satisfied(item)
    }
}

// ------------- Extension -------------
/// Fluent composition. `a.and(b).and(c)` builds one flat three-operand
/// [`And`], because chaining on an `And` appends to it.
pub trait SpecificationExt<T: ?Sized>: Specification<T> + Sized + 'static {
    fn and(self, other: impl Specification<T> + 'static) -> And<T> {
        And::new(vec![self.boxed()]).push(other)
    }
    fn or(self, other: impl Specification<T> + 'static) -> Or<T> {
        Or::new(vec![self.boxed()]).push(other)
    }
    fn not(self) -> Not<Self> {
        Not::new(self)
    }
    fn boxed(self) -> BoxedSpecification<T> {
        Box::new(self)
    }
}

// No blanket impl: And and Or override the chaining that flattens them.
impl<T: ?Sized + 'static> SpecificationExt<T> for Always {}
impl<T: ?Sized + 'static> SpecificationExt<T> for Never {}

impl<T: ?Sized + 'static, S: Specification<T> + 'static> SpecificationExt<T> for Not<S> {}
impl<T: ?Sized + 'static, F> SpecificationExt<T> for Predicate<F> where
    F: Fn(&T) -> bool + Send + Sync + 'static
{
}
impl<T: ?Sized + 'static, V, F> SpecificationExt<T> for Compare<T, V, F>
where
    V: PartialOrd + Send + Sync + 'static,
    F: Fn(&T) -> V + Send + Sync + 'static,
{
}
impl<T: ?Sized + 'static> SpecificationExt<T> for BoxedSpecification<T> {
    fn boxed(self) -> BoxedSpecification<T> {
        self
    }
}

impl<T: ?Sized + 'static> SpecificationExt<T> for And<T> {
    fn and(self, other: impl Specification<T> + 'static) -> And<T> {
        self.push(other)
    }
}

impl<T: ?Sized + 'static> SpecificationExt<T> for Or<T> {
    fn or(self, other: impl Specification<T> + 'static) -> Or<T> {
        self.push(other)
    }
}

// ------------- Compare -------------
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Incomparable values only satisfy `Ne`.
    pub fn holds(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (CompareOp::Ne, None) => true,
            (_, None) => false,
            (CompareOp::Eq, Some(o)) => o == Ordering::Equal,
            (CompareOp::Ne, Some(o)) => o != Ordering::Equal,
            (CompareOp::Lt, Some(o)) => o == Ordering::Less,
            (CompareOp::Lte, Some(o)) => o != Ordering::Greater,
            (CompareOp::Gt, Some(o)) => o == Ordering::Greater,
            (CompareOp::Gte, Some(o)) => o != Ordering::Less,
        }
    }
}

/// Compares a value read from the entity against a fixed operand.
pub struct Compare<T: ?Sized, V, F> {
    read: F,
    op: CompareOp,
    operand: V,
    entity: PhantomData<fn(&T)>,
}

impl<T: ?Sized, V, F> Compare<T, V, F>
where
    V: PartialOrd,
    F: Fn(&T) -> V,
{
    pub fn new(read: F, op: CompareOp, operand: V) -> Self {
        Self {
            read,
            op,
            operand,
            entity: PhantomData,
        }
    }
    pub fn op(&self) -> CompareOp {
        self.op
    }
}

impl<T: ?Sized, V, F> Specification<T> for Compare<T, V, F>
where
    V: PartialOrd + Send + Sync,
    F: Fn(&T) -> V + Send + Sync,
{
    fn is_satisfied(&self, item: &T) -> bool {
        let value = (self.read)(item);
        self.op.holds(value.partial_cmp(&self.operand))
    }
}

impl<T: ?Sized, V: fmt::Debug, F> fmt::Debug for Compare<T, V, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Compare")
            .field("op", &self.op)
            .field("operand", &self.operand)
            .finish()
    }
}
