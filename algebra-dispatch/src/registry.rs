//! Capability registry for values whose data type is known only at run
//! time.
//!
//! The trait-based API resolves instances at compile time. When values
//! of several data types share one Rust type `V` (an enum of numbers, a
//! dynamically typed cell, …), the same contract is provided by a
//! table of guarded instances:
//!
//! 1. **Registering.** A [`RegistryBuilder`] collects instances and
//!    per-tag [`Capability`] declarations. Group primitives are expanded
//!    through the [`mcd`](crate::mcd) table as they are registered.
//! 2. **Resolving.** [`RegistryBuilder::build`] freezes the table into a
//!    [`Registry`]. Nothing can be added afterwards; lookups need no
//!    synchronization and the registry can be shared across threads.
//!
//! # Example
//!
//! ```rust
//! use algebra_dispatch::guard::Guard;
//! use algebra_dispatch::registry::{GroupPrimitives, InstanceKey, MonoidPrimitives, RegistryBuilder};
//! use algebra_dispatch::tag::{TagId, Tagged};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Cents(i64);
//!
//! struct Money;
//!
//! impl Tagged for Cents {
//!     fn tag(&self) -> TagId {
//!         TagId::of::<Money>()
//!     }
//! }
//!
//! let money = TagId::of::<Money>();
//! let mut builder = RegistryBuilder::<Cents>::new();
//! builder.register(
//!     "money-monoid",
//!     InstanceKey::diagonal(money),
//!     Guard::always(),
//!     MonoidPrimitives {
//!         plus: |x: &Cents, y: &Cents| Cents(x.0 + y.0),
//!         zero: |_| Cents(0),
//!     },
//! )?;
//! builder.register(
//!     "money-group",
//!     InstanceKey::diagonal(money),
//!     Guard::always(),
//!     GroupPrimitives::default().with_minus(|x: &Cents, y: &Cents| Cents(x.0 - y.0)),
//! )?;
//! let registry = builder.build()?;
//!
//! assert_eq!(registry.negate(&Cents(250))?, Cents(-250));
//! assert_eq!(registry.minus(&Cents(300), &Cents(120))?, Cents(180));
//! # Ok::<(), algebra_dispatch::DispatchError>(())
//! ```

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;

use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::error::DispatchError;
use crate::error::Result;
use crate::guard;
use crate::guard::Guard;
use crate::guard::GuardContext;
use crate::guard::GuardQueries;
use crate::mcd::Derivation;
use crate::mcd::GroupDefinition;
use crate::mcd::Operation;
use crate::tag::TagId;
use crate::tag::TagPair;
use crate::tag::TagPattern;
use crate::tag::Tagged;

/// A binary operation over the value domain.
pub type BinaryOp<V> = fn(&V, &V) -> V;

/// A unary operation over the value domain.
pub type UnaryOp<V> = fn(&V) -> V;

/// The identity of a Monoid, parametrized by the tag it is requested
/// for.
pub type ZeroOp<V> = fn(TagId) -> V;

/// The algebraic structures an instance can implement.
///
/// Ordered by layering: a structure requires every structure below it
/// on the same tag pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Structure {
    /// `plus` and `zero`.
    Monoid,
    /// `negate` and `minus`, on top of Monoid.
    Group,
}

impl Structure {
    /// The structure this one is layered on, if any.
    pub fn prerequisite(self) -> Option<Structure> {
        match self {
            Structure::Monoid => None,
            Structure::Group => Some(Structure::Monoid),
        }
    }

    /// Whether `other` is a (transitive) prerequisite of `self`.
    pub fn requires(self, other: Structure) -> bool {
        let mut current = self.prerequisite();
        while let Some(s) = current {
            if s == other {
                return true;
            }
            current = s.prerequisite();
        }
        false
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Structure::Monoid => "Monoid",
            Structure::Group => "Group",
        })
    }
}

/// A property a tag declares during registration, for guards to test.
///
/// Stands in for "this native operator is well-formed on these types".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Values of the tag support native `+`.
    NativeAddition,
    /// Values of the tag support native `-`.
    NativeSubtraction,
}

/// The Monoid primitives. Both are required.
pub struct MonoidPrimitives<V> {
    /// Associative combine.
    pub plus: BinaryOp<V>,
    /// Identity for the requested tag.
    pub zero: ZeroOp<V>,
}

impl<V> Clone for MonoidPrimitives<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for MonoidPrimitives<V> {}

impl<V> fmt::Debug for MonoidPrimitives<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonoidPrimitives").finish_non_exhaustive()
    }
}

/// The Group primitives an instance supplies: `minus`, `negate`, or
/// both.
pub struct GroupPrimitives<V> {
    /// Primitive subtraction.
    pub minus: Option<BinaryOp<V>>,
    /// Primitive inverse.
    pub negate: Option<UnaryOp<V>>,
}

impl<V> GroupPrimitives<V> {
    /// Add a primitive `minus`.
    pub fn with_minus(mut self, minus: BinaryOp<V>) -> Self {
        self.minus = Some(minus);
        self
    }

    /// Add a primitive `negate`.
    pub fn with_negate(mut self, negate: UnaryOp<V>) -> Self {
        self.negate = Some(negate);
        self
    }
}

impl<V> Default for GroupPrimitives<V> {
    fn default() -> Self {
        GroupPrimitives {
            minus: None,
            negate: None,
        }
    }
}

impl<V> fmt::Debug for GroupPrimitives<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupPrimitives")
            .field("minus", &self.minus.is_some())
            .field("negate", &self.negate.is_some())
            .finish()
    }
}

/// Primitives of either structure; the variant decides which structure
/// an instance is registered for.
#[derive(Debug)]
pub enum Primitives<V> {
    /// A Monoid instance.
    Monoid(MonoidPrimitives<V>),
    /// A Group instance.
    Group(GroupPrimitives<V>),
}

impl<V> Primitives<V> {
    /// The structure these primitives implement.
    pub fn structure(&self) -> Structure {
        match self {
            Primitives::Monoid(_) => Structure::Monoid,
            Primitives::Group(_) => Structure::Group,
        }
    }
}

impl<V> From<MonoidPrimitives<V>> for Primitives<V> {
    fn from(p: MonoidPrimitives<V>) -> Self {
        Primitives::Monoid(p)
    }
}

impl<V> From<GroupPrimitives<V>> for Primitives<V> {
    fn from(p: GroupPrimitives<V>) -> Self {
        Primitives::Group(p)
    }
}

/// The ordered tag pair an instance is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceKey {
    /// Accepted left tags.
    pub lhs: TagPattern,
    /// Accepted right tags.
    pub rhs: TagPattern,
}

impl InstanceKey {
    /// Exactly `(lhs, rhs)`.
    pub fn exact(lhs: TagId, rhs: TagId) -> Self {
        InstanceKey {
            lhs: TagPattern::Exact(lhs),
            rhs: TagPattern::Exact(rhs),
        }
    }

    /// Exactly `(tag, tag)`.
    pub fn diagonal(tag: TagId) -> Self {
        Self::exact(tag, tag)
    }

    /// Every pair; the guard alone decides.
    pub fn any() -> Self {
        InstanceKey {
            lhs: TagPattern::Any,
            rhs: TagPattern::Any,
        }
    }

    /// Whether `pair` falls under this key.
    pub fn matches(&self, pair: TagPair) -> bool {
        self.lhs.matches(pair.lhs) && self.rhs.matches(pair.rhs)
    }

    /// The single pair this key names, if both sides are exact.
    pub fn exact_pair(&self) -> Option<TagPair> {
        match (self.lhs, self.rhs) {
            (TagPattern::Exact(lhs), TagPattern::Exact(rhs)) => Some(TagPair::new(lhs, rhs)),
            _ => None,
        }
    }
}

/// A registered instance: a key, a guard and an implementation `I`.
pub struct Instance<I> {
    name: &'static str,
    key: InstanceKey,
    guard: Guard,
    implementation: I,
}

/// A registered Monoid instance.
pub type MonoidInstance<V> = Instance<MonoidPrimitives<V>>;

/// A registered Group instance, already expanded.
pub type GroupInstance<V> = Instance<GroupDefinition<V>>;

impl<I> Instance<I> {
    fn new(name: &'static str, key: InstanceKey, guard: Guard, implementation: I) -> Self {
        Instance {
            name,
            key,
            guard,
            implementation,
        }
    }

    /// Name the instance was registered under.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tag pairs the instance is keyed on.
    pub fn key(&self) -> InstanceKey {
        self.key
    }

    /// The enabling guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    /// The primitives (Monoid) or expanded definition (Group).
    pub fn implementation(&self) -> &I {
        &self.implementation
    }
}

impl<I: fmt::Debug> fmt::Debug for Instance<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("implementation", &self.implementation)
            .finish()
    }
}

/// Summary of the instance a lookup selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selected {
    /// The instance's name.
    pub name: &'static str,
    /// Its structure.
    pub structure: Structure,
    /// Its key.
    pub key: InstanceKey,
}

type Capabilities = HashMap<TagId, HashSet<Capability>>;

/// Registration phase: collects instances and capabilities.
pub struct RegistryBuilder<V> {
    monoids: Vec<MonoidInstance<V>>,
    groups: Vec<GroupInstance<V>>,
    capabilities: Capabilities,
}

impl<V> Default for RegistryBuilder<V> {
    fn default() -> Self {
        RegistryBuilder {
            monoids: Vec::new(),
            groups: Vec::new(),
            capabilities: HashMap::new(),
        }
    }
}

impl<V> RegistryBuilder<V> {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `tag` has `capability`.
    pub fn declare(&mut self, tag: TagId, capability: Capability) -> &mut Self {
        debug!(%tag, ?capability, "declared capability");
        self.capabilities.entry(tag).or_default().insert(capability);
        self
    }

    /// Register an instance.
    ///
    /// The structure is the one `primitives` implements. Group
    /// primitives are expanded immediately, so an instance supplying
    /// neither `minus` nor `negate` fails here with
    /// [`DispatchError::IncompleteInstance`].
    ///
    /// Instances are keyed on the exact tag order; register `(B, A)`
    /// separately if it should be supported.
    pub fn register(
        &mut self,
        name: &'static str,
        key: InstanceKey,
        guard: Guard,
        primitives: impl Into<Primitives<V>>,
    ) -> Result<&mut Self> {
        let primitives = primitives.into();
        let structure = primitives.structure();
        match primitives {
            Primitives::Monoid(p) => self.monoids.push(Instance::new(name, key, guard, p)),
            Primitives::Group(p) => {
                let definition = GroupDefinition::expand(name, p)?;
                self.groups.push(Instance::new(name, key, guard, definition));
            }
        }
        debug!(instance = name, %structure, ?key, "registered instance");
        Ok(self)
    }

    /// Freeze the table.
    ///
    /// Every instance with an exact key is resolved against its own pair
    /// first; if another instance also applies there the build fails
    /// with [`DispatchError::AmbiguousInstance`].
    pub fn build(self) -> Result<Registry<V>> {
        let registry = Registry {
            monoids: self.monoids,
            groups: self.groups,
            capabilities: self.capabilities,
        };

        for pair in registry.monoids.iter().filter_map(|i| i.key.exact_pair()) {
            reject_ambiguity(registry.lookup_monoid(pair))?;
        }
        for pair in registry.groups.iter().filter_map(|i| i.key.exact_pair()) {
            reject_ambiguity(registry.select_group(pair))?;
        }

        info!(
            monoids = registry.monoids.len(),
            groups = registry.groups.len(),
            tags_with_capabilities = registry.capabilities.len(),
            "capability registry frozen"
        );
        Ok(registry)
    }
}

impl<V> fmt::Debug for RegistryBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("monoids", &self.monoids.len())
            .field("groups", &self.groups.len())
            .finish()
    }
}

/// Resolution phase: an immutable table of instances.
pub struct Registry<V> {
    monoids: Vec<MonoidInstance<V>>,
    groups: Vec<GroupInstance<V>>,
    capabilities: Capabilities,
}

impl<V> Registry<V> {
    /// Start a registration phase.
    pub fn builder() -> RegistryBuilder<V> {
        RegistryBuilder::new()
    }

    /// Number of registered instances across all structures.
    pub fn len(&self) -> usize {
        self.monoids.len() + self.groups.len()
    }

    /// Whether nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `tag` declared `capability`.
    pub fn has_capability(&self, tag: TagId, capability: Capability) -> bool {
        self.capabilities
            .get(&tag)
            .is_some_and(|caps| caps.contains(&capability))
    }

    /// The unique instance of `structure` that applies to `pair`.
    pub fn lookup(&self, structure: Structure, pair: TagPair) -> Result<Selected> {
        let (name, key) = match structure {
            Structure::Monoid => {
                let i = self.lookup_monoid(pair)?;
                (i.name, i.key)
            }
            Structure::Group => {
                let i = self.lookup_group(pair)?;
                (i.name, i.key)
            }
        };
        Ok(Selected {
            name,
            structure,
            key,
        })
    }

    /// Whether `structure` has exactly one applicable instance for
    /// `pair`.
    pub fn models(&self, structure: Structure, pair: TagPair) -> bool {
        self.lookup(structure, pair).is_ok()
    }

    /// The unique Monoid instance for `pair`.
    pub fn lookup_monoid(&self, pair: TagPair) -> Result<&MonoidInstance<V>> {
        let cx = GuardContext::new(Structure::Monoid, self);
        guard::select(&cx, &self.monoids, pair)
    }

    /// The unique Group instance for `pair`.
    ///
    /// The Monoid prerequisite must hold for the same pair; if it does
    /// not, its [`NoInstance`](DispatchError::NoInstance) or
    /// [`AmbiguousInstance`](DispatchError::AmbiguousInstance) is
    /// returned.
    pub fn lookup_group(&self, pair: TagPair) -> Result<&GroupInstance<V>> {
        self.lookup_monoid(pair)?;
        self.select_group(pair)
    }

    fn select_group(&self, pair: TagPair) -> Result<&GroupInstance<V>> {
        let cx = GuardContext::new(Structure::Group, self);
        guard::select(&cx, &self.groups, pair)
    }

    /// Resolve the Monoid for `pair` once, for repeated use.
    pub fn resolve_monoid(&self, pair: TagPair) -> Result<ResolvedMonoid<'_, V>> {
        let instance = self.lookup_monoid(pair)?;
        trace!(instance = instance.name, %pair, "resolved Monoid");
        Ok(ResolvedMonoid { instance, pair })
    }

    /// Resolve the Group for `pair` once, for repeated use.
    ///
    /// The Monoid prerequisite is resolved first, so a missing or
    /// ambiguous Monoid is reported as such.
    pub fn resolve_group(&self, pair: TagPair) -> Result<ResolvedGroup<'_, V>> {
        let monoid = self.resolve_monoid(pair)?;
        let instance = self.select_group(pair)?;
        trace!(instance = instance.name, %pair, "resolved Group");
        Ok(ResolvedGroup { monoid, instance })
    }
}

fn reject_ambiguity<T>(lookup: Result<T>) -> Result<()> {
    match lookup {
        Err(e @ DispatchError::AmbiguousInstance { .. }) => Err(e),
        _ => Ok(()),
    }
}

impl<V: Tagged> Registry<V> {
    /// `plus(x, y)` through `Monoid(tag(x), tag(y))`.
    pub fn plus(&self, x: &V, y: &V) -> Result<V> {
        Ok(self.resolve_monoid(TagPair::of_values(x, y))?.plus(x, y))
    }

    /// The identity of `tag`, through `Monoid(tag, tag)`.
    pub fn zero(&self, tag: TagId) -> Result<V> {
        Ok(self.resolve_monoid(TagPair::diagonal(tag))?.zero())
    }

    /// `negate(x)` through `Group(tag(x), tag(x))`.
    pub fn negate(&self, x: &V) -> Result<V> {
        Ok(self.resolve_group(TagPair::diagonal(x.tag()))?.negate(x))
    }

    /// `minus(x, y)` through `Group(tag(x), tag(y))`.
    pub fn minus(&self, x: &V, y: &V) -> Result<V> {
        Ok(self.resolve_group(TagPair::of_values(x, y))?.minus(x, y))
    }
}

impl<V> GuardQueries for Registry<V> {
    fn models(&self, structure: Structure, pair: TagPair) -> bool {
        Registry::models(self, structure, pair)
    }

    fn has_capability(&self, tag: TagId, capability: Capability) -> bool {
        Registry::has_capability(self, tag, capability)
    }
}

impl<V> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("monoids", &self.monoids)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

/// A Monoid resolved for one tag pair.
pub struct ResolvedMonoid<'r, V> {
    instance: &'r MonoidInstance<V>,
    pair: TagPair,
}

impl<'r, V> ResolvedMonoid<'r, V> {
    /// The selected instance's name.
    pub fn name(&self) -> &'static str {
        self.instance.name
    }

    /// The pair this was resolved for.
    pub fn pair(&self) -> TagPair {
        self.pair
    }

    /// Primitive `plus`.
    pub fn plus(&self, x: &V, y: &V) -> V {
        (self.instance.implementation.plus)(x, y)
    }

    /// Primitive `zero`, for the left tag of the pair.
    pub fn zero(&self) -> V {
        (self.instance.implementation.zero)(self.pair.lhs)
    }
}

/// A Group resolved for one tag pair, with its Monoid prerequisite.
pub struct ResolvedGroup<'r, V> {
    monoid: ResolvedMonoid<'r, V>,
    instance: &'r GroupInstance<V>,
}

impl<'r, V> ResolvedGroup<'r, V> {
    /// The selected Group instance's name.
    pub fn name(&self) -> &'static str {
        self.instance.name
    }

    /// The Monoid this Group is layered on.
    pub fn monoid(&self) -> &ResolvedMonoid<'r, V> {
        &self.monoid
    }

    /// Whether `op` is primitive or derived for this instance.
    pub fn derivation(&self, op: Operation) -> Derivation {
        self.instance.implementation.derivation(op)
    }

    /// `plus(x, y)` of the prerequisite Monoid.
    pub fn plus(&self, x: &V, y: &V) -> V {
        self.monoid.plus(x, y)
    }

    /// `zero()` of the prerequisite Monoid.
    pub fn zero(&self) -> V {
        self.monoid.zero()
    }

    /// `minus(x, y)`.
    pub fn minus(&self, x: &V, y: &V) -> V {
        self.instance.implementation.minus(&self.monoid, x, y)
    }

    /// `negate(x)`.
    pub fn negate(&self, x: &V) -> V {
        self.instance.implementation.negate(&self.monoid, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A tiny dynamically typed domain: integers mod 4 and booleans under
    // xor, sharing one Rust type.

    struct Mod4;
    struct Xor;
    struct Text;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum Val {
        Mod4(u8),
        Xor(bool),
        Text(String),
    }

    impl Tagged for Val {
        fn tag(&self) -> TagId {
            match self {
                Val::Mod4(_) => TagId::of::<Mod4>(),
                Val::Xor(_) => TagId::of::<Xor>(),
                Val::Text(_) => TagId::of::<Text>(),
            }
        }
    }

    fn m4(v: &Val) -> u8 {
        match v {
            Val::Mod4(n) => *n,
            _ => 0,
        }
    }

    fn b(v: &Val) -> bool {
        matches!(v, Val::Xor(true))
    }

    fn mod4_plus(x: &Val, y: &Val) -> Val {
        Val::Mod4((m4(x) + m4(y)) % 4)
    }

    fn mod4_minus(x: &Val, y: &Val) -> Val {
        Val::Mod4((m4(x) + 4 - m4(y)) % 4)
    }

    fn xor_plus(x: &Val, y: &Val) -> Val {
        Val::Xor(b(x) ^ b(y))
    }

    fn text_plus(x: &Val, y: &Val) -> Val {
        match (x, y) {
            (Val::Text(a), Val::Text(b)) => Val::Text(format!("{a}{b}")),
            _ => x.clone(),
        }
    }

    fn builder() -> RegistryBuilder<Val> {
        let mod4 = TagId::of::<Mod4>();
        let xor = TagId::of::<Xor>();
        let text = TagId::of::<Text>();

        let mut builder = RegistryBuilder::new();
        builder
            .register(
                "mod4-monoid",
                InstanceKey::diagonal(mod4),
                Guard::always(),
                MonoidPrimitives {
                    plus: mod4_plus,
                    zero: |_| Val::Mod4(0),
                },
            )
            .unwrap()
            .register(
                "mod4-group",
                InstanceKey::diagonal(mod4),
                Guard::always(),
                GroupPrimitives::default().with_minus(mod4_minus),
            )
            .unwrap()
            .register(
                "xor-monoid",
                InstanceKey::diagonal(xor),
                Guard::always(),
                MonoidPrimitives {
                    plus: xor_plus,
                    zero: |_| Val::Xor(false),
                },
            )
            .unwrap()
            .register(
                "xor-group",
                InstanceKey::diagonal(xor),
                Guard::always(),
                GroupPrimitives::default().with_negate(Val::clone),
            )
            .unwrap()
            .register(
                "text-monoid",
                InstanceKey::diagonal(text),
                Guard::always(),
                MonoidPrimitives {
                    plus: text_plus,
                    zero: |_| Val::Text(String::new()),
                },
            )
            .unwrap();
        builder
    }

    #[test]
    fn structure_layering() {
        assert!(Structure::Group.requires(Structure::Monoid));
        assert!(!Structure::Monoid.requires(Structure::Group));
        assert!(!Structure::Group.requires(Structure::Group));
        assert_eq!(Structure::Monoid.prerequisite(), None);
    }

    #[test]
    fn facade_dispatches_on_tags() {
        let registry = builder().build().unwrap();
        assert_eq!(registry.len(), 5);

        assert_eq!(registry.plus(&Val::Mod4(3), &Val::Mod4(2)).unwrap(), Val::Mod4(1));
        assert_eq!(registry.plus(&Val::Xor(true), &Val::Xor(true)).unwrap(), Val::Xor(false));
        assert_eq!(registry.zero(TagId::of::<Text>()).unwrap(), Val::Text(String::new()));
        assert_eq!(registry.negate(&Val::Mod4(1)).unwrap(), Val::Mod4(3));
        assert_eq!(registry.minus(&Val::Xor(true), &Val::Xor(false)).unwrap(), Val::Xor(true));
    }

    #[test]
    fn derived_operations_follow_the_mcd() {
        let registry = builder().build().unwrap();

        let mod4 = registry.resolve_group(TagPair::diagonal(TagId::of::<Mod4>())).unwrap();
        assert_eq!(mod4.name(), "mod4-group");
        assert_eq!(mod4.monoid().name(), "mod4-monoid");
        assert_eq!(mod4.derivation(Operation::Negate), Derivation::Derived);
        for n in 0..4 {
            let x = Val::Mod4(n);
            assert_eq!(mod4.negate(&x), mod4.minus(&mod4.zero(), &x));
            assert_eq!(mod4.plus(&x, &mod4.negate(&x)), mod4.zero());
        }

        let xor = registry.resolve_group(TagPair::diagonal(TagId::of::<Xor>())).unwrap();
        assert_eq!(xor.derivation(Operation::Minus), Derivation::Derived);
        for (p, q) in [(false, false), (false, true), (true, false), (true, true)] {
            let (x, y) = (Val::Xor(p), Val::Xor(q));
            assert_eq!(xor.minus(&x, &y), xor.plus(&x, &xor.negate(&y)));
        }
    }

    #[test]
    fn missing_instances_are_reported() {
        let registry = builder().build().unwrap();
        let mod4 = TagId::of::<Mod4>();
        let xor = TagId::of::<Xor>();
        let text = TagId::of::<Text>();

        assert_eq!(
            registry.plus(&Val::Mod4(1), &Val::Xor(true)),
            Err(DispatchError::NoInstance {
                structure: Structure::Monoid,
                pair: TagPair::new(mod4, xor),
            })
        );
        assert_eq!(
            registry.negate(&Val::Text("a".into())),
            Err(DispatchError::NoInstance {
                structure: Structure::Group,
                pair: TagPair::diagonal(text),
            })
        );
        assert!(registry.models(Structure::Monoid, TagPair::diagonal(text)));
        assert!(!registry.models(Structure::Group, TagPair::diagonal(text)));
    }

    #[test]
    fn group_without_monoid_reports_the_monoid() {
        let text = TagId::of::<Text>();
        let mut builder = RegistryBuilder::<Val>::new();
        builder
            .register(
                "orphan-group",
                InstanceKey::diagonal(text),
                Guard::always(),
                GroupPrimitives::default().with_negate(Val::clone),
            )
            .unwrap();
        let registry = builder.build().unwrap();

        let pair = TagPair::diagonal(text);
        let err = registry.negate(&Val::Text("x".into())).unwrap_err();
        assert_eq!(err.structure(), Structure::Monoid);
        assert!(!registry.models(Structure::Monoid, pair));
        assert!(!registry.models(Structure::Group, pair));
        assert_eq!(
            registry.lookup(Structure::Group, pair),
            Err(DispatchError::NoInstance {
                structure: Structure::Monoid,
                pair,
            })
        );
    }

    #[test]
    fn incomplete_group_is_rejected_at_registration() {
        let mut builder = RegistryBuilder::<Val>::new();
        let err = builder
            .register(
                "empty",
                InstanceKey::diagonal(TagId::of::<Mod4>()),
                Guard::always(),
                GroupPrimitives::default(),
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::IncompleteInstance { instance: "empty", .. }));
    }

    #[test]
    fn exact_duplicates_fail_to_build() {
        let mut builder = builder();
        builder
            .register(
                "mod4-monoid-again",
                InstanceKey::diagonal(TagId::of::<Mod4>()),
                Guard::always(),
                MonoidPrimitives {
                    plus: mod4_plus,
                    zero: |_| Val::Mod4(0),
                },
            )
            .unwrap();

        match builder.build() {
            Err(DispatchError::AmbiguousInstance {
                structure,
                candidates,
                ..
            }) => {
                assert_eq!(structure, Structure::Monoid);
                assert_eq!(candidates, vec!["mod4-monoid", "mod4-monoid-again"]);
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn wildcards_overlapping_an_exact_key_fail_to_build() {
        let mut builder = builder();
        // Two wildcard instances both claiming every Xor pair.
        let only_xor = || Guard::new(|_, pair| pair.lhs == TagId::of::<Xor>() && pair.rhs == TagId::of::<Xor>());
        builder
            .register(
                "xor-group-a",
                InstanceKey::any(),
                only_xor(),
                GroupPrimitives::default().with_negate(Val::clone),
            )
            .unwrap();
        builder
            .register(
                "xor-group-b",
                InstanceKey::any(),
                only_xor(),
                GroupPrimitives::default().with_negate(Val::clone),
            )
            .unwrap();

        // The exact-keyed "xor-group" collides with both wildcards.
        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            DispatchError::AmbiguousInstance {
                structure: Structure::Group,
                pair: TagPair::diagonal(TagId::of::<Xor>()),
                candidates: vec!["xor-group", "xor-group-a", "xor-group-b"],
            }
        );
    }

    #[test]
    fn wildcard_ambiguity_surfaces_before_the_operation() {
        let mut builder = RegistryBuilder::<Val>::new();
        for name in ["first", "second"] {
            builder
                .register(
                    name,
                    InstanceKey::any(),
                    Guard::always(),
                    MonoidPrimitives {
                        plus: mod4_plus,
                        zero: |_| Val::Mod4(0),
                    },
                )
                .unwrap();
        }
        // Nothing exact to check: the defect shows up on first use.
        let registry = builder.build().unwrap();
        let err = registry.plus(&Val::Mod4(1), &Val::Mod4(1)).unwrap_err();
        assert!(matches!(err, DispatchError::AmbiguousInstance { .. }));
    }

    #[test]
    fn lookup_respects_tag_order() {
        let mod4 = TagId::of::<Mod4>();
        let xor = TagId::of::<Xor>();
        let mut builder = builder();
        builder
            .register(
                "mod4-then-xor",
                InstanceKey::exact(mod4, xor),
                Guard::always(),
                MonoidPrimitives {
                    plus: |x: &Val, _: &Val| x.clone(),
                    zero: |_| Val::Mod4(0),
                },
            )
            .unwrap();
        let registry = builder.build().unwrap();

        let selected = registry.lookup(Structure::Monoid, TagPair::new(mod4, xor)).unwrap();
        assert_eq!(selected.name, "mod4-then-xor");
        assert!(!registry.models(Structure::Monoid, TagPair::new(xor, mod4)));
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry<Val>>();
    }
}
