//! Arena-backed model of loaders, modules, classes, and members
//!
//! The access-control engine treats this as a read-only oracle: it asks
//! which module a class lives in, whether a package is exported, whether two
//! classes share a loader. Identity questions are pointer comparisons, so
//! two classes with the same name loaded into different parts of the graph
//! are different classes, exactly as two loaders can each define a class of
//! the same name.

use crate::descriptors::{FieldType, MethodType};
use crate::names::{BinaryName, UnqualifiedName};
use elsa::map::FrozenMap;
use elsa::FrozenVec;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use typed_arena::Arena;

mod platform;
pub use platform::*;

/// Pointer-identity handle into the universe arenas
///
/// Equality and hashing are determined by the allocation itself, never by
/// the underlying data.
pub struct Id<'g, T>(pub &'g T);

impl<'g, T> Copy for Id<'g, T> {}

impl<'g, T> Clone for Id<'g, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, T> PartialEq for Id<'g, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl<'g, T> Eq for Id<'g, T> {}

impl<'g, T> Hash for Id<'g, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state)
    }
}

impl<'g, T> Deref for Id<'g, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.0
    }
}

impl<'g, T: fmt::Debug> fmt::Debug for Id<'g, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

pub type LoaderId<'g> = Id<'g, LoaderData>;
pub type ModuleId<'g> = Id<'g, ModuleData<'g>>;
pub type ClassId<'g> = Id<'g, ClassData<'g>>;
pub type MemberId<'g> = Id<'g, MemberData<'g>>;

/// Class-loader identity
///
/// The engines only ever compare loaders by identity; the name is carried
/// for diagnostics.
pub struct LoaderData {
    pub name: String,
}

impl fmt::Debug for LoaderData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "loader {}", self.name)
    }
}

/// Module in the universe
///
/// An unnamed module (`name == None`) reads every module and exports all of
/// its packages unconditionally.
pub struct ModuleData<'g> {
    pub name: Option<String>,
    exports: FrozenVec<Box<ExportData<'g>>>,
    reads: FrozenVec<&'g ModuleData<'g>>,
}

struct ExportData<'g> {
    package: String,
    /// `None` exports the package unconditionally
    to: Option<ModuleId<'g>>,
}

impl<'g> ModuleData<'g> {
    fn named(name: String) -> ModuleData<'g> {
        ModuleData {
            name: Some(name),
            exports: FrozenVec::new(),
            reads: FrozenVec::new(),
        }
    }

    fn unnamed() -> ModuleData<'g> {
        ModuleData {
            name: None,
            exports: FrozenVec::new(),
            reads: FrozenVec::new(),
        }
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Export a package unconditionally
    pub fn add_export(&self, package: impl Into<String>) {
        self.exports.push(Box::new(ExportData {
            package: package.into(),
            to: None,
        }));
    }

    /// Export a package to one specific module
    pub fn add_export_to(&self, package: impl Into<String>, to: ModuleId<'g>) {
        self.exports.push(Box::new(ExportData {
            package: package.into(),
            to: Some(to),
        }));
    }

    /// Let this module read another
    pub fn add_reads(&self, other: ModuleId<'g>) {
        self.reads.push(other.0);
    }

    /// Is `package` exported to `requester`?
    ///
    /// A module always exports its packages to itself.
    pub fn is_exported_to(&self, package: &str, requester: ModuleId<'g>) -> bool {
        if self.name.is_none() || std::ptr::eq(self, requester.0) {
            return true;
        }
        self.exports.iter().any(|export| {
            export.package == package && export.to.map_or(true, |module| module == requester)
        })
    }

    /// Is `package` exported to everybody?
    pub fn is_unconditionally_exported(&self, package: &str) -> bool {
        self.name.is_none()
            || self
                .exports
                .iter()
                .any(|export| export.package == package && export.to.is_none())
    }

    /// Can this module read `target`? Every module reads itself.
    pub fn can_read(&self, target: ModuleId<'g>) -> bool {
        self.name.is_none()
            || std::ptr::eq(self, target.0)
            || self.reads.iter().any(|module| std::ptr::eq(module, target.0))
    }
}

impl<'g> fmt::Debug for ModuleData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "module {}", name),
            None => write!(f, "unnamed module"),
        }
    }
}

/// Class or interface in the universe
pub struct ClassData<'g> {
    /// Binary name; nested classes keep their `$` segments
    pub name: BinaryName,
    pub module: ModuleId<'g>,
    pub loader: LoaderId<'g>,
    pub superclass: Option<ClassId<'g>>,
    /// Lexically enclosing type, for nested classes
    pub enclosing: Option<ClassId<'g>>,
    pub is_public: bool,
}

impl<'g> ClassData<'g> {
    pub fn new(
        name: BinaryName,
        module: ModuleId<'g>,
        loader: LoaderId<'g>,
        is_public: bool,
    ) -> ClassData<'g> {
        ClassData {
            name,
            module,
            loader,
            superclass: None,
            enclosing: None,
            is_public,
        }
    }

    pub fn with_superclass(mut self, superclass: ClassId<'g>) -> ClassData<'g> {
        self.superclass = Some(superclass);
        self
    }

    pub fn nested_in(mut self, enclosing: ClassId<'g>) -> ClassData<'g> {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn package_name(&self) -> &str {
        self.name.package_name()
    }
}

impl<'g> fmt::Debug for ClassData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl<'g> ClassId<'g> {
    /// Root of the lexical enclosing chain; this also serves as the nest
    /// host
    pub fn top_level(self) -> ClassId<'g> {
        let mut class = self;
        while let Some(enclosing) = class.enclosing {
            class = enclosing;
        }
        class
    }

    /// Walk the superclass chain looking for `other`
    pub fn is_subclass_of(self, other: ClassId<'g>) -> bool {
        let mut next = Some(self);
        while let Some(class) = next {
            if class == other {
                return true;
            }
            next = class.superclass;
        }
        false
    }

    /// Same runtime package: same loader identity and same package name
    pub fn same_package(self, other: ClassId<'g>) -> bool {
        self.loader == other.loader && self.package_name() == other.package_name()
    }

    /// Same module, with distinct unnamed modules treated as mutually
    /// compatible
    pub fn same_module(self, other: ClassId<'g>) -> bool {
        self.module == other.module || (!self.module.is_named() && !other.module.is_named())
    }
}

/// Visibility of a member or type
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Visibility {
    Public,
    Protected,
    Package,
    Private,
}

/// What a member is, with its signature
#[derive(Clone, Debug)]
pub enum MemberKind {
    Field(FieldType),
    Method(MethodType),
    Constructor(MethodType),
    /// Signature-polymorphic invoker; the descriptor is the one observed at
    /// the use site
    SyntheticPolymorphic(MethodType),
}

/// Field, method, or constructor declared on a class
pub struct MemberData<'g> {
    pub class: ClassId<'g>,
    pub name: UnqualifiedName,
    pub visibility: Visibility,
    pub is_static: bool,
    pub kind: MemberKind,
}

impl<'g> MemberData<'g> {
    /// Rendered descriptor of the member's signature
    pub fn descriptor(&self) -> String {
        match &self.kind {
            MemberKind::Field(typ) => typ.to_string(),
            MemberKind::Method(typ)
            | MemberKind::Constructor(typ)
            | MemberKind::SyntheticPolymorphic(typ) => typ.to_string(),
        }
    }
}

impl<'g> fmt::Debug for MemberData<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class.name, self.name, self.descriptor())
    }
}

pub struct TypeUniverseArenas<'g> {
    loader_arena: Arena<LoaderData>,
    module_arena: Arena<ModuleData<'g>>,
    class_arena: Arena<ClassData<'g>>,
    member_arena: Arena<MemberData<'g>>,
}

impl<'g> TypeUniverseArenas<'g> {
    pub fn new() -> Self {
        TypeUniverseArenas {
            loader_arena: Arena::new(),
            module_arena: Arena::new(),
            class_arena: Arena::new(),
            member_arena: Arena::new(),
        }
    }
}

/// Append-only graph of loaders, modules, classes, and members
///
/// Everything is allocated into the arenas and handed back as a
/// pointer-identity id; nothing is ever removed or mutated once added.
pub struct TypeUniverse<'g> {
    arenas: &'g TypeUniverseArenas<'g>,
    classes: FrozenMap<&'g BinaryName, &'g ClassData<'g>>,
}

impl<'g> TypeUniverse<'g> {
    /// New empty universe
    pub fn new(arenas: &'g TypeUniverseArenas<'g>) -> TypeUniverse<'g> {
        TypeUniverse {
            arenas,
            classes: FrozenMap::new(),
        }
    }

    pub fn add_loader(&self, name: impl Into<String>) -> LoaderId<'g> {
        Id(&*self.arenas.loader_arena.alloc(LoaderData { name: name.into() }))
    }

    pub fn add_module(&self, name: impl Into<String>) -> ModuleId<'g> {
        Id(&*self.arenas.module_arena.alloc(ModuleData::named(name.into())))
    }

    pub fn add_unnamed_module(&self) -> ModuleId<'g> {
        Id(&*self.arenas.module_arena.alloc(ModuleData::unnamed()))
    }

    pub fn add_class(&self, data: ClassData<'g>) -> ClassId<'g> {
        let data = &*self.arenas.class_arena.alloc(data);
        self.classes.insert(&data.name, data);
        Id(data)
    }

    pub fn add_member(&self, member: MemberData<'g>) -> MemberId<'g> {
        Id(&*self.arenas.member_arena.alloc(member))
    }

    pub fn lookup_class(&'g self, name: &BinaryName) -> Option<ClassId<'g>> {
        self.classes.get(name).map(Id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn module_exports() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let m1 = universe.add_module("one");
        let m2 = universe.add_module("two");
        let m3 = universe.add_module("three");
        m1.add_export("one/api");
        m1.add_export_to("one/spi", m2);

        assert!(m1.is_exported_to("one/api", m2));
        assert!(m1.is_exported_to("one/api", m3));
        assert!(m1.is_exported_to("one/spi", m2));
        assert!(!m1.is_exported_to("one/spi", m3));
        assert!(
            m1.is_exported_to("one/internal", m1),
            "a module always sees its own packages"
        );
        assert!(!m1.is_exported_to("one/internal", m2));

        assert!(m1.is_unconditionally_exported("one/api"));
        assert!(!m1.is_unconditionally_exported("one/spi"));
        assert!(!m1.is_unconditionally_exported("one/internal"));
    }

    #[test]
    fn module_reads() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let m1 = universe.add_module("one");
        let m2 = universe.add_module("two");
        m1.add_reads(m2);

        assert!(m1.can_read(m2));
        assert!(m1.can_read(m1), "a module always reads itself");
        assert!(!m2.can_read(m1));
    }

    #[test]
    fn unnamed_modules() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let unnamed = universe.add_unnamed_module();
        let named = universe.add_module("one");

        assert!(unnamed.can_read(named));
        assert!(unnamed.is_exported_to("anything", named));
        assert!(unnamed.is_unconditionally_exported("anything"));
    }

    #[test]
    fn class_queries() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let module = universe.add_module("one");
        let loader = universe.add_loader("app");
        let alien_loader = universe.add_loader("other");

        let outer = universe.add_class(ClassData::new(
            BinaryName::from_string(String::from("pkg/Outer")).unwrap(),
            module,
            loader,
            true,
        ));
        let inner = universe.add_class(
            ClassData::new(
                BinaryName::from_string(String::from("pkg/Outer$Inner")).unwrap(),
                module,
                loader,
                false,
            )
            .nested_in(outer),
        );
        let peer = universe.add_class(
            ClassData::new(
                BinaryName::from_string(String::from("pkg/Peer")).unwrap(),
                module,
                loader,
                true,
            )
            .with_superclass(outer),
        );
        let alien = universe.add_class(ClassData::new(
            BinaryName::from_string(String::from("pkg/Alien")).unwrap(),
            module,
            alien_loader,
            true,
        ));

        assert_eq!(inner.top_level(), outer);
        assert_eq!(outer.top_level(), outer);

        assert!(peer.is_subclass_of(outer));
        assert!(!outer.is_subclass_of(peer));
        assert!(outer.is_subclass_of(outer));

        assert!(outer.same_package(peer));
        assert!(outer.same_package(inner));
        assert!(
            !outer.same_package(alien),
            "same package name under a different loader is a different package"
        );
    }
}
