use super::{Capabilities, LookupContext};
use crate::universe::{ClassId, MemberId, Visibility};

impl<'g> LookupContext<'g> {
    /// Can this context resolve the target type?
    ///
    /// Total: never errors. The effective capabilities at the target decide,
    /// so everything `retarget` strips (module, package, nest boundaries) is
    /// already accounted for.
    pub fn can_access_type(&self, target: ClassId<'g>) -> bool {
        if !self.is_module_accessible(target) {
            return false;
        }
        let effective = self.retarget(target);
        let floor = if target.is_public {
            Capabilities::PUBLIC | Capabilities::MODULE | Capabilities::UNCONDITIONAL
        } else {
            Capabilities::PACKAGE
        };
        effective.capabilities().intersects(floor)
    }

    /// Can this context resolve the given member?
    ///
    /// The declaring type must be visible, and the effective capabilities at
    /// the declaring class must clear the member's visibility floor. A
    /// protected member is reachable from its package or, across packages,
    /// from a subclass of the declaring class.
    pub fn can_access_member(&self, member: MemberId<'g>) -> bool {
        let declaring = member.class;
        if !self.is_module_accessible(declaring) {
            return false;
        }
        if !self.can_access_type(declaring) {
            return false;
        }

        let capabilities = self.retarget(declaring).capabilities();
        match member.visibility {
            Visibility::Public => capabilities
                .intersects(Capabilities::PUBLIC | Capabilities::MODULE | Capabilities::UNCONDITIONAL),
            Visibility::Package => capabilities.contains(Capabilities::PACKAGE),
            Visibility::Protected => {
                capabilities.contains(Capabilities::PROTECTED)
                    || capabilities.contains(Capabilities::PACKAGE)
                    || (self.class().is_subclass_of(declaring)
                        && capabilities.intersects(Capabilities::PUBLIC | Capabilities::MODULE))
            }
            Visibility::Private => capabilities.contains(Capabilities::PRIVATE),
        }
    }

    /// Can this context's module — and the previous one, if a module
    /// crossing was recorded — independently read the target's module and
    /// see its package?
    pub fn is_module_accessible(&self, target: ClassId<'g>) -> bool {
        let target_module = target.module;
        let target_package = target.package_name();

        if self.capabilities().contains(Capabilities::UNCONDITIONAL) {
            return target_module.is_unconditionally_exported(target_package);
        }

        for requester in [Some(self.class()), self.previous()].into_iter().flatten() {
            let module = requester.module;
            if !module.can_read(target_module)
                || !target_module.is_exported_to(target_package, module)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use crate::lookup::LookupContext;
    use crate::universe::{
        ClassData, ClassId, MemberData, MemberKind, TypeUniverse, TypeUniverseArenas, Visibility,
    };
    use crate::{BinaryName, FieldType, MethodType, UnqualifiedName};

    fn class_name(name: &str) -> BinaryName {
        BinaryName::from_string(String::from(name)).unwrap()
    }

    fn member_name(name: &str) -> UnqualifiedName {
        UnqualifiedName::from_string(String::from(name)).unwrap()
    }

    fn method<'g>(
        class: ClassId<'g>,
        name: &str,
        visibility: Visibility,
    ) -> MemberData<'g> {
        MemberData {
            class,
            name: member_name(name),
            visibility,
            is_static: false,
            kind: MemberKind::Method(MethodType::new(vec![], None)),
        }
    }

    #[test]
    fn private_members_stay_in_the_nest() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let module = universe.add_module("one");
        module.add_export("one/api");
        let loader = universe.add_loader("app");
        let alpha = universe.add_class(ClassData::new(class_name("one/api/Alpha"), module, loader, true));
        let inner = universe.add_class(
            ClassData::new(class_name("one/api/Alpha$Inner"), module, loader, false).nested_in(alpha),
        );
        let peer = universe.add_class(ClassData::new(class_name("one/api/Peer"), module, loader, true));

        let secret = universe.add_member(MemberData {
            class: inner,
            name: member_name("secret"),
            visibility: Visibility::Private,
            is_static: false,
            kind: MemberKind::Field(FieldType::int()),
        });

        assert!(LookupContext::full(alpha).can_access_member(secret));
        assert!(LookupContext::full(inner).can_access_member(secret));
        assert!(
            !LookupContext::full(peer).can_access_member(secret),
            "same package but a different nest"
        );
    }

    #[test]
    fn package_members_stop_at_the_package() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let module = universe.add_module("one");
        module.add_export("one/api");
        module.add_export("one/util");
        let loader = universe.add_loader("app");
        let alpha = universe.add_class(ClassData::new(class_name("one/api/Alpha"), module, loader, true));
        let peer = universe.add_class(ClassData::new(class_name("one/api/Peer"), module, loader, true));
        let stranger =
            universe.add_class(ClassData::new(class_name("one/util/Stranger"), module, loader, true));

        let helper = universe.add_member(method(alpha, "helper", Visibility::Package));

        assert!(LookupContext::full(peer).can_access_member(helper));
        assert!(!LookupContext::full(stranger).can_access_member(helper));
    }

    #[test]
    fn protected_members_from_package_and_subclass() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let m1 = universe.add_module("one");
        m1.add_export("one/api");
        let m2 = universe.add_module("two");
        m2.add_export("two/api");
        m2.add_reads(m1);
        let l1 = universe.add_loader("one");
        let l2 = universe.add_loader("two");

        let alpha = universe.add_class(ClassData::new(class_name("one/api/Alpha"), m1, l1, true));
        let peer = universe.add_class(ClassData::new(class_name("one/api/Peer"), m1, l1, true));
        let sub = universe.add_class(
            ClassData::new(class_name("two/api/Sub"), m2, l2, true).with_superclass(alpha),
        );
        let beta = universe.add_class(ClassData::new(class_name("two/api/Beta"), m2, l2, true));

        let guard = universe.add_member(method(alpha, "guard", Visibility::Protected));

        assert!(
            LookupContext::full(peer).can_access_member(guard),
            "package mates reach protected members"
        );
        assert!(
            LookupContext::full(sub).can_access_member(guard),
            "subclasses reach protected members across packages"
        );
        assert!(!LookupContext::full(beta).can_access_member(guard));
    }

    #[test]
    fn module_boundaries_gate_everything() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let m1 = universe.add_module("one");
        let m2 = universe.add_module("two");
        let m3 = universe.add_module("three");
        let m4 = universe.add_module("four");
        m1.add_export("one/api");
        m1.add_export_to("one/spi", m2);
        m2.add_reads(m1);
        m3.add_reads(m1);
        let l1 = universe.add_loader("one");
        let l2 = universe.add_loader("two");
        let l3 = universe.add_loader("three");
        let l4 = universe.add_loader("four");

        let alpha = universe.add_class(ClassData::new(class_name("one/api/Alpha"), m1, l1, true));
        let hidden =
            universe.add_class(ClassData::new(class_name("one/internal/Hidden"), m1, l1, true));
        let spi = universe.add_class(ClassData::new(class_name("one/spi/Ext"), m1, l1, true));
        let beta = universe.add_class(ClassData::new(class_name("two/api/Beta"), m2, l2, true));
        let gamma = universe.add_class(ClassData::new(class_name("three/api/Gamma"), m3, l3, true));
        let delta = universe.add_class(ClassData::new(class_name("four/api/Delta"), m4, l4, true));

        assert!(LookupContext::full(beta).can_access_type(alpha));
        assert!(
            !LookupContext::full(beta).can_access_type(hidden),
            "unexported packages stay hidden"
        );
        assert!(
            LookupContext::full(beta).can_access_type(spi),
            "qualified export reaches its target"
        );
        assert!(
            !LookupContext::full(gamma).can_access_type(spi),
            "qualified export excludes everyone else"
        );
        assert!(
            !LookupContext::full(delta).can_access_type(alpha),
            "a module that reads nothing sees nothing"
        );
    }

    #[test]
    fn public_only_contexts_need_unconditional_exports() {
        let arenas = TypeUniverseArenas::new();
        let universe = TypeUniverse::new(&arenas);
        let m1 = universe.add_module("one");
        let m2 = universe.add_module("two");
        m1.add_export("one/api");
        m1.add_export_to("one/spi", m2);
        let l1 = universe.add_loader("one");
        let l2 = universe.add_loader("two");

        let alpha = universe.add_class(ClassData::new(class_name("one/api/Alpha"), m1, l1, true));
        let quiet = universe.add_class(ClassData::new(class_name("one/api/Quiet"), m1, l1, false));
        let spi = universe.add_class(ClassData::new(class_name("one/spi/Ext"), m1, l1, true));
        let beta = universe.add_class(ClassData::new(class_name("two/api/Beta"), m2, l2, true));

        let lookup = LookupContext::public_only(beta);
        assert!(lookup.can_access_type(alpha));
        assert!(!lookup.can_access_type(quiet), "public types only");
        assert!(
            !lookup.can_access_type(spi),
            "qualified exports do not count as unconditional"
        );

        let hello = universe.add_member(method(alpha, "hello", Visibility::Public));
        let helper = universe.add_member(method(alpha, "helper", Visibility::Package));
        assert!(lookup.can_access_member(hello));
        assert!(!lookup.can_access_member(helper));
    }
}
