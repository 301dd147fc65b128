//! Platform types every universe can be seeded with

use super::{ClassData, ClassId, LoaderId, ModuleId, TypeUniverse};
use crate::names::BinaryName;

/// Ids of the platform module, loader, and classes inserted by
/// [`TypeUniverse::insert_platform_types`]
pub struct PlatformClasses<'g> {
    pub base_module: ModuleId<'g>,
    pub boot_loader: LoaderId<'g>,
    pub object: ClassId<'g>,
    pub string: ClassId<'g>,
    pub iterable: ClassId<'g>,
    pub iterator: ClassId<'g>,
    pub list: ClassId<'g>,
}

impl<'g> TypeUniverse<'g> {
    /// Seed the universe with a `java.base`-like module holding the platform
    /// classes the engines and their tests reference
    pub fn insert_platform_types(&self) -> PlatformClasses<'g> {
        let base_module = self.add_module("java.base");
        base_module.add_export("java/lang");
        base_module.add_export("java/util");
        let boot_loader = self.add_loader("boot");

        let object = self.add_class(ClassData::new(
            BinaryName::OBJECT,
            base_module,
            boot_loader,
            true,
        ));
        let string = self.add_class(
            ClassData::new(BinaryName::STRING, base_module, boot_loader, true)
                .with_superclass(object),
        );
        let iterable = self.add_class(
            ClassData::new(BinaryName::ITERABLE, base_module, boot_loader, true)
                .with_superclass(object),
        );
        let iterator = self.add_class(
            ClassData::new(BinaryName::ITERATOR, base_module, boot_loader, true)
                .with_superclass(object),
        );
        let list = self.add_class(
            ClassData::new(BinaryName::LIST, base_module, boot_loader, true)
                .with_superclass(iterable),
        );

        PlatformClasses {
            base_module,
            boot_loader,
            object,
            string,
            iterable,
            iterator,
            list,
        }
    }
}
