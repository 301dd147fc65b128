use super::Capabilities;
use crate::error::Error;
use crate::universe::ClassId;
use log::trace;
use std::fmt;

/// Immutable capability context
///
/// Speaks for one class (`class`), optionally remembers the class it last
/// crossed a module boundary from (`previous`), and holds a capability mask.
/// Every derivation — [`LookupContext::retarget`] or
/// [`LookupContext::drop_capability`] — returns a new value whose mask is a
/// subset of this one's.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct LookupContext<'g> {
    class: ClassId<'g>,
    previous: Option<ClassId<'g>>,
    capabilities: Capabilities,
}

impl<'g> LookupContext<'g> {
    /// Full-power context on its own class
    pub fn full(class: ClassId<'g>) -> LookupContext<'g> {
        LookupContext {
            class,
            previous: None,
            capabilities: Capabilities::FULL,
        }
    }

    /// Context that can only reach public types in unconditionally exported
    /// packages
    pub fn public_only(class: ClassId<'g>) -> LookupContext<'g> {
        LookupContext {
            class,
            previous: None,
            capabilities: Capabilities::UNCONDITIONAL,
        }
    }

    pub fn with_capabilities(class: ClassId<'g>, capabilities: Capabilities) -> LookupContext<'g> {
        LookupContext {
            class,
            previous: None,
            capabilities,
        }
    }

    /// The class this context currently speaks for
    pub fn class(&self) -> ClassId<'g> {
        self.class
    }

    /// The class this context last crossed a module boundary from
    pub fn previous(&self) -> Option<ClassId<'g>> {
        self.previous
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Recompute this context as if operating nominally as `new_class`
    ///
    /// Capabilities only ever decay here. Retargeting to the context's own
    /// class changes nothing; retargeting anywhere else drops `ORIGINAL`,
    /// and each boundary crossed (module, package, top-level type) strips
    /// the capabilities that boundary protects. Crossing into a third
    /// distinct module strips everything but `UNCONDITIONAL`.
    pub fn retarget(&self, new_class: ClassId<'g>) -> LookupContext<'g> {
        if self.class == new_class {
            return *self;
        }

        let same_module = self.class.same_module(new_class);
        let same_package = self.class.same_package(new_class);
        let same_top_level = self.class.top_level() == new_class.top_level();
        let had_unconditional = self.capabilities.contains(Capabilities::UNCONDITIONAL);

        // Whether the new class itself is visible from here. A failing
        // export check while PUBLIC or UNCONDITIONAL is held vetoes
        // anything the weaker capabilities established.
        let target_package = new_class.package_name();
        let mut accessible = false;
        if self.capabilities.contains(Capabilities::PACKAGE) && same_package {
            accessible = true;
        }
        if self.capabilities.contains(Capabilities::PUBLIC) {
            let exported = new_class
                .module
                .is_exported_to(target_package, self.class.module);
            if exported && new_class.is_public {
                accessible = true;
            } else if !exported {
                accessible = false;
            }
        }
        if had_unconditional {
            let exported = new_class.module.is_unconditionally_exported(target_package);
            if exported && new_class.is_public {
                accessible = true;
            } else if !exported {
                accessible = false;
            }
        }

        let mut capabilities = self.capabilities;
        if !accessible {
            capabilities -= Capabilities::PUBLIC
                | Capabilities::MODULE
                | Capabilities::PACKAGE
                | Capabilities::PRIVATE
                | Capabilities::PROTECTED
                | Capabilities::UNCONDITIONAL;
        }
        capabilities -= Capabilities::ORIGINAL;

        // Third-module teleport: reaching a module distinct from both the
        // current one and the one recorded at the last module crossing
        // strips all enhanced access. Computed from the old `previous`.
        let origin_module = self.previous.map(|class| class.module).unwrap_or(self.class.module);
        if self.previous.is_some()
            && new_class.module != self.class.module
            && new_class.module != origin_module
        {
            capabilities -= Capabilities::PUBLIC
                | Capabilities::MODULE
                | Capabilities::PACKAGE
                | Capabilities::PRIVATE
                | Capabilities::PROTECTED;
        }

        if !same_module {
            capabilities -= Capabilities::MODULE;
        }
        if !same_package {
            capabilities -= Capabilities::PACKAGE | Capabilities::PRIVATE | Capabilities::PROTECTED;
        }
        if !same_top_level {
            capabilities -= Capabilities::PRIVATE | Capabilities::PROTECTED;
        }

        let previous = if had_unconditional {
            None
        } else if same_module {
            self.previous
        } else {
            Some(self.class)
        };

        let result = LookupContext {
            class: new_class,
            previous,
            capabilities,
        };
        debug_assert!(
            self.capabilities.contains(result.capabilities),
            "capability masks only decay"
        );
        debug_assert!(
            result.previous.is_none() || !result.capabilities.contains(Capabilities::MODULE),
            "a context with a previous class cannot claim same-module access"
        );
        trace!(
            "retarget {} -> {}: {:?} -> {:?}",
            self.class.name,
            new_class.name,
            self.capabilities,
            capabilities
        );
        result
    }

    /// Drop one capability, cascading to everything it implies
    ///
    /// Any drop also clears `PROTECTED` and `ORIGINAL`. A `kind` that is not
    /// exactly one known capability is rejected.
    pub fn drop_capability(&self, kind: Capabilities) -> Result<LookupContext<'g>, Error> {
        let cascade = if kind == Capabilities::PUBLIC {
            Capabilities::MODULE | Capabilities::PACKAGE | Capabilities::PRIVATE
        } else if kind == Capabilities::MODULE {
            Capabilities::PACKAGE | Capabilities::PRIVATE
        } else if kind == Capabilities::PACKAGE {
            Capabilities::PRIVATE
        } else if kind == Capabilities::PROTECTED
            || kind == Capabilities::PRIVATE
            || kind == Capabilities::ORIGINAL
            || kind == Capabilities::UNCONDITIONAL
        {
            Capabilities::empty()
        } else {
            return Err(Error::InvalidArgument(format!(
                "{:#x} is not a valid capability to drop",
                kind.bits()
            )));
        };

        let capabilities =
            self.capabilities - (kind | cascade | Capabilities::PROTECTED | Capabilities::ORIGINAL);
        if capabilities == self.capabilities {
            return Ok(*self);
        }
        Ok(LookupContext {
            capabilities,
            ..*self
        })
    }
}

impl<'g> fmt::Debug for LookupContext<'g> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup {}", self.class.name)?;
        if let Some(previous) = self.previous {
            write!(f, " (previously {})", previous.name)?;
        }
        write!(f, " {:?}", self.capabilities)
    }
}
