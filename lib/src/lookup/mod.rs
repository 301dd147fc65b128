//! Capability lattice: what a lookup context may access, and how its
//! capabilities decay when it retargets to another class
//!
//! A [`LookupContext`] is an immutable value. Deriving a new context — by
//! [`LookupContext::retarget`] or [`LookupContext::drop_capability`] — only
//! ever shrinks the capability mask, never grows it. The access predicates
//! are total boolean functions; turning a `false` answer into an
//! illegal-access error is the caller's business.

mod access;
mod context;

pub use context::*;

use bitflags::bitflags;

bitflags! {
    /// Capabilities held by a lookup context
    pub struct Capabilities: u16 {
        /// Access to public types and members of exported packages
        const PUBLIC = 0x01;
        /// Access to private members of the context's own nest
        const PRIVATE = 0x02;
        /// Access to protected members, from the package or a subclass
        const PROTECTED = 0x04;
        /// Access to package-visible types and members
        const PACKAGE = 0x08;
        /// Access to all public types inside the context's own module,
        /// exported or not
        const MODULE = 0x10;
        /// Access to public types in unconditionally exported packages of
        /// any module, and nothing else
        const UNCONDITIONAL = 0x20;
        /// Marks a context still speaking for the class that created it
        const ORIGINAL = 0x40;

        /// Everything a context holds on its own class
        const FULL = Self::PUBLIC.bits
            | Self::PRIVATE.bits
            | Self::PROTECTED.bits
            | Self::PACKAGE.bits
            | Self::MODULE.bits
            | Self::ORIGINAL.bits;
    }
}
