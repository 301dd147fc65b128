//! Predict the behavior of a managed runtime's dynamic invocation subsystem
//!
//! Two independent engines, both pure functions over immutable values:
//!
//!   - [`lookup`] computes whether a capability context may access a type or
//!     member, and how its capabilities decay when it retargets to operate
//!     as a different class (the lookup-object `in`/`dropLookupMode` model).
//!   - [`combinator`] infers the composite signature of a loop built from
//!     init/step/predicate/finalizer fragments, or reports the exact
//!     structural mismatch.
//!
//! Classes, modules, and loaders live in an arena-backed [`universe`], so
//! identity questions (same module, same loader, same nest) are pointer
//! comparisons rather than name comparisons.
//!
//! ### Access control example
//!
//! ```
//! use invoke_oracle::lookup::{Capabilities, LookupContext};
//! use invoke_oracle::universe::{ClassData, TypeUniverse, TypeUniverseArenas};
//! use invoke_oracle::BinaryName;
//!
//! let arenas = TypeUniverseArenas::new();
//! let universe = TypeUniverse::new(&arenas);
//! let platform = universe.insert_platform_types();
//!
//! // An application module that can see the platform classes
//! let app = universe.add_module("app");
//! app.add_export("app/api");
//! app.add_reads(platform.base_module);
//! let loader = universe.add_loader("app");
//! let service = universe.add_class(
//!     ClassData::new(
//!         BinaryName::from_string(String::from("app/api/Service")).unwrap(),
//!         app,
//!         loader,
//!         true,
//!     )
//!     .with_superclass(platform.object),
//! );
//!
//! let lookup = LookupContext::full(service);
//! assert!(lookup.can_access_type(platform.object));
//!
//! // Retargeting across the module boundary keeps only public access
//! let teleported = lookup.retarget(platform.object);
//! assert_eq!(teleported.capabilities(), Capabilities::PUBLIC);
//! ```
//!
//! ### Loop resolution example
//!
//! ```
//! use invoke_oracle::combinator::resolve_while_loop;
//! use invoke_oracle::MethodType;
//!
//! let init = MethodType::parse("(I)I").unwrap();
//! let pred = MethodType::parse("(II)Z").unwrap();
//! let step = MethodType::parse("(II)I").unwrap();
//!
//! let signature = resolve_while_loop(Some(&init), &pred, &step).unwrap();
//! assert_eq!(signature.method_type().to_string(), "(II)I");
//! ```

pub mod combinator;
mod descriptors;
mod error;
pub mod lookup;
mod names;
pub mod universe;

pub use descriptors::*;
pub use error::*;
pub use names::*;
