//! A lazy, cached loader for named feature units.
//!
//! A host application splits itself into **units**: named feature bundles made of a
//! main wasm component, model and helper components, and assets. Units are registered
//! up front and loaded on first use. `unit_loader` decides whether a unit needs
//! loading, caches the outcome, and records which units were invoked, requested or
//! aborted during a run.
//!
//! # Core Concepts
//!
//! - [`Unit`]: The host's descriptor for a unit. Registered under its name; its
//! 	[`expand`]( Unit::expand ) hook applies the unit to the host after its files are loaded.
//!
//! - [`Loader`]: The service owning all state: registry, load cache, scope stack,
//! 	activity records and directory roots. Every operation takes `&self`.
//!
//! - [`LoadState`]: The cached outcome of a load: [`LoadState::Loaded`] with the unit,
//! 	or [`LoadState::Failed`] with the reason. Both count as loaded.
//!
//! - [`CachingMode`]: Whether cached outcomes survive [`Loader::reset`]
//! 	([`Persistent`]( CachingMode::Persistent ), load once per process) or not
//! 	([`Ephemeral`]( CachingMode::Ephemeral ), load fresh after every reset).
//!
//! - [`SourceLoader`]: Loads unit files. The default [`ComponentLoader`] compiles them
//! 	into wasm components with `wasmtime`, recompiling files that changed on disk.
//!
//! # Directory Layout
//!
//! For a unit `billing` under a directory root:
//!
//! ```text
//! <root>/billing/billing.wasm          main file, required for the unit to resolve
//! <root>/billing/models/*.wasm         loaded in lexicographic order
//! <root>/billing/helpers/*.wasm        loaded in lexicographic order
//! <root>/billing/javascripts/*.js      listed by Loader::javascripts
//! <root>/billing/lib/*/engine.wasm     loaded whenever the directory list changes
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc ;
//! use unit_loader::{ Loader, LoaderConfig, CachingMode, Unit, UnitName, UnitSources, ExpandError };
//!
//! struct Billing ;
//!
//! impl Unit for Billing {
//! 	fn name( &self ) -> &str { "billing" }
//! 	fn expand( &self, sources: &UnitSources ) -> Result<(), ExpandError> {
//! 		// Wire the unit's components into the host here.
//! 		let _ = sources.models();
//! 		Ok(())
//! 	}
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let root = std::env::temp_dir().join( "unit-loader-doc-example" );
//! std::fs::create_dir_all( root.join( "billing" ))?;
//! std::fs::write( root.join( "billing" ).join( "billing.wasm" ), "(component)" )?;
//!
//! let loader = Loader::new( LoaderConfig::with_caching( CachingMode::Persistent ));
//! let ( _engines, errors ) = loader.add_path( &root );
//! assert!( errors.is_empty() );
//! loader.register( Arc::new( Billing ));
//!
//! {
//! 	let _scope = loader.scoped( "checkout" );
//! 	loader.requested( "billing" );
//! 	assert!( loader.load( "billing" ).is_loaded() );
//! 	loader.invoked( "billing" );
//! }
//!
//! assert!( loader.fetch( "billing" ).is_some() );
//! assert_eq!( loader.invoked_units(), vec![ UnitName::from( "billing" ) ]);
//! # std::fs::remove_dir_all( &root )?;
//! # Ok(())
//! # }
//! ```
//!
//! # Failures
//!
//! Loading never returns an error to the caller. A unit that cannot be resolved
//! (invalid name, no main file, not registered, not a unit) or whose loading faults (unreadable or
//! invalid component, failing or panicking expansion) is cached as failed and reported
//! to the [`Notifier`]. Resolution failures can be silenced per call with
//! [`LoadOptions::skip_notify`]; faults are always reported.

mod activity ;
mod collaborators ;
mod config ;
mod directories ;
mod load_cache ;
mod load_state ;
mod loader ;
mod pipeline ;
mod registry ;
mod scope ;
mod source_loader ;
mod unit ;
mod utils ;

#[doc( no_inline )]
pub use wasmtime::Engine ;
#[doc( no_inline )]
pub use wasmtime::component::Component ;

pub use loader::{ Loader, LoadOptions };
pub use unit::{ Unit, UnitName, UnitSources, IntoUnitNames, ExpandError };
pub use load_state::{ LoadState, LoadError, ResolutionError, LoadFault };
pub use config::{ LoaderConfig, CachingMode, ConfigError };
pub use collaborators::{ Notifier, Notification, FunctionCache, HelperRegistry, TracingNotifier, NoopHooks, BACKTRACE_DEPTH };
pub use source_loader::{ SourceLoader, ComponentLoader, SourceError };
pub use directories::PathFileError ;
pub use scope::ScopeGuard ;
pub use utils::PartialSuccess ;
