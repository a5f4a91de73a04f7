//! The loader service.
//!
//! A [`Loader`] owns all loader state: registry, load cache, scope stack, activity
//! records and directory roots. Nothing is global, so independent loaders can
//! coexist (one per test, for instance).

use std::path::{ Path, PathBuf };
use std::sync::Arc ;
use parking_lot::{ Condvar, Mutex, RwLock };

use crate::activity::ActivityTracker ;
use crate::collaborators::{ Notifier, FunctionCache, HelperRegistry, TracingNotifier, NoopHooks };
use crate::config::{ LoaderConfig, CachingMode };
use crate::directories::{ Directories, PathFileError };
use crate::load_cache::{ LoadCache, Claim };
use crate::load_state::{ LoadState, LoadError, LoadFault };
use crate::pipeline ;
use crate::registry::UnitRegistry ;
use crate::scope::{ ScopeStack, ScopeGuard };
use crate::source_loader::{ SourceLoader, SourceError, ComponentLoader };
use crate::unit::{ Unit, UnitName, IntoUnitNames };
use crate::utils::PartialSuccess ;



/// Per-call options for [`Loader::load_with`].
#[derive( Debug, Default, Clone, PartialEq, Eq )]
pub struct LoadOptions {
	/// Originating context reported with failures. Defaults to the current scope.
	pub context: Option<String>,
	/// Do not report resolution failures. Unexpected faults are always reported.
	pub skip_notify: bool,
}

impl LoadOptions {

	/// Options carrying the given context.
	pub fn with_context( context: impl Into<String> ) -> Self {
		Self { context: Some( context.into() ), ..Self::default() }
	}

	/// Silences resolution failures.
	pub fn skip_notify( mut self ) -> Self {
		self.skip_notify = true ;
		self
	}

}

/// Registry, load cache and activity tracking for units.
///
/// Methods that load or record a unit take `impl Into<UnitName>`; lookups take
/// `impl AsRef<str>`. Both accept `&str`, `String`, `UnitName` and `&UnitName`.
///
/// # Example
///
/// ```
/// use std::sync::Arc ;
/// use unit_loader::{ Loader, LoaderConfig, CachingMode, Unit, UnitSources, ExpandError };
///
/// struct Billing ;
/// impl Unit for Billing {
/// 	fn name( &self ) -> &str { "billing" }
/// 	fn expand( &self, _: &UnitSources ) -> Result<(), ExpandError> { Ok(()) }
/// }
///
/// let loader = Loader::new( LoaderConfig::with_caching( CachingMode::Ephemeral ));
/// loader.register( Arc::new( Billing ));
///
/// // No directory holds `billing/billing.wasm`, so the load fails without panicking.
/// let state = loader.load( "billing" );
/// assert!( state.is_failed() );
/// assert!( loader.loaded( "billing" ));
/// ```
pub struct Loader {
	pub(crate) config: RwLock<LoaderConfig>,
	pub(crate) registry: RwLock<UnitRegistry>,
	pub(crate) cache: Mutex<LoadCache>,
	pub(crate) settled: Condvar,
	pub(crate) directories: RwLock<Directories>,
	pub(crate) sources: Mutex<Box<dyn SourceLoader>>,
	pub(crate) scopes: Mutex<ScopeStack>,
	pub(crate) activity: Mutex<ActivityTracker>,
	pub(crate) notifier: Box<dyn Notifier>,
	pub(crate) function_cache: Box<dyn FunctionCache>,
	pub(crate) helpers: Box<dyn HelperRegistry>,
}

impl Default for Loader {
	fn default() -> Self { Self::new( LoaderConfig::default() ) }
}

impl Loader {

	/// Creates a loader compiling units with a default [`ComponentLoader`].
	///
	/// Directories listed in the config are added as roots. Engines are not scanned
	/// until the first call that changes the directory list; call
	/// [`initialize_engines`]( Self::initialize_engines ) to scan the initial roots.
	pub fn new( config: LoaderConfig ) -> Self {
		let mut directories = Directories::default();
		config.directories.iter().cloned().for_each(| dir | { directories.add( dir ); });
		Self {
			config: RwLock::new( config ),
			registry: RwLock::new( UnitRegistry::default() ),
			cache: Mutex::new( LoadCache::default() ),
			settled: Condvar::new(),
			directories: RwLock::new( directories ),
			sources: Mutex::new( Box::new( ComponentLoader::default() )),
			scopes: Mutex::new( ScopeStack::default() ),
			activity: Mutex::new( ActivityTracker::default() ),
			notifier: Box::new( TracingNotifier ),
			function_cache: Box::new( NoopHooks ),
			helpers: Box::new( NoopHooks ),
		}
	}

	/// Replaces the source loader.
	pub fn with_source_loader( mut self, sources: impl SourceLoader + 'static ) -> Self {
		self.sources = Mutex::new( Box::new( sources ));
		self
	}

	/// Replaces the failure notifier. Defaults to [`TracingNotifier`].
	pub fn with_notifier( mut self, notifier: impl Notifier + 'static ) -> Self {
		self.notifier = Box::new( notifier );
		self
	}

	/// Sets the collaborator owning derived per-unit caches.
	pub fn with_function_cache( mut self, function_cache: impl FunctionCache + 'static ) -> Self {
		self.function_cache = Box::new( function_cache );
		self
	}

	/// Sets the collaborator notified when a unit is deregistered.
	pub fn with_helpers( mut self, helpers: impl HelperRegistry + 'static ) -> Self {
		self.helpers = Box::new( helpers );
		self
	}

	/// A copy of the current configuration.
	pub fn config( &self ) -> LoaderConfig { self.config.read().clone() }

	/// The caching mode the next [`reset`]( Self::reset ) will apply.
	pub fn caching_mode( &self ) -> CachingMode { self.config.read().caching }

	/// Changes the caching mode. Takes effect at the next [`reset`]( Self::reset ).
	pub fn set_caching_mode( &self, caching: CachingMode ) {
		self.config.write().caching = caching ;
	}

	// Registry

	/// Registers a unit under its name, replacing any unit registered under the same name.
	pub fn register( &self, unit: Arc<dyn Unit> ) {
		tracing::debug!( unit = unit.name(), "registering unit" );
		if self.registry.write().register( unit ).is_some() {
			tracing::debug!( "replaced a previously registered unit" );
		}
	}

	/// Removes the unit registered under the unit's name and retracts its helpers.
	pub fn deregister( &self, unit: &dyn Unit ) { self.deregister_name( unit.name() ) }

	/// Removes the unit registered under `name` and retracts its helpers.
	///
	/// Removing a name that is not registered leaves the registry untouched; the helper
	/// collaborator is notified either way.
	pub fn deregister_name( &self, name: impl Into<UnitName> ) {
		let name = name.into();
		tracing::debug!( unit = %name, "deregistering unit" );
		self.registry.write().deregister( name.as_str() );
		self.helpers.deregister( &name );
	}

	/// Number of registered units.
	pub fn size( &self ) -> usize { self.registry.read().len() }

	/// The unit registered under `name`.
	pub fn unit( &self, name: impl AsRef<str> ) -> Option<Arc<dyn Unit>> { self.registry.read().get( name.as_ref() ).cloned() }

	/// Names of all registered units, sorted.
	pub fn unit_names( &self ) -> Vec<UnitName> {
		let mut names = self.registry.read().names().cloned().collect::<Vec<_>>();
		names.sort();
		names
	}

	// Loading

	/// Loads a unit, reporting failures with the current scope as context.
	///
	/// See [`load_with`]( Self::load_with ).
	pub fn load( &self, name: impl Into<UnitName> ) -> LoadState {
		self.load_with( name, &LoadOptions::default() )
	}

	/// Loads a unit unless a result is already cached.
	///
	/// A cached result, successful or failed, is returned as is without touching any
	/// file. Otherwise the load sequence runs once and its outcome is cached. Concurrent
	/// callers for the same name wait for that single run.
	///
	/// Never fails and never panics: a missing or broken unit yields [`LoadState::Failed`].
	/// A load that could only complete after itself, such as a unit whose expansion
	/// loads the unit again, or two units loading each other from different threads,
	/// gets a [`LoadFault::Reentrant`] failure for the inner call. That failure is
	/// reported but not cached; the outer load carries on.
	pub fn load_with( &self, name: impl Into<UnitName>, options: &LoadOptions ) -> LoadState {

		let name = name.into();
		let thread = std::thread::current().id();
		let mut cache = self.cache.lock();

		loop {
			match cache.claim( &name, thread ) {
				Claim::Settled( state ) => {
					tracing::trace!( unit = %name, "load cache hit" );
					return state ;
				}
				Claim::Owned => break,
				Claim::Wait => {
					cache.start_waiting( thread, &name );
					self.settled.wait( &mut cache );
					cache.stop_waiting( thread );
				}
				Claim::Cycle => {
					drop( cache );
					tracing::debug!( unit = %name, "reentrant load refused" );
					let error = Arc::new( LoadError::from( LoadFault::Reentrant( name.clone() )));
					pipeline::report( self, &name, &error, options, None );
					return LoadState::Failed( error );
				}
			}
		}
		drop( cache );

		let state = pipeline::load_core( self, &name, options );
		self.cache.lock().settle( name, state.clone() );
		self.settled.notify_all();
		state

	}

	/// Loads a unit and returns it only if it resolves to a recognised unit.
	///
	/// Re-checks the registry after loading, so a unit deregistered since its load, or
	/// one that lost the unit capability, yields `None`.
	pub fn fetch( &self, name: impl Into<UnitName> ) -> Option<Arc<dyn Unit>> {
		let name = name.into();
		if !self.load( name.clone() ).is_loaded() { return None }
		pipeline::resolve( self, &name ).ok()
	}

	/// Whether a load result is cached for `name`, whether it succeeded or failed.
	pub fn loaded( &self, name: impl AsRef<str> ) -> bool { self.cache.lock().contains( name.as_ref() ) }

	/// The cached result for `name`, without loading.
	pub fn load_state( &self, name: impl AsRef<str> ) -> Option<LoadState> { self.cache.lock().get( name.as_ref() ).cloned() }

	/// Number of cached results.
	pub fn loaded_count( &self ) -> usize { self.cache.lock().len() }

	/// Clears scopes and activity records, and the load cache unless caching is persistent.
	///
	/// Under [`CachingMode::Persistent`] every cached result, failures included,
	/// survives. Under [`CachingMode::Ephemeral`] the next access to any unit loads it again.
	pub fn reset( &self ) {

		let ( caching, reset_registry ) = {
			let config = self.config.read();
			( config.caching, config.reset_registry )
		};
		tracing::debug!( %caching, reset_registry, "resetting loader" );

		if reset_registry { self.registry.write().clear() }
		if caching == CachingMode::Ephemeral { self.cache.lock().clear() }

		self.scopes.lock().clear();
		self.activity.lock().clear();

	}

	/// Clears every derived cache, resets, and drops all cached load results.
	pub fn clear_cache( &self ) {
		self.function_cache.clear_all();
		self.reset();
		self.cache.lock().clear();
	}

	// Scopes

	pub fn push_scope( &self, label: impl Into<String> ) { self.scopes.lock().push( label.into() ) }

	/// Pops the innermost scope. Returns `None` when no scope is open.
	pub fn pop_scope( &self ) -> Option<String> { self.scopes.lock().pop() }

	pub fn current_scope( &self ) -> Option<String> { self.scopes.lock().current().cloned() }

	/// All open scopes, outermost first.
	pub fn scopes( &self ) -> Vec<String> { self.scopes.lock().labels().to_vec() }

	/// Pushes a scope that is popped when the returned guard drops.
	pub fn scoped( &self, label: impl Into<String> ) -> ScopeGuard<'_> {
		self.push_scope( label );
		ScopeGuard { loader: self }
	}

	// Activity

	pub fn invoked( &self, names: impl IntoUnitNames ) { self.activity.lock().invoked( names.into_unit_names() ) }
	pub fn requested( &self, names: impl IntoUnitNames ) { self.activity.lock().requested( names.into_unit_names() ) }
	pub fn aborted( &self, names: impl IntoUnitNames ) { self.activity.lock().aborted( names.into_unit_names() ) }

	/// Invoked units, de-duplicated, in first-seen order.
	pub fn invoked_units( &self ) -> Vec<UnitName> { self.activity.lock().invoked_units() }
	/// Requested units, de-duplicated, in first-seen order.
	pub fn requested_units( &self ) -> Vec<UnitName> { self.activity.lock().requested_units() }
	/// Aborted units, de-duplicated, in first-seen order.
	pub fn aborted_units( &self ) -> Vec<UnitName> { self.activity.lock().aborted_units() }

	// Directories

	/// Directory roots, in search order.
	pub fn directories( &self ) -> Vec<PathBuf> { self.directories.read().roots().to_vec() }

	/// Appends a directory root and rescans engines.
	pub fn add_path( &self, path: impl Into<PathBuf> ) -> PartialSuccess<usize, SourceError> {
		let path = path.into();
		tracing::debug!( path = %path.display(), "adding unit directory" );
		self.directories.write().add( path );
		self.initialize_engines()
	}

	/// Removes a directory root and rescans engines.
	pub fn remove_path( &self, path: &Path ) -> PartialSuccess<usize, SourceError> {
		tracing::debug!( path = %path.display(), "removing unit directory" );
		self.directories.write().remove( path );
		self.initialize_engines()
	}

	/// Replaces the directory roots with the entries of a path file and rescans engines.
	///
	/// The file lists one directory per line; relative entries are resolved against
	/// `root`, blank lines and `#` comments are ignored.
	///
	/// # Errors
	/// Fails if the path file cannot be read; the roots are left unchanged.
	pub fn load_path_file( &self, file: &Path, root: &Path ) -> Result<PartialSuccess<usize, SourceError>, PathFileError> {
		let directories = Directories::from_path_file( file, root )?;
		tracing::debug!( file = %file.display(), roots = directories.roots().len(), "loaded path file" );
		*self.directories.write() = directories ;
		Ok( self.initialize_engines() )
	}

	/// Requires every `<root>/*/lib/*/engine.<ext>` file.
	///
	/// # Partial Success
	/// Returns the number of engines loaded and the errors of those that failed.
	pub fn initialize_engines( &self ) -> PartialSuccess<usize, SourceError> {
		pipeline::initialize_engines( self )
	}

	/// `<root>/<name>` for every directory root. Empty for names that are not a
	/// single plain path segment.
	pub fn paths( &self, name: impl AsRef<str> ) -> Vec<PathBuf> { self.directories.read().paths( name.as_ref() ) }

	/// Script assets of a unit: `<root>/<name>/javascripts/*.js` for every root.
	pub fn javascripts( &self, name: impl AsRef<str> ) -> Vec<PathBuf> { self.directories.read().javascripts( name.as_ref() ) }

}

impl std::fmt::Debug for Loader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Loader" )
			.field( "config", &*self.config.read() )
			.field( "registry", &*self.registry.read() )
			.field( "cache", &*self.cache.lock() )
			.field( "directories", &*self.directories.read() )
			.field( "scopes", &*self.scopes.lock() )
			.field( "activity", &*self.activity.lock() )
			.finish_non_exhaustive()
	}
}
