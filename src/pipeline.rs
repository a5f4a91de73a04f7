//! The load sequence.
//!
//! On a cache miss the loader runs [`load_core`] exactly once for the unit:
//!
//! 1. Requires the main file under every root, clearing derived caches when it brought new code
//! 2. Requires the model files, then the helper files, in lexicographic order per root
//! 3. Resolves the unit from the registry and checks its capability
//! 4. Calls the unit's expansion hook
//!
//! Every failure, including panics, is turned into a [`LoadState::Failed`] here and
//! reported to the notifier. Nothing escapes to the caller.

use std::any::Any ;
use std::backtrace::Backtrace ;
use std::cell::{ Cell, RefCell };
use std::panic::{ catch_unwind, AssertUnwindSafe };
use std::path::{ Path, PathBuf };
use std::sync::{ Arc, Once };
use itertools::Itertools ;

use crate::Loader ;
use crate::loader::LoadOptions ;
use crate::collaborators::{ Notification, BACKTRACE_DEPTH };
use crate::directories::is_plain_name ;
use crate::load_state::{ LoadState, LoadError, LoadFault, ResolutionError };
use crate::source_loader::SourceError ;
use crate::unit::{ Unit, UnitName, UnitSources };
use crate::utils::PartialSuccess ;



thread_local! {
	static LOADING_DEPTH: Cell<usize> = const { Cell::new( 0 ) };
	static PANIC_SITE: RefCell<Option<PanicSite>> = const { RefCell::new( None ) };
}

static PANIC_HOOK: Once = Once::new();

/// Where the last panic raised during a load on this thread happened.
struct PanicSite {
	location: Option<String>,
	backtrace: Backtrace,
}

/// Chains a panic hook recording the [`PanicSite`] of panics raised while a load
/// runs on the current thread. Other panics only reach the previous hook.
fn install_panic_hook() {
	PANIC_HOOK.call_once(|| {
		let previous = std::panic::take_hook();
		std::panic::set_hook( Box::new( move | info | {
			if LOADING_DEPTH.try_with( Cell::get ).unwrap_or( 0 ) > 0 {
				let site = PanicSite {
					location: info.location().map( ToString::to_string ),
					backtrace: Backtrace::force_capture(),
				};
				let _ = PANIC_SITE.try_with(| last | *last.borrow_mut() = Some( site ));
			}
			previous( info );
		}));
	});
}

/// Counts a running load sequence on the current thread until dropped.
struct LoadingDepth ;

impl LoadingDepth {
	fn enter() -> Self {
		LOADING_DEPTH.with(| depth | depth.set( depth.get() + 1 ));
		Self
	}
}

impl Drop for LoadingDepth {
	fn drop( &mut self ) {
		LOADING_DEPTH.with(| depth | depth.set( depth.get().saturating_sub( 1 )));
	}
}

/// Runs the load sequence for `name` and turns its outcome into a cache value.
pub(crate) fn load_core( loader: &Loader, name: &UnitName, options: &LoadOptions ) -> LoadState {

	tracing::debug!( unit = %name, "loading unit" );
	install_panic_hook();

	let outcome = {
		let _depth = LoadingDepth::enter();
		PANIC_SITE.with(| last | last.borrow_mut().take() );
		catch_unwind( AssertUnwindSafe(|| load_sequence( loader, name )))
	};

	match outcome {
		Ok( Ok( unit )) => {
			tracing::debug!( unit = %name, "unit loaded" );
			LoadState::Loaded( unit )
		}
		Ok( Err( error )) => fail( loader, name, error, options, None ),
		Err( payload ) => {
			let site = PANIC_SITE.with(| last | last.borrow_mut().take() );
			let ( location, backtrace ) = site.map(| site | ( site.location, Some( site.backtrace ))).unwrap_or_default();
			let error = LoadFault::Panicked( name.clone(), panic_message( payload.as_ref() ), location ).into();
			fail( loader, name, error, options, backtrace )
		}
	}

}

fn fail( loader: &Loader, name: &UnitName, error: LoadError, options: &LoadOptions, failure_site: Option<Backtrace> ) -> LoadState {
	tracing::debug!( unit = %name, error = %error, "unit failed to load" );
	let error = Arc::new( error );
	if !( error.is_resolution() && options.skip_notify ) { report( loader, name, &error, options, failure_site ) }
	LoadState::Failed( error )
}

fn load_sequence( loader: &Loader, name: &UnitName ) -> Result<Arc<dyn Unit>, LoadError> {

	if !is_plain_name( name.as_str() ) { return Err( ResolutionError::InvalidName( name.clone() ).into() ) }

	let ext = loader.config.read().source_extension.clone();
	let directories = loader.directories.read().clone();
	let mut sources = UnitSources::new( name.clone() );

	for path in directories.main_files( name.as_str(), &ext ) {
		if require( loader, &path )? {
			loader.function_cache.clear_function_cache( &name.type_name() );
		}
		sources.main.push( path );
	}

	sources.models = require_all( loader, directories.model_files( name.as_str(), &ext ))?;
	sources.helpers = require_all( loader, directories.helper_files( name.as_str(), &ext ))?;

	if sources.main.is_empty() { return Err( ResolutionError::MissingSource( name.clone() ).into() ) }
	let unit = resolve( loader, name )?;

	unit.expand( &sources ).map_err(| err | LoadFault::Expansion( name.clone(), err ))?;
	Ok( unit )

}

/// Looks the unit up in the registry and checks that it carries the unit capability.
pub(crate) fn resolve( loader: &Loader, name: &UnitName ) -> Result<Arc<dyn Unit>, ResolutionError> {
	let unit = loader.registry.read()
		.get( name.as_str() )
		.cloned()
		.ok_or_else(|| ResolutionError::NotRegistered( name.clone() ))?;
	match unit.is_unit() {
		true => Ok( unit ),
		false => Err( ResolutionError::NotAUnit( name.clone() )),
	}
}

fn require( loader: &Loader, path: &Path ) -> Result<bool, LoadError> {
	loader.sources.lock().require( path ).map_err(| err | LoadFault::Source( err ).into() )
}

fn require_all( loader: &Loader, paths: Vec<PathBuf> ) -> Result<Vec<PathBuf>, LoadError> {
	paths.into_iter().unique().map(| path | require( loader, &path ).map(| _ | path )).collect()
}

/// Hands a failure to the notifier.
///
/// The backtrace is taken at the panic site for panics. For every other failure it
/// holds the frames of the code that called into the loader.
pub(crate) fn report( loader: &Loader, name: &UnitName, error: &Arc<LoadError>, options: &LoadOptions, failure_site: Option<Backtrace> ) {

	let backtrace = match failure_site {
		Some( site ) => frames( &site ).into_iter().skip_while(| frame | is_plumbing( frame )).collect::<Vec<_>>(),
		None => caller_frames( frames( &Backtrace::force_capture() )),
	};

	let notification = Notification {
		message: match error.is_resolution() {
			true => format!( "missing {}", name ),
			false => format!( "except {}", name ),
		},
		fatal: false,
		key: format!( "{} load module", name ),
		unit: name.clone(),
		error: Arc::clone( error ),
		context: options.context.clone().or_else(|| loader.current_scope() ),
		backtrace: backtrace.into_iter().take( BACKTRACE_DEPTH ).collect(),
	};

	if catch_unwind( AssertUnwindSafe(|| loader.notifier.notify( &notification ))).is_err() {
		tracing::warn!( unit = %name, "notifier panicked while reporting a load failure" );
	}

}

/// One `symbol at file:line:col` entry per symbol of a rendered backtrace.
fn frames( backtrace: &Backtrace ) -> Vec<String> {
	let rendered = backtrace.to_string();
	let mut frames = Vec::<String>::new();
	for line in rendered.lines().map( str::trim ).filter(| line | !line.is_empty() ) {
		if let Some( location ) = line.strip_prefix( "at " ) {
			if let Some( frame ) = frames.last_mut() { frame.push_str( &format!( " at {location}" )) }
			continue ;
		}
		let symbol = match line.split_once( ": " ) {
			Some(( index, symbol )) if index.bytes().all(| byte | byte.is_ascii_digit() ) => symbol,
			_ => line,
		};
		frames.push( symbol.to_string() );
	}
	frames
}

/// Frames outside the loader: everything above the outermost loader frame.
fn caller_frames( frames: Vec<String> ) -> Vec<String> {
	match frames.iter().rposition(| frame | is_loader_frame( frame )) {
		Some( outermost ) => frames.into_iter().skip( outermost + 1 ).collect(),
		None => frames.into_iter().skip_while(| frame | is_plumbing( frame )).collect(),
	}
}

fn is_loader_frame( frame: &str ) -> bool {
	frame.starts_with( "unit_loader::" ) || frame.starts_with( "<unit_loader::" )
}

/// Runtime, panic machinery and loader frames.
fn is_plumbing( frame: &str ) -> bool {
	const PREFIXES: [&str; 9] = [ "std::", "core::", "alloc::", "<std::", "<core::", "<alloc::", "rust_begin_unwind", "__rustc::", "<unknown>" ];
	is_loader_frame( frame ) || PREFIXES.iter().any(| prefix | frame.starts_with( prefix ))
}

fn panic_message( payload: &( dyn Any + Send )) -> String {
	payload.downcast_ref::<&str>().map(| msg | ( *msg ).to_string() )
		.or_else(|| payload.downcast_ref::<String>().cloned() )
		.unwrap_or_else(|| "unknown panic".to_string() )
}

/// Requires every engine file found under the directory roots.
///
/// # Partial Success
/// Engines that fail to load are skipped; their errors are logged and returned
/// alongside the number of engines that loaded.
pub(crate) fn initialize_engines( loader: &Loader ) -> PartialSuccess<usize, SourceError> {

	let ext = loader.config.read().source_extension.clone();
	let engines = loader.directories.read().engine_files( &ext );

	let ( loaded, errors ) = engines.iter()
		.map(| path | loader.sources.lock().require( path ))
		.partition_result::<Vec<_>, Vec<_>, _, _>();

	errors.iter().for_each(| err | tracing::warn!( error = %err, "failed to load engine" ));
	tracing::debug!( engines = loaded.len(), failed = errors.len(), "initialized engines" );

	( loaded.len(), errors )

}
