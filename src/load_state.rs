//! Load outcomes and the failure taxonomy.

use std::sync::Arc ;
use thiserror::Error ;

use crate::unit::{ Unit, UnitName, ExpandError };
use crate::source_loader::SourceError ;



/// Outcome of a load attempt, as stored in the load cache.
///
/// A unit with no cache entry has never been loaded. Both variants count as
/// "loaded": a cached failure is not retried until the cache is reset.
#[derive( Clone )]
pub enum LoadState {
	/// The unit was resolved and expanded.
	Loaded( Arc<dyn Unit> ),
	/// The load attempt failed. The error is kept for diagnostics.
	Failed( Arc<LoadError> ),
}

impl LoadState {

	/// Whether this is a successful load.
	#[inline] pub fn is_loaded( &self ) -> bool { matches!( self, Self::Loaded( _ )) }

	/// Whether this is a failed load.
	#[inline] pub fn is_failed( &self ) -> bool { matches!( self, Self::Failed( _ )) }

	/// The loaded unit, if the load succeeded.
	pub fn unit( &self ) -> Option<&Arc<dyn Unit>> { match self {
		Self::Loaded( unit ) => Some( unit ),
		Self::Failed( _ ) => None,
	}}

	/// The failure, if the load failed.
	pub fn error( &self ) -> Option<&LoadError> { match self {
		Self::Loaded( _ ) => None,
		Self::Failed( err ) => Some( err ),
	}}

}

impl std::fmt::Debug for LoadState {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result { match self {
		Self::Loaded( unit ) => f.debug_tuple( "Loaded" ).field( &unit.name() ).finish(),
		Self::Failed( err ) => f.debug_tuple( "Failed" ).field( err ).finish(),
	}}
}

/// Why a load attempt failed.
#[derive( Error, Debug )]
pub enum LoadError {
	/// The unit name did not resolve to a usable unit.
	#[error( "Resolution Failure: {0}" )] Resolution( #[from] ResolutionError ),
	/// Anything else that went wrong during the load sequence.
	#[error( "Unexpected Fault: {0}" )] Fault( #[from] LoadFault ),
}

impl LoadError {

	/// Resolution failures can be silenced by the caller; faults are always reported.
	#[inline] pub fn is_resolution( &self ) -> bool { matches!( self, Self::Resolution( _ )) }

}

/// The unit name does not map to a recognised unit.
#[derive( Error, Debug )]
pub enum ResolutionError {
	/// No main file `<root>/<name>/<name>.<ext>` under any directory root.
	#[error( "No source found for unit {0}" )] MissingSource( UnitName ),
	/// No unit is registered under this name.
	#[error( "Unit {0} is not registered" )] NotRegistered( UnitName ),
	/// The registered descriptor does not carry the unit capability.
	#[error( "{0} is not a unit" )] NotAUnit( UnitName ),
	/// The name is not a single plain path segment (empty, absolute, `.`/`..`, or
	/// containing a separator), so it cannot name a directory under a root.
	#[error( "{:?} is not a valid unit name", .0.as_str() )] InvalidName( UnitName ),
}

/// Faults caught at the outer boundary of the load sequence.
#[derive( Error, Debug )]
pub enum LoadFault {
	/// A unit file could not be read or compiled.
	#[error( "Source Error: {0}" )] Source( #[from] SourceError ),
	/// The unit's expansion hook returned an error.
	#[error( "Expansion of {0} failed: {1}" )] Expansion( UnitName, #[source] ExpandError ),
	/// Something panicked while loading the unit. Carries the panic message and,
	/// when known, the source location of the panic.
	#[error( "Panicked while loading {0}: {1}{}", .2.as_deref().map(| at | format!( " at {at}" )).unwrap_or_default() )]
	Panicked( UnitName, String, Option<String> ),
	/// The unit was requested while its own load was still running further up the
	/// same thread, or by a thread that is waiting on this one. Reported, never cached.
	#[error( "Unit {0} is already being loaded by a load it depends on" )] Reentrant( UnitName ),
}
