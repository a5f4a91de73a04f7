//! Unit capability and naming types.
//!
//! A **unit** is a named feature bundle: a main component, optional model and helper
//! components, and assets. The host describes each unit with a type implementing
//! [`Unit`] and registers it with the [`Loader`]( crate::Loader ). The loader decides
//! when the unit's files are loaded and when its [`expand`]( Unit::expand ) hook runs.

use std::path::PathBuf ;
use heck::ToUpperCamelCase ;



/// Error type returned by a unit's expansion hook.
pub type ExpandError = Box<dyn std::error::Error + Send + Sync> ;

/// A loadable feature bundle.
///
/// # Example
///
/// ```
/// use unit_loader::{ Unit, UnitSources, ExpandError };
///
/// struct Billing ;
///
/// impl Unit for Billing {
/// 	fn name( &self ) -> &str { "billing" }
/// 	fn expand( &self, sources: &UnitSources ) -> Result<(), ExpandError> {
/// 		assert_eq!( sources.name().as_str(), "billing" );
/// 		Ok(())
/// 	}
/// }
/// ```
pub trait Unit: Send + Sync + 'static {

	/// The name the unit is registered and loaded under.
	fn name( &self ) -> &str ;

	/// Capability tag checked when resolving a unit.
	///
	/// Descriptors that share the registry but must never be loaded as units
	/// (abstract bases, helper bundles) return `false`.
	fn is_unit( &self ) -> bool { true }

	/// Applies the unit to the host once its files are loaded.
	///
	/// Called at most once per load attempt. Should tolerate being called again
	/// after a reload.
	///
	/// # Errors
	/// Any error is treated as a load fault: the unit is cached as failed and the
	/// failure is reported to the notifier.
	fn expand( &self, sources: &UnitSources ) -> Result<(), ExpandError> ;

}

impl std::fmt::Debug for dyn Unit {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "Unit" )
			.field( "name", &self.name() )
			.field( "is_unit", &self.is_unit() )
			.finish_non_exhaustive()
	}
}

/// Name of a unit.
///
/// Converts from any string-like value, so `&str`, `String` and existing names can
/// be passed interchangeably.
#[derive( Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord )]
pub struct UnitName( String );

impl UnitName {

	/// Creates a unit name.
	pub fn new( name: impl Into<String> ) -> Self { Self( name.into() ) }

	#[inline] pub fn as_str( &self ) -> &str { &self.0 }

	/// The host type name this unit resolves to, e.g. `billing_report` → `BillingReport`.
	///
	/// Derived caches at the collaborator layer are keyed by this name.
	pub fn type_name( &self ) -> String { self.0.to_upper_camel_case() }

}

impl std::fmt::Display for UnitName {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { f.write_str( &self.0 ) }
}

impl AsRef<str> for UnitName {
	fn as_ref( &self ) -> &str { &self.0 }
}

impl std::borrow::Borrow<str> for UnitName {
	fn borrow( &self ) -> &str { &self.0 }
}

impl From<&str> for UnitName {
	fn from( name: &str ) -> Self { Self( name.to_string() ) }
}

impl From<String> for UnitName {
	fn from( name: String ) -> Self { Self( name ) }
}

impl From<&String> for UnitName {
	fn from( name: &String ) -> Self { Self( name.clone() ) }
}

impl From<&UnitName> for UnitName {
	fn from( name: &UnitName ) -> Self { name.clone() }
}

/// One unit name or a sequence of them.
///
/// Activity tracking accepts either shape, so `tracker.invoked( "a" )` and
/// `tracker.invoked([ "a", "b" ])` both work.
pub trait IntoUnitNames {
	fn into_unit_names( self ) -> Vec<UnitName> ;
}

impl IntoUnitNames for &str {
	fn into_unit_names( self ) -> Vec<UnitName> { vec![ self.into() ] }
}

impl IntoUnitNames for String {
	fn into_unit_names( self ) -> Vec<UnitName> { vec![ self.into() ] }
}

impl IntoUnitNames for UnitName {
	fn into_unit_names( self ) -> Vec<UnitName> { vec![ self ] }
}

impl<T: Into<UnitName>> IntoUnitNames for Vec<T> {
	fn into_unit_names( self ) -> Vec<UnitName> { self.into_iter().map( Into::into ).collect() }
}

impl<T: Into<UnitName>, const N: usize> IntoUnitNames for [T; N] {
	fn into_unit_names( self ) -> Vec<UnitName> { self.into_iter().map( Into::into ).collect() }
}

impl<T: Into<UnitName> + Clone> IntoUnitNames for &[T] {
	fn into_unit_names( self ) -> Vec<UnitName> { self.iter().cloned().map( Into::into ).collect() }
}

/// The files the pipeline loaded for a unit during one load attempt.
///
/// Handed to [`Unit::expand`]. Paths are listed in load order.
#[derive( Debug, Clone )]
pub struct UnitSources {
	pub(crate) name: UnitName,
	pub(crate) main: Vec<PathBuf>,
	pub(crate) models: Vec<PathBuf>,
	pub(crate) helpers: Vec<PathBuf>,
}

impl UnitSources {

	pub(crate) fn new( name: UnitName ) -> Self {
		Self { name, main: Vec::new(), models: Vec::new(), helpers: Vec::new() }
	}

	#[inline] pub fn name( &self ) -> &UnitName { &self.name }

	/// Main files, one per directory root that contains the unit.
	#[inline] pub fn main( &self ) -> &[PathBuf] { &self.main }

	/// Files under `models/`.
	#[inline] pub fn models( &self ) -> &[PathBuf] { &self.models }

	/// Files under `helpers/`.
	#[inline] pub fn helpers( &self ) -> &[PathBuf] { &self.helpers }

}
