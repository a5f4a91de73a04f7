use std::collections::HashMap ;
use std::sync::Arc ;

use crate::unit::{ Unit, UnitName };



/// Unit descriptors keyed by name.
///
/// Holds shared handles only; the host keeps ownership of its unit types and pairs
/// tearing one down with deregistration.
#[derive( Default )]
pub(crate) struct UnitRegistry {
	units: HashMap<UnitName, Arc<dyn Unit>>,
}

impl UnitRegistry {

	/// Inserts or overwrites the entry for the unit's name.
	pub fn register( &mut self, unit: Arc<dyn Unit> ) -> Option<Arc<dyn Unit>> {
		self.units.insert( UnitName::from( unit.name() ), unit )
	}

	pub fn deregister( &mut self, name: &str ) -> Option<Arc<dyn Unit>> {
		self.units.remove( name )
	}

	#[inline] pub fn get( &self, name: &str ) -> Option<&Arc<dyn Unit>> { self.units.get( name ) }

	#[inline] pub fn len( &self ) -> usize { self.units.len() }

	pub fn names( &self ) -> impl Iterator<Item = &UnitName> { self.units.keys() }

	pub fn clear( &mut self ) { self.units.clear() }

}

impl std::fmt::Debug for UnitRegistry {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_set().entries( self.units.keys() ).finish()
	}
}
