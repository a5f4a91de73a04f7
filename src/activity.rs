use itertools::Itertools ;

use crate::unit::UnitName ;



/// Append-only records of which units were invoked, requested and aborted.
///
/// Purely observational. Read through de-duplicating views that keep the order
/// in which each name was first seen.
#[derive( Debug, Default, Clone )]
pub(crate) struct ActivityTracker {
	invoked: Vec<UnitName>,
	requested: Vec<UnitName>,
	aborted: Vec<UnitName>,
}

impl ActivityTracker {

	pub fn invoked( &mut self, names: Vec<UnitName> ) { self.invoked.extend( names ) }
	pub fn requested( &mut self, names: Vec<UnitName> ) { self.requested.extend( names ) }
	pub fn aborted( &mut self, names: Vec<UnitName> ) { self.aborted.extend( names ) }

	pub fn invoked_units( &self ) -> Vec<UnitName> { unique( &self.invoked ) }
	pub fn requested_units( &self ) -> Vec<UnitName> { unique( &self.requested ) }
	pub fn aborted_units( &self ) -> Vec<UnitName> { unique( &self.aborted ) }

	pub fn clear( &mut self ) {
		self.invoked.clear();
		self.requested.clear();
		self.aborted.clear();
	}

}

fn unique( names: &[UnitName] ) -> Vec<UnitName> {
	names.iter().unique().cloned().collect()
}
