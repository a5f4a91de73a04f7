use std::collections::HashMap ;
use std::thread::ThreadId ;

use crate::load_state::LoadState ;
use crate::unit::UnitName ;



/// A unit's cache entry.
#[derive( Debug, Clone )]
pub(crate) enum Entry {
	/// The load sequence is running on the given thread.
	Loading( ThreadId ),
	Settled( LoadState ),
}

/// What a caller should do about a unit, decided under the cache lock.
pub(crate) enum Claim {
	/// The outcome is known.
	Settled( LoadState ),
	/// The caller now owns the load and must [`settle`]( LoadCache::settle ) it.
	Owned,
	/// Another thread is loading the unit; wait and ask again.
	Wait,
	/// Waiting would never end: the unit is being loaded by this thread, or by a
	/// thread that is itself waiting, directly or through others, on this thread.
	Cycle,
}

/// Load outcomes keyed by unit name, plus the loads currently in flight.
///
/// Only one load sequence runs per unit. Callers claim the unit under the cache
/// lock, run the sequence without it, then settle the entry and wake the waiters.
/// Waiting threads are recorded so that a wait which would close a cycle between
/// threads is refused instead of blocking forever.
#[derive( Debug, Default )]
pub(crate) struct LoadCache {
	entries: HashMap<UnitName, Entry>,
	waiting: HashMap<ThreadId, UnitName>,
}

impl LoadCache {

	/// Claims `name` for `thread`.
	pub fn claim( &mut self, name: &UnitName, thread: ThreadId ) -> Claim {
		match self.entries.get( name ) {
			Some( Entry::Settled( state )) => Claim::Settled( state.clone() ),
			Some( Entry::Loading( owner )) if self.waits_on( *owner, thread ) => Claim::Cycle,
			Some( Entry::Loading( _ )) => Claim::Wait,
			None => {
				self.entries.insert( name.clone(), Entry::Loading( thread ));
				Claim::Owned
			}
		}
	}

	/// Whether `owner` is `thread`, or is blocked on a load that leads back to `thread`.
	fn waits_on( &self, owner: ThreadId, thread: ThreadId ) -> bool {
		let mut current = owner ;
		for _ in 0..=self.waiting.len() {
			if current == thread { return true }
			match self.waiting.get( &current ).and_then(| name | self.entries.get( name )) {
				Some( Entry::Loading( next )) => current = *next,
				_ => return false,
			}
		}
		false
	}

	pub fn start_waiting( &mut self, thread: ThreadId, name: &UnitName ) {
		self.waiting.insert( thread, name.clone() );
	}

	pub fn stop_waiting( &mut self, thread: ThreadId ) {
		self.waiting.remove( &thread );
	}

	/// Records the outcome of a load claimed earlier.
	pub fn settle( &mut self, name: UnitName, state: LoadState ) {
		self.entries.insert( name, Entry::Settled( state ));
	}

	/// Drops every settled outcome. Loads in flight keep their claim.
	pub fn clear( &mut self ) {
		self.entries.retain(| _, entry | matches!( entry, Entry::Loading( _ )));
	}

	/// The settled outcome for `name`, if any.
	pub fn get( &self, name: &str ) -> Option<&LoadState> {
		match self.entries.get( name ) {
			Some( Entry::Settled( state )) => Some( state ),
			_ => None,
		}
	}

	/// Whether a load for `name` has settled, successfully or not.
	pub fn contains( &self, name: &str ) -> bool { self.get( name ).is_some() }

	pub fn len( &self ) -> usize {
		self.entries.values().filter(| entry | matches!( entry, Entry::Settled( _ ))).count()
	}

}
