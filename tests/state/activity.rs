use unit_loader::{ Loader, UnitName };

fn names( names: &[&str] ) -> Vec<UnitName> { names.iter().copied().map( UnitName::from ).collect() }

#[test]
fn invoked_units_are_deduplicated_in_first_seen_order() {

	let loader = Loader::default();

	loader.invoked([ "a", "a", "b" ]);
	loader.invoked([ "b" ]);

	assert_eq!( loader.invoked_units(), names( &[ "a", "b" ]));

}

#[test]
fn single_names_and_sequences_are_both_accepted() {

	let loader = Loader::default();

	loader.requested( "billing" );
	loader.requested( vec![ "shipping".to_string(), "billing".to_string() ]);
	loader.requested( UnitName::from( "tax" ));

	assert_eq!( loader.requested_units(), names( &[ "billing", "shipping", "tax" ]));

}

#[test]
fn lists_are_independent() {

	let loader = Loader::default();

	loader.invoked( "billing" );
	loader.aborted([ "shipping", "billing" ]);

	assert_eq!( loader.invoked_units(), names( &[ "billing" ]));
	assert_eq!( loader.requested_units(), names( &[]));
	assert_eq!( loader.aborted_units(), names( &[ "shipping", "billing" ]));

}

#[test]
fn reset_clears_activity() {

	let loader = Loader::default();

	loader.invoked( "billing" );
	loader.requested( "billing" );
	loader.aborted( "billing" );
	loader.reset();

	assert!( loader.invoked_units().is_empty() );
	assert!( loader.requested_units().is_empty() );
	assert!( loader.aborted_units().is_empty() );

}
