use unit_loader::{ CachingMode, UnitName };
use crate::fixture_units::{ Fixture, TestUnit };

#[test]
fn register_overwrites_by_name() {

	let fixture = Fixture::new( CachingMode::Persistent );
	let first = TestUnit::new( "billing" );
	let second = TestUnit::new( "billing" );

	fixture.loader.register( first );
	fixture.loader.register( second.clone() );
	fixture.loader.register( TestUnit::new( "shipping" ));

	assert_eq!( fixture.loader.size(), 2 );
	assert_eq!( fixture.loader.unit_names(), vec![ UnitName::from( "billing" ), UnitName::from( "shipping" ) ]);
	let registered = fixture.loader.unit( "billing" ).expect( "billing is registered" );
	assert!( std::ptr::addr_eq( std::sync::Arc::as_ptr( &registered ), std::sync::Arc::as_ptr( &second )));

}

#[test]
fn deregister_removes_the_unit_and_retracts_its_helpers() {

	let fixture = Fixture::new( CachingMode::Persistent );
	let billing = TestUnit::new( "billing" );
	fixture.loader.register( billing.clone() );
	fixture.loader.register( TestUnit::new( "shipping" ));

	fixture.loader.deregister( billing.as_ref() );

	assert_eq!( fixture.loader.size(), 1 );
	assert!( fixture.loader.unit( "billing" ).is_none() );
	assert_eq!( fixture.hooks.deregistered(), vec![ UnitName::from( "billing" ) ]);

}

#[test]
fn deregistering_an_unknown_name_keeps_the_registry() {

	let fixture = Fixture::new( CachingMode::Persistent );
	fixture.loader.register( TestUnit::new( "billing" ));

	fixture.loader.deregister_name( "shipping" );

	assert_eq!( fixture.loader.size(), 1 );
	assert_eq!( fixture.hooks.deregistered(), vec![ UnitName::from( "shipping" ) ]);

}
