use std::sync::Arc ;
use unit_loader::{ CachingMode, LoadError, ResolutionError, UnitName };
use crate::fixture_units::{ Fixture, TestUnit, UnitTree };

#[test]
fn fetch_returns_the_loaded_unit() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	let fetched = fixture.loader.fetch( "billing" ).expect( "billing should be fetchable" );

	assert_eq!( fetched.name(), "billing" );
	assert!( Arc::ptr_eq( &fetched, fixture.loader.load( "billing" ).unit().expect( "loaded" )));
	assert_eq!( unit.expansions(), 1 );

}

#[test]
fn fetch_rejects_descriptors_without_the_unit_capability() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let unit = TestUnit::not_a_unit( "billing" );
	fixture.loader.register( unit.clone() );

	assert!( fixture.loader.fetch( "billing" ).is_none() );
	match fixture.loader.load_state( "billing" ).as_ref().and_then(| state | state.error() ) {
		Some( LoadError::Resolution( ResolutionError::NotAUnit( _ ))) => {}
		other => panic!( "Expected NotAUnit, got: {:#?}", other ),
	}
	assert_eq!( unit.expansions(), 0 );

}

#[test]
fn fetch_rechecks_the_registry_after_loading() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	assert!( fixture.loader.fetch( "billing" ).is_some() );
	fixture.loader.deregister( unit.as_ref() );

	assert!( fixture.loader.load( "billing" ).is_loaded() );
	assert!( fixture.loader.fetch( "billing" ).is_none() );

}

#[test]
fn lookups_accept_unit_names() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	fixture.loader.register( TestUnit::new( "billing" ));
	let name = UnitName::from( "billing" );

	assert!( fixture.loader.load( &name ).is_loaded() );
	assert!( fixture.loader.loaded( &name ));
	assert!( fixture.loader.load_state( &name ).is_some_and(| state | state.is_loaded() ));
	assert!( fixture.loader.unit( &name ).is_some() );
	assert_eq!( fixture.loader.paths( &name ), vec![ tree.root().join( "billing" ) ]);
	assert!( fixture.loader.fetch( name ).is_some() );

}
