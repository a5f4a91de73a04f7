use unit_loader::CachingMode ;
use crate::fixture_units::{ Fixture, TestUnit, UnitTree };

#[test]
fn reset_forces_a_fresh_load() {

	let tree = UnitTree::new();
	let main = tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	assert!( fixture.loader.load( "billing" ).is_loaded() );
	fixture.loader.reset();
	assert!( !fixture.loader.loaded( "billing" ));
	assert!( fixture.loader.load( "billing" ).is_loaded() );

	assert_eq!( unit.expansions(), 2 );
	assert_eq!( fixture.required(), vec![ main.clone(), main ]);

}

#[test]
fn failure_is_retried_after_reset() {

	let tree = UnitTree::new();
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	fixture.loader.register( TestUnit::new( "billing" ));

	assert!( fixture.loader.load( "billing" ).is_failed() );

	tree.main_file( "billing" );
	fixture.loader.reset();

	assert!( fixture.loader.load( "billing" ).is_loaded() );
	assert_eq!( fixture.notifier.count(), 1 );

}

#[test]
fn mode_switch_applies_at_next_reset() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	assert!( fixture.loader.load( "billing" ).is_loaded() );
	fixture.loader.set_caching_mode( CachingMode::Ephemeral );
	assert!( fixture.loader.loaded( "billing" ));

	fixture.loader.reset();
	assert!( !fixture.loader.loaded( "billing" ));
	assert_eq!( fixture.loader.caching_mode(), CachingMode::Ephemeral );

}
