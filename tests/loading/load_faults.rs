use unit_loader::{ CachingMode, LoadError, LoadFault, LoadOptions, SourceError };
use crate::fixture_units::{ Fixture, TestUnit, UnitTree };

#[test]
fn invalid_component_is_a_fault() {

	let tree = UnitTree::new();
	tree.write( "billing/billing.wasm", "this is not a component" );
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	match fixture.loader.load( "billing" ).error() {
		Some( LoadError::Fault( LoadFault::Source( SourceError::Compile( path, _ )))) => assert!( path.ends_with( "billing/billing.wasm" )),
		other => panic!( "Expected Compile fault, got: {:#?}", other ),
	}
	assert_eq!( unit.expansions(), 0 );
	assert_eq!( fixture.notifier.messages(), vec![ "except billing".to_string() ]);

}

#[test]
fn faults_are_reported_even_when_notifications_are_skipped() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	fixture.loader.register( TestUnit::failing( "billing" ));

	let state = fixture.loader.load_with( "billing", &LoadOptions::default().skip_notify() );

	match state.error() {
		Some( LoadError::Fault( LoadFault::Expansion( name, _ ))) => assert_eq!( name.as_str(), "billing" ),
		other => panic!( "Expected Expansion fault, got: {:#?}", other ),
	}
	assert_eq!( fixture.notifier.count(), 1 );

}

#[test]
fn panicking_expansion_is_contained() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let unit = TestUnit::panicking( "billing" );
	fixture.loader.register( unit.clone() );

	match fixture.loader.load( "billing" ).error() {
		Some( LoadError::Fault( LoadFault::Panicked( _, message, location ))) => {
			assert!( message.contains( "panicked while expanding" ));
			assert!( location.as_deref().is_some_and(| at | at.contains( "fixture_units.rs" )), "Unexpected panic location: {:?}", location );
		}
		other => panic!( "Expected Panicked fault, got: {:#?}", other ),
	}

	// Cached: the panicking expansion is not run again.
	assert!( fixture.loader.load( "billing" ).is_failed() );
	assert_eq!( unit.expansions(), 1 );
	assert_eq!( fixture.notifier.count(), 1 );

}

#[test]
fn broken_model_file_fails_the_unit() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	tree.write( "billing/models/invoice.wasm", "(component" );
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	let unit = TestUnit::new( "billing" );
	fixture.loader.register( unit.clone() );

	assert!( fixture.loader.load( "billing" ).is_failed() );
	assert_eq!( unit.expansions(), 0 );
	assert_eq!( fixture.notifier.messages(), vec![ "except billing".to_string() ]);

}

#[test]
fn panic_backtrace_starts_at_the_panic_site() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	fixture.loader.register( TestUnit::panicking( "billing" ));

	assert!( fixture.loader.load( "billing" ).is_failed() );

	let backtrace = fixture.notifier.notifications()[0].backtrace.clone();
	assert!( !backtrace.is_empty() );
	assert!( backtrace.len() <= unit_loader::BACKTRACE_DEPTH );
	assert!( backtrace[0].contains( "TestUnit" ), "Expected the expansion frame first, got: {:#?}", backtrace );

}
