use unit_loader::{ CachingMode, LoadError, LoadOptions, ResolutionError };
use crate::fixture_units::{ Fixture, TestUnit, UnitTree };

#[test]
fn missing_files_fail_once_and_notify_once() {

	let tree = UnitTree::new();
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	fixture.loader.register( TestUnit::new( "billing" ));

	let first = fixture.loader.load( "billing" );
	match first.error() {
		Some( LoadError::Resolution( ResolutionError::MissingSource( name ))) => assert_eq!( name.as_str(), "billing" ),
		other => panic!( "Expected MissingSource, got: {:#?}", other ),
	}
	assert_eq!( fixture.notifier.count(), 1 );
	assert!( fixture.loader.loaded( "billing" ));

	assert!( fixture.loader.load( "billing" ).is_failed() );
	assert_eq!( fixture.notifier.count(), 1 );

}

#[test]
fn notification_carries_unit_key_and_scope() {

	let tree = UnitTree::new();
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );

	{
		let _scope = fixture.loader.scoped( "checkout" );
		assert!( fixture.loader.load( "billing" ).is_failed() );
	}

	let notifications = fixture.notifier.notifications();
	assert_eq!( notifications.len(), 1 );
	let notification = &notifications[0];
	assert_eq!( notification.message, "missing billing" );
	assert_eq!( notification.key, "billing load module" );
	assert_eq!( notification.unit.as_str(), "billing" );
	assert_eq!( notification.context.as_deref(), Some( "checkout" ));
	assert!( !notification.fatal );
	assert!( notification.backtrace.len() <= unit_loader::BACKTRACE_DEPTH );
	assert!( !notification.backtrace.is_empty() );
	assert!( !notification.backtrace[0].contains( "unit_loader::" ), "Backtrace starts inside the loader: {:#?}", notification.backtrace );
	assert!(
		notification.backtrace.iter().any(| frame | frame.contains( "notification_carries_unit_key_and_scope" )),
		"Backtrace misses the calling test: {:#?}", notification.backtrace,
	);
	assert!( notification.error.is_resolution() );

}

#[test]
fn explicit_context_wins_over_scope() {

	let tree = UnitTree::new();
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );
	fixture.loader.push_scope( "checkout" );

	fixture.loader.load_with( "billing", &LoadOptions::with_context( "invoice-mailer" ));

	assert_eq!( fixture.notifier.notifications()[0].context.as_deref(), Some( "invoice-mailer" ));

}

#[test]
fn skip_notify_silences_resolution_failures() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	let fixture = Fixture::over( &tree, CachingMode::Ephemeral );

	let state = fixture.loader.load_with( "billing", &LoadOptions::default().skip_notify() );

	assert!( state.is_failed() );
	assert!( fixture.loader.loaded( "billing" ));
	assert_eq!( fixture.notifier.count(), 0 );

}

#[test]
fn missing_unit_without_any_directory() {

	let fixture = Fixture::new( CachingMode::Persistent );

	assert!( fixture.loader.load( "billing" ).is_failed() );
	assert!( fixture.loader.fetch( "billing" ).is_none() );
	assert_eq!( fixture.required_count(), 0 );
	assert_eq!( fixture.notifier.count(), 1 );

}
