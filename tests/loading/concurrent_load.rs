use unit_loader::CachingMode ;
use crate::fixture_units::{ Fixture, TestUnit, UnitTree };

#[test]
fn concurrent_callers_share_a_single_load() {

	let tree = UnitTree::new();
	tree.main_file( "billing" );
	tree.main_file( "shipping" );
	let fixture = Fixture::over( &tree, CachingMode::Persistent );
	let billing = TestUnit::new( "billing" );
	let shipping = TestUnit::new( "shipping" );
	fixture.loader.register( billing.clone() );
	fixture.loader.register( shipping.clone() );

	std::thread::scope(| scope | {
		let handles = ( 0..8 )
			.map(| i | {
				let loader = &fixture.loader ;
				scope.spawn( move || match i % 2 {
					0 => loader.load( "billing" ),
					_ => loader.load( "shipping" ),
				})
			})
			.collect::<Vec<_>>();
		handles.into_iter().for_each(| handle | assert!( handle.join().expect( "loader thread panicked" ).is_loaded() ));
	});

	assert_eq!( billing.expansions(), 1 );
	assert_eq!( shipping.expansions(), 1 );
	assert_eq!( fixture.required_count(), 2 );

}

#[test]
fn concurrent_failures_notify_once() {

	let tree = UnitTree::new();
	let fixture = Fixture::over( &tree, CachingMode::Persistent );

	std::thread::scope(| scope | {
		( 0..8 ).for_each(| _ | { scope.spawn(|| assert!( fixture.loader.load( "billing" ).is_failed() )); });
	});

	assert_eq!( fixture.notifier.count(), 1 );

}
