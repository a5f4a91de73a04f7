//! Hooks into the host that the loader calls but does not implement.
//!
//! - [`Notifier`] receives load failures.
//! - [`FunctionCache`] owns derived per-unit caches that go stale when a unit's code changes.
//! - [`HelperRegistry`] retracts helper-level side effects when a unit is deregistered.
//!
//! Every hook has a default that does nothing, apart from [`TracingNotifier`] which
//! reports failures through `tracing`.

use std::sync::Arc ;

use crate::load_state::LoadError ;
use crate::unit::UnitName ;



/// Number of backtrace lines forwarded with a notification.
pub const BACKTRACE_DEPTH: usize = 21 ;

/// A load failure, as handed to the [`Notifier`].
#[derive( Debug, Clone )]
pub struct Notification {
	/// Short summary, `missing <unit>` for resolution failures and `except <unit>` for faults.
	pub message: String,
	/// Whether the host should treat the failure as fatal. Load failures never are.
	pub fatal: bool,
	/// Grouping key, `<unit> load module`.
	pub key: String,
	/// The unit whose load failed.
	pub unit: UnitName,
	/// The failure itself.
	pub error: Arc<LoadError>,
	/// The context the load was requested from.
	pub context: Option<String>,
	/// Call history at the point of failure, truncated to [`BACKTRACE_DEPTH`] lines.
	pub backtrace: Vec<String>,
}

/// Receives load failures.
///
/// Fire-and-forget: the loader ignores the outcome and contains panics.
pub trait Notifier: Send + Sync {
	fn notify( &self, notification: &Notification );
}

/// Clears caches derived from a unit's code.
pub trait FunctionCache: Send + Sync {

	/// Drops cached state derived from the unit resolving to `type_name`.
	///
	/// Called whenever a unit's main file introduced new code.
	fn clear_function_cache( &self, type_name: &str );

	/// Drops every derived cache.
	fn clear_all( &self );

}

/// Retracts helper registrations tied to a unit.
pub trait HelperRegistry: Send + Sync {
	fn deregister( &self, unit: &UnitName );
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
	fn notify( &self, notification: &Notification ) { ( **self ).notify( notification ) }
}

impl<T: FunctionCache + ?Sized> FunctionCache for Arc<T> {
	fn clear_function_cache( &self, type_name: &str ) { ( **self ).clear_function_cache( type_name ) }
	fn clear_all( &self ) { ( **self ).clear_all() }
}

impl<T: HelperRegistry + ?Sized> HelperRegistry for Arc<T> {
	fn deregister( &self, unit: &UnitName ) { ( **self ).deregister( unit ) }
}

/// Default notifier, logs failures through `tracing`.
#[derive( Debug, Default, Clone, Copy )]
pub struct TracingNotifier ;

impl Notifier for TracingNotifier {
	fn notify( &self, notification: &Notification ) {
		match notification.fatal {
			true => tracing::error!(
				unit = %notification.unit,
				key = %notification.key,
				context = notification.context.as_deref().unwrap_or( "-" ),
				error = %notification.error,
				"{}", notification.message
			),
			false => tracing::warn!(
				unit = %notification.unit,
				key = %notification.key,
				context = notification.context.as_deref().unwrap_or( "-" ),
				error = %notification.error,
				"{}", notification.message
			),
		}
	}
}

/// Hook implementation that does nothing.
#[derive( Debug, Default, Clone, Copy )]
pub struct NoopHooks ;

impl FunctionCache for NoopHooks {
	fn clear_function_cache( &self, _type_name: &str ) {}
	fn clear_all( &self ) {}
}

impl HelperRegistry for NoopHooks {
	fn deregister( &self, _unit: &UnitName ) {}
}
