//! Diagnostic scope labels.
//!
//! Callers bracket a region of work with a label so that loads happening inside it
//! can be attributed to it. The loader stores and exposes the labels; it never
//! branches on them.

use crate::Loader ;



#[derive( Debug, Default, Clone )]
pub(crate) struct ScopeStack {
	labels: Vec<String>,
}

impl ScopeStack {

	pub fn push( &mut self, label: String ) { self.labels.push( label ) }

	/// Pops the top label. Popping an empty stack returns `None`.
	pub fn pop( &mut self ) -> Option<String> { self.labels.pop() }

	pub fn current( &self ) -> Option<&String> { self.labels.last() }

	pub fn labels( &self ) -> &[String] { &self.labels }

	pub fn clear( &mut self ) { self.labels.clear() }

}

/// Pops its scope when dropped.
///
/// Returned by [`Loader::scoped`].
///
/// ```
/// # use unit_loader::Loader ;
/// let loader = Loader::default();
/// {
/// 	let _scope = loader.scoped( "checkout" );
/// 	assert_eq!( loader.current_scope().as_deref(), Some( "checkout" ));
/// }
/// assert_eq!( loader.current_scope(), None );
/// ```
#[must_use = "the scope is popped as soon as the guard is dropped"]
pub struct ScopeGuard<'a> {
	pub(crate) loader: &'a Loader,
}

impl Drop for ScopeGuard<'_> {
	fn drop( &mut self ) { let _ = self.loader.pop_scope(); }
}

impl std::fmt::Debug for ScopeGuard<'_> {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ScopeGuard" ).finish_non_exhaustive()
	}
}
