//! Loading unit files.
//!
//! The pipeline never reads unit files itself; it hands each path to a
//! [`SourceLoader`]. The default [`ComponentLoader`] compiles every file into a
//! wasm component and keeps it around, recompiling only when the file changes.

use std::collections::HashMap ;
use std::path::{ Path, PathBuf };
use std::time::SystemTime ;
use thiserror::Error ;
use wasmtime::Engine ;
use wasmtime::component::Component ;



/// Loads unit files on behalf of the pipeline.
pub trait SourceLoader: Send {

	/// Loads the file at `path`.
	///
	/// Returns `true` if the call introduced new code, either because the file was
	/// never loaded before or because it changed since the last load. Returns `false`
	/// when the file was already loaded and is unchanged.
	///
	/// # Errors
	/// Fails if the file cannot be read or is not valid code.
	fn require( &mut self, path: &Path ) -> Result<bool, SourceError> ;

}

impl<T: SourceLoader + ?Sized> SourceLoader for Box<T> {
	fn require( &mut self, path: &Path ) -> Result<bool, SourceError> { ( **self ).require( path ) }
}

/// Errors that occur when loading a unit file.
#[derive( Error, Debug )]
pub enum SourceError {
	/// The file could not be read.
	#[error( "Io Error on {}: {1}", .0.display() )] Io( PathBuf, #[source] std::io::Error ),
	/// The file is not a valid wasm component.
	#[error( "Failed to compile {}: {1}", .0.display() )] Compile( PathBuf, wasmtime::Error ),
}

struct LoadedComponent {
	modified: Option<SystemTime>,
	len: u64,
	component: Component,
}

/// A [`SourceLoader`] that compiles unit files into wasm components.
///
/// Accepts both the binary and the text format. A file counts as changed when its
/// modification time or length differs from the last compile.
pub struct ComponentLoader {
	engine: Engine,
	loaded: HashMap<PathBuf, LoadedComponent>,
}

impl ComponentLoader {

	/// Creates a loader compiling with the given engine.
	pub fn new( engine: Engine ) -> Self {
		Self { engine, loaded: HashMap::new() }
	}

	#[inline] pub fn engine( &self ) -> &Engine { &self.engine }

	/// The component compiled from `path`, if it was loaded.
	pub fn component( &self, path: &Path ) -> Option<&Component> {
		self.loaded.get( path ).map(| loaded | &loaded.component )
	}

	/// Number of files currently loaded.
	pub fn len( &self ) -> usize { self.loaded.len() }

	pub fn is_empty( &self ) -> bool { self.loaded.is_empty() }

}

impl Default for ComponentLoader {
	fn default() -> Self { Self::new( Engine::default() ) }
}

impl SourceLoader for ComponentLoader {

	fn require( &mut self, path: &Path ) -> Result<bool, SourceError> {

		let metadata = std::fs::metadata( path ).map_err(| err | SourceError::Io( path.to_path_buf(), err ))?;
		let modified = metadata.modified().ok();
		let len = metadata.len();

		if let Some( loaded ) = self.loaded.get( path ) {
			if loaded.modified == modified && loaded.len == len { return Ok( false ) }
		}

		let component = Component::from_file( &self.engine, path )
			.map_err(| err | SourceError::Compile( path.to_path_buf(), err ))?;
		tracing::debug!( path = %path.display(), "compiled unit component" );
		self.loaded.insert( path.to_path_buf(), LoadedComponent { modified, len, component });
		Ok( true )

	}

}

impl std::fmt::Debug for ComponentLoader {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "ComponentLoader" )
			.field( "engine", &"<Engine>" )
			.field( "loaded", &self.loaded.keys().collect::<Vec<_>>() )
			.finish()
	}
}
