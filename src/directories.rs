//! Directory roots and the unit file layout.
//!
//! For a unit `foo` under a root `<root>`, the loader expects:
//!
//! - `<root>/foo/foo.<ext>` - main file
//! - `<root>/foo/models/*.<ext>` and `<root>/foo/helpers/*.<ext>` - extension files
//! - `<root>/foo/javascripts/*.js` - script assets
//! - `<root>/foo/lib/*/engine.<ext>` - engine files extending host startup
//!
//! Glob-like lookups never fail: a missing directory simply yields no files.

use std::path::{ Component, Path, PathBuf };
use pipe_trait::Pipe ;
use thiserror::Error ;



const MODELS_DIR: &str = "models" ;
const HELPERS_DIR: &str = "helpers" ;
const JAVASCRIPTS_DIR: &str = "javascripts" ;
const LIB_DIR: &str = "lib" ;
const ENGINE_STEM: &str = "engine" ;

/// Errors that occur when reading a path file.
#[derive( Error, Debug )]
pub enum PathFileError {
	#[error( "Io Error on {}: {1}", .0.display() )] Io( PathBuf, #[source] std::io::Error ),
}

/// Ordered list of directory roots searched for units.
#[derive( Debug, Default, Clone, PartialEq, Eq )]
pub(crate) struct Directories {
	roots: Vec<PathBuf>,
}

impl Directories {

	/// Appends a root. Adding a root that is already present keeps the original position.
	pub fn add( &mut self, path: PathBuf ) -> bool {
		if self.roots.contains( &path ) { return false }
		self.roots.push( path );
		true
	}

	pub fn remove( &mut self, path: &Path ) -> bool {
		let before = self.roots.len();
		self.roots.retain(| root | root != path );
		before != self.roots.len()
	}

	#[inline] pub fn roots( &self ) -> &[PathBuf] { &self.roots }

	/// Reads a path file: one directory per line, relative entries joined onto `root`.
	/// Blank lines and lines starting with `#` are skipped.
	pub fn from_path_file( file: &Path, root: &Path ) -> Result<Self, PathFileError> {
		let content = std::fs::read_to_string( file ).map_err(| err | PathFileError::Io( file.to_path_buf(), err ))?;
		let mut directories = Self::default();
		content.lines()
			.map( str::trim )
			.filter(| line | !line.is_empty() && !line.starts_with( '#' ))
			.map(| line | root.join( line ))
			.for_each(| path | { directories.add( path ); });
		Ok( directories )
	}

	/// `<root>/<name>` for every root. Empty for names that are not a plain path
	/// segment, so no lookup ever leaves the roots.
	pub fn paths( &self, name: &str ) -> Vec<PathBuf> {
		if !is_plain_name( name ) { return Vec::new() }
		self.roots.iter().map(| root | root.join( name )).collect()
	}

	/// `<root>/<name>/javascripts/*.js` for every root.
	pub fn javascripts( &self, name: &str ) -> Vec<PathBuf> {
		self.paths( name ).iter()
			.flat_map(| path | files_with_extension( &path.join( JAVASCRIPTS_DIR ), "js" ))
			.collect()
	}

	/// `<root>/<name>/<name>.<ext>` for every root where it exists.
	pub fn main_files( &self, name: &str, ext: &str ) -> Vec<PathBuf> {
		self.paths( name ).into_iter()
			.map(| path | path.join( format!( "{name}.{ext}" )))
			.filter(| path | path.is_file() )
			.collect()
	}

	/// `<root>/<name>/models/*.<ext>`, root by root, sorted within each root.
	pub fn model_files( &self, name: &str, ext: &str ) -> Vec<PathBuf> {
		self.extension_files( name, MODELS_DIR, ext )
	}

	/// `<root>/<name>/helpers/*.<ext>`, root by root, sorted within each root.
	pub fn helper_files( &self, name: &str, ext: &str ) -> Vec<PathBuf> {
		self.extension_files( name, HELPERS_DIR, ext )
	}

	fn extension_files( &self, name: &str, sub_dir: &str, ext: &str ) -> Vec<PathBuf> {
		self.paths( name ).iter()
			.flat_map(| path | files_with_extension( &path.join( sub_dir ), ext ))
			.collect()
	}

	/// `<root>/*/lib/*/engine.<ext>` for every root.
	pub fn engine_files( &self, ext: &str ) -> Vec<PathBuf> {
		self.roots.iter()
			.flat_map(| root | sub_dirs( root ))
			.flat_map(| unit_dir | sub_dirs( &unit_dir.join( LIB_DIR )))
			.map(| lib_dir | lib_dir.join( format!( "{ENGINE_STEM}.{ext}" )))
			.filter(| path | path.is_file() )
			.collect()
	}

}

/// Whether `name` is a single normal path segment: not empty, not absolute, not
/// `.` or `..`, and free of separators.
pub(crate) fn is_plain_name( name: &str ) -> bool {
	if name.contains([ '/', '\\' ]) { return false }
	let mut components = Path::new( name ).components();
	matches!(( components.next(), components.next() ), ( Some( Component::Normal( _ )), None ))
}

fn sorted_entries( dir: &Path ) -> Vec<PathBuf> {
	let Ok( entries ) = std::fs::read_dir( dir ) else { return Vec::new() };
	let mut entries = entries
		.filter_map( Result::ok )
		.map(| entry | entry.path() )
		.collect::<Vec<_>>();
	entries.sort();
	entries
}

fn sub_dirs( dir: &Path ) -> Vec<PathBuf> {
	dir.pipe( sorted_entries ).into_iter().filter(| path | path.is_dir() ).collect()
}

fn files_with_extension( dir: &Path, ext: &str ) -> Vec<PathBuf> {
	dir.pipe( sorted_entries ).into_iter()
		.filter(| path | path.is_file() && path.extension().is_some_and(| found | found == ext ))
		.collect()
}
