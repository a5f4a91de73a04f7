//! Loader configuration.
//!
//! ```
//! use unit_loader::{ LoaderConfig, CachingMode };
//!
//! let config = LoaderConfig::from_toml_str( r#"
//! 	caching = "ephemeral"
//! 	directories = [ "units" ]
//! "# ).unwrap();
//! assert_eq!( config.caching, CachingMode::Ephemeral );
//! assert_eq!( config.source_extension, "wasm" );
//! ```

use std::path::{ Path, PathBuf };
use serde::Deserialize ;
use thiserror::Error ;



/// How long load results live.
#[derive( Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default )]
#[serde( rename_all = "lowercase" )]
pub enum CachingMode {
	/// Load results survive [`Loader::reset`]( crate::Loader::reset ). Each unit is
	/// loaded at most once per process lifetime.
	#[default] Persistent,
	/// Every [`Loader::reset`]( crate::Loader::reset ) discards load results, so the
	/// next access loads the unit again.
	Ephemeral,
}

impl std::fmt::Display for CachingMode {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { match self {
		Self::Persistent => write!( f, "persistent" ),
		Self::Ephemeral => write!( f, "ephemeral" ),
	}}
}

/// Settings for a [`Loader`]( crate::Loader ).
#[derive( Deserialize, Debug, Clone, PartialEq, Eq )]
#[serde( default, deny_unknown_fields )]
pub struct LoaderConfig {
	/// Caching policy, read on every reset.
	pub caching: CachingMode,
	/// Extension of unit code files, without the dot.
	pub source_extension: String,
	/// Also empty the unit registry on reset. Useful to isolate tests.
	pub reset_registry: bool,
	/// Directory roots added when the loader is created.
	pub directories: Vec<PathBuf>,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self {
			caching: CachingMode::default(),
			source_extension: "wasm".to_string(),
			reset_registry: false,
			directories: Vec::new(),
		}
	}
}

/// Errors that occur when reading a configuration file.
#[derive( Error, Debug )]
pub enum ConfigError {
	#[error( "Io Error on {}: {1}", .0.display() )] Io( PathBuf, #[source] std::io::Error ),
	#[error( "TOML parse error: {0}" )] Toml( #[from] toml::de::Error ),
}

impl LoaderConfig {

	/// Convenience constructor for a default configuration with the given caching mode.
	pub fn with_caching( caching: CachingMode ) -> Self {
		Self { caching, ..Self::default() }
	}

	/// Parses a configuration from TOML. Missing keys take their defaults.
	///
	/// # Errors
	/// Fails on malformed TOML or unknown keys.
	pub fn from_toml_str( content: &str ) -> Result<Self, ConfigError> {
		Ok( toml::from_str( content )? )
	}

	/// Reads and parses a TOML configuration file.
	///
	/// Relative entries in `directories` are resolved against the file's parent directory.
	///
	/// # Errors
	/// Fails if the file cannot be read or does not parse.
	pub fn from_toml_file( path: &Path ) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string( path ).map_err(| err | ConfigError::Io( path.to_path_buf(), err ))?;
		let mut config = Self::from_toml_str( &content )?;
		if let Some( base ) = path.parent() {
			config.directories = config.directories.into_iter()
				.map(| dir | if dir.is_relative() { base.join( dir ) } else { dir })
				.collect();
		}
		Ok( config )
	}

}
