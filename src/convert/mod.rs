//! Document conversion through an external engine.
//!
//! A [`Converter`] stages each request in its own [`WorkingArea`], unpacks
//! y-format input into `body.txt` plus `media/`, hands the files to an
//! [`Engine`] and validates what comes back before returning it.
//!
//! # Example
//!
//! ```no_run
//! use yconvert::Document;
//! use yconvert::convert::{Converter, ConverterConfig, X2tEngine};
//!
//! # fn main() -> yconvert::Result<()> {
//! let config = ConverterConfig::load(None)?;
//! let converter = Converter::new(X2tEngine::from_config(&config), config);
//!
//! let sheet = Document::new(std::fs::read("report.xlsx")?, "xlsx");
//! let xlsy = converter.convert(sheet, "xlsy")?;
//! std::fs::write("report.xlsy", xlsy.data())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod converter;
pub mod engine;
pub mod staging;
#[cfg(feature = "x2t")]
pub mod x2t;

pub use config::{ConverterConfig, DEFAULT_TIMEOUT_SECS};
pub use converter::Converter;
pub use engine::{Engine, EngineJob};
pub use staging::{ConversionState, WorkingArea};
#[cfg(feature = "x2t")]
pub use x2t::X2tEngine;
