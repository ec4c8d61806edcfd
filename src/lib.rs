//! svgaze: SVG icon library core
//!
//! This crate organizes folders of SVG icons into a browsable library. It
//! classifies each file by its folder path, detects its visual style, turns
//! single-color icons into `currentColor` icons that follow the surrounding
//! theme, and shrinks SVG sources with a set of lossless optimizations.
//!
//! # Example
//!
//! ```
//! use svgaze::{IconInput, IconLibrary};
//!
//! let mut library = IconLibrary::default();
//! let report = library.load(vec![
//!     IconInput::from_path(
//!         "icons/Call - Bold/phone.svg",
//!         r##"<svg viewBox="0 0 24 24"><path d="M2 2h20v20H2z" fill="#1e1e1e"/></svg>"##,
//!     ),
//!     IconInput::from_path("Outline/Brands/comment.svg", "<svg/>"),
//! ]);
//! assert_eq!(report.loaded, 2);
//!
//! let phone = library.item("icons/Call - Bold/phone.svg").unwrap();
//! assert_eq!(phone.category, "Call");
//! assert_eq!(phone.style, "Bold");
//!
//! // Display copies paint with the theme color; the item stays untouched.
//! let display = library.display_svg(&phone.original_path).unwrap();
//! assert!(display.to_string().contains(r#"fill="currentColor""#));
//! ```
//!
//! # Serializable Profiles
//!
//! Library settings round-trip through [`LibraryProfile`] with the
//! [`Configurable`] trait:
//!
//! ```
//! use svgaze::{Configurable, IconLibrary, LibraryProfile};
//!
//! let mut library = IconLibrary::default();
//! library.apply_profile(&LibraryProfile::new().with_style_folders(["glyph", "outline"]));
//!
//! let json = library.export_profile().to_json().unwrap();
//! assert!(json.contains("glyph"));
//! ```

pub mod aggregate;
pub mod classify;
pub mod color;
pub mod document;
mod error;
mod icon;
mod library;
pub mod optimize;
pub mod preview;
mod profile;

pub use aggregate::{CategoryIconSelection, CategoryStats};
pub use classify::{ClassificationResult, ClassifierConfig, PathClassifier, StyleFolders};
pub use color::{ColorVerdict, HexColor};
pub use document::{Element, SvgDocument};
pub use error::SvgError;
pub use icon::{IconInput, IconItem};
pub use library::{Filters, IconLibrary, LoadFailure, LoadReport};
pub use optimize::{Optimized, OptimizerConfig, Plugin};
pub use preview::Theme;
pub use profile::{Configurable, LibraryProfile};
