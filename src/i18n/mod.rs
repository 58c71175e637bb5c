// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation for mapguide.
//!
//! ## Supported languages
//!
//! | Code | Language   | Native name |
//! |------|------------|-------------|
//! | es   | Spanish    | Español     |
//! | en   | English    | English     |
//! | pt   | Portuguese | Português   |
//!
//! ## Design
//!
//! Two kinds of text are localized:
//!
//! - **Interface strings** live in per-language JSON tables and are looked up
//!   with dotted keys (`"nav.home"`). A key missing from the active table is
//!   looked up in the Spanish table; a key missing from both comes back
//!   unchanged, so gaps show up on the page instead of failing the build.
//! - **Dataset fields** (place titles, descriptions) are either plain strings
//!   or per-language maps, resolved by [`resolve_field`] with the same Spanish
//!   fallback and an empty string as the last resort.
//!
//! The active language is held by an explicit [`LanguageContext`].

mod catalog;
mod context;
mod field;

pub use catalog::{Catalog, Lang};
pub use context::{LanguageContext, Subscription, Translator};
pub use field::resolve_field;
