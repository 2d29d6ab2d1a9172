//! Company attribution for customs shipments.
//!
//! Free-text shipper names are mapped to a small set of parent companies.
//! The parent → alias directory comes from a land-ownership dataset: the
//! largest owners and their largest operating companies, translated into the
//! shippers' language through an injected [`Translator`].

pub mod directory;
pub mod error;
pub mod land;
pub mod resolver;
pub mod translate;

pub use directory::{AliasOverlap, DirectoryBuilder, SubsidiaryDirectory};
pub use error::{CompanyError, Result, TranslationError};
pub use land::{
    LandDeal, filter_target_country, land_deals_from_frame, rank_parents, rank_subsidiaries,
};
pub use resolver::CompanyNameResolver;
pub use translate::{GlossaryTranslator, TranslationTable, Translator, translate_column};
