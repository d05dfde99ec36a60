//! A single-file record store for real-estate listings.
//!
//! The [`Store`] keeps its records in memory and rewrites the backing JSON or
//! YAML file after every create, update, or delete. Reads and searches never
//! touch the disk.
//!
//! ```no_run
//! use listingdb::{NewRecord, PropertyType, RecordPatch, SearchCriteria, Store, StoreConfig};
//!
//! let mut store = Store::open(StoreConfig::new("listings.json"))?;
//! let mut listing = NewRecord::new("Modern Apartment", PropertyType::Apartment);
//! listing.price = 2_500_000;
//! let created = store.create(listing)?;
//!
//! store.update(created.key.as_str(), &RecordPatch::new().price(2_400_000))?;
//! let apartments = store.search(&SearchCriteria::new().property_type(PropertyType::Apartment));
//! assert_eq!(apartments.len(), 1);
//! # Ok::<(), listingdb::ListingDbError>(())
//! ```

pub mod config;
pub mod error;
pub mod file;
pub mod patch;
pub mod query;
pub mod record;
pub mod store;

pub use config::{FileFormat, KeyStrategy, StoreConfig};
pub use error::{ListingDbError, Result};
pub use patch::RecordPatch;
pub use query::{AddressCriteria, SearchCriteria};
pub use record::{Address, NewRecord, PropertyType, Record, RecordKey, TextLabel};
pub use store::{LoadOutcome, Store};
