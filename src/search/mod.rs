pub mod rules;
pub mod translator;
pub mod types;
pub mod url_state;

pub use translator::translate;
pub use types::{PageRequest, PropertyQueryParameters, RentalMode, SearchFilters, SortOrder};
