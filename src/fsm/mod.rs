pub mod sheet;
pub mod wizard;

pub use sheet::{SheetEvent, SheetState, SnapPoint};
pub use wizard::{ListingDraft, ListingWizard, WizardError, WizardStep};
