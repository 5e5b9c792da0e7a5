//! Multi-step "publish a listing" wizard for landlords.
//!
//! Each step owns part of a [`ListingForm`]. `next` only advances when the
//! current step is complete, `back` always works and keeps what was typed,
//! and `submit` from the review step yields a checked [`ListingDraft`].

use crate::models::{Coordinates, Operation, PropertyType};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum WizardStep {
    Basics,
    Location,
    Details,
    Amenities,
    Photos,
    Review,
}

impl WizardStep {
    fn next(self) -> Option<Self> {
        match self {
            WizardStep::Basics => Some(WizardStep::Location),
            WizardStep::Location => Some(WizardStep::Details),
            WizardStep::Details => Some(WizardStep::Amenities),
            WizardStep::Amenities => Some(WizardStep::Photos),
            WizardStep::Photos => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            WizardStep::Basics => None,
            WizardStep::Location => Some(WizardStep::Basics),
            WizardStep::Details => Some(WizardStep::Location),
            WizardStep::Amenities => Some(WizardStep::Details),
            WizardStep::Photos => Some(WizardStep::Amenities),
            WizardStep::Review => Some(WizardStep::Photos),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("step {step:?} is missing: {}", .missing.join(", "))]
    Incomplete {
        step: WizardStep,
        missing: Vec<&'static str>,
    },

    #[error("listing can only be submitted from the review step")]
    NotOnReview,

    #[error("wizard was already submitted")]
    AlreadySubmitted,
}

/// Everything typed into the wizard so far
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingForm {
    pub title: String,
    pub description: String,
    pub operation: Option<Operation>,
    pub property_type: Option<PropertyType>,
    pub address: String,
    pub district: String,
    pub coordinates: Option<Coordinates>,
    pub price: Option<f64>,
    pub currency: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub area: Option<f64>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

/// Validated listing ready to be sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub operation: Operation,
    pub property_type: PropertyType,
    pub address: String,
    pub district: String,
    pub coordinates: Option<Coordinates>,
    pub price: f64,
    pub currency: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: Option<f64>,
    pub amenities: Vec<String>,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Editing(WizardStep),
    Submitted,
}

#[derive(Debug, Clone)]
pub struct ListingWizard {
    state: WizardState,
    pub form: ListingForm,
}

impl Default for ListingWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Editing(WizardStep::Basics),
            form: ListingForm {
                currency: "PEN".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Option<WizardStep> {
        match self.state {
            WizardState::Editing(step) => Some(step),
            WizardState::Submitted => None,
        }
    }

    /// Fields still required before leaving `step`
    pub fn missing(&self, step: WizardStep) -> Vec<&'static str> {
        let form = &self.form;
        let mut missing = Vec::new();

        match step {
            WizardStep::Basics => {
                if form.title.trim().is_empty() {
                    missing.push("title");
                }
                if form.operation.is_none() {
                    missing.push("operation");
                }
                if form.property_type.is_none() {
                    missing.push("property_type");
                }
            }
            WizardStep::Location => {
                if form.address.trim().is_empty() {
                    missing.push("address");
                }
                if form.district.trim().is_empty() {
                    missing.push("district");
                }
            }
            WizardStep::Details => {
                if !form.price.is_some_and(|p| p > 0.0) {
                    missing.push("price");
                }
                if form.currency.trim().is_empty() {
                    missing.push("currency");
                }
                if form.bedrooms.is_none() {
                    missing.push("bedrooms");
                }
                if form.bathrooms.is_none() {
                    missing.push("bathrooms");
                }
            }
            WizardStep::Amenities => {}
            WizardStep::Photos => {
                if form.images.is_empty() {
                    missing.push("images");
                }
            }
            WizardStep::Review => {
                for earlier in [
                    WizardStep::Basics,
                    WizardStep::Location,
                    WizardStep::Details,
                    WizardStep::Photos,
                ] {
                    missing.extend(self.missing(earlier));
                }
            }
        }

        missing
    }

    fn editing(&self) -> Result<WizardStep, WizardError> {
        self.step().ok_or(WizardError::AlreadySubmitted)
    }

    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing()?;
        let missing = self.missing(step);
        if !missing.is_empty() {
            return Err(WizardError::Incomplete { step, missing });
        }

        let next = step.next().unwrap_or(step);
        self.state = WizardState::Editing(next);
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing()?;
        let previous = step.previous().unwrap_or(step);
        self.state = WizardState::Editing(previous);
        Ok(previous)
    }

    /// Jump back to an earlier step from review, e.g. to fix the price
    pub fn edit(&mut self, target: WizardStep) -> Result<WizardStep, WizardError> {
        let step = self.editing()?;
        if target <= step {
            self.state = WizardState::Editing(target);
        }
        self.editing()
    }

    pub fn submit(&mut self) -> Result<ListingDraft, WizardError> {
        if self.editing()? != WizardStep::Review {
            return Err(WizardError::NotOnReview);
        }

        let form = &self.form;
        let (Some(operation), Some(property_type), Some(price), Some(bedrooms), Some(bathrooms)) = (
            form.operation,
            form.property_type,
            form.price,
            form.bedrooms,
            form.bathrooms,
        ) else {
            return Err(WizardError::Incomplete {
                step: WizardStep::Review,
                missing: self.missing(WizardStep::Review),
            });
        };

        let missing = self.missing(WizardStep::Review);
        if !missing.is_empty() {
            return Err(WizardError::Incomplete {
                step: WizardStep::Review,
                missing,
            });
        }

        let draft = ListingDraft {
            title: form.title.trim().to_string(),
            description: form.description.trim().to_string(),
            operation,
            property_type,
            address: form.address.trim().to_string(),
            district: form.district.trim().to_string(),
            coordinates: form.coordinates,
            price,
            currency: form.currency.clone(),
            bedrooms,
            bathrooms,
            area: form.area,
            amenities: form.amenities.clone(),
            images: form.images.clone(),
        };

        self.state = WizardState::Submitted;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ListingWizard {
        let mut wizard = ListingWizard::new();
        wizard.form.title = "Depa con vista al parque".to_string();
        wizard.form.operation = Some(Operation::Rent);
        wizard.form.property_type = Some(PropertyType::Apartment);
        wizard.form.address = "Av. Larco 123".to_string();
        wizard.form.district = "Miraflores".to_string();
        wizard.form.price = Some(2800.0);
        wizard.form.bedrooms = Some(2);
        wizard.form.bathrooms = Some(1);
        wizard.form.images = vec!["https://cdn.example.com/1.jpg".to_string()];
        wizard
    }

    #[test]
    fn test_next_blocks_on_missing_fields() {
        let mut wizard = ListingWizard::new();
        wizard.form.title = "Casa".to_string();

        let err = wizard.next().unwrap_err();
        assert_eq!(
            err,
            WizardError::Incomplete {
                step: WizardStep::Basics,
                missing: vec!["operation", "property_type"],
            }
        );
        assert_eq!(wizard.step(), Some(WizardStep::Basics));
    }

    #[test]
    fn test_walk_through_and_submit() {
        let mut wizard = filled();
        for expected in [
            WizardStep::Location,
            WizardStep::Details,
            WizardStep::Amenities,
            WizardStep::Photos,
            WizardStep::Review,
        ] {
            assert_eq!(wizard.next().unwrap(), expected);
        }

        let draft = wizard.submit().unwrap();
        assert_eq!(draft.price, 2800.0);
        assert_eq!(draft.currency, "PEN");
        assert_eq!(wizard.state(), &WizardState::Submitted);
        assert_eq!(wizard.next(), Err(WizardError::AlreadySubmitted));
    }

    #[test]
    fn test_back_keeps_data_and_stops_at_first_step() {
        let mut wizard = filled();
        wizard.next().unwrap();
        wizard.form.address = "Jr. Ucayali 40".to_string();

        assert_eq!(wizard.back().unwrap(), WizardStep::Basics);
        assert_eq!(wizard.back().unwrap(), WizardStep::Basics);
        assert_eq!(wizard.form.address, "Jr. Ucayali 40");
    }

    #[test]
    fn test_submit_only_from_review() {
        let mut wizard = filled();
        assert_eq!(wizard.submit(), Err(WizardError::NotOnReview));
    }

    #[test]
    fn test_edit_from_review_then_resubmit_checks_again() {
        let mut wizard = filled();
        while wizard.step() != Some(WizardStep::Review) {
            wizard.next().unwrap();
        }

        assert_eq!(wizard.edit(WizardStep::Details).unwrap(), WizardStep::Details);
        wizard.form.price = Some(0.0);
        assert!(matches!(
            wizard.next(),
            Err(WizardError::Incomplete { step: WizardStep::Details, .. })
        ));

        // cannot skip ahead
        assert_eq!(wizard.edit(WizardStep::Review).unwrap(), WizardStep::Details);
    }
}
