use axum::http::StatusCode;
use tracing::warn;

use crate::ingredients::model::PantryError;
use crate::navigation::controller::NavigationError;
use crate::recipes::model::ReviewError;
use crate::scanner::mime::ScanError;

#[derive(Debug, thiserror::Error)]
pub enum KitchenError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Pantry(#[from] PantryError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("recipe {0} is not in the current batch")]
    RecipeNotFound(String),
    #[error("pantry item {0} not found")]
    PantryItemNotFound(String),
    #[error("could not persist pantry: {0:#}")]
    Persistence(anyhow::Error),
}

impl KitchenError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Navigation(NavigationError::StepOutOfRange { .. }) => StatusCode::BAD_REQUEST,
            Self::Navigation(_) => StatusCode::CONFLICT,
            Self::Scan(ScanError::UnsupportedType(_)) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Review(_) | Self::Pantry(_) | Self::Scan(_) => StatusCode::BAD_REQUEST,
            Self::RecipeNotFound(_) | Self::PantryItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn rejection(e: KitchenError) -> (StatusCode, String) {
    let status = e.status();
    warn!(error = %e, %status, "request rejected");
    (status, e.to_string())
}

pub fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[cfg(test)]
mod error_tests {
    use super::*;
    use crate::navigation::controller::View;

    #[test]
    fn maps_errors_to_status_codes() {
        let wrong_view = KitchenError::from(NavigationError::WrongView {
            expected: View::Cooking,
            actual: View::Scanner,
        });
        assert_eq!(wrong_view.status(), StatusCode::CONFLICT);
        assert_eq!(
            KitchenError::from(NavigationError::StepOutOfRange { step: 4, steps: 2 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            KitchenError::from(ReviewError::RatingOutOfRange(0)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            KitchenError::RecipeNotFound("r1".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn rejection_carries_message() {
        let (status, body) = rejection(PantryError::EmptyName.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "ingredient name must not be empty");
    }
}
