use crate::model::Id;
use thiserror::Error;

/// Classified failure of a catalog gateway call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Network is unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No data received")]
    EmptyResponseBody,

    #[error("Failed to decode response: {0}")]
    DecodeFailure(String),

    #[error("Request failed with status {status}: {body}")]
    HttpError { status: u16, body: String },
}

impl GatewayError {
    /// Message suitable for an alert shown to the user
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NetworkUnreachable(_) => {
                "No internet connection. Please check your network and try again.".to_string()
            }
            GatewayError::InvalidUrl(_) => "Invalid URL".to_string(),
            GatewayError::EmptyResponseBody => "No data received".to_string(),
            GatewayError::DecodeFailure(_) => {
                "The server sent an unexpected response. Please try again.".to_string()
            }
            GatewayError::HttpError { status, .. } => {
                format!("The server returned an error ({}). Please try again.", status)
            }
        }
    }
}

/// Failure of a form engine transition or submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Missing Selection")]
    MissingCategorySelection,

    /// Properties of the selected subcategory are pending or failed to load
    #[error("Properties Not Loaded")]
    PropertiesNotLoaded,
    #[error("No Properties")]
    NoPropertiesAvailable,

    #[error("No Properties Selected")]
    NoValuesSelected,

    #[error("Category {0} not found")]
    UnknownCategory(Id),

    #[error("Subcategory {0} is not a child of the selected category")]
    UnknownSubcategory(Id),

    #[error("Property {0} is not part of the form")]
    UnknownField(Id),

    #[error("Option {option_id} does not belong to property {property_id}")]
    UnknownOption { property_id: Id, option_id: Id },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl FormError {
    pub fn user_message(&self) -> String {
        match self {
            FormError::MissingCategorySelection => {
                "Please select a category and subcategory".to_string()
            }
            FormError::PropertiesNotLoaded => {
                "Properties for this subcategory have not loaded yet".to_string()
            }
            FormError::NoPropertiesAvailable => {
                "This subcategory has no properties available".to_string()
            }
            FormError::NoValuesSelected => "Please select at least one property value".to_string(),
            FormError::Gateway(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// True for the checks `submit` performs
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::MissingCategorySelection
                | FormError::PropertiesNotLoaded
                | FormError::NoPropertiesAvailable
                | FormError::NoValuesSelected
        )
    }
}
