//! The route handler for classifying a single description.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState,
    categorizer::{Categorizer, ClassificationResult},
};

/// The state needed to categorize descriptions.
#[derive(Debug, Clone)]
pub struct CategorizerState {
    /// The shared categorizer.
    pub categorizer: Arc<Categorizer>,
}

impl FromRef<AppState> for CategorizerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            categorizer: state.categorizer.clone(),
        }
    }
}

/// The request body for [categorize_endpoint].
#[derive(Debug, Serialize, Deserialize)]
pub struct CategorizeRequest {
    /// The transaction description to categorize.
    pub text: String,
}

/// Categorize `{"text": "..."}` without storing anything.
pub async fn categorize_endpoint(
    State(state): State<CategorizerState>,
    Json(request): Json<CategorizeRequest>,
) -> Json<ClassificationResult> {
    Json(state.categorizer.categorize(&request.text))
}
