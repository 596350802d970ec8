use serde::Deserialize;

/// Request body for trip creation. `title` is checked by the handler so a
/// missing field reports a validation error rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateTripRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Validated creation fields handed to the repository.
#[derive(Debug)]
pub struct CreateTripFields {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Partial update: any subset of fields; absent ones keep their value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTripFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}
