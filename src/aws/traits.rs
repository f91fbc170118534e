//! Common traits for ECS resources

/// Common trait for listable ECS resources (clusters, container instances)
///
/// This trait provides a unified interface for resource identification
/// and matching, which is useful for lookups by name or ARN.
pub trait EcsResource {
    /// Get the resource ARN or ID
    fn id(&self) -> &str;

    /// Get the human-readable name
    fn name(&self) -> &str;

    /// Check if the resource matches by name or ID
    ///
    /// Default implementation checks for exact match on either field.
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input
    }
}

/// Trait for API responses that carry a continuation token
///
/// Implement this trait for any `ListXResponse` struct to enable use with
/// `EcsClient::fetch_all_pages()` helper. A `None` token marks the final
/// page.
pub trait PaginatedResponse<T> {
    /// Consume self and return the page's items
    fn into_items(self) -> Vec<T>;
    /// Token for the next page, if any
    fn next_token(&self) -> Option<&str>;
}
