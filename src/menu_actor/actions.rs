/// Custom actions for Product rows.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Show or hide the product on the storefront.
    SetAvailability(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    /// Result from SetAvailability - whether the flag actually flipped
    AvailabilitySet(bool),
}
