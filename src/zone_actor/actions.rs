#[derive(Debug, Clone)]
pub enum ZoneAction {
    ToggleActive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ZoneActionResult {
    /// The active flag after the toggle.
    Toggled(bool),
}
