#[derive(Debug, Clone)]
pub enum PromotionAction {
    SetActive(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromotionActionResult {
    ActiveSet(bool),
}
