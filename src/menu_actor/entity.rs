use chrono::Utc;

use super::actions::{ProductAction, ProductActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Category, CategoryCreate, CategoryPatch, Product, ProductCreate, ProductPatch};

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        Err("Name is required".to_string())
    } else {
        Ok(())
    }
}

fn validate_price(price: f64) -> Result<(), String> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(format!("Invalid price: {}", price))
    }
}

impl Entity for Category {
    type Id = String;
    type CreateParams = CategoryCreate;
    type Patch = CategoryPatch;
    type Action = ();
    type ActionResult = ();

    const TABLE: &'static str = "categories";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: CategoryCreate) -> Result<Self, String> {
        validate_name(&params.name)?;
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            sort_order: params.sort_order,
        })
    }

    fn on_update(&mut self, patch: CategoryPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name.trim().to_string();
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for Product {
    type Id = String;
    type CreateParams = ProductCreate;
    type Patch = ProductPatch;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    const TABLE: &'static str = "products";

    fn id(&self) -> &String { &self.id }

    /// Creates a new Product from creation parameters.
    ///
    /// # Errors
    /// Empty names and negative or non-finite prices are refused.
    fn from_create_params(id: String, params: ProductCreate) -> Result<Self, String> {
        validate_name(&params.name)?;
        validate_price(params.price)?;
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            description: params.description,
            price: params.price,
            category_id: params.category_id,
            image_url: params.image_url,
            available: params.available,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::SetAvailability(available) => {
                let changed = self.available != available;
                self.available = available;
                Ok(ProductActionResult::AvailabilitySet(changed))
            }
        }
    }
}
