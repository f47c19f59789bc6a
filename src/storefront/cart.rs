use serde::{Deserialize, Serialize};

use super::checkout::CheckoutError;
use crate::domain::{round_cents, LineItem, Product};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub customizations: Vec<String>,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Session cart. Lines with the same product and customizations are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: &Product, quantity: u32, customizations: Vec<String>) -> Result<(), CheckoutError> {
        if quantity == 0 {
            return Err(CheckoutError::InvalidQuantity(quantity));
        }
        if !product.available {
            return Err(CheckoutError::ProductUnavailable(product.name.clone()));
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.id && item.customizations == customizations)
        {
            Some(item) => {
                item.quantity = item
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CheckoutError::InvalidQuantity(quantity))?;
            }
            None => self.items.push(CartItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: product.price,
                quantity,
                customizations,
            }),
        }
        Ok(())
    }

    /// Setting a line to zero removes it.
    pub fn set_quantity(&mut self, line: usize, quantity: u32) -> Result<(), CheckoutError> {
        if line >= self.items.len() {
            return Err(CheckoutError::UnknownLine(line));
        }
        if quantity == 0 {
            self.items.remove(line);
        } else {
            self.items[line].quantity = quantity;
        }
        Ok(())
    }

    pub fn remove(&mut self, line: usize) -> Option<CartItem> {
        (line < self.items.len()).then(|| self.items.remove(line))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        round_cents(self.items.iter().map(CartItem::line_total).sum())
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.items
            .iter()
            .map(|item| LineItem {
                id: item.product_id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
                customizations: item.customizations.clone(),
            })
            .collect()
    }
}
