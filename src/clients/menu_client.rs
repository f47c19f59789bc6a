use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{Category, CategoryCreate, CategoryPatch, Product, ProductCreate, ProductPatch};
use crate::menu_actor::{MenuError, ProductAction, ProductActionResult};

/// Client for the categories and products tables.
#[derive(Clone)]
pub struct MenuClient {
    categories: ResourceClient<Category>,
    products: ResourceClient<Product>,
}

crate::impl_client_methods!(MenuClient, categories: Category, MenuError, category, categories);
crate::impl_client_methods!(MenuClient, products: Product, MenuError, product, products);
crate::impl_client_delete!(MenuClient, products: Product, MenuError, product);

impl MenuClient {
    pub fn new(categories: ResourceClient<Category>, products: ResourceClient<Product>) -> Self {
        Self { categories, products }
    }

    // --- Categories ---

    #[instrument(skip(self, params), fields(category_name = %params.name))]
    pub async fn create_category(&self, params: CategoryCreate) -> Result<Category, MenuError> {
        debug!("Sending request");
        Ok(self.categories.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_category(&self, id: String, patch: CategoryPatch) -> Result<Category, MenuError> {
        debug!("Sending request");
        Ok(self.categories.update(id, patch).await?)
    }

    /// Delete a category. Its products stay on the menu without a category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: String) -> Result<(), MenuError> {
        debug!("Sending request");
        if self.categories.get(id.clone()).await?.is_none() {
            return Err(MenuError::NotFound(id));
        }
        let target = id.clone();
        let members = self
            .products
            .list_where(move |product: &Product| product.category_id.as_deref() == Some(target.as_str()))
            .await?;

        for product in members {
            let patch = ProductPatch { category_id: Some(None), ..Default::default() };
            if let Err(e) = self.products.update(product.id.clone(), patch).await {
                // Last write wins; a product deleted meanwhile is not an error here.
                warn!(product_id = %product.id, error = %e, "Failed to detach product from category");
            }
        }

        self.categories.delete(id).await?;
        info!("Category deleted");
        Ok(())
    }

    /// Categories by sort order, then name.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, MenuError> {
        debug!("Sending request");
        let mut categories = self.categories.list().await?;
        categories.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    // --- Products ---

    #[instrument(skip(self, params), fields(product_name = %params.name))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<Product, MenuError> {
        debug!("Sending request");
        if let Some(category_id) = &params.category_id {
            if self.categories.get(category_id.clone()).await?.is_none() {
                return Err(MenuError::ValidationError(format!("Unknown category: {}", category_id)));
            }
        }
        let product = self.products.create(params).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, MenuError> {
        debug!("Sending request");
        Ok(self.products.update(id, patch).await?)
    }

    /// Returns whether the flag changed.
    #[instrument(skip(self))]
    pub async fn set_availability(&self, id: String, available: bool) -> Result<bool, MenuError> {
        debug!("Sending request");
        match self.products.perform_action(id, ProductAction::SetAvailability(available)).await? {
            ProductActionResult::AvailabilitySet(changed) => Ok(changed),
        }
    }

    #[instrument(skip(self))]
    pub async fn available_products(&self) -> Result<Vec<Product>, MenuError> {
        debug!("Sending request");
        Ok(self.products.list_where(|product: &Product| product.available).await?)
    }

    #[instrument(skip(self))]
    pub async fn products_in_category(&self, category_id: String) -> Result<Vec<Product>, MenuError> {
        debug!("Sending request");
        Ok(self
            .products
            .list_where(move |product: &Product| {
                product.available && product.category_id.as_deref() == Some(category_id.as_str())
            })
            .await?)
    }

    /// Case-insensitive search over available products. A blank term lists them all.
    #[instrument(skip(self))]
    pub async fn search_products(&self, term: String) -> Result<Vec<Product>, MenuError> {
        debug!("Sending request");
        let term = term.trim().to_lowercase();
        Ok(self
            .products
            .list_where(move |product: &Product| product.available && product.matches_term(&term))
            .await?)
    }
}
