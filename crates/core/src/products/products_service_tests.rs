use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

use super::*;
use crate::categories::{Category, CategoryRepositoryTrait, NewCategory};
use crate::errors::{Error, Result};
use crate::utils::pagination::Paginated;

#[derive(Clone, Default)]
struct MockProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
    sold_ids: Arc<Mutex<Vec<String>>>,
}

fn product(id: &str, sku: &str, stock: i64) -> Product {
    Product {
        id: id.to_string(),
        sku: sku.to_string(),
        name: format!("Product {}", sku),
        description: None,
        category_id: None,
        price: dec!(10.00),
        cost_price: None,
        stock,
        low_stock_threshold: 5,
        reorder_point: 10,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl ProductRepositoryTrait for MockProductRepository {
    fn get_by_id(&self, product_id: &str) -> Result<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Product", product_id))
    }

    fn get_by_ids(&self, product_ids: &[String]) -> Result<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| product_ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.sku == sku)
            .cloned())
    }

    fn search(&self, search: &ProductSearch) -> Result<Paginated<Product>> {
        let data: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| search.include_inactive || p.is_active)
            .cloned()
            .collect();
        let total = data.len() as i64;
        Ok(Paginated::new(
            data,
            search.page.unwrap_or(1),
            search.page_size.unwrap_or(25),
            total,
        ))
    }

    fn list_low_stock(&self) -> Result<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active && p.is_low_stock())
            .cloned()
            .collect())
    }

    fn list_reorder(&self) -> Result<Vec<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active && p.needs_reorder())
            .cloned()
            .collect())
    }

    fn has_sales(&self, product_id: &str) -> Result<bool> {
        Ok(self
            .sold_ids
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == product_id))
    }

    async fn create(&self, new_product: NewProduct, _user_id: Option<String>) -> Result<Product> {
        let mut created = product(
            &format!("p{}", self.products.lock().unwrap().len() + 1),
            &new_product.sku,
            new_product.stock,
        );
        created.name = new_product.name;
        created.price = new_product.price;
        created.category_id = new_product.category_id;
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update(&self, product: Product) -> Result<Product> {
        let mut products = self.products.lock().unwrap();
        let existing = products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| Error::not_found("Product", product.id.clone()))?;
        *existing = product.clone();
        Ok(product)
    }

    async fn delete(&self, product_id: &str) -> Result<usize> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != product_id);
        Ok(before - products.len())
    }
}

#[derive(Default)]
struct MockCategoryRepository {
    categories: Vec<Category>,
}

#[async_trait]
impl CategoryRepositoryTrait for MockCategoryRepository {
    fn list(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        self.categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Category", category_id))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn create(&self, _new_category: NewCategory) -> Result<Category> {
        unimplemented!()
    }

    async fn update(&self, _category_id: &str, _update: NewCategory) -> Result<Category> {
        unimplemented!()
    }

    async fn delete(&self, _category_id: &str) -> Result<usize> {
        unimplemented!()
    }
}

fn service(repo: MockProductRepository) -> ProductService {
    let categories = MockCategoryRepository {
        categories: vec![Category {
            id: "drinks".to_string(),
            name: "Drinks".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }],
    };
    ProductService::new(Arc::new(repo), Arc::new(categories))
}

fn new_product(sku: &str) -> NewProduct {
    NewProduct {
        sku: sku.to_string(),
        name: "Cold Brew".to_string(),
        description: None,
        category_id: Some("drinks".to_string()),
        price: dec!(4.50),
        cost_price: None,
        stock: 12,
        low_stock_threshold: None,
        reorder_point: None,
    }
}

#[tokio::test]
async fn test_create_product_normalizes_sku() {
    let service = service(MockProductRepository::default());
    let created = service
        .create_product(new_product("cb-01"), None)
        .await
        .unwrap();
    assert_eq!(created.sku, "CB-01");
    assert_eq!(service.get_product_by_sku("cb-01").unwrap().id, created.id);
}

#[tokio::test]
async fn test_create_product_rejects_duplicate_sku() {
    let repo = MockProductRepository::default();
    repo.products
        .lock()
        .unwrap()
        .push(product("p1", "CB-01", 3));
    let service = service(repo);

    let err = service
        .create_product(new_product("Cb-01"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_create_product_requires_existing_category() {
    let service = service(MockProductRepository::default());
    let mut input = new_product("CB-02");
    input.category_id = Some("snacks".to_string());

    let err = service.create_product(input, None).await.unwrap_err();
    assert!(matches!(err, Error::NotFound { entity: "Category", .. }));
}

#[tokio::test]
async fn test_update_product_keeps_own_sku_and_validates_thresholds() {
    let repo = MockProductRepository::default();
    repo.products
        .lock()
        .unwrap()
        .push(product("p1", "CB-01", 30));
    let service = service(repo);

    let updated = service
        .update_product(
            "p1",
            ProductUpdate {
                sku: Some("cb-01".to_string()),
                price: Some(dec!(5.25)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, dec!(5.25));

    let err = service
        .update_product(
            "p1",
            ProductUpdate {
                low_stock_threshold: Some(20),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_delete_product_with_sales_deactivates() {
    let repo = MockProductRepository::default();
    repo.products
        .lock()
        .unwrap()
        .extend([product("p1", "A", 3), product("p2", "B", 3)]);
    repo.sold_ids.lock().unwrap().push("p1".to_string());
    let service = service(repo.clone());

    let deactivated = service.delete_product("p1").await.unwrap();
    assert_eq!(deactivated.map(|p| p.is_active), Some(false));
    assert!(repo.get_by_id("p1").is_ok());

    assert!(service.delete_product("p2").await.unwrap().is_none());
    assert!(repo.get_by_id("p2").is_err());
}

#[test]
fn test_low_stock_listing() {
    let repo = MockProductRepository::default();
    repo.products
        .lock()
        .unwrap()
        .extend([product("p1", "A", 2), product("p2", "B", 8), product("p3", "C", 40)]);
    let service = service(repo);

    let low: Vec<String> = service
        .get_low_stock_products()
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(low, vec!["p1"]);
    assert_eq!(service.get_reorder_products().unwrap().len(), 2);
}
