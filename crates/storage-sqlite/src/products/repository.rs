use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::ProductDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::inventory::record_movement;
use crate::schema::{products, transaction_items};
use crate::utils::{chunk_for_sqlite, like_pattern, now_naive};
use retailpos_core::inventory::{MovementType, NewInventoryMovement};
use retailpos_core::products::{
    NewProduct, Product, ProductRepositoryTrait, ProductSearch, StockStatus,
};
use retailpos_core::utils::pagination::{normalize_page, page_offset, Paginated};
use retailpos_core::Result;

pub struct ProductRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProductRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

pub(crate) fn load_product(conn: &mut SqliteConnection, product_id: &str) -> Result<ProductDB> {
    products::table
        .find(product_id)
        .select(ProductDB::as_select())
        .first(conn)
        .or_not_found("Product", product_id)
}

pub(crate) fn load_products_by_ids(
    conn: &mut SqliteConnection,
    product_ids: &[String],
) -> Result<Vec<ProductDB>> {
    let mut rows = Vec::with_capacity(product_ids.len());
    for chunk in chunk_for_sqlite(product_ids) {
        rows.extend(
            products::table
                .filter(products::id.eq_any(chunk))
                .select(ProductDB::as_select())
                .load(conn)
                .into_core()?,
        );
    }
    Ok(rows)
}

pub(crate) fn set_stock(conn: &mut SqliteConnection, product_id: &str, stock: i64) -> Result<()> {
    diesel::update(products::table.find(product_id))
        .set((
            products::stock.eq(stock),
            products::updated_at.eq(now_naive()),
        ))
        .execute(conn)
        .into_core()?;
    Ok(())
}

fn filtered(search: &ProductSearch) -> products::BoxedQuery<'static, Sqlite> {
    let mut query = products::table.into_boxed();
    if !search.include_inactive {
        query = query.filter(products::is_active.eq(true));
    }
    if let Some(keyword) = &search.keyword {
        let pattern = like_pattern(keyword);
        query = query.filter(
            products::name
                .like(pattern.clone())
                .escape('\\')
                .or(products::sku.like(pattern).escape('\\')),
        );
    }
    if let Some(category_id) = &search.category_id {
        query = query.filter(products::category_id.eq(category_id.clone()));
    }
    match search.stock_status {
        Some(StockStatus::OutOfStock) => {
            query = query.filter(products::stock.le(0));
        }
        Some(StockStatus::LowStock) => {
            query = query
                .filter(products::stock.gt(0))
                .filter(products::stock.le(products::low_stock_threshold));
        }
        Some(StockStatus::ReorderSuggested) => {
            query = query
                .filter(products::stock.gt(0))
                .filter(products::stock.gt(products::low_stock_threshold))
                .filter(products::stock.le(products::reorder_point));
        }
        Some(StockStatus::InStock) => {
            query = query.filter(products::stock.gt(products::reorder_point));
        }
        None => {}
    }
    query
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn get_by_id(&self, product_id: &str) -> Result<Product> {
        let mut conn = get_connection(&self.pool)?;
        load_product(&mut conn, product_id).map(Product::from)
    }

    fn get_by_ids(&self, product_ids: &[String]) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(load_products_by_ids(&mut conn, product_ids)?
            .into_iter()
            .map(Product::from)
            .collect())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let row = products::table
            .filter(products::sku.eq(sku))
            .select(ProductDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Product::from))
    }

    fn search(&self, search: &ProductSearch) -> Result<Paginated<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size) = normalize_page(search.page, search.page_size);

        let total: i64 = filtered(search).count().get_result(&mut conn).into_core()?;
        let rows = filtered(search)
            .select(ProductDB::as_select())
            .order(products::name.asc())
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .load(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            rows.into_iter().map(Product::from).collect(),
            page,
            page_size,
            total,
        ))
    }

    fn list_low_stock(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = products::table
            .filter(products::is_active.eq(true))
            .filter(products::stock.le(products::low_stock_threshold))
            .select(ProductDB::as_select())
            .order((products::stock.asc(), products::name.asc()))
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn list_reorder(&self) -> Result<Vec<Product>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = products::table
            .filter(products::is_active.eq(true))
            .filter(products::stock.le(products::reorder_point))
            .select(ProductDB::as_select())
            .order((products::stock.asc(), products::name.asc()))
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    fn has_sales(&self, product_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = transaction_items::table
            .filter(transaction_items::product_id.eq(product_id))
            .count()
            .get_result(&mut conn)
            .into_core()?;
        Ok(count > 0)
    }

    async fn create(&self, new_product: NewProduct, user_id: Option<String>) -> Result<Product> {
        self.writer
            .exec(move |conn| -> Result<Product> {
                let now = now_naive();
                let low_stock_threshold = new_product.low_stock_threshold.unwrap_or_default();
                let row = ProductDB {
                    id: Uuid::new_v4().to_string(),
                    sku: new_product.sku,
                    name: new_product.name,
                    description: new_product.description,
                    category_id: new_product.category_id,
                    price: new_product.price.to_string(),
                    cost_price: new_product.cost_price.map(|c| c.to_string()),
                    stock: new_product.stock,
                    low_stock_threshold,
                    reorder_point: new_product.reorder_point.unwrap_or(low_stock_threshold),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(products::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;

                if row.stock > 0 {
                    record_movement(
                        conn,
                        NewInventoryMovement {
                            product_id: row.id.clone(),
                            movement_type: MovementType::Initial,
                            quantity_change: row.stock,
                            stock_before: 0,
                            stock_after: row.stock,
                            reference_id: None,
                            note: None,
                            user_id,
                        },
                    )?;
                }
                Ok(Product::from(row))
            })
            .await
    }

    async fn update(&self, product: Product) -> Result<Product> {
        self.writer
            .exec(move |conn| -> Result<Product> {
                let current = load_product(conn, &product.id)?;
                let mut row = ProductDB::from(product);
                // stock only moves through inventory writes
                row.stock = current.stock;
                row.created_at = current.created_at;
                diesel::update(products::table.find(&current.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(Product::from(row))
            })
            .await
    }

    async fn delete(&self, product_id: &str) -> Result<usize> {
        let product_id = product_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::delete(products::table.find(product_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::inventory::InventoryRepository;
    use retailpos_core::inventory::{InventoryRepositoryTrait, MovementQuery};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    async fn setup() -> (ProductRepository, InventoryRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (
            ProductRepository::new(Arc::clone(&pool), writer.clone()),
            InventoryRepository::new(pool, writer),
            temp_dir,
        )
    }

    fn new_product(sku: &str, stock: i64) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            description: None,
            category_id: None,
            price: dec!(3.75),
            cost_price: Some(dec!(2.10)),
            stock,
            low_stock_threshold: Some(5),
            reorder_point: Some(10),
        }
    }

    #[tokio::test]
    async fn test_create_records_initial_movement() {
        let (repo, inventory, _dir) = setup().await;
        let product = repo.create(new_product("A-1", 12), None).await.unwrap();

        assert_eq!(product.price, dec!(3.75));
        assert_eq!(repo.find_by_sku("A-1").unwrap().unwrap().id, product.id);

        let movements = inventory
            .list_movements(&MovementQuery {
                product_id: Some(product.id.clone()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(movements.data.len(), 1);
        assert_eq!(movements.data[0].movement_type, MovementType::Initial);
        assert_eq!(movements.data[0].stock_after, 12);

        let empty = repo.create(new_product("A-2", 0), None).await.unwrap();
        let none = inventory
            .list_movements(&MovementQuery {
                product_id: Some(empty.id),
                ..Default::default()
            })
            .unwrap();
        assert!(none.data.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected_by_database() {
        let (repo, _inventory, _dir) = setup().await;
        repo.create(new_product("DUP", 1), None).await.unwrap();
        let err = repo.create(new_product("DUP", 1), None).await.unwrap_err();
        assert!(matches!(
            err,
            retailpos_core::Error::Database(retailpos_core::errors::DatabaseError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_filters_by_keyword_and_stock_status() {
        let (repo, _inventory, _dir) = setup().await;
        repo.create(new_product("MILK-1", 3), None).await.unwrap();
        repo.create(new_product("MILK-2", 8), None).await.unwrap();
        repo.create(new_product("BREAD", 40), None).await.unwrap();
        repo.create(new_product("EGGS", 0), None).await.unwrap();

        let milk = repo
            .search(&ProductSearch {
                keyword: Some("milk".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(milk.meta.total_row_count, 2);

        let statuses = [
            (StockStatus::OutOfStock, "EGGS"),
            (StockStatus::LowStock, "MILK-1"),
            (StockStatus::ReorderSuggested, "MILK-2"),
            (StockStatus::InStock, "BREAD"),
        ];
        for (status, sku) in statuses {
            let page = repo
                .search(&ProductSearch {
                    stock_status: Some(status),
                    ..Default::default()
                })
                .unwrap();
            assert_eq!(page.data.len(), 1, "{:?}", status);
            assert_eq!(page.data[0].sku, sku);
        }

        let low: Vec<String> = repo.list_low_stock().unwrap().into_iter().map(|p| p.sku).collect();
        assert_eq!(low, vec!["EGGS", "MILK-1"]);
    }

    #[tokio::test]
    async fn test_update_never_touches_stock() {
        let (repo, _inventory, _dir) = setup().await;
        let mut product = repo.create(new_product("KEEP", 7), None).await.unwrap();
        product.stock = 999;
        product.name = "Renamed".to_string();
        product.cost_price = None;
        let updated = repo.update(product).await.unwrap();
        assert_eq!(updated.stock, 7);
        assert_eq!(updated.name, "Renamed");
        assert_eq!(repo.get_by_id(&updated.id).unwrap().cost_price, None);
    }
}
