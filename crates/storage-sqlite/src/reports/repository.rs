use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::{transaction_items, transactions};
use crate::utils::parse_decimal;
use retailpos_core::reports::{ReportRepositoryTrait, SalesTotals, TopProduct};
use retailpos_core::transactions::TransactionStatus;
use retailpos_core::Result;

/// Money columns are TEXT, so sums are computed here rather than in SQL.
pub struct ReportRepository {
    pool: Arc<DbPool>,
}

impl ReportRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

impl ReportRepositoryTrait for ReportRepository {
    fn sales_totals(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<SalesTotals> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String, String, String)> = transactions::table
            .filter(transactions::created_at.ge(from.naive_utc()))
            .filter(transactions::created_at.lt(to.naive_utc()))
            .select((
                transactions::status,
                transactions::subtotal,
                transactions::tax,
                transactions::total,
            ))
            .load(&mut conn)
            .into_core()?;

        let completed = TransactionStatus::Completed.as_str();
        let cancelled = TransactionStatus::Cancelled.as_str();
        let mut totals = SalesTotals::default();
        for (status, subtotal, tax, total) in rows {
            if status == completed {
                totals.completed_count += 1;
                totals.subtotal += parse_decimal(&subtotal, "transactions.subtotal");
                totals.tax += parse_decimal(&tax, "transactions.tax");
                totals.total += parse_decimal(&total, "transactions.total");
            } else if status == cancelled {
                totals.cancelled_count += 1;
            }
        }
        Ok(totals)
    }

    fn top_products(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TopProduct>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(String, String, String, i64, String)> = transaction_items::table
            .inner_join(transactions::table)
            .filter(transactions::status.eq(TransactionStatus::Completed.as_str()))
            .filter(transactions::created_at.ge(from.naive_utc()))
            .filter(transactions::created_at.lt(to.naive_utc()))
            .select((
                transaction_items::product_id,
                transaction_items::sku,
                transaction_items::product_name,
                transaction_items::quantity,
                transaction_items::subtotal,
            ))
            .load(&mut conn)
            .into_core()?;

        let mut by_product: HashMap<String, TopProduct> = HashMap::new();
        for (product_id, sku, product_name, quantity, subtotal) in rows {
            let entry = by_product
                .entry(product_id.clone())
                .or_insert_with(|| TopProduct {
                    product_id,
                    sku,
                    product_name,
                    quantity_sold: 0,
                    revenue: Decimal::ZERO,
                });
            entry.quantity_sold += quantity;
            entry.revenue += parse_decimal(&subtotal, "transaction_items.subtotal");
        }

        let mut ranked: Vec<TopProduct> = by_product.into_values().collect();
        ranked.sort_by(|a, b| {
            b.quantity_sold
                .cmp(&a.quantity_sold)
                .then_with(|| b.revenue.cmp(&a.revenue))
                .then_with(|| a.sku.cmp(&b.sku))
        });
        ranked.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use crate::products::ProductRepository;
    use crate::transactions::TransactionRepository;
    use crate::users::UserRepository;
    use chrono::Duration;
    use retailpos_core::products::{NewProduct, ProductRepositoryTrait};
    use retailpos_core::transactions::{
        NewTransaction, NewTransactionItem, PaymentMethod, TransactionRepositoryTrait,
    };
    use retailpos_core::users::{NewUser, Role, UserRepositoryTrait};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_totals_and_ranking_skip_cancelled_sales() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let users = UserRepository::new(Arc::clone(&pool), writer.clone());
        let products = ProductRepository::new(Arc::clone(&pool), writer.clone());
        let sales = TransactionRepository::new(Arc::clone(&pool), writer);
        let reports = ReportRepository::new(pool);

        let cashier = users
            .create(NewUser {
                name: "Robin".to_string(),
                email: "robin@shop.test".to_string(),
                role: Role::Cashier,
                password_hash: "hash".to_string(),
                is_active: true,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for (sku, price) in [("PEN", dec!(1.00)), ("PAD", dec!(3.00))] {
            let product = products
                .create(
                    NewProduct {
                        sku: sku.to_string(),
                        name: sku.to_string(),
                        description: None,
                        category_id: None,
                        price,
                        cost_price: None,
                        stock: 50,
                        low_stock_threshold: None,
                        reorder_point: None,
                    },
                    None,
                )
                .await
                .unwrap();
            ids.push(product.id);
        }

        let sale = |items: Vec<(String, i64)>| NewTransaction {
            customer_name: "Walk-in".to_string(),
            customer_email: None,
            customer_phone: None,
            payment_method: PaymentMethod::Card,
            payment_amount: dec!(100),
            notes: None,
            items: items
                .into_iter()
                .map(|(product_id, quantity)| NewTransactionItem {
                    product_id,
                    quantity,
                })
                .collect(),
            send_receipt: false,
        };

        sales
            .create_sale(sale(vec![(ids[0].clone(), 5)]), cashier.id.clone(), None)
            .await
            .unwrap();
        sales
            .create_sale(
                sale(vec![(ids[0].clone(), 1), (ids[1].clone(), 2)]),
                cashier.id.clone(),
                None,
            )
            .await
            .unwrap();
        let cancelled = sales
            .create_sale(sale(vec![(ids[1].clone(), 10)]), cashier.id.clone(), None)
            .await
            .unwrap();
        sales
            .cancel_sale(&cancelled.transaction.id, cashier.id.clone(), None)
            .await
            .unwrap();

        let from = Utc::now() - Duration::hours(1);
        let to = Utc::now() + Duration::hours(1);

        let totals = reports.sales_totals(from, to).unwrap();
        assert_eq!(totals.completed_count, 2);
        assert_eq!(totals.cancelled_count, 1);
        assert_eq!(totals.subtotal, dec!(12.00));
        assert_eq!(totals.tax, dec!(1.20));
        assert_eq!(totals.total, dec!(13.20));

        let top = reports.top_products(from, to, 10).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].sku, "PEN");
        assert_eq!(top[0].quantity_sold, 6);
        assert_eq!(top[1].revenue, dec!(6.00));

        assert_eq!(reports.top_products(from, to, 1).unwrap().len(), 1);
    }
}
