use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use retailpos_core::constants::TAX_RATE;
use retailpos_core::errors::Error;
use retailpos_core::inventory::{detect_stock_alerts, MovementType, StockAdjustment};
use retailpos_core::products::Product;
use retailpos_core::transactions::{calculate_totals, merge_lines, price_sale, NewTransactionItem};

fn product(id: usize, price_cents: i64, stock: i64) -> Product {
    Product {
        id: format!("p{}", id),
        sku: format!("SKU-{}", id),
        name: format!("Product {}", id),
        description: None,
        category_id: None,
        price: Decimal::new(price_cents, 2),
        cost_price: None,
        stock,
        low_stock_threshold: 3,
        reorder_point: 8,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn catalogue() -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec((1i64..5_000, 0i64..30), 1..6).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (price, stock))| product(i, price, stock))
            .collect()
    })
}

proptest! {
    #[test]
    fn priced_sale_never_drives_stock_negative(
        products in catalogue(),
        lines in prop::collection::vec((0usize..6, 1i64..20), 1..10),
    ) {
        let by_id: HashMap<String, Product> =
            products.iter().map(|p| (p.id.clone(), p.clone())).collect();
        let items = merge_lines(
            lines
                .into_iter()
                .map(|(idx, quantity)| NewTransactionItem {
                    product_id: format!("p{}", idx % products.len()),
                    quantity,
                })
                .collect(),
        )
        .unwrap();

        match price_sale(&items, &by_id, Decimal::new(1_000_000_000, 2), TAX_RATE) {
            Ok(sale) => {
                for change in &sale.stock_changes {
                    prop_assert!(change.stock_after >= 0);
                    prop_assert!(change.stock_after < change.stock_before);
                }
                prop_assert_eq!(sale.totals.total, sale.totals.subtotal + sale.totals.tax);
                prop_assert!(sale.change_amount >= Decimal::ZERO);
            }
            Err(Error::InsufficientStock { requested, available, .. }) => {
                prop_assert!(requested > available);
                let oversold = items
                    .iter()
                    .any(|i| by_id[&i.product_id].stock < i.quantity);
                prop_assert!(oversold);
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn merged_lines_keep_total_quantity(
        lines in prop::collection::vec((0usize..4, 1i64..50), 1..20),
    ) {
        let items: Vec<NewTransactionItem> = lines
            .iter()
            .map(|(idx, quantity)| NewTransactionItem {
                product_id: format!("p{}", idx),
                quantity: *quantity,
            })
            .collect();
        let before: i64 = items.iter().map(|i| i.quantity).sum();
        let merged = merge_lines(items).unwrap();
        let after: i64 = merged.iter().map(|i| i.quantity).sum();
        prop_assert_eq!(before, after);

        let mut ids: Vec<&String> = merged.iter().map(|i| &i.product_id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), merged.len());
    }

    #[test]
    fn tax_is_ten_percent_within_half_a_cent(cents in prop::collection::vec(0i64..1_000_000, 1..8)) {
        let totals = calculate_totals(cents.iter().map(|c| Decimal::new(*c, 2)), TAX_RATE).unwrap();
        let exact = totals.subtotal * TAX_RATE;
        prop_assert!((totals.tax - exact).abs() <= Decimal::new(5, 3));
        prop_assert!(totals.tax.scale() <= 2);
    }

    #[test]
    fn adjustments_either_apply_or_leave_stock_non_negative(stock in 0i64..100, delta in -150i64..150) {
        prop_assume!(delta != 0);
        let product = product(0, 100, stock);
        let adjustment = StockAdjustment {
            product_id: product.id.clone(),
            movement_type: MovementType::Adjustment,
            quantity_change: delta,
            note: None,
        };
        match adjustment.resulting_stock(&product) {
            Ok(after) => {
                prop_assert!(after >= 0);
                prop_assert_eq!(after, stock + delta);
            }
            Err(_) => prop_assert!(stock + delta < 0),
        }
    }

    #[test]
    fn stock_increases_never_raise_alerts(products in catalogue(), restock in 1i64..50) {
        let changes: Vec<_> = products
            .iter()
            .map(|p| retailpos_core::inventory::StockChange::new(p, p.stock + restock))
            .collect();
        prop_assert!(detect_stock_alerts(&changes).is_empty());
    }
}
