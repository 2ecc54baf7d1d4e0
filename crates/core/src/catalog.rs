use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::order::{Order, OrderId, OrderStatus};
use crate::domain::product::{Product, ProductId, SpecValue};

/// An order joined with its referenced product. The product is `None` when
/// the order points at an identifier no product carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedOrder {
    pub order: Order,
    pub product: Option<Product>,
}

/// Read-only product and order data, loaded once at startup and shared
/// across turns without locking.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, orders: Vec<Order>) -> Self {
        Self { products, orders }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn find_product(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// Case-insensitive substring match of the phrase against each product's
    /// name or brand. Collects every match in catalog order; an empty result
    /// means the lookup ran and found nothing.
    pub fn match_products(&self, phrase: &str) -> Vec<Product> {
        let needle = phrase.to_lowercase();
        self.products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&needle)
                    || product.brand.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Exact, case-sensitive scan over orders; the first match wins and the
    /// scan stops. Uniqueness of identifiers is not assumed. The referenced
    /// product is attached when it exists.
    pub fn resolve_order(&self, order_number: &str) -> Option<ResolvedOrder> {
        self.orders.iter().find(|order| order.id.0 == order_number).map(|order| ResolvedOrder {
            order: order.clone(),
            product: self.find_product(&order.product_id).cloned(),
        })
    }

    /// The fixed retail dataset the assistant answers from.
    pub fn seed() -> Self {
        Self::new(seed_products(), seed_orders())
    }
}

fn spec_text(value: &str) -> SpecValue {
    SpecValue::Text(value.to_string())
}

fn spec_list(values: &[&str]) -> SpecValue {
    SpecValue::List(values.iter().map(|value| value.to_string()).collect())
}

fn specs(entries: &[(&str, SpecValue)]) -> BTreeMap<String, SpecValue> {
    entries.iter().map(|(key, value)| (key.to_string(), value.clone())).collect()
}

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId("P001".to_string()),
            name: "iPhone 15 Pro".to_string(),
            brand: "Apple".to_string(),
            price: Decimal::new(99_999, 2),
            stock: 15,
            description: "Latest iPhone with A17 Pro chip, 48MP camera, and titanium design"
                .to_string(),
            specs: specs(&[
                ("screen_size", spec_text("6.1 inches")),
                ("storage", spec_text("256GB")),
                ("colors", spec_list(&["Black", "White", "Blue", "Natural"])),
            ]),
        },
        Product {
            id: ProductId("P002".to_string()),
            name: "Samsung Galaxy S24 Ultra".to_string(),
            brand: "Samsung".to_string(),
            price: Decimal::new(119_999, 2),
            stock: 10,
            description: "Samsung's flagship with Snapdragon 8 Gen 3, 200MP camera, and S Pen"
                .to_string(),
            specs: specs(&[
                ("screen_size", spec_text("6.8 inches")),
                ("storage", spec_text("512GB")),
                ("colors", spec_list(&["Titanium Black", "Titanium Gray", "Titanium Violet"])),
            ]),
        },
        Product {
            id: ProductId("P003".to_string()),
            name: "Google Pixel 8 Pro".to_string(),
            brand: "Google".to_string(),
            price: Decimal::new(89_999, 2),
            stock: 8,
            description: "Google's premium phone with Tensor G3 chip and advanced AI features"
                .to_string(),
            specs: specs(&[
                ("screen_size", spec_text("6.7 inches")),
                ("storage", spec_text("128GB")),
                ("colors", spec_list(&["Obsidian", "Porcelain", "Bay"])),
            ]),
        },
        Product {
            id: ProductId("P004".to_string()),
            name: "Xiaomi 14 Ultra".to_string(),
            brand: "Xiaomi".to_string(),
            price: Decimal::new(109_999, 2),
            stock: 0,
            description: "Photography-focused flagship with Leica optics and Snapdragon 8 Gen 3"
                .to_string(),
            specs: specs(&[
                ("screen_size", spec_text("6.73 inches")),
                ("storage", spec_text("256GB")),
                ("colors", spec_list(&["Black", "White"])),
            ]),
        },
        Product {
            id: ProductId("P005".to_string()),
            name: "OnePlus 12".to_string(),
            brand: "OnePlus".to_string(),
            price: Decimal::new(79_999, 2),
            stock: 20,
            description: "Fast-charging flagship with Snapdragon 8 Gen 3 and Hasselblad cameras"
                .to_string(),
            specs: specs(&[
                ("screen_size", spec_text("6.82 inches")),
                ("storage", spec_text("256GB")),
                ("colors", spec_list(&["Flowy Emerald", "Silky Black"])),
            ]),
        },
    ]
}

fn seed_orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId("ORD10001".to_string()),
            customer_name: "John Smith".to_string(),
            product_id: ProductId("P001".to_string()),
            quantity: 1,
            status: OrderStatus::Shipped,
            shipping_address: "123 Main St, New York, NY".to_string(),
            tracking_number: Some("TRK78945612".to_string()),
            order_date: date(2023, 4, 15),
        },
        Order {
            id: OrderId("ORD10002".to_string()),
            customer_name: "Emma Johnson".to_string(),
            product_id: ProductId("P002".to_string()),
            quantity: 1,
            status: OrderStatus::Processing,
            shipping_address: "456 Oak Ave, Los Angeles, CA".to_string(),
            tracking_number: None,
            order_date: date(2023, 4, 18),
        },
        Order {
            id: OrderId("ORD10003".to_string()),
            customer_name: "Michael Brown".to_string(),
            product_id: ProductId("P003".to_string()),
            quantity: 2,
            status: OrderStatus::Delivered,
            shipping_address: "789 Pine Rd, Chicago, IL".to_string(),
            tracking_number: Some("TRK36547891".to_string()),
            order_date: date(2023, 4, 10),
        },
        Order {
            id: OrderId("ORD10004".to_string()),
            customer_name: "Sophia Williams".to_string(),
            product_id: ProductId("P005".to_string()),
            quantity: 1,
            status: OrderStatus::Cancelled,
            shipping_address: "101 Cedar Ln, Houston, TX".to_string(),
            tracking_number: None,
            order_date: date(2023, 4, 12),
        },
        Order {
            id: OrderId("ORD10005".to_string()),
            customer_name: "James Davis".to_string(),
            product_id: ProductId("P001".to_string()),
            quantity: 1,
            status: OrderStatus::Pending,
            shipping_address: "202 Maple Dr, Phoenix, AZ".to_string(),
            tracking_number: None,
            order_date: date(2023, 4, 20),
        },
    ]
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
