//! Static sample data: a small Colombian healthy-food shop. Served by the
//! in-memory store and used to seed empty databases.

use chrono::NaiveDate;
use sea_orm::prelude::DateTimeUtc;
use serde_json::json;
use std::collections::BTreeMap;

use crate::entities::order::{PaymentStatus, Status};
use crate::entities::system_setting::SettingType;
use crate::entities::types::{Address, NutritionalInfo, StringList};
use crate::entities::user::Role;
use crate::entities::{
    category, order, order_item, product, review, shipping_method, shipping_zone, system_setting,
    user,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    pub categories: Vec<category::Model>,
    pub products: Vec<product::Model>,
    pub users: Vec<user::Model>,
    pub orders: Vec<order::Model>,
    pub order_items: Vec<order_item::Model>,
    pub reviews: Vec<review::Model>,
    pub shipping_zones: Vec<shipping_zone::Model>,
    pub shipping_methods: Vec<shipping_method::Model>,
    pub settings: Vec<system_setting::Model>,
}

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTimeUtc {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn category(
    id: i32,
    name: &str,
    slug: &str,
    parent_id: Option<i32>,
    sort_order: i32,
    is_active: bool,
) -> category::Model {
    let created = at(2024, 1, id as u32, 9);
    category::Model {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(format!("Productos de la sección {}", name.to_lowercase())),
        image_url: Some(format!("/images/categories/{slug}.jpg")),
        parent_id,
        sort_order,
        is_active,
        created_at: created,
        updated_at: created,
    }
}

struct ProductSeed<'a> {
    id: i32,
    name: &'a str,
    slug: &'a str,
    sku: &'a str,
    price: i64,
    compare_price: Option<i64>,
    stock: i32,
    threshold: i32,
    brand: Option<&'a str>,
    category_id: Option<i32>,
    is_active: bool,
    is_featured: bool,
    tags: &'a [&'a str],
    ingredients: &'a [&'a str],
    calories: i64,
}

fn product(seed: ProductSeed<'_>) -> product::Model {
    let created = at(2024, 2, seed.id as u32, 10);
    let mut nutrition = BTreeMap::new();
    nutrition.insert("calories".to_string(), json!(seed.calories));
    nutrition.insert("serving_size".to_string(), json!("30 g"));
    product::Model {
        id: seed.id,
        name: seed.name.to_string(),
        slug: seed.slug.to_string(),
        description: Some(format!("{} elaborado en Colombia.", seed.name)),
        sku: seed.sku.to_string(),
        price: seed.price,
        compare_price: seed.compare_price,
        cost_price: Some(seed.price * 6 / 10),
        stock_quantity: seed.stock,
        low_stock_threshold: seed.threshold,
        brand: seed.brand.map(str::to_string),
        images: StringList(vec![format!("/images/products/{}.jpg", seed.slug)]),
        tags: StringList(seed.tags.iter().map(|t| t.to_string()).collect()),
        ingredients: StringList(seed.ingredients.iter().map(|i| i.to_string()).collect()),
        nutritional_info: NutritionalInfo(nutrition),
        category_id: seed.category_id,
        is_active: seed.is_active,
        is_featured: seed.is_featured,
        created_at: created,
        updated_at: created,
    }
}

fn user(
    id: i32,
    first_name: &str,
    last_name: &str,
    email: &str,
    role: Role,
    email_verified: bool,
    is_active: bool,
) -> user::Model {
    let created = at(2024, 3, id as u32, 8);
    user::Model {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: email.to_string(),
        phone: Some(format!("+57 300 000 00{id:02}")),
        role,
        email_verified,
        is_active,
        last_login_at: Some(at(2024, 6, id as u32, 18)),
        created_at: created,
        updated_at: created,
    }
}

fn address(full_name: &str, line1: &str, city: &str, department: &str) -> Address {
    Address {
        full_name: full_name.to_string(),
        line1: line1.to_string(),
        line2: None,
        city: city.to_string(),
        department: department.to_string(),
        postal_code: None,
        country: "Colombia".to_string(),
        phone: None,
    }
}

struct OrderSeed<'a> {
    id: i32,
    user_id: i32,
    status: Status,
    payment_status: PaymentStatus,
    subtotal: i64,
    shipping: i64,
    discount: i64,
    total: i64,
    created: DateTimeUtc,
    ship_to: Address,
    notes: Option<&'a str>,
}

fn order(seed: OrderSeed<'_>) -> order::Model {
    let shipped_at = matches!(seed.status, Status::Shipped | Status::Delivered)
        .then(|| seed.created + chrono::Duration::days(1));
    let delivered_at =
        (seed.status == Status::Delivered).then(|| seed.created + chrono::Duration::days(3));
    order::Model {
        id: seed.id,
        order_number: format!("ORD-2024-{:04}", seed.id),
        user_id: seed.user_id,
        status: seed.status,
        payment_status: seed.payment_status,
        subtotal: seed.subtotal,
        tax_amount: seed.subtotal * 19 / 100,
        shipping_amount: seed.shipping,
        discount_amount: seed.discount,
        total_amount: seed.total,
        billing_address: seed.ship_to.clone(),
        shipping_address: seed.ship_to,
        tracking_number: shipped_at.map(|_| format!("SRV{:08}", seed.id * 7919)),
        customer_notes: seed.notes.map(str::to_string),
        admin_notes: None,
        created_at: seed.created,
        updated_at: delivered_at.or(shipped_at).unwrap_or(seed.created),
        shipped_at,
        delivered_at,
    }
}

fn item(id: i32, order_id: i32, product: &product::Model, quantity: i32) -> order_item::Model {
    order_item::Model {
        id,
        order_id,
        product_id: Some(product.id),
        product_name: product.name.clone(),
        sku: product.sku.clone(),
        image: product.images.iter().next().cloned(),
        quantity,
        unit_price: product.price,
        total_price: product.price * i64::from(quantity),
    }
}

struct ReviewSeed<'a> {
    id: i32,
    product_id: i32,
    user_id: i32,
    order_id: Option<i32>,
    rating: i32,
    title: &'a str,
    comment: &'a str,
    is_approved: bool,
}

fn review(seed: ReviewSeed<'_>) -> review::Model {
    let created = at(2024, 5, seed.id as u32 * 2, 15);
    review::Model {
        id: seed.id,
        product_id: seed.product_id,
        user_id: seed.user_id,
        order_id: seed.order_id,
        rating: seed.rating,
        title: seed.title.to_string(),
        comment: seed.comment.to_string(),
        verified_purchase: seed.order_id.is_some(),
        is_approved: seed.is_approved,
        created_at: created,
        updated_at: created,
    }
}

fn setting(
    id: i32,
    key: &str,
    value: &str,
    setting_type: SettingType,
    category: &str,
    description: &str,
) -> system_setting::Model {
    system_setting::Model {
        id,
        key: key.to_string(),
        value: value.to_string(),
        setting_type,
        category: category.to_string(),
        description: Some(description.to_string()),
        updated_at: at(2024, 1, 1, 0),
    }
}

impl Dataset {
    pub fn sample() -> Self {
        let categories = vec![
            category(1, "Snacks saludables", "snacks-saludables", None, 1, true),
            category(2, "Granolas", "granolas", Some(1), 1, true),
            category(3, "Bebidas", "bebidas", None, 2, true),
            category(4, "Tés e infusiones", "tes-e-infusiones", Some(3), 1, true),
            category(5, "Temporada", "temporada", Some(1), 2, false),
        ];

        let products = vec![
            product(ProductSeed {
                id: 1,
                name: "Granola artesanal con miel",
                slug: "granola-artesanal-miel",
                sku: "GRA-001",
                price: 18_900,
                compare_price: Some(22_000),
                stock: 42,
                threshold: 10,
                brand: Some("Montaña Viva"),
                category_id: Some(2),
                is_active: true,
                is_featured: true,
                tags: &["sin gluten", "desayuno"],
                ingredients: &["avena", "miel", "almendras"],
                calories: 130,
            }),
            product(ProductSeed {
                id: 2,
                name: "Barra de cacao y maní",
                slug: "barra-cacao-mani",
                sku: "SNK-002",
                price: 4_500,
                compare_price: None,
                stock: 6,
                threshold: 15,
                brand: Some("Cacao Andino"),
                category_id: Some(1),
                is_active: true,
                is_featured: false,
                tags: &["vegano"],
                ingredients: &["cacao", "maní", "dátiles"],
                calories: 190,
            }),
            product(ProductSeed {
                id: 3,
                name: "Chips de plátano verde",
                slug: "chips-platano-verde",
                sku: "SNK-003",
                price: 6_200,
                compare_price: None,
                stock: 0,
                threshold: 8,
                brand: Some("Tierra Caliente"),
                category_id: Some(1),
                is_active: true,
                is_featured: true,
                tags: &["horneado"],
                ingredients: &["plátano", "aceite de coco", "sal marina"],
                calories: 150,
            }),
            product(ProductSeed {
                id: 4,
                name: "Té verde con limonaria",
                slug: "te-verde-limonaria",
                sku: "BEB-004",
                price: 12_500,
                compare_price: None,
                stock: 30,
                threshold: 5,
                brand: Some("Hojas del Quindío"),
                category_id: Some(4),
                is_active: true,
                is_featured: false,
                tags: &["orgánico"],
                ingredients: &["té verde", "limonaria"],
                calories: 2,
            }),
            product(ProductSeed {
                id: 5,
                name: "Kombucha de maracuyá",
                slug: "kombucha-maracuya",
                sku: "BEB-005",
                price: 9_800,
                compare_price: Some(11_000),
                stock: 5,
                threshold: 5,
                brand: None,
                category_id: Some(3),
                is_active: true,
                is_featured: false,
                tags: &["probiótico", "refrigerado"],
                ingredients: &["té negro", "maracuyá", "panela"],
                calories: 45,
            }),
            product(ProductSeed {
                id: 6,
                name: "Mix navideño de frutos secos",
                slug: "mix-navideno-frutos-secos",
                sku: "TMP-006",
                price: 32_000,
                compare_price: None,
                stock: 12,
                threshold: 3,
                brand: Some("Montaña Viva"),
                category_id: Some(5),
                is_active: false,
                is_featured: false,
                tags: &["temporada"],
                ingredients: &["nueces", "arándanos", "uchuvas deshidratadas"],
                calories: 210,
            }),
            product(ProductSeed {
                id: 7,
                name: "Mantequilla de almendras",
                slug: "mantequilla-almendras",
                sku: "UNT-007",
                price: 27_900,
                compare_price: None,
                stock: 18,
                threshold: 6,
                brand: Some("Cacao Andino"),
                category_id: None,
                is_active: true,
                is_featured: true,
                tags: &["keto"],
                ingredients: &["almendras"],
                calories: 180,
            }),
        ];

        let users = vec![
            user(1, "Laura", "Gómez", "admin@tiendasaludable.co", Role::Admin, true, true),
            user(2, "Andrés", "Restrepo", "andres.restrepo@example.co", Role::Customer, true, true),
            user(3, "María José", "Ortiz", "mariajo.ortiz@example.co", Role::Customer, true, true),
            user(4, "Camilo", "Vargas", "camilo.vargas@example.co", Role::Customer, false, true),
            user(5, "Valentina", "Rojas", "valentina.rojas@example.co", Role::Customer, false, false),
        ];

        let medellin = address("Andrés Restrepo", "Calle 10 # 43-12", "Medellín", "Antioquia");
        let bogota = address("María José Ortiz", "Carrera 7 # 72-40", "Bogotá", "Cundinamarca");
        let cali = address("Camilo Vargas", "Avenida 6N # 23-15", "Cali", "Valle del Cauca");

        let orders = vec![
            order(OrderSeed {
                id: 1,
                user_id: 2,
                status: Status::Delivered,
                payment_status: PaymentStatus::Paid,
                subtotal: 46_800,
                shipping: 8_000,
                discount: 0,
                total: 63_692,
                created: at(2024, 6, 3, 14),
                ship_to: medellin.clone(),
                notes: Some("Dejar en portería"),
            }),
            order(OrderSeed {
                id: 2,
                user_id: 3,
                status: Status::Shipped,
                payment_status: PaymentStatus::Paid,
                subtotal: 37_500,
                shipping: 8_000,
                discount: 5_000,
                total: 47_625,
                created: at(2024, 6, 5, 11),
                ship_to: bogota.clone(),
                notes: None,
            }),
            order(OrderSeed {
                id: 3,
                user_id: 2,
                status: Status::Processing,
                payment_status: PaymentStatus::Paid,
                subtotal: 27_900,
                shipping: 0,
                discount: 0,
                // Stored total includes a manual adjustment and is kept as is.
                total: 30_000,
                created: at(2024, 6, 5, 19),
                ship_to: medellin.clone(),
                notes: Some("Regalo, sin factura en la caja"),
            }),
            order(OrderSeed {
                id: 4,
                user_id: 4,
                status: Status::Pending,
                payment_status: PaymentStatus::Pending,
                subtotal: 13_500,
                shipping: 8_000,
                discount: 0,
                total: 24_065,
                created: at(2024, 6, 7, 9),
                ship_to: cali.clone(),
                notes: None,
            }),
            order(OrderSeed {
                id: 5,
                user_id: 3,
                status: Status::Cancelled,
                payment_status: PaymentStatus::Refunded,
                subtotal: 32_000,
                shipping: 8_000,
                discount: 0,
                total: 46_080,
                created: at(2024, 6, 8, 16),
                ship_to: bogota,
                notes: None,
            }),
            order(OrderSeed {
                id: 6,
                user_id: 4,
                status: Status::Confirmed,
                payment_status: PaymentStatus::Failed,
                subtotal: 19_600,
                shipping: 8_000,
                discount: 2_000,
                total: 29_324,
                created: at(2024, 6, 9, 12),
                ship_to: cali,
                notes: Some("Llamar antes de entregar"),
            }),
        ];

        let p = |id: i32| &products[id as usize - 1];
        let order_items = vec![
            item(1, 1, p(1), 2),
            item(2, 1, p(4), 1),
            item(3, 2, p(4), 3),
            item(4, 3, p(7), 1),
            item(5, 4, p(2), 3),
            item(6, 5, p(6), 1),
            item(7, 6, p(5), 2),
        ];

        let reviews = vec![
            review(ReviewSeed {
                id: 1,
                product_id: 1,
                user_id: 2,
                order_id: Some(1),
                rating: 5,
                title: "La mejor granola",
                comment: "Crocante y con el punto justo de miel.",
                is_approved: true,
            }),
            review(ReviewSeed {
                id: 2,
                product_id: 4,
                user_id: 3,
                order_id: Some(2),
                rating: 4,
                title: "Muy aromático",
                comment: "Me gusta en las tardes, aunque la caja es pequeña.",
                is_approved: true,
            }),
            review(ReviewSeed {
                id: 3,
                product_id: 2,
                user_id: 4,
                order_id: None,
                rating: 3,
                title: "Buena pero dulce",
                comment: "Le bajaría el azúcar de los dátiles.",
                is_approved: false,
            }),
            review(ReviewSeed {
                id: 4,
                product_id: 7,
                user_id: 2,
                order_id: Some(3),
                rating: 5,
                title: "Cremosa",
                comment: "Perfecta para el pan integral.",
                is_approved: false,
            }),
        ];

        let zone_created = at(2024, 1, 15, 8);
        let shipping_zones = vec![
            shipping_zone::Model {
                id: 1,
                name: "Área metropolitana".to_string(),
                description: Some("Entregas en Medellín y municipios cercanos".to_string()),
                regions: StringList::from(["Medellín", "Envigado", "Itagüí", "Bello"]),
                sort_order: 1,
                is_active: true,
                created_at: zone_created,
                updated_at: zone_created,
            },
            shipping_zone::Model {
                id: 2,
                name: "Nacional".to_string(),
                description: None,
                regions: StringList::from(["Bogotá", "Cali", "Barranquilla", "Bucaramanga"]),
                sort_order: 2,
                is_active: true,
                created_at: zone_created,
                updated_at: zone_created,
            },
        ];

        let method = |id: i32, zone_id: i32, name: &str, price: i64, days: &str, sort_order: i32| {
            shipping_method::Model {
                id,
                zone_id,
                name: name.to_string(),
                description: None,
                price,
                estimated_days: days.to_string(),
                sort_order,
                is_active: true,
                created_at: zone_created,
                updated_at: zone_created,
            }
        };
        let shipping_methods = vec![
            method(1, 1, "Mensajería el mismo día", 12_000, "0", 1),
            method(2, 1, "Estándar", 6_000, "1-2", 2),
            method(3, 2, "Transportadora", 8_000, "2-4", 1),
            method(4, 2, "Express", 18_000, "1-2", 2),
        ];

        let settings = vec![
            setting(1, "store_name", "Tienda Saludable", SettingType::Text, "general", "Nombre visible de la tienda"),
            setting(2, "tax_rate", "0.19", SettingType::Number, "checkout", "IVA aplicado a los productos"),
            setting(3, "free_shipping_threshold", "150000", SettingType::Number, "checkout", "Compra mínima para envío gratis"),
            setting(4, "maintenance_mode", "false", SettingType::Boolean, "general", "Oculta la tienda al público"),
            setting(
                5,
                "featured_banner",
                r#"{"title":"Semana de granolas","discount":15}"#,
                SettingType::Json,
                "marketing",
                "Banner de la página de inicio",
            ),
        ];

        Dataset {
            categories,
            products,
            users,
            orders,
            order_items,
            reviews,
            shipping_zones,
            shipping_methods,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sample_references_resolve() {
        let data = Dataset::sample();
        let categories: HashSet<i32> = data.categories.iter().map(|c| c.id).collect();
        let products: HashSet<i32> = data.products.iter().map(|p| p.id).collect();
        let users: HashSet<i32> = data.users.iter().map(|u| u.id).collect();
        let orders: HashSet<i32> = data.orders.iter().map(|o| o.id).collect();

        assert!(data
            .categories
            .iter()
            .filter_map(|c| c.parent_id)
            .all(|id| categories.contains(&id)));
        assert!(data
            .products
            .iter()
            .filter_map(|p| p.category_id)
            .all(|id| categories.contains(&id)));
        assert!(data.orders.iter().all(|o| users.contains(&o.user_id)));
        assert!(data.order_items.iter().all(|i| orders.contains(&i.order_id)));
        assert!(data
            .reviews
            .iter()
            .all(|r| products.contains(&r.product_id) && users.contains(&r.user_id)));
    }

    #[test]
    fn sample_values_are_within_bounds() {
        let data = Dataset::sample();
        assert!(data
            .products
            .iter()
            .all(|p| p.stock_quantity >= 0 && p.low_stock_threshold >= 0));
        assert!(data.reviews.iter().all(|r| (1..=5).contains(&r.rating)));
        assert!(data.settings.iter().all(|s| {
            crate::models::setting::parse_value(s.setting_type, &s.value).is_ok()
        }));
    }
}
