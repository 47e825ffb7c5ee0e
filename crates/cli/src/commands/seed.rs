//! Seed the record store with products from a YAML file.
//!
//! The file holds a list of products in the same shape `/createProduct`
//! accepts:
//!
//! ```yaml
//! - name: Tote bag
//!   price: "₹450"
//!   quantity: 12
//!   imageurl: https://img.example/tote.png
//!   companyname: ReWeave
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use repurpose_api::db::products::ProductRepository;
use repurpose_api::models::NewProduct;
use repurpose_api::store::postgres::{PostgresStore, create_pool};
use repurpose_api::store::{DEFAULT_TIMEOUT, RecordGateway};

/// Parse a product list from YAML.
fn parse_products(content: &str) -> Result<Vec<NewProduct>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every product in `file_path`.
///
/// The file is parsed in full before connecting, so a malformed file
/// inserts nothing. Returns the number of products inserted.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or parsed, or an insert fails.
pub async fn products(file_path: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let database_url =
        super::database_url().ok_or("API_DATABASE_URL (or DATABASE_URL) not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;
    info!(products = products.len(), "Parsed products");

    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    let gateway = RecordGateway::new(Arc::new(PostgresStore::new(pool)), DEFAULT_TIMEOUT);
    let repo = ProductRepository::new(&gateway);

    let mut inserted = 0;
    for product in products {
        let product = repo.create(product).await?;
        info!(product_id = %product.id, name = %product.name, "Inserted product");
        inserted += 1;
    }

    Ok(inserted)
}
